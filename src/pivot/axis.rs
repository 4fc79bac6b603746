//! Date-axis alignment across sources.
//!
//! The pivoted table carries one row per distinct report date seen in
//! either series. The axis is the sorted union of those dates, strictly
//! ascending with duplicates collapsed. It is materialized once and reused
//! while pivoting.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::domain::CaseRecord;

/// Sorted union of all report dates across both record collections.
pub fn aligned_dates(infections: &[CaseRecord], deaths: &[CaseRecord]) -> Vec<NaiveDate> {
    let dates: BTreeSet<NaiveDate> = infections
        .iter()
        .chain(deaths.iter())
        .map(|record| record.report_date)
        .collect();
    dates.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Region;

    fn record(y: i32, m: u32, d: u32) -> CaseRecord {
        CaseRecord {
            report_date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            count: 1,
            sex: "M".to_string(),
            age_group: "A35-A59".to_string(),
            region: Region::Hamburg,
        }
    }

    #[test]
    fn axis_is_the_sorted_union_of_both_sources() {
        let infections = vec![record(2020, 3, 3), record(2020, 3, 1), record(2020, 3, 3)];
        let deaths = vec![record(2020, 3, 2), record(2020, 3, 1)];

        let axis = aligned_dates(&infections, &deaths);
        assert_eq!(
            axis,
            vec![
                NaiveDate::from_ymd_opt(2020, 3, 1).unwrap(),
                NaiveDate::from_ymd_opt(2020, 3, 2).unwrap(),
                NaiveDate::from_ymd_opt(2020, 3, 3).unwrap(),
            ]
        );
    }

    #[test]
    fn axis_is_strictly_ascending_and_duplicate_free() {
        let infections = vec![
            record(2021, 1, 5),
            record(2020, 12, 31),
            record(2021, 1, 5),
            record(2020, 2, 29),
        ];
        let axis = aligned_dates(&infections, &[]);
        assert!(axis.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(axis.len(), 3);
    }

    #[test]
    fn one_sided_and_empty_inputs_work() {
        assert!(aligned_dates(&[], &[]).is_empty());

        let deaths = vec![record(2020, 4, 1)];
        let axis = aligned_dates(&[], &deaths);
        assert_eq!(axis, vec![NaiveDate::from_ymd_opt(2020, 4, 1).unwrap()]);
    }
}
