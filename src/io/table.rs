//! Header-addressed access to CSV rows, shared by the ingest paths.
//!
//! Both CSV inputs (the downloaded snapshot history and the local region
//! reference) are parsed by column name rather than position, so extra or
//! reordered columns do not break them. Lookup is case-insensitive and a
//! UTF-8 BOM on the first header is tolerated.

use std::collections::HashMap;

use csv::StringRecord;

/// Map lowercased header names to their column positions.
pub(crate) fn header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let key = name.trim_start_matches('\u{feff}').trim().to_ascii_lowercase();
            (key, idx)
        })
        .collect()
}

pub(crate) fn column(map: &HashMap<String, usize>, name: &str) -> Option<usize> {
    map.get(name).copied()
}

/// A trimmed, non-empty cell value. Empty cells read as `None`.
pub(crate) fn cell(record: &StringRecord, idx: usize) -> Option<&str> {
    record
        .get(idx)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_fold_case_and_strip_a_bom() {
        let headers = StringRecord::from(vec!["\u{feff}Label", "DATE", " confirmed "]);
        let map = header_map(&headers);
        assert_eq!(column(&map, "label"), Some(0));
        assert_eq!(column(&map, "date"), Some(1));
        assert_eq!(column(&map, "confirmed"), Some(2));
        assert_eq!(column(&map, "deaths"), None);
    }

    #[test]
    fn empty_cells_read_as_none() {
        let record = StringRecord::from(vec!["Hamburg", "", "  "]);
        assert_eq!(cell(&record, 0), Some("Hamburg"));
        assert_eq!(cell(&record, 1), None);
        assert_eq!(cell(&record, 2), None);
        assert_eq!(cell(&record, 9), None);
    }
}
