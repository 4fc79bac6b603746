//! Canonical region identifiers.
//!
//! All three inputs name regions independently: the feature-query filter
//! value, the snapshot CSV `label` field, and the reference file. Each join
//! point used to compare raw strings; instead, every source is mapped onto
//! this one closed enumeration and all lookups key on it.
//!
//! The enumeration is deliberately hardcoded, not derived from input data:
//! a label that does not resolve here is not a German federal state (the
//! snapshot CSV also carries countries and world regions) and is dropped.

use std::fmt;
use std::str::FromStr;

/// One of the 16 German federal states (Bundesländer).
///
/// Variant order is the canonical column order of every export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    BadenWuerttemberg,
    NordrheinWestfalen,
    Bayern,
    Hessen,
    Berlin,
    Niedersachsen,
    Sachsen,
    RheinlandPfalz,
    Brandenburg,
    Hamburg,
    SchleswigHolstein,
    Thueringen,
    MecklenburgVorpommern,
    Bremen,
    Saarland,
    SachsenAnhalt,
}

impl Region {
    /// Every region, in canonical order.
    pub const ALL: [Region; 16] = [
        Region::BadenWuerttemberg,
        Region::NordrheinWestfalen,
        Region::Bayern,
        Region::Hessen,
        Region::Berlin,
        Region::Niedersachsen,
        Region::Sachsen,
        Region::RheinlandPfalz,
        Region::Brandenburg,
        Region::Hamburg,
        Region::SchleswigHolstein,
        Region::Thueringen,
        Region::MecklenburgVorpommern,
        Region::Bremen,
        Region::Saarland,
        Region::SachsenAnhalt,
    ];

    /// The exact label both remote sources use for this region.
    ///
    /// This spelling goes verbatim into the feature-query `where` predicate,
    /// so it must not be normalized or transliterated.
    pub fn label(self) -> &'static str {
        match self {
            Region::BadenWuerttemberg => "Baden-Württemberg",
            Region::NordrheinWestfalen => "Nordrhein-Westfalen",
            Region::Bayern => "Bayern",
            Region::Hessen => "Hessen",
            Region::Berlin => "Berlin",
            Region::Niedersachsen => "Niedersachsen",
            Region::Sachsen => "Sachsen",
            Region::RheinlandPfalz => "Rheinland-Pfalz",
            Region::Brandenburg => "Brandenburg",
            Region::Hamburg => "Hamburg",
            Region::SchleswigHolstein => "Schleswig-Holstein",
            Region::Thueringen => "Thüringen",
            Region::MecklenburgVorpommern => "Mecklenburg-Vorpommern",
            Region::Bremen => "Bremen",
            Region::Saarland => "Saarland",
            Region::SachsenAnhalt => "Sachsen-Anhalt",
        }
    }

    /// Resolve a source label to a region. Exact match only, no fuzzing.
    pub fn from_label(label: &str) -> Option<Region> {
        Region::ALL.iter().copied().find(|r| r.label() == label)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::from_label(s).ok_or_else(|| format!("unknown region label '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_labels_round_trip() {
        for region in Region::ALL {
            assert_eq!(Region::from_label(region.label()), Some(region));
        }
    }

    #[test]
    fn labels_are_exact_matches_only() {
        assert_eq!(Region::from_label("hamburg"), None);
        assert_eq!(Region::from_label("Hamburg "), None);
        assert_eq!(Region::from_label("Baden-Wurttemberg"), None);
        assert_eq!(Region::from_label("Deutschland"), None);
    }

    #[test]
    fn canonical_order_is_stable() {
        assert_eq!(Region::ALL.len(), 16);
        assert_eq!(Region::ALL[0], Region::BadenWuerttemberg);
        assert_eq!(Region::ALL[9], Region::Hamburg);
        assert_eq!(Region::ALL[15], Region::SachsenAnhalt);
    }
}
