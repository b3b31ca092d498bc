//! Filename conventions for measurement files.
//!
//! Calibration standards carry `STMIX` in their file stem and usually encode
//! their concentration, e.g. `STMIX_2.5mM_run1` or `STMIX_100_uM`.

use std::fmt;
use std::ops::Index;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;

/// Marker identifying a calibration standard
pub const CALIBRATION_MARKER: &str = "STMIX";

/// File stem of `path`, or the whole path when it has none
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Whether a file stem names a calibration standard
pub fn is_calibration_standard(stem: &str) -> bool {
    stem.contains(CALIBRATION_MARKER)
}

/// Concentration pattern: a number with optional fraction, at most one
/// separator character, any underscores, then a unit such as `mM` or `uM`
pub const CONCENTRATION_PATTERN: &str = r"(\d+(\.\d+)?).?_*([a-z][A-Z]{1,3})";

fn concentration_regex() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(CONCENTRATION_PATTERN).ok())
        .as_ref()
}

/// Extract a `"<number> <unit>"` concentration string from a file stem,
/// using the first match of [`CONCENTRATION_PATTERN`]
pub fn concentration_from_name(stem: &str) -> Option<String> {
    let caps = concentration_regex()?.captures(stem)?;
    Some(format!("{} {}", &caps[1], &caps[3]))
}

/// File stem to concentration string, in the order the entries were given.
///
/// Calibration visits standards in this order, so when two standards share
/// a concentration the later one provides that point.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConcentrationMap {
    entries: Vec<(String, String)>,
}

impl ConcentrationMap {
    /// Empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the concentration of `stem`. A stem already present keeps its
    /// position and takes the new value.
    pub fn insert(&mut self, stem: impl Into<String>, concentration: impl Into<String>) {
        let stem = stem.into();
        let concentration = concentration.into();
        match self.entries.iter_mut().find(|(s, _)| *s == stem) {
            Some(entry) => entry.1 = concentration,
            None => self.entries.push((stem, concentration)),
        }
    }

    /// Concentration string of `stem`
    pub fn get(&self, stem: &str) -> Option<&str> {
        self.lookup(stem).map(String::as_str)
    }

    fn lookup(&self, stem: &str) -> Option<&String> {
        self.entries.iter().find(|(s, _)| s == stem).map(|(_, c)| c)
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(s, c)| (s.as_str(), c.as_str()))
    }

    /// Number of stems
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no stem is mapped
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Index<&str> for ConcentrationMap {
    type Output = String;

    fn index(&self, stem: &str) -> &String {
        match self.lookup(stem) {
            Some(concentration) => concentration,
            None => panic!("no concentration for {}", stem),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ConcentrationMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (stem, concentration) in iter {
            map.insert(stem, concentration);
        }
        map
    }
}

impl<'de> Deserialize<'de> for ConcentrationMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MapVisitor;

        impl<'de> Visitor<'de> for MapVisitor {
            type Value = ConcentrationMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of file stems to concentrations")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = ConcentrationMap::new();
                while let Some((stem, concentration)) = access.next_entry::<String, String>()? {
                    map.insert(stem, concentration);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(MapVisitor)
    }
}

/// Concentrations of every calibration standard among `stems` whose name
/// encodes one, in the order given
pub fn calibration_map<'a, I>(stems: I) -> ConcentrationMap
where
    I: IntoIterator<Item = &'a str>,
{
    stems
        .into_iter()
        .filter(|stem| is_calibration_standard(stem))
        .filter_map(|stem| concentration_from_name(stem).map(|c| (stem.to_string(), c)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calibration_marker() {
        assert!(is_calibration_standard("STMIX_5mM"));
        assert!(!is_calibration_standard("sample_01"));
    }

    #[test]
    fn test_concentration_from_name() {
        assert_eq!(
            concentration_from_name("STMIX_2.5mM_run1").as_deref(),
            Some("2.5 mM")
        );
        assert_eq!(concentration_from_name("STMIX_100_uM").as_deref(), Some("100 uM"));
        assert_eq!(concentration_from_name("STMIX_10__nM").as_deref(), Some("10 nM"));
        assert_eq!(concentration_from_name("STMIX 0.01 mM").as_deref(), Some("0.01 mM"));
        assert_eq!(concentration_from_name("blank_run"), None);
        assert_eq!(concentration_from_name("run_42"), None);
    }

    #[test]
    fn test_concentration_skips_non_matching_numbers() {
        assert_eq!(
            concentration_from_name("2024_STMIX_5mM").as_deref(),
            Some("5 mM")
        );
        assert_eq!(concentration_from_name("12x3mM").as_deref(), Some("3 mM"));
    }

    #[test]
    fn test_concentration_unit_takes_at_most_three_capitals() {
        assert_eq!(
            concentration_from_name("STMIX_7.25pMOLX").as_deref(),
            Some("7.25 pMOL")
        );
        assert_eq!(concentration_from_name("STMIX_5.mM").as_deref(), Some("5 mM"));
        assert_eq!(concentration_from_name("STMIX_3-__uM").as_deref(), Some("3 uM"));
    }

    #[test]
    fn test_calibration_map_skips_samples() {
        let map = calibration_map(["STMIX_1mM", "sample_2mM", "STMIX_blank"]);
        assert_eq!(map.len(), 1);
        assert_eq!(map["STMIX_1mM"], "1 mM");
    }

    #[test]
    fn test_concentration_map_keeps_given_order() {
        let mut map = calibration_map(["STMIX_b_2mM", "STMIX_a_1mM", "STMIX_c_2mM"]);
        map.insert("STMIX_b_2mM", "3 mM");
        let stems: Vec<&str> = map.iter().map(|(stem, _)| stem).collect();
        assert_eq!(stems, ["STMIX_b_2mM", "STMIX_a_1mM", "STMIX_c_2mM"]);
        assert_eq!(map["STMIX_b_2mM"], "3 mM");
        assert_eq!(map.get("STMIX_d"), None);
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem(Path::new("/data/STMIX_1mM.json")), "STMIX_1mM");
    }
}
