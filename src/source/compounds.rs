use std::fmt;
use std::path::Path;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;

use super::SourceError;
use crate::compound::Compound;
use crate::measurement::ConcentrationMap;

#[derive(Deserialize)]
struct CompoundEntry {
    ions: Vec<f64>,
    #[serde(default)]
    info: Vec<String>,
}

/// Compounds in the order they appear in the file
struct CompoundList(Vec<Compound>);

impl<'de> Deserialize<'de> for CompoundList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ListVisitor;

        impl<'de> Visitor<'de> for ListVisitor {
            type Value = CompoundList;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of compound names to ion lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut compounds = Vec::new();
                while let Some((name, entry)) = map.next_entry::<String, CompoundEntry>()? {
                    compounds.push(Compound::new(name, &entry.ions).with_ion_info(entry.info));
                }
                Ok(CompoundList(compounds))
            }
        }

        deserializer.deserialize_map(ListVisitor)
    }
}

/// Parse a compound list `{ "<name>": { "ions": [..], "info": [..] } }`,
/// keeping file order
pub fn parse_compounds(content: &str) -> Result<Vec<Compound>, SourceError> {
    let list: CompoundList = serde_json::from_str(content)?;
    Ok(list.0)
}

/// Load a compound list from a JSON file
pub fn load_compounds<P: AsRef<Path>>(path: P) -> Result<Vec<Compound>, SourceError> {
    parse_compounds(&std::fs::read_to_string(path)?)
}

/// Parse a file-stem to concentration map, as TOML or JSON, keeping file
/// order
pub fn parse_calibration_map(
    content: &str,
    toml: bool,
) -> Result<ConcentrationMap, SourceError> {
    if toml {
        Ok(toml::from_str(content)?)
    } else {
        Ok(serde_json::from_str(content)?)
    }
}

/// Load a calibration map; `.toml` files are read as TOML, anything else
/// as JSON
pub fn load_calibration_map<P: AsRef<Path>>(
    path: P,
) -> Result<ConcentrationMap, SourceError> {
    let path = path.as_ref();
    let toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    parse_calibration_map(&std::fs::read_to_string(path)?, toml)
}
