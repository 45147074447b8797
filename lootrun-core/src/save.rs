//! Versioned JSON save document.
//!
//! Reading is deliberately forgiving: a document with the right version is
//! accepted even if fields are missing or have the wrong shape, and whatever
//! cannot be used is dropped. Anything that parses but is not a version 1
//! object is ignored. Only unparseable input is an error.
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::prefs::BeaconCombo;

pub const SAVE_VERSION: u32 = 1;
const EXPORT_FILE_PREFIX: &str = "lootrunner";

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("file is not UTF-8 text: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("file could not be parsed as JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// What an import did to the loadout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    Applied,
    /// The document carried a version this build does not read; nothing changed.
    UnrecognizedVersion,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveDocument {
    pub version: u32,
    pub exported_at: String,
    #[serde(default)]
    pub boons: Vec<String>,
    #[serde(default)]
    pub beacons: Vec<String>,
    #[serde(default)]
    pub missions: Vec<String>,
    #[serde(default)]
    pub stats_in_overview: Vec<String>,
    #[serde(default)]
    pub beacon_combos: Vec<BeaconCombo>,
}

impl SaveDocument {
    /// An empty current-version document stamped with `exported_at`.
    #[must_use]
    pub fn empty_at(exported_at: DateTime<Utc>) -> Self {
        Self {
            version: SAVE_VERSION,
            exported_at: format_timestamp(exported_at),
            boons: Vec::new(),
            beacons: Vec::new(),
            missions: Vec::new(),
            stats_in_overview: Vec::new(),
            beacon_combos: Vec::new(),
        }
    }

    /// Parse a document leniently.
    ///
    /// Returns `Ok(None)` when the input is valid JSON but not a version 1
    /// object. Combos without a string id come back with an empty id.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not UTF-8 or not JSON.
    pub fn from_slice(bytes: &[u8]) -> Result<Option<Self>, ImportError> {
        let text = std::str::from_utf8(bytes)?;
        Self::from_json(text)
    }

    /// # Errors
    ///
    /// Returns an error if the text is not JSON.
    pub fn from_json(text: &str) -> Result<Option<Self>, ImportError> {
        let value: Value = serde_json::from_str(text)?;
        let Value::Object(root) = value else {
            log::warn!("ignoring save document without an object root");
            return Ok(None);
        };

        let version = root.get("version");
        if version.and_then(Value::as_f64) != Some(f64::from(SAVE_VERSION)) {
            log::warn!("ignoring save document with version {version:?}");
            return Ok(None);
        }

        Ok(Some(Self {
            version: SAVE_VERSION,
            exported_at: root
                .get("exportedAt")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            boons: string_array(&root, "boons"),
            beacons: string_array(&root, "beacons"),
            missions: string_array(&root, "missions"),
            stats_in_overview: string_array(&root, "statsInOverview"),
            beacon_combos: combo_array(&root),
        }))
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// `lootrunner-YYYY-MM-DD.json`
#[must_use]
pub fn export_file_name(date: NaiveDate) -> String {
    format!("{EXPORT_FILE_PREFIX}-{}.json", date.format("%Y-%m-%d"))
}

/// RFC 3339, millisecond precision, `Z` suffix.
#[must_use]
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn strings_in(key: &str, value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let id = item.as_str();
            if id.is_none() {
                log::warn!("skipping non-string entry {item} in `{key}`");
            }
            id.map(str::to_string)
        })
        .collect()
}

fn string_array(root: &Map<String, Value>, key: &str) -> Vec<String> {
    strings_in(key, root.get(key))
}

fn combo_array(root: &Map<String, Value>) -> Vec<BeaconCombo> {
    let Some(Value::Array(items)) = root.get("beaconCombos") else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let Value::Object(combo) = item else {
                log::warn!("skipping beacon combo that is not an object");
                return None;
            };
            let text = |key: &str| {
                combo
                    .get(key)
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string()
            };
            Some(BeaconCombo {
                id: text("id"),
                name: text("name"),
                beacon_ids: strings_in("beaconIds", combo.get("beaconIds")),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn parse(json: &str) -> Option<SaveDocument> {
        SaveDocument::from_json(json).unwrap()
    }

    #[test]
    fn timestamp_and_file_name_format() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(format_timestamp(at), "2024-03-09T07:05:01.000Z");
        assert_eq!(
            export_file_name(at.date_naive()),
            "lootrunner-2024-03-09.json"
        );
    }

    #[test]
    fn export_uses_camel_case_keys() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut doc = SaveDocument::empty_at(at);
        doc.stats_in_overview.push("poison".into());
        doc.beacon_combos.push(BeaconCombo {
            id: "combo-1".into(),
            name: "Grey+Aqua".into(),
            beacon_ids: vec!["grey".into(), "aqua".into()],
        });
        let value: Value = serde_json::from_str(&doc.to_json_pretty().unwrap()).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["exportedAt"], "2024-01-01T00:00:00.000Z");
        assert_eq!(value["statsInOverview"][0], "poison");
        assert_eq!(value["beaconCombos"][0]["beaconIds"][1], "aqua");
    }

    #[test]
    fn other_versions_are_not_read() {
        assert!(parse(r#"{ "version": 2, "boons": ["x"] }"#).is_none());
        assert!(parse(r#"{ "version": "1", "boons": ["x"] }"#).is_none());
        assert!(parse(r#"{ "boons": ["x"] }"#).is_none());
    }

    #[test]
    fn non_object_roots_are_not_read() {
        for json in ["[1, 2]", "42", r#""text""#, "true", "null"] {
            assert!(parse(json).is_none(), "{json}");
        }
    }

    #[test]
    fn version_only_document_is_empty() {
        let doc = parse(r#"{ "version": 1 }"#).unwrap();
        assert!(doc.boons.is_empty());
        assert!(doc.stats_in_overview.is_empty());
        assert!(doc.beacon_combos.is_empty());
        assert!(doc.exported_at.is_empty());
    }

    #[test]
    fn wrong_shapes_degrade_to_empty() {
        let doc = parse(
            r#"{
                "version": 1,
                "boons": "looter",
                "beacons": ["grey", 7, null, "aqua"],
                "missions": { "0": "hoarder" },
                "beaconCombos": [
                    "junk",
                    { "id": "c1" },
                    { "id": 9, "name": "Pair", "beaconIds": ["grey", false] }
                ]
            }"#,
        )
        .unwrap();
        assert!(doc.boons.is_empty());
        assert_eq!(doc.beacons, vec!["grey", "aqua"]);
        assert!(doc.missions.is_empty());
        assert_eq!(doc.beacon_combos.len(), 2);
        assert_eq!(doc.beacon_combos[0].id, "c1");
        assert!(doc.beacon_combos[0].name.is_empty());
        assert!(doc.beacon_combos[0].beacon_ids.is_empty());
        assert!(doc.beacon_combos[1].id.is_empty());
        assert_eq!(doc.beacon_combos[1].beacon_ids, vec!["grey"]);
    }

    #[test]
    fn unreadable_input_is_an_error() {
        assert!(matches!(
            SaveDocument::from_json("{ nope"),
            Err(ImportError::Parse(_))
        ));
        assert!(matches!(
            SaveDocument::from_slice(&[0xff, 0xfe]),
            Err(ImportError::Utf8(_))
        ));
    }
}
