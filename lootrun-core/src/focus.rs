//! Quick-pick focus presets.
//!
//! A preset is a named run strategy bundling recommended boons, beacons and
//! missions. Applying one overwrites the current selections.
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

pub(crate) const DEFAULT_FOCUS_DATA: &str = include_str!("../assets/data/focus.json");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusPreset {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub emoji: String,
    pub description: String,
    #[serde(default)]
    pub boon_ids: Vec<String>,
    #[serde(default)]
    pub beacon_ids: Vec<String>,
    #[serde(default)]
    pub mission_ids: Vec<String>,
    #[serde(default)]
    pub tip: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FocusPresets {
    #[serde(default)]
    pub presets: Vec<FocusPreset>,
}

impl FocusPresets {
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            presets: Vec::new(),
        }
    }

    #[must_use]
    pub fn load_from_static() -> Self {
        serde_json::from_str(DEFAULT_FOCUS_DATA).unwrap_or_default()
    }

    #[must_use]
    pub fn default_presets() -> &'static Self {
        static PRESETS: OnceLock<FocusPresets> = OnceLock::new();
        PRESETS.get_or_init(Self::load_from_static)
    }

    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into presets.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn get_by_id(&self, id: &str) -> Option<&FocusPreset> {
        self.presets.iter().find(|p| p.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FocusPreset> {
        self.presets.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.presets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::{SelectionKind, SelectionStore};

    #[test]
    fn embedded_presets_cover_three_strategies() {
        let presets = FocusPresets::default_presets();
        let ids: Vec<_> = presets.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["flying_chests", "curse_stacking", "beacon_reroll"]);
        assert!(presets.get_by_id("speedrun").is_none());
    }

    #[test]
    fn applying_a_preset_replaces_selections() {
        let presets = FocusPresets::default_presets();
        let preset = presets.get_by_id("curse_stacking").unwrap();
        let mut store = SelectionStore::new();
        store.toggle(SelectionKind::Boon, "walk_speed");

        store.apply_focus(preset);
        assert_eq!(store.selected(SelectionKind::Boon), preset.boon_ids.as_slice());
        assert_eq!(store.selected(SelectionKind::Beacon)[0], "purple");
        assert_eq!(store.rank(SelectionKind::Mission, "porphyrophobia"), 2);
        assert!(!store.is_selected(SelectionKind::Boon, "walk_speed"));
    }

    #[test]
    fn preset_lists_default_to_empty() {
        let presets = FocusPresets::from_json(
            r#"{ "presets": [{ "id": "bare", "label": "Bare", "description": "nothing" }] }"#,
        )
        .unwrap();
        let bare = presets.get_by_id("bare").unwrap();
        assert!(bare.boon_ids.is_empty());
        assert!(bare.tip.is_empty());
    }
}
