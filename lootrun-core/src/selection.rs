//! Ordered selections of boons, beacons and missions.
//!
//! Position in a [`SelectionList`] is the user's priority rank. There is no
//! separate rank field: removing an entry implicitly promotes everything after it.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::focus::FocusPreset;
use crate::rules::RunRules;

/// The catalog kinds a user can pick and rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionKind {
    Boon,
    Beacon,
    Mission,
}

impl SelectionKind {
    pub const ALL: [Self; 3] = [Self::Boon, Self::Beacon, Self::Mission];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Boon => "boon",
            Self::Beacon => "beacon",
            Self::Mission => "mission",
        }
    }
}

impl fmt::Display for SelectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SelectionKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "boon" | "boons" => Ok(Self::Boon),
            "beacon" | "beacons" => Ok(Self::Beacon),
            "mission" | "missions" => Ok(Self::Mission),
            _ => Err(()),
        }
    }
}

/// Ordered, duplicate-free list of catalog ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct SelectionList {
    ids: Vec<String>,
}

impl SelectionList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from arbitrary ids; repeats after the first are dropped.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = Self::new();
        list.replace(ids);
        list
    }

    /// Remove `id` if present, append it otherwise.
    /// Returns `true` when `id` is selected afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        if let Some(pos) = self.position(id) {
            self.ids.remove(pos);
            false
        } else {
            self.ids.push(id.to_string());
            true
        }
    }

    /// 1-based priority rank, `0` when not selected.
    #[must_use]
    pub fn rank(&self, id: &str) -> usize {
        self.position(id).map_or(0, |pos| pos + 1)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Replace the whole list. First occurrence of a repeated id wins.
    pub fn replace<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids.clear();
        for id in ids {
            let id = id.into();
            if !self.contains(&id) {
                self.ids.push(id);
            }
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    #[must_use]
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.ids.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.ids.iter().position(|existing| existing == id)
    }
}

impl From<Vec<String>> for SelectionList {
    fn from(ids: Vec<String>) -> Self {
        Self::from_ids(ids)
    }
}

impl From<SelectionList> for Vec<String> {
    fn from(list: SelectionList) -> Self {
        list.ids
    }
}

impl<'a> IntoIterator for &'a SelectionList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Reported when more missions are picked than a run can complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissionOverflow {
    pub selected: usize,
    pub limit: usize,
}

/// One [`SelectionList`] per [`SelectionKind`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionStore {
    boons: SelectionList,
    beacons: SelectionList,
    missions: SelectionList,
}

impl SelectionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn list(&self, kind: SelectionKind) -> &SelectionList {
        match kind {
            SelectionKind::Boon => &self.boons,
            SelectionKind::Beacon => &self.beacons,
            SelectionKind::Mission => &self.missions,
        }
    }

    fn list_mut(&mut self, kind: SelectionKind) -> &mut SelectionList {
        match kind {
            SelectionKind::Boon => &mut self.boons,
            SelectionKind::Beacon => &mut self.beacons,
            SelectionKind::Mission => &mut self.missions,
        }
    }

    /// Ids are stored as given; unknown ids are a render-time concern.
    pub fn toggle(&mut self, kind: SelectionKind, id: &str) -> bool {
        let selected = self.list_mut(kind).toggle(id);
        log::debug!(
            "{kind} `{id}` {}",
            if selected { "selected" } else { "deselected" }
        );
        selected
    }

    #[must_use]
    pub fn rank(&self, kind: SelectionKind, id: &str) -> usize {
        self.list(kind).rank(id)
    }

    #[must_use]
    pub fn is_selected(&self, kind: SelectionKind, id: &str) -> bool {
        self.list(kind).contains(id)
    }

    #[must_use]
    pub fn selected(&self, kind: SelectionKind) -> &[String] {
        self.list(kind).ids()
    }

    #[must_use]
    pub fn len(&self, kind: SelectionKind) -> usize {
        self.list(kind).len()
    }

    pub fn clear(&mut self, kind: SelectionKind) {
        self.list_mut(kind).clear();
    }

    pub fn replace<I, S>(&mut self, kind: SelectionKind, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.list_mut(kind).replace(ids);
    }

    pub fn reset(&mut self) {
        for kind in SelectionKind::ALL {
            self.clear(kind);
        }
    }

    /// Overwrite all three lists with a preset's recommendations.
    pub fn apply_focus(&mut self, preset: &FocusPreset) {
        self.replace(SelectionKind::Boon, preset.boon_ids.iter().cloned());
        self.replace(SelectionKind::Beacon, preset.beacon_ids.iter().cloned());
        self.replace(SelectionKind::Mission, preset.mission_ids.iter().cloned());
        log::debug!("applied focus preset `{}`", preset.id);
    }

    /// Soft limit only: the store never refuses an extra mission.
    #[must_use]
    pub fn mission_warning(&self, rules: &RunRules) -> Option<MissionOverflow> {
        let selected = self.missions.len();
        (selected > rules.max_missions).then_some(MissionOverflow {
            selected,
            limit: rules.max_missions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(list: &SelectionList) -> Vec<&str> {
        list.iter().map(String::as_str).collect()
    }

    #[test]
    fn toggle_appends_then_removes() {
        let mut store = SelectionStore::new();
        assert!(store.toggle(SelectionKind::Boon, "looter"));
        assert!(store.toggle(SelectionKind::Boon, "serendipity"));
        assert!(!store.toggle(SelectionKind::Boon, "looter"));

        assert_eq!(store.selected(SelectionKind::Boon), ["serendipity"]);
        assert_eq!(store.rank(SelectionKind::Boon, "serendipity"), 1);
        assert_eq!(store.rank(SelectionKind::Boon, "looter"), 0);
    }

    #[test]
    fn double_toggle_of_new_id_is_a_no_op() {
        let before = SelectionList::from_ids(["a", "b", "c"]);
        let mut list = before.clone();
        list.toggle("d");
        list.toggle("d");
        assert_eq!(list, before);
    }

    #[test]
    fn double_toggle_of_selected_id_moves_it_last() {
        let mut list = SelectionList::from_ids(["a", "b", "c"]);
        list.toggle("b");
        list.toggle("b");
        assert_eq!(ids(&list), vec!["a", "c", "b"]);
    }

    #[test]
    fn removal_promotes_later_entries() {
        let mut list = SelectionList::from_ids(["grey", "aqua", "green", "blue"]);
        list.toggle("aqua");
        assert_eq!(list.rank("grey"), 1);
        assert_eq!(list.rank("green"), 2);
        assert_eq!(list.rank("blue"), 3);
        assert_eq!(list.rank("aqua"), 0);
    }

    #[test]
    fn rank_matches_position_after_mixed_toggles() {
        let mut list = SelectionList::new();
        for id in ["x", "y", "x", "z", "w", "y", "x"] {
            list.toggle(id);
        }
        for (pos, id) in list.iter().enumerate() {
            assert_eq!(list.rank(id), pos + 1);
        }
        assert_eq!(ids(&list), vec!["z", "w", "x"]);
        assert_eq!(list.rank("y"), 0);
    }

    #[test]
    fn replace_drops_repeats_keeping_first() {
        let mut store = SelectionStore::new();
        store.replace(SelectionKind::Mission, ["hoarder", "optimism", "hoarder"]);
        assert_eq!(store.selected(SelectionKind::Mission), ["hoarder", "optimism"]);

        store.clear(SelectionKind::Mission);
        assert!(store.list(SelectionKind::Mission).is_empty());
    }

    #[test]
    fn kinds_are_independent() {
        let mut store = SelectionStore::new();
        store.toggle(SelectionKind::Boon, "shared");
        assert!(store.is_selected(SelectionKind::Boon, "shared"));
        assert!(!store.is_selected(SelectionKind::Beacon, "shared"));
        store.reset();
        assert_eq!(store, SelectionStore::new());
    }

    #[test]
    fn fifth_mission_is_allowed_but_flagged() {
        let rules = RunRules::default();
        let mut store = SelectionStore::new();
        for id in ["a", "b", "c", "d"] {
            store.toggle(SelectionKind::Mission, id);
        }
        assert_eq!(store.mission_warning(&rules), None);

        assert!(store.toggle(SelectionKind::Mission, "e"));
        assert_eq!(
            store.mission_warning(&rules),
            Some(MissionOverflow {
                selected: 5,
                limit: 4
            })
        );
    }

    #[test]
    fn serde_uses_plain_arrays() {
        let list = SelectionList::from_ids(["grey", "aqua"]);
        let json = serde_json::to_string(&list).unwrap();
        assert_eq!(json, r#"["grey","aqua"]"#);
        let parsed: SelectionList = serde_json::from_str(r#"["a","b","a"]"#).unwrap();
        assert_eq!(ids(&parsed), vec!["a", "b"]);
    }

    #[test]
    fn kind_parses_singular_and_plural() {
        assert_eq!("boons".parse::<SelectionKind>(), Ok(SelectionKind::Boon));
        assert_eq!("mission".parse::<SelectionKind>(), Ok(SelectionKind::Mission));
        assert!("stats".parse::<SelectionKind>().is_err());
    }
}
