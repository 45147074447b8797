//! The user's loadout: selections and preferences as a single value.
use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::collections::HashSet;

use crate::catalog::{Beacon, Boon, Catalog, CatalogRecord, Mission, Stat, Table};
use crate::prefs::{BeaconCombo, PreferenceStore, fresh_combo_id};
use crate::rules::RunRules;
use crate::save::{ImportError, ImportOutcome, SAVE_VERSION, SaveDocument, format_timestamp};
use crate::selection::{MissionOverflow, SelectionKind, SelectionList, SelectionStore};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Loadout {
    pub selections: SelectionStore,
    pub prefs: PreferenceStore,
}

impl Loadout {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.selections.reset();
        self.prefs.reset();
    }

    #[must_use]
    pub fn export(&self) -> SaveDocument {
        self.export_at(Utc::now())
    }

    #[must_use]
    pub fn export_at(&self, at: DateTime<Utc>) -> SaveDocument {
        SaveDocument {
            version: SAVE_VERSION,
            exported_at: format_timestamp(at),
            boons: self.selections.selected(SelectionKind::Boon).to_vec(),
            beacons: self.selections.selected(SelectionKind::Beacon).to_vec(),
            missions: self.selections.selected(SelectionKind::Mission).to_vec(),
            stats_in_overview: self.prefs.stats_in_overview().map(str::to_string).collect(),
            beacon_combos: self.prefs.combos().to_vec(),
        }
    }

    /// Replace the whole loadout with the document in `bytes`.
    ///
    /// The loadout is untouched unless the result is [`ImportOutcome::Applied`].
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes cannot be read as a JSON object.
    pub fn import(&mut self, bytes: &[u8]) -> Result<ImportOutcome, ImportError> {
        match SaveDocument::from_slice(bytes)? {
            Some(doc) => {
                self.apply_document(doc);
                Ok(ImportOutcome::Applied)
            }
            None => Ok(ImportOutcome::UnrecognizedVersion),
        }
    }

    /// Overwrite every store from `doc`. Combos with a blank or repeated id
    /// get a fresh one.
    pub fn apply_document(&mut self, doc: SaveDocument) {
        let mut selections = SelectionStore::new();
        selections.replace(SelectionKind::Boon, doc.boons);
        selections.replace(SelectionKind::Beacon, doc.beacons);
        selections.replace(SelectionKind::Mission, doc.missions);

        let mut taken: HashSet<String> = doc
            .beacon_combos
            .iter()
            .filter(|combo| !combo.id.is_empty())
            .map(|combo| combo.id.clone())
            .collect();
        let mut rng = SmallRng::from_entropy();
        let mut seen = HashSet::new();
        let mut combos = Vec::with_capacity(doc.beacon_combos.len());
        for mut combo in doc.beacon_combos {
            if combo.id.is_empty() || !seen.insert(combo.id.clone()) {
                combo.id = fresh_combo_id(&mut rng, |id| taken.contains(id));
                taken.insert(combo.id.clone());
                seen.insert(combo.id.clone());
            }
            combos.push(combo);
        }

        let mut prefs = PreferenceStore::new();
        prefs.replace_stats(doc.stats_in_overview);
        prefs.replace_combos(combos);

        log::debug!(
            "imported {} boons, {} beacons, {} missions, {} combos",
            selections.len(SelectionKind::Boon),
            selections.len(SelectionKind::Beacon),
            selections.len(SelectionKind::Mission),
            prefs.combos().len()
        );
        self.selections = selections;
        self.prefs = prefs;
    }

    #[must_use]
    pub fn from_document(doc: SaveDocument) -> Self {
        let mut loadout = Self::new();
        loadout.apply_document(doc);
        loadout
    }

    #[must_use]
    pub fn mission_warning(&self, rules: &RunRules) -> Option<MissionOverflow> {
        self.selections.mission_warning(rules)
    }
}

/// A selected record paired with its priority rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ranked<'a, T> {
    pub rank: usize,
    pub record: &'a T,
}

/// Look up each selected id in `table`, skipping ids the catalog does not know.
/// Ranks are list positions, so a skipped id leaves a gap.
pub fn resolve_selection<'a, T: CatalogRecord>(
    list: &SelectionList,
    table: &'a Table<T>,
) -> Vec<Ranked<'a, T>> {
    list.iter()
        .enumerate()
        .filter_map(|(pos, id)| {
            table.get(id).map(|record| Ranked {
                rank: pos + 1,
                record,
            })
        })
        .collect()
}

#[must_use]
pub fn resolve_combo<'a>(combo: &BeaconCombo, beacons: &'a Table<Beacon>) -> Vec<&'a Beacon> {
    combo
        .beacon_ids
        .iter()
        .filter_map(|id| beacons.get(id))
        .collect()
}

/// Overview stats in catalog order.
#[must_use]
pub fn overview_stats<'a>(prefs: &PreferenceStore, stats: &'a Table<Stat>) -> Vec<&'a Stat> {
    stats
        .iter()
        .filter(|stat| prefs.is_stat_in_overview(&stat.id))
        .collect()
}

/// Everything needed to render a loadout, resolved against a catalog.
#[derive(Debug, Clone)]
pub struct LoadoutView<'a> {
    pub boons: Vec<Ranked<'a, Boon>>,
    pub beacons: Vec<Ranked<'a, Beacon>>,
    pub missions: Vec<Ranked<'a, Mission>>,
    pub stats: Vec<&'a Stat>,
    pub combos: Vec<(&'a BeaconCombo, Vec<&'a Beacon>)>,
    pub mission_warning: Option<MissionOverflow>,
}

impl<'a> LoadoutView<'a> {
    #[must_use]
    pub fn new(loadout: &'a Loadout, catalog: &'a Catalog, rules: &RunRules) -> Self {
        let selections = &loadout.selections;
        Self {
            boons: resolve_selection(selections.list(SelectionKind::Boon), &catalog.boons),
            beacons: resolve_selection(selections.list(SelectionKind::Beacon), &catalog.beacons),
            missions: resolve_selection(selections.list(SelectionKind::Mission), &catalog.missions),
            stats: overview_stats(&loadout.prefs, &catalog.stats),
            combos: loadout
                .prefs
                .combos()
                .iter()
                .map(|combo| (combo, resolve_combo(combo, &catalog.beacons)))
                .collect(),
            mission_warning: loadout.mission_warning(rules),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boons.is_empty()
            && self.beacons.is_empty()
            && self.missions.is_empty()
            && self.stats.is_empty()
            && self.combos.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Loadout {
        let mut loadout = Loadout::new();
        loadout.selections.toggle(SelectionKind::Boon, "looter");
        loadout.selections.toggle(SelectionKind::Beacon, "grey");
        loadout.selections.toggle(SelectionKind::Beacon, "aqua");
        loadout.selections.toggle(SelectionKind::Mission, "hoarder");
        loadout.prefs.toggle_stat("walk_speed");
        let beacons = loadout.selections.selected(SelectionKind::Beacon).to_vec();
        loadout.prefs.create_combo("Aqua Grey", &beacons);
        loadout
    }

    #[test]
    fn export_then_import_restores_state() {
        let original = sample();
        let json = original.export().to_json_pretty().unwrap();

        let mut restored = Loadout::new();
        assert_eq!(
            restored.import(json.as_bytes()).unwrap(),
            ImportOutcome::Applied
        );
        assert_eq!(restored, original);
    }

    #[test]
    fn export_at_stamps_the_given_time() {
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let doc = sample().export_at(at);
        assert_eq!(doc.exported_at, "2025-06-01T12:00:00.000Z");
        assert_eq!(doc.beacons, vec!["grey", "aqua"]);
    }

    #[test]
    fn invalid_json_leaves_state_unchanged() {
        let mut loadout = sample();
        let before = loadout.clone();
        assert!(loadout.import(b"{\"version\": 1, ").is_err());
        assert_eq!(loadout, before);
    }

    #[test]
    fn unknown_version_leaves_state_unchanged() {
        let mut loadout = sample();
        let before = loadout.clone();
        let outcome = loadout.import(br#"{ "version": 2, "boons": ["x"] }"#).unwrap();
        assert_eq!(outcome, ImportOutcome::UnrecognizedVersion);
        assert_eq!(loadout, before);
    }

    #[test]
    fn blank_and_repeated_combo_ids_are_regenerated() {
        let mut loadout = Loadout::new();
        loadout
            .import(
                br#"{
                    "version": 1,
                    "beaconCombos": [
                        { "id": "same", "name": "A", "beaconIds": ["grey"] },
                        { "id": "same", "name": "B", "beaconIds": ["aqua"] },
                        { "name": "C", "beaconIds": ["blue"] }
                    ]
                }"#,
            )
            .unwrap();
        let combos = loadout.prefs.combos();
        assert_eq!(combos.len(), 3);
        assert_eq!(combos[0].id, "same");
        assert_ne!(combos[1].id, "same");
        assert!(!combos[2].id.is_empty());
        assert_ne!(combos[1].id, combos[2].id);
    }

    #[test]
    fn view_skips_unknown_ids_and_keeps_ranks() {
        let catalog = Catalog::default_catalog();
        let mut loadout = Loadout::new();
        for id in ["looter", "retired_boon", "hp_regen"] {
            loadout.selections.toggle(SelectionKind::Boon, id);
        }
        let view = LoadoutView::new(&loadout, catalog, &RunRules::default());
        let ranked: Vec<_> = view
            .boons
            .iter()
            .map(|r| (r.rank, r.record.id.as_str()))
            .collect();
        assert_eq!(ranked, vec![(1, "looter"), (3, "hp_regen")]);
        assert!(view.mission_warning.is_none());
    }

    #[test]
    fn overview_stats_follow_catalog_order() {
        let catalog = Catalog::default_catalog();
        let mut prefs = PreferenceStore::new();
        prefs.toggle_stat("walk_speed");
        prefs.toggle_stat("strength");
        prefs.toggle_stat("not_a_stat");
        let stats = overview_stats(&prefs, &catalog.stats);
        let ids: Vec<_> = stats.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["strength", "walk_speed"]);
    }
}
