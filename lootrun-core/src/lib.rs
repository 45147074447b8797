//! Lootrun Planner
//!
//! Platform-agnostic core for planning lootruns: reference catalogs, ordered
//! selections, beacon combos, filtered views and the versioned save format.
//! Nothing here performs I/O; front ends supply catalog and storage backends.

pub mod catalog;
pub mod filter;
pub mod focus;
pub mod loadout;
pub mod prefs;
pub mod rules;
pub mod save;
pub mod selection;

// Re-export commonly used types
pub use catalog::{
    Beacon, BeaconCategory, Boon, BoonCategory, BoonKind, Camp, Catalog, CatalogError,
    CatalogRecord, CatalogSources, CategoryInfo, Challenge, ChallengeMilestone, ChallengeReward,
    ChallengeScaling, Curse, CurseSource, CurseStrategy, EndRewards, Mission, MissionCombo,
    MissionComboInfo, Priority, RewardSource, Severity, Stat, StatCategory, Table, Tier, Trial,
};
pub use filter::{FilterValue, Filterable, RecordFilter, ViewFilters, visible};
pub use focus::{FocusPreset, FocusPresets};
pub use loadout::{Loadout, LoadoutView, Ranked, overview_stats, resolve_combo, resolve_selection};
pub use prefs::{BeaconCombo, MoveDirection, PreferenceStore};
pub use rules::RunRules;
pub use save::{
    ImportError, ImportOutcome, SAVE_VERSION, SaveDocument, export_file_name, format_timestamp,
};
pub use selection::{MissionOverflow, SelectionKind, SelectionList, SelectionStore};

/// Trait for abstracting where reference data comes from
pub trait CatalogSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load every reference table.
    ///
    /// # Errors
    ///
    /// Returns an error if a table cannot be loaded or fails validation.
    fn load_catalog(&self) -> Result<Catalog, Self::Error>;

    /// Load a named configuration document (`rules`, `focus`).
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or parsed.
    fn load_config<T>(&self, config_name: &str) -> Result<T, Self::Error>
    where
        T: serde::de::DeserializeOwned;
}

/// Trait for abstracting save/load of the working loadout
pub trait LoadoutStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persist a save document under `slot`.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be written.
    fn save_document(&self, slot: &str, document: &SaveDocument) -> Result<(), Self::Error>;

    /// Raw bytes stored under `slot`, `None` if nothing was saved there.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot exists but cannot be read.
    fn load_bytes(&self, slot: &str) -> Result<Option<Vec<u8>>, Self::Error>;

    /// # Errors
    ///
    /// Returns an error if the slot cannot be removed.
    fn delete_slot(&self, slot: &str) -> Result<(), Self::Error>;
}

/// Reference data compiled into this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedCatalog;

impl CatalogSource for EmbeddedCatalog {
    type Error = CatalogError;

    fn load_catalog(&self) -> Result<Catalog, Self::Error> {
        Catalog::from_sources(&CatalogSources::embedded())
    }

    fn load_config<T>(&self, config_name: &str) -> Result<T, Self::Error>
    where
        T: serde::de::DeserializeOwned,
    {
        match config_name {
            "rules" => catalog::parse("rules", rules::DEFAULT_RULES_DATA),
            "focus" => catalog::parse("focus", focus::DEFAULT_FOCUS_DATA),
            other => Err(CatalogError::UnknownConfig(other.to_string())),
        }
    }
}

/// Loaded reference data plus the storage backend for loadouts
pub struct Planner<S>
where
    S: LoadoutStorage,
{
    catalog: Catalog,
    rules: RunRules,
    presets: FocusPresets,
    storage: S,
}

impl<S> Planner<S>
where
    S: LoadoutStorage,
{
    /// Load catalogs and configs from `source`.
    ///
    /// # Errors
    ///
    /// Returns an error if any catalog or config cannot be loaded.
    pub fn new<C: CatalogSource>(source: &C, storage: S) -> Result<Self, C::Error> {
        Ok(Self {
            catalog: source.load_catalog()?,
            rules: source.load_config("rules")?,
            presets: source.load_config("focus")?,
            storage,
        })
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn rules(&self) -> &RunRules {
        &self.rules
    }

    #[must_use]
    pub const fn presets(&self) -> &FocusPresets {
        &self.presets
    }

    #[must_use]
    pub fn view<'a>(&'a self, loadout: &'a Loadout) -> LoadoutView<'a> {
        LoadoutView::new(loadout, &self.catalog, &self.rules)
    }

    /// Replace the loadout's selections with a preset's picks.
    /// Returns `false` if no preset has that id.
    pub fn apply_focus(&self, loadout: &mut Loadout, preset_id: &str) -> bool {
        self.presets.get_by_id(preset_id).is_some_and(|preset| {
            loadout.selections.apply_focus(preset);
            true
        })
    }

    /// Save a loadout
    ///
    /// # Errors
    ///
    /// Returns an error if the loadout cannot be saved.
    pub fn save_loadout(&self, slot: &str, loadout: &Loadout) -> Result<(), S::Error> {
        self.storage.save_document(slot, &loadout.export())
    }

    /// Load a loadout. An empty slot yields `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot cannot be read, is not a save document,
    /// or carries a version this build does not read.
    pub fn load_loadout(&self, slot: &str) -> Result<Option<Loadout>, anyhow::Error>
    where
        S::Error: Into<anyhow::Error>,
    {
        let Some(bytes) = self.storage.load_bytes(slot).map_err(Into::into)? else {
            return Ok(None);
        };
        let mut loadout = Loadout::new();
        match loadout.import(&bytes)? {
            ImportOutcome::Applied => Ok(Some(loadout)),
            ImportOutcome::UnrecognizedVersion => {
                anyhow::bail!("`{slot}` has an unrecognized save version")
            }
        }
    }

    /// Delete a saved loadout
    ///
    /// # Errors
    ///
    /// Returns an error if the slot cannot be removed.
    pub fn delete_loadout(&self, slot: &str) -> Result<(), S::Error> {
        self.storage.delete_slot(slot)
    }
}
