//! Read-only reference catalogs.
//!
//! Every table is parsed once from JSON, checked for duplicate ids, and indexed
//! so lookups by id are constant time. The embedded data ships with the crate;
//! other sources go through [`crate::CatalogSource`].

pub mod keys;
pub mod records;

use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;
use thiserror::Error;

pub use keys::{
    BeaconCategory, BoonCategory, BoonKind, MissionCombo, Priority, Severity, StatCategory, Tier,
};
pub use records::{
    Beacon, Boon, Camp, CatalogRecord, CategoryInfo, Challenge, ChallengeMilestone,
    ChallengeReward, ChallengeScaling, Curse, CurseSource, CurseStrategy, EndRewards, Mission,
    MissionComboInfo, MissionComboSet, RewardSource, Stat, Trial,
};

const DEFAULT_BEACON_DATA: &str = include_str!("../../assets/data/beacons.json");
const DEFAULT_BOON_DATA: &str = include_str!("../../assets/data/boons.json");
const DEFAULT_MISSION_DATA: &str = include_str!("../../assets/data/missions.json");
const DEFAULT_STAT_DATA: &str = include_str!("../../assets/data/stats.json");
const DEFAULT_TRIAL_DATA: &str = include_str!("../../assets/data/trials.json");
const DEFAULT_CAMP_DATA: &str = include_str!("../../assets/data/camps.json");
const DEFAULT_CURSE_DATA: &str = include_str!("../../assets/data/curses.json");
const DEFAULT_CHALLENGE_DATA: &str = include_str!("../../assets/data/challenges.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{catalog} catalog is not valid JSON: {source}")]
    Json {
        catalog: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{catalog} catalog defines id `{id}` more than once")]
    DuplicateId { catalog: &'static str, id: String },
    #[error("no config named `{0}`")]
    UnknownConfig(String),
}

/// Ordered records plus an id index. Source order is authorial and preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<T> {
    records: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: CatalogRecord> Table<T> {
    /// Build a table, rejecting duplicate ids.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateId`] if two records share an id.
    pub fn from_records(catalog: &'static str, records: Vec<T>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(records.len());
        for (pos, record) in records.iter().enumerate() {
            if index.insert(record.id().to_string(), pos).is_some() {
                return Err(CatalogError::DuplicateId {
                    catalog,
                    id: record.id().to_string(),
                });
            }
        }
        Ok(Self { records, index })
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&T> {
        self.index.get(id).and_then(|pos| self.records.get(*pos))
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }
}

impl<T> Table<T> {
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.records.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a, T> IntoIterator for &'a Table<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Raw JSON text for each catalog file.
#[derive(Debug, Clone, Copy)]
pub struct CatalogSources<'a> {
    pub beacons: &'a str,
    pub boons: &'a str,
    pub missions: &'a str,
    pub stats: &'a str,
    pub trials: &'a str,
    pub camps: &'a str,
    pub curses: &'a str,
    pub challenges: &'a str,
}

impl CatalogSources<'static> {
    /// The data compiled into this crate.
    #[must_use]
    pub const fn embedded() -> Self {
        Self {
            beacons: DEFAULT_BEACON_DATA,
            boons: DEFAULT_BOON_DATA,
            missions: DEFAULT_MISSION_DATA,
            stats: DEFAULT_STAT_DATA,
            trials: DEFAULT_TRIAL_DATA,
            camps: DEFAULT_CAMP_DATA,
            curses: DEFAULT_CURSE_DATA,
            challenges: DEFAULT_CHALLENGE_DATA,
        }
    }
}

#[derive(Deserialize)]
struct BeaconFile {
    #[serde(default)]
    beacons: Vec<Beacon>,
}

#[derive(Deserialize)]
struct BoonFile {
    #[serde(default)]
    boons: Vec<Boon>,
    #[serde(default)]
    categories: Vec<CategoryInfo<BoonCategory>>,
}

#[derive(Deserialize)]
struct MissionFile {
    #[serde(default)]
    missions: Vec<Mission>,
    #[serde(default)]
    combos: Vec<MissionComboInfo>,
}

#[derive(Deserialize)]
struct StatFile {
    #[serde(default)]
    stats: Vec<Stat>,
    #[serde(default)]
    categories: Vec<CategoryInfo<StatCategory>>,
}

#[derive(Deserialize)]
struct TrialFile {
    #[serde(default)]
    trials: Vec<Trial>,
}

#[derive(Deserialize)]
struct CampFile {
    #[serde(default)]
    camps: Vec<Camp>,
}

#[derive(Deserialize)]
struct CurseFile {
    #[serde(default)]
    curses: Vec<Curse>,
    #[serde(default)]
    sources: Vec<CurseSource>,
    #[serde(default)]
    strategies: Vec<CurseStrategy>,
}

#[derive(Deserialize)]
struct ChallengeFile {
    #[serde(default)]
    challenges: Vec<Challenge>,
    #[serde(default)]
    scaling: ChallengeScaling,
    #[serde(default)]
    milestones: Vec<ChallengeMilestone>,
    #[serde(default)]
    rewards: Vec<ChallengeReward>,
    #[serde(default)]
    end_rewards: EndRewards,
}

pub(crate) fn parse<T: serde::de::DeserializeOwned>(
    catalog: &'static str,
    json: &str,
) -> Result<T, CatalogError> {
    serde_json::from_str(json).map_err(|source| CatalogError::Json { catalog, source })
}

/// Every reference table the planner knows about.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub beacons: Table<Beacon>,
    pub boons: Table<Boon>,
    pub boon_categories: Vec<CategoryInfo<BoonCategory>>,
    pub missions: Table<Mission>,
    pub mission_combos: Vec<MissionComboInfo>,
    pub stats: Table<Stat>,
    pub stat_categories: Vec<CategoryInfo<StatCategory>>,
    pub trials: Table<Trial>,
    pub camps: Table<Camp>,
    pub curses: Table<Curse>,
    pub curse_sources: Vec<CurseSource>,
    pub curse_strategies: Vec<CurseStrategy>,
    pub challenges: Table<Challenge>,
    pub challenge_scaling: ChallengeScaling,
    /// Sorted by challenge number.
    pub challenge_milestones: Vec<ChallengeMilestone>,
    pub challenge_rewards: Vec<ChallengeReward>,
    pub end_rewards: EndRewards,
}

impl Catalog {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse and index all catalogs.
    ///
    /// # Errors
    ///
    /// Returns an error if any file is malformed or repeats an id.
    pub fn from_sources(sources: &CatalogSources<'_>) -> Result<Self, CatalogError> {
        let beacons: BeaconFile = parse("beacons", sources.beacons)?;
        let boons: BoonFile = parse("boons", sources.boons)?;
        let missions: MissionFile = parse("missions", sources.missions)?;
        let stats: StatFile = parse("stats", sources.stats)?;
        let trials: TrialFile = parse("trials", sources.trials)?;
        let camps: CampFile = parse("camps", sources.camps)?;
        let curses: CurseFile = parse("curses", sources.curses)?;
        let mut challenges: ChallengeFile = parse("challenges", sources.challenges)?;
        challenges.milestones.sort_by_key(|m| m.challenge);

        Ok(Self {
            beacons: Table::from_records("beacons", beacons.beacons)?,
            boons: Table::from_records("boons", boons.boons)?,
            boon_categories: boons.categories,
            missions: Table::from_records("missions", missions.missions)?,
            mission_combos: missions.combos,
            stats: Table::from_records("stats", stats.stats)?,
            stat_categories: stats.categories,
            trials: Table::from_records("trials", trials.trials)?,
            camps: Table::from_records("camps", camps.camps)?,
            curses: Table::from_records("curses", curses.curses)?,
            curse_sources: curses.sources,
            curse_strategies: curses.strategies,
            challenges: Table::from_records("challenges", challenges.challenges)?,
            challenge_scaling: challenges.scaling,
            challenge_milestones: challenges.milestones,
            challenge_rewards: challenges.rewards,
            end_rewards: challenges.end_rewards,
        })
    }

    /// Parse the embedded data, falling back to an empty catalog.
    #[must_use]
    pub fn load_from_static() -> Self {
        Self::from_sources(&CatalogSources::embedded()).unwrap_or_else(|err| {
            log::error!("embedded catalog failed to load: {err}");
            Self::empty()
        })
    }

    #[must_use]
    pub fn default_catalog() -> &'static Self {
        static CATALOG: OnceLock<Catalog> = OnceLock::new();
        CATALOG.get_or_init(Self::load_from_static)
    }

    #[must_use]
    pub fn mission_combo(&self, combo: MissionCombo) -> Option<&MissionComboInfo> {
        self.mission_combos.iter().find(|info| info.id == combo)
    }

    #[must_use]
    pub fn curse_strategy(&self, id: &str) -> Option<&CurseStrategy> {
        self.curse_strategies.iter().find(|strategy| strategy.id == id)
    }

    /// Milestones reached at or before `challenge`.
    pub fn milestones_through(&self, challenge: u32) -> impl Iterator<Item = &ChallengeMilestone> {
        self.challenge_milestones
            .iter()
            .take_while(move |m| m.challenge <= challenge)
    }
}
