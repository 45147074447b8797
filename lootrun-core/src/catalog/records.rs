//! Typed reference records.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::keys::{
    BeaconCategory, BoonCategory, BoonKind, MissionCombo, Priority, Severity, StatCategory, Tier,
};

/// Mission combo tags. No mission belongs to more than the three known groups.
pub type MissionComboSet = SmallVec<[MissionCombo; 3]>;

/// Shape every catalog record exposes to the store and the projector.
pub trait CatalogRecord {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    /// Wire key of the record's category.
    fn category_key(&self) -> &'static str;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beacon {
    pub id: String,
    pub name: String,
    pub color: String,
    pub emoji: String,
    pub effect: String,
    pub description: String,
    #[serde(default)]
    pub tips: Vec<String>,
    pub category: BeaconCategory,
    #[serde(default)]
    pub added_in_version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boon {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: BoonKind,
    pub category: BoonCategory,
    pub effect: String,
    pub description: String,
    #[serde(default)]
    pub stackable: bool,
    pub priority: Priority,
    #[serde(default)]
    pub max_value: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mission {
    pub id: String,
    pub name: String,
    pub tier: Tier,
    #[serde(default)]
    pub combo: MissionComboSet,
    pub effect: String,
    pub description: String,
    #[serde(default)]
    pub objective: String,
    #[serde(default)]
    pub tips: Vec<String>,
}

impl Mission {
    #[must_use]
    pub fn in_combo(&self, combo: MissionCombo) -> bool {
        self.combo.contains(&combo)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    pub id: String,
    pub name: String,
    pub category: StatCategory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trial {
    pub id: String,
    pub name: String,
    pub tier: Tier,
    pub effect: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub restrictions: Option<String>,
    #[serde(default)]
    pub rewards: Option<String>,
    #[serde(default)]
    pub tips: Vec<String>,
    #[serde(default)]
    pub added_in_version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Camp {
    pub id: String,
    pub name: String,
    pub short_name: String,
    pub region: String,
    pub location: String,
    pub description: String,
    pub difficulty: String,
    pub terrain: String,
    pub nearest_city: String,
    #[serde(default)]
    pub tips: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Curse {
    pub id: String,
    pub name: String,
    pub stat: String,
    pub description: String,
    #[serde(default)]
    pub stacks_with: String,
    pub severity: Severity,
}

/// Where curses come from and what each source pays out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurseSource {
    pub id: String,
    pub name: String,
    pub curses_applied: u32,
    pub reward: String,
}

/// A way of playing around curses. `boon_ids` and `mission_ids` name catalog records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurseStrategy {
    pub id: String,
    pub name: String,
    pub description: String,
    pub optimal_curse_count: u32,
    #[serde(default)]
    pub boon_ids: Vec<String>,
    #[serde(default)]
    pub mission_ids: Vec<String>,
    #[serde(default)]
    pub tips: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: String,
    pub name: String,
    pub description: String,
    pub objective: String,
    #[serde(default)]
    pub tips: Vec<String>,
}

/// How mobs grow stronger from one challenge to the next.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChallengeScaling {
    pub description: String,
    pub exception: String,
    pub scaling_stats: Vec<String>,
    pub curse_interaction: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeMilestone {
    pub challenge: u32,
    pub event: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeReward {
    pub id: String,
    pub name: String,
    pub description: String,
    pub frequency: String,
    #[serde(default)]
    pub affected_by: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardSource {
    pub description: String,
    pub sources: Vec<String>,
}

/// Ways to improve the end reward chest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndRewards {
    pub pulls: RewardSource,
    pub rerolls: RewardSource,
    pub sacrifices: RewardSource,
}

/// Label and blurb for one value of a category vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInfo<C> {
    pub id: C,
    pub label: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Static grouping of missions that play well together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionComboInfo {
    pub id: MissionCombo,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub core_missions: Vec<String>,
    #[serde(default)]
    pub complementary_missions: Vec<String>,
    #[serde(default)]
    pub tips: Vec<String>,
}

macro_rules! impl_record {
    ($ty:ty, |$rec:ident| $category:expr) => {
        impl CatalogRecord for $ty {
            fn id(&self) -> &str {
                &self.id
            }

            fn name(&self) -> &str {
                &self.name
            }

            fn category_key(&self) -> &'static str {
                let $rec = self;
                $category
            }
        }
    };
}

impl_record!(Beacon, |b| b.category.as_str());
impl_record!(Boon, |b| b.category.as_str());
impl_record!(Mission, |m| m.tier.as_str());
impl_record!(Stat, |s| s.category.as_str());
impl_record!(Trial, |t| t.tier.as_str());
impl_record!(Camp, |_c| "camp");
impl_record!(Curse, |c| c.severity.as_str());
impl_record!(Challenge, |_c| "challenge");
