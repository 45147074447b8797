//! Run rules the planner uses for soft warnings.
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

pub(crate) const DEFAULT_RULES_DATA: &str = include_str!("../assets/data/rules.json");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRules {
    #[serde(default = "RunRules::default_max_missions")]
    pub max_missions: usize,
    #[serde(default = "RunRules::default_max_trials")]
    pub max_trials: usize,
    /// Grey beacons stop offering missions after this challenge.
    #[serde(default = "RunRules::default_mission_cutoff")]
    pub mission_cutoff_challenge: u32,
    #[serde(default = "RunRules::default_trial_start")]
    pub trial_start_challenge: u32,
    #[serde(default = "RunRules::default_trial_cutoff")]
    pub trial_cutoff_challenge: u32,
    #[serde(default = "RunRules::default_base_challenges")]
    pub base_challenges: u32,
    #[serde(default = "RunRules::default_white_beacon_challenges")]
    pub white_beacon_challenges: u32,
    #[serde(default = "RunRules::default_beacon_choices")]
    pub default_beacon_choices: u32,
    #[serde(default = "RunRules::default_optimal_curse_count")]
    pub optimal_curse_count: u32,
}

impl RunRules {
    const fn default_max_missions() -> usize {
        4
    }

    const fn default_max_trials() -> usize {
        2
    }

    const fn default_mission_cutoff() -> u32 {
        30
    }

    const fn default_trial_start() -> u32 {
        20
    }

    const fn default_trial_cutoff() -> u32 {
        50
    }

    const fn default_base_challenges() -> u32 {
        10
    }

    const fn default_white_beacon_challenges() -> u32 {
        15
    }

    const fn default_beacon_choices() -> u32 {
        2
    }

    const fn default_optimal_curse_count() -> u32 {
        8
    }

    #[must_use]
    pub fn load_from_static() -> Self {
        serde_json::from_str(DEFAULT_RULES_DATA).unwrap_or_default()
    }

    #[must_use]
    pub fn default_rules() -> &'static Self {
        static RULES: OnceLock<RunRules> = OnceLock::new();
        RULES.get_or_init(Self::load_from_static)
    }

    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into run rules.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Default for RunRules {
    fn default() -> Self {
        Self {
            max_missions: Self::default_max_missions(),
            max_trials: Self::default_max_trials(),
            mission_cutoff_challenge: Self::default_mission_cutoff(),
            trial_start_challenge: Self::default_trial_start(),
            trial_cutoff_challenge: Self::default_trial_cutoff(),
            base_challenges: Self::default_base_challenges(),
            white_beacon_challenges: Self::default_white_beacon_challenges(),
            default_beacon_choices: Self::default_beacon_choices(),
            optimal_curse_count: Self::default_optimal_curse_count(),
        }
    }
}
