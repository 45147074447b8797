//! Closed vocabularies used by the catalog records.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! keyed_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $key:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $key)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $key,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ();

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($key => Ok(Self::$variant),)+
                    _ => Err(()),
                }
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.as_str().to_string()
            }
        }
    };
}

keyed_enum! {
    /// What a beacon does for the run.
    BeaconCategory {
        Reward => "reward",
        Utility => "utility",
        Loot => "loot",
        Challenge => "challenge",
        RiskReward => "risk-reward",
        Modifier => "modifier",
        Extension => "extension",
        Mission => "mission",
        Trial => "trial",
    }
}

keyed_enum! {
    /// Dynamic boons keep ticking; static boons apply once.
    BoonKind {
        Dynamic => "dynamic",
        Static => "static",
    }
}

keyed_enum! {
    BoonCategory {
        Loot => "loot",
        Combat => "combat",
        Survivability => "survivability",
        Mana => "mana",
        Mobility => "mobility",
        Debuff => "debuff",
        SkillPoints => "skill_points",
        Static => "static",
    }
}

keyed_enum! {
    /// Community pick priority for a boon.
    Priority {
        Highest => "highest",
        High => "high",
        Medium => "medium",
        Low => "low",
    }
}

keyed_enum! {
    /// Tier list grade shared by missions and trials.
    Tier {
        S => "S",
        A => "A",
        B => "B",
        C => "C",
    }
}

keyed_enum! {
    /// Static mission grouping a record belongs to.
    MissionCombo {
        FlyingChests => "flying_chests",
        CurseStacking => "curse_stacking",
        BeaconReroll => "beacon_reroll",
    }
}

keyed_enum! {
    StatCategory {
        SkillPoints => "skill_points",
        Attack => "attack",
        HealthAndMana => "health_and_mana",
        ElementalDefence => "elemental_defence",
        PassiveDamage => "passive_damage",
        Movement => "movement",
        XpAndGathering => "xp_and_gathering",
        SpellCost => "spell_cost",
    }
}

keyed_enum! {
    Severity {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
}
