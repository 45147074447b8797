//! Derived views over catalog tables.
//!
//! A view is a pure function of a table and the active selectors. Records pass
//! when they satisfy every active dimension, and the table's order is kept.
use std::fmt;
use std::str::FromStr;

use crate::catalog::{
    Beacon, BeaconCategory, Boon, BoonCategory, Catalog, Curse, Mission, MissionCombo, Severity,
    Stat, StatCategory, Tier, Trial,
};

/// Selector for a single filter dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterValue<T> {
    All,
    Only(T),
}

impl<T> Default for FilterValue<T> {
    fn default() -> Self {
        Self::All
    }
}

impl<T: PartialEq> FilterValue<T> {
    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// `None` means the record does not have this dimension at all.
    #[must_use]
    pub fn matches(&self, value: Option<&T>) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => value == Some(wanted),
        }
    }

    #[must_use]
    pub fn matches_any(&self, values: &[T]) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => values.contains(wanted),
        }
    }
}

impl<T: FromStr> FromStr for FilterValue<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

impl<T: fmt::Display> fmt::Display for FilterValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(value) => value.fmt(f),
        }
    }
}

impl<T> From<Option<T>> for FilterValue<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::All, Self::Only)
    }
}

/// The dimensions a record can be filtered on.
pub trait Filterable {
    type Category: PartialEq;

    fn category(&self) -> Option<&Self::Category>;

    fn tier(&self) -> Option<&Tier> {
        None
    }

    fn combos(&self) -> &[MissionCombo] {
        &[]
    }
}

impl Filterable for Beacon {
    type Category = BeaconCategory;

    fn category(&self) -> Option<&BeaconCategory> {
        Some(&self.category)
    }
}

impl Filterable for Boon {
    type Category = BoonCategory;

    fn category(&self) -> Option<&BoonCategory> {
        Some(&self.category)
    }
}

impl Filterable for Mission {
    type Category = Tier;

    fn category(&self) -> Option<&Tier> {
        Some(&self.tier)
    }

    fn tier(&self) -> Option<&Tier> {
        Some(&self.tier)
    }

    fn combos(&self) -> &[MissionCombo] {
        &self.combo
    }
}

impl Filterable for Stat {
    type Category = StatCategory;

    fn category(&self) -> Option<&StatCategory> {
        Some(&self.category)
    }
}

impl Filterable for Trial {
    type Category = Tier;

    fn category(&self) -> Option<&Tier> {
        Some(&self.tier)
    }

    fn tier(&self) -> Option<&Tier> {
        Some(&self.tier)
    }
}

impl Filterable for Curse {
    type Category = Severity;

    fn category(&self) -> Option<&Severity> {
        Some(&self.severity)
    }
}

/// Active selectors for one view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordFilter<C> {
    pub category: FilterValue<C>,
    pub tier: FilterValue<Tier>,
    pub combo: FilterValue<MissionCombo>,
}

impl<C> Default for RecordFilter<C> {
    fn default() -> Self {
        Self {
            category: FilterValue::All,
            tier: FilterValue::All,
            combo: FilterValue::All,
        }
    }
}

impl<C: PartialEq> RecordFilter<C> {
    #[must_use]
    pub fn with_tier(mut self, tier: FilterValue<Tier>) -> Self {
        self.tier = tier;
        self
    }

    #[must_use]
    pub fn with_combo(mut self, combo: FilterValue<MissionCombo>) -> Self {
        self.combo = combo;
        self
    }

    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        self.category.is_all() && self.tier.is_all() && self.combo.is_all()
    }

    pub fn accepts<R>(&self, record: &R) -> bool
    where
        R: Filterable<Category = C>,
    {
        self.category.matches(record.category())
            && self.tier.matches(record.tier())
            && self.combo.matches_any(record.combos())
    }
}

/// Records of `records` accepted by `filter`, in source order.
pub fn visible<'a, R, I>(records: I, filter: &RecordFilter<R::Category>) -> Vec<&'a R>
where
    R: Filterable + 'a,
    I: IntoIterator<Item = &'a R>,
{
    records
        .into_iter()
        .filter(|record| filter.accepts(*record))
        .collect()
}

/// The selectors each catalog view currently has active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewFilters {
    pub boon_category: FilterValue<BoonCategory>,
    pub beacon_category: FilterValue<BeaconCategory>,
    pub mission_tier: FilterValue<Tier>,
    pub mission_combo: FilterValue<MissionCombo>,
    pub stat_category: FilterValue<StatCategory>,
    pub trial_tier: FilterValue<Tier>,
    pub curse_severity: FilterValue<Severity>,
}

impl ViewFilters {
    #[must_use]
    pub fn boons<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Boon> {
        let filter = RecordFilter {
            category: self.boon_category,
            ..RecordFilter::default()
        };
        visible(&catalog.boons, &filter)
    }

    #[must_use]
    pub fn beacons<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Beacon> {
        let filter = RecordFilter {
            category: self.beacon_category,
            ..RecordFilter::default()
        };
        visible(&catalog.beacons, &filter)
    }

    #[must_use]
    pub fn missions<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Mission> {
        let filter = RecordFilter::<Tier>::default()
            .with_tier(self.mission_tier)
            .with_combo(self.mission_combo);
        visible(&catalog.missions, &filter)
    }

    #[must_use]
    pub fn stats<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Stat> {
        let filter = RecordFilter {
            category: self.stat_category,
            ..RecordFilter::default()
        };
        visible(&catalog.stats, &filter)
    }

    #[must_use]
    pub fn trials<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Trial> {
        let filter = RecordFilter::<Tier>::default().with_tier(self.trial_tier);
        visible(&catalog.trials, &filter)
    }

    #[must_use]
    pub fn curses<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Curse> {
        let filter = RecordFilter {
            category: self.curse_severity,
            ..RecordFilter::default()
        };
        visible(&catalog.curses, &filter)
    }
}
