//! Auxiliary user preferences: the stat overview set and named beacon combos.
//!
//! Every operation here is total. Input that cannot be applied (blank names,
//! empty beacon lists, unknown ids, out-of-range moves) leaves the store as it
//! was and is reported through the return value only.
use chrono::Utc;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

const COMBO_ID_PREFIX: &str = "combo";
const COMBO_SUFFIX_LEN: usize = 5;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// A user-named, ordered group of beacon ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeaconCombo {
    pub id: String,
    pub name: String,
    pub beacon_ids: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveDirection {
    Up,
    Down,
}

impl MoveDirection {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

impl fmt::Display for MoveDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MoveDirection {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            _ => Err(()),
        }
    }
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

fn random_suffix<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..COMBO_SUFFIX_LEN)
        .map(|_| char::from(BASE36[rng.gen_range(0..BASE36.len())]))
        .collect()
}

/// Timestamp plus random suffix, retried while `taken` reports a clash.
pub(crate) fn fresh_combo_id<R, F>(rng: &mut R, taken: F) -> String
where
    R: Rng + ?Sized,
    F: Fn(&str) -> bool,
{
    let millis = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
    let stamp = to_base36(millis);
    loop {
        let id = format!("{COMBO_ID_PREFIX}-{stamp}{}", random_suffix(rng));
        if !taken(&id) {
            return id;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferenceStore {
    stats_in_overview: BTreeSet<String>,
    combos: Vec<BeaconCombo>,
}

impl PreferenceStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // Stat overview set

    /// Returns `true` when `id` is in the overview afterwards.
    pub fn toggle_stat(&mut self, id: &str) -> bool {
        let added = if self.stats_in_overview.remove(id) {
            false
        } else {
            self.stats_in_overview.insert(id.to_string())
        };
        log::debug!(
            "stat `{id}` {} overview",
            if added { "added to" } else { "removed from" }
        );
        added
    }

    #[must_use]
    pub fn is_stat_in_overview(&self, id: &str) -> bool {
        self.stats_in_overview.contains(id)
    }

    /// Sorted by id.
    pub fn stats_in_overview(&self) -> impl Iterator<Item = &str> {
        self.stats_in_overview.iter().map(String::as_str)
    }

    #[must_use]
    pub fn stat_count(&self) -> usize {
        self.stats_in_overview.len()
    }

    pub fn replace_stats<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stats_in_overview = ids.into_iter().map(Into::into).collect();
    }

    // Beacon combos

    #[must_use]
    pub fn combos(&self) -> &[BeaconCombo] {
        &self.combos
    }

    #[must_use]
    pub fn combo(&self, id: &str) -> Option<&BeaconCombo> {
        self.combos.iter().find(|combo| combo.id == id)
    }

    /// Snapshot `beacon_ids` under a fresh id.
    ///
    /// Returns `None` without touching the store when the trimmed name is
    /// empty or no beacons are given.
    pub fn create_combo(&mut self, name: &str, beacon_ids: &[String]) -> Option<&BeaconCombo> {
        let mut rng = SmallRng::from_entropy();
        self.create_combo_with_rng(&mut rng, name, beacon_ids)
    }

    /// [`Self::create_combo`] with a caller-supplied id source.
    pub fn create_combo_with_rng<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        name: &str,
        beacon_ids: &[String],
    ) -> Option<&BeaconCombo> {
        let name = name.trim();
        if name.is_empty() || beacon_ids.is_empty() {
            log::debug!("ignoring combo with blank name or no beacons");
            return None;
        }
        let id = fresh_combo_id(rng, |id| self.combo(id).is_some());
        log::debug!("created combo `{id}` ({name})");
        self.combos.push(BeaconCombo {
            id,
            name: name.to_string(),
            beacon_ids: beacon_ids.to_vec(),
        });
        self.combos.last()
    }

    /// Replace the name only. Blank names and unknown ids are ignored.
    pub fn rename_combo(&mut self, id: &str, new_name: &str) -> bool {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return false;
        }
        match self.combos.iter_mut().find(|combo| combo.id == id) {
            Some(combo) => {
                combo.name = new_name.to_string();
                true
            }
            None => false,
        }
    }

    pub fn delete_combo(&mut self, id: &str) -> bool {
        let before = self.combos.len();
        self.combos.retain(|combo| combo.id != id);
        before != self.combos.len()
    }

    /// Swap the combo at `index` with its neighbour in `direction`.
    pub fn move_combo(&mut self, index: usize, direction: MoveDirection) -> bool {
        let target = match direction {
            MoveDirection::Up => index.checked_sub(1),
            MoveDirection::Down => index.checked_add(1),
        };
        match target {
            Some(target) if index < self.combos.len() && target < self.combos.len() => {
                self.combos.swap(index, target);
                true
            }
            _ => false,
        }
    }

    /// Install combos as given; ids are trusted.
    pub fn replace_combos(&mut self, combos: Vec<BeaconCombo>) {
        self.combos = combos;
    }

    pub fn reset(&mut self) {
        self.stats_in_overview.clear();
        self.combos.clear();
    }
}
