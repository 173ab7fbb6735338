//! In-memory group-by-count aggregations over a sightings snapshot.
//!
//! Every function here is pure: the same snapshot always produces the same
//! output, and nothing is cached between calls.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::models::chart::{GeoPoint, LabelCount};
use crate::models::sighting::{Sighting, Snapshot};

/// Default number of bars kept in the most-frequent-names chart.
pub const DEFAULT_TOP_N: usize = 25;

/// Column a label count groups on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    Name,
    PrimaryType,
    SecondaryType,
}

impl GroupKey {
    fn extract<'a>(&self, sighting: &'a Sighting) -> Option<&'a str> {
        match self {
            GroupKey::Name => Some(sighting.name.as_str()),
            GroupKey::PrimaryType => Some(sighting.primary_type.as_str()),
            GroupKey::SecondaryType => sighting.secondary(),
        }
    }
}

/// Post-processing applied after grouping. Missing values never become a
/// label, so there is no marker to filter here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountPolicy {
    /// Keep only the N most frequent labels.
    pub top_n: Option<usize>,
    /// Display labels as "First letter upper, rest lower".
    pub capitalize: bool,
}

impl CountPolicy {
    pub fn top(n: usize) -> Self {
        Self {
            top_n: Some(n),
            capitalize: true,
        }
    }

    pub fn all() -> Self {
        Self {
            top_n: None,
            capitalize: true,
        }
    }
}

/// Uppercase the first character and lowercase the rest.
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Group the snapshot by `key`, count occurrences and sort ascending by
/// count (ties by label). With `top_n` set, the last N entries are kept,
/// which are the N most frequent.
pub fn count_by(snapshot: &Snapshot, key: GroupKey, policy: &CountPolicy) -> Vec<LabelCount> {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for sighting in &snapshot.sightings {
        let Some(value) = key.extract(sighting) else {
            continue;
        };
        let label = if policy.capitalize {
            capitalize(value)
        } else {
            value.to_string()
        };
        *counts.entry(label).or_insert(0) += 1;
    }

    let mut entries: Vec<LabelCount> = counts
        .into_iter()
        .map(|(label, count)| LabelCount { label, count })
        .collect();
    // BTreeMap iteration is label-ordered and the sort is stable, so ties
    // stay alphabetical.
    entries.sort_by_key(|e| e.count);

    if let Some(n) = policy.top_n {
        let excess = entries.len().saturating_sub(n);
        entries.drain(..excess);
    }
    entries
}

/// Number of rows whose grouped value was missing and therefore skipped.
pub fn missing_count(snapshot: &Snapshot, key: GroupKey) -> usize {
    snapshot
        .sightings
        .iter()
        .filter(|s| key.extract(s).is_none())
        .count()
}

/// The 25 (or `n`) most frequent Pokémon names.
pub fn top_names(snapshot: &Snapshot, n: usize) -> Vec<LabelCount> {
    count_by(snapshot, GroupKey::Name, &CountPolicy::top(n))
}

pub fn primary_types(snapshot: &Snapshot) -> Vec<LabelCount> {
    count_by(snapshot, GroupKey::PrimaryType, &CountPolicy::all())
}

/// Secondary types, excluding sightings without one.
pub fn secondary_types(snapshot: &Snapshot) -> Vec<LabelCount> {
    count_by(snapshot, GroupKey::SecondaryType, &CountPolicy::all())
}

pub fn total_count(snapshot: &Snapshot) -> u64 {
    snapshot.len() as u64
}

pub fn total_count_sentence(snapshot: &Snapshot) -> String {
    format!("There are {} Pokémon now in the database!", total_count(snapshot))
}

/// Normalize `-0.0` to `0.0` so both land on the same coordinate.
fn coordinate_bits(value: f64) -> u64 {
    if value == 0.0 {
        0.0f64.to_bits()
    } else {
        value.to_bits()
    }
}

/// Count sightings per exact `(lat, long)` pair, ordered by latitude then
/// longitude.
pub fn geo_distribution(snapshot: &Snapshot) -> Vec<GeoPoint> {
    let mut counts: HashMap<(u64, u64), GeoPoint> = HashMap::new();
    for s in &snapshot.sightings {
        counts
            .entry((coordinate_bits(s.lat), coordinate_bits(s.long)))
            .and_modify(|p| p.count += 1)
            .or_insert_with(|| GeoPoint {
                lat: if s.lat == 0.0 { 0.0 } else { s.lat },
                lon: if s.long == 0.0 { 0.0 } else { s.long },
                count: 1,
            });
    }

    let mut points: Vec<GeoPoint> = counts.into_values().collect();
    points.sort_by(|a, b| a.lat.total_cmp(&b.lat).then(a.lon.total_cmp(&b.lon)));
    points
}
