use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::errors::{ScoringError, ScoringResult};

/// Placements every finalized distribution must cover.
pub const RECOGNIZED_PLACEMENTS: RangeInclusive<u32> = 1..=5;

/// Share of `max_points` awarded per recognized placement, in tenths.
const PLACEMENT_TENTHS: [(u32, u64); 5] = [(1, 10), (2, 8), (3, 6), (4, 4), (5, 2)];

/// Distribution as it arrives from stored JSON: string keys, loosely typed values.
pub type RawDistribution = BTreeMap<String, Value>;

/// Placement rank -> points awarded for that rank.
///
/// Keys are ordered, so iteration always goes 1st, 2nd, ... and any
/// extended placements (6th and beyond) come last.
///
/// Deserializes from the raw legacy shape (`{"1": "100", "2": 80.0}`) and
/// always serializes back with integer values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDistribution", into = "BTreeMap<u32, u32>")]
pub struct Distribution(BTreeMap<u32, u32>);

impl Distribution {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn get(&self, placement: u32) -> Option<u32> {
        self.0.get(&placement).copied()
    }

    /// Set the points for a placement, returning the previous value.
    pub fn insert(&mut self, placement: u32, points: u32) -> Option<u32> {
        self.0.insert(placement, points)
    }

    pub fn contains(&self, placement: u32) -> bool {
        self.0.contains_key(&placement)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    /// Recognized placements with no entry yet.
    pub fn missing_placements(&self) -> Vec<u32> {
        RECOGNIZED_PLACEMENTS
            .filter(|p| !self.0.contains_key(p))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_placements().is_empty()
    }

    pub fn max_points(&self) -> Option<u32> {
        self.0.values().copied().max()
    }

    /// Backfill missing recognized placements from the default formula.
    ///
    /// Existing entries win, including manual overrides that disagree with
    /// the formula. Returns the placements that were filled in.
    pub fn backfill(&mut self, max_points: u32) -> ScoringResult<Vec<u32>> {
        let defaults = default_distribution(max_points)?;
        let missing = self.missing_placements();
        for placement in &missing {
            if let Some(points) = defaults.get(*placement) {
                self.0.insert(*placement, points);
            }
        }
        if !missing.is_empty() {
            debug!(?missing, max_points, "Backfilled points distribution");
        }
        Ok(missing)
    }

    /// Normalized copy of this distribution. See [`normalize_distribution`].
    pub fn normalized(&self, max_points: u32) -> ScoringResult<Distribution> {
        if self.is_empty() {
            return default_distribution(max_points);
        }
        let mut repaired = self.clone();
        repaired.backfill(max_points)?;
        Ok(repaired)
    }
}

impl FromIterator<(u32, u32)> for Distribution {
    fn from_iter<I: IntoIterator<Item = (u32, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl TryFrom<RawDistribution> for Distribution {
    type Error = ScoringError;

    fn try_from(raw: RawDistribution) -> ScoringResult<Self> {
        coerce_distribution(&raw)
    }
}

impl From<Distribution> for BTreeMap<u32, u32> {
    fn from(distribution: Distribution) -> Self {
        distribution.0
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// Default placement -> points mapping for an activity.
///
/// 1st gets `max_points`, 2nd through 5th get 80%, 60%, 40% and 20% of it,
/// truncated toward zero. Stored data depends on the truncation, so this
/// must never round.
pub fn default_distribution(max_points: u32) -> ScoringResult<Distribution> {
    if max_points < 1 {
        return Err(ScoringError::InvalidConfiguration(format!(
            "max points must be at least 1, got {}",
            max_points
        )));
    }

    Ok(PLACEMENT_TENTHS
        .iter()
        .map(|(placement, tenths)| (*placement, (max_points as u64 * tenths / 10) as u32))
        .collect())
}

/// Coerce a raw stored distribution to integer keys and values without
/// backfilling anything.
pub fn coerce_distribution(raw: &RawDistribution) -> ScoringResult<Distribution> {
    let mut distribution = Distribution::new();
    for (key, value) in raw {
        let placement = coerce_placement(key)?;
        let points = coerce_points(placement, value)?;
        distribution.insert(placement, points);
    }
    Ok(distribution)
}

/// Coerce a raw distribution and backfill every recognized placement it lacks.
///
/// An empty input yields the default distribution. Explicit entries are
/// kept as-is and extended placements above 5th pass through untouched.
/// Applying this to its own output returns the same distribution.
pub fn normalize_distribution(current: &RawDistribution, max_points: u32) -> ScoringResult<Distribution> {
    coerce_distribution(current)?.normalized(max_points)
}

fn coerce_placement(key: &str) -> ScoringResult<u32> {
    let parsed: i64 = key.trim().parse().map_err(|_| {
        ScoringError::InvalidConfiguration(format!("placement key '{}' is not an integer", key))
    })?;
    if parsed < 1 || parsed > u32::MAX as i64 {
        return Err(ScoringError::InvalidConfiguration(format!(
            "placement key {} must be a rank of 1 or more",
            parsed
        )));
    }
    Ok(parsed as u32)
}

fn coerce_points(placement: u32, value: &Value) -> ScoringResult<u32> {
    let invalid = |why: &str| {
        ScoringError::InvalidConfiguration(format!(
            "points for placement {} {}: {}",
            placement, why, value
        ))
    };

    let points: i64 = match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i
            } else if let Some(f) = n.as_f64() {
                if !f.is_finite() || f > u32::MAX as f64 {
                    return Err(invalid("out of range"));
                }
                f.trunc() as i64
            } else {
                return Err(invalid("out of range"));
            }
        }
        Value::String(s) => s.trim().parse().map_err(|_| invalid("is not an integer"))?,
        _ => return Err(invalid("is not an integer")),
    };

    if points < 0 {
        return Err(invalid("must be non-negative"));
    }
    u32::try_from(points).map_err(|_| invalid("out of range"))
}
