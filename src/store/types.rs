use anyhow::{bail, Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::model::{Activity, House, HouseCupYear, Participant, Participation, Score};
use crate::scoring::{self, ScoreResolution};

pub const DATA_VERSION: u32 = 1;

/// Every record the house cup tracks, as one versioned document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HouseCupData {
    pub version: u32,
    #[serde(default)]
    pub years: Vec<HouseCupYear>,
    #[serde(default)]
    pub houses: Vec<House>,
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub participations: Vec<Participation>,
    #[serde(default)]
    pub scores: Vec<Score>,
}

/// How a score should be set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreInput {
    Placement(u32),
    Points(u32),
}

impl Default for HouseCupData {
    fn default() -> Self {
        Self::new()
    }
}

impl HouseCupData {
    pub fn new() -> Self {
        Self {
            version: DATA_VERSION,
            years: Vec::new(),
            houses: Vec::new(),
            activities: Vec::new(),
            participations: Vec::new(),
            scores: Vec::new(),
        }
    }

    pub fn house(&self, id: u64) -> Option<&House> {
        self.houses.iter().find(|h| h.id == id)
    }

    pub fn activity(&self, id: u64) -> Option<&Activity> {
        self.activities.iter().find(|a| a.id == id)
    }

    fn activity_mut(&mut self, id: u64) -> Result<&mut Activity> {
        self.activities
            .iter_mut()
            .find(|a| a.id == id)
            .with_context(|| format!("Activity {} not found", id))
    }

    pub fn participation_for(&self, activity: u64, house: u64) -> Option<&Participation> {
        self.participations
            .iter()
            .find(|p| p.activity == activity && p.house == house)
    }

    fn participation_for_mut(&mut self, activity: u64, house: u64) -> Result<&mut Participation> {
        self.participations
            .iter_mut()
            .find(|p| p.activity == activity && p.house == house)
            .with_context(|| {
                format!("House {} is not registered for activity {}", house, activity)
            })
    }

    pub fn score_for(&self, activity: u64, house: u64) -> Option<&Score> {
        self.scores
            .iter()
            .find(|s| s.activity == activity && s.house == house)
    }

    pub fn next_activity_id(&self) -> u64 {
        next_id(self.activities.iter().map(|a| a.id))
    }

    /// Register a house. Names must be unique (case-insensitive).
    pub fn add_house(&mut self, name: &str, description: &str) -> Result<u64> {
        let name = name.trim();
        if name.is_empty() {
            bail!("House name must not be empty");
        }
        if self.houses.iter().any(|h| h.name.eq_ignore_ascii_case(name)) {
            bail!("House '{}' already exists", name);
        }
        let id = next_id(self.houses.iter().map(|h| h.id));
        self.houses.push(House {
            id,
            name: name.to_string(),
            description: description.to_string(),
        });
        Ok(id)
    }

    /// Insert or replace an activity, normalizing its distribution first.
    pub fn upsert_activity(&mut self, mut activity: Activity) -> Result<()> {
        activity
            .repair_distribution()
            .with_context(|| format!("Cannot save activity '{}'", activity.name))?;

        match self.activities.iter_mut().find(|a| a.id == activity.id) {
            Some(existing) => *existing = activity,
            None => self.activities.push(activity),
        }
        Ok(())
    }

    /// Repair every activity's distribution. Returns how many changed.
    ///
    /// Running it again right away changes nothing.
    pub fn normalize_all(&mut self) -> Result<usize> {
        let mut fixed = 0;
        for activity in &mut self.activities {
            let filled = activity
                .repair_distribution()
                .with_context(|| format!("Cannot fix activity {} ('{}')", activity.id, activity.name))?;
            if !filled.is_empty() {
                debug!(activity = activity.id, ?filled, "Fixed points distribution");
                fixed += 1;
            }
        }
        info!(fixed, total = self.activities.len(), "Normalized activities");
        Ok(fixed)
    }

    /// Create or update the house's score for an activity.
    ///
    /// The house must already have a participation for the activity. Placed
    /// scores take their points from the (repaired) distribution.
    pub fn record_score(
        &mut self,
        activity_id: u64,
        house_id: u64,
        input: ScoreInput,
        notes: Option<String>,
    ) -> Result<ScoreResolution> {
        if self.house(house_id).is_none() {
            bail!("House {} not found", house_id);
        }
        let participation = self
            .participation_for(activity_id, house_id)
            .map(|p| p.id)
            .with_context(|| {
                format!("House {} is not registered for activity {}", house_id, activity_id)
            })?;

        let new_id = next_id(self.scores.iter().map(|s| s.id));
        let mut score = self
            .score_for(activity_id, house_id)
            .cloned()
            .unwrap_or_else(|| Score::new(new_id, activity_id, house_id, participation));
        score.participation = participation;
        match input {
            ScoreInput::Placement(p) => score.placement = Some(p),
            ScoreInput::Points(points) => {
                score.placement = None;
                score.points_earned = points;
            }
        }
        if let Some(notes) = notes {
            score.notes = notes;
        }

        let activity = self.activity_mut(activity_id)?;
        let resolution = match input {
            // Zero manual points are a legitimate award, so bypass the
            // "zero means unset" rule of `resolve_score`.
            ScoreInput::Points(points) => {
                scoring::check_points_within_max(points, activity.max_points)?;
                ScoreResolution {
                    points,
                    source: scoring::PointsSource::Manual,
                    repaired: Vec::new(),
                }
            }
            ScoreInput::Placement(_) => scoring::resolve_score(&mut score, activity)
                .with_context(|| format!("Cannot score activity '{}'", activity.name))?,
        };
        score.updated_at = Utc::now();

        match self.scores.iter_mut().find(|s| s.id == score.id) {
            Some(existing) => *existing = score,
            None => self.scores.push(score),
        }
        Ok(resolution)
    }

    /// Replace a house's roster for an activity, registering it if needed.
    pub fn import_roster(
        &mut self,
        activity_id: u64,
        house_id: u64,
        participants: Vec<Participant>,
    ) -> Result<&Participation> {
        if self.activity(activity_id).is_none() {
            bail!("Activity {} not found", activity_id);
        }
        if self.house(house_id).is_none() {
            bail!("House {} not found", house_id);
        }
        let captains = participants.iter().filter(|p| p.is_captain()).count();
        if captains > 1 {
            bail!("Roster marks {} captains; a team has at most one", captains);
        }

        let index = match self
            .participations
            .iter()
            .position(|p| p.activity == activity_id && p.house == house_id)
        {
            Some(index) => index,
            None => {
                let id = next_id(self.participations.iter().map(|p| p.id));
                self.participations
                    .push(Participation::new(id, activity_id, house_id));
                self.participations.len() - 1
            }
        };

        let participation = &mut self.participations[index];
        participation.participants = participants;
        Ok(participation)
    }

    pub fn set_captain(&mut self, activity_id: u64, house_id: u64, name: &str) -> Result<()> {
        let participation = self.participation_for_mut(activity_id, house_id)?;
        participation.set_captain(name)?;
        Ok(())
    }

    /// Delete an activity along with its participations and scores.
    pub fn remove_activity(&mut self, activity_id: u64) -> Result<Activity> {
        let index = self
            .activities
            .iter()
            .position(|a| a.id == activity_id)
            .with_context(|| format!("Activity {} not found", activity_id))?;
        let removed = self.activities.remove(index);
        self.participations.retain(|p| p.activity != activity_id);
        self.scores.retain(|s| s.activity != activity_id);
        Ok(removed)
    }
}

fn next_id(ids: impl Iterator<Item = u64>) -> u64 {
    ids.max().unwrap_or(0) + 1
}
