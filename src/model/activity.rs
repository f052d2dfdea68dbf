use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::scoring::{Distribution, ScoringError, ScoringResult};

pub const DEFAULT_MAX_POINTS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Sports,
    Esport,
    Academics,
    Arts,
    Other,
}

impl ActivityType {
    pub fn label(&self) -> &'static str {
        match self {
            ActivityType::Sports => "Sports",
            ActivityType::Esport => "Esports",
            ActivityType::Academics => "Academics",
            ActivityType::Arts => "Arts",
            ActivityType::Other => "Other",
        }
    }

    /// Badge color used when listing activities.
    pub fn color(&self) -> &'static str {
        match self {
            ActivityType::Sports => "red",
            ActivityType::Academics => "blue",
            ActivityType::Arts => "yellow",
            ActivityType::Other => "green",
            ActivityType::Esport => "gray",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    #[default]
    Draft,
    Scheduled,
    Ongoing,
    Completed,
    Cancelled,
}

impl ActivityStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ActivityStatus::Completed | ActivityStatus::Cancelled)
    }

    /// Whether moving to `next` follows draft -> scheduled -> ongoing -> completed,
    /// with cancellation allowed from any non-terminal state.
    ///
    /// Advisory only: [`Activity::set_status`] accepts any value.
    pub fn can_transition_to(&self, next: ActivityStatus) -> bool {
        use ActivityStatus::*;
        if *self == next {
            return true;
        }
        match (self, next) {
            (_, Cancelled) => !self.is_terminal(),
            (Draft, Scheduled) | (Scheduled, Ongoing) | (Ongoing, Completed) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActivityStatus::Draft => "draft",
            ActivityStatus::Scheduled => "scheduled",
            ActivityStatus::Ongoing => "ongoing",
            ActivityStatus::Completed => "completed",
            ActivityStatus::Cancelled => "cancelled",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseCupYear {
    pub id: u64,
    pub year: NaiveDate,
    pub season: u16,
}

impl fmt::Display for HouseCupYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - Season {}", self.year, self.season)
    }
}

/// One scoreable event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: u64,
    pub name: String,
    pub activity_type: ActivityType,
    pub house_cup_year: u64,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub organizer: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_max_points")]
    pub max_points: u32,
    /// May be partial or empty until repaired; see [`Activity::repair_distribution`].
    #[serde(default)]
    pub points_distribution: Distribution,
    #[serde(default)]
    pub status: ActivityStatus,
}

fn default_max_points() -> u32 {
    DEFAULT_MAX_POINTS
}

impl Activity {
    pub fn new(
        id: u64,
        name: impl Into<String>,
        activity_type: ActivityType,
        house_cup_year: u64,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            activity_type,
            house_cup_year,
            date,
            location: String::new(),
            organizer: String::new(),
            description: String::new(),
            max_points: DEFAULT_MAX_POINTS,
            points_distribution: Distribution::new(),
            status: ActivityStatus::default(),
        }
    }

    pub fn validate(&self) -> ScoringResult<()> {
        if self.max_points < 1 {
            return Err(ScoringError::InvalidConfiguration(format!(
                "activity '{}': max points must be at least 1",
                self.name
            )));
        }
        Ok(())
    }

    /// Normalize the stored distribution in place.
    ///
    /// Returns the placements that were backfilled; empty when the
    /// distribution was already complete.
    pub fn repair_distribution(&mut self) -> ScoringResult<Vec<u32>> {
        self.validate()?;
        let repaired = self.points_distribution.normalized(self.max_points)?;
        let filled: Vec<u32> = repaired
            .iter()
            .map(|(placement, _)| placement)
            .filter(|p| !self.points_distribution.contains(*p))
            .collect();
        self.points_distribution = repaired;
        Ok(filled)
    }

    /// Change the activity's point pool and re-derive missing placements.
    ///
    /// Entries already present keep their values.
    pub fn set_max_points(&mut self, max_points: u32) -> ScoringResult<Vec<u32>> {
        let previous = self.max_points;
        self.max_points = max_points;
        if let Err(e) = self.validate() {
            self.max_points = previous;
            return Err(e);
        }
        self.repair_distribution()
    }

    /// Not validated against [`ActivityStatus::can_transition_to`].
    pub fn set_status(&mut self, status: ActivityStatus) {
        self.status = status;
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.activity_type.label())
    }
}
