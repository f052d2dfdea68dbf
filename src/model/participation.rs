use serde::{Deserialize, Serialize};

use crate::scoring::{self, ScoringResult};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_captain: Option<bool>,
}

impl Participant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            grade: None,
            is_captain: None,
        }
    }

    pub fn with_grade(mut self, grade: impl Into<String>) -> Self {
        self.grade = Some(grade.into());
        self
    }

    pub fn as_captain(mut self) -> Self {
        self.is_captain = Some(true);
        self
    }

    pub fn is_captain(&self) -> bool {
        self.is_captain.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipationStatus {
    #[default]
    Registered,
    Confirmed,
    Participated,
    Absent,
    Disqualified,
}

/// A house's registered team for one activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participation {
    pub id: u64,
    pub activity: u64,
    pub house: u64,
    #[serde(default)]
    pub status: ParticipationStatus,
    #[serde(default)]
    pub team_name: String,
    #[serde(default)]
    pub participants: Vec<Participant>,
}

impl Participation {
    pub fn new(id: u64, activity: u64, house: u64) -> Self {
        Self {
            id,
            activity,
            house,
            status: ParticipationStatus::default(),
            team_name: String::new(),
            participants: Vec::new(),
        }
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    pub fn captain_name(&self) -> Option<&str> {
        self.participants
            .iter()
            .find(|p| p.is_captain())
            .map(|p| p.name.as_str())
    }

    pub fn participant_names(&self) -> Vec<&str> {
        self.participants.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn captain_count(&self) -> usize {
        self.participants.iter().filter(|p| p.is_captain()).count()
    }

    /// Append a participant. A new captain takes the flag from everyone else.
    pub fn add_participant(&mut self, name: &str, grade: Option<String>, is_captain: bool) {
        let mut participant = Participant::new(name.trim());
        participant.grade = grade.filter(|g| !g.is_empty());
        if is_captain {
            for p in &mut self.participants {
                p.is_captain = Some(false);
            }
            participant.is_captain = Some(true);
        }
        self.participants.push(participant);
    }

    /// Remove every participant with exactly this name. Returns how many were removed.
    pub fn remove_participant(&mut self, name: &str) -> usize {
        let before = self.participants.len();
        self.participants.retain(|p| p.name != name);
        before - self.participants.len()
    }

    pub fn set_captain(&mut self, name: &str) -> ScoringResult<()> {
        self.participants = scoring::set_captain(self.participants.clone(), name)?;
        Ok(())
    }
}
