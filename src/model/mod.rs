pub mod activity;
pub mod participation;
pub mod score;

pub use activity::{Activity, ActivityStatus, ActivityType, HouseCupYear, DEFAULT_MAX_POINTS};
pub use participation::{Participant, Participation, ParticipationStatus};
pub use score::{ordinal, Score};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct House {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
}
