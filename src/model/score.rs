use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Points a house earned in one activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub id: u64,
    pub activity: u64,
    pub house: u64,
    pub participation: u64,
    #[serde(default)]
    pub placement: Option<u32>,
    /// Derived from the activity's distribution whenever `placement` is set.
    #[serde(default)]
    pub points_earned: u32,
    #[serde(default)]
    pub notes: String,
    pub updated_at: DateTime<Utc>,
}

impl Score {
    pub fn new(id: u64, activity: u64, house: u64, participation: u64) -> Self {
        Self {
            id,
            activity,
            house,
            participation,
            placement: None,
            points_earned: 0,
            notes: String::new(),
            updated_at: Utc::now(),
        }
    }

    /// Human-readable summary, e.g. "Gryphon - 2nd place in Relay (80 pts)".
    pub fn describe(&self, house_name: &str, activity_name: &str) -> String {
        match self.placement {
            Some(placement) => format!(
                "{} - {} place in {} ({} pts)",
                house_name,
                ordinal(placement),
                activity_name,
                self.points_earned
            ),
            None => format!(
                "{} - {} pts in {}",
                house_name, self.points_earned, activity_name
            ),
        }
    }
}

/// "1st" through "5th"; extended placements fall back to "{n}th".
pub fn ordinal(placement: u32) -> String {
    match placement {
        1 => "1st".to_string(),
        2 => "2nd".to_string(),
        3 => "3rd".to_string(),
        n => format!("{}th", n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_with_placement() {
        let mut score = Score::new(1, 1, 1, 1);
        score.placement = Some(2);
        score.points_earned = 80;
        assert_eq!(
            score.describe("Gryphon", "Relay"),
            "Gryphon - 2nd place in Relay (80 pts)"
        );
    }

    #[test]
    fn test_describe_manual_points() {
        let mut score = Score::new(1, 1, 1, 1);
        score.points_earned = 12;
        assert_eq!(score.describe("Gryphon", "Quiz"), "Gryphon - 12 pts in Quiz");
    }

    #[test]
    fn test_ordinal() {
        assert_eq!(ordinal(1), "1st");
        assert_eq!(ordinal(3), "3rd");
        assert_eq!(ordinal(5), "5th");
        assert_eq!(ordinal(11), "11th");
    }
}
