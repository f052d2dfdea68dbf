use tracing::{debug, warn};

use super::distribution::RECOGNIZED_PLACEMENTS;
use super::errors::{ScoringError, ScoringResult};
use crate::model::{Activity, Participant, Score};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointsSource {
    Placement(u32),
    Manual,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreResolution {
    pub points: u32,
    pub source: PointsSource,
    /// Placements backfilled into the activity's distribution along the way
    pub repaired: Vec<u32>,
}

/// Points a score should carry.
///
/// With a placement, the activity's distribution is repaired in place first
/// and the placement's entry is returned; `manual_points` is ignored. Without
/// one, `manual_points` is returned as-is.
///
/// Does not check the result against `max_points`; see [`check_points_within_max`].
pub fn resolve_score_points(
    activity: &mut Activity,
    placement: Option<u32>,
    manual_points: Option<u32>,
) -> ScoringResult<u32> {
    match placement {
        Some(placement) => {
            activity.repair_distribution()?;
            lookup_placement(activity, placement)
        }
        None => manual_points.ok_or(ScoringError::MissingPoints),
    }
}

fn lookup_placement(activity: &Activity, placement: u32) -> ScoringResult<u32> {
    // After repair every recognized placement is present, so a miss here
    // is either out of range or an extended rank nobody configured.
    activity
        .points_distribution
        .get(placement)
        .ok_or_else(|| {
            debug!(
                placement,
                activity = activity.id,
                recognized = ?RECOGNIZED_PLACEMENTS,
                "Placement not in distribution"
            );
            ScoringError::InvalidPlacement { placement }
        })
}

pub fn check_points_within_max(points: u32, max_points: u32) -> ScoringResult<()> {
    if points > max_points {
        warn!(points, max_points, "Resolved points exceed activity maximum");
        return Err(ScoringError::InvariantViolation(format!(
            "{} points exceeds the activity maximum of {}",
            points, max_points
        )));
    }
    Ok(())
}

/// Resolve and store `points_earned` on a score record.
///
/// For a placed score, `score.points_earned` is overwritten from the
/// distribution. For an unplaced score the currently stored points count as
/// the manual value, and zero counts as "not supplied".
pub fn resolve_score(score: &mut Score, activity: &mut Activity) -> ScoringResult<ScoreResolution> {
    if score.activity != activity.id {
        return Err(ScoringError::InvariantViolation(format!(
            "score {} belongs to activity {}, not {}",
            score.id, score.activity, activity.id
        )));
    }

    let before = activity.points_distribution.clone();
    let manual = Some(score.points_earned).filter(|p| *p > 0);
    let points = resolve_score_points(activity, score.placement, manual)?;
    check_points_within_max(points, activity.max_points)?;

    let repaired = activity
        .points_distribution
        .iter()
        .map(|(placement, _)| placement)
        .filter(|p| !before.contains(*p))
        .collect();

    score.points_earned = points;
    Ok(ScoreResolution {
        points,
        source: match score.placement {
            Some(p) => PointsSource::Placement(p),
            None => PointsSource::Manual,
        },
        repaired,
    })
}

/// Make `name` the only captain in `participants`.
///
/// The first participant with a matching name gets the flag and every other
/// participant has it cleared. The whole list is replaced at once.
pub fn set_captain(participants: Vec<Participant>, name: &str) -> ScoringResult<Vec<Participant>> {
    let target = participants
        .iter()
        .position(|p| p.name == name)
        .ok_or_else(|| ScoringError::ParticipantNotFound(name.to_string()))?;

    let updated: Vec<Participant> = participants
        .into_iter()
        .enumerate()
        .map(|(i, mut p)| {
            p.is_captain = Some(i == target);
            p
        })
        .collect();

    let captains = updated.iter().filter(|p| p.is_captain()).count();
    if captains != 1 {
        warn!(captains, name, "Captain assignment produced an invalid roster");
        return Err(ScoringError::InvariantViolation(format!(
            "expected exactly one captain after assigning '{}', found {}",
            name, captains
        )));
    }

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ActivityType;
    use chrono::Utc;

    fn activity_with(pairs: &[(u32, u32)], max_points: u32) -> Activity {
        let mut activity = Activity::new(7, "Quiz Bowl", ActivityType::Academics, 1, Utc::now());
        activity.max_points = max_points;
        activity.points_distribution = pairs.iter().copied().collect();
        activity
    }

    fn roster() -> Vec<Participant> {
        vec![
            Participant::new("Ana").as_captain(),
            Participant::new("Ben"),
            Participant::new("Ben").with_grade("11"),
        ]
    }

    #[test]
    fn test_placement_uses_stored_value_and_ignores_manual() {
        let mut activity = activity_with(&[(1, 100), (2, 70)], 100);
        let points = resolve_score_points(&mut activity, Some(2), Some(5)).unwrap();
        assert_eq!(points, 70);
    }

    #[test]
    fn test_placement_repairs_distribution_in_place() {
        let mut activity = activity_with(&[], 100);
        let points = resolve_score_points(&mut activity, Some(4), None).unwrap();
        assert_eq!(points, 40);
        assert!(activity.points_distribution.is_complete());
    }

    #[test]
    fn test_extended_placement_resolves_when_configured() {
        let mut activity = activity_with(&[(6, 5)], 100);
        assert_eq!(resolve_score_points(&mut activity, Some(6), None).unwrap(), 5);
    }

    #[test]
    fn test_unknown_placement_is_invalid() {
        let mut activity = activity_with(&[], 100);
        for placement in [0, 6, 42] {
            let err = resolve_score_points(&mut activity, Some(placement), None).unwrap_err();
            assert_eq!(err, ScoringError::InvalidPlacement { placement });
        }
    }

    #[test]
    fn test_manual_points_without_placement() {
        let mut activity = activity_with(&[], 100);
        assert_eq!(resolve_score_points(&mut activity, None, Some(0)).unwrap(), 0);
        assert_eq!(resolve_score_points(&mut activity, None, Some(33)).unwrap(), 33);
        // No placement means no repair
        assert!(activity.points_distribution.is_empty());
    }

    #[test]
    fn test_missing_points() {
        let mut activity = activity_with(&[], 100);
        let err = resolve_score_points(&mut activity, None, None).unwrap_err();
        assert_eq!(err, ScoringError::MissingPoints);
    }

    #[test]
    fn test_invalid_max_points_surfaces_before_lookup() {
        let mut activity = activity_with(&[(1, 10)], 0);
        let err = resolve_score_points(&mut activity, Some(1), None).unwrap_err();
        assert!(matches!(err, ScoringError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_check_points_within_max() {
        assert!(check_points_within_max(100, 100).is_ok());
        let err = check_points_within_max(999, 100).unwrap_err();
        assert!(matches!(err, ScoringError::InvariantViolation(_)));
    }

    #[test]
    fn test_resolve_score_with_placement() {
        let mut activity = activity_with(&[(1, 50)], 50);
        let mut score = Score::new(1, 7, 2, 3);
        score.placement = Some(3);
        score.points_earned = 1;

        let resolution = resolve_score(&mut score, &mut activity).unwrap();
        assert_eq!(resolution.points, 30);
        assert_eq!(resolution.source, PointsSource::Placement(3));
        assert_eq!(resolution.repaired, vec![2, 3, 4, 5]);
        assert_eq!(score.points_earned, 30);
    }

    #[test]
    fn test_resolve_score_manual_and_missing() {
        let mut activity = activity_with(&[], 100);
        let mut score = Score::new(1, 7, 2, 3);
        assert_eq!(
            resolve_score(&mut score, &mut activity).unwrap_err(),
            ScoringError::MissingPoints
        );

        score.points_earned = 25;
        let resolution = resolve_score(&mut score, &mut activity).unwrap();
        assert_eq!(resolution.source, PointsSource::Manual);
        assert!(resolution.repaired.is_empty());
    }

    #[test]
    fn test_resolve_score_rejects_override_above_max() {
        let mut activity = activity_with(&[(1, 999)], 100);
        let mut score = Score::new(1, 7, 2, 3);
        score.placement = Some(1);
        let err = resolve_score(&mut score, &mut activity).unwrap_err();
        assert!(matches!(err, ScoringError::InvariantViolation(_)));
        assert_eq!(score.points_earned, 0);
    }

    #[test]
    fn test_resolve_score_rejects_foreign_activity() {
        let mut activity = activity_with(&[], 100);
        let mut score = Score::new(1, 8, 2, 3);
        score.points_earned = 5;
        let err = resolve_score(&mut score, &mut activity).unwrap_err();
        assert!(matches!(err, ScoringError::InvariantViolation(_)));
    }

    #[test]
    fn test_set_captain_single_captain() {
        let updated = set_captain(roster(), "Ben").unwrap();
        let captains: Vec<_> = updated.iter().filter(|p| p.is_captain()).collect();
        assert_eq!(captains.len(), 1);
        // First match wins
        assert_eq!(captains[0].grade, None);
        assert!(!updated[0].is_captain());
    }

    #[test]
    fn test_set_captain_not_found() {
        let err = set_captain(roster(), "ana").unwrap_err();
        assert_eq!(err, ScoringError::ParticipantNotFound("ana".to_string()));
    }

    #[test]
    fn test_set_captain_empty_roster() {
        let err = set_captain(Vec::new(), "Ana").unwrap_err();
        assert!(matches!(err, ScoringError::ParticipantNotFound(_)));
    }
}
