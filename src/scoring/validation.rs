use std::collections::HashSet;

use crate::store::HouseCupData;

/// Check every stored record against the scoring rules.
/// Returns all problems at once (not just the first).
pub fn validate_records(data: &HouseCupData) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for activity in &data.activities {
        let label = format!("activities[{}]", activity.id);
        if activity.max_points < 1 {
            errors.push(format!("{}.max_points: must be at least 1", label));
        }
        let missing = activity.points_distribution.missing_placements();
        if !missing.is_empty() {
            errors.push(format!(
                "{}.points_distribution: missing placements {:?} (run normalize)",
                label, missing
            ));
        }
        if !data.years.is_empty() && !data.years.iter().any(|y| y.id == activity.house_cup_year) {
            errors.push(format!(
                "{}.house_cup_year: unknown year {}",
                label, activity.house_cup_year
            ));
        }
    }

    let mut pairs = HashSet::new();
    for participation in &data.participations {
        let label = format!("participations[{}]", participation.id);
        if data.activity(participation.activity).is_none() {
            errors.push(format!("{}.activity: unknown activity {}", label, participation.activity));
        }
        if data.house(participation.house).is_none() {
            errors.push(format!("{}.house: unknown house {}", label, participation.house));
        }
        if !pairs.insert((participation.activity, participation.house)) {
            errors.push(format!(
                "{}: duplicate registration of house {} for activity {}",
                label, participation.house, participation.activity
            ));
        }
        let captains = participation.captain_count();
        if captains > 1 {
            errors.push(format!("{}.participants: {} captains, at most one allowed", label, captains));
        }
    }

    for score in &data.scores {
        let label = format!("scores[{}]", score.id);
        match data.participations.iter().find(|p| p.id == score.participation) {
            Some(p) if p.activity != score.activity || p.house != score.house => {
                errors.push(format!(
                    "{}.participation: belongs to activity {} / house {}, score is for activity {} / house {}",
                    label, p.activity, p.house, score.activity, score.house
                ));
            }
            Some(_) => {}
            None => errors.push(format!(
                "{}.participation: unknown participation {}",
                label, score.participation
            )),
        }

        let Some(activity) = data.activity(score.activity) else {
            errors.push(format!("{}.activity: unknown activity {}", label, score.activity));
            continue;
        };
        if score.points_earned > activity.max_points {
            errors.push(format!(
                "{}.points_earned: {} exceeds max points {}",
                label, score.points_earned, activity.max_points
            ));
        }
        if let Some(placement) = score.placement {
            match activity.points_distribution.get(placement) {
                Some(expected) if expected != score.points_earned => errors.push(format!(
                    "{}.points_earned: {} but placement {} is worth {}",
                    label, score.points_earned, placement, expected
                )),
                Some(_) => {}
                None => errors.push(format!(
                    "{}.placement: {} is not in the activity's distribution",
                    label, placement
                )),
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
