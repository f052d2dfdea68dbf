use super::types::HouseCupData;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HouseStanding {
    pub house_id: u64,
    pub house_name: String,
    pub total_points: u64,
    pub activities_scored: usize,
    pub first_places: usize,
}

/// Houses ranked by total points, highest first; ties go to the house name.
///
/// With `year`, only activities of that house cup year count. Houses without
/// any score still appear with zero points.
pub fn leaderboard(data: &HouseCupData, year: Option<u64>) -> Vec<HouseStanding> {
    let mut standings: Vec<HouseStanding> = data
        .houses
        .iter()
        .map(|house| {
            let scores: Vec<_> = data
                .scores
                .iter()
                .filter(|s| s.house == house.id)
                .filter(|s| match year {
                    Some(year) => data
                        .activity(s.activity)
                        .is_some_and(|a| a.house_cup_year == year),
                    None => true,
                })
                .collect();

            HouseStanding {
                house_id: house.id,
                house_name: house.name.clone(),
                total_points: scores.iter().map(|s| s.points_earned as u64).sum(),
                activities_scored: scores.len(),
                first_places: scores.iter().filter(|s| s.placement == Some(1)).count(),
            }
        })
        .collect();

    standings.sort_by(|a, b| {
        b.total_points
            .cmp(&a.total_points)
            .then_with(|| a.house_name.cmp(&b.house_name))
    });
    standings
}
