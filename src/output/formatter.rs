use std::io::IsTerminal;
use owo_colors::OwoColorize;

use crate::model::{Activity, ActivityType, Participation};
use crate::scoring::{PointsSource, ScoreResolution};
use crate::store::{HouseCupData, HouseStanding};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Distribution preview as shown in activity listings: "1: 100, 2: 80, ..."
/// Empty distributions render as "Not set".
pub fn format_distribution_preview(activity: &Activity) -> String {
    if activity.points_distribution.is_empty() {
        "Not set".to_string()
    } else {
        activity.points_distribution.to_string()
    }
}

fn colorize_type(activity_type: ActivityType, use_colors: bool) -> String {
    let label = activity_type.label();
    if !use_colors {
        return label.to_string();
    }
    match activity_type.color() {
        "red" => label.red().to_string(),
        "blue" => label.blue().to_string(),
        "yellow" => label.yellow().to_string(),
        "green" => label.green().to_string(),
        _ => label.dimmed().to_string(),
    }
}

/// One line per activity, newest first
/// Format: "#{id} {name} [{type}] {status} | max {n} | {distribution}"
pub fn format_activity_list(data: &HouseCupData, use_colors: bool) -> String {
    if data.activities.is_empty() {
        return "No activities found.".to_string();
    }

    let mut activities: Vec<&Activity> = data.activities.iter().collect();
    activities.sort_by(|a, b| b.date.cmp(&a.date));

    activities
        .iter()
        .map(|activity| {
            let kind = colorize_type(activity.activity_type, use_colors);
            let preview = format_distribution_preview(activity);
            if use_colors {
                format!(
                    "{} {} [{}] {} | max {} | {}",
                    format!("#{}", activity.id).dimmed(),
                    activity.name.bold(),
                    kind,
                    activity.status.cyan(),
                    activity.max_points,
                    preview
                )
            } else {
                format!(
                    "#{} {} [{}] {} | max {} | {}",
                    activity.id, activity.name, kind, activity.status, activity.max_points, preview
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Leaderboard table with columns: Rank, Points, House, Scored, Wins
/// Points column is right-aligned, 7 chars wide
pub fn format_leaderboard(standings: &[HouseStanding], use_colors: bool) -> String {
    if standings.is_empty() {
        return "No houses found.".to_string();
    }

    let name_width = standings
        .iter()
        .map(|s| s.house_name.chars().count())
        .max()
        .unwrap_or(0);

    standings
        .iter()
        .enumerate()
        .map(|(idx, standing)| {
            let rank = format!("{:>2}.", idx + 1);
            let points = format!("{:>7}", standing.total_points);
            let name = format!("{:<width$}", standing.house_name, width = name_width);
            let detail = format!(
                "{} scored, {} first",
                standing.activities_scored, standing.first_places
            );
            if use_colors {
                format!("{} {}  {}  {}", rank.dimmed(), points.bold(), name, detail.dimmed())
            } else {
                format!("{} {}  {}  {}", rank, points, name, detail)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Leaderboard as tab-separated values for scripting
/// Columns: points, house, scored, wins (no headers, no colors)
pub fn format_leaderboard_tsv(standings: &[HouseStanding]) -> String {
    standings
        .iter()
        .map(|s| {
            format!(
                "{}\t{}\t{}\t{}",
                s.total_points, s.house_name, s.activities_scored, s.first_places
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Team roster, one participant per line with grade and captain marker
pub fn format_roster(participation: &Participation, use_colors: bool) -> String {
    if participation.participants.is_empty() {
        return "No participants.".to_string();
    }

    participation
        .participants
        .iter()
        .map(|p| {
            let grade = p
                .grade
                .as_ref()
                .map(|g| format!(" (Grade {})", g))
                .unwrap_or_default();
            let captain = if p.is_captain() {
                if use_colors {
                    format!(" {}", "Captain".yellow())
                } else {
                    " Captain".to_string()
                }
            } else {
                String::new()
            };
            format!("  {}{}{}", p.name, grade, captain)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Summary of a resolved score, noting any repaired placements
pub fn format_resolution(resolution: &ScoreResolution) -> String {
    let mut line = match resolution.source {
        PointsSource::Placement(p) => format!(
            "Awarded {} pts for {} place",
            resolution.points,
            crate::model::ordinal(p)
        ),
        PointsSource::Manual => format!("Awarded {} pts (manual)", resolution.points),
    };
    if !resolution.repaired.is_empty() {
        let ranks: Vec<String> = resolution.repaired.iter().map(|r| r.to_string()).collect();
        line.push_str(&format!(" (filled missing placements {})", ranks.join(", ")));
    }
    line
}
