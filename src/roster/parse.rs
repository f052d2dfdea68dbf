use anyhow::{bail, Result};

use crate::model::Participant;

const CAPTAIN_MARKERS: [&str; 2] = ["(Captain)", "(captain)"];

/// Parse free-form roster text, one participant per line.
///
/// Lines look like `"Jane Doe - Grade 10 (Captain)"`; the grade and the
/// captain marker are both optional. Blank lines are skipped.
pub fn parse_roster_text(text: &str) -> Result<Vec<Participant>> {
    let mut participants = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let participant = parse_roster_line(line)
            .map_err(|e| e.context(format!("roster line {}: '{}'", index + 1, line)))?;
        participants.push(participant);
    }

    let captains = participants.iter().filter(|p| p.is_captain()).count();
    if captains > 1 {
        bail!("Roster marks {} captains; a team has at most one", captains);
    }

    Ok(participants)
}

fn parse_roster_line(line: &str) -> Result<Participant> {
    let mut name = line.to_string();
    let mut is_captain = false;
    for marker in CAPTAIN_MARKERS {
        if name.contains(marker) {
            is_captain = true;
            name = name.replace(marker, "");
        }
    }

    let (name, grade) = split_grade(&name);
    let name = name.trim();
    if name.is_empty() {
        bail!("participant name is empty");
    }

    let mut participant = Participant::new(name);
    participant.grade = grade;
    if is_captain {
        participant.is_captain = Some(true);
    }
    Ok(participant)
}

/// Pull a `Grade N` clause (and a `-` separator before it) out of a name.
fn split_grade(name: &str) -> (String, Option<String>) {
    let Some(start) = name.find("Grade") else {
        return (name.to_string(), None);
    };

    let after = &name[start + "Grade".len()..];
    let rest = after.trim_start();
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return (name.to_string(), None);
    }
    let end = name.len() - rest.len() + digits.len();

    let head = name[..start].trim_end();
    let head = head.strip_suffix('-').unwrap_or(head).trim_end();
    let cleaned = format!("{} {}", head, &name[end..]);
    (cleaned.trim().to_string(), Some(digits))
}
