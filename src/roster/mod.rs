pub mod parse;

pub use parse::parse_roster_text;

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

use crate::model::Participant;

/// Read roster text from a file, or from stdin when `path` is "-".
pub fn read_roster(path: &Path) -> Result<Vec<Participant>> {
    let text = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read roster from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read roster file at {}", path.display()))?
    };
    parse_roster_text(&text)
}
