use super::types::{HouseCupData, DATA_VERSION};
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Get the default data file path (~/.config/house-cup/data.json)
pub fn get_data_path() -> Result<PathBuf> {
    Ok(crate::config::get_config_dir()?.join("data.json"))
}

/// Load the house cup document from a JSON file
///
/// If the file doesn't exist, returns a new empty document.
/// If the file exists but has an unsupported version, returns an error.
pub fn load_data(path: &Path) -> Result<HouseCupData> {
    if !path.exists() {
        debug!(path = %path.display(), "No data file yet, starting empty");
        return Ok(HouseCupData::new());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open data file at {}", path.display()))?;

    let data: HouseCupData = serde_json::from_reader(file)
        .with_context(|| format!("Failed to load house cup data from {}", path.display()))?;

    if data.version != DATA_VERSION {
        anyhow::bail!("Unsupported data file version: {}", data.version);
    }

    debug!(
        activities = data.activities.len(),
        scores = data.scores.len(),
        "Loaded house cup data"
    );
    Ok(data)
}

/// Save the house cup document to a JSON file atomically
///
/// The file is never left half-written. Creates the parent directory if needed.
pub fn save_data(path: &Path, data: &HouseCupData) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, data).context("Failed to serialize house cup data")?;

    file.commit().context("Failed to save house cup data")?;

    debug!(path = %path.display(), "Saved house cup data");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Activity, ActivityType};
    use chrono::Utc;
    use std::env;

    #[test]
    fn test_load_missing_file_returns_empty() {
        let temp_path = env::temp_dir().join("house_cup_test_missing.json");
        let _ = std::fs::remove_file(&temp_path);

        let data = load_data(&temp_path).unwrap();
        assert_eq!(data.version, 1);
        assert!(data.activities.is_empty());
    }

    #[test]
    fn test_load_legacy_distribution_shape() {
        let temp_path = env::temp_dir().join("house_cup_test_legacy.json");
        let json = r#"{
            "version": 1,
            "activities": [{
                "id": 1,
                "name": "Debate",
                "activity_type": "academics",
                "house_cup_year": 1,
                "date": "2025-10-11T10:55:00Z",
                "max_points": 50,
                "points_distribution": {"1": "50", "2": 40.0}
            }]
        }"#;
        std::fs::write(&temp_path, json).unwrap();

        let data = load_data(&temp_path).unwrap();
        let activity = &data.activities[0];
        assert_eq!(activity.points_distribution.get(1), Some(50));
        assert_eq!(activity.points_distribution.get(2), Some(40));
        assert_eq!(activity.points_distribution.missing_placements(), vec![3, 4, 5]);

        let _ = std::fs::remove_file(&temp_path);
    }

    #[test]
    fn test_load_rejects_unknown_version() {
        let temp_path = env::temp_dir().join("house_cup_test_version.json");
        std::fs::write(&temp_path, r#"{"version": 2}"#).unwrap();

        let err = load_data(&temp_path).unwrap_err();
        assert!(err.to_string().contains("Unsupported"));

        let _ = std::fs::remove_file(&temp_path);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_path = env::temp_dir().join("house_cup_test_roundtrip.json");
        let _ = std::fs::remove_file(&temp_path);

        let mut data = HouseCupData::new();
        data.upsert_activity(Activity::new(1, "Relay", ActivityType::Sports, 1, Utc::now()))
            .unwrap();

        save_data(&temp_path, &data).unwrap();
        let loaded = load_data(&temp_path).unwrap();

        assert_eq!(loaded.activities, data.activities);

        let _ = std::fs::remove_file(&temp_path);
    }
}
