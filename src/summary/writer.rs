//! Summary and rollup writers
//!
//! Every artifact is written to a sibling temp file and renamed into
//! place, so a failed run never leaves a truncated file behind.

use std::fs;
use std::path::{Path, PathBuf};

use super::error::OutputResult;
use super::Summary;
use crate::analysis::TemporalRollups;

/// Pretty-printed JSON for a summary
pub fn to_json(summary: &Summary) -> OutputResult<Vec<u8>> {
    let mut bytes = serde_json::to_vec_pretty(summary)?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Write the summary document
pub fn write_summary(path: &Path, summary: &Summary) -> OutputResult<()> {
    let bytes = to_json(summary)?;
    let tmp = temp_path(path);

    fs::write(&tmp, &bytes).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        e
    })?;
    fs::rename(&tmp, path)?;

    tracing::info!(path = %path.display(), bytes = bytes.len(), "Summary written");
    Ok(())
}

/// Write the summary document from async code
pub async fn write_summary_async(path: &Path, summary: &Summary) -> OutputResult<()> {
    let bytes = to_json(summary)?;
    let tmp = temp_path(path);

    if let Err(e) = tokio::fs::write(&tmp, &bytes).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(e.into());
    }
    tokio::fs::rename(&tmp, path).await?;

    tracing::info!(path = %path.display(), bytes = bytes.len(), "Summary written");
    Ok(())
}

/// Write one CSV row per active day of the target year
pub fn write_daily_csv(path: &Path, rollups: &TemporalRollups) -> OutputResult<()> {
    let tmp = temp_path(path);

    if let Err(e) = write_csv_rows(&tmp, rollups) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    fs::rename(&tmp, path)?;

    tracing::info!(path = %path.display(), days = rollups.days.len(), "Daily rollups written");
    Ok(())
}

fn write_csv_rows(path: &Path, rollups: &TemporalRollups) -> OutputResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for day in rollups.days.values() {
        writer.serialize(day)?;
    }
    writer.flush()?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "summary.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::health::{identifiers, MeasurementRecord, Workout};
    use crate::ingest::YearDataset;
    use tempfile::TempDir;

    fn summary_and_rollups() -> (Summary, TemporalRollups) {
        let data = YearDataset {
            target_year: "2025".to_string(),
            records: vec![
                MeasurementRecord::new(identifiers::STEP_COUNT, "2025-06-01 08:00:00 +0000").value("8000"),
                MeasurementRecord::new(identifiers::STEP_COUNT, "2025-06-02 08:00:00 +0000").value("9000"),
            ],
            workouts: vec![Workout::new("HKWorkoutActivityTypeYoga", "2025-06-02 19:00:00 +0000")],
            ..Default::default()
        };
        let rollups = TemporalRollups::build(&data.records, &data.workouts);
        let summary = Summary::from_rollups(&data, &rollups, &Config::default());
        (summary, rollups)
    }

    #[test]
    fn test_write_summary() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("summary.json");
        let (summary, _) = summary_and_rollups();

        write_summary(&path, &summary).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let parsed: Summary = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, summary);
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn test_write_summary_replaces_existing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("summary.json");
        fs::write(&path, "stale").unwrap();
        let (summary, _) = summary_and_rollups();

        write_summary(&path, &summary).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(value.get("year2025").is_some());
    }

    #[test]
    fn test_write_summary_missing_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("summary.json");
        let (summary, _) = summary_and_rollups();

        assert!(write_summary(&path, &summary).is_err());
    }

    #[tokio::test]
    async fn test_write_summary_async() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");
        let (summary, _) = summary_and_rollups();

        write_summary_async(&path, &summary).await.unwrap();

        let bytes = tokio::fs::read(&path).await.unwrap();
        assert_eq!(bytes, to_json(&summary).unwrap());
    }

    #[test]
    fn test_write_daily_csv() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("daily.csv");
        let (_, rollups) = summary_and_rollups();

        write_daily_csv(&path, &rollups).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "date");
        assert_eq!(&headers[1], "steps");
        assert_eq!(&headers[4], "workoutCount");

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "2025-06-01");
        assert_eq!(&rows[1][4], "1");
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn test_write_daily_csv_failure_leaves_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("daily.csv");
        let (_, rollups) = summary_and_rollups();

        assert!(write_daily_csv(&path, &rollups).is_err());
        assert!(!path.exists());
        assert!(!temp_path(&path).exists());
    }
}
