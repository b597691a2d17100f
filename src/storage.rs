use crate::catalog;
use crate::errors::AppError;
use crate::models::{SavedRecord, Tracker};
use std::{env, path::Path, path::PathBuf};
use tokio::{fs, io::AsyncWriteExt};
use tracing::{error, info, warn};

pub const SNAPSHOT_FILE: &str = "progress_data.json";
pub const LOG_FILE: &str = "progress_log.csv";
pub const REPORT_FILE: &str = "weekly_report.txt";

/// How many rows one save appends to the CSV log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CsvRowMode {
    /// One row: the last unit the page renders, with its current-week count.
    #[default]
    LastUnit,
    /// One row per unit for the current week.
    FullWeek,
}

impl CsvRowMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "unit" => Some(Self::LastUnit),
            "week" => Some(Self::FullWeek),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub data_dir: PathBuf,
    pub csv_rows: CsvRowMode,
}

impl ExportConfig {
    pub fn snapshot_path(&self) -> PathBuf {
        self.data_dir.join(SNAPSHOT_FILE)
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE)
    }
}

pub fn resolve_export_config() -> ExportConfig {
    let data_dir = env::var("TRACKER_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."));

    let csv_rows = match env::var("TRACKER_CSV_ROWS") {
        Ok(value) => CsvRowMode::parse(&value).unwrap_or_else(|| {
            warn!("unknown TRACKER_CSV_ROWS value '{value}', using 'unit'");
            CsvRowMode::LastUnit
        }),
        Err(_) => CsvRowMode::default(),
    };

    ExportConfig { data_dir, csv_rows }
}

/// Overwrites the snapshot file with every week's entries.
pub async fn write_snapshot(path: &Path, tracker: &Tracker) -> Result<(), AppError> {
    let payload = serde_json::to_vec(&tracker.progress.snapshot())?;
    if let Err(err) = fs::write(path, payload).await {
        error!("failed to write snapshot {}: {err}", path.display());
        return Err(AppError::from(err).context(path.display()));
    }
    info!("wrote snapshot to {}", path.display());
    Ok(())
}

/// Appends this save's rows to the log, creating it without a header.
/// Returns the number of rows written.
pub async fn append_log(
    path: &Path,
    mode: CsvRowMode,
    date: &str,
    tracker: &Tracker,
) -> Result<usize, AppError> {
    let rows = log_rows(mode, date, tracker);
    let mut payload = String::new();
    for row in &rows {
        payload.push_str(row);
        payload.push_str("\r\n");
    }

    let result: std::io::Result<()> = async {
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;
        file.write_all(payload.as_bytes()).await?;
        file.flush().await
    }
    .await;

    if let Err(err) = result {
        error!("failed to append to {}: {err}", path.display());
        return Err(AppError::from(err).context(path.display()));
    }
    info!("appended {} row(s) to {}", rows.len(), path.display());
    Ok(rows.len())
}

pub fn log_rows(mode: CsvRowMode, date: &str, tracker: &Tracker) -> Vec<String> {
    let week = tracker.current_week;
    let reflection = tracker.current_reflection();
    let units: Vec<_> = match mode {
        CsvRowMode::LastUnit => vec![catalog::last()],
        CsvRowMode::FullWeek => catalog::UNITS.iter().collect(),
    };

    units
        .into_iter()
        .map(|unit| {
            [
                date.to_string(),
                week.to_string(),
                unit.name.to_string(),
                tracker.progress.get(week, unit).to_string(),
                reflection.to_string(),
            ]
            .iter()
            .map(|field| csv_field(field))
            .collect::<Vec<_>>()
            .join(",")
        })
        .collect()
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Plain-text report for the current week, served as a download.
pub fn build_report(tracker: &Tracker) -> String {
    let week = tracker.current_week;
    let mut report = format!(
        "Week {week} - Reflection: {}\n\nProgress:\n",
        tracker.current_reflection()
    );
    for (unit, memorized) in tracker.progress.week_rows(week) {
        report.push_str(&format!("{}: {memorized} verses\n", unit.name));
    }
    report
}

pub fn saved_record(date: &str, tracker: &Tracker) -> SavedRecord {
    let week = tracker.current_week;
    SavedRecord {
        date: date.to_string(),
        week: week.get(),
        progress: tracker
            .progress
            .week_rows(week)
            .into_iter()
            .map(|(unit, value)| (unit.name.to_string(), value))
            .collect(),
        reflection: tracker.current_reflection().to_string(),
    }
}
