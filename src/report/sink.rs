//! Report persistence.
//!
//! Sinks stage their output next to the target and rename it into place once
//! everything is written, so a target path either does not exist or holds a
//! complete report. Degraded reports carry `partial: true`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::types::{Report, TableKind};
use super::warning::Warning;

pub const MANIFEST_FILE: &str = "manifest.yaml";

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("output {0} already exists")]
    AlreadyExists(PathBuf),
    #[error("output path {0} has no file name")]
    InvalidTarget(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub trait ReportSink {
    /// Persists `report` and returns the path it was written to.
    fn write(&self, report: &Report) -> Result<PathBuf, SinkError>;
}

/// One CSV file per table plus a YAML manifest, inside a directory.
pub struct CsvDirSink {
    dir: PathBuf,
}

impl CsvDirSink {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn write_contents(&self, staging: &Path, report: &Report) -> Result<(), SinkError> {
        let mut entries = Vec::new();
        for table in &report.tables {
            let file = format!("{}.csv", table.name.as_ref());
            let mut writer = csv::Writer::from_path(staging.join(&file))?;
            if !table.columns.is_empty() {
                writer.write_record(&table.columns)?;
            }
            for row in &table.rows {
                writer.write_record(row)?;
            }
            writer.flush()?;
            entries.push(ManifestEntry {
                name: table.name,
                file,
                rows: table.rows.len(),
            });
        }

        let manifest = Manifest {
            generated_at: report.generated_at,
            source: report.source.as_deref(),
            partial: report.partial,
            tables: entries,
            missing: missing_tables(report),
            warnings: &report.warnings,
        };
        fs::write(staging.join(MANIFEST_FILE), serde_yaml::to_string(&manifest)?)?;
        Ok(())
    }
}

impl ReportSink for CsvDirSink {
    fn write(&self, report: &Report) -> Result<PathBuf, SinkError> {
        let staging = prepare_staging(&self.dir)?;
        if staging.exists() {
            fs::remove_dir_all(&staging)?;
        }
        fs::create_dir_all(&staging)?;

        if let Err(e) = self.write_contents(&staging, report) {
            let _ = fs::remove_dir_all(&staging);
            return Err(e);
        }

        publish_dir(&staging, &self.dir)?;
        log::info!("Wrote {} tables to {}", report.tables.len(), self.dir.display());
        Ok(self.dir.clone())
    }
}

/// The whole report as a single JSON document.
pub struct JsonSink {
    path: PathBuf,
}

impl JsonSink {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl ReportSink for JsonSink {
    fn write(&self, report: &Report) -> Result<PathBuf, SinkError> {
        let staging = prepare_staging(&self.path)?;

        let result = File::create(&staging)
            .map_err(SinkError::from)
            .and_then(|file| {
                let mut writer = BufWriter::new(file);
                serde_json::to_writer_pretty(&mut writer, report)?;
                writer.flush()?;
                Ok(())
            });
        if let Err(e) = result {
            let _ = fs::remove_file(&staging);
            return Err(e);
        }

        publish_file(&staging, &self.path)?;
        log::info!("Wrote report to {}", self.path.display());
        Ok(self.path.clone())
    }
}

#[derive(Serialize)]
struct Manifest<'a> {
    generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'a str>,
    partial: bool,
    tables: Vec<ManifestEntry>,
    missing: Vec<TableKind>,
    warnings: &'a [Warning],
}

#[derive(Serialize)]
struct ManifestEntry {
    name: TableKind,
    file: String,
    rows: usize,
}

fn missing_tables(report: &Report) -> Vec<TableKind> {
    TableKind::ALL
        .into_iter()
        .filter(|kind| report.table(*kind).is_none())
        .collect()
}

/// Refuses existing targets, creates the parent directory and returns the
/// staging path to write to.
fn prepare_staging(target: &Path) -> Result<PathBuf, SinkError> {
    if target.exists() {
        return Err(SinkError::AlreadyExists(target.to_path_buf()));
    }
    let name = target
        .file_name()
        .ok_or_else(|| SinkError::InvalidTarget(target.to_path_buf()))?;

    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut staging = name.to_os_string();
    staging.push(format!(".partial-{}", std::process::id()));
    Ok(target.with_file_name(staging))
}

/// Moves a finished staging file to `target`. The hard link fails instead of
/// replacing a `target` that appeared after staging started.
fn publish_file(staging: &Path, target: &Path) -> Result<(), SinkError> {
    match fs::hard_link(staging, target) {
        Ok(()) => {
            fs::remove_file(staging)?;
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            let _ = fs::remove_file(staging);
            Err(SinkError::AlreadyExists(target.to_path_buf()))
        }
        Err(e) => {
            log::debug!(
                "Cannot link {} ({}), renaming instead",
                target.display(),
                e
            );
            fs::rename(staging, target)?;
            Ok(())
        }
    }
}

/// Moves a finished staging directory to `target`.
///
/// `rename` replaces an empty directory at `target`, so the target is checked
/// again right before the move. An empty directory created between that
/// check and the rename is still replaced.
fn publish_dir(staging: &Path, target: &Path) -> Result<(), SinkError> {
    if target.exists() {
        let _ = fs::remove_dir_all(staging);
        return Err(SinkError::AlreadyExists(target.to_path_buf()));
    }
    fs::rename(staging, target)?;
    Ok(())
}
