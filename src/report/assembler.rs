//! Builds the five report tables from an input table.
//!
//! Column problems degrade the views that need the column and leave the
//! others intact. Every degradation is recorded as a [`Warning`].

use chrono::NaiveDateTime;

use super::types::{Report, Table, TableKind};
use super::warning::Warning;
use crate::config::{ColumnsConfig, Config};
use crate::input::InputTable;
use crate::normalize::{fixed, speed, timestamp, ConversionError};
use crate::sprint::{self, Sample, SprintAnalysis, SprintSummary};

const SPRINT_COLUMN: &str = "Sprint";
const DURATION_COLUMN: &str = "Duration_s";
const SUMMARY_COLUMNS: [&str; 4] = ["Sprint", "Start_time", "End_time", "Total_time"];

pub fn assemble(input: &InputTable, config: &Config) -> Report {
    let mut report = Report::new();
    report.push_table(raw_table(input));

    let columns = &config.columns;
    let timestamps = convert_column(
        input,
        &columns.timestamp,
        timestamp::parse_serial_days,
        &mut report,
    );
    let speeds = convert_column(input, &columns.speed, speed::parse_speed_ms, &mut report);

    report.push_table(time_speed_table(
        columns,
        timestamps.as_deref(),
        speeds.as_deref(),
        config.sprint.precision,
    ));

    match (timestamps, speeds) {
        (Some(timestamps), Some(speeds)) => {
            push_sprint_tables(&mut report, config, &timestamps, &speeds)
        }
        _ => log::warn!(
            "Sprint views need both '{}' and '{}', skipping them",
            columns.timestamp,
            columns.speed
        ),
    }

    report
}

fn raw_table(input: &InputTable) -> Table {
    let mut table = Table::new(TableKind::Raw, input.headers().to_vec());
    for row in input.rows() {
        table.push_row(row.clone());
    }
    table
}

/// Parses every cell of the named column. Empty cells become `None`
/// silently, unparsable ones become `None` with a warning. Returns `None`
/// when the column does not exist.
fn convert_column<T, F>(
    input: &InputTable,
    name: &str,
    parse: F,
    report: &mut Report,
) -> Option<Vec<Option<T>>>
where
    F: Fn(&str) -> Result<T, ConversionError>,
{
    let Some(column) = input.column(name) else {
        report.warn(Warning::MissingColumn {
            column: name.to_string(),
        });
        return None;
    };

    let values = column
        .values()
        .enumerate()
        .map(|(i, raw)| {
            if raw.trim().is_empty() {
                return None;
            }
            match parse(raw) {
                Ok(value) => Some(value),
                Err(e) => {
                    report.warn(Warning::Conversion {
                        row: i + 1,
                        column: column.name().to_string(),
                        value: raw.to_string(),
                        reason: e.to_string(),
                    });
                    None
                }
            }
        })
        .collect();
    Some(values)
}

fn time_speed_table(
    columns: &ColumnsConfig,
    timestamps: Option<&[Option<NaiveDateTime>]>,
    speeds: Option<&[Option<f64>]>,
    precision: u32,
) -> Table {
    let mut names = Vec::new();
    if timestamps.is_some() {
        names.push(columns.timestamp.clone());
    }
    if speeds.is_some() {
        names.push(columns.speed.clone());
    }
    let mut table = Table::new(TableKind::TimeSpeed, names);

    let len = timestamps.map(<[_]>::len).or(speeds.map(<[_]>::len)).unwrap_or(0);
    for i in 0..len {
        let mut row = Vec::with_capacity(2);
        if let Some(timestamps) = timestamps {
            row.push(timestamps[i].as_ref().map(timestamp::display).unwrap_or_default());
        }
        if let Some(speeds) = speeds {
            row.push(
                speeds[i]
                    .map(|ms| speed::display_kmh(speed::to_kmh(ms), precision))
                    .unwrap_or_default(),
            );
        }
        table.push_row(row);
    }
    table
}

fn push_sprint_tables(
    report: &mut Report,
    config: &Config,
    timestamps: &[Option<NaiveDateTime>],
    speeds: &[Option<f64>],
) {
    let threshold = config.sprint.speed_threshold_kmh;
    let precision = config.sprint.precision;

    let mut untimed = 0;
    let samples: Vec<Sample> = timestamps
        .iter()
        .zip(speeds)
        .filter_map(|(ts, ms)| match (ts, ms) {
            (Some(timestamp), Some(speed_ms)) => Some(Sample {
                timestamp: *timestamp,
                speed_ms: *speed_ms,
            }),
            (None, Some(speed_ms))
                if speed::meets_threshold(speed::to_kmh(*speed_ms), threshold, precision) =>
            {
                untimed += 1;
                None
            }
            _ => None,
        })
        .collect();

    if untimed > 0 {
        report.warn(Warning::UntimedSamples { count: untimed });
    }

    let analysis = sprint::analyze(samples, &config.sprint);
    if analysis.filtered == 0 {
        report.warn(Warning::EmptyResult {
            threshold_kmh: threshold,
        });
    }

    report.push_table(detail_table(&config.columns, &analysis, precision));
    report.push_table(summary_table(
        TableKind::SprintSummary,
        &analysis.summaries,
        precision,
    ));
    report.push_table(summary_table(
        TableKind::LongSprints,
        &analysis.long_sprints,
        precision,
    ));
}

fn detail_table(columns: &ColumnsConfig, analysis: &SprintAnalysis, precision: u32) -> Table {
    let mut table = Table::new(
        TableKind::Sprints,
        vec![
            columns.timestamp.clone(),
            columns.speed.clone(),
            SPRINT_COLUMN.to_string(),
            DURATION_COLUMN.to_string(),
        ],
    );
    for row in &analysis.details {
        table.push_row(vec![
            timestamp::display(&row.timestamp),
            speed::display_kmh(row.speed_kmh, precision),
            row.sprint.label(),
            fixed::display_seconds(row.until_next, precision),
        ]);
    }
    table
}

fn summary_table(name: TableKind, summaries: &[SprintSummary], precision: u32) -> Table {
    let mut table = Table::new(name, SUMMARY_COLUMNS.iter().map(|c| c.to_string()).collect());
    for row in summaries {
        table.push_row(vec![
            row.sprint.label(),
            timestamp::display(&row.start),
            timestamp::display(&row.end),
            fixed::display_seconds(row.total_duration, precision),
        ]);
    }
    table
}
