mod config;
mod error;
mod input;
mod normalize;
mod report;
mod sprint;

use chrono::Duration;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use strum_macros::Display;

use crate::config::Config;
use crate::error::FatalError;
use crate::input::InputTable;
use crate::report::{CsvDirSink, JsonSink, ReportSink};

#[derive(Parser)]
#[command(name = "sprint-o-mat")]
#[command(about = "Sprint detection for GPS speed logs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the columns of an input file and which ones the report uses
    Inspect {
        input: PathBuf,
        /// YAML file with column names and thresholds
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Build the sprint report for an input file
    Convert(ConvertArgs),
}

#[derive(Args)]
struct ConvertArgs {
    /// CSV file with spreadsheet timestamps and speeds in m/s
    input: PathBuf,
    /// Output directory (csv) or file (json), generated from the input name
    /// when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,
    /// YAML file with column names and thresholds
    #[arg(long)]
    config: Option<PathBuf>,
    /// Minimum speed of a sprint sample in km/h
    #[arg(long)]
    speed_threshold: Option<f64>,
    /// Largest gap between two samples of one sprint, e.g. "5s"
    #[arg(long, value_parser = config::parse_duration)]
    gap: Option<Duration>,
    /// Shortest sprint listed in the long sprint table, e.g. "1s"
    #[arg(long, value_parser = config::parse_duration)]
    min_duration: Option<Duration>,
    /// Decimal digits for speeds and durations
    #[arg(long)]
    precision: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Display)]
#[strum(serialize_all = "lowercase")]
enum OutputFormat {
    Csv,
    Json,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Inspect { input, config } => inspect(&input, config.as_deref()),
        Commands::Convert(args) => convert(&args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config, FatalError> {
    let config = match path {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    Ok(config)
}

fn inspect(path: &Path, config: Option<&Path>) -> Result<(), FatalError> {
    let config = load_config(config)?;
    let table = InputTable::from_path(path)?;

    println!("{}: {} rows", path.display(), table.len());
    for header in table.headers() {
        let role = if *header == config.columns.timestamp {
            "timestamp"
        } else if *header == config.columns.speed {
            "speed"
        } else {
            "pass-through"
        };
        println!("  {:<24} {}", header, role);
    }
    for required in [&config.columns.timestamp, &config.columns.speed] {
        if table.column(required).is_none() {
            println!("  missing: {}", required);
        }
    }
    Ok(())
}

fn convert(args: &ConvertArgs) -> Result<(), FatalError> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(threshold) = args.speed_threshold {
        config.sprint.speed_threshold_kmh = threshold;
    }
    if let Some(gap) = args.gap {
        config.sprint.gap_threshold = gap;
    }
    if let Some(min_duration) = args.min_duration {
        config.sprint.min_duration = min_duration;
    }
    if let Some(precision) = args.precision {
        config.sprint.precision = precision;
    }
    config.validate()?;

    log::info!("Processing {}", args.input.display());
    let table = InputTable::from_path(&args.input)?;
    log::info!(
        "Loaded {} rows, columns: {}",
        table.len(),
        table.headers().join(", ")
    );
    if table.is_empty() {
        log::warn!("{} has no data rows", args.input.display());
    }

    let report =
        report::assemble(&table, &config).with_source(args.input.display().to_string());

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(&args.input, args.format));
    let sink: Box<dyn ReportSink> = match args.format {
        OutputFormat::Csv => Box::new(CsvDirSink::new(output)),
        OutputFormat::Json => Box::new(JsonSink::new(output)),
    };
    let written = sink.write(&report)?;

    if report.partial {
        log::warn!(
            "Saved a partial report to {} ({} warnings)",
            written.display(),
            report.warnings.len()
        );
    } else {
        log::info!("Saved report to {}", written.display());
    }
    Ok(())
}

/// `<input stem>_processed_<local time>` in the working directory.
fn default_output(input: &Path, format: OutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "report".to_string());
    let name = format!(
        "{}_processed_{}",
        stem,
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    );
    match format {
        OutputFormat::Csv => PathBuf::from(name),
        OutputFormat::Json => PathBuf::from(format!("{}.{}", name, format)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_convert_overrides() {
        let cli = Cli::try_parse_from([
            "sprint-o-mat",
            "convert",
            "track.csv",
            "--format",
            "json",
            "--gap",
            "3s",
            "--speed-threshold",
            "20",
        ])
        .unwrap();
        let Commands::Convert(args) = cli.command else {
            panic!("expected convert");
        };
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.gap, Some(Duration::seconds(3)));
        assert_eq!(args.speed_threshold, Some(20.0));
        assert_eq!(args.min_duration, None);
    }

    #[test]
    fn default_output_is_named_after_the_input() {
        let csv = default_output(Path::new("/data/ride.csv"), OutputFormat::Csv);
        let name = csv.to_string_lossy().to_string();
        assert!(name.starts_with("ride_processed_"));
        assert!(!name.ends_with(".json"));

        let json = default_output(Path::new("ride.csv"), OutputFormat::Json);
        assert!(json.to_string_lossy().ends_with(".json"));
    }

    #[test]
    fn convert_writes_a_csv_report() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("ride.csv");
        std::fs::write(
            &input,
            "Excel Timestamp,Speed\n45000.5,8\n45000.50001157408,8\n45000.50010416667,1\n",
        )
        .unwrap();
        let output = tmp.path().join("report");
        let args = ConvertArgs {
            input,
            output: Some(output.clone()),
            format: OutputFormat::Csv,
            config: None,
            speed_threshold: None,
            gap: None,
            min_duration: None,
            precision: None,
        };

        convert(&args).unwrap();

        let summary = std::fs::read_to_string(output.join("sprint_summary.csv")).unwrap();
        assert_eq!(
            summary,
            "Sprint,Start_time,End_time,Total_time\n\
             Sprint 1,2023-03-15 12:00:00.000,2023-03-15 12:00:01.000,1.000\n"
        );
        assert!(output.join("manifest.yaml").exists());
    }

    #[test]
    fn convert_fails_on_missing_input() {
        let tmp = tempfile::tempdir().unwrap();
        let args = ConvertArgs {
            input: tmp.path().join("absent.csv"),
            output: Some(tmp.path().join("report")),
            format: OutputFormat::Csv,
            config: None,
            speed_threshold: None,
            gap: None,
            min_duration: None,
            precision: Some(3),
        };
        assert!(matches!(convert(&args), Err(FatalError::Input(_))));
        assert!(!tmp.path().join("report").exists());
    }
}
