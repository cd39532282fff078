//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use contracts::Endpoint;
use std::path::PathBuf;

/// Timeconv - timestamp conversion between DVS, lidar and RealSense clocks
#[derive(Parser, Debug)]
#[command(
    name = "timeconv",
    author,
    version,
    about = "Convert timestamps between DVS, lidar and RealSense clocks",
    long_about = "Converts timestamps recorded by the DVS event camera, the lidar and the\n\
                  RealSense depth camera of one recording, between sensors and between\n\
                  native ticks and relative seconds, using the recording's calibration file."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "compact",
        global = true,
        env = "TIMECONV_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert timestamps between sensors and formats
    Convert(ConvertArgs),

    /// Validate a calibration file without converting
    Validate(ValidateArgs),

    /// Display calibration information
    Info(InfoArgs),
}

/// Arguments for the `convert` command
#[derive(Parser, Debug, Clone)]
pub struct ConvertArgs {
    /// Path to the calibration file (JSON)
    #[arg(
        short,
        long,
        default_value = "timeconvs.json",
        env = "TIMECONV_CALIBRATION"
    )]
    pub calibration: PathBuf,

    /// Source domain as `sensor[:format]`, e.g. `rs:native` or `lidar:relative`
    #[arg(long)]
    pub from: Endpoint,

    /// Target domain as `sensor[:format]`
    #[arg(long)]
    pub to: Endpoint,

    /// Convert the whole input as one batch: timestamps outside every rule
    /// become 0 instead of failing
    #[arg(long)]
    pub batch: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Print statistics of the converted values to stderr
    #[arg(long)]
    pub stats: bool,

    /// Timestamps to convert; read one per line from stdin when omitted
    #[arg(allow_negative_numbers = true)]
    pub timestamps: Vec<f64>,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to the calibration file to validate
    #[arg(
        short,
        long,
        default_value = "timeconvs.json",
        env = "TIMECONV_CALIBRATION"
    )]
    pub calibration: PathBuf,

    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to the calibration file
    #[arg(
        short,
        long,
        default_value = "timeconvs.json",
        env = "TIMECONV_CALIBRATION"
    )]
    pub calibration: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show every interval rule
    #[arg(long)]
    pub rules: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    #[default]
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use contracts::{Sensor, TimeFormat};

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_convert() {
        let cli = Cli::parse_from([
            "timeconv",
            "convert",
            "-c",
            "calib.json",
            "--from",
            "rs",
            "--to",
            "lidar:relative",
            "5.0",
            "-1.5",
        ]);
        match cli.command {
            Commands::Convert(args) => {
                assert_eq!(args.from, Endpoint::native(Sensor::Rs));
                assert_eq!(args.to.format, TimeFormat::Relative);
                assert_eq!(args.timestamps, vec![5.0, -1.5]);
                assert!(!args.batch);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_quiet_and_verbose_conflict() {
        let cli = Cli::parse_from(["timeconv", "-q", "info"]);
        assert!(cli.quiet);
        assert_eq!(cli.verbose, 0);
        assert!(Cli::try_parse_from(["timeconv", "-q", "-v", "info"]).is_err());
    }

    #[test]
    fn test_reject_unknown_sensor() {
        let result = Cli::try_parse_from([
            "timeconv", "convert", "--from", "radar", "--to", "dvs", "1.0",
        ]);
        assert!(result.is_err());
    }
}
