//! `convert` command implementation.

use std::io::{self, BufRead};

use anyhow::{Context, Result};
use contracts::Conversion;
use observability::{RunningStats, StatsSummary};
use serde::Serialize;
use tracing::info;

use super::ensure_calibration_exists;
use crate::cli::ConvertArgs;
use crate::error::CliError;

/// Conversion result for JSON output
#[derive(Serialize)]
struct ConversionOutput {
    from: String,
    to: String,
    steps: usize,
    values: Vec<ConvertedValue>,
}

#[derive(Serialize, Debug, PartialEq)]
struct ConvertedValue {
    input: f64,
    output: f64,
}

/// Execute the `convert` command
pub fn run_convert(args: &ConvertArgs) -> Result<()> {
    ensure_calibration_exists(&args.calibration)?;
    timeconv::load_from_file(&args.calibration).with_context(|| {
        format!(
            "Failed to load calibration from {}",
            args.calibration.display()
        )
    })?;

    let inputs = if args.timestamps.is_empty() {
        read_timestamps(io::stdin().lock())?
    } else {
        args.timestamps.clone()
    };
    if inputs.is_empty() {
        return Err(CliError::NoInput.into());
    }

    let plan = Conversion::new(args.from, args.to);
    info!(plan = %plan, count = inputs.len(), batch = args.batch, "Converting timestamps");

    let outputs = convert_all(&plan, &inputs, args.batch)?;

    if args.json {
        let output = ConversionOutput {
            from: plan.from.to_string(),
            to: plan.to.to_string(),
            steps: plan.steps().len(),
            values: pair_values(&inputs, &outputs),
        };
        let json =
            serde_json::to_string_pretty(&output).context("Failed to serialize conversion")?;
        println!("{}", json);
    } else {
        for value in &outputs {
            println!("{}", value);
        }
    }

    if args.stats {
        let mut stats = RunningStats::default();
        stats.extend(&outputs);
        eprintln!("{} ({}): {}", plan.to, unit_of(&plan), StatsSummary::from(&stats));
    }

    Ok(())
}

/// Convert with the process-wide calibration
fn convert_all(plan: &Conversion, inputs: &[f64], batch: bool) -> Result<Vec<f64>> {
    let converter = timeconv::converter()?;
    let outputs = if batch {
        converter.convert_batch(plan, inputs)?
    } else {
        inputs
            .iter()
            .map(|&x| {
                converter
                    .convert(plan, x)
                    .with_context(|| format!("Failed to convert {x}"))
            })
            .collect::<Result<Vec<_>>>()?
    };
    Ok(outputs)
}

/// Parse one timestamp per line, skipping blank lines and `#` comments
fn read_timestamps(reader: impl BufRead) -> crate::error::Result<Vec<f64>> {
    let mut values = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let value = trimmed
            .parse::<f64>()
            .map_err(|_| CliError::invalid_timestamp(index + 1, trimmed))?;
        values.push(value);
    }
    Ok(values)
}

fn pair_values(inputs: &[f64], outputs: &[f64]) -> Vec<ConvertedValue> {
    inputs
        .iter()
        .zip(outputs)
        .map(|(&input, &output)| ConvertedValue { input, output })
        .collect()
}

fn unit_of(plan: &Conversion) -> &'static str {
    match plan.to.format {
        contracts::TimeFormat::Native => plan.to.sensor.native_unit(),
        contracts::TimeFormat::Relative => "s",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{Endpoint, Sensor};

    #[test]
    fn test_read_timestamps() {
        let input = "1.5\n\n# comment\n  -2e3  \n42\n";
        let values = read_timestamps(input.as_bytes()).unwrap();
        assert_eq!(values, vec![1.5, -2000.0, 42.0]);
    }

    #[test]
    fn test_read_timestamps_reports_line() {
        let input = "1.0\nabc\n";
        let err = read_timestamps(input.as_bytes()).unwrap_err();
        assert!(matches!(err, CliError::InvalidTimestamp { line: 2, .. }));
        assert!(err.to_string().contains("abc"));
    }

    #[test]
    fn test_pair_values() {
        assert_eq!(
            pair_values(&[1.0, 2.0], &[10.0, 20.0]),
            vec![
                ConvertedValue {
                    input: 1.0,
                    output: 10.0
                },
                ConvertedValue {
                    input: 2.0,
                    output: 20.0
                },
            ]
        );
    }

    #[test]
    fn test_unit_of() {
        let plan = Conversion::new(Endpoint::native(Sensor::Dvs), Endpoint::native(Sensor::Lidar));
        assert_eq!(unit_of(&plan), "ns");
        let plan = Conversion::new(Endpoint::native(Sensor::Dvs), Endpoint::relative(Sensor::Rs));
        assert_eq!(unit_of(&plan), "s");
    }
}
