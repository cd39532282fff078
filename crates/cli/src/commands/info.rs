//! `info` command implementation.

use anyhow::{Context, Result};
use config_loader::CalibrationLoader;
use contracts::{CalibrationTable, CrossSensor, IntervalRule, RuleBounds, Sensor};
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;

/// Calibration info for JSON output
#[derive(Serialize)]
struct CalibrationInfo {
    clocks: Vec<ClockInfo>,
    tables: Vec<TableInfo>,
}

#[derive(Serialize)]
struct ClockInfo {
    sensor: Sensor,
    native_unit: &'static str,
    timestamp_scale: f64,
    offset_s: f64,
}

#[derive(Serialize)]
struct TableInfo {
    table: CrossSensor,
    rule_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    rules: Vec<RuleInfo>,
}

#[derive(Serialize)]
struct RuleInfo {
    interval: String,
    conv_k: f64,
    conv_b: f64,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(calibration = %args.calibration.display(), "Loading calibration info");

    super::ensure_calibration_exists(&args.calibration)?;

    let table = CalibrationLoader::load_from_path(&args.calibration).with_context(|| {
        format!(
            "Failed to load calibration from {}",
            args.calibration.display()
        )
    })?;

    let info = build_calibration_info(&table, args.rules);
    if args.json {
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize calibration info")?;
        println!("{}", json);
    } else {
        print_calibration_info(&info);
    }

    Ok(())
}

fn build_calibration_info(table: &CalibrationTable, with_rules: bool) -> CalibrationInfo {
    let clocks = Sensor::ALL
        .into_iter()
        .map(|sensor| {
            let clock = table.clock(sensor);
            ClockInfo {
                sensor,
                native_unit: sensor.native_unit(),
                timestamp_scale: clock.scale,
                offset_s: clock.offset_s,
            }
        })
        .collect();

    let tables = CrossSensor::ALL
        .into_iter()
        .map(|kind| {
            let rules = table.rules(kind);
            TableInfo {
                table: kind,
                rule_count: rules.len(),
                rules: if with_rules {
                    rules.iter().map(describe_rule).collect()
                } else {
                    Vec::new()
                },
            }
        })
        .collect();

    CalibrationInfo { clocks, tables }
}

fn describe_rule(rule: &IntervalRule) -> RuleInfo {
    RuleInfo {
        interval: format_interval(rule),
        conv_k: rule.conv_k,
        conv_b: rule.conv_b,
    }
}

/// Interval in math notation, `(lo, hi]` for inner rules
fn format_interval(rule: &IntervalRule) -> String {
    match rule.bounds() {
        Ok(RuleBounds::Inner { lo, hi }) => format!("({lo}, {hi}]"),
        Ok(RuleBounds::UpTo { hi }) => format!("(-inf, {hi}]"),
        Ok(RuleBounds::After { lo }) => format!("({lo}, +inf)"),
        Err(reason) => format!("invalid: {reason}"),
    }
}

fn print_calibration_info(info: &CalibrationInfo) {
    println!("⏱  Sensor clocks");
    for (i, clock) in info.clocks.iter().enumerate() {
        let prefix = if i == info.clocks.len() - 1 { "└─" } else { "├─" };
        println!(
            "   {} {:<5} native [{}]  relative = native * {} - {}",
            prefix, clock.sensor.as_str(), clock.native_unit, clock.timestamp_scale, clock.offset_s
        );
    }

    println!("\n🔀 Rule tables");
    for (i, table) in info.tables.iter().enumerate() {
        let is_last = i == info.tables.len() - 1;
        let prefix = if is_last { "└─" } else { "├─" };
        let child_prefix = if is_last { "   " } else { "│  " };

        println!("   {} {} ({} rules)", prefix, table.table, table.rule_count);
        for (j, rule) in table.rules.iter().enumerate() {
            let rule_prefix = if j == table.rules.len() - 1 { "└─" } else { "├─" };
            println!(
                "   {}  {} t in {:<28} -> t * {} + {}",
                child_prefix, rule_prefix, rule.interval, rule.conv_k, rule.conv_b
            );
        }
    }

    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> CalibrationTable {
        CalibrationTable {
            rs_to_dvs: vec![
                IntervalRule::up_to(10.0, 2.0, 1.0),
                IntervalRule::inner(10.0, 20.0, 3.0, -5.0),
                IntervalRule::after(20.0, 1.0, 0.0),
            ],
            lidar_to_dvs: vec![],
            dvs_to_rs: vec![],
            dvs_to_lidar: vec![],
            dvs_timestamp_scale: 1e-6,
            dvs_offset_s: 1.0,
            lidar_timestamp_scale: 1e-9,
            lidar_offset_s: 2.0,
            rs_timestamp_scale: 1e-3,
            rs_offset_s: 3.0,
        }
    }

    #[test]
    fn test_format_interval() {
        let rules = table().rs_to_dvs;
        assert_eq!(format_interval(&rules[0]), "(-inf, 10]");
        assert_eq!(format_interval(&rules[1]), "(10, 20]");
        assert_eq!(format_interval(&rules[2]), "(20, +inf)");
    }

    #[test]
    fn test_build_info_without_rules() {
        let info = build_calibration_info(&table(), false);
        assert_eq!(info.clocks.len(), 3);
        assert_eq!(info.clocks[1].native_unit, "ns");
        assert_eq!(info.tables[0].rule_count, 3);
        assert!(info.tables[0].rules.is_empty());
    }

    #[test]
    fn test_build_info_json() {
        let info = build_calibration_info(&table(), true);
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["tables"][0]["table"], "rs_to_dvs");
        assert_eq!(json["tables"][0]["rules"][1]["interval"], "(10, 20]");
        assert_eq!(json["clocks"][2]["sensor"], "rs");
    }
}
