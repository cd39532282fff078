//! Calibration validation
//!
//! Hard errors:
//! - every rule is inner-bounded or correctly single-sided
//!
//! Warnings (the table still loads):
//! - empty rule tables
//! - rules that can never match (`lo >= hi`)
//! - overlapping rules, resolved last-write-wins at conversion time
//! - gaps in the coverage of a table
//! - zero timestamp scale (relative -> native fails for that sensor)

use std::fmt;

use contracts::{CalibrationTable, ContractError, CrossSensor, IntervalRule, Sensor};

/// Non-fatal findings of a validation pass
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// A suspicious but loadable calibration detail
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationWarning {
    EmptyTable {
        table: CrossSensor,
    },
    EmptyInterval {
        table: CrossSensor,
        index: usize,
    },
    Overlap {
        table: CrossSensor,
        first: usize,
        second: usize,
    },
    /// Timestamps in `(from, to]` match no rule
    Gap {
        table: CrossSensor,
        from: f64,
        to: f64,
    },
    ZeroScale {
        sensor: Sensor,
    },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTable { table } => write!(f, "{table}: table has no rules"),
            Self::EmptyInterval { table, index } => {
                write!(f, "{table}[{index}]: interval is empty and never matches")
            }
            Self::Overlap {
                table,
                first,
                second,
            } => write!(
                f,
                "{table}[{first}] and {table}[{second}] overlap, the later rule wins"
            ),
            Self::Gap { table, from, to } => {
                write!(f, "{table}: timestamps in ({from}, {to}] match no rule")
            }
            Self::ZeroScale { sensor } => write!(
                f,
                "{sensor}_timestamp_scale is 0, relative -> native conversion will fail"
            ),
        }
    }
}

/// Validate a CalibrationTable
///
/// Returns the first malformed rule as an error, otherwise the warnings.
pub fn validate(table: &CalibrationTable) -> Result<ValidationReport, ContractError> {
    let mut report = ValidationReport::default();
    for kind in CrossSensor::ALL {
        validate_rule_table(kind, table.rules(kind), &mut report)?;
    }
    validate_clocks(table, &mut report);
    Ok(report)
}

/// Validate one rule table
fn validate_rule_table(
    kind: CrossSensor,
    rules: &[IntervalRule],
    report: &mut ValidationReport,
) -> Result<(), ContractError> {
    if rules.is_empty() {
        report.warnings.push(ValidationWarning::EmptyTable { table: kind });
        return Ok(());
    }

    let mut spans = Vec::with_capacity(rules.len());
    for (index, rule) in rules.iter().enumerate() {
        let bounds = rule
            .bounds()
            .map_err(|msg| ContractError::invalid_rule(kind.key(), index, msg))?;
        if bounds.is_empty() {
            report
                .warnings
                .push(ValidationWarning::EmptyInterval { table: kind, index });
            continue;
        }
        spans.push((index, bounds.span()));
    }

    find_overlaps(kind, &spans, report);
    find_gaps(kind, &spans, report);
    Ok(())
}

/// Half-open spans `(lo, hi]` overlap iff `max(lo) < min(hi)`
fn find_overlaps(kind: CrossSensor, spans: &[(usize, (f64, f64))], report: &mut ValidationReport) {
    for (i, &(first, (lo_a, hi_a))) in spans.iter().enumerate() {
        for &(second, (lo_b, hi_b)) in &spans[i + 1..] {
            if lo_a.max(lo_b) < hi_a.min(hi_b) {
                report.warnings.push(ValidationWarning::Overlap {
                    table: kind,
                    first,
                    second,
                });
            }
        }
    }
}

fn find_gaps(kind: CrossSensor, spans: &[(usize, (f64, f64))], report: &mut ValidationReport) {
    if spans.is_empty() {
        return;
    }

    let mut sorted: Vec<(f64, f64)> = spans.iter().map(|(_, span)| *span).collect();
    sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

    // Everything up to and including `reach` is covered.
    let mut reach = f64::NEG_INFINITY;
    for (lo, hi) in sorted {
        if lo > reach {
            report.warnings.push(ValidationWarning::Gap {
                table: kind,
                from: reach,
                to: lo,
            });
        }
        reach = reach.max(hi);
    }
    if reach < f64::INFINITY {
        report.warnings.push(ValidationWarning::Gap {
            table: kind,
            from: reach,
            to: f64::INFINITY,
        });
    }
}

fn validate_clocks(table: &CalibrationTable, report: &mut ValidationReport) {
    for sensor in Sensor::ALL {
        if table.clock(sensor).scale == 0.0 {
            report.warnings.push(ValidationWarning::ZeroScale { sensor });
        }
    }
}
