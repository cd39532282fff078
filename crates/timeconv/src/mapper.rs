//! Piecewise-linear interval mapping.
//!
//! A rule table is an ordered list of `IntervalRule`s. A timestamp is mapped
//! by the rule whose interval contains it. Inner intervals are left-open and
//! right-closed so that consecutive change-points `(a, b]`, `(b, c]` never
//! both claim `b`.
//!
//! Overlapping rules resolve last-write-wins on both the scalar and the
//! batch path.

use contracts::{ContractError, IntervalRule, RuleBounds};

/// Table name used in errors when the rules are not one of the named tables
const ANONYMOUS_TABLE: &str = "rules";

/// Maps timestamps through one ordered rule table
#[derive(Debug, Clone, Copy)]
pub struct IntervalMapper<'a> {
    table: &'a str,
    rules: &'a [IntervalRule],
}

impl<'a> IntervalMapper<'a> {
    pub fn new(rules: &'a [IntervalRule]) -> Self {
        Self::named(ANONYMOUS_TABLE, rules)
    }

    /// Mapper whose errors mention `table`
    pub fn named(table: &'a str, rules: &'a [IntervalRule]) -> Self {
        Self { table, rules }
    }

    /// Map a single timestamp.
    ///
    /// # Errors
    /// - `InvalidRule` if any rule of the table is malformed
    /// - `NoMatchingInterval` if no rule contains `x`
    pub fn map_scalar(&self, x: f64) -> Result<f64, ContractError> {
        let bounds = self.resolve()?;
        self.last_match(&bounds, x)
            .ok_or_else(|| ContractError::no_matching_interval(self.table, x))
    }

    /// Map a batch of timestamps.
    ///
    /// Positions no rule contains are left at `0.0`.
    ///
    /// # Errors
    /// - `InvalidRule` if any rule of the table is malformed
    pub fn map_batch(&self, xs: &[f64]) -> Result<Vec<f64>, ContractError> {
        let bounds = self.resolve()?;
        Ok(xs
            .iter()
            .map(|&x| self.last_match(&bounds, x).unwrap_or(0.0))
            .collect())
    }

    /// Index of the rule that maps `x`, if any
    pub fn matching_rule(&self, x: f64) -> Result<Option<usize>, ContractError> {
        let bounds = self.resolve()?;
        Ok(bounds.iter().rposition(|b| b.contains(x)))
    }

    /// Membership tests of all rules, failing on the first malformed one
    fn resolve(&self) -> Result<Vec<RuleBounds>, ContractError> {
        self.rules
            .iter()
            .enumerate()
            .map(|(index, rule)| {
                rule.bounds()
                    .map_err(|msg| ContractError::invalid_rule(self.table, index, msg))
            })
            .collect()
    }

    /// Shared per-element evaluation: the last rule containing `x` wins.
    #[inline]
    fn last_match(&self, bounds: &[RuleBounds], x: f64) -> Option<f64> {
        bounds
            .iter()
            .rposition(|b| b.contains(x))
            .map(|index| self.rules[index].apply(x))
    }
}

/// Membership test of a single rule
///
/// # Errors
/// - `InvalidRule` if the rule is neither inner nor correctly single-sided
pub fn rule_matches(rule: &IntervalRule, t: f64) -> Result<bool, ContractError> {
    rule.bounds()
        .map(|b| b.contains(t))
        .map_err(ContractError::malformed_rule)
}

/// Map a single timestamp through `rules`
pub fn map_scalar(rules: &[IntervalRule], x: f64) -> Result<f64, ContractError> {
    IntervalMapper::new(rules).map_scalar(x)
}

/// Map a batch of timestamps through `rules`
pub fn map_batch(rules: &[IntervalRule], xs: &[f64]) -> Result<Vec<f64>, ContractError> {
    IntervalMapper::new(rules).map_batch(xs)
}
