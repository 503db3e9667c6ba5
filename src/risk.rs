//! Threshold-based risk bucketing.
//!
//! A [`ThresholdTable`] maps a continuous metric onto a [`RiskLevel`].
//! Bounds are inclusive upper limits checked in ascending order; the
//! first bound the value does not exceed wins, and anything above the
//! last bound falls into the terminal level.

use crate::error::ThresholdError;
use crate::models::RiskLevel;
use serde::Serialize;

/// Default dispute-rate cut points, in percent.
pub const DISPUTE_RATE_BOUNDS: [f64; 2] = [2.0, 5.0];

/// Default fraud risk-score cut points, on a 0-100 scale.
pub const RISK_SCORE_BOUNDS: [f64; 3] = [30.0, 60.0, 80.0];

/// Ordered threshold table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdTable {
    steps: Vec<(f64, RiskLevel)>,
    terminal: RiskLevel,
}

impl ThresholdTable {
    /// Build a table from `(upper_bound, level)` steps and a terminal level.
    pub fn new(steps: Vec<(f64, RiskLevel)>, terminal: RiskLevel) -> Result<Self, ThresholdError> {
        if steps.is_empty() {
            return Err(ThresholdError::Empty);
        }

        for (bound, _) in &steps {
            if !bound.is_finite() {
                return Err(ThresholdError::NonFinite(*bound));
            }
        }

        for pair in steps.windows(2) {
            let ((previous, lo), (next, hi)) = (pair[0], pair[1]);
            if next <= previous {
                return Err(ThresholdError::NotAscending { previous, next });
            }
            if hi < lo {
                return Err(ThresholdError::LevelsDecrease);
            }
        }

        if let Some((_, last)) = steps.last() {
            if terminal < *last {
                return Err(ThresholdError::LevelsDecrease);
            }
        }

        Ok(Self { steps, terminal })
    }

    /// Dispute-rate table: low / medium / high.
    pub fn dispute_rate(bounds: &[f64]) -> Result<Self, ThresholdError> {
        if bounds.len() != 2 {
            return Err(ThresholdError::WrongArity {
                expected: 2,
                actual: bounds.len(),
            });
        }
        Self::new(
            vec![(bounds[0], RiskLevel::Low), (bounds[1], RiskLevel::Medium)],
            RiskLevel::High,
        )
    }

    /// Fraud risk-score table: low / medium / high / critical.
    pub fn risk_score(bounds: &[f64]) -> Result<Self, ThresholdError> {
        if bounds.len() != 3 {
            return Err(ThresholdError::WrongArity {
                expected: 3,
                actual: bounds.len(),
            });
        }
        Self::new(
            vec![
                (bounds[0], RiskLevel::Low),
                (bounds[1], RiskLevel::Medium),
                (bounds[2], RiskLevel::High),
            ],
            RiskLevel::Critical,
        )
    }

    /// Map a value to its level. NaN lands in the terminal level.
    pub fn bucket(&self, value: f64) -> RiskLevel {
        self.steps
            .iter()
            .find(|(bound, _)| value <= *bound)
            .map(|(_, level)| *level)
            .unwrap_or(self.terminal)
    }
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self {
            steps: vec![
                (DISPUTE_RATE_BOUNDS[0], RiskLevel::Low),
                (DISPUTE_RATE_BOUNDS[1], RiskLevel::Medium),
            ],
            terminal: RiskLevel::High,
        }
    }
}

/// Disputes as a percentage of completed transactions.
///
/// An agent with no completed transactions has a rate of zero.
pub fn dispute_rate(disputes: f64, completed: f64) -> f64 {
    if completed == 0.0 {
        return 0.0;
    }
    disputes * 100.0 / completed
}
