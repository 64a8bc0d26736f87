use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::elo::elo_to_score;
use crate::tally::ResultTally;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SprtResult {
    /// Not enough data to make a conclusion
    Continue,
    /// H0 (null hypothesis) is accepted - no improvement detected
    AcceptH0,
    /// H1 (alternative hypothesis) is accepted - improvement detected
    AcceptH1,
}

impl SprtResult {
    pub fn is_terminal(self) -> bool {
        matches!(self, SprtResult::AcceptH0 | SprtResult::AcceptH1)
    }

    pub fn verdict_message(self) -> Option<&'static str> {
        match self {
            SprtResult::Continue => None,
            SprtResult::AcceptH0 => Some("H0 accepted"),
            SprtResult::AcceptH1 => Some("H1 accepted"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParameterError {
    #[error("{name} must be a finite number, got {value}")]
    NonFinite { name: &'static str, value: f64 },
    #[error("{name} must be strictly between 0 and 1, got {value}")]
    ErrorRateOutOfRange { name: &'static str, value: f64 },
    #[error("alpha + beta must be below 1 for the test to have a continuation region (alpha={alpha}, beta={beta})")]
    ErrorRatesTooLarge { alpha: f64, beta: f64 },
}

/// Hypotheses and target error rates of a test.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SprtParameters {
    /// H0: Elo difference is elo0 or less
    pub elo0: f64,
    /// H1: Elo difference is elo1 or more
    pub elo1: f64,
    /// Type I error (false positive) probability
    pub alpha: f64,
    /// Type II error (false negative) probability
    pub beta: f64,
}

impl Default for SprtParameters {
    fn default() -> Self {
        Self {
            elo0: 0.0,
            elo1: 4.0,
            alpha: 0.05,
            beta: 0.05,
        }
    }
}

impl SprtParameters {
    pub fn new(elo0: f64, elo1: f64, alpha: f64, beta: f64) -> Self {
        Self {
            elo0,
            elo1,
            alpha,
            beta,
        }
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        for (name, value) in [
            ("elo0", self.elo0),
            ("elo1", self.elo1),
            ("alpha", self.alpha),
            ("beta", self.beta),
        ] {
            if !value.is_finite() {
                return Err(ParameterError::NonFinite { name, value });
            }
        }

        for (name, value) in [("alpha", self.alpha), ("beta", self.beta)] {
            if value <= 0.0 || value >= 1.0 {
                return Err(ParameterError::ErrorRateOutOfRange { name, value });
            }
        }

        if self.alpha + self.beta >= 1.0 {
            return Err(ParameterError::ErrorRatesTooLarge {
                alpha: self.alpha,
                beta: self.beta,
            });
        }

        Ok(())
    }
}

/// Outcome of one evaluation, with everything needed to report it.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct SprtEvaluation {
    pub llr: f64,
    pub lower: f64,
    pub upper: f64,
    pub result: SprtResult,
}

impl SprtEvaluation {
    /// The report line without the verdict
    pub fn llr_line(&self) -> String {
        format!(
            "SPRT: LLR = {:.3} [{:.3},{:.3}]",
            self.llr, self.lower, self.upper
        )
    }
}

impl fmt::Display for SprtEvaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.llr_line())?;
        if let Some(message) = self.result.verdict_message() {
            write!(f, ". {}.", message)?;
        }
        Ok(())
    }
}

/// Sequential Probability Ratio Test over win/draw/loss counts, using the
/// normal approximation of the per-game score.
///
/// Holds no game results itself: every call is a pure function of the tally
/// it is handed and of the parameters fixed at construction.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SprtTester {
    params: SprtParameters,
    lower: f64,
    upper: f64,
    s0: f64,
    s1: f64,
}

impl SprtTester {
    pub fn new(params: SprtParameters) -> Self {
        Self {
            params,
            lower: (params.beta / (1.0 - params.alpha)).ln(),
            upper: ((1.0 - params.beta) / params.alpha).ln(),
            s0: elo_to_score(params.elo0),
            s1: elo_to_score(params.elo1),
        }
    }

    pub fn params(&self) -> &SprtParameters {
        &self.params
    }

    /// Boundary below which H0 is accepted
    pub fn lower(&self) -> f64 {
        self.lower
    }

    /// Boundary above which H1 is accepted
    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Calculates the log-likelihood ratio.
    /// Samples with fewer than two distinct outcome types have no variance, and score 0.
    pub fn log_likelihood_ratio(&self, tally: &ResultTally) -> f64 {
        if tally.distinct_non_zero_categories() < 2 {
            return 0.0;
        }

        let total = tally.total() as f64;
        let wins = tally.win as f64;
        let draws = tally.draw as f64;

        let score = (wins + 0.5 * draws) / total;
        let variance = (wins + 0.25 * draws) / total - score * score;

        (self.s1 - self.s0) * (2.0 * score - self.s0 - self.s1) / (2.0 * variance / total)
    }

    pub fn evaluate(&self, tally: &ResultTally) -> SprtEvaluation {
        let llr = self.log_likelihood_ratio(tally);

        let result = if llr > self.upper {
            SprtResult::AcceptH1
        } else if llr < self.lower {
            SprtResult::AcceptH0
        } else {
            SprtResult::Continue
        };

        SprtEvaluation {
            llr,
            lower: self.lower,
            upper: self.upper,
            result,
        }
    }
}
