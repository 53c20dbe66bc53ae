// =============================================================================
// Link Functions
// =============================================================================
//
// A link function g maps a distributional parameter to the linear predictor:
//
//     g(θ) = η = Xβ
//
// The prior scaler never evaluates a link. It only needs to know WHICH link
// a parameter uses, because binary-outcome models on the logit/probit scale
// get their own fixed-width defaults instead of the data-driven rule.
//
// =============================================================================

use std::fmt;
use std::str::FromStr;

use crate::error::AutoPriorError;

/// Link function identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Link {
    Identity,
    Log,
    Logit,
    Probit,
    Cloglog,
    Inverse,
    InverseSquared,
    Softmax,
    /// Half-angle tangent link used for circular means.
    Tan2,
}

impl Link {
    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Link::Identity => "identity",
            Link::Log => "log",
            Link::Logit => "logit",
            Link::Probit => "probit",
            Link::Cloglog => "cloglog",
            Link::Inverse => "inverse",
            Link::InverseSquared => "inverse_squared",
            Link::Softmax => "softmax",
            Link::Tan2 => "tan_2",
        }
    }

    /// True for the two links whose linear predictor lives on a standard
    /// logistic-like scale (used by the binary-outcome special cases).
    pub fn is_logistic_scale(self) -> bool {
        matches!(self, Link::Logit | Link::Probit)
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Link {
    type Err = AutoPriorError;

    /// Parse a link name, case-insensitively, accepting a few common aliases.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim().to_lowercase().as_str() {
            "identity" => Ok(Link::Identity),
            "log" => Ok(Link::Log),
            "logit" => Ok(Link::Logit),
            "probit" => Ok(Link::Probit),
            "cloglog" => Ok(Link::Cloglog),
            "inverse" | "inverse_power" => Ok(Link::Inverse),
            "inverse_squared" => Ok(Link::InverseSquared),
            "softmax" => Ok(Link::Softmax),
            "tan_2" | "tan2" => Ok(Link::Tan2),
            _ => Err(AutoPriorError::InvalidValue(format!(
                "Unknown link '{}'. Use 'identity', 'log', 'logit', 'probit', 'cloglog', \
                 'inverse', 'inverse_squared', 'softmax', or 'tan_2'.",
                name
            ))),
        }
    }
}
