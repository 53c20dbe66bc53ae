// =============================================================================
// Response Families
// =============================================================================
//
// A family describes the distribution of the response and which link each of
// its parameters uses. For prior scaling, the family decides four things:
//
//   1. Is the response on a free real scale? (Gaussian, StudentT)
//      If so, its mean/std drive every data-driven prior width.
//   2. Which secondary parameter (dispersion, concentration) gets an
//      automatic HalfStudentT prior?
//   3. Are slopes on a logistic scale? (Bernoulli/Binomial + logit/probit)
//   4. Does the family have cut-points, and must they be ordered?
//
// All four answers are collected into a `ScalingPolicy` with ONE match on the
// family variant. Scaling routines consult the policy and never re-inspect
// the family themselves.
//
// =============================================================================

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::AutoPriorError;
use crate::links::Link;

/// Closed set of response families the scaler knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FamilyKind {
    Gaussian,
    StudentT,
    Bernoulli,
    Binomial,
    Poisson,
    NegativeBinomial,
    Gamma,
    Beta,
    Exponential,
    Wald,
    VonMises,
    /// Ordinal regression with cumulative link.
    Cumulative,
    /// Ordinal regression with sequential (stopping-ratio) link.
    StoppingRatio,
}

impl FamilyKind {
    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            FamilyKind::Gaussian => "gaussian",
            FamilyKind::StudentT => "t",
            FamilyKind::Bernoulli => "bernoulli",
            FamilyKind::Binomial => "binomial",
            FamilyKind::Poisson => "poisson",
            FamilyKind::NegativeBinomial => "negativebinomial",
            FamilyKind::Gamma => "gamma",
            FamilyKind::Beta => "beta",
            FamilyKind::Exponential => "exponential",
            FamilyKind::Wald => "wald",
            FamilyKind::VonMises => "vonmises",
            FamilyKind::Cumulative => "cumulative",
            FamilyKind::StoppingRatio => "sratio",
        }
    }

    /// Name of the parameter modelled by the main linear predictor.
    pub fn parent(self) -> &'static str {
        match self {
            FamilyKind::Bernoulli
            | FamilyKind::Binomial
            | FamilyKind::Cumulative
            | FamilyKind::StoppingRatio => "p",
            _ => "mu",
        }
    }

    /// Default link for every parameter of the family.
    fn default_links(self) -> Vec<(&'static str, Link)> {
        match self {
            FamilyKind::Gaussian => vec![("mu", Link::Identity), ("sigma", Link::Log)],
            FamilyKind::StudentT => vec![
                ("mu", Link::Identity),
                ("sigma", Link::Log),
                ("nu", Link::Log),
            ],
            FamilyKind::Bernoulli | FamilyKind::Binomial => vec![("p", Link::Logit)],
            FamilyKind::Poisson | FamilyKind::Exponential => vec![("mu", Link::Log)],
            FamilyKind::NegativeBinomial => vec![("mu", Link::Log), ("alpha", Link::Log)],
            FamilyKind::Gamma => vec![("mu", Link::Inverse), ("alpha", Link::Log)],
            FamilyKind::Beta => vec![("mu", Link::Logit), ("kappa", Link::Log)],
            FamilyKind::Wald => vec![("mu", Link::InverseSquared), ("lam", Link::Log)],
            FamilyKind::VonMises => vec![("mu", Link::Tan2), ("kappa", Link::Log)],
            FamilyKind::Cumulative | FamilyKind::StoppingRatio => {
                vec![("p", Link::Logit), ("threshold", Link::Identity)]
            }
        }
    }
}

impl fmt::Display for FamilyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FamilyKind {
    type Err = AutoPriorError;

    /// Parse a family name, case-insensitively, accepting common aliases.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim().to_lowercase().as_str() {
            "gaussian" | "normal" => Ok(FamilyKind::Gaussian),
            "t" | "studentt" | "student_t" => Ok(FamilyKind::StudentT),
            "bernoulli" => Ok(FamilyKind::Bernoulli),
            "binomial" => Ok(FamilyKind::Binomial),
            "poisson" => Ok(FamilyKind::Poisson),
            "negativebinomial" | "negative_binomial" | "negbinomial" => {
                Ok(FamilyKind::NegativeBinomial)
            }
            "gamma" => Ok(FamilyKind::Gamma),
            "beta" => Ok(FamilyKind::Beta),
            "exponential" => Ok(FamilyKind::Exponential),
            "wald" => Ok(FamilyKind::Wald),
            "vonmises" | "von_mises" => Ok(FamilyKind::VonMises),
            "cumulative" => Ok(FamilyKind::Cumulative),
            "sratio" | "stopping_ratio" | "stoppingratio" => Ok(FamilyKind::StoppingRatio),
            _ => Err(AutoPriorError::InvalidValue(format!(
                "Unknown family '{}'",
                name
            ))),
        }
    }
}

// =============================================================================
// Family
// =============================================================================

/// A response family together with the link used by each of its parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Family {
    kind: FamilyKind,
    links: BTreeMap<String, Link>,
}

impl Family {
    /// Family with its default links.
    pub fn new(kind: FamilyKind) -> Self {
        let links = kind
            .default_links()
            .into_iter()
            .map(|(param, link)| (param.to_string(), link))
            .collect();
        Self { kind, links }
    }

    /// Override the link of one parameter.
    pub fn with_link(mut self, param: &str, link: Link) -> Self {
        self.links.insert(param.to_string(), link);
        self
    }

    pub fn kind(&self) -> FamilyKind {
        self.kind
    }

    /// Name of the parameter modelled by the main linear predictor.
    pub fn parent(&self) -> &'static str {
        self.kind.parent()
    }

    /// Link used by `param`, if the family has such a parameter.
    pub fn link(&self, param: &str) -> Option<Link> {
        self.links.get(param).copied()
    }

    /// Link used by the parent parameter.
    pub fn parent_link(&self) -> Option<Link> {
        self.link(self.parent())
    }

    /// Derive the scaling decisions for this family.
    pub fn scaling_policy(&self) -> ScalingPolicy {
        ScalingPolicy::from(self)
    }
}

// =============================================================================
// Scaling Policy
// =============================================================================

/// How slope and intercept widths are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlopeRule {
    /// Width proportional to σ_y / std(x).
    DataDriven,
    /// Binary outcome on the logit/probit scale: fixed unit-free widths.
    Logistic,
}

/// Cut-point prior shape for ordinal families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdRule {
    /// Evenly spaced means on [-span, span], constrained to be increasing.
    Ordered,
    /// Zero means, no ordering constraint.
    Unordered,
}

/// Every family-dependent decision made by the scaler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalingPolicy {
    /// Whether the response mean/std are taken from the data.
    pub standardize_response: bool,
    /// Secondary response parameter that gets a HalfStudentT default.
    pub auxiliary: Option<&'static str>,
    pub slopes: SlopeRule,
    pub threshold: Option<ThresholdRule>,
}

impl From<&Family> for ScalingPolicy {
    fn from(family: &Family) -> Self {
        let logistic = family.parent_link().is_some_and(Link::is_logistic_scale);
        let data_driven = Self {
            standardize_response: false,
            auxiliary: None,
            slopes: SlopeRule::DataDriven,
            threshold: None,
        };

        match family.kind() {
            FamilyKind::Gaussian | FamilyKind::StudentT => Self {
                standardize_response: true,
                auxiliary: Some("sigma"),
                ..data_driven
            },
            FamilyKind::VonMises => Self {
                auxiliary: Some("kappa"),
                ..data_driven
            },
            FamilyKind::Bernoulli | FamilyKind::Binomial if logistic => Self {
                slopes: SlopeRule::Logistic,
                ..data_driven
            },
            FamilyKind::Cumulative => Self {
                threshold: Some(ThresholdRule::Ordered),
                ..data_driven
            },
            FamilyKind::StoppingRatio => Self {
                threshold: Some(ThresholdRule::Unordered),
                ..data_driven
            },
            _ => data_driven,
        }
    }
}
