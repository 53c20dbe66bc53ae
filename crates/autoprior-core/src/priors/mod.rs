// =============================================================================
// Prior Distributions
// =============================================================================
//
// A prior is a named distribution ("Normal", "HalfNormal", "HalfStudentT", ...)
// with named arguments. Arguments are scalars, vectors (one entry per design
// column), or whole priors for hierarchical terms:
//
//     Normal(mu: 0, sigma: HalfNormal(sigma: 2.5))
//
// Priors are values. Scaling routines never mutate a prior in place; they
// build an updated copy with `Prior::updated` and hand it back.
//
// AUTO-SCALING
// ------------
// The model-specification layer marks the priors it generated itself with
// `auto_scale = true`. Only those are overwritten. A component whose prior is
// a bare constant (`ComponentPrior::Constant`) has no flag at all and is
// never touched.
//
// =============================================================================

use std::collections::BTreeMap;
use std::fmt;

use ndarray::Array1;

// =============================================================================
// Values
// =============================================================================

/// A numeric prior parameter: one number, or one number per design column.
#[derive(Debug, Clone, PartialEq)]
pub enum PriorValue {
    Scalar(f64),
    Vector(Array1<f64>),
}

impl PriorValue {
    /// Collapse a one-element vector to a scalar.
    pub fn squeeze(values: Array1<f64>) -> Self {
        if values.len() == 1 {
            PriorValue::Scalar(values[0])
        } else {
            PriorValue::Vector(values)
        }
    }

    /// The value as a flat vector (a scalar becomes length one).
    pub fn to_array(&self) -> Array1<f64> {
        match self {
            PriorValue::Scalar(v) => Array1::from_elem(1, *v),
            PriorValue::Vector(v) => v.clone(),
        }
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            PriorValue::Scalar(v) => Some(*v),
            PriorValue::Vector(_) => None,
        }
    }

    pub fn as_vector(&self) -> Option<&Array1<f64>> {
        match self {
            PriorValue::Scalar(_) => None,
            PriorValue::Vector(v) => Some(v),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            PriorValue::Scalar(_) => 1,
            PriorValue::Vector(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<f64> for PriorValue {
    fn from(value: f64) -> Self {
        PriorValue::Scalar(value)
    }
}

impl From<Array1<f64>> for PriorValue {
    fn from(value: Array1<f64>) -> Self {
        PriorValue::Vector(value)
    }
}

impl fmt::Display for PriorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriorValue::Scalar(v) => write!(f, "{}", v),
            PriorValue::Vector(v) => {
                let items: Vec<String> = v.iter().map(|x| format!("{}", x)).collect();
                write!(f, "[{}]", items.join(", "))
            }
        }
    }
}

/// A prior argument: a number/vector or a nested (hyper)prior.
#[derive(Debug, Clone, PartialEq)]
pub enum PriorArg {
    Value(PriorValue),
    Prior(Box<Prior>),
}

impl From<PriorValue> for PriorArg {
    fn from(value: PriorValue) -> Self {
        PriorArg::Value(value)
    }
}

impl From<f64> for PriorArg {
    fn from(value: f64) -> Self {
        PriorArg::Value(PriorValue::Scalar(value))
    }
}

impl From<Array1<f64>> for PriorArg {
    fn from(value: Array1<f64>) -> Self {
        PriorArg::Value(PriorValue::Vector(value))
    }
}

impl From<Prior> for PriorArg {
    fn from(prior: Prior) -> Self {
        PriorArg::Prior(Box::new(prior))
    }
}

impl fmt::Display for PriorArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriorArg::Value(v) => write!(f, "{}", v),
            PriorArg::Prior(p) => write!(f, "{}", p),
        }
    }
}

/// Support transform applied to the sampled parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// The sampled vector is constrained to be strictly increasing.
    Ordered,
}

// =============================================================================
// Prior
// =============================================================================

/// A prior distribution with named arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Prior {
    name: String,
    args: BTreeMap<String, PriorArg>,
    transform: Option<Transform>,
    auto_scale: bool,
}

impl Prior {
    /// A new prior with no arguments, not eligible for auto-scaling.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: BTreeMap::new(),
            transform: None,
            auto_scale: false,
        }
    }

    /// Builder: set one argument.
    pub fn with_arg(mut self, key: &str, value: impl Into<PriorArg>) -> Self {
        self.args.insert(key.to_string(), value.into());
        self
    }

    /// Builder: set the support transform.
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Builder: mark the prior as eligible for auto-scaling.
    pub fn auto_scaled(mut self) -> Self {
        self.auto_scale = true;
        self
    }

    /// Copy of this prior with the given arguments replaced (others kept).
    pub fn updated<I, V>(&self, args: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, V)>,
        V: Into<PriorArg>,
    {
        let mut prior = self.clone();
        for (key, value) in args {
            prior.args.insert(key.to_string(), value.into());
        }
        prior
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// True if the distribution name matches `name`.
    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    pub fn auto_scale(&self) -> bool {
        self.auto_scale
    }

    pub fn transform(&self) -> Option<Transform> {
        self.transform
    }

    pub fn arg(&self, key: &str) -> Option<&PriorArg> {
        self.args.get(key)
    }

    /// Numeric argument `key`, if present and not a nested prior.
    pub fn value(&self, key: &str) -> Option<&PriorValue> {
        match self.arg(key) {
            Some(PriorArg::Value(v)) => Some(v),
            _ => None,
        }
    }

    /// Nested prior under `key`, if present.
    pub fn hyperprior(&self, key: &str) -> Option<&Prior> {
        match self.arg(key) {
            Some(PriorArg::Prior(p)) => Some(p),
            _ => None,
        }
    }
}

impl fmt::Display for Prior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args: Vec<String> = self
            .args
            .iter()
            .map(|(k, v)| format!("{}: {}", k, v))
            .collect();
        write!(f, "{}({})", self.name, args.join(", "))
    }
}

// =============================================================================
// Component priors
// =============================================================================

/// Prior attached to a constant (non-hierarchical) model component.
///
/// Constants are fixed numbers, e.g. a known dispersion, and carry no
/// auto-scale flag.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentPrior {
    Constant(f64),
    Distribution(Prior),
}

impl ComponentPrior {
    /// The prior, if it is a distribution marked for auto-scaling.
    pub fn auto_scaled(&self) -> Option<&Prior> {
        match self {
            ComponentPrior::Distribution(p) if p.auto_scale() => Some(p),
            _ => None,
        }
    }

    pub fn as_prior(&self) -> Option<&Prior> {
        match self {
            ComponentPrior::Distribution(p) => Some(p),
            ComponentPrior::Constant(_) => None,
        }
    }
}

impl From<Prior> for ComponentPrior {
    fn from(prior: Prior) -> Self {
        ComponentPrior::Distribution(prior)
    }
}

impl From<f64> for ComponentPrior {
    fn from(value: f64) -> Self {
        ComponentPrior::Constant(value)
    }
}
