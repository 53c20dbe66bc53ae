// =============================================================================
// Model Terms
// =============================================================================
//
// Terms are the pieces of a linear predictor, already classified and encoded
// by the model-specification layer:
//
//   - InterceptTerm:     the constant column
//   - CommonTerm:        population-level (fixed-effect) slopes, categorical
//                        dummies, and interactions
//   - GroupSpecificTerm: group-level (random-effect) intercepts and slopes
//
// Design data arrives either as one column (`DesignData::Vector`) or as an
// n × k block (`DesignData::Matrix`) for multi-level categoricals and
// multi-column interactions. The distinction matters: a vector term gets
// scalar prior parameters, a matrix term gets one entry per column.
//
// =============================================================================

use ndarray::{Array1, Array2, ArrayView2, Axis};

use crate::priors::Prior;

/// Encoded design columns for one term.
#[derive(Debug, Clone, PartialEq)]
pub enum DesignData {
    Vector(Array1<f64>),
    Matrix(Array2<f64>),
}

impl DesignData {
    /// Number of observations.
    pub fn nrows(&self) -> usize {
        match self {
            DesignData::Vector(v) => v.len(),
            DesignData::Matrix(m) => m.nrows(),
        }
    }

    /// Number of design columns (a vector counts as one).
    pub fn ncols(&self) -> usize {
        match self {
            DesignData::Vector(_) => 1,
            DesignData::Matrix(m) => m.ncols(),
        }
    }

    pub fn is_vector(&self) -> bool {
        matches!(self, DesignData::Vector(_))
    }

    /// View the data as n × k, turning a vector into a single column.
    pub fn as_matrix(&self) -> ArrayView2<'_, f64> {
        match self {
            DesignData::Vector(v) => v.view().insert_axis(Axis(1)),
            DesignData::Matrix(m) => m.view(),
        }
    }

    /// Mean of each column. Empty data gives NaN means.
    pub fn column_means(&self) -> Array1<f64> {
        let m = self.as_matrix();
        m.mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::from_elem(m.ncols(), f64::NAN))
    }
}

impl From<Array1<f64>> for DesignData {
    fn from(data: Array1<f64>) -> Self {
        DesignData::Vector(data)
    }
}

impl From<Array2<f64>> for DesignData {
    fn from(data: Array2<f64>) -> Self {
        DesignData::Matrix(data)
    }
}

/// Kind of a variable entering a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    Numeric,
    Categorical,
}

// =============================================================================
// Response
// =============================================================================

/// Observed response values.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseTerm {
    pub name: String,
    pub data: Array1<f64>,
}

impl ResponseTerm {
    pub fn new(name: impl Into<String>, data: Array1<f64>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Number of distinct observed values (the category count for ordinal
    /// responses). NaNs are ignored.
    pub fn n_levels(&self) -> usize {
        let mut values: Vec<f64> = self.data.iter().copied().filter(|v| !v.is_nan()).collect();
        values.sort_by(f64::total_cmp);
        values.dedup();
        values.len()
    }
}

// =============================================================================
// Intercept
// =============================================================================

/// The population-level intercept.
#[derive(Debug, Clone, PartialEq)]
pub struct InterceptTerm {
    pub name: String,
    pub prior: Prior,
}

impl InterceptTerm {
    pub fn new(prior: Prior) -> Self {
        Self {
            name: "Intercept".to_string(),
            prior,
        }
    }
}

// =============================================================================
// Common terms
// =============================================================================

/// A population-level (fixed-effect) term.
#[derive(Debug, Clone, PartialEq)]
pub struct CommonTerm {
    pub name: String,
    pub data: DesignData,
    /// True for a single categorical predictor (dummy-encoded).
    pub categorical: bool,
    /// Kinds of the variables multiplied together, for interaction terms.
    pub interaction: Option<Vec<VariableKind>>,
    pub prior: Prior,
}

impl CommonTerm {
    /// A numeric predictor.
    pub fn numeric(name: impl Into<String>, data: impl Into<DesignData>, prior: Prior) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
            categorical: false,
            interaction: None,
            prior,
        }
    }

    /// A categorical predictor, already encoded as dummy column(s).
    pub fn categorical(name: impl Into<String>, data: impl Into<DesignData>, prior: Prior) -> Self {
        Self {
            categorical: true,
            ..Self::numeric(name, data, prior)
        }
    }

    /// An interaction of the given variable kinds.
    pub fn interaction(
        name: impl Into<String>,
        data: impl Into<DesignData>,
        components: Vec<VariableKind>,
        prior: Prior,
    ) -> Self {
        Self {
            interaction: Some(components),
            ..Self::numeric(name, data, prior)
        }
    }

    pub fn is_interaction(&self) -> bool {
        self.interaction.is_some()
    }

    /// For interactions: true if every component is categorical.
    pub fn all_categorical_components(&self) -> bool {
        self.interaction
            .as_ref()
            .is_some_and(|c| c.iter().all(|k| *k == VariableKind::Categorical))
    }
}

// =============================================================================
// Group-specific terms
// =============================================================================

/// Role of a group-specific term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupTermKind {
    /// `(1 | group)`
    Intercept,
    /// `(x | group)`
    Slope,
}

/// A group-level (random-effect) term.
///
/// `predictor` is the term's expression before it is multiplied by the group
/// indicators, i.e. what the term would look like as a common term.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSpecificTerm {
    pub name: String,
    pub kind: GroupTermKind,
    pub predictor: DesignData,
    /// Typically `Normal(mu: 0, sigma: HalfNormal(sigma: ...))`.
    pub prior: Prior,
}

impl GroupSpecificTerm {
    pub fn intercept(name: impl Into<String>, n_obs: usize, prior: Prior) -> Self {
        Self {
            name: name.into(),
            kind: GroupTermKind::Intercept,
            predictor: DesignData::Vector(Array1::ones(n_obs)),
            prior,
        }
    }

    pub fn slope(name: impl Into<String>, predictor: impl Into<DesignData>, prior: Prior) -> Self {
        Self {
            name: name.into(),
            kind: GroupTermKind::Slope,
            predictor: predictor.into(),
            prior,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_vector_as_matrix() {
        let data = DesignData::from(array![1.0, 2.0, 3.0]);
        let m = data.as_matrix();
        assert_eq!(m.shape(), &[3, 1]);
        assert_eq!(data.ncols(), 1);
        assert!(data.is_vector());
    }

    #[test]
    fn test_column_means() {
        let data = DesignData::from(array![[1.0, 0.0], [3.0, 1.0]]);
        assert_eq!(data.column_means(), array![2.0, 0.5]);

        let data = DesignData::from(array![2.0, 4.0]);
        assert_eq!(data.column_means(), array![3.0]);
    }

    #[test]
    fn test_n_levels() {
        let response = ResponseTerm::new("y", array![0.0, 2.0, 1.0, 2.0, 3.0, 0.0]);
        assert_eq!(response.n_levels(), 4);
    }

    #[test]
    fn test_interaction_components() {
        let prior = Prior::new("Normal");
        let cat = CommonTerm::interaction(
            "a:b",
            array![[1.0, 0.0], [0.0, 1.0]],
            vec![VariableKind::Categorical, VariableKind::Categorical],
            prior.clone(),
        );
        assert!(cat.is_interaction());
        assert!(cat.all_categorical_components());

        let mixed = CommonTerm::interaction(
            "a:x",
            array![[1.5, 0.0], [0.0, 2.0]],
            vec![VariableKind::Categorical, VariableKind::Numeric],
            prior.clone(),
        );
        assert!(!mixed.all_categorical_components());

        let single = CommonTerm::categorical("a", array![1.0, 0.0], prior);
        assert!(!single.is_interaction());
        assert!(!single.all_categorical_components());
    }
}
