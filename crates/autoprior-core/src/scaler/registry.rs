// =============================================================================
// Scaling Registry
// =============================================================================
//
// Records what the common-term scaler produced so the intercept scaler can
// correct for uncentered predictors. It lives for one scaling pass and is
// passed explicitly between stages.
//
// =============================================================================

use ndarray::Array1;

use crate::priors::PriorValue;

/// Scaled parameters of one common term.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledTerm {
    pub mu: PriorValue,
    pub sigma: PriorValue,
    /// Mean of each design column of the term, same length as `sigma`.
    pub column_means: Array1<f64>,
}

/// Common-term results in registration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScalingRegistry {
    entries: Vec<(String, ScaledTerm)>,
}

impl ScalingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a term. Re-registering a name replaces the earlier entry.
    pub fn insert(&mut self, name: impl Into<String>, scaled: ScaledTerm) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, entry)) => *entry = scaled,
            None => self.entries.push((name, scaled)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ScaledTerm> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, entry)| entry)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ScaledTerm)> {
        self.entries.iter().map(|(n, e)| (n.as_str(), e))
    }

    /// Σ σ_j² · x̄_j² over every column of every registered term.
    pub fn centering_variance(&self) -> f64 {
        self.entries
            .iter()
            .map(|(_, entry)| {
                entry
                    .sigma
                    .to_array()
                    .iter()
                    .zip(entry.column_means.iter())
                    .map(|(s, m)| s.powi(2) * m.powi(2))
                    .sum::<f64>()
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn entry(sigma: PriorValue, means: Array1<f64>) -> ScaledTerm {
        let mu = match &sigma {
            PriorValue::Scalar(_) => PriorValue::Scalar(0.0),
            PriorValue::Vector(v) => PriorValue::Vector(Array1::zeros(v.len())),
        };
        ScaledTerm {
            mu,
            sigma,
            column_means: means,
        }
    }

    #[test]
    fn test_insert_replaces_by_name() {
        let mut registry = ScalingRegistry::new();
        registry.insert("x", entry(PriorValue::Scalar(1.0), array![0.0]));
        registry.insert("z", entry(PriorValue::Scalar(2.0), array![0.0]));
        registry.insert("x", entry(PriorValue::Scalar(5.0), array![0.0]));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("x").unwrap().sigma, PriorValue::Scalar(5.0));
        let names: Vec<&str> = registry.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["x", "z"]);
    }

    #[test]
    fn test_centering_variance_mixes_scalar_and_vector_terms() {
        let mut registry = ScalingRegistry::new();
        registry.insert("x", entry(PriorValue::Scalar(2.0), array![3.0]));
        registry.insert(
            "g",
            entry(PriorValue::Vector(array![1.0, 0.5]), array![0.25, 0.5]),
        );
        // 4*9 + 1*0.0625 + 0.25*0.25
        assert_abs_diff_eq!(registry.centering_variance(), 36.125, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_registry() {
        let registry = ScalingRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.centering_variance(), 0.0);
    }
}
