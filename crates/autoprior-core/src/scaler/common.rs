// =============================================================================
// Common-Term Scaler
// =============================================================================
//
// Population-level slopes get a Normal(0, σ) prior with σ chosen so that a
// one-standard-deviation change in the predictor moves the linear predictor by
// about 2.5 response standard deviations:
//
//     σ = 2.5 · σ_y / sd(x)
//
// BINARY OUTCOMES ON THE LOGIT/PROBIT SCALE
// -----------------------------------------
// The response has no free scale, so the widths are fixed per column:
//
//   - dummy columns (categorical term, all-categorical interaction):  σ = 1
//   - numeric column:                                        σ = 1 / sd(x)
//   - multi-column interaction with a numeric factor:  σ = 1 / sd(Σ_cols x)
//
// The last case uses the row-sum because each column holds the numeric
// variable restricted to one level of the categorical factor; their sum is the
// numeric variable itself, whose marginal spread is what matters.
//
// =============================================================================

use ndarray::{Array1, ArrayView1, Axis};

use crate::error::{AutoPriorError, Result};
use crate::families::SlopeRule;
use crate::priors::{Prior, PriorValue};
use crate::terms::{CommonTerm, DesignData};

use super::registry::ScaledTerm;
use super::stats::{predictor_std, slope_sigma};
use super::ScalingContext;

/// Outcome of scaling one common term.
#[derive(Debug, Clone, PartialEq)]
pub struct CommonScaling {
    /// The term's prior with `mu` and `sigma` replaced.
    pub prior: Prior,
    /// What to record in the registry under the term's name.
    pub entry: ScaledTerm,
}

/// Scale one common term.
///
/// Returns `Ok(None)` when the term's prior is not an auto-scaled Normal.
///
/// # Errors
/// `EmptyInput` if the term has no rows. `DegeneratePredictor` if a column
/// mean is not finite or a width would require dividing by a zero standard
/// deviation.
pub fn scale_common(term: &CommonTerm, ctx: &ScalingContext) -> Result<Option<CommonScaling>> {
    if !term.prior.auto_scale() || !term.prior.is("Normal") {
        log::trace!("skipping common term '{}' ({})", term.name, term.prior);
        return Ok(None);
    }

    // The intercept reads these back, even for the fixed-width dummy columns
    if term.data.nrows() == 0 {
        return Err(AutoPriorError::EmptyInput(format!(
            "common term '{}' has no observations",
            term.name
        )));
    }
    let column_means = term.data.column_means();
    if let Some(column) = column_means.iter().position(|m| !m.is_finite()) {
        return Err(AutoPriorError::DegeneratePredictor {
            term: term.name.clone(),
            column,
        });
    }

    let sigmas = match ctx.policy.slopes {
        SlopeRule::DataDriven => data_driven_sigmas(term, ctx)?,
        SlopeRule::Logistic => logistic_sigmas(term)?,
    };

    let (mu, sigma) = match term.data {
        DesignData::Vector(_) => (PriorValue::Scalar(0.0), PriorValue::Scalar(sigmas[0])),
        DesignData::Matrix(_) => (
            PriorValue::Vector(Array1::zeros(sigmas.len())),
            PriorValue::Vector(sigmas),
        ),
    };

    let prior = term.prior.updated([("mu", mu.clone()), ("sigma", sigma.clone())]);
    log::debug!("scaled common term '{}': {}", term.name, prior);

    Ok(Some(CommonScaling {
        prior,
        entry: ScaledTerm {
            mu,
            sigma,
            column_means,
        },
    }))
}

/// Slope-sigma rule applied to every column.
fn data_driven_sigmas(term: &CommonTerm, ctx: &ScalingContext) -> Result<Array1<f64>> {
    term.data
        .as_matrix()
        .axis_iter(Axis(1))
        .enumerate()
        .map(|(i, column)| {
            slope_sigma(
                column,
                ctx.stats.std,
                ctx.config.std_multiplier,
                &term.name,
                i,
            )
        })
        .collect()
}

/// Fixed widths for binary outcomes with a logit/probit link.
fn logistic_sigmas(term: &CommonTerm) -> Result<Array1<f64>> {
    let data = term.data.as_matrix();
    let ncols = data.ncols();

    let dummy_only = if term.is_interaction() {
        term.all_categorical_components()
    } else {
        term.categorical
    };
    if dummy_only {
        return Ok(Array1::ones(ncols));
    }

    // Multi-column interaction with a numeric factor: one shared width
    if term.is_interaction() && !term.data.is_vector() {
        let marginal = data.sum_axis(Axis(1));
        let sd = predictor_std(marginal.view(), &term.name, 0)?;
        return Ok(Array1::from_elem(ncols, 1.0 / sd));
    }

    data.axis_iter(Axis(1))
        .enumerate()
        .map(|(i, column)| inverse_std(column, &term.name, i))
        .collect()
}

fn inverse_std(x: ArrayView1<f64>, term: &str, column: usize) -> Result<f64> {
    Ok(1.0 / predictor_std(x, term, column)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AutoPriorError;
    use crate::families::{Family, FamilyKind};
    use crate::links::Link;
    use crate::scaler::{ResponseStats, ScalerConfig};
    use crate::terms::VariableKind;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array2};

    fn ctx(family: Family, std: f64) -> ScalingContext {
        ScalingContext {
            policy: family.scaling_policy(),
            stats: ResponseStats { mean: 0.0, std },
            config: ScalerConfig::default(),
        }
    }

    fn normal() -> Prior {
        Prior::new("Normal")
            .with_arg("mu", 0.0)
            .with_arg("sigma", 1.0)
            .auto_scaled()
    }

    #[test]
    fn test_numeric_vector_term() {
        let x = array![1.0, 2.0, 3.0, 4.0];
        let term = CommonTerm::numeric("x", x.clone(), normal());
        let ctx = ctx(Family::new(FamilyKind::Gaussian), 2.0);

        let scaled = scale_common(&term, &ctx).unwrap().unwrap();

        let expected = 2.5 * (2.0 / x.std(0.0));
        assert_eq!(scaled.prior.value("mu"), Some(&PriorValue::Scalar(0.0)));
        assert_eq!(scaled.prior.value("sigma"), Some(&PriorValue::Scalar(expected)));
        assert_eq!(scaled.entry.column_means, array![2.5]);
        assert!(scaled.prior.auto_scale());
    }

    #[test]
    fn test_matrix_term_gives_vectors() {
        let data = array![[1.0, 0.0], [0.0, 1.0], [0.0, 0.0], [1.0, 1.0]];
        let term = CommonTerm::categorical("g", data, normal());
        let ctx = ctx(Family::new(FamilyKind::Gaussian), 1.0);

        let scaled = scale_common(&term, &ctx).unwrap().unwrap();

        // Both columns have std 0.5
        assert_eq!(
            scaled.prior.value("mu"),
            Some(&PriorValue::Vector(array![0.0, 0.0]))
        );
        let sigma = scaled.prior.value("sigma").unwrap().as_vector().unwrap();
        assert_abs_diff_eq!(sigma[0], 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(sigma[1], 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_skips_non_normal_and_manual_priors() {
        let ctx = ctx(Family::new(FamilyKind::Gaussian), 1.0);
        let x = array![1.0, 2.0, 3.0];

        let manual = CommonTerm::numeric("x", x.clone(), Prior::new("Normal").with_arg("sigma", 10.0));
        assert!(scale_common(&manual, &ctx).unwrap().is_none());

        let laplace = CommonTerm::numeric("x", x, Prior::new("Laplace").auto_scaled());
        assert!(scale_common(&laplace, &ctx).unwrap().is_none());
    }

    #[test]
    fn test_zero_variance_column() {
        let data = array![[1.0, 2.0], [1.0, 3.0], [1.0, 4.0]];
        let term = CommonTerm::numeric("x", data, normal());
        let ctx = ctx(Family::new(FamilyKind::Gaussian), 1.0);
        assert_eq!(
            scale_common(&term, &ctx).unwrap_err(),
            AutoPriorError::DegeneratePredictor {
                term: "x".to_string(),
                column: 0
            }
        );
    }

    #[test]
    fn test_logistic_dummy_column_with_nan() {
        let data = array![1.0, f64::NAN, 0.0];
        let term = CommonTerm::categorical("g", data, normal());
        let ctx = ctx(Family::new(FamilyKind::Bernoulli), 1.0);
        assert_eq!(
            scale_common(&term, &ctx).unwrap_err(),
            AutoPriorError::DegeneratePredictor {
                term: "g".to_string(),
                column: 0
            }
        );
    }

    #[test]
    fn test_logistic_dummy_columns_without_rows() {
        let term = CommonTerm::categorical("g", Array2::<f64>::zeros((0, 2)), normal());
        let ctx = ctx(Family::new(FamilyKind::Bernoulli), 1.0);
        assert!(matches!(
            scale_common(&term, &ctx),
            Err(AutoPriorError::EmptyInput(_))
        ));
    }

    #[test]
    fn test_logistic_constant_numeric_column() {
        let term = CommonTerm::numeric("x", array![3.0, 3.0, 3.0], normal());
        let ctx = ctx(Family::new(FamilyKind::Bernoulli), 1.0);
        assert_eq!(
            scale_common(&term, &ctx).unwrap_err(),
            AutoPriorError::DegeneratePredictor {
                term: "x".to_string(),
                column: 0
            }
        );
    }

    #[test]
    fn test_logistic_mixed_interaction_constant_row_sum() {
        // Each column varies but every row sums to 2
        let data = array![[2.0, 0.0], [0.0, 2.0], [2.0, 0.0]];
        let term = CommonTerm::interaction(
            "g:x",
            data,
            vec![VariableKind::Categorical, VariableKind::Numeric],
            normal(),
        );
        let ctx = ctx(Family::new(FamilyKind::Bernoulli), 1.0);
        assert_eq!(
            scale_common(&term, &ctx).unwrap_err(),
            AutoPriorError::DegeneratePredictor {
                term: "g:x".to_string(),
                column: 0
            }
        );
    }

    #[test]
    fn test_logistic_numeric() {
        let x = array![0.0, 1.0, 2.0, 3.0];
        let term = CommonTerm::numeric("x", x.clone(), normal());
        let ctx = ctx(Family::new(FamilyKind::Bernoulli), 1.0);
        let scaled = scale_common(&term, &ctx).unwrap().unwrap();
        assert_eq!(
            scaled.prior.value("sigma"),
            Some(&PriorValue::Scalar(1.0 / x.std(0.0)))
        );
    }

    #[test]
    fn test_logistic_categorical() {
        let data = array![[1.0, 0.0], [0.0, 1.0], [0.0, 0.0]];
        let term = CommonTerm::categorical("g", data, normal());
        let family = Family::new(FamilyKind::Binomial).with_link("p", Link::Probit);
        let scaled = scale_common(&term, &ctx(family, 1.0)).unwrap().unwrap();
        assert_eq!(
            scaled.prior.value("sigma"),
            Some(&PriorValue::Vector(array![1.0, 1.0]))
        );
    }

    #[test]
    fn test_logistic_all_categorical_interaction() {
        let term = CommonTerm::interaction(
            "a:b",
            array![1.0, 0.0, 1.0],
            vec![VariableKind::Categorical, VariableKind::Categorical],
            normal(),
        );
        let scaled = scale_common(&term, &ctx(Family::new(FamilyKind::Bernoulli), 1.0))
            .unwrap()
            .unwrap();
        assert_eq!(scaled.prior.value("sigma"), Some(&PriorValue::Scalar(1.0)));
    }

    #[test]
    fn test_logistic_mixed_interaction_uses_row_sum() {
        // x restricted to each of two levels
        let data = array![[1.0, 0.0], [3.0, 0.0], [0.0, 2.0], [0.0, 6.0]];
        let term = CommonTerm::interaction(
            "g:x",
            data,
            vec![VariableKind::Categorical, VariableKind::Numeric],
            normal(),
        );
        let scaled = scale_common(&term, &ctx(Family::new(FamilyKind::Bernoulli), 1.0))
            .unwrap()
            .unwrap();

        let marginal = array![1.0, 3.0, 2.0, 6.0];
        let expected = 1.0 / marginal.std(0.0);
        assert_eq!(
            scaled.prior.value("sigma"),
            Some(&PriorValue::Vector(array![expected, expected]))
        );
    }

    #[test]
    fn test_logistic_ignored_for_cloglog() {
        let x = array![0.0, 1.0, 2.0, 3.0];
        let term = CommonTerm::categorical("x", x.clone(), normal());
        let family = Family::new(FamilyKind::Bernoulli).with_link("p", Link::Cloglog);
        let scaled = scale_common(&term, &ctx(family, 1.0)).unwrap().unwrap();
        assert_eq!(
            scaled.prior.value("sigma"),
            Some(&PriorValue::Scalar(2.5 * (1.0 / x.std(0.0))))
        );
    }
}
