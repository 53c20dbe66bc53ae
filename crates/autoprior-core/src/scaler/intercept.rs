// =============================================================================
// Intercept Scaler
// =============================================================================

use crate::families::SlopeRule;
use crate::priors::{Prior, PriorValue};
use crate::terms::InterceptTerm;

use super::registry::ScalingRegistry;
use super::stats::intercept_stats;
use super::ScalingContext;

/// Scale the intercept prior.
///
/// Binary outcomes on the logit/probit scale get a fixed `Normal(0, 1.5)`.
/// Everything else uses [`intercept_stats`], which needs the registry filled
/// by the common-term pass.
///
/// Returns `None` when the prior is not an auto-scaled Normal.
pub fn scale_intercept(
    term: &InterceptTerm,
    ctx: &ScalingContext,
    registry: &ScalingRegistry,
) -> Option<Prior> {
    if !term.prior.auto_scale() || !term.prior.is("Normal") {
        log::trace!("skipping intercept ({})", term.prior);
        return None;
    }

    let (mu, sigma) = match ctx.policy.slopes {
        SlopeRule::Logistic => (0.0, ctx.config.logistic_intercept_sigma),
        SlopeRule::DataDriven => intercept_stats(ctx, registry),
    };

    let prior = term
        .prior
        .updated([("mu", PriorValue::Scalar(mu)), ("sigma", PriorValue::Scalar(sigma))]);
    log::debug!("scaled intercept: {}", prior);
    Some(prior)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::families::{Family, FamilyKind};
    use crate::scaler::registry::ScaledTerm;
    use crate::scaler::{ResponseStats, ScalerConfig};
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn ctx(kind: FamilyKind, mean: f64, std: f64) -> ScalingContext {
        ScalingContext {
            policy: Family::new(kind).scaling_policy(),
            stats: ResponseStats { mean, std },
            config: ScalerConfig::default(),
        }
    }

    fn registry() -> ScalingRegistry {
        let mut registry = ScalingRegistry::new();
        registry.insert(
            "x",
            ScaledTerm {
                mu: PriorValue::Scalar(0.0),
                sigma: PriorValue::Scalar(4.0),
                column_means: array![2.0],
            },
        );
        registry
    }

    fn intercept() -> InterceptTerm {
        InterceptTerm::new(Prior::new("Normal").auto_scaled())
    }

    #[test]
    fn test_gaussian_without_common_terms() {
        let ctx = ctx(FamilyKind::Gaussian, 10.0, 3.0);
        let prior = scale_intercept(&intercept(), &ctx, &ScalingRegistry::new()).unwrap();
        assert_eq!(prior.value("mu"), Some(&PriorValue::Scalar(10.0)));
        assert_eq!(prior.value("sigma"), Some(&PriorValue::Scalar(7.5)));
    }

    #[test]
    fn test_gaussian_with_centering_correction() {
        let ctx = ctx(FamilyKind::Gaussian, 10.0, 3.0);
        let prior = scale_intercept(&intercept(), &ctx, &registry()).unwrap();
        let sigma = prior.value("sigma").unwrap().as_scalar().unwrap();
        assert_abs_diff_eq!(sigma, (7.5_f64.powi(2) + 16.0 * 4.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_bernoulli_logit_is_fixed() {
        // Response stats and registry are ignored
        let ctx = ctx(FamilyKind::Bernoulli, 123.0, 45.0);
        let prior = scale_intercept(&intercept(), &ctx, &registry()).unwrap();
        assert_eq!(prior.value("mu"), Some(&PriorValue::Scalar(0.0)));
        assert_eq!(prior.value("sigma"), Some(&PriorValue::Scalar(1.5)));
    }

    #[test]
    fn test_non_normal_is_skipped() {
        let ctx = ctx(FamilyKind::Gaussian, 0.0, 1.0);
        let term = InterceptTerm::new(Prior::new("StudentT").auto_scaled());
        assert!(scale_intercept(&term, &ctx, &ScalingRegistry::new()).is_none());

        let manual = InterceptTerm::new(Prior::new("Normal"));
        assert!(scale_intercept(&manual, &ctx, &ScalingRegistry::new()).is_none());
    }
}
