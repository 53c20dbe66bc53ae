// =============================================================================
// Threshold Scaler
// =============================================================================
//
// Ordinal models with K response categories have K-1 cut-points.
//
// CUMULATIVE
// ----------
// P(Y <= k) = F(τ_k - η). The cut-points must be strictly increasing or the
// category probabilities go negative, so the prior is
//
//     τ ~ Normal(mu = [-2, ..., 2], sigma = 1),  ordered
//
// with the means evenly spread over [-2, 2] (rounded to 2 decimals).
//
// STOPPING RATIO
// --------------
// P(Y = k | Y >= k) = F(τ_k - η). Each cut-point stands on its own, so
// τ ~ Normal(0, 1) with no ordering constraint.
//
// =============================================================================

use ndarray::Array1;

use crate::error::{AutoPriorError, Result};
use crate::families::ThresholdRule;
use crate::model::Model;
use crate::priors::{Prior, Transform};

use super::ScalingContext;

/// Build the threshold prior for an ordinal model.
///
/// Returns `Ok(None)` for non-ordinal families, or when the threshold is
/// not a constant component with an auto-scaled prior.
///
/// # Errors
/// `InvalidValue` if fewer than two response categories were observed.
pub fn scale_threshold(model: &Model, ctx: &ScalingContext) -> Result<Option<Prior>> {
    let Some(rule) = ctx.policy.threshold else {
        return Ok(None);
    };
    let eligible = model
        .constant("threshold")
        .is_some_and(|c| c.prior.auto_scaled().is_some());
    if !eligible {
        log::trace!("skipping threshold");
        return Ok(None);
    }

    let n_levels = model.response.n_levels();
    if n_levels < 2 {
        return Err(AutoPriorError::InvalidValue(format!(
            "ordinal response '{}' needs at least 2 categories, found {}",
            model.response.name, n_levels
        )));
    }
    let n_thresholds = n_levels - 1;

    let prior = match rule {
        ThresholdRule::Ordered => {
            let span = ctx.config.threshold_span;
            let mu = Array1::linspace(-span, span, n_thresholds).mapv(round2);
            Prior::new("Normal")
                .with_arg("mu", mu)
                .with_arg("sigma", 1.0)
                .with_transform(Transform::Ordered)
        }
        ThresholdRule::Unordered => Prior::new("Normal")
            .with_arg("mu", Array1::<f64>::zeros(n_thresholds))
            .with_arg("sigma", 1.0),
    }
    .auto_scaled();

    log::debug!("scaled threshold: {}", prior);
    Ok(Some(prior))
}

/// Round to two decimals, ties to even.
fn round2(x: f64) -> f64 {
    (x * 100.0).round_ties_even() / 100.0
}
