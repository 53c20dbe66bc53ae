// =============================================================================
// Group-Specific Scaler
// =============================================================================
//
// A group-specific term's prior is hierarchical:
//
//     β_g ~ Normal(0, σ),   σ ~ HalfNormal(s)
//
// Only the hyperprior width `s` is data-driven. It uses the same rule the
// corresponding population-level parameter would get:
//
//   - (1 | g): the intercept width, including the centering correction
//   - (x | g): the slope width of x, column by column
//
// =============================================================================

use ndarray::{Array1, Axis};

use crate::error::Result;
use crate::priors::{Prior, PriorValue};
use crate::terms::{GroupSpecificTerm, GroupTermKind};

use super::registry::ScalingRegistry;
use super::stats::{intercept_stats, slope_sigma};
use super::ScalingContext;

/// Scale the `sigma` hyperprior of a group-specific term.
///
/// Returns `Ok(None)` when the term isn't marked for auto-scaling or its
/// `sigma` argument is not a HalfNormal prior.
///
/// # Errors
/// `DegeneratePredictor` if a slope predictor column is constant.
pub fn scale_group_specific(
    term: &GroupSpecificTerm,
    ctx: &ScalingContext,
    registry: &ScalingRegistry,
) -> Result<Option<Prior>> {
    let hyperprior = match term.prior.hyperprior("sigma") {
        Some(p) if term.prior.auto_scale() && p.is("HalfNormal") => p,
        _ => {
            log::trace!("skipping group-specific term '{}' ({})", term.name, term.prior);
            return Ok(None);
        }
    };

    let sigma = match term.kind {
        GroupTermKind::Intercept => PriorValue::Scalar(intercept_stats(ctx, registry).1),
        GroupTermKind::Slope => {
            let sigmas = term
                .predictor
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
                .collect::<Result<Array1<f64>>>()?;
            PriorValue::squeeze(sigmas)
        }
    };

    let prior = term
        .prior
        .updated([("sigma", hyperprior.updated([("sigma", sigma)]))]);
    log::debug!("scaled group-specific term '{}': {}", term.name, prior);
    Ok(Some(prior))
}
