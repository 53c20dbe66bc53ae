// =============================================================================
// Response and Predictor Statistics
// =============================================================================
//
// Every data-driven width comes from two numbers, the response mean μ_y and
// standard deviation σ_y, combined with predictor standard deviations:
//
//     slope:      σ_β = 2.5 · σ_y / sd(x)
//     intercept:  σ_α = 2.5 · σ_y              (before centering correction)
//
// For families whose response is not on a free real scale (counts,
// proportions, categories) there is nothing meaningful to standardize by, so
// μ_y = 0 and σ_y = 1.
//
// =============================================================================

use ndarray::ArrayView1;

use crate::error::{AutoPriorError, Result};
use crate::families::ScalingPolicy;
use crate::terms::ResponseTerm;

use super::registry::ScalingRegistry;
use super::ScalingContext;

/// Location and spread of the response.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResponseStats {
    pub mean: f64,
    pub std: f64,
}

impl ResponseStats {
    /// μ_y = 0, σ_y = 1.
    pub const UNIT: ResponseStats = ResponseStats { mean: 0.0, std: 1.0 };
}

/// Compute (μ_y, σ_y) for the response.
///
/// Uses the population standard deviation (ddof = 0). Families that don't
/// standardize get `ResponseStats::UNIT` without looking at the data.
pub fn response_stats(response: &ResponseTerm, policy: &ScalingPolicy) -> Result<ResponseStats> {
    if !policy.standardize_response {
        return Ok(ResponseStats::UNIT);
    }

    let data = &response.data;
    let mean = data.mean().ok_or_else(|| {
        AutoPriorError::EmptyInput(format!("response '{}' has no observations", response.name))
    })?;
    let std = data.std(0.0);

    if !mean.is_finite() || !std.is_finite() {
        return Err(AutoPriorError::InvalidValue(format!(
            "response '{}' has non-finite mean or standard deviation",
            response.name
        )));
    }

    Ok(ResponseStats { mean, std })
}

/// Standard deviation of one predictor column, rejecting constant columns.
pub(crate) fn predictor_std(x: ArrayView1<f64>, term: &str, column: usize) -> Result<f64> {
    let sd = x.std(0.0);
    if sd == 0.0 || !sd.is_finite() {
        return Err(AutoPriorError::DegeneratePredictor {
            term: term.to_string(),
            column,
        });
    }
    Ok(sd)
}

/// Slope width for a numeric column: `multiplier · (σ_y / sd(x))`.
pub fn slope_sigma(
    x: ArrayView1<f64>,
    response_std: f64,
    multiplier: f64,
    term: &str,
    column: usize,
) -> Result<f64> {
    let sd = predictor_std(x, term, column)?;
    Ok(multiplier * (response_std / sd))
}

/// Location and width of the intercept prior.
///
/// The model does not mean-center predictors, so the intercept is the
/// prediction at x = 0 rather than at x̄. Its prior must absorb the spread
/// that each common-term slope contributes at the column means:
///
/// ```text
/// σ_α = sqrt( (2.5·σ_y)² + Σ_j σ_j² · x̄_j² )
/// ```
///
/// With an empty registry this is just `(μ_y, 2.5·σ_y)`.
pub fn intercept_stats(ctx: &ScalingContext, registry: &ScalingRegistry) -> (f64, f64) {
    let mu = ctx.stats.mean;
    let mut sigma = ctx.config.std_multiplier * ctx.stats.std;
    if !registry.is_empty() {
        sigma = (sigma.powi(2) + registry.centering_variance()).sqrt();
    }
    (mu, sigma)
}
