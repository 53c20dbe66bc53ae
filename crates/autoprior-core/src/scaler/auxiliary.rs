// =============================================================================
// Auxiliary-Parameter Scaler
// =============================================================================
//
// The response distribution's own secondary parameter (the residual scale of
// a Gaussian/StudentT model, the concentration of a von Mises model) gets a
// heavy-tailed half prior sized by the response spread:
//
//     HalfStudentT(nu = 4, sigma = σ_y)
//
// Support for more families goes through `ScalingPolicy::auxiliary`.
//
// =============================================================================

use crate::model::Model;
use crate::priors::Prior;

use super::ScalingContext;

/// Build the replacement prior for the family's auxiliary parameter.
///
/// Returns the parameter name and its new prior, or `None` when the family
/// has no auxiliary parameter, the parameter is modelled with its own linear
/// predictor, or its prior is not marked for auto-scaling.
pub fn scale_auxiliary(model: &Model, ctx: &ScalingContext) -> Option<(&'static str, Prior)> {
    let param = ctx.policy.auxiliary?;
    let component = model.constant(param)?;
    if component.prior.auto_scaled().is_none() {
        log::trace!("skipping auxiliary parameter '{}'", param);
        return None;
    }

    let prior = Prior::new("HalfStudentT")
        .with_arg("nu", ctx.config.auxiliary_nu)
        .with_arg("sigma", ctx.stats.std)
        .auto_scaled();
    log::debug!("scaled auxiliary parameter '{}': {}", param, prior);
    Some((param, prior))
}
