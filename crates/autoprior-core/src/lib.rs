// =============================================================================
// AutoPrior Core Library
// =============================================================================
//
// Data-driven, weakly-informative default priors for Bayesian generalized
// regression models. Given a model's family, links, response, and design
// columns, the scaler fills in location and scale for every prior the user
// left to the library, so nobody has to hand-tune a prior per coefficient.
//
// STRUCTURE:
// ----------
//   - error:     Error type used throughout the library
//   - links:     Link function identifiers (identity, logit, probit, ...)
//   - families:  Response families and the per-family `ScalingPolicy`
//   - priors:    Prior distributions as plain values
//   - terms:     Intercept, common, group-specific, and response terms
//   - model:     Family + response + named components
//   - scaler:    The scaling stages and the `PriorScaler` orchestrator
//
// FOR MAINTAINERS:
// ----------------
// When adding a new family:
//   1. Add the variant to `FamilyKind` with its parent parameter and links
//   2. Decide its behaviour in `ScalingPolicy::from`
//   3. Add a test in `families` and, if it needs a new stage, in `scaler`
//
// =============================================================================

pub mod error;
pub mod families;
pub mod links;
pub mod model;
pub mod priors;
pub mod scaler;
pub mod terms;

pub use error::{AutoPriorError, Result};
pub use families::{Family, FamilyKind, ScalingPolicy};
pub use links::Link;
pub use model::{Component, ConstantComponent, DistributionalComponent, Model};
pub use priors::{ComponentPrior, Prior, PriorArg, PriorValue, Transform};
pub use scaler::{scale_priors, PriorScaler, ScalerConfig, ScalingRegistry};
pub use terms::{
    CommonTerm, DesignData, GroupSpecificTerm, GroupTermKind, InterceptTerm, ResponseTerm,
    VariableKind,
};
