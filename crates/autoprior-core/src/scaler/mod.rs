// =============================================================================
// Prior Scaler
// =============================================================================
//
// Derives weakly-informative default priors from the data before sampling.
//
// THE PIPELINE
// ------------
// One pass over a model runs these stages in a fixed order:
//
//     1. auxiliary   sigma / kappa           HalfStudentT(4, σ_y)
//     2. common      slopes, interactions    Normal(0, 2.5·σ_y/sd(x))
//     3. intercept   Intercept               Normal(μ_y, centered width)
//     4. group       (1|g), (x|g)            HalfNormal hyperprior width
//     5. threshold   ordinal cut-points      Normal(linspace / zeros, 1)
//
// Stage 3 reads the `ScalingRegistry` filled by stage 2, so stage 2 must be
// complete before stage 3 starts. Stages 2 and 4 are independent per term and
// can be computed in parallel (`ScalerConfig::parallel`).
//
// WHAT GETS TOUCHED
// -----------------
// Only priors the model-specification layer marked with `auto_scale`, and
// only if they have the shape the stage expects (Normal for intercept and
// common terms, a HalfNormal `sigma` hyperprior for group-specific terms).
// Anything else is left exactly as the user wrote it.
//
// FOR MAINTAINERS:
// ----------------
// Family-specific behaviour belongs in `ScalingPolicy` (families module),
// not in the stages. A stage should only ever branch on the policy.
//
// =============================================================================

mod auxiliary;
mod common;
mod group;
mod intercept;
mod registry;
mod stats;
mod threshold;

pub use auxiliary::scale_auxiliary;
pub use common::{scale_common, CommonScaling};
pub use group::scale_group_specific;
pub use intercept::scale_intercept;
pub use registry::{ScaledTerm, ScalingRegistry};
pub use stats::{intercept_stats, response_stats, slope_sigma, ResponseStats};
pub use threshold::scale_threshold;

use rayon::prelude::*;

use crate::error::Result;
use crate::families::ScalingPolicy;
use crate::model::Model;
use crate::priors::{ComponentPrior, Prior};
use crate::terms::CommonTerm;

// =============================================================================
// Configuration
// =============================================================================

/// Tuning constants for the default priors.
///
/// The defaults reproduce the standard weakly-informative choices; change
/// them only if you know why.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalerConfig {
    /// Width multiplier for slopes and intercepts, in response SDs.
    /// Default: 2.5
    pub std_multiplier: f64,

    /// Intercept width for binary outcomes on the logit/probit scale.
    /// Default: 1.5
    pub logistic_intercept_sigma: f64,

    /// Degrees of freedom of the HalfStudentT auxiliary prior.
    /// Default: 4
    pub auxiliary_nu: f64,

    /// Cumulative-family threshold means are spread over [-span, span].
    /// Default: 2
    pub threshold_span: f64,

    /// Compute per-term widths with rayon.
    /// Default: false
    pub parallel: bool,
}

impl Default for ScalerConfig {
    fn default() -> Self {
        Self {
            std_multiplier: 2.5,
            logistic_intercept_sigma: 1.5,
            auxiliary_nu: 4.0,
            threshold_span: 2.0,
            parallel: false,
        }
    }
}

/// Everything a scaling stage needs besides the term itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalingContext {
    pub policy: ScalingPolicy,
    pub stats: ResponseStats,
    pub config: ScalerConfig,
}

// =============================================================================
// Orchestrator
// =============================================================================

/// Runs every scaling stage over one model.
#[derive(Debug, Clone)]
pub struct PriorScaler<'a> {
    model: &'a Model,
    ctx: ScalingContext,
}

impl<'a> PriorScaler<'a> {
    /// Scaler with default configuration.
    pub fn new(model: &'a Model) -> Result<Self> {
        Self::with_config(model, ScalerConfig::default())
    }

    /// Validate the model and compute the response statistics.
    pub fn with_config(model: &'a Model, config: ScalerConfig) -> Result<Self> {
        model.validate()?;
        let policy = model.family.scaling_policy();
        let stats = response_stats(&model.response, &policy)?;
        log::debug!(
            "prior scaling for family '{}': mean = {}, std = {}",
            model.family.kind(),
            stats.mean,
            stats.std
        );
        Ok(Self {
            model,
            ctx: ScalingContext {
                policy,
                stats,
                config,
            },
        })
    }

    pub fn response_stats(&self) -> ResponseStats {
        self.ctx.stats
    }

    /// Scale every common term of the parent component.
    ///
    /// Returns one entry per common term (in order; `None` for skipped
    /// terms) and the registry built from the scaled ones.
    pub fn scale_common_terms(&self) -> Result<(Vec<Option<Prior>>, ScalingRegistry)> {
        let terms: &[CommonTerm] = match self.model.parent_component() {
            Some(parent) => &parent.common_terms,
            None => &[],
        };
        let ctx = self.ctx;
        let results = self.map_terms(terms, |t| scale_common(t, &ctx))?;

        let mut registry = ScalingRegistry::new();
        let priors = terms
            .iter()
            .zip(results)
            .map(|(term, result)| {
                result.map(|scaled| {
                    registry.insert(term.name.clone(), scaled.entry);
                    scaled.prior
                })
            })
            .collect();
        Ok((priors, registry))
    }

    /// Run the full pipeline and return a copy of the model with the scaled
    /// priors. The input model is left untouched, including on error.
    pub fn scale(&self) -> Result<Model> {
        let ctx = self.ctx;
        let mut scaled = self.model.clone();

        // 1. Auxiliary response parameter
        if let Some((param, prior)) = scale_auxiliary(self.model, &ctx) {
            if let Some(component) = scaled.constant_mut(param) {
                component.prior = ComponentPrior::Distribution(prior);
            }
        }

        // 2-4. Terms of the parent linear predictor
        if let Some(parent) = self.model.parent_component() {
            let (common, registry) = self.scale_common_terms()?;

            let intercept = parent
                .intercept
                .as_ref()
                .and_then(|term| scale_intercept(term, &ctx, &registry));

            let group = self.map_terms(&parent.group_specific_terms, |t| {
                scale_group_specific(t, &ctx, &registry)
            })?;

            if let Some(target) = scaled.parent_component_mut() {
                for (term, prior) in target.common_terms.iter_mut().zip(common) {
                    if let Some(prior) = prior {
                        term.prior = prior;
                    }
                }
                if let (Some(term), Some(prior)) = (target.intercept.as_mut(), intercept) {
                    term.prior = prior;
                }
                for (term, prior) in target.group_specific_terms.iter_mut().zip(group) {
                    if let Some(prior) = prior {
                        term.prior = prior;
                    }
                }
            }
        }

        // 5. Ordinal thresholds
        if let Some(prior) = scale_threshold(self.model, &ctx)? {
            if let Some(component) = scaled.constant_mut("threshold") {
                component.prior = ComponentPrior::Distribution(prior);
            }
        }

        Ok(scaled)
    }

    /// Apply `f` to every term, in parallel if configured. Output order
    /// always matches input order.
    fn map_terms<T, R, F>(&self, terms: &[T], f: F) -> Result<Vec<R>>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> Result<R> + Sync + Send,
    {
        if self.ctx.config.parallel {
            terms.par_iter().map(f).collect()
        } else {
            terms.iter().map(f).collect()
        }
    }
}

/// Scale all auto-scaled priors of `model` with the default configuration.
pub fn scale_priors(model: &Model) -> Result<Model> {
    PriorScaler::new(model)?.scale()
}

// =============================================================================
// Tests
// =============================================================================
