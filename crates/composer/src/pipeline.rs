//! Pipeline driver - runs a planning pass end to end
//!
//! Phases run strictly in order: resolve, register, order, propagate,
//! synthesize. The first error aborts the run; nothing after it executes.

use crate::context::{Phase, PipelineContext, ProgressCallback, Synthesizer};
use crate::env::{self, EnvSource};
use crate::error;
use crate::planner::{DeploymentPlan, compute_order};
use crate::registry::UnitRegistry;
use crate::tags::apply_tags;
use crate::types::{DeploymentParameters, TagSet};
use anyhow::Result;

/// Options for a planning run
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Run every phase except synthesis
    pub dry_run: bool,
}

/// Outcome of a successful run
#[derive(Debug)]
pub struct RunSummary<T> {
    pub params: DeploymentParameters,
    /// The ordered, tagged plan
    pub plan: DeploymentPlan,
    /// Synthesis output, `None` on a dry run
    pub artifact: Option<T>,
}

/// Run the full pipeline
///
/// `register` is called once with the run's registry and the resolved
/// parameters; it declares every unit. Configuration failures surface as
/// [`crate::ConfigurationError`] inside the returned error and can be
/// recovered with `downcast_ref`.
pub fn run<E, R, S, P>(
    env: &E,
    tags: TagSet,
    register: R,
    synthesizer: &mut S,
    progress: &mut P,
    opts: &RunOptions,
) -> Result<RunSummary<S::Output>>
where
    E: EnvSource + ?Sized,
    R: FnOnce(&mut UnitRegistry, &DeploymentParameters) -> error::Result<()>,
    S: Synthesizer,
    P: ProgressCallback,
{
    progress.on_phase_start(Phase::Resolve);
    let params = env::resolve(env)?;
    log::info!(
        "Deploying to account {} in {}",
        params.account_id,
        params.region
    );
    progress.on_phase_complete(Phase::Resolve);

    let mut ctx = PipelineContext::new(params, tags);

    progress.on_phase_start(Phase::Register);
    register(&mut ctx.registry, &ctx.params)?;
    log::info!("Registered {} units", ctx.registry.len());
    progress.on_phase_complete(Phase::Register);

    progress.on_phase_start(Phase::Order);
    let plan = compute_order(&ctx.registry)?;
    log::info!("Deployment order: {}", plan.names().join(" -> "));
    progress.on_phase_complete(Phase::Order);

    progress.on_phase_start(Phase::Propagate);
    let plan = apply_tags(plan, &ctx.tags);
    log::info!("Applied {} tags to {} units", ctx.tags.len(), plan.len());
    progress.on_phase_complete(Phase::Propagate);

    let artifact = if opts.dry_run {
        log::info!("Dry run, skipping synthesis");
        None
    } else {
        progress.on_phase_start(Phase::Synthesize);
        let output = synthesizer.synthesize(&ctx.params, &plan)?;
        progress.on_phase_complete(Phase::Synthesize);
        Some(output)
    };

    Ok(RunSummary {
        params: ctx.params,
        plan,
        artifact,
    })
}
