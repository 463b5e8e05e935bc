//! Pipeline context and provider traits
//!
//! These traits let the composer crate drive a planning run without
//! depending on a particular synthesis backend or terminal UI.

use crate::planner::DeploymentPlan;
use crate::registry::UnitRegistry;
use crate::types::{DeploymentParameters, TagSet};
use anyhow::Result;
use std::fmt;

/// Phases of a planning run, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Resolve,
    Register,
    Order,
    Propagate,
    Synthesize,
}

impl Phase {
    /// All phases in the order they run
    pub const ALL: [Phase; 5] = [
        Phase::Resolve,
        Phase::Register,
        Phase::Order,
        Phase::Propagate,
        Phase::Synthesize,
    ];

    /// 1-based position of this phase
    pub fn step(&self) -> usize {
        Self::ALL.iter().position(|p| p == self).unwrap_or(0) + 1
    }

    pub fn description(&self) -> &'static str {
        match self {
            Phase::Resolve => "Resolving deployment parameters",
            Phase::Register => "Registering units",
            Phase::Order => "Computing deployment order",
            Phase::Propagate => "Applying tags",
            Phase::Synthesize => "Synthesizing",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Resolve => "resolve",
            Phase::Register => "register",
            Phase::Order => "order",
            Phase::Propagate => "propagate",
            Phase::Synthesize => "synthesize",
        };
        f.write_str(name)
    }
}

/// Receives the finished plan and turns it into a deployable artifact
///
/// Called exactly once per successful run.
pub trait Synthesizer {
    /// Artifact description returned to the caller (e.g. an output path)
    type Output;

    fn synthesize(
        &mut self,
        params: &DeploymentParameters,
        plan: &DeploymentPlan,
    ) -> Result<Self::Output>;
}

/// Progress callback for pipeline phases
pub trait ProgressCallback {
    /// Called when a phase starts
    fn on_phase_start(&mut self, phase: Phase);

    /// Called when a phase completes
    fn on_phase_complete(&mut self, phase: Phase);
}

/// No-op progress callback
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_phase_start(&mut self, _phase: Phase) {}
    fn on_phase_complete(&mut self, _phase: Phase) {}
}

/// State threaded through the phases of one run
///
/// Owned by the driver; nothing here is global.
pub struct PipelineContext {
    /// Resolved deployment parameters
    pub params: DeploymentParameters,
    /// Registry of units for this run
    pub registry: UnitRegistry,
    /// Tags applied to every unit
    pub tags: TagSet,
}

impl PipelineContext {
    /// Create a context with an empty registry
    pub fn new(params: DeploymentParameters, tags: TagSet) -> Self {
        Self {
            params,
            registry: UnitRegistry::new(),
            tags,
        }
    }
}
