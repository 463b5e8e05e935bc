//! # Composer
//!
//! Stack composition planning for infrastructure deployments.
//!
//! This crate takes a set of named deployable units (stacks), the values
//! they pass to each other, and a shared tag set, and produces an ordered,
//! tagged deployment plan ready for synthesis.
//!
//! ## Core Concepts
//!
//! - **Unit**: A named deployable component with outputs, inputs and dependencies
//! - **UnitRegistry**: Owns all units of a run, in registration order
//! - **DeploymentPlan**: Units ordered so dependencies always come first
//! - **TagSet**: Metadata applied uniformly to every unit
//!
//! ## Example
//!
//! ```ignore
//! use composer::{
//!     NoProgress, OutputValue, RunOptions, TagSet, UnitSpec, ProcessEnv, run,
//! };
//!
//! let summary = run(
//!     &ProcessEnv,
//!     TagSet::new().with("Project", "X"),
//!     |registry, _params| {
//!         let ingestion = registry.register(
//!             UnitSpec::new("ingestion").output("bucket", OutputValue::new("DataBucket")),
//!         )?;
//!         let bucket = registry.output(ingestion, "bucket")?;
//!         registry.register(UnitSpec::new("analytics").input("dataBucket", bucket))?;
//!         Ok(())
//!     },
//!     &mut my_synthesizer,
//!     &mut NoProgress,
//!     &RunOptions::default(),
//! )?;
//! ```
//!
//! ## Provider Traits
//!
//! - [`EnvSource`]: Where deployment parameters are read from
//! - [`Synthesizer`]: Turns the finished plan into an artifact
//! - [`ProgressCallback`]: Receives phase transitions

pub mod context;
pub mod env;
pub mod error;
pub mod pipeline;
pub mod planner;
pub mod registry;
pub mod tags;
pub mod types;

// Re-export main types at crate root
pub use context::{NoProgress, Phase, PipelineContext, ProgressCallback, Synthesizer};
pub use env::{EnvSource, ProcessEnv, resolve};
pub use error::{ConfigurationError, ErrorKind, Result};
pub use pipeline::{RunOptions, RunSummary, run};
pub use planner::{DeploymentPlan, compute_order};
pub use registry::UnitRegistry;
pub use tags::apply_tags;
pub use types::{
    DEFAULT_REGION, DeploymentParameters, Metadata, OutputRef, OutputValue, TagSet, Unit,
    UnitHandle, UnitSpec,
};
