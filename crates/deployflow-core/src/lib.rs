//! DeployFlow core model
//!
//! Types shared between the composers and the execution engine that
//! consumes their output:
//!
//! - [`StageConfig`]: the read-only description of one deploy stage
//! - [`Strategy`]: the deployment strategy, parsed from its wire identifier
//! - [`StepDefinition`] / [`StageDefinition`]: what a composer hands back
//!
//! Nothing here executes anything. Definitions are plain values whose
//! meaning belongs to the engine.

pub mod model;

pub use model::*;
