//! Alibaba Cloud stage composer for DeployFlow
//!
//! Computes the auxiliary work around an `alicloud` deploy stage:
//!
//! - capacity snapshot/restore for strategies that replace server groups at once
//! - pin before / unpin after (or on failure) for rolling red/black
//! - a cluster size precondition gate when `maxInitialCount` is configured
//!
//! Also selects the newest image for a package by tags.
//!
//! # Example
//!
//! ```ignore
//! use deployflow_alicloud::AliCloudDeployStagePreProcessor;
//! use deployflow_cloud::{DeployStagePreProcessor, StaticServerGroupResolver};
//! use std::sync::Arc;
//!
//! let processor = AliCloudDeployStagePreProcessor::new(Arc::new(StaticServerGroupResolver::new()));
//! let before = processor.before_stage_definitions(&config).await?;
//! ```

pub mod image;
pub mod policy;
pub mod precondition;
pub mod preprocessor;
pub mod resize;

pub use image::AliCloudImageFinder;
pub use policy::{CapacityPreservation, requires_pinning, requires_precondition_gate};
pub use precondition::build_precondition_gate;
pub use preprocessor::AliCloudDeployStagePreProcessor;
pub use resize::{CapacityPin, ResizeAction, ResizeContext, ResizeContextBuilder};

/// Provider name served by this crate
pub const PROVIDER: &str = "alicloud";
