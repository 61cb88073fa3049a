//! DeployFlow Cloud Abstraction
//!
//! Seams between the provider-specific stage composers and the world
//! around them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                Execution engine                  │
//! │        (schedules and runs stages/steps)         │
//! └─────────────────┬───────────────────────────────┘
//!                   │ StageConfig
//! ┌─────────────────▼───────────────────────────────┐
//! │               deployflow-cloud                   │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │  PreProcessorRegistry                     │   │
//! │  │  trait DeployStagePreProcessor { ... }    │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌─────────────────────┐  ┌────────────────┐    │
//! │  │ ServerGroupResolver │  │  ImageCatalog  │    │
//! │  └─────────────────────┘  └────────────────┘    │
//! └───────┬─────────────────────────────────────────┘
//!         │
//! ┌───────▼───────┐
//! │   alicloud    │
//! │   composer    │
//! └───────────────┘
//! ```

pub mod error;
pub mod image;
pub mod provider;
pub mod resolver;

// Re-exports
pub use error::{CloudError, Result};
pub use image::{
    CatalogImage, ImageCatalog, ImageDetails, ImageFinder, JenkinsDetails, StaticImageCatalog,
};
pub use provider::{Composition, DeployStagePreProcessor, PreProcessorRegistry};
pub use resolver::{
    Capacity, ServerGroupResolver, SourceLookup, SourceServerGroup, StaticServerGroupResolver,
};
