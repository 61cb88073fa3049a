//! Model definitions

mod definition;
mod moniker;
mod stage;
mod strategy;

// Re-exports
pub use definition::*;
pub use moniker::*;
pub use stage::*;
pub use strategy::*;
