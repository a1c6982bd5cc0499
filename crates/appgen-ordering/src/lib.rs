#![warn(missing_docs)]

//! Initialization ordering for feature-set subsystems
//!
//! Given each component's dependencies, produces a single deterministic order
//! in which every component follows everything it depends on, and rejects
//! circular dependencies.

pub mod error;
pub mod models;
pub mod resolver;

// Re-export public API
pub use error::{OrderingError, Result};
pub use models::{DependencyMap, InitOrder};
pub use resolver::InitOrderResolver;
