//! Error types for initialization ordering

use thiserror::Error;

/// Errors that can occur while resolving an initialization order
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderingError {
    /// The dependency relation among present components is circular
    #[error(
        "Dependency cycle detected (involving component '{component}'): {}",
        .path.join(" -> ")
    )]
    DependencyCycle {
        /// Component at which the cycle was closed
        component: String,
        /// The cycle, starting and ending with `component`
        path: Vec<String>,
    },
}

/// Result type for ordering operations
pub type Result<T> = std::result::Result<T, OrderingError>;
