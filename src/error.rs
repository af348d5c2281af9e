//! Error types for the Protoboard simulation core.
//!
//! This module provides a unified error type [`ProtoboardError`] that covers
//! all error conditions that can occur during board construction, network
//! assembly, and operating-point solving.

use thiserror::Error;

/// Result type alias using [`ProtoboardError`].
pub type Result<T> = std::result::Result<T, ProtoboardError>;

/// Unified error type for all Protoboard operations.
#[derive(Error, Debug)]
pub enum ProtoboardError {
    // ============ Board / Placement Errors ============
    /// A connection point was requested that the board geometry does not contain
    #[error("No point at segment {segment}, repetition {repetition}, column {column}, row {row} in group '{group}'")]
    PointNotFound {
        segment: usize,
        repetition: usize,
        column: usize,
        row: usize,
        group: String,
    },

    /// A DIP package does not fit on the board at the requested site
    #[error("DIP package '{name}' ({pins} pins) does not fit at column {column}")]
    DipDoesNotFit {
        name: String,
        pins: usize,
        column: usize,
    },

    /// A DIP package would overlap an already-placed plugin
    #[error("DIP package '{name}' collides with an existing plugin")]
    DipCollision { name: String },

    /// A plugin's pin count does not match its footprint
    #[error("Plugin '{name}' expects {expected} pins but {actual} were bound")]
    PinCountMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    // ============ Wiring Errors ============
    /// A wire was given a negative resistance
    #[error("Wire resistance must be >= 0 (got {resistance})")]
    NegativeResistance { resistance: f64 },

    /// A node handle referenced an entry missing from the arena
    #[error("Node handle {handle} is not present in the arena")]
    UnknownNode { handle: usize },

    // ============ Network Assembly Errors ============
    /// An emitted element referenced a net missing from the net registry
    #[error("Element '{element}' references net {net} which is not in the net registry")]
    DanglingNet { element: String, net: String },

    // ============ Solver Errors ============
    /// Matrix is singular and cannot be solved
    #[error("Singular matrix - network may have a shorted supply or floating input")]
    SingularMatrix,

    /// Newton-Raphson iteration did not converge
    #[error("Newton-Raphson did not converge after {iterations} iterations (residual: {residual:.2e})")]
    ConvergenceFailure { iterations: usize, residual: f64 },

    /// The bundled solver cannot interpret an element kind
    #[error("Solver does not support element '{element}'")]
    UnsupportedElement { element: String },
}

impl ProtoboardError {
    /// Create a pin count mismatch error
    pub fn pin_count_mismatch(name: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::PinCountMismatch {
            name: name.into(),
            expected,
            actual,
        }
    }

    /// Create a dangling net error
    pub fn dangling_net(element: impl Into<String>, net: impl Into<String>) -> Self {
        Self::DanglingNet {
            element: element.into(),
            net: net.into(),
        }
    }

    /// Create a convergence failure error
    pub fn convergence_failure(iterations: usize, residual: f64) -> Self {
        Self::ConvergenceFailure {
            iterations,
            residual,
        }
    }
}
