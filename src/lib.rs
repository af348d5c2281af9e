//! # Protoboard Core
//!
//! The simulation core of an interactive breadboard prototyping bench.
//!
//! This library provides:
//! - Breadboard geometry: hole grids, bonded rails, DIP seating rules
//! - A conductive-node registry with per-tick electrical identity
//! - Placeable parts: power supplies, wires, LEDs, DIP switches and opaque
//!   sub-circuit packages
//! - Network emission and a DC operating-point solver with device feedback
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`board`] - Breadboard geometry and the hole/rail registry
//! - [`net`] - Conductive-node arena, unification and identity assignment
//! - [`parts`] - The placeable device catalogue
//! - [`netlist`] - Network description emitted from placed parts
//! - [`solver`] - The [`Solve`] boundary and the bundled MNA solver
//! - [`sim`] - The workbench and the per-tick pass sequence
//!
//! ## Simulation Method
//!
//! Interaction is tick-driven: every user edit (placing a part, drawing a
//! wire, flipping a switch) triggers one tick of [`sim::Workbench::tick`]:
//!
//! 1. Partition the node registry into connected components over the
//!    zero-resistance bonds currently in effect
//! 2. Assign one canonical identity per component; components containing a
//!    sink terminal collapse to ground
//! 3. Emit the network description from the placed parts
//! 4. Solve the DC operating point (Newton-Raphson over an MNA system)
//! 5. Feed solved potentials back into display devices
//!
//! A tick never aborts: solver failures and malformed parts surface as
//! advisories on the [`sim::TickReport`] while the bench stays interactive.

pub mod board;
pub mod error;
pub mod net;
pub mod netlist;
pub mod parts;
pub mod sim;
pub mod solver;

// Re-export main types for convenience
pub use error::{ProtoboardError, Result};
pub use net::NetId;
pub use sim::{TickReport, Workbench};
pub use solver::{OperatingPointSolver, Solve};

/// Thermal voltage at room temperature (approximately 26mV)
pub const THERMAL_VOLTAGE: f64 = 0.0258;
