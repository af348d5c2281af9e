//! Operating-point solving.
//!
//! The engine treats the solver as a black box behind the [`Solve`] trait:
//! it accepts a [`Netlist`] and returns a per-net potential mapping, or
//! fails. The bundled [`OperatingPointSolver`] implements the trait with
//! Modified Nodal Analysis.
//!
//! ## Modified Nodal Analysis
//!
//! MNA assembles a system of equations Ax = z where:
//! - x contains net potentials and source branch currents
//! - A is the conductance/coefficient matrix
//! - z is the source vector
//!
//! The ground net is not in the matrix; its potential is 0 by definition.
//! Nonlinear junctions (LEDs) are linearized around an operating point and
//! iterated with Newton-Raphson until the solution stops moving.

mod mna;
mod newton;
mod op;

pub use mna::MnaMatrix;
pub use newton::Junction;
pub use op::OperatingPointSolver;

use std::collections::HashMap;

use crate::error::Result;
use crate::net::NetId;
use crate::netlist::Netlist;

/// Convergence tolerance for Newton-Raphson iteration (volts).
pub const CONVERGENCE_TOLERANCE: f64 = 1e-6;

/// Maximum Newton-Raphson iterations per solve.
pub const MAX_ITERATIONS: usize = 50;

/// Minimum conductance to prevent a singular matrix.
pub const MIN_CONDUCTANCE: f64 = 1e-12;

/// Configuration for the bundled solver.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Maximum Newton-Raphson iterations.
    pub max_iterations: usize,
    /// Convergence tolerance in volts.
    pub tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: MAX_ITERATIONS,
            tolerance: CONVERGENCE_TOLERANCE,
        }
    }
}

impl SolverConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum Newton-Raphson iterations.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the convergence tolerance (in volts).
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

/// Solved potentials per resolved net identity. Ground is implicitly 0 V.
#[derive(Debug, Clone, Default)]
pub struct PotentialMap {
    potentials: HashMap<NetId, f64>,
}

impl PotentialMap {
    /// An empty map: no data for any net.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Record the potential of a net.
    pub fn insert(&mut self, net: NetId, volts: f64) {
        self.potentials.insert(net, volts);
    }

    /// The potential of a net, if the solver produced one. The ground
    /// reference is always 0 V.
    pub fn get(&self, net: NetId) -> Option<f64> {
        if net.is_ground() {
            Some(0.0)
        } else {
            self.potentials.get(&net).copied()
        }
    }

    /// Whether the solve produced no data (failed or empty network).
    pub fn is_empty(&self) -> bool {
        self.potentials.is_empty()
    }

    /// Number of solved nets (excluding the implicit ground).
    pub fn len(&self) -> usize {
        self.potentials.len()
    }
}

/// The black-box solver boundary.
///
/// Implementations accept a structurally-valid network description and
/// return either one potential per net or an error; the tick layer treats
/// any error as "no data for any net this tick".
pub trait Solve {
    /// Compute the DC operating point of the network.
    fn operating_point(&mut self, netlist: &Netlist) -> Result<PotentialMap>;
}
