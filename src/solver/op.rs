//! The bundled DC operating-point solver.

use std::collections::HashMap;

use crate::error::{ProtoboardError, Result};
use crate::net::NetId;
use crate::netlist::{Element, Netlist};

use super::mna::MnaMatrix;
use super::newton::{max_delta, Junction};
use super::{PotentialMap, Solve, SolverConfig, MIN_CONDUCTANCE};

/// A diode being iterated: its external matrix indices, the internal net
/// behind the parasitic series resistance, and the junction operating point
/// carried between Newton iterations.
struct DiodeSlot {
    anode: Option<usize>,
    cathode: Option<usize>,
    internal: usize,
    junction: Junction,
    series_conductance: f64,
    v_op: f64,
}

/// MNA-based implementation of the [`Solve`] boundary.
///
/// Supports sources, resistors and LED junctions. Raw-SPICE sub-circuit
/// instances are opaque to this implementation and fail the solve; a
/// SPICE-backed implementation of [`Solve`] would accept them.
#[derive(Debug, Default)]
pub struct OperatingPointSolver {
    config: SolverConfig,
}

impl OperatingPointSolver {
    /// Create a solver with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a solver with a custom configuration.
    pub fn with_config(config: SolverConfig) -> Self {
        Self { config }
    }
}

impl Solve for OperatingPointSolver {
    fn operating_point(&mut self, netlist: &Netlist) -> Result<PotentialMap> {
        netlist.validate()?;

        if let Some(element) = netlist
            .elements
            .iter()
            .find(|e| matches!(e, Element::SubCircuit { .. }))
        {
            return Err(ProtoboardError::UnsupportedElement {
                element: element.name().to_string(),
            });
        }

        // Assign matrix indices to the non-ground nets elements touch.
        // Isolated nets get no row: a row with no stamps is singular.
        let mut index: HashMap<NetId, usize> = HashMap::new();
        for element in &netlist.elements {
            for net in element.nets() {
                if !net.is_ground() {
                    let next = index.len();
                    index.entry(net).or_insert(next);
                }
            }
        }
        let node_count = index.len();
        let idx = |net: NetId| -> Option<usize> { index.get(&net).copied() };

        // Layout: net rows, then one internal net per diode (behind its
        // series resistance), then one branch row per source.
        let diode_count = netlist
            .elements
            .iter()
            .filter(|e| matches!(e, Element::Diode { .. }))
            .count();
        let branch_base = node_count + diode_count;

        let mut diodes: Vec<DiodeSlot> = Vec::with_capacity(diode_count);
        let mut sources: Vec<(Option<usize>, Option<usize>, usize, f64)> = Vec::new();
        let mut resistors: Vec<(Option<usize>, Option<usize>, f64)> = Vec::new();

        for element in &netlist.elements {
            match element {
                Element::Source {
                    positive,
                    negative,
                    volts,
                    ..
                } => {
                    let branch = branch_base + sources.len();
                    sources.push((idx(*positive), idx(*negative), branch, *volts));
                }
                Element::Resistor { a, b, ohms, .. } => {
                    resistors.push((idx(*a), idx(*b), (1.0 / ohms).max(MIN_CONDUCTANCE)));
                }
                Element::Diode {
                    anode,
                    cathode,
                    model,
                    ..
                } => {
                    let internal = node_count + diodes.len();
                    let series_conductance = if model.series_resistance > 0.0 {
                        1.0 / model.series_resistance
                    } else {
                        // Effectively a direct bond to the junction
                        1.0 / MIN_CONDUCTANCE
                    };
                    diodes.push(DiodeSlot {
                        anode: idx(*anode),
                        cathode: idx(*cathode),
                        internal,
                        junction: Junction::from_model(model),
                        series_conductance,
                        v_op: 0.0,
                    });
                }
                Element::SubCircuit { .. } => unreachable!("rejected above"),
            }
        }

        let size = branch_base + sources.len();
        if size == 0 {
            // Everything resolved to ground; nothing to solve
            return Ok(PotentialMap::empty());
        }

        let mut matrix = MnaMatrix::new(size);
        let mut x_prev = vec![0.0; size];
        let mut converged = false;
        let mut residual = 0.0;

        for _ in 0..self.config.max_iterations {
            matrix.clear();

            // Tiny leak from every net to ground keeps floating islands
            // (e.g. an LED with no supply path) solvable instead of singular
            for i in 0..node_count {
                matrix.stamp_conductance(Some(i), None, MIN_CONDUCTANCE);
            }

            for &(pos, neg, branch, volts) in &sources {
                matrix.stamp_voltage_source(pos, neg, branch, volts);
            }
            for &(a, b, g) in &resistors {
                matrix.stamp_conductance(a, b, g);
            }
            // Damped limiting can move the junction operating points while
            // the linear solution barely changes, so the shift counts
            // toward the residual too
            let mut op_shift = 0.0f64;
            for slot in &mut diodes {
                matrix.stamp_conductance(slot.anode, Some(slot.internal), slot.series_conductance);

                // Linearize the junction around the previous solution,
                // with the Newton step limited
                let v_internal = matrix.voltage(Some(slot.internal));
                let v_cathode = matrix.voltage(slot.cathode);
                let v_limited = slot.junction.limit_step(slot.v_op, v_internal - v_cathode);
                op_shift = op_shift.max((v_limited - slot.v_op).abs());
                slot.v_op = v_limited;
                let (g, i_eq) = slot.junction.linearize(slot.v_op);
                matrix.stamp_conductance(Some(slot.internal), slot.cathode, g);
                matrix.stamp_current_source(Some(slot.internal), slot.cathode, i_eq);
            }

            matrix.factor()?;
            matrix.solve()?;

            if diodes.is_empty() {
                converged = true;
                break;
            }

            residual = max_delta(matrix.solution(), &x_prev).max(op_shift);
            x_prev.copy_from_slice(matrix.solution());
            if residual < self.config.tolerance {
                converged = true;
                break;
            }
        }

        if !converged {
            return Err(ProtoboardError::convergence_failure(
                self.config.max_iterations,
                residual,
            ));
        }

        let mut potentials = PotentialMap::empty();
        for (net, i) in &index {
            potentials.insert(*net, matrix.voltage(Some(*i)));
        }
        Ok(potentials)
    }
}
