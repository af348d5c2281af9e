//! The workbench: part inventory and the per-tick simulation pass.
//!
//! Every tick runs the same fixed sequence:
//!
//! 1. collect zero-resistance bonds (ideal wires, switch bridges)
//! 2. partition the node registry into connected components
//! 3. assign one canonical identity per component (sinks collapse to ground)
//! 4. emit the network description
//! 5. solve the operating point and feed potentials back into devices
//!
//! An empty network short-circuits after step 4: the solver is never
//! invoked and every display device is forced dark.

use log::{debug, info, warn};

use crate::board::{BoardConfig, Breadboard};
use crate::net::{assign_identities, connected_components, NodeArena, NodeHandle};
use crate::netlist::emit_netlist;
use crate::parts::{Plugin, PowerSupply, Wire, LED_V_HIGH, LED_V_LOW};
use crate::solver::{PotentialMap, Solve};

/// A user-facing notice produced by a tick. Ticks never abort; anything
/// that went wrong is reported here instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    /// Operating-point analysis failed. Device states were left untouched,
    /// so displays show the last successfully solved tick.
    SolveFailed { message: String },
    /// An LED was overdriven this tick and is permanently destroyed.
    LedDestroyed { name: String },
    /// A placed LED sits on a net the solver produced no potential for;
    /// the device is dark this tick.
    FloatingLed { name: String },
}

/// What one tick produced.
#[derive(Debug, Default)]
pub struct TickReport {
    /// Net potentials from the solver; empty when the solve was skipped
    /// or failed.
    pub potentials: PotentialMap,
    /// False when the network was empty and the solver was never invoked.
    pub solver_invoked: bool,
    /// Elements in the emitted network description.
    pub elements_emitted: usize,
    pub advisories: Vec<Advisory>,
}

/// The whole prototyping bench: the node registry plus every placed part.
///
/// Single-threaded by construction; a tick borrows the bench mutably for
/// its full duration so no pass ever observes a half-updated registry.
#[derive(Debug, Default)]
pub struct Workbench {
    arena: NodeArena,
    supplies: Vec<PowerSupply>,
    boards: Vec<Breadboard>,
    wires: Vec<Wire>,
}

impl Workbench {
    /// Create an empty bench.
    pub fn new() -> Self {
        Self::default()
    }

    /// The node registry.
    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    /// Add a breadboard, allocating its rail nodes. Returns the board index.
    pub fn add_board(
        &mut self,
        name: impl Into<String>,
        main_config: BoardConfig,
        rail_config: Option<BoardConfig>,
    ) -> usize {
        self.boards
            .push(Breadboard::new(name, main_config, rail_config, &mut self.arena));
        self.boards.len() - 1
    }

    /// Add a power supply, allocating its terminal nodes. Returns the
    /// supply index.
    pub fn add_supply(&mut self, name: impl Into<String>, voltage: f64) -> usize {
        self.supplies
            .push(PowerSupply::new(name, voltage, &mut self.arena));
        self.supplies.len() - 1
    }

    /// Draw a wire between two connection points.
    pub fn add_wire(&mut self, wire: Wire) -> usize {
        self.wires.push(wire);
        self.wires.len() - 1
    }

    pub fn boards(&self) -> &[Breadboard] {
        &self.boards
    }

    pub fn boards_mut(&mut self) -> &mut [Breadboard] {
        &mut self.boards
    }

    pub fn supplies(&self) -> &[PowerSupply] {
        &self.supplies
    }

    pub fn supplies_mut(&mut self) -> &mut [PowerSupply] {
        &mut self.supplies
    }

    pub fn wires(&self) -> &[Wire] {
        &self.wires
    }

    /// Delete a wire.
    pub fn remove_wire(&mut self, index: usize) -> Wire {
        self.wires.remove(index)
    }

    /// Delete a supply, releasing its terminal nodes.
    pub fn remove_supply(&mut self, index: usize) -> PowerSupply {
        let supply = self.supplies.remove(index);
        self.arena.release(supply.positive.node);
        self.arena.release(supply.negative.node);
        supply
    }

    /// Delete a board, releasing its rail nodes. Wires drawn to the board
    /// become stale and are ignored by both bond collection and emission.
    pub fn remove_board(&mut self, index: usize) -> Breadboard {
        let board = self.boards.remove(index);
        board.release_nodes(&mut self.arena);
        board
    }

    /// The user stopped pressing parts: volatile switches spring back off.
    pub fn release_switches(&mut self) {
        for board in &mut self.boards {
            for placed in board.plugins_mut() {
                if let Plugin::Switch(sw) = &mut placed.plugin {
                    sw.release();
                }
            }
        }
    }

    /// Every zero-resistance bond in effect right now: ideal wires plus the
    /// bridges of every placed switch in its current position.
    pub fn bond_pairs(&self) -> Vec<(NodeHandle, NodeHandle)> {
        let mut pairs: Vec<(NodeHandle, NodeHandle)> = self
            .wires
            .iter()
            .filter(|wire| wire.is_bond())
            .map(|wire| (wire.a.node, wire.b.node))
            .collect();
        for board in &self.boards {
            for placed in board.plugins() {
                if let Plugin::Switch(sw) = &placed.plugin {
                    pairs.extend(sw.bonded_pairs());
                }
            }
        }
        // A wire can outlive the board or supply it was drawn to; a pair
        // with a vacated endpoint is dropped instead of aborting the tick
        pairs.retain(|&(a, b)| self.arena.contains(a) && self.arena.contains(b));
        pairs
    }

    /// Run one full simulation tick.
    pub fn tick(&mut self, solver: &mut dyn Solve) -> TickReport {
        let pairs = self.bond_pairs();
        let components = connected_components(self.arena.capacity(), &pairs);
        if let Err(err) = assign_identities(&mut self.arena, &components) {
            warn!("identity assignment failed: {err}");
            return TickReport {
                advisories: vec![Advisory::SolveFailed {
                    message: err.to_string(),
                }],
                ..TickReport::default()
            };
        }

        let netlist = emit_netlist(&self.arena, &self.supplies, &self.boards, &self.wires);
        let mut report = TickReport {
            elements_emitted: netlist.elements.len(),
            ..TickReport::default()
        };

        if netlist.is_empty() {
            debug!("empty network, solver skipped");
            self.force_leds_dark();
            return report;
        }

        report.solver_invoked = true;
        match solver.operating_point(&netlist) {
            Ok(potentials) => {
                debug!("solved {} nets", potentials.len());
                report.potentials = potentials;
                self.apply_led_feedback(&report.potentials, &mut report.advisories);
            }
            Err(err) => {
                warn!("operating-point analysis failed: {err}");
                report.advisories.push(Advisory::SolveFailed {
                    message: err.to_string(),
                });
            }
        }
        report
    }

    /// No network to solve: every live LED goes dark.
    fn force_leds_dark(&mut self) {
        for board in &mut self.boards {
            for placed in board.plugins_mut() {
                if let Plugin::Led(led) = &mut placed.plugin {
                    if led.alive {
                        led.state = false;
                    }
                }
            }
        }
    }

    /// Rewrite every live LED's visual state from the solved potentials.
    ///
    /// A drop inside the conduction band lights the device; a drop above it
    /// destroys the device for good. LEDs on floating nets (no potential in
    /// the map) are dark.
    fn apply_led_feedback(&mut self, potentials: &PotentialMap, advisories: &mut Vec<Advisory>) {
        for board in &mut self.boards {
            for placed in board.plugins_mut() {
                let Plugin::Led(led) = &mut placed.plugin else {
                    continue;
                };
                if !led.alive {
                    continue;
                }
                let (anode, cathode) = match (led.anode, led.cathode) {
                    (Some(anode), Some(cathode)) => (anode, cathode),
                    // Mid-placement
                    _ => {
                        led.state = false;
                        continue;
                    }
                };
                let nets = (
                    self.arena.resolved(anode.node),
                    self.arena.resolved(cathode.node),
                );
                let (anode_net, cathode_net) = match nets {
                    (Some(a), Some(c)) => (a, c),
                    _ => {
                        led.state = false;
                        continue;
                    }
                };
                let volts = (potentials.get(anode_net), potentials.get(cathode_net));
                let (v_anode, v_cathode) = match volts {
                    (Some(a), Some(c)) => (a, c),
                    _ => {
                        led.state = false;
                        advisories.push(Advisory::FloatingLed {
                            name: led.name.clone(),
                        });
                        continue;
                    }
                };
                let drop = v_anode - v_cathode;
                if drop > LED_V_HIGH {
                    info!("{} overdriven at {drop:.2} V", led.name);
                    led.destroy();
                    advisories.push(Advisory::LedDestroyed {
                        name: led.name.clone(),
                    });
                } else {
                    led.state = drop >= LED_V_LOW;
                }
            }
        }
    }
}
