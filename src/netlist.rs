//! Solver-ready network description and the emission pass.
//!
//! After identities are resolved, every placed part is walked once and
//! flattened into [`Element`] values that reference nodes only by resolved
//! [`NetId`]. Switches contribute nothing here: their bridging is already
//! folded into connectivity. A dead LED is omitted entirely, and an LED
//! still mid-placement (cathode unbound) is skipped for the tick.

use std::collections::BTreeSet;

use log::warn;

use crate::board::Breadboard;
use crate::error::{ProtoboardError, Result};
use crate::net::{NetId, NodeArena, NodeHandle};
use crate::parts::{LedModel, Plugin, PowerSupply, Wire};

/// One solver element, referencing nets by resolved identity.
#[derive(Debug, Clone)]
pub enum Element {
    /// Two-terminal ideal voltage source.
    Source {
        name: String,
        positive: NetId,
        negative: NetId,
        volts: f64,
    },
    /// Discrete resistor (a wire with resistance > 0).
    Resistor {
        name: String,
        a: NetId,
        b: NetId,
        ohms: f64,
    },
    /// LED junction with its calibrated device model.
    Diode {
        name: String,
        anode: NetId,
        cathode: NetId,
        model: LedModel,
    },
    /// Opaque sub-circuit instance; the internal netlist text is passed
    /// through to the solver unmodified.
    SubCircuit {
        name: String,
        pins: Vec<NetId>,
        pin_names: Vec<String>,
        netlist_text: String,
    },
}

impl Element {
    /// The element's name, for diagnostics.
    pub fn name(&self) -> &str {
        match self {
            Element::Source { name, .. }
            | Element::Resistor { name, .. }
            | Element::Diode { name, .. }
            | Element::SubCircuit { name, .. } => name,
        }
    }

    /// Every net this element references.
    pub fn nets(&self) -> Vec<NetId> {
        match self {
            Element::Source {
                positive, negative, ..
            } => vec![*positive, *negative],
            Element::Resistor { a, b, .. } => vec![*a, *b],
            Element::Diode { anode, cathode, .. } => vec![*anode, *cathode],
            Element::SubCircuit { pins, .. } => pins.clone(),
        }
    }
}

/// The network description handed to the solver: the full resolved-net
/// registry plus a flat element list.
#[derive(Debug, Default)]
pub struct Netlist {
    /// Every resolved identity present in the node registry this tick.
    pub nets: BTreeSet<NetId>,
    /// Flat element list.
    pub elements: Vec<Element>,
}

impl Netlist {
    /// Whether the network has no elements (the solver must not be invoked).
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Check that no element references a net missing from the registry.
    pub fn validate(&self) -> Result<()> {
        for element in &self.elements {
            for net in element.nets() {
                if !self.nets.contains(&net) {
                    return Err(ProtoboardError::dangling_net(
                        element.name(),
                        net.to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Resolve a handle, or skip the element it belongs to.
///
/// A handle pointing at a vacated arena slot is a structural inconsistency:
/// fatal in development builds, skipped in production so the tick stays
/// interactive.
fn resolved_or_skip(arena: &NodeArena, handle: NodeHandle, element: &str) -> Option<NetId> {
    let resolved = arena.resolved(handle);
    debug_assert!(
        resolved.is_some(),
        "element {element} references vacated node {handle}"
    );
    if resolved.is_none() {
        warn!("skipping {element}: node {handle} is not in the registry");
    }
    resolved
}

/// Walk all placed parts and emit the tick's network description.
///
/// Malformed parts are skipped rather than aborting the tick.
pub fn emit_netlist(
    arena: &NodeArena,
    supplies: &[PowerSupply],
    boards: &[Breadboard],
    wires: &[Wire],
) -> Netlist {
    let mut netlist = Netlist {
        nets: arena
            .handles()
            .filter_map(|handle| arena.resolved(handle))
            .collect(),
        elements: Vec::new(),
    };
    // The ground reference exists even when no sink is placed
    netlist.nets.insert(NetId::GROUND);

    // Power supplies: one source element each
    for (index, supply) in supplies.iter().enumerate() {
        let name = format!("V{index}");
        let positive = resolved_or_skip(arena, supply.positive.node, &name);
        let negative = resolved_or_skip(arena, supply.negative.node, &name);
        if let (Some(positive), Some(negative)) = (positive, negative) {
            netlist.elements.push(Element::Source {
                name,
                positive,
                negative,
                volts: supply.voltage,
            });
        }
    }

    // Resistive wires: one resistor element each; bonds were already folded
    // into connectivity
    for (index, wire) in wires.iter().enumerate() {
        if wire.is_bond() {
            continue;
        }
        let name = format!("R{index}");
        let a = resolved_or_skip(arena, wire.a.node, &name);
        let b = resolved_or_skip(arena, wire.b.node, &name);
        if let (Some(a), Some(b)) = (a, b) {
            netlist.elements.push(Element::Resistor {
                name,
                a,
                b,
                ohms: wire.resistance(),
            });
        }
    }

    // Board plugins: sub-circuit instances and live LEDs. Switches emit
    // nothing - their effect is connectivity only.
    for (board_index, board) in boards.iter().enumerate() {
        for (plugin_index, placed) in board.plugins().iter().enumerate() {
            match &placed.plugin {
                Plugin::SubCircuit(ic) => {
                    let name = format!("X{board_index}_{plugin_index}");
                    let pins: Option<Vec<NetId>> = ic
                        .pins()
                        .iter()
                        .map(|&pin| resolved_or_skip(arena, pin, &name))
                        .collect();
                    match pins {
                        Some(pins) if pins.len() == ic.pin_count() => {
                            netlist.elements.push(Element::SubCircuit {
                                name,
                                pins,
                                pin_names: ic.pin_names.clone(),
                                netlist_text: ic.netlist_text.clone(),
                            });
                        }
                        _ => warn!("skipping {name}: incomplete pin binding"),
                    }
                }
                Plugin::Led(led) => {
                    if !led.alive {
                        continue;
                    }
                    let (anode, cathode) = match (led.anode, led.cathode) {
                        (Some(a), Some(c)) => (a, c),
                        // Mid-placement: cathode not yet bound
                        _ => continue,
                    };
                    let name = format!("D{board_index}_{plugin_index}");
                    let anode = resolved_or_skip(arena, anode.node, &name);
                    let cathode = resolved_or_skip(arena, cathode.node, &name);
                    if let (Some(anode), Some(cathode)) = (anode, cathode) {
                        netlist.elements.push(Element::Diode {
                            name,
                            anode,
                            cathode,
                            model: led.model,
                        });
                    }
                }
                Plugin::Switch(_) => {}
            }
        }
    }

    netlist
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardConfig, Breadboard, Discriminator, GroupRule};
    use crate::net::{assign_identities, connected_components};
    use crate::parts::{DipSwitch, Led};

    struct Bench {
        arena: NodeArena,
        board: Breadboard,
    }

    fn bench() -> Bench {
        let mut arena = NodeArena::new();
        let main = BoardConfig {
            columns: 8,
            rows: 5,
            repetitions: 1,
            rule: GroupRule::TERMINAL_STRIP,
        };
        let board = Breadboard::new("BB1", main, None, &mut arena);
        Bench { arena, board }
    }

    fn resolve_all(arena: &mut NodeArena, pairs: &[(NodeHandle, NodeHandle)]) {
        let components = connected_components(arena.capacity(), pairs);
        assign_identities(arena, &components).unwrap();
    }

    #[test]
    fn resistive_wire_emits_one_resistor() {
        let mut b = bench();
        let p1 = b.board.point(Discriminator::main(0, 0, 0, 0)).unwrap();
        let p2 = b.board.point(Discriminator::main(0, 0, 1, 0)).unwrap();
        let wires = vec![
            Wire::with_resistance(p1, p2, 470.0).unwrap(),
            Wire::bond(p1, p2),
        ];
        resolve_all(&mut b.arena, &[(p1.node, p2.node)]);
        let netlist = emit_netlist(&b.arena, &[], &[], &wires);

        let resistors: Vec<_> = netlist
            .elements
            .iter()
            .filter(|e| matches!(e, Element::Resistor { .. }))
            .collect();
        assert_eq!(resistors.len(), 1);
        assert_eq!(netlist.elements.len(), 1);
    }

    #[test]
    fn live_led_emits_one_diode_and_dead_led_none() {
        let mut b = bench();
        let anode = b.board.point(Discriminator::main(0, 0, 0, 0)).unwrap();
        let cathode = b.board.point(Discriminator::main(0, 0, 1, 0)).unwrap();

        let mut lit = Led::new("LED1");
        lit.bind_anode(anode);
        lit.bind_cathode(cathode);
        let mut dead = Led::new("LED2");
        dead.bind_anode(anode);
        dead.bind_cathode(cathode);
        dead.destroy();

        b.board.place_led(lit).unwrap();
        b.board.place_led(dead).unwrap();
        resolve_all(&mut b.arena, &[]);
        let netlist = emit_netlist(&b.arena, &[], std::slice::from_ref(&b.board), &[]);

        let diodes: Vec<_> = netlist
            .elements
            .iter()
            .filter(|e| matches!(e, Element::Diode { .. }))
            .collect();
        assert_eq!(diodes.len(), 1);
    }

    #[test]
    fn mid_placement_led_is_skipped() {
        let mut b = bench();
        let anode = b.board.point(Discriminator::main(0, 0, 0, 0)).unwrap();
        let mut led = Led::new("LED1");
        led.bind_anode(anode);
        b.board.place_led(led).unwrap();

        resolve_all(&mut b.arena, &[]);
        let netlist = emit_netlist(&b.arena, &[], std::slice::from_ref(&b.board), &[]);
        assert!(netlist.is_empty());
    }

    #[test]
    fn switches_are_never_double_emitted() {
        let mut b = bench();
        let anchor = Discriminator::main(0, 0, 0, 4);
        let mut sw = DipSwitch::new("SW1", true);
        sw.set_state(true);
        b.board.place_dip(anchor, Plugin::Switch(sw)).unwrap();

        resolve_all(&mut b.arena, &[]);
        let netlist = emit_netlist(&b.arena, &[], std::slice::from_ref(&b.board), &[]);
        assert!(netlist.is_empty());
    }

    #[test]
    fn emission_uses_resolved_identities() {
        let mut b = bench();
        let supply = PowerSupply::new("PSU", 5.0, &mut b.arena);
        let p1 = b.board.point(Discriminator::main(0, 0, 0, 0)).unwrap();
        let p2 = b.board.point(Discriminator::main(0, 0, 1, 0)).unwrap();

        // Bond the supply's negative rail into p2's column
        let pairs = [(supply.negative.node, p2.node)];
        resolve_all(&mut b.arena, &pairs);

        let wires = vec![Wire::with_resistance(p1, p2, 330.0).unwrap()];
        let netlist = emit_netlist(&b.arena, &[supply], &[], &wires);

        match &netlist.elements[1] {
            Element::Resistor { b: net_b, .. } => assert_eq!(*net_b, NetId::GROUND),
            other => panic!("expected resistor, got {other:?}"),
        }
        netlist.validate().unwrap();
    }

    #[test]
    fn validate_catches_dangling_nets() {
        let netlist = Netlist {
            nets: BTreeSet::new(),
            elements: vec![Element::Resistor {
                name: "R0".to_string(),
                a: NetId(1),
                b: NetId(2),
                ohms: 100.0,
            }],
        };
        assert!(netlist.validate().is_err());
    }
}
