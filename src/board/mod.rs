//! Breadboard geometry and the rail/point registry.
//!
//! A board's hole grids are described by [`BoardConfig`] values; at
//! construction every hole becomes a [`Point`] and every bonded hole group
//! gets exactly one shared conductive node allocated in the arena. The
//! registry is static after construction: wires and plugins only ever look
//! points up, they never create nodes.

mod config;

pub use config::{
    BoardConfig, Discriminator, GroupRule, PointGroup, RailKey, SEGMENTS,
};

use std::collections::HashMap;

use crate::error::{ProtoboardError, Result};
use crate::net::{NodeArena, NodeHandle};
use crate::parts::Plugin;

/// One hole on a board (or a supply terminal), bonded to a shared
/// conductive node. Copyable: wires and LED terminals hold points by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub discriminator: Discriminator,
    pub node: NodeHandle,
}

/// A plugin and the hole it is anchored at.
#[derive(Debug, Clone)]
pub struct Placed {
    pub anchor: Discriminator,
    pub plugin: Plugin,
}

/// A breadboard: a main terminal-strip grid, optional power rails, and the
/// plugins seated on it.
#[derive(Debug)]
pub struct Breadboard {
    pub name: String,
    main_config: BoardConfig,
    rail_config: Option<BoardConfig>,
    points: HashMap<Discriminator, NodeHandle>,
    rails: HashMap<(PointGroup, RailKey), NodeHandle>,
    plugins: Vec<Placed>,
}

impl Breadboard {
    /// Build a board from its geometry, allocating one node per bonded rail.
    pub fn new(
        name: impl Into<String>,
        main_config: BoardConfig,
        rail_config: Option<BoardConfig>,
        arena: &mut NodeArena,
    ) -> Self {
        let mut board = Self {
            name: name.into(),
            main_config,
            rail_config,
            points: HashMap::new(),
            rails: HashMap::new(),
            plugins: Vec::new(),
        };
        board.create_points(PointGroup::Main, &main_config, arena);
        if let Some(rails) = rail_config {
            board.create_points(PointGroup::PowerRail, &rails, arena);
        }
        board
    }

    /// Deterministically enumerate every hole of one grid, reusing the rail
    /// node when the bonding rule says two holes are connected.
    fn create_points(&mut self, group: PointGroup, config: &BoardConfig, arena: &mut NodeArena) {
        for segment in 0..SEGMENTS {
            for repetition in 0..config.repetitions {
                for column in 0..config.columns {
                    for row in 0..config.rows {
                        let discriminator = Discriminator {
                            segment,
                            repetition,
                            column,
                            row,
                            group,
                        };
                        let key = (group, RailKey::from_discriminator(&discriminator, &config.rule));
                        let node = *self
                            .rails
                            .entry(key)
                            .or_insert_with(|| arena.alloc(false));
                        self.points.insert(discriminator, node);
                    }
                }
            }
        }
    }

    /// Look up the point at a hole address.
    pub fn point(&self, discriminator: Discriminator) -> Result<Point> {
        self.points
            .get(&discriminator)
            .map(|&node| Point {
                discriminator,
                node,
            })
            .ok_or(ProtoboardError::PointNotFound {
                segment: discriminator.segment,
                repetition: discriminator.repetition,
                column: discriminator.column,
                row: discriminator.row,
                group: discriminator.group.to_string(),
            })
    }

    /// Number of distinct rails on this board.
    pub fn rail_count(&self) -> usize {
        self.rails.len()
    }

    /// The hole addresses a DIP package's pins occupy when anchored at
    /// `anchor`. The lower pin half sits on the far segment, the upper half
    /// walks back along the anchor segment, mirroring physical DIP pin
    /// numbering around the package.
    pub fn pin_sites(&self, anchor: Discriminator, pin_count: usize) -> Vec<Discriminator> {
        (0..pin_count)
            .map(|i| {
                if i < pin_count / 2 {
                    Discriminator {
                        segment: anchor.segment + 1,
                        column: anchor.column + i,
                        ..anchor
                    }
                } else {
                    Discriminator {
                        segment: anchor.segment,
                        column: anchor.column + (pin_count - 1 - i),
                        ..anchor
                    }
                }
            })
            .collect()
    }

    /// Whether a DIP package of `pin_count` pins may sit at `anchor`: the
    /// anchor must be the last row of segment 0 on the main grid so the
    /// package straddles the channel, and the package must not overhang the
    /// board edge.
    pub fn dip_fits(&self, anchor: Discriminator, pin_count: usize) -> bool {
        anchor.group == PointGroup::Main
            && anchor.segment == 0
            && anchor.row == self.main_config.rows - 1
            && anchor.column + pin_count / 2 <= self.main_config.columns
    }

    /// The rail nodes a DIP package's pins bond to when anchored at `anchor`.
    pub fn pin_nodes(&self, anchor: Discriminator, pin_count: usize) -> Result<Vec<NodeHandle>> {
        self.pin_sites(anchor, pin_count)
            .into_iter()
            .map(|site| self.point(site).map(|p| p.node))
            .collect()
    }

    /// Whether a DIP package at `anchor` would share a rail with an
    /// already-seated DIP plugin.
    pub fn dip_collides(&self, anchor: Discriminator, pin_count: usize) -> Result<bool> {
        let wanted = self.pin_nodes(anchor, pin_count)?;
        for placed in &self.plugins {
            let occupied = match &placed.plugin {
                Plugin::SubCircuit(ic) => ic.pins(),
                Plugin::Switch(sw) => sw.pins(),
                Plugin::Led(_) => continue,
            };
            if occupied.iter().any(|node| wanted.contains(node)) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Seat a DIP plugin (IC or switch) at `anchor`, binding its pins to
    /// the underlying rails.
    pub fn place_dip(&mut self, anchor: Discriminator, mut plugin: Plugin) -> Result<()> {
        let pin_count = match plugin.dip_pin_count() {
            Some(count) => count,
            None => {
                return Err(ProtoboardError::pin_count_mismatch(plugin.name(), 2, 0));
            }
        };
        if !self.dip_fits(anchor, pin_count) {
            return Err(ProtoboardError::DipDoesNotFit {
                name: plugin.name().to_string(),
                pins: pin_count,
                column: anchor.column,
            });
        }
        if self.dip_collides(anchor, pin_count)? {
            return Err(ProtoboardError::DipCollision {
                name: plugin.name().to_string(),
            });
        }

        let nodes = self.pin_nodes(anchor, pin_count)?;
        match &mut plugin {
            Plugin::SubCircuit(ic) => ic.bind_pins(nodes)?,
            Plugin::Switch(sw) => sw.bind_pins(nodes)?,
            Plugin::Led(_) => unreachable!("LEDs are placed point-by-point"),
        }
        self.plugins.push(Placed { anchor, plugin });
        Ok(())
    }

    /// Register an LED whose anode has been bound to a point on this board.
    /// The cathode may still be unbound (mid-placement).
    pub fn place_led(&mut self, led: crate::parts::Led) -> Result<()> {
        let anchor = match led.anode {
            Some(point) => point.discriminator,
            None => {
                return Err(ProtoboardError::pin_count_mismatch(&led.name, 1, 0));
            }
        };
        self.plugins.push(Placed {
            anchor,
            plugin: Plugin::Led(led),
        });
        Ok(())
    }

    /// The seated plugins.
    pub fn plugins(&self) -> &[Placed] {
        &self.plugins
    }

    /// Mutable access to the seated plugins (switch toggling, feedback).
    pub fn plugins_mut(&mut self) -> &mut [Placed] {
        &mut self.plugins
    }

    /// Remove a plugin by index, returning it.
    pub fn remove_plugin(&mut self, index: usize) -> Placed {
        self.plugins.remove(index)
    }

    /// Release this board's rail nodes when the board is deleted. Handles
    /// held by wires drawn to the board go stale and are skipped at
    /// emission time.
    pub fn release_nodes(&self, arena: &mut NodeArena) {
        for &node in self.rails.values() {
            arena.release(node);
        }
    }

    /// Re-derive every plugin's node bindings from the geometry registry.
    ///
    /// After the board is reconstructed from persisted state the plugins
    /// carry stale node handles; bindings must come from the rebuilt rail
    /// registry, never from serialized identities.
    pub fn rebind_plugins(&mut self) -> Result<()> {
        for i in 0..self.plugins.len() {
            let anchor = self.plugins[i].anchor;
            if let Some(pin_count) = self.plugins[i].plugin.dip_pin_count() {
                let nodes = self.pin_nodes(anchor, pin_count)?;
                match &mut self.plugins[i].plugin {
                    Plugin::SubCircuit(ic) => ic.bind_pins(nodes)?,
                    Plugin::Switch(sw) => sw.bind_pins(nodes)?,
                    Plugin::Led(_) => {}
                }
            } else {
                let anode = match &self.plugins[i].plugin {
                    Plugin::Led(led) => led.anode.map(|p| p.discriminator),
                    _ => None,
                };
                let cathode = match &self.plugins[i].plugin {
                    Plugin::Led(led) => led.cathode.map(|p| p.discriminator),
                    _ => None,
                };
                let anode = anode.map(|d| self.point(d)).transpose()?;
                let cathode = cathode.map(|d| self.point(d)).transpose()?;
                if let Plugin::Led(led) = &mut self.plugins[i].plugin {
                    led.anode = anode;
                    led.cathode = cathode;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parts::{DipSwitch, SubCircuitInstance};

    fn small_board(arena: &mut NodeArena) -> Breadboard {
        let main = BoardConfig {
            columns: 8,
            rows: 5,
            repetitions: 1,
            rule: GroupRule::TERMINAL_STRIP,
        };
        Breadboard::new("BB1", main, Some(BoardConfig::power_rail()), arena)
    }

    fn quad_ic() -> SubCircuitInstance {
        let pins = ["A", "B", "GND", "VCC"].iter().map(|s| s.to_string()).collect();
        SubCircuitInstance::new("IC1", pins, ".subckt x 1 2\n.ends\n")
    }

    #[test]
    fn column_holes_share_one_node() {
        let mut arena = NodeArena::new();
        let board = small_board(&mut arena);
        let top = board.point(Discriminator::main(0, 0, 3, 0)).unwrap();
        let bottom = board.point(Discriminator::main(0, 0, 3, 4)).unwrap();
        let next_column = board.point(Discriminator::main(0, 0, 4, 0)).unwrap();
        assert_eq!(top.node, bottom.node);
        assert_ne!(top.node, next_column.node);
    }

    #[test]
    fn rail_count_matches_geometry() {
        let mut arena = NodeArena::new();
        let board = small_board(&mut arena);
        // Main grid: 2 segments x 8 columns; power rails: 2 segments x 2 rows
        assert_eq!(board.rail_count(), 2 * 8 + 2 * 2);
        assert_eq!(arena.len(), board.rail_count());
    }

    #[test]
    fn missing_point_is_reported() {
        let mut arena = NodeArena::new();
        let board = small_board(&mut arena);
        assert!(board.point(Discriminator::main(0, 0, 99, 0)).is_err());
    }

    #[test]
    fn pin_sites_straddle_the_channel() {
        let mut arena = NodeArena::new();
        let board = small_board(&mut arena);
        let anchor = Discriminator::main(0, 0, 2, 4);
        let sites = board.pin_sites(anchor, 4);
        // Lower half on segment 1 walking right, upper half on segment 0
        // walking back left
        assert_eq!(sites[0], Discriminator::main(1, 0, 2, 4));
        assert_eq!(sites[1], Discriminator::main(1, 0, 3, 4));
        assert_eq!(sites[2], Discriminator::main(0, 0, 3, 4));
        assert_eq!(sites[3], Discriminator::main(0, 0, 2, 4));
    }

    #[test]
    fn dip_fit_requires_channel_row_and_width() {
        let mut arena = NodeArena::new();
        let board = small_board(&mut arena);
        assert!(board.dip_fits(Discriminator::main(0, 0, 2, 4), 4));
        // Wrong row
        assert!(!board.dip_fits(Discriminator::main(0, 0, 2, 3), 4));
        // Wrong segment
        assert!(!board.dip_fits(Discriminator::main(1, 0, 2, 4), 4));
        // Overhangs the right edge
        assert!(!board.dip_fits(Discriminator::main(0, 0, 7, 4), 4));
    }

    #[test]
    fn overlapping_dips_collide() {
        let mut arena = NodeArena::new();
        let mut board = small_board(&mut arena);
        let anchor = Discriminator::main(0, 0, 2, 4);
        board
            .place_dip(anchor, Plugin::SubCircuit(quad_ic()))
            .unwrap();

        // Same columns collide, disjoint columns do not
        assert!(board.dip_collides(anchor, 4).unwrap());
        assert!(!board.dip_collides(Discriminator::main(0, 0, 5, 4), 4).unwrap());

        let err = board
            .place_dip(anchor, Plugin::Switch(DipSwitch::new("SW1", true)))
            .unwrap_err();
        assert!(matches!(err, ProtoboardError::DipCollision { .. }));
    }

    #[test]
    fn rebind_refreshes_pin_bindings() {
        let mut arena = NodeArena::new();
        let mut board = small_board(&mut arena);
        let anchor = Discriminator::main(0, 0, 1, 4);
        board
            .place_dip(anchor, Plugin::SubCircuit(quad_ic()))
            .unwrap();

        let before: Vec<_> = match &board.plugins()[0].plugin {
            Plugin::SubCircuit(ic) => ic.pins().to_vec(),
            _ => unreachable!(),
        };
        board.rebind_plugins().unwrap();
        let after: Vec<_> = match &board.plugins()[0].plugin {
            Plugin::SubCircuit(ic) => ic.pins().to_vec(),
            _ => unreachable!(),
        };
        // Geometry has not changed, so rebinding is a fixed point
        assert_eq!(before, after);
    }
}
