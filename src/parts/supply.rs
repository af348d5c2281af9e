//! Bench power supply.

use crate::board::{Discriminator, Point, PointGroup};
use crate::net::NodeArena;

/// A two-terminal power supply.
///
/// The positive terminal is an ordinary conductive node; the negative
/// terminal is a sink, so every component connected to it resolves to the
/// canonical ground identity.
#[derive(Debug, Clone)]
pub struct PowerSupply {
    pub name: String,
    /// Nominal output voltage (signed).
    pub voltage: f64,
    /// Positive terminal.
    pub positive: Point,
    /// Negative (sink) terminal.
    pub negative: Point,
}

impl PowerSupply {
    /// Create a supply, allocating its two terminal nodes in the arena.
    pub fn new(name: impl Into<String>, voltage: f64, arena: &mut NodeArena) -> Self {
        let positive = Point {
            discriminator: Discriminator {
                segment: 0,
                repetition: 0,
                column: 0,
                row: 1,
                group: PointGroup::Supply,
            },
            node: arena.alloc(false),
        };
        let negative = Point {
            discriminator: Discriminator {
                segment: 0,
                repetition: 0,
                column: 0,
                row: 0,
                group: PointGroup::Supply,
            },
            node: arena.alloc(true),
        };
        Self {
            name: name.into(),
            voltage,
            positive,
            negative,
        }
    }
}
