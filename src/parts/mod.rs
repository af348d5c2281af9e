//! Placeable electrical parts.
//!
//! This module provides the closed set of devices the engine understands:
//! - [`PowerSupply`] - two-terminal voltage source with a sink negative rail
//! - [`Wire`] - user-drawn connection, ideal or resistive
//! - [`Led`] - diode display device with a destructible junction
//! - [`DipSwitch`] - 6-pin bridging switch
//! - [`SubCircuitInstance`] - opaque DIP package passed through to the solver
//!
//! Board-pluggable devices are gathered in the [`Plugin`] variant so the
//! emission and feedback passes match exhaustively; adding a device kind
//! forces every pass to handle it.

mod led;
mod subcircuit;
mod supply;
mod switch;

pub use led::{Led, LedModel, LedPhase, LED_V_HIGH, LED_V_LOW};
pub use subcircuit::SubCircuitInstance;
pub use supply::PowerSupply;
pub use switch::{DipSwitch, SWITCH_PIN_COUNT};

use crate::board::Point;
use crate::error::{ProtoboardError, Result};

/// A device plugged into a breadboard.
#[derive(Debug, Clone)]
pub enum Plugin {
    SubCircuit(SubCircuitInstance),
    Led(Led),
    Switch(DipSwitch),
}

impl Plugin {
    /// Get the part name.
    pub fn name(&self) -> &str {
        match self {
            Plugin::SubCircuit(ic) => &ic.name,
            Plugin::Led(led) => &led.name,
            Plugin::Switch(sw) => &sw.name,
        }
    }

    /// Number of DIP pins this plugin occupies on the board, or `None` for
    /// devices bound point-by-point (LEDs).
    pub fn dip_pin_count(&self) -> Option<usize> {
        match self {
            Plugin::SubCircuit(ic) => Some(ic.pin_count()),
            Plugin::Switch(_) => Some(SWITCH_PIN_COUNT),
            Plugin::Led(_) => None,
        }
    }
}

/// A user-drawn wire between two connection points.
///
/// A wire with zero resistance is an ideal conductor and participates in
/// node unification; any positive resistance makes it a discrete resistor
/// element instead. The criterion is `resistance == 0.0` exactly, never a
/// truthiness-style threshold.
#[derive(Debug, Clone, Copy)]
pub struct Wire {
    pub a: Point,
    pub b: Point,
    resistance: f64,
}

impl Wire {
    /// Create an ideal (zero-resistance) wire.
    pub fn bond(a: Point, b: Point) -> Self {
        Self {
            a,
            b,
            resistance: 0.0,
        }
    }

    /// Create a wire with the given resistance in ohms.
    pub fn with_resistance(a: Point, b: Point, resistance: f64) -> Result<Self> {
        if resistance < 0.0 || resistance.is_nan() {
            return Err(ProtoboardError::NegativeResistance { resistance });
        }
        Ok(Self { a, b, resistance })
    }

    /// Resistance in ohms. Non-negative: the field is only written through
    /// the validating constructors.
    pub fn resistance(&self) -> f64 {
        self.resistance
    }

    /// Whether this wire merges its endpoints during unification.
    pub fn is_bond(&self) -> bool {
        self.resistance == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Discriminator, PointGroup};
    use crate::net::NodeHandle;

    fn point(n: usize) -> Point {
        Point {
            discriminator: Discriminator {
                segment: 0,
                repetition: 0,
                column: n,
                row: 0,
                group: PointGroup::Main,
            },
            node: NodeHandle(n),
        }
    }

    #[test]
    fn invalid_resistance_is_rejected() {
        assert!(Wire::with_resistance(point(0), point(1), -1.0).is_err());
        assert!(Wire::with_resistance(point(0), point(1), f64::NAN).is_err());
    }

    #[test]
    fn only_exactly_zero_resistance_bonds() {
        assert!(Wire::bond(point(0), point(1)).is_bond());
        assert!(Wire::with_resistance(point(0), point(1), 0.0).unwrap().is_bond());
        assert!(!Wire::with_resistance(point(0), point(1), 1e-9).unwrap().is_bond());
    }
}
