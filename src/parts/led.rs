//! LED display device.

use crate::board::Point;

/// Lower edge of the conduction band: below this anode-cathode drop the
/// junction passes too little current to light.
pub const LED_V_LOW: f64 = 1.0;

/// Upper edge of the conduction band: a drop above this permanently
/// destroys the device.
pub const LED_V_HIGH: f64 = 2.2;

/// Calibrated diode model for the LED junction. These are fixed device
/// constants, not user-configurable.
#[derive(Debug, Clone, Copy)]
pub struct LedModel {
    /// Saturation current Is in amperes.
    pub saturation_current: f64,
    /// Emission coefficient N.
    pub emission_coefficient: f64,
    /// Ohmic parasitic resistance Rs in ohms.
    pub series_resistance: f64,
}

impl Default for LedModel {
    fn default() -> Self {
        Self {
            saturation_current: 3e-18,
            emission_coefficient: 2.0,
            series_resistance: 17.0,
        }
    }
}

/// Visual phase of an LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedPhase {
    /// Alive, not conducting enough to light.
    AliveOff,
    /// Alive and lit.
    AliveOn,
    /// Overdriven at some past tick. Terminal: no outgoing transitions.
    Dead,
}

/// A light-emitting diode plugged into breadboard points.
///
/// The anode is bound when the part is dropped onto a point; the cathode is
/// bound by a second click. Until both are bound the device is
/// mid-placement and contributes nothing to the network.
#[derive(Debug, Clone)]
pub struct Led {
    pub name: String,
    pub anode: Option<Point>,
    pub cathode: Option<Point>,
    /// False once the junction has been overdriven; never recovers.
    pub alive: bool,
    /// Current visual on/off, rewritten by the feedback pass each tick.
    pub state: bool,
    pub model: LedModel,
}

impl Led {
    /// Create an unplaced LED.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            anode: None,
            cathode: None,
            alive: true,
            state: false,
            model: LedModel::default(),
        }
    }

    /// Bind the anode terminal (first placement click).
    pub fn bind_anode(&mut self, point: Point) {
        self.anode = Some(point);
    }

    /// Bind the cathode terminal (second placement click).
    pub fn bind_cathode(&mut self, point: Point) {
        self.cathode = Some(point);
    }

    /// Whether both terminals are bound.
    pub fn is_placed(&self) -> bool {
        self.anode.is_some() && self.cathode.is_some()
    }

    /// Record a junction overdrive. Terminal transition.
    pub fn destroy(&mut self) {
        self.alive = false;
        self.state = false;
    }

    /// The device's current phase.
    pub fn phase(&self) -> LedPhase {
        if !self.alive {
            LedPhase::Dead
        } else if self.state {
            LedPhase::AliveOn
        } else {
            LedPhase::AliveOff
        }
    }
}
