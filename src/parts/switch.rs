//! 6-pin DIP switch.

use crate::error::{ProtoboardError, Result};
use crate::net::NodeHandle;

/// Pin count of the DIP switch footprint.
pub const SWITCH_PIN_COUNT: usize = 6;

/// Pin pairs bonded regardless of switch position.
const FIXED_BRIDGES: [(usize, usize); 4] = [(0, 5), (1, 4), (2, 3), (1, 0)];

/// A 6-pin bridging switch.
///
/// The pin topology mirrors the physical part and is not configurable:
/// pins (0,5), (1,4), (2,3) and (1,0) are always bonded, leaving two pin
/// groups {0,1,4,5} and {2,3}; switching on closes the contact between
/// pins 1 and 2, joining the groups into one conductor. The switch
/// contributes only connectivity pairs to the tick, never a netlist
/// element.
#[derive(Debug, Clone)]
pub struct DipSwitch {
    pub name: String,
    /// On/off position.
    pub state: bool,
    /// If false the switch is volatile: it springs back to off when no
    /// longer actively pressed.
    pub latch: bool,
    pins: Vec<NodeHandle>,
}

impl DipSwitch {
    /// Create a switch in the off position with no pins bound.
    pub fn new(name: impl Into<String>, latch: bool) -> Self {
        Self {
            name: name.into(),
            state: false,
            latch,
            pins: Vec::new(),
        }
    }

    /// Bind the six pin nodes, in pin order. Recomputed whenever the switch
    /// is placed or the board is rebuilt from persisted state.
    pub fn bind_pins(&mut self, pins: Vec<NodeHandle>) -> Result<()> {
        if pins.len() != SWITCH_PIN_COUNT {
            return Err(ProtoboardError::pin_count_mismatch(
                &self.name,
                SWITCH_PIN_COUNT,
                pins.len(),
            ));
        }
        self.pins = pins;
        Ok(())
    }

    /// The bound pin nodes, empty until placed.
    pub fn pins(&self) -> &[NodeHandle] {
        &self.pins
    }

    /// Set the switch position.
    pub fn set_state(&mut self, on: bool) {
        self.state = on;
    }

    /// Toggle the switch position.
    pub fn toggle(&mut self) {
        self.state = !self.state;
    }

    /// Called when the user stops pressing the part. Volatile switches
    /// spring back to off.
    pub fn release(&mut self) {
        if !self.latch {
            self.state = false;
        }
    }

    /// The bridged pin pairs for the current position: the fixed bridges
    /// plus the (1,2) contact when the switch is on.
    pub fn bridges(&self) -> Vec<(usize, usize)> {
        let mut pairs = FIXED_BRIDGES.to_vec();
        if self.state {
            pairs.push((1, 2));
        }
        pairs
    }

    /// The bonded node pairs this switch contributes to unification.
    /// Empty until pins are bound.
    pub fn bonded_pairs(&self) -> Vec<(NodeHandle, NodeHandle)> {
        if self.pins.len() != SWITCH_PIN_COUNT {
            return Vec::new();
        }
        self.bridges()
            .iter()
            .map(|&(a, b)| (self.pins[a], self.pins[b]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bound_switch(latch: bool) -> DipSwitch {
        let mut sw = DipSwitch::new("SW1", latch);
        sw.bind_pins((0..SWITCH_PIN_COUNT).map(NodeHandle).collect())
            .unwrap();
        sw
    }

    #[test]
    fn off_position_keeps_two_pin_groups() {
        let sw = bound_switch(true);
        let bridges = sw.bridges();
        assert!(bridges.contains(&(1, 0)));
        assert!(!bridges.contains(&(1, 2)));
    }

    #[test]
    fn on_position_closes_the_1_2_contact() {
        let mut sw = bound_switch(true);
        sw.set_state(true);
        let bridges = sw.bridges();
        assert!(bridges.contains(&(1, 0)));
        assert!(bridges.contains(&(1, 2)));
    }

    #[test]
    fn volatile_switch_springs_back_on_release() {
        let mut sw = bound_switch(false);
        sw.set_state(true);
        sw.release();
        assert!(!sw.state);
    }

    #[test]
    fn latched_switch_holds_on_release() {
        let mut sw = bound_switch(true);
        sw.set_state(true);
        sw.release();
        assert!(sw.state);
    }

    #[test]
    fn pin_count_is_enforced() {
        let mut sw = DipSwitch::new("SW1", true);
        let err = sw.bind_pins(vec![NodeHandle(0); 4]).unwrap_err();
        assert!(matches!(
            err,
            ProtoboardError::PinCountMismatch { expected: 6, actual: 4, .. }
        ));
    }

    #[test]
    fn unbound_switch_contributes_no_pairs() {
        let sw = DipSwitch::new("SW1", true);
        assert!(sw.bonded_pairs().is_empty());
    }
}
