//! Integrated circuit as an opaque sub-circuit instance.

use crate::error::{ProtoboardError, Result};
use crate::net::NodeHandle;

/// A DIP-packaged integrated circuit.
///
/// The internal netlist description is opaque to the engine: it is passed
/// through verbatim to the solver. The engine only supplies the mapping
/// from the ordered external pins to resolved node identities.
#[derive(Debug, Clone)]
pub struct SubCircuitInstance {
    pub name: String,
    /// Ordered external pin labels, one per DIP pin.
    pub pin_names: Vec<String>,
    /// Opaque internal netlist text, passed through unmodified.
    pub netlist_text: String,
    pins: Vec<NodeHandle>,
}

impl SubCircuitInstance {
    /// Create an unplaced instance from its catalog description.
    pub fn new(
        name: impl Into<String>,
        pin_names: Vec<String>,
        netlist_text: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            pin_names,
            netlist_text: netlist_text.into(),
            pins: Vec::new(),
        }
    }

    /// Number of DIP pins in the footprint.
    pub fn pin_count(&self) -> usize {
        self.pin_names.len()
    }

    /// Bind the pin nodes, in pin order. Recomputed whenever the part is
    /// placed or the board is rebuilt from persisted state.
    pub fn bind_pins(&mut self, pins: Vec<NodeHandle>) -> Result<()> {
        if pins.len() != self.pin_count() {
            return Err(ProtoboardError::pin_count_mismatch(
                &self.name,
                self.pin_count(),
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
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_nand() -> SubCircuitInstance {
        let pin_names = ["1A", "1B", "1Y", "GND", "2A", "2B", "2Y", "VCC"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        SubCircuitInstance::new("SN7400", pin_names, ".subckt nand 1 2 3\n.ends\n")
    }

    #[test]
    fn pin_count_follows_pin_names() {
        assert_eq!(quad_nand().pin_count(), 8);
    }

    #[test]
    fn binding_wrong_arity_is_rejected() {
        let mut ic = quad_nand();
        assert!(ic.bind_pins(vec![NodeHandle(0); 6]).is_err());
        assert!(ic.bind_pins((0..8).map(NodeHandle).collect()).is_ok());
        assert_eq!(ic.pins().len(), 8);
    }
}
