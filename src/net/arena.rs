//! Node identity types and the owning arena.

use std::fmt;

use crate::error::{ProtoboardError, Result};

/// An electrical identity for a conductive node.
///
/// Identity 0 is always the canonical ground reference. Every node is born
/// with a unique stable identity (never 0); each tick the unification pass
/// overwrites its *resolved* identity with the canonical identity of its
/// connected component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NetId(pub usize);

impl NetId {
    /// The ground reference (always identity 0).
    pub const GROUND: NetId = NetId(0);

    /// Check if this is the ground identity.
    pub fn is_ground(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for NetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ground() {
            write!(f, "GND")
        } else {
            write!(f, "N{}", self.0)
        }
    }
}

/// A handle into the [`NodeArena`].
///
/// Connection points and plugin pins hold handles instead of shared node
/// references, so boards and wires never form ownership cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeHandle(pub usize);

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H{}", self.0)
    }
}

/// An atomic electrical identity: one bonded group of breadboard holes or
/// one supply terminal.
#[derive(Debug, Clone)]
pub struct ConductiveNode {
    /// Immutable identity assigned at creation.
    pub stable_id: NetId,
    /// Canonical identity for the current tick. Rewritten by
    /// [`assign_identities`](super::assign_identities) before every read.
    pub resolved_id: NetId,
    /// Marks a reference-potential (sink) terminal. Any connected component
    /// containing a sink collapses to [`NetId::GROUND`].
    pub is_sink: bool,
}

/// Dense arena owning every [`ConductiveNode`] in a workbench.
///
/// Slots are never reused, so a node's stable identity (slot index + 1) is
/// unique for the lifetime of the arena. Releasing a slot leaves a hole that
/// iteration skips.
#[derive(Debug, Default)]
pub struct NodeArena {
    slots: Vec<Option<ConductiveNode>>,
}

impl NodeArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Allocate a new conductive node, returning its handle.
    pub fn alloc(&mut self, is_sink: bool) -> NodeHandle {
        let handle = NodeHandle(self.slots.len());
        // Identity 0 is reserved for ground, so stable ids start at 1
        let stable_id = NetId(self.slots.len() + 1);
        self.slots.push(Some(ConductiveNode {
            stable_id,
            resolved_id: stable_id,
            is_sink,
        }));
        handle
    }

    /// Release a node when its owning part is deleted. The slot is left
    /// vacant so other handles stay valid.
    pub fn release(&mut self, handle: NodeHandle) {
        if let Some(slot) = self.slots.get_mut(handle.0) {
            *slot = None;
        }
    }

    /// Get a node by handle.
    pub fn node(&self, handle: NodeHandle) -> Result<&ConductiveNode> {
        self.slots
            .get(handle.0)
            .and_then(|s| s.as_ref())
            .ok_or(ProtoboardError::UnknownNode { handle: handle.0 })
    }

    /// Get a mutable node by handle.
    pub fn node_mut(&mut self, handle: NodeHandle) -> Result<&mut ConductiveNode> {
        self.slots
            .get_mut(handle.0)
            .and_then(|s| s.as_mut())
            .ok_or(ProtoboardError::UnknownNode { handle: handle.0 })
    }

    /// The resolved identity of a node, or `None` for a vacated slot.
    pub fn resolved(&self, handle: NodeHandle) -> Option<NetId> {
        self.slots
            .get(handle.0)
            .and_then(|s| s.as_ref())
            .map(|n| n.resolved_id)
    }

    /// Whether a handle refers to a live node.
    pub fn contains(&self, handle: NodeHandle) -> bool {
        matches!(self.slots.get(handle.0), Some(Some(_)))
    }

    /// Number of slots ever allocated (including vacated ones).
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Whether the arena has no live nodes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over live node handles in allocation order.
    pub fn handles(&self) -> impl Iterator<Item = NodeHandle> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_some())
            .map(|(i, _)| NodeHandle(i))
    }

    /// Reset every live node's resolved identity back to its stable identity.
    /// Runs at the start of each tick so no resolution leaks across ticks.
    pub fn reset_resolved(&mut self) {
        for slot in self.slots.iter_mut().flatten() {
            slot.resolved_id = slot.stable_id;
        }
    }
}
