//! Ground and canonical identity assignment.

use super::arena::{NetId, NodeArena, NodeHandle};
use crate::error::Result;

/// Assign each connected component one canonical identity and write it onto
/// every member's `resolved_id`.
///
/// A component containing at least one sink node resolves to
/// [`NetId::GROUND`]; there is exactly one ground identity per tick no
/// matter how many sinks a component contains. Every other component gets a
/// fresh identity, chosen as the smallest stable identity among its members.
/// That choice is unique per component and makes the pass idempotent: the
/// same membership facts always produce the same resolution.
///
/// Nodes untouched by any pair keep `resolved_id == stable_id` via the
/// leading reset, which also guarantees no resolution from a previous tick
/// survives.
pub fn assign_identities(arena: &mut NodeArena, components: &[Vec<NodeHandle>]) -> Result<()> {
    arena.reset_resolved();

    for component in components {
        let mut grounded = false;
        let mut fresh = NetId(usize::MAX);
        for &handle in component {
            let node = arena.node(handle)?;
            grounded |= node.is_sink;
            fresh = fresh.min(node.stable_id);
        }

        let canonical = if grounded { NetId::GROUND } else { fresh };
        for &handle in component {
            arena.node_mut(handle)?.resolved_id = canonical;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::connected_components;

    fn arena_with(sinks: &[bool]) -> (NodeArena, Vec<NodeHandle>) {
        let mut arena = NodeArena::new();
        let handles = sinks.iter().map(|&s| arena.alloc(s)).collect();
        (arena, handles)
    }

    #[test]
    fn sink_component_resolves_to_ground() {
        let (mut arena, h) = arena_with(&[false, true, false]);
        let components = vec![vec![h[0], h[1], h[2]]];
        assign_identities(&mut arena, &components).unwrap();
        for &handle in &h {
            assert_eq!(arena.resolved(handle), Some(NetId::GROUND));
        }
    }

    #[test]
    fn ground_absorption_is_sink_count_independent() {
        let (mut arena1, h1) = arena_with(&[true, false, false]);
        let (mut arena3, h3) = arena_with(&[true, true, true]);
        assign_identities(&mut arena1, &[h1.clone()]).unwrap();
        assign_identities(&mut arena3, &[h3.clone()]).unwrap();
        assert_eq!(arena1.resolved(h1[0]), Some(NetId::GROUND));
        assert_eq!(arena3.resolved(h3[0]), Some(NetId::GROUND));
    }

    #[test]
    fn sinkless_component_gets_one_fresh_identity() {
        let (mut arena, h) = arena_with(&[false, false, false, false]);
        let components = vec![vec![h[1], h[2]], vec![h[3]]];
        assign_identities(&mut arena, &components).unwrap();

        // Both members share the smallest stable id of the pair
        let shared = arena.resolved(h[1]).unwrap();
        assert_eq!(arena.resolved(h[2]), Some(shared));
        assert_eq!(shared, NetId(2));
        assert!(!shared.is_ground());

        // Distinct components never share an identity
        assert_ne!(arena.resolved(h[3]), Some(shared));
    }

    #[test]
    fn isolated_node_keeps_stable_identity() {
        let (mut arena, h) = arena_with(&[false, false, true]);
        let components = vec![vec![h[1], h[2]]];
        assign_identities(&mut arena, &components).unwrap();
        let stable = arena.node(h[0]).unwrap().stable_id;
        assert_eq!(arena.resolved(h[0]), Some(stable));
    }

    #[test]
    fn assignment_is_idempotent() {
        let (mut arena, h) = arena_with(&[false, false, true, false, false]);
        let pairs = [(h[0], h[1]), (h[1], h[2]), (h[3], h[4])];
        let components = connected_components(arena.capacity(), &pairs);

        assign_identities(&mut arena, &components).unwrap();
        let first: Vec<_> = h.iter().map(|&x| arena.resolved(x)).collect();
        assign_identities(&mut arena, &components).unwrap();
        let second: Vec<_> = h.iter().map(|&x| arena.resolved(x)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn stale_resolution_never_leaks_between_ticks() {
        let (mut arena, h) = arena_with(&[false, true]);
        // Tick 1: the pair grounds both nodes
        assign_identities(&mut arena, &[vec![h[0], h[1]]]).unwrap();
        assert_eq!(arena.resolved(h[0]), Some(NetId::GROUND));
        // Tick 2: the wire was deleted, nothing connects them
        assign_identities(&mut arena, &[]).unwrap();
        assert_eq!(arena.resolved(h[0]), Some(NetId(1)));
    }
}
