//! Connectivity graph builder.
//!
//! Each tick the live wires and switch bridges contribute unordered pairs of
//! node handles; this module collapses them into maximal connected
//! components. A disjoint-set forest with path compression replaces the
//! naive scan-and-merge loop while producing the identical partition.

use super::arena::NodeHandle;

/// Disjoint-set forest with union by rank and path compression.
#[derive(Debug)]
pub struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    /// Create a forest of `n` singletons.
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    /// Find the representative of `x`, compressing the path along the way.
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        // Second pass: point every visited entry at the root
        let mut cur = x;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    /// Merge the sets containing `a` and `b`. Returns true if they were
    /// previously disjoint.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return false;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
        true
    }
}

/// Partition the nodes appearing in `pairs` into connected components.
///
/// Two nodes end up in the same component iff they are joined by a path of
/// pairs (standard connectivity, not edge-by-edge identity). Nodes that
/// appear in no pair are not represented in the output; they are their own
/// singleton components and the caller enumerates them from the arena.
///
/// The result is deterministic: members of each component are sorted by
/// handle, and components are ordered by their smallest member. An empty
/// pair list yields an empty partition.
pub fn connected_components(
    capacity: usize,
    pairs: &[(NodeHandle, NodeHandle)],
) -> Vec<Vec<NodeHandle>> {
    if pairs.is_empty() {
        return Vec::new();
    }

    let mut forest = DisjointSet::new(capacity);
    let mut touched = vec![false; capacity];
    for &(a, b) in pairs {
        forest.union(a.0, b.0);
        touched[a.0] = true;
        touched[b.0] = true;
    }

    // Group touched handles by representative, in ascending handle order so
    // each component lists members sorted and components are ordered by
    // their smallest member.
    let mut component_of_root = vec![usize::MAX; capacity];
    let mut components: Vec<Vec<NodeHandle>> = Vec::new();
    for i in 0..capacity {
        if !touched[i] {
            continue;
        }
        let root = forest.find(i);
        let slot = component_of_root[root];
        if slot == usize::MAX {
            component_of_root[root] = components.len();
            components.push(vec![NodeHandle(i)]);
        } else {
            components[slot].push(NodeHandle(i));
        }
    }
    components
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    /// The scan-and-merge reference: repeatedly absorb any remaining set
    /// sharing an element with the accumulator until a fixed point, then
    /// emit the accumulator as one component.
    fn reference_partition(pairs: &[(NodeHandle, NodeHandle)]) -> Vec<BTreeSet<NodeHandle>> {
        let mut sets: Vec<BTreeSet<NodeHandle>> = pairs
            .iter()
            .map(|&(a, b)| [a, b].into_iter().collect())
            .collect();
        let mut out = Vec::new();
        while !sets.is_empty() {
            let mut first = sets.remove(0);
            let mut grew = true;
            while grew {
                grew = false;
                let mut rest = Vec::new();
                for s in sets {
                    if s.intersection(&first).next().is_some() {
                        first.extend(s);
                        grew = true;
                    } else {
                        rest.push(s);
                    }
                }
                sets = rest;
            }
            out.push(first);
        }
        out
    }

    fn as_sets(components: Vec<Vec<NodeHandle>>) -> BTreeSet<BTreeSet<NodeHandle>> {
        components.into_iter().map(|c| c.into_iter().collect()).collect()
    }

    fn pair(a: usize, b: usize) -> (NodeHandle, NodeHandle) {
        (NodeHandle(a), NodeHandle(b))
    }

    #[test]
    fn empty_input_yields_empty_partition() {
        assert!(connected_components(10, &[]).is_empty());
    }

    #[test]
    fn chain_collapses_to_one_component() {
        let pairs = [pair(0, 1), pair(1, 2), pair(2, 3)];
        let components = connected_components(4, &pairs);
        assert_eq!(components.len(), 1);
        assert_eq!(
            components[0],
            vec![NodeHandle(0), NodeHandle(1), NodeHandle(2), NodeHandle(3)]
        );
    }

    #[test]
    fn disjoint_pairs_stay_separate() {
        let pairs = [pair(0, 1), pair(2, 3), pair(5, 4)];
        let components = connected_components(6, &pairs);
        assert_eq!(components.len(), 3);
    }

    #[test]
    fn connectivity_is_transitive_across_pair_order() {
        // (0,1) and (2,3) only join once (1,2) is seen, regardless of order
        let pairs = [pair(0, 1), pair(2, 3), pair(1, 2)];
        let components = connected_components(4, &pairs);
        assert_eq!(components.len(), 1);
    }

    #[test]
    fn matches_scan_and_merge_reference() {
        // Deterministic pseudo-random graphs via a small LCG
        let mut state: u64 = 0x2545_f491_4f6c_dd1d;
        let mut next = move |bound: usize| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            ((state >> 33) as usize) % bound
        };

        for trial in 0..50 {
            let n = 4 + trial % 12;
            let edges = 1 + next(2 * n);
            let pairs: Vec<_> = (0..edges).map(|_| pair(next(n), next(n))).collect();

            let forest = as_sets(connected_components(n, &pairs));
            let reference: BTreeSet<BTreeSet<NodeHandle>> =
                reference_partition(&pairs).into_iter().collect();
            assert_eq!(forest, reference, "partition mismatch for pairs {pairs:?}");
        }
    }

    #[test]
    fn every_touched_node_appears_exactly_once() {
        let pairs = [pair(0, 1), pair(1, 2), pair(4, 5), pair(0, 0)];
        let components = connected_components(6, &pairs);
        let mut seen = BTreeSet::new();
        for component in &components {
            for &h in component {
                assert!(seen.insert(h), "{h} appeared in two components");
            }
        }
        let touched: BTreeSet<_> = pairs.iter().flat_map(|&(a, b)| [a, b]).collect();
        assert_eq!(seen, touched);
    }
}
