//! Electrical node identity and per-tick unification.
//!
//! This module provides the internal representation of conductive nodes and
//! the two passes that run at the start of every simulation tick:
//!
//! 1. [`connected_components`] partitions the nodes touched by zero-resistance
//!    bonds into maximal electrically-equivalent groups.
//! 2. [`assign_identities`] writes one canonical [`NetId`] onto every member
//!    of each group, collapsing sink-bearing groups to [`NetId::GROUND`].

mod arena;
mod resolve;
mod unify;

pub use arena::{ConductiveNode, NetId, NodeArena, NodeHandle};
pub use resolve::assign_identities;
pub use unify::{connected_components, DisjointSet};
