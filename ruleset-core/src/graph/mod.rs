//! Dependency Graph
//!
//! This module implements the arena that holds every node of a ruleset and
//! the edges between them.
//!
//! # Overview
//!
//! The dependency graph is a directed acyclic graph (DAG) where:
//!
//! - Nodes are cells (named leaves assigned from outside) or expressions
//!   (values derived from other nodes)
//! - Edges represent dependencies: if A reads B, B lists A as a dependent
//! - Delegates appear only as dependents; they are observers, not nodes
//!
//! # Design Decisions
//!
//! 1. Nodes live in a `Vec` and refer to each other by [`NodeId`] rather than
//!    by pointer, so ownership stays acyclic and no node owns its inputs.
//!
//! 2. Dependent lists are ordered. Notification order is observable through
//!    delegates, so it must follow registration order.
//!
//! 3. Each node stores both directions (inputs and dependents) so that
//!    recomputation reads forward and notification walks backward in O(1).

mod arena;
mod node;

pub use arena::Graph;
pub use node::{DelegateId, Dependent, Node, NodeId, NodeKind};
