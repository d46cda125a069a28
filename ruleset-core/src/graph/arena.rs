//! Node Arena
//!
//! The arena owns every node of one ruleset and validates handles.
//!
//! # Ordering
//!
//! An expression can only name inputs that already exist, so edges always
//! point from a lower index to a higher one and the graph cannot contain a
//! cycle. [`Graph::topological_order`] still runs Kahn's algorithm over the
//! recorded edges rather than trusting creation order, which makes the
//! acyclicity claim checkable.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use super::node::{Dependent, Node, NodeId};
use crate::error::{Result, RulesetError};

/// Counter for generating unique arena IDs.
static GRAPH_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// All nodes of one ruleset, indexed by creation order.
#[derive(Debug)]
pub struct Graph {
    id: u64,
    nodes: Vec<Node>,
}

impl Graph {
    /// Create a new empty arena.
    pub fn new() -> Self {
        Self {
            id: GRAPH_ID_COUNTER.fetch_add(1, Ordering::Relaxed),
            nodes: Vec::new(),
        }
    }

    /// Identifier shared by every handle this arena issues.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Add a node and register it as a dependent of each of its inputs.
    ///
    /// Every input must have been issued by this arena; otherwise nothing is
    /// added and [`RulesetError::UnknownNode`] is returned.
    pub fn add_node(&mut self, node: Node) -> Result<NodeId> {
        for &input in node.inputs() {
            self.check(input)?;
        }

        let id = NodeId::new(self.id, self.nodes.len());
        for &input in node.inputs() {
            self.nodes[input.index()].add_dependent(Dependent::Node(id));
        }
        self.nodes.push(node);
        Ok(id)
    }

    /// Confirm that `id` was issued by this arena.
    pub fn check(&self, id: NodeId) -> Result<NodeId> {
        if id.graph() == self.id && id.index() < self.nodes.len() {
            Ok(id)
        } else {
            Err(RulesetError::UnknownNode(id))
        }
    }

    pub fn get(&self, id: NodeId) -> Result<&Node> {
        self.check(id).map(|id| &self.nodes[id.index()])
    }

    pub fn get_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.check(id)?;
        Ok(&mut self.nodes[id.index()])
    }

    /// Direct access for handles that were validated on the way in.
    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Iterate over every node with its handle, in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(move |(index, node)| (NodeId::new(self.id, index), node))
    }

    /// Get the total number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Order every node so that inputs come before the nodes reading them.
    ///
    /// Returns `None` if the recorded edges contain a cycle.
    pub fn topological_order(&self) -> Option<Vec<NodeId>> {
        let mut in_degree: Vec<usize> = self.nodes.iter().map(|n| n.inputs().len()).collect();
        let mut queue: VecDeque<usize> = in_degree
            .iter()
            .enumerate()
            .filter(|(_, degree)| **degree == 0)
            .map(|(index, _)| index)
            .collect();
        let mut result = Vec::with_capacity(self.nodes.len());

        // Kahn's algorithm
        while let Some(index) = queue.pop_front() {
            result.push(NodeId::new(self.id, index));

            for dependent in self.nodes[index].dependents() {
                if let Dependent::Node(dependent_id) = dependent {
                    let degree = &mut in_degree[dependent_id.index()];
                    *degree = degree.saturating_sub(1);
                    if *degree == 0 {
                        queue.push_back(dependent_id.index());
                    }
                }
            }
        }

        (result.len() == self.nodes.len()).then_some(result)
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}
