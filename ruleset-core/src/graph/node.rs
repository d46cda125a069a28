//! Graph Nodes
//!
//! This module defines the records that live in the dependency graph arena.

use std::fmt;

use smallvec::SmallVec;

use crate::rules::Combinator;
use crate::value::Value;

/// Handle to a node (cell or expression) inside one ruleset.
///
/// The handle remembers which arena issued it, so a handle from another
/// ruleset is rejected instead of silently aliasing a local node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    graph: u64,
    index: usize,
}

impl NodeId {
    pub(crate) fn new(graph: u64, index: usize) -> Self {
        Self { graph, index }
    }

    pub(crate) fn graph(&self) -> u64 {
        self.graph
    }

    /// Position of the node in its arena, in creation order.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.index)
    }
}

/// Handle to a delegate registered on a ruleset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DelegateId {
    graph: u64,
    index: usize,
}

impl DelegateId {
    pub(crate) fn new(graph: u64, index: usize) -> Self {
        Self { graph, index }
    }

    pub(crate) fn graph(&self) -> u64 {
        self.graph
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Display for DelegateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.index)
    }
}

/// The kind of node in the dependency graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A named, externally assigned leaf. Cells have no inputs.
    Cell,

    /// A derived node. Its value is its combinator applied to its inputs.
    Expression,
}

/// Something that must hear about a node's value changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dependent {
    Node(NodeId),
    Delegate(DelegateId),
}

/// A node in the dependency graph.
#[derive(Debug)]
pub struct Node {
    kind: NodeKind,

    /// Set for cells, `None` for expressions.
    name: Option<String>,

    /// Current value. For expressions this is the cached combinator result.
    value: Value,

    /// Nodes this node reads from, in declaration order.
    inputs: SmallVec<[NodeId; 2]>,

    combinator: Option<Combinator>,

    /// Observers in registration order. Repeats are kept: an expression
    /// listing the same input twice hears about it twice.
    dependents: SmallVec<[Dependent; 4]>,
}

impl Node {
    /// Create a cell node.
    pub fn cell(name: impl Into<String>, value: Value) -> Self {
        Self {
            kind: NodeKind::Cell,
            name: Some(name.into()),
            value,
            inputs: SmallVec::new(),
            combinator: None,
            dependents: SmallVec::new(),
        }
    }

    /// Create an expression node with an already computed value.
    pub fn expression(combinator: Combinator, inputs: &[NodeId], value: Value) -> Self {
        Self {
            kind: NodeKind::Expression,
            name: None,
            value,
            inputs: SmallVec::from_slice(inputs),
            combinator: Some(combinator),
            dependents: SmallVec::new(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Replace the value, returning whether it differs from the old one.
    pub(crate) fn replace_value(&mut self, value: Value) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        true
    }

    pub fn inputs(&self) -> &[NodeId] {
        &self.inputs
    }

    pub fn combinator(&self) -> Option<&Combinator> {
        self.combinator.as_ref()
    }

    pub(crate) fn add_dependent(&mut self, dependent: Dependent) {
        self.dependents.push(dependent);
    }

    pub fn dependents(&self) -> &[Dependent] {
        &self.dependents
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_has_name_and_no_inputs() {
        let node = Node::cell("x", Value::Int(7));
        assert_eq!(node.kind(), NodeKind::Cell);
        assert_eq!(node.name(), Some("x"));
        assert!(node.inputs().is_empty());
        assert!(node.combinator().is_none());
    }

    #[test]
    fn replace_value_reports_change() {
        let mut node = Node::cell("x", Value::Int(1));
        assert!(!node.replace_value(Value::Int(1)));
        assert!(!node.replace_value(Value::Float(1.0)));
        assert!(node.replace_value(Value::Int(2)));
        assert_eq!(node.value(), &Value::Int(2));
    }

    #[test]
    fn dependents_keep_order_and_repeats() {
        let mut node = Node::cell("x", Value::Null);
        let a = Dependent::Node(NodeId::new(0, 1));
        let d = Dependent::Delegate(DelegateId::new(0, 0));
        node.add_dependent(a);
        node.add_dependent(d);
        node.add_dependent(a);
        assert_eq!(node.dependents(), &[a, d, a]);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn ids_keep_indices_past_u32() {
        let index = u32::MAX as usize + 7;
        assert_eq!(NodeId::new(0, index).index(), index);
        assert_eq!(DelegateId::new(0, index).index(), index);
        assert_ne!(NodeId::new(0, index), NodeId::new(0, 6));
    }

    #[test]
    fn ids_display_by_index() {
        assert_eq!(NodeId::new(3, 5).to_string(), "n5");
        assert_eq!(DelegateId::new(3, 2).to_string(), "d2");
    }
}
