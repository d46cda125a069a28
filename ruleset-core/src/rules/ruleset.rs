//! Ruleset
//!
//! The [`Ruleset`] owns the node arena, the delegates and the name index, and
//! runs the notification cascade.
//!
//! # Propagation
//!
//! Assigning a new value to a cell notifies its dependents depth-first, in
//! registration order, before [`Ruleset::set`] returns:
//!
//! 1. An expression recomputes from the current values of its inputs.
//! 2. If the result equals its cached value, the cascade stops there.
//! 3. Otherwise the new value is cached and the expression's own dependents
//!    are notified, recursively.
//! 4. A delegate fires with the current values of all its sources.
//!
//! The cascade runs off an explicit stack instead of recursion. Dependents
//! are pushed in reverse so they pop in registration order, and a node's
//! dependents are pushed on top of its pending siblings, so every sub-cascade
//! completes before the next sibling is visited, exactly as a recursive call
//! chain would.

use indexmap::IndexMap;
use smallvec::SmallVec;
use tracing::{debug, trace};

use super::combinator::{Arity, Combinator};
use super::delegate::{Delegate, DelegateFn};
use crate::error::{Result, RulesetError};
use crate::graph::{DelegateId, Dependent, Graph, Node, NodeId, NodeKind};
use crate::value::Value;

/// A graph of cells, expressions and delegates.
///
/// # Example
///
/// ```rust
/// use ruleset_core::{Ruleset, Value};
///
/// let mut rules = Ruleset::new();
/// let consent = rules.cell("consent", true).unwrap();
/// let adult = rules.cell("adult", false).unwrap();
/// let eligible = rules.and(consent, adult).unwrap();
///
/// assert_eq!(rules.value(eligible).unwrap(), &Value::Bool(false));
/// rules.set(adult, true).unwrap();
/// assert_eq!(rules.value(eligible).unwrap(), &Value::Bool(true));
/// ```
pub struct Ruleset {
    graph: Graph,
    delegates: Vec<Delegate>,
    names: IndexMap<String, NodeId>,
}

impl Ruleset {
    /// Create an empty ruleset.
    pub fn new() -> Self {
        Self {
            graph: Graph::new(),
            delegates: Vec::new(),
            names: IndexMap::new(),
        }
    }

    // ------------------------------------------------------------------------
    // Cells
    // ------------------------------------------------------------------------

    /// Create a named cell holding `initial`.
    pub fn cell(&mut self, name: impl Into<String>, initial: impl Into<Value>) -> Result<NodeId> {
        let name = name.into();
        if self.names.contains_key(&name) {
            return Err(RulesetError::DuplicateName(name));
        }

        let id = self.graph.add_node(Node::cell(name.clone(), initial.into()))?;
        debug!(node = %id, name = %name, "created cell");
        self.names.insert(name, id);
        Ok(id)
    }

    /// Assign a new value to a cell.
    ///
    /// Returns `false` without notifying anyone if the value equals the
    /// current one. Otherwise the whole cascade runs before this returns.
    pub fn set(&mut self, cell: NodeId, value: impl Into<Value>) -> Result<bool> {
        let value = value.into();
        let node = self.graph.get_mut(cell)?;
        if node.kind() != NodeKind::Cell {
            return Err(RulesetError::NotACell(cell));
        }

        if !node.replace_value(value) {
            trace!(node = %cell, "assignment unchanged");
            return Ok(false);
        }

        trace!(node = %cell, value = %node.value(), "assigned");
        self.propagate(cell);
        Ok(true)
    }

    /// Assign `f(current)` to a cell, with the same semantics as [`Ruleset::set`].
    pub fn update<F>(&mut self, cell: NodeId, f: F) -> Result<bool>
    where
        F: FnOnce(&Value) -> Value,
    {
        let next = f(self.value(cell)?);
        self.set(cell, next)
    }

    /// Find a cell by name.
    pub fn lookup(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    /// Current value of every cell, keyed by name in creation order.
    pub fn snapshot(&self) -> IndexMap<String, Value> {
        self.names
            .iter()
            .map(|(name, &id)| (name.clone(), self.graph.node(id).value().clone()))
            .collect()
    }

    /// Apply named assignments in order.
    ///
    /// Every name is resolved before anything is assigned, so an unknown
    /// name leaves the ruleset untouched. Each assignment is then a separate
    /// [`Ruleset::set`] with its own cascade. Returns how many assignments
    /// changed a value.
    pub fn assign<I, K, V>(&mut self, assignments: I) -> Result<usize>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let resolved = assignments
            .into_iter()
            .map(|(name, value)| {
                let name = name.as_ref();
                self.lookup(name)
                    .map(|id| (id, value.into()))
                    .ok_or_else(|| RulesetError::UnknownName(name.to_owned()))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut changed = 0;
        for (id, value) in resolved {
            if self.set(id, value)? {
                changed += 1;
            }
        }
        Ok(changed)
    }

    /// Apply assignments from a JSON object such as `{"x": 1, "flag": true}`.
    pub fn assign_json(&mut self, document: &str) -> Result<usize> {
        let assignments: IndexMap<String, Value> = serde_json::from_str(document)?;
        self.assign(assignments)
    }

    // ------------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------------

    /// Create an expression applying `combinator` to `inputs`.
    ///
    /// The value is computed immediately, and the expression is registered
    /// as a dependent of each input in order.
    pub fn expression(&mut self, combinator: Combinator, inputs: &[NodeId]) -> Result<NodeId> {
        let arity = combinator.arity();
        if !arity.accepts(inputs.len()) {
            return Err(RulesetError::Arity {
                combinator: combinator.name(),
                expected: arity,
                actual: inputs.len(),
            });
        }
        for &input in inputs {
            self.graph.check(input)?;
        }

        let value = combinator.evaluate(&self.input_values(inputs));
        let name = combinator.name();
        let id = self.graph.add_node(Node::expression(combinator, inputs, value))?;
        debug!(node = %id, combinator = name, inputs = inputs.len(), "created expression");
        Ok(id)
    }

    /// `true` when both inputs are truthy.
    pub fn and(&mut self, a: NodeId, b: NodeId) -> Result<NodeId> {
        self.expression(Combinator::And, &[a, b])
    }

    /// `true` when either input is truthy.
    pub fn or(&mut self, a: NodeId, b: NodeId) -> Result<NodeId> {
        self.expression(Combinator::Or, &[a, b])
    }

    /// `true` when both inputs hold equal values.
    pub fn equals(&mut self, a: NodeId, b: NodeId) -> Result<NodeId> {
        self.expression(Combinator::Equals, &[a, b])
    }

    /// Negated truthiness of `a`.
    pub fn not(&mut self, a: NodeId) -> Result<NodeId> {
        self.expression(Combinator::Not, &[a])
    }

    /// Sum of all inputs; `Null` if they cannot be added.
    pub fn sum(&mut self, inputs: &[NodeId]) -> Result<NodeId> {
        self.expression(Combinator::Sum, inputs)
    }

    /// Product of all inputs; `Null` if any input is not numeric.
    pub fn product(&mut self, inputs: &[NodeId]) -> Result<NodeId> {
        self.expression(Combinator::Product, inputs)
    }

    /// Create an expression from an arbitrary pure function of its inputs.
    pub fn derive<F>(&mut self, inputs: &[NodeId], f: F) -> Result<NodeId>
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        self.expression(Combinator::custom(f), inputs)
    }

    // ------------------------------------------------------------------------
    // Delegates
    // ------------------------------------------------------------------------

    /// Attach a callback to one or more source nodes.
    ///
    /// The callback fires once right away with the initial source values,
    /// then once per change notification from any source.
    pub fn delegate<F>(&mut self, sources: &[NodeId], callback: F) -> Result<DelegateId>
    where
        F: FnMut(&[Value]) + Send + 'static,
    {
        if sources.is_empty() {
            return Err(RulesetError::Arity {
                combinator: "delegate",
                expected: Arity::AtLeast(1),
                actual: 0,
            });
        }
        for &source in sources {
            self.graph.check(source)?;
        }

        let id = DelegateId::new(self.graph.id(), self.delegates.len());
        let callback: DelegateFn = Box::new(callback);
        self.delegates.push(Delegate::new(sources, callback));
        for &source in sources {
            self.graph.node_mut(source).add_dependent(Dependent::Delegate(id));
        }
        debug!(delegate = %id, sources = sources.len(), "created delegate");

        self.fire(id);
        Ok(id)
    }

    /// How many times a delegate's callback has run, including the initial call.
    pub fn fire_count(&self, delegate: DelegateId) -> Result<usize> {
        self.get_delegate(delegate).map(Delegate::fire_count)
    }

    /// Source nodes of a delegate, in declaration order.
    pub fn delegate_sources(&self, delegate: DelegateId) -> Result<&[NodeId]> {
        self.get_delegate(delegate).map(Delegate::sources)
    }

    fn get_delegate(&self, delegate: DelegateId) -> Result<&Delegate> {
        if delegate.graph() != self.graph.id() {
            return Err(RulesetError::UnknownDelegate(delegate));
        }
        self.delegates
            .get(delegate.index())
            .ok_or(RulesetError::UnknownDelegate(delegate))
    }

    // ------------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------------

    /// Current value of a cell or expression.
    pub fn value(&self, node: NodeId) -> Result<&Value> {
        self.graph.get(node).map(Node::value)
    }

    /// Name of a cell; `None` for expressions.
    pub fn name(&self, node: NodeId) -> Result<Option<&str>> {
        self.graph.get(node).map(Node::name)
    }

    pub fn kind(&self, node: NodeId) -> Result<NodeKind> {
        self.graph.get(node).map(Node::kind)
    }

    pub fn inputs(&self, node: NodeId) -> Result<&[NodeId]> {
        self.graph.get(node).map(Node::inputs)
    }

    pub fn dependents(&self, node: NodeId) -> Result<&[Dependent]> {
        self.graph.get(node).map(Node::dependents)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn delegate_count(&self) -> usize {
        self.delegates.len()
    }

    /// Every node ordered with inputs before the expressions reading them.
    pub fn topological_order(&self) -> Option<Vec<NodeId>> {
        self.graph.topological_order()
    }

    /// Check that every expression's cached value matches its inputs.
    ///
    /// This holds after every public call returns.
    pub fn is_settled(&self) -> bool {
        self.graph.iter().all(|(_, node)| match node.combinator() {
            Some(combinator) => {
                combinator
                    .evaluate(&self.input_values(node.inputs()))
                    .is_same(node.value())
            }
            None => true,
        })
    }

    // ------------------------------------------------------------------------
    // Cascade
    // ------------------------------------------------------------------------

    fn input_values(&self, inputs: &[NodeId]) -> SmallVec<[Value; 4]> {
        inputs
            .iter()
            .map(|&input| self.graph.node(input).value().clone())
            .collect()
    }

    /// Notify everything downstream of `origin`, depth-first.
    fn propagate(&mut self, origin: NodeId) {
        let mut stack: Vec<Dependent> = self.graph.node(origin).dependents().to_vec();
        stack.reverse();

        while let Some(dependent) = stack.pop() {
            match dependent {
                Dependent::Node(id) => {
                    if self.recompute(id) {
                        stack.extend(self.graph.node(id).dependents().iter().rev().copied());
                    }
                }
                Dependent::Delegate(id) => self.fire(id),
            }
        }
    }

    /// Recompute an expression, returning whether its value changed.
    fn recompute(&mut self, id: NodeId) -> bool {
        let node = self.graph.node(id);
        let Some(combinator) = node.combinator() else {
            return false;
        };
        let next = combinator.evaluate(&self.input_values(node.inputs()));

        let node = self.graph.node_mut(id);
        if node.replace_value(next) {
            trace!(node = %id, value = %node.value(), "recomputed");
            true
        } else {
            trace!(node = %id, "recompute unchanged, cascade stops");
            false
        }
    }

    fn fire(&mut self, id: DelegateId) {
        let delegate = &self.delegates[id.index()];
        let values = self.input_values(delegate.sources());
        trace!(delegate = %id, "firing");
        self.delegates[id.index()].fire(&values);
    }
}

impl Default for Ruleset {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Ruleset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ruleset")
            .field("cells", &self.names.len())
            .field("node_count", &self.node_count())
            .field("delegate_count", &self.delegate_count())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
