//! Rules
//!
//! The public engine built on top of the [`graph`](crate::graph) arena.
//!
//! # Concepts
//!
//! ## Cells
//!
//! A cell is a named, mutable leaf. It is the only thing callers assign to.
//! Assigning a value equal to the current one does nothing at all.
//!
//! ## Expressions
//!
//! An expression derives its value from one or more inputs (cells or other
//! expressions) through a [`Combinator`]. It computes eagerly when created
//! and again whenever an input reports a change. When the recomputed value
//! equals the cached one, its own dependents are not notified.
//!
//! ## Delegates
//!
//! A delegate hands the current values of its sources to an external
//! callback, once when created and once per change notification from any
//! source.
//!
//! # Implementation Notes
//!
//! Dependencies are declared explicitly at construction rather than tracked
//! by observing reads, because an expression's inputs never vary: they are
//! exactly the nodes it was built from.

mod combinator;
mod delegate;
mod ruleset;

pub use combinator::{Arity, CombineFn, Combinator};
pub use delegate::DelegateFn;
pub use ruleset::Ruleset;
