//! Ruleset Core
//!
//! This crate provides a small reactive rule engine. It implements:
//!
//! - Named cells holding dynamic [`Value`]s
//! - Derived expressions (and, or, equals, not, sum, product, custom)
//! - Delegates that call back into application code when observed values change
//! - Synchronous, depth-first change propagation with per-node cutoff
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `value`: The dynamic value type and its equality rules
//! - `graph`: Node arena and dependency edges
//! - `rules`: Combinators, delegates and the `Ruleset` that drives propagation
//! - `error`: Error type shared by every fallible operation
//!
//! # Example
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use ruleset_core::{Ruleset, Value};
//!
//! let mut rules = Ruleset::new();
//! let x = rules.cell("x", 1).unwrap();
//! let y = rules.cell("y", 2).unwrap();
//! let total = rules.sum(&[x, y]).unwrap();
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = seen.clone();
//! rules
//!     .delegate(&[total], move |values| sink.lock().unwrap().push(values[0].clone()))
//!     .unwrap();
//!
//! rules.set(x, 10).unwrap();
//! rules.set(x, 10).unwrap(); // unchanged, nothing fires
//!
//! assert_eq!(*seen.lock().unwrap(), vec![Value::Int(3), Value::Int(12)]);
//! ```

pub mod error;
pub mod graph;
pub mod rules;
pub mod value;

pub use error::{Result, RulesetError};
pub use graph::{DelegateId, Dependent, NodeId, NodeKind};
pub use rules::{Arity, Combinator, Ruleset};
pub use value::Value;
