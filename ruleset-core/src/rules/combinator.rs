//! Combinators
//!
//! A combinator is the pure function an expression applies to the current
//! values of its inputs. The built-in variants cover the logical operators
//! and simple arithmetic; [`Combinator::Custom`] accepts any closure.
//!
//! Combinators are total: they always produce a [`Value`]. Arithmetic over
//! inputs that cannot be combined evaluates to [`Value::Null`] instead of
//! failing, since there is nobody to report an error to in the middle of a
//! notification cascade.

use std::fmt;
use std::sync::Arc;

use crate::value::Value;

/// Shared pure function used by custom expressions.
pub type CombineFn = Arc<dyn Fn(&[Value]) -> Value + Send + Sync>;

/// How many inputs a combinator takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Arity::Exactly(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exactly(n) => write!(f, "exactly {n}"),
            Arity::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

/// The function an expression derives its value with.
#[derive(Clone)]
pub enum Combinator {
    /// `true` when both inputs are truthy.
    And,
    /// `true` when either input is truthy.
    Or,
    /// `true` when both inputs are equal.
    Equals,
    /// Negated truthiness of the single input.
    Not,
    /// Sum of all inputs, see [`Value::checked_add`].
    Sum,
    /// Product of all inputs, see [`Value::checked_mul`].
    Product,
    /// Arbitrary pure function of one or more inputs.
    Custom(CombineFn),
}

impl Combinator {
    /// Wrap a closure as a custom combinator.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Combinator::Custom(Arc::new(f))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Combinator::And => "and",
            Combinator::Or => "or",
            Combinator::Equals => "equals",
            Combinator::Not => "not",
            Combinator::Sum => "sum",
            Combinator::Product => "product",
            Combinator::Custom(_) => "custom",
        }
    }

    pub fn arity(&self) -> Arity {
        match self {
            Combinator::And | Combinator::Or | Combinator::Equals => Arity::Exactly(2),
            Combinator::Not => Arity::Exactly(1),
            Combinator::Sum | Combinator::Product | Combinator::Custom(_) => Arity::AtLeast(1),
        }
    }

    /// Apply the combinator to input values given in declaration order.
    pub fn evaluate(&self, inputs: &[Value]) -> Value {
        match self {
            Combinator::And => Value::Bool(inputs.iter().all(Value::is_truthy)),
            Combinator::Or => Value::Bool(inputs.iter().any(Value::is_truthy)),
            Combinator::Equals => Value::Bool(inputs.windows(2).all(|w| w[0] == w[1])),
            Combinator::Not => Value::Bool(!inputs.iter().any(Value::is_truthy)),
            Combinator::Sum => fold(inputs, Value::checked_add),
            Combinator::Product => fold(inputs, Value::checked_mul),
            Combinator::Custom(f) => f(inputs),
        }
    }
}

fn fold<F>(inputs: &[Value], op: F) -> Value
where
    F: Fn(&Value, &Value) -> crate::error::Result<Value>,
{
    let Some((first, rest)) = inputs.split_first() else {
        return Value::Null;
    };
    rest.iter()
        .try_fold(first.clone(), |acc, v| op(&acc, v))
        .unwrap_or(Value::Null)
}

impl fmt::Debug for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(c: &Combinator, inputs: &[Value]) -> Value {
        c.evaluate(inputs)
    }

    #[test]
    fn logical_truth_tables() {
        for a in 0..=1 {
            for b in 0..=1 {
                let inputs = [Value::Int(a), Value::Int(b)];
                assert_eq!(eval(&Combinator::And, &inputs), Value::Bool(a != 0 && b != 0));
                assert_eq!(eval(&Combinator::Or, &inputs), Value::Bool(a != 0 || b != 0));
                assert_eq!(eval(&Combinator::Equals, &inputs), Value::Bool(a == b));
            }
            assert_eq!(eval(&Combinator::Not, &[Value::Int(a)]), Value::Bool(a == 0));
        }
    }

    #[test]
    fn sum_and_product() {
        let inputs = [Value::Int(2), Value::Int(3), Value::Int(4)];
        assert_eq!(eval(&Combinator::Sum, &inputs), Value::Int(9));
        assert_eq!(eval(&Combinator::Product, &inputs), Value::Int(24));
    }

    #[test]
    fn arithmetic_over_mismatched_inputs_is_null() {
        let inputs = [Value::Int(2), Value::from("x")];
        assert!(eval(&Combinator::Sum, &inputs).is_null());
        assert!(eval(&Combinator::Product, &inputs).is_null());
    }

    #[test]
    fn custom_receives_inputs_in_order() {
        let c = Combinator::custom(|xs| Value::Int(xs[0].as_int().unwrap() - xs[1].as_int().unwrap()));
        assert_eq!(eval(&c, &[Value::Int(10), Value::Int(3)]), Value::Int(7));
        assert_eq!(c.name(), "custom");
    }

    #[test]
    fn arity() {
        assert!(Combinator::Not.arity().accepts(1));
        assert!(!Combinator::Not.arity().accepts(2));
        assert!(Combinator::Equals.arity().accepts(2));
        assert!(!Combinator::Sum.arity().accepts(0));
        assert!(Combinator::Sum.arity().accepts(5));
        assert_eq!(Arity::AtLeast(1).to_string(), "at least 1");
    }
}
