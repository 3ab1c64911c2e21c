//! Matching of caller-defined comparison conditions.

use serde_json::Value;

/// Comparison operators accepted in a user condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Gt,
    Lt,
    Ge,
    Le,
    Eq,
}

impl Operator {
    /// Parse the wire symbol (`>`, `<`, `>=`, `<=`, `==`).
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            ">" => Some(Operator::Gt),
            "<" => Some(Operator::Lt),
            ">=" => Some(Operator::Ge),
            "<=" => Some(Operator::Le),
            "==" => Some(Operator::Eq),
            _ => None,
        }
    }

    pub fn apply(self, lhs: f64, rhs: f64) -> bool {
        match self {
            Operator::Gt => lhs > rhs,
            Operator::Lt => lhs < rhs,
            Operator::Ge => lhs >= rhs,
            Operator::Le => lhs <= rhs,
            Operator::Eq => lhs == rhs,
        }
    }
}

/// Coerce a "number-like" JSON value into an `f64`.
///
/// Numbers pass through, numeric strings are parsed after trimming and
/// booleans become 1.0 / 0.0. Everything else is not a number.
pub fn coerce_target(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Evaluate `stock_value <operator> target_value`.
///
/// Never fails: a missing input, an unknown operator or a target that does
/// not coerce to a number all yield `false`.
pub fn check(stock_value: Option<f64>, operator: Option<&str>, target_value: Option<&Value>) -> bool {
    let (Some(stock_value), Some(operator), Some(target_value)) = (stock_value, operator, target_value)
    else {
        return false;
    };
    let Some(target) = coerce_target(target_value) else {
        return false;
    };
    Operator::from_symbol(operator)
        .map(|op| op.apply(stock_value, target))
        .unwrap_or(false)
}
