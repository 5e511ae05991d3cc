//! Operand coercion from raw UI values to typed request fields.

use serde::Serialize;
use serde_json::{Number, Value};

use crate::errors::DispatchError;
use crate::registry::{OperandKind, OperandSpec};

/// Untyped operands keyed by name, as collected from the user.
///
/// Values may be JSON numbers or strings; strings are coerced according to
/// the operand's declared [`OperandKind`].
pub type RawOperands = serde_json::Map<String, Value>;

/// An operand value after successful coercion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OperandValue {
    /// Finite number.
    Number(Number),
    /// Non-negative whole number.
    Integer(u64),
    /// Trimmed, non-empty text.
    Text(String),
}

impl From<OperandValue> for Value {
    fn from(value: OperandValue) -> Self {
        match value {
            OperandValue::Number(number) => Self::Number(number),
            OperandValue::Integer(integer) => Self::Number(integer.into()),
            OperandValue::Text(text) => Self::String(text),
        }
    }
}

pub(crate) fn coerce(
    operation: &'static str,
    operand: &OperandSpec,
    raw: &Value,
) -> Result<OperandValue, DispatchError> {
    let coerced = match operand.kind {
        OperandKind::Number => coerce_number(raw).map(OperandValue::Number),
        OperandKind::Integer => coerce_integer(raw).map(OperandValue::Integer),
        OperandKind::Text => coerce_text(raw).map(OperandValue::Text),
    };
    coerced.ok_or_else(|| {
        DispatchError::invalid_operand(operation, operand.name, operand.kind, raw.to_string())
    })
}

fn coerce_number(raw: &Value) -> Option<Number> {
    match raw {
        Value::Number(number) => Some(number.clone()),
        Value::String(text) => parse_number(text.trim()),
        _ => None,
    }
}

// Integers keep their exact representation; everything else must be a
// finite float since JSON has no spelling for NaN or infinity.
fn parse_number(text: &str) -> Option<Number> {
    if let Ok(integer) = text.parse::<i64>() {
        return Some(integer.into());
    }
    text.parse::<f64>().ok().and_then(Number::from_f64)
}

fn coerce_integer(raw: &Value) -> Option<u64> {
    match raw {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse::<u64>().ok(),
        _ => None,
    }
}

fn coerce_text(raw: &Value) -> Option<String> {
    match raw {
        Value::String(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        }
        _ => None,
    }
}
