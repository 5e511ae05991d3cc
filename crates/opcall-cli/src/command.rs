//! Command modelling for opcall invocations.
//!
//! Positional `KEY=VALUE` tokens are folded into the raw operand map the
//! dispatcher validates. Values stay strings; the registry decides how each
//! one is coerced.

use opcall_dispatch::RawOperands;
use serde_json::Value;

use crate::cli::Cli;
use crate::errors::AppError;

#[derive(Debug)]
pub(crate) struct OperationInvocation {
    pub(crate) operation: String,
    pub(crate) operands: RawOperands,
}

impl TryFrom<Cli> for OperationInvocation {
    type Error = AppError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let operation = cli
            .operation
            .ok_or(AppError::MissingOperation)?
            .trim()
            .to_owned();
        if operation.is_empty() {
            return Err(AppError::MissingOperation);
        }
        let operands = parse_operands(&cli.arguments)?;
        Ok(Self {
            operation,
            operands,
        })
    }
}

pub(crate) fn parse_operands<S>(tokens: &[S]) -> Result<RawOperands, AppError>
where
    S: AsRef<str>,
{
    let mut operands = RawOperands::new();
    for token in tokens {
        let token = token.as_ref();
        let (key, value) = token
            .split_once('=')
            .ok_or_else(|| AppError::MalformedOperand(token.to_owned()))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(AppError::EmptyOperandKey(token.to_owned()));
        }
        if operands.contains_key(key) {
            return Err(AppError::DuplicateOperand(key.to_owned()));
        }
        operands.insert(key.to_owned(), Value::String(value.to_owned()));
    }
    Ok(operands)
}
