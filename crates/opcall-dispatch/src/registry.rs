//! Operation registry mapping operation keys to operand schemas and endpoints.
//!
//! The registry replaces per-form `switch` statements with a lookup table.
//! It is built once and never mutated; the standard registry lives in a
//! process-wide static.

use std::collections::BTreeMap;
use std::fmt;

use http::Method;
use once_cell::sync::Lazy;
use serde::Serialize;
use tracing::debug;

use crate::dispatcher::DISPATCH_TARGET;
use crate::errors::DispatchError;
use crate::operands::{RawOperands, coerce};
use crate::request::OperationRequest;

/// Type an operand must be coercible to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperandKind {
    /// A finite JSON number. Numeric strings are accepted.
    Number,
    /// A non-negative whole number. Numeric strings are accepted.
    Integer,
    /// A string that is not blank.
    Text,
}

impl fmt::Display for OperandKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Number => "a number",
            Self::Integer => "a non-negative integer",
            Self::Text => "a non-empty string",
        })
    }
}

/// A named operand required by an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OperandSpec {
    /// Operand name, also used as the JSON body field.
    pub name: &'static str,
    /// Type the operand is coerced to.
    pub kind: OperandKind,
}

impl OperandSpec {
    /// Declares a numeric operand.
    #[must_use]
    pub const fn number(name: &'static str) -> Self {
        Self {
            name,
            kind: OperandKind::Number,
        }
    }

    /// Declares a non-negative integer operand.
    #[must_use]
    pub const fn integer(name: &'static str) -> Self {
        Self {
            name,
            kind: OperandKind::Integer,
        }
    }

    /// Declares a text operand.
    #[must_use]
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: OperandKind::Text,
        }
    }
}

/// Where and how an operation is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointDescriptor {
    /// Absolute path of the endpoint, for example `/calculator`.
    pub path: &'static str,
    /// HTTP method used for the call.
    pub method: Method,
    /// Body field that carries the operation key, when the endpoint serves
    /// several operations.
    pub operation_field: Option<&'static str>,
}

impl EndpointDescriptor {
    /// Describes a `POST` endpoint.
    #[must_use]
    pub const fn post(path: &'static str) -> Self {
        Self {
            path,
            method: Method::POST,
            operation_field: None,
        }
    }

    /// Embeds the operation key in the body under `field`.
    #[must_use]
    pub fn with_operation_field(mut self, field: &'static str) -> Self {
        self.operation_field = Some(field);
        self
    }
}

/// Operand schema and endpoint for one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationSpec {
    /// Canonical operation key.
    pub key: &'static str,
    /// Operands in body order.
    pub operands: &'static [OperandSpec],
    /// Target endpoint.
    pub endpoint: EndpointDescriptor,
}

const CALCULATOR_OPERANDS: &[OperandSpec] =
    &[OperandSpec::number("number1"), OperandSpec::number("number2")];

const PERSON_OPERANDS: &[OperandSpec] = &[OperandSpec::text("name"), OperandSpec::integer("age")];

const CALCULATOR_KEYS: [&str; 4] = ["sum", "sub", "mult", "div"];

static STANDARD: Lazy<OperationRegistry> = Lazy::new(|| {
    let calculator = EndpointDescriptor::post("/calculator").with_operation_field("operation");
    let builder = CALCULATOR_KEYS
        .into_iter()
        .fold(OperationRegistry::builder(), |builder, key| {
            builder.operation(OperationSpec {
                key,
                operands: CALCULATOR_OPERANDS,
                endpoint: calculator.clone(),
            })
        });
    builder
        .operation(OperationSpec {
            key: "create-person",
            operands: PERSON_OPERANDS,
            endpoint: EndpointDescriptor::post("/create-people"),
        })
        .build()
});

/// Immutable table of known operations.
#[derive(Debug, Clone, Default)]
pub struct OperationRegistry {
    operations: BTreeMap<String, OperationSpec>,
}

impl OperationRegistry {
    /// Returns the process-wide registry of calculator and person operations.
    #[must_use]
    pub fn standard() -> &'static Self {
        &STANDARD
    }

    /// Starts building a custom registry.
    #[must_use]
    pub fn builder() -> OperationRegistryBuilder {
        OperationRegistryBuilder::default()
    }

    /// Looks up an operation by key.
    ///
    /// Keys are matched after trimming and ASCII case folding.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&OperationSpec> {
        self.operations.get(&normalise_key(key))
    }

    /// Iterates over registered operations in key order.
    pub fn operations(&self) -> impl Iterator<Item = &OperationSpec> {
        self.operations.values()
    }

    /// Returns the number of registered operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns true when no operations are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Validates raw operands for `key` and produces a typed request.
    ///
    /// Every declared operand must be present and coercible to its kind, and
    /// no undeclared operand may appear.
    ///
    /// # Errors
    ///
    /// Returns a validation-family [`DispatchError`] describing the first
    /// problem found.
    pub fn validate(
        &self,
        key: &str,
        operands: &RawOperands,
    ) -> Result<OperationRequest<'_>, DispatchError> {
        let spec = self
            .get(key)
            .ok_or_else(|| DispatchError::unknown_operation(key.trim()))?;

        debug!(
            target: DISPATCH_TARGET,
            operation = spec.key,
            operand_count = operands.len(),
            "validating operands"
        );

        if let Some(unexpected) = operands
            .keys()
            .find(|name| !spec.operands.iter().any(|operand| operand.name == name.as_str()))
        {
            return Err(DispatchError::unexpected_operand(spec.key, unexpected.as_str()));
        }

        let values = spec
            .operands
            .iter()
            .map(|operand| {
                let raw = operands
                    .get(operand.name)
                    .ok_or_else(|| DispatchError::missing_operand(spec.key, operand.name))?;
                coerce(spec.key, operand, raw).map(|value| (operand.name, value))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(OperationRequest::new(spec, values))
    }
}

/// Builder for [`OperationRegistry`].
#[derive(Debug, Default)]
pub struct OperationRegistryBuilder {
    operations: BTreeMap<String, OperationSpec>,
}

impl OperationRegistryBuilder {
    /// Registers an operation, replacing any earlier entry with the same key.
    ///
    /// Keys are stored in the folded form [`OperationRegistry::get`] looks up.
    #[must_use]
    pub fn operation(mut self, spec: OperationSpec) -> Self {
        self.operations.insert(normalise_key(spec.key), spec);
        self
    }

    /// Freezes the registry.
    #[must_use]
    pub fn build(self) -> OperationRegistry {
        OperationRegistry {
            operations: self.operations,
        }
    }
}

fn normalise_key(key: &str) -> String {
    key.trim().to_ascii_lowercase()
}
