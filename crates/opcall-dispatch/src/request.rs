//! Validated operation requests and their JSON bodies.

use serde_json::{Map, Value};

use crate::operands::OperandValue;
use crate::registry::{EndpointDescriptor, OperationSpec};

/// An operation with operands that passed registry validation.
///
/// Instances are only produced by [`crate::OperationRegistry::validate`], so
/// the operation is always registered and the operands always match its
/// schema. A request is consumed by a single dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationRequest<'r> {
    spec: &'r OperationSpec,
    operands: Vec<(&'static str, OperandValue)>,
}

impl<'r> OperationRequest<'r> {
    pub(crate) fn new(spec: &'r OperationSpec, operands: Vec<(&'static str, OperandValue)>) -> Self {
        Self { spec, operands }
    }

    /// Returns the canonical operation key.
    #[must_use]
    pub fn operation(&self) -> &'static str {
        self.spec.key
    }

    /// Returns the endpoint the request targets.
    #[must_use]
    pub fn endpoint(&self) -> &'r EndpointDescriptor {
        &self.spec.endpoint
    }

    /// Returns the typed operand value for `name`.
    #[must_use]
    pub fn operand(&self, name: &str) -> Option<&OperandValue> {
        self.operands
            .iter()
            .find(|(operand, _)| *operand == name)
            .map(|(_, value)| value)
    }

    /// Renders the JSON body sent to the endpoint.
    ///
    /// The operation key comes first when the endpoint carries it, followed
    /// by operands in schema order.
    #[must_use]
    pub fn to_json_body(&self) -> Value {
        let mut body = Map::new();
        if let Some(field) = self.spec.endpoint.operation_field {
            body.insert(field.to_owned(), Value::from(self.spec.key));
        }
        for (name, value) in &self.operands {
            body.insert((*name).to_owned(), Value::from(value.clone()));
        }
        Value::Object(body)
    }
}
