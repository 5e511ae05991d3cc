//! Runtime helpers for the CLI entrypoints.

use std::io::Write;
use std::process::ExitCode;

use opcall_dispatch::{DispatchError, OperandSpec, OperationRegistry};
use serde::Serialize;

use crate::errors::AppError;

#[derive(Debug, Serialize)]
struct OperationListing<'a> {
    key: &'a str,
    method: &'a str,
    path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    operation_field: Option<&'a str>,
    operands: &'a [OperandSpec],
}

pub(crate) fn emit_operations<W>(registry: &OperationRegistry, stdout: &mut W) -> Result<(), AppError>
where
    W: Write,
{
    let listing: Vec<OperationListing<'_>> = registry
        .operations()
        .map(|spec| OperationListing {
            key: spec.key,
            method: spec.endpoint.method.as_str(),
            path: spec.endpoint.path,
            operation_field: spec.endpoint.operation_field,
            operands: spec.operands,
        })
        .collect();
    serde_json::to_writer_pretty(&mut *stdout, &listing).map_err(AppError::SerialiseOutput)?;
    stdout.write_all(b"\n").map_err(AppError::EmitOutput)?;
    stdout.flush().map_err(AppError::EmitOutput)
}

pub(crate) fn exit_code_for(outcome: &Result<String, DispatchError>) -> ExitCode {
    match outcome {
        Ok(_) => ExitCode::SUCCESS,
        Err(error) => ExitCode::from(error.exit_status()),
    }
}
