//! CLI argument definitions for the opcall client.

use clap::Parser;

use crate::output::OutputFormat;

/// Command-line interface for dispatching operations to the server.
#[derive(Parser, Debug)]
#[command(name = "opcall", disable_help_subcommand = true)]
pub(crate) struct Cli {
    /// Prints the registered operations and exits.
    #[arg(long)]
    pub(crate) list_operations: bool,
    /// Controls how the operation result is rendered.
    #[arg(long, value_enum, default_value_t = OutputFormat::Auto)]
    pub(crate) output: OutputFormat,
    /// The operation to dispatch (for example `sum`).
    #[arg(value_name = "OPERATION")]
    pub(crate) operation: Option<String>,
    /// Operands written as `KEY=VALUE`.
    #[arg(
        value_name = "KEY=VALUE",
        num_args = 0..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub(crate) arguments: Vec<String>,
}
