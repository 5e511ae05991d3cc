//! Command-line interface runtime for the opcall client.
//!
//! The module owns argument parsing, configuration bootstrapping, operand
//! collection, and result rendering. The dispatch itself lives in
//! `opcall-dispatch`; this crate only decides which transport to hand it and
//! how to present the [`OperationResult`]. Configuration loading, IO streams,
//! and the transport can all be substituted from tests.

use std::ffi::OsString;
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind as ClapErrorKind;
use opcall_config::Config;
use opcall_dispatch::{Dispatcher, HttpTransport, OperationRegistry, OperationResult, Transport};
use tracing::debug;

mod cli;
mod command;
mod config;
mod errors;
pub mod output;
mod runtime_utils;
pub mod telemetry;

use cli::Cli;
use command::OperationInvocation;
use config::{ConfigArgumentSplit, split_config_arguments};
pub(crate) use config::{ConfigLoader, OrthoConfigLoader};
use errors::AppError;
pub use output::{OutputFormat, ResolvedOutputFormat};
use output::render_result;
use runtime_utils::{emit_operations, exit_code_for};

/// CLI flags recognised by the configuration loader.
///
/// MAINTENANCE: This list must be kept in sync with the fields of
/// `opcall_config::Config`. When adding new configuration options, update
/// this array accordingly.
const CONFIG_CLI_FLAGS: &[&str] = &[
    "--config-path",
    "--base-url",
    "--log-filter",
    "--log-format",
];

/// Bundles the IO streams provided to the CLI runtime.
pub(crate) struct IoStreams<'a, W: Write, E: Write> {
    pub(crate) stdout: &'a mut W,
    pub(crate) stderr: &'a mut E,
    stdout_is_terminal: bool,
}

impl<'a, W: Write, E: Write> IoStreams<'a, W, E> {
    pub(crate) fn new(stdout: &'a mut W, stderr: &'a mut E, stdout_is_terminal: bool) -> Self {
        Self {
            stdout,
            stderr,
            stdout_is_terminal,
        }
    }

    pub(crate) const fn stdout_is_terminal(&self) -> bool {
        self.stdout_is_terminal
    }
}

struct CliRunner<'r, 'io, W: Write, E: Write, L: ConfigLoader> {
    io: &'r mut IoStreams<'io, W, E>,
    loader: &'r L,
    registry: &'r OperationRegistry,
}

impl<'r, 'io, W, E, L> CliRunner<'r, 'io, W, E, L>
where
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    fn new(io: &'r mut IoStreams<'io, W, E>, loader: &'r L) -> Self {
        Self {
            io,
            loader,
            registry: OperationRegistry::standard(),
        }
    }

    async fn run_with_transport<I, T, F>(&mut self, args: I, connect: F) -> ExitCode
    where
        I: IntoIterator<Item = OsString>,
        T: Transport,
        F: FnOnce(&Config) -> T,
    {
        let args: Vec<OsString> = args.into_iter().collect();
        let split = split_config_arguments(&args);
        let cli_arguments = prepare_cli_arguments(&args, &split);

        let cli = match Cli::try_parse_from(cli_arguments) {
            Ok(cli) => cli,
            Err(error) => return self.report_usage(error),
        };

        match self.execute(cli, &split, connect).await {
            Ok(exit_code) => exit_code,
            Err(error) => {
                let _ = writeln!(self.io.stderr, "{error}");
                ExitCode::FAILURE
            }
        }
    }

    async fn execute<T, F>(
        &mut self,
        cli: Cli,
        split: &ConfigArgumentSplit,
        connect: F,
    ) -> Result<ExitCode, AppError>
    where
        T: Transport,
        F: FnOnce(&Config) -> T,
    {
        if cli.list_operations {
            emit_operations(self.registry, &mut *self.io.stdout)?;
            return Ok(ExitCode::SUCCESS);
        }

        let config = self.loader.load(&split.config_arguments)?;
        telemetry::initialise(&config)?;

        let output_format = cli.output.resolve(self.io.stdout_is_terminal());
        let invocation = OperationInvocation::try_from(cli)?;
        debug!(
            operation = %invocation.operation,
            base_url = %config.base_url(),
            "dispatching from command line"
        );

        let dispatcher = Dispatcher::with_registry(self.registry, connect(&config));
        let outcome = dispatcher
            .try_dispatch(&invocation.operation, &invocation.operands)
            .await;
        let exit_code = exit_code_for(&outcome);
        let result = OperationResult::from(outcome);
        render_result(
            &result,
            output_format,
            &mut *self.io.stdout,
            &mut *self.io.stderr,
        )?;
        Ok(exit_code)
    }

    fn report_usage(&mut self, error: clap::Error) -> ExitCode {
        match error.kind() {
            ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion => {
                let _ = write!(self.io.stdout, "{error}");
                ExitCode::SUCCESS
            }
            _ => {
                let _ = writeln!(self.io.stderr, "{}", AppError::CliUsage(error));
                ExitCode::FAILURE
            }
        }
    }
}

/// Runs the CLI using the provided arguments and IO handles.
///
/// Operations are sent over plain HTTP to the configured base URL. The
/// returned exit code is `0` on success, `1` for usage, validation, and
/// server failures, and `2` when the server could not be reached.
pub async fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let mut io = IoStreams::new(stdout, stderr, io::stdout().is_terminal());
    run_with_loader(args, &mut io, &OrthoConfigLoader, |config: &Config| {
        HttpTransport::new(config.base_url().url().clone())
    })
    .await
}

fn prepare_cli_arguments(args: &[OsString], split: &ConfigArgumentSplit) -> Vec<OsString> {
    let mut cli_arguments: Vec<OsString> = Vec::new();
    if let Some(first) = args.first() {
        cli_arguments.push(first.clone());
    }
    if let Some(rest) = args.get(split.command_start..) {
        cli_arguments.extend(rest.iter().cloned());
    }
    cli_arguments
}

/// Runs the CLI with a custom configuration loader and transport.
pub(crate) async fn run_with_loader<I, W, E, L, T, F>(
    args: I,
    io: &mut IoStreams<'_, W, E>,
    loader: &L,
    connect: F,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    L: ConfigLoader,
    T: Transport,
    F: FnOnce(&Config) -> T,
{
    CliRunner::new(io, loader)
        .run_with_transport(args, connect)
        .await
}
