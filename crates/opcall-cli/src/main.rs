//! CLI entrypoint for the opcall client.
//!
//! The binary delegates to [`opcall_cli::run`], which loads configuration,
//! parses the operation and its operands, dispatches one request, and
//! renders the result.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    opcall_cli::run(std::env::args_os(), &mut stdout, &mut stderr).await
}
