//! Test support utilities for opcall CLI behavioural coverage.
//!
//! Supplies a world that runs the CLI against a scripted transport and
//! captures its output, so step definitions and unit tests remain focused on
//! their assertions.

use std::cell::RefCell;
use std::ffi::OsString;
use std::process::ExitCode;

use anyhow::{Context, Result, ensure};
use opcall_config::Config;
use opcall_dispatch::testing::{RecordedCall, ScriptedTransport};
use rstest::fixture;
use serde_json::Value;

use crate::errors::AppError;
use crate::{ConfigLoader, IoStreams, run_with_loader};

pub(super) struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    pub(super) fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self, _args: &[OsString]) -> Result<Config, AppError> {
        Ok(self.config.clone())
    }
}

#[derive(Default)]
pub(super) struct TestWorld {
    pub config: Config,
    pub transport: ScriptedTransport,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub exit_code: Option<ExitCode>,
}

impl TestWorld {
    pub fn run(&mut self, command: &str) -> Result<()> {
        self.stdout.clear();
        self.stderr.clear();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("build test runtime")?;
        let args = build_args(command);
        let loader = StaticConfigLoader::new(self.config.clone());
        let transport = self.transport.clone();
        let mut io = IoStreams::new(&mut self.stdout, &mut self.stderr, false);
        let exit = runtime.block_on(run_with_loader(args, &mut io, &loader, move |_| transport));
        self.exit_code = Some(exit);
        Ok(())
    }

    pub fn stdout_text(&self) -> Result<String> {
        String::from_utf8(self.stdout.clone()).context("stdout utf8")
    }

    pub fn stderr_text(&self) -> Result<String> {
        String::from_utf8(self.stderr.clone()).context("stderr utf8")
    }

    pub fn assert_exit_code(&self, expected: u8) -> Result<()> {
        let exit = self.exit_code.context("exit code recorded")?;
        ensure!(
            exit == ExitCode::from(expected),
            "expected exit code {expected}, got {exit:?}"
        );
        Ok(())
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.transport.calls()
    }

    pub fn last_body(&self) -> Result<Value> {
        self.calls()
            .pop()
            .map(|call| call.body)
            .context("no request was sent")
    }
}

pub(super) fn build_args(command: &str) -> Vec<OsString> {
    let mut args = vec![OsString::from("opcall")];
    let trimmed = command.trim().trim_matches('"');
    args.extend(trimmed.split_whitespace().map(OsString::from));
    args
}

#[fixture]
pub(super) fn world() -> RefCell<TestWorld> {
    RefCell::new(TestWorld::default())
}
