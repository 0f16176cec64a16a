//! Subprocess execution for the optional install and dev-server stages

use super::package_manager::{CommandSpec, OutputMode};
use crate::error::{Result, ScaffoldError};
use colored::Colorize;
use std::future::Future;
use std::io;
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command as TokioCommand;

/// Gutter printed before each captured output line
pub const OUTPUT_PREFIX: &str = "│  ";

/// Runs a command in a directory; the orchestrator treats it as a black box
pub trait CommandRunner {
    fn run(&self, spec: &CommandSpec, cwd: &Path) -> impl Future<Output = Result<()>> + Send;
}

/// Spawns real processes via tokio
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    fn command(spec: &CommandSpec) -> TokioCommand {
        // npm and friends are .cmd shims on Windows
        if cfg!(windows) {
            let mut cmd = TokioCommand::new("cmd");
            cmd.arg("/C").arg(&spec.program).args(&spec.args);
            cmd
        } else {
            let mut cmd = TokioCommand::new(&spec.program);
            cmd.args(&spec.args);
            cmd
        }
    }

    fn failure(spec: &CommandSpec, code: Option<i32>, source: Option<io::Error>) -> ScaffoldError {
        ScaffoldError::Subprocess {
            command: spec.to_string(),
            code,
            source,
        }
    }

    async fn run_inherited(spec: &CommandSpec, cwd: &Path) -> Result<()> {
        let status = Self::command(spec)
            .current_dir(cwd)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| Self::failure(spec, None, Some(e)))?;

        if status.success() {
            Ok(())
        } else {
            Err(Self::failure(spec, status.code(), None))
        }
    }

    async fn run_prefixed(spec: &CommandSpec, cwd: &Path) -> Result<()> {
        let mut child = Self::command(spec)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Self::failure(spec, None, Some(e)))?;

        let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
            let _ = child.kill().await;
            return Err(Self::failure(spec, None, None));
        };

        let mut stdout_reader = BufReader::new(stdout).lines();
        let mut stderr_reader = BufReader::new(stderr).lines();
        let mut stdout_done = false;
        let mut stderr_done = false;

        while !(stdout_done && stderr_done) {
            tokio::select! {
                line = stdout_reader.next_line(), if !stdout_done => {
                    match line {
                        Ok(Some(line)) => println!("{}{}", OUTPUT_PREFIX, line),
                        _ => stdout_done = true,
                    }
                }
                line = stderr_reader.next_line(), if !stderr_done => {
                    match line {
                        Ok(Some(line)) => eprintln!("{}{}", OUTPUT_PREFIX, line.yellow()),
                        _ => stderr_done = true,
                    }
                }
            }
        }

        let status = child
            .wait()
            .await
            .map_err(|e| Self::failure(spec, None, Some(e)))?;
        if status.success() {
            Ok(())
        } else {
            Err(Self::failure(spec, status.code(), None))
        }
    }
}

impl CommandRunner for ProcessRunner {
    async fn run(&self, spec: &CommandSpec, cwd: &Path) -> Result<()> {
        tracing::info!(command = %spec, cwd = %cwd.display(), "running command");
        match spec.output {
            OutputMode::Inherit => Self::run_inherited(spec, cwd).await,
            OutputMode::Prefixed => Self::run_prefixed(spec, cwd).await,
        }
    }
}
