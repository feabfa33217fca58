//! Command execution
//!
//! The child's stdout and stderr are attached to the same pipe, so the
//! captured bytes keep the order in which the child wrote them.

use onchange_core::CommandSpec;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use thiserror::Error;

/// Why a command run failed
#[derive(Debug, Error)]
pub enum ExecError {
    /// The process could not be started
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The process ran but did not exit successfully
    #[error("{program}: {status}")]
    Exit { program: String, status: ExitStatus },

    /// Reading output or waiting for the process failed
    #[error("{0}")]
    Io(#[from] io::Error),
}

/// Output and status of one command run
#[derive(Debug)]
pub struct ExecutionResult {
    /// Interleaved stdout and stderr
    pub output: Vec<u8>,
    /// `None` on success
    pub error: Option<ExecError>,
}

impl ExecutionResult {
    /// True if the command started and exited with status zero
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    fn failed(output: Vec<u8>, error: ExecError) -> Self {
        Self {
            output,
            error: Some(error),
        }
    }
}

/// Runs a configured command to completion
pub trait CommandRunner: Send + Sync + 'static {
    /// Run `command`, blocking until it exits
    fn run(&self, command: &CommandSpec) -> ExecutionResult;
}

/// Spawns real child processes
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    /// Working directory for the child; inherits ours when `None`
    current_dir: Option<PathBuf>,
}

impl ProcessRunner {
    /// Runner that starts children in `dir`
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            current_dir: Some(dir.into()),
        }
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, command: &CommandSpec) -> ExecutionResult {
        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args);
        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }
        combined_output(cmd, &command.program)
    }
}

/// Run `program` with `args` in the current directory
pub fn run(program: &str, args: &[String]) -> ExecutionResult {
    let mut cmd = Command::new(program);
    cmd.args(args);
    combined_output(cmd, program)
}

fn combined_output(mut cmd: Command, program: &str) -> ExecutionResult {
    let (mut reader, writer) = match io::pipe() {
        Ok(pipe) => pipe,
        Err(e) => return ExecutionResult::failed(Vec::new(), ExecError::Io(e)),
    };
    let stdout = match writer.try_clone() {
        Ok(w) => w,
        Err(e) => return ExecutionResult::failed(Vec::new(), ExecError::Io(e)),
    };

    cmd.stdin(Stdio::null()).stdout(stdout).stderr(writer);
    let spawned = cmd.spawn();
    // Our copies of the write end live in `cmd`; the reader only sees EOF
    // once they are closed.
    drop(cmd);

    let mut child = match spawned {
        Ok(child) => child,
        Err(source) => {
            return ExecutionResult::failed(
                Vec::new(),
                ExecError::Spawn {
                    program: program.to_string(),
                    source,
                },
            )
        }
    };

    let mut output = Vec::new();
    let read = reader.read_to_end(&mut output);
    let status = child.wait();

    let error = match (read, status) {
        (Err(e), _) | (_, Err(e)) => Some(ExecError::Io(e)),
        (Ok(_), Ok(status)) if !status.success() => Some(ExecError::Exit {
            program: program.to_string(),
            status,
        }),
        _ => None,
    };

    ExecutionResult { output, error }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> CommandSpec {
        CommandSpec {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string()],
        }
    }

    #[test]
    fn test_success_captures_stdout() {
        let result = run("echo", &["hi".to_string()]);
        assert!(result.is_success());
        assert_eq!(result.output, b"hi\n");
    }

    #[test]
    fn test_combined_output_is_interleaved() {
        let result = ProcessRunner::default().run(&sh("echo one; echo two >&2; echo three"));
        assert!(result.is_success());
        assert_eq!(String::from_utf8_lossy(&result.output), "one\ntwo\nthree\n");
    }

    #[test]
    fn test_non_zero_exit_keeps_output() {
        let result = ProcessRunner::default().run(&sh("echo broken >&2; exit 3"));
        assert_eq!(result.output, b"broken\n");
        match result.error {
            Some(ExecError::Exit { status, .. }) => assert_eq!(status.code(), Some(3)),
            other => panic!("expected exit error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let result = run("onchange-definitely-not-a-program", &[]);
        assert!(result.output.is_empty());
        assert!(matches!(result.error, Some(ExecError::Spawn { .. })));
    }

    #[test]
    fn test_runs_in_configured_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let expected = dir.path().canonicalize().unwrap();

        let result = ProcessRunner::in_dir(dir.path()).run(&sh("pwd -P"));
        assert!(result.is_success());
        let printed = String::from_utf8_lossy(&result.output);
        assert_eq!(printed.trim_end(), expected.to_string_lossy());
    }
}
