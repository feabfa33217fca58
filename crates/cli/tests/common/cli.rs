//! CLI process helpers
//!
//! Wraps the `onchange` binary for integration tests. Short-lived runs
//! (help, bad arguments) use [`OnchangeCommand::execute`]; watch sessions
//! use [`OnchangeCommand::spawn`], which kills the process on drop and
//! collects its output while it runs.

use anyhow::{Context, Result};
use parking_lot::Mutex;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output, Stdio};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// CLI command builder
pub struct OnchangeCommand {
    binary_path: PathBuf,
    working_dir: PathBuf,
    args: Vec<String>,
}

impl OnchangeCommand {
    /// Create a new command in the given working directory
    pub fn new(working_dir: impl AsRef<Path>) -> Self {
        Self {
            binary_path: PathBuf::from(env!("CARGO_BIN_EXE_onchange")),
            working_dir: working_dir.as_ref().to_path_buf(),
            args: Vec::new(),
        }
    }

    /// Add command arguments
    pub fn args(&mut self, args: &[&str]) -> &mut Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.binary_path);
        command
            .args(&self.args)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        command
    }

    /// Run to completion
    pub fn execute(&self) -> Result<CommandResult> {
        let output = self.command().output().context("Failed to execute onchange")?;
        Ok(CommandResult::from(output))
    }

    /// Start a long-running watch session
    pub fn spawn(&self) -> Result<Session> {
        let mut child = self.command().spawn().context("Failed to spawn onchange")?;
        let stdout = child.stdout.take().context("stdout not piped")?;
        let stderr = child.stderr.take().context("stderr not piped")?;
        Ok(Session {
            child: Some(child),
            stdout: Stream::collect(stdout),
            stderr: Stream::collect(stderr),
        })
    }
}

/// Pipe drained on a background thread
struct Stream {
    buf: Arc<Mutex<Vec<u8>>>,
    reader: Option<JoinHandle<()>>,
}

impl Stream {
    fn collect(mut pipe: impl Read + Send + 'static) -> Self {
        let buf = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&buf);
        let reader = std::thread::spawn(move || {
            let mut chunk = [0u8; 4096];
            while let Ok(n) = pipe.read(&mut chunk) {
                if n == 0 {
                    break;
                }
                sink.lock().extend_from_slice(&chunk[..n]);
            }
        });
        Self {
            buf,
            reader: Some(reader),
        }
    }

    fn text(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock()).to_string()
    }

    fn finish(&mut self) -> String {
        if let Some(reader) = self.reader.take() {
            reader.join().ok();
        }
        self.text()
    }
}

/// A running `onchange` process
pub struct Session {
    child: Option<Child>,
    stdout: Stream,
    stderr: Stream,
}

impl Session {
    /// Everything written to stdout so far
    pub fn stdout(&self) -> String {
        self.stdout.text()
    }

    /// Everything written to stderr so far
    pub fn stderr(&self) -> String {
        self.stderr.text()
    }

    /// Kill the process and collect what it printed
    pub fn stop(mut self) -> Result<CommandResult> {
        let mut child = self.child.take().context("session already stopped")?;
        child.kill().ok();
        let status = child.wait().context("Failed to wait for onchange")?;
        Ok(CommandResult {
            stdout: self.stdout.finish(),
            stderr: self.stderr.finish(),
            exit_code: status.code(),
        })
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(child) = self.child.as_mut() {
            child.kill().ok();
            child.wait().ok();
        }
    }
}

/// Captured process output
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
}

impl From<Output> for CommandResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code(),
        }
    }
}

impl CommandResult {
    /// True if some stderr log line ends with `message`
    pub fn logged(&self, message: &str) -> bool {
        logged(&self.stderr, message)
    }

    /// Check if the process exited with status zero
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// True if some log line in `stderr` ends with `message`
pub fn logged(stderr: &str, message: &str) -> bool {
    stderr.lines().any(|line| line.ends_with(message))
}

/// Poll `cond` until it holds or `timeout` elapses
pub fn wait_for(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(25));
    }
    cond()
}
