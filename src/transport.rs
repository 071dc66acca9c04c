//! Object storage transport driven through the `wrangler` CLI.

use crate::constants::{DEFAULT_WRANGLER_BIN, TIMEOUT_POLL_INTERVAL_MS, WRANGLER_INSTALL_HINT};
use crate::error::{PipelineError, Result};
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

/// One `put-object` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutObjectRequest {
    pub bucket: String,
    pub key: String,
    pub local_path: PathBuf,
    /// Write to the real bucket instead of wrangler's local simulation.
    pub force_remote: bool,
}

/// Result of a successful upload. `warning` carries advisory output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PutOutcome {
    pub warning: Option<String>,
}

pub trait Transport {
    /// Checks that the transport can run; returns its version string.
    fn probe(&self) -> Result<String>;

    fn put_object(&self, request: &PutObjectRequest) -> Result<PutOutcome>;
}

#[derive(Debug, Clone)]
pub struct WranglerTransport {
    program: String,
    timeout: Option<Duration>,
}

impl Default for WranglerTransport {
    fn default() -> Self {
        Self::new(DEFAULT_WRANGLER_BIN, None)
    }
}

impl WranglerTransport {
    pub fn new(program: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    /// Arguments for `wrangler r2 object put`. No shell is involved, so file
    /// names are passed through verbatim.
    pub fn put_args(request: &PutObjectRequest) -> Vec<String> {
        let mut args = vec![
            "r2".to_string(),
            "object".to_string(),
            "put".to_string(),
            format!("{}/{}", request.bucket, request.key),
            format!("--file={}", request.local_path.display()),
        ];
        if request.force_remote {
            args.push("--remote".to_string());
        }
        args
    }

    fn tool_missing(&self) -> PipelineError {
        PipelineError::ToolMissing {
            tool: "Wrangler".to_string(),
            hint: WRANGLER_INSTALL_HINT.to_string(),
        }
    }
}

impl Transport for WranglerTransport {
    fn probe(&self) -> Result<String> {
        let output = Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .output();

        match output {
            Ok(output) if output.status.success() => {
                let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
                debug!("Found {} {}", self.program, version);
                Ok(version)
            }
            Ok(output) => {
                debug!(
                    "{} --version exited with {}: {}",
                    self.program,
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                );
                Err(self.tool_missing())
            }
            Err(e) => {
                debug!("Failed to start {}: {}", self.program, e);
                Err(self.tool_missing())
            }
        }
    }

    fn put_object(&self, request: &PutObjectRequest) -> Result<PutOutcome> {
        let mut cmd = Command::new(&self.program);
        cmd.args(Self::put_args(request)).stdin(Stdio::null());
        debug!("Running: {} {:?}", self.program, Self::put_args(request));

        let output = run_with_timeout(&mut cmd, self.timeout)
            .map_err(|e| PipelineError::item(&request.local_path, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PipelineError::item(
                &request.local_path,
                format!(
                    "{} exited with code {}: {}",
                    self.program,
                    output.status.code().unwrap_or(-1),
                    stderr.trim()
                ),
            ));
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        Ok(PutOutcome {
            warning: (!stderr.is_empty()).then_some(stderr),
        })
    }
}

/// Runs `cmd` to completion, killing it if `timeout` elapses first.
pub fn run_with_timeout(cmd: &mut Command, timeout: Option<Duration>) -> io::Result<Output> {
    let Some(timeout) = timeout else {
        return cmd.output();
    };

    let mut child = cmd.stdout(Stdio::piped()).stderr(Stdio::piped()).spawn()?;

    // Drain both pipes while waiting so a chatty child cannot block on a full pipe.
    let stdout_handle = child.stdout.take().map(spawn_reader);
    let stderr_handle = child.stderr.take().map(spawn_reader);

    let start = Instant::now();
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if start.elapsed() >= timeout {
            let _ = child.kill();
            let _ = child.wait();
            return Err(io::Error::new(
                io::ErrorKind::TimedOut,
                format!("timed out after {} seconds", timeout.as_secs()),
            ));
        }
        thread::sleep(Duration::from_millis(TIMEOUT_POLL_INTERVAL_MS));
    };

    Ok(Output {
        status,
        stdout: join_reader(stdout_handle),
        stderr: join_reader(stderr_handle),
    })
}

fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        buf
    })
}

fn join_reader(handle: Option<thread::JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle.and_then(|h| h.join().ok()).unwrap_or_default()
}
