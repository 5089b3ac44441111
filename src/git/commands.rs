use crate::error::ExtractionError;
use std::io::{self, Read};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

pub const DEFAULT_MAX_BUFFER: usize = 5 * 1024 * 1024;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const POLL_INTERVAL: Duration = Duration::from_millis(10);
const READ_CHUNK: usize = 8 * 1024;

/// Runs an external program and hands back its stdout.
pub trait CommandRunner: Send + Sync {
    fn run(&self, program: &str, args: &[String], working_dir: &Path)
        -> Result<String, ExtractionError>;
}

/// Spawns real child processes.
///
/// stdout and stderr are drained on their own threads so the child never
/// blocks on a full pipe. Output past `max_buffer` bytes fails the call, and
/// a child still running after `timeout` is killed.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    pub max_buffer: usize,
    pub timeout: Option<Duration>,
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self {
            max_buffer: DEFAULT_MAX_BUFFER,
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }
}

struct Captured {
    bytes: Vec<u8>,
    overflowed: bool,
}

impl ProcessRunner {
    pub fn new(max_buffer: usize, timeout: Option<Duration>) -> Self {
        Self {
            max_buffer,
            timeout,
        }
    }

    fn deadline(&self, started: Instant) -> Option<Instant> {
        self.timeout.map(|timeout| started + timeout)
    }

    fn timed_out(&self, command: String, child: &mut Child) -> ExtractionError {
        kill_and_reap(child);
        ExtractionError::TimedOut {
            command,
            timeout: self.timeout.unwrap_or_default(),
        }
    }
}

impl CommandRunner for ProcessRunner {
    fn run(
        &self,
        program: &str,
        args: &[String],
        working_dir: &Path,
    ) -> Result<String, ExtractionError> {
        let command = describe_command(program, args);

        // Callers match on git's untranslated stderr
        let mut child = Command::new(program)
            .args(args)
            .current_dir(working_dir)
            .env("LC_ALL", "C")
            .env("LANGUAGE", "C")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ExtractionError::SpawnFailed {
                command: command.clone(),
                detail: format!("{} (in {})", e, working_dir.display()),
            })?;

        let started = Instant::now();
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let limit = self.max_buffer;

        let (stdout_tx, stdout_rx) = mpsc::channel();
        thread::spawn(move || {
            let captured = match stdout {
                Some(pipe) => read_capped(pipe, limit),
                None => Ok(Captured {
                    bytes: Vec::new(),
                    overflowed: false,
                }),
            };
            let _ = stdout_tx.send(captured);
        });
        let stderr_handle = thread::spawn(move || match stderr {
            Some(pipe) => read_capped(pipe, limit)
                .map(|captured| captured.bytes)
                .unwrap_or_default(),
            None => Vec::new(),
        });

        let received = match self.deadline(started) {
            Some(deadline) => {
                let remaining = deadline.saturating_duration_since(Instant::now());
                match stdout_rx.recv_timeout(remaining) {
                    Ok(result) => Some(result),
                    Err(RecvTimeoutError::Timeout) => {
                        return Err(self.timed_out(command, &mut child));
                    }
                    Err(RecvTimeoutError::Disconnected) => None,
                }
            }
            None => stdout_rx.recv().ok(),
        };

        let stdout = match received {
            Some(Ok(captured)) if captured.overflowed => {
                kill_and_reap(&mut child);
                return Err(ExtractionError::BufferExceeded {
                    command,
                    limit: self.max_buffer,
                });
            }
            Some(Ok(captured)) => captured.bytes,
            Some(Err(e)) => {
                kill_and_reap(&mut child);
                return Err(ExtractionError::SpawnFailed {
                    command,
                    detail: format!("failed to read stdout: {}", e),
                });
            }
            None => Vec::new(),
        };

        let status = match wait_until(&mut child, self.deadline(started)) {
            Ok(Some(status)) => status,
            Ok(None) => return Err(self.timed_out(command, &mut child)),
            Err(e) => {
                kill_and_reap(&mut child);
                return Err(ExtractionError::SpawnFailed {
                    command,
                    detail: format!("failed to wait for process: {}", e),
                });
            }
        };

        let stderr = stderr_handle.join().unwrap_or_default();

        if !status.success() {
            return Err(ExtractionError::CommandFailed {
                command,
                code: status.code(),
                detail: String::from_utf8_lossy(&stderr).to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&stdout).to_string())
    }
}

/// Renders a command line for error messages, escaping control characters.
pub fn describe_command(program: &str, args: &[String]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(&arg.escape_debug().to_string());
    }
    line
}

fn read_capped<R: Read>(mut reader: R, limit: usize) -> io::Result<Captured> {
    let mut bytes = Vec::new();
    let mut chunk = [0u8; READ_CHUNK];
    loop {
        let n = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        if bytes.len() + n > limit {
            return Ok(Captured {
                bytes,
                overflowed: true,
            });
        }
        bytes.extend_from_slice(&chunk[..n]);
    }
    Ok(Captured {
        bytes,
        overflowed: false,
    })
}

/// Polls for exit. `Ok(None)` means the deadline passed first.
fn wait_until(child: &mut Child, deadline: Option<Instant>) -> io::Result<Option<ExitStatus>> {
    let Some(deadline) = deadline else {
        return child.wait().map(Some);
    };
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn kill_and_reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}
