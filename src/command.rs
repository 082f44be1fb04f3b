//! External command execution for probes.
//!
//! Every probe that shells out goes through [`CommandRunner`]. The system
//! implementation enforces a timeout, discards standard error, trims the
//! captured output, and always reaps the child before returning.

use std::io::{self, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::debug;
use wait_timeout::ChildExt;

/// Upper bound on captured stdout; anything beyond is drained and dropped.
const MAX_OUTPUT_BYTES: u64 = 1024 * 1024;

/// Capability to run an external program and capture its trimmed stdout.
///
/// Returns `None` for any failure: missing binary, non-zero exit, timeout,
/// unreadable output, or output that is empty after trimming.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> Option<String>;
}

/// Reasons a command produced no usable output. Only used for diagnostics.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("{program} exited with {status}")]
    Status { program: String, status: ExitStatus },

    #[error("{program} did not finish within {timeout:?}")]
    Timeout { program: String, timeout: Duration },

    #[error("failed to read output of {program}: {source}")]
    Io {
        program: String,
        source: std::io::Error,
    },

    #[error("{program} produced no output")]
    Empty { program: String },
}

/// Runs commands as real child processes.
#[derive(Debug, Clone)]
pub struct SystemCommandRunner {
    timeout: Duration,
}

impl SystemCommandRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Run a command and report why it failed instead of collapsing to `None`.
    pub fn execute(&self, program: &str, args: &[&str]) -> Result<String, CommandError> {
        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| CommandError::Spawn {
                program: program.to_string(),
                source,
            })?;

        let started = Instant::now();
        let mut guard = ChildGuard(child);

        // Drain stdout on a separate thread so a chatty child cannot block on a full pipe.
        let (tx, rx) = mpsc::channel();
        match guard.0.stdout.take() {
            Some(stdout) => {
                thread::spawn(move || {
                    let _ = tx.send(read_pipe_bounded(stdout, MAX_OUTPUT_BYTES));
                });
            }
            None => {
                let _ = tx.send(Ok(Vec::new()));
            }
        }

        let status = match guard.0.wait_timeout(self.timeout) {
            Ok(Some(status)) => status,
            Ok(None) => {
                // Dropping the guard kills and reaps the child.
                drop(guard);
                return Err(self.timed_out(program));
            }
            Err(source) => {
                return Err(CommandError::Io {
                    program: program.to_string(),
                    source,
                })
            }
        };

        // A grandchild may still hold the pipe open; the deadline covers the read too.
        let remaining = self.timeout.saturating_sub(started.elapsed());
        let output = match rx.recv_timeout(remaining) {
            Ok(Ok(bytes)) => bytes,
            Ok(Err(source)) => {
                return Err(CommandError::Io {
                    program: program.to_string(),
                    source,
                })
            }
            Err(RecvTimeoutError::Timeout) => return Err(self.timed_out(program)),
            Err(RecvTimeoutError::Disconnected) => {
                return Err(CommandError::Io {
                    program: program.to_string(),
                    source: io::Error::new(io::ErrorKind::Other, "stdout reader stopped"),
                })
            }
        };

        if !status.success() {
            return Err(CommandError::Status {
                program: program.to_string(),
                status,
            });
        }

        let text = String::from_utf8_lossy(&output).trim().to_string();
        if text.is_empty() {
            return Err(CommandError::Empty {
                program: program.to_string(),
            });
        }

        Ok(text)
    }

    fn timed_out(&self, program: &str) -> CommandError {
        CommandError::Timeout {
            program: program.to_string(),
            timeout: self.timeout,
        }
    }
}

/// Read at most `limit` bytes, then keep draining so the writer never blocks.
fn read_pipe_bounded<R: Read>(mut reader: R, limit: u64) -> io::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    (&mut reader).take(limit).read_to_end(&mut buffer)?;
    io::copy(&mut reader, &mut io::sink())?;
    Ok(buffer)
}

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> Option<String> {
        match self.execute(program, args) {
            Ok(output) => Some(output),
            Err(error) => {
                debug!(program, ?args, %error, "command yielded no value");
                None
            }
        }
    }
}

/// Owns a child process and guarantees it is reaped on every exit path.
struct ChildGuard(Child);

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if let Ok(None) = self.0.try_wait() {
            let _ = self.0.kill();
        }
        let _ = self.0.wait();
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn runner() -> SystemCommandRunner {
        SystemCommandRunner::new(Duration::from_secs(5))
    }

    #[test]
    fn test_captures_and_trims_stdout() {
        let output = runner().run("sh", &["-c", "printf '  hello world \\n\\n'"]);
        assert_eq!(output.as_deref(), Some("hello world"));
    }

    #[test]
    fn test_stderr_is_discarded() {
        let output = runner().run("sh", &["-c", "echo noisy >&2; echo value"]);
        assert_eq!(output.as_deref(), Some("value"));
    }

    #[test]
    fn test_non_zero_exit_is_absent() {
        assert_eq!(runner().run("sh", &["-c", "echo partial; exit 3"]), None);

        let error = runner()
            .execute("sh", &["-c", "exit 3"])
            .expect_err("non-zero exit should fail");
        assert!(matches!(error, CommandError::Status { .. }));
    }

    #[test]
    fn test_missing_binary_is_absent() {
        let error = runner()
            .execute("definitely-not-a-real-binary-4f2c", &[])
            .expect_err("spawn should fail");
        assert!(matches!(error, CommandError::Spawn { .. }));
        assert_eq!(runner().run("definitely-not-a-real-binary-4f2c", &[]), None);
    }

    #[test]
    fn test_whitespace_only_output_is_absent() {
        assert_eq!(runner().run("sh", &["-c", "printf '   \\n\\t'"]), None);
    }

    #[test]
    fn test_timeout_kills_child() {
        let quick = SystemCommandRunner::new(Duration::from_millis(100));
        let started = Instant::now();
        let error = quick
            .execute("sleep", &["5"])
            .expect_err("sleep should time out");

        assert!(matches!(error, CommandError::Timeout { .. }));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn test_large_output_does_not_block() {
        let output = runner()
            .run("sh", &["-c", "i=0; while [ $i -lt 20000 ]; do echo line-$i; i=$((i+1)); done"])
            .expect("large output should be captured");
        assert!(output.starts_with("line-0"));
        assert!(output.ends_with("line-19999"));
    }

    #[test]
    fn test_timeout_covers_pipe_held_by_grandchild() {
        let quick = SystemCommandRunner::new(Duration::from_millis(200));
        let started = Instant::now();
        let error = quick
            .execute("sh", &["-c", "sleep 4 & echo hi"])
            .expect_err("open pipe should hit the deadline");

        assert!(matches!(error, CommandError::Timeout { .. }));
        assert!(
            started.elapsed() < Duration::from_secs(2),
            "timeout not honored: {:?}",
            started.elapsed()
        );
        assert_eq!(quick.run("sh", &["-c", "sleep 4 & echo hi"]), None);
    }

    #[test]
    fn test_output_is_capped() {
        let output = runner()
            .run("sh", &["-c", "head -c 3000000 /dev/zero | tr '\\0' a"])
            .expect("capped output should still be returned");
        assert_eq!(output.len() as u64, MAX_OUTPUT_BYTES);
        assert!(output.bytes().all(|b| b == b'a'));
    }

    #[test]
    fn test_read_pipe_bounded_drains_remainder() {
        let mut source = io::Cursor::new(vec![b'x'; 10]);
        let bytes = read_pipe_bounded(&mut source, 4).unwrap();
        assert_eq!(bytes, b"xxxx");
        assert_eq!(source.position(), 10);
    }
}
