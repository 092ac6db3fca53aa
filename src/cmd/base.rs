// ============================================================================
// src/cmd/base.rs – Allowlisted external command runner (Solaris storage tools)
// ============================================================================

use std::io::{ErrorKind, Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::{LunError, Result};

/// Binaries this tool is ever allowed to execute.
const ALLOWED: &[&str] = &[
    // privilege escalation
    "/usr/bin/sudo",
    "/usr/local/bin/sudo",
    "/usr/bin/pfexec",
    // bus reconfiguration
    "/usr/sbin/cfgadm",
    // disk inventory, labelling and verification
    "/usr/sbin/format",
    // symlink and ownership listings
    "/usr/bin/ls",
    "/bin/ls",
    // ownership changes
    "/bin/chown",
    "/usr/bin/chown",
];

/// Safe wrapper for external process execution.
/// Used for invoking allowlisted system tools like `cfgadm`, `format`, etc.
#[derive(Clone, Debug)]
pub struct Cmd {
    pub path: String,
    pub timeout: Option<Duration>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OutputData {
    pub stdout: String,
    pub stderr: String,
    pub status: i32,
}

impl OutputData {
    pub fn success(&self) -> bool {
        self.status == 0
    }

    /// Standard output followed by standard error.
    pub fn combined(&self) -> String {
        let mut all = String::with_capacity(self.stdout.len() + self.stderr.len());
        all.push_str(&self.stdout);
        all.push_str(&self.stderr);
        all
    }
}

pub fn ensure_allowlisted(path: &str) -> Result<()> {
    if ALLOWED.contains(&path) {
        Ok(())
    } else {
        Err(LunError::NotAllowlisted(path.to_string()))
    }
}

impl Cmd {
    /// Create a new allowlisted command runner. `None` waits forever.
    pub fn new_allowlisted<S: Into<String>>(path: S, timeout: Option<Duration>) -> Result<Self> {
        let path = path.into();
        ensure_allowlisted(&path)?;
        Ok(Self { path, timeout })
    }

    #[cfg(test)]
    pub(crate) fn unchecked<S: Into<String>>(path: S, timeout: Option<Duration>) -> Self {
        Self {
            path: path.into(),
            timeout,
        }
    }

    /// Run with arguments, feeding `input` verbatim on stdin and closing it
    /// afterwards. Blocks until the child exits and all output is collected.
    pub fn run(&self, args: &[&str], input: Option<&[u8]>) -> Result<OutputData> {
        debug!("About to run: \"{} {}\"", self.path, args.join(" "));

        let mut child = Command::new(&self.path)
            .args(args)
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| LunError::ProcessLaunch {
                program: self.path.clone(),
                source,
            })?;

        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        if let Some(bytes) = input {
            if let Some(mut stdin) = child.stdin.take() {
                match stdin.write_all(bytes) {
                    // the tool may quit before consuming everything
                    Err(e) if e.kind() != ErrorKind::BrokenPipe => {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(self.io_error(e));
                    }
                    _ => {}
                }
            }
        }

        let status = self.wait(&mut child)?;
        Ok(OutputData {
            stdout: self.collect(stdout)?,
            stderr: self.collect(stderr)?,
            status: status.code().unwrap_or(-1),
        })
    }

    fn wait(&self, child: &mut Child) -> Result<ExitStatus> {
        let Some(timeout) = self.timeout else {
            return child.wait().map_err(|e| self.io_error(e));
        };

        let start = Instant::now();
        loop {
            if let Some(status) = child.try_wait().map_err(|e| self.io_error(e))? {
                return Ok(status);
            }
            if start.elapsed() > timeout {
                terminate(child);
                return Err(LunError::ProcessTimeout {
                    program: self.path.clone(),
                    timeout,
                });
            }
            thread::sleep(Duration::from_millis(50));
        }
    }

    fn collect(&self, reader: Option<JoinHandle<std::io::Result<Vec<u8>>>>) -> Result<String> {
        let Some(handle) = reader else {
            return Ok(String::new());
        };
        let bytes = handle
            .join()
            .map_err(|_| self.io_error(std::io::Error::other("output reader panicked")))?
            .map_err(|e| self.io_error(e))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn io_error(&self, source: std::io::Error) -> LunError {
        LunError::ProcessIo {
            program: self.path.clone(),
            source,
        }
    }
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<std::io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        pipe.read_to_end(&mut buf)?;
        Ok(buf)
    })
}

/// Best effort terminate, then kill.
fn terminate(child: &mut Child) {
    #[cfg(unix)]
    {
        use nix::sys::signal::{kill, Signal::SIGTERM};
        use nix::unistd::Pid;
        let _ = kill(Pid::from_raw(child.id() as i32), SIGTERM);
    }
    thread::sleep(Duration::from_millis(200));
    let _ = child.kill();
    let _ = child.wait();
}
