//! Running in the background.
//!
//! `start` forks and records the child in the PID file, `stop` interrupts
//! the recorded process and waits for it to go away. Both run before the
//! tokio runtime exists: after `fork` only the calling thread survives.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use nix::errno::Errno;
use nix::sys::signal::{Signal, kill};
use nix::unistd::{ForkResult, Pid, fork, setsid};

const STOP_TIMEOUT: Duration = Duration::from_secs(10);
const STOP_POLL: Duration = Duration::from_millis(50);

/// File listing the PID of the running server.
#[derive(Debug, Clone)]
pub struct PidFile {
    path: PathBuf,
}

impl PidFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// PIDs recorded in the file. A missing file records none.
    pub fn pids(&self) -> Result<Vec<Pid>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("cannot read PID file {}", self.path.display()));
            }
        };

        text.split_whitespace()
            .map(|pid| {
                pid.parse::<i32>()
                    .map(Pid::from_raw)
                    .with_context(|| format!("bad PID {:?} in {}", pid, self.path.display()))
            })
            .collect()
    }

    /// The first recorded process that is still alive.
    pub fn running(&self) -> Result<Option<Pid>> {
        Ok(self.pids()?.into_iter().find(|&pid| is_alive(pid)))
    }

    pub fn write(&self, pid: Pid) -> Result<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .with_context(|| format!("cannot create PID file {}", self.path.display()))?;
        writeln!(file, "{}", pid)
            .with_context(|| format!("cannot write PID file {}", self.path.display()))
    }

    pub fn remove(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                Err(e).with_context(|| format!("cannot remove PID file {}", self.path.display()))
            }
        }
    }
}

/// Signal 0 only checks for existence; EPERM still means the process exists.
fn is_alive(pid: Pid) -> bool {
    matches!(kill(pid, None), Ok(()) | Err(Errno::EPERM))
}

/// Detaches from the terminal and records the new PID.
///
/// Returns in the child; the parent exits. Fails if the PID file names a
/// live process.
pub fn start(pid_file: &PidFile) -> Result<()> {
    if let Some(pid) = pid_file.running()? {
        bail!("already running as PID {}", pid);
    }

    // SAFETY: called from `main` before any other thread is spawned.
    match unsafe { fork() }.context("failed to detach")? {
        ForkResult::Parent { .. } => std::process::exit(0),
        ForkResult::Child => {}
    }
    setsid().context("failed to start a new session")?;

    pid_file.write(Pid::this())
}

/// Interrupts the recorded process, waits for it to exit and removes the
/// PID file. Nothing to stop is not an error.
pub fn stop(pid_file: &PidFile) -> Result<()> {
    if let Some(pid) = pid_file.running()? {
        kill(pid, Signal::SIGINT).with_context(|| format!("cannot signal PID {}", pid))?;
        wait_for_exit(pid)?;
    }
    pid_file.remove()
}

pub fn restart(pid_file: &PidFile) -> Result<()> {
    stop(pid_file)?;
    start(pid_file)
}

fn wait_for_exit(pid: Pid) -> Result<()> {
    let deadline = Instant::now() + STOP_TIMEOUT;
    while is_alive(pid) {
        if Instant::now() >= deadline {
            bail!("PID {} still running after {:?}", pid, STOP_TIMEOUT);
        }
        std::thread::sleep(STOP_POLL);
    }
    Ok(())
}
