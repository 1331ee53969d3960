use std::io;
use std::process::{Child, ExitStatus};

/// The supervised process as the relay loop sees it.
pub trait ChildProcess {
    /// Non-blocking liveness check (a zero-timeout wait).
    fn is_alive(&mut self) -> io::Result<bool>;

    /// Exit code of a process that is no longer alive.
    fn exit_code(&mut self) -> io::Result<i32>;
}

/// A child launched through `std::process::Command`.
///
/// Dropping it releases the process handle but never kills the process.
#[derive(Debug)]
pub struct SpawnedChild {
    child: Child,
    status: Option<ExitStatus>,
}

impl SpawnedChild {
    pub fn new(child: Child) -> Self {
        Self {
            child,
            status: None,
        }
    }

    pub fn id(&self) -> u32 {
        self.child.id()
    }
}

impl ChildProcess for SpawnedChild {
    fn is_alive(&mut self) -> io::Result<bool> {
        if self.status.is_some() {
            return Ok(false);
        }
        match self.child.try_wait()? {
            Some(status) => {
                self.status = Some(status);
                Ok(false)
            }
            None => Ok(true),
        }
    }

    fn exit_code(&mut self) -> io::Result<i32> {
        let status = match self.status {
            Some(status) => status,
            None => self
                .child
                .try_wait()?
                .ok_or_else(|| io::Error::other("child process is still running"))?,
        };
        exit_code_of(status)
    }
}

/// Maps an exit status to a plain integer. On Unix a child killed by signal
/// `n` reports `128 + n`, the shell convention.
pub fn exit_code_of(status: ExitStatus) -> io::Result<i32> {
    if let Some(code) = status.code() {
        return Ok(code);
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return Ok(128 + signal);
        }
    }

    Err(io::Error::other(format!(
        "child process ended without an exit code ({status})"
    )))
}
