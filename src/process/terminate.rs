//! Process termination for `POST /tasks`.

use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum TerminateError {
    #[error("refusing to signal pid {0}")]
    InvalidPid(i32),

    #[error("no such process: {0}")]
    NoSuchProcess(i32),

    #[error("not permitted to signal pid {0}")]
    PermissionDenied(i32),

    #[error("sending {signal} to pid {pid} failed: {source}")]
    Signal {
        pid: i32,
        signal: Signal,
        #[source]
        source: Errno,
    },
}

/// Terminates processes by id.
pub trait ProcessTerminator: Send + Sync {
    fn terminate(&self, pid: i32) -> Result<(), TerminateError>;
}

/// Sends a fixed signal with `kill(2)`.
#[derive(Debug, Clone, Copy)]
pub struct SignalTerminator {
    signal: Signal,
}

impl SignalTerminator {
    pub fn new(signal: Signal) -> Self {
        Self { signal }
    }

    pub fn signal(&self) -> Signal {
        self.signal
    }
}

impl Default for SignalTerminator {
    fn default() -> Self {
        Self::new(Signal::SIGTERM)
    }
}

impl ProcessTerminator for SignalTerminator {
    fn terminate(&self, pid: i32) -> Result<(), TerminateError> {
        if pid <= 0 {
            return Err(TerminateError::InvalidPid(pid));
        }

        debug!("Sending {} to pid {}", self.signal, pid);
        match kill(Pid::from_raw(pid), self.signal) {
            Ok(()) => {
                info!("Sent {} to pid {}", self.signal, pid);
                Ok(())
            }
            Err(Errno::ESRCH) => Err(TerminateError::NoSuchProcess(pid)),
            Err(Errno::EPERM) => Err(TerminateError::PermissionDenied(pid)),
            Err(source) => Err(TerminateError::Signal {
                pid,
                signal: self.signal,
                source,
            }),
        }
    }
}
