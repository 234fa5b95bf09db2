use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while launching or monitoring the hypervisor.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Failed to spawn '{program}': {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Broken pipe. The QEMU process may have terminated unexpectedly.")]
    BrokenPipe {
        #[source]
        source: io::Error,
    },

    #[error("{0}")]
    Io(#[source] io::Error),

    #[error("Output monitor thread panicked")]
    MonitorPanicked,
}

impl RunError {
    /// Classify an I/O error from the child's streams.
    pub fn from_io(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::BrokenPipe {
            RunError::BrokenPipe { source: err }
        } else {
            RunError::Io(err)
        }
    }

    pub fn is_broken_pipe(&self) -> bool {
        matches!(self, RunError::BrokenPipe { .. })
    }
}
