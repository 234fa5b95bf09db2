use std::io;
use std::path::Path;

use crate::config::Transport;
use crate::error::RunError;
use crate::process::handle::{InputHandle, OutputStream};
use crate::process::pipe::PipeLauncher;
use crate::process::pty::PtyLauncher;

/// Exit status of the hypervisor, as far as it is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitReport {
    pub success: bool,
    /// Exit code, if the child exited normally.
    pub code: Option<i32>,
}

/// A running child whose exit status can be awaited.
pub trait ChildProcess: Send {
    fn pid(&self) -> Option<u32>;

    /// Block until the child exits.
    fn wait(&mut self) -> io::Result<ExitReport>;
}

/// Handles returned by a successful launch.
pub struct Spawned {
    pub input: InputHandle,
    /// stdout and stderr, interleaved in the order the child wrote them.
    pub output: OutputStream,
    pub child: Box<dyn ChildProcess>,
}

/// Starts a program and wires up its stdio.
pub trait Launcher {
    fn launch(&self, program: &Path, args: &[String]) -> Result<Spawned, RunError>;
}

/// Launcher for the configured transport.
pub fn launcher_for(transport: Transport) -> Box<dyn Launcher> {
    match transport {
        Transport::Pipe => Box::new(PipeLauncher),
        Transport::Pty => Box::new(PtyLauncher::default()),
    }
}
