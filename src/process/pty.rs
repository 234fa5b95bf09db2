use portable_pty::{native_pty_system, CommandBuilder, MasterPty, PtySize};
use std::io::{self, Read};
use std::path::Path;

use crate::error::RunError;
use crate::process::handle::{InputHandle, OutputStream};
use crate::process::launcher::{ChildProcess, ExitReport, Launcher, Spawned};

/// Launches the child on a pseudo-terminal.
///
/// The PTY master carries everything the child writes to its terminal, so
/// stdout and stderr arrive already merged.
#[derive(Debug, Clone, Copy)]
pub struct PtyLauncher {
    pub size: PtySize,
}

impl Default for PtyLauncher {
    fn default() -> Self {
        Self {
            size: PtySize {
                rows: 24,
                cols: 80,
                pixel_width: 0,
                pixel_height: 0,
            },
        }
    }
}

impl Launcher for PtyLauncher {
    fn launch(&self, program: &Path, args: &[String]) -> Result<Spawned, RunError> {
        let pty_system = native_pty_system();
        let pair = pty_system
            .openpty(self.size)
            .map_err(|e| RunError::Io(io::Error::other(e.to_string())))?;

        let mut cmd = CommandBuilder::new(program);
        cmd.args(args);
        cmd.cwd(std::env::current_dir().map_err(RunError::Io)?);
        cmd.env("TERM", "xterm-256color");

        let child = pair
            .slave
            .spawn_command(cmd)
            .map_err(|e| RunError::Spawn {
                program: program.to_path_buf(),
                source: io::Error::new(io::ErrorKind::NotFound, e.to_string()),
            })?;
        // Only the child may hold the slave, or the master never sees hangup.
        drop(pair.slave);

        let reader = pair
            .master
            .try_clone_reader()
            .map_err(|e| RunError::Io(io::Error::other(e.to_string())))?;
        let writer = pair
            .master
            .take_writer()
            .map_err(|e| RunError::Io(io::Error::other(e.to_string())))?;

        Ok(Spawned {
            input: InputHandle::new(writer),
            output: OutputStream::new(Box::new(MasterReader(reader))),
            child: Box::new(PtyChild {
                child,
                _master: pair.master,
            }),
        })
    }
}

/// Maps the `EIO` a PTY master returns after the child hangs up to end-of-stream.
struct MasterReader(Box<dyn Read + Send>);

impl Read for MasterReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.0.read(buf) {
            Err(e) if e.raw_os_error() == Some(libc::EIO) => Ok(0),
            other => other,
        }
    }
}

struct PtyChild {
    child: Box<dyn portable_pty::Child + Send + Sync>,
    _master: Box<dyn MasterPty + Send>,
}

impl ChildProcess for PtyChild {
    fn pid(&self) -> Option<u32> {
        self.child.process_id()
    }

    fn wait(&mut self) -> io::Result<ExitReport> {
        let status = self.child.wait()?;
        Ok(ExitReport {
            success: status.success(),
            code: i32::try_from(status.exit_code()).ok(),
        })
    }
}
