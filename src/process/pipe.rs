use std::io;
use std::path::Path;
use std::process::{Child, Command, Stdio};

use crate::error::RunError;
use crate::process::handle::{InputHandle, OutputStream};
use crate::process::launcher::{ChildProcess, ExitReport, Launcher, Spawned};

/// Launches the child on plain pipes.
///
/// stdout and stderr both point at the write end of a single pipe, so the
/// parent sees one stream in the order the child produced it.
#[derive(Debug, Default, Clone, Copy)]
pub struct PipeLauncher;

impl Launcher for PipeLauncher {
    fn launch(&self, program: &Path, args: &[String]) -> Result<Spawned, RunError> {
        let (reader, writer) = os_pipe::pipe().map_err(RunError::Io)?;
        let stderr_writer = writer.try_clone().map_err(RunError::Io)?;

        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::piped())
            .stdout(writer)
            .stderr(stderr_writer);

        let mut child = command.spawn().map_err(|source| RunError::Spawn {
            program: program.to_path_buf(),
            source,
        })?;
        // The command still owns our copies of the write end; the reader only
        // sees EOF once they are gone.
        drop(command);

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| RunError::Io(io::Error::other("child stdin was not captured")))?;

        Ok(Spawned {
            input: InputHandle::new(Box::new(stdin)),
            output: OutputStream::new(Box::new(reader)),
            child: Box::new(child),
        })
    }
}

impl ChildProcess for Child {
    fn pid(&self) -> Option<u32> {
        Some(self.id())
    }

    fn wait(&mut self) -> io::Result<ExitReport> {
        let status = Child::wait(self)?;
        Ok(ExitReport {
            success: status.success(),
            code: status.code(),
        })
    }
}
