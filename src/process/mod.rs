mod handle;
mod launcher;
mod pipe;
mod pty;

pub use handle::{InputHandle, OutputStream};
pub use launcher::{launcher_for, ChildProcess, ExitReport, Launcher, Spawned};
pub use pipe::PipeLauncher;
pub use pty::PtyLauncher;
