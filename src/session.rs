use std::io::Write;
use std::thread;

use crate::args::LaunchPlan;
use crate::error::RunError;
use crate::monitor::{MonitorReport, OutputMonitor};
use crate::process::{ChildProcess, ExitReport, InputHandle, Launcher, Spawned};

/// One hypervisor run: the child, its input, and the monitor thread draining its output.
pub struct VmSession {
    input: InputHandle,
    child: Box<dyn ChildProcess>,
    monitor: Option<thread::JoinHandle<MonitorReport>>,
    reaped: bool,
}

/// How a run ended.
#[derive(Debug)]
pub struct RunOutcome {
    /// `None` if waiting on the child failed.
    pub exit: Option<ExitReport>,
    pub monitor: MonitorReport,
    /// Failure while waiting on the child or joining the monitor.
    pub error: Option<RunError>,
}

impl RunOutcome {
    /// The first error of the run, session-level before monitor-level.
    pub fn error(&self) -> Option<&RunError> {
        self.error.as_ref().or(self.monitor.error.as_ref())
    }

    /// Console line describing the failure, if any.
    pub fn diagnostic(&self) -> Option<String> {
        self.error().map(|err| {
            if err.is_broken_pipe() {
                format!("Error: {err}")
            } else {
                format!("An unexpected error occurred: {err}")
            }
        })
    }
}

impl VmSession {
    /// Launch the hypervisor and start echoing its output to `console`.
    pub fn start(
        launcher: &dyn Launcher,
        plan: &LaunchPlan,
        console: Box<dyn Write + Send>,
    ) -> Result<Self, RunError> {
        let Spawned {
            input,
            output,
            child,
        } = launcher.launch(&plan.program, &plan.args)?;
        tracing::info!(
            program = %plan.program.display(),
            pid = ?child.pid(),
            transport = ?plan.transport,
            "Launched hypervisor"
        );

        let monitor = OutputMonitor::new(
            console,
            input.clone(),
            &plan.prompt,
            plan.response.as_bytes(),
            &plan.tag,
        );
        let handle = thread::Builder::new()
            .name("vm-monitor".to_string())
            .spawn(move || monitor.run(output))
            .map_err(RunError::Io)?;

        Ok(Self {
            input,
            child,
            monitor: Some(handle),
            reaped: false,
        })
    }

    pub fn pid(&self) -> Option<u32> {
        self.child.pid()
    }

    /// Block until the child exits, then drain the monitor and close both streams.
    pub fn wait(mut self) -> RunOutcome {
        let mut error = None;
        let exit = match self.child.wait() {
            Ok(report) => {
                tracing::info!(success = report.success, code = ?report.code, "Hypervisor exited");
                Some(report)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to wait for hypervisor");
                error = Some(RunError::from_io(e));
                None
            }
        };
        self.reaped = true;

        let monitor = match self.shutdown() {
            Some(Ok(report)) => report,
            Some(Err(_)) => {
                tracing::error!("Output monitor thread panicked");
                error.get_or_insert(RunError::MonitorPanicked);
                MonitorReport::default()
            }
            None => MonitorReport::default(),
        };

        RunOutcome {
            exit,
            monitor,
            error,
        }
    }

    /// Close the input and, once the child is gone, join the monitor.
    ///
    /// The monitor closes the output stream itself when it reaches
    /// end-of-stream. Runs at most once per stream; later calls are no-ops.
    fn shutdown(&mut self) -> Option<thread::Result<MonitorReport>> {
        if self.input.close() {
            tracing::debug!("Input stream closed");
        }
        if !self.reaped {
            return None;
        }
        self.monitor.take().map(thread::JoinHandle::join)
    }
}

impl Drop for VmSession {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}
