use std::path::PathBuf;

use crate::args::ArgAssembler;
use crate::config::{Config, Transport};

/// Everything needed to start the hypervisor: resolved once, then handed to a launcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub transport: Transport,
    pub prompt: String,
    pub response: String,
    pub tag: String,
}

impl LaunchPlan {
    /// Printable command line, for `--print-args`.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.display().to_string())
            .chain(self.args.iter().map(|arg| shell_quote(arg)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Resolve the config plus any passthrough arguments into a launch plan.
pub fn build_launch_plan(config: &Config, extra: Vec<String>) -> LaunchPlan {
    let args = ArgAssembler::from_vm(&config.vm).with_extra(extra).build();
    LaunchPlan {
        program: config.qemu.binary.clone(),
        args,
        transport: config.qemu.transport,
        prompt: config.monitor.prompt.clone(),
        response: config.monitor.response.clone(),
        tag: config.monitor.tag.clone(),
    }
}

fn shell_quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_.,:=/+@".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}
