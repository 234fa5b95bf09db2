use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use vmlaunch::args::build_launch_plan;
use vmlaunch::config::{Config, Transport};
use vmlaunch::process::launcher_for;
use vmlaunch::{logging, VmSession};

#[derive(Parser, Debug)]
#[command(name = "vmlaunch", version)]
#[command(about = "Boot a VM under QEMU and answer its keyboard-layout prompt")]
struct Cli {
    /// Config file (default: ~/.config/vmlaunch/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Hypervisor binary, overriding the config
    #[arg(long)]
    qemu: Option<PathBuf>,

    /// How to attach to the hypervisor's stdio
    #[arg(long, value_enum)]
    transport: Option<Transport>,

    /// Print the hypervisor command line and exit
    #[arg(long)]
    print_args: bool,

    /// Log filter, e.g. "vmlaunch=debug" (default: RUST_LOG, then "warn")
    #[arg(long)]
    log_level: Option<String>,

    /// Extra arguments appended to the hypervisor command line
    #[arg(last = true)]
    extra: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.log_level.as_deref());

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(binary) = cli.qemu {
        config.qemu.binary = binary;
    }
    if let Some(transport) = cli.transport {
        config.qemu.transport = transport;
    }

    let plan = build_launch_plan(&config, cli.extra);
    if cli.print_args {
        println!("{}", plan.command_line());
        return Ok(());
    }

    let launcher = launcher_for(plan.transport);
    let session = VmSession::start(launcher.as_ref(), &plan, Box::new(std::io::stdout()))
        .with_context(|| format!("could not launch {}", plan.program.display()))?;
    let outcome = session.wait();

    // The child's exit status is informational only.
    if let Some(message) = outcome.diagnostic() {
        println!("{message}");
    }
    Ok(())
}
