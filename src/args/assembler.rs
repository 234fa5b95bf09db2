//! Argument assembler: every hypervisor flag in one place.

use crate::config::{Drive, Network, PortForward, VmConfig};

/// Builder for the argument vector passed to the hypervisor.
#[derive(Debug, Clone, Default)]
pub struct ArgAssembler {
    args: Vec<String>,
}

impl ArgAssembler {
    pub fn new() -> Self {
        Self { args: Vec::new() }
    }

    /// Render the full VM description in the order the hypervisor expects.
    pub fn from_vm(vm: &VmConfig) -> Self {
        Self::new()
            .with_console(vm)
            .with_drives(&vm.drives)
            .with_display(vm)
            .with_identity(vm)
            .with_network(&vm.network)
            .with_resources(vm)
            .with_accelerators(&vm.accel)
    }

    /// `-nographic` and `-serial`.
    pub fn with_console(mut self, vm: &VmConfig) -> Self {
        if vm.nographic {
            self.args.push("-nographic".into());
        }
        if let Some(serial) = &vm.serial {
            self.push_pair("-serial", serial.clone());
        }
        self
    }

    /// All `-drive` entries first, then one `-device` per drive.
    pub fn with_drives(mut self, drives: &[Drive]) -> Self {
        for drive in drives {
            self.push_pair("-drive", drive_spec(drive));
        }
        for drive in drives {
            self.push_pair("-device", controller_spec(drive));
        }
        self
    }

    /// `-vnc`, when a listener is configured.
    pub fn with_display(mut self, vm: &VmConfig) -> Self {
        if let Some(vnc) = &vm.vnc {
            self.push_pair("-vnc", vnc.clone());
        }
        self
    }

    /// `-name`, `-machine` and `-boot`.
    pub fn with_identity(mut self, vm: &VmConfig) -> Self {
        self.push_pair("-name", vm.name.clone());
        self.push_pair("-machine", vm.machine.clone());
        self.push_pair("-boot", vm.boot.clone());
        self
    }

    pub fn with_network(mut self, network: &Network) -> Self {
        self.push_pair(
            "-device",
            format!("{},netdev={}", network.device, network.id),
        );
        self.push_pair("-netdev", netdev_spec(network));
        self
    }

    /// `-smp`, `-m`, `-cpu` and `-monitor`.
    pub fn with_resources(mut self, vm: &VmConfig) -> Self {
        self.push_pair("-smp", vm.smp.to_string());
        self.push_pair("-m", vm.memory.clone());
        self.push_pair("-cpu", vm.cpu.clone());
        self.push_pair("-monitor", vm.monitor.clone());
        self
    }

    pub fn with_accelerators(mut self, accel: &[String]) -> Self {
        for backend in accel {
            self.push_pair("-accel", backend.clone());
        }
        self
    }

    /// Add arbitrary extra arguments.
    pub fn with_extra(mut self, extra: Vec<String>) -> Self {
        self.args.extend(extra);
        self
    }

    /// Build the final argument list.
    pub fn build(self) -> Vec<String> {
        self.args
    }

    fn push_pair(&mut self, flag: &str, value: String) {
        self.args.push(flag.to_string());
        self.args.push(value);
    }
}

fn drive_spec(drive: &Drive) -> String {
    let mut parts = vec![
        "if=none".to_string(),
        format!("file={}", drive.file.display()),
        format!("id={}", drive.id),
    ];
    if let Some(cache) = &drive.cache {
        parts.push(format!("cache={cache}"));
    }
    if let Some(discard) = &drive.discard {
        parts.push(format!("discard={discard}"));
    }
    if let Some(media) = &drive.media {
        parts.push(format!("media={media}"));
    }
    parts.push(format!("format={}", drive.format));
    if drive.readonly {
        parts.push("readonly=on".to_string());
    }
    parts.join(",")
}

fn controller_spec(drive: &Drive) -> String {
    let mut spec = format!("{},drive={}", drive.device, drive.id);
    if let Some(index) = drive.bootindex {
        spec.push_str(&format!(",bootindex={index}"));
    }
    spec
}

fn netdev_spec(network: &Network) -> String {
    let mut spec = format!("{},id={}", network.backend, network.id);
    for forward in &network.forwards {
        spec.push_str(",hostfwd=");
        spec.push_str(&hostfwd_rule(forward));
    }
    spec
}

/// `tcp::3969-:22` style rule; the guest address is always left to DHCP.
fn hostfwd_rule(forward: &PortForward) -> String {
    format!(
        "{}:{}:{}-:{}",
        forward.protocol, forward.host_addr, forward.host_port, forward.guest_port
    )
}
