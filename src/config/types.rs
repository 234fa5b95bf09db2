use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub qemu: QemuConfig,
    #[serde(default)]
    pub vm: VmConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
}

/// Which hypervisor binary to run and how to attach to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QemuConfig {
    /// Path to the hypervisor executable.
    #[serde(default = "default_binary")]
    pub binary: PathBuf,
    /// How the child's stdio is wired up.
    #[serde(default)]
    pub transport: Transport,
}

/// Stdio wiring for the child process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// Plain pipes; stdout and stderr share one pipe.
    #[default]
    Pipe,
    /// Pseudo-terminal; the PTY master carries all output.
    Pty,
}

/// Structured description of the virtual machine.
///
/// Rendered to the hypervisor's argument vector by
/// [`ArgAssembler`](crate::args::ArgAssembler).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VmConfig {
    /// Human-readable instance name (`-name`).
    pub name: String,
    /// Chipset/machine profile (`-machine`).
    pub machine: String,
    /// Boot options (`-boot`).
    pub boot: String,
    /// Remote display listener (`-vnc`), disabled when unset.
    pub vnc: Option<String>,
    /// Disable graphical output (`-nographic`).
    pub nographic: bool,
    /// Serial console redirection (`-serial`).
    pub serial: Option<String>,
    /// Virtual CPU count (`-smp`).
    pub smp: u32,
    /// Memory size (`-m`), e.g. `8192M`.
    pub memory: String,
    /// CPU model and feature flags (`-cpu`).
    pub cpu: String,
    /// Management console (`-monitor`).
    pub monitor: String,
    /// Acceleration backends, tried in order (`-accel` each).
    pub accel: Vec<String>,
    pub drives: Vec<Drive>,
    pub network: Network,
}

/// A backing image attached to its own virtual controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drive {
    pub id: String,
    pub file: PathBuf,
    pub format: String,
    /// Controller device model, e.g. `virtio-blk` or `ide-cd`.
    pub device: String,
    #[serde(default)]
    pub bootindex: Option<u32>,
    #[serde(default)]
    pub cache: Option<String>,
    #[serde(default)]
    pub discard: Option<String>,
    #[serde(default)]
    pub media: Option<String>,
    #[serde(default)]
    pub readonly: bool,
}

/// User-mode network device with host port forwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Network {
    /// NIC device model.
    pub device: String,
    /// Netdev identifier linking the NIC to its backend.
    pub id: String,
    /// Netdev backend type.
    pub backend: String,
    pub forwards: Vec<PortForward>,
}

/// One `hostfwd` rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortForward {
    #[serde(default = "default_protocol")]
    pub protocol: String,
    /// Host address to bind; empty binds all.
    #[serde(default)]
    pub host_addr: String,
    pub host_port: u16,
    pub guest_port: u16,
}

/// Prompt/response behaviour of the output monitor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Literal text that triggers the response.
    #[serde(default = "default_prompt")]
    pub prompt: String,
    /// Bytes written to the child's input once the prompt is seen.
    #[serde(default = "default_response")]
    pub response: String,
    /// Prefix for each echoed line.
    #[serde(default = "default_tag")]
    pub tag: String,
}

fn default_binary() -> PathBuf {
    PathBuf::from("/opt/homebrew/bin/qemu-system-x86_64")
}

fn default_protocol() -> String {
    "tcp".to_string()
}

fn default_prompt() -> String {
    "Please select a keyboard layout".to_string()
}

fn default_response() -> String {
    "\n".to_string()
}

fn default_tag() -> String {
    "QEMU".to_string()
}

impl Default for QemuConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            transport: Transport::default(),
        }
    }
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            name: "omnios-r151056-x86-64.qcow2".to_string(),
            machine: "type=q35".to_string(),
            boot: "strict=off".to_string(),
            vnc: Some("127.0.0.1:38".to_string()),
            nographic: true,
            serial: Some("stdio".to_string()),
            smp: 4,
            memory: "8192M".to_string(),
            cpu: "max".to_string(),
            monitor: "none".to_string(),
            accel: vec!["hvf".to_string(), "kvm".to_string(), "tcg".to_string()],
            drives: vec![
                Drive {
                    id: "drive0".to_string(),
                    file: PathBuf::from("output/omnios-r151056-x86-64.qcow2"),
                    format: "qcow2".to_string(),
                    device: "virtio-blk".to_string(),
                    bootindex: Some(0),
                    cache: Some("writeback".to_string()),
                    discard: Some("ignore".to_string()),
                    media: None,
                    readonly: false,
                },
                Drive {
                    id: "drive1".to_string(),
                    file: PathBuf::from(
                        "packer_cache/6eb4fe732afd393754f2e072fd4ea4137e8898e5.iso",
                    ),
                    format: "raw".to_string(),
                    device: "ide-cd".to_string(),
                    bootindex: Some(1),
                    cache: None,
                    discard: None,
                    media: Some("disk".to_string()),
                    readonly: true,
                },
            ],
            network: Network::default(),
        }
    }
}

impl Default for Network {
    fn default() -> Self {
        Self {
            device: "virtio-net".to_string(),
            id: "user.0".to_string(),
            backend: "user".to_string(),
            forwards: vec![PortForward {
                protocol: default_protocol(),
                host_addr: String::new(),
                host_port: 3969,
                guest_port: 22,
            }],
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            response: default_response(),
            tag: default_tag(),
        }
    }
}
