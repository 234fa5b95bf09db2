mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{
    Config, Drive, MonitorConfig, Network, PortForward, QemuConfig, Transport, VmConfig,
};
