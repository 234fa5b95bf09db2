use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;
use vmlaunch::config::{Config, ConfigError, PortForward, Transport};

/// Test that Config::default() reproduces the stock VM.
#[test]
fn test_config_default_values() {
    let config = Config::default();

    assert_eq!(
        config.qemu.binary,
        PathBuf::from("/opt/homebrew/bin/qemu-system-x86_64")
    );
    assert_eq!(config.qemu.transport, Transport::Pipe);

    assert_eq!(config.vm.name, "omnios-r151056-x86-64.qcow2");
    assert_eq!(config.vm.smp, 4);
    assert_eq!(config.vm.memory, "8192M");
    assert_eq!(config.vm.accel, vec!["hvf", "kvm", "tcg"]);
    assert_eq!(config.vm.drives.len(), 2);
    assert!(config.vm.drives[1].readonly);
    assert_eq!(
        config.vm.network.forwards,
        vec![PortForward {
            protocol: "tcp".to_string(),
            host_addr: String::new(),
            host_port: 3969,
            guest_port: 22,
        }]
    );

    assert_eq!(config.monitor.prompt, "Please select a keyboard layout");
    assert_eq!(config.monitor.response, "\n");
    assert_eq!(config.monitor.tag, "QEMU");
}

#[test]
fn test_validation_passes_for_default() {
    assert!(Config::default().validate().is_ok());
}

/// Test that a partial TOML keeps defaults for everything it omits.
#[test]
fn test_parse_partial_toml() {
    let toml_content = r#"
[qemu]
binary = "/usr/bin/qemu-system-x86_64"
transport = "pty"

[vm]
smp = 2
memory = "2048M"

[[vm.network.forwards]]
host_port = 2222
guest_port = 22
"#;

    let config = Config::parse(toml_content).expect("Should parse valid TOML");

    assert_eq!(config.qemu.transport, Transport::Pty);
    assert_eq!(config.vm.smp, 2);
    assert_eq!(config.vm.memory, "2048M");
    assert_eq!(config.vm.machine, "type=q35");
    assert_eq!(config.vm.drives.len(), 2);
    assert_eq!(config.vm.network.forwards.len(), 1);
    assert_eq!(config.vm.network.forwards[0].protocol, "tcp");
    assert_eq!(config.vm.network.forwards[0].host_port, 2222);
    assert_eq!(config.monitor.tag, "QEMU");
}

#[test]
fn test_parse_invalid_toml() {
    let result = Config::parse("this is not valid toml [[[");
    assert!(matches!(result, Err(ConfigError::ParseError { .. })));
}

#[test]
fn test_validation_fails_empty_prompt() {
    let mut config = Config::default();
    config.monitor.prompt.clear();

    match config.validate().unwrap_err() {
        ConfigError::ValidationError { message } => {
            assert!(message.contains("Prompt"));
        }
        _ => panic!("Expected ValidationError"),
    }
}

#[test]
fn test_validation_fails_duplicate_drive_ids() {
    let mut config = Config::default();
    config.vm.drives[1].id = config.vm.drives[0].id.clone();

    match config.validate().unwrap_err() {
        ConfigError::ValidationError { message } => {
            assert!(message.contains("drive0"));
        }
        _ => panic!("Expected ValidationError"),
    }
}

#[test]
fn test_validation_fails_without_drives_or_accelerators() {
    let mut config = Config::default();
    config.vm.drives.clear();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.vm.accel.clear();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.vm.smp = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_load_from_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("config.toml");
    fs::write(&path, "[monitor]\ntag = \"VM\"\n").unwrap();

    let config = Config::load_from(&path).expect("Should load config");
    assert_eq!(config.monitor.tag, "VM");
}

#[test]
fn test_load_from_missing_file_is_read_error() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("absent.toml");

    match Config::load_from(&path).unwrap_err() {
        ConfigError::ReadError { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("Expected ReadError, got {other:?}"),
    }
}

#[test]
fn test_parse_error_reports_path() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[vm\nsmp = ").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("broken.toml"));
}

#[test]
fn test_config_roundtrip() {
    let original = Config::default();
    let serialized = toml::to_string(&original).expect("Should serialize");
    let parsed = Config::parse(&serialized).expect("Should deserialize");

    assert_eq!(original.vm.drives, parsed.vm.drives);
    assert_eq!(original.vm.network, parsed.vm.network);
    assert_eq!(original.monitor.response, parsed.monitor.response);
}
