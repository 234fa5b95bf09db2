//! Shared test utilities.

#![allow(dead_code)]

use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;

use vmlaunch::args::{build_launch_plan, LaunchPlan};
use vmlaunch::config::{Config, Transport};

pub const PROMPT: &str = "Please select a keyboard layout";

/// Console sink that records everything written to it.
#[derive(Clone, Default)]
pub struct SpyConsole(Arc<Mutex<Vec<u8>>>);

impl SpyConsole {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl Write for SpyConsole {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A launch plan that runs `script` under `/bin/sh` instead of QEMU.
pub fn stub_plan(script: &str, transport: Transport) -> LaunchPlan {
    let mut plan = build_launch_plan(&Config::default(), Vec::new());
    plan.program = "/bin/sh".into();
    plan.args = vec!["-c".to_string(), script.to_string()];
    plan.transport = transport;
    plan
}
