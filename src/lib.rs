//! Launch a hypervisor, echo its console, and answer its keyboard-layout prompt.

pub mod args;
pub mod config;
pub mod error;
pub mod logging;
pub mod monitor;
pub mod process;
pub mod session;

pub use error::RunError;
pub use session::{RunOutcome, VmSession};
