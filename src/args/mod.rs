//! Hypervisor argument handling.
//!
//! ```text
//! Config → ArgAssembler → LaunchPlan → Launcher
//! ```
//!
//! Each stage is a pure function that can be unit-tested independently.

mod assembler;
mod pipeline;

pub use assembler::ArgAssembler;
pub use pipeline::{build_launch_plan, LaunchPlan};
