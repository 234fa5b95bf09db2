//! Output monitoring and prompt response.
//!
//! One reader drains the child's merged output. Each chunk is split into
//! lines for the console and scanned for the prompt; the first match sends
//! the configured response to the child's input.

mod ansi;
mod lines;
mod matcher;
mod responder;

pub use ansi::sanitize;
pub use lines::LineBuffer;
pub use matcher::PromptMatcher;
pub use responder::{MonitorReport, OutputMonitor};
