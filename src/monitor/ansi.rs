//! ANSI CSI stripping for echoed console lines.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

/// `ESC [`, any digits or semicolons, one letter.
static CSI_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\x1b\[[0-9;]*[A-Za-z]").unwrap());

/// Remove every CSI sequence from `line`, leaving all other text untouched.
pub fn sanitize(line: &str) -> Cow<'_, str> {
    CSI_RE.replace_all(line, "")
}
