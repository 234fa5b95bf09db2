//! Splits raw output chunks into lines.

/// Accumulates bytes until a newline completes a line.
///
/// Lines are returned without their terminator; a `\r` before the `\n` is
/// treated as part of the terminator. Invalid UTF-8 is replaced.
#[derive(Debug, Default)]
pub struct LineBuffer {
    partial: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and return every line it completed.
    pub fn feed(&mut self, data: &[u8]) -> Vec<String> {
        let mut completed = Vec::new();
        for &byte in data {
            if byte == b'\n' {
                let mut raw = std::mem::take(&mut self.partial);
                if raw.last() == Some(&b'\r') {
                    raw.pop();
                }
                completed.push(decode(raw));
            } else {
                self.partial.push(byte);
            }
        }
        completed
    }

    /// Take whatever is left once the stream has ended.
    pub fn finish(&mut self) -> Option<String> {
        if self.partial.is_empty() {
            return None;
        }
        Some(decode(std::mem::take(&mut self.partial)))
    }

    pub fn has_partial(&self) -> bool {
        !self.partial.is_empty()
    }
}

fn decode(raw: Vec<u8>) -> String {
    String::from_utf8(raw).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}
