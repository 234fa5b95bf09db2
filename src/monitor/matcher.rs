//! One-shot literal pattern detection over a chunked byte stream.

/// Watches a byte stream for a literal pattern and fires once.
///
/// The last `pattern.len() - 1` bytes of each chunk are carried into the
/// next one, so a match split across reads is still found.
#[derive(Debug)]
pub struct PromptMatcher {
    pattern: Vec<u8>,
    tail: Vec<u8>,
    armed: bool,
}

impl PromptMatcher {
    pub fn new(pattern: impl Into<Vec<u8>>) -> Self {
        let pattern = pattern.into();
        let armed = !pattern.is_empty();
        Self {
            pattern,
            tail: Vec::new(),
            armed,
        }
    }

    /// Scan the next chunk.
    ///
    /// On the first match returns the offset in `chunk` just past the end of
    /// the pattern. Every later call returns `None`.
    pub fn feed(&mut self, chunk: &[u8]) -> Option<usize> {
        if !self.armed {
            return None;
        }

        let carried = self.tail.len();
        let mut window = std::mem::take(&mut self.tail);
        window.extend_from_slice(chunk);

        if let Some(start) = window
            .windows(self.pattern.len())
            .position(|w| w == self.pattern.as_slice())
        {
            self.armed = false;
            return Some(start + self.pattern.len() - carried);
        }

        let keep = (self.pattern.len() - 1).min(window.len());
        self.tail = window.split_off(window.len() - keep);
        None
    }

    pub fn pattern(&self) -> &[u8] {
        &self.pattern
    }

    /// Whether the matcher is still looking.
    pub fn is_armed(&self) -> bool {
        self.armed
    }
}
