use std::io::{self, Read, Write};

use crate::error::RunError;
use crate::monitor::ansi::sanitize;
use crate::monitor::lines::LineBuffer;
use crate::monitor::matcher::PromptMatcher;
use crate::process::{InputHandle, OutputStream};

const READ_CHUNK: usize = 8192;

/// What the monitor observed over one run.
#[derive(Debug, Default)]
pub struct MonitorReport {
    /// Lines echoed to the console.
    pub lines: usize,
    pub prompt_seen: bool,
    /// Whether the response reached the child's input.
    pub responded: bool,
    /// First error hit while reading output or answering the prompt.
    pub error: Option<RunError>,
}

/// Single reader over the child's merged output.
///
/// Every chunk is both echoed line by line and scanned for the prompt, so
/// no byte is ever consumed by anything else.
pub struct OutputMonitor<W: Write> {
    console: W,
    input: InputHandle,
    tag: String,
    response: Vec<u8>,
    lines: LineBuffer,
    matcher: PromptMatcher,
    report: MonitorReport,
}

impl<W: Write> OutputMonitor<W> {
    pub fn new(
        console: W,
        input: InputHandle,
        prompt: &str,
        response: &[u8],
        tag: &str,
    ) -> Self {
        Self {
            console,
            input,
            tag: tag.to_string(),
            response: response.to_vec(),
            lines: LineBuffer::new(),
            matcher: PromptMatcher::new(prompt),
            report: MonitorReport::default(),
        }
    }

    /// Drain `output` until end-of-stream, then close it.
    pub fn run(mut self, output: OutputStream) -> MonitorReport {
        let mut output = scopeguard::guard(output, |mut output| {
            if output.close() {
                tracing::debug!("Output stream closed");
            }
        });

        let banner = format!("Starting to read {} output...", self.tag);
        self.say(&banner);

        let mut buffer = [0u8; READ_CHUNK];
        loop {
            let count = match output.read(&mut buffer) {
                Ok(0) => break,
                Ok(count) => count,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.record(RunError::from_io(e));
                    break;
                }
            };
            self.process(&buffer[..count]);
        }

        if let Some(line) = self.lines.finish() {
            self.echo(&line);
        }
        if self.matcher.is_armed() {
            tracing::debug!("Output ended without the prompt");
        }
        self.report
    }

    /// Echo one chunk and answer the prompt if this chunk completes it.
    pub fn process(&mut self, chunk: &[u8]) {
        match self.matcher.feed(chunk) {
            Some(end) => {
                self.echo_lines(&chunk[..end]);
                self.respond();
                self.echo_lines(&chunk[end..]);
            }
            None => self.echo_lines(chunk),
        }
    }

    fn respond(&mut self) {
        self.report.prompt_seen = true;
        let matched = String::from_utf8_lossy(self.matcher.pattern()).into_owned();
        tracing::info!(prompt = %matched, "Detected prompt");
        self.say(&format!("Detected prompt: {matched}"));

        match self.input.send(&self.response) {
            Ok(()) => {
                self.report.responded = true;
                tracing::info!(bytes = self.response.len(), "Sent response to the VM");
                self.say("Sent Enter key to the VM");
            }
            Err(e) => self.record(e),
        }
    }

    fn echo_lines(&mut self, bytes: &[u8]) {
        for line in self.lines.feed(bytes) {
            self.echo(&line);
        }
    }

    fn echo(&mut self, line: &str) {
        self.report.lines += 1;
        let text = format!("{}: {}", self.tag, sanitize(line));
        self.say(&text);
    }

    fn say(&mut self, text: &str) {
        let written = writeln!(self.console, "{text}").and_then(|()| self.console.flush());
        if let Err(e) = written {
            tracing::debug!(error = %e, "Console write failed");
        }
    }

    fn record(&mut self, err: RunError) {
        tracing::warn!(error = %err, "Output monitor error");
        if self.report.error.is_none() {
            self.report.error = Some(err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    const PROMPT: &str = "Please select a keyboard layout";

    #[derive(Clone, Default)]
    struct Spy(Arc<Mutex<Vec<u8>>>);

    impl Spy {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    impl Write for Spy {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Yields each chunk from a separate `read` call.
    struct Chunked(Vec<Vec<u8>>);

    impl Read for Chunked {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.0.is_empty() {
                return Ok(0);
            }
            let chunk = self.0.remove(0);
            buf[..chunk.len()].copy_from_slice(&chunk);
            Ok(chunk.len())
        }
    }

    fn run(chunks: &[&[u8]]) -> (String, String, MonitorReport) {
        let console = Spy::default();
        let stdin = Spy::default();
        let input = InputHandle::new(Box::new(stdin.clone()));
        let monitor = OutputMonitor::new(console.clone(), input, PROMPT, b"\n", "QEMU");
        let output = OutputStream::new(Box::new(Chunked(
            chunks.iter().map(|c| c.to_vec()).collect(),
        )));
        let report = monitor.run(output);
        (console.text(), stdin.text(), report)
    }

    #[test]
    fn echoes_and_answers_in_order() {
        let (console, stdin, report) =
            run(&[b"line1\nPlease select a keyboard layout\nline3\n"]);
        assert_eq!(
            console,
            "Starting to read QEMU output...\n\
             QEMU: line1\n\
             Detected prompt: Please select a keyboard layout\n\
             Sent Enter key to the VM\n\
             QEMU: Please select a keyboard layout\n\
             QEMU: line3\n"
        );
        assert_eq!(stdin, "\n");
        assert!(report.prompt_seen);
        assert!(report.responded);
        assert_eq!(report.lines, 3);
        assert!(report.error.is_none());
    }

    #[test]
    fn answers_once_for_repeated_prompt() {
        let (console, stdin, _) = run(&[
            b"Please select a keyboard layout\n",
            b"Please select a keyboard layout\n",
        ]);
        assert_eq!(stdin, "\n");
        assert_eq!(console.matches("Detected prompt").count(), 1);
    }

    #[test]
    fn no_prompt_means_no_input() {
        let (console, stdin, report) = run(&[b"hello\n", b"world"]);
        assert!(stdin.is_empty());
        assert!(!report.prompt_seen);
        assert!(!report.responded);
        assert_eq!(report.lines, 2);
        assert!(console.ends_with("QEMU: world\n"));
    }

    #[test]
    fn prompt_split_across_reads_is_answered() {
        let (_, stdin, report) = run(&[b"Please select a key", b"board layout: "]);
        assert!(report.prompt_seen);
        assert_eq!(stdin, "\n");
    }

    #[test]
    fn echoed_lines_are_sanitized() {
        let (console, _, _) = run(&[b"\x1b[31mHello\x1b[0m\r\n"]);
        assert!(console.contains("QEMU: Hello\n"));
        assert!(!console.contains('\x1b'));
    }

    #[test]
    fn broken_pipe_is_recorded_not_fatal() {
        let console = Spy::default();
        let input = InputHandle::new(Box::new(io::sink()));
        input.close();
        let monitor = OutputMonitor::new(console.clone(), input, PROMPT, b"\n", "QEMU");
        let output = OutputStream::new(Box::new(Chunked(vec![
            b"Please select a keyboard layout\n".to_vec(),
            b"after\n".to_vec(),
        ])));
        let report = monitor.run(output);
        assert!(report.prompt_seen);
        assert!(!report.responded);
        assert!(report.error.as_ref().is_some_and(RunError::is_broken_pipe));
        assert!(console.text().contains("QEMU: after"));
    }
}
