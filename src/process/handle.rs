use parking_lot::Mutex;
use std::io::{self, Read, Write};
use std::sync::Arc;

use crate::error::RunError;

/// Shared, closable writer for the child's standard input.
///
/// Cloned into the output monitor (which answers the prompt) and kept by
/// the session (which closes it during cleanup).
#[derive(Clone)]
pub struct InputHandle {
    writer: Arc<Mutex<Option<Box<dyn Write + Send>>>>,
}

impl InputHandle {
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Arc::new(Mutex::new(Some(writer))),
        }
    }

    /// Write `bytes` and flush immediately.
    ///
    /// Writing to a closed handle is reported as a broken pipe, same as a
    /// write to a child that has already exited.
    pub fn send(&self, bytes: &[u8]) -> Result<(), RunError> {
        let mut writer = self.writer.lock();
        let Some(writer) = writer.as_mut() else {
            return Err(RunError::BrokenPipe {
                source: io::Error::new(io::ErrorKind::BrokenPipe, "input stream is closed"),
            });
        };
        writer
            .write_all(bytes)
            .and_then(|()| writer.flush())
            .map_err(RunError::from_io)
    }

    /// Close the writer. Returns `false` if it was already closed.
    pub fn close(&self) -> bool {
        self.writer.lock().take().is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.writer.lock().is_none()
    }
}

/// Closable reader for the child's merged stdout/stderr.
///
/// Reads from a closed stream report end-of-stream.
pub struct OutputStream {
    reader: Option<Box<dyn Read + Send>>,
}

impl OutputStream {
    pub fn new(reader: Box<dyn Read + Send>) -> Self {
        Self {
            reader: Some(reader),
        }
    }

    /// Close the reader. Returns `false` if it was already closed.
    pub fn close(&mut self) -> bool {
        self.reader.take().is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.reader.is_none()
    }
}

impl Read for OutputStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.reader.as_mut() {
            Some(reader) => reader.read(buf),
            None => Ok(0),
        }
    }
}
