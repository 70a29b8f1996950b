//! The log kernel object (`spec.md §4.6`).

use crate::config::LOG_LINE_BUFFER_CAPACITY;
use crate::sync::SpinMutex;

struct LineBuffer {
    bytes: [u8; LOG_LINE_BUFFER_CAPACITY],
    len: usize,
}

impl LineBuffer {
    const fn new() -> Self {
        Self {
            bytes: [0; LOG_LINE_BUFFER_CAPACITY],
            len: 0,
        }
    }

    fn is_full(&self) -> bool {
        self.len == self.bytes.len()
    }

    fn push(&mut self, byte: u8) {
        self.bytes[self.len] = byte;
        self.len += 1;
    }

    fn take(&mut self) -> ([u8; LOG_LINE_BUFFER_CAPACITY], usize) {
        let contents = (self.bytes, self.len);
        self.len = 0;
        contents
    }

    fn as_str(bytes: &[u8]) -> &str {
        core::str::from_utf8(bytes).unwrap_or("<non-utf8 log line>")
    }
}

/// Per-object line-buffered console writer. Each process's capability
/// table typically binds a distinct `LogObject` carrying that process's
/// own prefix, so lines from different processes are never interleaved
/// mid-line (`spec.md §6` "Log format").
pub struct LogObject {
    buffer: SpinMutex<LineBuffer>,
    prefix: &'static str,
}

impl LogObject {
    /// `prefix` of `None` falls back to [`crate::config::DEFAULT_LOG_PREFIX`]
    /// (`spec.md §4.6`: "optional prefix string").
    pub const fn new(prefix: Option<&'static str>) -> Self {
        Self {
            buffer: SpinMutex::new(LineBuffer::new()),
            prefix: match prefix {
                Some(p) => p,
                None => crate::config::DEFAULT_LOG_PREFIX,
            },
        }
    }

    /// Appends `byte` to the buffer, flushing to the console first if the
    /// byte is a newline or the buffer is full (`spec.md §4.6`).
    pub fn write_byte(&self, byte: u8) {
        let mut buffer = self.buffer.lock();
        if byte == b'\n' {
            self.flush_locked(&mut buffer);
            return;
        }
        if buffer.is_full() {
            self.flush_locked(&mut buffer);
        }
        buffer.push(byte);
    }

    fn flush_locked(&self, buffer: &mut LineBuffer) {
        let (bytes, len) = buffer.take();
        crate::println!("{} | {}", self.prefix, LineBuffer::as_str(&bytes[..len]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newline_flushes_and_resets() {
        let mut buf = LineBuffer::new();
        buf.push(b'A');
        assert_eq!(buf.len, 1);
        let (bytes, len) = buf.take();
        assert_eq!(&bytes[..len], b"A");
        assert_eq!(buf.len, 0);
    }

    #[test]
    fn full_buffer_is_reported_before_overflow() {
        let mut buf = LineBuffer::new();
        for _ in 0..LOG_LINE_BUFFER_CAPACITY {
            buf.push(b'x');
        }
        assert!(buf.is_full());
    }
}
