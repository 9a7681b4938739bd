//! Line framing: newline-terminated commands reassembled across reads.
//!
//! Bytes read from the socket are appended to a pending buffer bounded at
//! twice the read chunk size. Complete lines are popped from the front and the
//! unterminated remainder is kept for the next read.
//!
//! Overflow rule: when appending a read would bring the pending buffer to its
//! bound, everything pending is discarded first. A line longer than the bound
//! is therefore lost, but the stream resynchronises at the next newline.

/// Socket read size used by the server.
pub const DEFAULT_READ_CHUNK: usize = 512;

/// Reassembles newline-terminated lines from arbitrary byte chunks.
#[derive(Debug)]
pub struct LineFramer {
    buf: Vec<u8>,
    capacity: usize,
}

impl Default for LineFramer {
    fn default() -> Self {
        Self::new(DEFAULT_READ_CHUNK)
    }
}

impl LineFramer {
    /// Create a framer for reads of up to `read_chunk` bytes.
    pub fn new(read_chunk: usize) -> Self {
        let capacity = read_chunk.max(1) * 2;
        Self {
            buf: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append bytes from one read.
    ///
    /// Returns the number of pending bytes discarded by the overflow rule,
    /// zero in the normal case.
    pub fn push(&mut self, bytes: &[u8]) -> usize {
        let mut dropped = 0;
        if self.buf.len() + bytes.len() >= self.capacity {
            dropped = self.buf.len();
            self.buf.clear();
        }
        self.buf.extend_from_slice(bytes);
        dropped
    }

    /// Pop the next complete line, without its newline.
    pub fn pop_line(&mut self) -> Option<Vec<u8>> {
        let len = self.buf.iter().position(|&b| b == b'\n')?;
        let mut line: Vec<u8> = self.buf.drain(..=len).collect();
        line.pop();
        Some(line)
    }

    /// Number of buffered bytes not yet terminated by a newline.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    /// Upper bound on buffered bytes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
