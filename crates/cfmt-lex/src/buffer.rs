//! Growable byte buffer that owns the source text.
//!
//! Tokens never borrow into the buffer directly; they hold `(offset, len)`
//! pairs and resolve their lexeme by indexing back in. That keeps the buffer
//! free to be reset and reused between tokenization runs without fighting
//! the borrow checker.

/// Owns the raw bytes of a source file.
#[derive(Debug, Default, Clone)]
pub struct Buffer {
    bytes: Vec<u8>,
}

impl Buffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Create a buffer pre-loaded with `content`.
    pub fn from_bytes(content: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: content.into(),
        }
    }

    /// Create a buffer pre-loaded from a `&str`.
    pub fn from_str(content: &str) -> Self {
        Self {
            bytes: content.as_bytes().to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn append(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    pub fn append_str(&mut self, s: &str) {
        self.bytes.extend_from_slice(s.as_bytes());
    }

    pub fn append_char(&mut self, c: u8) {
        self.bytes.push(c);
    }

    pub fn reset(&mut self) {
        self.bytes.clear();
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Resolve a `(offset, len)` lexeme back into a byte slice.
    ///
    /// Out-of-bounds ranges return an empty slice rather than panicking,
    /// since a malformed index should show up as a visibly wrong lexeme in
    /// a diagnostic, not a crash.
    pub fn slice(&self, offset: usize, len: usize) -> &[u8] {
        let end = offset.saturating_add(len);
        if offset >= self.bytes.len() || end > self.bytes.len() {
            return &[];
        }
        &self.bytes[offset..end]
    }

    /// Resolve a lexeme as `&str`, replacing invalid UTF-8 is never done —
    /// C source is scanned byte-for-byte, so a non-UTF-8 lexeme yields
    /// `None` rather than lossy text.
    pub fn slice_str(&self, offset: usize, len: usize) -> Option<&str> {
        std::str::from_utf8(self.slice(offset, len)).ok()
    }

    /// Lexicographic byte comparison against another buffer's contents.
    pub fn compare(&self, other: &Buffer) -> std::cmp::Ordering {
        self.bytes.cmp(&other.bytes)
    }
}

impl std::cmp::PartialEq for Buffer {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl std::cmp::Eq for Buffer {}
