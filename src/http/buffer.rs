use bytes::BytesMut;

/// Marks the end of the header section.
pub const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Accumulates the bytes received on one connection.
///
/// Appends only; the parser reads the content through [`RawBuffer::as_bytes`].
#[derive(Debug, Default)]
pub struct RawBuffer {
    data: BytesMut,
    /// Number of bytes already searched for the terminator.
    scanned: usize,
    header_end: Option<usize>,
}

impl RawBuffer {
    pub fn new() -> Self {
        Self::with_capacity(4096)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: BytesMut::with_capacity(capacity),
            scanned: 0,
            header_end: None,
        }
    }

    pub fn append(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether `\r\n\r\n` occurs anywhere in the buffer.
    ///
    /// Only bytes appended since the last call are searched, plus the three
    /// preceding bytes since the terminator may straddle two reads.
    pub fn has_header_end(&mut self) -> bool {
        if self.header_end.is_none() {
            let start = self.scanned.saturating_sub(HEADER_TERMINATOR.len() - 1);
            self.header_end =
                find(&self.data[start..], HEADER_TERMINATOR).map(|pos| start + pos);
            self.scanned = self.data.len();
        }
        self.header_end.is_some()
    }
}

/// Position of the first occurrence of `needle` in `haystack`.
pub fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
