/// Bytes received since the last frame delimiter, with a hard upper bound.
pub struct RawFrameBuffer {
    bytes: Vec<u8>,
    capacity: usize,
}

impl RawFrameBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            bytes: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a byte. Returns `false`, leaving the buffer untouched, once full.
    pub fn push(&mut self, byte: u8) -> bool {
        if self.bytes.len() >= self.capacity {
            return false;
        }
        self.bytes.push(byte);
        true
    }

    /// Drains the accumulated bytes as text; invalid UTF-8 becomes U+FFFD.
    pub fn take_text(&mut self) -> String {
        let text = String::from_utf8_lossy(&self.bytes).into_owned();
        self.bytes.clear();
        text
    }

    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_refuses_past_capacity() {
        let mut buffer = RawFrameBuffer::with_capacity(2);
        assert!(buffer.push(b'1'));
        assert!(buffer.push(b'2'));
        assert!(!buffer.push(b'3'));
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn take_text_empties_buffer() {
        let mut buffer = RawFrameBuffer::with_capacity(8);
        for byte in b"4\xff5" {
            buffer.push(*byte);
        }
        assert_eq!(buffer.take_text(), "4\u{fffd}5");
        assert!(buffer.is_empty());
    }
}
