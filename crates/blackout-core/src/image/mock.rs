//! Fixture image for tests: a zero-filled buffer at a synthetic base
//! address with bytes planted at chosen offsets.

use crate::image::ImageWindow;

pub struct MockImage {
    base: u64,
    bytes: Vec<u8>,
}

impl MockImage {
    pub fn builder(base: u64, size: usize) -> MockImageBuilder {
        MockImageBuilder {
            base,
            bytes: vec![0; size],
        }
    }

    pub fn window(&self) -> ImageWindow<'_> {
        ImageWindow::new(self.base, &self.bytes)
    }
}

pub struct MockImageBuilder {
    base: u64,
    bytes: Vec<u8>,
}

impl MockImageBuilder {
    pub fn put(mut self, offset: usize, bytes: &[u8]) -> Self {
        self.bytes[offset..offset + bytes.len()].copy_from_slice(bytes);
        self
    }

    pub fn put_i32(self, offset: usize, value: i32) -> Self {
        self.put(offset, &value.to_le_bytes())
    }

    /// Plant bytes that match `pattern`: literals verbatim, `fill` for
    /// wildcard positions.
    pub fn put_matching(
        mut self,
        offset: usize,
        pattern: &crate::scan::Pattern,
        fill: u8,
    ) -> Self {
        for (i, token) in pattern.tokens().iter().enumerate() {
            self.bytes[offset + i] = token.unwrap_or(fill);
        }
        self
    }

    pub fn build(self) -> MockImage {
        MockImage {
            base: self.base,
            bytes: self.bytes,
        }
    }
}
