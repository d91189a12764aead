//! Read and write options.

/// Options applied when an archive is materialized.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WriteOptions {
    /// Compression hint: -1 = no compression, 0-9 = zlib level.
    pub compression_level: i32,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self { compression_level: -1 }
    }
}

impl WriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the compression hint, clamped to -1..=9.
    pub fn with_compression(mut self, level: i32) -> Self {
        self.compression_level = level.clamp(-1, 9);
        self
    }

    /// True if the payload will be offered to the compressor.
    #[inline]
    pub fn compresses(&self) -> bool {
        self.compression_level > 0
    }
}

/// Options applied when an archive is opened from disk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReadOptions {
    /// Memory-map the file instead of reading it into a buffer.
    pub use_mmap: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self { use_mmap: true }
    }
}

impl ReadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compression_clamped() {
        assert_eq!(WriteOptions::new().compression_level, -1);
        assert!(!WriteOptions::new().compresses());
        assert_eq!(WriteOptions::new().with_compression(42).compression_level, 9);
        assert_eq!(WriteOptions::new().with_compression(-7).compression_level, -1);
        assert!(WriteOptions::new().with_compression(1).compresses());
        assert!(!WriteOptions::new().with_compression(0).compresses());
    }

    #[test]
    fn test_read_defaults() {
        assert!(ReadOptions::default().use_mmap);
        assert!(!ReadOptions::new().with_mmap(false).use_mmap);
    }
}
