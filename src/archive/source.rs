//! Archive input sources.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use memmap2::Mmap;

use super::format::HEADER_SIZE;
use crate::util::{Error, Result};

/// Bytes of an archive opened from disk.
/// Supports both memory-mapped and buffered I/O modes.
pub(crate) enum Source {
    /// Memory-mapped file (preferred for large files)
    Mmap(Mmap),
    /// Whole file read into memory (fallback)
    Buffer(Vec<u8>),
}

impl Source {
    /// Open a file with optional memory mapping.
    pub fn open(path: impl AsRef<Path>, use_mmap: bool) -> Result<Self> {
        let path = path.as_ref();
        let mut file = File::open(path)?;
        let size = file.metadata()?.len();

        if size < HEADER_SIZE as u64 {
            return Err(Error::UnexpectedEof(size));
        }

        if use_mmap {
            // Safety: the mapping is read-only and only lives until the
            // archive has been decoded into owned values.
            let mmap = unsafe { Mmap::map(&file) }.map_err(|e| Error::MmapFailed(e.to_string()))?;
            Ok(Self::Mmap(mmap))
        } else {
            let mut buf = Vec::with_capacity(size as usize);
            file.read_to_end(&mut buf)?;
            Ok(Self::Buffer(buf))
        }
    }

    pub fn bytes(&self) -> &[u8] {
        match self {
            Self::Mmap(mmap) => &mmap[..],
            Self::Buffer(buf) => buf.as_slice(),
        }
    }

    #[inline]
    pub fn is_mapped(&self) -> bool {
        matches!(self, Self::Mmap(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_open_both_modes() -> Result<()> {
        let mut temp = NamedTempFile::new()?;
        temp.write_all(&[0xAB; HEADER_SIZE + 3])?;
        temp.flush()?;

        let mapped = Source::open(temp.path(), true)?;
        assert!(mapped.is_mapped());
        let buffered = Source::open(temp.path(), false)?;
        assert!(!buffered.is_mapped());
        assert_eq!(mapped.bytes(), buffered.bytes());
        assert_eq!(mapped.bytes().len(), HEADER_SIZE + 3);
        Ok(())
    }

    #[test]
    fn test_too_small() -> Result<()> {
        let mut temp = NamedTempFile::new()?;
        temp.write_all(b"GRAR")?;
        temp.flush()?;
        assert!(matches!(Source::open(temp.path(), true), Err(Error::UnexpectedEof(4))));
        Ok(())
    }

    #[test]
    fn test_missing_file() {
        let err = Source::open("/nonexistent/graph.grar", false).err().unwrap();
        assert!(matches!(err, Error::Io(ref e) if e.kind() == std::io::ErrorKind::NotFound));
    }
}
