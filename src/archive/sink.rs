//! Archive output stream.
//!
//! Bytes go to a temporary file next to the destination, which is renamed
//! over the destination on [`OStream::commit`]. Dropping the stream without
//! committing removes the temporary file and leaves the destination as it
//! was.

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::util::{Error, Result};

/// Output stream for writing one archive file.
pub(crate) struct OStream {
    writer: BufWriter<NamedTempFile>,
    target: PathBuf,
    pos: u64,
}

impl OStream {
    /// Create a new output stream for the given file path.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let target = path.as_ref().to_path_buf();
        let dir = match target.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let temp = NamedTempFile::new_in(dir)?;

        Ok(Self {
            writer: BufWriter::with_capacity(2 * 1024 * 1024, temp), // 2MB buffer
            target,
            pos: 0,
        })
    }

    /// Get the current write position.
    #[inline]
    pub fn pos(&self) -> u64 {
        self.pos
    }

    /// Write bytes and advance position.
    pub fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.writer.write_all(data)?;
        self.pos += data.len() as u64;
        Ok(())
    }

    /// Flush, sync and move the file into place.
    pub fn commit(self) -> Result<()> {
        let temp = self.writer.into_inner().map_err(|e| Error::Io(e.into_error()))?;
        temp.as_file().sync_all()?;
        temp.persist(&self.target).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_commit_writes_target() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("out.grar");

        let mut stream = OStream::create(&path)?;
        stream.write_bytes(b"GRAR")?;
        stream.write_bytes(&[1, 2, 3])?;
        assert_eq!(stream.pos(), 7);
        assert!(!path.exists());
        stream.commit()?;

        assert_eq!(std::fs::read(&path)?, b"GRAR\x01\x02\x03");
        Ok(())
    }

    #[test]
    fn test_drop_leaves_target_untouched() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("out.grar");
        std::fs::write(&path, b"old")?;

        {
            let mut stream = OStream::create(&path)?;
            stream.write_bytes(b"new contents")?;
        }

        assert_eq!(std::fs::read(&path)?, b"old");
        assert_eq!(std::fs::read_dir(dir.path())?.count(), 1);
        Ok(())
    }
}
