//! Key-addressed archives of typed values.
//!
//! An [`Archive`] is created for exactly one transfer. A write-mode archive
//! collects entries in memory and is materialized once, at the end, with
//! [`Archive::into_bytes`] or [`Archive::save`]. A read-mode archive is
//! decoded eagerly from bytes or a file and answers keyed reads.
//!
//! ```ignore
//! use graph_archive::archive::Archive;
//!
//! let mut out = Archive::writer();
//! out.write("version", 1i64)?;
//! out.enter_scope("meta")?;
//! out.write("name", "cora")?;
//! out.leave_scope()?;
//! let bytes = out.into_bytes()?;
//!
//! let mut input = Archive::from_bytes(&bytes)?;
//! assert_eq!(input.read("version")?.as_int()?, 1);
//! ```

mod compression;
mod decode;
mod encode;
mod format;
mod options;
mod sink;
mod source;

pub use compression::{compress, decompress};
pub use format::*;
pub use options::{ReadOptions, WriteOptions};

use std::borrow::Cow;
use std::path::Path;

use tracing::{debug, trace};

use crate::util::{Error, Result};
use crate::value::{Record, TypedValue};
use sink::OStream;
use source::Source;

/// Operation mode of an archive, fixed at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Write,
    Read,
}

/// An open nested scope.
#[derive(Debug)]
struct Scope {
    key: String,
    entries: Record,
}

/// Ordered, key-addressed container of [`TypedValue`]s.
#[derive(Debug)]
pub struct Archive {
    mode: Mode,
    root: Record,
    scopes: Vec<Scope>,
    options: WriteOptions,
    info: Option<ArchiveInfo>,
}

impl Archive {
    /// Create an empty write-mode archive.
    pub fn writer() -> Self {
        Self::writer_with(WriteOptions::default())
    }

    /// Create an empty write-mode archive with options.
    pub fn writer_with(options: WriteOptions) -> Self {
        Self {
            mode: Mode::Write,
            root: Record::new(),
            scopes: Vec::new(),
            options,
            info: None,
        }
    }

    /// Decode a read-mode archive from bytes produced by [`into_bytes`](Self::into_bytes)
    /// or [`save`](Self::save).
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let info = ArchiveInfo::parse(data)?;
        let total = info
            .total_len()
            .and_then(|t| usize::try_from(t).ok())
            .ok_or_else(|| Error::corrupt("payload length overflows"))?;

        if data.len() < total {
            return Err(Error::UnexpectedEof(data.len() as u64));
        }
        if data.len() > total {
            return Err(Error::corrupt(format!(
                "{} trailing bytes after payload",
                data.len() - total
            )));
        }

        let stored = &data[HEADER_SIZE..total];
        let checksum = crc32fast::hash(stored);
        if checksum != info.checksum {
            return Err(Error::corrupt(format!(
                "checksum mismatch: header {:#010x}, payload {:#010x}",
                info.checksum, checksum
            )));
        }

        let payload: Cow<'_, [u8]> = if info.compressed {
            Cow::Owned(decompress(stored)?)
        } else {
            Cow::Borrowed(stored)
        };
        let root = decode::decode_payload(&payload)?;

        debug!(
            "Read archive: {} entries, {} payload bytes{}",
            root.len(),
            info.payload_len,
            if info.compressed { " (compressed)" } else { "" }
        );

        Ok(Self {
            mode: Mode::Read,
            root,
            scopes: Vec::new(),
            options: WriteOptions::default(),
            info: Some(info),
        })
    }

    /// Open an archive file for reading with memory mapping.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, ReadOptions::default())
    }

    /// Open an archive file for reading.
    pub fn open_with(path: impl AsRef<Path>, options: ReadOptions) -> Result<Self> {
        let path = path.as_ref();
        let source = Source::open(path, options.use_mmap)?;
        debug!(
            "Opening archive: {} ({} bytes, {})",
            path.display(),
            source.bytes().len(),
            if source.is_mapped() { "mmap" } else { "buffered" }
        );
        Self::from_bytes(source.bytes())
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Header of a read-mode archive. `None` in write mode.
    #[inline]
    pub fn info(&self) -> Option<&ArchiveInfo> {
        self.info.as_ref()
    }

    /// Number of open scopes.
    #[inline]
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    fn current(&self) -> &Record {
        self.scopes.last().map_or(&self.root, |s| &s.entries)
    }

    fn current_mut(&mut self) -> &mut Record {
        match self.scopes.last_mut() {
            Some(scope) => &mut scope.entries,
            None => &mut self.root,
        }
    }

    fn require_mode(&self, mode: Mode, op: &str) -> Result<()> {
        if self.mode != mode {
            return Err(Error::state(format!("{} on a {:?}-mode archive", op, self.mode)));
        }
        Ok(())
    }

    /// Append an entry to the current scope.
    ///
    /// Fails with `DuplicateKey` if the key is already present (the first
    /// value is kept) and with `InvalidState` on a read-mode archive.
    pub fn write(&mut self, key: impl Into<String>, value: impl Into<TypedValue>) -> Result<()> {
        self.require_mode(Mode::Write, "write")?;
        let key = key.into();
        trace!("write {:?} at depth {}", key, self.depth());
        self.current_mut().insert(key, value)
    }

    /// Read an entry of the current scope by exact key.
    ///
    /// Fails with `KeyNotFound` if absent and with `InvalidState` on a
    /// write-mode archive. The archive is not modified.
    pub fn read(&self, key: &str) -> Result<TypedValue> {
        self.require_mode(Mode::Read, "read")?;
        trace!("read {:?} at depth {}", key, self.depth());
        self.current().require(key).cloned()
    }

    /// True if the current scope holds `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.current().contains_key(key)
    }

    /// Keys of the current scope in write order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.current().keys()
    }

    /// Number of entries in the current scope.
    pub fn len(&self) -> usize {
        self.current().len()
    }

    pub fn is_empty(&self) -> bool {
        self.current().is_empty()
    }

    /// Open a nested scope under `key`.
    ///
    /// In write mode the scope's entries become one record-valued entry of
    /// the parent on [`leave_scope`](Self::leave_scope). In read mode `key`
    /// must name a record, which subsequent reads address. At most
    /// [`MAX_DEPTH`] scopes can be open at once.
    pub fn enter_scope(&mut self, key: impl Into<String>) -> Result<&mut Self> {
        let key = key.into();
        if self.depth() >= MAX_DEPTH {
            return Err(Error::schema(format!(
                "scope {:?} would nest deeper than {}",
                key, MAX_DEPTH
            )));
        }
        let entries = match self.mode {
            Mode::Write => {
                if self.current().contains_key(&key) {
                    return Err(Error::DuplicateKey(key));
                }
                Record::new()
            }
            Mode::Read => self.current().require(&key)?.as_record()?.clone(),
        };
        trace!("enter scope {:?} at depth {}", key, self.depth());
        self.scopes.push(Scope { key, entries });
        Ok(self)
    }

    /// Close the innermost scope.
    pub fn leave_scope(&mut self) -> Result<&mut Self> {
        let scope = self
            .scopes
            .pop()
            .ok_or_else(|| Error::state("leave_scope without an open scope"))?;
        trace!("leave scope {:?}", scope.key);
        if self.mode == Mode::Write {
            self.current_mut().insert(scope.key, scope.entries)?;
        }
        Ok(self)
    }

    /// Run `f` inside the scope `key`.
    ///
    /// If `f` fails the scope is discarded without being committed to the
    /// parent and the error is returned.
    pub fn scoped<T>(
        &mut self,
        key: impl Into<String>,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let depth = self.depth();
        self.enter_scope(key)?;
        match f(self) {
            Ok(value) => {
                self.leave_scope()?;
                Ok(value)
            }
            Err(e) => {
                self.scopes.truncate(depth);
                Err(e)
            }
        }
    }

    fn check_materializable(&self) -> Result<()> {
        self.require_mode(Mode::Write, "materialize")?;
        if !self.scopes.is_empty() {
            return Err(Error::state(format!(
                "{} scope(s) still open",
                self.scopes.len()
            )));
        }
        Ok(())
    }

    /// Encode the payload and build the header.
    fn materialize(&self) -> Result<(ArchiveInfo, Vec<u8>)> {
        self.check_materializable()?;
        let payload = encode::encode_payload(&self.root)?;
        let packed = if self.options.compresses() {
            compress(&payload, self.options.compression_level)?
        } else {
            None
        };
        let (stored, compressed) = match packed {
            Some(c) => (c, true),
            None => (payload, false),
        };
        let info = ArchiveInfo::for_payload(&stored, compressed);
        debug!(
            "Materialized archive: {} entries, {} payload bytes{}",
            self.root.len(),
            stored.len(),
            if compressed { " (compressed)" } else { "" }
        );
        Ok((info, stored))
    }

    /// Finish a write-mode archive and return its bytes.
    ///
    /// Fails with `InvalidState` on a read-mode archive or while a scope is
    /// open.
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        let (info, stored) = self.materialize()?;
        let mut bytes = info.to_bytes()?;
        bytes.extend_from_slice(&stored);
        Ok(bytes)
    }

    /// Finish a write-mode archive and write it to `path`.
    ///
    /// The file appears atomically: on any failure `path` is left as it was.
    pub fn save(self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let (info, stored) = self.materialize()?;
        let mut stream = OStream::create(path)?;
        stream.write_bytes(&info.to_bytes()?)?;
        stream.write_bytes(&stored)?;
        let written = stream.pos();
        stream.commit()?;
        debug!("Saved archive: {} ({} bytes)", path.display(), written);
        Ok(())
    }
}
