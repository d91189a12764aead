//! Graph archive format constants and header.
//!
//! ```text
//! +--------------------+
//! | Magic: "GRAR"      |  4 bytes
//! +--------------------+
//! | Format version     |  2 bytes (u16 LE)
//! +--------------------+
//! | Flags              |  1 byte (bit 0 = payload compressed)
//! +--------------------+
//! | Reserved           |  1 byte
//! +--------------------+
//! | Payload length     |  8 bytes (u64 LE)
//! +--------------------+
//! | Payload CRC32      |  4 bytes (u32 LE)
//! +--------------------+
//! | Reserved           |  4 bytes
//! +--------------------+
//! | ... Payload ...    |
//! +--------------------+
//! ```

use std::io::Write;

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};

use crate::util::{Error, Result};

/// Magic bytes at the start of every archive.
pub const ARCHIVE_MAGIC: &[u8; 4] = b"GRAR";

/// Size of the header in bytes.
pub const HEADER_SIZE: usize = 24;

/// Offset of the format version in the header.
pub const VERSION_OFFSET: usize = 4;

/// Offset of the flags byte in the header.
pub const FLAGS_OFFSET: usize = 6;

/// Offset of the payload length in the header.
pub const PAYLOAD_LEN_OFFSET: usize = 8;

/// Offset of the payload checksum in the header.
pub const CHECKSUM_OFFSET: usize = 16;

/// Current archive format version.
pub const FORMAT_VERSION: u16 = 1;

/// Payload is zlib-compressed.
pub const FLAG_COMPRESSED: u8 = 0x01;

/// Maximum nesting depth of records accepted by the decoder.
pub const MAX_DEPTH: usize = 64;

/// Value tags in the payload.
pub mod tag {
    pub const BOOL: u8 = 0;
    pub const INT: u8 = 1;
    pub const FLOAT: u8 = 2;
    pub const STRING: u8 = 3;
    pub const ARRAY: u8 = 4;
    pub const RECORD: u8 = 5;
}

/// Header information of an archive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArchiveInfo {
    /// Archive format version.
    pub format_version: u16,
    /// True if the payload is stored compressed.
    pub compressed: bool,
    /// Length of the stored payload in bytes.
    pub payload_len: u64,
    /// CRC32 of the stored payload.
    pub checksum: u32,
}

impl ArchiveInfo {
    /// Header describing `stored` payload bytes.
    pub fn for_payload(stored: &[u8], compressed: bool) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            compressed,
            payload_len: stored.len() as u64,
            checksum: crc32fast::hash(stored),
        }
    }

    /// Total archive size (header + payload).
    pub fn total_len(&self) -> Option<u64> {
        self.payload_len.checked_add(HEADER_SIZE as u64)
    }

    /// Parse and validate an archive header.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(Error::UnexpectedEof(data.len() as u64));
        }

        if &data[0..4] != ARCHIVE_MAGIC {
            return Err(Error::InvalidMagic);
        }

        let format_version = LittleEndian::read_u16(&data[VERSION_OFFSET..]);
        if format_version != FORMAT_VERSION {
            return Err(Error::UnsupportedVersion(i64::from(format_version)));
        }

        let flags = data[FLAGS_OFFSET];
        if flags & !FLAG_COMPRESSED != 0 {
            return Err(Error::corrupt(format!("unknown header flags {:#04x}", flags)));
        }

        if data[FLAGS_OFFSET + 1] != 0 || data[CHECKSUM_OFFSET + 4..HEADER_SIZE] != [0; 4] {
            return Err(Error::corrupt("reserved header bytes are not zero"));
        }

        let payload_len = LittleEndian::read_u64(&data[PAYLOAD_LEN_OFFSET..]);
        let checksum = LittleEndian::read_u32(&data[CHECKSUM_OFFSET..]);

        Ok(Self {
            format_version,
            compressed: flags & FLAG_COMPRESSED != 0,
            payload_len,
            checksum,
        })
    }

    /// Write the header.
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<()> {
        let flags = if self.compressed { FLAG_COMPRESSED } else { 0 };
        w.write_all(ARCHIVE_MAGIC)?;
        w.write_u16::<LittleEndian>(self.format_version)?;
        w.write_u8(flags)?;
        w.write_u8(0)?;
        w.write_u64::<LittleEndian>(self.payload_len)?;
        w.write_u32::<LittleEndian>(self.checksum)?;
        w.write_u32::<LittleEndian>(0)?;
        Ok(())
    }

    /// Header as bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(HEADER_SIZE);
        self.write_to(&mut buf)?;
        Ok(buf)
    }
}
