//! Payload compression.
//!
//! Compressed payloads are zlib streams prefixed with the uncompressed size.

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::util::{Error, Result};

/// Upper bound on the capacity reserved up front while decompressing.
const MAX_PREALLOC: usize = 64 * 1024 * 1024;

/// Compress data using zlib.
///
/// `level` follows the compression hint convention: -1 or 0 disables
/// compression, 1..=9 selects increasingly strong settings.
///
/// Returns `None` if compression is disabled or would not save space.
/// Otherwise the result is `[uncompressed_size: u64 LE][zlib stream]`.
pub fn compress(data: &[u8], level: i32) -> Result<Option<Vec<u8>>> {
    if level <= 0 || data.is_empty() {
        return Ok(None);
    }

    let compression_level = match level {
        1 => Compression::fast(),
        2..=5 => Compression::default(),
        _ => Compression::best(),
    };

    let mut encoder = ZlibEncoder::new(Vec::new(), compression_level);
    encoder.write_all(data)?;
    let compressed = encoder.finish()?;

    if compressed.len() + 8 >= data.len() {
        return Ok(None);
    }

    let mut result = Vec::with_capacity(8 + compressed.len());
    result.extend_from_slice(&(data.len() as u64).to_le_bytes());
    result.extend_from_slice(&compressed);

    Ok(Some(result))
}

/// Decompress data produced by [`compress`].
///
/// A stream that is malformed or does not inflate to exactly its recorded
/// size is `Corrupt`. Inflation stops one byte past the recorded size.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    if data.len() < 8 {
        return Err(Error::corrupt("compressed payload too short"));
    }

    let mut size_bytes = [0u8; 8];
    size_bytes.copy_from_slice(&data[0..8]);
    let uncompressed_size = usize::try_from(u64::from_le_bytes(size_bytes))
        .map_err(|_| Error::corrupt("uncompressed size does not fit in memory"))?;

    let limit = (uncompressed_size as u64).saturating_add(1);
    let mut decoder = ZlibDecoder::new(&data[8..]).take(limit);
    let mut decompressed = Vec::with_capacity(uncompressed_size.min(MAX_PREALLOC));
    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| Error::corrupt(format!("zlib: {}", e)))?;

    if decompressed.len() > uncompressed_size {
        return Err(Error::corrupt(format!(
            "stream inflates past the recorded size of {} bytes",
            uncompressed_size
        )));
    }
    if decompressed.len() != uncompressed_size {
        return Err(Error::corrupt(format!(
            "decompressed {} bytes, header says {}",
            decompressed.len(),
            uncompressed_size
        )));
    }

    Ok(decompressed)
}
