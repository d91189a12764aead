//! Payload decoding.
//!
//! Every length read from the payload is checked against the bytes that
//! remain before anything is allocated, so a damaged archive fails with
//! `Corrupt` instead of exhausting memory.

use byteorder::{ByteOrder, LittleEndian};

use super::format::{tag, MAX_DEPTH};
use crate::util::{DataType, Error, Result, Shape};
use crate::value::{NumericArray, Record, TypedValue};

/// Smallest possible encoded entry: key length, tag and a one-byte body.
const MIN_ENTRY_SIZE: usize = 8 + 1 + 1;

/// Decode an archive payload into its top-level record.
pub fn decode_payload(data: &[u8]) -> Result<Record> {
    let mut decoder = Decoder { buf: data, pos: 0 };
    let record = decoder.record_body(0)?;
    if decoder.remaining() != 0 {
        return Err(Error::corrupt(format!(
            "{} trailing bytes after payload",
            decoder.remaining()
        )));
    }
    Ok(record)
}

struct Decoder<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Decoder<'a> {
    #[inline]
    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.buf.len())
            .ok_or_else(|| {
                Error::corrupt(format!(
                    "payload truncated at offset {} (need {} bytes)",
                    self.pos, n
                ))
            })?;
        let bytes = &self.buf[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn u64(&mut self) -> Result<u64> {
        Ok(LittleEndian::read_u64(self.take(8)?))
    }

    fn i64(&mut self) -> Result<i64> {
        Ok(LittleEndian::read_i64(self.take(8)?))
    }

    /// A length or dimension that must fit in memory.
    fn size(&mut self) -> Result<usize> {
        let at = self.pos;
        let v = self.u64()?;
        usize::try_from(v)
            .map_err(|_| Error::corrupt(format!("size {} at offset {} is too large", v, at)))
    }

    fn string(&mut self) -> Result<String> {
        let len = self.size()?;
        let at = self.pos;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|e| {
            Error::corrupt(format!(
                "invalid UTF-8 at offset {}",
                at + e.utf8_error().valid_up_to()
            ))
        })
    }

    fn array(&mut self) -> Result<NumericArray> {
        let raw = self.u8()?;
        let dtype = DataType::from_u8(raw)
            .ok_or_else(|| Error::corrupt(format!("unknown data type tag {}", raw)))?;

        let rank = self.u8()? as usize;
        let mut dims = Vec::with_capacity(rank);
        for _ in 0..rank {
            dims.push(self.size()?);
        }

        let byte_len = self.size()?;
        let data = self.take(byte_len)?.to_vec();
        NumericArray::new(dtype, Shape::from(dims), data).map_err(|e| Error::corrupt(e.to_string()))
    }

    fn record_body(&mut self, depth: usize) -> Result<Record> {
        if depth > MAX_DEPTH {
            return Err(Error::corrupt(format!("records nested deeper than {}", MAX_DEPTH)));
        }

        let count = self.size()?;
        if count > self.remaining() / MIN_ENTRY_SIZE {
            return Err(Error::corrupt(format!(
                "record claims {} entries but only {} bytes remain",
                count,
                self.remaining()
            )));
        }

        let mut record = Record::new();
        for _ in 0..count {
            let key = self.string()?;
            if record.contains_key(&key) {
                return Err(Error::corrupt(format!("duplicate key {:?} in payload", key)));
            }
            let value = self.value(depth)?;
            record.insert(key, value)?;
        }
        Ok(record)
    }

    fn value(&mut self, depth: usize) -> Result<TypedValue> {
        let at = self.pos;
        match self.u8()? {
            tag::BOOL => match self.u8()? {
                0 => Ok(TypedValue::Bool(false)),
                1 => Ok(TypedValue::Bool(true)),
                b => Err(Error::corrupt(format!("invalid bool byte {} at offset {}", b, at + 1))),
            },
            tag::INT => Ok(TypedValue::Int(self.i64()?)),
            tag::FLOAT => Ok(TypedValue::Float(f64::from_bits(self.u64()?))),
            tag::STRING => Ok(TypedValue::String(self.string()?)),
            tag::ARRAY => Ok(TypedValue::Array(self.array()?)),
            tag::RECORD => Ok(TypedValue::Record(self.record_body(depth + 1)?)),
            t => Err(Error::corrupt(format!("unknown value tag {} at offset {}", t, at))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::encode::encode_payload;

    fn sample_record() -> Record {
        let mut feats = Record::new();
        feats
            .insert(
                "feat",
                NumericArray::from_slice_with_shape(&[0.1f32, 0.2, 0.3, 0.4], (2, 2)).unwrap(),
            )
            .unwrap();

        let mut r = Record::new();
        r.insert("flag", true).unwrap();
        r.insert("count", -3i64).unwrap();
        r.insert("ratio", 0.1f64 + 0.2).unwrap();
        r.insert("name", "cora").unwrap();
        r.insert("ids", NumericArray::from_slice(&[u64::MAX, 0])).unwrap();
        r.insert("node", feats).unwrap();
        r
    }

    #[test]
    fn test_decode_encoded() {
        let record = sample_record();
        let bytes = encode_payload(&record).unwrap();
        let decoded = decode_payload(&bytes).unwrap();
        assert_eq!(decoded, record);
        assert_eq!(
            decoded.get("ratio").unwrap().as_float().unwrap().to_bits(),
            (0.1f64 + 0.2).to_bits()
        );
    }

    #[test]
    fn test_every_truncation_is_corrupt() {
        let bytes = encode_payload(&sample_record()).unwrap();
        for len in 0..bytes.len() {
            let err = decode_payload(&bytes[..len]).unwrap_err();
            assert!(matches!(err, Error::Corrupt(_)), "len {}: {:?}", len, err);
        }
    }

    #[test]
    fn test_trailing_bytes() {
        let mut bytes = encode_payload(&sample_record()).unwrap();
        bytes.push(0);
        assert!(matches!(decode_payload(&bytes), Err(Error::Corrupt(_))));
    }

    #[test]
    fn test_huge_count_rejected() {
        let bytes = u64::MAX.to_le_bytes();
        assert!(matches!(decode_payload(&bytes), Err(Error::Corrupt(_))));
    }

    #[test]
    fn test_unknown_tag() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1u64.to_le_bytes());
        bytes.extend_from_slice(&1u64.to_le_bytes());
        bytes.push(b'k');
        bytes.push(99);
        bytes.push(0);
        assert!(matches!(decode_payload(&bytes), Err(Error::Corrupt(_))));
    }

    #[test]
    fn test_duplicate_key_in_payload() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&2u64.to_le_bytes());
        for _ in 0..2 {
            bytes.extend_from_slice(&1u64.to_le_bytes());
            bytes.push(b'k');
            bytes.push(tag::BOOL);
            bytes.push(1);
        }
        assert!(matches!(decode_payload(&bytes), Err(Error::Corrupt(_))));
    }

    /// A payload whose innermost record sits `levels` records below the top.
    fn nested_payload(levels: usize) -> Vec<u8> {
        let mut bytes = Vec::new();
        for _ in 0..levels {
            bytes.extend_from_slice(&1u64.to_le_bytes());
            bytes.extend_from_slice(&1u64.to_le_bytes());
            bytes.push(b'k');
            bytes.push(tag::RECORD);
        }
        bytes.extend_from_slice(&0u64.to_le_bytes());
        bytes
    }

    #[test]
    fn test_nesting_limit() {
        assert!(decode_payload(&nested_payload(MAX_DEPTH)).is_ok());
        assert!(matches!(
            decode_payload(&nested_payload(MAX_DEPTH + 1)),
            Err(Error::Corrupt(_))
        ));
    }

    #[test]
    fn test_invalid_utf8_key_is_corrupt() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1u64.to_le_bytes());
        bytes.extend_from_slice(&2u64.to_le_bytes());
        bytes.extend_from_slice(&[b'k', 0xff]);
        bytes.push(tag::BOOL);
        bytes.push(1);
        match decode_payload(&bytes) {
            Err(Error::Corrupt(msg)) => assert!(msg.contains("offset 17")),
            other => panic!("expected Corrupt, got {:?}", other),
        }
    }
}
