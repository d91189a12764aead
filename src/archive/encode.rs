//! Payload encoding.
//!
//! The payload is the body of the top-level record: an entry count followed
//! by `(key, value)` pairs. Every value starts with a one-byte tag from
//! [`tag`](super::format::tag).

use byteorder::{LittleEndian, WriteBytesExt};

use super::format::{tag, MAX_DEPTH};
use crate::util::{Error, Result};
use crate::value::{NumericArray, Record, TypedValue};

/// Encode the entries of `record` as an archive payload.
pub fn encode_payload(record: &Record) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_record_body(&mut buf, record, 0)?;
    Ok(buf)
}

/// `depth` counts the records enclosing this one; readers reject payloads
/// nested deeper than [`MAX_DEPTH`].
fn write_record_body(buf: &mut Vec<u8>, record: &Record, depth: usize) -> Result<()> {
    if depth > MAX_DEPTH {
        return Err(Error::schema(format!("records nested deeper than {}", MAX_DEPTH)));
    }
    buf.write_u64::<LittleEndian>(record.len() as u64)?;
    for (key, value) in record.iter() {
        write_str(buf, key)?;
        write_value(buf, value, depth)?;
    }
    Ok(())
}

fn write_str(buf: &mut Vec<u8>, s: &str) -> Result<()> {
    buf.write_u64::<LittleEndian>(s.len() as u64)?;
    buf.extend_from_slice(s.as_bytes());
    Ok(())
}

fn write_array(buf: &mut Vec<u8>, array: &NumericArray) -> Result<()> {
    buf.write_u8(array.dtype().as_u8())?;
    let dims = array.shape().dims();
    let rank = u8::try_from(dims.len())
        .map_err(|_| Error::schema(format!("array rank {} exceeds {}", dims.len(), u8::MAX)))?;
    buf.write_u8(rank)?;
    for &d in dims {
        buf.write_u64::<LittleEndian>(d as u64)?;
    }
    buf.write_u64::<LittleEndian>(array.bytes().len() as u64)?;
    buf.extend_from_slice(array.bytes());
    Ok(())
}

fn write_value(buf: &mut Vec<u8>, value: &TypedValue, depth: usize) -> Result<()> {
    match value {
        TypedValue::Bool(v) => {
            buf.write_u8(tag::BOOL)?;
            buf.write_u8(u8::from(*v))?;
        }
        TypedValue::Int(v) => {
            buf.write_u8(tag::INT)?;
            buf.write_i64::<LittleEndian>(*v)?;
        }
        TypedValue::Float(v) => {
            buf.write_u8(tag::FLOAT)?;
            buf.write_u64::<LittleEndian>(v.to_bits())?;
        }
        TypedValue::String(v) => {
            buf.write_u8(tag::STRING)?;
            write_str(buf, v)?;
        }
        TypedValue::Array(v) => {
            buf.write_u8(tag::ARRAY)?;
            write_array(buf, v)?;
        }
        TypedValue::Record(v) => {
            buf.write_u8(tag::RECORD)?;
            write_record_body(buf, v, depth + 1)?;
        }
    }
    Ok(())
}
