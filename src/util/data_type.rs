//! Element data types of numeric arrays.

use std::fmt;

/// Element type of a [`NumericArray`](crate::value::NumericArray).
///
/// Each type has a fixed size and a stable one-byte tag used on disk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum DataType {
    /// Boolean (stored as u8: 0 = false, non-zero = true)
    Bool = 0,
    /// Unsigned 8-bit integer
    Uint8 = 1,
    /// Signed 8-bit integer
    Int8 = 2,
    /// Unsigned 16-bit integer
    Uint16 = 3,
    /// Signed 16-bit integer
    Int16 = 4,
    /// Unsigned 32-bit integer
    Uint32 = 5,
    /// Signed 32-bit integer
    Int32 = 6,
    /// Unsigned 64-bit integer
    Uint64 = 7,
    /// Signed 64-bit integer
    Int64 = 8,
    /// 16-bit floating point (IEEE 754 half precision)
    Float16 = 9,
    /// 32-bit floating point
    Float32 = 10,
    /// 64-bit floating point
    Float64 = 11,
}

impl DataType {
    /// Returns the size in bytes of a single element of this type.
    #[inline]
    pub const fn num_bytes(self) -> usize {
        match self {
            Self::Bool | Self::Uint8 | Self::Int8 => 1,
            Self::Uint16 | Self::Int16 | Self::Float16 => 2,
            Self::Uint32 | Self::Int32 | Self::Float32 => 4,
            Self::Uint64 | Self::Int64 | Self::Float64 => 8,
        }
    }

    /// Returns the name of this type as a string.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Uint8 => "uint8",
            Self::Int8 => "int8",
            Self::Uint16 => "uint16",
            Self::Int16 => "int16",
            Self::Uint32 => "uint32",
            Self::Int32 => "int32",
            Self::Uint64 => "uint64",
            Self::Int64 => "int64",
            Self::Float16 => "float16",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
        }
    }

    /// Convert from the on-disk tag.
    pub const fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Bool),
            1 => Some(Self::Uint8),
            2 => Some(Self::Int8),
            3 => Some(Self::Uint16),
            4 => Some(Self::Int16),
            5 => Some(Self::Uint32),
            6 => Some(Self::Int32),
            7 => Some(Self::Uint64),
            8 => Some(Self::Int64),
            9 => Some(Self::Float16),
            10 => Some(Self::Float32),
            11 => Some(Self::Float64),
            _ => None,
        }
    }

    /// On-disk tag of this type.
    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizes() {
        assert_eq!(DataType::Bool.num_bytes(), 1);
        assert_eq!(DataType::Uint8.num_bytes(), 1);
        assert_eq!(DataType::Int32.num_bytes(), 4);
        assert_eq!(DataType::Float16.num_bytes(), 2);
        assert_eq!(DataType::Float64.num_bytes(), 8);
    }

    #[test]
    fn test_names() {
        assert_eq!(DataType::Int64.name(), "int64");
        assert_eq!(format!("{}", DataType::Uint16), "uint16");
    }

    #[test]
    fn test_tags() {
        for i in 0..12u8 {
            let dt = DataType::from_u8(i).unwrap();
            assert_eq!(dt.as_u8(), i);
        }
        assert_eq!(DataType::from_u8(12), None);
        assert_eq!(DataType::from_u8(127), None);
    }

}
