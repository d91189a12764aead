//! Element types that can be stored in numeric arrays.

use bytemuck::{Pod, Zeroable};
use half::f16;
use std::fmt;

use super::DataType;

/// Trait for types that can be stored as numeric array elements.
pub trait ArchivePod: Pod + Zeroable + Copy + Default {
    /// The corresponding [`DataType`] tag.
    const DATA_TYPE: DataType;
}

impl ArchivePod for u8 {
    const DATA_TYPE: DataType = DataType::Uint8;
}

impl ArchivePod for i8 {
    const DATA_TYPE: DataType = DataType::Int8;
}

impl ArchivePod for u16 {
    const DATA_TYPE: DataType = DataType::Uint16;
}

impl ArchivePod for i16 {
    const DATA_TYPE: DataType = DataType::Int16;
}

impl ArchivePod for u32 {
    const DATA_TYPE: DataType = DataType::Uint32;
}

impl ArchivePod for i32 {
    const DATA_TYPE: DataType = DataType::Int32;
}

impl ArchivePod for u64 {
    const DATA_TYPE: DataType = DataType::Uint64;
}

impl ArchivePod for i64 {
    const DATA_TYPE: DataType = DataType::Int64;
}

impl ArchivePod for f16 {
    const DATA_TYPE: DataType = DataType::Float16;
}

impl ArchivePod for f32 {
    const DATA_TYPE: DataType = DataType::Float32;
}

impl ArchivePod for f64 {
    const DATA_TYPE: DataType = DataType::Float64;
}

/// Boolean element with guaranteed 1-byte storage.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(transparent)]
pub struct Bool(u8);

impl Bool {
    pub const TRUE: Self = Self(1);
    pub const FALSE: Self = Self(0);

    #[inline]
    pub const fn new(v: bool) -> Self {
        Self(v as u8)
    }

    #[inline]
    pub const fn get(self) -> bool {
        self.0 != 0
    }
}

impl From<bool> for Bool {
    #[inline]
    fn from(v: bool) -> Self {
        Self::new(v)
    }
}

impl From<Bool> for bool {
    #[inline]
    fn from(v: Bool) -> Self {
        v.get()
    }
}

impl fmt::Debug for Bool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

impl ArchivePod for Bool {
    const DATA_TYPE: DataType = DataType::Bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pod_sizes_match_data_type() {
        fn check<T: ArchivePod>() {
            assert_eq!(std::mem::size_of::<T>(), T::DATA_TYPE.num_bytes());
        }
        check::<u8>();
        check::<i64>();
        check::<f16>();
        check::<Bool>();
    }

    #[test]
    fn test_bool_type() {
        let t = Bool::new(true);
        let f = Bool::new(false);
        assert!(t.get());
        assert!(!f.get());
        assert!(bool::from(Bool::TRUE));
        assert_eq!(std::mem::size_of::<Bool>(), 1);
    }
}
