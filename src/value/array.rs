//! Homogeneous numeric arrays with shape and element type.

use std::fmt;

use crate::util::{ArchivePod, DataType, Error, Result, Shape};

/// A dense, row-major numeric array.
///
/// Invariant: `bytes().len() == shape().num_elements() * dtype().num_bytes()`.
/// Element bytes are kept in little-endian order, which is also the host
/// order on every supported target.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct NumericArray {
    dtype: DataType,
    shape: Shape,
    data: Vec<u8>,
}

impl NumericArray {
    /// Create an array from raw element bytes.
    ///
    /// Fails with `SchemaViolation` if the byte length does not match the
    /// shape and element type.
    pub fn new(dtype: DataType, shape: impl Into<Shape>, data: Vec<u8>) -> Result<Self> {
        let shape = shape.into();
        let expected = expected_byte_len(dtype, &shape)?;
        if data.len() != expected {
            return Err(Error::schema(format!(
                "{} array of shape {} needs {} bytes, got {}",
                dtype,
                shape,
                expected,
                data.len()
            )));
        }
        Ok(Self { dtype, shape, data })
    }

    /// Create a rank-1 array by copying `values`.
    pub fn from_slice<T: ArchivePod>(values: &[T]) -> Self {
        Self {
            dtype: T::DATA_TYPE,
            shape: Shape::d1(values.len()),
            data: bytemuck::cast_slice(values).to_vec(),
        }
    }

    /// Create an array of arbitrary shape by copying `values`.
    pub fn from_slice_with_shape<T: ArchivePod>(
        values: &[T],
        shape: impl Into<Shape>,
    ) -> Result<Self> {
        Self::new(T::DATA_TYPE, shape, bytemuck::cast_slice(values).to_vec())
    }

    /// Create a rank-0 array holding one element.
    pub fn scalar<T: ArchivePod>(value: T) -> Self {
        Self {
            dtype: T::DATA_TYPE,
            shape: Shape::scalar(),
            data: bytemuck::bytes_of(&value).to_vec(),
        }
    }

    /// Copy the elements out as `T`.
    ///
    /// Fails with `TypeMismatch` if `T` does not match the stored type.
    pub fn to_vec<T: ArchivePod>(&self) -> Result<Vec<T>> {
        if T::DATA_TYPE != self.dtype {
            return Err(Error::mismatch(T::DATA_TYPE.name(), self.dtype.name()));
        }
        Ok(bytemuck::pod_collect_to_vec(&self.data))
    }

    #[inline]
    pub fn dtype(&self) -> DataType {
        self.dtype
    }

    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.shape.num_elements()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Size of the first dimension, `None` for rank-0 arrays.
    #[inline]
    pub fn leading_dim(&self) -> Option<usize> {
        self.shape.dim(0)
    }

    /// Raw element bytes.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

/// Byte length required by `dtype` elements laid out in `shape`.
fn expected_byte_len(dtype: DataType, shape: &Shape) -> Result<usize> {
    shape
        .checked_num_elements()
        .and_then(|n| n.checked_mul(dtype.num_bytes()))
        .ok_or_else(|| Error::schema(format!("array shape {} overflows", shape)))
}

impl fmt::Debug for NumericArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NumericArray")
            .field("dtype", &self.dtype)
            .field("shape", &self.shape)
            .field("bytes", &self.data.len())
            .finish()
    }
}
