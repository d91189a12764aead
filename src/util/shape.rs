//! Array shapes.

use smallvec::SmallVec;

/// Shape of a numeric array.
///
/// An empty shape is rank 0 and describes a single element.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Shape {
    dims: SmallVec<[usize; 4]>,
}

impl Shape {
    /// Rank-0 shape (one element).
    pub fn scalar() -> Self {
        Self { dims: SmallVec::new() }
    }

    /// Rank-1 shape.
    pub fn d1(len: usize) -> Self {
        Self { dims: smallvec::smallvec![len] }
    }

    /// Rank-2 shape.
    pub fn d2(rows: usize, cols: usize) -> Self {
        Self { dims: smallvec::smallvec![rows, cols] }
    }

    /// Create from a slice of sizes.
    pub fn from_slice(sizes: &[usize]) -> Self {
        Self { dims: SmallVec::from_slice(sizes) }
    }

    /// Number of dimensions.
    #[inline]
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Size of dimension `dim`, if it exists.
    pub fn dim(&self, dim: usize) -> Option<usize> {
        self.dims.get(dim).copied()
    }

    /// All dimension sizes.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Total number of elements, `None` on overflow.
    pub fn checked_num_elements(&self) -> Option<usize> {
        self.dims.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d))
    }

    /// Total number of elements (product of all dimensions).
    pub fn num_elements(&self) -> usize {
        self.dims.iter().product()
    }

    #[inline]
    pub fn is_scalar(&self) -> bool {
        self.dims.is_empty()
    }
}

impl From<usize> for Shape {
    fn from(len: usize) -> Self {
        Self::d1(len)
    }
}

impl From<(usize, usize)> for Shape {
    fn from((rows, cols): (usize, usize)) -> Self {
        Self::d2(rows, cols)
    }
}

impl From<Vec<usize>> for Shape {
    fn from(v: Vec<usize>) -> Self {
        Self { dims: SmallVec::from_vec(v) }
    }
}

impl From<&[usize]> for Shape {
    fn from(v: &[usize]) -> Self {
        Self::from_slice(v)
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, s) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, " x ")?;
            }
            write!(f, "{}", s)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar() {
        let s = Shape::scalar();
        assert_eq!(s.rank(), 0);
        assert!(s.is_scalar());
        assert_eq!(s.num_elements(), 1);
        assert_eq!(format!("{}", s), "[]");
    }

    #[test]
    fn test_1d_and_2d() {
        let s = Shape::d1(10);
        assert_eq!(s.rank(), 1);
        assert_eq!(s.dim(0), Some(10));
        assert_eq!(s.dim(1), None);

        let s = Shape::d2(7, 3);
        assert_eq!(s.num_elements(), 21);
        assert_eq!(format!("{}", s), "[7 x 3]");
    }

    #[test]
    fn test_zero_sized() {
        let s: Shape = (0, 16).into();
        assert_eq!(s.num_elements(), 0);
        assert_eq!(s.dims(), &[0, 16]);
    }

    #[test]
    fn test_overflow() {
        let s = Shape::from_slice(&[usize::MAX, 2]);
        assert_eq!(s.checked_num_elements(), None);
    }
}
