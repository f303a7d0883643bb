use crate::array::ArrayImg;
use crate::error::ArrayError;

/// A factory for output arrays.
///
/// Algorithms that produce new data receive an allocator instead of
/// constructing storage themselves, so callers decide where results live.
pub trait ArrayAllocator: Clone + Send + Sync {
    /// Creates an array with the given dimensions.
    ///
    /// # Arguments
    ///
    /// * `dimensions` - The extent of every axis.
    /// * `sample` - A value of the element type; every element starts as a copy of it.
    fn create<T: Clone>(&self, dimensions: &[usize], sample: &T) -> Result<ArrayImg<T>, ArrayError>;
}

/// An allocator that keeps arrays in main memory.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuAllocator;

impl ArrayAllocator for CpuAllocator {
    fn create<T: Clone>(&self, dimensions: &[usize], sample: &T) -> Result<ArrayImg<T>, ArrayError> {
        ArrayImg::from_shape_val(dimensions, sample.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgview_core::Interval;

    #[test]
    fn creates_filled_arrays() -> Result<(), ArrayError> {
        let array = CpuAllocator.create(&[2, 3, 4], &7u16)?;
        assert_eq!(array.dimensions_vec(), vec![2, 3, 4]);
        assert!(array.as_slice().iter().all(|&v| v == 7));
        Ok(())
    }
}
