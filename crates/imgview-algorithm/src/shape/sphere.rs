use crate::error::MorphologyError;
use crate::neighborhood::StructuringElement;
use crate::shape::Shape;

/// All positions within euclidean distance `radius` of the center.
///
/// In two dimensions this is a disk, the n-dimensional analogue of an ellipse
/// kernel with equal axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HyperSphereShape {
    /// The radius in pixels.
    pub radius: usize,
}

impl HyperSphereShape {
    /// Creates a hypersphere shape.
    pub fn new(radius: usize) -> Self {
        Self { radius }
    }
}

impl Shape for HyperSphereShape {
    fn structuring_element(&self, num_dimensions: usize) -> Result<StructuringElement, MorphologyError> {
        let r = self.radius as i64;
        let radii = vec![r; num_dimensions];
        Ok(StructuringElement::from_box(&radii, |p| {
            p.iter().map(|o| o * o).sum::<i64>() <= r * r
        }))
    }
}

/// All positions within city-block distance `radius` of the center.
///
/// With radius 1 in two dimensions this is the cross kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiamondShape {
    /// The radius in pixels.
    pub radius: usize,
}

impl DiamondShape {
    /// Creates a diamond shape.
    pub fn new(radius: usize) -> Self {
        Self { radius }
    }
}

impl Shape for DiamondShape {
    fn structuring_element(&self, num_dimensions: usize) -> Result<StructuringElement, MorphologyError> {
        let r = self.radius as i64;
        let radii = vec![r; num_dimensions];
        Ok(StructuringElement::from_box(&radii, |p| {
            p.iter().map(|o| o.abs()).sum::<i64>() <= r
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disk_and_diamond_sizes() -> Result<(), MorphologyError> {
        assert_eq!(HyperSphereShape::new(1).structuring_element(2)?.len(), 5);
        assert_eq!(HyperSphereShape::new(2).structuring_element(2)?.len(), 13);
        assert_eq!(HyperSphereShape::new(1).structuring_element(3)?.len(), 7);

        assert_eq!(DiamondShape::new(1).structuring_element(2)?.len(), 5);
        assert_eq!(DiamondShape::new(2).structuring_element(2)?.len(), 13);
        assert_eq!(DiamondShape::new(0).structuring_element(4)?.len(), 1);
        Ok(())
    }

    #[test]
    fn test_radius_three_disk_differs_from_diamond() -> Result<(), MorphologyError> {
        let disk = HyperSphereShape::new(3).structuring_element(2)?;
        let diamond = DiamondShape::new(3).structuring_element(2)?;
        // 29 lattice points within distance 3, 25 within city-block distance 3
        assert_eq!(disk.len(), 29);
        assert_eq!(diamond.len(), 25);
        assert_eq!(disk.bounds(), diamond.bounds());
        Ok(())
    }
}
