/// Anything that lives in an n-dimensional integer space.
pub trait EuclideanSpace {
    /// Returns the number of dimensions.
    fn num_dimensions(&self) -> usize;
}

/// Read access to an integer position.
///
/// Only [`Localizable::coordinate`] has to be provided; the bulk forms are
/// expressed through it and may be overridden where a faster path exists.
pub trait Localizable: EuclideanSpace {
    /// Returns the coordinate of the current position along axis `d`.
    fn coordinate(&self, d: usize) -> i64;

    /// Writes the current position into `position`.
    ///
    /// # Arguments
    ///
    /// * `position` - A buffer of at least `num_dimensions()` coordinates.
    fn localize(&self, position: &mut [i64]) {
        for (d, p) in position.iter_mut().take(self.num_dimensions()).enumerate() {
            *p = self.coordinate(d);
        }
    }

    /// Returns the current position as a new vector.
    fn position_vec(&self) -> Vec<i64> {
        (0..self.num_dimensions()).map(|d| self.coordinate(d)).collect()
    }

    /// Returns the coordinate along axis `d` widened to floating point.
    fn real_coordinate(&self, d: usize) -> f64 {
        self.coordinate(d) as f64
    }
}

/// Write access to an integer position.
pub trait Positionable: EuclideanSpace {
    /// Sets the coordinate along axis `d`.
    fn set_coordinate(&mut self, d: usize, value: i64);

    /// Moves the position by `distance` along axis `d`.
    fn move_coordinate(&mut self, d: usize, distance: i64);

    /// Moves one step forward along axis `d`.
    fn fwd_axis(&mut self, d: usize) {
        self.move_coordinate(d, 1);
    }

    /// Moves one step backward along axis `d`.
    fn bck_axis(&mut self, d: usize) {
        self.move_coordinate(d, -1);
    }

    /// Sets all coordinates at once.
    ///
    /// # Arguments
    ///
    /// * `position` - The target position, one coordinate per axis.
    fn set_position(&mut self, position: &[i64]) {
        debug_assert!(position.len() >= self.num_dimensions());
        let n = self.num_dimensions();
        for (d, &value) in position.iter().take(n).enumerate() {
            self.set_coordinate(d, value);
        }
    }

    /// Copies the position of another localizable.
    fn set_position_from<L: Localizable + ?Sized>(&mut self, other: &L) {
        for d in 0..self.num_dimensions() {
            self.set_coordinate(d, other.coordinate(d));
        }
    }

    /// Moves by a per-axis distance.
    fn move_by(&mut self, distance: &[i64]) {
        debug_assert!(distance.len() >= self.num_dimensions());
        let n = self.num_dimensions();
        for (d, &step) in distance.iter().take(n).enumerate() {
            self.move_coordinate(d, step);
        }
    }
}

/// A plain mutable integer position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Point {
    position: Vec<i64>,
}

impl Point {
    /// Creates a point at the origin of an `n`-dimensional space.
    pub fn origin(n: usize) -> Self {
        Self {
            position: vec![0; n],
        }
    }

    /// Creates a point at the given position.
    pub fn new(position: Vec<i64>) -> Self {
        Self { position }
    }

    /// Creates a point at the position of `other`.
    pub fn from_localizable<L: Localizable + ?Sized>(other: &L) -> Self {
        Self {
            position: other.position_vec(),
        }
    }

    /// Returns the coordinates as a slice.
    pub fn as_slice(&self) -> &[i64] {
        &self.position
    }
}

impl EuclideanSpace for Point {
    fn num_dimensions(&self) -> usize {
        self.position.len()
    }
}

impl Localizable for Point {
    #[inline]
    fn coordinate(&self, d: usize) -> i64 {
        self.position[d]
    }

    fn localize(&self, position: &mut [i64]) {
        position[..self.position.len()].copy_from_slice(&self.position);
    }
}

impl Positionable for Point {
    #[inline]
    fn set_coordinate(&mut self, d: usize, value: i64) {
        self.position[d] = value;
    }

    #[inline]
    fn move_coordinate(&mut self, d: usize, distance: i64) {
        self.position[d] += distance;
    }
}
