use num_traits::Bounded;

/// The operations the access layer consumes from a pixel type.
///
/// Copying is `Clone`, ordering is `PartialOrd`; writing goes through
/// [`crate::SamplerMut::set`]. Nothing else about the numeric type is assumed.
pub trait Element: Clone + PartialOrd + Send + Sync {}

impl<T: Clone + PartialOrd + Send + Sync> Element for T {}

/// An element type that can report its extreme representable values.
///
/// These are the automatic sentinels of the morphology operators: the
/// smallest value seeds a running maximum and the largest seeds a running
/// minimum.
pub trait BoundedElement: Element + Bounded {
    /// Returns the smallest representable value.
    fn lowest() -> Self {
        <Self as Bounded>::min_value()
    }

    /// Returns the largest representable value.
    fn highest() -> Self {
        <Self as Bounded>::max_value()
    }
}

impl<T: Element + Bounded> BoundedElement for T {}
