#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use imgview_core as core;

#[doc(inline)]
pub use imgview_array as array;

#[doc(inline)]
pub use imgview_algorithm as algorithm;
