//! Pure domain types with minimal dependencies
//!
//! Types here carry no rendering, network or async concerns so every
//! other module can share them.

pub mod annotation;
pub mod geometry;
pub mod image;
pub mod selection;

pub use annotation::*;
pub use geometry::*;
pub use image::*;
pub use selection::*;
