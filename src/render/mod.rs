//! Region rendering module
//!
//! This module contains:
//! - Styling constants shared by overlay drawing
//! - Image rendering using tiny-skia (for exporting annotated pages)

pub mod geometry;
pub mod image;

pub use self::image::draw_regions_on_image;
