//! Raster Model Module
//!
//! The layered image core:
//! - ARGB pixel values and luminance derivation
//! - Layers with shared-ownership handles
//! - The image container and its layer stack
//! - The alpha-compositing fold that flattens a stack

mod compose;
mod image;
mod layer;
mod pixel;

pub use compose::{blend, composite_stack};
pub use image::{Image, ImageInfo, LayerInfo, INITIAL_LAYER_CAPACITY};
pub use layer::{owner_count, Layer, SharedLayer};
pub use pixel::{luminance, Argb};
