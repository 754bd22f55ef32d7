//! Lamina - Layered Raster Image Engine
//!
//! Lamina models an image as an ordered stack of shared layers over a
//! fixed-size canvas and flattens the stack through alpha compositing
//! whenever it is saved or exported.
//!
//! # Architecture
//!
//! - `raster`: pixels, layers, the image container, and the compositing fold
//! - `codec`: binary Netpbm (PBM/PGM/PPM) decoding and encoding
//! - `export`: raw in-memory array exports in four encodings
//! - `draw`: clipped geometric rasterization over a single layer

pub mod codec;
pub mod draw;
pub mod error;
pub mod export;
pub mod raster;

pub use error::{LaminaError, Result};
