//! Image container
//!
//! An image fixes its canvas size for its whole life and holds an ordered,
//! growable stack of shared layer handles. Index 0 is the bottom of the
//! stack; the last index is the top. Every contained layer has the image's
//! dimensions.

use std::fmt;

use serde::Serialize;

use crate::error::{LaminaError, Result};
use crate::raster::compose::composite_stack;
use crate::raster::layer::{owner_count, Layer, SharedLayer};
use crate::raster::pixel::Argb;

/// Capacity the layer stack starts with before any doubling growth
pub const INITIAL_LAYER_CAPACITY: usize = 4;

/// A fixed-size canvas over an ordered stack of shared layers
#[derive(Debug)]
pub struct Image {
    width: u32,
    height: u32,
    layers: Vec<SharedLayer>,
}

impl Image {
    /// Create an empty image with a fixed canvas size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            layers: Vec::with_capacity(INITIAL_LAYER_CAPACITY),
        }
    }

    /// Canvas width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Canvas height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of layers in the stack
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Whether the stack holds no layers
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// The layer handle at `index`, bottom first
    pub fn layer(&self, index: usize) -> Option<&SharedLayer> {
        self.layers.get(index)
    }

    /// All layer handles, bottom first
    pub fn layers(&self) -> &[SharedLayer] {
        &self.layers
    }

    /// Attach an existing layer at the top of the stack.
    ///
    /// The image takes its own ownership reference; the caller keeps theirs.
    ///
    /// # Errors
    /// - `DimensionMismatch` if the layer's size differs from the canvas.
    /// - `AllocationFailure` if the stack cannot grow; the image is left
    ///   unchanged.
    pub fn add_existing_layer(&mut self, layer: &SharedLayer) -> Result<()> {
        let (layer_width, layer_height) = {
            let layer = layer.borrow();
            (layer.width(), layer.height())
        };

        if layer_width != self.width || layer_height != self.height {
            return Err(LaminaError::DimensionMismatch {
                layer_width,
                layer_height,
                image_width: self.width,
                image_height: self.height,
            });
        }

        if self.layers.len() == self.layers.capacity() {
            self.layers
                .try_reserve(1)
                .map_err(|_| LaminaError::AllocationFailure {
                    context: format!("layer stack growth past {}", self.layers.capacity()),
                })?;
        }

        self.layers.push(SharedLayer::clone(layer));
        Ok(())
    }

    /// Create a blank canvas-sized layer, attach it, and return its handle.
    ///
    /// The attach is atomic: the returned handle and the image's stored
    /// handle come into existence together, so the layer is never observable
    /// with zero owners. The caller drops the returned handle when done,
    /// leaving the image as sole owner.
    pub fn add_layer(&mut self) -> Result<SharedLayer> {
        let layer = Layer::new(self.width, self.height)?.into_shared();
        self.add_existing_layer(&layer)?;
        Ok(layer)
    }

    /// Remove the layer at `index`, releasing the image's ownership.
    ///
    /// Later entries shift down one slot, preserving relative order. O(n),
    /// acceptable for the small stacks images carry in practice.
    ///
    /// # Errors
    /// `InvalidIndex` outside `[0, layer_count)`.
    pub fn remove_layer(&mut self, index: usize) -> Result<()> {
        if index >= self.layers.len() {
            return Err(LaminaError::InvalidIndex {
                index,
                count: self.layers.len(),
            });
        }

        let _ = self.layers.remove(index);
        Ok(())
    }

    /// Composite the full stack at one row-major pixel index.
    ///
    /// Recomputed on every call; saves and exports never cache flattened
    /// pixels between invocations.
    pub fn flatten_pixel(&self, pixel_index: usize) -> Argb {
        composite_stack(&self.layers, pixel_index)
    }

    /// Build a structural summary of the image
    pub fn info(&self) -> ImageInfo {
        ImageInfo {
            width: self.width,
            height: self.height,
            layer_count: self.layers.len(),
            layers: self
                .layers
                .iter()
                .map(|layer| {
                    let borrowed = layer.borrow();
                    LayerInfo {
                        width: borrowed.width(),
                        height: borrowed.height(),
                        owners: owner_count(layer),
                    }
                })
                .collect(),
        }
    }
}

/// Summary of one layer in an [`ImageInfo`]
#[derive(Debug, Clone, Serialize)]
pub struct LayerInfo {
    /// Layer width in pixels
    pub width: u32,
    /// Layer height in pixels
    pub height: u32,
    /// Number of live owners of the layer, the image included
    pub owners: usize,
}

/// Structural summary of an image and its layer stack
#[derive(Debug, Clone, Serialize)]
pub struct ImageInfo {
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Number of layers in the stack
    pub layer_count: usize,
    /// Per-layer summaries, bottom first
    pub layers: Vec<LayerInfo>,
}

impl fmt::Display for ImageInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Image: {}x{}, Layers: {}",
            self.width, self.height, self.layer_count
        )?;
        for (i, layer) in self.layers.iter().enumerate() {
            writeln!(
                f,
                "  Layer {}: {}x{}, Owners: {}",
                i, layer.width, layer.height, layer.owners
            )?;
        }
        Ok(())
    }
}
