//! Alpha compositing
//!
//! Pure functions that fold a layer stack into final pixel values.
//! The arithmetic is integer-exact: truncating division by 255, with
//! the alpha 0 and alpha 255 cases short-circuited so fully transparent
//! and fully opaque pixels pass through without rounding.

use crate::raster::layer::SharedLayer;
use crate::raster::pixel::Argb;

/// Blend a foreground pixel over a background pixel.
///
/// `out = (fg * alpha + bg * (255 - alpha)) / 255` per channel, truncating.
/// The result is always fully opaque; transparency does not survive a
/// flatten because none of the destination formats carry an alpha channel.
pub fn blend(bg: Argb, fg: Argb) -> Argb {
    let alpha = fg.a() as u32;

    // Completely transparent: background shows through unchanged
    if alpha == 0 {
        return bg;
    }

    // Completely opaque: foreground covers the background exactly
    if alpha == 255 {
        return fg;
    }

    let inv_alpha = 255 - alpha;

    let r = (fg.r() as u32 * alpha + bg.r() as u32 * inv_alpha) / 255;
    let g = (fg.g() as u32 * alpha + bg.g() as u32 * inv_alpha) / 255;
    let b = (fg.b() as u32 * alpha + bg.b() as u32 * inv_alpha) / 255;

    Argb::new(255, r as u8, g as u8, b as u8)
}

/// Composite one pixel of a layer stack, bottom (index 0) to top.
///
/// Starts from the implicit opaque-black background. The value is computed
/// fresh on every call; nothing is cached between saves or exports.
pub fn composite_stack(layers: &[SharedLayer], pixel_index: usize) -> Argb {
    let mut color = Argb::BACKGROUND;
    for layer in layers {
        color = blend(color, layer.borrow().pixels()[pixel_index]);
    }
    color
}
