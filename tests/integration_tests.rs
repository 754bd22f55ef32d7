//! Integration Tests
//!
//! End-to-end tests for the layered image pipeline: drawing, flattening,
//! encoding, and decoding working together.

use std::io::Cursor;

use lamina::codec::{self, PnmFormat};
use lamina::draw;
use lamina::export::{export_to_array, ArrayDataFormat, PixelArray};
use lamina::raster::{Argb, Image};
use tempfile::tempdir;

/// The reference scene: a red circle below a half-transparent blue wash
/// carrying a half-transparent green ellipse.
fn demo_scene() -> Image {
    let mut image = Image::new(100, 100);

    let base = image.add_layer().unwrap();
    draw::circle_filled(&mut base.borrow_mut(), 50, 50, 30, Argb::opaque(255, 0, 0));

    let overlay = image.add_layer().unwrap();
    {
        let mut layer = overlay.borrow_mut();
        draw::fill(&mut layer, Argb::new(128, 0, 0, 255));
        draw::ellipse_filled(&mut layer, 50, 50, 20, 40, Argb::new(128, 0, 255, 0));
    }

    image
}

fn flattened_pixels(image: &Image) -> Vec<Argb> {
    let count = image.width() as usize * image.height() as usize;
    (0..count).map(|i| image.flatten_pixel(i)).collect()
}

// === Round Trips ===

#[test]
fn test_ppm_round_trip_preserves_flattened_pixels() {
    let image = demo_scene();

    let mut encoded = Vec::new();
    codec::encode(&mut encoded, &image, PnmFormat::Pixmap).unwrap();

    let (layer, format) = codec::decode(Cursor::new(encoded)).unwrap();
    assert_eq!(format, PnmFormat::Pixmap);
    assert_eq!(layer.width(), 100);
    assert_eq!(layer.height(), 100);

    // The decoded buffer is the flattened stack, pixel for pixel
    assert_eq!(layer.pixels(), flattened_pixels(&image).as_slice());
}

#[test]
fn test_file_round_trip_ppm() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("scene.ppm");

    let image = demo_scene();
    codec::encode_file(&path, &image, PnmFormat::Pixmap).unwrap();

    let (layer, format) = codec::decode_file(&path).unwrap();
    assert_eq!(format, PnmFormat::Pixmap);
    assert_eq!(layer.pixels(), flattened_pixels(&image).as_slice());
}

#[test]
fn test_pbm_round_trip_black_and_white() {
    // A purely black-and-white image survives the 1-bit format unchanged
    let mut image = Image::new(17, 5);
    let layer = image.add_layer().unwrap();
    {
        let mut layer = layer.borrow_mut();
        draw::fill(&mut layer, Argb::opaque(255, 255, 255));
        draw::rect_filled(&mut layer, 3, 1, 9, 3, Argb::opaque(0, 0, 0));
    }

    let mut encoded = Vec::new();
    codec::encode(&mut encoded, &image, PnmFormat::Bitmap).unwrap();

    let (decoded, format) = codec::decode(Cursor::new(encoded)).unwrap();
    assert_eq!(format, PnmFormat::Bitmap);
    assert_eq!(decoded.pixels(), flattened_pixels(&image).as_slice());
}

#[test]
fn test_reencode_is_idempotent() {
    // Decoding a PPM and encoding the single-layer image again reproduces
    // the same bytes.
    let image = demo_scene();
    let mut first = Vec::new();
    codec::encode(&mut first, &image, PnmFormat::Pixmap).unwrap();

    let (layer, _) = codec::decode(Cursor::new(first.clone())).unwrap();
    let mut rebuilt = Image::new(layer.width(), layer.height());
    rebuilt.add_existing_layer(&layer.into_shared()).unwrap();

    let mut second = Vec::new();
    codec::encode(&mut second, &rebuilt, PnmFormat::Pixmap).unwrap();
    assert_eq!(first, second);
}

// === Cross-Format Agreement ===

#[test]
fn test_pgm_body_matches_grayscale_export() {
    let image = demo_scene();

    let mut encoded = Vec::new();
    codec::encode(&mut encoded, &image, PnmFormat::Graymap).unwrap();
    let body = &encoded[b"P5\n100 100\n255\n".len()..];

    let PixelArray::Grayscale8(exported) =
        export_to_array(&image, ArrayDataFormat::Grayscale8).unwrap()
    else {
        panic!("wrong variant");
    };
    assert_eq!(body, exported.as_slice());
}

#[test]
fn test_rgb24_export_matches_ppm_body() {
    let image = demo_scene();

    let mut encoded = Vec::new();
    codec::encode(&mut encoded, &image, PnmFormat::Pixmap).unwrap();
    let body = &encoded[b"P6\n100 100\n255\n".len()..];

    let PixelArray::Rgb24(exported) = export_to_array(&image, ArrayDataFormat::Rgb24).unwrap()
    else {
        panic!("wrong variant");
    };
    assert_eq!(body, exported.as_slice());
}

// === Full Pipeline ===

#[test]
fn test_draw_flatten_export_pipeline() {
    let image = demo_scene();

    let PixelArray::Rgba32(values) = export_to_array(&image, ArrayDataFormat::Rgba32).unwrap()
    else {
        panic!("wrong variant");
    };
    assert_eq!(values.len(), 100 * 100);

    // Center pixel: opaque red under the green ellipse at half alpha.
    // r = (0*128 + 255*127)/255 = 127, g = (255*128 + 0*127)/255 = 128
    let center = Argb::from_u32(values[50 * 100 + 50]);
    assert_eq!(center, Argb::new(255, 127, 128, 0));

    // Corner pixel: black background under the half-alpha blue wash only
    let corner = Argb::from_u32(values[0]);
    assert_eq!(corner, Argb::new(255, 0, 0, 128));
}

#[test]
fn test_layer_removal_affects_next_save() {
    let mut image = demo_scene();

    let mut with_overlay = Vec::new();
    codec::encode(&mut with_overlay, &image, PnmFormat::Pixmap).unwrap();

    image.remove_layer(1).unwrap();

    let mut without_overlay = Vec::new();
    codec::encode(&mut without_overlay, &image, PnmFormat::Pixmap).unwrap();

    // Nothing is cached between saves: dropping the overlay changes output
    assert_ne!(with_overlay, without_overlay);

    // With only the base layer left, the corner is pure background
    let (layer, _) = codec::decode(Cursor::new(without_overlay)).unwrap();
    assert_eq!(layer.pixel(0, 0), Some(Argb::opaque(0, 0, 0)));
}
