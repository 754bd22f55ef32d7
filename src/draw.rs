//! Drawing primitives
//!
//! Geometric rasterization over a single mutable layer. Every primitive
//! clips through the bounds-checked set-pixel contract: coordinates outside
//! the layer are ignored, so shapes may hang off any edge of the canvas.

use crate::raster::{Argb, Layer};

/// Overwrite every pixel of the layer with one color
pub fn fill(layer: &mut Layer, color: Argb) {
    layer.fill(color);
}

/// Draw a filled rectangle with its top-left corner at (x, y)
pub fn rect_filled(layer: &mut Layer, x: i32, y: i32, w: i32, h: i32, color: Argb) {
    let layer_width = layer.width() as i32;
    let layer_height = layer.height() as i32;

    let x_start = x.max(0);
    let y_start = y.max(0);
    let x_end = x.saturating_add(w).min(layer_width);
    let y_end = y.saturating_add(h).min(layer_height);

    let pixels = layer.pixels_mut();
    for cy in y_start..y_end {
        let row_offset = cy as usize * layer_width as usize;
        for cx in x_start..x_end {
            pixels[row_offset + cx as usize] = color;
        }
    }
}

/// Draw a one-pixel rectangle outline
pub fn rect_outline(layer: &mut Layer, x: i32, y: i32, w: i32, h: i32, color: Argb) {
    // Top and bottom edges
    for px in x..x.saturating_add(w) {
        layer.set_pixel(px, y, color);
        layer.set_pixel(px, y + h - 1, color);
    }
    // Left and right edges, corners skipped
    for py in (y + 1)..(y + h - 1) {
        layer.set_pixel(x, py, color);
        layer.set_pixel(x + w - 1, py, color);
    }
}

/// Draw a line from (x0, y0) to (x1, y1) using Bresenham's algorithm
pub fn line(layer: &mut Layer, x0: i32, y0: i32, x1: i32, y1: i32, color: Argb) {
    let mut x0 = x0;
    let mut y0 = y0;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        layer.set_pixel(x0, y0, color);

        if x0 == x1 && y0 == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Draw a one-pixel circle outline centered at (xc, yc) with radius r
pub fn circle_outline(layer: &mut Layer, xc: i32, yc: i32, r: i32, color: Argb) {
    let mut x = 0;
    let mut y = r;
    let mut d = 3 - 2 * r;

    while y >= x {
        // All 8 octants
        layer.set_pixel(xc + x, yc + y, color);
        layer.set_pixel(xc - x, yc + y, color);
        layer.set_pixel(xc + x, yc - y, color);
        layer.set_pixel(xc - x, yc - y, color);
        layer.set_pixel(xc + y, yc + x, color);
        layer.set_pixel(xc - y, yc + x, color);
        layer.set_pixel(xc + y, yc - x, color);
        layer.set_pixel(xc - y, yc - x, color);

        x += 1;
        if d > 0 {
            y -= 1;
            d += 4 * (x - y) + 10;
        } else {
            d += 4 * x + 6;
        }
    }
}

/// Draw a filled circle centered at (xc, yc) with radius r
pub fn circle_filled(layer: &mut Layer, xc: i32, yc: i32, r: i32, color: Argb) {
    let mut x = 0;
    let mut y = r;
    let mut d = 3 - 2 * r;

    while y >= x {
        // Horizontal spans between symmetric octant points
        line(layer, xc - x, yc + y, xc + x, yc + y, color);
        line(layer, xc - x, yc - y, xc + x, yc - y, color);
        line(layer, xc - y, yc + x, xc + y, yc + x, color);
        line(layer, xc - y, yc - x, xc + y, yc - x, color);

        x += 1;
        if d > 0 {
            y -= 1;
            d += 4 * (x - y) + 10;
        } else {
            d += 4 * x + 6;
        }
    }
}

/// Draw a one-pixel ellipse outline centered at (xc, yc) with radii rx, ry
pub fn ellipse_outline(layer: &mut Layer, xc: i32, yc: i32, rx: i32, ry: i32, color: Argb) {
    let rx2 = rx as i64 * rx as i64;
    let ry2 = ry as i64 * ry as i64;
    let two_rx2 = 2 * rx2;
    let two_ry2 = 2 * ry2;

    let mut x: i64 = 0;
    let mut y: i64 = ry as i64;
    let mut px: i64 = 0;
    let mut py: i64 = two_rx2 * y;

    // Region 1: gradient below 1, stepping x
    let mut p = (ry2 as f64 - (rx2 * ry as i64) as f64 + 0.25 * rx2 as f64) as i64;
    while px < py {
        plot_quadrants(layer, xc, yc, x as i32, y as i32, color);

        x += 1;
        px += two_ry2;
        if p < 0 {
            p += ry2 + px;
        } else {
            y -= 1;
            py -= two_rx2;
            p += ry2 + px - py;
        }
    }

    // Region 2: gradient at or above 1, stepping y
    p = (ry2 as f64 * (x as f64 + 0.5) * (x as f64 + 0.5)
        + rx2 as f64 * ((y - 1) as f64) * ((y - 1) as f64)
        - (rx2 * ry2) as f64) as i64;
    while y >= 0 {
        plot_quadrants(layer, xc, yc, x as i32, y as i32, color);

        y -= 1;
        py -= two_rx2;
        if p > 0 {
            p += rx2 - py;
        } else {
            x += 1;
            px += two_ry2;
            p += rx2 - py + px;
        }
    }
}

/// Draw a filled ellipse centered at (xc, yc) with radii rx, ry
pub fn ellipse_filled(layer: &mut Layer, xc: i32, yc: i32, rx: i32, ry: i32, color: Argb) {
    let rx2 = rx as i64 * rx as i64;
    let ry2 = ry as i64 * ry as i64;
    let two_rx2 = 2 * rx2;
    let two_ry2 = 2 * ry2;

    let mut x: i64 = 0;
    let mut y: i64 = ry as i64;
    let mut px: i64 = 0;
    let mut py: i64 = two_rx2 * y;

    let mut p = (ry2 as f64 - (rx2 * ry as i64) as f64 + 0.25 * rx2 as f64) as i64;
    while px < py {
        fill_quadrant_spans(layer, xc, yc, x as i32, y as i32, color);

        x += 1;
        px += two_ry2;
        if p < 0 {
            p += ry2 + px;
        } else {
            y -= 1;
            py -= two_rx2;
            p += ry2 + px - py;
        }
    }

    p = (ry2 as f64 * (x as f64 + 0.5) * (x as f64 + 0.5)
        + rx2 as f64 * ((y - 1) as f64) * ((y - 1) as f64)
        - (rx2 * ry2) as f64) as i64;
    while y >= 0 {
        fill_quadrant_spans(layer, xc, yc, x as i32, y as i32, color);

        y -= 1;
        py -= two_rx2;
        if p > 0 {
            p += rx2 - py;
        } else {
            x += 1;
            px += two_ry2;
            p += rx2 - py + px;
        }
    }
}

fn plot_quadrants(layer: &mut Layer, xc: i32, yc: i32, x: i32, y: i32, color: Argb) {
    layer.set_pixel(xc + x, yc + y, color);
    layer.set_pixel(xc - x, yc + y, color);
    layer.set_pixel(xc + x, yc - y, color);
    layer.set_pixel(xc - x, yc - y, color);
}

fn fill_quadrant_spans(layer: &mut Layer, xc: i32, yc: i32, x: i32, y: i32, color: Argb) {
    line(layer, xc - x, yc + y, xc + x, yc + y, color);
    line(layer, xc - x, yc - y, xc + x, yc - y, color);
}
