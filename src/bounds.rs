//! Largest content box that still fits its cell once rotated.
//!
//! For a `w x h` box rotated by `t` the axis-aligned footprint is
//! `(w|cos t| + h|sin t|, w|sin t| + h|cos t|)`. Maximizing `w * h` under a single
//! binding side `A` gives `w = A / (2|cos t|)`, `h = A / (2|sin t|)` (or the mirror
//! for the height side). When both sides bind, the two footprint equations are
//! solved together with determinant `cos^2 t - sin^2 t`.

use std::f32::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentBounds {
    pub width: f32,
    pub height: f32,
}

fn fits(limit: f32, value: f32) -> bool {
    value <= limit + limit.abs() * 1.0e-5 + 1.0e-4
}

/// Footprint of a `width x height` box rotated by `degrees`.
pub fn rotated_footprint(degrees: f32, width: f32, height: f32) -> ContentBounds {
    let rad = normalize_degrees(degrees) * PI / 180.0;
    let c = libm::fabsf(libm::cosf(rad));
    let s = libm::fabsf(libm::sinf(rad));
    ContentBounds {
        width: width * c + height * s,
        height: width * s + height * c,
    }
}

fn normalize_degrees(degrees: f32) -> f32 {
    if !degrees.is_finite() {
        return 0.0;
    }
    degrees.rem_euclid(360.0)
}

/// The maximum-area content box that, rotated by `degrees` about its center,
/// stays within `alloc_width x alloc_height`.
pub fn rotated_content_bounds(degrees: f32, alloc_width: f32, alloc_height: f32) -> ContentBounds {
    let alloc_width = alloc_width.max(0.0);
    let alloc_height = alloc_height.max(0.0);
    let degrees = normalize_degrees(degrees);

    if degrees == 0.0 || degrees == 180.0 {
        return ContentBounds {
            width: alloc_width,
            height: alloc_height,
        };
    }
    if degrees == 90.0 || degrees == 270.0 {
        return ContentBounds {
            width: alloc_height,
            height: alloc_width,
        };
    }

    let rad = degrees * PI / 180.0;
    let cos = libm::fabsf(libm::cosf(rad));
    let sin = libm::fabsf(libm::sinf(rad));

    // Width binds.
    let mut width = alloc_width / (2.0 * cos);
    let mut height = alloc_width / (2.0 * sin);

    if !fits(alloc_height, width * sin + height * cos) {
        // Height binds.
        width = alloc_height / (2.0 * sin);
        height = alloc_height / (2.0 * cos);

        if !fits(alloc_width, width * cos + height * sin) {
            // Both bind.
            let denominator = cos * cos - sin * sin;
            if libm::fabsf(denominator) < 1.0e-6 {
                let side = alloc_width.min(alloc_height);
                width = side / (2.0 * cos);
                height = side / (2.0 * sin);
            } else {
                width = (alloc_width * cos - alloc_height * sin) / denominator;
                height = (alloc_height * cos - alloc_width * sin) / denominator;
            }
        }
    }

    ContentBounds {
        width: libm::fabsf(width),
        height: libm::fabsf(height),
    }
}
