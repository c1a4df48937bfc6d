//! Pure per-frame image transforms: the half-circle wedge crop used by
//! the generator and the indicator-line overlays used by the labeling
//! front-end. No state lives here; every function maps pixels to pixels.

use image::imageops;
use image::{GrayImage, Luma, Rgba, RgbaImage};
use imageproc::drawing::draw_line_segment_mut;

use crate::label::angle;
use crate::models::{Point, Viewport};

const TICK_STEP_DEG: i32 = 10;
const TICK_INNER_FRAC: f64 = 0.9;
const TICK_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Mask selecting the half-disc of `radius` around `center` that opens
/// toward `facing_deg` (degrees, screen coordinates: y grows downward).
///
/// A pixel is inside when it is within the disc and its projection onto
/// the facing direction is non-negative, which is exactly the pie slice
/// from `facing - 90` to `facing + 90`.
pub fn half_disc_mask(width: u32, height: u32, center: Point, radius: f64, facing_deg: f64) -> GrayImage {
    let rads = facing_deg.to_radians();
    let (facing_x, facing_y) = (rads.cos(), rads.sin());
    let radius_sq = radius * radius;

    GrayImage::from_fn(width, height, |x, y| {
        let dx = x as f64 - center.x;
        let dy = y as f64 - center.y;
        let inside = dx * dx + dy * dy <= radius_sq && dx * facing_x + dy * facing_y >= 0.0;
        Luma([if inside { 255 } else { 0 }])
    })
}

/// Copy `image` wherever `mask` is set; everything else becomes fully
/// transparent.
pub fn apply_mask(image: &RgbaImage, mask: &GrayImage) -> RgbaImage {
    RgbaImage::from_fn(image.width(), image.height(), |x, y| {
        if mask.get_pixel(x, y)[0] > 0 {
            *image.get_pixel(x, y)
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

/// Draw the angle scale: one white tick every 10 degrees across the 180
/// degree span of the wedge, from 0.9 radius out to the rim.
pub fn draw_tick_marks(image: &mut RgbaImage, center: Point, radius: f64, facing_deg: f64) {
    let start = facing_deg as i32 - 90;
    let end = facing_deg as i32 + 90;
    let mut deg = start;
    while deg <= end {
        let rads = (deg as f64).to_radians();
        let (cos, sin) = (rads.cos(), rads.sin());
        let inner = (
            (center.x + TICK_INNER_FRAC * radius * cos) as f32,
            (center.y + TICK_INNER_FRAC * radius * sin) as f32,
        );
        let outer = (
            (center.x + radius * cos) as f32,
            (center.y + radius * sin) as f32,
        );
        draw_line_segment_mut(image, inner, outer, TICK_COLOR);
        deg += TICK_STEP_DEG;
    }
}

/// Bounding box of the set pixels in `mask` as `(x, y, width, height)`,
/// or `None` for an all-clear mask.
pub fn content_bbox(mask: &GrayImage) -> Option<(u32, u32, u32, u32)> {
    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0;
    let mut max_y = 0;
    let mut any = false;

    for (x, y, pixel) in mask.enumerate_pixels() {
        if pixel[0] > 0 {
            any = true;
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }

    any.then(|| (min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
}

/// Full wedge transform for one frame: mask to the half-disc, draw the
/// tick scale, crop to the mask content.
pub fn wedge_frame(image: &RgbaImage, center: Point, radius: f64, facing_deg: f64) -> RgbaImage {
    let mask = half_disc_mask(image.width(), image.height(), center, radius, facing_deg);
    let mut wedge = apply_mask(image, &mask);
    draw_tick_marks(&mut wedge, center, radius, facing_deg);

    match content_bbox(&mask) {
        Some((x, y, w, h)) => imageops::crop_imm(&wedge, x, y, w, h).to_image(),
        None => wedge,
    }
}

/// Indicator line styles for the labeling display: the live hover line is
/// dashed, the committed/saved angle is solid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorStyle {
    Solid,
    Dashed,
}

const DASH_LEN: f64 = 4.0;
const INDICATOR_SPAN: f64 = 0.95;

/// Overlay an angle indicator line onto a display frame, anchored at the
/// viewport's top-center origin.
pub fn draw_indicator(
    image: &mut RgbaImage,
    viewport: Viewport,
    angle_deg: f64,
    style: IndicatorStyle,
    color: Rgba<u8>,
) {
    let (start, end) = angle::line_endpoints(viewport, angle_deg, INDICATOR_SPAN);
    match style {
        IndicatorStyle::Solid => {
            draw_line_segment_mut(
                image,
                (start.x as f32, start.y as f32),
                (end.x as f32, end.y as f32),
                color,
            );
        }
        IndicatorStyle::Dashed => {
            let (dx, dy) = (end.x - start.x, end.y - start.y);
            let len = (dx * dx + dy * dy).sqrt();
            if len == 0.0 {
                return;
            }
            let (ux, uy) = (dx / len, dy / len);
            let mut t = 0.0;
            while t < len {
                let seg_end = (t + DASH_LEN).min(len);
                draw_line_segment_mut(
                    image,
                    ((start.x + ux * t) as f32, (start.y + uy * t) as f32),
                    (
                        (start.x + ux * seg_end) as f32,
                        (start.y + uy * seg_end) as f32,
                    ),
                    color,
                );
                t += 2.0 * DASH_LEN;
            }
        }
    }
}
