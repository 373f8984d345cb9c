//! Mapping between canvas space and source-image space.
//!
//! The canvas shows the source image scaled by a single uniform factor and
//! anchored at the top-left corner, so converting back is a division by that
//! factor. Boxes are truncated (floored) to whole pixels, never rounded, so a
//! gesture always maps to the same pixel box.

use image::RgbaImage;

use super::gesture::SelectionGesture;

/// A pointer position in canvas (display) pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CanvasPoint {
    pub x: f64,
    pub y: f64,
}

impl CanvasPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned box in source-image pixels, right/bottom exclusive
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SourceBox {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl SourceBox {
    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    #[cfg(test)]
    pub fn as_tuple(&self) -> (u32, u32, u32, u32) {
        (self.left, self.top, self.right, self.bottom)
    }
}

/// Largest uniform factor that fits an `img_w`×`img_h` image inside a
/// `box_w`×`box_h` area.
pub fn fit_scale(box_w: u32, box_h: u32, img_w: u32, img_h: u32) -> f64 {
    if img_w == 0 || img_h == 0 {
        return 1.0;
    }
    let scale_x = box_w as f64 / img_w as f64;
    let scale_y = box_h as f64 / img_h as f64;
    scale_x.min(scale_y)
}

/// Size of an image after applying `scale`, truncated to whole pixels
pub fn scaled_size(img_w: u32, img_h: u32, scale: f64) -> (u32, u32) {
    (
        (img_w as f64 * scale) as u32,
        (img_h as f64 * scale) as u32,
    )
}

/// Maps a gesture to the source-image box it covers.
///
/// Returns `None` when `scale_factor` is not a positive finite number.
pub fn source_box(gesture: &SelectionGesture, scale_factor: f64) -> Option<SourceBox> {
    if !(scale_factor.is_finite() && scale_factor > 0.0) {
        return None;
    }

    let to_source = |v: f64| (v / scale_factor).floor().max(0.0) as u32;

    Some(SourceBox {
        left: to_source(gesture.start.x.min(gesture.end.x)),
        top: to_source(gesture.start.y.min(gesture.end.y)),
        right: to_source(gesture.start.x.max(gesture.end.x)),
        bottom: to_source(gesture.start.y.max(gesture.end.y)),
    })
}

/// Cut `b` out of `source`. Parts of the box outside the image are dropped.
pub fn crop(source: &RgbaImage, b: &SourceBox) -> RgbaImage {
    image::imageops::crop_imm(source, b.left, b.top, b.width(), b.height()).to_image()
}

/// How the current source image is laid out on the canvas
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayTransform {
    scale_factor: f64,
    display_width: u32,
    display_height: u32,
}

impl Default for DisplayTransform {
    fn default() -> Self {
        Self {
            scale_factor: 1.0,
            display_width: 0,
            display_height: 0,
        }
    }
}

impl DisplayTransform {
    /// Fit a source image of `img_w`×`img_h` into the canvas
    pub fn fit(canvas_w: u32, canvas_h: u32, img_w: u32, img_h: u32) -> Self {
        let scale_factor = fit_scale(canvas_w, canvas_h, img_w, img_h);
        let (display_width, display_height) = scaled_size(img_w, img_h, scale_factor);
        Self {
            scale_factor,
            display_width,
            display_height,
        }
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Size of the scaled image, which is also the canvas size
    pub fn display_size(&self) -> (u32, u32) {
        (self.display_width, self.display_height)
    }

    /// Clamp a pointer position to the displayed image area
    pub fn clamp(&self, point: CanvasPoint) -> CanvasPoint {
        CanvasPoint {
            x: point.x.clamp(0.0, self.display_width as f64),
            y: point.y.clamp(0.0, self.display_height as f64),
        }
    }

    pub fn source_box(&self, gesture: &SelectionGesture) -> Option<SourceBox> {
        source_box(gesture, self.scale_factor)
    }
}
