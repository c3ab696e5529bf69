use crate::foundation::core::{Point, Rect};
use crate::foundation::error::{TensorSpecError, TensorSpecResult};
use crate::foundation::math::is_positive;
use crate::geometry::shape::Transformable;

/// Default frame width in scene units (16:9 at a height of 8).
pub const DEFAULT_FRAME_WIDTH: f64 = 8.0 * 16.0 / 9.0;
/// Default frame height in scene units.
pub const DEFAULT_FRAME_HEIGHT: f64 = 8.0;

/// Visible frame size as reported by a rendering backend.
///
/// Backends disagree on how they expose it: some report a width/height pair, others a
/// `(width, height)` shape tuple. Both resolve to the same accessors.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewportSize {
    /// Direct width and height.
    Dimensions {
        /// Frame width.
        width: f64,
        /// Frame height.
        height: f64,
    },
    /// `(width, height)` tuple.
    Shape((f64, f64)),
}

impl Default for ViewportSize {
    fn default() -> Self {
        Self::Dimensions {
            width: DEFAULT_FRAME_WIDTH,
            height: DEFAULT_FRAME_HEIGHT,
        }
    }
}

impl ViewportSize {
    /// Frame width.
    pub fn width(self) -> f64 {
        match self {
            Self::Dimensions { width, .. } => width,
            Self::Shape((w, _)) => w,
        }
    }

    /// Frame height.
    pub fn height(self) -> f64 {
        match self {
            Self::Dimensions { height, .. } => height,
            Self::Shape((_, h)) => h,
        }
    }

    /// Visible region in scene coordinates, centered on the origin.
    pub fn rect(self) -> Rect {
        Rect::from_center_size(Point::ORIGIN, (self.width(), self.height()))
    }

    /// Both sides must be finite and positive.
    pub fn validate(self) -> TensorSpecResult<()> {
        if !is_positive(self.width()) || !is_positive(self.height()) {
            return Err(TensorSpecError::validation(format!(
                "viewport must be positive, got {} x {}",
                self.width(),
                self.height()
            )));
        }
        Ok(())
    }

    /// Uniformly scale `shape` so its larger side takes the given share of the frame.
    ///
    /// Wider-than-tall shapes are fitted to `width_ratio * width`, all others to
    /// `height_ratio * height`.
    pub fn fit(self, shape: &mut impl Transformable, width_ratio: f64, height_ratio: f64) {
        if shape.width() > shape.height() {
            shape.scale_to_fit_width(self.width() * width_ratio);
        } else {
            shape.scale_to_fit_height(self.height() * height_ratio);
        }
    }
}

/// Anything that can report its visible frame size.
pub trait Viewport {
    /// Current frame size.
    fn viewport_size(&self) -> ViewportSize;
}

impl Viewport for ViewportSize {
    fn viewport_size(&self) -> ViewportSize {
        *self
    }
}

/// Camera exposing separate frame width/height fields.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameCamera {
    /// Frame width.
    pub frame_width: f64,
    /// Frame height.
    pub frame_height: f64,
}

impl Viewport for FrameCamera {
    fn viewport_size(&self) -> ViewportSize {
        ViewportSize::Dimensions {
            width: self.frame_width,
            height: self.frame_height,
        }
    }
}

/// Camera exposing a `(width, height)` frame shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeCamera {
    /// `(width, height)`.
    pub frame_shape: (f64, f64),
}

impl Viewport for ShapeCamera {
    fn viewport_size(&self) -> ViewportSize {
        ViewportSize::Shape(self.frame_shape)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/viewport.rs"]
mod tests;
