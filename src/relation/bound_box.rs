use crate::assets::color::Rgba;
use crate::foundation::core::{Affine, Edge, Rect, Vec2};
use crate::foundation::error::{TensorSpecError, TensorSpecResult};
use crate::foundation::math::is_positive;
use crate::geometry::shape::{Group, TextLabel, Transformable, VectorPath, union_bounds};

/// Padding, styling and label placement for [`bound_box`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BoundBoxOpts {
    /// Added to the shape's height.
    pub height_pad: f64,
    /// Added to the shape's width.
    pub width_pad: f64,
    /// Downward offset of the frame from the shape's center.
    pub drop: f64,
    /// Frame outline color.
    pub stroke: Rgba,
    /// Frame outline width.
    pub stroke_width: f64,
    /// Label text color.
    pub label_color: Rgba,
    /// Label height in scene units.
    pub font_size: f64,
    /// Gap between the frame's top edge and the label.
    pub label_buff: f64,
}

impl Default for BoundBoxOpts {
    fn default() -> Self {
        Self {
            height_pad: 1.0,
            width_pad: 0.3,
            drop: 0.1,
            stroke: Rgba::WHITE,
            stroke_width: 3.0,
            label_color: Rgba::WHITE,
            font_size: 0.4,
            label_buff: 0.5,
        }
    }
}

impl BoundBoxOpts {
    /// Paddings and gaps must be finite and non-negative; sizes positive.
    pub fn validate(&self) -> TensorSpecResult<()> {
        for (name, v) in [
            ("height_pad", self.height_pad),
            ("width_pad", self.width_pad),
            ("label_buff", self.label_buff),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(TensorSpecError::validation(format!(
                    "bound box {name} must be >= 0, got {v}"
                )));
            }
        }
        if !self.drop.is_finite() {
            return Err(TensorSpecError::validation("bound box drop must be finite"));
        }
        if !is_positive(self.stroke_width) || !is_positive(self.font_size) {
            return Err(TensorSpecError::validation(
                "bound box stroke_width and font_size must be > 0",
            ));
        }
        Ok(())
    }
}

/// Unfilled frame around a shape with a caption above it.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct BoundBox {
    /// Outline, stroke only.
    pub frame: VectorPath,
    /// Caption above the frame.
    pub label: TextLabel,
}

impl BoundBox {
    /// Frame then label, ready for export.
    pub fn to_group(&self) -> Group {
        let mut g = Group::new();
        g.push(self.frame.clone());
        g.push(self.label.clone());
        g
    }
}

impl Transformable for BoundBox {
    fn transform(&mut self, affine: Affine) {
        self.frame.transform(affine);
        self.label.transform(affine);
    }

    fn bounds(&self) -> Option<Rect> {
        union_bounds([self.frame.bounds(), self.label.bounds()])
    }
}

/// Frame `shape` with a padded outline and caption it with `label`.
///
/// The frame is `width + width_pad` by `height + height_pad`, centered on the shape and dropped by
/// `drop`. A shape without bounds is a [`TensorSpecError::Degenerate`].
pub fn bound_box(
    shape: &impl Transformable,
    label: &str,
    opts: &BoundBoxOpts,
) -> TensorSpecResult<BoundBox> {
    opts.validate()?;
    let b = shape
        .bounds()
        .ok_or_else(|| TensorSpecError::degenerate("cannot bound an empty shape"))?;
    let rect = Rect::from_center_size(
        b.center() + Vec2::new(0.0, -opts.drop),
        (b.width() + opts.width_pad, b.height() + opts.height_pad),
    );
    let frame = VectorPath::rect(rect, None, Some((opts.stroke, opts.stroke_width)));

    let mut caption = TextLabel::new(label, opts.font_size, opts.label_color);
    caption.next_to(rect, Edge::Up, opts.label_buff);
    Ok(BoundBox {
        frame,
        label: caption,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/relation/bound_box.rs"]
mod tests;
