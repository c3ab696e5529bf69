use crate::assets::color::Rgba;
use crate::foundation::core::{Affine, Point, Rect};
use crate::foundation::error::{TensorSpecError, TensorSpecResult};
use crate::foundation::math::is_positive;
use crate::geometry::shape::{Group, TextLabel, Transformable, VectorPath, union_bounds};

/// Options for [`LabelStrip::build_with`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LabelStripOpts {
    /// Width of an unselected marker.
    pub marker_width: f64,
    /// Height of an unselected marker.
    pub marker_height: f64,
    /// Height of the selected marker.
    pub selected_height: f64,
    /// Text height inside the selected marker.
    pub font_size: f64,
    /// Horizontal gap between markers.
    pub spacing: f64,
    /// Uniform scale applied to the arranged strip.
    pub scale: f64,
    /// Unselected marker color.
    pub color: Rgba,
    /// Selected marker color.
    pub selected_color: Rgba,
    /// Text color.
    pub text_color: Rgba,
}

impl Default for LabelStripOpts {
    fn default() -> Self {
        Self {
            marker_width: 0.2,
            marker_height: 0.1,
            selected_height: 0.2,
            font_size: 0.1,
            spacing: 0.1,
            scale: 1.5,
            color: Rgba::WHITE,
            selected_color: Rgba::BLUE,
            text_color: Rgba::WHITE,
        }
    }
}

impl LabelStripOpts {
    /// Sizes must be positive; spacing must not be negative.
    pub fn validate(&self) -> TensorSpecResult<()> {
        for (name, v) in [
            ("marker_width", self.marker_width),
            ("marker_height", self.marker_height),
            ("selected_height", self.selected_height),
            ("font_size", self.font_size),
            ("scale", self.scale),
        ] {
            if !is_positive(v) {
                return Err(TensorSpecError::validation(format!("{name} must be > 0")));
            }
        }
        if !self.spacing.is_finite() || self.spacing < 0.0 {
            return Err(TensorSpecError::validation("spacing must be >= 0"));
        }
        Ok(())
    }
}

/// One marker of a [`LabelStrip`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct LabelMarker {
    /// Filled rectangle.
    pub rect: VectorPath,
    /// Text, present only on the selected marker.
    pub text: Option<TextLabel>,
}

impl Transformable for LabelMarker {
    fn transform(&mut self, affine: Affine) {
        self.rect.transform(affine);
        if let Some(t) = &mut self.text {
            t.transform(affine);
        }
    }

    fn bounds(&self) -> Option<Rect> {
        union_bounds([self.rect.bounds(), self.text.as_ref().and_then(|t| t.bounds())])
    }
}

/// Row of progress markers with the current entry highlighted and named.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct LabelStrip {
    /// Markers left to right, one per label.
    pub markers: Vec<LabelMarker>,
    /// Index of the highlighted marker.
    pub selected: usize,
}

impl LabelStrip {
    /// Strip for `labels` with `selected` highlighted, using default styling.
    pub fn build<S: AsRef<str>>(labels: &[S], selected: usize) -> TensorSpecResult<Self> {
        Self::build_with(labels, selected, &LabelStripOpts::default())
    }

    /// Strip for `labels` with `selected` highlighted.
    pub fn build_with<S: AsRef<str>>(
        labels: &[S],
        selected: usize,
        opts: &LabelStripOpts,
    ) -> TensorSpecResult<Self> {
        opts.validate()?;
        if selected >= labels.len() {
            return Err(TensorSpecError::shape(format!(
                "selected label {selected} out of range for {} labels",
                labels.len()
            )));
        }

        let mut markers = Vec::with_capacity(labels.len());
        let mut x = 0.0;
        for (i, label) in labels.iter().enumerate() {
            let marker = if i == selected {
                let mut text = TextLabel::new(label.as_ref(), opts.font_size, opts.text_color);
                let w = text.width;
                text.move_to(Point::new(x + w / 2.0, 0.0));
                LabelMarker {
                    rect: marker_rect(x, w, opts.selected_height, opts.selected_color),
                    text: Some(text),
                }
            } else {
                LabelMarker {
                    rect: marker_rect(x, opts.marker_width, opts.marker_height, opts.color),
                    text: None,
                }
            };
            x += marker.width() + opts.spacing;
            markers.push(marker);
        }

        let mut strip = Self { markers, selected };
        strip.move_to(Point::ORIGIN);
        strip.scale_about_center(opts.scale);
        Ok(strip)
    }

    /// The highlighted marker.
    pub fn selected_marker(&self) -> &LabelMarker {
        &self.markers[self.selected]
    }

    /// Flatten into drawable primitives.
    pub fn to_group(&self) -> Group {
        let mut group = Group::new();
        for m in &self.markers {
            group.push(m.rect.clone());
            if let Some(t) = &m.text {
                group.push(t.clone());
            }
        }
        group
    }
}

fn marker_rect(x: f64, width: f64, height: f64, color: Rgba) -> VectorPath {
    let r = Rect::from_origin_size(Point::new(x, -height / 2.0), (width, height));
    VectorPath::rect(r, Some(color), Some((color, 1.0)))
}

impl Transformable for LabelStrip {
    fn transform(&mut self, affine: Affine) {
        self.markers.iter_mut().for_each(|m| m.transform(affine));
    }

    fn bounds(&self) -> Option<Rect> {
        union_bounds(self.markers.iter().map(|m| m.bounds()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/labels.rs"]
mod tests;
