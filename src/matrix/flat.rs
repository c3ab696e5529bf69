use crate::assets::color::Rgba;
use crate::foundation::core::{Affine, BezPath, Edge, Point, Rect};
use crate::foundation::error::{TensorSpecError, TensorSpecResult};
use crate::foundation::math::is_positive;
use crate::geometry::shape::{Group, TextLabel, Transformable, VectorPath, union_bounds};
use crate::layout::params::LayoutParameters;
use crate::relation::repeat::repeat;
use crate::tensor::shape_label;

/// Options for [`FlatMatrix::build`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FlatMatrixOpts {
    /// Layer fill.
    pub fill: Rgba,
    /// Outline and grid color.
    pub stroke: Rgba,
    /// Text color of both labels.
    pub label_color: Rgba,
    /// Label gap as a fraction of the stack height.
    pub label_gap_ratio: f64,
    /// Dimension label width per character, as a fraction of the stack width.
    pub dimension_char_width: f64,
    /// Title width per character, as a fraction of the stack width.
    pub title_char_width: f64,
}

impl Default for FlatMatrixOpts {
    fn default() -> Self {
        Self {
            fill: Rgba::BLACK,
            stroke: Rgba::WHITE,
            label_color: Rgba::WHITE,
            label_gap_ratio: 0.1,
            dimension_char_width: 0.03,
            title_char_width: 0.05,
        }
    }
}

impl FlatMatrixOpts {
    /// Check ratios are positive.
    pub fn validate(&self) -> TensorSpecResult<()> {
        if self.label_gap_ratio < 0.0 {
            return Err(TensorSpecError::validation("label_gap_ratio must be >= 0"));
        }
        if !is_positive(self.dimension_char_width) || !is_positive(self.title_char_width) {
            return Err(TensorSpecError::validation(
                "label character widths must be > 0",
            ));
        }
        Ok(())
    }
}

/// One outlined `h × w` grid.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct FlatLayer {
    /// Filled, stroked outline.
    pub frame: VectorPath,
    /// Interior grid lines, stroke only; empty for a `1 × 1` grid.
    pub grid: VectorPath,
}

impl Transformable for FlatLayer {
    fn transform(&mut self, affine: Affine) {
        self.frame.transform(affine);
        self.grid.transform(affine);
    }

    fn bounds(&self) -> Option<Rect> {
        union_bounds([self.frame.bounds(), self.grid.bounds()])
    }
}

/// Schematic `(c, h, w)` block: stacked grids without per-element values.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct FlatMatrix {
    /// `(channels, rows, cols)`.
    pub dims: [usize; 3],
    /// Layers front to back, each shifted further down-left.
    pub layers: Vec<FlatLayer>,
    /// Dimension text above the stack.
    pub dimension_label: TextLabel,
    /// Caller label above the dimension text.
    pub title: TextLabel,
    /// Layout the stack was built with.
    pub layout: LayoutParameters,
}

impl FlatMatrix {
    /// Build a flat matrix for `dims = [c, h, w]`.
    pub fn build(dims: &[usize], label: &str, opts: &FlatMatrixOpts) -> TensorSpecResult<Self> {
        opts.validate()?;
        let &[c, h, w] = dims else {
            return Err(TensorSpecError::shape(format!(
                "flat matrix needs 3 dimensions, got {}",
                dims.len()
            )));
        };
        if c == 0 || h == 0 || w == 0 {
            return Err(TensorSpecError::shape(format!(
                "flat matrix dimensions must be >= 1, got {dims:?}"
            )));
        }

        let layout = LayoutParameters::for_channels(c);
        let step = layout.inter_layer_offset();
        let stroke = Some((opts.stroke, layout.stroke_width));
        let (hf, wf) = (h as f64, w as f64);
        let outline = Rect::new(-wf / 2.0, -hf / 2.0, wf / 2.0, hf / 2.0);

        let front = FlatLayer {
            frame: VectorPath::rect(outline, Some(opts.fill), stroke),
            grid: VectorPath {
                path: grid_lines(outline, h, w),
                fill: None,
                stroke,
            },
        };
        let mut layers = repeat(&front, c, step)?;
        layers.reverse();
        let stack = union_bounds(layers.iter().map(|l| l.bounds()))
            .ok_or_else(|| TensorSpecError::shape("flat matrix produced no geometry"))?;
        let gap = stack.height() * opts.label_gap_ratio;

        let dims_text = shape_label(dims);
        let mut dimension_label = TextLabel::fit_width(
            dims_text.as_str(),
            stack.width() * opts.dimension_char_width * dims_text.chars().count() as f64,
            opts.label_color,
        );
        dimension_label.next_to(stack, Edge::Up, gap);

        let mut title = TextLabel::fit_width(
            label,
            stack.width() * opts.title_char_width * label.chars().count().max(1) as f64,
            opts.label_color,
        );
        let anchor = dimension_label.bounds().unwrap_or(stack);
        title.next_to(anchor, Edge::Up, gap);

        Ok(Self {
            dims: [c, h, w],
            layers,
            dimension_label,
            title,
            layout,
        })
    }

    /// Stack bounds without the labels.
    pub fn stack_bounds(&self) -> Option<Rect> {
        union_bounds(self.layers.iter().map(|l| l.bounds()))
    }

    /// Flatten into drawable primitives, back layer first.
    pub fn to_group(&self) -> Group {
        let mut group = Group::new();
        for layer in self.layers.iter().rev() {
            group.push(layer.frame.clone());
            group.push(layer.grid.clone());
        }
        group.push(self.dimension_label.clone());
        group.push(self.title.clone());
        group
    }
}

impl Transformable for FlatMatrix {
    fn transform(&mut self, affine: Affine) {
        self.layers.iter_mut().for_each(|l| l.transform(affine));
        self.dimension_label.transform(affine);
        self.title.transform(affine);
    }

    fn bounds(&self) -> Option<Rect> {
        union_bounds([
            self.stack_bounds(),
            self.dimension_label.bounds(),
            self.title.bounds(),
        ])
    }
}

fn grid_lines(outline: Rect, rows: usize, cols: usize) -> BezPath {
    let mut path = BezPath::new();
    for r in 1..rows {
        let y = outline.y0 + r as f64;
        path.move_to(Point::new(outline.x0, y));
        path.line_to(Point::new(outline.x1, y));
    }
    for col in 1..cols {
        let x = outline.x0 + col as f64;
        path.move_to(Point::new(x, outline.y0));
        path.line_to(Point::new(x, outline.y1));
    }
    path
}

#[cfg(test)]
#[path = "../../tests/unit/matrix/flat.rs"]
mod tests;
