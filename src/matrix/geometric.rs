use crate::assets::color::{Rgba, map_value};
use crate::foundation::core::{Affine, DL, Edge, Point, Rect};
use crate::foundation::error::{TensorSpecError, TensorSpecResult};
use crate::foundation::math::is_positive;
use crate::geometry::shape::{Cell, TextLabel, Transformable, union_bounds};
use crate::layout::params::LayoutParameters;
use crate::matrix::{
    BatchStack, Layer, LayerContent, MatrixBackend, MatrixEngine, VisualMatrix, stack_batches,
};
use crate::tensor::{Tensor, normalize};

/// Options for [`GeometricMatrixBuilder`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GeometricOpts {
    /// Color of normalized value `0`.
    pub low_color: Rgba,
    /// Color of normalized value `1`.
    pub high_color: Rgba,
    /// Cell fill opacity.
    pub fill_opacity: f64,
    /// Cell outline color.
    pub stroke_color: Rgba,
    /// Grid pitch; cells are unit squares at the default of `1.0`.
    pub cell_size: f64,
    /// Rotation of each batch stack about the vertical axis, in degrees.
    pub oblique_deg: f64,
    /// Gap between a stack and its dimension annotation.
    pub label_buff: f64,
    /// Vertical gap between consecutive batch groups.
    pub batch_gap: f64,
    /// Annotation color.
    pub label_color: Rgba,
}

impl Default for GeometricOpts {
    fn default() -> Self {
        Self {
            low_color: Rgba::BLUE,
            high_color: Rgba::RED,
            fill_opacity: 0.5,
            stroke_color: Rgba::WHITE,
            cell_size: 1.0,
            oblique_deg: -30.0,
            label_buff: 0.1,
            batch_gap: 0.2,
            label_color: Rgba::WHITE,
        }
    }
}

impl GeometricOpts {
    /// Check sizes and opacity ranges.
    pub fn validate(&self) -> TensorSpecResult<()> {
        if !is_positive(self.cell_size) {
            return Err(TensorSpecError::validation("cell_size must be > 0"));
        }
        if !(0.0..=1.0).contains(&self.fill_opacity) {
            return Err(TensorSpecError::validation(
                "fill_opacity must be within [0, 1]",
            ));
        }
        if !self.oblique_deg.is_finite() || self.oblique_deg.abs() >= 90.0 {
            return Err(TensorSpecError::validation(
                "oblique_deg must be within (-90, 90)",
            ));
        }
        if self.label_buff < 0.0 || self.batch_gap < 0.0 {
            return Err(TensorSpecError::validation(
                "label_buff and batch_gap must be >= 0",
            ));
        }
        Ok(())
    }
}

/// Orthographic view of a flat stack rotated by `deg` about the vertical axis.
pub(crate) fn oblique_projection(deg: f64) -> Affine {
    Affine::scale_non_uniform(deg.to_radians().cos(), 1.0)
}

/// Procedural backend: one colored cell per `(batch, channel, row, col)`.
///
/// Exact and fully transformable, at a cost proportional to the element count.
#[derive(Clone, Debug, Default)]
pub struct GeometricMatrixBuilder {
    opts: GeometricOpts,
}

impl GeometricMatrixBuilder {
    /// Builder with validated options.
    pub fn new(opts: GeometricOpts) -> TensorSpecResult<Self> {
        opts.validate()?;
        Ok(Self { opts })
    }

    fn build_batch(&self, tensor: &Tensor, b: usize) -> TensorSpecResult<BatchStack> {
        let dims = tensor.shape();
        let (channels, rows, cols) = (dims[1], dims[2], dims[3]);
        let batch = tensor.batch(b)?;
        let values = normalize(batch.values())?;

        let layout = LayoutParameters::for_channels(channels);
        let step = layout.inter_layer_offset() * self.opts.cell_size;
        let side = self.opts.cell_size;

        let mut layers = Vec::with_capacity(channels);
        for c in 0..channels {
            let offset = DL * (c as f64 * step);
            let mut cells = Vec::with_capacity(rows * cols);
            for r in 0..rows {
                for col in 0..cols {
                    let v = values[(c * rows + r) * cols + col];
                    let origin = Point::new(col as f64 * side, -((r + 1) as f64) * side) + offset;
                    cells.push(Cell {
                        corners: Cell::square(origin, side),
                        fill: map_value(self.opts.low_color, self.opts.high_color, v)
                            .with_alpha(self.opts.fill_opacity),
                        stroke: self.opts.stroke_color,
                        stroke_width: layout.stroke_width,
                        value: v,
                        index: [b, c, r, col],
                    });
                }
            }
            layers.push(Layer {
                batch: b,
                channel: Some(c),
                offset,
                content: LayerContent::Cells { cells },
            });
        }

        let center = layers_bounds(&layers)?.center().to_vec2();
        let projection = Affine::translate(center)
            * oblique_projection(self.opts.oblique_deg)
            * Affine::translate(-center);
        layers.iter_mut().for_each(|l| l.transform(projection));

        let stack_bounds = layers_bounds(&layers)?;
        let mut annotation = TextLabel::fit_width(
            batch_shape_label(dims),
            stack_bounds.width(),
            self.opts.label_color,
        );
        annotation.next_to(stack_bounds, Edge::Down, self.opts.label_buff);
        Ok(BatchStack { layers, annotation })
    }
}

fn layers_bounds(layers: &[Layer]) -> TensorSpecResult<Rect> {
    union_bounds(layers.iter().map(|l| l.bounds()))
        .ok_or_else(|| TensorSpecError::shape("batch produced no geometry"))
}

/// Dimension annotation text for one batch element, e.g. `(3, 4, 4)`.
pub(crate) fn batch_shape_label(dims: &[usize]) -> String {
    crate::tensor::shape_label(&dims[1..])
}

impl MatrixBackend for GeometricMatrixBuilder {
    fn engine(&self) -> MatrixEngine {
        MatrixEngine::Geometric
    }

    #[tracing::instrument(skip(self, tensor), fields(shape = ?tensor.shape()))]
    fn build(&mut self, tensor: &Tensor, label: &str) -> TensorSpecResult<VisualMatrix> {
        tensor.expect_rank(4)?;
        let n_batches = tensor.shape()[0];
        let mut batches = Vec::with_capacity(n_batches);
        for b in 0..n_batches {
            batches.push(self.build_batch(tensor, b)?);
            tracing::debug!(batch = b, "geometric batch built");
        }
        Ok(stack_batches(
            label,
            MatrixEngine::Geometric,
            batches,
            self.opts.batch_gap,
        ))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/matrix/geometric.rs"]
mod tests;
