//! Visual matrix construction.
//!
//! Two interchangeable backends turn a rank-4 tensor into a [`VisualMatrix`]:
//! [`geometric::GeometricMatrixBuilder`] emits one cell per element, while
//! [`rasterized::RasterizedMatrixBuilder`] renders each batch element to a vector asset and
//! reimports it. The engine is picked once, as a [`MatrixEngine`], and threaded through the
//! timeline build as a `Box<dyn MatrixBackend>`.

pub(crate) mod flat;
pub(crate) mod geometric;
pub(crate) mod rasterized;
pub(crate) mod voxel;

use std::fmt;
use std::str::FromStr;

use crate::assets::svg_import::VectorAsset;
use crate::foundation::core::{Affine, Rect, Vec2};
use crate::foundation::error::{TensorSpecError, TensorSpecResult};
use crate::geometry::shape::{Cell, Group, Primitive, TextLabel, Transformable, union_bounds};
use crate::tensor::Tensor;

/// Which backend builds the visual matrix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatrixEngine {
    /// One procedural cell per tensor element.
    #[serde(alias = "native")]
    Geometric,
    /// Per-batch voxel plot persisted as SVG and reimported as paths.
    #[serde(alias = "matplotlib")]
    Rasterized,
}

impl FromStr for MatrixEngine {
    type Err = TensorSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "geometric" | "native" => Ok(Self::Geometric),
            "rasterized" | "matplotlib" => Ok(Self::Rasterized),
            other => Err(TensorSpecError::validation(format!(
                "engine must be 'geometric' or 'rasterized', got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for MatrixEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Geometric => f.write_str("geometric"),
            Self::Rasterized => f.write_str("rasterized"),
        }
    }
}

/// Contents of one [`Layer`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayerContent {
    /// Grid of individually colored cells.
    Cells {
        /// Cells in row-major order.
        cells: Vec<Cell>,
    },
    /// Opaque imported vector asset covering a whole batch element.
    Vector {
        /// The reimported asset.
        asset: VectorAsset,
    },
}

/// One slice of a [`VisualMatrix`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Layer {
    /// Batch element this layer belongs to.
    pub batch: usize,
    /// Channel index, or `None` when the layer covers every channel.
    pub channel: Option<usize>,
    /// Stacking shift applied to this layer before the batch was projected.
    pub offset: Vec2,
    /// Layer geometry.
    pub content: LayerContent,
}

impl Layer {
    /// Number of cells (zero for vector layers).
    pub fn cell_count(&self) -> usize {
        match &self.content {
            LayerContent::Cells { cells } => cells.len(),
            LayerContent::Vector { .. } => 0,
        }
    }
}

impl Transformable for Layer {
    fn transform(&mut self, affine: Affine) {
        match &mut self.content {
            LayerContent::Cells { cells } => cells.iter_mut().for_each(|c| c.transform(affine)),
            LayerContent::Vector { asset } => asset.transform(affine),
        }
    }

    fn bounds(&self) -> Option<Rect> {
        match &self.content {
            LayerContent::Cells { cells } => union_bounds(cells.iter().map(|c| c.bounds())),
            LayerContent::Vector { asset } => asset.bounds(),
        }
    }
}

/// Stack of per-channel (or per-batch) layers representing one tensor.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct VisualMatrix {
    /// Caller-provided label.
    pub label: String,
    /// Engine that produced this matrix.
    pub engine: MatrixEngine,
    /// Layers in painter's order.
    pub layers: Vec<Layer>,
    /// Per-batch dimension annotations.
    pub annotations: Vec<TextLabel>,
}

impl VisualMatrix {
    /// Total number of procedural cells.
    pub fn cell_count(&self) -> usize {
        self.layers.iter().map(Layer::cell_count).sum()
    }

    /// Number of dimension annotations.
    pub fn annotation_count(&self) -> usize {
        self.annotations.len()
    }

    /// Flatten into drawable primitives.
    pub fn to_group(&self) -> Group {
        let mut group = Group::new();
        for layer in &self.layers {
            match &layer.content {
                LayerContent::Cells { cells } => {
                    group.items.extend(cells.iter().cloned().map(Primitive::Cell));
                }
                LayerContent::Vector { asset } => {
                    group.items.extend(asset.paths.iter().cloned().map(Primitive::Path));
                }
            }
        }
        group
            .items
            .extend(self.annotations.iter().cloned().map(Primitive::Text));
        group
    }
}

impl Transformable for VisualMatrix {
    fn transform(&mut self, affine: Affine) {
        self.layers.iter_mut().for_each(|l| l.transform(affine));
        self.annotations
            .iter_mut()
            .for_each(|a| a.transform(affine));
    }

    fn bounds(&self) -> Option<Rect> {
        union_bounds(
            self.layers
                .iter()
                .map(|l| l.bounds())
                .chain(self.annotations.iter().map(|a| a.bounds())),
        )
    }
}

/// Builds a [`VisualMatrix`] from a rank-4 tensor.
///
/// `build` takes `&mut self` so one builder has at most one build in flight.
pub trait MatrixBackend {
    /// Which engine this backend implements.
    fn engine(&self) -> MatrixEngine;

    /// Build the visual matrix for `tensor`, labelled `label`.
    fn build(&mut self, tensor: &Tensor, label: &str) -> TensorSpecResult<VisualMatrix>;
}

/// Batch group under construction: its layers plus the annotation beneath them.
pub(crate) struct BatchStack {
    pub(crate) layers: Vec<Layer>,
    pub(crate) annotation: TextLabel,
}

impl Transformable for BatchStack {
    fn transform(&mut self, affine: Affine) {
        self.layers.iter_mut().for_each(|l| l.transform(affine));
        self.annotation.transform(affine);
    }

    fn bounds(&self) -> Option<Rect> {
        union_bounds(
            self.layers
                .iter()
                .map(|l| l.bounds())
                .chain(std::iter::once(self.annotation.bounds())),
        )
    }
}

/// Stack batch groups top to bottom, `gap` apart, and collect them into a matrix.
///
/// Both backends share this rule so their outputs line up.
pub(crate) fn stack_batches(
    label: &str,
    engine: MatrixEngine,
    batches: Vec<BatchStack>,
    gap: f64,
) -> VisualMatrix {
    let mut layers = Vec::new();
    let mut annotations = Vec::new();
    let mut previous: Option<Rect> = None;
    for mut batch in batches {
        if let (Some(prev), Some(own)) = (previous, batch.bounds()) {
            batch.shift(Vec2::new(prev.x0 - own.x0, prev.y0 - gap - own.y1));
        }
        previous = batch.bounds().or(previous);
        layers.extend(batch.layers);
        annotations.push(batch.annotation);
    }
    VisualMatrix {
        label: label.to_owned(),
        engine,
        layers,
        annotations,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/matrix/mod.rs"]
mod tests;
