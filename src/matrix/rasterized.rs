use std::path::PathBuf;

use rand::SeedableRng as _;
use rand::rngs::StdRng;

use crate::assets::color::Rgba;
use crate::assets::scratch::ScratchCache;
use crate::assets::svg_import::load_svg;
use crate::foundation::core::{Edge, Vec2};
use crate::foundation::error::{TensorSpecError, TensorSpecResult};
use crate::foundation::math::is_positive;
use crate::geometry::shape::{TextLabel, Transformable};
use crate::matrix::geometric::batch_shape_label;
use crate::matrix::voxel::{
    IsometricVoxelPlotter, VoxelField, VoxelPlotOpts, VoxelPlotter, sign_mask,
};
use crate::matrix::{
    BatchStack, Layer, LayerContent, MatrixBackend, MatrixEngine, VisualMatrix, stack_batches,
};
use crate::tensor::{Tensor, normalize};

/// Stem of every persisted plot asset.
pub const ASSET_STEM: &str = "3d_plot";

/// Options for [`RasterizedMatrixBuilder`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RasterizedOpts {
    /// Scratch root; the system temp directory when unset.
    pub scratch_dir: Option<PathBuf>,
    /// Keep the latest build's assets on disk.
    pub retain_assets: bool,
    /// Height of each reimported plot in scene units.
    pub asset_height: f64,
    /// Gap between a plot and its dimension annotation.
    pub label_buff: f64,
    /// Vertical gap between consecutive batch plots.
    pub batch_gap: f64,
    /// Annotation color.
    pub label_color: Rgba,
    /// Seed for the visibility mask; entropy-seeded when unset.
    pub seed: Option<u64>,
    /// Plot camera and styling.
    pub plot: VoxelPlotOpts,
}

impl Default for RasterizedOpts {
    fn default() -> Self {
        Self {
            scratch_dir: None,
            retain_assets: false,
            asset_height: 2.0,
            label_buff: 0.1,
            batch_gap: 0.2,
            label_color: Rgba::WHITE,
            seed: None,
            plot: VoxelPlotOpts::default(),
        }
    }
}

impl RasterizedOpts {
    /// Check sizes and the nested plot options.
    pub fn validate(&self) -> TensorSpecResult<()> {
        if !is_positive(self.asset_height) {
            return Err(TensorSpecError::validation("asset_height must be > 0"));
        }
        if self.label_buff < 0.0 || self.batch_gap < 0.0 {
            return Err(TensorSpecError::validation(
                "label_buff and batch_gap must be >= 0",
            ));
        }
        self.plot.validate()
    }
}

/// Plot-and-reimport backend: one opaque vector asset per batch element.
///
/// Cheap to build for large tensors, but the result cannot be edited cell by cell.
#[derive(Debug)]
pub struct RasterizedMatrixBuilder<P = IsometricVoxelPlotter> {
    opts: RasterizedOpts,
    cache: ScratchCache,
    plotter: P,
    rng: StdRng,
}

impl RasterizedMatrixBuilder<IsometricVoxelPlotter> {
    /// Builder using the built-in voxel plotter.
    pub fn new(opts: RasterizedOpts) -> TensorSpecResult<Self> {
        let plotter = IsometricVoxelPlotter::new(opts.plot.clone())?;
        Self::with_plotter(opts, plotter)
    }
}

impl<P: VoxelPlotter> RasterizedMatrixBuilder<P> {
    /// Builder delegating plots to `plotter`.
    pub fn with_plotter(opts: RasterizedOpts, plotter: P) -> TensorSpecResult<Self> {
        opts.validate()?;
        let cache = match &opts.scratch_dir {
            Some(dir) => ScratchCache::new(dir)?,
            None => ScratchCache::in_system_temp()?,
        }
        .with_retain(opts.retain_assets);
        let rng = match opts.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(Self {
            opts,
            cache,
            plotter,
            rng,
        })
    }

    /// Scratch cache holding this builder's assets.
    pub fn cache(&self) -> &ScratchCache {
        &self.cache
    }

    fn field_for_batch(&mut self, tensor: &Tensor, b: usize) -> TensorSpecResult<VoxelField> {
        let dims = tensor.shape();
        let batch = tensor.batch(b)?;
        let values = normalize(batch.values())?;
        let mask = sign_mask(values.len(), &mut self.rng);
        VoxelField::from_sign_mask([dims[1], dims[2], dims[3]], values, &mask)
    }
}

impl<P: VoxelPlotter> MatrixBackend for RasterizedMatrixBuilder<P> {
    fn engine(&self) -> MatrixEngine {
        MatrixEngine::Rasterized
    }

    #[tracing::instrument(skip(self, tensor), fields(shape = ?tensor.shape()))]
    fn build(&mut self, tensor: &Tensor, label: &str) -> TensorSpecResult<VisualMatrix> {
        tensor.expect_rank(4)?;
        let dims = tensor.shape();
        let n_batches = dims[0];

        let mut build = self.cache.begin()?;
        let mut written = Vec::with_capacity(n_batches);
        for b in 0..n_batches {
            let field = self.field_for_batch(tensor, b)?;
            let svg = self.plotter.plot(&field)?;
            let path = build.asset_path(ASSET_STEM, "svg");
            std::fs::write(&path, svg).map_err(|e| {
                TensorSpecError::resource(format!("write plot '{}': {e}", path.display()))
            })?;
            tracing::debug!(batch = b, asset = %path.display(), "plot persisted");
            written.push(path);
        }

        let mut batches = Vec::with_capacity(n_batches);
        for (b, path) in written.iter().enumerate() {
            let mut asset = load_svg(path)?;
            let bounds = asset.bounds().ok_or_else(|| {
                TensorSpecError::resource(format!("plot '{}' has no geometry", path.display()))
            })?;
            asset.shift(-bounds.center().to_vec2());
            asset.scale_to_fit_height(self.opts.asset_height);

            let layer = Layer {
                batch: b,
                channel: None,
                offset: Vec2::ZERO,
                content: LayerContent::Vector { asset },
            };
            let stack_bounds = layer
                .bounds()
                .ok_or_else(|| TensorSpecError::resource("reimported plot is empty"))?;
            let mut annotation = TextLabel::fit_width(
                batch_shape_label(dims),
                stack_bounds.width(),
                self.opts.label_color,
            );
            annotation.next_to(stack_bounds, Edge::Down, self.opts.label_buff);
            batches.push(BatchStack {
                layers: vec![layer],
                annotation,
            });
        }

        self.cache.finish(build)?;
        Ok(stack_batches(
            label,
            MatrixEngine::Rasterized,
            batches,
            self.opts.batch_gap,
        ))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/matrix/rasterized.rs"]
mod tests;
