//! Whole-engine configuration loaded from JSON.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::foundation::core::Edge;
use crate::foundation::error::{TensorSpecError, TensorSpecResult};
use crate::geometry::shape::{Polyline, Transformable};
use crate::matrix::flat::{FlatMatrix, FlatMatrixOpts};
use crate::matrix::geometric::{GeometricMatrixBuilder, GeometricOpts};
use crate::matrix::rasterized::{RasterizedMatrixBuilder, RasterizedOpts};
use crate::matrix::{MatrixBackend, MatrixEngine};
use crate::plot::distribution::DistributionOpts;
use crate::relation::bound_box::{BoundBox, BoundBoxOpts, bound_box};
use crate::relation::connector::{ConnectorOpts, connect};
use crate::scene::labels::LabelStripOpts;
use crate::scene::timeline::TimelineOpts;

/// Every component's options plus the engine choice.
///
/// Missing keys fall back to their defaults, so `{}` is a valid configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Matrix backend.
    pub engine: MatrixEngine,
    /// Geometric backend options.
    pub geometric: GeometricOpts,
    /// Rasterized backend options.
    pub rasterized: RasterizedOpts,
    /// Distribution plot options.
    pub distribution: DistributionOpts,
    /// Timing and placement options.
    pub timeline: TimelineOpts,
    /// Progress strip options.
    pub labels: LabelStripOpts,
    /// Connector options.
    pub connector: ConnectorOpts,
    /// Flat matrix options.
    pub flat: FlatMatrixOpts,
    /// Bounding frame options.
    pub bound_box: BoundBoxOpts,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            engine: MatrixEngine::Rasterized,
            geometric: GeometricOpts::default(),
            rasterized: RasterizedOpts::default(),
            distribution: DistributionOpts::default(),
            timeline: TimelineOpts::default(),
            labels: LabelStripOpts::default(),
            connector: ConnectorOpts::default(),
            flat: FlatMatrixOpts::default(),
            bound_box: BoundBoxOpts::default(),
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from a JSON reader and validate it.
    pub fn from_reader<R: std::io::Read>(r: R) -> TensorSpecResult<Self> {
        let config: Self = serde_json::from_reader(r)
            .map_err(|e| TensorSpecError::validation(format!("parse engine config JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a configuration from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> TensorSpecResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            TensorSpecError::resource(format!("open engine config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Validate every component's options.
    pub fn validate(&self) -> TensorSpecResult<()> {
        self.geometric.validate()?;
        self.rasterized.validate()?;
        self.distribution.validate()?;
        self.timeline.validate()?;
        self.labels.validate()?;
        self.connector.validate()?;
        self.flat.validate()?;
        self.bound_box.validate()?;
        Ok(())
    }

    /// Matrix backend for the configured engine.
    pub fn backend(&self) -> TensorSpecResult<Box<dyn MatrixBackend>> {
        let backend: Box<dyn MatrixBackend> = match self.engine {
            MatrixEngine::Geometric => {
                Box::new(GeometricMatrixBuilder::new(self.geometric.clone())?)
            }
            MatrixEngine::Rasterized => {
                Box::new(RasterizedMatrixBuilder::new(self.rasterized.clone())?)
            }
        };
        Ok(backend)
    }

    /// Schematic `(c, h, w)` block styled by the `flat` section.
    pub fn flat_matrix(&self, dims: &[usize], label: &str) -> TensorSpecResult<FlatMatrix> {
        FlatMatrix::build(dims, label, &self.flat)
    }

    /// Connector between two shapes styled by the `connector` section.
    pub fn connect(
        &self,
        from: &impl Transformable,
        from_edge: Edge,
        to: &impl Transformable,
        to_edge: Edge,
    ) -> TensorSpecResult<Polyline> {
        connect(from, from_edge, to, to_edge, &self.connector)
    }

    /// Captioned frame around `shape` styled by the `bound_box` section.
    pub fn bound_box(
        &self,
        shape: &impl Transformable,
        label: &str,
    ) -> TensorSpecResult<BoundBox> {
        bound_box(shape, label, &self.bound_box)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
