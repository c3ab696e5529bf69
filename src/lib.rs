//! tensorspec renders numeric tensors as geometry for instructional animation.
//!
//! The engine turns each tensor into a frame of plain geometric primitives and strings the
//! frames together with timed transitions:
//!
//! - Build a [`VisualMatrix`] with a [`MatrixBackend`]: [`GeometricMatrixBuilder`] emits one
//!   cell per element, [`RasterizedMatrixBuilder`] renders a voxel plot per batch element and
//!   reimports it as vector paths
//! - Overlay the value distribution with a [`DistributionPlot`]
//! - Route orthogonal connectors with [`connect`], frame and caption shapes with [`bound_box`]
//! - Assemble a [`SceneTimeline`] with a [`SceneOrchestrator`], then hand it to an animation
//!   runtime as JSON or export single frames with [`to_svg_document`] and [`rasterize`]
//!
//! Scene space is y-up with the origin at the frame center.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod assets;
pub(crate) mod config;
pub(crate) mod geometry;
pub(crate) mod layout;
pub(crate) mod matrix;
pub(crate) mod plot;
pub(crate) mod relation;
pub(crate) mod render;
pub(crate) mod scene;
pub(crate) mod tensor;

pub use crate::foundation::core::{
    Affine, Axis, BezPath, DL, DOWN, Edge, LEFT, Point, RIGHT, Rect, UP, Vec2,
};
pub use crate::foundation::error::{TensorSpecError, TensorSpecResult};

pub use crate::animation::ease::Ease;
pub use crate::assets::color::{ColorRamp, ColorStop, Rgba, map_value};
pub use crate::assets::scratch::{BUILD_DIR_PREFIX, ScratchBuild, ScratchCache};
pub use crate::assets::svg_import::{VectorAsset, load_svg, parse_svg};
pub use crate::config::EngineConfig;
pub use crate::geometry::shape::{
    ArrowTip, Cell, GLYPH_ASPECT, Group, Polyline, Primitive, TextLabel, Transformable,
    VectorPath, union_bounds,
};
pub use crate::layout::params::{
    CHANNEL_THICKNESS, ChannelCurve, LayoutParameters, REFERENCE_MAX_CHANNELS,
    REFERENCE_MIN_CHANNELS, STROKE_WIDTH,
};
pub use crate::matrix::flat::{FlatLayer, FlatMatrix, FlatMatrixOpts};
pub use crate::matrix::geometric::{GeometricMatrixBuilder, GeometricOpts};
pub use crate::matrix::rasterized::{ASSET_STEM, RasterizedMatrixBuilder, RasterizedOpts};
pub use crate::matrix::voxel::{
    IsometricVoxelPlotter, VoxelField, VoxelPlotOpts, VoxelPlotter, sign_mask,
};
pub use crate::matrix::{Layer, LayerContent, MatrixBackend, MatrixEngine, VisualMatrix};
pub use crate::plot::distribution::{DistributionOpts, DistributionPanel, DistributionPlot};
pub use crate::plot::stats::{GaussianKde, Histogram};
pub use crate::relation::bound_box::{BoundBox, BoundBoxOpts, bound_box};
pub use crate::relation::connector::{
    Anchor, ConnectorOpts, ConnectorPath, END_PULLBACK, connect, route,
};
pub use crate::relation::repeat::repeat;
pub use crate::render::preview::{
    TRIM_MARGIN, TRIM_THRESHOLD, corner_background, rasterize, save_png, trim_margins, trim_png,
};
pub use crate::render::svg::{SvgExportOpts, to_svg_document};
pub use crate::scene::labels::{LabelMarker, LabelStrip, LabelStripOpts};
pub use crate::scene::timeline::{
    ALL_TRACKS, Directive, SceneFrame, SceneOrchestrator, SceneTimeline, TimelineOpts,
    TimelineState, Track, build_timeline,
};
pub use crate::scene::viewport::{
    DEFAULT_FRAME_HEIGHT, DEFAULT_FRAME_WIDTH, FrameCamera, ShapeCamera, Viewport, ViewportSize,
};
pub use crate::tensor::{Tensor, shape_label};
