//! Value-distribution overlays: histogram bars, a rescaled density curve and range labels.

pub(crate) mod distribution;
pub(crate) mod stats;
