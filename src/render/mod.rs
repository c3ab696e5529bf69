//! Snapshot export of built geometry: SVG documents and PNG previews.

pub(crate) mod preview;
pub(crate) mod svg;
