use std::path::Path;

use anyhow::Context as _;

use crate::assets::color::Rgba;
use crate::foundation::core::{Affine, BezPath, Point, Rect};
use crate::foundation::error::{TensorSpecError, TensorSpecResult};
use crate::geometry::shape::{Transformable, VectorPath, union_bounds};

/// Vector asset reimported as scene-space paths.
///
/// Opaque to per-cell transforms: it moves and scales as a whole.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct VectorAsset {
    /// Identifier the asset was persisted under.
    pub id: String,
    /// Paths in document order, y-up.
    pub paths: Vec<VectorPath>,
}

impl Transformable for VectorAsset {
    fn transform(&mut self, affine: Affine) {
        self.paths.iter_mut().for_each(|p| p.transform(affine));
    }

    fn bounds(&self) -> Option<Rect> {
        union_bounds(self.paths.iter().map(|p| p.bounds()))
    }
}

/// Parse SVG bytes into a [`VectorAsset`].
///
/// Group transforms are baked in and the y axis is flipped into scene orientation. Embedded
/// raster images are skipped.
pub fn parse_svg(bytes: &[u8], id: impl Into<String>) -> TensorSpecResult<VectorAsset> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;
    let mut paths = Vec::new();
    collect_paths(tree.root(), &mut paths);
    Ok(VectorAsset {
        id: id.into(),
        paths,
    })
}

/// Read and parse an SVG file; the file stem becomes the asset id.
pub fn load_svg(path: &Path) -> TensorSpecResult<VectorAsset> {
    let bytes = std::fs::read(path).map_err(|e| {
        TensorSpecError::resource(format!("read vector asset '{}': {e}", path.display()))
    })?;
    let id = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    parse_svg(&bytes, id)
}

fn collect_paths(group: &usvg::Group, out: &mut Vec<VectorPath>) {
    for child in group.children() {
        match child {
            usvg::Node::Group(g) => collect_paths(g.as_ref(), out),
            usvg::Node::Path(p) => {
                if let Some(path) = convert_path(p) {
                    out.push(path);
                }
            }
            usvg::Node::Text(t) => collect_paths(t.flattened(), out),
            usvg::Node::Image(_) => {}
        }
    }
}

fn convert_path(p: &usvg::Path) -> Option<VectorPath> {
    use usvg::tiny_skia_path::PathSegment;

    fn pt(p: usvg::tiny_skia_path::Point) -> Point {
        Point::new(f64::from(p.x), f64::from(p.y))
    }

    let mut path = BezPath::new();
    for seg in p.data().segments() {
        match seg {
            PathSegment::MoveTo(a) => path.move_to(pt(a)),
            PathSegment::LineTo(a) => path.line_to(pt(a)),
            PathSegment::QuadTo(a, b) => path.quad_to(pt(a), pt(b)),
            PathSegment::CubicTo(a, b, c) => path.curve_to(pt(a), pt(b), pt(c)),
            PathSegment::Close => path.close_path(),
        }
    }
    if path.elements().is_empty() {
        return None;
    }

    let ts = p.abs_transform();
    let abs = Affine::new([
        f64::from(ts.sx),
        f64::from(ts.ky),
        f64::from(ts.kx),
        f64::from(ts.sy),
        f64::from(ts.tx),
        f64::from(ts.ty),
    ]);
    path.apply_affine(Affine::FLIP_Y * abs);

    let fill = p.fill().and_then(|f| paint_color(f.paint(), f.opacity().get()));
    let stroke = p.stroke().and_then(|s| {
        paint_color(s.paint(), s.opacity().get()).map(|c| (c, f64::from(s.width().get())))
    });
    if fill.is_none() && stroke.is_none() {
        return None;
    }
    Some(VectorPath { path, fill, stroke })
}

fn paint_color(paint: &usvg::Paint, opacity: f32) -> Option<Rgba> {
    match paint {
        usvg::Paint::Color(c) => Some(Rgba::rgba(
            f64::from(c.red) / 255.0,
            f64::from(c.green) / 255.0,
            f64::from(c.blue) / 255.0,
            f64::from(opacity),
        )),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/svg_import.rs"]
mod tests;
