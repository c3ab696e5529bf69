use kurbo::Shape as _;

use crate::assets::color::Rgba;
use crate::foundation::core::{Affine, BezPath, Edge, Point, Rect, Vec2};

/// Width of one glyph relative to the text height; used to size labels without font metrics.
pub const GLYPH_ASPECT: f64 = 0.6;

/// Geometry that can be transformed and measured.
///
/// Provides the placement helpers the builders lean on (`shift`, `move_to`, `next_to`, fitting).
pub trait Transformable {
    /// Apply an affine transform in place.
    fn transform(&mut self, affine: Affine);

    /// Axis-aligned bounds, or `None` when there is nothing to measure.
    fn bounds(&self) -> Option<Rect>;

    /// Translate by `delta`.
    fn shift(&mut self, delta: Vec2) {
        self.transform(Affine::translate(delta));
    }

    /// Bounding-box width (zero when empty).
    fn width(&self) -> f64 {
        self.bounds().map_or(0.0, |r| r.width())
    }

    /// Bounding-box height (zero when empty).
    fn height(&self) -> f64 {
        self.bounds().map_or(0.0, |r| r.height())
    }

    /// Bounding-box center (origin when empty).
    fn center(&self) -> Point {
        self.bounds().map_or(Point::ORIGIN, |r| r.center())
    }

    /// Translate so the bounding-box center lands on `target`.
    fn move_to(&mut self, target: Point) {
        let delta = target - self.center();
        self.shift(delta);
    }

    /// Uniform scale about the bounding-box center.
    fn scale_about_center(&mut self, factor: f64) {
        let c = self.center().to_vec2();
        self.transform(Affine::translate(c) * Affine::scale(factor) * Affine::translate(-c));
    }

    /// Uniformly scale so the width becomes `width`.
    fn scale_to_fit_width(&mut self, width: f64) {
        let w = self.width();
        if w > 0.0 {
            self.scale_about_center(width / w);
        }
    }

    /// Uniformly scale so the height becomes `height`.
    fn scale_to_fit_height(&mut self, height: f64) {
        let h = self.height();
        if h > 0.0 {
            self.scale_about_center(height / h);
        }
    }

    /// Place beyond `edge` of `anchor` with a gap of `buff`, centered on the other axis.
    fn next_to(&mut self, anchor: Rect, edge: Edge, buff: f64) {
        let Some(own) = self.bounds() else {
            return;
        };
        let a = anchor.center();
        let target = match edge {
            Edge::Up => Point::new(a.x, anchor.y1 + buff + own.height() / 2.0),
            Edge::Down => Point::new(a.x, anchor.y0 - buff - own.height() / 2.0),
            Edge::Left => Point::new(anchor.x0 - buff - own.width() / 2.0, a.y),
            Edge::Right => Point::new(anchor.x1 + buff + own.width() / 2.0, a.y),
        };
        self.move_to(target);
    }

    /// Translate horizontally so the left edge sits at `x`.
    fn align_left_to(&mut self, x: f64) {
        if let Some(r) = self.bounds() {
            self.shift(Vec2::new(x - r.x0, 0.0));
        }
    }

    /// Translate horizontally so the right edge sits at `x`.
    fn align_right_to(&mut self, x: f64) {
        if let Some(r) = self.bounds() {
            self.shift(Vec2::new(x - r.x1, 0.0));
        }
    }
}

/// One colored tensor element.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Cell {
    /// Corners in counter-clockwise order, starting bottom-left before any transform.
    pub corners: [Point; 4],
    /// Fill color (alpha is the fill opacity).
    pub fill: Rgba,
    /// Outline color.
    pub stroke: Rgba,
    /// Outline width.
    pub stroke_width: f64,
    /// Normalized value the fill was mapped from.
    pub value: f64,
    /// `(batch, channel, row, col)` of the source element.
    pub index: [usize; 4],
}

impl Cell {
    /// Axis-aligned square of side `side` with its bottom-left corner at `origin`.
    pub fn square(origin: Point, side: f64) -> [Point; 4] {
        [
            origin,
            origin + Vec2::new(side, 0.0),
            origin + Vec2::new(side, side),
            origin + Vec2::new(0.0, side),
        ]
    }

    /// Closed outline of the cell.
    pub fn to_path(&self) -> BezPath {
        polygon_path(&self.corners, true)
    }
}

impl Transformable for Cell {
    fn transform(&mut self, affine: Affine) {
        for p in &mut self.corners {
            *p = affine * *p;
        }
    }

    fn bounds(&self) -> Option<Rect> {
        points_bounds(&self.corners)
    }
}

/// Single-line text sized by an explicit box.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TextLabel {
    /// Text content.
    pub text: String,
    /// Box center.
    pub center: Point,
    /// Box width.
    pub width: f64,
    /// Box height (the font size in scene units).
    pub height: f64,
    /// Text color.
    pub color: Rgba,
}

impl TextLabel {
    /// Text whose box height is `font_size` and width follows from [`GLYPH_ASPECT`].
    pub fn new(text: impl Into<String>, font_size: f64, color: Rgba) -> Self {
        let text = text.into();
        let chars = text.chars().count().max(1) as f64;
        Self {
            width: chars * GLYPH_ASPECT * font_size,
            height: font_size,
            center: Point::ORIGIN,
            text,
            color,
        }
    }

    /// Text scaled so its box is exactly `width` wide.
    pub fn fit_width(text: impl Into<String>, width: f64, color: Rgba) -> Self {
        let mut label = Self::new(text, 1.0, color);
        label.scale_to_fit_width(width);
        label
    }
}

impl Transformable for TextLabel {
    fn transform(&mut self, affine: Affine) {
        let [a, b, c, d, _, _] = affine.as_coeffs();
        self.center = affine * self.center;
        self.width *= (a * a + b * b).sqrt();
        self.height *= (c * c + d * d).sqrt();
    }

    fn bounds(&self) -> Option<Rect> {
        Some(Rect::from_center_size(self.center, (self.width, self.height)))
    }
}

/// Filled and/or stroked Bézier path.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct VectorPath {
    /// Path geometry.
    pub path: BezPath,
    /// Fill color, if filled.
    pub fill: Option<Rgba>,
    /// Stroke color and width, if stroked.
    pub stroke: Option<(Rgba, f64)>,
}

impl VectorPath {
    /// Outline of an axis-aligned rectangle.
    pub fn rect(rect: Rect, fill: Option<Rgba>, stroke: Option<(Rgba, f64)>) -> Self {
        Self {
            path: rect.to_path(0.1),
            fill,
            stroke,
        }
    }
}

impl Transformable for VectorPath {
    fn transform(&mut self, affine: Affine) {
        self.path.apply_affine(affine);
    }

    fn bounds(&self) -> Option<Rect> {
        if self.path.elements().is_empty() {
            return None;
        }
        Some(self.path.bounding_box())
    }
}

/// Open polyline, optionally ending in an arrowhead.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Polyline {
    /// Vertices in drawing order.
    pub points: Vec<Point>,
    /// Stroke color.
    pub stroke: Rgba,
    /// Stroke width.
    pub stroke_width: f64,
    /// Arrowhead at the last vertex, pointing along the final segment.
    pub arrow_tip: Option<ArrowTip>,
}

/// Arrowhead drawn at the end of a [`Polyline`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ArrowTip {
    /// Where the tip touches.
    pub tip: Point,
    /// Point the tip is aimed from.
    pub from: Point,
    /// Tip length along the aim direction.
    pub length: f64,
}

impl ArrowTip {
    /// Filled triangle for the tip.
    pub fn to_path(&self) -> BezPath {
        let dir = self.tip - self.from;
        let len = dir.length();
        if len <= 0.0 || self.length <= 0.0 {
            return BezPath::new();
        }
        let u = dir / len;
        let n = Vec2::new(-u.y, u.x);
        let base = self.tip - u * self.length;
        let half = self.length * 0.5;
        polygon_path(&[self.tip, base + n * half, base - n * half], true)
    }
}

impl Polyline {
    /// Polyline as a path (not closed).
    pub fn to_path(&self) -> BezPath {
        polygon_path(&self.points, false)
    }
}

impl Transformable for Polyline {
    fn transform(&mut self, affine: Affine) {
        for p in &mut self.points {
            *p = affine * *p;
        }
        if let Some(tip) = &mut self.arrow_tip {
            let [a, b, _, _, _, _] = affine.as_coeffs();
            tip.tip = affine * tip.tip;
            tip.from = affine * tip.from;
            tip.length *= (a * a + b * b).sqrt();
        }
    }

    fn bounds(&self) -> Option<Rect> {
        let mut r = points_bounds(&self.points)?;
        if let Some(tip) = &self.arrow_tip {
            r = r.union(tip.to_path().bounding_box());
        }
        Some(r)
    }
}

/// Closed set of drawable primitives.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    /// Tensor element.
    Cell(Cell),
    /// Text.
    Text(TextLabel),
    /// Bézier path.
    Path(VectorPath),
    /// Polyline.
    Polyline(Polyline),
}

impl Transformable for Primitive {
    fn transform(&mut self, affine: Affine) {
        match self {
            Self::Cell(c) => c.transform(affine),
            Self::Text(t) => t.transform(affine),
            Self::Path(p) => p.transform(affine),
            Self::Polyline(p) => p.transform(affine),
        }
    }

    fn bounds(&self) -> Option<Rect> {
        match self {
            Self::Cell(c) => c.bounds(),
            Self::Text(t) => t.bounds(),
            Self::Path(p) => p.bounds(),
            Self::Polyline(p) => p.bounds(),
        }
    }
}

/// Flat, ordered collection of primitives drawn back to front.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct Group {
    /// Primitives in painter's order.
    pub items: Vec<Primitive>,
}

impl Group {
    /// Empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one primitive.
    pub fn push(&mut self, item: impl Into<Primitive>) {
        self.items.push(item.into());
    }

    /// Append every primitive of `other`.
    pub fn append(&mut self, other: Group) {
        self.items.extend(other.items);
    }

    /// Number of primitives.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// `true` when the group has no primitives.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Count of [`Primitive::Cell`] entries.
    pub fn cell_count(&self) -> usize {
        self.items
            .iter()
            .filter(|p| matches!(p, Primitive::Cell(_)))
            .count()
    }

    /// Count of [`Primitive::Text`] entries.
    pub fn text_count(&self) -> usize {
        self.items
            .iter()
            .filter(|p| matches!(p, Primitive::Text(_)))
            .count()
    }
}

impl Transformable for Group {
    fn transform(&mut self, affine: Affine) {
        for item in &mut self.items {
            item.transform(affine);
        }
    }

    fn bounds(&self) -> Option<Rect> {
        union_bounds(self.items.iter().map(|p| p.bounds()))
    }
}

impl From<Cell> for Primitive {
    fn from(v: Cell) -> Self {
        Self::Cell(v)
    }
}

impl From<TextLabel> for Primitive {
    fn from(v: TextLabel) -> Self {
        Self::Text(v)
    }
}

impl From<VectorPath> for Primitive {
    fn from(v: VectorPath) -> Self {
        Self::Path(v)
    }
}

impl From<Polyline> for Primitive {
    fn from(v: Polyline) -> Self {
        Self::Polyline(v)
    }
}

/// Union of optional rectangles; `None` when all are `None`.
pub fn union_bounds(rects: impl IntoIterator<Item = Option<Rect>>) -> Option<Rect> {
    rects
        .into_iter()
        .flatten()
        .reduce(|acc, r| acc.union(r))
}

fn points_bounds(points: &[Point]) -> Option<Rect> {
    let first = points.first()?;
    Some(
        points
            .iter()
            .fold(Rect::from_points(*first, *first), |r, p| r.union_pt(*p)),
    )
}

fn polygon_path(points: &[Point], closed: bool) -> BezPath {
    let mut path = BezPath::new();
    let mut it = points.iter();
    if let Some(first) = it.next() {
        path.move_to(*first);
        for p in it {
            path.line_to(*p);
        }
        if closed {
            path.close_path();
        }
    }
    path
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/shape.rs"]
mod tests;
