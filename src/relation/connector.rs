use crate::assets::color::Rgba;
use crate::foundation::core::{Axis, Edge, Point};
use crate::foundation::error::{TensorSpecError, TensorSpecResult};
use crate::foundation::math::is_positive;
use crate::geometry::shape::{ArrowTip, Polyline, Transformable};

/// Fraction of the last segment left free so the arrowhead covers the true endpoint.
pub const END_PULLBACK: f64 = 0.05;

/// Styling and spacing for connectors.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ConnectorOpts {
    /// Gap between each shape boundary and the connector end.
    pub buff: f64,
    /// Stroke width of the line and tip.
    pub stroke_width: f64,
    /// Arrowhead length.
    pub tip_length: f64,
    /// Line color.
    pub color: Rgba,
}

impl Default for ConnectorOpts {
    fn default() -> Self {
        Self {
            buff: 0.1,
            stroke_width: 3.0,
            tip_length: 0.2,
            color: Rgba::WHITE,
        }
    }
}

impl ConnectorOpts {
    /// Reject negative gaps and non-positive stroke/tip sizes.
    pub fn validate(&self) -> TensorSpecResult<()> {
        if !self.buff.is_finite() || self.buff < 0.0 {
            return Err(TensorSpecError::validation("connector buff must be >= 0"));
        }
        if !is_positive(self.stroke_width) || !is_positive(self.tip_length) {
            return Err(TensorSpecError::validation(
                "connector stroke_width and tip_length must be > 0",
            ));
        }
        Ok(())
    }
}

/// A boundary point and the edge it lies on.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Anchor {
    /// Point on the shape boundary.
    pub point: Point,
    /// Edge the point belongs to.
    pub edge: Edge,
}

impl Anchor {
    /// Anchor at the center of `edge` of `shape`'s bounds.
    pub fn on(shape: &impl Transformable, edge: Edge) -> TensorSpecResult<Self> {
        let bounds = shape
            .bounds()
            .ok_or_else(|| TensorSpecError::routing("cannot anchor on an empty shape"))?;
        Ok(Self {
            point: edge.center_of(bounds),
            edge,
        })
    }
}

/// Single-bend orthogonal connector.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ConnectorPath {
    /// First vertex, pushed `buff` out of the source boundary.
    pub start: Point,
    /// True end point, pushed `buff` out of the destination boundary.
    pub end: Point,
    /// The one turning point.
    pub bend: Point,
    /// Axis the connector leaves the source along.
    pub axis: Axis,
}

impl ConnectorPath {
    /// Drawn vertices `[start, bend, end']`, with `end'` pulled back towards `bend`.
    pub fn vertices(&self) -> [Point; 3] {
        let pulled = self.end - (self.end - self.bend) * END_PULLBACK;
        [self.start, self.bend, pulled]
    }

    /// Stroked polyline with an arrowhead touching [`ConnectorPath::end`].
    pub fn to_polyline(&self, opts: &ConnectorOpts) -> Polyline {
        Polyline {
            points: self.vertices().to_vec(),
            stroke: opts.color,
            stroke_width: opts.stroke_width,
            arrow_tip: Some(ArrowTip {
                tip: self.end,
                from: self.bend,
                length: opts.tip_length,
            }),
        }
    }
}

/// Route an orthogonal connector from `from` to `to`.
///
/// Exactly one of the two edges must be vertical (up/down) and the other horizontal
/// (left/right); any other pairing is a [`TensorSpecError::Routing`] and nothing is built.
pub fn route(from: Anchor, to: Anchor, opts: &ConnectorOpts) -> TensorSpecResult<ConnectorPath> {
    opts.validate()?;
    if from.edge.is_vertical() == to.edge.is_vertical() {
        return Err(TensorSpecError::routing(format!(
            "edges must be perpendicular, got {:?} -> {:?}",
            from.edge, to.edge
        )));
    }

    let start = from.point + from.edge.normal() * opts.buff;
    let end = to.point + to.edge.normal() * opts.buff;

    let (bend, axis) = if from.edge.is_vertical() {
        (Point::new(start.x, end.y), Axis::Vertical)
    } else {
        (Point::new(end.x, start.y), Axis::Horizontal)
    };

    Ok(ConnectorPath {
        start,
        end,
        bend,
        axis,
    })
}

/// Route between two shapes, anchoring on the centers of the given edges.
pub fn connect(
    from: &impl Transformable,
    from_edge: Edge,
    to: &impl Transformable,
    to_edge: Edge,
    opts: &ConnectorOpts,
) -> TensorSpecResult<Polyline> {
    let path = route(Anchor::on(from, from_edge)?, Anchor::on(to, to_edge)?, opts)?;
    Ok(path.to_polyline(opts))
}

#[cfg(test)]
#[path = "../../tests/unit/relation/connector.rs"]
mod tests;
