pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Unit step towards the top of the scene (scene space is y-up).
pub const UP: Vec2 = Vec2::new(0.0, 1.0);
/// Unit step towards the bottom of the scene.
pub const DOWN: Vec2 = Vec2::new(0.0, -1.0);
/// Unit step towards the left of the scene.
pub const LEFT: Vec2 = Vec2::new(-1.0, 0.0);
/// Unit step towards the right of the scene.
pub const RIGHT: Vec2 = Vec2::new(1.0, 0.0);
/// Down-left diagonal used to stack channel layers.
pub const DL: Vec2 = Vec2::new(-1.0, -1.0);

/// One of the four axis-aligned edges of a shape's bounding box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    /// Top edge.
    Up,
    /// Bottom edge.
    Down,
    /// Left edge.
    Left,
    /// Right edge.
    Right,
}

impl Edge {
    /// Outward unit normal of this edge.
    pub fn normal(self) -> Vec2 {
        match self {
            Self::Up => UP,
            Self::Down => DOWN,
            Self::Left => LEFT,
            Self::Right => RIGHT,
        }
    }

    /// `true` for the top and bottom edges, whose normals point along the vertical axis.
    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }

    /// `true` for the left and right edges.
    pub fn is_horizontal(self) -> bool {
        !self.is_vertical()
    }

    /// Center point of this edge on `rect`.
    pub fn center_of(self, rect: Rect) -> Point {
        let c = rect.center();
        match self {
            Self::Up => Point::new(c.x, rect.y1),
            Self::Down => Point::new(c.x, rect.y0),
            Self::Left => Point::new(rect.x0, c.y),
            Self::Right => Point::new(rect.x1, c.y),
        }
    }
}

/// Axis a connector leaves its source along.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Leaves along y, then turns onto x.
    Vertical,
    /// Leaves along x, then turns onto y.
    Horizontal,
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
