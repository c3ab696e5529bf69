//! Voxel field and the plotting collaborator used by the rasterized backend.

use rand::Rng;

use crate::assets::color::{ColorRamp, Rgba};
use crate::foundation::error::{TensorSpecError, TensorSpecResult};
use crate::foundation::math::is_positive;

/// Normalized `(channel, row, col)` values plus a visibility mask.
#[derive(Clone, Debug, PartialEq)]
pub struct VoxelField {
    dims: [usize; 3],
    values: Vec<f64>,
    visible: Vec<bool>,
}

impl VoxelField {
    /// Field from row-major values and a mask of the same length.
    pub fn new(dims: [usize; 3], values: Vec<f64>, visible: Vec<bool>) -> TensorSpecResult<Self> {
        let len = dims
            .iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d))
            .unwrap_or(0);
        if len == 0 {
            return Err(TensorSpecError::shape(format!(
                "voxel dimensions must be >= 1 and addressable, got {dims:?}"
            )));
        }
        if values.len() != len || visible.len() != len {
            return Err(TensorSpecError::shape(format!(
                "voxel field {dims:?} needs {len} values and mask entries, got {} and {}",
                values.len(),
                visible.len()
            )));
        }
        Ok(Self {
            dims,
            values,
            visible,
        })
    }

    /// Field with every voxel shown where the sign mask is non-zero.
    pub fn from_sign_mask(dims: [usize; 3], values: Vec<f64>, mask: &[i8]) -> TensorSpecResult<Self> {
        Self::new(dims, values, mask.iter().map(|m| *m != 0).collect())
    }

    /// `(channels, rows, cols)`.
    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    fn offset(&self, idx: [usize; 3]) -> Option<usize> {
        if idx.iter().zip(self.dims).any(|(&n, d)| n >= d) {
            return None;
        }
        let [i, j, k] = idx;
        Some((i * self.dims[1] + j) * self.dims[2] + k)
    }

    /// Normalized value at `(i, j, k)`, `None` outside the field.
    pub fn value(&self, idx: [usize; 3]) -> Option<f64> {
        self.offset(idx).map(|o| self.values[o])
    }

    /// Whether voxel `(i, j, k)` is drawn; `None` outside the field.
    pub fn is_visible(&self, idx: [usize; 3]) -> Option<bool> {
        self.offset(idx).map(|o| self.visible[o])
    }

    /// Number of drawn voxels.
    pub fn visible_count(&self) -> usize {
        self.visible.iter().filter(|v| **v).count()
    }

    fn neighbor_visible(&self, idx: [usize; 3], axis: usize, positive: bool) -> bool {
        let mut n = idx;
        n[axis] = if positive {
            n[axis].wrapping_add(1)
        } else {
            n[axis].wrapping_sub(1)
        };
        self.is_visible(n).unwrap_or(false)
    }
}

/// Random `±1` mask, one entry per voxel.
///
/// The mask ignores the tensor's values; every entry is non-zero, so every voxel stays visible.
pub fn sign_mask(len: usize, rng: &mut impl Rng) -> Vec<i8> {
    (0..len)
        .map(|_| if rng.random::<bool>() { 1 } else { -1 })
        .collect()
}

/// Renders a [`VoxelField`] to a standalone vector document.
pub trait VoxelPlotter {
    /// SVG document for `field`, on a transparent background.
    fn plot(&self, field: &VoxelField) -> TensorSpecResult<String>;
}

/// Options for [`IsometricVoxelPlotter`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct VoxelPlotOpts {
    /// Camera elevation in degrees.
    pub elevation_deg: f64,
    /// Camera azimuth in degrees.
    pub azimuth_deg: f64,
    /// Face fill opacity.
    pub alpha: f64,
    /// Face edge color.
    pub edge_color: Rgba,
    /// Face edge width in output pixels.
    pub edge_width: f64,
    /// Output pixels per voxel edge.
    pub px_per_unit: f64,
    /// Colormap for normalized values.
    #[serde(skip, default = "ColorRamp::seismic")]
    pub ramp: ColorRamp,
}

impl Default for VoxelPlotOpts {
    fn default() -> Self {
        Self {
            elevation_deg: 20.0,
            azimuth_deg: -30.0,
            alpha: 0.5,
            edge_color: Rgba::BLACK,
            edge_width: 0.1,
            px_per_unit: 40.0,
            ramp: ColorRamp::seismic(),
        }
    }
}

impl VoxelPlotOpts {
    /// Check angles, opacity and sizes.
    pub fn validate(&self) -> TensorSpecResult<()> {
        if !self.elevation_deg.is_finite() || !self.azimuth_deg.is_finite() {
            return Err(TensorSpecError::validation("camera angles must be finite"));
        }
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(TensorSpecError::validation("alpha must be within [0, 1]"));
        }
        if !is_positive(self.px_per_unit) || self.edge_width < 0.0 {
            return Err(TensorSpecError::validation(
                "px_per_unit must be > 0 and edge_width >= 0",
            ));
        }
        Ok(())
    }
}

/// Orthographic voxel plot drawn face by face, back to front.
///
/// Only faces not shared with another visible voxel are emitted.
#[derive(Clone, Debug, Default)]
pub struct IsometricVoxelPlotter {
    opts: VoxelPlotOpts,
}

struct Face {
    depth: f64,
    corners: [(f64, f64); 4],
    color: Rgba,
}

struct Camera {
    right: [f64; 3],
    up: [f64; 3],
    toward: [f64; 3],
}

impl Camera {
    fn new(elevation_deg: f64, azimuth_deg: f64) -> Self {
        let (se, ce) = elevation_deg.to_radians().sin_cos();
        let (sa, ca) = azimuth_deg.to_radians().sin_cos();
        Self {
            right: [-sa, ca, 0.0],
            up: [-se * ca, -se * sa, ce],
            toward: [ce * ca, ce * sa, se],
        }
    }

    fn project(&self, p: [f64; 3]) -> (f64, f64) {
        (dot(self.right, p), dot(self.up, p))
    }
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

impl IsometricVoxelPlotter {
    /// Plotter with validated options.
    pub fn new(opts: VoxelPlotOpts) -> TensorSpecResult<Self> {
        opts.validate()?;
        Ok(Self { opts })
    }

    fn faces(&self, field: &VoxelField, camera: &Camera) -> Vec<Face> {
        let [ni, nj, nk] = field.dims();
        let mut faces = Vec::new();
        for i in 0..ni {
            for j in 0..nj {
                for k in 0..nk {
                    let idx = [i, j, k];
                    let (Some(true), Some(v)) = (field.is_visible(idx), field.value(idx)) else {
                        continue;
                    };
                    let color = self.opts.ramp.sample(v);
                    for axis in 0..3 {
                        for positive in [false, true] {
                            if field.neighbor_visible(idx, axis, positive) {
                                continue;
                            }
                            let (b, c) = ((axis + 1) % 3, (axis + 2) % 3);
                            let corner = |db: usize, dc: usize| {
                                let mut p = [i as f64, j as f64, k as f64];
                                p[axis] += if positive { 1.0 } else { 0.0 };
                                p[b] += db as f64;
                                p[c] += dc as f64;
                                p
                            };
                            let quad = [corner(0, 0), corner(1, 0), corner(1, 1), corner(0, 1)];
                            let mid = quad.iter().fold([0.0; 3], |acc, p| {
                                [acc[0] + p[0] / 4.0, acc[1] + p[1] / 4.0, acc[2] + p[2] / 4.0]
                            });
                            faces.push(Face {
                                depth: dot(camera.toward, mid),
                                corners: quad.map(|p| camera.project(p)),
                                color,
                            });
                        }
                    }
                }
            }
        }
        faces.sort_by(|a, b| a.depth.total_cmp(&b.depth));
        faces
    }
}

impl VoxelPlotter for IsometricVoxelPlotter {
    fn plot(&self, field: &VoxelField) -> TensorSpecResult<String> {
        let camera = Camera::new(self.opts.elevation_deg, self.opts.azimuth_deg);
        let faces = self.faces(field, &camera);

        let scale = self.opts.px_per_unit;
        let margin = self.opts.edge_width.max(1.0);
        let (mut x0, mut y0, mut x1, mut y1) = (f64::MAX, f64::MAX, f64::MIN, f64::MIN);
        for (x, y) in faces.iter().flat_map(|f| f.corners) {
            x0 = x0.min(x);
            y0 = y0.min(y);
            x1 = x1.max(x);
            y1 = y1.max(y);
        }
        if faces.is_empty() {
            (x0, y0, x1, y1) = (0.0, 0.0, 0.0, 0.0);
        }
        let width = (x1 - x0) * scale + 2.0 * margin;
        let height = (y1 - y0) * scale + 2.0 * margin;

        let edge = self.opts.edge_color;
        let mut body = String::new();
        for face in &faces {
            let mut d = String::new();
            for (n, (x, y)) in face.corners.iter().enumerate() {
                let px = (x - x0) * scale + margin;
                let py = (y1 - y) * scale + margin;
                let cmd = if n == 0 { "M" } else { " L" };
                d.push_str(&format!("{cmd}{px:.3},{py:.3}"));
            }
            body.push_str(&format!(
                r#"<path d="{d} Z" fill="{}" fill-opacity="{:.3}" stroke="{}" stroke-opacity="{:.3}" stroke-width="{:.3}"/>
"#,
                face.color.to_hex(),
                self.opts.alpha * face.color.a,
                edge.to_hex(),
                edge.a,
                self.opts.edge_width,
            ));
        }

        Ok(format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width:.3}" height="{height:.3}" viewBox="0 0 {width:.3} {height:.3}">
{body}</svg>
"#
        ))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/matrix/voxel.rs"]
mod tests;
