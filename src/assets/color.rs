use serde::{Deserialize, Serialize};

use crate::foundation::error::{TensorSpecError, TensorSpecResult};
use crate::foundation::math::lerp;

/// Straight-alpha RGBA color with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgba {
    /// Red.
    pub r: f64,
    /// Green.
    pub g: f64,
    /// Blue.
    pub b: f64,
    /// Alpha.
    pub a: f64,
}

impl Rgba {
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    /// The scene framework's default blue (`#58C4DD`).
    pub const BLUE: Self = Self::rgb(88.0 / 255.0, 196.0 / 255.0, 221.0 / 255.0);
    /// The scene framework's default red (`#FC6255`).
    pub const RED: Self = Self::rgb(252.0 / 255.0, 98.0 / 255.0, 85.0 / 255.0);

    /// Build a color from all four channels.
    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Build an opaque color.
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Same color with a different alpha.
    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA`.
    pub fn from_hex(s: &str) -> TensorSpecResult<Self> {
        parse_hex(s).map_err(TensorSpecError::validation)
    }

    /// Format as `#rrggbb`, ignoring alpha.
    pub fn to_hex(self) -> String {
        let [r, g, b, _] = self.to_rgba8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Quantize to straight-alpha RGBA8.
    pub fn to_rgba8(self) -> [u8; 4] {
        fn to_u8(x: f64) -> u8 {
            (x.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        [to_u8(self.r), to_u8(self.g), to_u8(self.b), to_u8(self.a)]
    }
}

/// Two-color blend `(1 - v) * c1 + v * c2`, linear in RGB.
///
/// `v` is clamped to `[0, 1]`; the endpoints return the anchors exactly.
pub fn map_value(c1: Rgba, c2: Rgba, v: f64) -> Rgba {
    let v = v.clamp(0.0, 1.0);
    Rgba {
        r: lerp(c1.r, c2.r, v),
        g: lerp(c1.g, c2.g, v),
        b: lerp(c1.b, c2.b, v),
        a: lerp(c1.a, c2.a, v),
    }
}

/// One stop of a [`ColorRamp`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    /// Color at this stop.
    pub color: Rgba,
    /// Position of this stop in the ramp's domain.
    pub threshold: f64,
}

/// Piecewise-linear multi-stop color ramp over `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorRamp {
    stops: Vec<ColorStop>,
}

impl ColorRamp {
    /// Build a ramp; thresholds must be strictly increasing and span `[0, 1]`.
    pub fn new(stops: Vec<ColorStop>) -> TensorSpecResult<Self> {
        let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
            return Err(TensorSpecError::validation(
                "color ramp needs at least one stop",
            ));
        };
        if stops.iter().any(|s| !s.threshold.is_finite()) {
            return Err(TensorSpecError::validation(
                "color ramp thresholds must be finite",
            ));
        }
        if first.threshold > 0.0 || last.threshold < 1.0 {
            return Err(TensorSpecError::validation(format!(
                "color ramp must cover [0, 1], got [{}, {}]",
                first.threshold, last.threshold
            )));
        }
        if stops.windows(2).any(|w| w[1].threshold <= w[0].threshold) {
            return Err(TensorSpecError::validation(
                "color ramp thresholds must be strictly increasing",
            ));
        }
        Ok(Self { stops })
    }

    /// Evenly spaced stops from `0` to `1`.
    pub fn evenly_spaced(colors: &[Rgba]) -> TensorSpecResult<Self> {
        let n = colors.len();
        let stops = colors
            .iter()
            .enumerate()
            .map(|(i, &color)| ColorStop {
                color,
                threshold: if n <= 1 {
                    0.0
                } else {
                    (i as f64) / ((n - 1) as f64)
                },
            })
            .collect();
        if n == 1 {
            // A single color covers the domain on its own.
            return Ok(Self { stops });
        }
        Self::new(stops)
    }

    /// Diverging dark-blue / white / dark-red ramp ("seismic").
    pub fn seismic() -> Self {
        let stops = [
            Rgba::rgb(0.0, 0.0, 0.3),
            Rgba::rgb(0.0, 0.0, 1.0),
            Rgba::rgb(1.0, 1.0, 1.0),
            Rgba::rgb(1.0, 0.0, 0.0),
            Rgba::rgb(0.5, 0.0, 0.0),
        ]
        .iter()
        .enumerate()
        .map(|(i, &color)| ColorStop {
            color,
            threshold: (i as f64) * 0.25,
        })
        .collect();
        Self { stops }
    }

    /// Ramp stops in ascending order.
    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Color at `v`, blending between the bracketing stops.
    ///
    /// Values outside the first/last stop clamp to that stop's color.
    pub fn sample(&self, v: f64) -> Rgba {
        let first = self.stops[0];
        let last = self.stops[self.stops.len() - 1];
        if v.is_nan() || v <= first.threshold {
            return first.color;
        }
        if v >= last.threshold {
            return last.color;
        }
        let upper = self.stops.partition_point(|s| s.threshold <= v);
        let lo = self.stops[upper - 1];
        let hi = self.stops[upper];
        let t = (v - lo.threshold) / (hi.threshold - lo.threshold);
        map_value(lo.color, hi.color, t)
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            RgbaObj {
                r: f64,
                g: f64,
                b: f64,
                #[serde(default = "one")]
                a: f64,
            },
            Arr(Vec<f64>),
        }

        fn one() -> f64 {
            1.0
        }

        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => parse_hex(&s).map_err(serde::de::Error::custom),
            Repr::RgbaObj { r, g, b, a } => Ok(Self::rgba(r, g, b, a)),
            Repr::Arr(v) => match v.as_slice() {
                [r, g, b] => Ok(Self::rgb(*r, *g, *b)),
                [r, g, b, a] => Ok(Self::rgba(*r, *g, *b, *a)),
                _ => Err(serde::de::Error::custom(
                    "rgba array must have len 3 ([r,g,b]) or 4 ([r,g,b,a])",
                )),
            },
        }
    }
}

impl<'de> Deserialize<'de> for ColorRamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let stops = Vec::<ColorStop>::deserialize(deserializer)?;
        Self::new(stops).map_err(serde::de::Error::custom)
    }
}

fn parse_hex(s: &str) -> Result<Rgba, String> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);

    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    if !s.is_ascii() {
        return Err("hex color must be ASCII".to_owned());
    }
    let (r, g, b, a) = match s.len() {
        6 => (
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            255,
        ),
        8 => (
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            hex_byte(&s[6..8])?,
        ),
        _ => {
            return Err("hex color must be #RRGGBB or #RRGGBBAA (case-insensitive)".to_owned());
        }
    };

    Ok(Rgba::rgba(
        f64::from(r) / 255.0,
        f64::from(g) / 255.0,
        f64::from(b) / 255.0,
        f64::from(a) / 255.0,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/color.rs"]
mod tests;
