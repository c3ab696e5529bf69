use std::fmt::Write as _;

use crate::assets::color::Rgba;
use crate::foundation::core::{Affine, BezPath, Rect, Vec2};
use crate::foundation::error::{TensorSpecError, TensorSpecResult};
use crate::foundation::math::is_positive;
use crate::geometry::shape::{Group, Primitive, TextLabel, Transformable};

/// Options for [`to_svg_document`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SvgExportOpts {
    /// Output pixels per scene unit.
    pub px_per_unit: f64,
    /// Scene region to export; `None` fits the group's bounds plus `padding`.
    pub frame: Option<Rect>,
    /// Padding around the group's bounds when `frame` is `None`.
    pub padding: f64,
    /// Background fill; `None` leaves the document transparent.
    pub background: Option<Rgba>,
    /// `font-family` of text labels.
    pub font_family: String,
}

impl Default for SvgExportOpts {
    fn default() -> Self {
        Self {
            px_per_unit: 100.0,
            frame: None,
            padding: 0.25,
            background: Some(Rgba::BLACK),
            font_family: "sans-serif".to_owned(),
        }
    }
}

impl SvgExportOpts {
    /// Scale must be positive, padding non-negative and an explicit frame non-empty.
    pub fn validate(&self) -> TensorSpecResult<()> {
        if !is_positive(self.px_per_unit) {
            return Err(TensorSpecError::validation("px_per_unit must be > 0"));
        }
        if !self.padding.is_finite() || self.padding < 0.0 {
            return Err(TensorSpecError::validation("padding must be >= 0"));
        }
        if let Some(f) = self.frame
            && !(is_positive(f.width()) && is_positive(f.height()))
        {
            return Err(TensorSpecError::validation("export frame must not be empty"));
        }
        Ok(())
    }
}

/// Serialize `group` as a standalone SVG document.
///
/// Scene space is y-up; the document is y-down with its origin at the top-left of the frame.
/// An empty group without an explicit frame is a [`TensorSpecError::Degenerate`].
pub fn to_svg_document(group: &Group, opts: &SvgExportOpts) -> TensorSpecResult<String> {
    opts.validate()?;
    let frame = match opts.frame {
        Some(f) => f,
        None => group
            .bounds()
            .ok_or_else(|| TensorSpecError::degenerate("cannot export an empty group"))?
            .inflate(opts.padding, opts.padding),
    };
    let ppu = opts.px_per_unit;
    let to_doc =
        Affine::scale(ppu) * Affine::FLIP_Y * Affine::translate(Vec2::new(-frame.x0, -frame.y1));
    let w = pixel_extent(frame.width() * ppu);
    let h = pixel_extent(frame.height() * ppu);

    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    );
    if let Some(bg) = opts.background {
        let _ = writeln!(
            out,
            r#"<rect width="100%" height="100%" fill="{}" fill-opacity="{:.3}"/>"#,
            bg.to_hex(),
            bg.a
        );
    }
    for item in &group.items {
        match item {
            Primitive::Cell(c) => write_path(
                &mut out,
                to_doc * c.to_path(),
                Some(c.fill),
                Some((c.stroke, c.stroke_width * ppu)),
            ),
            Primitive::Path(p) => write_path(
                &mut out,
                to_doc * p.path.clone(),
                p.fill,
                p.stroke.map(|(c, sw)| (c, sw * ppu)),
            ),
            Primitive::Polyline(p) => {
                write_path(
                    &mut out,
                    to_doc * p.to_path(),
                    None,
                    Some((p.stroke, p.stroke_width * ppu)),
                );
                if let Some(tip) = &p.arrow_tip {
                    write_path(&mut out, to_doc * tip.to_path(), Some(p.stroke), None);
                }
            }
            Primitive::Text(t) => write_text(&mut out, t, to_doc, &opts.font_family),
        }
    }
    out.push_str("</svg>\n");
    Ok(out)
}

/// Whole pixels covering `v`, tolerant of float noise just above an integer.
fn pixel_extent(v: f64) -> u32 {
    (v - 1e-6).ceil().max(1.0) as u32
}

fn write_path(out: &mut String, path: BezPath, fill: Option<Rgba>, stroke: Option<(Rgba, f64)>) {
    if path.elements().is_empty() {
        return;
    }
    let _ = write!(out, r#"<path d="{}""#, path.to_svg());
    match fill {
        Some(c) => {
            let _ = write!(out, r#" fill="{}" fill-opacity="{:.3}""#, c.to_hex(), c.a);
        }
        None => out.push_str(r#" fill="none""#),
    }
    if let Some((c, width)) = stroke {
        let _ = write!(
            out,
            r#" stroke="{}" stroke-opacity="{:.3}" stroke-width="{width:.3}" stroke-linejoin="round""#,
            c.to_hex(),
            c.a
        );
    }
    out.push_str("/>\n");
}

fn write_text(out: &mut String, t: &TextLabel, to_doc: Affine, font_family: &str) {
    let mut placed = t.clone();
    placed.transform(to_doc);
    let _ = writeln!(
        out,
        r#"<text x="{:.3}" y="{:.3}" font-family="{}" font-size="{:.3}" textLength="{:.3}" lengthAdjust="spacingAndGlyphs" text-anchor="middle" dominant-baseline="central" fill="{}" fill-opacity="{:.3}">{}</text>"#,
        placed.center.x,
        placed.center.y,
        escape(font_family),
        placed.height,
        placed.width,
        t.color.to_hex(),
        t.color.a,
        escape(&t.text)
    );
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg.rs"]
mod tests;
