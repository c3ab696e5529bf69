use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;
use image::RgbaImage;

use crate::foundation::error::{TensorSpecError, TensorSpecResult};

/// Default margin kept around trimmed content, in pixels.
pub const TRIM_MARGIN: u32 = 10;
/// Default color distance above which a pixel counts as content.
pub const TRIM_THRESHOLD: f64 = 30.0;

const MAX_DIM: u32 = 16_384;

/// Render SVG text to straight-alpha RGBA8, `scale` output pixels per SVG pixel.
#[tracing::instrument(skip(svg), fields(bytes = svg.len()))]
pub fn rasterize(svg: &str, scale: f32) -> TensorSpecResult<RgbaImage> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(TensorSpecError::validation(format!(
            "raster scale must be > 0, got {scale}"
        )));
    }

    let mut fontdb = usvg::fontdb::Database::new();
    fontdb.load_system_fonts();
    let opts = usvg::Options {
        fontdb: Arc::new(fontdb),
        ..Default::default()
    };
    let tree = usvg::Tree::from_data(svg.as_bytes(), &opts).context("parse svg document")?;

    let size = tree.size();
    let w = (size.width() * scale).ceil().max(1.0) as u32;
    let h = (size.height() * scale).ceil().max(1.0) as u32;
    if w > MAX_DIM || h > MAX_DIM {
        return Err(TensorSpecError::resource(format!(
            "raster size too large: {w}x{h} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(w, h)
        .ok_or_else(|| TensorSpecError::resource("failed to allocate preview pixmap"))?;
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );

    let mut rgba = Vec::with_capacity((w * h * 4) as usize);
    for px in pixmap.pixels() {
        let c = px.demultiply();
        rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    RgbaImage::from_raw(w, h, rgba)
        .ok_or_else(|| TensorSpecError::resource("preview buffer size mismatch"))
}

/// Background color estimated as the per-channel median of the four corner pixels.
pub fn corner_background(img: &RgbaImage) -> [f64; 4] {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return [0.0; 4];
    }
    let corners = [
        img.get_pixel(0, 0).0,
        img.get_pixel(w - 1, 0).0,
        img.get_pixel(0, h - 1).0,
        img.get_pixel(w - 1, h - 1).0,
    ];
    let mut bg = [0.0; 4];
    for (ch, out) in bg.iter_mut().enumerate() {
        let mut v = corners.map(|c| c[ch]);
        v.sort_unstable();
        *out = ((f64::from(v[1]) + f64::from(v[2])) / 2.0).trunc();
    }
    bg
}

/// Crop `img` to the pixels that differ from the corner background by more than `threshold`,
/// keeping `margin` pixels around them.
///
/// An image with no content pixels is returned unchanged.
pub fn trim_margins(img: &RgbaImage, margin: u32, threshold: f64) -> RgbaImage {
    let bg = corner_background(img);
    let mut bbox: Option<(u32, u32, u32, u32)> = None;
    for (x, y, px) in img.enumerate_pixels() {
        let dist = px
            .0
            .iter()
            .zip(bg)
            .map(|(&c, b)| (f64::from(c) - b).powi(2))
            .sum::<f64>()
            .sqrt();
        if dist > threshold {
            bbox = Some(match bbox {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
    }
    let Some((x0, y0, x1, y1)) = bbox else {
        return img.clone();
    };

    let (w, h) = img.dimensions();
    let left = x0.saturating_sub(margin);
    let top = y0.saturating_sub(margin);
    let right = (x1 + 1).saturating_add(margin).min(w);
    let bottom = (y1 + 1).saturating_add(margin).min(h);
    image::imageops::crop_imm(img, left, top, right - left, bottom - top).to_image()
}

/// Write `img` as a PNG file.
pub fn save_png(img: &RgbaImage, path: &Path) -> TensorSpecResult<()> {
    img.save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| image_error(e, format!("write png '{}'", path.display())))
}

/// Trim an image file on disk and write the result to `output`.
pub fn trim_png(input: &Path, output: &Path) -> TensorSpecResult<()> {
    let img = image::open(input)
        .map_err(|e| image_error(e, format!("read image '{}'", input.display())))?
        .to_rgba8();
    save_png(&trim_margins(&img, TRIM_MARGIN, TRIM_THRESHOLD), output)
}

/// Filesystem failures are [`TensorSpecError::Resource`]; codec failures keep their context.
fn image_error(err: image::ImageError, what: String) -> TensorSpecError {
    match err {
        image::ImageError::IoError(e) => TensorSpecError::resource(format!("{what}: {e}")),
        other => anyhow::Error::new(other).context(what).into(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/preview.rs"]
mod tests;
