use crate::assets::color::{ColorRamp, Rgba};
use crate::foundation::core::{Affine, Edge, Point, Rect};
use crate::foundation::error::{TensorSpecError, TensorSpecResult};
use crate::foundation::math::{is_positive, linspace};
use crate::geometry::shape::{Group, Polyline, TextLabel, Transformable, VectorPath, union_bounds};
use crate::plot::stats::{GaussianKde, Histogram};
use crate::tensor::{Tensor, min_max, normalize};

/// Options for [`DistributionPlot::build`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DistributionOpts {
    /// Histogram bins over `[0, 1]`.
    pub num_bins: usize,
    /// Chart width in scene units.
    pub width: f64,
    /// Chart height in scene units.
    pub height: f64,
    /// Density bandwidth as a fraction of the sample standard deviation.
    pub bandwidth_factor: f64,
    /// Density curve sample count.
    pub curve_samples: usize,
    /// Min/max label text height.
    pub font_size: f64,
    /// Gap between the chart and the min/max labels.
    pub label_buff: f64,
    /// Extra vertical space between stacked batch panels.
    pub panel_spacing: f64,
    /// Bar width as a fraction of the bin width.
    pub bar_width_ratio: f64,
    /// Bar fill opacity.
    pub bar_opacity: f64,
    /// Colors spread across the bars from first to last bin.
    pub bar_colors: Vec<Rgba>,
    /// Density curve and axis color.
    pub line_color: Rgba,
    /// Density curve stroke width.
    pub line_width: f64,
    /// Label color.
    pub label_color: Rgba,
}

impl Default for DistributionOpts {
    fn default() -> Self {
        let hex = |s| Rgba::from_hex(s).unwrap_or(Rgba::WHITE);
        Self {
            num_bins: 100,
            width: 6.0,
            height: 4.0,
            bandwidth_factor: 0.1,
            curve_samples: 1000,
            font_size: 0.3,
            label_buff: 0.2,
            panel_spacing: 1.0,
            bar_width_ratio: 0.6,
            bar_opacity: 0.7,
            bar_colors: ["#003f5c", "#58508d", "#bc5090", "#ff6361", "#ffa600"]
                .into_iter()
                .map(hex)
                .collect(),
            line_color: Rgba::WHITE,
            line_width: 4.0,
            label_color: Rgba::WHITE,
        }
    }
}

impl DistributionOpts {
    /// Reject empty bin/sample counts and non-positive sizes.
    pub fn validate(&self) -> TensorSpecResult<()> {
        if self.num_bins == 0 {
            return Err(TensorSpecError::validation("num_bins must be >= 1"));
        }
        if self.curve_samples < 2 {
            return Err(TensorSpecError::validation("curve_samples must be >= 2"));
        }
        for (name, v) in [
            ("width", self.width),
            ("height", self.height),
            ("bandwidth_factor", self.bandwidth_factor),
            ("font_size", self.font_size),
            ("line_width", self.line_width),
        ] {
            if !is_positive(v) {
                return Err(TensorSpecError::validation(format!("{name} must be > 0")));
            }
        }
        if !(self.bar_width_ratio > 0.0 && self.bar_width_ratio <= 1.0) {
            return Err(TensorSpecError::validation(
                "bar_width_ratio must be within (0, 1]",
            ));
        }
        if !(0.0..=1.0).contains(&self.bar_opacity) {
            return Err(TensorSpecError::validation(
                "bar_opacity must be within [0, 1]",
            ));
        }
        if self.bar_colors.is_empty() {
            return Err(TensorSpecError::validation("bar_colors must not be empty"));
        }
        if self.label_buff < 0.0 || self.panel_spacing < 0.0 {
            return Err(TensorSpecError::validation(
                "label_buff and panel_spacing must be >= 0",
            ));
        }
        Ok(())
    }
}

/// Histogram, density overlay and range labels for one batch element.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct DistributionPanel {
    /// Batch element this panel describes.
    pub batch: usize,
    /// Counts of the normalized values.
    pub histogram: Histogram,
    /// One bar per bin, left to right.
    pub bars: Vec<VectorPath>,
    /// X and y axis lines.
    pub axes: [Polyline; 2],
    /// Density estimate rescaled so its peak meets the tallest bar.
    pub density_curve: Polyline,
    /// Smallest raw value, left-aligned under the chart.
    pub min_label: TextLabel,
    /// Largest raw value, right-aligned under the chart.
    pub max_label: TextLabel,
}

impl Transformable for DistributionPanel {
    fn transform(&mut self, affine: Affine) {
        self.bars.iter_mut().for_each(|b| b.transform(affine));
        self.axes.iter_mut().for_each(|a| a.transform(affine));
        self.density_curve.transform(affine);
        self.min_label.transform(affine);
        self.max_label.transform(affine);
    }

    fn bounds(&self) -> Option<Rect> {
        union_bounds(
            self.bars
                .iter()
                .map(|b| b.bounds())
                .chain(self.axes.iter().map(|a| a.bounds()))
                .chain([
                    self.density_curve.bounds(),
                    self.min_label.bounds(),
                    self.max_label.bounds(),
                ]),
        )
    }
}

/// Per-batch value distributions stacked bottom to top.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct DistributionPlot {
    /// Panels in batch order; batch `i` sits above batch `i - 1`.
    pub panels: Vec<DistributionPanel>,
}

impl Transformable for DistributionPlot {
    fn transform(&mut self, affine: Affine) {
        self.panels.iter_mut().for_each(|p| p.transform(affine));
    }

    fn bounds(&self) -> Option<Rect> {
        union_bounds(self.panels.iter().map(|p| p.bounds()))
    }
}

impl DistributionPlot {
    /// Build one panel per batch element of `tensor`.
    ///
    /// A rank-1 tensor is a single batch; otherwise the leading axis is the batch axis and
    /// the remaining axes are flattened.
    #[tracing::instrument(skip(tensor, opts), fields(shape = ?tensor.shape()))]
    pub fn build(tensor: &Tensor, opts: &DistributionOpts) -> TensorSpecResult<Self> {
        opts.validate()?;
        let batches = if tensor.rank() == 1 {
            vec![tensor.clone()]
        } else {
            (0..tensor.shape()[0])
                .map(|b| tensor.batch(b))
                .collect::<TensorSpecResult<Vec<_>>>()?
        };

        let ramp = ColorRamp::evenly_spaced(&opts.bar_colors)?;
        let mut panels = Vec::with_capacity(batches.len());
        for (i, batch) in batches.iter().enumerate() {
            let mut panel = build_panel(i, batch.values(), opts, &ramp)?;
            let target = Point::new(0.0, i as f64 * (opts.height + opts.panel_spacing));
            panel.move_to(target);
            tracing::debug!(batch = i, "distribution panel built");
            panels.push(panel);
        }
        Ok(Self { panels })
    }

    /// Number of panels.
    pub fn len(&self) -> usize {
        self.panels.len()
    }

    /// `true` when there are no panels.
    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// Flatten into drawable primitives.
    pub fn to_group(&self) -> Group {
        let mut group = Group::new();
        for p in &self.panels {
            for bar in &p.bars {
                group.push(bar.clone());
            }
            for axis in &p.axes {
                group.push(axis.clone());
            }
            group.push(p.density_curve.clone());
            group.push(p.min_label.clone());
            group.push(p.max_label.clone());
        }
        group
    }
}

fn build_panel(
    batch: usize,
    raw: &[f64],
    opts: &DistributionOpts,
    ramp: &ColorRamp,
) -> TensorSpecResult<DistributionPanel> {
    let (lo, hi) = min_max(raw)?;
    let values = normalize(raw)?;
    let bins = opts.num_bins;
    let histogram = Histogram::new(&values, bins, 0.0, 1.0)?;
    let peak = histogram.max_count().max(1) as f64;

    let (w, h) = (opts.width, opts.height);
    let slot = w / bins as f64;
    let bar_w = slot * opts.bar_width_ratio;
    let bars = histogram
        .counts
        .iter()
        .enumerate()
        .filter(|(_, c)| **c > 0)
        .map(|(i, &c)| {
            let x = (i as f64 + 0.5) * slot;
            let top = c as f64 / peak * h;
            let t = if bins > 1 { i as f64 / (bins - 1) as f64 } else { 0.0 };
            VectorPath::rect(
                Rect::new(x - bar_w / 2.0, 0.0, x + bar_w / 2.0, top),
                Some(ramp.sample(t).with_alpha(opts.bar_opacity)),
                None,
            )
        })
        .collect();

    let axis = |to: Point| Polyline {
        points: vec![Point::ORIGIN, to],
        stroke: opts.line_color,
        stroke_width: 2.0,
        arrow_tip: None,
    };
    let axes = [axis(Point::new(w, 0.0)), axis(Point::new(0.0, h))];

    let kde = GaussianKde::new(&values, opts.bandwidth_factor, 1.0 / bins as f64)?;
    let xs = linspace(0.0, 1.0, opts.curve_samples);
    let ys: Vec<f64> = xs.iter().map(|x| kde.evaluate(*x)).collect();
    let y_peak = ys.iter().copied().fold(0.0, f64::max);
    let scale = if y_peak > 0.0 {
        histogram.max_count() as f64 / y_peak
    } else {
        0.0
    };
    let density_curve = Polyline {
        points: xs
            .iter()
            .zip(&ys)
            .map(|(x, y)| Point::new(x * w, y * scale / peak * h))
            .collect(),
        stroke: opts.line_color,
        stroke_width: opts.line_width,
        arrow_tip: None,
    };

    let chart = Rect::new(0.0, 0.0, w, h);
    let mut min_label =
        TextLabel::new(format!("Min: {lo:.2}"), opts.font_size, opts.label_color);
    min_label.next_to(chart, Edge::Down, opts.label_buff);
    min_label.align_left_to(chart.x0);
    let mut max_label =
        TextLabel::new(format!("Max: {hi:.2}"), opts.font_size, opts.label_color);
    max_label.next_to(chart, Edge::Down, opts.label_buff);
    max_label.align_right_to(chart.x1);

    Ok(DistributionPanel {
        batch,
        histogram,
        bars,
        axes,
        density_curve,
        min_label,
        max_label,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/plot/distribution.rs"]
mod tests;
