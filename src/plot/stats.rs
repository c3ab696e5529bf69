use std::f64::consts::PI;

use crate::foundation::error::{TensorSpecError, TensorSpecResult};
use crate::foundation::math::{is_positive, linspace, mean_std};

/// Bin counts over equal-width bins.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Histogram {
    /// `counts.len() + 1` ascending bin edges.
    pub edges: Vec<f64>,
    /// Samples per bin.
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Count `values` into `bins` equal-width bins over `[lo, hi]`.
    ///
    /// Bins are half-open except the last, which also includes `hi`. Values outside the
    /// range are ignored.
    pub fn new(values: &[f64], bins: usize, lo: f64, hi: f64) -> TensorSpecResult<Self> {
        if bins == 0 {
            return Err(TensorSpecError::validation("histogram needs at least one bin"));
        }
        if !lo.is_finite() || !hi.is_finite() || hi <= lo {
            return Err(TensorSpecError::validation(format!(
                "histogram range must be finite and increasing, got [{lo}, {hi}]"
            )));
        }
        let edges = linspace(lo, hi, bins + 1);
        let mut counts = vec![0usize; bins];
        for &v in values {
            if !(lo..=hi).contains(&v) {
                continue;
            }
            let upper = edges.partition_point(|e| *e <= v);
            let idx = upper.saturating_sub(1).min(bins - 1);
            counts[idx] += 1;
        }
        Ok(Self { edges, counts })
    }

    /// Number of bins.
    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    /// Tallest bin count.
    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Total samples counted.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// One-dimensional Gaussian kernel density estimate.
#[derive(Clone, Debug, PartialEq)]
pub struct GaussianKde {
    samples: Vec<f64>,
    bandwidth: f64,
}

impl GaussianKde {
    /// Estimate with bandwidth `factor * std(samples)`.
    ///
    /// Samples without spread would give a zero bandwidth; `fallback` is used instead.
    pub fn new(samples: &[f64], factor: f64, fallback: f64) -> TensorSpecResult<Self> {
        if samples.is_empty() {
            return Err(TensorSpecError::degenerate("density estimate needs samples"));
        }
        if !is_positive(factor) || !is_positive(fallback) {
            return Err(TensorSpecError::validation(
                "bandwidth factor and fallback must be > 0",
            ));
        }
        let (_, std) = mean_std(samples);
        let bandwidth = if is_positive(std) {
            factor * std
        } else {
            tracing::warn!(fallback, "samples have no spread, using fallback bandwidth");
            fallback
        };
        Ok(Self {
            samples: samples.to_vec(),
            bandwidth,
        })
    }

    /// Kernel standard deviation.
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Density at `x`.
    pub fn evaluate(&self, x: f64) -> f64 {
        let h = self.bandwidth;
        let norm = 1.0 / ((self.samples.len() as f64) * h * (2.0 * PI).sqrt());
        self.samples
            .iter()
            .map(|s| {
                let z = (x - s) / h;
                (-0.5 * z * z).exp()
            })
            .sum::<f64>()
            * norm
    }
}

#[cfg(test)]
#[path = "../../tests/unit/plot/stats.rs"]
mod tests;
