/// `n` evenly spaced samples over `[start, end]`, both ends included.
pub(crate) fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / ((n - 1) as f64);
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * (i as f64) })
                .collect()
        }
    }
}

/// Finite and strictly greater than zero.
pub(crate) fn is_positive(x: f64) -> bool {
    x.is_finite() && x > 0.0
}

pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    (1.0 - t) * a + t * b
}

/// Sample mean and unbiased (n - 1) standard deviation.
pub(crate) fn mean_std(values: &[f64]) -> (f64, f64) {
    let n = values.len();
    if n == 0 {
        return (0.0, 0.0);
    }
    let mean = values.iter().sum::<f64>() / (n as f64);
    if n == 1 {
        return (mean, 0.0);
    }
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / ((n - 1) as f64);
    (mean, var.sqrt())
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
