use rand::Rng;

use crate::foundation::error::{TensorSpecError, TensorSpecResult};

/// Number of elements in `shape`, rejecting empty shapes, zero dimensions and overflow.
fn element_count(shape: &[usize]) -> TensorSpecResult<usize> {
    if shape.is_empty() {
        return Err(TensorSpecError::shape("tensor rank must be >= 1"));
    }
    if shape.contains(&0) {
        return Err(TensorSpecError::shape(format!(
            "tensor dimensions must be >= 1, got {shape:?}"
        )));
    }
    shape
        .iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .ok_or_else(|| {
            TensorSpecError::shape(format!("tensor shape {shape:?} overflows the element count"))
        })
}

/// Dense row-major tensor of `f64` values.
///
/// Matrix builders expect rank 4 `(batch, channel, height, width)`; the distribution plot accepts
/// any rank and flattens. Tensors are immutable once built.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Tensor {
    shape: Vec<usize>,
    data: Vec<f64>,
}

impl Tensor {
    /// Build a tensor from a shape and row-major values.
    pub fn new(shape: impl Into<Vec<usize>>, data: Vec<f64>) -> TensorSpecResult<Self> {
        let shape = shape.into();
        let expected = element_count(&shape)?;
        if expected != data.len() {
            return Err(TensorSpecError::shape(format!(
                "shape {shape:?} needs {expected} values, got {}",
                data.len()
            )));
        }
        Ok(Self { shape, data })
    }

    /// Build a tensor where every element is `f(index)`.
    pub fn from_fn(
        shape: impl Into<Vec<usize>>,
        mut f: impl FnMut(&[usize]) -> f64,
    ) -> TensorSpecResult<Self> {
        let shape = shape.into();
        let len = element_count(&shape)?;
        let mut idx = vec![0usize; shape.len()];
        let mut data = Vec::with_capacity(len);
        for _ in 0..len {
            data.push(f(&idx));
            for axis in (0..shape.len()).rev() {
                idx[axis] += 1;
                if idx[axis] < shape[axis] {
                    break;
                }
                idx[axis] = 0;
            }
        }
        Self::new(shape, data)
    }

    /// Uniform random values in `[0, 1)`.
    pub fn random(shape: impl Into<Vec<usize>>, rng: &mut impl Rng) -> TensorSpecResult<Self> {
        let shape = shape.into();
        let len = element_count(&shape)?;
        let data = (0..len).map(|_| rng.random::<f64>()).collect();
        Self::new(shape, data)
    }

    /// Every element set to `value`.
    pub fn filled(shape: impl Into<Vec<usize>>, value: f64) -> TensorSpecResult<Self> {
        let shape = shape.into();
        let len = element_count(&shape)?;
        Self::new(shape, vec![value; len])
    }

    /// Parse nested JSON arrays such as `[[[1, 2], [3, 4]]]`.
    ///
    /// Every array at the same depth must have the same length and all leaves must be numbers.
    pub fn from_json(value: &serde_json::Value) -> TensorSpecResult<Self> {
        let mut shape = Vec::new();
        let mut cursor = value;
        while let serde_json::Value::Array(items) = cursor {
            shape.push(items.len());
            match items.first() {
                Some(first) => cursor = first,
                None => break,
            }
        }
        if shape.is_empty() {
            return Err(TensorSpecError::shape("tensor JSON must be a nested array"));
        }

        let mut data = Vec::with_capacity(element_count(&shape).unwrap_or(0));
        collect_json_leaves(value, &shape, 0, &mut data)?;
        Self::new(shape, data)
    }

    /// Parse a tensor from JSON text.
    pub fn from_json_str(s: &str) -> TensorSpecResult<Self> {
        let value: serde_json::Value = serde_json::from_str(s)
            .map_err(|e| TensorSpecError::shape(format!("parse tensor JSON: {e}")))?;
        Self::from_json(&value)
    }

    /// Dimension sizes.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of axes.
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Total element count.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always `false`: zero-sized dimensions are rejected at construction.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Flattened row-major values.
    pub fn values(&self) -> &[f64] {
        &self.data
    }

    /// Element at a full multi-index.
    pub fn get(&self, index: &[usize]) -> TensorSpecResult<f64> {
        if index.len() != self.shape.len() {
            return Err(TensorSpecError::shape(format!(
                "index rank {} does not match tensor rank {}",
                index.len(),
                self.shape.len()
            )));
        }
        let mut offset = 0usize;
        for (axis, (&i, &dim)) in index.iter().zip(&self.shape).enumerate() {
            if i >= dim {
                return Err(TensorSpecError::shape(format!(
                    "index {i} out of bounds for axis {axis} of size {dim}"
                )));
            }
            offset = offset * dim + i;
        }
        Ok(self.data[offset])
    }

    /// Sub-tensor at position `i` of the leading axis, with that axis removed.
    pub fn batch(&self, i: usize) -> TensorSpecResult<Self> {
        if self.rank() < 2 {
            return Err(TensorSpecError::shape(
                "cannot slice the leading axis of a rank-1 tensor",
            ));
        }
        if i >= self.shape[0] {
            return Err(TensorSpecError::shape(format!(
                "batch {i} out of bounds for leading axis of size {}",
                self.shape[0]
            )));
        }
        let stride = self.data.len() / self.shape[0];
        Self::new(
            self.shape[1..].to_vec(),
            self.data[i * stride..(i + 1) * stride].to_vec(),
        )
    }

    /// Require an exact rank, for builders with fixed expectations.
    pub fn expect_rank(&self, rank: usize) -> TensorSpecResult<()> {
        if self.rank() != rank {
            return Err(TensorSpecError::shape(format!(
                "tensor must be {rank}-dimensional, got rank {} with shape {:?}",
                self.rank(),
                self.shape
            )));
        }
        Ok(())
    }

    /// Smallest and largest element.
    pub fn min_max(&self) -> TensorSpecResult<(f64, f64)> {
        min_max(&self.data)
    }

    /// Min-max normalized copy of the values.
    ///
    /// A constant tensor has no spread; every value maps to `0.5`.
    pub fn normalized(&self) -> TensorSpecResult<Vec<f64>> {
        normalize(&self.data)
    }

    /// Shape without the leading axis, formatted like `(3, 4, 4)`.
    pub fn inner_shape_label(&self) -> String {
        shape_label(self.shape.get(1..).unwrap_or(&[]))
    }
}

/// Format dimensions like `(3, 4, 4)`.
pub fn shape_label(dims: &[usize]) -> String {
    let inner: Vec<String> = dims.iter().map(|d| d.to_string()).collect();
    format!("({})", inner.join(", "))
}

pub(crate) fn min_max(values: &[f64]) -> TensorSpecResult<(f64, f64)> {
    let mut it = values.iter().copied();
    let first = it
        .next()
        .ok_or_else(|| TensorSpecError::degenerate("cannot take min/max of an empty tensor"))?;
    if values.iter().any(|v| !v.is_finite()) {
        return Err(TensorSpecError::degenerate("tensor contains non-finite values"));
    }
    Ok(it.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
}

pub(crate) fn normalize(values: &[f64]) -> TensorSpecResult<Vec<f64>> {
    let (lo, hi) = min_max(values)?;
    let span = hi - lo;
    if span <= 0.0 {
        tracing::warn!(value = lo, "constant tensor, normalizing every value to 0.5");
        return Ok(vec![0.5; values.len()]);
    }
    Ok(values.iter().map(|v| (v - lo) / span).collect())
}

fn collect_json_leaves(
    value: &serde_json::Value,
    shape: &[usize],
    depth: usize,
    out: &mut Vec<f64>,
) -> TensorSpecResult<()> {
    if depth == shape.len() {
        let v = value.as_f64().ok_or_else(|| {
            TensorSpecError::shape(format!("tensor leaf must be a number, got {value}"))
        })?;
        out.push(v);
        return Ok(());
    }
    let items = value.as_array().ok_or_else(|| {
        TensorSpecError::shape(format!("expected nested array at depth {depth}"))
    })?;
    if items.len() != shape[depth] {
        return Err(TensorSpecError::shape(format!(
            "ragged tensor: depth {depth} has length {} but {} was expected",
            items.len(),
            shape[depth]
        )));
    }
    for item in items {
        collect_json_leaves(item, shape, depth + 1, out)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/tensor/tensor.rs"]
mod tests;
