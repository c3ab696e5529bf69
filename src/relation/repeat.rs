use crate::foundation::core::DL;
use crate::foundation::error::{TensorSpecError, TensorSpecResult};
use crate::geometry::shape::Transformable;

/// `count` copies of `shape`, the `i`-th shifted by `i * distance` along the down-left diagonal.
///
/// Copies come back to front: the most displaced copy first and the unshifted original last, so
/// drawing in order leaves the original on top. `count == 0` yields no copies; a non-finite
/// `distance` is a [`TensorSpecError::Validation`].
pub fn repeat<T: Transformable + Clone>(
    shape: &T,
    count: usize,
    distance: f64,
) -> TensorSpecResult<Vec<T>> {
    if !distance.is_finite() {
        return Err(TensorSpecError::validation(format!(
            "repeat distance must be finite, got {distance}"
        )));
    }
    Ok((0..count)
        .rev()
        .map(|i| {
            let mut copy = shape.clone();
            copy.shift(DL * (i as f64 * distance));
            copy
        })
        .collect())
}

#[cfg(test)]
#[path = "../../tests/unit/relation/repeat.rs"]
mod tests;
