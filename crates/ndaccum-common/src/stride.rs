//! Stride helpers for row-major tensors.
//!
//! Strides are expressed in element units (not bytes).

/// Canonical contiguous row-major strides for a given shape (in elements).
///
/// Example: shape [R, C] -> strides [C, 1]
pub fn contiguous_strides(shape: &[usize]) -> Vec<usize> {
    if shape.is_empty() {
        return vec![];
    }
    let mut strides = vec![0; shape.len()];
    let mut s = 1usize;
    for (i, dim) in shape.iter().enumerate().rev() {
        strides[i] = s;
        s = s.saturating_mul(*dim.max(&1));
    }
    strides
}

/// Decompose a linear row-major index into per-axis coordinates.
pub fn unravel_index(mut index: usize, shape: &[usize]) -> Vec<usize> {
    let mut coordinates = vec![0; shape.len()];
    for (axis, dim) in shape.iter().enumerate().rev() {
        let dim = (*dim).max(1);
        coordinates[axis] = index % dim;
        index /= dim;
    }
    coordinates
}
