use std::sync::Arc;

use crate::{Element, contiguous_strides, unravel_index};

/// Errors raised while building a [tensor](Tensor).
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TensorError {
    /// The buffer length doesn't match the number of elements implied by the shape.
    #[error("Shape {shape:?} requires {expected} values, but the buffer holds {actual}")]
    ShapeDataMismatch {
        /// Requested shape.
        shape: Vec<usize>,
        /// Number of stored values the shape requires.
        expected: usize,
        /// Number of stored values provided.
        actual: usize,
    },
    /// The byte buffer isn't a whole number of elements.
    #[error("{len} bytes can't be read as elements of {elem_size} bytes")]
    ByteLength {
        /// Length of the byte buffer.
        len: usize,
        /// Size of one element.
        elem_size: usize,
    },
}

/// An immutable, contiguous, row-major N-dimensional array.
///
/// The storage is reference counted, so cloning a tensor is cheap and clones can be read
/// from any number of threads at once. Complex-valued tensors store interleaved
/// `(re, im)` pairs; their shape counts complex elements.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor<E: Element> {
    data: Arc<[E]>,
    shape: Vec<usize>,
    strides: Vec<usize>,
    complex: bool,
}

impl<E: Element> Tensor<E> {
    /// Create a real-valued tensor from its row-major values.
    pub fn new(data: Vec<E>, shape: Vec<usize>) -> Result<Self, TensorError> {
        Self::build(data, shape, false)
    }

    /// Create a complex-valued tensor from interleaved `(re, im)` values.
    pub fn complex(data: Vec<E>, shape: Vec<usize>) -> Result<Self, TensorError> {
        Self::build(data, shape, true)
    }

    /// Create a rank-1 tensor.
    pub fn vector(data: Vec<E>) -> Self {
        let shape = vec![data.len()];
        Self::from_parts(data, shape, false)
    }

    /// Create a rank-0 tensor holding a single value.
    pub fn scalar(value: E) -> Self {
        Self::from_parts(vec![value], vec![], false)
    }

    /// Create a real-valued tensor where every element is `value`.
    pub fn filled(value: E, shape: Vec<usize>) -> Self {
        let len = shape.iter().product();
        Self::from_parts(vec![value; len], shape, false)
    }

    /// Read a real-valued tensor from native-endian bytes.
    pub fn from_bytes(bytes: &[u8], shape: Vec<usize>) -> Result<Self, TensorError> {
        let elem_size = size_of::<E>();
        if bytes.len() % elem_size != 0 {
            return Err(TensorError::ByteLength {
                len: bytes.len(),
                elem_size,
            });
        }
        Self::new(bytemuck::pod_collect_to_vec(bytes), shape)
    }

    fn build(data: Vec<E>, shape: Vec<usize>, complex: bool) -> Result<Self, TensorError> {
        let components = if complex { 2 } else { 1 };
        let expected = shape.iter().product::<usize>() * components;
        if data.len() != expected {
            return Err(TensorError::ShapeDataMismatch {
                shape,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self::from_parts(data, shape, complex))
    }

    fn from_parts(data: Vec<E>, shape: Vec<usize>, complex: bool) -> Self {
        let strides = contiguous_strides(&shape);
        Self {
            data: data.into(),
            shape,
            strides,
            complex,
        }
    }

    /// The shape of the tensor.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// The row-major strides of the tensor, in elements.
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// The number of axes.
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// The number of logical elements (complex elements count once).
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    /// Whether the tensor has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the tensor holds complex values.
    pub fn is_complex(&self) -> bool {
        self.complex
    }

    /// Whether both tensors have the same shape and the same value kind.
    pub fn same_shape<O: Element>(&self, other: &Tensor<O>) -> bool {
        self.shape == other.shape && self.complex == other.complex
    }

    /// The raw storage.
    pub fn as_slice(&self) -> &[E] {
        &self.data
    }

    /// The raw storage as native-endian bytes.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    /// Read a real element at the given coordinates.
    pub fn get(&self, coordinates: &[usize]) -> Option<E> {
        if self.complex || coordinates.len() != self.rank() {
            return None;
        }
        let mut offset = 0;
        for ((coordinate, dim), stride) in coordinates
            .iter()
            .zip(self.shape.iter())
            .zip(self.strides.iter())
        {
            if coordinate >= dim {
                return None;
            }
            offset += coordinate * stride;
        }
        self.data.get(offset).copied()
    }

    /// Coordinates of the element at the given linear index.
    pub fn coordinates(&self, index: usize) -> Vec<usize> {
        unravel_index(index, &self.shape)
    }

    /// Apply `func` to every stored value, keeping the shape.
    pub fn map<F: Fn(E) -> E>(&self, func: F) -> Self {
        let data = self.data.iter().map(|value| func(*value)).collect::<Vec<_>>();
        Self::from_parts(data, self.shape.clone(), self.complex)
    }

    /// Convert every stored value to another element type.
    pub fn cast<O: Element>(&self) -> Tensor<O> {
        let data = self.data.iter().map(|value| value.cast::<O>()).collect();
        Tensor::from_parts(data, self.shape.clone(), self.complex)
    }

    /// View the same values with another shape.
    pub fn reshape(&self, shape: Vec<usize>) -> Result<Self, TensorError> {
        let len: usize = shape.iter().product();
        if len != self.len() {
            let components = if self.complex { 2 } else { 1 };
            return Err(TensorError::ShapeDataMismatch {
                shape,
                expected: len * components,
                actual: self.data.len(),
            });
        }
        Ok(Self {
            data: self.data.clone(),
            strides: contiguous_strides(&shape),
            shape,
            complex: self.complex,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use half::f16;

    #[test]
    fn new_rejects_wrong_length() {
        let result = Tensor::new(vec![1.0f32, 2.0, 3.0], vec![2, 2]);
        assert_eq!(
            result,
            Err(TensorError::ShapeDataMismatch {
                shape: vec![2, 2],
                expected: 4,
                actual: 3,
            })
        );
    }

    #[test]
    fn complex_counts_pairs() {
        let tensor = Tensor::complex(vec![1.0f64, 0.0, 2.0, -1.0], vec![2]).unwrap();
        assert!(tensor.is_complex());
        assert_eq!(tensor.len(), 2);
        assert_eq!(tensor.get(&[0]), None);
    }

    #[test]
    fn get_uses_row_major_layout() {
        let tensor = Tensor::new((0..6).map(|v| v as f32).collect(), vec![2, 3]).unwrap();
        assert_eq!(tensor.get(&[1, 2]), Some(5.0));
        assert_eq!(tensor.get(&[2, 0]), None);
        assert_eq!(tensor.coordinates(4), vec![1, 1]);
    }

    #[test]
    fn bytes_roundtrip_keeps_values() {
        let tensor = Tensor::vector(vec![f16::from_f32(0.5), f16::NEG_INFINITY]);
        let copy = Tensor::<f16>::from_bytes(tensor.as_bytes(), vec![2]).unwrap();
        assert_eq!(copy, tensor);
        assert_eq!(
            Tensor::<f32>::from_bytes(&[0u8; 3], vec![1]),
            Err(TensorError::ByteLength {
                len: 3,
                elem_size: 4
            })
        );
    }

    #[test]
    fn reshape_shares_storage() {
        let tensor = Tensor::vector(vec![1.0f64, 2.0, 3.0, 4.0]);
        let matrix = tensor.reshape(vec![2, 2]).unwrap();
        assert_eq!(matrix.strides(), &[2, 1]);
        assert_eq!(matrix.get(&[1, 0]), Some(3.0));
        assert!(tensor.reshape(vec![3]).is_err());
    }

    #[test]
    fn scalar_tensor_has_one_element() {
        let tensor = Tensor::scalar(3.0f32);
        assert_eq!(tensor.rank(), 0);
        assert_eq!(tensor.len(), 1);
        assert_eq!(tensor.get(&[]), Some(3.0));
    }
}
