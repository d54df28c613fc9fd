/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::slice::SliceError;

/// The type of error for shape and layout operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ShapeError {
    #[error("invalid dims: expected at most {expected}, got {got}")]
    InvalidDims { expected: usize, got: usize },

    #[error("index {index} out of range for axis {axis} of size {size}")]
    IndexOutOfRange {
        index: isize,
        axis: usize,
        size: usize,
    },

    #[error("axis {axis} out of range for {rank}-dimensional shape")]
    AxisOutOfRange { axis: usize, rank: usize },

    #[error("{slices} slices exceed dimensionality {rank}")]
    TooManySlices { slices: usize, rank: usize },

    #[error("value {value} not in shape")]
    ValueNotInShape { value: usize },

    #[error("shape {sizes:?} has more elements than can be addressed")]
    SizeOverflow { sizes: Vec<usize> },

    #[error(transparent)]
    SliceError(#[from] SliceError),
}

/// A dense row-major shape: the size of each axis, and the derived
/// strides mapping coordinates onto a flat offset.
///
/// ```
/// use ndview::Shape;
///
/// let s = Shape::new(vec![2, 3, 4]).unwrap();
/// assert_eq!(s.strides(), &[12, 4, 1]);
/// assert_eq!(s.len(), 24);
/// assert_eq!(s.offset_of(&[1, 2, 3]).unwrap(), 23);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawShape")]
pub struct Shape {
    sizes: Vec<usize>,
    strides: Vec<usize>,
}

/// The serialized form of a [`Shape`], checked on the way in.
#[derive(Deserialize)]
struct RawShape {
    sizes: Vec<usize>,
    strides: Vec<usize>,
}

impl TryFrom<RawShape> for Shape {
    type Error = ShapeError;

    fn try_from(raw: RawShape) -> Result<Self, Self::Error> {
        let shape = Self::new(raw.sizes)?;
        if shape.strides != raw.strides {
            return Err(ShapeError::InvalidDims {
                expected: shape.strides.len(),
                got: raw.strides.len(),
            });
        }
        Ok(shape)
    }
}

impl Shape {
    /// Create a new shape of the given sizes in row-major order.
    ///
    /// Fails with [`ShapeError::SizeOverflow`] if the element count,
    /// or any stride, does not fit in a `usize`.
    pub fn new(sizes: impl Into<Vec<usize>>) -> Result<Self, ShapeError> {
        let sizes = sizes.into();
        let overflow = || ShapeError::SizeOverflow {
            sizes: sizes.clone(),
        };
        let mut strides: Vec<usize> = vec![1; sizes.len()];
        for axis in (0..sizes.len().saturating_sub(1)).rev() {
            strides[axis] = strides[axis + 1]
                .checked_mul(sizes[axis + 1])
                .ok_or_else(overflow)?;
        }
        sizes
            .iter()
            .try_fold(1usize, |len, &size| len.checked_mul(size))
            .ok_or_else(overflow)?;
        Ok(Self { sizes, strides })
    }

    /// A one-dimensional shape of `len` elements.
    pub fn vector(len: usize) -> Self {
        Self {
            sizes: vec![len],
            strides: vec![1],
        }
    }

    /// The rank-0 shape, holding a single element.
    pub fn scalar() -> Self {
        Self {
            sizes: Vec::new(),
            strides: Vec::new(),
        }
    }

    /// The number of axes.
    pub fn rank(&self) -> usize {
        self.sizes.len()
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// `strides[i]` is the product of `sizes[i + 1..]`.
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// The total number of elements. This is 1 for a scalar and 0 if
    /// any axis is empty.
    pub fn len(&self) -> usize {
        self.sizes.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The size of the given axis.
    pub fn length(&self, axis: usize) -> Result<usize, ShapeError> {
        self.sizes
            .get(axis)
            .copied()
            .ok_or(ShapeError::AxisOutOfRange {
                axis,
                rank: self.rank(),
            })
    }

    /// Return the flat offset of the provided coordinates:
    /// `Σ coord[i] × strides[i]`.
    ///
    /// Fewer coordinates than the rank address the first element of
    /// the corresponding sub-volume, as if the missing trailing
    /// coordinates were zero.
    pub fn offset_of(&self, coord: &[usize]) -> Result<usize, ShapeError> {
        if coord.len() > self.rank() {
            return Err(ShapeError::InvalidDims {
                expected: self.rank(),
                got: coord.len(),
            });
        }
        let mut offset = 0;
        for (axis, (&index, (&size, &stride))) in coord
            .iter()
            .zip(self.sizes.iter().zip(&self.strides))
            .enumerate()
        {
            if index >= size {
                return Err(ShapeError::IndexOutOfRange {
                    index: index as isize,
                    axis,
                    size,
                });
            }
            offset += index * stride;
        }
        Ok(offset)
    }

    /// Return the coordinates of the provided flat offset. This is the
    /// inverse of [`Shape::offset_of`].
    pub fn coordinates(&self, offset: usize) -> Result<Vec<usize>, ShapeError> {
        if offset >= self.len() {
            return Err(ShapeError::ValueNotInShape { value: offset });
        }
        Ok(unravel(&self.sizes, offset))
    }

    /// The shape's offsets in row-major order: `0..len`.
    pub fn iter(&self) -> std::ops::Range<usize> {
        0..self.len()
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.sizes)
    }
}

impl TryFrom<Vec<usize>> for Shape {
    type Error = ShapeError;

    fn try_from(sizes: Vec<usize>) -> Result<Self, Self::Error> {
        Self::new(sizes)
    }
}

impl<const N: usize> TryFrom<[usize; N]> for Shape {
    type Error = ShapeError;

    fn try_from(sizes: [usize; N]) -> Result<Self, Self::Error> {
        Self::new(sizes)
    }
}

/// The row-major coordinates of `offset` over `sizes`. The caller
/// ensures `offset` is less than the product of `sizes`.
pub(crate) fn unravel(sizes: &[usize], offset: usize) -> Vec<usize> {
    let mut result = vec![0; sizes.len()];
    let mut rest = offset;
    for (axis, &size) in sizes.iter().enumerate().rev() {
        result[axis] = rest % size;
        rest /= size;
    }
    result
}

/// Iterates over all coordinate tuples of a shape in row-major order
/// (last axis varies fastest).
///
/// ```ignore
/// let coords: Vec<_> = CartesianIterator::new(vec![2, 2]).collect();
/// assert_eq!(coords, vec![vec![0, 0], vec![0, 1], vec![1, 0], vec![1, 1]]);
/// ```
///
/// A rank-0 shape yields the empty coordinate once; a shape with an
/// empty axis yields nothing.
#[derive(Debug, Clone)]
pub(crate) struct CartesianIterator {
    sizes: Vec<usize>,
    next: Option<Vec<usize>>,
}

impl CartesianIterator {
    pub(crate) fn new(sizes: Vec<usize>) -> Self {
        let next = if sizes.contains(&0) {
            None
        } else {
            Some(vec![0; sizes.len()])
        };
        Self { sizes, next }
    }
}

impl Iterator for CartesianIterator {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        let mut successor = current.clone();
        for axis in (0..successor.len()).rev() {
            successor[axis] += 1;
            if successor[axis] < self.sizes[axis] {
                self.next = Some(successor);
                break;
            }
            successor[axis] = 0;
        }
        Some(current)
    }
}
