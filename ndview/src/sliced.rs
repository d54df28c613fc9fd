/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::rc::Rc;

use itertools::izip;

use crate::layout::Layout;
use crate::layout::LayoutMap;
use crate::shape::ShapeError;
use crate::slice::Slice;
use crate::slice::span;

/// How one parent axis is seen through a slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    /// The axis is fixed at this parent coordinate and removed.
    Index(usize),
    /// The axis is retained: coordinate `j` maps onto parent
    /// coordinate `start + j × step`, for `j < len`.
    Range { start: isize, step: isize, len: usize },
}

/// A layout derived by applying one [`Slice`] per axis to a parent
/// layout, without copying anything.
///
/// The parent is shared, not owned: several views sliced from the
/// same view all point at the same parent layout. Axes beyond the
/// given slices pass through unchanged, as if sliced with `:`.
///
/// ```
/// use std::rc::Rc;
///
/// use ndview::Layout;
/// use ndview::Shape;
/// use ndview::SlicedShape;
/// use ndview::slice::parse;
///
/// let parent = Rc::new(Layout::from(Shape::new(vec![3, 4]).unwrap()));
/// let sliced = SlicedShape::compose(parent, &parse("1, ::-2").unwrap()).unwrap();
/// assert_eq!(sliced.sizes(), &[2]);
/// assert_eq!(sliced.offset_of(&[0]).unwrap(), 7);
/// assert_eq!(sliced.offset_of(&[1]).unwrap(), 5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SlicedShape {
    parent: Rc<Layout>,
    slices: Vec<Slice>,
    axes: Vec<Axis>,
    sizes: Vec<usize>,
}

impl SlicedShape {
    /// Resolve `slices` against the axes of `parent`.
    ///
    /// # Errors
    /// * `TooManySlices` if there are more slices than parent axes
    /// * `IndexOutOfRange` if an index slice, after wraparound, falls
    ///   outside its axis
    /// * `SliceError` if a slice has a zero step
    pub fn compose(parent: Rc<Layout>, slices: &[Slice]) -> Result<Self, ShapeError> {
        let rank = parent.rank();
        if slices.len() > rank {
            return Err(ShapeError::TooManySlices {
                slices: slices.len(),
                rank,
            });
        }

        let mut slices = slices.to_vec();
        slices.resize(rank, Slice::full());

        let mut axes = Vec::with_capacity(rank);
        let mut sizes = Vec::with_capacity(rank);
        for (axis, slice, &size) in izip!(0.., &slices, parent.sizes()) {
            let (start, stop, step) = slice.resolve(size)?;
            if slice.is_index() {
                if start < 0 || start >= size as isize {
                    return Err(ShapeError::IndexOutOfRange {
                        index: slice.start().unwrap_or(0),
                        axis,
                        size,
                    });
                }
                axes.push(Axis::Index(start as usize));
            } else {
                let len = span(start, stop, step);
                axes.push(Axis::Range { start, step, len });
                sizes.push(len);
            }
        }

        Ok(Self {
            parent,
            slices,
            axes,
            sizes,
        })
    }

    /// The layout being sliced.
    pub fn parent(&self) -> &Rc<Layout> {
        &self.parent
    }

    /// The slices applied to the parent, one per parent axis.
    pub fn slices(&self) -> &[Slice] {
        &self.slices
    }

    /// The sizes of the retained axes.
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    pub fn rank(&self) -> usize {
        self.sizes.len()
    }

    pub fn len(&self) -> usize {
        self.sizes.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Map a coordinate over the retained axes back onto a full parent
    /// coordinate, then delegate to the parent.
    ///
    /// Collapsed axes take their fixed index; each retained axis maps
    /// `j` to `start + j × step`. Missing trailing coordinates are
    /// taken as zero, addressing the start of the sub-volume.
    pub fn offset_of(&self, coord: &[usize]) -> Result<usize, ShapeError> {
        if coord.len() > self.rank() {
            return Err(ShapeError::InvalidDims {
                expected: self.rank(),
                got: coord.len(),
            });
        }

        let mut retained = 0;
        let mut parent_coord = Vec::with_capacity(self.axes.len());
        for axis in &self.axes {
            match *axis {
                Axis::Index(index) => parent_coord.push(index),
                Axis::Range { start, step, len } => {
                    let index = coord.get(retained).copied().unwrap_or(0);
                    if index >= len {
                        return Err(ShapeError::IndexOutOfRange {
                            index: index as isize,
                            axis: retained,
                            size: len,
                        });
                    }
                    // In bounds by construction: `start + j × step`
                    // stays within the clamped resolved range.
                    parent_coord.push((start + index as isize * step) as usize);
                    retained += 1;
                }
            }
        }
        self.parent.offset_of(&parent_coord)
    }
}
