/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Coordinate-to-offset maps.
//!
//! A view's coordinates are mapped onto its backend through a
//! [`Layout`]: either a dense row-major [`Shape`], or a
//! [`SlicedShape`] that re-maps coordinates through a sequence of
//! slices before delegating to its parent layout. Layouts chain: the
//! parent of a sliced shape may itself be sliced, and at the bottom
//! of every chain is a dense root shape whose size bounds every
//! offset the chain produces.

use std::rc::Rc;

use crate::shape::CartesianIterator;
use crate::shape::Shape;
use crate::shape::ShapeError;
use crate::slice::Slice;
use crate::sliced::SlicedShape;

mod sealed {
    // Only types in this crate can implement `LayoutMap`.
    pub trait Sealed {}
}

/// A map from integer coordinates to flat offsets.
pub trait LayoutMap: sealed::Sealed {
    /// The size of each axis of the domain.
    fn sizes(&self) -> &[usize];

    /// Maps a coordinate (or a prefix of one) to a flat offset.
    fn offset_of(&self, coord: &[usize]) -> Result<usize, ShapeError>;

    /// The number of axes in the domain.
    fn rank(&self) -> usize {
        self.sizes().len()
    }

    /// The number of elements in the domain.
    fn len(&self) -> usize {
        self.sizes().iter().product()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl sealed::Sealed for Shape {}

impl LayoutMap for Shape {
    fn sizes(&self) -> &[usize] {
        Shape::sizes(self)
    }

    fn offset_of(&self, coord: &[usize]) -> Result<usize, ShapeError> {
        Shape::offset_of(self, coord)
    }
}

impl sealed::Sealed for SlicedShape {}

impl LayoutMap for SlicedShape {
    fn sizes(&self) -> &[usize] {
        SlicedShape::sizes(self)
    }

    fn offset_of(&self, coord: &[usize]) -> Result<usize, ShapeError> {
        SlicedShape::offset_of(self, coord)
    }
}

/// The layout of a view.
#[derive(Debug, Clone, PartialEq)]
pub enum Layout {
    /// A dense row-major shape over the whole backend.
    Dense(Shape),
    /// A slice of another layout.
    Sliced(SlicedShape),
}

impl Layout {
    /// Compose `slices` over this layout.
    pub fn slice(self: &Rc<Self>, slices: &[Slice]) -> Result<Self, ShapeError> {
        Ok(Self::Sliced(SlicedShape::compose(Rc::clone(self), slices)?))
    }

    pub fn is_sliced(&self) -> bool {
        matches!(self, Self::Sliced(_))
    }

    /// The dense shape at the bottom of this layout's parent chain.
    pub fn root(&self) -> &Shape {
        match self {
            Self::Dense(shape) => shape,
            Self::Sliced(sliced) => sliced.parent().root(),
        }
    }

    /// The offsets of this layout's elements, in the row-major order
    /// of its own coordinates.
    ///
    /// For a dense shape this is simply `0..len`. For a sliced shape,
    /// coordinates are generated over the reduced sizes and mapped
    /// through [`SlicedShape::offset_of`], so unselected elements of
    /// the parent are skipped.
    pub fn offsets(&self) -> Offsets<'_> {
        match self {
            Self::Dense(shape) => Offsets(OffsetsInner::Dense(shape.iter())),
            Self::Sliced(sliced) => Offsets(OffsetsInner::Sliced {
                layout: sliced,
                coords: CartesianIterator::new(sliced.sizes().to_vec()),
            }),
        }
    }
}

impl sealed::Sealed for Layout {}

impl LayoutMap for Layout {
    fn sizes(&self) -> &[usize] {
        match self {
            Self::Dense(shape) => shape.sizes(),
            Self::Sliced(sliced) => sliced.sizes(),
        }
    }

    fn offset_of(&self, coord: &[usize]) -> Result<usize, ShapeError> {
        match self {
            Self::Dense(shape) => shape.offset_of(coord),
            Self::Sliced(sliced) => sliced.offset_of(coord),
        }
    }
}

impl From<Shape> for Layout {
    fn from(shape: Shape) -> Self {
        Self::Dense(shape)
    }
}

/// Iterator over the offsets of a [`Layout`]. See [`Layout::offsets`].
pub struct Offsets<'a>(OffsetsInner<'a>);

enum OffsetsInner<'a> {
    Dense(std::ops::Range<usize>),
    Sliced {
        layout: &'a SlicedShape,
        coords: CartesianIterator,
    },
}

impl Iterator for Offsets<'_> {
    type Item = Result<usize, ShapeError>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.0 {
            OffsetsInner::Dense(range) => range.next().map(Ok),
            OffsetsInner::Sliced { layout, coords } => {
                let coord = coords.next()?;
                Some(layout.offset_of(&coord))
            }
        }
    }
}
