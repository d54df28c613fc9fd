/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Typed views over linear storage.
//!
//! A [`View`] pairs a [`Layout`] with a [`Backend`]. Reads and writes
//! go through the layout to find a flat offset, then through the
//! backend to reach the element:
//!
//! ```text
//! view.get(coord) = backend.read(layout.offset_of(coord))
//! ```
//!
//! Slicing never copies. It returns a new view over the same backend
//! whose layout is a [`SlicedShape`](crate::SlicedShape) wrapping the
//! original layout:
//!
//! ```
//! use ndview::View;
//!
//! let v = View::with_shape((1..=6).collect::<Vec<i32>>(), vec![2, 3]).unwrap();
//! let row = v.slice_expr("1").unwrap();
//! assert_eq!(row.to_vec().unwrap(), vec![4, 5, 6]);
//!
//! row.set(&[0], 40).unwrap();
//! assert_eq!(v.get(&[1, 0]).unwrap(), 40);
//! ```
//!
//! Reshaping an unsliced view rebinds the backend under a new dense
//! shape. Reshaping a sliced view wraps the sliced view itself as
//! the backend of the new one, so its elements are still never
//! copied; they are observed through both coordinate mappings.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::backend::Backend;
use crate::backend::BackendKind;
use crate::config::PrintOptions;
use crate::layout::Layout;
use crate::layout::LayoutMap;
use crate::layout::Offsets;
use crate::pretty;
use crate::shape::Shape;
use crate::shape::ShapeError;
use crate::shape::unravel;
use crate::slice::Slice;
use crate::slice::SliceError;
use crate::slice::parse;

/// The type of error for view operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ViewError {
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("unsupported backend source for elements of type `{element}`")]
    UnsupportedBackend { element: &'static str },

    #[error("size mismatch: expected {expected} elements, got {got}")]
    SizeMismatch { expected: usize, got: usize },

    #[error("offset {offset} out of range for backend of length {len}")]
    BackendOutOfRange { offset: usize, len: usize },

    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error(transparent)]
    Slice(#[from] SliceError),
}

/// A typed, non-owning, multidimensional view of a [`Backend`].
///
/// Views are cheap to clone: both the layout and the backend are
/// shared handles. The element type is never inspected; it only
/// needs to be [`Clone`] so that reads can return values.
pub struct View<T> {
    layout: Rc<Layout>,
    backend: Backend<T>,
}

impl<T> View<T> {
    fn bind(backend: Backend<T>, layout: Layout) -> Self {
        tracing::trace!(
            kind = ?backend.kind(),
            sizes = ?layout.sizes(),
            sliced = layout.is_sliced(),
            "binding view to backend"
        );
        Self {
            layout: Rc::new(layout),
            backend,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// The size of each axis.
    pub fn sizes(&self) -> &[usize] {
        self.layout.sizes()
    }

    pub fn rank(&self) -> usize {
        self.layout.rank()
    }

    /// The number of elements in the view (not in its backend).
    pub fn len(&self) -> usize {
        self.layout.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_sliced(&self) -> bool {
        self.layout.is_sliced()
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }
}

impl<T: Clone> View<T> {
    /// Create a one-dimensional view over all of `source`.
    pub fn new(source: impl Into<Backend<T>>) -> Self {
        let backend = source.into();
        let shape = Shape::vector(backend.len());
        Self::bind(backend, shape.into())
    }

    /// Create a view of the given sizes over `source`. The number of
    /// elements must match the backend's length.
    pub fn with_shape(
        source: impl Into<Backend<T>>,
        sizes: impl Into<Vec<usize>>,
    ) -> Result<Self, ViewError> {
        let backend = source.into();
        let shape = Shape::new(sizes)?;
        if shape.len() != backend.len() {
            return Err(ViewError::SizeMismatch {
                expected: backend.len(),
                got: shape.len(),
            });
        }
        Ok(Self::bind(backend, shape.into()))
    }

    /// Create a one-dimensional view over a type-erased source. See
    /// [`Backend::from_any`] for the recognized kinds.
    pub fn from_any(source: Box<dyn Any>) -> Result<Self, ViewError>
    where
        T: 'static,
    {
        Ok(Self::new(Backend::from_any(source)?))
    }

    /// The element at `coord`.
    pub fn get(&self, coord: &[usize]) -> Result<T, ViewError> {
        let offset = self.layout.offset_of(coord)?;
        self.backend.read(offset)
    }

    /// Replace the element at `coord`. On a read-only backend this
    /// does nothing.
    pub fn set(&self, coord: &[usize], value: T) -> Result<(), ViewError> {
        let offset = self.layout.offset_of(coord)?;
        self.backend.write(offset, value)
    }

    /// Write `values` to consecutive backend offsets, starting at the
    /// offset of `coord`.
    ///
    /// Only the starting coordinate is checked against the layout.
    /// The values then run on through the backend's own storage order,
    /// so on a sliced view they may land outside the slice; writing
    /// past the end of the backend fails at that point, after the
    /// earlier values have been written.
    pub fn set_values(
        &self,
        coord: &[usize],
        values: impl IntoIterator<Item = T>,
    ) -> Result<(), ViewError> {
        let start = self.layout.offset_of(coord)?;
        for (offset, value) in (start..).zip(values) {
            self.backend.write(offset, value)?;
        }
        Ok(())
    }

    /// The element at row-major position `index` of this view.
    pub(crate) fn get_flat(&self, index: usize) -> Result<T, ViewError> {
        let coord = self.unravel(index)?;
        self.get(&coord)
    }

    pub(crate) fn set_flat(&self, index: usize, value: T) -> Result<(), ViewError> {
        let coord = self.unravel(index)?;
        self.set(&coord, value)
    }

    fn unravel(&self, index: usize) -> Result<Vec<usize>, ViewError> {
        if index >= self.len() {
            return Err(ViewError::BackendOutOfRange {
                offset: index,
                len: self.len(),
            });
        }
        Ok(unravel(self.sizes(), index))
    }

    /// A view of the elements selected by `slices`, one per leading
    /// axis. Nothing is copied: the result shares this view's backend.
    pub fn slice(&self, slices: &[Slice]) -> Result<Self, ViewError> {
        let layout = self.layout.slice(slices)?;
        Ok(Self::bind(self.backend.clone(), layout))
    }

    /// Parse `expr` (see [`crate::slice::parse`]) and slice by it.
    pub fn slice_expr(&self, expr: &str) -> Result<Self, ViewError> {
        self.slice(&parse(expr)?)
    }

    /// A view of the same elements with new sizes. The element count
    /// must not change.
    ///
    /// An unsliced view is rebound to its backend under a dense shape
    /// of the new sizes, so the count must also match the backend's
    /// current length (a shared list may have been resized since the
    /// view was bound). A sliced view becomes the backend of the
    /// result, which reads it in row-major order.
    pub fn reshape(&self, sizes: impl Into<Vec<usize>>) -> Result<Self, ViewError> {
        let shape = Shape::new(sizes)?;
        if shape.len() != self.len() {
            return Err(ViewError::SizeMismatch {
                expected: self.len(),
                got: shape.len(),
            });
        }
        let backend = match *self.layout {
            Layout::Dense(_) => {
                if shape.len() != self.backend.len() {
                    return Err(ViewError::SizeMismatch {
                        expected: self.backend.len(),
                        got: shape.len(),
                    });
                }
                self.backend.clone()
            }
            Layout::Sliced(_) => {
                tracing::trace!(
                    from = ?self.sizes(),
                    to = ?shape.sizes(),
                    "reshaping sliced view through a nested view backend"
                );
                Backend::View(Rc::new(self.clone()))
            }
        };
        Ok(Self::bind(backend, shape.into()))
    }

    /// Iterate over the elements in the row-major order of this
    /// view's own coordinates. Each call starts a fresh traversal.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            view: self,
            offsets: self.layout.offsets(),
        }
    }

    /// Collect the elements in row-major order.
    pub fn to_vec(&self) -> Result<Vec<T>, ViewError> {
        self.iter().collect()
    }

    /// Render this view as nested brackets. See [`PrintOptions`].
    /// Fails on the first element that cannot be read.
    pub fn render(&self, opts: &PrintOptions) -> Result<String, ViewError>
    where
        T: fmt::Display,
    {
        pretty::render(self, opts)
    }
}

impl View<isize> {
    /// The integers `0..stop`, as a one-dimensional view. A negative
    /// `stop` is swapped with `0`, as in [`View::range`].
    pub fn arange(stop: isize) -> Self {
        let (start, stop) = if stop < 0 { (stop, 0) } else { (0, stop) };
        Self::new((start..stop).collect::<Vec<_>>().into_boxed_slice())
    }

    /// The integers `start, start + step, ...` below `stop`, as a
    /// one-dimensional view.
    ///
    /// If `stop < start`, the two bounds are swapped and the sequence
    /// is still generated in ascending order: `range(5, 2, 1)` yields
    /// `[2, 3, 4]`. Fails with [`ViewError::InvalidArgument`] if
    /// `step < 1`.
    pub fn range(start: isize, stop: isize, step: isize) -> Result<Self, ViewError> {
        if step < 1 {
            return Err(ViewError::InvalidArgument {
                reason: format!("range step must be positive, got {}", step),
            });
        }
        let (start, stop) = if stop < start {
            (stop, start)
        } else {
            (start, stop)
        };
        let values: Box<[isize]> = (start..stop).step_by(step as usize).collect();
        Ok(Self::new(values))
    }
}

impl<T> Clone for View<T> {
    fn clone(&self) -> Self {
        Self {
            layout: Rc::clone(&self.layout),
            backend: self.backend.clone(),
        }
    }
}

impl<T> fmt::Debug for View<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("sizes", &self.sizes())
            .field("sliced", &self.is_sliced())
            .field("backend", &self.backend)
            .finish()
    }
}

/// Renders with [`PrintOptions::default`]; the alternate flag
/// (`{:#}`) renders flat. Elements that cannot be read are shown as
/// `<error>` in place; use [`View::render`] to fail instead.
impl<T: Clone + fmt::Display> fmt::Display for View<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let opts = PrintOptions {
            flat: f.alternate(),
        };
        f.write_str(&pretty::render_lossy(self, &opts))
    }
}

/// Iterator over the elements of a [`View`]. See [`View::iter`].
pub struct Iter<'a, T> {
    view: &'a View<T>,
    offsets: Offsets<'a>,
}

impl<T: Clone> Iterator for Iter<'_, T> {
    type Item = Result<T, ViewError>;

    fn next(&mut self) -> Option<Self::Item> {
        let offset = self.offsets.next()?;
        Some(
            offset
                .map_err(ViewError::from)
                .and_then(|offset| self.view.backend.read(offset)),
        )
    }
}

impl<'a, T: Clone> IntoIterator for &'a View<T> {
    type Item = Result<T, ViewError>;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
