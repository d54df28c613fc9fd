/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Linear storage behind a view.
//!
//! A [`Backend`] is anything a [`View`] can read and write by flat
//! offset. The set of backends is closed: a fixed-size array, a
//! growable list, a read-only list, or another view. The kind is
//! chosen once, when the backend is built (usually through one of
//! the `From` conversions, or [`Backend::from_any`]); views then
//! dispatch on it with a `match`.
//!
//! Backends are shared, not copied: cloning a backend clones a
//! reference-counted handle, so every view sliced or reshaped from
//! another observes the same elements, including writes made through
//! a handle the caller kept.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::view::View;
use crate::view::ViewError;

/// The kind of a [`Backend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    Array,
    List,
    ReadOnly,
    View,
}

/// Storage addressed by flat offset.
pub enum Backend<T> {
    /// A fixed-size array.
    Array(Rc<RefCell<Box<[T]>>>),
    /// A growable list. Its length may change after views are built
    /// over it; offsets past the current end fail to resolve.
    List(Rc<RefCell<Vec<T>>>),
    /// A read-only list. Writes are silently ignored.
    ReadOnly(Rc<[T]>),
    /// Another view. Offset `i` addresses the `i`-th element of that
    /// view in its own row-major order.
    View(Rc<View<T>>),
}

impl<T> Backend<T> {
    pub fn kind(&self) -> BackendKind {
        match self {
            Self::Array(_) => BackendKind::Array,
            Self::List(_) => BackendKind::List,
            Self::ReadOnly(_) => BackendKind::ReadOnly,
            Self::View(_) => BackendKind::View,
        }
    }

    /// The number of addressable elements.
    pub fn len(&self) -> usize {
        match self {
            Self::Array(array) => array.borrow().len(),
            Self::List(list) => list.borrow().len(),
            Self::ReadOnly(list) => list.len(),
            Self::View(view) => view.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn out_of_range(&self, offset: usize) -> ViewError {
        ViewError::BackendOutOfRange {
            offset,
            len: self.len(),
        }
    }
}

impl<T: Clone> Backend<T> {
    /// Read the element at `offset`.
    pub fn read(&self, offset: usize) -> Result<T, ViewError> {
        let value = match self {
            Self::Array(array) => array.borrow().get(offset).cloned(),
            Self::List(list) => list.borrow().get(offset).cloned(),
            Self::ReadOnly(list) => list.get(offset).cloned(),
            Self::View(view) => return view.get_flat(offset),
        };
        value.ok_or_else(|| self.out_of_range(offset))
    }

    /// Write `value` at `offset`. This is a no-op for read-only
    /// backends, which never fail.
    pub fn write(&self, offset: usize, value: T) -> Result<(), ViewError> {
        let slot_written = match self {
            Self::Array(array) => array
                .borrow_mut()
                .get_mut(offset)
                .map(|slot| *slot = value)
                .is_some(),
            Self::List(list) => list
                .borrow_mut()
                .get_mut(offset)
                .map(|slot| *slot = value)
                .is_some(),
            Self::ReadOnly(_) => true,
            Self::View(view) => return view.set_flat(offset, value),
        };
        if slot_written {
            Ok(())
        } else {
            Err(self.out_of_range(offset))
        }
    }
}

impl<T: Clone + 'static> Backend<T> {
    /// Build a backend from a type-erased source.
    ///
    /// Recognized sources are `Vec<T>`, `Box<[T]>`, `Rc<[T]>`, the
    /// shared handles `Rc<RefCell<Vec<T>>>` and
    /// `Rc<RefCell<Box<[T]>>>`, and `View<T>`. Anything else fails
    /// with [`ViewError::UnsupportedBackend`].
    pub fn from_any(source: Box<dyn Any>) -> Result<Self, ViewError> {
        let source = match source.downcast::<Vec<T>>() {
            Ok(list) => return Ok(Self::from(*list)),
            Err(source) => source,
        };
        let source = match source.downcast::<Box<[T]>>() {
            Ok(array) => return Ok(Self::from(*array)),
            Err(source) => source,
        };
        let source = match source.downcast::<Rc<[T]>>() {
            Ok(list) => return Ok(Self::from(*list)),
            Err(source) => source,
        };
        let source = match source.downcast::<Rc<RefCell<Vec<T>>>>() {
            Ok(list) => return Ok(Self::from(*list)),
            Err(source) => source,
        };
        let source = match source.downcast::<Rc<RefCell<Box<[T]>>>>() {
            Ok(array) => return Ok(Self::from(*array)),
            Err(source) => source,
        };
        match source.downcast::<View<T>>() {
            Ok(view) => Ok(Self::from(*view)),
            Err(_) => {
                tracing::debug!(
                    element = std::any::type_name::<T>(),
                    "rejecting unsupported backend source"
                );
                Err(ViewError::UnsupportedBackend {
                    element: std::any::type_name::<T>(),
                })
            }
        }
    }
}

impl<T> Clone for Backend<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Array(array) => Self::Array(Rc::clone(array)),
            Self::List(list) => Self::List(Rc::clone(list)),
            Self::ReadOnly(list) => Self::ReadOnly(Rc::clone(list)),
            Self::View(view) => Self::View(Rc::clone(view)),
        }
    }
}

impl<T> fmt::Debug for Backend<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Backend")
            .field("kind", &self.kind())
            .field("len", &self.len())
            .finish()
    }
}

impl<T> From<Vec<T>> for Backend<T> {
    fn from(list: Vec<T>) -> Self {
        Self::List(Rc::new(RefCell::new(list)))
    }
}

impl<T> From<Rc<RefCell<Vec<T>>>> for Backend<T> {
    fn from(list: Rc<RefCell<Vec<T>>>) -> Self {
        Self::List(list)
    }
}

impl<T> From<Box<[T]>> for Backend<T> {
    fn from(array: Box<[T]>) -> Self {
        Self::Array(Rc::new(RefCell::new(array)))
    }
}

impl<T, const N: usize> From<[T; N]> for Backend<T> {
    fn from(array: [T; N]) -> Self {
        Self::from(Box::<[T]>::from(array))
    }
}

impl<T> From<Rc<RefCell<Box<[T]>>>> for Backend<T> {
    fn from(array: Rc<RefCell<Box<[T]>>>) -> Self {
        Self::Array(array)
    }
}

impl<T> From<Rc<[T]>> for Backend<T> {
    fn from(list: Rc<[T]>) -> Self {
        Self::ReadOnly(list)
    }
}

impl<T: Clone> From<&[T]> for Backend<T> {
    fn from(list: &[T]) -> Self {
        Self::ReadOnly(Rc::from(list))
    }
}

impl<T> From<View<T>> for Backend<T> {
    fn from(view: View<T>) -> Self {
        Self::View(Rc::new(view))
    }
}

impl<T> From<Rc<View<T>>> for Backend<T> {
    fn from(view: Rc<View<T>>) -> Self {
        Self::View(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(Backend::from(vec![1, 2]).kind(), BackendKind::List);
        assert_eq!(Backend::from([1, 2]).kind(), BackendKind::Array);
        assert_eq!(
            Backend::from(vec![1, 2].into_boxed_slice()).kind(),
            BackendKind::Array
        );
        assert_eq!(Backend::from(&[1, 2][..]).kind(), BackendKind::ReadOnly);
        assert_eq!(
            Backend::from(Rc::<[i32]>::from(vec![1, 2])).kind(),
            BackendKind::ReadOnly
        );
        assert_eq!(
            Backend::from(View::new(vec![1, 2])).kind(),
            BackendKind::View
        );
    }

    #[test]
    fn test_read_write() {
        for backend in [Backend::from(vec![0, 1, 2]), Backend::from([0, 1, 2])] {
            assert_eq!(backend.len(), 3);
            assert_eq!(backend.read(1).unwrap(), 1);
            backend.write(1, 10).unwrap();
            assert_eq!(backend.read(1).unwrap(), 10);
            assert!(matches!(
                backend.read(3),
                Err(ViewError::BackendOutOfRange { offset: 3, len: 3 })
            ));
            assert!(matches!(
                backend.write(5, 0),
                Err(ViewError::BackendOutOfRange { offset: 5, len: 3 })
            ));
        }
    }

    #[test]
    fn test_read_only_write_is_noop() {
        let backend = Backend::from(&[1, 2, 3][..]);
        backend.write(0, 100).unwrap();
        backend.write(99, 100).unwrap();
        assert_eq!(backend.read(0).unwrap(), 1);
    }

    #[test]
    fn test_shared_handle() {
        let list = Rc::new(RefCell::new(vec![1, 2, 3]));
        let backend = Backend::from(Rc::clone(&list));
        let alias = backend.clone();
        alias.write(2, 30).unwrap();
        assert_eq!(list.borrow()[2], 30);

        list.borrow_mut().push(4);
        assert_eq!(backend.len(), 4);
        assert_eq!(backend.read(3).unwrap(), 4);
    }

    #[test]
    fn test_nested_view_is_row_major() {
        let base = View::with_shape(vec![0, 1, 2, 3, 4, 5], vec![2, 3]).unwrap();
        let column = base.slice_expr(":, 1:").unwrap();
        let backend = Backend::from(column);
        assert_eq!(backend.len(), 4);
        let read: Vec<i32> = (0..4).map(|i| backend.read(i).unwrap()).collect();
        assert_eq!(read, vec![1, 2, 4, 5]);
        backend.write(3, 50).unwrap();
        assert_eq!(base.get(&[1, 2]).unwrap(), 50);
        assert!(matches!(
            backend.read(4),
            Err(ViewError::BackendOutOfRange { offset: 4, len: 4 })
        ));
    }

    #[test]
    fn test_from_any() {
        let sources: Vec<Box<dyn Any>> = vec![
            Box::new(vec![1u8, 2]),
            Box::new(vec![1u8, 2].into_boxed_slice()),
            Box::new(Rc::<[u8]>::from(vec![1u8, 2])),
            Box::new(Rc::new(RefCell::new(vec![1u8, 2]))),
            Box::new(Rc::new(RefCell::new(vec![1u8, 2].into_boxed_slice()))),
            Box::new(View::new(vec![1u8, 2])),
        ];
        let kinds: Vec<BackendKind> = sources
            .into_iter()
            .map(|source| Backend::<u8>::from_any(source).unwrap().kind())
            .collect();
        assert_eq!(
            kinds,
            vec![
                BackendKind::List,
                BackendKind::Array,
                BackendKind::ReadOnly,
                BackendKind::List,
                BackendKind::Array,
                BackendKind::View,
            ]
        );

        assert!(matches!(
            Backend::<u8>::from_any(Box::new("not a buffer")),
            Err(ViewError::UnsupportedBackend { element: "u8" })
        ));
        assert!(matches!(
            Backend::<u8>::from_any(Box::new(vec![1u16])),
            Err(ViewError::UnsupportedBackend { .. })
        ));
    }
}
