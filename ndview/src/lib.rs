/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Strided multidimensional views over linear storage.
//!
//! Provides [`View`], a typed, zero-copy handle that maps
//! multidimensional coordinates onto flat offsets of a [`Backend`]
//! through a [`Layout`]. Layouts are either a dense row-major
//! [`Shape`] or a [`SlicedShape`] composing [`Slice`]s over another
//! layout, so views can be sliced and reshaped without copying any
//! elements.
//!
//! ```
//! use ndview::View;
//!
//! let v = View::with_shape((0..12).collect::<Vec<i32>>(), vec![3, 4]).unwrap();
//! let corner = v.slice_expr("1:, ::-2").unwrap();
//! assert_eq!(corner.sizes(), &[2, 2]);
//! assert_eq!(corner.to_vec().unwrap(), vec![7, 5, 11, 9]);
//! assert_eq!(format!("{:#}", corner), "[[7, 5], [11, 9]]");
//! ```

/// Storage kinds a view can be bound to.
pub mod backend;

/// Rendering options.
pub mod config;

/// Coordinate-to-offset maps.
pub mod layout;

mod pretty;

/// Dense row-major shapes.
pub mod shape;

/// Per-axis slices and their compact syntax.
pub mod slice;

mod sliced;

/// Typed views.
pub mod view;

pub use backend::Backend;
pub use backend::BackendKind;
pub use config::PrintOptions;
pub use layout::Layout;
pub use layout::LayoutMap;
pub use layout::Offsets;
pub use shape::Shape;
pub use shape::ShapeError;
pub use slice::Slice;
pub use slice::SliceError;
pub use sliced::SlicedShape;
pub use view::Iter;
pub use view::View;
pub use view::ViewError;

/// Property-based generators for randomized test input.
#[cfg(test)]
pub mod strategy;
