/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Per-axis slice expressions.
//!
//! A [`Slice`] selects a sub-range of one axis with Python-like
//! `start:stop:step` semantics, or fixes a single coordinate along
//! that axis (collapsing it). Slices are written compactly as a
//! comma-separated list, one entry per axis:
//!
//! ```
//! use ndview::Slice;
//! use ndview::slice::parse;
//!
//! let slices = parse("1, 2:8:2, ::-1").unwrap();
//! assert_eq!(
//!     slices,
//!     vec![
//!         Slice::index(1),
//!         Slice::new(Some(2), Some(8), 2).unwrap(),
//!         Slice::new(None, None, -1).unwrap(),
//!     ]
//! );
//! ```
//!
//! Negative `start`/`stop` values count from the end of the axis.
//! They are not interpreted when the slice is built or parsed, only
//! when it is resolved against a concrete axis length (see
//! [`Slice::resolve`]).

/// A parser for the compact slice syntax.
pub mod parse;

/// Conversion of slices back into the compact syntax.
pub mod pretty;

use std::fmt;
use std::str::FromStr;

pub use parse::parse;
pub use pretty::to_compact_syntax;
use serde::Deserialize;
use serde::Serialize;

/// The type of error for slice construction and parsing.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SliceError {
    #[error("invalid slice `{slice}`: step must be nonzero")]
    InvalidSlice { slice: String },

    #[error("cannot parse slice expression `{input}`: {reason}")]
    Parse { input: String, reason: String },
}

/// A `start:stop:step` selection along a single axis, or a single
/// index that removes the axis altogether.
///
/// `start` and `stop` are optional; omitted bounds default to the
/// beginning or end of the axis depending on the sign of `step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slice {
    start: Option<isize>,
    stop: Option<isize>,
    step: isize,
    index: bool,
}

impl Slice {
    /// Create a new range slice. Fails if `step` is zero.
    pub fn new(start: Option<isize>, stop: Option<isize>, step: isize) -> Result<Self, SliceError> {
        let slice = Self::unchecked(start, stop, step);
        slice.validate()?;
        Ok(slice)
    }

    /// The slice `:`, selecting a whole axis.
    pub fn full() -> Self {
        Self::unchecked(None, None, 1)
    }

    /// Fix a single coordinate along an axis. The axis is removed
    /// from the resulting view. Negative values wrap from the end.
    pub fn index(index: isize) -> Self {
        Self {
            start: Some(index),
            stop: None,
            step: 1,
            index: true,
        }
    }

    pub(crate) fn unchecked(start: Option<isize>, stop: Option<isize>, step: isize) -> Self {
        Self {
            start,
            stop,
            step,
            index: false,
        }
    }

    pub fn start(&self) -> Option<isize> {
        self.start
    }

    pub fn stop(&self) -> Option<isize> {
        self.stop
    }

    pub fn step(&self) -> isize {
        self.step
    }

    /// Whether this slice collapses its axis.
    pub fn is_index(&self) -> bool {
        self.index
    }

    /// Whether this slice selects a whole axis unchanged.
    pub fn is_full(&self) -> bool {
        *self == Self::full()
    }

    pub(crate) fn validate(&self) -> Result<(), SliceError> {
        if self.step == 0 {
            return Err(SliceError::InvalidSlice {
                slice: self.to_string(),
            });
        }
        Ok(())
    }

    /// Resolve this slice against an axis of length `len`, returning
    /// concrete `(start, stop, step)` bounds.
    ///
    /// Omitted bounds are filled in first: with a positive step,
    /// `start = 0` and `stop = len`; with a negative step, `start =
    /// len - 1` and `stop = -1` (one before the first element).
    /// Given bounds below zero are translated by `len`, then clamped
    /// to `[0, len]` for positive steps or `[-1, len - 1]` for
    /// negative ones.
    ///
    /// An index slice resolves to `(i, i + 1, 1)` after wraparound
    /// (saturating at `isize::MAX`); it is not clamped, so callers can
    /// detect out-of-range indices.
    pub fn resolve(&self, len: usize) -> Result<(isize, isize, isize), SliceError> {
        self.validate()?;
        let len = len as isize;
        let wrap = |x: isize| if x < 0 { x + len } else { x };

        if self.index {
            let i = wrap(self.start.unwrap_or(0));
            return Ok((i, i.saturating_add(1), 1));
        }

        let (default_start, default_stop, lo, hi) = if self.step > 0 {
            (0, len, 0, len)
        } else {
            (len - 1, -1, -1, len - 1)
        };
        let start = self
            .start
            .map_or(default_start, |start| wrap(start).clamp(lo, hi));
        let stop = self
            .stop
            .map_or(default_stop, |stop| wrap(stop).clamp(lo, hi));
        Ok((start, stop, self.step))
    }
}

/// The number of elements in the resolved half-open range
/// `start..stop` taken every `step`. This is `⌈(stop - start) /
/// step⌉`, or zero when the range runs the wrong way.
pub(crate) fn span(start: isize, stop: isize, step: isize) -> usize {
    let forward = if step > 0 { stop > start } else { start > stop };
    if !forward {
        return 0;
    }
    stop.abs_diff(start).div_ceil(step.unsigned_abs())
}

impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.index {
            return write!(f, "{}", self.start.unwrap_or(0));
        }
        if let Some(start) = self.start {
            write!(f, "{}", start)?;
        }
        write!(f, ":")?;
        if let Some(stop) = self.stop {
            write!(f, "{}", stop)?;
        }
        if self.step != 1 {
            write!(f, ":{}", self.step)?;
        }
        Ok(())
    }
}

impl FromStr for Slice {
    type Err = SliceError;

    /// Parse a single slice, such as `1:-1` or `3`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match parse(s)?.as_slice() {
            [slice] => Ok(*slice),
            slices => Err(SliceError::Parse {
                input: s.to_string(),
                reason: format!("expected a single slice, found {}", slices.len()),
            }),
        }
    }
}

impl From<std::ops::Range<isize>> for Slice {
    fn from(r: std::ops::Range<isize>) -> Self {
        Self::unchecked(Some(r.start), Some(r.end), 1)
    }
}

impl From<std::ops::RangeFrom<isize>> for Slice {
    fn from(r: std::ops::RangeFrom<isize>) -> Self {
        Self::unchecked(Some(r.start), None, 1)
    }
}

impl From<std::ops::RangeTo<isize>> for Slice {
    fn from(r: std::ops::RangeTo<isize>) -> Self {
        Self::unchecked(None, Some(r.end), 1)
    }
}

impl From<std::ops::RangeFull> for Slice {
    fn from(_: std::ops::RangeFull) -> Self {
        Self::full()
    }
}

impl From<isize> for Slice {
    fn from(index: isize) -> Self {
        Self::index(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_defaults() {
        assert_eq!(Slice::full().resolve(10).unwrap(), (0, 10, 1));
        assert_eq!(
            Slice::new(None, None, -1).unwrap().resolve(10).unwrap(),
            (9, -1, -1)
        );
        assert_eq!(
            Slice::new(None, None, -1).unwrap().resolve(0).unwrap(),
            (-1, -1, -1)
        );
    }

    #[test]
    fn test_resolve_negative_and_clamp() {
        assert_eq!(Slice::from(..-1).resolve(10).unwrap(), (0, 9, 1));
        assert_eq!(Slice::from(-3..).resolve(10).unwrap(), (7, 10, 1));
        assert_eq!(Slice::from(5..100).resolve(10).unwrap(), (5, 10, 1));
        assert_eq!(Slice::from(-100..).resolve(10).unwrap(), (0, 10, 1));
        assert_eq!(
            Slice::new(Some(100), Some(-100), -1)
                .unwrap()
                .resolve(10)
                .unwrap(),
            (9, -1, -1)
        );
    }

    #[test]
    fn test_resolve_index() {
        assert_eq!(Slice::index(2).resolve(5).unwrap(), (2, 3, 1));
        assert_eq!(Slice::index(-1).resolve(5).unwrap(), (4, 5, 1));
        // Out-of-range indices are reported by the caller, not clamped.
        assert_eq!(Slice::index(7).resolve(5).unwrap(), (7, 8, 1));
    }

    #[test]
    fn test_zero_step() {
        assert!(matches!(
            Slice::new(Some(1), None, 0),
            Err(SliceError::InvalidSlice { slice }) if slice == "1::0"
        ));
        let deserialized: Slice =
            serde_json::from_str(r#"{"start":null,"stop":null,"step":0,"index":false}"#).unwrap();
        assert!(matches!(
            deserialized.resolve(4),
            Err(SliceError::InvalidSlice { .. })
        ));
    }

    #[test]
    fn test_span() {
        assert_eq!(span(2, 8, 2), 3);
        assert_eq!(span(0, 9, 1), 9);
        assert_eq!(span(9, -1, -1), 10);
        assert_eq!(span(4, -1, -2), 3);
        assert_eq!(span(3, 1, -1), 2);
        assert_eq!(span(5, 5, 1), 0);
        assert_eq!(span(7, 2, 1), 0);
        assert_eq!(span(2, 7, -1), 0);
        assert_eq!(span(0, 10, isize::MAX), 1);
        assert_eq!(span(9, -1, isize::MIN), 1);
        assert_eq!(span(isize::MIN, isize::MAX, 1), usize::MAX);
    }

    #[test]
    fn test_resolve_extreme_values() {
        assert_eq!(
            Slice::index(isize::MAX).resolve(10).unwrap(),
            (isize::MAX, isize::MAX, 1)
        );
        assert_eq!(
            Slice::new(None, None, isize::MAX).unwrap().resolve(10).unwrap(),
            (0, 10, isize::MAX)
        );
        assert_eq!(
            Slice::new(None, None, isize::MIN).unwrap().resolve(10).unwrap(),
            (9, -1, isize::MIN)
        );
        assert_eq!(
            Slice::new(Some(isize::MIN), Some(isize::MAX), 1)
                .unwrap()
                .resolve(10)
                .unwrap(),
            (0, 10, 1)
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Slice::full().to_string(), ":");
        assert_eq!(Slice::index(-2).to_string(), "-2");
        assert_eq!(Slice::from(1..4).to_string(), "1:4");
        assert_eq!(Slice::from(3..).to_string(), "3:");
        assert_eq!(Slice::from(..-1).to_string(), ":-1");
        assert_eq!(Slice::new(None, None, 2).unwrap().to_string(), "::2");
        assert_eq!(Slice::new(Some(8), Some(2), -3).unwrap().to_string(), "8:2:-3");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("2:8:2".parse::<Slice>().unwrap(), Slice::from(2..8).with_step(2));
        assert_eq!("-1".parse::<Slice>().unwrap(), Slice::index(-1));
        assert!(matches!(
            "1,2".parse::<Slice>(),
            Err(SliceError::Parse { .. })
        ));
        assert!(matches!("".parse::<Slice>(), Err(SliceError::Parse { .. })));
    }

    #[test]
    fn test_serialized_form() {
        assert_eq!(
            serde_json::to_string(&Slice::from(1..4)).unwrap(),
            r#"{"start":1,"stop":4,"step":1,"index":false}"#
        );
    }

    impl Slice {
        fn with_step(self, step: isize) -> Self {
            Self { step, ..self }
        }
    }
}
