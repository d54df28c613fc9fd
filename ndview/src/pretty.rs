/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Nested-bracket rendering of views.
//!
//! Each outer axis is reduced to a sub-view one rank lower by
//! slicing it with a single index, until a rank-1 row (rendered
//! inline) or a rank-0 scalar is reached. Rows of a multi-dimensional
//! view are separated by a newline and indented by their depth,
//! unless [`PrintOptions::flat`] is set.

use std::fmt::Display;

use crate::config::PrintOptions;
use crate::slice::Slice;
use crate::view::View;
use crate::view::ViewError;

/// What to do with an element that cannot be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OnError {
    /// Stop and return the error.
    Fail,
    /// Print the error in place of the element and carry on.
    Inline,
}

impl OnError {
    fn text<T: Display>(self, value: Result<T, ViewError>) -> Result<String, ViewError> {
        match (value, self) {
            (Ok(value), _) => Ok(value.to_string()),
            (Err(err), Self::Inline) => Ok(format!("<{}>", err)),
            (Err(err), Self::Fail) => Err(err),
        }
    }
}

pub(crate) fn render<T: Clone + Display>(
    view: &View<T>,
    opts: &PrintOptions,
) -> Result<String, ViewError> {
    let mut out = String::new();
    render_into(view, opts, OnError::Fail, 0, &mut out)?;
    Ok(out)
}

/// Like [`render`], but never fails: unreadable elements are shown
/// as `<error>`.
pub(crate) fn render_lossy<T: Clone + Display>(view: &View<T>, opts: &PrintOptions) -> String {
    let mut out = String::new();
    match render_into(view, opts, OnError::Inline, 0, &mut out) {
        Ok(()) => out,
        Err(err) => format!("<{}>", err),
    }
}

fn render_into<T: Clone + Display>(
    view: &View<T>,
    opts: &PrintOptions,
    on_error: OnError,
    depth: usize,
    out: &mut String,
) -> Result<(), ViewError> {
    match view.sizes() {
        [] => out.push_str(&on_error.text(view.get(&[]))?),
        [_] => {
            out.push('[');
            for (i, value) in view.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&on_error.text(value)?);
            }
            out.push(']');
        }
        [outer, ..] => {
            let separator = if opts.flat {
                ", ".to_string()
            } else {
                format!(",\n{}", " ".repeat(depth + 1))
            };
            out.push('[');
            for i in 0..*outer {
                if i > 0 {
                    out.push_str(&separator);
                }
                match view.slice(&[Slice::index(i as isize)]) {
                    Ok(row) => render_into(&row, opts, on_error, depth + 1, out)?,
                    Err(err) => out.push_str(&on_error.text(Err::<T, _>(err))?),
                }
            }
            out.push(']');
        }
    }
    Ok(())
}
