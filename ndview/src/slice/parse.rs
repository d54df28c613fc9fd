/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! The compact slice syntax.
//!
//! ```text
//! expression ::= "" | item ("," item)*
//! item       ::= integer
//!              | integer? ":" integer? (":" integer?)?
//! integer    ::= "-"? digit+
//! ```
//!
//! A bare integer is a single index and collapses its axis. The
//! empty expression selects everything. Whitespace is ignored.

use nom::IResult;
use nom::branch::alt;
use nom::character::complete::char;
use nom::character::complete::digit1;
use nom::combinator::all_consuming;
use nom::combinator::map;
use nom::combinator::map_res;
use nom::combinator::opt;
use nom::combinator::recognize;
use nom::multi::separated_list1;
use nom::sequence::pair;
use nom::sequence::preceded;
use nom::sequence::tuple;

use crate::slice::Slice;
use crate::slice::SliceError;

fn integer(input: &str) -> IResult<&str, isize> {
    map_res(recognize(pair(opt(char('-')), digit1)), str::parse::<isize>)(input)
}

fn range(input: &str) -> IResult<&str, Slice> {
    map(
        tuple((
            opt(integer),
            char(':'),
            opt(integer),
            opt(preceded(char(':'), opt(integer))),
        )),
        |(start, _, stop, step)| Slice::unchecked(start, stop, step.flatten().unwrap_or(1)),
    )(input)
}

/// A single per-axis item. Steps are not validated here; see
/// [`parse`].
pub fn slice(input: &str) -> IResult<&str, Slice> {
    alt((range, map(integer, Slice::index)))(input)
}

/// A comma-separated, non-empty sequence of items.
pub fn expression(input: &str) -> IResult<&str, Vec<Slice>> {
    separated_list1(char(','), slice)(input)
}

/// Parse a slice expression into one [`Slice`] per axis.
///
/// Fails with [`SliceError::Parse`] on malformed input and with
/// [`SliceError::InvalidSlice`] if any item has a zero step.
pub fn parse(input: &str) -> Result<Vec<Slice>, SliceError> {
    let input: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if input.is_empty() {
        return Ok(Vec::new());
    }

    let (_, slices) = all_consuming(expression)(input.as_str()).map_err(|err| SliceError::Parse {
        input: input.clone(),
        reason: err.to_string(),
    })?;
    for slice in &slices {
        slice.validate()?;
    }
    Ok(slices)
}
