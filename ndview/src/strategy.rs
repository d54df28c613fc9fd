/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Property-based generators for shapes and slices.
//!
//! Used by `proptest`-based tests across the crate. Generated slices
//! deliberately include bounds past either end of the axis and
//! negative steps, to exercise clamping and wraparound; generated
//! index slices always land on the axis after wraparound.
//!
//! This module is only included in test builds (`#[cfg(test)]`).

use proptest::prelude::*;

use crate::slice::Slice;

/// Generates axis sizes with rank in `1..=max_rank` and each size
/// in `0..=max_size`.
pub fn gen_sizes(max_rank: usize, max_size: usize) -> BoxedStrategy<Vec<usize>> {
    prop::collection::vec(0..=max_size, 1..=max_rank).boxed()
}

/// Generates a slice valid for an axis of length `len`.
pub fn gen_slice(len: usize) -> BoxedStrategy<Slice> {
    let bound = len as isize + 2;
    let step = prop_oneof![-3isize..=-1, 1isize..=3];
    let range = (
        prop::option::of(-bound..=bound),
        prop::option::of(-bound..=bound),
        step,
    )
        .prop_map(|(start, stop, step)| Slice::unchecked(start, stop, step))
        .boxed();

    if len == 0 {
        return range;
    }

    let len = len as isize;
    let index = (-len..len).prop_map(Slice::index).boxed();
    prop_oneof![
        3 => range,
        1 => index,
    ]
    .boxed()
}

/// Generates slices for a prefix of the axes of `sizes`.
pub fn gen_slices_for(sizes: Vec<usize>) -> BoxedStrategy<Vec<Slice>> {
    (0..=sizes.len())
        .prop_flat_map(move |count| {
            sizes[..count]
                .iter()
                .map(|&size| gen_slice(size))
                .collect::<Vec<_>>()
        })
        .boxed()
}

/// Generates up to `max_len` slices, unconstrained by any shape.
pub fn gen_slices(max_len: usize) -> BoxedStrategy<Vec<Slice>> {
    prop::collection::vec(gen_slice(8), 1..=max_len).boxed()
}

#[cfg(test)]
mod tests {
    use proptest::test_runner::Config;
    use proptest::test_runner::TestRunner;

    use super::*;

    #[test]
    fn test_gen_slice_resolves() {
        let mut runner = TestRunner::new(Config::default());
        for len in 0..6 {
            runner
                .run(&gen_slice(len), |slice| {
                    let (start, _, _) = slice.resolve(len).unwrap();
                    if slice.is_index() {
                        prop_assert!(start >= 0 && start < len as isize);
                    }
                    Ok(())
                })
                .unwrap();
        }
    }

    #[test]
    fn test_gen_slices_for_prefix() {
        let mut runner = TestRunner::new(Config::default());
        runner
            .run(&gen_slices_for(vec![3, 0, 2]), |slices| {
                prop_assert!(slices.len() <= 3);
                Ok(())
            })
            .unwrap();
    }
}
