/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use crate::slice::Slice;

/// Converts a sequence of slices into the compact surface syntax
/// accepted by [`crate::slice::parse`].
///
/// For example, `[Slice::index(1), Slice::from(2..), Slice::full()]`
/// is formatted as `"1,2:,:"`. The empty sequence formats as `""`.
pub fn to_compact_syntax(slices: &[Slice]) -> String {
    slices
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slice::parse;

    macro_rules! assert_round_trip {
        ($slices:expr) => {{
            let slices: Vec<Slice> = $slices;
            let compact = to_compact_syntax(&slices);
            let parsed = parse(&compact).unwrap();
            assert_eq!(parsed, slices, "compact: {}", compact);
        }};
    }

    #[test]
    fn test_slices_to_compact_and_back() {
        assert_round_trip!(vec![]);
        assert_round_trip!(vec![Slice::full()]);
        assert_round_trip!(vec![Slice::index(0), Slice::index(-3)]);
        assert_round_trip!(vec![Slice::from(1..4), Slice::from(..-1)]);
        assert_round_trip!(vec![Slice::from(4..), Slice::full(), Slice::index(2)]);
        assert_round_trip!(vec![Slice::new(None, None, -1).unwrap()]);
        assert_round_trip!(vec![Slice::new(Some(-1), Some(0), -2).unwrap()]);
        assert_round_trip!(vec![Slice::new(Some(1), None, 3).unwrap(), Slice::full()]);
    }

    #[test]
    fn test_compact_syntax() {
        assert_eq!(
            to_compact_syntax(&[Slice::index(1), Slice::from(2..), Slice::full()]),
            "1,2:,:"
        );
        assert_eq!(
            to_compact_syntax(&[Slice::new(Some(2), Some(8), 2).unwrap()]),
            "2:8:2"
        );
    }
}
