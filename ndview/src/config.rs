/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Configuration for rendering views.
//!
//! Options default to their zero values and may be overridden from
//! the environment with [`PrintOptions::from_env`].

use std::env;

use serde::Deserialize;
use serde::Serialize;

/// Environment variable that selects flat rendering.
pub const NDVIEW_PRINT_FLAT: &str = "NDVIEW_PRINT_FLAT";

/// Options controlling how a view is rendered as text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintOptions {
    /// Render every axis on a single line.
    pub flat: bool,
}

impl PrintOptions {
    /// Options for single-line rendering.
    pub fn flat() -> Self {
        Self { flat: true }
    }

    /// Load options from environment variables. Unset or unparsable
    /// variables leave the default in place.
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut options = Self::default();

        if let Some(val) = var(NDVIEW_PRINT_FLAT) {
            if let Some(flat) = parse_flag(&val) {
                options.flat = flat;
            }
        }

        options
    }
}

fn parse_flag(val: &str) -> Option<bool> {
    match val.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}
