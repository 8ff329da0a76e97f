// Copyright 2026 the Fontmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

/// Errors returned by font map operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontMapError {
    /// The family is attached to another font map.
    FamilyOwnedElsewhere,
    /// The family is not attached to this font map.
    FamilyNotOwned,
    /// A family with the same name, ignoring case, already exists.
    DuplicateFamily,
    /// The resolution is not a finite, positive number.
    InvalidResolution,
    /// The fallback map would end up falling back to itself.
    FallbackCycle,
}

impl fmt::Display for FontMapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FamilyOwnedElsewhere => f.write_str("family belongs to another font map"),
            Self::FamilyNotOwned => f.write_str("family does not belong to this font map"),
            Self::DuplicateFamily => f.write_str("a family with this name already exists"),
            Self::InvalidResolution => f.write_str("resolution must be finite and positive"),
            Self::FallbackCycle => f.write_str("fallback font maps must not form a cycle"),
        }
    }
}

impl core::error::Error for FontMapError {}
