// Copyright 2026 the Fontmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Construction of fallback chains.

use crate::face::Face;
use crate::family::Family;
use crate::family_name::NameMap;
use crate::font::Font;
use crate::fontset::{FontsetItem, GenericItem};
use crate::generic::GenericFamily;
use crate::key::FontsetKey;

/// Builds the ordered items of the fontset for `key`.
///
/// Each requested family name that resolves contributes one item: the best
/// face of an ordinary family, realized with `realize`, or a deferred
/// generic family. Unknown names are skipped. When no generic family was
/// requested, the default generic family is appended if it exists, so
/// that a populated map never yields an empty chain.
pub(crate) fn resolve(
    families: &NameMap<Family>,
    key: &FontsetKey,
    mut realize: impl FnMut(&Face) -> Font,
) -> Vec<FontsetItem> {
    let desc = key.description();
    let language = key.language();
    let mut items = Vec::new();
    let mut has_generic = false;
    for name in desc.families() {
        let Some(family) = families.get(name) else {
            continue;
        };
        if family.is_generic() {
            items.push(FontsetItem::Generic(GenericItem::new(family.clone())));
            has_generic = true;
            continue;
        }
        // A family that was asked for by name is used even when none of
        // its faces claims the language.
        let face = family
            .find_face(desc, language, None)
            .or_else(|| language.and_then(|_| family.find_face(desc, None, None)));
        if let Some(face) = face {
            items.push(FontsetItem::Font(realize(&face)));
        }
    }
    if !has_generic {
        if let Some(family) = families.get(GenericFamily::DEFAULT.name()) {
            if family.is_generic() {
                items.push(FontsetItem::Generic(GenericItem::new(family.clone())));
            }
        }
    }
    items
}
