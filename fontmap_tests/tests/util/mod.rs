// Copyright 2026 the Fontmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::ops::RangeInclusive;
use core::sync::atomic::{AtomicUsize, Ordering};
use fontmap::{Face, FaceData, FontMap, FontStyle, FontWeight, Family, GenericFamily, MemorySource};
use std::sync::Arc;

pub(crate) const LATIN: RangeInclusive<char> = '\u{0}'..='\u{024F}';
pub(crate) const CJK: RangeInclusive<char> = '\u{4E00}'..='\u{9FFF}';

/// Face data covering fixed character ranges that counts glyph queries.
#[derive(Debug)]
pub(crate) struct TestFace {
    ranges: Vec<RangeInclusive<char>>,
    queries: AtomicUsize,
}

impl TestFace {
    pub(crate) fn new(ranges: impl IntoIterator<Item = RangeInclusive<char>>) -> Arc<Self> {
        Arc::new(Self {
            ranges: ranges.into_iter().collect(),
            queries: AtomicUsize::new(0),
        })
    }

    /// Returns the number of `has_char` calls so far.
    pub(crate) fn queries(&self) -> usize {
        self.queries.load(Ordering::Relaxed)
    }
}

impl FaceData for TestFace {
    fn has_char(&self, ch: char) -> bool {
        self.queries.fetch_add(1, Ordering::Relaxed);
        self.ranges.iter().any(|range| range.contains(&ch))
    }
}

pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub(crate) fn face(family: &str, ranges: impl IntoIterator<Item = RangeInclusive<char>>) -> Face {
    Face::builder(family, TestFace::new(ranges)).build()
}

pub(crate) fn styled_face(family: &str, style: FontStyle, weight: FontWeight) -> Face {
    Face::builder(family, TestFace::new([LATIN]))
        .style(style)
        .weight(weight)
        .build()
}

/// A map with a Latin "Sans" family, a CJK "Han" family and a generic
/// "sans-serif" family aggregating both.
pub(crate) fn sans_map() -> FontMap {
    init_logger();
    let map = FontMap::new();
    map.add_face(face("Sans", [LATIN]));
    map.add_face(face("Han", [CJK]));
    let generic = Family::new_generic(GenericFamily::SansSerif.name());
    for name in ["Sans", "Han"] {
        if let Some(member) = map.family(name) {
            generic.add_member(&member);
        }
    }
    map.add_family(generic).unwrap();
    map
}

/// A source with a regular and a bold "Times" face and a "Mono" face.
pub(crate) fn memory_source() -> MemorySource {
    let mut source = MemorySource::new();
    source.add_face(styled_face("Times", FontStyle::Normal, FontWeight::NORMAL));
    source.add_face(styled_face("Times", FontStyle::Normal, FontWeight::BOLD));
    source.add_face(face("Mono", [LATIN]));
    source.set_generic_family(GenericFamily::Serif, ["Times"]);
    source.set_generic_family(GenericFamily::Monospace, ["Mono", "Courier"]);
    source.set_generic_family(GenericFamily::Cursive, ["Comic"]);
    source
}
