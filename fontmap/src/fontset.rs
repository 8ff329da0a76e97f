// Copyright 2026 the Fontmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fontsets: ordered fallback chains with per-character memoization.

use crate::coverage::CoverageLevel;
use crate::description::FontDescription;
use crate::face::Face;
use crate::family::{Family, find_member_face};
use crate::font::{Font, FontMetrics};
use crate::fontmap::MapInner;
use crate::key::FontsetKey;
use crate::util::lock;
use crate::Language;
use core::fmt;
use hashbrown::HashMap;
use std::sync::{Arc, Mutex, Weak};

/// Describes how a visitor wants iteration to proceed.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum QueryStatus {
    /// Visit the next font.
    Continue,
    /// Stop iterating.
    Stop,
}

/// An entry in a fontset.
#[derive(Clone, PartialEq, Debug)]
pub enum FontsetItem {
    /// A font realized from an ordinary family.
    Font(Font),
    /// A generic family whose member face is picked per character.
    Generic(GenericItem),
}

/// A generic family as it was when a fontset was built.
///
/// The faces of its members are captured at construction, so later
/// changes to the family or to the font map do not affect the picks.
#[derive(Clone, PartialEq, Debug)]
pub struct GenericItem {
    family: Family,
    members: Arc<[Vec<Face>]>,
}

impl GenericItem {
    /// Captures the current member faces of `family`.
    pub fn new(family: Family) -> Self {
        let members = family.member_faces().into();
        Self { family, members }
    }

    /// Returns the generic family.
    pub fn family(&self) -> &Family {
        &self.family
    }

    /// Returns the captured faces of each member with any faces, in
    /// member order.
    pub fn member_faces(&self) -> &[Vec<Face>] {
        &self.members
    }

    /// Picks a member face for `ch`, or the preferred member face when
    /// `ch` is `None`. The flag is false for a last-resort pick that does
    /// not cover `ch`.
    pub(crate) fn pick(
        &self,
        desc: &FontDescription,
        language: Option<&Language>,
        ch: Option<char>,
    ) -> Option<(Face, bool)> {
        find_member_face(&self.members, desc, language, ch)
    }
}

/// An ordered fallback chain for one description.
///
/// Fontsets are immutable once built apart from their memo of which font
/// was chosen for each character. A font chosen for a character stays
/// chosen for the lifetime of the fontset, even if the font map changes
/// or evicts the fontset from its cache.
///
/// Fontsets are shared handles: cloning is cheap and equality is identity.
#[derive(Clone)]
pub struct Fontset(Arc<FontsetInner>);

struct FontsetInner {
    key: FontsetKey,
    items: Vec<FontsetItem>,
    map: Weak<MapInner>,
    state: Mutex<FontsetState>,
}

#[derive(Default)]
struct FontsetState {
    memo: HashMap<char, Font>,
    /// The font each generic item yields when iterating, by item index.
    item_fonts: HashMap<usize, Option<Font>>,
    /// Every font the fontset has handed out, used to reuse the font for
    /// a face that a generic family picks more than once.
    fonts: Vec<Font>,
}

impl Fontset {
    pub(crate) fn new(key: FontsetKey, items: Vec<FontsetItem>, map: Weak<MapInner>) -> Self {
        let fonts = items
            .iter()
            .filter_map(|item| match item {
                FontsetItem::Font(font) => Some(font.clone()),
                FontsetItem::Generic(_) => None,
            })
            .collect();
        Self(Arc::new(FontsetInner {
            key,
            items,
            map,
            state: Mutex::new(FontsetState {
                memo: HashMap::default(),
                item_fonts: HashMap::default(),
                fonts,
            }),
        }))
    }

    /// Returns the key the fontset was built from.
    pub fn key(&self) -> &FontsetKey {
        &self.0.key
    }

    /// Returns the normalized description the fontset was built from.
    pub fn description(&self) -> &FontDescription {
        self.0.key.description()
    }

    /// Returns the language the fontset was built for.
    pub fn language(&self) -> Option<&Language> {
        self.0.key.language()
    }

    /// Returns the items in fallback order.
    pub fn items(&self) -> &[FontsetItem] {
        &self.0.items
    }

    /// Returns the number of items.
    pub fn len(&self) -> usize {
        self.0.items.len()
    }

    /// Returns true if the fontset has no items. Nothing renders with an
    /// empty fontset.
    pub fn is_empty(&self) -> bool {
        self.0.items.is_empty()
    }

    /// Returns the font to render `ch` with.
    ///
    /// Items are scanned in order. A realized font is accepted when it
    /// covers `ch` exactly. A generic family is asked for a member face
    /// covering `ch`, which is realized on demand. When no item covers
    /// `ch`, the first last-resort pick of a generic family is used.
    ///
    /// The answer is memoized. `None` means nothing can render `ch` and a
    /// missing glyph should be drawn.
    pub fn get_font(&self, ch: char) -> Option<Font> {
        let mut state = lock(&self.0.state);
        if let Some(font) = state.memo.get(&ch) {
            return Some(font.clone());
        }
        let desc = self.0.key.description();
        let language = self.0.key.language();
        let mut fuzzy = None;
        let mut found = None;
        for item in &self.0.items {
            match item {
                FontsetItem::Font(font) => {
                    if font.coverage(ch) == CoverageLevel::Exact {
                        found = Some(font.clone());
                        break;
                    }
                }
                FontsetItem::Generic(generic) => {
                    let Some((face, exact)) = generic.pick(desc, language, Some(ch)) else {
                        continue;
                    };
                    log::trace!(
                        "generic family {} picked {} for U+{:04X}",
                        generic.family().name(),
                        face.face_id(),
                        u32::from(ch)
                    );
                    if exact {
                        found = Some(self.realize(&mut state, &face));
                        break;
                    }
                    if fuzzy.is_none() {
                        fuzzy = Some(self.realize(&mut state, &face));
                    }
                }
            }
        }
        let font = found.or(fuzzy)?;
        state.memo.insert(ch, font.clone());
        Some(font)
    }

    /// Calls `visitor` with the font of each item in order, realizing
    /// generic families with their preferred member. Stops when the
    /// visitor returns [`QueryStatus::Stop`].
    pub fn foreach(&self, mut visitor: impl FnMut(&Font) -> QueryStatus) {
        for (index, item) in self.0.items.iter().enumerate() {
            let font = match item {
                FontsetItem::Font(font) => font.clone(),
                FontsetItem::Generic(generic) => {
                    let mut state = lock(&self.0.state);
                    let font = match state.item_fonts.get(&index).cloned() {
                        Some(font) => font,
                        None => {
                            let font = generic
                                .pick(self.0.key.description(), self.0.key.language(), None)
                                .map(|(face, _)| self.realize(&mut state, &face));
                            state.item_fonts.insert(index, font.clone());
                            font
                        }
                    };
                    let Some(font) = font else {
                        continue;
                    };
                    font
                }
            };
            if visitor(&font) == QueryStatus::Stop {
                break;
            }
        }
    }

    /// Returns the first font of the fontset.
    pub fn first_font(&self) -> Option<Font> {
        let mut first = None;
        self.foreach(|font| {
            first = Some(font.clone());
            QueryStatus::Stop
        });
        first
    }

    /// Returns the metrics of the fontset.
    ///
    /// A single item fontset has the metrics of its font. Otherwise the
    /// ascent, descent and height are the maxima over all fonts and the
    /// character width is that of the first font.
    pub fn metrics(&self) -> FontMetrics {
        if self.0.items.len() == 1 {
            return self
                .first_font()
                .map(|font| font.metrics())
                .unwrap_or_default();
        }
        let mut metrics: Option<FontMetrics> = None;
        self.foreach(|font| {
            let font_metrics = font.metrics();
            match &mut metrics {
                Some(metrics) => {
                    metrics.ascent = metrics.ascent.max(font_metrics.ascent);
                    metrics.descent = metrics.descent.max(font_metrics.descent);
                    metrics.height = metrics.height.max(font_metrics.height);
                }
                None => metrics = Some(font_metrics),
            }
            QueryStatus::Continue
        });
        metrics.unwrap_or_default()
    }

    /// Returns the font this fontset uses for `face`, creating it if the
    /// fontset has not handed one out yet.
    fn realize(&self, state: &mut FontsetState, face: &Face) -> Font {
        if let Some(font) = state.fonts.iter().find(|font| font.face() == face) {
            return font.clone();
        }
        let font = match self.0.map.upgrade() {
            Some(map) => map.font_for_face(face, &self.0.key),
            None => Font::new(face, &self.0.key),
        };
        state.fonts.push(font.clone());
        font
    }
}

impl PartialEq for Fontset {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Fontset {}

impl fmt::Debug for Fontset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fontset")
            .field("key", &self.0.key)
            .field("items", &self.0.items)
            .finish_non_exhaustive()
    }
}
