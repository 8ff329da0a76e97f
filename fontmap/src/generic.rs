// Copyright 2026 the Fontmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generic font families.

use core::fmt;
use smallvec::SmallVec;

/// Generic font families recognized as aliases by the font map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum GenericFamily {
    /// Glyphs have stroke endings that are plain.
    SansSerif = 0,
    /// Glyphs have finishing strokes, flared or tapering ends, or have actual serifed endings.
    Serif = 1,
    /// All glyphs have the same fixed width.
    Monospace = 2,
    /// Glyphs have joining strokes or other cursive characteristics.
    Cursive = 3,
    /// Decorative fonts with playful representations of characters.
    Fantasy = 4,
    /// Glyphs are taken from the default user interface font on a given platform.
    SystemUi = 5,
    /// Fonts that are specifically designed to render emoji.
    Emoji = 6,
}

const COUNT: usize = GenericFamily::Emoji as usize + 1;

impl GenericFamily {
    /// The generic family appended to every fallback chain that does not
    /// request a generic family itself.
    pub const DEFAULT: Self = Self::SansSerif;

    /// Parses a generic family from its alias name.
    ///
    /// ```
    /// use fontmap::GenericFamily;
    ///
    /// assert_eq!(GenericFamily::parse("sans-serif"), Some(GenericFamily::SansSerif));
    /// assert_eq!(GenericFamily::parse("Emoji"), Some(GenericFamily::Emoji));
    /// assert_eq!(GenericFamily::parse("Arial"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::all()
            .iter()
            .find(|generic| generic.name().eq_ignore_ascii_case(s))
            .copied()
    }

    /// Returns the alias name of the generic family.
    pub const fn name(self) -> &'static str {
        match self {
            Self::SansSerif => "sans-serif",
            Self::Serif => "serif",
            Self::Monospace => "monospace",
            Self::Cursive => "cursive",
            Self::Fantasy => "fantasy",
            Self::SystemUi => "system-ui",
            Self::Emoji => "emoji",
        }
    }

    /// Returns a slice containing all generic family variants.
    pub const fn all() -> &'static [Self] {
        &[
            Self::SansSerif,
            Self::Serif,
            Self::Monospace,
            Self::Cursive,
            Self::Fantasy,
            Self::SystemUi,
            Self::Emoji,
        ]
    }
}

impl fmt::Display for GenericFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

type NameVec = SmallVec<[String; 2]>;

/// Maps generic families to the names of the concrete families that
/// implement them.
///
/// Font sources fill this in at populate time. Member order is significant:
/// earlier members are preferred during delayed face selection.
#[derive(Clone, Default, Debug)]
pub struct GenericFamilyMap {
    map: [NameVec; COUNT],
}

impl GenericFamilyMap {
    /// Returns the concrete family names for the given generic family.
    pub fn get(&self, generic: GenericFamily) -> &[String] {
        &self.map[generic as usize]
    }

    /// Sets the concrete family names for the given generic family.
    pub fn set<S: Into<String>>(
        &mut self,
        generic: GenericFamily,
        families: impl IntoIterator<Item = S>,
    ) {
        let map = &mut self.map[generic as usize];
        map.clear();
        map.extend(families.into_iter().map(Into::into));
    }

    /// Appends concrete family names to the list for the given generic family.
    pub fn append<S: Into<String>>(
        &mut self,
        generic: GenericFamily,
        families: impl IntoIterator<Item = S>,
    ) {
        self.map[generic as usize].extend(families.into_iter().map(Into::into));
    }

    /// Returns an iterator over the generic families that have members.
    pub fn iter(&self) -> impl Iterator<Item = (GenericFamily, &[String])> + '_ {
        GenericFamily::all()
            .iter()
            .map(|generic| (*generic, self.get(*generic)))
            .filter(|(_, names)| !names.is_empty())
    }
}
