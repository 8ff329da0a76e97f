// Copyright 2026 the Fontmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Properties for specifying font weight, width, style and variant.

use core::fmt;

/// Visual weight class of a font, typically on a scale from 1.0 to 1000.0.
///
/// In variable fonts, this can be controlled with the `wght` axis.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct FontWeight(f32);

impl FontWeight {
    /// Weight value of 100.
    pub const THIN: Self = Self(100.0);
    /// Weight value of 200.
    pub const ULTRA_LIGHT: Self = Self(200.0);
    /// Weight value of 300.
    pub const LIGHT: Self = Self(300.0);
    /// Weight value of 350.
    pub const SEMI_LIGHT: Self = Self(350.0);
    /// Weight value of 380.
    pub const BOOK: Self = Self(380.0);
    /// Weight value of 400. This is the default value.
    pub const NORMAL: Self = Self(400.0);
    /// Weight value of 500.
    pub const MEDIUM: Self = Self(500.0);
    /// Weight value of 600.
    pub const SEMI_BOLD: Self = Self(600.0);
    /// Weight value of 700.
    pub const BOLD: Self = Self(700.0);
    /// Weight value of 800.
    pub const ULTRA_BOLD: Self = Self(800.0);
    /// Weight value of 900.
    pub const HEAVY: Self = Self(900.0);
    /// Weight value of 1000.
    pub const ULTRA_HEAVY: Self = Self(1000.0);

    /// Creates a new weight value.
    pub fn new(weight: f32) -> Self {
        Self(weight)
    }

    /// Returns the underlying weight value.
    pub fn value(self) -> f32 {
        self.0
    }

    /// Parses a weight keyword as it appears in a font description string.
    ///
    /// Matching is ASCII case-insensitive. `Regular` and `Normal` are not
    /// accepted here since they are shared with the other properties.
    ///
    /// ```
    /// use fontmap::FontWeight;
    ///
    /// assert_eq!(FontWeight::from_keyword("bold"), Some(FontWeight::BOLD));
    /// assert_eq!(FontWeight::from_keyword("Semi-Light"), Some(FontWeight::SEMI_LIGHT));
    /// assert_eq!(FontWeight::from_keyword("Roman"), None);
    /// ```
    pub fn from_keyword(s: &str) -> Option<Self> {
        const KEYWORDS: &[(&str, FontWeight)] = &[
            ("thin", FontWeight::THIN),
            ("ultra-light", FontWeight::ULTRA_LIGHT),
            ("extra-light", FontWeight::ULTRA_LIGHT),
            ("light", FontWeight::LIGHT),
            ("semi-light", FontWeight::SEMI_LIGHT),
            ("demi-light", FontWeight::SEMI_LIGHT),
            ("book", FontWeight::BOOK),
            ("medium", FontWeight::MEDIUM),
            ("semi-bold", FontWeight::SEMI_BOLD),
            ("demi-bold", FontWeight::SEMI_BOLD),
            ("bold", FontWeight::BOLD),
            ("ultra-bold", FontWeight::ULTRA_BOLD),
            ("extra-bold", FontWeight::ULTRA_BOLD),
            ("heavy", FontWeight::HEAVY),
            ("black", FontWeight::HEAVY),
            ("ultra-heavy", FontWeight::ULTRA_HEAVY),
            ("ultra-black", FontWeight::ULTRA_HEAVY),
            ("extra-black", FontWeight::ULTRA_HEAVY),
        ];
        KEYWORDS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s))
            .map(|(_, weight)| *weight)
    }

    fn keyword(self) -> Option<&'static str> {
        const NAMES: &[(f32, &str)] = &[
            (100.0, "Thin"),
            (200.0, "Ultra-Light"),
            (300.0, "Light"),
            (350.0, "Semi-Light"),
            (380.0, "Book"),
            (500.0, "Medium"),
            (600.0, "Semi-Bold"),
            (700.0, "Bold"),
            (800.0, "Ultra-Bold"),
            (900.0, "Heavy"),
            (1000.0, "Ultra-Heavy"),
        ];
        NAMES
            .iter()
            .find(|(value, _)| *value == self.0)
            .map(|(_, name)| *name)
    }
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl fmt::Display for FontWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.keyword() {
            Some(keyword) => f.write_str(keyword),
            None if self.0 == Self::NORMAL.0 => f.write_str("Normal"),
            None => write!(f, "{}", self.0),
        }
    }
}

/// Visual width of a font, as a ratio relative to the normal width.
///
/// In variable fonts, this can be controlled with the `wdth` axis.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct FontWidth(f32);

impl FontWidth {
    /// Width that is 50% of normal.
    pub const ULTRA_CONDENSED: Self = Self(0.5);
    /// Width that is 62.5% of normal.
    pub const EXTRA_CONDENSED: Self = Self(0.625);
    /// Width that is 75% of normal.
    pub const CONDENSED: Self = Self(0.75);
    /// Width that is 87.5% of normal.
    pub const SEMI_CONDENSED: Self = Self(0.875);
    /// Width that is 100% of normal. This is the default value.
    pub const NORMAL: Self = Self(1.0);
    /// Width that is 112.5% of normal.
    pub const SEMI_EXPANDED: Self = Self(1.125);
    /// Width that is 125% of normal.
    pub const EXPANDED: Self = Self(1.25);
    /// Width that is 150% of normal.
    pub const EXTRA_EXPANDED: Self = Self(1.5);
    /// Width that is 200% of normal.
    pub const ULTRA_EXPANDED: Self = Self(2.0);

    const KEYWORDS: [(&'static str, Self); 8] = [
        ("Ultra-Condensed", Self::ULTRA_CONDENSED),
        ("Extra-Condensed", Self::EXTRA_CONDENSED),
        ("Condensed", Self::CONDENSED),
        ("Semi-Condensed", Self::SEMI_CONDENSED),
        ("Semi-Expanded", Self::SEMI_EXPANDED),
        ("Expanded", Self::EXPANDED),
        ("Extra-Expanded", Self::EXTRA_EXPANDED),
        ("Ultra-Expanded", Self::ULTRA_EXPANDED),
    ];

    /// Creates a new width value with the given ratio.
    pub fn from_ratio(ratio: f32) -> Self {
        Self(ratio)
    }

    /// Creates a width value from a percentage.
    pub fn from_percentage(percentage: f32) -> Self {
        Self(percentage / 100.0)
    }

    /// Returns the width value as a ratio, with `1.0` being normal width.
    pub fn ratio(self) -> f32 {
        self.0
    }

    /// Returns the width value as a percentage.
    pub fn percentage(self) -> f32 {
        self.0 * 100.0
    }

    /// Parses a width keyword such as `Condensed`, ignoring ASCII case.
    pub fn from_keyword(s: &str) -> Option<Self> {
        Self::KEYWORDS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s))
            .map(|(_, width)| *width)
    }
}

impl Default for FontWidth {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl fmt::Display for FontWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some((name, _)) = Self::KEYWORDS.iter().find(|(_, width)| width == self) {
            f.write_str(name)
        } else if *self == Self::NORMAL {
            f.write_str("Normal")
        } else {
            write!(f, "{}%", self.percentage())
        }
    }
}

/// Visual style or 'slope' of a font.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, Debug)]
pub enum FontStyle {
    /// An upright or "roman" style.
    #[default]
    Normal,
    /// Generally a slanted style, originally based on semi-cursive forms.
    Italic,
    /// A slanted version of the upright forms.
    Oblique,
}

impl FontStyle {
    /// Parses a style keyword, ignoring ASCII case.
    ///
    /// `Roman` is accepted as a synonym for [`FontStyle::Normal`].
    pub fn from_keyword(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("italic") {
            Some(Self::Italic)
        } else if s.eq_ignore_ascii_case("oblique") {
            Some(Self::Oblique)
        } else if s.eq_ignore_ascii_case("roman") {
            Some(Self::Normal)
        } else {
            None
        }
    }

    /// Returns true for the italic and oblique styles.
    pub fn is_slanted(self) -> bool {
        self != Self::Normal
    }
}

impl fmt::Display for FontStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Normal => "Normal",
            Self::Italic => "Italic",
            Self::Oblique => "Oblique",
        })
    }
}

/// Capitalization variant of a font.
///
/// Variants are realized by the shaper through OpenType features, so faces
/// never carry one. Fontset keys ignore them.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, Debug)]
pub enum FontVariant {
    /// Normal capitalization.
    #[default]
    Normal,
    /// Lowercase letters are rendered as small capitals.
    SmallCaps,
}

impl FontVariant {
    /// Parses a variant keyword, ignoring ASCII case.
    pub fn from_keyword(s: &str) -> Option<Self> {
        s.eq_ignore_ascii_case("small-caps").then_some(Self::SmallCaps)
    }
}

impl fmt::Display for FontVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Normal => "Normal",
            Self::SmallCaps => "Small-Caps",
        })
    }
}

/// Primary attributes for face matching: [`FontWidth`], [`FontStyle`] and
/// [`FontWeight`].
#[derive(Copy, Clone, PartialEq, Default, Debug)]
pub struct Attributes {
    /// Width of the face.
    pub width: FontWidth,
    /// Slope of the face.
    pub style: FontStyle,
    /// Weight of the face.
    pub weight: FontWeight,
}

impl Attributes {
    /// Creates new attributes from the given width, style and weight.
    pub fn new(width: FontWidth, style: FontStyle, weight: FontWeight) -> Self {
        Self {
            width,
            style,
            weight,
        }
    }
}

impl fmt::Display for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "width: {}, style: {}, weight: {}",
            self.width, self.style, self.weight
        )
    }
}
