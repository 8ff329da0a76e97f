// Copyright 2026 the Fontmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Font descriptions: the style query used to load fontsets.

use crate::attributes::{Attributes, FontStyle, FontVariant, FontWeight, FontWidth};
use crate::family_name::{eq_names, hash_name};
use core::fmt;
use core::hash::{Hash, Hasher};
use core::ops::{BitAnd, BitOr, BitOrAssign, Not};
use core::str::FromStr;
use read_fonts::types::Tag;
use smallvec::SmallVec;
use std::sync::Arc;

/// Number of size units per point (or per pixel for absolute sizes).
pub const SCALE: i32 = 1024;

/// Set of fields in a [`FontDescription`].
///
/// A description tracks which fields were explicitly set so that unset
/// fields can be inherited from a context description with
/// [`FontDescription::merge`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, Debug)]
pub struct FontMask(u16);

impl FontMask {
    /// No fields.
    pub const EMPTY: Self = Self(0);
    /// The family list.
    pub const FAMILY: Self = Self(1 << 0);
    /// The style.
    pub const STYLE: Self = Self(1 << 1);
    /// The capitalization variant.
    pub const VARIANT: Self = Self(1 << 2);
    /// The weight.
    pub const WEIGHT: Self = Self(1 << 3);
    /// The width.
    pub const WIDTH: Self = Self(1 << 4);
    /// The size, relative or absolute.
    pub const SIZE: Self = Self(1 << 5);
    /// The variation settings.
    pub const VARIATIONS: Self = Self(1 << 6);
    /// The explicit face identifier.
    pub const FACE_ID: Self = Self(1 << 7);
    /// All fields.
    pub const ALL: Self = Self(0xFF);

    /// Returns true if all fields in `other` are also in `self`.
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns true if no fields are set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for FontMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for FontMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for FontMask {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl Not for FontMask {
    type Output = Self;

    fn not(self) -> Self {
        Self(!self.0 & Self::ALL.0)
    }
}

/// Description of a requested font style.
///
/// This is an immutable-by-convention value type: two descriptions with the
/// same content are interchangeable as cache keys. Family names compare
/// ignoring case.
///
/// Descriptions are usually parsed from strings of the form
/// `<family-list> [style] [variant] [weight] [width] <size>[px] [@axis=value,...]`:
///
/// ```
/// use fontmap::{FontDescription, FontStyle, FontWeight, SCALE};
///
/// let desc: FontDescription = "Cantarell, sans-serif Bold Italic 12".parse().unwrap();
/// assert_eq!(desc.family(), Some("Cantarell,sans-serif"));
/// assert_eq!(desc.weight(), FontWeight::BOLD);
/// assert_eq!(desc.style(), FontStyle::Italic);
/// assert_eq!(desc.size(), 12 * SCALE);
/// assert_eq!(desc.to_string(), "Cantarell,sans-serif Italic Bold 12");
/// ```
#[derive(Clone, Default, Debug)]
pub struct FontDescription {
    family: Option<Arc<str>>,
    style: FontStyle,
    variant: FontVariant,
    weight: FontWeight,
    width: FontWidth,
    size: i32,
    size_is_absolute: bool,
    variations: Option<Arc<str>>,
    face_id: Option<Arc<str>>,
    mask: FontMask,
}

impl FontDescription {
    /// Creates an empty description with no fields set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the set fields.
    pub fn set_fields(&self) -> FontMask {
        self.mask
    }

    /// Returns the comma separated family list, if set.
    pub fn family(&self) -> Option<&str> {
        self.family.as_deref()
    }

    /// Returns an iterator over the individual family names, trimmed and
    /// with empty entries removed.
    pub fn families(&self) -> impl Iterator<Item = &str> + Clone {
        self.family
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Sets the family list.
    pub fn set_family(&mut self, family: impl Into<Arc<str>>) {
        self.family = Some(family.into());
        self.mask |= FontMask::FAMILY;
    }

    /// Returns the style.
    pub fn style(&self) -> FontStyle {
        self.style
    }

    /// Sets the style.
    pub fn set_style(&mut self, style: FontStyle) {
        self.style = style;
        self.mask |= FontMask::STYLE;
    }

    /// Returns the capitalization variant.
    pub fn variant(&self) -> FontVariant {
        self.variant
    }

    /// Sets the capitalization variant.
    pub fn set_variant(&mut self, variant: FontVariant) {
        self.variant = variant;
        self.mask |= FontMask::VARIANT;
    }

    /// Returns the weight.
    pub fn weight(&self) -> FontWeight {
        self.weight
    }

    /// Sets the weight.
    pub fn set_weight(&mut self, weight: FontWeight) {
        self.weight = weight;
        self.mask |= FontMask::WEIGHT;
    }

    /// Returns the width.
    pub fn width(&self) -> FontWidth {
        self.width
    }

    /// Sets the width.
    pub fn set_width(&mut self, width: FontWidth) {
        self.width = width;
        self.mask |= FontMask::WIDTH;
    }

    /// Returns the width, style and weight.
    pub fn attributes(&self) -> Attributes {
        Attributes::new(self.width, self.style, self.weight)
    }

    /// Sets the width, style and weight.
    pub fn set_attributes(&mut self, attributes: Attributes) {
        self.set_width(attributes.width);
        self.set_style(attributes.style);
        self.set_weight(attributes.weight);
    }

    /// Returns the size in units of 1/[`SCALE`] points, or device units
    /// when [`is_size_absolute`](Self::is_size_absolute) is true.
    pub fn size(&self) -> i32 {
        self.size
    }

    /// Returns true if the size is in device units rather than points.
    pub fn is_size_absolute(&self) -> bool {
        self.size_is_absolute
    }

    /// Sets a size in units of 1/[`SCALE`] points.
    pub fn set_size(&mut self, size: i32) {
        self.size = size.max(0);
        self.size_is_absolute = false;
        self.mask |= FontMask::SIZE;
    }

    /// Sets a size in units of 1/[`SCALE`] device units.
    pub fn set_absolute_size(&mut self, size: i32) {
        self.size = size.max(0);
        self.size_is_absolute = true;
        self.mask |= FontMask::SIZE;
    }

    /// Returns the variation settings in `axis=value,...` form.
    pub fn variations(&self) -> Option<&str> {
        self.variations.as_deref()
    }

    /// Sets the variation settings.
    pub fn set_variations(&mut self, variations: impl Into<Arc<str>>) {
        self.variations = Some(variations.into());
        self.mask |= FontMask::VARIATIONS;
    }

    /// Returns the variation settings as parsed axis tags and values.
    ///
    /// Malformed entries are skipped.
    pub fn variation_settings(&self) -> SmallVec<[(Tag, f32); 4]> {
        self.variations
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .filter_map(|entry| parse_variation(entry.trim()))
            .collect()
    }

    /// Returns the explicit face identifier.
    pub fn face_id(&self) -> Option<&str> {
        self.face_id.as_deref()
    }

    /// Sets an explicit face identifier. A face with this identifier is
    /// matched before any style based selection takes place.
    pub fn set_face_id(&mut self, face_id: impl Into<Arc<str>>) {
        self.face_id = Some(face_id.into());
        self.mask |= FontMask::FACE_ID;
    }

    /// Resets the given fields to their defaults and marks them unset.
    pub fn unset_fields(&mut self, fields: FontMask) {
        let defaults = Self::default();
        if fields.contains(FontMask::FAMILY) {
            self.family = None;
        }
        if fields.contains(FontMask::STYLE) {
            self.style = defaults.style;
        }
        if fields.contains(FontMask::VARIANT) {
            self.variant = defaults.variant;
        }
        if fields.contains(FontMask::WEIGHT) {
            self.weight = defaults.weight;
        }
        if fields.contains(FontMask::WIDTH) {
            self.width = defaults.width;
        }
        if fields.contains(FontMask::SIZE) {
            self.size = 0;
            self.size_is_absolute = false;
        }
        if fields.contains(FontMask::VARIATIONS) {
            self.variations = None;
        }
        if fields.contains(FontMask::FACE_ID) {
            self.face_id = None;
        }
        self.mask = self.mask & !fields;
    }

    /// Returns a copy with the given fields unset.
    #[must_use]
    pub fn without_fields(&self, fields: FontMask) -> Self {
        let mut desc = self.clone();
        desc.unset_fields(fields);
        desc
    }

    /// Merges the set fields of `other` into `self`.
    ///
    /// Fields that are set in `other` replace unset fields of `self`, and
    /// replace set fields too when `replace_existing` is true.
    pub fn merge(&mut self, other: &Self, replace_existing: bool) {
        let fields = if replace_existing {
            other.mask
        } else {
            other.mask & !self.mask
        };
        if fields.contains(FontMask::FAMILY) {
            self.family.clone_from(&other.family);
        }
        if fields.contains(FontMask::STYLE) {
            self.style = other.style;
        }
        if fields.contains(FontMask::VARIANT) {
            self.variant = other.variant;
        }
        if fields.contains(FontMask::WEIGHT) {
            self.weight = other.weight;
        }
        if fields.contains(FontMask::WIDTH) {
            self.width = other.width;
        }
        if fields.contains(FontMask::SIZE) {
            self.size = other.size;
            self.size_is_absolute = other.size_is_absolute;
        }
        if fields.contains(FontMask::VARIATIONS) {
            self.variations.clone_from(&other.variations);
        }
        if fields.contains(FontMask::FACE_ID) {
            self.face_id.clone_from(&other.face_id);
        }
        self.mask |= fields;
    }
}

impl PartialEq for FontDescription {
    fn eq(&self, other: &Self) -> bool {
        let family_eq = match (&self.family, &other.family) {
            (Some(a), Some(b)) => eq_names(a, b),
            (None, None) => true,
            _ => false,
        };
        family_eq
            && self.mask == other.mask
            && self.style == other.style
            && self.variant == other.variant
            && self.weight.value().to_bits() == other.weight.value().to_bits()
            && self.width.ratio().to_bits() == other.width.ratio().to_bits()
            && self.size == other.size
            && self.size_is_absolute == other.size_is_absolute
            && self.variations == other.variations
            && self.face_id == other.face_id
    }
}

impl Eq for FontDescription {}

impl Hash for FontDescription {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.mask.hash(state);
        if let Some(family) = &self.family {
            hash_name(family, state);
        }
        self.style.hash(state);
        self.variant.hash(state);
        self.weight.value().to_bits().hash(state);
        self.width.ratio().to_bits().hash(state);
        self.size.hash(state);
        self.size_is_absolute.hash(state);
        self.variations.hash(state);
        self.face_id.hash(state);
    }
}

/// Error type for parsing a [`FontDescription`] from a string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseDescriptionError {
    kind: ParseDescriptionErrorKind,
    at: usize,
}

/// The reason a font description failed to parse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseDescriptionErrorKind {
    /// The size is negative or too large to represent.
    InvalidSize,
    /// A variation entry is not of the form `axis=value` with a tag of at
    /// most four ASCII characters and a numeric value.
    InvalidVariation,
    /// The face identifier in the `@` section is empty.
    EmptyFaceId,
}

impl ParseDescriptionError {
    const fn new(kind: ParseDescriptionErrorKind, at: usize) -> Self {
        Self { kind, at }
    }

    /// Returns the kind of error.
    pub fn kind(&self) -> ParseDescriptionErrorKind {
        self.kind
    }

    /// Returns the byte offset into the source where the error was detected.
    pub fn byte_offset(&self) -> usize {
        self.at
    }
}

impl fmt::Display for ParseDescriptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ParseDescriptionErrorKind::InvalidSize => {
                write!(f, "invalid font size at byte {}", self.at)
            }
            ParseDescriptionErrorKind::InvalidVariation => {
                write!(f, "invalid font variation at byte {}", self.at)
            }
            ParseDescriptionErrorKind::EmptyFaceId => {
                write!(f, "empty face identifier at byte {}", self.at)
            }
        }
    }
}

impl core::error::Error for ParseDescriptionError {}

impl FromStr for FontDescription {
    type Err = ParseDescriptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut desc = Self::default();
        let mut end = s.len();

        let (start, word) = last_word(s, end, false);
        if let Some(settings) = word.strip_prefix('@') {
            parse_at_section(&mut desc, settings, start + 1)?;
            end = start;
        }

        let (start, word) = last_word(s, end, true);
        if let Some(size) = parse_size(word, start)? {
            match size {
                Size::Points(size) => desc.set_size(size),
                Size::Absolute(size) => desc.set_absolute_size(size),
            }
            end = start;
        }

        loop {
            let (start, word) = last_word(s, end, true);
            if word.is_empty() || !apply_keyword(&mut desc, word) {
                break;
            }
            end = start;
        }

        let family = s[..end]
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect::<Vec<_>>()
            .join(",");
        if !family.is_empty() {
            desc.set_family(family);
        }
        Ok(desc)
    }
}

impl fmt::Display for FontDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut empty = true;
        if let Some(family) = self.family.as_deref() {
            f.write_str(family)?;
            // A trailing keyword or number would be read back as a style
            // word or a size.
            let last = family.rsplit([' ', ',']).next().unwrap_or_default();
            if last.is_empty() || is_keyword(last) || matches!(parse_size(last, 0), Ok(Some(_)))
            {
                f.write_str(",")?;
            }
            empty = false;
        }

        let mut write_word = |f: &mut fmt::Formatter<'_>, word: &dyn fmt::Display| {
            if !empty {
                f.write_str(" ")?;
            }
            empty = false;
            write!(f, "{word}")
        };
        if self.style != FontStyle::Normal {
            write_word(f, &self.style)?;
        }
        if self.variant != FontVariant::Normal {
            write_word(f, &self.variant)?;
        }
        if self.weight != FontWeight::NORMAL {
            write_word(f, &self.weight)?;
        }
        if self.width != FontWidth::NORMAL {
            write_word(f, &self.width)?;
        }
        if empty {
            f.write_str("Normal")?;
        }

        if self.mask.contains(FontMask::SIZE) {
            write!(f, " {}", f64::from(self.size) / f64::from(SCALE))?;
            if self.size_is_absolute {
                f.write_str("px")?;
            }
        }

        if self.face_id.is_some() || self.variations.is_some() {
            f.write_str(" @")?;
            let mut needs_comma = false;
            if let Some(face_id) = &self.face_id {
                write!(f, "faceid={face_id}")?;
                needs_comma = true;
            }
            if let Some(variations) = &self.variations {
                if needs_comma {
                    f.write_str(",")?;
                }
                f.write_str(variations)?;
            }
        }
        Ok(())
    }
}

/// Returns the last word before `end` along with its starting offset.
/// Words are delimited by whitespace, and by commas when `stop_at_comma`
/// is true.
fn last_word(s: &str, end: usize, stop_at_comma: bool) -> (usize, &str) {
    let trimmed = s[..end].trim_end();
    let start = trimmed
        .rfind(|c: char| c.is_whitespace() || (stop_at_comma && c == ','))
        .map_or(0, |i| i + 1);
    (start, &trimmed[start..])
}

enum Size {
    Points(i32),
    Absolute(i32),
}

/// Parses a size word. Words that do not look like a size yield `None`.
fn parse_size(word: &str, at: usize) -> Result<Option<Size>, ParseDescriptionError> {
    let (number, absolute) = match word.strip_suffix("px") {
        Some(number) => (number, true),
        None => (word, false),
    };
    let looks_numeric = !number.is_empty()
        && number
            .bytes()
            .all(|b| b.is_ascii_digit() || b == b'.' || b == b'-')
        && number.bytes().any(|b| b.is_ascii_digit());
    if !looks_numeric {
        return Ok(None);
    }
    let Ok(value) = number.parse::<f64>() else {
        return Ok(None);
    };
    let scaled = (value * f64::from(SCALE)).round();
    if !(0.0..=f64::from(i32::MAX)).contains(&scaled) {
        return Err(ParseDescriptionError::new(
            ParseDescriptionErrorKind::InvalidSize,
            at,
        ));
    }
    #[expect(
        clippy::cast_possible_truncation,
        reason = "range checked against i32 above"
    )]
    let scaled = scaled as i32;
    Ok(Some(if absolute {
        Size::Absolute(scaled)
    } else {
        Size::Points(scaled)
    }))
}

fn is_keyword(word: &str) -> bool {
    apply_keyword(&mut FontDescription::default(), word)
}

/// Applies a style keyword. Returns false if the word is not a keyword.
fn apply_keyword(desc: &mut FontDescription, word: &str) -> bool {
    if word.eq_ignore_ascii_case("normal") {
        return true;
    }
    if word.eq_ignore_ascii_case("regular") {
        desc.set_weight(FontWeight::NORMAL);
    } else if let Some(style) = FontStyle::from_keyword(word) {
        desc.set_style(style);
    } else if let Some(variant) = FontVariant::from_keyword(word) {
        desc.set_variant(variant);
    } else if let Some(weight) = FontWeight::from_keyword(word) {
        desc.set_weight(weight);
    } else if let Some(width) = FontWidth::from_keyword(word) {
        desc.set_width(width);
    } else {
        return false;
    }
    true
}

/// Parses the comma separated entries following `@`. `at` is the byte
/// offset of the first entry.
fn parse_at_section(
    desc: &mut FontDescription,
    settings: &str,
    at: usize,
) -> Result<(), ParseDescriptionError> {
    let mut variations = Vec::new();
    let mut offset = at;
    for entry in settings.split(',') {
        if let Some(face_id) = entry.strip_prefix("faceid=") {
            if face_id.is_empty() {
                return Err(ParseDescriptionError::new(
                    ParseDescriptionErrorKind::EmptyFaceId,
                    offset,
                ));
            }
            desc.set_face_id(face_id);
        } else if parse_variation(entry).is_some() {
            variations.push(entry);
        } else {
            return Err(ParseDescriptionError::new(
                ParseDescriptionErrorKind::InvalidVariation,
                offset,
            ));
        }
        offset += entry.len() + 1;
    }
    if !variations.is_empty() {
        desc.set_variations(variations.join(","));
    }
    Ok(())
}

fn parse_variation(entry: &str) -> Option<(Tag, f32)> {
    let (tag, value) = entry.split_once('=')?;
    if tag.is_empty() || tag.len() > 4 || !tag.is_ascii() {
        return None;
    }
    let mut bytes = [b' '; 4];
    bytes[..tag.len()].copy_from_slice(tag.as_bytes());
    let value = value.parse::<f32>().ok()?;
    Some((Tag::new(&bytes), value))
}
