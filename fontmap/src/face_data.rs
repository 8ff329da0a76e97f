// Copyright 2026 the Fontmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The interface to the shaping engine's view of a face.

use crate::attributes::{Attributes, FontStyle, FontWeight, FontWidth};
use crate::Blob;
use core::fmt;
use read_fonts::{FontRef, TableProvider};

/// Vertical and horizontal metrics of a face in font units.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct FaceMetrics {
    /// Number of font units per em.
    pub units_per_em: u16,
    /// Distance from the baseline to the top of the line, positive up.
    pub ascent: f32,
    /// Distance from the baseline to the bottom of the line, positive down.
    pub descent: f32,
    /// Extra spacing between lines.
    pub line_gap: f32,
    /// Average advance width of characters.
    pub avg_char_width: f32,
}

impl Default for FaceMetrics {
    fn default() -> Self {
        Self {
            units_per_em: 1000,
            ascent: 800.0,
            descent: 200.0,
            line_gap: 0.0,
            avg_char_width: 500.0,
        }
    }
}

/// Access to the data behind a face.
///
/// This is the seam to the shaping engine: the font map only needs to know
/// whether a face maps a character and how big it is.
pub trait FaceData: fmt::Debug + Send + Sync {
    /// Returns true if the face has a nominal glyph for `ch`.
    fn has_char(&self, ch: char) -> bool;

    /// Returns the face metrics in font units.
    fn metrics(&self) -> FaceMetrics {
        FaceMetrics::default()
    }

    /// Returns true if the face has variation axes.
    fn is_variable(&self) -> bool {
        false
    }
}

/// Face data backed by an in-memory font file.
#[derive(Clone)]
pub struct FontDataFace {
    blob: Blob<u8>,
    index: u32,
    metrics: FaceMetrics,
    attributes: Attributes,
    is_variable: bool,
}

impl FontDataFace {
    /// Creates face data for the font at `index` in the given font file.
    ///
    /// Returns `None` if the data is not a font or the index is out of range.
    pub fn new(blob: Blob<u8>, index: u32) -> Option<Self> {
        let font = FontRef::from_index(blob.as_ref(), index).ok()?;
        let metrics = read_metrics(&font);
        let attributes = read_attributes(&font);
        let is_variable = font
            .fvar()
            .is_ok_and(|fvar| fvar.axis_count() != 0);
        Some(Self {
            blob,
            index,
            metrics,
            attributes,
            is_variable,
        })
    }

    /// Returns the underlying font file.
    pub fn blob(&self) -> &Blob<u8> {
        &self.blob
    }

    /// Returns the index of the font within the file.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Returns the width, style and weight declared by the font tables.
    pub fn attributes(&self) -> Attributes {
        self.attributes
    }

    fn font(&self) -> Option<FontRef<'_>> {
        FontRef::from_index(self.blob.as_ref(), self.index).ok()
    }
}

impl fmt::Debug for FontDataFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontDataFace")
            .field("blob", &self.blob.id())
            .field("index", &self.index)
            .field("metrics", &self.metrics)
            .field("attributes", &self.attributes)
            .field("is_variable", &self.is_variable)
            .finish()
    }
}

impl FaceData for FontDataFace {
    fn has_char(&self, ch: char) -> bool {
        self.font()
            .and_then(|font| font.cmap().ok())
            .and_then(|cmap| cmap.map_codepoint(ch))
            .is_some_and(|gid| gid.to_u32() != 0)
    }

    fn metrics(&self) -> FaceMetrics {
        self.metrics
    }

    fn is_variable(&self) -> bool {
        self.is_variable
    }
}

fn read_metrics(font: &FontRef<'_>) -> FaceMetrics {
    let mut metrics = FaceMetrics::default();
    if let Ok(head) = font.head() {
        metrics.units_per_em = head.units_per_em();
    }
    if let Ok(hhea) = font.hhea() {
        metrics.ascent = f32::from(hhea.ascender().to_i16());
        metrics.descent = -f32::from(hhea.descender().to_i16());
        metrics.line_gap = f32::from(hhea.line_gap().to_i16());
    }
    if let Ok(os2) = font.os2() {
        metrics.avg_char_width = f32::from(os2.x_avg_char_width());
    } else {
        metrics.avg_char_width = f32::from(metrics.units_per_em) / 2.0;
    }
    metrics
}

fn read_attributes(font: &FontRef<'_>) -> Attributes {
    use read_fonts::tables::{head::MacStyle, os2::SelectionFlags};

    fn width_from_width_class(width_class: u16) -> FontWidth {
        FontWidth::from_ratio(match width_class {
            0..=1 => 0.5,
            2 => 0.625,
            3 => 0.75,
            4 => 0.875,
            5 => 1.0,
            6 => 1.125,
            7 => 1.25,
            8 => 1.5,
            _ => 2.0,
        })
    }

    if let Ok(os2) = font.os2() {
        let fs_selection = os2.fs_selection();
        let style = if fs_selection.contains(SelectionFlags::ITALIC) {
            FontStyle::Italic
        } else if fs_selection.contains(SelectionFlags::OBLIQUE) {
            FontStyle::Oblique
        } else {
            FontStyle::Normal
        };
        Attributes::new(
            width_from_width_class(os2.us_width_class()),
            style,
            FontWeight::new(f32::from(os2.us_weight_class())),
        )
    } else if let Ok(head) = font.head() {
        let mac_style = head.mac_style();
        let style = if mac_style.contains(MacStyle::ITALIC) {
            FontStyle::Italic
        } else {
            FontStyle::Normal
        };
        let weight = if mac_style.contains(MacStyle::BOLD) {
            FontWeight::BOLD
        } else {
            FontWeight::NORMAL
        };
        Attributes::new(FontWidth::NORMAL, style, weight)
    } else {
        Attributes::default()
    }
}
