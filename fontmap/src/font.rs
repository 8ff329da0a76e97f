// Copyright 2026 the Fontmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Realized fonts.

use crate::coverage::CoverageLevel;
use crate::description::{FontDescription, SCALE};
use crate::face::Face;
use crate::key::{FontKey, FontsetKey};
use crate::matrix::Matrix;
use core::fmt;
use std::sync::Arc;

/// Metrics of a font in device pixels.
#[derive(Copy, Clone, PartialEq, Default, Debug)]
pub struct FontMetrics {
    /// Distance from the baseline to the top of the line.
    pub ascent: f32,
    /// Distance from the baseline to the bottom of the line.
    pub descent: f32,
    /// Distance between consecutive baselines.
    pub height: f32,
    /// Average advance width of characters.
    pub approximate_char_width: f32,
}

/// A face realized at a size, transform and variation setting.
///
/// Fonts are shared handles: cloning is cheap and equality is identity.
#[derive(Clone)]
pub struct Font(Arc<FontInner>);

struct FontInner {
    key: FontKey,
    face: Face,
    description: FontDescription,
    matrix: Matrix,
}

impl Font {
    /// Realizes `face` for the fontset identified by `key`.
    pub(crate) fn new(face: &Face, key: &FontsetKey) -> Self {
        let mut description = face.description().clone();
        description.set_absolute_size(key.pixel_size());
        if let Some(variations) = key.variations() {
            description.set_variations(variations);
        }
        Self(Arc::new(FontInner {
            key: key.font_key(face),
            face: face.clone(),
            description,
            matrix: *key.matrix(),
        }))
    }

    /// Returns the identity of the font.
    pub fn key(&self) -> &FontKey {
        &self.0.key
    }

    /// Returns the face the font was realized from.
    pub fn face(&self) -> &Face {
        &self.0.face
    }

    /// Returns a description of the font with an absolute size.
    pub fn description(&self) -> &FontDescription {
        &self.0.description
    }

    /// Returns the size in device units scaled by [`SCALE`].
    pub fn pixel_size(&self) -> i32 {
        self.0.key.pixel_size()
    }

    /// Returns the transform from the loading context.
    pub fn matrix(&self) -> &Matrix {
        &self.0.matrix
    }

    /// Returns the full transform to render with: the context transform
    /// followed by any synthetic slant of the face.
    pub fn transform(&self) -> Matrix {
        self.0.matrix.concat(&self.0.face.transform())
    }

    /// Returns the variation settings.
    pub fn variations(&self) -> Option<&str> {
        self.0.description.variations()
    }

    /// Returns how well the font covers `ch`.
    pub fn coverage(&self, ch: char) -> CoverageLevel {
        self.0.face.coverage(ch)
    }

    /// Returns true if the font covers `ch`.
    pub fn has_char(&self, ch: char) -> bool {
        self.0.face.has_char(ch)
    }

    /// Returns the metrics of the font in device pixels.
    pub fn metrics(&self) -> FontMetrics {
        let face = self.0.face.data().metrics();
        let upem = f32::from(face.units_per_em.max(1));
        let scale = self.pixel_size() as f32 / SCALE as f32 / upem;
        FontMetrics {
            ascent: face.ascent * scale,
            descent: face.descent * scale,
            height: (face.ascent + face.descent + face.line_gap) * scale,
            approximate_char_width: face.avg_char_width * scale,
        }
    }
}

impl PartialEq for Font {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Font {}

impl fmt::Debug for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Font")
            .field("face", &self.0.face)
            .field("pixel_size", &self.pixel_size())
            .field("matrix", &self.0.matrix)
            .finish_non_exhaustive()
    }
}
