// Copyright 2026 the Fontmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Selection of the best face for a description.

use crate::attributes::{Attributes, FontStyle};
use crate::description::FontDescription;
use crate::face::Face;
use crate::Language;

/// Penalty for matching italic against oblique or the reverse.
const SLANT_MISMATCH: u32 = 1_000_000;

/// Penalty for matching an upright style against a slanted one.
const STYLE_MISMATCH: u32 = 2_000_000;

/// Returns the distance between the requested attributes and those of a
/// face. Smaller is better.
///
/// Style dominates: faces of a different slope are only picked when no
/// face of the requested slope is eligible. Within a style, weight and
/// width differences add up, with width counted in percent.
pub fn distance(query: &Attributes, face: &Attributes) -> u32 {
    let weight = (query.weight.value() - face.weight.value()).abs();
    let width = (query.width.percentage() - face.width.percentage()).abs();
    #[expect(
        clippy::cast_possible_truncation,
        reason = "weights and widths are small positive values"
    )]
    let base = (weight + width).round().min(f32::from(u16::MAX)) as u32;
    let penalty = match (query.style, face.style) {
        (a, b) if a == b => 0,
        (FontStyle::Italic, FontStyle::Oblique) | (FontStyle::Oblique, FontStyle::Italic) => {
            SLANT_MISMATCH
        }
        _ => STYLE_MISMATCH,
    };
    penalty + base
}

/// Returns the best face for the description among `faces`.
///
/// A face whose identifier equals the face id of the description wins
/// outright. Otherwise faces that do not support `language` (when given)
/// or do not cover `ch` (when given) are skipped and the closest of the
/// rest is picked. Equal distances prefer named instances of variable
/// fonts, then variable faces, then the earliest face.
pub(crate) fn best_face(
    faces: &[Face],
    desc: &FontDescription,
    language: Option<&Language>,
    ch: Option<char>,
) -> Option<Face> {
    if let Some(face_id) = desc.face_id() {
        if let Some(face) = faces.iter().find(|face| face.face_id() == face_id) {
            return Some(face.clone());
        }
    }
    let query = desc.attributes();
    let mut best: Option<(&Face, u32)> = None;
    for face in faces {
        if language.is_some_and(|language| !face.supports_language(language)) {
            continue;
        }
        if ch.is_some_and(|ch| !face.has_char(ch)) {
            continue;
        }
        let d = distance(&query, &face.attributes());
        let better = match best {
            None => true,
            Some((best_face, best_d)) => {
                d < best_d || (d == best_d && face.variableness() > best_face.variableness())
            }
        };
        if better {
            best = Some((face, d));
        }
    }
    best.map(|(face, _)| face.clone())
}
