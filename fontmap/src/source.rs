// Copyright 2026 the Fontmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sources of faces for populating a font map.

use crate::face::Face;
use crate::generic::{GenericFamily, GenericFamilyMap};
use crate::Blob;
use read_fonts::types::NameId;
use read_fonts::{FileRef, FontRef, TableProvider};

/// A provider of faces and generic family aliases.
///
/// Platform enumeration backends implement this to feed a font map with
/// the fonts they discover.
pub trait FontSource {
    /// Returns all faces the source provides.
    fn faces(&self) -> Vec<Face>;

    /// Returns the concrete families backing each generic family.
    fn generic_families(&self) -> GenericFamilyMap;
}

/// A font source over faces held in memory.
#[derive(Clone, Default, Debug)]
pub struct MemorySource {
    faces: Vec<Face>,
    generic_families: GenericFamilyMap,
}

impl MemorySource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a face.
    pub fn add_face(&mut self, face: Face) {
        self.faces.push(face);
    }

    /// Adds every font in a font file or collection, named after the
    /// typographic or legacy family name in the font. Returns the number of
    /// faces added.
    pub fn add_font_data(&mut self, blob: Blob<u8>) -> usize {
        let count = match FileRef::new(blob.as_ref()) {
            Ok(FileRef::Font(_)) => 1,
            Ok(FileRef::Collection(collection)) => collection.len(),
            Err(_) => 0,
        };
        let mut added = 0;
        for index in 0..count {
            let Some(family_name) = FontRef::from_index(blob.as_ref(), index)
                .ok()
                .and_then(|font| family_name(&font))
            else {
                continue;
            };
            if let Some(face) = Face::from_font_data(family_name, blob.clone(), index) {
                self.faces.push(face);
                added += 1;
            }
        }
        added
    }

    /// Maps a generic family to concrete family names, replacing any
    /// previous mapping.
    pub fn set_generic_family<S: Into<String>>(
        &mut self,
        generic: GenericFamily,
        families: impl IntoIterator<Item = S>,
    ) {
        self.generic_families.set(generic, families);
    }
}

impl FontSource for MemorySource {
    fn faces(&self) -> Vec<Face> {
        self.faces.clone()
    }

    fn generic_families(&self) -> GenericFamilyMap {
        self.generic_families.clone()
    }
}

/// Reads the family name of a font, preferring the typographic family
/// name and English entries.
fn family_name(font: &FontRef<'_>) -> Option<String> {
    const ENGLISH_US: u16 = 0x0409;
    let name = font.name().ok()?;
    let data = name.string_data();
    [NameId::TYPOGRAPHIC_FAMILY_NAME, NameId::FAMILY_NAME]
        .into_iter()
        .find_map(|id| {
            let mut records = name
                .name_record()
                .iter()
                .filter(|record| record.name_id() == id);
            let first = records.clone().next()?;
            let record = records
                .find(|record| record.language_id() == ENGLISH_US)
                .unwrap_or(first);
            let family: String = record.string(data).ok()?.chars().collect();
            (!family.is_empty()).then_some(family)
        })
}

#[cfg(test)]
mod tests {
    use super::{FontSource, MemorySource};
    use crate::face_data::FaceData;
    use crate::{Blob, Face, GenericFamily};
    use std::sync::Arc;

    #[derive(Debug)]
    struct Empty;

    impl FaceData for Empty {
        fn has_char(&self, _: char) -> bool {
            false
        }
    }

    #[test]
    fn memory_source_lists_faces_and_aliases() {
        let mut source = MemorySource::new();
        source.add_face(Face::builder("Mono", Arc::new(Empty)).build());
        source.set_generic_family(GenericFamily::Monospace, ["Mono"]);
        assert_eq!(source.faces().len(), 1);
        assert_eq!(
            source.generic_families().get(GenericFamily::Monospace),
            ["Mono".to_string()]
        );
    }

    #[test]
    fn invalid_font_data_adds_nothing() {
        let mut source = MemorySource::new();
        let added = source.add_font_data(Blob::new(Arc::new(vec![0_u8; 16])));
        assert_eq!(added, 0);
        assert!(source.faces().is_empty(), "no faces");
    }
}
