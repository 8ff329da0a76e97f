// Copyright 2026 the Fontmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::util::{LATIN, face, init_logger, memory_source, sans_map};
use fontmap::{
    Context, FontDescription, FontMap, FontMapError, FontMapOptions, FontStyle, FontWeight,
    ItemsChanged,
};
use std::sync::{Arc, Mutex};

fn names(map: &FontMap) -> Vec<String> {
    map.families()
        .iter()
        .map(|family| family.name().to_string())
        .collect()
}

#[test]
fn registry_lookup_ignores_case() {
    let map = sans_map();
    let family = map.family("SANS").unwrap();
    assert_eq!(family.name(), "Sans", "declared name is kept");
    assert_eq!(map.get(0), Some(map.family("Han").unwrap()), "sorted by name");
    assert_eq!(names(&map), ["Han", "Sans", "sans-serif"]);
    assert!(map.family("Serif").is_none(), "unknown family");
}

#[test]
fn registry_back_reference_nulls_on_drop() {
    let map = sans_map();
    let family = map.family("Sans").unwrap();
    let face = family.faces()[0].clone();
    assert!(family.font_map().is_some(), "attached");

    drop(map);
    assert!(family.font_map().is_none(), "map is gone");
    assert_eq!(face.family(), Some(family), "faces still know their family");
}

#[test]
fn registry_removing_last_face_removes_family() {
    let map = sans_map();
    let face = map.family("Han").unwrap().faces()[0].clone();
    map.remove_face(&face);
    assert!(map.family("Han").is_none(), "empty family removed");
    assert!(face.family().is_none(), "face detached");
    assert_eq!(names(&map), ["Sans", "sans-serif"]);
}

#[test]
fn registry_generic_family_ownership() {
    let map = sans_map();
    let other = FontMap::new();
    let generic = map.family("sans-serif").unwrap();
    assert!(generic.is_generic(), "generic family");
    assert_eq!(
        other.add_family(generic.clone()),
        Err(FontMapError::FamilyOwnedElsewhere)
    );
    assert_eq!(
        other.remove_family(&generic),
        Err(FontMapError::FamilyNotOwned)
    );
    map.remove_family(&generic).unwrap();
    other.add_family(generic.clone()).unwrap();
    assert!(map.family("sans-serif").is_none(), "detached");
    assert_eq!(other.family("sans-serif"), Some(generic), "moved to the other map");
}

#[test]
fn registry_serial_never_zero() {
    let map = FontMap::new();
    assert_eq!(map.serial(), 1, "initial serial");
    let mut last = map.serial();
    for i in 0..8 {
        map.add_face(face(&format!("Family {i}"), [LATIN]));
        assert!(map.serial() > last, "serial increases");
        assert_ne!(map.serial(), 0, "zero is never used");
        last = map.serial();
    }
}

#[test]
fn registry_observers_see_changes() {
    let map = sans_map();
    let changes = Arc::new(Mutex::new(Vec::new()));
    let sink = changes.clone();
    let id = map.connect_items_changed(move |change| sink.lock().unwrap().push(*change));

    map.add_face(face("Arial", [LATIN]));
    map.add_face(face("Sans", [LATIN]));
    let han = map.family("Han").unwrap();
    map.remove_family(&han).unwrap();
    assert!(map.disconnect(id), "was connected");
    map.add_face(face("Zapf", [LATIN]));

    assert_eq!(
        *changes.lock().unwrap(),
        [
            ItemsChanged {
                position: 0,
                removed: 0,
                added: 1,
            },
            ItemsChanged {
                position: 1,
                removed: 1,
                added: 0,
            },
        ],
        "insert Arial at the front, remove Han after it"
    );
}

#[test]
fn registry_repopulate_from_source() {
    init_logger();
    let source = memory_source();
    let map = FontMap::with_source(FontMapOptions::default(), &source);
    assert_eq!(names(&map), ["Mono", "monospace", "serif", "Times"]);
    let times = map.family("Times").unwrap();
    let mut styles: Vec<_> = times.faces().iter().map(|face| face.name().to_string()).collect();
    styles.sort();
    assert_eq!(
        styles,
        ["Bold", "Bold Italic", "Italic", "Regular"],
        "italic variants synthesized, bold kept"
    );
    assert!(
        !times.face("Bold").unwrap().is_synthetic(),
        "real bold face preferred"
    );
    assert_eq!(
        map.family("monospace").unwrap().members(),
        [map.family("Mono").unwrap()],
        "unknown aliases skipped"
    );
    assert!(map.family("cursive").is_none(), "no members, no family");
}

#[test]
fn registry_synthetic_faces_render() {
    init_logger();
    let map = FontMap::with_source(FontMapOptions::default(), &memory_source());
    let desc: FontDescription = "Mono Bold Italic 12".parse().unwrap();
    let font = map.load_font(&desc, &Context::new()).unwrap();
    let face = font.face();
    assert!(face.is_synthetic(), "synthesized from the regular face");
    assert!(face.embolden(), "bold is synthesized by emboldening");
    assert!(!font.transform().is_identity(), "italic is synthesized by slanting");
    assert_eq!(face.attributes().style, FontStyle::Italic);
    assert_eq!(face.attributes().weight, FontWeight::BOLD);
    assert!(font.has_char('A'), "coverage carried over");
}

#[test]
fn registry_repopulate_keeps_added_items() {
    init_logger();
    let map = FontMap::with_options(FontMapOptions {
        synthesize_faces: false,
        ..Default::default()
    });
    map.add_face(face("Extra", [LATIN]));
    let changes = Arc::new(Mutex::new(Vec::new()));
    let sink = changes.clone();
    map.connect_items_changed(move |change| sink.lock().unwrap().push(*change));

    map.repopulate(&memory_source(), false);
    assert_eq!(
        names(&map),
        ["Extra", "Mono", "monospace", "serif", "Times"],
        "added face survives"
    );
    assert_eq!(map.family("Times").unwrap().faces().len(), 2, "no synthesis");
    assert_eq!(
        *changes.lock().unwrap(),
        [ItemsChanged {
            position: 0,
            removed: 1,
            added: 5,
        }],
        "one notification for the whole list"
    );
}

#[test]
fn registry_repopulate_keeps_generic_members() {
    let map = sans_map();
    map.repopulate(&memory_source(), false);
    let generic = map.family("sans-serif").unwrap();
    assert_eq!(
        generic.members(),
        [map.family("Sans").unwrap(), map.family("Han").unwrap()],
        "members follow the rebuilt families"
    );
    let desc: FontDescription = "sans-serif 12".parse().unwrap();
    let fontset = map.load_fontset(&desc, &Context::new());
    assert_eq!(
        fontset.get_font('A').map(|font| font.face().family_name().to_string()),
        Some("Sans".to_string()),
        "the default chain still renders"
    );
    assert_eq!(
        fontset
            .get_font('\u{4E2D}')
            .map(|font| font.face().family_name().to_string()),
        Some("Han".to_string())
    );
}

#[test]
fn registry_generic_members_follow_replaced_families() {
    let map = sans_map();
    let generic = map.family("sans-serif").unwrap();
    map.remove_family(&map.family("Sans").unwrap()).unwrap();
    assert_eq!(
        generic.member_names(),
        [Arc::<str>::from("Sans"), Arc::from("Han")],
        "names are kept while the family is gone"
    );
    map.add_face(face("Sans", [LATIN]));
    assert_eq!(
        generic.members(),
        [map.family("Sans").unwrap(), map.family("Han").unwrap()],
        "the new family takes the old one's place"
    );
}

#[test]
fn registry_rejects_faces_of_other_maps() {
    let map = sans_map();
    let other = FontMap::new();
    let sans = map.family("Sans").unwrap().faces()[0].clone();
    let serial = other.serial();
    other.add_face(sans.clone());
    assert!(other.is_empty(), "face stays with its map");
    assert_eq!(other.serial(), serial, "nothing changed");
    assert_eq!(sans.family(), map.family("Sans"), "owner unchanged");

    map.remove_face(&sans);
    assert!(map.family("Sans").is_none(), "still removable from its map");
    other.add_face(sans);
    assert!(other.family("Sans").is_some(), "detached faces can move");
}
