// Copyright 2026 the Fontmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::util::{CJK, LATIN, face, init_logger, sans_map, styled_face};
use fontmap::{
    Context, Face, Family, FontDescription, FontMap, FontStyle, FontWeight, FontsetItem,
    Language, QueryStatus,
};

fn desc(s: &str) -> FontDescription {
    s.parse().unwrap()
}

fn language(s: &str) -> Language {
    s.parse().unwrap()
}

/// The "Sans" family covering Latin and a generic "sans-serif" family that
/// aggregates only "Sans".
fn latin_only_map() -> (FontMap, Face) {
    init_logger();
    let map = FontMap::new();
    let regular = face("Sans", [LATIN]);
    map.add_face(regular.clone());
    let generic = Family::new_generic("sans-serif");
    generic.add_member(&map.family("Sans").unwrap());
    map.add_family(generic).unwrap();
    (map, regular)
}

#[test]
fn fallback_requested_generic_scenario() {
    let (map, regular) = latin_only_map();
    let key = map.fontset_key(&desc("Sans, sans-serif 12"), &Context::new());
    let items = map.resolve(&key);
    assert_eq!(items.len(), 2, "one item per requested family");
    assert!(
        matches!(&items[0], FontsetItem::Font(font) if font.face() == &regular),
        "Sans regular first"
    );
    assert!(
        matches!(&items[1], FontsetItem::Generic(generic) if generic.family().name() == "sans-serif"),
        "generic family deferred"
    );

    let fontset = map.load(&key);
    let latin = fontset.get_font('A').unwrap();
    assert_eq!(latin.face(), &regular, "Sans covers Latin");
    let han = fontset.get_font('\u{4E2D}');
    assert_eq!(
        han.map(|font| font.face().clone()),
        Some(regular),
        "the generic family falls back to its only member"
    );
}

#[test]
fn fallback_never_empty_for_populated_map() {
    let map = sans_map();
    let fontset = map.load_fontset(&desc("Nonexistent 12"), &Context::new());
    assert_eq!(fontset.len(), 1, "default generic family");
    assert!(
        matches!(&fontset.items()[0], FontsetItem::Generic(generic) if generic.family().name() == "sans-serif"),
        "sans-serif appended"
    );
    assert!(fontset.get_font('A').is_some(), "something renders");
}

#[test]
fn fallback_empty_map_yields_empty_fontset() {
    init_logger();
    let map = FontMap::new();
    let fontset = map.load_fontset(&desc("Sans 12"), &Context::new());
    assert!(fontset.is_empty(), "nothing to fall back to");
    assert_eq!(fontset.get_font('A'), None, "draw a missing glyph");
    assert_eq!(map.cached_fontsets(), 0, "empty fontsets are not cached");
}

#[test]
fn fallback_generic_picks_covering_member() {
    let map = sans_map();
    let fontset = map.load_fontset(&desc("sans-serif 12"), &Context::new());
    assert_eq!(
        fontset.get_font('A').unwrap().face().family_name(),
        "Sans",
        "first member covering Latin"
    );
    assert_eq!(
        fontset.get_font('\u{4E2D}').unwrap().face().family_name(),
        "Han",
        "later member covering CJK"
    );
    assert_eq!(
        fontset.get_font('\u{1F600}').unwrap().face().family_name(),
        "Sans",
        "last resort is the first member"
    );
}

#[test]
fn fallback_exact_font_beats_earlier_fuzzy_pick() {
    let map = sans_map();
    map.add_face(face("Emoji", ['\u{1F600}'..='\u{1F64F}']));
    // The generic family only has a last-resort answer for the emoji, the
    // explicitly listed "Emoji" family covers it.
    let fontset = map.load_fontset(&desc("sans-serif, Emoji 12"), &Context::new());
    assert_eq!(
        fontset.get_font('\u{1F600}').unwrap().face().family_name(),
        "Emoji",
        "exact coverage wins"
    );
}

#[test]
fn fallback_memo_survives_map_mutation() {
    let map = sans_map();
    let fontset = map.load_fontset(&desc("Sans 12"), &Context::new());
    let before = fontset.get_font('A').unwrap();

    map.remove_family(&map.family("Sans").unwrap()).unwrap();
    map.add_face(face("Sans", [LATIN]));
    assert_eq!(
        fontset.get_font('A'),
        Some(before.clone()),
        "the fontset keeps its answer"
    );
    let rebuilt = map.load_fontset(&desc("Sans 12"), &Context::new());
    assert_ne!(
        rebuilt.get_font('A'),
        Some(before),
        "new fontsets see the new face"
    );
}

#[test]
fn fallback_prefers_language_members() {
    init_logger();
    let map = FontMap::new();
    map.add_face(
        Face::builder("Mincho", crate::util::TestFace::new([CJK]))
            .languages([language("ja")])
            .build(),
    );
    map.add_face(
        Face::builder("Song", crate::util::TestFace::new([CJK]))
            .languages([language("zh")])
            .build(),
    );
    let generic = Family::new_generic("serif");
    for name in ["Mincho", "Song"] {
        generic.add_member(&map.family(name).unwrap());
    }
    map.add_family(generic).unwrap();

    let desc = desc("serif 12");
    let chinese = map.load_fontset(&desc, &Context::new().with_language(language("zh-CN")));
    let japanese = map.load_fontset(&desc, &Context::new().with_language(language("ja")));
    let korean = map.load_fontset(&desc, &Context::new().with_language(language("ko")));
    let han = '\u{6F22}';
    assert_eq!(chinese.get_font(han).unwrap().face().family_name(), "Song", "zh member");
    assert_eq!(japanese.get_font(han).unwrap().face().family_name(), "Mincho", "ja member");
    assert_eq!(
        korean.get_font(han).unwrap().face().family_name(),
        "Mincho",
        "no member supports ko, the first covering one is used"
    );
}

#[test]
fn fallback_closest_style() {
    init_logger();
    let map = FontMap::new();
    map.add_face(styled_face("Serif", FontStyle::Normal, FontWeight::NORMAL));
    map.add_face(styled_face("Serif", FontStyle::Italic, FontWeight::NORMAL));
    map.add_face(styled_face("Serif", FontStyle::Normal, FontWeight::BOLD));
    let context = Context::new();

    let pick = |s: &str| {
        let font = map.load_font(&desc(s), &context).unwrap();
        (font.face().attributes().style, font.face().attributes().weight)
    };
    assert_eq!(pick("Serif 12"), (FontStyle::Normal, FontWeight::NORMAL), "regular");
    assert_eq!(pick("Serif Heavy 12"), (FontStyle::Normal, FontWeight::BOLD), "heaviest");
    assert_eq!(
        pick("Serif Oblique 12"),
        (FontStyle::Italic, FontWeight::NORMAL),
        "italic stands in for oblique"
    );
    assert_eq!(
        pick("Serif Bold Italic 12"),
        (FontStyle::Italic, FontWeight::NORMAL),
        "slope matters more than weight"
    );
}

#[test]
fn fallback_foreach_realizes_generic_items() {
    let map = sans_map();
    let fontset = map.load_fontset(&desc("Han, sans-serif 12"), &Context::new());
    let mut families = Vec::new();
    fontset.foreach(|font| {
        families.push(font.face().family_name().to_string());
        QueryStatus::Continue
    });
    assert_eq!(families, ["Han", "Sans"], "generic family yields its first member");
    assert_eq!(
        fontset.metrics().height,
        fontset
            .first_font()
            .map(|font| font.metrics().height)
            .unwrap_or_default(),
        "equal face metrics"
    );
}

#[test]
fn fallback_fontsets_ignore_later_registry_changes() {
    let map = sans_map();
    let fontset = map.load_fontset(&desc("sans-serif 12"), &Context::new());
    let sans = fontset.first_font().unwrap();
    assert_eq!(sans.face().family_name(), "Sans");

    map.remove_family(&map.family("Sans").unwrap()).unwrap();
    assert_eq!(fontset.first_font(), Some(sans.clone()), "first font is fixed");
    let mut families = Vec::new();
    fontset.foreach(|font| {
        families.push(font.face().family_name().to_string());
        QueryStatus::Continue
    });
    assert_eq!(families, ["Sans"], "iteration is fixed");
    assert_eq!(
        fontset.get_font('B'),
        Some(sans),
        "new characters use the members the fontset was built with"
    );

    let rebuilt = map.load_fontset(&desc("sans-serif 12"), &Context::new());
    assert_eq!(
        rebuilt.get_font('B').unwrap().face().family_name(),
        "Han",
        "only new fontsets see the change"
    );
}

#[test]
fn fallback_map_serves_an_empty_map() {
    let fallback = sans_map();
    let map = FontMap::new();
    map.set_fallback(Some(fallback.clone())).unwrap();
    assert_eq!(map.fallback(), Some(fallback));

    let fontset = map.load_fontset(&desc("Sans 12"), &Context::new());
    assert_eq!(fontset.len(), 2, "the fallback chain is appended");
    assert_eq!(
        fontset.get_font('A').unwrap().face().family_name(),
        "Sans"
    );
    assert_eq!(map.cached_fontsets(), 1, "the result is cached");
}

#[test]
fn fallback_map_used_without_generic_family() {
    let fallback = sans_map();
    init_logger();
    let map = FontMap::new();
    map.add_face(face("Mono", [LATIN]));
    map.set_fallback(Some(fallback.clone())).unwrap();

    let fontset = map.load_fontset(&desc("Mono 12"), &Context::new());
    assert!(
        matches!(&fontset.items()[0], FontsetItem::Font(font) if font.face().family_name() == "Mono"),
        "own families first"
    );
    assert_eq!(fontset.len(), 2, "fallback default generic appended");
    assert_eq!(
        fontset.get_font('\u{4E2D}').unwrap().face().family_name(),
        "Han",
        "covered by the fallback map"
    );

    fallback.add_face(face("Emoji", ['\u{1F600}'..='\u{1F64F}']));
    let reloaded = map.load_fontset(&desc("Mono 12"), &Context::new());
    assert_ne!(reloaded, fontset, "fallback changes invalidate the cache");

    let generic = Family::new_generic("sans-serif");
    generic.add_member(&map.family("Mono").unwrap());
    map.add_family(generic).unwrap();
    let own = map.load_fontset(&desc("Mono 12"), &Context::new());
    assert!(
        matches!(&own.items()[1], FontsetItem::Generic(generic) if generic.family().font_map() == Some(map.clone())),
        "own generic family preferred"
    );
    assert_eq!(own.len(), 2, "fallback not consulted");
}
