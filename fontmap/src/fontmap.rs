// Copyright 2026 the Fontmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The font map: registry of families and cache of fontsets.

use crate::cache::LruCache;
use crate::description::FontDescription;
use crate::error::FontMapError;
use crate::face::Face;
use crate::family::Family;
use crate::family_name::{NameMap, cmp_names};
use crate::font::Font;
use crate::fontset::{Fontset, FontsetItem};
use crate::key::{Context, FontKey, FontsetKey};
use crate::resolve::resolve;
use crate::source::FontSource;
use crate::util::lock;
use core::cmp::Ordering as CmpOrdering;
use core::fmt;
use core::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use hashbrown::HashMap;
use std::sync::{Arc, Mutex, Weak};

/// Options for a [`FontMap`].
#[derive(Clone, Debug)]
pub struct FontMapOptions {
    /// Maximum number of fontsets kept in the cache. Zero disables
    /// caching.
    pub fontset_cache_size: usize,
    /// Resolution in dots per inch used to convert point sizes to pixels.
    pub resolution: f32,
    /// Whether [`FontMap::with_source`] synthesizes missing italic and bold
    /// faces.
    pub synthesize_faces: bool,
}

impl Default for FontMapOptions {
    fn default() -> Self {
        Self {
            fontset_cache_size: 256,
            resolution: 96.0,
            synthesize_faces: true,
        }
    }
}

/// A change to the family list of a font map.
///
/// At `position`, `removed` families were removed and then `added`
/// families were inserted.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct ItemsChanged {
    /// Index of the first changed family.
    pub position: usize,
    /// Number of families removed.
    pub removed: usize,
    /// Number of families added.
    pub added: usize,
}

/// Handle for a registered change observer.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct ObserverId(u64);

impl ObserverId {
    fn new() -> Self {
        static ID_COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

type Observer = Arc<dyn Fn(&ItemsChanged) + Send + Sync>;

/// Registry of font families with a cache of loaded fontsets.
///
/// The family list is kept sorted by name, ignoring case, and can be
/// observed with [`connect_items_changed`](Self::connect_items_changed).
/// Every mutation drops all cached fontsets and fonts and bumps the
/// [`serial`](Self::serial). Fontsets loaded before a mutation keep
/// working with the state they were built from.
///
/// `FontMap` is a shared handle: clones refer to the same map and equality
/// is identity.
#[derive(Clone)]
pub struct FontMap {
    inner: Arc<MapInner>,
}

pub(crate) struct MapInner {
    serial: AtomicU32,
    state: Mutex<MapState>,
    fonts: Mutex<HashMap<FontKey, Font>>,
    observers: Mutex<Vec<(ObserverId, Observer)>>,
}

struct MapState {
    resolution: f32,
    families: Vec<Family>,
    names: NameMap<Family>,
    added_faces: Vec<Face>,
    added_families: Vec<Family>,
    fontsets: LruCache<FontsetKey, Fontset>,
    /// Bumped whenever the caches are cleared.
    generation: u64,
    fallback: Option<Fallback>,
}

struct Fallback {
    map: FontMap,
    /// Serial of `map` when the cache was last valid for it.
    serial: u32,
}

impl MapInner {
    /// Returns the font for `face` in the fontset identified by `key`,
    /// sharing fonts with equal keys.
    pub(crate) fn font_for_face(&self, face: &Face, key: &FontsetKey) -> Font {
        lock(&self.fonts)
            .entry(key.font_key(face))
            .or_insert_with(|| Font::new(face, key))
            .clone()
    }

    fn bump_serial(&self) {
        let _ = self
            .serial
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |serial| {
                Some(match serial.wrapping_add(1) {
                    0 => 1,
                    next => next,
                })
            });
    }
}

impl FontMap {
    /// Creates an empty font map with default options.
    pub fn new() -> Self {
        Self::with_options(FontMapOptions::default())
    }

    /// Creates an empty font map with the given options.
    ///
    /// An invalid resolution is replaced with the default.
    pub fn with_options(options: FontMapOptions) -> Self {
        let resolution = if valid_resolution(options.resolution) {
            options.resolution
        } else {
            log::warn!(
                "invalid resolution {}, using the default",
                options.resolution
            );
            FontMapOptions::default().resolution
        };
        Self {
            inner: Arc::new(MapInner {
                serial: AtomicU32::new(1),
                state: Mutex::new(MapState {
                    resolution,
                    families: Vec::new(),
                    names: NameMap::default(),
                    added_faces: Vec::new(),
                    added_families: Vec::new(),
                    fontsets: LruCache::new(options.fontset_cache_size),
                    generation: 0,
                    fallback: None,
                }),
                fonts: Mutex::default(),
                observers: Mutex::default(),
            }),
        }
    }

    /// Creates a font map populated from `source`, synthesizing faces if
    /// the options ask for it.
    pub fn with_source(options: FontMapOptions, source: &dyn FontSource) -> Self {
        let synthesize = options.synthesize_faces;
        let map = Self::with_options(options);
        map.repopulate(source, synthesize);
        map
    }

    pub(crate) fn from_inner(inner: Arc<MapInner>) -> Self {
        Self { inner }
    }

    /// Returns the change serial.
    ///
    /// The serial starts at 1, increases with every change and never
    /// becomes 0, so 0 can be used as "never seen".
    pub fn serial(&self) -> u32 {
        self.inner.serial.load(Ordering::Acquire)
    }

    /// Notes that the font configuration changed outside of the map.
    ///
    /// Drops all cached fontsets and bumps the serial.
    pub fn changed(&self) {
        self.clear_caches(&mut lock(&self.inner.state));
        self.inner.bump_serial();
    }

    /// Returns the resolution in dots per inch.
    pub fn resolution(&self) -> f32 {
        lock(&self.inner.state).resolution
    }

    /// Sets the resolution in dots per inch.
    ///
    /// Changing the resolution drops all cached fontsets and bumps the
    /// serial. Setting the current value does nothing.
    pub fn set_resolution(&self, resolution: f32) -> Result<(), FontMapError> {
        if !valid_resolution(resolution) {
            return Err(FontMapError::InvalidResolution);
        }
        {
            let mut state = lock(&self.inner.state);
            if state.resolution == resolution {
                return Ok(());
            }
            state.resolution = resolution;
            self.clear_caches(&mut state);
        }
        self.inner.bump_serial();
        Ok(())
    }

    /// Adds a face to the family it names, creating the family if needed.
    ///
    /// Faces added this way survive [`repopulate`](Self::repopulate). A
    /// face that already belongs to a font map is not added again.
    pub fn add_face(&self, face: Face) {
        let change = {
            let mut state = lock(&self.inner.state);
            if let Some(owner) = face.family().and_then(|family| family.map_slot().upgrade()) {
                if Arc::ptr_eq(&owner, &self.inner) {
                    log::warn!("face {} is already in this font map", face.face_id());
                } else {
                    log::warn!("face {} belongs to another font map", face.face_id());
                }
                return;
            }
            let change = self.insert_face(&mut state, &face);
            if change.is_some() {
                relink_generics(&state);
            }
            state.added_faces.push(face);
            self.clear_caches(&mut state);
            change
        };
        self.inner.bump_serial();
        if let Some(change) = change {
            self.notify(&change);
        }
    }

    /// Removes a face from its family, removing the family as well when it
    /// becomes empty.
    ///
    /// Removing a face this map does not own is a programming error: it is
    /// reported and otherwise ignored.
    pub fn remove_face(&self, face: &Face) {
        let family = face
            .family()
            .filter(|family| Weak::ptr_eq(&family.map_slot(), &Arc::downgrade(&self.inner)));
        let Some(family) = family else {
            log::warn!("face {} is not in this font map", face.face_id());
            debug_assert!(false, "removing face {} not owned by the font map", face.face_id());
            return;
        };
        let change = {
            let mut state = lock(&self.inner.state);
            family.remove_face(face);
            state.added_faces.retain(|added| added != face);
            let change = if family.face_count() == 0 {
                self.detach_family(&mut state, &family)
            } else {
                None
            };
            self.clear_caches(&mut state);
            change
        };
        self.inner.bump_serial();
        if let Some(change) = change {
            self.notify(&change);
        }
    }

    /// Adds a family, typically a generic one.
    ///
    /// Families added this way survive [`repopulate`](Self::repopulate).
    pub fn add_family(&self, family: Family) -> Result<(), FontMapError> {
        let change = {
            let mut state = lock(&self.inner.state);
            if let Some(owner) = family.map_slot().upgrade() {
                return Err(if Arc::ptr_eq(&owner, &self.inner) {
                    FontMapError::DuplicateFamily
                } else {
                    FontMapError::FamilyOwnedElsewhere
                });
            }
            if state.names.contains(family.name()) {
                return Err(FontMapError::DuplicateFamily);
            }
            let change = self.insert_family(&mut state, family.clone());
            relink_generics(&state);
            state.added_families.push(family);
            self.clear_caches(&mut state);
            change
        };
        self.inner.bump_serial();
        self.notify(&change);
        Ok(())
    }

    /// Removes a family and, for ordinary families, all of its faces.
    pub fn remove_family(&self, family: &Family) -> Result<(), FontMapError> {
        if !Weak::ptr_eq(&family.map_slot(), &Arc::downgrade(&self.inner)) {
            return Err(FontMapError::FamilyNotOwned);
        }
        let change = {
            let mut state = lock(&self.inner.state);
            let change = self.detach_family(&mut state, family);
            state.added_families.retain(|added| added != family);
            state.added_faces.retain(|face| !face.is_owned_by(family));
            self.clear_caches(&mut state);
            change
        };
        self.inner.bump_serial();
        if let Some(change) = change {
            self.notify(&change);
        }
        Ok(())
    }

    /// Returns the family with the given name, ignoring case.
    pub fn family(&self, name: &str) -> Option<Family> {
        lock(&self.inner.state).names.get(name).cloned()
    }

    /// Returns all families sorted by name.
    pub fn families(&self) -> Vec<Family> {
        lock(&self.inner.state).families.clone()
    }

    /// Returns the family at `index` in the sorted family list.
    pub fn get(&self, index: usize) -> Option<Family> {
        lock(&self.inner.state).families.get(index).cloned()
    }

    /// Returns the number of families.
    pub fn len(&self) -> usize {
        lock(&self.inner.state).families.len()
    }

    /// Returns true if the map has no families.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replaces all families with those provided by `source`.
    ///
    /// Faces and families added explicitly are added back afterwards. With
    /// `add_synthetic`, every ordinary family with a regular face but no
    /// italic, bold or bold italic face gets a synthetic one. Generic
    /// families are built for the aliases `source` maps to known families.
    pub fn repopulate(&self, source: &dyn FontSource, add_synthetic: bool) {
        let faces = source.faces();
        let generic_families = source.generic_families();
        let change = {
            let mut state = lock(&self.inner.state);
            let removed = state.families.len();
            for family in state.families.drain(..) {
                family.set_map_slot(Weak::new());
            }
            state.names.clear();

            let added_faces = state.added_faces.clone();
            for face in faces.iter().chain(&added_faces) {
                self.insert_face(&mut state, face);
            }
            let mut synthesized = 0;
            if add_synthetic {
                for family in &state.families {
                    synthesized += family.synthesize_faces().len();
                }
            }

            for (generic, names) in generic_families.iter() {
                if state.names.contains(generic.name()) {
                    continue;
                }
                let family = Family::new_generic(generic.name());
                for name in names {
                    match state.names.get(name) {
                        Some(member) if !member.is_generic() => family.add_member(member),
                        _ => log::debug!("{generic} alias {name} is not an ordinary family"),
                    }
                }
                if !family.members().is_empty() {
                    self.insert_family(&mut state, family);
                }
            }

            let added_families = state.added_families.clone();
            for family in added_families {
                if state.names.contains(family.name()) {
                    log::warn!("family {} shadowed after repopulating", family.name());
                    continue;
                }
                self.insert_family(&mut state, family);
            }
            relink_generics(&state);
            self.clear_caches(&mut state);
            log::debug!(
                "repopulated font map with {} families, {} faces, {} synthesized",
                state.families.len(),
                faces.len() + added_faces.len(),
                synthesized
            );
            ItemsChanged {
                position: 0,
                removed,
                added: state.families.len(),
            }
        };
        self.inner.bump_serial();
        self.notify(&change);
    }

    /// Returns the fontset key for `desc` in `context` at the current
    /// resolution.
    pub fn fontset_key(&self, desc: &FontDescription, context: &Context) -> FontsetKey {
        FontsetKey::new(desc, context, self.resolution())
    }

    /// Loads the fontset for `desc` in `context`.
    pub fn load_fontset(&self, desc: &FontDescription, context: &Context) -> Fontset {
        let key = self.fontset_key(desc, context);
        self.load(&key)
    }

    /// Loads the fontset for `key`, from the cache when possible.
    ///
    /// When the chain contains no generic family, the fontset of the
    /// [`fallback`](Self::set_fallback) map is appended. A map without
    /// families or fallback yields an empty fontset that is not cached.
    pub fn load(&self, key: &FontsetKey) -> Fontset {
        let (mut items, fallback, generation) = {
            let mut state = lock(&self.inner.state);
            self.check_fallback(&mut state);
            if let Some(fontset) = state.fontsets.get(key) {
                log::trace!("fontset cache hit for {}", key.description());
                return fontset.clone();
            }
            log::trace!("fontset cache miss for {}", key.description());
            let fallback = state.fallback.as_ref().map(|fallback| fallback.map.clone());
            let items = if state.families.is_empty() {
                if fallback.is_none() {
                    log::warn!("font map contains no fonts");
                    return Fontset::new(key.clone(), Vec::new(), Arc::downgrade(&self.inner));
                }
                Vec::new()
            } else {
                self.resolve_with(&state, key)
            };
            (items, fallback, state.generation)
        };
        if let Some(fallback) = fallback {
            if !items
                .iter()
                .any(|item| matches!(item, FontsetItem::Generic(_)))
            {
                log::trace!("appending fallback fontset for {}", key.description());
                items.extend(fallback.load(key).items().iter().cloned());
            }
        }
        if items.is_empty() {
            log::warn!(
                "all font fallbacks failed for {} in {}",
                key.description(),
                key.language()
                    .map_or_else(|| "any language".to_string(), ToString::to_string)
            );
        }
        let fontset = Fontset::new(key.clone(), items, Arc::downgrade(&self.inner));
        let mut state = lock(&self.inner.state);
        // The map may have changed while the fallback was loading.
        if state.generation == generation {
            if let Some((evicted, _)) = state
                .fontsets
                .insert(fontset.key().clone(), fontset.clone())
            {
                log::debug!("evicted fontset {}", evicted.description());
            }
        }
        fontset
    }

    /// Loads the first font of the fontset for `desc` in `context`.
    pub fn load_font(&self, desc: &FontDescription, context: &Context) -> Option<Font> {
        self.load_fontset(desc, context).first_font()
    }

    /// Builds the fallback chain for `key` without consulting or filling
    /// the fontset cache.
    ///
    /// Only this map's families are consulted, not the fallback map.
    pub fn resolve(&self, key: &FontsetKey) -> Vec<FontsetItem> {
        let state = lock(&self.inner.state);
        if state.families.is_empty() {
            log::warn!("font map contains no fonts");
        }
        self.resolve_with(&state, key)
    }

    /// Returns the fallback map.
    pub fn fallback(&self) -> Option<Self> {
        lock(&self.inner.state)
            .fallback
            .as_ref()
            .map(|fallback| fallback.map.clone())
    }

    /// Sets the map consulted for descriptions this map has no generic
    /// family for, or clears it with `None`.
    ///
    /// Changing the fallback drops all cached fontsets and bumps the
    /// serial. Changes to the fallback map itself are picked up on the
    /// next load.
    pub fn set_fallback(&self, fallback: Option<Self>) -> Result<(), FontMapError> {
        let mut next = fallback.clone();
        while let Some(map) = next {
            if Arc::ptr_eq(&map.inner, &self.inner) {
                return Err(FontMapError::FallbackCycle);
            }
            next = map.fallback();
        }
        {
            let mut state = lock(&self.inner.state);
            let unchanged = match (&state.fallback, &fallback) {
                (Some(current), Some(new)) => Arc::ptr_eq(&current.map.inner, &new.inner),
                (None, None) => true,
                _ => false,
            };
            if unchanged {
                return Ok(());
            }
            state.fallback = fallback.map(|map| Fallback {
                serial: map.serial(),
                map,
            });
            self.clear_caches(&mut state);
        }
        self.inner.bump_serial();
        Ok(())
    }

    /// Returns the number of cached fontsets.
    pub fn cached_fontsets(&self) -> usize {
        lock(&self.inner.state).fontsets.len()
    }

    /// Returns the keys of the cached fontsets, most recently used first.
    pub fn cached_keys(&self) -> Vec<FontsetKey> {
        lock(&self.inner.state).fontsets.keys().cloned().collect()
    }

    /// Registers a callback run after every change to the family list.
    ///
    /// The callback runs without any lock of the map held.
    pub fn connect_items_changed(
        &self,
        callback: impl Fn(&ItemsChanged) + Send + Sync + 'static,
    ) -> ObserverId {
        let id = ObserverId::new();
        lock(&self.inner.observers).push((id, Arc::new(callback)));
        id
    }

    /// Unregisters a callback. Returns false if it was not registered.
    pub fn disconnect(&self, id: ObserverId) -> bool {
        let mut observers = lock(&self.inner.observers);
        let len = observers.len();
        observers.retain(|(observer, _)| *observer != id);
        observers.len() != len
    }

    fn resolve_with(&self, state: &MapState, key: &FontsetKey) -> Vec<FontsetItem> {
        resolve(&state.names, key, |face| self.inner.font_for_face(face, key))
    }

    fn notify(&self, change: &ItemsChanged) {
        let observers: Vec<Observer> = lock(&self.inner.observers)
            .iter()
            .map(|(_, observer)| observer.clone())
            .collect();
        for observer in observers {
            observer(change);
        }
    }

    fn clear_caches(&self, state: &mut MapState) {
        state.fontsets.clear();
        state.generation += 1;
        lock(&self.inner.fonts).clear();
    }

    /// Drops the caches when the fallback map changed since they were
    /// filled.
    fn check_fallback(&self, state: &mut MapState) {
        let Some(fallback) = &mut state.fallback else {
            return;
        };
        let serial = fallback.map.serial();
        if fallback.serial != serial {
            fallback.serial = serial;
            log::debug!("fallback font map changed, clearing caches");
            self.clear_caches(state);
        }
    }

    /// Adds a face to its family. Returns the change if a family was
    /// created.
    fn insert_face(&self, state: &mut MapState, face: &Face) -> Option<ItemsChanged> {
        if let Some(family) = state.names.get(face.family_name()) {
            if family.is_generic() {
                log::warn!(
                    "face {} names generic family {}",
                    face.face_id(),
                    family.name()
                );
            } else {
                family.push_face(face);
            }
            return None;
        }
        let family = Family::new_ordinary(face.family_name());
        family.push_face(face);
        Some(self.insert_family(state, family))
    }

    fn insert_family(&self, state: &mut MapState, family: Family) -> ItemsChanged {
        let position = state
            .families
            .partition_point(|f| cmp_names(f.name(), family.name()) == CmpOrdering::Less);
        family.set_map_slot(Arc::downgrade(&self.inner));
        state.names.insert(family.name(), family.clone());
        state.families.insert(position, family);
        ItemsChanged {
            position,
            removed: 0,
            added: 1,
        }
    }

    fn detach_family(&self, state: &mut MapState, family: &Family) -> Option<ItemsChanged> {
        let position = state.families.iter().position(|f| f == family)?;
        state.families.remove(position);
        state.names.remove(family.name());
        family.set_map_slot(Weak::new());
        Some(ItemsChanged {
            position,
            removed: 1,
            added: 0,
        })
    }
}

impl PartialEq for FontMap {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for FontMap {}

impl Default for FontMap {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FontMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = lock(&self.inner.state);
        f.debug_struct("FontMap")
            .field("serial", &self.serial())
            .field("resolution", &state.resolution)
            .field("families", &state.families.len())
            .field("cached_fontsets", &state.fontsets.len())
            .field("has_fallback", &state.fallback.is_some())
            .finish_non_exhaustive()
    }
}

/// Points the members of every generic family at the current families.
fn relink_generics(state: &MapState) {
    for family in state.families.iter().filter(|family| family.is_generic()) {
        family.relink_members(&state.names);
    }
}

fn valid_resolution(resolution: f32) -> bool {
    resolution.is_finite() && resolution > 0.0
}
