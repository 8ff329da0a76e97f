// Copyright 2026 the Fontmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Model for font families.

use crate::attributes::{FontStyle, FontWeight};
use crate::description::FontDescription;
use crate::face::Face;
use crate::family_name::{NameMap, eq_names};
use crate::fontmap::{FontMap, MapInner};
use crate::matching::best_face;
use crate::util::lock;
use crate::Language;
use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};
use smallvec::SmallVec;
use std::sync::{Arc, Mutex, Weak};

/// Unique identifier for a font family.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct FamilyId(u64);

impl FamilyId {
    /// Creates a new unique identifier.
    fn new() -> Self {
        static ID_COUNTER: AtomicU64 = AtomicU64::new(64);
        Self(ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the underlying integer value.
    pub fn to_u64(self) -> u64 {
        self.0
    }
}

/// A named group of faces, or of other families.
///
/// Ordinary families own their faces and are created by the font map when
/// the first face naming them is added. Generic families aggregate other
/// families without owning them and are resolved lazily, per character,
/// when a fontset needs them.
///
/// Families are shared handles: cloning is cheap and equality is identity.
#[derive(Clone)]
pub struct Family(pub(crate) Arc<FamilyInner>);

pub(crate) struct FamilyInner {
    id: FamilyId,
    name: Arc<str>,
    kind: FamilyKind,
    map: Mutex<Weak<MapInner>>,
}

enum FamilyKind {
    Ordinary(Mutex<SmallVec<[Face; 4]>>),
    Generic(Mutex<Vec<Member>>),
}

/// A member of a generic family, linked by name.
struct Member {
    name: Arc<str>,
    family: Weak<FamilyInner>,
}

impl Family {
    pub(crate) fn new_ordinary(name: impl Into<Arc<str>>) -> Self {
        Self::new(name.into(), FamilyKind::Ordinary(Mutex::default()))
    }

    /// Creates an empty generic family with the given name.
    pub fn new_generic(name: impl Into<Arc<str>>) -> Self {
        Self::new(name.into(), FamilyKind::Generic(Mutex::default()))
    }

    fn new(name: Arc<str>, kind: FamilyKind) -> Self {
        Self(Arc::new(FamilyInner {
            id: FamilyId::new(),
            name,
            kind,
            map: Mutex::new(Weak::new()),
        }))
    }

    /// Returns the unique identifier for the family.
    pub fn id(&self) -> FamilyId {
        self.0.id
    }

    /// Returns the name of the family.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Returns true if this is a generic family.
    pub fn is_generic(&self) -> bool {
        matches!(self.0.kind, FamilyKind::Generic(_))
    }

    /// Returns the faces of an ordinary family in insertion order.
    ///
    /// Generic families have no faces of their own.
    pub fn faces(&self) -> Vec<Face> {
        match &self.0.kind {
            FamilyKind::Ordinary(faces) => lock(faces).to_vec(),
            FamilyKind::Generic(_) => Vec::new(),
        }
    }

    /// Returns the face with the given style name, ignoring case.
    pub fn face(&self, name: &str) -> Option<Face> {
        self.faces()
            .into_iter()
            .find(|face| eq_names(face.name(), name))
    }

    /// Returns the live member families of a generic family in order.
    pub fn members(&self) -> Vec<Self> {
        match &self.0.kind {
            FamilyKind::Generic(members) => lock(members)
                .iter()
                .filter_map(|member| member.family.upgrade())
                .map(Self)
                .collect(),
            FamilyKind::Ordinary(_) => Vec::new(),
        }
    }

    /// Returns the names of the members of a generic family in order,
    /// including members that are currently not available.
    pub fn member_names(&self) -> Vec<Arc<str>> {
        match &self.0.kind {
            FamilyKind::Generic(members) => {
                lock(members).iter().map(|member| member.name.clone()).collect()
            }
            FamilyKind::Ordinary(_) => Vec::new(),
        }
    }

    /// Appends a member to a generic family.
    ///
    /// The member is not kept alive by the generic family. It is
    /// remembered by name, and when the font map the generic family belongs
    /// to gains a family with that name, the member refers to that family
    /// instead. Adding members to an ordinary family, or a family to
    /// itself, does nothing.
    pub fn add_member(&self, family: &Self) {
        let FamilyKind::Generic(members) = &self.0.kind else {
            log::warn!("cannot add members to ordinary family {}", self.name());
            return;
        };
        if family == self {
            return;
        }
        lock(members).push(Member {
            name: family.0.name.clone(),
            family: Arc::downgrade(&family.0),
        });
    }

    /// Points the members of a generic family at the ordinary families of
    /// the same name in `families`. Members without a namesake are kept.
    pub(crate) fn relink_members(&self, families: &NameMap<Self>) {
        let FamilyKind::Generic(members) = &self.0.kind else {
            return;
        };
        for member in lock(members).iter_mut() {
            let family = families
                .get(&member.name)
                .filter(|family| !family.is_generic());
            if let Some(family) = family {
                member.family = Arc::downgrade(&family.0);
            }
        }
    }

    /// Returns the faces of each live member with any faces, in member
    /// order.
    pub(crate) fn member_faces(&self) -> Vec<Vec<Face>> {
        self.members()
            .iter()
            .map(Self::faces)
            .filter(|faces| !faces.is_empty())
            .collect()
    }

    /// Returns the font map the family belongs to.
    ///
    /// This is `None` once the family has been removed from its map or the
    /// map has been dropped.
    pub fn font_map(&self) -> Option<FontMap> {
        lock(&self.0.map).upgrade().map(FontMap::from_inner)
    }

    pub(crate) fn map_slot(&self) -> Weak<MapInner> {
        lock(&self.0.map).clone()
    }

    pub(crate) fn set_map_slot(&self, map: Weak<MapInner>) {
        *lock(&self.0.map) = map;
    }

    /// Appends a face to an ordinary family and makes the family its owner.
    pub(crate) fn push_face(&self, face: &Face) {
        if let FamilyKind::Ordinary(faces) = &self.0.kind {
            face.set_family(Arc::downgrade(&self.0));
            lock(faces).push(face.clone());
        }
    }

    /// Removes a face. Returns true if the face was found.
    pub(crate) fn remove_face(&self, face: &Face) -> bool {
        let FamilyKind::Ordinary(faces) = &self.0.kind else {
            return false;
        };
        let mut faces = lock(faces);
        let Some(index) = faces.iter().position(|f| f == face) else {
            return false;
        };
        faces.remove(index);
        face.set_family(Weak::new());
        true
    }

    /// Returns the number of faces of an ordinary family.
    pub(crate) fn face_count(&self) -> usize {
        match &self.0.kind {
            FamilyKind::Ordinary(faces) => lock(faces).len(),
            FamilyKind::Generic(_) => 0,
        }
    }

    /// Returns the best face of an ordinary family for the description.
    ///
    /// When `language` is given, only faces supporting it are considered,
    /// and when `ch` is given, only faces covering it. Generic families
    /// return `None`; use a fontset to resolve them.
    pub fn find_face(
        &self,
        desc: &FontDescription,
        language: Option<&Language>,
        ch: Option<char>,
    ) -> Option<Face> {
        match &self.0.kind {
            FamilyKind::Ordinary(faces) => {
                let faces = lock(faces).to_vec();
                best_face(&faces, desc, language, ch)
            }
            FamilyKind::Generic(_) => None,
        }
    }

    /// Adds synthetic italic, bold and bold italic faces derived from the
    /// regular face when the family lacks them. Returns the new faces.
    pub(crate) fn synthesize_faces(&self) -> Vec<Face> {
        let faces = self.faces();
        let near = |face: &Face, weight: FontWeight| {
            (face.attributes().weight.value() - weight.value()).abs() < 150.0
        };
        let mut regular = None;
        let mut has_bold = false;
        let mut has_italic = false;
        let mut has_bold_italic = false;
        for face in &faces {
            let attributes = face.attributes();
            if attributes.style == FontStyle::Normal {
                if regular.is_none() && near(face, FontWeight::NORMAL) {
                    regular = Some(face.clone());
                }
                if near(face, FontWeight::BOLD) {
                    has_bold = true;
                }
            } else if attributes.weight.value() < FontWeight::SEMI_BOLD.value() {
                has_italic = true;
            } else {
                has_bold_italic = true;
            }
        }
        let Some(regular) = regular else {
            return Vec::new();
        };
        let mut added = Vec::new();
        if !has_italic {
            added.push(regular.synthesize("Italic", FontStyle::Italic, FontWeight::NORMAL));
        }
        if !has_bold {
            added.push(regular.synthesize("Bold", FontStyle::Normal, FontWeight::BOLD));
        }
        if !has_bold_italic {
            added.push(regular.synthesize("Bold Italic", FontStyle::Italic, FontWeight::BOLD));
        }
        for face in &added {
            self.push_face(face);
        }
        added
    }
}

/// Picks a face among the faces of generic family members.
///
/// Members are tried in order, first with the language and then without.
/// As a last resort the best face of the first member is returned, flagged
/// as not covering `ch`.
pub(crate) fn find_member_face(
    members: &[Vec<Face>],
    desc: &FontDescription,
    language: Option<&Language>,
    ch: Option<char>,
) -> Option<(Face, bool)> {
    let with_language = members
        .iter()
        .find_map(|faces| best_face(faces, desc, language, ch));
    if let Some(face) = with_language {
        return Some((face, true));
    }
    if language.is_some() {
        let any_language = members
            .iter()
            .find_map(|faces| best_face(faces, desc, None, ch));
        if let Some(face) = any_language {
            return Some((face, true));
        }
    }
    members
        .iter()
        .find_map(|faces| best_face(faces, desc, None, None))
        .map(|face| (face, ch.is_none()))
}

impl PartialEq for Family {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Family {}

impl fmt::Debug for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Family");
        s.field("id", &self.0.id).field("name", &self.0.name);
        match &self.0.kind {
            FamilyKind::Ordinary(faces) => s.field("faces", &lock(faces).len()),
            FamilyKind::Generic(members) => s.field("members", &lock(members).len()),
        };
        s.finish_non_exhaustive()
    }
}
