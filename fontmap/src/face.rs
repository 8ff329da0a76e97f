// Copyright 2026 the Fontmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Font faces.

use crate::attributes::{Attributes, FontStyle, FontWeight, FontWidth};
use crate::coverage::{Coverage, CoverageLevel};
use crate::description::FontDescription;
use crate::face_data::{FaceData, FontDataFace};
use crate::family::{Family, FamilyInner};
use crate::matrix::Matrix;
use crate::util::lock;
use crate::{Blob, Language};
use core::fmt;
use core::hash::{Hash, Hasher};
use core::sync::atomic::{AtomicU64, Ordering};
use smallvec::SmallVec;
use std::sync::{Arc, Mutex, Weak};

/// Unique identifier for a face.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct FaceId(u64);

impl FaceId {
    fn new() -> Self {
        static ID_COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the underlying integer value.
    pub fn to_u64(self) -> u64 {
        self.0
    }
}

/// One concrete, stylistically distinct font resource.
///
/// Faces are shared handles: cloning is cheap and equality is identity.
/// Everything except the owning family is fixed at creation.
#[derive(Clone)]
pub struct Face(Arc<FaceInner>);

struct FaceInner {
    id: FaceId,
    family_name: Arc<str>,
    name: Arc<str>,
    face_id: Arc<str>,
    description: FontDescription,
    instance_id: Option<u32>,
    transform: Matrix,
    embolden: bool,
    synthetic: bool,
    data: Arc<dyn FaceData>,
    languages: Option<SmallVec<[Language; 2]>>,
    coverage: Mutex<Coverage>,
    family: Mutex<Weak<FamilyInner>>,
}

impl Face {
    /// Starts building a face for the given family over `data`.
    pub fn builder(family_name: impl Into<Arc<str>>, data: Arc<dyn FaceData>) -> FaceBuilder {
        FaceBuilder {
            family_name: family_name.into(),
            data,
            name: None,
            face_id: None,
            attributes: Attributes::default(),
            instance_id: None,
            languages: None,
        }
    }

    /// Creates a face for the font at `index` in a font file, taking its
    /// attributes from the font tables.
    ///
    /// Returns `None` if the data is not a font.
    pub fn from_font_data(
        family_name: impl Into<Arc<str>>,
        blob: Blob<u8>,
        index: u32,
    ) -> Option<Self> {
        let data = FontDataFace::new(blob, index)?;
        let attributes = data.attributes();
        Some(
            Self::builder(family_name, Arc::new(data))
                .attributes(attributes)
                .build(),
        )
    }

    /// Returns the unique identifier of the face.
    pub fn id(&self) -> FaceId {
        self.0.id
    }

    /// Returns the name of the family this face declares.
    pub fn family_name(&self) -> &str {
        &self.0.family_name
    }

    /// Returns the style name of the face, such as `Bold Italic`.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Returns the string identifier that descriptions can request with a
    /// face id.
    pub fn face_id(&self) -> &str {
        &self.0.face_id
    }

    /// Returns a description with the family and attributes of the face.
    pub fn description(&self) -> &FontDescription {
        &self.0.description
    }

    /// Returns the width, style and weight of the face.
    pub fn attributes(&self) -> Attributes {
        self.0.description.attributes()
    }

    /// Returns the named instance of a variable font this face represents.
    pub fn instance_id(&self) -> Option<u32> {
        self.0.instance_id
    }

    /// Returns the synthetic transform applied when rendering the face.
    pub fn transform(&self) -> Matrix {
        self.0.transform
    }

    /// Returns true if glyphs are synthetically emboldened.
    pub fn embolden(&self) -> bool {
        self.0.embolden
    }

    /// Returns true if the face was synthesized from another face.
    pub fn is_synthetic(&self) -> bool {
        self.0.synthetic
    }

    /// Returns the data behind the face.
    pub fn data(&self) -> &Arc<dyn FaceData> {
        &self.0.data
    }

    /// Returns the languages the face declares support for, if any.
    pub fn languages(&self) -> Option<&[Language]> {
        self.0.languages.as_deref()
    }

    /// Returns true if the face supports `language`.
    ///
    /// Faces without a language list support every language. Otherwise the
    /// primary language subtags are compared.
    pub fn supports_language(&self, language: &Language) -> bool {
        self.0.languages.as_ref().is_none_or(|languages| {
            languages
                .iter()
                .any(|supported| supported.language == language.language)
        })
    }

    /// Returns how well the face covers `ch`, memoizing the answer.
    pub fn coverage(&self, ch: char) -> CoverageLevel {
        let data = &self.0.data;
        lock(&self.0.coverage).get(ch, |c| data.has_char(c))
    }

    /// Returns true if the face covers `ch` exactly.
    pub fn has_char(&self, ch: char) -> bool {
        self.coverage(ch) == CoverageLevel::Exact
    }

    /// Returns a snapshot of the coverage memo.
    pub fn coverage_memo(&self) -> Coverage {
        lock(&self.0.coverage).clone()
    }

    /// Returns the family that currently owns the face.
    pub fn family(&self) -> Option<Family> {
        lock(&self.0.family).upgrade().map(Family)
    }

    pub(crate) fn set_family(&self, family: Weak<FamilyInner>) {
        *lock(&self.0.family) = family;
    }

    pub(crate) fn is_owned_by(&self, family: &Family) -> bool {
        Weak::ptr_eq(&lock(&self.0.family), &Arc::downgrade(&family.0))
    }

    /// Ranks faces of equal distance: named instances of variable fonts
    /// first, then variable faces, then static ones.
    pub(crate) fn variableness(&self) -> u8 {
        if self.0.instance_id.is_some() {
            2
        } else if self.0.data.is_variable() {
            1
        } else {
            0
        }
    }

    /// Creates a synthetic variant of this face sharing its data and a copy
    /// of its coverage.
    pub(crate) fn synthesize(&self, name: &str, style: FontStyle, weight: FontWeight) -> Self {
        let slant = style != FontStyle::Normal && self.attributes().style == FontStyle::Normal;
        let embolden = weight.value() > self.attributes().weight.value();
        let mut description = self.0.description.clone();
        description.set_style(style);
        description.set_weight(weight);
        Self(Arc::new(FaceInner {
            id: FaceId::new(),
            family_name: self.0.family_name.clone(),
            name: name.into(),
            face_id: format!("{}:synthetic:{name}", self.0.face_id).into(),
            description,
            instance_id: self.0.instance_id,
            transform: if slant {
                self.0.transform.concat(&Matrix::SYNTHETIC_ITALIC)
            } else {
                self.0.transform
            },
            embolden: embolden || self.0.embolden,
            synthetic: true,
            data: self.0.data.clone(),
            languages: self.0.languages.clone(),
            coverage: Mutex::new(self.coverage_memo()),
            family: Mutex::new(Weak::new()),
        }))
    }
}

impl PartialEq for Face {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Face {}

impl Hash for Face {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl fmt::Debug for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Face")
            .field("id", &self.0.id)
            .field("family_name", &self.0.family_name)
            .field("name", &self.0.name)
            .field("face_id", &self.0.face_id)
            .field("attributes", &self.attributes())
            .field("synthetic", &self.0.synthetic)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Face`].
#[derive(Debug)]
pub struct FaceBuilder {
    family_name: Arc<str>,
    data: Arc<dyn FaceData>,
    name: Option<Arc<str>>,
    face_id: Option<Arc<str>>,
    attributes: Attributes,
    instance_id: Option<u32>,
    languages: Option<SmallVec<[Language; 2]>>,
}

impl FaceBuilder {
    /// Sets the style name. Defaults to a name derived from the attributes.
    pub fn name(mut self, name: impl Into<Arc<str>>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the face identifier. Defaults to `family:name`, followed by
    /// `:instance` for named instances.
    pub fn face_id(mut self, face_id: impl Into<Arc<str>>) -> Self {
        self.face_id = Some(face_id.into());
        self
    }

    /// Sets the width, style and weight.
    pub fn attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Sets the width.
    pub fn width(mut self, width: FontWidth) -> Self {
        self.attributes.width = width;
        self
    }

    /// Sets the style.
    pub fn style(mut self, style: FontStyle) -> Self {
        self.attributes.style = style;
        self
    }

    /// Sets the weight.
    pub fn weight(mut self, weight: FontWeight) -> Self {
        self.attributes.weight = weight;
        self
    }

    /// Marks the face as a named instance of a variable font.
    pub fn instance(mut self, instance_id: u32) -> Self {
        self.instance_id = Some(instance_id);
        self
    }

    /// Restricts the face to the given languages.
    pub fn languages(mut self, languages: impl IntoIterator<Item = Language>) -> Self {
        self.languages = Some(languages.into_iter().collect());
        self
    }

    /// Creates the face.
    pub fn build(self) -> Face {
        let name = self
            .name
            .unwrap_or_else(|| style_name(&self.attributes).into());
        let face_id = self.face_id.unwrap_or_else(|| {
            let mut id = format!("{}:{name}", self.family_name);
            if let Some(instance) = self.instance_id {
                id.push_str(&format!(":{instance}"));
            }
            id.into()
        });
        let mut description = FontDescription::new();
        description.set_family(self.family_name.clone());
        description.set_attributes(self.attributes);
        Face(Arc::new(FaceInner {
            id: FaceId::new(),
            family_name: self.family_name,
            name,
            face_id,
            description,
            instance_id: self.instance_id,
            transform: Matrix::IDENTITY,
            embolden: false,
            synthetic: false,
            data: self.data,
            languages: self.languages,
            coverage: Mutex::new(Coverage::new()),
            family: Mutex::new(Weak::new()),
        }))
    }
}

/// Builds a style name like `Semi-Bold Italic` from attributes.
fn style_name(attributes: &Attributes) -> String {
    let mut words = Vec::new();
    if attributes.width != FontWidth::NORMAL {
        words.push(attributes.width.to_string());
    }
    if attributes.weight != FontWeight::NORMAL {
        words.push(attributes.weight.to_string());
    }
    if attributes.style != FontStyle::Normal {
        words.push(attributes.style.to_string());
    }
    if words.is_empty() {
        "Regular".into()
    } else {
        words.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::Face;
    use crate::face_data::FaceData;
    use crate::{CoverageLevel, FontStyle, FontWeight, Language, Matrix};
    use std::sync::Arc;

    #[derive(Debug)]
    struct Latin;

    impl FaceData for Latin {
        fn has_char(&self, ch: char) -> bool {
            ch.is_ascii()
        }
    }

    #[test]
    fn default_names_and_ids() {
        let face = Face::builder("Cantarell", Arc::new(Latin))
            .weight(FontWeight::BOLD)
            .style(FontStyle::Italic)
            .build();
        assert_eq!(face.name(), "Bold Italic");
        assert_eq!(face.face_id(), "Cantarell:Bold Italic");
        let regular = Face::builder("Cantarell", Arc::new(Latin)).instance(3).build();
        assert_eq!(regular.name(), "Regular");
        assert_eq!(regular.face_id(), "Cantarell:Regular:3");
        assert_eq!(regular.variableness(), 2, "named instance");
    }

    #[test]
    fn language_support() {
        let en: Language = "en".parse().unwrap();
        let en_us: Language = "en-US".parse().unwrap();
        let ja: Language = "ja".parse().unwrap();
        let face = Face::builder("Sans", Arc::new(Latin))
            .languages([en])
            .build();
        assert!(face.supports_language(&en_us), "primary subtag matches");
        assert!(!face.supports_language(&ja), "other language");
        let any = Face::builder("Sans", Arc::new(Latin)).build();
        assert!(any.supports_language(&ja), "no list supports everything");
    }

    #[test]
    fn synthetic_faces_copy_coverage() {
        let face = Face::builder("Sans", Arc::new(Latin)).build();
        assert_eq!(face.coverage('a'), CoverageLevel::Exact);
        let italic = face.synthesize("Italic", FontStyle::Italic, FontWeight::NORMAL);
        assert!(italic.is_synthetic(), "synthetic");
        assert_eq!(italic.transform(), Matrix::SYNTHETIC_ITALIC);
        assert!(!italic.embolden(), "same weight");
        assert_eq!(
            italic.coverage_memo().lookup('a'),
            Some(CoverageLevel::Exact),
            "coverage is copied"
        );
        let bold = face.synthesize("Bold", FontStyle::Normal, FontWeight::BOLD);
        assert!(bold.embolden(), "emboldened");
        assert!(bold.transform().is_identity(), "upright");
        assert_ne!(bold, face);
    }
}
