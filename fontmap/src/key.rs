// Copyright 2026 the Fontmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cache keys for fontsets and fonts.

use crate::description::{FontDescription, FontMask};
use crate::face::{Face, FaceId};
use crate::matrix::Matrix;
use crate::Language;
use core::any::Any;
use core::fmt;
use core::hash::{Hash, Hasher};
use std::sync::Arc;

/// 32-bit FNV-1 hasher.
///
/// Each byte is folded in by multiplying with the FNV prime and then
/// xoring the byte in.
#[derive(Copy, Clone, Debug)]
pub struct Fnv32(u32);

impl Fnv32 {
    const OFFSET_BASIS: u32 = 0x811c_9dc5;
    const PRIME: u32 = 0x0100_0193;

    /// Returns the 32-bit hash value.
    pub fn finish32(&self) -> u32 {
        self.0
    }

    /// Hashes a value with a fresh hasher.
    pub fn hash_one(value: &(impl Hash + ?Sized)) -> u32 {
        let mut hasher = Self::default();
        value.hash(&mut hasher);
        hasher.finish32()
    }
}

impl Default for Fnv32 {
    fn default() -> Self {
        Self(Self::OFFSET_BASIS)
    }
}

impl Hasher for Fnv32 {
    fn write(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.0 = self.0.wrapping_mul(Self::PRIME);
            self.0 ^= u32::from(*byte);
        }
    }

    fn finish(&self) -> u64 {
        u64::from(self.0)
    }
}

/// Backend specific state that takes part in fontset and font identity.
///
/// Any `Hash + Eq` type can be used as a context key. Keys are compared
/// through this trait so that keys of different types are simply unequal.
pub trait ContextKey: Any + fmt::Debug + Send + Sync {
    /// Returns the hash of the key.
    fn key_hash(&self) -> u32;

    /// Returns true if `other` is a key of the same type and value.
    fn key_eq(&self, other: &dyn ContextKey) -> bool;

    /// Returns the key as [`Any`] for downcasting.
    fn as_any(&self) -> &dyn Any;
}

impl<T: Hash + Eq + fmt::Debug + Send + Sync + 'static> ContextKey for T {
    fn key_hash(&self) -> u32 {
        Fnv32::hash_one(self)
    }

    fn key_eq(&self, other: &dyn ContextKey) -> bool {
        other.as_any().downcast_ref::<T>() == Some(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn context_eq(a: &Option<Arc<dyn ContextKey>>, b: &Option<Arc<dyn ContextKey>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.key_eq(b.as_ref()),
        (None, None) => true,
        _ => false,
    }
}

/// The environment a fontset is loaded in.
#[derive(Clone, Default, Debug)]
pub struct Context {
    language: Option<Language>,
    matrix: Matrix,
    key: Option<Arc<dyn ContextKey>>,
}

impl Context {
    /// Creates a context with no language, the identity transform and no
    /// backend key.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the language.
    #[must_use]
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    /// Sets the transform.
    #[must_use]
    pub fn with_matrix(mut self, matrix: Matrix) -> Self {
        self.matrix = matrix;
        self
    }

    /// Sets the backend context key.
    #[must_use]
    pub fn with_key(mut self, key: impl ContextKey) -> Self {
        self.key = Some(Arc::new(key));
        self
    }

    /// Returns the language.
    pub fn language(&self) -> Option<&Language> {
        self.language.as_ref()
    }

    /// Returns the transform.
    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    /// Returns the backend context key.
    pub fn key(&self) -> Option<&dyn ContextKey> {
        self.key.as_deref()
    }
}

/// Canonical identity of a fontset.
///
/// The key is built from a description, a [`Context`] and the resolution.
/// Size and variations are resolved into the pixel size and variation
/// fields; the embedded description carries neither, nor the variant,
/// which is realized by the shaper.
///
/// Cloning is cheap: the key data is shared.
#[derive(Clone)]
pub struct FontsetKey(Arc<FontsetKeyData>);

struct FontsetKeyData {
    description: FontDescription,
    language: Option<Language>,
    matrix: Matrix,
    resolution: f32,
    pixel_size: i32,
    variations: Option<Arc<str>>,
    context: Option<Arc<dyn ContextKey>>,
    hash: u32,
}

impl FontsetKey {
    /// Creates a key for loading `desc` in `context` at `resolution` dots
    /// per inch.
    pub fn new(desc: &FontDescription, context: &Context, resolution: f32) -> Self {
        let matrix = context.matrix;
        let pixel_size = pixel_size(desc, &matrix, resolution);
        let description =
            desc.without_fields(FontMask::SIZE | FontMask::VARIATIONS | FontMask::VARIANT);
        let variations: Option<Arc<str>> = desc.variations().map(Into::into);

        let mut fnv = Fnv32::default();
        for bits in matrix.linear_bits() {
            fnv.write(&bits.to_ne_bytes());
        }
        let mut hash = fnv.finish32();
        hash ^= resolution.to_bits();
        hash ^= pixel_size.cast_unsigned();
        if let Some(variations) = &variations {
            hash ^= Fnv32::hash_one(variations.as_ref());
        }
        hash ^= Fnv32::hash_one(&context.language);
        hash ^= Fnv32::hash_one(&description);
        if let Some(key) = &context.key {
            hash ^= key.key_hash();
        }

        Self(Arc::new(FontsetKeyData {
            description,
            language: context.language.clone(),
            matrix,
            resolution,
            pixel_size,
            variations,
            context: context.key.clone(),
            hash,
        }))
    }

    /// Returns the normalized description.
    pub fn description(&self) -> &FontDescription {
        &self.0.description
    }

    /// Returns the language.
    pub fn language(&self) -> Option<&Language> {
        self.0.language.as_ref()
    }

    /// Returns the transform.
    pub fn matrix(&self) -> &Matrix {
        &self.0.matrix
    }

    /// Returns the resolution in dots per inch.
    pub fn resolution(&self) -> f32 {
        self.0.resolution
    }

    /// Returns the size in device units scaled by [`SCALE`](crate::SCALE).
    pub fn pixel_size(&self) -> i32 {
        self.0.pixel_size
    }

    /// Returns the variation settings.
    pub fn variations(&self) -> Option<&str> {
        self.0.variations.as_deref()
    }

    /// Returns the backend context key.
    pub fn context_key(&self) -> Option<&dyn ContextKey> {
        self.0.context.as_deref()
    }

    /// Returns the 32-bit hash of the key.
    pub fn hash32(&self) -> u32 {
        self.0.hash
    }

    /// Returns true if both keys share the same data.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Returns the key of a font realized from `face` for this fontset.
    pub fn font_key(&self, face: &Face) -> FontKey {
        FontKey {
            face: face.id(),
            pixel_size: self.0.pixel_size,
            matrix: self.0.matrix.linear_bits(),
            resolution: self.0.resolution.to_bits(),
            variations: self.0.variations.clone(),
            context: self.0.context.clone(),
        }
    }
}

impl PartialEq for FontsetKey {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        let (a, b) = (&*self.0, &*other.0);
        a.hash == b.hash
            && a.language == b.language
            && a.pixel_size == b.pixel_size
            && a.resolution.to_bits() == b.resolution.to_bits()
            && a.variations == b.variations
            && a.description == b.description
            && a.matrix.linear_bits() == b.matrix.linear_bits()
            && context_eq(&a.context, &b.context)
    }
}

impl Eq for FontsetKey {}

impl Hash for FontsetKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.0.hash);
    }
}

impl fmt::Debug for FontsetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontsetKey")
            .field("description", &self.0.description)
            .field("language", &self.0.language)
            .field("matrix", &self.0.matrix)
            .field("resolution", &self.0.resolution)
            .field("pixel_size", &self.0.pixel_size)
            .field("variations", &self.0.variations)
            .field("context", &self.0.context)
            .field("hash", &self.0.hash)
            .finish()
    }
}

/// Identity of a realized font: one face at one size, transform and
/// variation setting.
#[derive(Clone, Debug)]
pub struct FontKey {
    face: FaceId,
    pixel_size: i32,
    matrix: [u64; 4],
    resolution: u32,
    variations: Option<Arc<str>>,
    context: Option<Arc<dyn ContextKey>>,
}

impl FontKey {
    /// Returns the identifier of the face.
    pub fn face(&self) -> FaceId {
        self.face
    }

    /// Returns the pixel size.
    pub fn pixel_size(&self) -> i32 {
        self.pixel_size
    }
}

impl PartialEq for FontKey {
    fn eq(&self, other: &Self) -> bool {
        self.face == other.face
            && self.pixel_size == other.pixel_size
            && self.matrix == other.matrix
            && self.resolution == other.resolution
            && self.variations == other.variations
            && context_eq(&self.context, &other.context)
    }
}

impl Eq for FontKey {}

impl Hash for FontKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.face.hash(state);
        self.pixel_size.hash(state);
        self.matrix.hash(state);
        self.resolution.hash(state);
        self.variations.hash(state);
        if let Some(context) = &self.context {
            state.write_u32(context.key_hash());
        }
    }
}

/// Computes the device size of a description in units of 1/[`SCALE`](crate::SCALE).
#[expect(
    clippy::cast_possible_truncation,
    reason = "clamped to the i32 range first"
)]
fn pixel_size(desc: &FontDescription, matrix: &Matrix, resolution: f32) -> i32 {
    let size = f64::from(desc.size());
    let scale = matrix.font_scale_factor();
    let pixels = if desc.is_size_absolute() {
        size * scale
    } else {
        size * f64::from(resolution) / 72.0 * scale
    };
    pixels.round().clamp(0.0, f64::from(i32::MAX)) as i32
}

#[cfg(test)]
mod tests {
    use super::{Context, Fnv32, FontsetKey};
    use crate::{FontDescription, Language, Matrix, SCALE};
    use core::hash::Hasher;

    fn desc(s: &str) -> FontDescription {
        s.parse().unwrap()
    }

    #[test]
    fn fnv_known_values() {
        assert_eq!(Fnv32::default().finish32(), 0x811c_9dc5);
        let mut fnv = Fnv32::default();
        fnv.write(b"a");
        assert_eq!(fnv.finish32(), 0x050c_5d7e, "FNV-1 of \"a\"");
    }

    #[test]
    fn pixel_size_follows_resolution() {
        let ctx = Context::new();
        let key = FontsetKey::new(&desc("Sans 12"), &ctx, 96.0);
        assert_eq!(key.pixel_size(), 16 * SCALE);
        let key = FontsetKey::new(&desc("Sans 12px"), &ctx, 96.0);
        assert_eq!(key.pixel_size(), 12 * SCALE, "absolute sizes ignore dpi");
        let ctx = Context::new().with_matrix(Matrix::scale(2.0));
        let key = FontsetKey::new(&desc("Sans 12px"), &ctx, 96.0);
        assert_eq!(key.pixel_size(), 24 * SCALE, "matrix scales the size");
    }

    #[test]
    fn equal_inputs_give_equal_keys() {
        let en: Language = "en".parse().unwrap();
        let ctx = Context::new().with_language(en.clone());
        let a = FontsetKey::new(&desc("Sans Bold 12"), &ctx, 96.0);
        let b = FontsetKey::new(&desc("sans bold 12"), &ctx, 96.0);
        assert_eq!(a, b);
        assert_eq!(a.hash32(), b.hash32(), "hash follows equality");
        let c = FontsetKey::new(&desc("Sans Bold Small-Caps 12"), &ctx, 96.0);
        assert_eq!(a, c, "variant does not take part");
        let d = FontsetKey::new(&desc("Sans Bold 12"), &Context::new(), 96.0);
        assert_ne!(a, d, "language takes part");
        let e = FontsetKey::new(&desc("Sans Bold 12"), &ctx, 72.0);
        assert_ne!(a, e, "resolution takes part");
        let f = FontsetKey::new(&desc("Sans Bold 12 @wght=500"), &ctx, 96.0);
        assert_ne!(a, f, "variations take part");
        assert_eq!(f.variations(), Some("wght=500"));
        assert_eq!(f.description().variations(), None, "stripped");
    }

    #[test]
    fn context_keys_compare_by_type_and_value() {
        let base = Context::new();
        let a = FontsetKey::new(&desc("Sans 12"), &base.clone().with_key(1_u32), 96.0);
        let b = FontsetKey::new(&desc("Sans 12"), &base.clone().with_key(1_u32), 96.0);
        let c = FontsetKey::new(&desc("Sans 12"), &base.clone().with_key(2_u32), 96.0);
        let d = FontsetKey::new(&desc("Sans 12"), &base.with_key(1_u64), 96.0);
        assert_eq!(a, b);
        assert_ne!(a, c, "different value");
        assert_ne!(a, d, "different type");
    }
}
