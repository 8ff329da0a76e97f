// Copyright 2026 the Fontmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Font matching, fallback chains and fontset caching.
//!
//! A [`FontMap`] holds families of faces, fed by a [`FontSource`] or added
//! one by one. Loading a [`FontDescription`] yields a [`Fontset`]: an
//! ordered fallback chain that picks the font to render each character
//! with. Fontsets are cached per [`FontsetKey`] in a bounded
//! most-recently-used cache that is cleared whenever the map changes.
//!
//! ```
//! use std::sync::Arc;
//! use fontmap::{Context, Face, FaceData, FontDescription, FontMap};
//!
//! #[derive(Debug)]
//! struct Latin;
//!
//! impl FaceData for Latin {
//!     fn has_char(&self, ch: char) -> bool {
//!         ch.is_ascii()
//!     }
//! }
//!
//! let map = FontMap::new();
//! map.add_face(Face::builder("Sans", Arc::new(Latin)).build());
//! let desc: FontDescription = "Sans Bold 12".parse().unwrap();
//! let fontset = map.load_fontset(&desc, &Context::new());
//! let font = fontset.get_font('A').unwrap();
//! assert_eq!(font.face().family_name(), "Sans");
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

#[cfg(not(feature = "std"))]
compile_error!("fontmap requires the `std` feature to be enabled");

mod attributes;
mod cache;
mod coverage;
mod description;
mod error;
mod face;
mod face_data;
mod family;
mod family_name;
mod font;
mod fontmap;
mod fontset;
mod generic;
mod key;
mod matching;
mod matrix;
mod resolve;
mod source;
mod util;

pub use icu_locale_core::LanguageIdentifier as Language;
pub use linebender_resource_handle::Blob;

pub use attributes::{Attributes, FontStyle, FontVariant, FontWeight, FontWidth};
pub use coverage::{Coverage, CoverageLevel};
pub use description::{
    FontDescription, FontMask, ParseDescriptionError, ParseDescriptionErrorKind, SCALE,
};
pub use error::FontMapError;
pub use face::{Face, FaceBuilder, FaceId};
pub use face_data::{FaceData, FaceMetrics, FontDataFace};
pub use family::{Family, FamilyId};
pub use font::{Font, FontMetrics};
pub use fontmap::{FontMap, FontMapOptions, ItemsChanged, ObserverId};
pub use fontset::{Fontset, FontsetItem, GenericItem, QueryStatus};
pub use generic::{GenericFamily, GenericFamilyMap};
pub use key::{Context, ContextKey, Fnv32, FontKey, FontsetKey};
pub use matching::distance;
pub use matrix::Matrix;
pub use source::{FontSource, MemorySource};
