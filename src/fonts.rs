//! Font resolution for both export pipelines.
//!
//! `FontLibrary` discovers system fonts once through fontdb and resolves a
//! stylesheet family name to raw font bytes plus a face index, caching per
//! (family, weight, style). Both the software rasterizer and the vector PDF
//! renderer consume the same resolved bytes, so a document renders with the
//! same face on both paths.
//!
//! Library construction completing is the batch exporter's "fonts settled"
//! readiness signal; there is no timed settle delay anywhere.

use crate::stylesheet::{FontStyle, FontWeight};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FontError {
    #[error("no usable font found for family '{family}' (is a system font directory available?)")]
    NoUsableFont { family: String },

    #[error("failed to parse font data resolved for family '{family}'")]
    Unparseable { family: String },
}

/// Raw bytes of a resolved font face.
pub struct FontAsset {
    pub data: Arc<Vec<u8>>,
    pub index: u32,
}

#[derive(Hash, PartialEq, Eq, Clone)]
struct FontCacheKey {
    family: String,
    weight: FontWeight,
    style: FontStyle,
}

pub struct FontLibrary {
    db: fontdb::Database,
    cache: RwLock<HashMap<FontCacheKey, Arc<FontAsset>>>,
}

impl FontLibrary {
    /// Build a library backed by the system font database.
    pub fn with_system_fonts() -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        log::debug!("font database loaded with {} faces", db.len());
        Self { db, cache: RwLock::new(HashMap::new()) }
    }

    /// Whether the database discovered any faces at all.
    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    /// Resolve a stylesheet family to font bytes, falling back to the
    /// matching generic family when the named one is not installed.
    pub fn resolve(
        &self,
        family: &str,
        weight: FontWeight,
        style: FontStyle,
    ) -> Result<Arc<FontAsset>, FontError> {
        let key = FontCacheKey { family: family.to_lowercase(), weight, style };
        if let Ok(cache) = self.cache.read()
            && let Some(asset) = cache.get(&key)
        {
            return Ok(asset.clone());
        }

        let generic = generic_family(family);
        let query = fontdb::Query {
            families: &[fontdb::Family::Name(family), generic],
            weight: match weight {
                FontWeight::Regular => fontdb::Weight::NORMAL,
                FontWeight::Bold => fontdb::Weight::BOLD,
            },
            stretch: fontdb::Stretch::Normal,
            style: match style {
                FontStyle::Normal => fontdb::Style::Normal,
                FontStyle::Italic => fontdb::Style::Italic,
            },
        };

        let id = self
            .db
            .query(&query)
            .ok_or_else(|| FontError::NoUsableFont { family: family.to_string() })?;

        let asset = self
            .db
            .with_face_data(id, |data, index| {
                Arc::new(FontAsset { data: Arc::new(data.to_vec()), index })
            })
            .ok_or_else(|| FontError::NoUsableFont { family: family.to_string() })?;

        if let Ok(mut cache) = self.cache.write() {
            cache.insert(key, asset.clone());
        }
        Ok(asset)
    }
}

/// Map a concrete family name to the generic family used as fallback.
fn generic_family(family: &str) -> fontdb::Family<'_> {
    const SERIF_FAMILIES: &[&str] = &["georgia", "times", "times new roman", "serif"];
    if SERIF_FAMILIES.contains(&family.to_lowercase().as_str()) {
        fontdb::Family::Serif
    } else {
        fontdb::Family::SansSerif
    }
}
