//! Read-only tire catalog.
//!
//! The shop's inventory is small and changes by hand, so it ships as a JSON
//! document embedded in the binary. [`Catalog::load`] reads the same format
//! from disk for local overrides.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tire_disciples_core::{Price, TireId};

/// Inventory shipped with the storefront.
const BUILTIN_CATALOG: &str = include_str!("../catalog/tires.json");

/// Errors that can occur when loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate tire id {0} in catalog")]
    DuplicateId(TireId),
}

/// A tire listed for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: TireId,
    pub title: String,
    pub size: String,
    pub tread: String,
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub condition: String,
    pub price: Price,
    /// Photo URLs, cover photo first.
    #[serde(default)]
    pub photos: Vec<String>,
}

impl CatalogItem {
    /// The cover photo, if the listing has any.
    #[must_use]
    pub fn cover_photo(&self) -> Option<&str> {
        self.photos.first().map(String::as_str)
    }
}

/// Immutable mapping from tire id to listing.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: BTreeMap<TireId, CatalogItem>,
}

impl Catalog {
    /// Build a catalog from listings.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateId`] if two listings share an id.
    pub fn from_items(items: impl IntoIterator<Item = CatalogItem>) -> Result<Self, CatalogError> {
        let mut map = BTreeMap::new();
        for item in items {
            let id = item.id;
            if map.insert(id, item).is_some() {
                return Err(CatalogError::DuplicateId(id));
            }
        }
        Ok(Self { items: map })
    }

    /// Parse a catalog from a JSON array of listings.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or contains duplicate ids.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let items: Vec<CatalogItem> = serde_json::from_str(json)?;
        Self::from_items(items)
    }

    /// Read a catalog file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// The catalog embedded in the binary.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded document is invalid.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Look up a listing.
    #[must_use]
    pub fn get(&self, id: TireId) -> Option<&CatalogItem> {
        self.items.get(&id)
    }

    /// Listings in id order.
    pub fn iter(&self) -> impl Iterator<Item = &CatalogItem> {
        self.items.values()
    }

    /// Number of listings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the catalog has no listings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_builtin_catalog_has_continental() {
        let catalog = Catalog::builtin().unwrap();
        let tire = catalog.get(TireId::new(1)).unwrap();

        assert_eq!(tire.title, "Continental CrossContact LX 20");
        assert_eq!(tire.size, "275/60R20");
        assert_eq!(tire.price.amount(), Decimal::new(170, 0));
        assert_eq!(tire.photos.len(), 3);
        assert_eq!(
            tire.cover_photo(),
            Some("https://images2.imgbox.com/0f/90/X3eK8pp7_o.jpg")
        );
    }

    #[test]
    fn test_missing_id_is_none() {
        let catalog = Catalog::builtin().unwrap();
        assert!(catalog.get(TireId::new(99)).is_none());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let json = r#"[
            {"id": 2, "title": "A", "size": "225/65R17", "tread": "80%", "price": 90},
            {"id": 2, "title": "B", "size": "225/65R17", "tread": "60%", "price": 70}
        ]"#;
        assert!(matches!(
            Catalog::from_json(json),
            Err(CatalogError::DuplicateId(id)) if id == TireId::new(2)
        ));
    }

    #[test]
    fn test_optional_fields_default() {
        let json = r#"[{"id": 3, "title": "Bare", "size": "205/55R16", "tread": "50%", "price": "$45.00"}]"#;
        let catalog = Catalog::from_json(json).unwrap();
        let item = catalog.get(TireId::new(3)).unwrap();
        assert!(item.photos.is_empty());
        assert!(item.cover_photo().is_none());
        assert_eq!(catalog.len(), 1);
    }
}
