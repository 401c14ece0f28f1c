//! # Catalog
//! In-memory device catalog read from a JSON file, plus the query filter applied before ranking.
//!
//! Accepted file shapes:
//! - a list of record objects: `[{"slug": "...", ...}, ...]`
//! - an object keyed by slug: `{"pixel-8": {"slug": "pixel-8", ...}, ...}`
//!
//! Entries without a non-empty `slug` (or that are not objects) are skipped and counted.
//! A repeated slug replaces the earlier record in place (upsert semantics).
//!
//! Path resolution for [`Catalog::load_default`]:
//! 1) `$SMARTBUY_CATALOG_PATH` (must exist if set)
//! 2) `data/catalog.json`
//! 3) empty catalog

use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{CatalogError, FilterError};
use crate::record::DeviceRecord;
use crate::resolve::resolve_price;

pub const ENV_CATALOG_PATH: &str = "SMARTBUY_CATALOG_PATH";
pub const DEFAULT_CATALOG_PATH: &str = "data/catalog.json";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    records: Vec<DeviceRecord>,
    skipped: usize,
    replaced: usize,
}

impl Catalog {
    pub fn from_records(records: Vec<DeviceRecord>) -> Self {
        let mut cat = Catalog::default();
        cat.extend(records.into_iter().map(|r| Value::Object(r.into_fields())));
        cat
    }

    pub fn from_json_str(s: &str) -> Result<Self, CatalogError> {
        let data: Value = serde_json::from_str(s)?;
        let items: Vec<Value> = match data {
            Value::Array(items) => items,
            Value::Object(map) => map.into_iter().map(|(_, v)| v).collect(),
            Value::Null => return Err(CatalogError::Shape("null")),
            Value::Bool(_) => return Err(CatalogError::Shape("a boolean")),
            Value::Number(_) => return Err(CatalogError::Shape("a number")),
            Value::String(_) => return Err(CatalogError::Shape("a string")),
        };
        let mut cat = Catalog::default();
        cat.extend(items);
        Ok(cat)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let cat = Self::from_json_str(&content)?;
        if cat.skipped > 0 {
            warn!(
                path = %path.display(),
                skipped = cat.skipped,
                "catalog entries without a slug were skipped"
            );
        }
        info!(
            path = %path.display(),
            records = cat.len(),
            skipped = cat.skipped,
            replaced = cat.replaced,
            "catalog loaded"
        );
        Ok(cat)
    }

    /// Load using env var + fallbacks (see module docs).
    pub fn load_default() -> Result<Self, CatalogError> {
        match Self::resolve_path()? {
            Some(path) => Self::load(&path),
            None => {
                warn!("no catalog file found; starting with an empty catalog");
                Ok(Catalog::default())
            }
        }
    }

    /// Path [`Catalog::load_default`] would read, or `None` for the empty fallback.
    pub fn resolve_path() -> Result<Option<PathBuf>, CatalogError> {
        if let Ok(p) = std::env::var(ENV_CATALOG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(CatalogError::MissingEnvPath {
                    var: ENV_CATALOG_PATH,
                    path: pb,
                });
            }
            return Ok(Some(pb));
        }
        let default_path = PathBuf::from(DEFAULT_CATALOG_PATH);
        Ok(default_path.exists().then_some(default_path))
    }

    fn extend(&mut self, items: impl IntoIterator<Item = Value>) {
        let mut by_slug: HashMap<String, usize> = self
            .records
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.slug().map(|s| (s.to_string(), i)))
            .collect();

        for item in items {
            let Ok(record) = DeviceRecord::try_from(item) else {
                self.skipped += 1;
                continue;
            };
            let Some(slug) = record.slug().map(str::to_string) else {
                self.skipped += 1;
                continue;
            };
            match by_slug.get(&slug) {
                Some(&i) => {
                    self.records[i] = record;
                    self.replaced += 1;
                }
                None => {
                    by_slug.insert(slug, self.records.len());
                    self.records.push(record);
                }
            }
        }
    }

    pub fn records(&self) -> &[DeviceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Entries dropped while loading (no slug, or not an object).
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Entries that overwrote an earlier record with the same slug.
    pub fn replaced(&self) -> usize {
        self.replaced
    }

    pub fn get(&self, slug: &str) -> Option<&DeviceRecord> {
        self.records.iter().find(|r| r.slug() == Some(slug))
    }

    /// Clones of the records passing `filter`, in catalog order.
    pub fn select(&self, filter: &CatalogFilter) -> Vec<DeviceRecord> {
        self.records
            .iter()
            .filter(|r| filter.matches(*r))
            .cloned()
            .collect()
    }
}

/// Price ceiling and brand match taken from query strings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogFilter {
    pub max_price: Option<f64>,
    pub brand: Option<String>,
}

impl CatalogFilter {
    /// Blank inputs mean "no filter". A non-numeric `max_price` is rejected.
    pub fn from_query(max_price: Option<&str>, brand: Option<&str>) -> Result<Self, FilterError> {
        let max_price = match max_price.map(str::trim).filter(|s| !s.is_empty()) {
            None => None,
            Some(s) => match s.parse::<f64>() {
                Ok(v) if v.is_finite() => Some(v),
                _ => return Err(FilterError::InvalidMaxPrice(s.to_string())),
            },
        };
        let brand = brand
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        Ok(Self { max_price, brand })
    }

    pub fn is_empty(&self) -> bool {
        self.max_price.is_none() && self.brand.is_none()
    }

    /// Records without a usable price never pass a price ceiling.
    pub fn matches(&self, record: &DeviceRecord) -> bool {
        if let Some(max) = self.max_price {
            match resolve_price(record) {
                Some(p) if p <= max => {}
                _ => return false,
            }
        }
        if let Some(want) = &self.brand {
            match record.brand() {
                Some(b) if b.to_lowercase() == want.to_lowercase() => {}
                _ => return false,
            }
        }
        true
    }

    pub fn apply(&self, records: Vec<DeviceRecord>) -> Vec<DeviceRecord> {
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rec(slug: &str, brand: &str, price: Value) -> DeviceRecord {
        DeviceRecord::default()
            .with("slug", slug)
            .with("brand", brand)
            .with("price_sgd", price)
    }

    #[test]
    fn list_and_object_shapes() {
        let list = Catalog::from_json_str(
            r#"[{"slug": "a", "brand": "X"}, {"brand": "no-slug"}, 7, {"slug": "b"}]"#,
        )
        .unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.skipped(), 2);
        assert_eq!(list.records()[0].slug(), Some("a"));

        let obj = Catalog::from_json_str(r#"{"a": {"slug": "a"}, "b": {"slug": ""}}"#).unwrap();
        assert_eq!(obj.len(), 1);
        assert_eq!(obj.skipped(), 1);
    }

    #[test]
    fn scalar_top_level_is_a_shape_error() {
        assert!(matches!(
            Catalog::from_json_str("42"),
            Err(CatalogError::Shape(_))
        ));
        assert!(matches!(
            Catalog::from_json_str("{not json"),
            Err(CatalogError::Json(_))
        ));
    }

    #[test]
    fn duplicate_slug_replaces_in_place() {
        let cat = Catalog::from_json_str(
            r#"[{"slug": "a", "ram_gb": 4}, {"slug": "b"}, {"slug": "a", "ram_gb": 8}]"#,
        )
        .unwrap();
        assert_eq!(cat.len(), 2);
        assert_eq!(cat.replaced(), 1);
        assert_eq!(cat.records()[0].fields()["ram_gb"], json!(8));
        assert!(cat.get("b").is_some());
    }

    #[test]
    fn filter_parsing() {
        assert!(CatalogFilter::from_query(None, None).unwrap().is_empty());
        assert!(CatalogFilter::from_query(Some("  "), Some("")).unwrap().is_empty());
        let f = CatalogFilter::from_query(Some("499.90"), Some(" Samsung ")).unwrap();
        assert_eq!(f.max_price, Some(499.90));
        assert_eq!(f.brand.as_deref(), Some("Samsung"));

        assert_eq!(
            CatalogFilter::from_query(Some("cheap"), None),
            Err(FilterError::InvalidMaxPrice("cheap".into()))
        );
        assert!(CatalogFilter::from_query(Some("inf"), None).is_err());
    }

    #[test]
    fn filter_matching() {
        let records = vec![
            rec("a", "Samsung", json!(300)),
            rec("b", "samsung", json!("899")),
            rec("c", "Apple", json!(300)),
            rec("d", "Samsung", json!("N/A")),
        ];

        let cheap = CatalogFilter::from_query(Some("500"), None).unwrap();
        let slugs: Vec<_> = cheap
            .apply(records.clone())
            .iter()
            .filter_map(|r| r.slug().map(str::to_string))
            .collect();
        assert_eq!(slugs, ["a", "c"]);

        let brand = CatalogFilter::from_query(None, Some("SAMSUNG")).unwrap();
        assert_eq!(brand.apply(records.clone()).len(), 3);

        let both = CatalogFilter::from_query(Some("300"), Some("samsung")).unwrap();
        let out = both.apply(records);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].slug(), Some("a"));
    }
}
