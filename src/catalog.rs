//! Product SKU catalog imported from CSV
//!
//! The CSV has a `SKU,Nombre` (or `SKU,Name`) header and one product per
//! line. Duplicate SKUs keep their first occurrence; later rows are dropped
//! and only counted.

use std::collections::HashSet;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::models::CsvImport;
use crate::models::ProductSku;
use crate::storage::{StorageBackend, StorageError};

/// Key holding the imported product list
pub const DEFAULT_KEY: &str = "equipment-products-sku";

/// Largest CSV accepted for import
pub const MAX_CSV_BYTES: usize = 10 * 1024 * 1024;

pub const MAX_SKU_LEN: usize = 50;

/// Line errors kept in an import report
pub const MAX_REPORTED_ERRORS: usize = 10;

static SKU_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.\-]+$").expect("valid SKU pattern"));

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CatalogError {
    #[error("CSV must contain a header row and at least one data row")]
    MissingRows,

    #[error("CSV must have exactly 2 columns: SKU, Nombre")]
    InvalidHeader,

    #[error("CSV is too large: {0} bytes, maximum is 10 MiB")]
    TooLarge(usize),

    #[error("no valid products found in CSV")]
    NoProducts,

    #[error("invalid SKU '{sku}': {reason}")]
    InvalidSku { sku: String, reason: &'static str },

    #[error("product list could not be stored")]
    StorageFailed,
}

/// Check the header and row count before parsing
pub fn validate_csv_structure(text: &str) -> Result<(), CatalogError> {
    let mut lines = text.trim().lines();
    let header = lines.next().ok_or(CatalogError::MissingRows)?;
    if lines.next().is_none() {
        return Err(CatalogError::MissingRows);
    }

    let columns: Vec<String> = header
        .split(',')
        .map(|h| h.trim().trim_matches('"').to_lowercase())
        .collect();
    let has_sku = columns.iter().any(|c| c == "sku");
    let has_name = columns.iter().any(|c| c == "nombre" || c == "name");
    if columns.len() != 2 || !has_sku || !has_name {
        return Err(CatalogError::InvalidHeader);
    }
    Ok(())
}

/// Validate a single SKU typed by hand
pub fn validate_sku(sku: &str) -> Result<(), CatalogError> {
    let trimmed = sku.trim();
    let invalid = |reason| CatalogError::InvalidSku {
        sku: trimmed.to_string(),
        reason,
    };

    if trimmed.is_empty() {
        return Err(invalid("must not be empty"));
    }
    if trimmed.chars().count() > MAX_SKU_LEN {
        return Err(invalid("must be between 1 and 50 characters"));
    }
    if !SKU_PATTERN.is_match(trimmed) {
        return Err(invalid("only letters, digits, '-', '.' and '_' are allowed"));
    }
    Ok(())
}

/// Parse data rows, collecting per-line errors instead of failing
pub fn parse_csv(text: &str) -> CsvImport {
    let trimmed = text.trim();
    let mut report = CsvImport {
        total_lines: trimmed.lines().count().saturating_sub(1),
        ..CsvImport::default()
    };
    let mut seen = HashSet::new();

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(trimmed.as_bytes());

    for row in reader.records() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or_default();
                report.errors.push(format!("Line {}: {}", line, e));
                continue;
            }
        };
        let line = row.position().map(|p| p.line()).unwrap_or_default();

        if row.len() != 2 {
            report
                .errors
                .push(format!("Line {}: expected exactly 2 comma-separated values", line));
            continue;
        }

        let (sku, name) = (&row[0], &row[1]);
        if sku.is_empty() || name.is_empty() {
            report
                .errors
                .push(format!("Line {}: SKU and name must not be empty", line));
            continue;
        }
        if sku.chars().count() > MAX_SKU_LEN {
            report.errors.push(format!(
                "Line {}: SKU '{}' must be between 1 and {} characters",
                line, sku, MAX_SKU_LEN
            ));
            continue;
        }

        if !seen.insert(sku.to_string()) {
            report.duplicates += 1;
            continue;
        }
        report.products.push(ProductSku::new(sku, name));
    }

    report
}

/// Sample CSV offered as a template
pub fn example_csv() -> &'static str {
    "SKU,Nombre\n\
     5674632524,iPhone 15 128GB Black\n\
     865457346,iPad mini 7\n\
     123456789,Samsung Galaxy S24\n\
     654987321,AirPods Pro 2\n\
     147258369,Xiaomi Mi 13 Pro\n\
     ABC123,Producto Especial A\n\
     ALPHA001,Monitor 4K"
}

/// Persisted product list
pub struct ProductCatalog {
    backend: Arc<dyn StorageBackend>,
    key: String,
}

impl ProductCatalog {
    pub fn new(backend: Arc<dyn StorageBackend>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    /// Stored products; unreadable content reads as an empty list
    pub fn load(&self) -> Vec<ProductSku> {
        let raw = match self.backend.get_item(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::error!(key = %self.key, error = %e, "Failed to read product list");
                return Vec::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(key = %self.key, error = %e, "Discarding corrupted product list");
            Vec::new()
        })
    }

    pub fn save(&self, products: &[ProductSku]) -> bool {
        let result = serde_json::to_string(products)
            .map_err(StorageError::from)
            .and_then(|serialized| self.backend.set_item(&self.key, &serialized));

        match result {
            Ok(()) => {
                tracing::info!(total = products.len(), "Product list saved");
                true
            }
            Err(e) => {
                tracing::error!(key = %self.key, error = %e, "Failed to save product list");
                false
            }
        }
    }

    pub fn clear(&self) -> bool {
        match self.backend.remove_item(&self.key) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(key = %self.key, error = %e, "Failed to clear product list");
                false
            }
        }
    }

    pub fn find(&self, sku: &str) -> Option<ProductSku> {
        self.load().into_iter().find(|p| p.sku == sku)
    }

    /// Validate, parse and store a CSV, replacing the current list
    pub fn import(&self, text: &str) -> Result<CsvImport, CatalogError> {
        if text.len() > MAX_CSV_BYTES {
            return Err(CatalogError::TooLarge(text.len()));
        }
        validate_csv_structure(text)?;

        let mut report = parse_csv(text);
        if report.products.is_empty() {
            return Err(CatalogError::NoProducts);
        }
        if !self.save(&report.products) {
            return Err(CatalogError::StorageFailed);
        }

        if report.duplicates > 0 {
            tracing::warn!(duplicates = report.duplicates, "Duplicate SKUs dropped during import");
        }
        report.errors.truncate(MAX_REPORTED_ERRORS);
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn catalog() -> (Arc<MemoryStorage>, ProductCatalog) {
        let storage = Arc::new(MemoryStorage::new());
        let catalog = ProductCatalog::new(storage.clone(), DEFAULT_KEY);
        (storage, catalog)
    }

    #[test]
    fn header_must_have_sku_and_name() {
        assert!(validate_csv_structure("SKU,Nombre\n1,a").is_ok());
        assert!(validate_csv_structure(" sku , NAME \n1,a").is_ok());
        assert_eq!(validate_csv_structure("SKU,Nombre"), Err(CatalogError::MissingRows));
        assert_eq!(
            validate_csv_structure("SKU,Nombre,Precio\n1,a,2"),
            Err(CatalogError::InvalidHeader)
        );
        assert_eq!(validate_csv_structure("Code,Nombre\n1,a"), Err(CatalogError::InvalidHeader));
    }

    #[test]
    fn duplicates_keep_first_occurrence_and_are_counted() {
        let report = parse_csv("SKU,Nombre\nA1,First\nB2,Second\nA1,Again\nA1,Third");
        assert_eq!(report.products.len(), 2);
        assert_eq!(report.products[0], ProductSku::new("A1", "First"));
        assert_eq!(report.duplicates, 2);
        assert!(report.errors.is_empty());
        assert_eq!(report.total_lines, 4);
    }

    #[test]
    fn malformed_lines_are_reported_with_line_numbers() {
        let long_sku = "X".repeat(51);
        let csv = format!("SKU,Nombre\nA1,ok\nB2\n,empty\nC3,x,extra\n{},long", long_sku);
        let report = parse_csv(&csv);
        assert_eq!(report.products, vec![ProductSku::new("A1", "ok")]);
        assert_eq!(report.errors.len(), 4);
        assert!(report.errors[0].starts_with("Line 3:"));
        assert!(report.errors[1].starts_with("Line 4:"));
        assert!(report.errors[3].contains("between 1 and 50"));
    }

    #[test]
    fn blank_lines_are_skipped() {
        let report = parse_csv("SKU,Nombre\nA1,one\n\nB2,two\n");
        assert_eq!(report.products.len(), 2);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn sku_validation() {
        assert!(validate_sku("ABC-123_x.9").is_ok());
        assert!(validate_sku("  ").is_err());
        assert!(validate_sku("has space").is_err());
        assert!(validate_sku(&"1".repeat(51)).is_err());
    }

    #[test]
    fn import_replaces_the_stored_list() {
        let (_, catalog) = catalog();
        catalog.import("SKU,Nombre\nA1,one\nB2,two").unwrap();
        let report = catalog.import("SKU,Nombre\nC3,three\nC3,dup").unwrap();
        assert_eq!(report.duplicates, 1);
        assert_eq!(catalog.load(), vec![ProductSku::new("C3", "three")]);
        assert_eq!(catalog.find("C3").unwrap().name, "three");
        assert!(catalog.find("A1").is_none());
    }

    #[test]
    fn import_without_valid_rows_keeps_previous_list() {
        let (_, catalog) = catalog();
        catalog.import("SKU,Nombre\nA1,one").unwrap();
        assert_eq!(catalog.import("SKU,Nombre\n,\n"), Err(CatalogError::NoProducts));
        assert_eq!(catalog.load().len(), 1);
    }

    #[test]
    fn list_saved_by_the_first_app_generation_is_kept() {
        let (storage, catalog) = catalog();
        storage
            .set_item(DEFAULT_KEY, r#"[{"sku":"IPH12-128","nombre":"iPhone 12 128GB"}]"#)
            .unwrap();
        assert_eq!(catalog.load(), vec![ProductSku::new("IPH12-128", "iPhone 12 128GB")]);
        assert_eq!(catalog.find("IPH12-128").unwrap().name, "iPhone 12 128GB");
    }

    #[test]
    fn example_csv_imports_cleanly() {
        let (_, catalog) = catalog();
        let report = catalog.import(example_csv()).unwrap();
        assert_eq!(report.products.len(), 7);
        assert_eq!(report.duplicates, 0);
    }

    #[test]
    fn corrupted_list_loads_empty_and_clear_removes_it() {
        let (storage, catalog) = catalog();
        storage.set_item(DEFAULT_KEY, "[{\"sku\":").unwrap();
        assert!(catalog.load().is_empty());
        assert!(catalog.clear());
        assert_eq!(storage.get_item(DEFAULT_KEY).unwrap(), None);
    }
}
