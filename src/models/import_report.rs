//! Product CSV import report

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::product::ProductSku;

/// Outcome of parsing a product CSV
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CsvImport {
    /// Accepted products, first occurrence of each SKU
    pub products: Vec<ProductSku>,
    /// Later rows whose SKU was already seen; they are dropped
    pub duplicates: usize,
    /// One message per rejected line
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    /// Data lines in the input, header excluded
    pub total_lines: usize,
}
