//! Product SKU reference

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Catalog product a record can be linked to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct ProductSku {
    pub sku: String,
    /// Stored as `nombre` by the first generation of the app
    #[serde(alias = "nombre")]
    pub name: String,
}

impl ProductSku {
    pub fn new(sku: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            sku: sku.into(),
            name: name.into(),
        }
    }
}
