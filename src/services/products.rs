//! Product catalog service

use std::sync::Arc;

use crate::{
    catalog::ProductCatalog,
    error::AppResult,
    models::{CsvImport, ProductSku},
};

#[derive(Clone)]
pub struct ProductService {
    catalog: Arc<ProductCatalog>,
}

impl ProductService {
    pub fn new(catalog: Arc<ProductCatalog>) -> Self {
        Self { catalog }
    }

    pub fn list(&self) -> Vec<ProductSku> {
        self.catalog.load()
    }

    pub fn find(&self, sku: &str) -> Option<ProductSku> {
        self.catalog.find(sku)
    }

    /// Import a CSV, replacing the stored list
    pub fn import(&self, csv: &str) -> AppResult<CsvImport> {
        Ok(self.catalog.import(csv)?)
    }

    pub fn clear(&self) -> bool {
        self.catalog.clear()
    }
}
