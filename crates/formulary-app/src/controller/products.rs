//! # Product Catalog
//!
//! The pharmacy's own active-ingredient catalog. Names are unique
//! case-insensitively; every mutation validates before touching storage.
//! The catalog is what grounds suggestions in "what this pharmacy can
//! actually compound".

use tracing::info;

use formulary_core::csv::{format_products_csv, parse_products_csv};
use formulary_core::ids::{indexed_id, now_millis, timestamp_id};
use formulary_core::validation::{check_unique_product_name, normalized_name, validate_product};
use formulary_core::Product;

use crate::controller::AppController;
use crate::error::AppResult;

/// New-product input; the id is assigned on insert.
#[derive(Debug, Clone, Default)]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    pub category: Option<String>,
}

/// What a CSV import did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    /// Rows inserted.
    pub added: usize,
    /// Rows skipped because the name already existed (in the catalog or
    /// earlier in the same file).
    pub skipped: usize,
}

impl AppController {
    /// Adds a product to the catalog.
    ///
    /// ## Returns
    /// * `Err(AppError::Validation)` - empty name, or the name is taken
    pub async fn add_product(&self, input: ProductInput) -> AppResult<Product> {
        let product = Product {
            id: timestamp_id(),
            name: input.name.trim().to_string(),
            description: input.description.trim().to_string(),
            category: input.category.filter(|c| !c.trim().is_empty()),
        };
        validate_product(&product)?;

        let existing = self.db.products().get_all().await?;
        let names: Vec<String> = existing.iter().map(|p| normalized_name(&p.name)).collect();
        check_unique_product_name(&product.name, names.iter().map(String::as_str))?;

        self.db.products().put(&product).await?;
        info!(name = %product.name, "Added product");
        Ok(product)
    }

    /// Updates an existing product. The name stays unique against every
    /// other product; colliding with itself is fine.
    pub async fn update_product(&self, product: &Product) -> AppResult<()> {
        validate_product(product)?;

        let existing = self.db.products().get_all().await?;
        let names: Vec<String> = existing
            .iter()
            .filter(|p| p.id != product.id)
            .map(|p| normalized_name(&p.name))
            .collect();
        check_unique_product_name(&product.name, names.iter().map(String::as_str))?;

        self.db.products().put(product).await?;
        info!(name = %product.name, "Updated product");
        Ok(())
    }

    pub async fn delete_product(&self, id: &str) -> AppResult<()> {
        self.db.products().remove(id).await?;
        Ok(())
    }

    /// Imports catalog rows from CSV text.
    ///
    /// Rows whose name already exists (case-insensitively, against the
    /// catalog or an earlier row of the same file) are skipped, not
    /// errors; the summary reports both counts.
    pub async fn import_products_csv(&self, text: &str) -> AppResult<ImportSummary> {
        let rows = parse_products_csv(text)?;

        let existing = self.db.products().get_all().await?;
        let mut seen: std::collections::HashSet<String> =
            existing.iter().map(|p| normalized_name(&p.name)).collect();

        let millis = now_millis();
        let mut added = 0usize;
        let mut skipped = 0usize;

        for (index, row) in rows.into_iter().enumerate() {
            let normalized = normalized_name(&row.name);
            if normalized.is_empty() || !seen.insert(normalized) {
                skipped += 1;
                continue;
            }

            let product = Product {
                id: indexed_id(millis, index),
                name: row.name.trim().to_string(),
                description: row.description.trim().to_string(),
                category: row.category.filter(|c| !c.trim().is_empty()),
            };
            self.db.products().put(&product).await?;
            added += 1;
        }

        info!(added, skipped, "Imported products from CSV");
        Ok(ImportSummary { added, skipped })
    }

    /// Exports the catalog as CSV, alphabetical by name.
    pub async fn export_products_csv(&self) -> AppResult<String> {
        let mut products = self.db.products().get_all().await?;
        products.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(format_products_csv(&products))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
