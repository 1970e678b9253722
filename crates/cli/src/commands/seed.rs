//! Seed the catalog with products from a YAML file.
//!
//! Reads a list of product definitions, validates them, and inserts them as
//! seller-less catalog rows. Existing rows are left alone; seeding the same
//! file twice inserts duplicates, so it is meant for fresh databases.

use std::path::Path;

use serde::Deserialize;
use tracing::{error, info};

use bazaar_api::db::create_pool;
use bazaar_api::db::products::{ProductData, ProductRepository};
use bazaar_core::{Price, ProductCategory};

/// One catalog entry as written in the YAML file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SeedProduct {
    name: String,
    #[serde(default)]
    description: String,
    price: Price,
    #[serde(default)]
    category: Option<ProductCategory>,
    #[serde(default)]
    subcategory: Option<String>,
    #[serde(default)]
    stock: i32,
    #[serde(default)]
    image: Option<String>,
}

impl SeedProduct {
    fn validate(&self, index: usize) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err(format!("entry {index}: name must not be empty"));
        }
        if self.stock < 0 {
            return Err(format!("entry {index}: stock must not be negative"));
        }
        Ok(())
    }

    fn into_data(self) -> ProductData {
        ProductData {
            name: self.name.trim().to_owned(),
            description: self.description,
            price: self.price,
            category: self.category,
            subcategory: self.subcategory,
            stock: self.stock,
            image: self.image,
        }
    }
}

/// Seed catalog products from a YAML file.
///
/// # Errors
///
/// Returns an error if environment variables are missing, the file cannot be
/// read or parsed, or database operations fail.
pub async fn catalog(file_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let database_url = super::database_url()?;

    // Verify file exists
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading catalog from file");

    // Read and validate YAML before connecting to database
    let content = tokio::fs::read_to_string(path).await?;
    let entries: Vec<SeedProduct> = serde_yaml::from_str(&content)?;

    info!(products = entries.len(), "Parsed catalog");

    let errors: Vec<String> = entries
        .iter()
        .enumerate()
        .filter_map(|(i, entry)| entry.validate(i).err())
        .collect();
    if !errors.is_empty() {
        error!("Catalog validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(format!("{} validation errors found", errors.len()).into());
    }

    // Connect to database
    let pool = create_pool(&database_url).await?;
    info!("Connected to database");

    let products = ProductRepository::new(&pool);
    let mut inserted = 0usize;
    for entry in entries {
        let product = products.create(&entry.into_data(), None).await?;
        inserted += 1;
        info!(product_id = %product.id, name = %product.name, "Inserted product");
    }

    info!("Seeding complete! {} products inserted", inserted);

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_seed_product_parses_minimal_entry() {
        let entry: SeedProduct =
            serde_yaml::from_str("name: Desk Lamp\nprice: \"34.50\"\n").unwrap();
        assert_eq!(entry.name, "Desk Lamp");
        assert_eq!(entry.price.amount(), Decimal::new(3450, 2));
        assert_eq!(entry.stock, 0);
        assert!(entry.category.is_none());
        assert!(entry.validate(0).is_ok());
    }

    #[test]
    fn test_seed_product_rejects_unknown_keys() {
        let result = serde_yaml::from_str::<SeedProduct>(
            "name: Desk Lamp\nprice: \"34.50\"\nseller: somebody\n",
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_seed_product_validation() {
        let entry: SeedProduct =
            serde_yaml::from_str("name: \"  \"\nprice: \"1.00\"\n").unwrap();
        assert!(entry.validate(3).unwrap_err().contains("entry 3"));

        let entry: SeedProduct =
            serde_yaml::from_str("name: Lamp\nprice: \"1.00\"\nstock: -1\n").unwrap();
        assert!(entry.validate(0).is_err());
    }
}
