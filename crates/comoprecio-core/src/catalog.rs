use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const BUILTIN_CATALOG: &str = include_str!("../catalog.yaml");

/// A retail store that can appear as an offer source.
///
/// Serialized verbatim into the `sources` array of the comparison document,
/// hence the camelCase `baseUrl`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreDescriptor {
    pub id: String,
    pub name: String,
    pub logo: String,
    pub country: String,
    #[serde(rename = "baseUrl", alias = "base_url")]
    pub base_url: String,
}

/// A catalog product to look up in each of its target stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductConfig {
    pub id: String,
    /// Search term variants; only the first is ever queried.
    pub search_terms: Vec<String>,
    pub brand: String,
    pub category: String,
    /// Store ids, visited in this order.
    pub stores: Vec<String>,
}

impl ProductConfig {
    /// The term actually sent to the stores.
    #[must_use]
    pub fn primary_search_term(&self) -> &str {
        self.search_terms.first().map_or("", String::as_str)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    pub stores: Vec<StoreDescriptor>,
    pub products: Vec<ProductConfig>,
}

impl Catalog {
    /// The catalog shipped with the crate.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the embedded YAML fails to parse or validate.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_yaml(BUILTIN_CATALOG)
    }

    /// Parse and validate a catalog from YAML text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the text is not valid catalog YAML or fails validation.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let catalog: Catalog = serde_yaml::from_str(content)?;
        validate_catalog(&catalog)?;
        Ok(catalog)
    }

    #[must_use]
    pub fn store(&self, id: &str) -> Option<&StoreDescriptor> {
        self.stores.iter().find(|s| s.id == id)
    }
}

/// Load and validate a catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_catalog(path: &Path) -> Result<Catalog, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    Catalog::from_yaml(&content)
}

fn validate_catalog(catalog: &Catalog) -> Result<(), ConfigError> {
    let mut store_ids = HashSet::new();
    for store in &catalog.stores {
        if store.id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "store id must be non-empty".to_string(),
            ));
        }
        if !store_ids.insert(store.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate store id: '{}'",
                store.id
            )));
        }
    }

    let mut product_ids = HashSet::new();
    for product in &catalog.products {
        if product.id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "product id must be non-empty".to_string(),
            ));
        }

        if !product_ids.insert(product.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate product id: '{}'",
                product.id
            )));
        }

        if product.primary_search_term().trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "product '{}' needs at least one non-empty search term",
                product.id
            )));
        }

        if let Some(unknown) = product
            .stores
            .iter()
            .find(|id| !store_ids.contains(id.as_str()))
        {
            return Err(ConfigError::Validation(format!(
                "product '{}' references unknown store '{unknown}'",
                product.id
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
