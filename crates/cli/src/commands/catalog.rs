//! Catalog inspection commands.
//!
//! # Usage
//!
//! ```bash
//! cartwheel catalog check crates/storefront/data/catalog.json
//! cartwheel catalog check https://example.com/data.json
//! ```
//!
//! # Environment Variables
//!
//! - `CARTWHEEL_CATALOG` - Catalog used when no source is given

use cartwheel_storefront::catalog::{CatalogLoadError, CatalogLoader, CatalogSource};
use cartwheel_storefront::config::{ConfigError, StorefrontConfig};
use thiserror::Error;

/// Errors that can occur during catalog commands.
#[derive(Debug, Error)]
pub enum CatalogCommandError {
    /// The source argument is not a valid path or URL.
    #[error("Invalid catalog source {0}: {1}")]
    InvalidSource(String, url::ParseError),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The catalog could not be fetched or parsed.
    #[error(transparent)]
    Load(#[from] CatalogLoadError),
}

/// Resolve the catalog source from the argument or the environment.
fn resolve_source(source: Option<&str>) -> Result<CatalogSource, CatalogCommandError> {
    match source {
        Some(raw) => raw
            .parse()
            .map_err(|e| CatalogCommandError::InvalidSource(raw.to_string(), e)),
        None => Ok(StorefrontConfig::from_env()?.catalog),
    }
}

/// Load a catalog and log every product it contains.
///
/// # Errors
///
/// Returns `CatalogCommandError` if the source is invalid or the document
/// cannot be loaded.
pub async fn check(source: Option<&str>) -> Result<(), CatalogCommandError> {
    let source = resolve_source(source)?;
    tracing::info!("Loading catalog from {source}...");

    let catalog = CatalogLoader::new(source).load_products().await?;

    for product in catalog.iter() {
        tracing::info!(
            handle = %product.handle,
            category = %product.category,
            price = %product.price.display(),
            "{}",
            product.name
        );
    }

    tracing::info!(products = catalog.len(), "Catalog is valid");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_explicit_sources() {
        assert!(matches!(
            resolve_source(Some("data/catalog.json")).unwrap(),
            CatalogSource::File(_)
        ));
        assert!(matches!(
            resolve_source(Some("https://example.com/data.json")).unwrap(),
            CatalogSource::Url(_)
        ));
    }

    #[test]
    fn test_resolve_rejects_bad_url() {
        assert!(matches!(
            resolve_source(Some("http://")),
            Err(CatalogCommandError::InvalidSource(..))
        ));
    }
}
