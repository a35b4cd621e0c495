//! Catalog loading.
//!
//! The catalog is fetched exactly once at startup, from a local file or an
//! `http(s)` URL, by a background task. Until it finishes the product grid
//! shows a loading placeholder; if it fails the grid shows an inline error and
//! nothing retries. The cart is usable either way.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use cartwheel_core::{Catalog, CatalogError};
use thiserror::Error;
use tracing::{error, info, instrument};
use url::Url;

use crate::state::{AppState, CatalogState};

/// Errors that can occur while fetching the catalog.
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    /// Reading a local catalog file failed.
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// Fetching a remote catalog failed (network error or non-2xx status).
    #[error("failed to fetch catalog: {0}")]
    Http(#[from] reqwest::Error),

    /// The document is not a valid catalog.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Where the catalog document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// A file on the local filesystem.
    File(PathBuf),
    /// A remote `http` or `https` resource.
    Url(Url),
}

impl FromStr for CatalogSource {
    type Err = url::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with("http://") || s.starts_with("https://") {
            Ok(Self::Url(Url::parse(s)?))
        } else {
            Ok(Self::File(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => write!(f, "{url}"),
        }
    }
}

/// Fetches and parses the catalog document.
#[derive(Debug, Clone)]
pub struct CatalogLoader {
    source: CatalogSource,
    client: reqwest::Client,
}

impl CatalogLoader {
    /// Create a loader for `source`.
    #[must_use]
    pub fn new(source: CatalogSource) -> Self {
        Self {
            source,
            client: reqwest::Client::new(),
        }
    }

    /// Fetch the catalog document and parse it.
    ///
    /// # Errors
    ///
    /// Returns `CatalogLoadError` if the document cannot be read or fetched,
    /// if a remote server answers with a non-success status, or if the body
    /// is not a valid catalog.
    #[instrument(skip(self), fields(source = %self.source))]
    pub async fn load_products(&self) -> Result<Catalog, CatalogLoadError> {
        let body = match &self.source {
            CatalogSource::File(path) => tokio::fs::read_to_string(path).await?,
            CatalogSource::Url(url) => {
                self.client
                    .get(url.clone())
                    .send()
                    .await?
                    .error_for_status()?
                    .text()
                    .await?
            }
        };

        Ok(Catalog::from_json(&body)?)
    }
}

/// Spawn the one-shot background task that loads the catalog into `state`.
pub fn load_catalog_async(state: AppState, loader: CatalogLoader) {
    info!("Spawning catalog load task");
    tokio::spawn(async move {
        let next = match loader.load_products().await {
            Ok(catalog) => {
                info!(products = catalog.len(), "Catalog loaded");
                CatalogState::Ready(Arc::new(catalog))
            }
            Err(e) => {
                error!(error = %e, "Error loading products");
                CatalogState::Failed
            }
        };
        state.set_catalog(next).await;
    });
}
