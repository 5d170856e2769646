use crate::prelude::*;
use folio_core::query::QueryState;

pub mod list;
pub mod session;

pub use session::{BrowseSession, FetchPhase};

/// Default catalog host for local development
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

#[derive(Debug, clap::Parser)]
#[command(name = "projects")]
#[command(about = "Project catalog operations")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Browse the catalog with filters, search, sort and pagination
    #[clap(name = "list")]
    List(list::ListOptions),
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    match app.command {
        Commands::List(options) => list::run(options, global).await,
    }
}

/// Catalog location from the environment, with CLI overrides
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub base_url: String,
}

impl CatalogConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("FOLIO_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
        }
    }

    /// Apply CLI overrides to the configuration
    pub fn with_overrides(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url {
            self.base_url = url;
        }
        self
    }

    /// API root; the upstream serves its endpoints under /api on the host
    pub fn api_root(&self) -> String {
        format!("{}/api", self.base_url.trim_end_matches('/'))
    }
}

/// One catalog fetch for the given state.
///
/// `page`, `page_size` and `search` are forwarded as server hints; the
/// server is free to ignore them, the engine re-applies search locally
/// either way. Returns the raw payload for structural classification.
pub async fn fetch_projects(
    client: &reqwest::Client,
    config: &CatalogConfig,
    state: &QueryState,
) -> Result<serde_json::Value, Error> {
    let url = format!("{}/projects/", config.api_root());
    log::debug!("GET {url} page={} size={}", state.page, state.page_size);

    let response = client
        .get(&url)
        .query(&[
            ("page", state.page.to_string()),
            ("page_size", state.page_size.to_string()),
            ("search", state.search.clone()),
        ])
        .send()
        .await
        .map_err(|e| Error::Network(e.to_string()))?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(Error::Status(status, body));
    }

    response
        .json()
        .await
        .map_err(|e| Error::Malformed(e.to_string()))
}
