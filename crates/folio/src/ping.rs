use crate::prelude::{println, *};
use colored::Colorize;

use crate::projects::CatalogConfig;

#[derive(Debug, clap::Args)]
pub struct PingOptions {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, serde::Deserialize, serde::Serialize)]
struct PingResponse {
    pong: bool,
}

pub async fn run(options: PingOptions, global: crate::Global) -> Result<()> {
    let config = CatalogConfig::from_env().with_overrides(global.base_url);
    let url = format!("{}/ping/", config.api_root());

    if global.verbose {
        println!("GET {url}");
    }

    let client = reqwest::Client::new();
    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| Error::Network(e.to_string()))?;

    if !response.status().is_success() {
        return Err(Error::Status(
            response.status().as_u16(),
            response.text().await.unwrap_or_default(),
        )
        .into());
    }

    let body: PingResponse = response
        .json()
        .await
        .map_err(|e| Error::Malformed(e.to_string()))?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else if body.pong {
        println!("{} {}", "pong".green().bold(), config.api_root());
    } else {
        println!("{}", "The catalog answered, but not with a pong.".yellow());
    }

    Ok(())
}
