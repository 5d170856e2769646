use crate::prelude::*;
use clap::Parser;

mod error;
mod ping;
mod prelude;
mod projects;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Browse the project catalog: filters, search, sort and pagination from the terminal"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Catalog API host (the API itself is served under /api)
    #[clap(long, global = true)]
    base_url: Option<String>,

    /// Whether to display additional information.
    #[clap(long, env = "FOLIO_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Project catalog operations
    Projects(crate::projects::App),

    /// Check that the catalog API is reachable
    Ping(crate::ping::PingOptions),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Projects(sub_app) => crate::projects::run(sub_app, app.global).await,
        SubCommands::Ping(options) => crate::ping::run(options, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
