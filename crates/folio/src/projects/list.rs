use std::collections::BTreeMap;

use crate::prelude::{println, *};
use colored::Colorize;
use folio_core::pagination::{PageMode, PageOutput};
use folio_core::query::{self, QueryPatch, QueryState};

use super::session::{BrowseSession, FetchPhase};
use super::CatalogConfig;

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct ListOptions {
    /// Category tab: all, web or back
    #[arg(short, long, env = "FOLIO_TAB", default_value = "all")]
    pub tab: String,

    /// Free-text search over title, tags and description
    #[arg(short = 'q', long, env = "FOLIO_SEARCH", default_value = "")]
    pub search: String,

    /// Sort order: new, old, az or za
    #[arg(short, long, default_value = "new")]
    pub sort: String,

    /// Page number (1-indexed)
    #[arg(short, long, default_value = "1")]
    pub page: String,

    /// Projects per page (6, 9, 12 or 18)
    #[arg(long, default_value = "9")]
    pub size: String,

    /// Only featured projects
    #[arg(short, long)]
    pub featured: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ListOptions {
    /// Raw shareable parameters, exactly as a URL would carry them. Values
    /// go through the codec untyped so malformed input normalizes instead
    /// of erroring.
    pub fn to_params(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("tab".to_string(), self.tab.clone()),
            ("q".to_string(), self.search.clone()),
            ("sort".to_string(), self.sort.clone()),
            ("page".to_string(), self.page.clone()),
            ("size".to_string(), self.size.clone()),
            (
                "featured".to_string(),
                if self.featured { "1" } else { "0" }.to_string(),
            ),
        ])
    }
}

pub async fn run(options: ListOptions, global: crate::Global) -> Result<()> {
    let config = CatalogConfig::from_env().with_overrides(global.base_url.clone());

    if global.verbose {
        println!("Catalog API: {}", config.api_root());
        println!();
    }

    let requested = query::decode(&options.to_params());
    let mut session = BrowseSession::new(config);
    session.on_state_change(QueryPatch::from(requested)).await;

    let state = session.state();
    let share = session.share_query();

    match session.phase() {
        FetchPhase::Ready(page) => {
            if options.json {
                println!("{}", serde_json::to_string_pretty(page)?);
            } else if page.items.is_empty() {
                output_empty(&state, page);
            } else {
                output_formatted(page, &share);
            }
            Ok(())
        }
        FetchPhase::Failed(message) => Err(eyre!("{message}")),
        FetchPhase::Idle | FetchPhase::Loading => Err(eyre!("fetch cycle did not resolve")),
    }
}

fn has_active_filters(state: &QueryState) -> bool {
    let defaults = QueryState::default();
    state.tab != defaults.tab
        || state.featured_only
        || !state.search.trim().is_empty()
        || state.page > 1
}

/// Zero records is a valid state, but "nothing matches your filters" and
/// "the catalog is empty" deserve different affordances.
fn output_empty(state: &QueryState, page: &PageOutput) {
    println!();
    if has_active_filters(state) {
        println!(
            "{}",
            "No projects match the current filters.".yellow().bold()
        );
        println!(
            "\n{}: {}",
            "To reset the view".bright_white(),
            "folio projects list".cyan()
        );
    } else {
        println!("{}", "The catalog has no projects yet.".yellow().bold());
    }
    if page.pagination.total_count > 0 {
        println!(
            "\n({} projects exist outside this page)",
            page.pagination.total_count
        );
    }
}

fn output_formatted(page: &PageOutput, share: &str) {
    let pagination = &page.pagination;

    println!("\n{}", "=".repeat(80).bright_cyan());
    println!(
        "{}",
        format!(
            "PROJECTS (Page {} of {})",
            pagination.current_page, pagination.total_pages
        )
        .bright_cyan()
        .bold()
    );
    println!("{}", "=".repeat(80).bright_cyan());
    println!();

    let mut table = crate::prelude::new_table();
    table.add_row(prettytable::row!["#", "Title", "Tags", "Created", ""]);
    for (idx, item) in page.items.iter().enumerate() {
        let item_num = match pagination.mode {
            PageMode::Client => {
                (pagination.current_page - 1) as usize * pagination.page_size as usize + idx + 1
            }
            // Server pages are already positioned; keep numbering local
            PageMode::Server => idx + 1,
        };
        table.add_row(prettytable::row![
            item_num,
            item.title.as_deref().unwrap_or("(untitled)"),
            item.tags.join(", "),
            item.created.as_deref().unwrap_or("-"),
            if item.featured { "★" } else { "" },
        ]);
    }
    table.printstd();

    for item in &page.items {
        if let Some(url) = &item.url {
            println!(
                "  {} {}: {}",
                item.title.as_deref().unwrap_or("(untitled)").bold(),
                "link".green(),
                url.cyan().underline()
            );
        }
    }

    // Navigation section
    println!("\n{}", "=".repeat(80).bright_yellow());
    println!("{}", "NAVIGATION".bright_yellow().bold());
    println!("{}", "=".repeat(80).bright_yellow());

    let mode = match pagination.mode {
        PageMode::Client => "paginated locally",
        PageMode::Server => "paginated by the server",
    };
    println!(
        "\nShowing page {} of {} ({} total projects, {mode})",
        pagination.current_page.to_string().bright_cyan().bold(),
        pagination.total_pages.to_string().bright_cyan().bold(),
        pagination.total_count.to_string().bright_cyan().bold(),
    );

    if pagination.next_page_command.is_some() || pagination.prev_page_command.is_some() {
        println!("\n{}:", "To navigate".bright_white().bold());
        if let Some(command) = &pagination.next_page_command {
            println!("  {}: {}", "Next page".green(), command.cyan());
        }
        if let Some(command) = &pagination.prev_page_command {
            println!("  {}: {}", "Previous page".green(), command.cyan());
        }
    }

    println!(
        "\n{}: ?{}",
        "Share this view".bright_white().bold(),
        share.cyan()
    );
    println!();
}
