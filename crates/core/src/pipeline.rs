//! Filter, search and sort pipeline
//!
//! Stage order matters and is fixed: tab filter, featured filter, search
//! filter, then sort. The same pipeline runs whether the source delivered
//! the whole collection or a single server page; in the latter case it only
//! narrows and reorders within that page.

use crate::project::Project;
use crate::query::{QueryState, SortKey, Tab};

/// Tags counted as frontend work by the web tab
pub const WEB_KEYWORDS: [&str; 4] = ["react", "frontend", "tailwind", "web"];

/// Tags counted as backend work by the back tab
pub const BACK_KEYWORDS: [&str; 4] = ["django", "api", "drf", "backend"];

/// Substring match against the raw lowercased tag string, not exact tokens;
/// "webgl" satisfies "web".
fn has_any_keyword(project: &Project, keywords: &[&str]) -> bool {
    let tags = project.tags_lower();
    keywords.iter().any(|keyword| tags.contains(keyword))
}

fn matches_search(project: &Project, needle: &str) -> bool {
    let lower = |field: &Option<String>| field.as_deref().unwrap_or("").to_lowercase();
    lower(&project.title).contains(needle)
        || project.tags_lower().contains(needle)
        || lower(&project.description).contains(needle)
}

/// Tab, featured and search filters, in that order. This is also the count
/// half of the engine: client-mode totals are the length of this output over
/// the whole collection.
pub fn filter_records(records: &[Project], state: &QueryState) -> Vec<Project> {
    let needle = state.search.trim().to_lowercase();
    records
        .iter()
        .filter(|project| match state.tab {
            Tab::Web => has_any_keyword(project, &WEB_KEYWORDS),
            Tab::Back => has_any_keyword(project, &BACK_KEYWORDS),
            Tab::All => true,
        })
        .filter(|project| !state.featured_only || project.featured)
        .filter(|project| needle.is_empty() || matches_search(project, &needle))
        .cloned()
        .collect()
}

/// Stable sort by the active key; records comparing equal keep their
/// original relative order.
pub fn sort_records(records: &mut [Project], sort: SortKey) {
    match sort {
        SortKey::Az => records.sort_by_key(title_key),
        SortKey::Za => records.sort_by(|a, b| title_key(b).cmp(&title_key(a))),
        SortKey::New => records.sort_by_key(|p| std::cmp::Reverse(p.created_timestamp())),
        SortKey::Old => records.sort_by_key(|p| p.created_timestamp()),
    }
}

/// Case-insensitive title key; missing titles compare as empty
fn title_key(project: &Project) -> String {
    project.title.as_deref().unwrap_or("").to_lowercase()
}

/// The whole pipeline: filter then sort
pub fn apply(records: &[Project], state: &QueryState) -> Vec<Project> {
    let mut out = filter_records(records, state);
    sort_records(&mut out, state.sort);
    out
}
