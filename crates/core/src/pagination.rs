//! Count reconciliation, page slicing and the final display transform
//!
//! Totals are computed differently per response shape: client mode counts
//! the filtered whole collection, server mode trusts the reported count
//! verbatim. In server mode the local filters may narrow the visible page
//! below the reported totals; that asymmetry is a documented tradeoff of
//! filtering within a single delivered page.

use serde::Serialize;

use crate::pipeline;
use crate::project::{format_date, resolve_image_url, Project};
use crate::query::QueryState;
use crate::source::ResponseShape;

/// Which side owns pagination for the current response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageMode {
    /// Bare-array source; we slice pages out of the full collection
    Client,
    /// Envelope source; the server already delivered exactly one page
    Server,
}

/// Total pages for a reconciled count, never less than one
pub fn total_pages(total_count: u64, page_size: u32) -> u32 {
    (total_count.div_ceil(page_size as u64) as u32).max(1)
}

/// Reconcile `(total_count, total_pages)` for the active shape.
///
/// Sort never changes counts, so the client-mode total runs the filters only,
/// over the entire collection and before any slicing.
pub fn reconcile_counts(shape: &ResponseShape, state: &QueryState) -> (u64, u32) {
    let total_count = match shape {
        ResponseShape::Unpaginated { records } => {
            pipeline::filter_records(records, state).len() as u64
        }
        ResponseShape::Paginated { total_count, .. } => *total_count,
    };
    (total_count, total_pages(total_count, state.page_size))
}

/// Slice out the requested page in client mode; pass a server page through
/// untouched. Out-of-range pages yield an empty slice, never an error.
pub fn paginate(records: Vec<Project>, state: &QueryState, mode: PageMode) -> Vec<Project> {
    match mode {
        PageMode::Server => records,
        PageMode::Client => {
            let start = (state.page as usize - 1) * state.page_size as usize;
            records
                .into_iter()
                .skip(start)
                .take(state.page_size as usize)
                .collect()
        }
    }
}

/// One fully resolved page of records plus reconciled totals
#[derive(Debug, Clone, PartialEq)]
pub struct VisiblePage {
    pub items: Vec<Project>,
    pub total_count: u64,
    pub total_pages: u32,
    pub mode: PageMode,
}

/// Run the whole engine for one fetched shape: filter, sort, count, slice
pub fn resolve_page(shape: &ResponseShape, state: &QueryState) -> VisiblePage {
    let mode = if shape.is_paginated() {
        PageMode::Server
    } else {
        PageMode::Client
    };
    let (total_count, pages) = reconcile_counts(shape, state);
    let transformed = pipeline::apply(shape.records(), state);
    VisiblePage {
        items: paginate(transformed, state, mode),
        total_count,
        total_pages: pages,
        mode,
    }
}

/// Individual card in the rendered page
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct CardOutput {
    pub id: u64,
    pub slug: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub url: Option<String>,
    pub image: Option<String>,
    pub featured: bool,
    pub created: Option<String>,
}

/// Pagination metadata for the rendered page
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct PageInfo {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_count: u64,
    pub page_size: u32,
    pub mode: PageMode,
    pub next_page_command: Option<String>,
    pub prev_page_command: Option<String>,
}

/// Complete view output: cards plus pagination controls
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct PageOutput {
    pub items: Vec<CardOutput>,
    pub pagination: PageInfo,
}

/// CLI invocation reproducing `state` at the given page; only non-default
/// flags are spelled out.
pub fn state_command(state: &QueryState, page: u32) -> String {
    let defaults = QueryState::default();
    let mut command = String::from("folio projects list");
    if state.tab != defaults.tab {
        command.push_str(&format!(" --tab {}", state.tab.as_str()));
    }
    if !state.search.is_empty() {
        command.push_str(&format!(" --search \"{}\"", state.search));
    }
    if state.sort != defaults.sort {
        command.push_str(&format!(" --sort {}", state.sort.as_str()));
    }
    if state.page_size != defaults.page_size {
        command.push_str(&format!(" --size {}", state.page_size));
    }
    if state.featured_only {
        command.push_str(" --featured");
    }
    command.push_str(&format!(" --page {page}"));
    command
}

/// Build the complete view output for a resolved page.
///
/// `image_base` is the API host used to resolve relative media paths.
pub fn build_page_output(page: VisiblePage, state: &QueryState, image_base: &str) -> PageOutput {
    let items: Vec<CardOutput> = page
        .items
        .iter()
        .map(|project| CardOutput {
            id: project.id,
            slug: project.slug.clone(),
            title: project.title.clone(),
            description: project.description.clone(),
            tags: project.tag_list(),
            url: project.url.clone(),
            image: project
                .image
                .as_deref()
                .map(|image| resolve_image_url(image, image_base)),
            featured: project.featured,
            created: project.created_at.as_deref().and_then(format_date),
        })
        .collect();

    let next_page_command = if state.page < page.total_pages {
        Some(state_command(state, state.page + 1))
    } else {
        None
    };
    let prev_page_command = if state.page > 1 {
        Some(state_command(state, state.page - 1))
    } else {
        None
    };

    PageOutput {
        items,
        pagination: PageInfo {
            current_page: state.page,
            total_pages: page.total_pages,
            total_count: page.total_count,
            page_size: state.page_size,
            mode: page.mode,
            next_page_command,
            prev_page_command,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{QueryPatch, SortKey, Tab};

    fn record(id: u64, title: &str, tags: &str) -> Project {
        Project {
            id,
            slug: None,
            title: Some(title.to_string()),
            description: None,
            tags: Some(tags.to_string()),
            url: None,
            image: None,
            featured: false,
            created_at: None,
        }
    }

    fn ten_records() -> Vec<Project> {
        (1..=10)
            .map(|id| record(id, &format!("Project {id:02}"), "web"))
            .collect()
    }

    #[test]
    fn test_total_pages_minimum_one() {
        assert_eq!(total_pages(0, 9), 1);
        assert_eq!(total_pages(1, 9), 1);
        assert_eq!(total_pages(9, 9), 1);
        assert_eq!(total_pages(10, 9), 2);
        assert_eq!(total_pages(19, 9), 3);
    }

    #[test]
    fn test_client_mode_second_page() {
        let shape = ResponseShape::Unpaginated {
            records: ten_records(),
        };
        let state = QueryState {
            page: 2,
            sort: SortKey::Az,
            ..QueryState::default()
        };
        let page = resolve_page(&shape, &state);
        assert_eq!(page.mode, PageMode::Client);
        assert_eq!(page.total_count, 10);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].title.as_deref(), Some("Project 10"));
    }

    #[test]
    fn test_client_mode_out_of_range_page_is_empty() {
        let shape = ResponseShape::Unpaginated {
            records: ten_records(),
        };
        let state = QueryState {
            page: 7,
            ..QueryState::default()
        };
        let page = resolve_page(&shape, &state);
        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 10);
        assert_eq!(page.total_pages, 2);
    }

    #[test]
    fn test_client_mode_count_ignores_slicing() {
        // Count runs over the whole filtered collection, not the slice
        let mut records = ten_records();
        records.push(record(11, "Server thing", "django"));
        let shape = ResponseShape::Unpaginated { records };
        let state = QueryState {
            tab: Tab::Web,
            page: 2,
            ..QueryState::default()
        };
        let page = resolve_page(&shape, &state);
        assert_eq!(page.total_count, 10);
        assert_eq!(page.items.len(), 1);
    }

    #[test]
    fn test_server_mode_passes_page_through() {
        let shape = ResponseShape::Paginated {
            records: ten_records(),
            total_count: 57,
            has_next: true,
            has_previous: false,
        };
        let state = QueryState {
            page: 3,
            ..QueryState::default()
        };
        let page = resolve_page(&shape, &state);
        assert_eq!(page.mode, PageMode::Server);
        // No local slicing; the server already chose the page
        assert_eq!(page.items.len(), 10);
        assert_eq!(page.total_count, 57);
        assert_eq!(page.total_pages, 7);
    }

    #[test]
    fn test_server_mode_count_is_verbatim_under_filters() {
        // Local filters narrow the visible page but never the server total
        let shape = ResponseShape::Paginated {
            records: vec![record(1, "A", "react"), record(2, "B", "django")],
            total_count: 40,
            has_next: true,
            has_previous: true,
        };
        let state = QueryState {
            tab: Tab::Web,
            ..QueryState::default()
        };
        let page = resolve_page(&shape, &state);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total_count, 40);
        assert_eq!(page.total_pages, 5);
    }

    #[test]
    fn test_empty_shape_renders_one_empty_page() {
        let page = resolve_page(&ResponseShape::empty(), &QueryState::default());
        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 0);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_build_page_output_commands() {
        let shape = ResponseShape::Unpaginated {
            records: ten_records(),
        };
        let state = QueryState::default().merged(&QueryPatch {
            page: Some(1),
            ..Default::default()
        });
        let output = build_page_output(resolve_page(&shape, &state), &state, "http://localhost:8000");
        assert_eq!(
            output.pagination.next_page_command.as_deref(),
            Some("folio projects list --page 2")
        );
        assert!(output.pagination.prev_page_command.is_none());

        let state = QueryState {
            page: 2,
            ..QueryState::default()
        };
        let output = build_page_output(resolve_page(&shape, &state), &state, "http://localhost:8000");
        assert!(output.pagination.next_page_command.is_none());
        assert_eq!(
            output.pagination.prev_page_command.as_deref(),
            Some("folio projects list --page 1")
        );
    }

    #[test]
    fn test_state_command_spells_out_non_defaults() {
        let state = QueryState {
            tab: Tab::Web,
            search: "dash".to_string(),
            sort: SortKey::Az,
            page: 1,
            page_size: 12,
            featured_only: true,
        };
        assert_eq!(
            state_command(&state, 4),
            "folio projects list --tab web --search \"dash\" --sort az --size 12 --featured --page 4"
        );
    }

    #[test]
    fn test_build_page_output_card_fields() {
        let mut project = record(5, "Gallery", "react, Web, react");
        project.image = Some("/media/projects/gallery.png".to_string());
        project.created_at = Some("2024-06-01T10:00:00Z".to_string());
        let shape = ResponseShape::Unpaginated {
            records: vec![project],
        };
        let state = QueryState::default();
        let output = build_page_output(resolve_page(&shape, &state), &state, "http://localhost:8000");
        let card = &output.items[0];
        assert_eq!(card.tags, vec!["react", "Web"]);
        assert_eq!(
            card.image.as_deref(),
            Some("http://localhost:8000/media/projects/gallery.png")
        );
        assert_eq!(card.created.as_deref(), Some("2024-06-01"));
    }
}
