//! Shareable query state and its string-parameter codec
//!
//! The flat parameter map is the single source of truth for the view: every
//! user-visible knob serializes to a string under a stable key, so a view can
//! be reproduced from a bookmarked URL or a pasted command line. The codec
//! normalizes rather than rejects; malformed input decodes to defaults.

use std::collections::BTreeMap;

/// Page sizes the view offers
pub const PAGE_SIZES: [u32; 4] = [6, 9, 12, 18];
pub const DEFAULT_PAGE_SIZE: u32 = 9;

/// Coarse category filter over project tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    All,
    Web,
    Back,
}

impl Tab {
    pub fn as_str(self) -> &'static str {
        match self {
            Tab::All => "all",
            Tab::Web => "web",
            Tab::Back => "back",
        }
    }

    /// Lenient parse; anything unknown is the default tab
    pub fn parse(raw: &str) -> Tab {
        match raw {
            "web" => Tab::Web,
            "back" => Tab::Back,
            _ => Tab::All,
        }
    }
}

/// Sort order for the rendered page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Newest first (creation time descending)
    #[default]
    New,
    /// Oldest first
    Old,
    /// Title ascending
    Az,
    /// Title descending
    Za,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::New => "new",
            SortKey::Old => "old",
            SortKey::Az => "az",
            SortKey::Za => "za",
        }
    }

    pub fn parse(raw: &str) -> SortKey {
        match raw {
            "old" => SortKey::Old,
            "az" => SortKey::Az,
            "za" => SortKey::Za,
            _ => SortKey::New,
        }
    }
}

/// Typed representation of all user-controllable view parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    pub tab: Tab,
    pub search: String,
    pub sort: SortKey,
    /// 1-indexed
    pub page: u32,
    pub page_size: u32,
    pub featured_only: bool,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            tab: Tab::All,
            search: String::new(),
            sort: SortKey::New,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            featured_only: false,
        }
    }
}

/// Partial change to a [`QueryState`]; unset fields keep their current value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryPatch {
    pub tab: Option<Tab>,
    pub search: Option<String>,
    pub sort: Option<SortKey>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub featured_only: Option<bool>,
}

impl From<QueryState> for QueryPatch {
    /// A patch that replaces every field, for one-shot state installs
    fn from(state: QueryState) -> Self {
        Self {
            tab: Some(state.tab),
            search: Some(state.search),
            sort: Some(state.sort),
            page: Some(state.page),
            page_size: Some(state.page_size),
            featured_only: Some(state.featured_only),
        }
    }
}

impl QueryState {
    /// Merge a partial change into this state
    pub fn merged(&self, patch: &QueryPatch) -> QueryState {
        QueryState {
            tab: patch.tab.unwrap_or(self.tab),
            search: patch.search.clone().unwrap_or_else(|| self.search.clone()),
            sort: patch.sort.unwrap_or(self.sort),
            page: patch.page.unwrap_or(self.page),
            page_size: patch.page_size.unwrap_or(self.page_size),
            featured_only: patch.featured_only.unwrap_or(self.featured_only),
        }
    }
}

/// Decode a flat parameter map into a typed state.
///
/// Never fails: missing keys take defaults, a non-numeric or zero `page`
/// becomes 1, a `size` outside [`PAGE_SIZES`] falls back to 9, and only the
/// literal "1" switches `featured` on.
pub fn decode(params: &BTreeMap<String, String>) -> QueryState {
    QueryState {
        tab: params.get("tab").map(|v| Tab::parse(v)).unwrap_or_default(),
        search: params.get("q").cloned().unwrap_or_default(),
        sort: params
            .get("sort")
            .map(|v| SortKey::parse(v))
            .unwrap_or_default(),
        page: params
            .get("page")
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|page| *page >= 1)
            .unwrap_or(1),
        page_size: params
            .get("size")
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|size| PAGE_SIZES.contains(size))
            .unwrap_or(DEFAULT_PAGE_SIZE),
        featured_only: params.get("featured").map(|v| v == "1").unwrap_or(false),
    }
}

/// Merge a patch into the state and serialize every field back to strings.
///
/// All six keys are always present in the output so the encoded view is
/// complete on its own.
pub fn encode(state: &QueryState, patch: &QueryPatch) -> BTreeMap<String, String> {
    let next = state.merged(patch);
    BTreeMap::from([
        ("tab".to_string(), next.tab.as_str().to_string()),
        ("q".to_string(), next.search.clone()),
        ("sort".to_string(), next.sort.as_str().to_string()),
        ("page".to_string(), next.page.to_string()),
        ("size".to_string(), next.page_size.to_string()),
        (
            "featured".to_string(),
            if next.featured_only { "1" } else { "0" }.to_string(),
        ),
    ])
}
