//! Stateful view binding over the pure engine
//!
//! [`BrowseSession`] owns the flat parameter map as the single source of
//! truth and re-derives the typed state from it on every access. Each state
//! change triggers exactly one fetch; a fetch that resolves after a newer
//! one was issued is discarded, so out-of-order network completions can
//! never clobber fresher results.

use std::collections::BTreeMap;

use folio_core::pagination::{build_page_output, resolve_page, PageOutput};
use folio_core::query::{self, QueryPatch, QueryState};
use folio_core::source::{RequestLedger, ResponseShape};

use super::{fetch_projects, CatalogConfig};

/// Fetch-cycle state machine: Idle → Loading → Ready | Failed, back to the
/// start on the next triggering change. There is no stale-while-revalidate
/// state; the freshest resolved page is the only one ever shown.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchPhase {
    Idle,
    Loading,
    Ready(PageOutput),
    Failed(String),
}

pub struct BrowseSession {
    client: reqwest::Client,
    config: CatalogConfig,
    params: BTreeMap<String, String>,
    ledger: RequestLedger,
    phase: FetchPhase,
}

impl BrowseSession {
    pub fn new(config: CatalogConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            params: query::encode(&QueryState::default(), &QueryPatch::default()),
            ledger: RequestLedger::new(),
            phase: FetchPhase::Idle,
        }
    }

    /// The typed state, always derived from the shared parameters
    pub fn state(&self) -> QueryState {
        query::decode(&self.params)
    }

    pub fn phase(&self) -> &FetchPhase {
        &self.phase
    }

    /// Current rendered slice plus totals, if the latest fetch resolved
    pub fn visible_page(&self) -> Option<&PageOutput> {
        match &self.phase {
            FetchPhase::Ready(page) => Some(page),
            _ => None,
        }
    }

    /// Merge a partial change into the shared parameters and refresh
    pub async fn on_state_change(&mut self, patch: QueryPatch) {
        self.params = query::encode(&self.state(), &patch);
        self.refresh().await;
    }

    /// Issue one fetch for the current state and apply its result, unless a
    /// newer fetch superseded it while it was in flight.
    async fn refresh(&mut self) {
        let generation = self.ledger.begin();
        self.phase = FetchPhase::Loading;
        let state = self.state();

        let fetched = fetch_projects(&self.client, &self.config, &state).await;

        if !self.ledger.is_current(generation) {
            log::debug!(
                "discarding superseded fetch result (generation {})",
                generation.value()
            );
            return;
        }

        self.phase = match fetched {
            Ok(payload) => {
                let shape = match ResponseShape::classify(payload) {
                    Ok(shape) => shape,
                    Err(err) => {
                        log::warn!("treating malformed catalog payload as empty: {err}");
                        ResponseShape::empty()
                    }
                };
                let page = resolve_page(&shape, &state);
                FetchPhase::Ready(build_page_output(page, &state, &self.config.base_url))
            }
            Err(err) => FetchPhase::Failed(err.to_string()),
        };
    }

    /// URL query string reproducing the current view, for sharing
    pub fn share_query(&self) -> String {
        self.params
            .iter()
            .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}
