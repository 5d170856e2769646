//! Core library for folio
//!
//! This crate implements the **Functional Core** of the folio application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! - **`folio_core`** (this crate): pure transformation functions with zero I/O
//! - **`folio`**: HTTP fetches, terminal rendering and orchestration (the
//!   Imperative Shell)
//!
//! Everything here is deterministic: the same records and the same query
//! always produce the same page. That keeps the tricky parts of the catalog
//! engine testable with plain fixture data and no mocking:
//!
//! - [`query`]: the shareable-parameter codec. Every user-visible knob (tab,
//!   search text, sort, page, page size, featured flag) round-trips through a
//!   flat string map so a view can be reconstructed from a bookmarked URL.
//! - [`source`]: structural classification of the two payload shapes the
//!   upstream API may serve (a bare record array, or a paginated
//!   `results`/`count`/`next`/`previous` envelope), plus the request
//!   generation ledger that discards out-of-order fetch results.
//! - [`pipeline`]: tab, featured and search filters followed by a stable
//!   sort, applied client-side regardless of what the server already did.
//! - [`pagination`]: count reconciliation across both payload shapes,
//!   client-side page slicing, and the final display transform.
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use folio_core::pagination::resolve_page;
//! use folio_core::query::decode;
//! use folio_core::source::ResponseShape;
//!
//! let state = decode(&params); // params: BTreeMap<String, String> from the URL
//! let shape = ResponseShape::classify(payload)?;
//! let page = resolve_page(&shape, &state);
//! assert!(page.total_pages >= 1);
//! ```

pub mod pagination;
pub mod pipeline;
pub mod project;
pub mod query;
pub mod source;
