//! Classification of raw catalog payloads and fetch-ordering bookkeeping
//!
//! The upstream API serves one of two shapes depending on how it is
//! configured: a bare JSON array of records, or a paginated envelope with
//! `results`/`count`/`next`/`previous` fields. [`ResponseShape`] makes that
//! ambiguity an explicit tagged union so consumers match exhaustively instead
//! of shape-sniffing.

use serde::Deserialize;
use serde_json::Value;

use crate::project::Project;

/// Paginated envelope as served by the upstream API
#[derive(Debug, Deserialize)]
struct Envelope {
    results: Vec<Project>,
    #[serde(default)]
    count: Option<Value>,
    #[serde(default)]
    next: Option<String>,
    #[serde(default)]
    previous: Option<String>,
}

/// The two normalized payload shapes
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseShape {
    /// The full matching collection as a bare sequence; pagination is ours
    Unpaginated { records: Vec<Project> },
    /// One server-delivered page plus count/cursor metadata
    Paginated {
        records: Vec<Project>,
        total_count: u64,
        has_next: bool,
        has_previous: bool,
    },
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ClassifyError {
    #[error("payload is neither a record array nor a results envelope")]
    UnrecognizedShape,

    #[error("undecodable project records: {0}")]
    InvalidRecords(String),
}

impl ResponseShape {
    /// Structurally classify a raw payload.
    ///
    /// An array is Unpaginated; an object carrying a `results` field is
    /// Paginated. A missing or non-numeric `count` falls back to the length
    /// of the delivered page. Anything else is unrecognized.
    pub fn classify(payload: Value) -> Result<ResponseShape, ClassifyError> {
        if payload.is_array() {
            let records: Vec<Project> = serde_json::from_value(payload)
                .map_err(|e| ClassifyError::InvalidRecords(e.to_string()))?;
            return Ok(ResponseShape::Unpaginated { records });
        }

        if payload.is_object() && payload.get("results").is_some() {
            let envelope: Envelope = serde_json::from_value(payload)
                .map_err(|e| ClassifyError::InvalidRecords(e.to_string()))?;
            let total_count = envelope
                .count
                .as_ref()
                .and_then(Value::as_u64)
                .unwrap_or(envelope.results.len() as u64);
            return Ok(ResponseShape::Paginated {
                total_count,
                has_next: envelope.next.is_some(),
                has_previous: envelope.previous.is_some(),
                records: envelope.results,
            });
        }

        Err(ClassifyError::UnrecognizedShape)
    }

    /// The records this shape delivered, whichever side paginated them
    pub fn records(&self) -> &[Project] {
        match self {
            ResponseShape::Unpaginated { records } => records,
            ResponseShape::Paginated { records, .. } => records,
        }
    }

    pub fn is_paginated(&self) -> bool {
        matches!(self, ResponseShape::Paginated { .. })
    }

    /// An empty Unpaginated shape, the renderable stand-in for malformed
    /// payloads
    pub fn empty() -> ResponseShape {
        ResponseShape::Unpaginated {
            records: Vec::new(),
        }
    }
}

/// Ticket for one issued fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

impl Generation {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Monotonic counter enforcing at-most-one-effective-result ordering.
///
/// Beginning a new fetch invalidates every ticket issued before it; a fetch
/// that resolves with a stale ticket must be discarded. Keeping this a plain
/// value type makes the invalidation rule testable without any networking.
#[derive(Debug, Default)]
pub struct RequestLedger {
    issued: u64,
}

impl RequestLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next generation, superseding all earlier ones
    pub fn begin(&mut self) -> Generation {
        self.issued += 1;
        Generation(self.issued)
    }

    /// Whether a ticket still corresponds to the latest issued fetch
    pub fn is_current(&self, generation: Generation) -> bool {
        generation.0 == self.issued
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_empty_array_is_unpaginated() {
        let shape = ResponseShape::classify(json!([])).unwrap();
        assert_eq!(
            shape,
            ResponseShape::Unpaginated {
                records: Vec::new()
            }
        );
        assert!(!shape.is_paginated());
    }

    #[test]
    fn test_classify_array_of_records() {
        let shape = ResponseShape::classify(json!([
            {"id": 1, "title": "Alpha"},
            {"id": 2, "title": "Beta"},
        ]))
        .unwrap();
        assert_eq!(shape.records().len(), 2);
        assert!(!shape.is_paginated());
    }

    #[test]
    fn test_classify_empty_envelope() {
        let shape = ResponseShape::classify(json!({
            "results": [],
            "count": 0,
            "next": null,
            "previous": null,
        }))
        .unwrap();
        assert_eq!(
            shape,
            ResponseShape::Paginated {
                records: Vec::new(),
                total_count: 0,
                has_next: false,
                has_previous: false,
            }
        );
    }

    #[test]
    fn test_classify_envelope_with_cursors() {
        let shape = ResponseShape::classify(json!({
            "results": [{"id": 9}],
            "count": 42,
            "next": "http://localhost:8000/api/projects/?page=3",
            "previous": "http://localhost:8000/api/projects/?page=1",
        }))
        .unwrap();
        match shape {
            ResponseShape::Paginated {
                total_count,
                has_next,
                has_previous,
                ref records,
            } => {
                assert_eq!(total_count, 42);
                assert!(has_next);
                assert!(has_previous);
                assert_eq!(records.len(), 1);
            }
            ResponseShape::Unpaginated { .. } => panic!("expected paginated shape"),
        }
    }

    #[test]
    fn test_classify_envelope_count_fallback() {
        // Missing count falls back to the delivered page length
        let shape = ResponseShape::classify(json!({"results": [{"id": 1}, {"id": 2}]})).unwrap();
        match shape {
            ResponseShape::Paginated { total_count, .. } => assert_eq!(total_count, 2),
            ResponseShape::Unpaginated { .. } => panic!("expected paginated shape"),
        }

        // Non-numeric count too
        let shape = ResponseShape::classify(json!({"results": [{"id": 1}], "count": "many"}))
            .unwrap();
        match shape {
            ResponseShape::Paginated { total_count, .. } => assert_eq!(total_count, 1),
            ResponseShape::Unpaginated { .. } => panic!("expected paginated shape"),
        }
    }

    #[test]
    fn test_classify_rejects_other_objects() {
        assert_eq!(
            ResponseShape::classify(json!({"pong": true})),
            Err(ClassifyError::UnrecognizedShape)
        );
        assert_eq!(
            ResponseShape::classify(json!("nonsense")),
            Err(ClassifyError::UnrecognizedShape)
        );
        assert_eq!(
            ResponseShape::classify(json!(null)),
            Err(ClassifyError::UnrecognizedShape)
        );
    }

    #[test]
    fn test_classify_rejects_undecodable_records() {
        let result = ResponseShape::classify(json!([{"title": "no id"}]));
        assert!(matches!(result, Err(ClassifyError::InvalidRecords(_))));
    }

    #[test]
    fn test_ledger_latest_wins() {
        let mut ledger = RequestLedger::new();
        let first = ledger.begin();
        assert!(ledger.is_current(first));

        let second = ledger.begin();
        assert!(!ledger.is_current(first));
        assert!(ledger.is_current(second));
    }

    #[test]
    fn test_ledger_out_of_order_resolution() {
        let mut ledger = RequestLedger::new();
        let slow = ledger.begin();
        let fast = ledger.begin();

        // The fast (newer) fetch resolves first and applies
        assert!(ledger.is_current(fast));
        // The slow one resolves later and must be discarded
        assert!(!ledger.is_current(slow));
    }

    #[test]
    fn test_generations_are_monotonic() {
        let mut ledger = RequestLedger::new();
        let a = ledger.begin();
        let b = ledger.begin();
        assert!(b.value() > a.value());
    }
}
