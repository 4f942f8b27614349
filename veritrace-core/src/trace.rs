//! Ordered event trace with trace-level context.

use crate::event::Event;
use crate::policy::StickyPolicy;
use crate::types::{EventKind, RiskBand};

/// Trace-level defaults and identifiers set by the enrichment layer.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TraceContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_purpose: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_basis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_controller: Option<String>,
}

/// One ordered sequence of events for a single process execution.
///
/// Components treat the trace as chronologically sorted; anything that
/// mutates the event list must re-sort and rebuild the attached policy.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Trace {
    pub id: String,
    pub events: Vec<Event>,
    #[serde(default)]
    pub context: TraceContext,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliant: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_band: Option<RiskBand>,
    #[serde(default)]
    pub remediated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<StickyPolicy>,
}

impl Trace {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), ..Self::default() }
    }

    pub fn with_events(id: impl Into<String>, events: Vec<Event>) -> Self {
        Self { id: id.into(), events, ..Self::default() }
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Stable sort by timestamp; equal timestamps keep their order.
    pub fn sort_by_time(&mut self) {
        self.events.sort_by_key(|e| e.timestamp);
    }

    /// Index of the first out-of-order event, if any.
    pub fn first_unordered_index(&self) -> Option<usize> {
        self.events
            .windows(2)
            .position(|w| w[1].timestamp < w[0].timestamp)
            .map(|i| i + 1)
    }

    pub fn is_chronological(&self) -> bool {
        self.first_unordered_index().is_none()
    }

    pub fn events_of_kind(&self, kind: EventKind) -> impl Iterator<Item = (usize, &Event)> {
        self.events.iter().enumerate().filter(move |(_, e)| e.kind == kind)
    }

    pub fn first_event_of(&self, kind: EventKind) -> Option<(usize, &Event)> {
        self.events_of_kind(kind).next()
    }

    /// All personal-data accesses, with their indices.
    pub fn access_events(&self) -> impl Iterator<Item = (usize, &Event)> {
        self.events.iter().enumerate().filter(|(_, e)| e.is_access())
    }

    pub fn first_timestamp(&self) -> Option<i64> {
        self.events.iter().map(|e| e.timestamp).min()
    }
}
