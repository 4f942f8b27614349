//! Sticky policy — reconstructed normative state for one data subject.
//!
//! Read-mostly evidence object. It is rebuilt from scratch (never patched
//! incrementally) whenever the owning trace is structurally mutated; the
//! reconstruction itself lives in `veritrace-policy`.

use std::collections::{BTreeMap, BTreeSet};

use crate::types::ThirdPartyRole;

/// One entry in the append-only access history.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AccessRecord {
    pub timestamp: i64,
    pub access: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
    pub activity: String,
}

/// Sub-policy for one third party the data was shared with.
///
/// `data_id` is a non-owning back-reference to the parent policy.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ThirdPartyPolicy {
    pub data_id: String,
    pub role: ThirdPartyRole,
    pub purposes: BTreeSet<String>,
    pub permissions: BTreeSet<String>,
    pub active: bool,
    pub shared_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retention_until: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transfer_mechanism: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_basis: Option<String>,
    #[serde(default)]
    pub own_legal_basis: bool,
    #[serde(default)]
    pub notified_of_erasure: bool,
}

/// Normative state of one personal datum, derived from its trace.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StickyPolicy {
    pub data_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller: Option<String>,

    pub purposes: BTreeSet<String>,
    pub permissions: BTreeSet<String>,

    pub consent_given: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consent_timestamp: Option<i64>,
    pub consent_expired: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consent_expiration_timestamp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retention_time: Option<i64>,

    pub obligations: BTreeSet<String>,

    pub processing_restricted: bool,
    pub erased: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub erasure_timestamp: Option<i64>,

    pub access_history: Vec<AccessRecord>,
    pub third_parties: BTreeMap<String, ThirdPartyPolicy>,
}

/// Obligation key set on consent: every access must be logged.
pub const OBLIGATION_LOG_ACCESS: &str = "log_access";

impl StickyPolicy {
    pub fn new(data_id: impl Into<String>) -> Self {
        Self { data_id: data_id.into(), ..Self::default() }
    }

    pub fn requires_access_logging(&self) -> bool {
        self.obligations.contains(OBLIGATION_LOG_ACCESS)
    }
}
