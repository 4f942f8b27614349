//! Structured process event.
//!
//! Events are immutable after construction as far as the analysis is
//! concerned; only violation annotations and the remediation engine (on a
//! cloned trace) write to them.

use std::collections::BTreeMap;

use crate::types::{
    AccessMode, DataScope, EventKind, ThirdPartyRole, ViolationNote,
};

/// Terms attached to a `share-with-third-party` event.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SharingTerms {
    pub role: ThirdPartyRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retention_days: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transfer_mechanism: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_basis: Option<String>,
    #[serde(default)]
    pub own_legal_basis: bool,
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl SharingTerms {
    pub fn processor() -> Self {
        Self {
            role: ThirdPartyRole::Processor,
            retention_days: None,
            country: None,
            transfer_mechanism: None,
            legal_basis: None,
            own_legal_basis: false,
            permissions: Vec::new(),
        }
    }
}

/// One record in an ordered process trace.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Event {
    pub kind: EventKind,
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    /// Set when the event is a personal-data access.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<AccessMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<DataScope>,
    /// Only meaningful on consent events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explicit_consent: Option<bool>,
    /// Retention / expiry commitment in days (send-data, give-consent).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_time_days: Option<i64>,
    /// Deadline attached by the enrichment layer (erase-data).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<i64>,
    /// Activity label an access-log entry refers back to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_activity: Option<String>,
    /// Third-party name (share-with-third-party, revoke-third-party).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub third_party: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sharing: Option<SharingTerms>,
    /// Violation annotations attached after validation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<ViolationNote>,
    /// Unvalidated metadata only; nothing in the analysis reads this.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl Event {
    pub fn new(kind: EventKind, timestamp: i64) -> Self {
        Self {
            kind,
            timestamp,
            actor: None,
            purpose: None,
            access: None,
            scope: None,
            explicit_consent: None,
            max_time_days: None,
            deadline: None,
            related_activity: None,
            third_party: None,
            sharing: None,
            violations: Vec::new(),
            extra: BTreeMap::new(),
        }
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    pub fn with_purpose(mut self, purpose: impl Into<String>) -> Self {
        self.purpose = Some(purpose.into());
        self
    }

    pub fn with_access(mut self, mode: AccessMode) -> Self {
        self.access = Some(mode);
        self
    }

    pub fn with_scope(mut self, scope: DataScope) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn with_explicit_consent(mut self, explicit: bool) -> Self {
        self.explicit_consent = Some(explicit);
        self
    }

    pub fn with_max_time_days(mut self, days: i64) -> Self {
        self.max_time_days = Some(days);
        self
    }

    pub fn with_related_activity(mut self, activity: impl Into<String>) -> Self {
        self.related_activity = Some(activity.into());
        self
    }

    pub fn with_third_party(mut self, name: impl Into<String>, terms: SharingTerms) -> Self {
        self.third_party = Some(name.into());
        self.sharing = Some(terms);
        self
    }

    /// Third-party reference without sharing terms (revocations).
    pub fn with_third_party_name(mut self, name: impl Into<String>) -> Self {
        self.third_party = Some(name.into());
        self
    }

    /// Personal-data access, whatever the event kind.
    pub fn is_access(&self) -> bool {
        self.access.is_some()
    }
}
