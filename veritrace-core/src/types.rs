//! Shared enums and analysis result types.
//!
//! The violation taxonomy is deliberately exhaustive: every rule the
//! validators can fire is a variant here, so downstream dispatch
//! (recommendation lookup, remediation) is compile-checked instead of
//! routed through free strings.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

/// Risk level attached to a catalogued recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Procedural,
    Critical,
    Unknown,
}

/// Classification band for a [0,100] trace risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskBand {
    None,
    Low,
    Medium,
    High,
}

impl RiskBand {
    pub fn label(self) -> &'static str {
        match self {
            RiskBand::None => "none",
            RiskBand::Low => "low",
            RiskBand::Medium => "medium",
            RiskBand::High => "high",
        }
    }
}

/// How a personal-data access touches the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessMode {
    Read,
    Write,
}

impl AccessMode {
    pub fn label(self) -> &'static str {
        match self {
            AccessMode::Read => "read",
            AccessMode::Write => "write",
        }
    }
}

/// Declared breadth of an access relative to what the purpose needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataScope {
    Minimal,
    Normal,
    Excessive,
}

/// Legal role of a third party receiving shared data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThirdPartyRole {
    Processor,
    IndependentController,
}

/// Closed event vocabulary produced by the enrichment layer.
///
/// The sticky-policy builder and the validators only react to the kinds
/// they know about; the rest of the vocabulary (inform, search-location,
/// rectify-data, ...) flows through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    SendData,
    Inform,
    GiveConsent,
    ConsentExpired,
    WithdrawConsent,
    RestrictProcessing,
    LiftRestriction,
    RemoveRequest,
    SearchLocation,
    EraseData,
    RectifyData,
    RequestInfo,
    ProvideInfo,
    BreachDetected,
    NotifyBreach,
    PermissionGranted,
    AccessLog,
    UpdateAccessHistory,
    ShareWithThirdParty,
    RevokeThirdParty,
}

impl EventKind {
    pub fn label(self) -> &'static str {
        match self {
            EventKind::SendData => "send-data",
            EventKind::Inform => "inform",
            EventKind::GiveConsent => "give-consent",
            EventKind::ConsentExpired => "consent-expired",
            EventKind::WithdrawConsent => "withdraw-consent",
            EventKind::RestrictProcessing => "restrict-processing",
            EventKind::LiftRestriction => "lift-restriction",
            EventKind::RemoveRequest => "remove-request",
            EventKind::SearchLocation => "search-location",
            EventKind::EraseData => "erase-data",
            EventKind::RectifyData => "rectify-data",
            EventKind::RequestInfo => "request-info",
            EventKind::ProvideInfo => "provide-info",
            EventKind::BreachDetected => "breach-detected",
            EventKind::NotifyBreach => "notify-breach",
            EventKind::PermissionGranted => "permission-granted",
            EventKind::AccessLog => "access-log",
            EventKind::UpdateAccessHistory => "update-access-history",
            EventKind::ShareWithThirdParty => "share-with-third-party",
            EventKind::RevokeThirdParty => "revoke-third-party",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── Violation taxonomy ──────────────────────────────────────────────────────

/// Every rule the analysis can break.
///
/// `Sp*` variants are governance-level findings raised against the
/// reconstructed sticky policy; they are counted separately from the
/// technical kinds in aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    // Consent timing and quality
    MissingConsent,
    ConsentAfterAccess,
    ImplicitConsent,
    // Withdrawal / expiry
    AccessAfterWithdrawal,
    AccessAfterConsentExpiration,
    // Restriction / erasure / rights procedure
    AccessDuringRestriction,
    AccessAfterErasure,
    EraseWithoutProcessing,
    AccessLogWithoutAccess,
    // Accountability / minimization
    DataMinimizationViolation,
    PurposeViolation,
    AccessWithoutPermission,
    AccessWithoutConsent,
    MissingAccessLog,
    // Breach notification
    MissingBreachNotification,
    LateBreachNotification,
    // ARCO rights
    MissingRightResponse,
    LateRightResponse,
    // Sticky policy — internal consistency
    SpMissingConsentTimestamp,
    SpConsentExpiredWithoutConsent,
    SpInvalidStateAfterErasure,
    // Sticky policy — retention, purpose, access, obligations
    SpRetentionViolation,
    SpPurposeViolation,
    SpAccessAfterErasure,
    SpAccessDuringRestriction,
    SpAccessAfterConsentExpiration,
    SpMissingAccessLog,
    // Sticky policy — third parties
    SpThirdPartyWithoutConsent,
    SpThirdPartyAfterErasure,
    SpThirdPartyNotNotifiedOfErasure,
    SpThirdPartyMissingLegalBasis,
    SpProcessorWithOwnLegalBasis,
    SpIllegalInternationalTransfer,
    SpThirdPartyRetentionViolation,
    SpThirdPartyPermissionEscalation,
    SpThirdPartyPurposeViolation,
    // Sticky policy — pending-state advisories
    SpErasureEnforcementPending,
    SpRestrictionActive,
    SpConsentExpired,
}

impl ViolationKind {
    pub fn label(self) -> &'static str {
        match self {
            ViolationKind::MissingConsent => "missing_consent",
            ViolationKind::ConsentAfterAccess => "consent_after_access",
            ViolationKind::ImplicitConsent => "implicit_consent",
            ViolationKind::AccessAfterWithdrawal => "access_after_withdrawal",
            ViolationKind::AccessAfterConsentExpiration => "access_after_consent_expiration",
            ViolationKind::AccessDuringRestriction => "access_during_restriction",
            ViolationKind::AccessAfterErasure => "access_after_erasure",
            ViolationKind::EraseWithoutProcessing => "erase_without_processing",
            ViolationKind::AccessLogWithoutAccess => "access_log_without_access",
            ViolationKind::DataMinimizationViolation => "data_minimization_violation",
            ViolationKind::PurposeViolation => "purpose_violation",
            ViolationKind::AccessWithoutPermission => "access_without_permission",
            ViolationKind::AccessWithoutConsent => "access_without_consent",
            ViolationKind::MissingAccessLog => "missing_access_log",
            ViolationKind::MissingBreachNotification => "missing_breach_notification",
            ViolationKind::LateBreachNotification => "late_breach_notification",
            ViolationKind::MissingRightResponse => "missing_right_response",
            ViolationKind::LateRightResponse => "late_right_response",
            ViolationKind::SpMissingConsentTimestamp => "sp_missing_consent_timestamp",
            ViolationKind::SpConsentExpiredWithoutConsent => "sp_consent_expired_without_consent",
            ViolationKind::SpInvalidStateAfterErasure => "sp_invalid_state_after_erasure",
            ViolationKind::SpRetentionViolation => "sp_retention_violation",
            ViolationKind::SpPurposeViolation => "sp_purpose_violation",
            ViolationKind::SpAccessAfterErasure => "sp_access_after_erasure",
            ViolationKind::SpAccessDuringRestriction => "sp_access_during_restriction",
            ViolationKind::SpAccessAfterConsentExpiration => "sp_access_after_consent_expiration",
            ViolationKind::SpMissingAccessLog => "sp_missing_access_log",
            ViolationKind::SpThirdPartyWithoutConsent => "sp_third_party_without_consent",
            ViolationKind::SpThirdPartyAfterErasure => "sp_third_party_after_erasure",
            ViolationKind::SpThirdPartyNotNotifiedOfErasure => {
                "sp_third_party_not_notified_of_erasure"
            }
            ViolationKind::SpThirdPartyMissingLegalBasis => "sp_third_party_missing_legal_basis",
            ViolationKind::SpProcessorWithOwnLegalBasis => "sp_processor_with_own_legal_basis",
            ViolationKind::SpIllegalInternationalTransfer => "sp_illegal_international_transfer",
            ViolationKind::SpThirdPartyRetentionViolation => "sp_third_party_retention_violation",
            ViolationKind::SpThirdPartyPermissionEscalation => {
                "sp_third_party_permission_escalation"
            }
            ViolationKind::SpThirdPartyPurposeViolation => "sp_third_party_purpose_violation",
            ViolationKind::SpErasureEnforcementPending => "sp_erasure_enforcement_pending",
            ViolationKind::SpRestrictionActive => "sp_restriction_active",
            ViolationKind::SpConsentExpired => "sp_consent_expired",
        }
    }

    /// Governance-level finding raised against the sticky policy.
    pub fn is_policy_alert(self) -> bool {
        self.label().starts_with("sp_")
    }

    /// The technical kind a governance finding subsumes, when one exists.
    ///
    /// Used to suppress the technical duplicate in downstream aggregation.
    pub fn technical_twin(self) -> Option<ViolationKind> {
        match self {
            ViolationKind::SpPurposeViolation => Some(ViolationKind::PurposeViolation),
            ViolationKind::SpAccessAfterErasure => Some(ViolationKind::AccessAfterErasure),
            ViolationKind::SpAccessDuringRestriction => {
                Some(ViolationKind::AccessDuringRestriction)
            }
            ViolationKind::SpAccessAfterConsentExpiration => {
                Some(ViolationKind::AccessAfterConsentExpiration)
            }
            ViolationKind::SpMissingAccessLog => Some(ViolationKind::MissingAccessLog),
            _ => None,
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── Analysis results ────────────────────────────────────────────────────────

/// A detected breach of one encoded rule.
///
/// `events` are indices into the owning trace's event vector, valid until
/// the trace is structurally mutated.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Violation {
    pub kind: ViolationKind,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub blocking: bool,
    pub message: String,
    pub events: Vec<usize>,
}

impl Violation {
    pub fn new(
        kind: ViolationKind,
        severity: Severity,
        message: impl Into<String>,
        events: Vec<usize>,
    ) -> Self {
        Self { kind, severity, blocking: false, message: message.into(), events }
    }

    pub fn blocking(mut self) -> Self {
        self.blocking = true;
        self
    }
}

/// Compact violation annotation attached to an offending event.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ViolationNote {
    pub kind: ViolationKind,
    pub severity: Severity,
    pub message: String,
}

/// Catalogued remediation guidance for one violation.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Recommendation {
    pub violation: ViolationKind,
    /// `None` when the catalogue has no entry for the kind.
    pub severity: Option<Severity>,
    pub risk_level: RiskLevel,
    pub title: String,
    pub recommendation: String,
    pub legal_reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_events_order: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_constraint: Option<String>,
}
