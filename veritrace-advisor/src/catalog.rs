//! Recommendation catalogue.
//!
//! The built-in table covers every rule the validators can fire plus the
//! policy-state advisories. Deployments that want different wording or
//! legal references load a TOML table over it; the process-wide instance
//! is installed once and read everywhere.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

use tracing::info;
use veritrace_core::{RiskLevel, Severity, VeritraceError, VeritraceResult, ViolationKind};

/// Catalogued guidance for one violation kind.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CatalogEntry {
    pub severity: Severity,
    pub risk_level: RiskLevel,
    pub title: String,
    pub recommendation: String,
    pub legal_reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_events_order: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_constraint: Option<String>,
}

impl CatalogEntry {
    fn new(
        severity: Severity,
        risk_level: RiskLevel,
        title: &str,
        recommendation: &str,
        legal_reference: &str,
    ) -> Self {
        Self {
            severity,
            risk_level,
            title: title.into(),
            recommendation: recommendation.into(),
            legal_reference: legal_reference.into(),
            suggested_events_order: None,
            time_constraint: None,
        }
    }

    fn with_order(mut self, order: &[&str]) -> Self {
        self.suggested_events_order = Some(order.iter().map(|s| s.to_string()).collect());
        self
    }

    fn with_time(mut self, constraint: &str) -> Self {
        self.time_constraint = Some(constraint.into());
        self
    }
}

/// The catalogue, keyed by violation label.
///
/// String keys so the TOML form reads naturally:
///
/// ```toml
/// [entries.consent_after_access]
/// severity = "high"
/// risk_level = "critical"
/// title = "..."
/// ```
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Catalog {
    pub entries: BTreeMap<String, CatalogEntry>,
}

static GLOBAL: OnceLock<Catalog> = OnceLock::new();

impl Catalog {
    pub fn get(&self, kind: ViolationKind) -> Option<&CatalogEntry> {
        self.entries.get(kind.label())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Deserialize a catalogue from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> VeritraceResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let catalog: Catalog =
            toml::from_str(&text).map_err(|e| VeritraceError::Catalog(e.to_string()))?;
        info!(path = %path.display(), entries = catalog.len(), "loaded recommendation catalogue");
        Ok(catalog)
    }

    /// Install a catalogue as the process-wide instance.
    ///
    /// Returns `false` when one is already installed (first write wins).
    pub fn install(catalog: Catalog) -> bool {
        GLOBAL.set(catalog).is_ok()
    }

    /// The process-wide catalogue; the built-in table when none was installed.
    pub fn global() -> &'static Catalog {
        GLOBAL.get_or_init(Catalog::builtin)
    }

    /// The built-in recommendation table.
    pub fn builtin() -> Self {
        use RiskLevel::{Critical, Procedural};
        use Severity::{High, Low, Medium};
        use ViolationKind as K;

        let mut entries = BTreeMap::new();
        let mut add = |kind: K, entry: CatalogEntry| {
            entries.insert(kind.label().to_string(), entry);
        };

        // ── Consent ─────────────────────────────────────────────────────
        add(
            K::MissingConsent,
            CatalogEntry::new(
                High,
                Critical,
                "Obtain consent before any processing",
                "No consent event was recorded. Explicit consent from the data \
                 subject must be obtained before any access to personal data.",
                "Art. 6 and Art. 7 GDPR",
            )
            .with_order(&["inform", "give-consent", "permission-granted", "send-data"]),
        );
        add(
            K::ConsentAfterAccess,
            CatalogEntry::new(
                High,
                Critical,
                "Request consent before processing",
                "Consent from the data subject must be obtained explicitly \
                 before any access to or processing of personal data.",
                "Art. 6 and Art. 7 GDPR",
            )
            .with_order(&["inform", "give-consent", "permission-granted", "send-data"]),
        );
        add(
            K::ImplicitConsent,
            CatalogEntry::new(
                Medium,
                Procedural,
                "Record explicit, unambiguous consent",
                "Consent must be given by a clear affirmative act. Pre-ticked \
                 boxes or inferred agreement are not valid consent.",
                "Art. 4.11 and Art. 7 GDPR",
            ),
        );

        // ── Withdrawal and expiry ───────────────────────────────────────
        add(
            K::AccessAfterWithdrawal,
            CatalogEntry::new(
                Medium,
                Critical,
                "Stop processing after consent withdrawal",
                "Once consent is withdrawn the controller must immediately \
                 cease any access to or processing of the personal data.",
                "Art. 7.3 GDPR",
            )
            .with_order(&["withdraw-consent", "no-data-access"]),
        );
        add(
            K::AccessAfterConsentExpiration,
            CatalogEntry::new(
                High,
                Critical,
                "Renew consent before further processing",
                "The consent period has lapsed. Processing must stop until \
                 the data subject grants consent again.",
                "Art. 6 and Art. 7 GDPR",
            ),
        );

        // ── Restriction, erasure, rights procedure ──────────────────────
        add(
            K::AccessDuringRestriction,
            CatalogEntry::new(
                High,
                Critical,
                "Respect the restriction of processing",
                "While a restriction of processing is active, no access or \
                 modification operations may be performed on the data.",
                "Art. 18 GDPR",
            )
            .with_order(&["restrict-processing", "lift-restriction"]),
        );
        add(
            K::AccessAfterErasure,
            CatalogEntry::new(
                Severity::Critical,
                Critical,
                "Honor the right to erasure",
                "Personal data was accessed after an erasure request. Erased \
                 data must not be processed again under any circumstance.",
                "Art. 17 GDPR",
            ),
        );
        add(
            K::EraseWithoutProcessing,
            CatalogEntry::new(
                Low,
                Procedural,
                "Keep the data lifecycle coherent",
                "Erasure was requested although no prior processing of the \
                 data is on record. Review the trace for missing events.",
                "Art. 5 GDPR",
            ),
        );
        add(
            K::AccessLogWithoutAccess,
            CatalogEntry::new(
                Low,
                Procedural,
                "Keep access logs consistent with activity",
                "An access-log entry refers to an activity that never \
                 happened. Reconcile the log with the actual event sequence.",
                "Art. 5.2 GDPR",
            ),
        );

        // ── Accountability and minimization ─────────────────────────────
        add(
            K::DataMinimizationViolation,
            CatalogEntry::new(
                Medium,
                Procedural,
                "Limit collection to what the purpose requires",
                "More data was accessed than the declared purpose requires. \
                 Reduce the scope of the access to the necessary minimum.",
                "Art. 5.1.c GDPR",
            ),
        );
        add(
            K::PurposeViolation,
            CatalogEntry::new(
                High,
                Critical,
                "Process data only for the authorized purpose",
                "Data was used for a purpose other than the one it was \
                 collected for. Obtain a new legal basis or stop the use.",
                "Art. 5.1.b GDPR",
            ),
        );
        add(
            K::AccessWithoutPermission,
            CatalogEntry::new(
                High,
                Critical,
                "Grant permission before each access",
                "Every access must be covered by an explicit permission \
                 grant immediately preceding it.",
                "Art. 6 GDPR",
            )
            .with_order(&["permission-granted", "send-data"]),
        );
        add(
            K::AccessWithoutConsent,
            CatalogEntry::new(
                High,
                Critical,
                "Do not process before consent is active",
                "Accesses were performed while no consent was active for the \
                 data subject. Suspend processing until consent is given.",
                "Art. 6 and Art. 7 GDPR",
            ),
        );
        add(
            K::MissingAccessLog,
            CatalogEntry::new(
                Medium,
                Procedural,
                "Log every access to personal data",
                "The accountability principle requires a log entry for each \
                 access, recorded at or after the access itself.",
                "Art. 5.2 GDPR",
            ),
        );

        // ── Breach notification ─────────────────────────────────────────
        add(
            K::MissingBreachNotification,
            CatalogEntry::new(
                High,
                Critical,
                "Notify personal data breaches",
                "Every breach affecting personal data must be notified to \
                 the competent supervisory authority.",
                "Art. 33 GDPR",
            ),
        );
        add(
            K::LateBreachNotification,
            CatalogEntry::new(
                Medium,
                Critical,
                "Notify breaches within the deadline",
                "Personal data breaches must be notified to the supervisory \
                 authority at most 72 hours after detection.",
                "Art. 33 GDPR",
            )
            .with_time("<= 72 hours"),
        );

        // ── Data subject rights deadlines ───────────────────────────────
        add(
            K::MissingRightResponse,
            CatalogEntry::new(
                Medium,
                Procedural,
                "Answer data subject requests",
                "Access and information requests from the data subject must \
                 be answered within 30 days.",
                "Art. 12 and Art. 15 GDPR",
            )
            .with_time("<= 30 days"),
        );
        add(
            K::LateRightResponse,
            CatalogEntry::new(
                Medium,
                Procedural,
                "Answer data subject requests within the deadline",
                "Requests from the data subject must be resolved within a \
                 maximum of 30 days.",
                "Art. 12 GDPR",
            )
            .with_time("<= 30 days"),
        );

        // ── Sticky-policy governance ────────────────────────────────────
        add(
            K::SpRetentionViolation,
            CatalogEntry::new(
                Severity::Critical,
                Critical,
                "Respect the committed retention period",
                "Data was accessed past the maximum retention time the \
                 policy commits to. Erase the data or renew the basis.",
                "Art. 5.1.e GDPR",
            ),
        );
        add(
            K::SpPurposeViolation,
            CatalogEntry::new(
                High,
                Critical,
                "Keep accesses within the policy's purposes",
                "An access declared a purpose the sticky policy never \
                 authorized. Align the processing with the recorded consent.",
                "Art. 5.1.b GDPR",
            ),
        );
        add(
            K::SpAccessAfterErasure,
            CatalogEntry::new(
                Severity::Critical,
                Critical,
                "Enforce erasure in the policy state",
                "The policy records the data as erased, yet later accesses \
                 exist. Propagate the erasure to every processing system.",
                "Art. 17 GDPR",
            ),
        );
        add(
            K::SpAccessDuringRestriction,
            CatalogEntry::new(
                High,
                Critical,
                "Enforce the recorded restriction",
                "The policy records an active restriction of processing that \
                 accesses in the trace do not respect.",
                "Art. 18 GDPR",
            ),
        );
        add(
            K::SpAccessAfterConsentExpiration,
            CatalogEntry::new(
                High,
                Critical,
                "Stop processing once consent lapses",
                "The policy records an expired consent, yet later accesses \
                 exist. Renew the consent or cease processing.",
                "Art. 6 and Art. 7 GDPR",
            ),
        );
        add(
            K::SpMissingAccessLog,
            CatalogEntry::new(
                Medium,
                Procedural,
                "Honor the log-access obligation",
                "The policy carries a log-access obligation that the trace \
                 does not satisfy for every access.",
                "Art. 5.2 GDPR",
            ),
        );
        add(
            K::SpThirdPartyWithoutConsent,
            CatalogEntry::new(
                Severity::Critical,
                Critical,
                "Share data only under valid consent",
                "A third party is actively processing the data although no \
                 valid consent is on record. Suspend the sharing.",
                "Art. 6 and Art. 7 GDPR",
            ),
        );
        add(
            K::SpThirdPartyAfterErasure,
            CatalogEntry::new(
                Severity::Critical,
                Critical,
                "Propagate erasure to recipients",
                "A third party remains active after the data was erased. \
                 Instruct every recipient to delete the data.",
                "Art. 17 and Art. 19 GDPR",
            ),
        );
        add(
            K::SpThirdPartyNotNotifiedOfErasure,
            CatalogEntry::new(
                High,
                Critical,
                "Notify recipients of erasure",
                "The controller must communicate any erasure to each \
                 recipient the data was disclosed to.",
                "Art. 19 GDPR",
            ),
        );
        add(
            K::SpThirdPartyMissingLegalBasis,
            CatalogEntry::new(
                Severity::Critical,
                Critical,
                "Document the recipient's legal basis",
                "An independent controller processes the data without a \
                 documented legal basis of its own.",
                "Art. 6 and Art. 26 GDPR",
            ),
        );
        add(
            K::SpProcessorWithOwnLegalBasis,
            CatalogEntry::new(
                High,
                Critical,
                "Keep processors within their mandate",
                "A processor declares its own legal basis, which is \
                 incompatible with processing on the controller's behalf.",
                "Art. 28 GDPR",
            ),
        );
        add(
            K::SpIllegalInternationalTransfer,
            CatalogEntry::new(
                Severity::Critical,
                Critical,
                "Safeguard international transfers",
                "Data was transferred outside the EU without an adequacy \
                 decision or appropriate safeguards such as SCCs.",
                "Art. 44-49 GDPR",
            ),
        );
        add(
            K::SpThirdPartyRetentionViolation,
            CatalogEntry::new(
                High,
                Critical,
                "Enforce recipient retention limits",
                "A third party holds the data beyond its authorized \
                 retention period. Request deletion or renew the terms.",
                "Art. 5.1.e GDPR",
            ),
        );
        add(
            K::SpThirdPartyPermissionEscalation,
            CatalogEntry::new(
                High,
                Critical,
                "Limit recipients to granted permissions",
                "A third party holds permissions the parent policy never \
                 granted. Revoke the excess permissions.",
                "Art. 5.1.f GDPR",
            ),
        );
        add(
            K::SpThirdPartyPurposeViolation,
            CatalogEntry::new(
                High,
                Critical,
                "Limit recipients to authorized purposes",
                "A third party uses the data for a purpose the policy never \
                 authorized. Align or terminate the sharing agreement.",
                "Art. 5.1.b GDPR",
            ),
        );

        // ── Policy-state advisories ─────────────────────────────────────
        add(
            K::SpErasureEnforcementPending,
            CatalogEntry::new(
                Medium,
                Procedural,
                "Complete the erasure across all systems",
                "The policy records an erasure request. Verify that every \
                 replica and recipient has deleted the data.",
                "Art. 17 GDPR",
            ),
        );
        add(
            K::SpRestrictionActive,
            CatalogEntry::new(
                Medium,
                Procedural,
                "A restriction of processing is in force",
                "Processing is currently restricted for this data subject. \
                 Only storage and legally mandated operations are allowed.",
                "Art. 18 GDPR",
            ),
        );
        add(
            K::SpConsentExpired,
            CatalogEntry::new(
                Medium,
                Procedural,
                "Consent has expired",
                "The recorded consent has lapsed. Obtain renewed consent \
                 before any further processing.",
                "Art. 7 GDPR",
            ),
        );

        Self { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_covers_every_validator_kind() {
        let catalog = Catalog::builtin();
        for kind in [
            ViolationKind::MissingConsent,
            ViolationKind::ConsentAfterAccess,
            ViolationKind::AccessAfterWithdrawal,
            ViolationKind::AccessDuringRestriction,
            ViolationKind::AccessAfterErasure,
            ViolationKind::MissingBreachNotification,
            ViolationKind::LateBreachNotification,
            ViolationKind::MissingRightResponse,
            ViolationKind::LateRightResponse,
            ViolationKind::SpIllegalInternationalTransfer,
            ViolationKind::SpErasureEnforcementPending,
        ] {
            assert!(catalog.get(kind).is_some(), "missing entry for {kind}");
        }
        assert!(catalog.len() >= 18);
    }

    #[test]
    fn test_original_severities_preserved() {
        let catalog = Catalog::builtin();
        let late_breach = catalog.get(ViolationKind::LateBreachNotification).unwrap();
        assert_eq!(late_breach.severity, Severity::Medium);
        assert_eq!(late_breach.risk_level, RiskLevel::Critical);
        assert_eq!(late_breach.time_constraint.as_deref(), Some("<= 72 hours"));

        let erase = catalog.get(ViolationKind::EraseWithoutProcessing).unwrap();
        assert_eq!(erase.severity, Severity::Low);
        assert_eq!(erase.risk_level, RiskLevel::Procedural);
    }

    #[test]
    fn test_toml_round_trip() {
        let catalog = Catalog::builtin();
        let text = toml::to_string(&catalog).unwrap();
        let back: Catalog = toml::from_str(&text).unwrap();
        assert_eq!(back, catalog);
    }

    #[test]
    fn test_global_defaults_to_builtin() {
        assert!(Catalog::global().get(ViolationKind::ConsentAfterAccess).is_some());
    }
}
