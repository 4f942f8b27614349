//! Withdrawal and consent-expiry rules (Art. 6 and 7.3 GDPR).
//!
//! Both rules are forward-only booleans flipped during a single scan;
//! nothing later in the trace resets them.

use veritrace_core::{EventKind, Severity, Trace, Violation, ViolationKind};

/// Every access after a `withdraw-consent` event is a violation.
pub fn validate_withdrawn_consent(trace: &Trace) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut consent_valid = true;

    for (idx, event) in trace.events.iter().enumerate() {
        if event.kind == EventKind::WithdrawConsent {
            consent_valid = false;
        } else if !consent_valid && event.is_access() {
            violations.push(Violation::new(
                ViolationKind::AccessAfterWithdrawal,
                Severity::High,
                "Personal data accessed after consent withdrawal",
                vec![idx],
            ));
        }
    }

    violations
}

/// Every access after a `consent-expired` event is a violation.
pub fn validate_access_after_consent_expiration(trace: &Trace) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut expired = false;

    for (idx, event) in trace.events.iter().enumerate() {
        if event.kind == EventKind::ConsentExpired {
            expired = true;
        } else if expired && event.is_access() {
            violations.push(Violation::new(
                ViolationKind::AccessAfterConsentExpiration,
                Severity::High,
                "Personal data accessed after consent expiration",
                vec![idx],
            ));
        }
    }

    violations
}
