//! Sticky-policy governance cross-checks.
//!
//! The policy is treated as normative evidence: it is never modified here,
//! only checked against itself and against the trace it was derived from.
//! Everything this module emits carries an `sp_*` kind and is counted
//! separately from the technical rules in aggregation.

use veritrace_core::{
    EventKind, Severity, StickyPolicy, ThirdPartyRole, Trace, Violation, ViolationKind,
};

/// Run every sticky-policy check for one trace/policy pair.
pub fn validate_sticky_policy(trace: &Trace, sp: &StickyPolicy) -> Vec<Violation> {
    let mut violations = Vec::new();
    violations.extend(validate_internal_consistency(sp));
    violations.extend(validate_retention(sp));
    violations.extend(validate_purpose_limitation(trace, sp));
    violations.extend(validate_access_constraints(trace, sp));
    violations.extend(validate_obligations(trace, sp));
    violations.extend(validate_third_parties(sp));
    violations
}

/// Art. 5.1.a / 5.2 — the policy must not contradict itself.
pub fn validate_internal_consistency(sp: &StickyPolicy) -> Vec<Violation> {
    let mut violations = Vec::new();

    if sp.consent_given && sp.consent_timestamp.is_none() {
        violations.push(Violation::new(
            ViolationKind::SpMissingConsentTimestamp,
            Severity::High,
            "Consent marked as given without a timestamp",
            vec![],
        ));
    }

    if sp.consent_expired && !sp.consent_given {
        violations.push(Violation::new(
            ViolationKind::SpConsentExpiredWithoutConsent,
            Severity::Medium,
            "Consent expired without ever being given",
            vec![],
        ));
    }

    if sp.erased && sp.processing_restricted {
        violations.push(Violation::new(
            ViolationKind::SpInvalidStateAfterErasure,
            Severity::Medium,
            "Processing restriction still active after erasure",
            vec![],
        ));
    }

    violations
}

/// Art. 5.1.e — no recorded access past the maximum retention time.
pub fn validate_retention(sp: &StickyPolicy) -> Vec<Violation> {
    let Some(max_retention) = sp.max_retention_time else {
        return Vec::new();
    };

    if sp.access_history.iter().any(|entry| entry.timestamp > max_retention) {
        return vec![Violation::new(
            ViolationKind::SpRetentionViolation,
            Severity::Critical,
            "Data accessed past the maximum retention period",
            vec![],
        )];
    }

    Vec::new()
}

/// Art. 5.1.b — every access purpose must appear in the policy's purposes.
pub fn validate_purpose_limitation(trace: &Trace, sp: &StickyPolicy) -> Vec<Violation> {
    trace
        .access_events()
        .filter(|(_, e)| {
            !e.purpose.as_deref().is_some_and(|p| sp.purposes.contains(p))
        })
        .map(|(idx, _)| {
            Violation::new(
                ViolationKind::SpPurposeViolation,
                Severity::High,
                "Access with a purpose the sticky policy does not authorize",
                vec![idx],
            )
        })
        .collect()
}

/// Art. 6 / 17 / 18 — accesses checked against the policy's lifecycle state.
pub fn validate_access_constraints(trace: &Trace, sp: &StickyPolicy) -> Vec<Violation> {
    let mut violations = Vec::new();

    for (idx, event) in trace.access_events() {
        let ts = event.timestamp;

        if sp.erasure_timestamp.is_some_and(|erased_at| ts > erased_at) {
            violations.push(Violation::new(
                ViolationKind::SpAccessAfterErasure,
                Severity::Critical,
                "Access after the data was erased",
                vec![idx],
            ));
        } else if sp.processing_restricted {
            violations.push(Violation::new(
                ViolationKind::SpAccessDuringRestriction,
                Severity::High,
                "Access while processing is restricted",
                vec![idx],
            ));
        } else if sp.consent_expiration_timestamp.is_some_and(|exp| ts > exp) {
            violations.push(Violation::new(
                ViolationKind::SpAccessAfterConsentExpiration,
                Severity::High,
                "Access after the consent expired",
                vec![idx],
            ));
        }
    }

    violations
}

/// Art. 5.2 — the log-access obligation, when present, covers every access.
pub fn validate_obligations(trace: &Trace, sp: &StickyPolicy) -> Vec<Violation> {
    if !sp.requires_access_logging() {
        return Vec::new();
    }

    let latest_log = trace
        .events_of_kind(EventKind::AccessLog)
        .map(|(_, e)| e.timestamp)
        .max();

    trace
        .access_events()
        .filter(|(_, access)| latest_log.map_or(true, |log_ts| log_ts < access.timestamp))
        .map(|(idx, _)| {
            Violation::new(
                ViolationKind::SpMissingAccessLog,
                Severity::Medium,
                "Access without the mandated log entry",
                vec![idx],
            )
        })
        .collect()
}

/// Art. 17, 19, 26-28, 44-49 — third-party sub-policies.
pub fn validate_third_parties(sp: &StickyPolicy) -> Vec<Violation> {
    let mut violations = Vec::new();

    for (name, tp) in &sp.third_parties {
        if tp.active && !sp.consent_given {
            violations.push(Violation::new(
                ViolationKind::SpThirdPartyWithoutConsent,
                Severity::Critical,
                format!("Third party '{name}' active without valid consent"),
                vec![],
            ));
        }

        if sp.erased && tp.active {
            violations.push(Violation::new(
                ViolationKind::SpThirdPartyAfterErasure,
                Severity::Critical,
                format!("Third party '{name}' still active after erasure"),
                vec![],
            ));
        }

        if sp.erased && !tp.notified_of_erasure {
            violations.push(Violation::new(
                ViolationKind::SpThirdPartyNotNotifiedOfErasure,
                Severity::High,
                format!("Third party '{name}' was not notified of the erasure"),
                vec![],
            ));
        }

        if tp.role == ThirdPartyRole::IndependentController && tp.legal_basis.is_none() {
            violations.push(Violation::new(
                ViolationKind::SpThirdPartyMissingLegalBasis,
                Severity::Critical,
                format!("Independent controller '{name}' without a legal basis"),
                vec![],
            ));
        }

        if tp.role == ThirdPartyRole::Processor && tp.own_legal_basis {
            violations.push(Violation::new(
                ViolationKind::SpProcessorWithOwnLegalBasis,
                Severity::High,
                format!("Processor '{name}' declares its own legal basis"),
                vec![],
            ));
        }

        if tp.country.as_deref().is_some_and(|c| c != "EU") && tp.transfer_mechanism.is_none() {
            violations.push(Violation::new(
                ViolationKind::SpIllegalInternationalTransfer,
                Severity::Critical,
                format!("International transfer to '{name}' without safeguards"),
                vec![],
            ));
        }

        // The policy's own lifecycle marks are the only clock available.
        let reference_time = sp
            .erasure_timestamp
            .or(sp.consent_expiration_timestamp)
            .or(tp.retention_until);
        if let (true, Some(until), Some(reference)) = (tp.active, tp.retention_until, reference_time)
        {
            if reference > until {
                violations.push(Violation::new(
                    ViolationKind::SpThirdPartyRetentionViolation,
                    Severity::High,
                    format!("Third party '{name}' exceeds its authorized retention"),
                    vec![],
                ));
            }
        }

        if !tp.permissions.is_subset(&sp.permissions) {
            violations.push(Violation::new(
                ViolationKind::SpThirdPartyPermissionEscalation,
                Severity::High,
                format!("Third party '{name}' holds permissions the policy never granted"),
                vec![],
            ));
        }

        for purpose in tp.purposes.difference(&sp.purposes) {
            violations.push(Violation::new(
                ViolationKind::SpThirdPartyPurposeViolation,
                Severity::High,
                format!("Third party '{name}' uses unauthorized purpose '{purpose}'"),
                vec![],
            ));
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;
    use veritrace_core::{Event, EventKind, SharingTerms};
    use veritrace_policy::build_sticky_policy;

    fn share(ts: i64, name: &str) -> Event {
        Event::new(EventKind::ShareWithThirdParty, ts)
            .with_purpose("service_provision")
            .with_third_party(name, SharingTerms::processor())
    }

    #[test]
    fn test_consent_without_timestamp_is_inconsistent() {
        let mut sp = veritrace_core::StickyPolicy::new("t");
        sp.consent_given = true;
        let kinds: Vec<_> =
            validate_internal_consistency(&sp).into_iter().map(|v| v.kind).collect();
        assert_eq!(kinds, vec![ViolationKind::SpMissingConsentTimestamp]);
    }

    #[test]
    fn test_restriction_surviving_erasure_is_inconsistent() {
        let trace = trace_with(vec![
            consent(10),
            Event::new(EventKind::RestrictProcessing, 20),
            Event::new(EventKind::EraseData, 30),
        ]);
        let sp = build_sticky_policy(&trace);
        let violations = validate_internal_consistency(&sp);
        assert!(violations
            .iter()
            .any(|v| v.kind == ViolationKind::SpInvalidStateAfterErasure));
    }

    #[test]
    fn test_retention_violation_fires_once() {
        let trace = trace_with(vec![
            Event::new(EventKind::SendData, 10).with_max_time_days(1),
            consent(20),
            read_access(100 + veritrace_core::SECS_PER_DAY),
            read_access(200 + veritrace_core::SECS_PER_DAY),
        ]);
        let sp = build_sticky_policy(&trace);
        let violations = validate_retention(&sp);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::SpRetentionViolation);
    }

    #[test]
    fn test_unauthorized_purpose_against_policy() {
        let trace = trace_with(vec![consent(10), read_access(20).with_purpose("marketing")]);
        let sp = build_sticky_policy(&trace);
        let violations = validate_purpose_limitation(&trace, &sp);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::SpPurposeViolation);
    }

    #[test]
    fn test_access_after_erasure_takes_precedence_over_restriction() {
        let trace = trace_with(vec![
            consent(10),
            Event::new(EventKind::RestrictProcessing, 20),
            Event::new(EventKind::EraseData, 30),
            read_access(40),
        ]);
        let sp = build_sticky_policy(&trace);
        let kinds: Vec<_> =
            validate_access_constraints(&trace, &sp).into_iter().map(|v| v.kind).collect();
        assert_eq!(kinds, vec![ViolationKind::SpAccessAfterErasure]);
    }

    #[test]
    fn test_obligation_requires_log_at_or_after_access() {
        let log = Event::new(EventKind::AccessLog, 20).with_related_activity("send-data");
        let trace = trace_with(vec![consent(10), read_access(20), log]);
        let sp = build_sticky_policy(&trace);
        assert!(validate_obligations(&trace, &sp).is_empty());

        let trace = trace_with(vec![consent(10), read_access(20)]);
        let sp = build_sticky_policy(&trace);
        assert_eq!(validate_obligations(&trace, &sp).len(), 1);
    }

    #[test]
    fn test_third_party_active_without_consent() {
        let mut trace = trace_with(vec![share(10, "AnalyticsProvider")]);
        trace.events[0].purpose = None;
        let sp = build_sticky_policy(&trace);
        let violations = validate_third_parties(&sp);
        assert!(violations
            .iter()
            .any(|v| v.kind == ViolationKind::SpThirdPartyWithoutConsent));
    }

    #[test]
    fn test_third_party_still_active_after_erasure_detected_on_external_policy() {
        // hand-built policy, as delivered by an upstream controller
        let mut sp = veritrace_core::StickyPolicy::new("t");
        sp.consent_given = true;
        sp.consent_timestamp = Some(10);
        sp.erased = true;
        sp.erasure_timestamp = Some(100);
        sp.third_parties.insert(
            "CloudStorageProvider".into(),
            veritrace_core::ThirdPartyPolicy {
                data_id: "t".into(),
                role: ThirdPartyRole::Processor,
                purposes: Default::default(),
                permissions: Default::default(),
                active: true,
                shared_at: 20,
                retention_until: None,
                country: None,
                transfer_mechanism: None,
                legal_basis: None,
                own_legal_basis: false,
                notified_of_erasure: false,
            },
        );
        let kinds: Vec<_> = validate_third_parties(&sp).into_iter().map(|v| v.kind).collect();
        assert!(kinds.contains(&ViolationKind::SpThirdPartyAfterErasure));
        assert!(kinds.contains(&ViolationKind::SpThirdPartyNotNotifiedOfErasure));
    }

    #[test]
    fn test_cross_border_transfer_needs_mechanism() {
        let mut share = share(10, "CloudStorageProvider");
        share.sharing.as_mut().unwrap().country = Some("US".into());
        let trace = trace_with(vec![consent(5), share]);
        let sp = build_sticky_policy(&trace);
        let violations = validate_third_parties(&sp);
        assert!(violations
            .iter()
            .any(|v| v.kind == ViolationKind::SpIllegalInternationalTransfer));

        let mut share = self::share(10, "CloudStorageProvider");
        share.sharing.as_mut().unwrap().country = Some("US".into());
        share.sharing.as_mut().unwrap().transfer_mechanism = Some("SCC".into());
        let trace = trace_with(vec![consent(5), share]);
        let sp = build_sticky_policy(&trace);
        assert!(!validate_third_parties(&sp)
            .iter()
            .any(|v| v.kind == ViolationKind::SpIllegalInternationalTransfer));
    }

    #[test]
    fn test_permission_escalation_detected() {
        let mut share = share(10, "PaymentGateway");
        share.sharing.as_mut().unwrap().permissions = vec!["write".into()];
        let trace = trace_with(vec![consent(5), share, read_access(20)]);
        let sp = build_sticky_policy(&trace);
        // parent policy only ever granted "read"
        let violations = validate_third_parties(&sp);
        assert!(violations
            .iter()
            .any(|v| v.kind == ViolationKind::SpThirdPartyPermissionEscalation));
    }

    #[test]
    fn test_processor_with_own_legal_basis() {
        let mut share = share(10, "AnalyticsProvider");
        share.sharing.as_mut().unwrap().own_legal_basis = true;
        let trace = trace_with(vec![consent(5), share]);
        let sp = build_sticky_policy(&trace);
        assert!(validate_third_parties(&sp)
            .iter()
            .any(|v| v.kind == ViolationKind::SpProcessorWithOwnLegalBasis));
    }
}
