//! Consent timing and quality (Art. 6 and 7 GDPR).

use veritrace_core::{EventKind, Severity, Trace, Violation, ViolationKind};

/// No personal-data access may precede the first consent event.
///
/// When the trace holds accesses but no consent at all, a single
/// `missing_consent` violation lists every access; the per-access
/// `consent_after_access` rule is not duplicated on top of it.
pub fn validate_consent_before_access(trace: &Trace) -> Vec<Violation> {
    let mut violations = Vec::new();

    let access_indices: Vec<usize> = trace.access_events().map(|(i, _)| i).collect();
    let first_consent = trace.first_event_of(EventKind::GiveConsent);

    if access_indices.is_empty() {
        return violations;
    }

    let Some((_, consent)) = first_consent else {
        violations.push(Violation::new(
            ViolationKind::MissingConsent,
            Severity::High,
            "Personal data accessed without any prior consent",
            access_indices,
        ));
        return violations;
    };

    let consent_ts = consent.timestamp;
    for (idx, event) in trace.access_events() {
        if event.timestamp < consent_ts {
            violations.push(Violation::new(
                ViolationKind::ConsentAfterAccess,
                Severity::High,
                "Personal data accessed before consent was obtained",
                vec![idx],
            ));
        }
    }

    violations
}

/// Consent must be explicit (Art. 7).
pub fn validate_implicit_consent(trace: &Trace) -> Vec<Violation> {
    trace
        .events_of_kind(EventKind::GiveConsent)
        .filter(|(_, e)| e.explicit_consent != Some(true))
        .map(|(idx, _)| {
            Violation::new(
                ViolationKind::ImplicitConsent,
                Severity::Medium,
                "Consent was not given explicitly",
                vec![idx],
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;
    use veritrace_core::{Event, EventKind};

    #[test]
    fn test_missing_consent_lists_every_access_once() {
        let trace = trace_with(vec![read_access(10), read_access(20)]);
        let violations = validate_consent_before_access(&trace);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::MissingConsent);
        assert_eq!(violations[0].events, vec![0, 1]);
    }

    #[test]
    fn test_access_before_first_consent_flagged_per_access() {
        let trace = trace_with(vec![read_access(10), read_access(20), consent(30)]);
        let violations = validate_consent_before_access(&trace);
        assert_eq!(violations.len(), 2);
        assert!(violations.iter().all(|v| v.kind == ViolationKind::ConsentAfterAccess));
    }

    #[test]
    fn test_no_access_means_no_violation() {
        let trace = trace_with(vec![Event::new(EventKind::Inform, 5)]);
        assert!(validate_consent_before_access(&trace).is_empty());
    }

    #[test]
    fn test_implicit_consent_detected() {
        let mut c = consent(10);
        c.explicit_consent = None;
        let trace = trace_with(vec![c]);
        let violations = validate_implicit_consent(&trace);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::ImplicitConsent);
        assert_eq!(violations[0].severity, Severity::Medium);
    }

    #[test]
    fn test_explicit_consent_is_clean() {
        let trace = trace_with(vec![consent(10)]);
        assert!(validate_implicit_consent(&trace).is_empty());
    }
}
