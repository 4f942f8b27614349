//! # Veritrace Validators — compliance rule evaluation
//!
//! Six technical rule groups plus the sticky-policy cross-checks. Every
//! validator is a pure function over a chronologically sorted trace: no
//! mutation, no shared state, empty input yields an empty violation list.
//!
//! Rule groups:
//! - consent timing and quality (missing / late / implicit consent)
//! - withdrawal and consent expiry
//! - restriction, erasure and rights procedure
//! - accountability and data minimization
//! - breach notification deadlines (72 h)
//! - ARCO rights response deadlines (30 d)
//! - sticky-policy governance cross-checks, including third parties

pub mod accountability;
pub mod arco;
pub mod breach;
pub mod consent;
pub mod processing;
pub mod rights;
pub mod sticky;

use std::collections::BTreeSet;

use veritrace_core::{Trace, Violation, ViolationKind, ViolationNote};

/// Run every rule group over one trace.
///
/// Sticky-policy checks only run when the trace carries a policy; the
/// technical groups never need one.
pub fn validate_trace(trace: &Trace) -> Vec<Violation> {
    let mut violations = Vec::new();
    violations.extend(consent::validate_consent_before_access(trace));
    violations.extend(consent::validate_implicit_consent(trace));
    violations.extend(processing::validate_access_after_consent_expiration(trace));
    violations.extend(processing::validate_withdrawn_consent(trace));
    violations.extend(rights::validate_processing_restriction(trace));
    violations.extend(rights::validate_erase_without_processing(trace));
    violations.extend(rights::validate_access_after_erasure(trace));
    violations.extend(rights::validate_access_log_without_access(trace));
    violations.extend(accountability::validate_data_minimization(trace));
    violations.extend(accountability::validate_purpose_limitation(trace));
    violations.extend(accountability::validate_access_without_permission(trace));
    violations.extend(accountability::validate_access_without_consent(trace));
    violations.extend(accountability::validate_missing_access_log(trace));
    violations.extend(breach::validate_breach_notification_time(trace));
    violations.extend(arco::validate_data_subject_rights(trace));
    if let Some(sp) = &trace.policy {
        violations.extend(sticky::validate_sticky_policy(trace, sp));
    }

    let blocking = violations.iter().filter(|v| v.blocking).count();
    if blocking > 0 {
        tracing::warn!(trace_id = %trace.id, blocking, "blocking violations detected");
    }
    violations
}

/// Attach violation notes to the events each violation references.
pub fn annotate_violations(trace: &mut Trace, violations: &[Violation]) {
    for v in violations {
        for &idx in &v.events {
            if let Some(event) = trace.events.get_mut(idx) {
                event.violations.push(ViolationNote {
                    kind: v.kind,
                    severity: v.severity,
                    message: v.message.clone(),
                });
            }
        }
    }
}

/// Drop technical violations subsumed by a governance (`sp_*`) finding of
/// the same underlying kind, so aggregation does not double-count them.
pub fn dedup_policy_overlaps(violations: Vec<Violation>) -> Vec<Violation> {
    let shadowed: BTreeSet<ViolationKind> = violations
        .iter()
        .filter_map(|v| v.kind.technical_twin())
        .collect();

    violations.into_iter().filter(|v| !shadowed.contains(&v.kind)).collect()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use veritrace_core::{AccessMode, Event, EventKind, Trace};

    pub fn consent(ts: i64) -> Event {
        Event::new(EventKind::GiveConsent, ts)
            .with_purpose("service_provision")
            .with_explicit_consent(true)
    }

    pub fn read_access(ts: i64) -> Event {
        Event::new(EventKind::SendData, ts)
            .with_access(AccessMode::Read)
            .with_purpose("service_provision")
    }

    pub fn write_access(ts: i64) -> Event {
        Event::new(EventKind::SendData, ts)
            .with_access(AccessMode::Write)
            .with_purpose("service_provision")
    }

    pub fn trace_with(events: Vec<Event>) -> Trace {
        let mut trace = Trace::with_events("case_1", events);
        trace.context.default_purpose = Some("service_provision".into());
        trace.context.legal_basis = Some("consent".into());
        trace
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use veritrace_core::{EventKind, Severity};
    use veritrace_policy::build_sticky_policy;

    #[test]
    fn test_compliant_ordering_produces_no_consent_violations() {
        let trace = trace_with(vec![
            consent(100),
            veritrace_core::Event::new(EventKind::PermissionGranted, 150),
            read_access(200),
        ]);
        let violations = validate_trace(&trace);
        assert!(!violations.iter().any(|v| v.kind == ViolationKind::ConsentAfterAccess));
        assert!(!violations.iter().any(|v| v.kind == ViolationKind::MissingConsent));
    }

    #[test]
    fn test_access_before_consent_end_to_end() {
        // give-consent at 10:00, read access at 09:59
        let trace = trace_with(vec![read_access(35_940), consent(36_000)]);
        let mut sorted = trace.clone();
        sorted.sort_by_time();
        let violations = validate_trace(&sorted);
        let hit: Vec<_> = violations
            .iter()
            .filter(|v| v.kind == ViolationKind::ConsentAfterAccess)
            .collect();
        assert_eq!(hit.len(), 1);
        assert_eq!(hit[0].severity, Severity::High);
        assert_eq!(hit[0].events, vec![0]);
    }

    #[test]
    fn test_annotation_marks_referenced_events() {
        let mut trace = trace_with(vec![read_access(50), consent(100)]);
        let violations = validate_trace(&trace);
        annotate_violations(&mut trace, &violations);
        assert!(!trace.events[0].violations.is_empty());
        assert!(trace.events[1]
            .violations
            .iter()
            .all(|n| n.kind == ViolationKind::ImplicitConsent || n.kind != ViolationKind::ConsentAfterAccess));
    }

    #[test]
    fn test_dedup_drops_shadowed_technical_kind() {
        let mut trace = trace_with(vec![
            consent(100),
            veritrace_core::Event::new(EventKind::EraseData, 200),
            read_access(300),
        ]);
        trace.policy = Some(build_sticky_policy(&trace));
        let violations = validate_trace(&trace);
        assert!(violations.iter().any(|v| v.kind == ViolationKind::AccessAfterErasure));
        assert!(violations.iter().any(|v| v.kind == ViolationKind::SpAccessAfterErasure));
        let deduped = dedup_policy_overlaps(violations);
        assert!(!deduped.iter().any(|v| v.kind == ViolationKind::AccessAfterErasure));
        assert!(deduped.iter().any(|v| v.kind == ViolationKind::SpAccessAfterErasure));
    }

    #[test]
    fn test_empty_trace_is_clean() {
        let trace = veritrace_core::Trace::new("empty");
        assert!(validate_trace(&trace).is_empty());
    }
}
