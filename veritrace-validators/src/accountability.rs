//! Accountability and minimization rules (Art. 5 GDPR).

use std::collections::HashMap;

use veritrace_core::{DataScope, EventKind, Severity, Trace, Violation, ViolationKind};

/// Accesses declared with excessive scope breach data minimization.
pub fn validate_data_minimization(trace: &Trace) -> Vec<Violation> {
    trace
        .access_events()
        .filter(|(_, e)| e.scope == Some(DataScope::Excessive))
        .map(|(idx, _)| {
            Violation::new(
                ViolationKind::DataMinimizationViolation,
                Severity::Medium,
                "More data accessed than the purpose requires",
                vec![idx],
            )
        })
        .collect()
}

/// Accesses must carry the trace's default purpose.
///
/// Returns nothing when the trace context has no default purpose: the
/// precondition is absent, not violated.
pub fn validate_purpose_limitation(trace: &Trace) -> Vec<Violation> {
    let Some(allowed) = trace.context.default_purpose.as_deref() else {
        return Vec::new();
    };

    trace
        .access_events()
        .filter(|(_, e)| e.purpose.as_deref() != Some(allowed))
        .map(|(idx, _)| {
            Violation::new(
                ViolationKind::PurposeViolation,
                Severity::High,
                "Data used for a purpose other than the authorized one",
                vec![idx],
            )
        })
        .collect()
}

/// Every access must be immediately preceded by a permission-grant event.
pub fn validate_access_without_permission(trace: &Trace) -> Vec<Violation> {
    let mut violations = Vec::new();

    for (idx, event) in trace.access_events() {
        let preceded = idx > 0 && trace.events[idx - 1].kind == EventKind::PermissionGranted;
        if !preceded {
            violations.push(Violation::new(
                ViolationKind::AccessWithoutPermission,
                Severity::High,
                "Access without a preceding permission grant",
                vec![idx],
            ));
        }
    }

    violations
}

/// Accesses performed while no consent has been given yet.
pub fn validate_access_without_consent(trace: &Trace) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut consent_seen = false;

    for (idx, event) in trace.events.iter().enumerate() {
        if event.kind == EventKind::GiveConsent {
            consent_seen = true;
        } else if !consent_seen && event.is_access() {
            violations.push(Violation::new(
                ViolationKind::AccessWithoutConsent,
                Severity::High,
                "Access performed while no consent was active",
                vec![idx],
            ));
        }
    }

    violations
}

/// Every access needs an access-log entry at or after its timestamp whose
/// related activity matches the access.
///
/// The log side is indexed in one pass (latest log timestamp per related
/// activity) instead of re-scanning the trace per access.
pub fn validate_missing_access_log(trace: &Trace) -> Vec<Violation> {
    let mut latest_log_for: HashMap<&str, i64> = HashMap::new();
    for (_, log) in trace.events_of_kind(EventKind::AccessLog) {
        if let Some(related) = log.related_activity.as_deref() {
            let entry = latest_log_for.entry(related).or_insert(log.timestamp);
            *entry = (*entry).max(log.timestamp);
        }
    }

    trace
        .access_events()
        .filter(|(_, access)| {
            latest_log_for
                .get(access.kind.label())
                .map_or(true, |&latest| latest < access.timestamp)
        })
        .map(|(idx, _)| {
            Violation::new(
                ViolationKind::MissingAccessLog,
                Severity::Medium,
                "Access without a matching access-log entry",
                vec![idx],
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;
    use veritrace_core::{DataScope, Event, EventKind};

    #[test]
    fn test_excessive_scope_flagged() {
        let trace =
            trace_with(vec![consent(10), read_access(20).with_scope(DataScope::Excessive)]);
        let violations = validate_data_minimization(&trace);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::DataMinimizationViolation);
    }

    #[test]
    fn test_purpose_mismatch_flagged() {
        let off_purpose = read_access(20).with_purpose("marketing");
        let trace = trace_with(vec![consent(10), off_purpose]);
        let violations = validate_purpose_limitation(&trace);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].events, vec![1]);
    }

    #[test]
    fn test_purpose_check_skipped_without_default() {
        let mut trace = trace_with(vec![read_access(20).with_purpose("marketing")]);
        trace.context.default_purpose = None;
        assert!(validate_purpose_limitation(&trace).is_empty());
    }

    #[test]
    fn test_access_without_permission_grant() {
        let trace = trace_with(vec![
            consent(10),
            Event::new(EventKind::PermissionGranted, 15),
            read_access(20),
            read_access(30),
        ]);
        let violations = validate_access_without_permission(&trace);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].events, vec![3]);
    }

    #[test]
    fn test_first_event_access_has_no_permission() {
        let trace = trace_with(vec![read_access(10)]);
        assert_eq!(validate_access_without_permission(&trace).len(), 1);
    }

    #[test]
    fn test_access_without_consent_stops_after_consent() {
        let trace = trace_with(vec![read_access(10), consent(20), read_access(30)]);
        let violations = validate_access_without_consent(&trace);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].events, vec![0]);
    }

    #[test]
    fn test_missing_access_log_flagged() {
        let trace = trace_with(vec![consent(10), read_access(20)]);
        let violations = validate_missing_access_log(&trace);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::MissingAccessLog);
    }

    #[test]
    fn test_access_log_must_not_predate_access() {
        let early_log = Event::new(EventKind::AccessLog, 15).with_related_activity("send-data");
        let trace = trace_with(vec![consent(10), early_log, read_access(20)]);
        assert_eq!(validate_missing_access_log(&trace).len(), 1);
    }

    #[test]
    fn test_matching_access_log_is_clean() {
        let log = Event::new(EventKind::AccessLog, 25).with_related_activity("send-data");
        let trace = trace_with(vec![consent(10), read_access(20), log]);
        assert!(validate_missing_access_log(&trace).is_empty());
    }
}
