//! Restriction, erasure and rights-procedure rules (Art. 17 and 18 GDPR).

use std::collections::BTreeSet;

use veritrace_core::{AccessMode, EventKind, Severity, Trace, Violation, ViolationKind};

/// While a restriction is active, only read access is tolerated.
pub fn validate_processing_restriction(trace: &Trace) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut restricted = false;

    for (idx, event) in trace.events.iter().enumerate() {
        match event.kind {
            EventKind::RestrictProcessing => restricted = true,
            EventKind::LiftRestriction => restricted = false,
            _ => {
                if restricted {
                    if let Some(mode) = event.access {
                        if mode != AccessMode::Read {
                            violations.push(
                                Violation::new(
                                    ViolationKind::AccessDuringRestriction,
                                    Severity::High,
                                    format!(
                                        "'{}' operation while processing was restricted",
                                        mode.label()
                                    ),
                                    vec![idx],
                                )
                                .blocking(),
                            );
                        }
                    }
                }
            }
        }
    }

    violations
}

/// Any access after an `erase-data` event is a critical, blocking violation.
pub fn validate_access_after_erasure(trace: &Trace) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut erased = false;

    for (idx, event) in trace.events.iter().enumerate() {
        if event.kind == EventKind::EraseData {
            erased = true;
        } else if erased && event.is_access() {
            let mode = event.access.map(AccessMode::label).unwrap_or("unknown");
            violations.push(
                Violation::new(
                    ViolationKind::AccessAfterErasure,
                    Severity::Critical,
                    format!("'{mode}' operation after erasure was requested"),
                    vec![idx],
                )
                .blocking(),
            );
        }
    }

    violations
}

/// An erasure request with no prior processing anywhere in the trace is
/// incoherent (low severity: the lifecycle, not the data, is at fault).
pub fn validate_erase_without_processing(trace: &Trace) -> Vec<Violation> {
    let erase_indices: Vec<usize> =
        trace.events_of_kind(EventKind::EraseData).map(|(i, _)| i).collect();

    if erase_indices.is_empty() || trace.access_events().next().is_some() {
        return Vec::new();
    }

    vec![Violation::new(
        ViolationKind::EraseWithoutProcessing,
        Severity::Low,
        "Erasure requested without any recorded processing",
        erase_indices,
    )]
}

/// An access-log entry must refer back to an actual access activity.
pub fn validate_access_log_without_access(trace: &Trace) -> Vec<Violation> {
    let access_activities: BTreeSet<&str> =
        trace.access_events().map(|(_, e)| e.kind.label()).collect();

    trace
        .events_of_kind(EventKind::AccessLog)
        .filter(|(_, log)| {
            !log.related_activity
                .as_deref()
                .is_some_and(|related| access_activities.contains(related))
        })
        .map(|(idx, _)| {
            Violation::new(
                ViolationKind::AccessLogWithoutAccess,
                Severity::Low,
                "Access log entry with no associated access event",
                vec![idx],
            )
        })
        .collect()
}
