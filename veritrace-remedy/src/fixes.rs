//! Individual event-level fixes.
//!
//! Each fix is idempotent over an already-corrected trace; the dispatcher
//! may apply the same fix several times when several recommendations map
//! to it.

use veritrace_core::{Event, EventKind, Trace, SECS_PER_DAY};

/// Marker event after which accesses become unlawful.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Cutoff {
    Withdrawal,
    ConsentExpiry,
    Erasure,
}

impl Cutoff {
    fn kind(self) -> EventKind {
        match self {
            Cutoff::Withdrawal => EventKind::WithdrawConsent,
            Cutoff::ConsentExpiry => EventKind::ConsentExpired,
            Cutoff::Erasure => EventKind::EraseData,
        }
    }
}

/// Move every access that predates the first consent to one second after it.
pub(crate) fn reorder_consent(trace: &mut Trace) {
    let Some((_, consent)) = trace.first_event_of(EventKind::GiveConsent) else {
        return;
    };
    let consent_ts = consent.timestamp;

    for event in &mut trace.events {
        if event.access.is_some() && event.timestamp < consent_ts {
            event.timestamp = consent_ts + 1;
        }
    }
}

/// Insert a synthetic explicit consent one second before the first event.
pub(crate) fn insert_initial_consent(trace: &mut Trace) {
    if trace.first_event_of(EventKind::GiveConsent).is_some() {
        return;
    }
    let Some(first_ts) = trace.first_timestamp() else { return };

    let mut consent = Event::new(EventKind::GiveConsent, first_ts - 1).with_explicit_consent(true);
    consent.purpose = trace.context.default_purpose.clone();
    trace.events.insert(0, consent);
}

/// Mark every consent event as explicit.
pub(crate) fn force_explicit_consent(trace: &mut Trace) {
    for event in &mut trace.events {
        if event.kind == EventKind::GiveConsent {
            event.explicit_consent = Some(true);
        }
    }
}

/// Clear the access flag on every event after the cutoff marker.
pub(crate) fn clear_access_after(trace: &mut Trace, cutoff: Cutoff) {
    let marker = cutoff.kind();
    let mut past_cutoff = false;

    for event in &mut trace.events {
        if event.kind == marker {
            past_cutoff = true;
        } else if past_cutoff {
            event.access = None;
        }
    }
}

/// Clear the access flag inside restriction windows only.
pub(crate) fn clear_access_during_restriction(trace: &mut Trace) {
    let mut restricted = false;

    for event in &mut trace.events {
        match event.kind {
            EventKind::RestrictProcessing => restricted = true,
            EventKind::LiftRestriction => restricted = false,
            _ => {
                if restricted {
                    event.access = None;
                }
            }
        }
    }
}

/// Reset every access to the trace's default purpose.
pub(crate) fn reset_purpose(trace: &mut Trace) {
    let purpose = trace
        .context
        .default_purpose
        .clone()
        .unwrap_or_else(|| "service_provision".into());

    for event in &mut trace.events {
        if event.access.is_some() {
            event.purpose = Some(purpose.clone());
        }
    }
}

/// Reset every access to minimal data scope.
pub(crate) fn reset_scope(trace: &mut Trace) {
    for event in &mut trace.events {
        if event.access.is_some() {
            event.scope = Some(veritrace_core::DataScope::Minimal);
        }
    }
}

/// Insert a permission grant one second before each uncovered access.
pub(crate) fn insert_permission_grants(trace: &mut Trace) {
    let mut i = 0;
    while i < trace.events.len() {
        if trace.events[i].access.is_some() {
            let covered = i > 0 && trace.events[i - 1].kind == EventKind::PermissionGranted;
            if !covered {
                let ts = trace.events[i].timestamp - 1;
                let mut grant = Event::new(EventKind::PermissionGranted, ts);
                grant.actor = trace.events[i].actor.clone();
                trace.events.insert(i, grant);
                i += 1;
            }
        }
        i += 1;
    }
}

/// Synthesize a notification one hour after each unanswered breach.
pub(crate) fn insert_breach_notifications(trace: &mut Trace) {
    insert_responses(trace, EventKind::BreachDetected, EventKind::NotifyBreach, 3600);
}

/// Synthesize a response one day after each unanswered information request.
pub(crate) fn insert_right_responses(trace: &mut Trace) {
    insert_responses(trace, EventKind::RequestInfo, EventKind::ProvideInfo, SECS_PER_DAY);
}

fn insert_responses(trace: &mut Trace, trigger: EventKind, response: EventKind, delay: i64) {
    let response_times: Vec<i64> =
        trace.events_of_kind(response).map(|(_, e)| e.timestamp).collect();

    let synthetic: Vec<Event> = trace
        .events_of_kind(trigger)
        .filter(|(_, t)| !response_times.iter().any(|&ts| ts > t.timestamp))
        .map(|(_, t)| {
            let mut event = Event::new(response, t.timestamp + delay);
            event.actor = t.actor.clone();
            event
        })
        .collect();

    trace.events.extend(synthetic);
}

/// Move every response past the 30-day window to one day after its request.
pub(crate) fn retime_late_responses(trace: &mut Trace) {
    let request_times: Vec<i64> =
        trace.events_of_kind(EventKind::RequestInfo).map(|(_, e)| e.timestamp).collect();

    for event in &mut trace.events {
        if event.kind != EventKind::ProvideInfo {
            continue;
        }
        for &req_ts in &request_times {
            if event.timestamp > req_ts + 30 * SECS_PER_DAY {
                event.timestamp = req_ts + SECS_PER_DAY;
            }
        }
    }
}
