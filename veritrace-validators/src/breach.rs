//! Breach notification deadlines (Art. 33 GDPR).

use veritrace_core::{
    EventKind, Severity, Trace, Violation, ViolationKind, BREACH_NOTIFICATION_WINDOW_SECS,
};

/// Every detected breach must be notified, and notified within 72 hours.
///
/// The boundary is inclusive: a notification at exactly detect + 72h is
/// compliant.
pub fn validate_breach_notification_time(trace: &Trace) -> Vec<Violation> {
    let mut violations = Vec::new();

    let notifies: Vec<(usize, i64)> = trace
        .events_of_kind(EventKind::NotifyBreach)
        .map(|(i, e)| (i, e.timestamp))
        .collect();

    for (detect_idx, detect) in trace.events_of_kind(EventKind::BreachDetected) {
        let first_notify = notifies.iter().find(|(_, ts)| *ts > detect.timestamp);

        match first_notify {
            None => violations.push(Violation::new(
                ViolationKind::MissingBreachNotification,
                Severity::Critical,
                "Breach detected but never notified",
                vec![detect_idx],
            )),
            Some(&(notify_idx, notify_ts)) => {
                if notify_ts > detect.timestamp + BREACH_NOTIFICATION_WINDOW_SECS {
                    violations.push(Violation::new(
                        ViolationKind::LateBreachNotification,
                        Severity::Critical,
                        "Breach notified after the legal 72-hour window",
                        vec![detect_idx, notify_idx],
                    ));
                }
            }
        }
    }

    violations
}
