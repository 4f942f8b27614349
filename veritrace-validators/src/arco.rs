//! ARCO data-subject rights deadlines (Art. 12 and 15 GDPR).

use veritrace_core::{
    EventKind, Severity, Trace, Violation, ViolationKind, RIGHT_RESPONSE_WINDOW_SECS,
};

/// Every information request must be answered within 30 days (inclusive).
pub fn validate_data_subject_rights(trace: &Trace) -> Vec<Violation> {
    let mut violations = Vec::new();

    let responses: Vec<(usize, i64)> = trace
        .events_of_kind(EventKind::ProvideInfo)
        .map(|(i, e)| (i, e.timestamp))
        .collect();

    for (req_idx, req) in trace.events_of_kind(EventKind::RequestInfo) {
        let first_response = responses.iter().find(|(_, ts)| *ts > req.timestamp);

        match first_response {
            None => violations.push(Violation::new(
                ViolationKind::MissingRightResponse,
                Severity::Medium,
                "Information request left unanswered",
                vec![req_idx],
            )),
            Some(&(resp_idx, resp_ts)) => {
                if resp_ts > req.timestamp + RIGHT_RESPONSE_WINDOW_SECS {
                    violations.push(Violation::new(
                        ViolationKind::LateRightResponse,
                        Severity::Medium,
                        "Rights response after the legal 30-day window",
                        vec![req_idx, resp_idx],
                    ));
                }
            }
        }
    }

    violations
}
