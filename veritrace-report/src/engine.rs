//! Per-trace analysis pipeline and batch loop.

use tracing::{debug, warn};
use veritrace_core::{
    Recommendation, RiskBand, Trace, VeritraceError, VeritraceResult, Violation,
};
use veritrace_policy::build_sticky_policy;
use veritrace_validators::{annotate_violations, dedup_policy_overlaps, validate_trace};

/// State of the corrected trace after simulated remediation.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PostRemediation {
    pub violations: Vec<Violation>,
    pub risk_score: u32,
    pub risk_band: RiskBand,
}

/// Everything the analysis produced for one trace.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TraceAnalysis {
    pub trace_id: String,
    /// The input trace, annotated, with its reconstructed policy attached.
    pub trace: Trace,
    pub violations: Vec<Violation>,
    pub recommendations: Vec<Recommendation>,
    pub risk_score: u32,
    pub risk_band: RiskBand,
    /// The corrected copy produced by simulated remediation.
    pub remediated: Trace,
    pub post_remediation: PostRemediation,
}

/// One trace the batch loop could not analyze.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct BatchFailure {
    pub trace_id: String,
    pub reason: String,
}

/// Batch result: successful analyses plus the recorded failures.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct BatchReport {
    pub analyses: Vec<TraceAnalysis>,
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn skipped(&self) -> usize {
        self.failures.len()
    }
}

/// Run the full pipeline over one trace.
///
/// The trace must be non-empty and chronologically ordered; anything else
/// is a per-trace fault, not a panic.
pub fn analyze(input: &Trace) -> VeritraceResult<TraceAnalysis> {
    if input.is_empty() {
        return Err(VeritraceError::EmptyTrace { trace_id: input.id.clone() });
    }
    if let Some(index) = input.first_unordered_index() {
        return Err(VeritraceError::UnorderedTrace { trace_id: input.id.clone(), index });
    }

    let mut trace = input.clone();
    let policy = build_sticky_policy(&trace);
    trace.policy = Some(policy);

    let violations = dedup_policy_overlaps(validate_trace(&trace));
    annotate_violations(&mut trace, &violations);

    let mut recommendations = veritrace_advisor::generate(&violations);
    if let Some(sp) = &trace.policy {
        recommendations.extend(veritrace_advisor::generate_from_policy(sp));
    }

    let risk_score = veritrace_advisor::compute_risk_score(&recommendations);
    let risk_band = veritrace_advisor::classify(risk_score);
    trace.compliant = Some(violations.is_empty());
    trace.risk_score = Some(risk_score);
    trace.risk_band = Some(risk_band);

    // Simulated remediation, then the same checks again on the corrected
    // copy to quantify the improvement.
    let mut remediated = veritrace_remedy::apply(&trace, &recommendations);
    let corrected_violations = dedup_policy_overlaps(validate_trace(&remediated));
    let corrected_recommendations = veritrace_advisor::generate(&corrected_violations);
    let corrected_score = veritrace_advisor::compute_risk_score(&corrected_recommendations);
    let corrected_band = veritrace_advisor::classify(corrected_score);
    remediated.compliant = Some(corrected_violations.is_empty());
    remediated.risk_score = Some(corrected_score);
    remediated.risk_band = Some(corrected_band);

    debug!(
        trace_id = %trace.id,
        violations = violations.len(),
        risk_score,
        corrected_score,
        "trace analyzed"
    );

    Ok(TraceAnalysis {
        trace_id: trace.id.clone(),
        trace,
        violations,
        recommendations,
        risk_score,
        risk_band,
        remediated,
        post_remediation: PostRemediation {
            violations: corrected_violations,
            risk_score: corrected_score,
            risk_band: corrected_band,
        },
    })
}

/// Analyze a whole log with per-trace fault isolation.
///
/// A malformed trace is recorded and skipped; it never aborts the batch.
pub fn analyze_log(traces: &[Trace]) -> BatchReport {
    let mut analyses = Vec::with_capacity(traces.len());
    let mut failures = Vec::new();

    for trace in traces {
        match analyze(trace) {
            Ok(analysis) => analyses.push(analysis),
            Err(err) => {
                warn!(trace_id = %trace.id, error = %err, "skipping trace");
                failures.push(BatchFailure { trace_id: trace.id.clone(), reason: err.to_string() });
            }
        }
    }

    BatchReport { analyses, failures }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veritrace_core::{AccessMode, Event, EventKind, ViolationKind};

    fn consent(ts: i64) -> Event {
        Event::new(EventKind::GiveConsent, ts)
            .with_purpose("service_provision")
            .with_explicit_consent(true)
    }

    fn access(ts: i64) -> Event {
        Event::new(EventKind::SendData, ts)
            .with_access(AccessMode::Read)
            .with_purpose("service_provision")
    }

    fn trace_with(id: &str, events: Vec<Event>) -> Trace {
        let mut trace = Trace::with_events(id, events);
        trace.context.default_purpose = Some("service_provision".into());
        trace
    }

    #[test]
    fn test_empty_trace_is_a_fault() {
        let err = analyze(&Trace::new("empty")).unwrap_err();
        assert!(matches!(err, VeritraceError::EmptyTrace { .. }));
    }

    #[test]
    fn test_unordered_trace_is_a_fault() {
        let trace = trace_with("bad", vec![access(100), consent(50)]);
        let err = analyze(&trace).unwrap_err();
        match err {
            VeritraceError::UnorderedTrace { trace_id, index } => {
                assert_eq!(trace_id, "bad");
                assert_eq!(index, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_analysis_attaches_policy_and_score() {
        let trace = trace_with("t1", vec![consent(10), access(20)]);
        let analysis = analyze(&trace).unwrap();
        assert!(analysis.trace.policy.is_some());
        assert_eq!(analysis.trace.risk_score, Some(analysis.risk_score));
        assert_eq!(analysis.trace_id, "t1");
    }

    #[test]
    fn test_remediation_lowers_or_holds_the_score() {
        // access before consent, missing logs: plenty to fix
        let trace = trace_with("t1", vec![access(100), consent(200), access(300)]);
        let analysis = analyze(&trace).unwrap();
        assert!(analysis.post_remediation.violations.len() <= analysis.violations.len());
        assert!(analysis.post_remediation.risk_score <= analysis.risk_score);
        assert!(analysis.remediated.remediated);
    }

    #[test]
    fn test_violations_are_deduplicated_against_policy_findings() {
        let trace = trace_with(
            "t1",
            vec![consent(10), Event::new(EventKind::EraseData, 20), access(30)],
        );
        let analysis = analyze(&trace).unwrap();
        assert!(analysis
            .violations
            .iter()
            .any(|v| v.kind == ViolationKind::SpAccessAfterErasure));
        assert!(!analysis
            .violations
            .iter()
            .any(|v| v.kind == ViolationKind::AccessAfterErasure));
    }

    #[test]
    fn test_batch_isolates_malformed_traces() {
        let good_a = trace_with("a", vec![consent(10), access(20)]);
        let bad = trace_with("b", vec![access(100), consent(50)]);
        let good_c = trace_with("c", vec![consent(10), access(20)]);

        let report = analyze_log(&[good_a, bad, good_c]);
        assert_eq!(report.analyses.len(), 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.failures[0].trace_id, "b");
        assert!(report.failures[0].reason.contains("not chronologically ordered"));
    }
}
