//! Trace ranking by risk.

use std::cmp::Reverse;
use std::collections::HashMap;

use veritrace_core::{RiskBand, ViolationKind};

use crate::engine::TraceAnalysis;

/// One row of the risk ranking.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RankEntry {
    pub trace_id: String,
    pub risk_score: u32,
    pub risk_band: RiskBand,
    pub num_violations: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_violation: Option<ViolationKind>,
}

/// Rank analyses by risk score, highest first.
///
/// The sort is stable: equal scores keep the input order, so repeated
/// runs over the same log produce the same ranking.
pub fn rank(analyses: &[TraceAnalysis]) -> Vec<RankEntry> {
    let mut ranking: Vec<RankEntry> = analyses
        .iter()
        .map(|a| RankEntry {
            trace_id: a.trace_id.clone(),
            risk_score: a.risk_score,
            risk_band: a.risk_band,
            num_violations: a.violations.len(),
            top_violation: most_common_kind(a),
        })
        .collect();

    ranking.sort_by_key(|entry| Reverse(entry.risk_score));
    ranking
}

/// Most frequent violation kind in one analysis; first seen wins ties.
fn most_common_kind(analysis: &TraceAnalysis) -> Option<ViolationKind> {
    let mut counts: HashMap<ViolationKind, usize> = HashMap::new();
    for v in &analysis.violations {
        *counts.entry(v.kind).or_default() += 1;
    }

    let mut best: Option<(ViolationKind, usize)> = None;
    for v in &analysis.violations {
        let count = counts[&v.kind];
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((v.kind, count));
        }
    }
    best.map(|(kind, _)| kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::PostRemediation;
    use veritrace_core::{Severity, Trace, Violation};

    fn analysis(id: &str, score: u32, kinds: &[ViolationKind]) -> TraceAnalysis {
        let violations: Vec<Violation> = kinds
            .iter()
            .map(|&k| Violation::new(k, Severity::Medium, "test", vec![]))
            .collect();
        TraceAnalysis {
            trace_id: id.into(),
            trace: Trace::new(id),
            violations: violations.clone(),
            recommendations: Vec::new(),
            risk_score: score,
            risk_band: veritrace_advisor::classify(score),
            remediated: Trace::new(id),
            post_remediation: PostRemediation {
                violations: Vec::new(),
                risk_score: 0,
                risk_band: RiskBand::None,
            },
        }
    }

    #[test]
    fn test_ranking_is_descending_and_stable() {
        let analyses = vec![
            analysis("a", 10, &[]),
            analysis("b", 50, &[]),
            analysis("c", 50, &[]),
            analysis("d", 5, &[]),
        ];
        let ranking = rank(&analyses);
        let ids: Vec<&str> = ranking.iter().map(|r| r.trace_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a", "d"]);
    }

    #[test]
    fn test_top_violation_is_most_frequent() {
        let a = analysis(
            "a",
            40,
            &[
                ViolationKind::MissingAccessLog,
                ViolationKind::PurposeViolation,
                ViolationKind::PurposeViolation,
            ],
        );
        let ranking = rank(&[a]);
        assert_eq!(ranking[0].top_violation, Some(ViolationKind::PurposeViolation));
        assert_eq!(ranking[0].num_violations, 3);
    }

    #[test]
    fn test_no_violations_yields_no_top() {
        let ranking = rank(&[analysis("a", 0, &[])]);
        assert_eq!(ranking[0].top_violation, None);
    }
}
