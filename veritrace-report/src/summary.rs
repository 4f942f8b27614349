//! Global compliance summary over a batch of analyses.
//!
//! Technical violations and sticky-policy (governance) findings are
//! counted in separate sections: the former describe what went wrong in
//! the process, the latter point at organizational issues.

use std::collections::BTreeMap;

use veritrace_core::{Severity, ViolationKind};

use crate::engine::TraceAnalysis;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Overview {
    pub total_traces_analyzed: usize,
    pub traces_skipped: usize,
    pub traces_with_violations: usize,
    pub percentage_non_compliant: f64,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ViolationsAnalysis {
    pub total_violations: usize,
    pub average_violations_per_trace: f64,
    pub top_violations: Vec<(ViolationKind, usize)>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SeverityAnalysis {
    pub severity_distribution: BTreeMap<Severity, usize>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RiskScoring {
    pub average_risk_score: f64,
    pub max_risk_score: u32,
    pub risk_band_distribution: BTreeMap<String, usize>,
    /// Fixed scale legend: 0 none, 1-29 low, 30-69 medium, 70-100 high.
    pub risk_scale: BTreeMap<String, String>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct StickyPolicyAnalysis {
    pub total_policy_alerts: usize,
    pub top_policy_alerts: Vec<(ViolationKind, usize)>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Interpretation {
    pub main_risks: Vec<ViolationKind>,
    pub priority_action: String,
}

/// The full summary document.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Summary {
    pub overview: Overview,
    pub violations_analysis: ViolationsAnalysis,
    pub severity_analysis: SeverityAnalysis,
    pub risk_scoring: RiskScoring,
    pub sticky_policy_analysis: StickyPolicyAnalysis,
    pub interpretation: Interpretation,
}

const PRIORITY_ACTION: &str = "Prioritize mitigation of high and medium risk traces, focusing \
     especially on consent management, restriction periods and breach \
     notification deadlines. Sticky-policy alerts indicate structural or \
     governance-level risks that may require organizational actions \
     beyond process remediation.";

/// Aggregate a batch of analyses into the global summary.
///
/// An empty batch yields a summary full of zeros, never a division fault.
pub fn summarize(analyses: &[TraceAnalysis], skipped: usize, top_n: usize) -> Summary {
    let total = analyses.len();

    let mut violation_counts: BTreeMap<ViolationKind, usize> = BTreeMap::new();
    let mut severity_counts: BTreeMap<Severity, usize> = BTreeMap::new();
    let mut policy_counts: BTreeMap<ViolationKind, usize> = BTreeMap::new();
    let mut band_counts: BTreeMap<String, usize> = BTreeMap::new();

    let mut traces_with_violations = 0;
    let mut technical_total = 0usize;
    let mut score_sum = 0u64;
    let mut max_score = 0u32;

    for analysis in analyses {
        let mut technical_here = 0usize;
        for v in &analysis.violations {
            if v.kind.is_policy_alert() {
                *policy_counts.entry(v.kind).or_default() += 1;
            } else {
                *violation_counts.entry(v.kind).or_default() += 1;
                *severity_counts.entry(v.severity).or_default() += 1;
                technical_here += 1;
            }
        }
        if technical_here > 0 {
            traces_with_violations += 1;
            technical_total += technical_here;
        }

        score_sum += u64::from(analysis.risk_score);
        max_score = max_score.max(analysis.risk_score);
        *band_counts.entry(analysis.risk_band.label().to_string()).or_default() += 1;
    }

    let percentage_non_compliant = if total > 0 {
        round2(traces_with_violations as f64 / total as f64 * 100.0)
    } else {
        0.0
    };
    let average_violations_per_trace = if traces_with_violations > 0 {
        round2(technical_total as f64 / traces_with_violations as f64)
    } else {
        0.0
    };
    let average_risk_score =
        if total > 0 { round2(score_sum as f64 / total as f64) } else { 0.0 };

    Summary {
        overview: Overview {
            total_traces_analyzed: total,
            traces_skipped: skipped,
            traces_with_violations,
            percentage_non_compliant,
        },
        violations_analysis: ViolationsAnalysis {
            total_violations: violation_counts.values().sum(),
            average_violations_per_trace,
            top_violations: top_of(&violation_counts, top_n),
        },
        severity_analysis: SeverityAnalysis { severity_distribution: severity_counts },
        risk_scoring: RiskScoring {
            average_risk_score,
            max_risk_score: max_score,
            risk_band_distribution: band_counts,
            risk_scale: risk_scale(),
        },
        sticky_policy_analysis: StickyPolicyAnalysis {
            total_policy_alerts: policy_counts.values().sum(),
            top_policy_alerts: top_of(&policy_counts, top_n),
        },
        interpretation: Interpretation {
            main_risks: top_of(&violation_counts, 3).into_iter().map(|(k, _)| k).collect(),
            priority_action: PRIORITY_ACTION.into(),
        },
    }
}

fn top_of(counts: &BTreeMap<ViolationKind, usize>, n: usize) -> Vec<(ViolationKind, usize)> {
    let mut entries: Vec<(ViolationKind, usize)> =
        counts.iter().map(|(&k, &c)| (k, c)).collect();
    entries.sort_by_key(|&(_, count)| std::cmp::Reverse(count));
    entries.truncate(n);
    entries
}

fn risk_scale() -> BTreeMap<String, String> {
    [("0", "none"), ("1-29", "low"), ("30-69", "medium"), ("70-100", "high")]
        .into_iter()
        .map(|(range, band)| (range.to_string(), band.to_string()))
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
