//! Trace risk scoring.
//!
//! Score = min(100, 5 * sum(weight(severity) * multiplier(risk_level)))
//! over the trace's recommendations. The scale saturates quickly on
//! purpose: a handful of critical findings should already read as high.

use veritrace_core::{Recommendation, RiskBand, RiskLevel, Severity};

fn severity_weight(severity: Option<Severity>) -> u32 {
    match severity {
        None | Some(Severity::Low) => 1,
        Some(Severity::Medium) => 3,
        Some(Severity::High) | Some(Severity::Critical) => 5,
    }
}

fn risk_multiplier(risk_level: RiskLevel) -> u32 {
    match risk_level {
        RiskLevel::Critical => 2,
        RiskLevel::Procedural | RiskLevel::Unknown => 1,
    }
}

/// Aggregate a recommendation set into a 0..=100 risk score.
pub fn compute_risk_score(recommendations: &[Recommendation]) -> u32 {
    let raw: u32 = recommendations
        .iter()
        .map(|rec| severity_weight(rec.severity) * risk_multiplier(rec.risk_level))
        .sum();
    raw.saturating_mul(5).min(100)
}

/// Band a score for reporting.
pub fn classify(score: u32) -> RiskBand {
    if score == 0 {
        RiskBand::None
    } else if score < 30 {
        RiskBand::Low
    } else if score < 70 {
        RiskBand::Medium
    } else {
        RiskBand::High
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veritrace_core::ViolationKind;

    fn rec(severity: Option<Severity>, risk_level: RiskLevel) -> Recommendation {
        Recommendation {
            violation: ViolationKind::PurposeViolation,
            severity,
            risk_level,
            title: String::new(),
            recommendation: String::new(),
            legal_reference: String::new(),
            suggested_events_order: None,
            time_constraint: None,
        }
    }

    #[test]
    fn test_empty_set_scores_zero() {
        assert_eq!(compute_risk_score(&[]), 0);
        assert_eq!(classify(0), RiskBand::None);
    }

    #[test]
    fn test_single_procedural_low() {
        // 1 * 1 * 5 = 5
        let score = compute_risk_score(&[rec(Some(Severity::Low), RiskLevel::Procedural)]);
        assert_eq!(score, 5);
        assert_eq!(classify(score), RiskBand::Low);
    }

    #[test]
    fn test_critical_high_saturates_fast() {
        // 5 * 2 * 5 = 50 per finding, capped at 100
        let recs = vec![rec(Some(Severity::High), RiskLevel::Critical); 3];
        assert_eq!(compute_risk_score(&recs), 100);
    }

    #[test]
    fn test_unknown_counts_as_minimum() {
        let score = compute_risk_score(&[rec(None, RiskLevel::Unknown)]);
        assert_eq!(score, 5);
    }

    #[test]
    fn test_classification_boundaries() {
        assert_eq!(classify(0), RiskBand::None);
        assert_eq!(classify(1), RiskBand::Low);
        assert_eq!(classify(29), RiskBand::Low);
        assert_eq!(classify(30), RiskBand::Medium);
        assert_eq!(classify(69), RiskBand::Medium);
        assert_eq!(classify(70), RiskBand::High);
        assert_eq!(classify(100), RiskBand::High);
    }
}
