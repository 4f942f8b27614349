//! Per-trace audit report.

use veritrace_core::{RiskBand, Severity, ViolationKind};

use crate::engine::TraceAnalysis;

/// Whether a finding is a process violation or a governance alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingCategory {
    Violation,
    PolicyAlert,
}

/// One line of the audit findings list.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AuditFinding {
    pub category: FindingCategory,
    pub violation: ViolationKind,
    pub severity: Severity,
    pub message: String,
    pub num_events: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_action: Option<String>,
}

/// Audit document for one analyzed trace.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AuditReport {
    pub trace_id: String,
    pub risk_score: u32,
    pub risk_band: RiskBand,
    pub findings: Vec<AuditFinding>,
    pub overall_assessment: String,
}

const GOVERNANCE_ACTION: &str = "Organizational or governance action required";

/// Build the audit report for one analysis.
pub fn audit_trace(analysis: &TraceAnalysis) -> AuditReport {
    let mut findings = Vec::with_capacity(analysis.violations.len());

    for violation in &analysis.violations {
        let legal_reference = analysis
            .recommendations
            .iter()
            .find(|r| r.violation == violation.kind)
            .map(|r| r.legal_reference.clone());

        if violation.kind.is_policy_alert() {
            findings.push(AuditFinding {
                category: FindingCategory::PolicyAlert,
                violation: violation.kind,
                severity: violation.severity,
                message: violation.message.clone(),
                num_events: violation.events.len(),
                legal_reference,
                recommended_action: Some(GOVERNANCE_ACTION.into()),
            });
        } else {
            findings.push(AuditFinding {
                category: FindingCategory::Violation,
                violation: violation.kind,
                severity: violation.severity,
                message: violation.message.clone(),
                num_events: violation.events.len(),
                legal_reference,
                recommended_action: None,
            });
        }
    }

    AuditReport {
        trace_id: analysis.trace_id.clone(),
        risk_score: analysis.risk_score,
        risk_band: analysis.risk_band,
        findings,
        overall_assessment: assessment(analysis.risk_band).into(),
    }
}

fn assessment(band: RiskBand) -> &'static str {
    match band {
        RiskBand::None => "No compliance issues detected.",
        RiskBand::Low => "Low compliance risk. Minor improvements recommended.",
        RiskBand::Medium => "Moderate compliance risk. Corrective actions advised.",
        RiskBand::High => "High compliance risk. Immediate corrective actions required.",
    }
}
