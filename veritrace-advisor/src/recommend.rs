//! Recommendation generation.
//!
//! Total over the violation taxonomy: a kind the catalogue does not know
//! still yields a generic recommendation instead of being dropped.

use veritrace_core::{Recommendation, RiskLevel, StickyPolicy, Violation, ViolationKind};

use crate::catalog::Catalog;

/// One recommendation per violation, catalogue-backed where possible.
pub fn generate(violations: &[Violation]) -> Vec<Recommendation> {
    let catalog = Catalog::global();
    violations.iter().map(|v| recommendation_for(catalog, v.kind)).collect()
}

/// Advisories derived from the policy state itself, independent of any
/// detected violation.
pub fn generate_from_policy(sp: &StickyPolicy) -> Vec<Recommendation> {
    let catalog = Catalog::global();
    let mut recommendations = Vec::new();

    if sp.erased {
        recommendations
            .push(recommendation_for(catalog, ViolationKind::SpErasureEnforcementPending));
    }
    if sp.processing_restricted {
        recommendations.push(recommendation_for(catalog, ViolationKind::SpRestrictionActive));
    }
    if sp.consent_expired {
        recommendations.push(recommendation_for(catalog, ViolationKind::SpConsentExpired));
    }

    recommendations
}

fn recommendation_for(catalog: &Catalog, kind: ViolationKind) -> Recommendation {
    match catalog.get(kind) {
        Some(entry) => Recommendation {
            violation: kind,
            severity: Some(entry.severity),
            risk_level: entry.risk_level,
            title: entry.title.clone(),
            recommendation: entry.recommendation.clone(),
            legal_reference: entry.legal_reference.clone(),
            suggested_events_order: entry.suggested_events_order.clone(),
            time_constraint: entry.time_constraint.clone(),
        },
        None => Recommendation {
            violation: kind,
            severity: None,
            risk_level: RiskLevel::Unknown,
            title: "Compliance violation detected".into(),
            recommendation: "A possible GDPR violation was detected. Review the \
                             event sequence and the applicable legal requirements."
                .into(),
            legal_reference: "GDPR (general)".into(),
            suggested_events_order: None,
            time_constraint: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veritrace_core::{Severity, Violation};

    fn violation(kind: ViolationKind) -> Violation {
        Violation::new(kind, Severity::Medium, "test", vec![])
    }

    #[test]
    fn test_catalogued_kind_uses_entry() {
        let recs = generate(&[violation(ViolationKind::ConsentAfterAccess)]);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].violation, ViolationKind::ConsentAfterAccess);
        assert_eq!(recs[0].severity, Some(Severity::High));
        assert_eq!(recs[0].risk_level, RiskLevel::Critical);
        assert_eq!(recs[0].legal_reference, "Art. 6 and Art. 7 GDPR");
        assert!(recs[0].suggested_events_order.is_some());
    }

    #[test]
    fn test_unknown_kind_falls_back_to_generic() {
        let empty = Catalog::default();
        let rec = recommendation_for(&empty, ViolationKind::ImplicitConsent);
        assert_eq!(rec.severity, None);
        assert_eq!(rec.risk_level, RiskLevel::Unknown);
        assert_eq!(rec.legal_reference, "GDPR (general)");
        assert!(rec.suggested_events_order.is_none());
    }

    #[test]
    fn test_one_recommendation_per_violation() {
        let recs = generate(&[
            violation(ViolationKind::ConsentAfterAccess),
            violation(ViolationKind::ConsentAfterAccess),
            violation(ViolationKind::LateBreachNotification),
        ]);
        assert_eq!(recs.len(), 3);
    }

    #[test]
    fn test_policy_advisories_track_state() {
        let mut sp = StickyPolicy::new("t");
        assert!(generate_from_policy(&sp).is_empty());

        sp.erased = true;
        sp.processing_restricted = true;
        sp.consent_expired = true;
        let kinds: Vec<_> = generate_from_policy(&sp).into_iter().map(|r| r.violation).collect();
        assert_eq!(
            kinds,
            vec![
                ViolationKind::SpErasureEnforcementPending,
                ViolationKind::SpRestrictionActive,
                ViolationKind::SpConsentExpired,
            ]
        );
    }
}
