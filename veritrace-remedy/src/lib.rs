//! # Veritrace Remedy — simulated trace correction
//!
//! Applies the fix associated with each recommendation to a copy of the
//! trace: reordering consent, clearing unlawful accesses, inserting the
//! synthetic events a compliant trace would have had. The input trace is
//! never mutated; the corrected copy is re-sorted, marked `remediated`
//! and gets a freshly rebuilt sticky policy.
//!
//! This is a what-if tool. It shows the minimal event-level changes that
//! would have made the trace compliant; it does not touch any real data.

mod fixes;

use tracing::debug;
use veritrace_core::{Recommendation, Trace, ViolationKind};
use veritrace_policy::build_sticky_policy;

/// Produce a corrected copy of `trace` for the given recommendations.
pub fn apply(trace: &Trace, recommendations: &[Recommendation]) -> Trace {
    let mut fixed = trace.clone();

    for rec in recommendations {
        apply_fix(&mut fixed, rec.violation);
    }

    fixed.sort_by_time();
    fixed.remediated = true;
    fixed.compliant = None;
    fixed.risk_score = None;
    fixed.risk_band = None;
    fixed.policy = Some(build_sticky_policy(&fixed));
    debug!(trace_id = %fixed.id, fixes = recommendations.len(), "remediation applied");
    fixed
}

fn apply_fix(trace: &mut Trace, kind: ViolationKind) {
    use ViolationKind as K;

    match kind {
        K::ConsentAfterAccess => fixes::reorder_consent(trace),
        K::MissingConsent | K::AccessWithoutConsent => fixes::insert_initial_consent(trace),
        K::ImplicitConsent => fixes::force_explicit_consent(trace),
        K::AccessAfterWithdrawal => fixes::clear_access_after(trace, fixes::Cutoff::Withdrawal),
        K::AccessAfterConsentExpiration => {
            fixes::clear_access_after(trace, fixes::Cutoff::ConsentExpiry)
        }
        K::AccessDuringRestriction => fixes::clear_access_during_restriction(trace),
        K::AccessAfterErasure => fixes::clear_access_after(trace, fixes::Cutoff::Erasure),
        K::PurposeViolation => fixes::reset_purpose(trace),
        K::DataMinimizationViolation => fixes::reset_scope(trace),
        K::AccessWithoutPermission => fixes::insert_permission_grants(trace),
        K::MissingBreachNotification | K::LateBreachNotification => {
            fixes::insert_breach_notifications(trace)
        }
        K::MissingRightResponse => fixes::insert_right_responses(trace),
        K::LateRightResponse => fixes::retime_late_responses(trace),

        // No event-level fix exists for these; they require process or
        // contract changes outside the trace.
        K::EraseWithoutProcessing
        | K::AccessLogWithoutAccess
        | K::MissingAccessLog
        | K::SpMissingConsentTimestamp
        | K::SpConsentExpiredWithoutConsent
        | K::SpInvalidStateAfterErasure
        | K::SpRetentionViolation
        | K::SpPurposeViolation
        | K::SpAccessAfterErasure
        | K::SpAccessDuringRestriction
        | K::SpAccessAfterConsentExpiration
        | K::SpMissingAccessLog
        | K::SpThirdPartyWithoutConsent
        | K::SpThirdPartyAfterErasure
        | K::SpThirdPartyNotNotifiedOfErasure
        | K::SpThirdPartyMissingLegalBasis
        | K::SpProcessorWithOwnLegalBasis
        | K::SpIllegalInternationalTransfer
        | K::SpThirdPartyRetentionViolation
        | K::SpThirdPartyPermissionEscalation
        | K::SpThirdPartyPurposeViolation
        | K::SpErasureEnforcementPending
        | K::SpRestrictionActive
        | K::SpConsentExpired => {}
    }
}
