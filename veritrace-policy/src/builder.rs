//! Single-scan sticky-policy builder.
//!
//! Input must be chronologically sorted (caller responsibility). Event
//! kinds with no normative meaning are skipped, not errors.

use veritrace_core::policy::{AccessRecord, ThirdPartyPolicy, OBLIGATION_LOG_ACCESS};
use veritrace_core::{Event, EventKind, StickyPolicy, Trace, SECS_PER_DAY};

const UNSPECIFIED_PURPOSE: &str = "unspecified";

/// Reconstruct the sticky policy for one trace.
pub fn build_sticky_policy(trace: &Trace) -> StickyPolicy {
    let mut sp = StickyPolicy::new(trace.id.clone());
    sp.owner = trace.context.data_subject.clone();
    sp.controller = trace.context.data_controller.clone();

    for event in &trace.events {
        apply_event(&mut sp, event);
    }

    sp
}

fn apply_event(sp: &mut StickyPolicy, event: &Event) {
    match event.kind {
        EventKind::GiveConsent => {
            sp.consent_given = true;
            sp.consent_timestamp = Some(event.timestamp);
            sp.purposes
                .insert(event.purpose.clone().unwrap_or_else(|| UNSPECIFIED_PURPOSE.into()));
            sp.obligations.insert(OBLIGATION_LOG_ACCESS.into());
            if let Some(days) = event.max_time_days {
                sp.consent_expiration_timestamp = Some(event.timestamp + days * SECS_PER_DAY);
            }
        }
        EventKind::ConsentExpired => {
            sp.consent_expired = true;
            sp.consent_expiration_timestamp = Some(event.timestamp);
        }
        EventKind::SendData => {
            // Retention commitment made when the data leaves the controller.
            if let Some(days) = event.max_time_days {
                sp.max_retention_time = Some(event.timestamp + days * SECS_PER_DAY);
            }
        }
        EventKind::RestrictProcessing => sp.processing_restricted = true,
        EventKind::LiftRestriction => sp.processing_restricted = false,
        EventKind::EraseData => {
            sp.erased = true;
            sp.erasure_timestamp = Some(event.timestamp);
            // Erasure propagates: every third party is deactivated and
            // counts as notified of the erasure.
            for tp in sp.third_parties.values_mut() {
                tp.active = false;
                tp.notified_of_erasure = true;
            }
        }
        EventKind::ShareWithThirdParty => share_with_third_party(sp, event),
        EventKind::RevokeThirdParty => {
            if let Some(name) = &event.third_party {
                if let Some(tp) = sp.third_parties.get_mut(name) {
                    tp.active = false;
                }
            }
        }
        _ => {}
    }

    if let Some(mode) = event.access {
        sp.permissions.insert(mode.label().into());
        sp.access_history.push(AccessRecord {
            timestamp: event.timestamp,
            access: mode.label().into(),
            purpose: event.purpose.clone(),
            actor: event.actor.clone(),
            activity: event.kind.label().into(),
        });
    }
}

fn share_with_third_party(sp: &mut StickyPolicy, event: &Event) {
    let Some(name) = &event.third_party else { return };
    let terms = event.sharing.clone().unwrap_or_else(veritrace_core::SharingTerms::processor);

    let tp = sp.third_parties.entry(name.clone()).or_insert_with(|| ThirdPartyPolicy {
        data_id: sp.data_id.clone(),
        role: terms.role,
        purposes: Default::default(),
        permissions: Default::default(),
        active: false,
        shared_at: event.timestamp,
        retention_until: None,
        country: None,
        transfer_mechanism: None,
        legal_basis: None,
        own_legal_basis: false,
        notified_of_erasure: false,
    });

    tp.role = terms.role;
    tp.active = true;
    tp.shared_at = event.timestamp;
    tp.retention_until = terms.retention_days.map(|d| event.timestamp + d * SECS_PER_DAY);
    tp.country = terms.country;
    tp.transfer_mechanism = terms.transfer_mechanism;
    tp.legal_basis = terms.legal_basis;
    tp.own_legal_basis = terms.own_legal_basis;
    tp.permissions.extend(terms.permissions);
    if let Some(purpose) = &event.purpose {
        tp.purposes.insert(purpose.clone());
    }
}
