//! # Veritrace Core — shared data model for the GDPR trace auditor
//!
//! Every analysis layer links against this crate. It holds the structured
//! event/trace model, the closed event vocabulary, the exhaustive violation
//! taxonomy, and the recommendation/risk types exchanged between layers.

pub mod error;
pub mod event;
pub mod policy;
pub mod trace;
pub mod types;

pub use error::{VeritraceError, VeritraceResult};
pub use event::{Event, SharingTerms};
pub use policy::{AccessRecord, StickyPolicy, ThirdPartyPolicy, OBLIGATION_LOG_ACCESS};
pub use trace::{Trace, TraceContext};
pub use types::{
    AccessMode, DataScope, EventKind, Recommendation, RiskBand, RiskLevel, Severity,
    ThirdPartyRole, Violation, ViolationKind, ViolationNote,
};

/// Art. 33 GDPR — breach notification window (72 hours, boundary inclusive).
pub const BREACH_NOTIFICATION_WINDOW_SECS: i64 = 72 * 3600;

/// Art. 12 GDPR — data subject rights response window (30 days, boundary inclusive).
pub const RIGHT_RESPONSE_WINDOW_SECS: i64 = 30 * 86_400;

pub const SECS_PER_DAY: i64 = 86_400;
