//! # Veritrace Report — end-to-end analysis and aggregation
//!
//! The engine drives the full per-trace pipeline (policy reconstruction,
//! validation, recommendation, scoring, simulated remediation,
//! revalidation) and the batch loop with per-trace fault isolation. On
//! top of it: ranking by risk, the global compliance summary, and the
//! per-trace audit report.

pub mod audit;
pub mod engine;
pub mod ranking;
pub mod summary;

pub use audit::{audit_trace, AuditFinding, AuditReport, FindingCategory};
pub use engine::{analyze, analyze_log, BatchFailure, BatchReport, PostRemediation, TraceAnalysis};
pub use ranking::{rank, RankEntry};
pub use summary::{summarize, Summary};
