//! # Veritrace Policy — sticky-policy reconstruction
//!
//! Rebuilds the normative state of a personal datum from its trace in one
//! forward scan. Pure and deterministic: the same trace always yields the
//! same policy, and nothing here touches the trace itself.

pub mod builder;

pub use builder::build_sticky_policy;
