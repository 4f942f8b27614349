//! # Veritrace Advisor — remediation guidance and risk scoring
//!
//! Three concerns:
//! - the recommendation catalogue: a versionable table mapping violation
//!   kinds to legal guidance, built in but overridable from TOML
//! - recommendation generation from detected violations and from the
//!   sticky-policy state
//! - the 0..=100 risk score and its band classification

pub mod catalog;
pub mod recommend;
pub mod scoring;

pub use catalog::{Catalog, CatalogEntry};
pub use recommend::{generate, generate_from_policy};
pub use scoring::{classify, compute_risk_score};
