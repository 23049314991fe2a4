#![forbid(unsafe_code)]
//! paygrid-moderation library.
//!
//! Classifies each newly submitted wage report as trustworthy or suspect
//! using robust statistics (median/MAD) over the approved peer population,
//! then keeps the per-place approved-report counters and the cache
//! versions exactly in sync with the report's approval status across its
//! whole lifecycle.
//!
//! # Conventions
//!
//! - **Errors**: `anyhow::Result` for store-level helpers, `thiserror`
//!   enums at the API surface.
//! - **Logging**: `tracing` macros (`debug!`, `warn!`).
//! - Scoring and credit awarding are best-effort: their failures are
//!   absorbed, never propagated to the submitting write.

pub mod config;
pub mod credit;
pub mod pipeline;
pub mod score;
pub mod stats;

pub use config::ModerationConfig;
pub use paygrid_core::model::wage::{NewWageReport, WageReport, WageStatus};
pub use credit::{CreditAwardFailed, CreditSink, LedgerCreditSink, NullCreditSink};
pub use pipeline::{ModerationError, ModerationPipeline};
pub use score::{bounds_score, classify_against, initial_status, sanity_score};
pub use stats::{Scope, ScopeStats, StatisticsUnavailable, scope_stats};
