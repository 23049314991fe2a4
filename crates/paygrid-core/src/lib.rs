#![forbid(unsafe_code)]
//! paygrid-core library.
//!
//! Store access, typed models, the industry taxonomy engine, and the
//! cache-version registry. The moderation pipeline builds on this crate.
//!
//! # Conventions
//!
//! - **Errors**: domain enums via `thiserror`; store-level failures carry
//!   `anyhow` context. Every surfaced error maps to a stable
//!   [`error::ErrorCode`].
//! - **Logging**: `tracing` macros (`debug!`, `warn!`).
//! - **Transactions**: write drivers own their transaction
//!   (`BEGIN IMMEDIATE`); validation helpers borrow the caller's
//!   connection and never commit.

pub mod cache;
pub mod db;
pub mod error;
pub mod model;
pub mod taxonomy;

pub use cache::Resource;
pub use error::ErrorCode;
pub use model::{Industry, NewIndustry, NewWageReport, WageReport, WageStatus};
pub use taxonomy::{IndustryChange, ParentChange, TaxonomyError};
