//! Typed row models and query helpers for the paygrid store.
//!
//! All query helpers take a shared `&Connection` and return typed structs
//! (never raw rows), following the store access conventions in
//! [`crate::db`].

pub mod industry;
pub mod place;
pub mod wage;

pub use industry::{Industry, NewIndustry};
pub use place::{Location, Organization};
pub use wage::{NewWageReport, WageReport, WageStatus};

use chrono::Utc;

/// Current wall-clock time in microseconds since the UNIX epoch.
#[must_use]
pub fn now_us() -> i64 {
    Utc::now().timestamp_micros()
}
