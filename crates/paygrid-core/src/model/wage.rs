//! Wage report rows and the moderation status enum.

#![allow(clippy::module_name_repetitions)]

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The three moderation states of a wage report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WageStatus {
    Pending,
    Approved,
    Rejected,
}

impl WageStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Returns `true` if reports in this status count toward the
    /// approved-report aggregates.
    #[must_use]
    pub const fn is_approved(self) -> bool {
        matches!(self, Self::Approved)
    }
}

impl fmt::Display for WageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown wage report status '{0}'")]
pub struct InvalidStatus(pub String);

impl FromStr for WageStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(InvalidStatus(other.to_string())),
        }
    }
}

/// A submitted wage observation.
///
/// `sanity_score` and the initial `status` are frozen at creation time from
/// the then-approved peer population; later peer drift never rescores an
/// existing row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WageReport {
    pub wage_id: i64,
    pub user_id: Option<i64>,
    pub location_id: Option<i64>,
    pub organization_id: Option<i64>,
    /// Normalized pay in smallest-currency-unit per hour.
    pub hourly_cents: i64,
    pub status: WageStatus,
    pub sanity_score: i32,
    pub is_deleted: bool,
    pub deleted_at_us: Option<i64>,
    pub created_at_us: i64,
    pub updated_at_us: i64,
}

/// Caller-supplied fields for a new wage report. Score and status are
/// assigned by the moderation pipeline before insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWageReport {
    pub user_id: Option<i64>,
    pub location_id: Option<i64>,
    pub organization_id: Option<i64>,
    pub hourly_cents: i64,
}

impl WageReport {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let status_text: String = row.get("status")?;
        let status = status_text.parse::<WageStatus>().map_err(|error| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(error),
            )
        })?;

        Ok(Self {
            wage_id: row.get("wage_id")?,
            user_id: row.get("user_id")?,
            location_id: row.get("location_id")?,
            organization_id: row.get("organization_id")?,
            hourly_cents: row.get("hourly_cents")?,
            status,
            sanity_score: row.get("sanity_score")?,
            is_deleted: row.get("is_deleted")?,
            deleted_at_us: row.get("deleted_at_us")?,
            created_at_us: row.get("created_at_us")?,
            updated_at_us: row.get("updated_at_us")?,
        })
    }

    /// Returns `true` if this report currently counts toward the
    /// approved-report aggregates.
    #[must_use]
    pub const fn counts_as_approved(&self) -> bool {
        self.status.is_approved() && !self.is_deleted
    }
}

const WAGE_COLUMNS: &str = "wage_id, user_id, location_id, organization_id, hourly_cents, \
     status, sanity_score, is_deleted, deleted_at_us, created_at_us, updated_at_us";

/// Fetch a wage report by id, including soft-deleted rows.
///
/// # Errors
///
/// Returns an error on database failure. A missing row is `Ok(None)`.
pub fn get_wage_report(conn: &Connection, wage_id: i64) -> Result<Option<WageReport>> {
    conn.query_row(
        &format!("SELECT {WAGE_COLUMNS} FROM wage_reports WHERE wage_id = ?1"),
        params![wage_id],
        WageReport::from_row,
    )
    .optional()
    .with_context(|| format!("get wage report {wage_id}"))
}

/// Count every report a user has ever submitted, regardless of status or
/// soft-deletion. Hard-deleted rows are gone and cannot count.
///
/// # Errors
///
/// Returns an error on database failure.
pub fn count_user_reports(conn: &Connection, user_id: i64) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM wage_reports WHERE user_id = ?1",
        params![user_id],
        |row| row.get(0),
    )
    .with_context(|| format!("count reports for user {user_id}"))
}
