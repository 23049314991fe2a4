//! Location and organization rows with their approved-report counters.
//!
//! The `approved_wage_count` columns are owned by the moderation pipeline
//! and mutated only through the atomic adjustment helpers in this module.
//! Each helper is a single SQL statement, so concurrent approvals and
//! rejections on the same place never lose updates; the decrement is
//! floored at zero by the statement itself.

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::{Deserialize, Serialize};

/// A workplace location aggregate row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub location_id: i64,
    pub name: String,
    pub approved_wage_count: i64,
    pub created_at_us: i64,
    pub updated_at_us: i64,
}

/// An employer organization aggregate row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub organization_id: i64,
    pub name: String,
    pub approved_wage_count: i64,
    pub created_at_us: i64,
    pub updated_at_us: i64,
}

impl Location {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            location_id: row.get("location_id")?,
            name: row.get("name")?,
            approved_wage_count: row.get("approved_wage_count")?,
            created_at_us: row.get("created_at_us")?,
            updated_at_us: row.get("updated_at_us")?,
        })
    }
}

impl Organization {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            organization_id: row.get("organization_id")?,
            name: row.get("name")?,
            approved_wage_count: row.get("approved_wage_count")?,
            created_at_us: row.get("created_at_us")?,
            updated_at_us: row.get("updated_at_us")?,
        })
    }
}

/// Fetch a location by id.
///
/// # Errors
///
/// Returns an error on database failure. A missing row is `Ok(None)`.
pub fn get_location(conn: &Connection, location_id: i64) -> Result<Option<Location>> {
    conn.query_row(
        "SELECT location_id, name, approved_wage_count, created_at_us, updated_at_us
         FROM locations WHERE location_id = ?1",
        params![location_id],
        Location::from_row,
    )
    .optional()
    .with_context(|| format!("get location {location_id}"))
}

/// Fetch an organization by id.
///
/// # Errors
///
/// Returns an error on database failure. A missing row is `Ok(None)`.
pub fn get_organization(conn: &Connection, organization_id: i64) -> Result<Option<Organization>> {
    conn.query_row(
        "SELECT organization_id, name, approved_wage_count, created_at_us, updated_at_us
         FROM organizations WHERE organization_id = ?1",
        params![organization_id],
        Organization::from_row,
    )
    .optional()
    .with_context(|| format!("get organization {organization_id}"))
}

/// Atomically increment a location's approved-report counter.
///
/// # Errors
///
/// Returns an error on database failure.
pub fn increment_location_count(conn: &Connection, location_id: i64) -> Result<()> {
    conn.execute(
        "UPDATE locations
         SET approved_wage_count = approved_wage_count + 1
         WHERE location_id = ?1",
        params![location_id],
    )
    .with_context(|| format!("increment approved count for location {location_id}"))?;
    Ok(())
}

/// Atomically decrement a location's approved-report counter, floored at 0.
///
/// # Errors
///
/// Returns an error on database failure.
pub fn decrement_location_count(conn: &Connection, location_id: i64) -> Result<()> {
    conn.execute(
        "UPDATE locations
         SET approved_wage_count = MAX(approved_wage_count - 1, 0)
         WHERE location_id = ?1",
        params![location_id],
    )
    .with_context(|| format!("decrement approved count for location {location_id}"))?;
    Ok(())
}

/// Atomically increment an organization's approved-report counter.
///
/// # Errors
///
/// Returns an error on database failure.
pub fn increment_organization_count(conn: &Connection, organization_id: i64) -> Result<()> {
    conn.execute(
        "UPDATE organizations
         SET approved_wage_count = approved_wage_count + 1
         WHERE organization_id = ?1",
        params![organization_id],
    )
    .with_context(|| format!("increment approved count for organization {organization_id}"))?;
    Ok(())
}

/// Atomically decrement an organization's approved-report counter, floored
/// at 0.
///
/// # Errors
///
/// Returns an error on database failure.
pub fn decrement_organization_count(conn: &Connection, organization_id: i64) -> Result<()> {
    conn.execute(
        "UPDATE organizations
         SET approved_wage_count = MAX(approved_wage_count - 1, 0)
         WHERE organization_id = ?1",
        params![organization_id],
    )
    .with_context(|| format!("decrement approved count for organization {organization_id}"))?;
    Ok(())
}
