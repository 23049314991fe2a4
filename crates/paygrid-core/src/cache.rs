//! Named monotonic cache versions.
//!
//! External read caches build their keys from these counters: bumping a
//! resource's version invalidates every cached listing for that resource
//! without explicit eviction calls. Versions only ever move forward — there
//! is no decrement — and consumers compare them solely for equality.
//!
//! The bump is a single upsert statement so that concurrent writers on the
//! same resource cannot lose an increment.

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};
use std::fmt;

/// The externally cached aggregate resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Industries,
    Organizations,
    Locations,
    Wages,
}

impl Resource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Industries => "industries",
            Self::Organizations => "organizations",
            Self::Locations => "locations",
            Self::Wages => "wages",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Atomically increment a resource's cache version, creating it at 0→1 if
/// absent.
///
/// # Errors
///
/// Returns an error on database failure.
pub fn bump(conn: &Connection, resource: Resource) -> Result<()> {
    conn.execute(
        "INSERT INTO cache_versions (resource, version) VALUES (?1, 1)
         ON CONFLICT(resource) DO UPDATE SET version = version + 1",
        params![resource.as_str()],
    )
    .with_context(|| format!("bump cache version for {resource}"))?;
    tracing::debug!(resource = %resource, "cache version bumped");
    Ok(())
}

/// Read a resource's current cache version; 0 when it has never been
/// bumped.
///
/// # Errors
///
/// Returns an error on database failure.
pub fn current(conn: &Connection, resource: Resource) -> Result<i64> {
    let version: Option<i64> = conn
        .query_row(
            "SELECT version FROM cache_versions WHERE resource = ?1",
            params![resource.as_str()],
            |row| row.get(0),
        )
        .optional()
        .with_context(|| format!("read cache version for {resource}"))?;
    Ok(version.unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    #[test]
    fn unbumped_resource_reads_zero() {
        let conn = db::open_in_memory().expect("open store");
        assert_eq!(current(&conn, Resource::Wages).expect("read"), 0);
    }

    #[test]
    fn first_bump_creates_at_one() {
        let conn = db::open_in_memory().expect("open store");
        bump(&conn, Resource::Industries).expect("bump");
        assert_eq!(current(&conn, Resource::Industries).expect("read"), 1);
    }

    #[test]
    fn versions_are_monotonic_per_resource() {
        let conn = db::open_in_memory().expect("open store");
        for _ in 0..5 {
            bump(&conn, Resource::Locations).expect("bump");
        }
        bump(&conn, Resource::Organizations).expect("bump");

        assert_eq!(current(&conn, Resource::Locations).expect("read"), 5);
        assert_eq!(current(&conn, Resource::Organizations).expect("read"), 1);
        assert_eq!(current(&conn, Resource::Wages).expect("read"), 0);
    }
}
