//! Robust statistics over approved wage reports.
//!
//! For a scope (location or organization), the moderation pipeline needs
//! `count`, `median`, and `MAD` (median absolute deviation) of the
//! currently-approved, not-deleted reports. The population is fetched with
//! one query per scope and the statistics are computed here; the report
//! being scored is not yet persisted, so it is never part of its own peer
//! population.

#![allow(clippy::module_name_repetitions, clippy::cast_precision_loss)]

use anyhow::Context as AnyhowContext;
use rusqlite::{Connection, params};
use std::fmt;

/// A peer-population scope for statistics retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Location(i64),
    Organization(i64),
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Location(id) => write!(f, "location {id}"),
            Self::Organization(id) => write!(f, "organization {id}"),
        }
    }
}

/// Robust statistics of a scope's approved population.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeStats {
    pub count: usize,
    pub median: f64,
    pub mad: f64,
}

/// Transient failure retrieving scope statistics.
///
/// The scorer recovers from this locally with a neutral score; it never
/// blocks a submission from being persisted.
#[derive(Debug, thiserror::Error)]
#[error("statistics unavailable for {scope}: {source}")]
pub struct StatisticsUnavailable {
    pub scope: Scope,
    #[source]
    pub source: anyhow::Error,
}

/// Compute `count`/`median`/`MAD` over the currently-approved, not-deleted
/// reports in `scope`.
///
/// # Errors
///
/// Returns [`StatisticsUnavailable`] on any retrieval failure.
pub fn scope_stats(conn: &Connection, scope: Scope) -> Result<ScopeStats, StatisticsUnavailable> {
    fetch_values(conn, scope)
        .map(|values| compute_stats(&values))
        .map_err(|source| StatisticsUnavailable { scope, source })
}

fn fetch_values(conn: &Connection, scope: Scope) -> anyhow::Result<Vec<i64>> {
    let (sql, id) = match scope {
        Scope::Location(id) => (
            "SELECT hourly_cents FROM wage_reports
             WHERE location_id = ?1 AND status = 'approved' AND is_deleted = 0",
            id,
        ),
        Scope::Organization(id) => (
            "SELECT hourly_cents FROM wage_reports
             WHERE organization_id = ?1 AND status = 'approved' AND is_deleted = 0",
            id,
        ),
    };

    let mut stmt = conn.prepare(sql).context("prepare scope query")?;
    let values = stmt
        .query_map(params![id], |row| row.get(0))
        .context("query scope population")?
        .collect::<rusqlite::Result<Vec<i64>>>()
        .with_context(|| format!("fetch approved wages for {scope}"))?;
    Ok(values)
}

fn compute_stats(values: &[i64]) -> ScopeStats {
    if values.is_empty() {
        return ScopeStats {
            count: 0,
            median: 0.0,
            mad: 0.0,
        };
    }

    let mut as_f64: Vec<f64> = values.iter().map(|&v| v as f64).collect();
    let median = median_in_place(&mut as_f64);

    let mut deviations: Vec<f64> = values
        .iter()
        .map(|&v| (v as f64 - median).abs())
        .collect();
    let mad = median_in_place(&mut deviations);

    ScopeStats {
        count: values.len(),
        median,
        mad,
    }
}

/// Median of a non-empty slice; sorts in place. Even-sized populations get
/// the mean of the two middle values.
fn median_in_place(values: &mut [f64]) -> f64 {
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paygrid_core::db;

    fn seed_location(conn: &Connection) -> i64 {
        conn.execute(
            "INSERT INTO locations (name, created_at_us, updated_at_us) VALUES ('Salem', 1, 1)",
            [],
        )
        .expect("insert location");
        conn.last_insert_rowid()
    }

    fn insert_report(conn: &Connection, location_id: i64, cents: i64, status: &str, deleted: bool) {
        conn.execute(
            "INSERT INTO wage_reports (
                location_id, hourly_cents, status, sanity_score,
                is_deleted, created_at_us, updated_at_us
             ) VALUES (?1, ?2, ?3, 0, ?4, 1, 1)",
            params![location_id, cents, status, deleted],
        )
        .expect("insert report");
    }

    #[test]
    fn empty_scope_has_zero_stats() {
        let conn = db::open_in_memory().expect("open store");
        let location = seed_location(&conn);

        let stats = scope_stats(&conn, Scope::Location(location)).expect("stats");
        assert_eq!(stats.count, 0);
        assert!(stats.median.abs() < f64::EPSILON);
        assert!(stats.mad.abs() < f64::EPSILON);
    }

    #[test]
    fn odd_population_uses_middle_value() {
        let conn = db::open_in_memory().expect("open store");
        let location = seed_location(&conn);
        for cents in [1_500, 1_600, 1_700] {
            insert_report(&conn, location, cents, "approved", false);
        }

        let stats = scope_stats(&conn, Scope::Location(location)).expect("stats");
        assert_eq!(stats.count, 3);
        assert!((stats.median - 1_600.0).abs() < f64::EPSILON);
        assert!((stats.mad - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn even_population_averages_middles() {
        let conn = db::open_in_memory().expect("open store");
        let location = seed_location(&conn);
        for cents in [1_000, 1_200, 1_400, 2_000] {
            insert_report(&conn, location, cents, "approved", false);
        }

        let stats = scope_stats(&conn, Scope::Location(location)).expect("stats");
        assert_eq!(stats.count, 4);
        assert!((stats.median - 1_300.0).abs() < f64::EPSILON);
    }

    #[test]
    fn pending_and_deleted_reports_are_excluded() {
        let conn = db::open_in_memory().expect("open store");
        let location = seed_location(&conn);
        insert_report(&conn, location, 1_500, "approved", false);
        insert_report(&conn, location, 9_000, "pending", false);
        insert_report(&conn, location, 9_500, "rejected", false);
        insert_report(&conn, location, 9_900, "approved", true);

        let stats = scope_stats(&conn, Scope::Location(location)).expect("stats");
        assert_eq!(stats.count, 1);
        assert!((stats.median - 1_500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn identical_values_have_zero_mad() {
        let conn = db::open_in_memory().expect("open store");
        let location = seed_location(&conn);
        for _ in 0..4 {
            insert_report(&conn, location, 1_600, "approved", false);
        }

        let stats = scope_stats(&conn, Scope::Location(location)).expect("stats");
        assert!(stats.mad.abs() < f64::EPSILON);
    }

    #[test]
    fn missing_schema_surfaces_statistics_unavailable() {
        let conn = Connection::open_in_memory().expect("raw connection");
        let err = scope_stats(&conn, Scope::Location(1)).expect_err("no schema");
        assert!(err.to_string().contains("location 1"));
    }
}
