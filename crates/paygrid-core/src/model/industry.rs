//! Industry tree rows.

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::{Deserialize, Serialize};

/// A node in the industry category tree.
///
/// `depth` and `path` are derived columns owned by the taxonomy engine:
/// they are computed on every insert/update and cascaded to descendants,
/// never accepted from callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Industry {
    pub industry_id: i64,
    pub parent_id: Option<i64>,
    pub slug: String,
    pub name: String,
    pub depth: i64,
    pub path: String,
    pub created_at_us: i64,
    pub updated_at_us: i64,
}

/// Caller-supplied fields for a new industry. Derived fields are filled in
/// by the taxonomy engine before the row is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIndustry {
    pub parent_id: Option<i64>,
    pub slug: String,
    pub name: String,
}

impl Industry {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            industry_id: row.get("industry_id")?,
            parent_id: row.get("parent_id")?,
            slug: row.get("slug")?,
            name: row.get("name")?,
            depth: row.get("depth")?,
            path: row.get("path")?,
            created_at_us: row.get("created_at_us")?,
            updated_at_us: row.get("updated_at_us")?,
        })
    }

    /// Returns `true` if this node has no parent.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

const INDUSTRY_COLUMNS: &str =
    "industry_id, parent_id, slug, name, depth, path, created_at_us, updated_at_us";

/// Fetch an industry by id.
///
/// # Errors
///
/// Returns an error on database failure. A missing row is `Ok(None)`.
pub fn get_industry(conn: &Connection, industry_id: i64) -> Result<Option<Industry>> {
    conn.query_row(
        &format!("SELECT {INDUSTRY_COLUMNS} FROM industries WHERE industry_id = ?1"),
        params![industry_id],
        Industry::from_row,
    )
    .optional()
    .with_context(|| format!("get industry {industry_id}"))
}

/// Fetch the direct children of an industry.
///
/// # Errors
///
/// Returns an error on database failure.
pub fn get_children(conn: &Connection, industry_id: i64) -> Result<Vec<Industry>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {INDUSTRY_COLUMNS} FROM industries WHERE parent_id = ?1 ORDER BY slug"
        ))
        .context("prepare children query")?;
    let rows = stmt
        .query_map(params![industry_id], Industry::from_row)
        .context("query children")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| format!("map children of industry {industry_id}"))?;
    Ok(rows)
}
