//! Materialized depth/path computation and descendant cascade.
//!
//! Every industry row carries two derived columns: `depth` (root = 0) and
//! `path` (slash-joined slug chain from root to self). They are computed
//! here on every insert, on every update that touches `parent_id` or
//! `slug`, and re-derived for the whole descendant subtree when a node's
//! identity changes.
//!
//! The cascade fetches the entire subtree with a single recursive CTE
//! rather than one query per node, then rewrites each descendant's derived
//! columns from its parent's fresh value in the batch. Descendants' own
//! `parent_id`/`slug` are untouched, so the insert/update validation path
//! is deliberately bypassed for them.

use anyhow::Context as AnyhowContext;
use rusqlite::{Connection, params};
use std::collections::HashMap;

use super::TaxonomyError;
use crate::model::industry::{Industry, get_industry};

/// Engine-computed placement of a node: its derived columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub depth: i64,
    pub path: String,
}

/// Compute depth/path for a node from its parent reference and slug.
///
/// Roots get `depth = 0, path = slug`; non-roots get
/// `depth = parent.depth + 1, path = parent.path + "/" + slug`.
///
/// # Errors
///
/// Returns [`TaxonomyError::ParentNotFound`] if `parent_id` references a
/// missing row, or [`TaxonomyError::Db`] on database failure.
pub fn resolve_placement(
    conn: &Connection,
    parent_id: Option<i64>,
    slug: &str,
) -> Result<Placement, TaxonomyError> {
    match parent_id {
        None => Ok(Placement {
            depth: 0,
            path: slug.to_string(),
        }),
        Some(parent_id) => {
            let parent = get_industry(conn, parent_id)?
                .ok_or(TaxonomyError::ParentNotFound(parent_id))?;
            Ok(Placement {
                depth: parent.depth + 1,
                path: format!("{}/{}", parent.path, slug),
            })
        }
    }
}

/// Row shape fetched by the subtree CTE: identity only, derived columns are
/// about to be rewritten.
struct SubtreeRow {
    industry_id: i64,
    parent_id: i64,
    slug: String,
}

/// Re-derive depth/path for every transitive descendant of `root`.
///
/// `root` must already carry its *new* depth/path. The subtree is fetched
/// in one recursive CTE query; each descendant is then recomputed from its
/// parent's fresh value (the root's new placement seeds the walk, and every
/// other parent comes from the same freshly fetched batch, never from a
/// stale read). Runs inside the caller's open transaction, so a failure
/// rolls back the entire mutation.
///
/// Returns the number of descendant rows rewritten.
///
/// # Errors
///
/// Returns [`TaxonomyError::Db`] on database failure.
pub fn rebuild_descendants(conn: &Connection, root: &Industry) -> Result<usize, TaxonomyError> {
    let mut stmt = conn
        .prepare(
            "WITH RECURSIVE subtree(industry_id, parent_id, slug) AS (
                SELECT industry_id, parent_id, slug
                FROM industries
                WHERE parent_id = ?1
                UNION ALL
                SELECT i.industry_id, i.parent_id, i.slug
                FROM industries i
                JOIN subtree s ON i.parent_id = s.industry_id
             )
             SELECT industry_id, parent_id, slug FROM subtree",
        )
        .context("prepare subtree query")?;

    let rows = stmt
        .query_map(params![root.industry_id], |row| {
            Ok(SubtreeRow {
                industry_id: row.get(0)?,
                parent_id: row.get(1)?,
                slug: row.get(2)?,
            })
        })
        .context("query subtree")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| format!("fetch subtree of industry {}", root.industry_id))?;

    let mut children_of: HashMap<i64, Vec<&SubtreeRow>> = HashMap::new();
    for row in &rows {
        children_of.entry(row.parent_id).or_default().push(row);
    }

    let mut update = conn
        .prepare(
            "UPDATE industries
             SET depth = ?2, path = ?3, updated_at_us = ?4
             WHERE industry_id = ?1",
        )
        .context("prepare descendant update")?;

    let now_us = crate::model::now_us();
    let mut rewritten = 0_usize;
    let mut frontier = vec![(root.industry_id, root.depth, root.path.clone())];

    while let Some((parent_id, parent_depth, parent_path)) = frontier.pop() {
        let Some(children) = children_of.get(&parent_id) else {
            continue;
        };
        for child in children {
            let depth = parent_depth + 1;
            let path = format!("{parent_path}/{}", child.slug);
            update
                .execute(params![child.industry_id, depth, path, now_us])
                .with_context(|| format!("rewrite descendant {}", child.industry_id))?;
            rewritten += 1;
            frontier.push((child.industry_id, depth, path));
        }
    }

    tracing::debug!(
        root = root.industry_id,
        descendants = rewritten,
        "cascaded depth/path rebuild"
    );

    Ok(rewritten)
}
