//! Ancestor-walk cycle rejection for parent assignments.
//!
//! The industry tree is self-referencing through `parent_id`, so a parent
//! assignment can silently turn the tree into a ring. Before a parent is
//! set or changed, the candidate parent's ancestor chain is walked upward;
//! finding the node itself anywhere in that chain rejects the write with
//! [`TaxonomyError::CycleDetected`] before any row is touched.
//!
//! The walk is bounded at [`MAX_ANCESTOR_HOPS`] to cap pathological data:
//! a chain that long is either corrupt or already cyclic, and the bound
//! keeps the validation O(1) queries per hop rather than unbounded.

use anyhow::Context as AnyhowContext;
use rusqlite::{Connection, OptionalExtension, params};

use super::TaxonomyError;

/// Maximum ancestor-chain length examined when validating a parent
/// assignment.
pub const MAX_ANCESTOR_HOPS: usize = 10;

/// Reject a parent assignment that would make `industry_id` its own
/// ancestor.
///
/// Walks from `candidate_parent_id` toward the root, at most
/// [`MAX_ANCESTOR_HOPS`] hops. Assigning a node to itself is the trivial
/// cycle and is rejected without a walk. Runs on create and update, but
/// only when a parent is actually being set or changed — clearing the
/// parent cannot introduce a cycle.
///
/// # Errors
///
/// Returns [`TaxonomyError::CycleDetected`] if `industry_id` appears in
/// the candidate's ancestor chain, or [`TaxonomyError::Db`] on database
/// failure.
pub fn ensure_no_cycle(
    conn: &Connection,
    industry_id: i64,
    candidate_parent_id: i64,
) -> Result<(), TaxonomyError> {
    if industry_id == candidate_parent_id {
        return Err(TaxonomyError::CycleDetected {
            industry_id,
            proposed_parent: candidate_parent_id,
        });
    }

    let mut current = Some(candidate_parent_id);
    let mut hops = 0_usize;

    while let Some(ancestor_id) = current {
        if ancestor_id == industry_id {
            return Err(TaxonomyError::CycleDetected {
                industry_id,
                proposed_parent: candidate_parent_id,
            });
        }

        hops += 1;
        if hops >= MAX_ANCESTOR_HOPS {
            break;
        }

        current = conn
            .query_row(
                "SELECT parent_id FROM industries WHERE industry_id = ?1",
                params![ancestor_id],
                |row| row.get::<_, Option<i64>>(0),
            )
            .optional()
            .with_context(|| format!("walk ancestor {ancestor_id}"))?
            .flatten();
    }

    Ok(())
}
