//! Case-insensitive substring search over display names.
//!
//! # Responsibility
//! - Filter one kind's display names against a free-text query.
//! - Preserve the store's creation-order enumeration in results.
//!
//! # Invariants
//! - An empty query matches every entity of the requested kind ("list all").
//! - No match yields an empty list, never an error.
//! - Search reads display names only; it is independent of the link index.

use crate::model::entity::EntityKind;
use crate::repo::entity_repo::{EntityRepository, RepoResult};

/// Returns the display names of `kind` whose lowercase form contains the
/// lowercase `query` as a substring, in creation order.
pub fn search_names<R: EntityRepository>(
    repo: &R,
    kind: EntityKind,
    query: &str,
) -> RepoResult<Vec<String>> {
    let names = repo.display_names(kind)?;
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return Ok(names);
    }

    Ok(names
        .into_iter()
        .filter(|name| name.to_lowercase().contains(&needle))
        .collect())
}
