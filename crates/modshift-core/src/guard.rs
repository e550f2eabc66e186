//! Duplicate top-level binding detection.

use std::path::Path;

use rustc_hash::FxHashSet;

use crate::error::{Result, TransformError};
use crate::tree::Node;

/// First name declared by each import and variable declaration
pub fn bound_names(statements: &[Node]) -> impl Iterator<Item = &str> {
    statements.iter().filter_map(Node::first_bound_name)
}

/// The first name that is bound twice, if any
pub fn find_duplicate(statements: &[Node]) -> Option<&str> {
    let mut seen = FxHashSet::default();
    bound_names(statements).find(|name| !seen.insert(*name))
}

pub fn has_duplicates(statements: &[Node]) -> bool {
    find_duplicate(statements).is_some()
}

/// Fail with [`TransformError::ImportCollision`] when a name repeats.
pub fn ensure_unique(statements: &[Node], path: &Path) -> Result<()> {
    match find_duplicate(statements) {
        Some(name) => Err(TransformError::collision(path, name)),
        None => Ok(()),
    }
}
