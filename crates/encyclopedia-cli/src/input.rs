//! Parsing of edge and pair arguments

use std::path::Path;

use anyhow::Context;
use encyclopedia_core::{Cardinality, Forest, Relation};

/// Split `item` at the first `separator` into two trimmed, non-empty halves
pub fn split_pair<'a>(item: &'a str, separator: &str) -> anyhow::Result<(&'a str, &'a str)> {
    let (left, right) = item
        .split_once(separator)
        .with_context(|| format!("Expected '{}' in '{}'", separator, item))?;
    let (left, right) = (left.trim(), right.trim());
    if left.is_empty() || right.is_empty() {
        anyhow::bail!("Both sides of '{}' must be non-empty", item);
    }
    Ok((left, right))
}

/// Non-blank, non-comment lines of a file
pub fn read_lines(path: &Path) -> anyhow::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// Build a forest from explicit roots and `parent>child` edges
///
/// An edge whose parent alias is not yet present starts a new tree rooted at
/// that alias. An edge under a shared alias adds a child to every node
/// carrying it.
pub fn build_forest(trees: &[String], edges: &[String], separator: &str) -> anyhow::Result<Forest> {
    let mut forest: Forest = Forest::new();
    for tree in trees {
        forest.add_tree(tree.trim());
    }
    for edge in edges {
        let (parent, child) = split_pair(edge, separator)?;
        if !forest.contains(parent) {
            tracing::debug!("Starting tree at {}", parent);
            forest.add_tree(parent);
        }
        forest.add_twig(parent, child)?;
    }
    tracing::debug!("Built forest of {} nodes in {} trees", forest.len(), forest.trees().count());
    Ok(forest)
}

/// Build a relation from `domain=range` pairs, inserted in order
pub fn build_relation(
    pairs: &[String],
    separator: &str,
    cardinality: Cardinality,
) -> anyhow::Result<Relation<String, String>> {
    let parsed = pairs
        .iter()
        .map(|pair| split_pair(pair, separator).map(|(d, r)| (d.to_string(), r.to_string())))
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(Relation::from_pairs(cardinality, parsed))
}
