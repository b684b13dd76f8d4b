//! Forest nodes and the ways callers address them

use crate::relation::Label;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Arena index of a node, unique within one forest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Shift the id, as done when merging forests
    pub fn offset(self, by: u64) -> Self {
        Self(self.0 + by)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A node: a unique id paired with a non-unique alias
///
/// Equality, hashing and ordering only look at the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node<A> {
    pub id: NodeId,
    pub alias: A,
}

impl<A> Node<A> {
    pub fn new(alias: A, id: NodeId) -> Self {
        Self { id, alias }
    }
}

impl<A: Label> Node<A> {
    /// Same alias, id shifted by `by`
    pub fn offset(&self, by: u64) -> Self {
        Self::new(self.alias.clone(), self.id.offset(by))
    }

    /// The full (shifted) node, or just its alias
    pub fn identified(&self, identified: bool, offset: u64) -> Token<A> {
        if identified {
            Token::Node(self.offset(offset))
        } else {
            Token::Alias(self.alias.clone())
        }
    }
}

impl<A> PartialEq for Node<A> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<A> Eq for Node<A> {}

impl<A> Hash for Node<A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<A> PartialOrd for Node<A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<A> Ord for Node<A> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl<A> std::borrow::Borrow<NodeId> for Node<A> {
    fn borrow(&self) -> &NodeId {
        &self.id
    }
}

impl<A: fmt::Display> fmt::Display for Node<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}:{}", self.id, self.alias)
    }
}

/// A node as reported by a traversal: full identity or bare alias
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum Token<A> {
    Node(Node<A>),
    Alias(A),
}

impl<A> Token<A> {
    pub fn alias(&self) -> &A {
        match self {
            Self::Node(node) => &node.alias,
            Self::Alias(alias) => alias,
        }
    }

    pub fn node(&self) -> Option<&Node<A>> {
        match self {
            Self::Node(node) => Some(node),
            Self::Alias(_) => None,
        }
    }

    pub fn into_node(self) -> Option<Node<A>> {
        match self {
            Self::Node(node) => Some(node),
            Self::Alias(_) => None,
        }
    }
}

impl<A: fmt::Display> fmt::Display for Token<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(node) => fmt::Display::fmt(node, f),
            Self::Alias(alias) => fmt::Display::fmt(alias, f),
        }
    }
}

/// Which nodes an operation applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector<A> {
    /// Every tree root
    All,
    /// Every node registered under the alias
    Alias(A),
    /// One already-resolved node
    Node(Node<A>),
}

impl<A> Selector<A> {
    pub fn alias(alias: A) -> Self {
        Self::Alias(alias)
    }
}

impl From<&str> for Selector<String> {
    fn from(alias: &str) -> Self {
        Self::Alias(alias.to_string())
    }
}

impl From<String> for Selector<String> {
    fn from(alias: String) -> Self {
        Self::Alias(alias)
    }
}

impl<A> From<Node<A>> for Selector<A> {
    fn from(node: Node<A>) -> Self {
        Self::Node(node)
    }
}

impl<A: Clone> From<&Node<A>> for Selector<A> {
    fn from(node: &Node<A>) -> Self {
        Self::Node(node.clone())
    }
}
