//! Encyclopedia Core - relations and forests for structured indexing
//!
//! This crate provides a cardinality-aware bidirectional [`Relation`] and a
//! [`Forest`] of aliased nodes built on top of it, with cutting, grafting,
//! pruning and composition.

pub mod cardinality;
pub mod climb;
pub mod error;
pub mod forest;
pub mod node;
pub mod operand;
pub mod order;
pub mod relation;
pub mod snapshot;

pub use cardinality::Cardinality;
pub use climb::{Climb, ClimbOptions, Step};
pub use error::{Error, Result};
pub use forest::{Forest, Morph};
pub use node::{Node, NodeId, Selector, Token};
pub use operand::Operand;
pub use order::{alias_set, topological};
pub use relation::{Image, Label, Relation};
pub use snapshot::{ForestSnapshot, NodeRecord};
