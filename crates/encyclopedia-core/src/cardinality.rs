//! Mapping cardinalities and their inversion/composition tables

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Uniqueness regime of a relation's (domain, range) pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Cardinality {
    /// Isomorphism: unique on both sides
    #[serde(rename = "1:1")]
    OneToOne,
    /// Partition: each range value has a single domain
    #[serde(rename = "1:M")]
    OneToMany,
    /// Function: each domain value has a single range
    #[serde(rename = "M:1")]
    ManyToOne,
    /// General relation
    #[default]
    #[serde(rename = "M:M")]
    ManyToMany,
}

impl Cardinality {
    pub const ALL: [Cardinality; 4] = [
        Self::OneToOne,
        Self::OneToMany,
        Self::ManyToOne,
        Self::ManyToMany,
    ];

    /// Tag as written in configuration ("1:1", "1:M", "M:1", "M:M")
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneToOne => "1:1",
            Self::OneToMany => "1:M",
            Self::ManyToOne => "M:1",
            Self::ManyToMany => "M:M",
        }
    }

    /// A domain value maps to at most one range value
    pub fn unique_domain(&self) -> bool {
        matches!(self, Self::OneToOne | Self::ManyToOne)
    }

    /// A range value is reached from at most one domain value
    pub fn unique_range(&self) -> bool {
        matches!(self, Self::OneToOne | Self::OneToMany)
    }

    /// Cardinality of the inverted relation
    pub fn invert(&self) -> Self {
        match self {
            Self::OneToOne => Self::OneToOne,
            Self::OneToMany => Self::ManyToOne,
            Self::ManyToOne => Self::OneToMany,
            Self::ManyToMany => Self::ManyToMany,
        }
    }

    /// Cardinality of `self ∘ other` (self applied first)
    pub fn compose(&self, other: Cardinality) -> Self {
        match (self, other) {
            (Self::OneToOne, c) => c,
            (Self::ManyToOne, Self::OneToOne | Self::ManyToOne) => Self::ManyToOne,
            (Self::ManyToOne, _) => Self::ManyToMany,
            (Self::OneToMany, Self::OneToOne | Self::OneToMany) => Self::OneToMany,
            (Self::OneToMany, _) => Self::ManyToMany,
            (Self::ManyToMany, _) => Self::ManyToMany,
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cardinality {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "1:1" => Ok(Self::OneToOne),
            "1:M" => Ok(Self::OneToMany),
            "M:1" => Ok(Self::ManyToOne),
            "M:M" => Ok(Self::ManyToMany),
            _ => Err(Error::InvalidCardinality(s.to_string())),
        }
    }
}
