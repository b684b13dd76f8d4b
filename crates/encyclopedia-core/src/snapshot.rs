//! Flat, serializable form of a forest

use crate::climb::ClimbOptions;
use crate::error::{Error, Result};
use crate::forest::Forest;
use crate::node::{Node, NodeId, Selector};
use crate::relation::Label;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One node and the id of its parent (`None` for roots)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord<A> {
    pub id: NodeId,
    pub alias: A,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<NodeId>,
}

/// Every node of a forest in topological order, plus its id counter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForestSnapshot<A> {
    pub counter: u64,
    pub nodes: Vec<NodeRecord<A>>,
}

impl<A: Label> Forest<A> {
    /// Capture the forest; parents always precede their children
    pub fn snapshot(&self) -> ForestSnapshot<A> {
        let nodes = self
            .sorted(Selector::All, ClimbOptions::new())
            .unwrap_or_default()
            .into_iter()
            .filter_map(|step| step.lower.into_node())
            .map(|node| NodeRecord {
                parent: self.parent(&node).map(|parent| parent.id),
                id: node.id,
                alias: node.alias,
            })
            .collect();
        ForestSnapshot {
            counter: self.counter(),
            nodes,
        }
    }

    /// Rebuild a forest from a snapshot, keeping every id
    ///
    /// Fails with [`Error::InvalidSnapshot`] on duplicate ids, parents that
    /// are not part of the snapshot, and parent cycles.
    pub fn restore(snapshot: ForestSnapshot<A>) -> Result<Self> {
        let mut ids = BTreeSet::new();
        for record in &snapshot.nodes {
            if !ids.insert(record.id) {
                return Err(Error::InvalidSnapshot(format!("duplicate node id {}", record.id)));
            }
        }

        let mut roots = Vec::new();
        let mut children: BTreeMap<NodeId, Vec<&NodeRecord<A>>> = BTreeMap::new();
        for record in &snapshot.nodes {
            match record.parent {
                None => roots.push(record),
                Some(parent) if !ids.contains(&parent) => {
                    return Err(Error::InvalidSnapshot(format!(
                        "node {} references missing parent {}",
                        record.id, parent
                    )));
                }
                Some(parent) => children.entry(parent).or_default().push(record),
            }
        }

        let mut forest = Forest::new();
        let mut queue = std::collections::VecDeque::new();
        for record in roots {
            forest.plant(Node::new(record.alias.clone(), record.id));
            queue.push_back(record.id);
        }
        while let Some(id) = queue.pop_front() {
            for record in children.remove(&id).unwrap_or_default() {
                forest.link_to(id, Node::new(record.alias.clone(), record.id))?;
                queue.push_back(record.id);
            }
        }

        if forest.len() != snapshot.nodes.len() {
            return Err(Error::InvalidSnapshot(format!(
                "{} nodes are unreachable from any root (parent cycle)",
                snapshot.nodes.len() - forest.len()
            )));
        }

        forest.reserve(snapshot.counter);
        tracing::debug!("Restored forest of {} nodes", forest.len());
        Ok(forest)
    }
}

impl<A: Label + Serialize> ForestSnapshot<A> {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl<A: Label + DeserializeOwned> ForestSnapshot<A> {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
