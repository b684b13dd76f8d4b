//! Topological ordering and structural comparison helpers

use crate::climb::{Climb, ClimbOptions, Step};
use crate::forest::Forest;
use crate::node::Node;
use crate::relation::Label;
use std::collections::BTreeSet;

/// Sort level-tagged steps by (level, node), then optionally drop the level
///
/// Every node ends up after all of its ancestors; ties break by id (or by
/// alias for unidentified steps).
pub fn topological<A: Label>(mut steps: Vec<Step<A>>, keep_level: bool) -> Vec<Step<A>> {
    steps.sort();
    if !keep_level {
        for step in &mut steps {
            step.level = None;
        }
    }
    steps
}

/// Distinct aliases of the given nodes
pub fn alias_set<'a, A, I>(nodes: I) -> BTreeSet<A>
where
    A: Label + 'a,
    I: IntoIterator<Item = &'a Node<A>>,
{
    nodes.into_iter().map(|node| node.alias.clone()).collect()
}

/// Alias-only, level-tagged picture of a (sub)forest
///
/// Two subforests with the same shape are labelled-isomorphic as far as
/// equality is concerned; node ids never take part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Shape<A> {
    nodes: Vec<Step<A>>,
    twigs: Vec<Step<A>>,
}

pub(crate) fn shape<'f, A: Label>(forest: &'f Forest<A>, starts: Vec<&'f Node<A>>) -> Shape<A> {
    let options = ClimbOptions::new().with_level(true).identified(false);
    let nodes = Climb::new(forest, starts.clone(), options).collect();
    let twigs = Climb::new(forest, starts, options.twigs()).collect();
    Shape {
        nodes: topological(nodes, true),
        twigs: topological(twigs, true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{NodeId, Token};

    fn step(level: usize, id: u64) -> Step<&'static str> {
        Step {
            level: Some(level),
            lower: Token::Node(Node::new("x", NodeId(id))),
            upper: None,
        }
    }

    #[test]
    fn test_level_then_id() {
        let sorted = topological(vec![step(2, 1), step(0, 9), step(1, 3), step(1, 2)], true);
        let keys: Vec<_> = sorted
            .iter()
            .map(|s| (s.level, s.lower.node().map(|n| n.id.0)))
            .collect();
        assert_eq!(
            keys,
            vec![(Some(0), Some(9)), (Some(1), Some(2)), (Some(1), Some(3)), (Some(2), Some(1))]
        );
    }

    #[test]
    fn test_strip_level() {
        let sorted = topological(vec![step(1, 1), step(0, 2)], false);
        assert!(sorted.iter().all(|s| s.level.is_none()));
        assert_eq!(sorted[0].lower.node().map(|n| n.id), Some(NodeId(2)));
    }

    #[test]
    fn test_alias_set() {
        let nodes = [Node::new("a", NodeId(0)), Node::new("a", NodeId(1)), Node::new("b", NodeId(2))];
        assert_eq!(alias_set(&nodes), BTreeSet::from(["a", "b"]));
    }
}
