//! Depth-first traversal of a forest

use crate::forest::Forest;
use crate::node::{Node, Token};
use crate::relation::Label;
use serde::Serialize;

/// How a traversal reports what it visits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClimbOptions {
    /// Tag every step with its depth
    pub level: bool,
    /// Report (parent, child) twigs instead of single nodes
    pub twig: bool,
    /// Report full nodes; `false` reduces them to aliases
    pub identified: bool,
    /// Added to every reported node id
    pub offset: u64,
}

impl Default for ClimbOptions {
    fn default() -> Self {
        Self {
            level: false,
            twig: false,
            identified: true,
            offset: 0,
        }
    }
}

impl ClimbOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: bool) -> Self {
        self.level = level;
        self
    }

    pub fn twigs(mut self) -> Self {
        self.twig = true;
        self
    }

    pub fn identified(mut self, identified: bool) -> Self {
        self.identified = identified;
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }
}

/// One traversal step: a node, or a twig when `upper` is present
///
/// Steps order by level first, which is what makes a sorted traversal
/// topological.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Step<A> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<usize>,
    pub lower: Token<A>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper: Option<Token<A>>,
}

impl<A> Step<A> {
    pub fn is_twig(&self) -> bool {
        self.upper.is_some()
    }
}

enum Frame<'f, A> {
    Visit(&'f Node<A>),
    Twig(&'f Node<A>, &'f Node<A>),
}

/// Lazy, stack-based depth-first walk
///
/// Parents are always produced before their children and children follow
/// insertion order. Dropping the iterator abandons the rest of the walk.
pub struct Climb<'f, A> {
    forest: &'f Forest<A>,
    options: ClimbOptions,
    stack: Vec<Frame<'f, A>>,
}

impl<'f, A: Label> Climb<'f, A> {
    pub(crate) fn new(forest: &'f Forest<A>, starts: Vec<&'f Node<A>>, options: ClimbOptions) -> Self {
        let stack = starts.into_iter().rev().map(Frame::Visit).collect();
        Self {
            forest,
            options,
            stack,
        }
    }

    pub fn options(&self) -> ClimbOptions {
        self.options
    }

    fn token(&self, node: &Node<A>) -> Token<A> {
        node.identified(self.options.identified, self.options.offset)
    }

    fn level(&self, node: &Node<A>) -> Option<usize> {
        self.options.level.then(|| self.forest.level_of(node))
    }
}

impl<A: Label> Iterator for Climb<'_, A> {
    type Item = Step<A>;

    fn next(&mut self) -> Option<Step<A>> {
        let forest = self.forest;
        while let Some(frame) = self.stack.pop() {
            match frame {
                Frame::Twig(lower, upper) => {
                    return Some(Step {
                        level: self.level(lower),
                        lower: self.token(lower),
                        upper: Some(self.token(upper)),
                    });
                }
                Frame::Visit(node) => {
                    for child in forest.children(node).iter().rev() {
                        self.stack.push(Frame::Visit(child));
                        if self.options.twig {
                            self.stack.push(Frame::Twig(node, child));
                        }
                    }
                    if !self.options.twig {
                        return Some(Step {
                            level: self.level(node),
                            lower: self.token(node),
                            upper: None,
                        });
                    }
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Selector;

    fn sample() -> Forest {
        let mut forest = Forest::new();
        forest.add_tree("a".to_string());
        forest.add_twig("a", "b".to_string()).unwrap();
        forest.add_twig("a", "c".to_string()).unwrap();
        forest.add_twig("b", "d".to_string()).unwrap();
        forest
    }

    fn aliases(steps: impl Iterator<Item = Step<String>>) -> Vec<String> {
        steps.map(|s| s.lower.alias().clone()).collect()
    }

    #[test]
    fn test_preorder() {
        let forest = sample();
        let climb = forest.climb(Selector::All, ClimbOptions::new()).unwrap();
        assert_eq!(aliases(climb), vec!["a", "b", "d", "c"]);
    }

    #[test]
    fn test_twigs_carry_parent_level() {
        let forest = sample();
        let options = ClimbOptions::new().twigs().with_level(true).identified(false);
        let twigs: Vec<_> = forest
            .climb(Selector::All, options)
            .unwrap()
            .map(|s| (s.level, s.lower.alias().clone(), s.upper.map(|u| u.alias().clone())))
            .collect();

        assert_eq!(
            twigs,
            vec![
                (Some(0), "a".to_string(), Some("b".to_string())),
                (Some(1), "b".to_string(), Some("d".to_string())),
                (Some(0), "a".to_string(), Some("c".to_string())),
            ]
        );
    }

    #[test]
    fn test_offset_shifts_ids() {
        let forest = sample();
        let ids: Vec<u64> = forest
            .climb("a", ClimbOptions::new().offset(100))
            .unwrap()
            .filter_map(|s| s.lower.node().map(|n| n.id.0))
            .collect();
        assert!(ids.iter().all(|id| *id >= 100));
    }

    #[test]
    fn test_stops_early() {
        let forest = sample();
        let mut climb = forest.climb(Selector::All, ClimbOptions::new()).unwrap();
        assert_eq!(climb.next().map(|s| s.lower.alias().clone()), Some("a".to_string()));
        drop(climb);
    }
}
