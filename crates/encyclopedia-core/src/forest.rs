//! Forests of rooted trees over identity-carrying nodes
//!
//! A [`Forest`] is an arena of [`Node`]s plus three relations:
//!
//! - `nodes` (1:M): parent -> children; its inverse is M:1, so every node
//!   has at most one parent
//! - `aliases` (1:M): alias -> nodes carrying it
//! - `levels` (M:1): node -> depth
//!
//! `trees` holds the roots, and `counter` is the next unused id. Node ids
//! are never reused within a forest; merging shifts incoming ids past
//! `counter` so they cannot collide.

use crate::cardinality::Cardinality;
use crate::climb::{Climb, ClimbOptions, Step};
use crate::error::{Error, Result};
use crate::node::{Node, NodeId, Selector, Token};
use crate::operand::Operand;
use crate::order::{self, Shape};
use crate::relation::{Label, Relation};
use std::collections::BTreeSet;
use std::fmt;
use std::ops::{Add, AddAssign, BitAnd, Sub};

/// Alias transform applied while cutting; `None` drops the node
pub type Morph<'a, A> = &'a dyn Fn(&A) -> Option<A>;

/// A collection of disjoint rooted trees
#[derive(Debug, Clone)]
pub struct Forest<A = String> {
    trees: BTreeSet<Node<A>>,
    nodes: Relation<Node<A>, Node<A>>,
    aliases: Relation<A, Node<A>>,
    levels: Relation<Node<A>, usize>,
    counter: u64,
    frozen: bool,
}

impl<A: Label> Default for Forest<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Label> Forest<A> {
    pub fn new() -> Self {
        Self::with_offset(0)
    }

    /// Empty forest whose first node id is `offset`
    pub fn with_offset(offset: u64) -> Self {
        Self {
            trees: BTreeSet::new(),
            nodes: Relation::new(Cardinality::OneToMany),
            aliases: Relation::new(Cardinality::OneToMany),
            levels: Relation::new(Cardinality::ManyToOne),
            counter: offset,
            frozen: false,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Inspection
    // ─────────────────────────────────────────────────────────────────────────

    /// Next unused node id
    pub fn counter(&self) -> u64 {
        self.counter
    }

    /// Number of nodes (at least the number of distinct aliases)
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Tree roots in id order
    pub fn trees(&self) -> impl Iterator<Item = &Node<A>> + '_ {
        self.trees.iter()
    }

    /// Every node in id order
    pub fn nodes(&self) -> impl Iterator<Item = &Node<A>> + '_ {
        self.levels.keys()
    }

    /// Every registered alias
    pub fn keys(&self) -> impl Iterator<Item = &A> + '_ {
        self.aliases.keys()
    }

    pub fn contains(&self, selector: impl Into<Selector<A>>) -> bool {
        match selector.into() {
            Selector::All => !self.trees.is_empty(),
            Selector::Alias(alias) => self.aliases.contains(&alias),
            Selector::Node(node) => self.levels.contains(&node),
        }
    }

    /// Arena lookup by id
    pub fn node(&self, id: NodeId) -> Option<&Node<A>> {
        self.levels.domain_key(&id)
    }

    /// Depth of a node; roots are at level 0
    pub fn level(&self, node: &Node<A>) -> Result<usize> {
        self.levels
            .get(node)
            .ok()
            .and_then(|image| image.single().copied())
            .ok_or_else(|| Error::NodeNotFound(describe(node)))
    }

    pub(crate) fn level_of(&self, node: &Node<A>) -> usize {
        self.levels
            .image(node)
            .ok()
            .and_then(|levels| levels.first().copied())
            .unwrap_or_default()
    }

    pub(crate) fn children(&self, node: &Node<A>) -> &[Node<A>] {
        self.nodes.image(node).unwrap_or(&[])
    }

    pub(crate) fn parent(&self, node: &Node<A>) -> Option<&Node<A>> {
        self.nodes
            .preimage(node)
            .ok()
            .and_then(|parents| parents.first())
    }

    /// Every childless node at the tip of a twig
    ///
    /// Bare single-node trees have no twig and are not part of the canopy.
    pub fn canopy(&self) -> BTreeSet<Node<A>> {
        self.nodes
            .values()
            .filter(|node| !self.nodes.contains(node))
            .cloned()
            .collect()
    }

    /// Deepest level in the forest
    pub fn height(&self) -> Option<usize> {
        self.levels.values().max().copied()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Resolution
    // ─────────────────────────────────────────────────────────────────────────

    fn resolve(&self, selector: &Selector<A>) -> Result<Vec<&Node<A>>> {
        match selector {
            Selector::All => Ok(self.trees.iter().collect()),
            Selector::Alias(alias) => self
                .aliases
                .image(alias)
                .map(|nodes| nodes.iter().collect())
                .map_err(|_| Error::AliasNotFound(format!("{:?}", alias))),
            Selector::Node(node) => self
                .levels
                .domain_key(&node.id)
                .map(|found| vec![found])
                .ok_or_else(|| Error::NodeNotFound(describe(node))),
        }
    }

    /// Nodes denoted by an alias, a node, or every root
    pub fn aliased(&self, selector: impl Into<Selector<A>>) -> Result<Vec<Node<A>>> {
        Ok(self
            .resolve(&selector.into())?
            .into_iter()
            .cloned()
            .collect())
    }

    /// Direct children of the selected nodes
    pub fn above(&self, selector: impl Into<Selector<A>>) -> Result<Vec<Node<A>>> {
        Ok(self
            .resolve(&selector.into())?
            .into_iter()
            .flat_map(|node| self.children(node).iter().cloned())
            .collect())
    }

    /// Parents of the selected nodes (roots contribute nothing)
    pub fn below(&self, selector: impl Into<Selector<A>>) -> Result<Vec<Node<A>>> {
        Ok(self
            .resolve(&selector.into())?
            .into_iter()
            .filter_map(|node| self.parent(node).cloned())
            .collect())
    }

    /// Subforests rooted at each child of the selected nodes
    pub fn branches(&self, selector: impl Into<Selector<A>>) -> Result<Vec<Forest<A>>> {
        self.above(selector)?
            .into_iter()
            .map(|child| self.cutting(child, 0, None))
            .collect()
    }

    /// Tree roots reachable downwards from the selected nodes
    pub fn root(&self, selector: impl Into<Selector<A>>) -> Result<BTreeSet<Node<A>>> {
        let mut roots = BTreeSet::new();
        for start in self.resolve(&selector.into())? {
            let mut current = start;
            while let Some(parent) = self.parent(current) {
                current = parent;
            }
            roots.insert(current.clone());
        }
        Ok(roots)
    }

    /// Childless nodes reachable upwards from the selected nodes
    pub fn leaves(&self, selector: impl Into<Selector<A>>) -> Result<BTreeSet<Node<A>>> {
        let mut leaves = BTreeSet::new();
        let mut stack = self.resolve(&selector.into())?;
        while let Some(node) = stack.pop() {
            let children = self.children(node);
            if children.is_empty() {
                leaves.insert(node.clone());
            } else {
                stack.extend(children.iter());
            }
        }
        Ok(leaves)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Traversal
    // ─────────────────────────────────────────────────────────────────────────

    /// Lazy depth-first walk over the subtrees of the selected nodes
    pub fn climb(&self, selector: impl Into<Selector<A>>, options: ClimbOptions) -> Result<Climb<'_, A>> {
        let starts = self.resolve(&selector.into())?;
        Ok(Climb::new(self, starts, options))
    }

    /// Materialised walk sorted by (level, node)
    ///
    /// The level tag is only kept in the output when `options.level` is set.
    pub fn sorted(&self, selector: impl Into<Selector<A>>, options: ClimbOptions) -> Result<Vec<Step<A>>> {
        let steps = self.climb(selector, options.with_level(true))?.collect();
        Ok(order::topological(steps, options.level))
    }

    /// Every twig as (parent, child), parents before children
    fn twigs(&self) -> Vec<(Node<A>, Node<A>)> {
        let starts = self.trees.iter().collect();
        let steps = Climb::new(self, starts, ClimbOptions::new().twigs().with_level(true)).collect();
        order::topological(steps, false)
            .into_iter()
            .filter_map(|step| match (step.lower, step.upper) {
                (Token::Node(lower), Some(Token::Node(upper))) => Some((lower, upper)),
                _ => None,
            })
            .collect()
    }

    fn shape_of(&self, selector: &Selector<A>) -> Result<Shape<A>> {
        let starts = self.resolve(selector)?;
        Ok(order::shape(self, starts))
    }

    /// Structural equality of two (sub)forests
    ///
    /// Compares alias-only, level-tagged node and twig listings in
    /// topological order. Node ids never take part, so this is a test of
    /// labelled tree shape rather than identity.
    pub fn equals(
        left: &Forest<A>,
        right: &Forest<A>,
        left_root: impl Into<Selector<A>>,
        right_root: impl Into<Selector<A>>,
    ) -> Result<bool> {
        Ok(left.shape_of(&left_root.into())? == right.shape_of(&right_root.into())?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutation
    // ─────────────────────────────────────────────────────────────────────────

    /// Allocate a node under a fresh id
    fn sprout(&mut self, alias: A) -> Node<A> {
        let node = Node::new(alias, NodeId(self.counter));
        self.counter += 1;
        node
    }

    /// Register a node (fresh or pre-identified) under its alias
    fn admit(&mut self, node: Node<A>) -> Node<A> {
        if node.id.0 >= self.counter {
            self.counter = node.id.0 + 1;
        }
        self.aliases.set(node.alias.clone(), node.clone());
        node
    }

    pub(crate) fn plant(&mut self, node: Node<A>) -> Node<A> {
        let node = self.admit(node);
        self.trees.insert(node.clone());
        self.levels.set(node.clone(), 0);
        tracing::trace!("Planted tree {:?}", node);
        node
    }

    fn link(&mut self, parent: &Node<A>, child: Node<A>) -> Node<A> {
        let level = self.level_of(parent) + 1;
        let child = self.admit(child);
        self.nodes.set(parent.clone(), child.clone());
        self.levels.set(child.clone(), level);
        child
    }

    /// Link `child` under the stored node with `parent_id`
    pub(crate) fn link_to(&mut self, parent_id: NodeId, child: Node<A>) -> Result<Node<A>> {
        let parent = self
            .node(parent_id)
            .cloned()
            .ok_or_else(|| Error::NodeNotFound(parent_id.to_string()))?;
        Ok(self.link(&parent, child))
    }

    /// Never hand out ids below `counter` again
    pub(crate) fn reserve(&mut self, counter: u64) {
        self.counter = self.counter.max(counter);
    }

    /// Start a new tree; `None` when the forest is frozen
    pub fn add_tree(&mut self, alias: impl Into<A>) -> Option<Node<A>> {
        if self.frozen {
            tracing::trace!("Ignoring add_tree on frozen forest");
            return None;
        }
        let node = self.sprout(alias.into());
        Some(self.plant(node))
    }

    /// Add a new child under every node the parent selector resolves to
    pub fn add_twig(&mut self, parent: impl Into<Selector<A>>, child: impl Into<A>) -> Result<Vec<Node<A>>> {
        if self.frozen {
            tracing::trace!("Ignoring add_twig on frozen forest");
            return Ok(Vec::new());
        }
        let parents = self.aliased(parent)?;
        let child = child.into();
        let mut added = Vec::with_capacity(parents.len());
        for parent in &parents {
            let node = self.sprout(child.clone());
            added.push(self.link(parent, node));
        }
        Ok(added)
    }

    /// Drop a single node from every index
    fn remove_node(&mut self, node: &Node<A>) {
        self.levels.discard(node);
        self.aliases.discard_range(node);
        self.nodes.discard(node);
        if !self.trees.remove(node) {
            self.nodes.discard_range(node);
        }
    }

    fn remove_subtrees(&mut self, starts: Vec<Node<A>>) -> usize {
        let starts: Vec<&Node<A>> = starts.iter().collect();
        let steps = Climb::new(self, starts, ClimbOptions::new().with_level(true)).collect();
        let mut doomed = order::topological(steps, true);
        doomed.dedup();
        let count = doomed.len();
        // Deepest first: a parent never leaves `nodes` while a child still points at it
        for step in doomed.into_iter().rev() {
            if let Token::Node(node) = step.lower {
                self.remove_node(&node);
            }
        }
        count
    }

    /// Remove the selected nodes and everything above them
    pub fn delete(&mut self, selector: impl Into<Selector<A>>) -> Result<()> {
        if self.frozen {
            tracing::trace!("Ignoring delete on frozen forest");
            return Ok(());
        }
        let starts = self.aliased(selector)?;
        let removed = self.remove_subtrees(starts);
        tracing::debug!("Deleted {} nodes", removed);
        Ok(())
    }

    /// Attach every tree of `other`, shifting its ids past `counter`
    ///
    /// With `at`, each tree is attached under every node the selector
    /// resolves to, with a fresh offset per attachment point; without it the
    /// trees join as new roots.
    pub fn graft(&mut self, other: &Forest<A>, at: Option<Selector<A>>) -> Result<()> {
        if self.frozen {
            tracing::trace!("Ignoring graft on frozen forest");
            return Ok(());
        }
        let twigs = other.twigs();
        match at {
            Some(selector) => {
                let targets = self.aliased(selector)?;
                for target in &targets {
                    let offset = self.counter;
                    tracing::debug!(
                        "Grafting {} trees under {:?} at offset {}",
                        other.trees.len(),
                        target,
                        offset
                    );
                    for tree in &other.trees {
                        self.link(target, tree.offset(offset));
                    }
                    self.grow(&twigs, offset)?;
                }
            }
            None => {
                let offset = self.counter;
                tracing::debug!("Grafting {} trees as roots at offset {}", other.trees.len(), offset);
                for tree in &other.trees {
                    self.plant(tree.offset(offset));
                }
                self.grow(&twigs, offset)?;
            }
        }
        Ok(())
    }

    fn grow(&mut self, twigs: &[(Node<A>, Node<A>)], offset: u64) -> Result<()> {
        for (lower, upper) in twigs {
            self.link_to(lower.id.offset(offset), upper.offset(offset))?;
        }
        Ok(())
    }

    /// Add every tree of `other` as new roots
    pub fn update(&mut self, other: &Forest<A>) -> &mut Self {
        if let Err(err) = self.graft(other, None) {
            tracing::warn!("Graft of complete forest failed: {}", err);
        }
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Extraction
    // ─────────────────────────────────────────────────────────────────────────

    /// Independent subforest rooted at the selected nodes
    ///
    /// Ids are shifted by `offset`. `morph` rewrites aliases; a node it maps
    /// to `None` is left out together with everything above it.
    pub fn cutting(
        &self,
        selector: impl Into<Selector<A>>,
        offset: u64,
        morph: Option<Morph<'_, A>>,
    ) -> Result<Forest<A>> {
        let starts = self.resolve(&selector.into())?;
        let morphed = |node: Node<A>| -> Option<Node<A>> {
            match morph {
                Some(f) => f(&node.alias).map(|alias| Node::new(alias, node.id)),
                None => Some(node),
            }
        };

        let mut cut = Forest::with_offset(offset);
        let options = ClimbOptions::new().twigs().offset(offset);
        for start in starts {
            let Some(tree) = morphed(start.offset(offset)) else {
                continue;
            };
            if cut.levels.contains(&tree) {
                // already inside an earlier selected subtree
                continue;
            }
            cut.plant(tree);
            for step in Climb::new(self, vec![start], options) {
                let (Token::Node(lower), Some(Token::Node(upper))) = (step.lower, step.upper) else {
                    continue;
                };
                let (Some(lower), Some(upper)) = (morphed(lower), morphed(upper)) else {
                    continue;
                };
                if cut.levels.contains(&lower) && !cut.levels.contains(&upper) {
                    cut.link_to(lower.id, upper)?;
                }
            }
        }
        tracing::debug!("Cut {} of {} nodes", cut.len(), self.len());
        Ok(cut)
    }

    /// Subforest rooted at the selected nodes, ids unchanged
    pub fn get(&self, selector: impl Into<Selector<A>>) -> Result<Forest<A>> {
        self.cutting(selector, 0, None)
    }

    /// Ancestor chain of the selected nodes as a linear forest
    ///
    /// Chains sharing ancestors are merged, so every node appears once.
    pub fn limb(&self, selector: impl Into<Selector<A>>, offset: u64) -> Result<Forest<A>> {
        let mut members: BTreeSet<&Node<A>> = BTreeSet::new();
        for start in self.resolve(&selector.into())? {
            let mut current = Some(start);
            while let Some(node) = current {
                if !members.insert(node) {
                    break;
                }
                current = self.parent(node);
            }
        }

        let mut ordered: Vec<&Node<A>> = members.into_iter().collect();
        ordered.sort_by_key(|node| (self.level_of(node), node.id));

        let mut limb = Forest::with_offset(offset);
        for node in ordered {
            match self.parent(node) {
                Some(parent) => {
                    limb.link_to(parent.id.offset(offset), node.offset(offset))?;
                }
                None => {
                    limb.plant(node.offset(offset));
                }
            }
        }
        Ok(limb)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Algebra
    // ─────────────────────────────────────────────────────────────────────────

    /// All trees of both forests; `other`'s ids are shifted past ours
    pub fn union(&self, other: &Forest<A>) -> Forest<A> {
        let mut new = self.melt();
        new.update(other);
        new.frozen = self.frozen;
        new
    }

    /// Trees of `self` that are not structurally equal to any tree of `other`
    pub fn difference(&self, other: &Forest<A>) -> Forest<A> {
        let theirs: Vec<Shape<A>> = other
            .trees
            .iter()
            .map(|tree| order::shape(other, vec![tree]))
            .collect();
        let doomed: Vec<Node<A>> = self
            .trees
            .iter()
            .filter(|tree| theirs.contains(&order::shape(self, vec![*tree])))
            .cloned()
            .collect();

        let mut new = self.clone();
        let removed = new.remove_subtrees(doomed);
        tracing::debug!("Difference removed {} nodes", removed);
        new
    }

    /// Trees of `self` that also occur in `other`, i.e. `A - (A - B)`
    pub fn intersect(&self, other: &Forest<A>) -> Forest<A> {
        self.difference(&self.difference(other))
    }

    /// Copy without structurally duplicate trees
    ///
    /// The first tree (by id) of each shape is kept.
    pub fn prune(&self) -> Forest<A> {
        let trees: Vec<&Node<A>> = self.trees.iter().collect();
        let shapes: Vec<Shape<A>> = trees.iter().map(|tree| order::shape(self, vec![*tree])).collect();

        let mut doomed = BTreeSet::new();
        for (i, first) in shapes.iter().enumerate() {
            for (j, second) in shapes.iter().enumerate().skip(i + 1) {
                if first == second {
                    doomed.insert(trees[j].clone());
                }
            }
        }

        let mut new = self.clone();
        let removed = new.remove_subtrees(doomed.into_iter().collect());
        tracing::debug!("Pruned {} nodes", removed);
        new
    }

    /// Compose with an operand
    ///
    /// - `Container`: every root of `other` whose alias occurs here has its
    ///   branches grafted under each node carrying that alias
    /// - `Function`: aliases are morphed (see [`Forest::cutting`])
    /// - `Scale(n)`: `n` disjoint copies of this forest
    /// - `Identity` / `Zero`: a copy / the empty forest
    pub fn compose(&self, operand: Operand<'_, Forest<A>, A>) -> Result<Forest<A>> {
        tracing::debug!("Composing forest of {} nodes with {}", self.len(), operand.kind());
        match operand {
            Operand::Identity => Ok(self.clone()),
            Operand::Zero | Operand::Scale(0) => Ok(Forest::new()),
            Operand::Scale(n) => {
                let mut new = self.melt();
                for _ in 1..n {
                    new.update(self);
                }
                new.frozen = self.frozen;
                Ok(new)
            }
            Operand::Function(morph) => self.cutting(Selector::All, 0, Some(morph)),
            Operand::Container(other) => self.splice(other),
        }
    }

    fn splice(&self, other: &Forest<A>) -> Result<Forest<A>> {
        let mut new = self.melt();
        for tree in &other.trees {
            if !self.aliases.contains(&tree.alias) {
                continue;
            }
            let branches = other.branches(tree)?;
            for node in self.aliased(Selector::Alias(tree.alias.clone()))? {
                for branch in &branches {
                    new.graft(branch, Some(Selector::Node(node.clone())))?;
                }
            }
        }
        new.frozen = self.frozen;
        Ok(new)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutability
    // ─────────────────────────────────────────────────────────────────────────

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Immutable copy; mutators on it silently do nothing
    pub fn freeze(&self) -> Self {
        let mut new = self.clone();
        new.frozen = true;
        new
    }

    /// Mutable copy
    pub fn melt(&self) -> Self {
        let mut new = self.clone();
        new.frozen = false;
        new
    }
}

fn describe<A: fmt::Debug>(node: &Node<A>) -> String {
    format!("#{}:{:?}", node.id, node.alias)
}

impl<A: Label> PartialEq for Forest<A> {
    fn eq(&self, other: &Self) -> bool {
        Forest::equals(self, other, Selector::All, Selector::All).unwrap_or(false)
    }
}

impl<A: Label> Add for &Forest<A> {
    type Output = Forest<A>;

    fn add(self, other: &Forest<A>) -> Forest<A> {
        self.union(other)
    }
}

impl<A: Label> AddAssign<&Forest<A>> for Forest<A> {
    fn add_assign(&mut self, other: &Forest<A>) {
        self.update(other);
    }
}

impl AddAssign<&str> for Forest<String> {
    fn add_assign(&mut self, alias: &str) {
        self.add_tree(alias);
    }
}

impl<A: Label> Sub for &Forest<A> {
    type Output = Forest<A>;

    fn sub(self, other: &Forest<A>) -> Forest<A> {
        self.difference(other)
    }
}

impl<A: Label> BitAnd for &Forest<A> {
    type Output = Forest<A>;

    fn bitand(self, other: &Forest<A>) -> Forest<A> {
        self.intersect(other)
    }
}

impl<A: Label + fmt::Display> fmt::Display for Forest<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let starts = self.trees.iter().collect();
        let options = ClimbOptions::new().with_level(true);
        for (i, step) in Climb::new(self, starts, options).enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let indent = "  ".repeat(step.level.unwrap_or_default());
            write!(f, "{}{}", indent, step.lower)?;
        }
        Ok(())
    }
}
