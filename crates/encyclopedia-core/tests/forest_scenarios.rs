use encyclopedia_core::{alias_set, ClimbOptions, Forest, Node, Operand, Selector};
use std::collections::BTreeSet;

fn build(edges: &[(&str, &str)], roots: &[&str]) -> Forest {
    let mut forest: Forest = Forest::new();
    for root in roots {
        forest.add_tree(*root);
    }
    for (parent, child) in edges {
        forest.add_twig(*parent, *child).unwrap();
    }
    forest
}

fn grove() -> Forest {
    build(
        &[
            ("G01", "G11"),
            ("G01", "G12"),
            ("G11", "G21"),
            ("G21", "G31"),
            ("G21", "G32"),
            ("G21", "G33"),
            ("G32", "G41"),
        ],
        &["G01", "G02"],
    )
}

fn aliases(nodes: &BTreeSet<Node<String>>) -> BTreeSet<String> {
    alias_set(nodes)
}

fn strings(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_grove_scenario() {
    let f = grove();

    assert_eq!(f.trees().count(), 2);
    assert_eq!(f.height(), Some(4));
    assert_eq!(f.canopy().len(), 4);
    assert_eq!(aliases(&f.root("G21").unwrap()), strings(&["G01"]));
    assert_eq!(aliases(&f.leaves("G21").unwrap()), strings(&["G31", "G33", "G41"]));
}

#[test]
fn test_graft_five_onto_eight() {
    let mut a = build(
        &[
            ("G01", "G11"),
            ("G01", "G12"),
            ("G11", "G21"),
            ("G21", "G31"),
            ("G21", "G32"),
            ("G21", "G33"),
            ("G32", "G41"),
        ],
        &["G01"],
    );
    let b = build(&[("B0", "B1"), ("B0", "B2"), ("B1", "B3"), ("B1", "B4")], &["B0"]);
    assert_eq!(a.len(), 8);
    assert_eq!(b.len(), 5);

    let before = a.counter();
    a.graft(&b, Some("G33".into())).unwrap();

    assert_eq!(a.len(), 13);
    assert!(a.counter() >= before + 5);
    let ids: BTreeSet<_> = a.nodes().map(|n| n.id).collect();
    assert_eq!(ids.len(), 13);
    let grafted = a.get("B0").unwrap();
    assert!(Forest::equals(&grafted, &b, Selector::All, Selector::All).unwrap());
}

#[test]
fn test_cut_then_graft_round_trip() {
    let f = grove();
    for alias in ["G01", "G11", "G21", "G32", "G02"] {
        let cut = f.cutting(alias, 0, None).unwrap();
        let mut empty: Forest = Forest::new();
        empty.graft(&cut, None).unwrap();

        assert!(Forest::equals(&empty, &cut, Selector::All, Selector::All).unwrap());
        assert_eq!(empty, cut);
    }
}

#[test]
fn test_cut_with_offset_round_trip() {
    let f = grove();
    let cut = f.cutting("G11", 500, None).unwrap();
    let plain = f.get("G11").unwrap();
    assert_eq!(cut, plain);
    assert!(cut.nodes().all(|n| n.id.0 >= 500));
}

#[test]
fn test_idempotence() {
    let f = grove();

    assert_eq!(&f & &f, f);
    assert_eq!((&f - &f).len(), 0);
    let doubled = f.compose(Operand::Scale(3)).unwrap();
    let once = doubled.prune();
    assert_eq!(once.prune(), once);
    assert_eq!(once.len(), f.len());
}

#[test]
fn test_union_of_disjoint_forests() {
    let a = grove();
    let b = build(&[("x", "y"), ("y", "z")], &["x", "w"]);

    let union = &a + &b;
    assert_eq!(union.len(), a.len() + b.len());
    assert_eq!(union.trees().count(), 4);
    assert!(union.is_empty() == (a.is_empty() && b.is_empty()));
}

#[test]
fn test_sorted_is_topological() {
    let f = grove();
    let order: Vec<Node<String>> = f
        .sorted(Selector::All, ClimbOptions::new())
        .unwrap()
        .into_iter()
        .filter_map(|step| step.lower.into_node())
        .collect();
    assert_eq!(order.len(), f.len());

    for (i, node) in order.iter().enumerate() {
        let mut ancestor = f.below(node).unwrap();
        while let Some(parent) = ancestor.pop() {
            let position = order.iter().position(|n| n.id == parent.id).unwrap();
            assert!(position < i, "{:?} appears after {:?}", parent, node);
            ancestor = f.below(&parent).unwrap();
        }
    }
}

#[test]
fn test_delete_keeps_indices_coherent() {
    for alias in ["G01", "G11", "G21", "G32", "G41", "G02"] {
        let mut f = grove();
        let doomed = f.get(alias).unwrap().len();
        let before = f.len();
        f.delete(alias).unwrap();

        assert_eq!(f.len(), before - doomed);
        assert!(!f.contains(alias));
        for node in f.nodes() {
            let level = f.level(node).unwrap();
            match f.below(node).unwrap().first() {
                Some(parent) => assert_eq!(f.level(parent).unwrap() + 1, level),
                None => assert_eq!(level, 0),
            }
        }
        let restored = Forest::restore(f.snapshot()).unwrap();
        assert_eq!(restored, f);
    }
}

#[test]
fn test_branches_and_splice() {
    let f = grove();
    let branches = f.branches("G21").unwrap();
    assert_eq!(branches.len(), 3);
    assert_eq!(branches.iter().map(Forest::len).sum::<usize>(), 4);

    let patch = build(&[("G41", "G51"), ("G51", "G61")], &["G41"]);
    let spliced = f.compose(Operand::Container(&patch)).unwrap();
    assert_eq!(spliced.len(), f.len() + 2);
    assert_eq!(spliced.height(), Some(6));
}

#[test]
fn test_limb_shares_ancestors() {
    let f = grove();
    let limb = f.limb("G21", 0).unwrap();
    assert_eq!(alias_set(limb.nodes()), strings(&["G01", "G11", "G21"]));

    let mut wide = grove();
    wide.add_twig("G12", "G21").unwrap();
    let merged = wide.limb("G21", 0).unwrap();
    assert_eq!(merged.len(), 5);
    assert_eq!(merged.trees().count(), 1);
}

#[test]
fn test_frozen_forest_is_untouched() {
    let frozen = grove().freeze();
    let mut copy = frozen.clone();
    copy.delete("G01").unwrap();
    copy.add_twig("G41", "G51").unwrap();
    copy.graft(&grove(), None).unwrap();

    assert_eq!(copy, frozen);
    assert!((&frozen + &grove()).is_frozen());
    assert_eq!((&frozen + &grove()).len(), 18);
}
