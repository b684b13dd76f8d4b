//! Discrete relations for all four mapping cardinalities
//!
//! A [`Relation`] stores its pairs twice: `forward` maps each domain value to
//! its range values and `inverse` maps each range value back to its domain
//! values. Both maps are kept as exact duals under every cardinality, which
//! makes lookups in either direction and inversion cheap.

use crate::cardinality::Cardinality;
use crate::error::{Error, Result};
use crate::operand::Operand;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::{Add, BitAnd, Mul, Not, Sub};

/// Values usable as relation keys and forest aliases
pub trait Label: Ord + Clone + fmt::Debug {}

impl<T: Ord + Clone + fmt::Debug> Label for T {}

/// Result of a lookup, shaped by the relation's cardinality
#[derive(Debug, PartialEq, Eq)]
pub enum Image<'a, R> {
    /// Functional side (1:1, M:1): the single associated value
    One(&'a R),
    /// Multi-valued side (1:M, M:M): every associated value, insertion order
    Many(&'a [R]),
}

impl<'a, R> Image<'a, R> {
    pub fn as_slice(&self) -> &'a [R] {
        match *self {
            Self::One(value) => std::slice::from_ref(value),
            Self::Many(values) => values,
        }
    }

    /// The value when exactly one is associated
    pub fn single(&self) -> Option<&'a R> {
        match *self {
            Self::One(value) => Some(value),
            Self::Many([value]) => Some(value),
            Self::Many(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'a, R> {
        self.as_slice().iter()
    }
}

impl<R> Clone for Image<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for Image<'_, R> {}

/// Cardinality-typed, bidirectional multimap
#[derive(Debug, Clone)]
pub struct Relation<D, R> {
    forward: BTreeMap<D, Vec<R>>,
    inverse: BTreeMap<R, Vec<D>>,
    cardinality: Cardinality,
    frozen: bool,
}

impl<D: Label, R: Label> Default for Relation<D, R> {
    fn default() -> Self {
        Self::general()
    }
}

/// Remove `value` from the bucket under `key`, dropping the bucket once empty
fn detach<K: Ord, V: PartialEq>(map: &mut BTreeMap<K, Vec<V>>, key: &K, value: &V) {
    if let Some(bucket) = map.get_mut(key) {
        bucket.retain(|v| v != value);
        if bucket.is_empty() {
            map.remove(key);
        }
    }
}

fn attach<K: Ord, V: PartialEq>(map: &mut BTreeMap<K, Vec<V>>, key: K, value: V) {
    let bucket = map.entry(key).or_default();
    if !bucket.contains(&value) {
        bucket.push(value);
    }
}

impl<D: Label, R: Label> Relation<D, R> {
    /// Create an empty relation
    pub fn new(cardinality: Cardinality) -> Self {
        Self {
            forward: BTreeMap::new(),
            inverse: BTreeMap::new(),
            cardinality,
            frozen: false,
        }
    }

    /// Create an empty relation from a cardinality tag such as `"M:1"`
    pub fn parse(tag: &str) -> Result<Self> {
        Ok(Self::new(tag.parse()?))
    }

    /// 1:1 relation
    pub fn isomorphism() -> Self {
        Self::new(Cardinality::OneToOne)
    }

    /// M:1 relation (an ordinary function)
    pub fn function() -> Self {
        Self::new(Cardinality::ManyToOne)
    }

    /// 1:M relation
    pub fn partition() -> Self {
        Self::new(Cardinality::OneToMany)
    }

    /// M:M relation
    pub fn general() -> Self {
        Self::new(Cardinality::ManyToMany)
    }

    /// Build a relation by inserting `pairs` in order
    ///
    /// Later pairs evict earlier ones wherever the cardinality demands it, so
    /// a mapping (unique keys) loads identically under every cardinality
    /// except where its values collide.
    pub fn from_pairs<I>(cardinality: Cardinality, pairs: I) -> Self
    where
        I: IntoIterator<Item = (D, R)>,
    {
        let mut relation = Self::new(cardinality);
        for (domain, range) in pairs {
            relation.set(domain, range);
        }
        relation
    }

    /// M:1 relation holding every entry of a mapping
    pub fn from_map(map: BTreeMap<D, R>) -> Self {
        Self::from_pairs(Cardinality::ManyToOne, map)
    }

    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    /// Number of distinct domain values
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Number of (domain, range) pairs
    pub fn pair_count(&self) -> usize {
        self.forward.values().map(Vec::len).sum()
    }

    pub fn contains(&self, domain: &D) -> bool {
        self.forward.contains_key(domain)
    }

    pub fn contains_range(&self, range: &R) -> bool {
        self.inverse.contains_key(range)
    }

    pub fn contains_pair(&self, domain: &D, range: &R) -> bool {
        self.forward
            .get(domain)
            .is_some_and(|bucket| bucket.contains(range))
    }

    /// The stored domain value equal to `key`
    pub fn domain_key<Q>(&self, key: &Q) -> Option<&D>
    where
        D: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.forward.get_key_value(key).map(|(k, _)| k)
    }

    /// Domain values in canonical order
    pub fn keys(&self) -> impl Iterator<Item = &D> + '_ {
        self.forward.keys()
    }

    /// Distinct range values in canonical order
    pub fn values(&self) -> impl Iterator<Item = &R> + '_ {
        self.inverse.keys()
    }

    /// Every (domain, range) pair
    pub fn iter(&self) -> impl Iterator<Item = (&D, &R)> + '_ {
        self.forward
            .iter()
            .flat_map(|(domain, bucket)| bucket.iter().map(move |range| (domain, range)))
    }

    /// Every domain value with its lookup result
    pub fn items(&self) -> impl Iterator<Item = (&D, Image<'_, R>)> + '_ {
        let unique = self.cardinality.unique_domain();
        self.forward.iter().map(move |(domain, bucket)| {
            let image = match bucket.first() {
                Some(first) if unique => Image::One(first),
                _ => Image::Many(bucket.as_slice()),
            };
            (domain, image)
        })
    }

    /// Add a pair, evicting whatever the cardinality forbids first
    ///
    /// 1:1 and M:1 overwrite an existing pair with the same domain; 1:1 and
    /// 1:M evict an existing pair with the same range. M:M accumulates.
    pub fn set(&mut self, domain: D, range: R) {
        if self.frozen {
            tracing::trace!("Ignoring set on frozen relation: {:?}", domain);
            return;
        }
        if self.cardinality.unique_domain() {
            self.remove_domain(&domain);
        }
        if self.cardinality.unique_range() {
            self.remove_range(&range);
        }
        attach(&mut self.inverse, range.clone(), domain.clone());
        attach(&mut self.forward, domain, range);
    }

    /// Look up the range of `domain`
    pub fn get(&self, domain: &D) -> Result<Image<'_, R>> {
        let bucket = self
            .forward
            .get(domain)
            .ok_or_else(|| Error::KeyNotFound(format!("{:?}", domain)))?;
        Ok(match bucket.first() {
            Some(first) if self.cardinality.unique_domain() => Image::One(first),
            _ => Image::Many(bucket),
        })
    }

    /// Look up the domain values that reach `range`
    pub fn get_inverse(&self, range: &R) -> Result<Image<'_, D>> {
        let bucket = self
            .inverse
            .get(range)
            .ok_or_else(|| Error::KeyNotFound(format!("{:?}", range)))?;
        Ok(match bucket.first() {
            Some(first) if self.cardinality.unique_range() => Image::One(first),
            _ => Image::Many(bucket),
        })
    }

    /// Range values of `domain` regardless of cardinality
    pub fn image(&self, domain: &D) -> Result<&[R]> {
        self.get(domain).map(|image| image.as_slice())
    }

    /// Domain values of `range` regardless of cardinality
    pub fn preimage(&self, range: &R) -> Result<&[D]> {
        self.get_inverse(range).map(|image| image.as_slice())
    }

    /// Remove a domain value, ignoring the frozen flag; false if absent
    pub(crate) fn discard(&mut self, domain: &D) -> bool {
        self.remove_domain(domain)
    }

    /// Remove a range value, ignoring the frozen flag; false if absent
    pub(crate) fn discard_range(&mut self, range: &R) -> bool {
        self.remove_range(range)
    }

    fn remove_domain(&mut self, domain: &D) -> bool {
        let Some(bucket) = self.forward.remove(domain) else {
            return false;
        };
        for range in &bucket {
            detach(&mut self.inverse, range, domain);
        }
        true
    }

    fn remove_range(&mut self, range: &R) -> bool {
        let Some(bucket) = self.inverse.remove(range) else {
            return false;
        };
        for domain in &bucket {
            detach(&mut self.forward, domain, range);
        }
        true
    }

    /// Remove every pair with this domain value
    pub fn delete(&mut self, domain: &D) -> Result<()> {
        if self.frozen {
            return Ok(());
        }
        if self.remove_domain(domain) {
            Ok(())
        } else {
            Err(Error::KeyNotFound(format!("{:?}", domain)))
        }
    }

    /// Remove every pair with this range value
    pub fn delete_range(&mut self, range: &R) -> Result<()> {
        if self.frozen {
            return Ok(());
        }
        if self.remove_range(range) {
            Ok(())
        } else {
            Err(Error::KeyNotFound(format!("{:?}", range)))
        }
    }

    /// Swap domain and range in O(1)
    ///
    /// The two maps move into each other's roles; nothing is copied.
    pub fn invert(self) -> Relation<R, D> {
        Relation {
            forward: self.inverse,
            inverse: self.forward,
            cardinality: self.cardinality.invert(),
            frozen: self.frozen,
        }
    }

    /// Inverted copy, leaving `self` untouched
    pub fn inverted(&self) -> Relation<R, D> {
        self.clone().invert()
    }

    /// Relational composition: `d -> t` wherever some `m` has `d -> m -> t`
    pub fn compose_relation<T: Label>(&self, other: &Relation<R, T>) -> Relation<D, T> {
        let mut composed = Relation::new(self.cardinality.compose(other.cardinality));
        for (domain, middle) in self.iter() {
            if let Some(targets) = other.forward.get(middle) {
                for target in targets {
                    composed.set(domain.clone(), target.clone());
                }
            }
        }
        composed
    }

    /// Functional composition: apply `f` to every range value
    ///
    /// Values for which `f` returns `None` are dropped; the cardinality is
    /// kept.
    pub fn map<T, F>(&self, mut f: F) -> Relation<D, T>
    where
        T: Label,
        F: FnMut(&R) -> Option<T>,
    {
        let mut mapped = Relation::new(self.cardinality);
        for (domain, range) in self.iter() {
            if let Some(value) = f(range) {
                mapped.set(domain.clone(), value);
            }
        }
        mapped
    }

    /// Compose with any operand
    pub fn compose(&self, operand: Operand<'_, Relation<R, R>, R>) -> Result<Relation<D, R>> {
        tracing::debug!("Composing {} relation with {}", self.cardinality, operand.kind());
        match operand {
            Operand::Container(other) => Ok(self.compose_relation(other)),
            Operand::Function(f) => Ok(self.map(f)),
            Operand::Identity => Ok(self.clone()),
            Operand::Zero => Ok(Self::new(self.cardinality)),
            Operand::Scale(n) => Err(Error::InvalidOperation(format!(
                "a relation cannot be scaled (by {})",
                n
            ))),
        }
    }

    /// Insert every pair of `other` under this relation's cardinality
    pub fn update(&mut self, other: &Relation<D, R>) -> &mut Self {
        if self.frozen {
            return self;
        }
        for (domain, range) in other.iter() {
            self.set(domain.clone(), range.clone());
        }
        self
    }

    /// Remove every domain value present in `other`
    pub fn subtract<T: Label>(&mut self, other: &Relation<D, T>) -> &mut Self {
        if self.frozen {
            return self;
        }
        for domain in other.keys() {
            self.remove_domain(domain);
        }
        self
    }

    /// New relation holding the pairs of both; frozen if `self` is
    pub fn union(&self, other: &Relation<D, R>) -> Self {
        let mut new = self.melt();
        new.update(other);
        new.frozen = self.frozen;
        new
    }

    /// New relation without the domain values of `other`; frozen if `self` is
    pub fn difference<T: Label>(&self, other: &Relation<D, T>) -> Self {
        let mut new = self.melt();
        new.subtract(other);
        new.frozen = self.frozen;
        new
    }

    /// Pairs whose domain also appears in `other`, i.e. `A - (A - B)`
    pub fn intersect<T: Label>(&self, other: &Relation<D, T>) -> Self {
        self.difference(&self.difference(other))
    }

    /// Experimental cross product
    ///
    /// For every pair of domain values `(a, b)` the value sets of `a` and `b`
    /// are combined with `combine`, and every resulting value is related to
    /// `(a, b)` in a new M:M relation.
    pub fn cross<D2, F>(&self, other: &Relation<D2, R>, combine: F) -> Relation<(D, D2), R>
    where
        D2: Label,
        F: Fn(&BTreeSet<R>, &BTreeSet<R>) -> BTreeSet<R>,
    {
        let mut crossed = Relation::general();
        for (left, left_values) in &self.forward {
            let left_set: BTreeSet<R> = left_values.iter().cloned().collect();
            for (right, right_values) in &other.forward {
                let right_set: BTreeSet<R> = right_values.iter().cloned().collect();
                for value in combine(&left_set, &right_set) {
                    crossed.set((left.clone(), right.clone()), value);
                }
            }
        }
        crossed
    }

    /// Forward and inverse hold exactly the same pairs
    pub fn is_consistent(&self) -> bool {
        let forward = self.iter().all(|(d, r)| {
            self.inverse
                .get(r)
                .is_some_and(|bucket| bucket.contains(d))
        });
        let pairs: usize = self.inverse.values().map(Vec::len).sum();
        forward && pairs == self.pair_count() && self.forward.values().all(|b| !b.is_empty())
    }

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

impl<D: Label, R: Label> PartialEq for Relation<D, R> {
    fn eq(&self, other: &Self) -> bool {
        self.cardinality == other.cardinality
            && self.forward.len() == other.forward.len()
            && self.forward.iter().all(|(domain, bucket)| {
                other.forward.get(domain).is_some_and(|theirs| {
                    theirs.len() == bucket.len() && bucket.iter().all(|r| theirs.contains(r))
                })
            })
    }
}

impl<D: Label, R: Label> Eq for Relation<D, R> {}

impl<D: Label, R: Label> FromIterator<(D, R)> for Relation<D, R> {
    fn from_iter<I: IntoIterator<Item = (D, R)>>(iter: I) -> Self {
        Self::from_pairs(Cardinality::ManyToMany, iter)
    }
}

impl<D: Label, R: Label> Extend<(D, R)> for Relation<D, R> {
    fn extend<I: IntoIterator<Item = (D, R)>>(&mut self, iter: I) {
        for (domain, range) in iter {
            self.set(domain, range);
        }
    }
}

impl<D: Label, R: Label> Not for Relation<D, R> {
    type Output = Relation<R, D>;

    fn not(self) -> Relation<R, D> {
        self.invert()
    }
}

impl<D: Label, R: Label> Add for &Relation<D, R> {
    type Output = Relation<D, R>;

    fn add(self, other: &Relation<D, R>) -> Relation<D, R> {
        self.union(other)
    }
}

impl<D: Label, R: Label, T: Label> Sub<&Relation<D, T>> for &Relation<D, R> {
    type Output = Relation<D, R>;

    fn sub(self, other: &Relation<D, T>) -> Relation<D, R> {
        self.difference(other)
    }
}

impl<D: Label, R: Label, T: Label> BitAnd<&Relation<D, T>> for &Relation<D, R> {
    type Output = Relation<D, R>;

    fn bitand(self, other: &Relation<D, T>) -> Relation<D, R> {
        self.intersect(other)
    }
}

impl<D: Label, R: Label, T: Label> Mul<&Relation<R, T>> for &Relation<D, R> {
    type Output = Relation<D, T>;

    fn mul(self, other: &Relation<R, T>) -> Relation<D, T> {
        self.compose_relation(other)
    }
}

impl<D: Label, R: Label> fmt::Display for Relation<D, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "->")?;
        for (domain, bucket) in &self.forward {
            writeln!(f, "{:?} < {:?}", domain, bucket)?;
        }
        write!(f, "<-")?;
        for (range, bucket) in &self.inverse {
            write!(f, "\n{:?} < {:?}", range, bucket)?;
        }
        Ok(())
    }
}

/// Wire form of a relation: its cardinality and every pair
#[derive(Serialize, Deserialize)]
struct RelationRepr<D, R> {
    cardinality: Cardinality,
    pairs: Vec<(D, R)>,
}

impl<D: Label + Serialize, R: Label + Serialize> Serialize for Relation<D, R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        RelationRepr {
            cardinality: self.cardinality,
            pairs: self.iter().map(|(d, r)| (d.clone(), r.clone())).collect(),
        }
        .serialize(serializer)
    }
}

impl<'de, D, R> Deserialize<'de> for Relation<D, R>
where
    D: Label + Deserialize<'de>,
    R: Label + Deserialize<'de>,
{
    fn deserialize<De: Deserializer<'de>>(deserializer: De) -> std::result::Result<Self, De::Error> {
        let repr = RelationRepr::<D, R>::deserialize(deserializer)?;
        Ok(Self::from_pairs(repr.cardinality, repr.pairs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(relation: &Relation<&'static str, &'static str>) -> Vec<(&'static str, &'static str)> {
        relation.iter().map(|(d, r)| (*d, *r)).collect()
    }

    #[test]
    fn test_function_overwrites() {
        let mut f = Relation::function();
        f.set("apple", "red");
        f.set("apple", "green");

        assert_eq!(f.get(&"apple").unwrap(), Image::One(&"green"));
        assert!(!f.contains_range(&"red"));
        assert_eq!(f.preimage(&"green").unwrap(), &["apple"]);
        assert!(f.is_consistent());
    }

    #[test]
    fn test_function_allows_shared_range() {
        let mut f = Relation::function();
        f.set("apple", "red");
        f.set("cherry", "red");

        assert_eq!(f.get_inverse(&"red").unwrap(), Image::Many(&["apple", "cherry"][..]));
        assert_eq!(f.len(), 2);
    }

    #[test]
    fn test_partition_accumulates_and_evicts_range() {
        let mut p = Relation::partition();
        p.set("warm", "red");
        p.set("warm", "orange");
        assert_eq!(p.get(&"warm").unwrap(), Image::Many(&["red", "orange"][..]));

        // "red" may only belong to one domain value
        p.set("cold", "red");
        assert_eq!(p.image(&"warm").unwrap(), &["orange"]);
        assert_eq!(p.get_inverse(&"red").unwrap(), Image::One(&"cold"));
        assert!(p.is_consistent());
    }

    #[test]
    fn test_isomorphism_is_unique_both_ways() {
        let mut iso = Relation::isomorphism();
        iso.set(1, 'a');
        iso.set(2, 'b');
        iso.set(1, 'b');

        assert_eq!(iso.len(), 1);
        assert_eq!(iso.get(&1).unwrap(), Image::One(&'b'));
        assert!(!iso.contains(&2));
        assert!(!iso.contains_range(&'a'));
        assert!(iso.is_consistent());
    }

    #[test]
    fn test_general_has_set_semantics() {
        let mut g = Relation::general();
        g.set("a", "x");
        g.set("a", "x");
        g.set("a", "y");
        g.set("b", "x");

        assert_eq!(g.pair_count(), 3);
        assert_eq!(g.image(&"a").unwrap(), &["x", "y"]);
        assert_eq!(g.preimage(&"x").unwrap(), &["a", "b"]);
    }

    #[test]
    fn test_get_missing_key() {
        let f: Relation<&str, &str> = Relation::function();
        assert!(matches!(f.get(&"nope"), Err(Error::KeyNotFound(_))));
    }

    #[test]
    fn test_delete_cleans_inverse() {
        let mut g: Relation<&str, &str> =
            [("a", "x"), ("a", "y"), ("b", "y")].into_iter().collect();
        g.delete(&"a").unwrap();

        assert_eq!(pairs(&g), vec![("b", "y")]);
        assert!(!g.contains_range(&"x"));
        assert_eq!(g.preimage(&"y").unwrap(), &["b"]);
        assert!(g.delete(&"a").unwrap_err().is_not_found());
    }

    #[test]
    fn test_delete_range() {
        let mut g: Relation<&str, &str> =
            [("a", "x"), ("a", "y"), ("b", "y")].into_iter().collect();
        g.delete_range(&"y").unwrap();

        assert_eq!(pairs(&g), vec![("a", "x")]);
        assert!(!g.contains(&"b"));
    }

    #[test]
    fn test_invert_swaps_roles() {
        let p = Relation::from_pairs(Cardinality::OneToMany, [("warm", "red"), ("warm", "orange")]);
        let inv = !p.clone();

        assert_eq!(inv.cardinality(), Cardinality::ManyToOne);
        assert_eq!(inv.get(&"red").unwrap(), Image::One(&"warm"));
        assert_eq!(inv.invert(), p);
    }

    #[test]
    fn test_compose_relations() {
        let fruit = Relation::from_pairs(
            Cardinality::ManyToOne,
            [("apple", "red"), ("blueberry", "blue"), ("lime", "green")],
        );
        let colors = Relation::from_pairs(
            Cardinality::ManyToOne,
            [("red", "FF0000"), ("blue", "0000FF")],
        );
        let hex = &fruit * &colors;

        assert_eq!(hex.cardinality(), Cardinality::ManyToOne);
        assert_eq!(hex.len(), 2);
        assert_eq!(hex.get(&"apple").unwrap(), Image::One(&"FF0000"));
        assert!(!hex.contains(&"lime"));
    }

    #[test]
    fn test_compose_function_filters() {
        let f = Relation::from_pairs(Cardinality::ManyToOne, [("a", 1), ("b", 2), ("c", 3)]);
        let odd_doubled = f.map(|v| (v % 2 == 1).then_some(v * 2));

        assert_eq!(odd_doubled.cardinality(), Cardinality::ManyToOne);
        assert_eq!(odd_doubled.image(&"a").unwrap(), &[2]);
        assert_eq!(odd_doubled.image(&"c").unwrap(), &[6]);
        assert!(!odd_doubled.contains(&"b"));
    }

    #[test]
    fn test_compose_operands() {
        let f = Relation::from_pairs(Cardinality::ManyToOne, [(1, 10), (2, 20)]);
        let halve = |v: &i32| Some(v / 2);

        assert_eq!(f.compose(Operand::Identity).unwrap(), f);
        assert!(f.compose(Operand::Zero).unwrap().is_empty());
        assert_eq!(f.compose(Operand::Function(&halve)).unwrap().image(&2).unwrap(), &[10]);
        let err = f.compose(Operand::Scale(3)).unwrap_err();
        assert!(matches!(err, Error::InvalidOperation(_)));
    }

    #[test]
    fn test_set_algebra() {
        let a: Relation<&str, i32> = [("x", 1), ("y", 2), ("z", 3)].into_iter().collect();
        let b: Relation<&str, i32> = [("y", 20), ("w", 4)].into_iter().collect();

        let union = &a + &b;
        assert_eq!(union.len(), 4);
        assert_eq!(union.image(&"y").unwrap(), &[2, 20]);

        let difference = &a - &b;
        assert_eq!(difference.keys().copied().collect::<Vec<_>>(), vec!["x", "z"]);

        let intersection = &a & &b;
        assert_eq!(intersection.keys().copied().collect::<Vec<_>>(), vec!["y"]);
        assert_eq!(intersection.image(&"y").unwrap(), &[2]);
    }

    #[test]
    fn test_union_respects_receiver_cardinality() {
        let a = Relation::from_pairs(Cardinality::ManyToOne, [("x", 1)]);
        let b = Relation::from_pairs(Cardinality::ManyToOne, [("x", 2)]);
        assert_eq!((&a + &b).get(&"x").unwrap(), Image::One(&2));
    }

    #[test]
    fn test_frozen_ignores_mutation() {
        let mut frozen = Relation::from_pairs(Cardinality::ManyToOne, [("a", 1)]).freeze();
        frozen.set("b", 2);
        frozen.delete(&"a").unwrap();
        frozen.delete(&"missing").unwrap();

        assert!(frozen.is_frozen());
        assert_eq!(frozen.len(), 1);

        let mut melted = frozen.melt();
        melted.set("b", 2);
        assert_eq!(melted.len(), 2);
    }

    #[test]
    fn test_cross_union() {
        let a: Relation<&str, i32> = [("a", 1), ("a", 2)].into_iter().collect();
        let b: Relation<&str, i32> = [("b", 2), ("b", 3)].into_iter().collect();
        let crossed = a.cross(&b, |l, r| l | r);

        assert_eq!(crossed.len(), 1);
        assert_eq!(crossed.image(&("a", "b")).unwrap(), &[1, 2, 3]);

        let common = a.cross(&b, |l, r| l & r);
        assert_eq!(common.image(&("a", "b")).unwrap(), &[2]);
    }

    #[test]
    fn test_serde_reinserts_through_set() {
        let json = r#"{"cardinality":"M:1","pairs":[["a",1],["a",2]]}"#;
        let relation: Relation<String, i32> = serde_json::from_str(json).unwrap();

        assert_eq!(relation.image(&"a".to_string()).unwrap(), &[2]);
        assert!(relation.is_consistent());
        let back = serde_json::to_string(&relation).unwrap();
        assert_eq!(back, r#"{"cardinality":"M:1","pairs":[["a",2]]}"#);
    }

    #[test]
    fn test_display_lists_both_directions() {
        let f = Relation::from_pairs(Cardinality::ManyToOne, [("a", 1)]);
        assert_eq!(f.to_string(), "->\n\"a\" < [1]\n<-\n1 < [\"a\"]");
    }
}
