//! Told hierarchy with transitive closure and equivalence grouping

use orbweaver_core::node::{Node, NodeSet};
use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;

/// Directed "is-a" graph over entities of one kind.
///
/// Edges are told; [`Hierarchy::close`] computes ancestors and descendants
/// for every entity. Entities on a cycle are equivalent.
#[derive(Debug, Clone)]
pub struct Hierarchy<T> {
    parents: HashMap<T, BTreeSet<T>>,
    ancestors: HashMap<T, BTreeSet<T>>,
    descendants: HashMap<T, BTreeSet<T>>,
}

impl<T: Ord + Hash + Clone> Default for Hierarchy<T> {
    fn default() -> Self {
        Self {
            parents: HashMap::new(),
            ancestors: HashMap::new(),
            descendants: HashMap::new(),
        }
    }
}

impl<T: Ord + Hash + Clone> Hierarchy<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entity(&mut self, entity: T) {
        self.parents.entry(entity).or_default();
    }

    pub fn add_edge(&mut self, child: T, parent: T) {
        self.add_entity(parent.clone());
        self.parents.entry(child).or_default().insert(parent);
    }

    pub fn contains(&self, entity: &T) -> bool {
        self.parents.contains_key(entity)
    }

    pub fn entities(&self) -> impl Iterator<Item = &T> {
        self.parents.keys()
    }

    /// Compute the transitive closure of the told edges
    pub fn close(&mut self) {
        self.ancestors.clear();
        self.descendants.clear();

        for entity in self.parents.keys() {
            let mut reached = BTreeSet::new();
            let mut frontier: Vec<&T> = self.parents.get(entity).into_iter().flatten().collect();

            while let Some(next) = frontier.pop() {
                if reached.insert(next.clone()) {
                    frontier.extend(self.parents.get(next).into_iter().flatten());
                }
            }

            for ancestor in &reached {
                self.descendants.entry(ancestor.clone()).or_default().insert(entity.clone());
            }
            self.ancestors.insert(entity.clone(), reached);
        }
    }

    /// Every entity reachable upwards, possibly including `entity` itself on a cycle
    pub fn ancestors(&self, entity: &T) -> BTreeSet<T> {
        self.ancestors.get(entity).cloned().unwrap_or_default()
    }

    pub fn descendants(&self, entity: &T) -> BTreeSet<T> {
        self.descendants.get(entity).cloned().unwrap_or_default()
    }

    /// `entity` together with everything on a cycle through it
    pub fn equivalents(&self, entity: &T) -> BTreeSet<T> {
        let mut equivalents: BTreeSet<T> = self
            .ancestors(entity)
            .into_iter()
            .filter(|ancestor| self.is_ancestor(entity, ancestor))
            .collect();
        equivalents.insert(entity.clone());
        equivalents
    }

    /// `ancestor` is reachable upwards from `entity`
    pub fn is_ancestor(&self, ancestor: &T, entity: &T) -> bool {
        self.ancestors.get(entity).map_or(false, |reached| reached.contains(ancestor))
    }

    /// `ancestor` subsumes `entity`: equal or reachable
    pub fn subsumes(&self, ancestor: &T, entity: &T) -> bool {
        ancestor == entity || self.is_ancestor(ancestor, entity)
    }

    pub fn strict_ancestors(&self, entity: &T) -> BTreeSet<T> {
        let equivalents = self.equivalents(entity);
        self.ancestors(entity).into_iter().filter(|a| !equivalents.contains(a)).collect()
    }

    pub fn strict_descendants(&self, entity: &T) -> BTreeSet<T> {
        let equivalents = self.equivalents(entity);
        self.descendants(entity).into_iter().filter(|d| !equivalents.contains(d)).collect()
    }

    /// Strict ancestors with no strict ancestor in between
    pub fn direct_ancestors(&self, entity: &T) -> BTreeSet<T> {
        let strict = self.strict_ancestors(entity);
        self.most_specific(&strict)
    }

    /// Strict descendants with no strict descendant in between
    pub fn direct_descendants(&self, entity: &T) -> BTreeSet<T> {
        let strict = self.strict_descendants(entity);
        strict
            .iter()
            .filter(|candidate| {
                !strict
                    .iter()
                    .any(|other| self.is_ancestor(other, candidate) && !self.is_ancestor(candidate, other))
            })
            .cloned()
            .collect()
    }

    /// Members of `entities` that do not strictly subsume another member
    pub fn most_specific(&self, entities: &BTreeSet<T>) -> BTreeSet<T> {
        entities
            .iter()
            .filter(|candidate| {
                !entities
                    .iter()
                    .any(|other| self.is_ancestor(candidate, other) && !self.is_ancestor(other, candidate))
            })
            .cloned()
            .collect()
    }

    pub fn node(&self, entity: &T) -> Node<T> {
        Node::new(self.equivalents(entity))
    }

    /// Group entities into nodes of equivalents
    pub fn group<'a, I>(&self, entities: I) -> NodeSet<T>
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        entities.into_iter().map(|entity| self.node(entity)).collect()
    }
}
