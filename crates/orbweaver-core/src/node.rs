//! Reasoner result containers: a node is a set of equivalent entities

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Set of entities known to be equivalent
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Node<T: Ord> {
    entities: BTreeSet<T>,
}

impl<T: Ord> Node<T> {
    pub fn new(entities: BTreeSet<T>) -> Self {
        Self { entities }
    }

    pub fn empty() -> Self {
        Self { entities: BTreeSet::new() }
    }

    pub fn singleton(entity: T) -> Self {
        let mut entities = BTreeSet::new();
        entities.insert(entity);
        Self { entities }
    }

    pub fn entities(&self) -> &BTreeSet<T> {
        &self.entities
    }

    pub fn into_entities(self) -> BTreeSet<T> {
        self.entities
    }

    pub fn contains(&self, entity: &T) -> bool {
        self.entities.contains(entity)
    }

    /// Smallest member, stable across runs
    pub fn representative(&self) -> Option<&T> {
        self.entities.iter().next()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entities.iter()
    }
}

impl<T: Ord> FromIterator<T> for Node<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self { entities: iter.into_iter().collect() }
    }
}

/// Set of nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSet<T: Ord> {
    nodes: BTreeSet<Node<T>>,
}

impl<T: Ord + Clone> NodeSet<T> {
    pub fn new() -> Self {
        Self { nodes: BTreeSet::new() }
    }

    /// One singleton node per entity
    pub fn from_singletons<I: IntoIterator<Item = T>>(entities: I) -> Self {
        entities.into_iter().map(Node::singleton).collect()
    }

    pub fn insert(&mut self, node: Node<T>) {
        if !node.is_empty() {
            self.nodes.insert(node);
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node<T>> {
        self.nodes.iter()
    }

    /// Union of all nodes
    pub fn flattened(&self) -> BTreeSet<T> {
        self.nodes.iter().flat_map(|node| node.iter().cloned()).collect()
    }

    pub fn contains_entity(&self, entity: &T) -> bool {
        self.nodes.iter().any(|node| node.contains(entity))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl<T: Ord + Clone> Default for NodeSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord + Clone> FromIterator<Node<T>> for NodeSet<T> {
    fn from_iter<I: IntoIterator<Item = Node<T>>>(iter: I) -> Self {
        let mut set = NodeSet::new();
        for node in iter {
            set.insert(node);
        }
        set
    }
}
