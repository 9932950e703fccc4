//! Fact store: the queryable materialized view

use orbweaver_core::model::{Iri, Term, Triple};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;

type Positions = SmallVec<[usize; 8]>;

/// Immutable, indexed set of triples.
///
/// Built once from a rule engine's fixpoint and never patched afterwards;
/// a newer materialization is a new store.
#[derive(Debug, Clone, Default)]
pub struct FactStore {
    /// Sorted, deduplicated triples
    triples: Vec<Triple>,
    /// Subject index: subject -> ascending positions in `triples`
    subject_index: HashMap<Term, Positions>,
    /// Predicate index: predicate -> ascending positions
    predicate_index: HashMap<Iri, Positions>,
    /// Object index: object -> ascending positions
    object_index: HashMap<Term, Positions>,
}

impl FactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from any collection of triples; duplicates collapse
    pub fn from_triples<I: IntoIterator<Item = Triple>>(triples: I) -> Self {
        let mut triples: Vec<Triple> = triples.into_iter().collect();
        triples.sort_unstable();
        triples.dedup();

        let mut subject_index: HashMap<Term, Positions> = HashMap::new();
        let mut predicate_index: HashMap<Iri, Positions> = HashMap::new();
        let mut object_index: HashMap<Term, Positions> = HashMap::new();

        for (index, triple) in triples.iter().enumerate() {
            subject_index.entry(triple.subject.clone()).or_default().push(index);
            predicate_index.entry(triple.predicate.clone()).or_default().push(index);
            object_index.entry(triple.object.clone()).or_default().push(index);
        }

        Self {
            triples,
            subject_index,
            predicate_index,
            object_index,
        }
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.binary_search(triple).is_ok()
    }

    /// All triples in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Find triples matching a pattern, using the most selective indices
    pub fn find_triples(&self, subject: Option<&Term>, predicate: Option<&Iri>, object: Option<&Term>) -> Vec<&Triple> {
        let subjects = subject.map(|s| self.subject_index.get(s).map(|v| v.as_slice()).unwrap_or(&[]));
        let predicates = predicate.map(|p| self.predicate_index.get(p).map(|v| v.as_slice()).unwrap_or(&[]));
        let objects = object.map(|o| self.object_index.get(o).map(|v| v.as_slice()).unwrap_or(&[]));

        let candidates: Positions = match (subjects, predicates, objects) {
            (Some(s), Some(p), Some(o)) => Self::intersect_indices(&Self::intersect_indices(s, p), o),
            (Some(a), Some(b), None) | (Some(a), None, Some(b)) | (None, Some(a), Some(b)) => {
                Self::intersect_indices(a, b)
            }
            (Some(only), None, None) | (None, Some(only), None) | (None, None, Some(only)) => {
                only.iter().copied().collect()
            }
            (None, None, None) => return self.triples.iter().collect(),
        };

        candidates.iter().filter_map(|&index| self.triples.get(index)).collect()
    }

    /// Intersect two sorted index vectors
    fn intersect_indices(a: &[usize], b: &[usize]) -> Positions {
        let mut result = Positions::new();
        let mut i = 0;
        let mut j = 0;

        while i < a.len() && j < b.len() {
            match a[i].cmp(&b[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    result.push(a[i]);
                    i += 1;
                    j += 1;
                }
            }
        }

        result
    }

    pub fn statistics(&self) -> StoreStatistics {
        StoreStatistics {
            total_triples: self.triples.len(),
            distinct_subjects: self.subject_index.len(),
            distinct_predicates: self.predicate_index.len(),
            distinct_objects: self.object_index.len(),
        }
    }
}

impl FromIterator<Triple> for FactStore {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        FactStore::from_triples(iter)
    }
}

impl PartialEq for FactStore {
    fn eq(&self, other: &Self) -> bool {
        self.triples == other.triples
    }
}

impl Eq for FactStore {}

/// Store statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStatistics {
    pub total_triples: usize,
    pub distinct_subjects: usize,
    pub distinct_predicates: usize,
    pub distinct_objects: usize,
}
