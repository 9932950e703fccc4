use orbweaver_core::model::{Iri, Term, Triple};
use orbweaver_store::FactStore;
use proptest::prelude::*;

fn term_strategy() -> impl Strategy<Value = Term> {
    prop_oneof![
        (0u8..6).prop_map(|i| Term::iri(format!("http://example.org/r{}", i))),
        (0u8..3).prop_map(|i| Term::blank(format!("b{}", i))),
    ]
}

fn triple_strategy() -> impl Strategy<Value = Triple> {
    (term_strategy(), 0u8..4, term_strategy())
        .prop_map(|(s, p, o)| Triple::new(s, Iri::new(format!("http://example.org/p{}", p)), o))
}

proptest! {
    #[test]
    fn indexed_lookup_agrees_with_scan(
        triples in prop::collection::vec(triple_strategy(), 0..60),
        subject in prop::option::of(term_strategy()),
        predicate in prop::option::of(0u8..4),
        object in prop::option::of(term_strategy()),
    ) {
        let store = FactStore::from_triples(triples.clone());
        let predicate = predicate.map(|p| Iri::new(format!("http://example.org/p{}", p)));

        let mut indexed: Vec<Triple> = store
            .find_triples(subject.as_ref(), predicate.as_ref(), object.as_ref())
            .into_iter()
            .cloned()
            .collect();
        indexed.sort();

        let mut scanned: Vec<Triple> = store
            .iter()
            .filter(|t| subject.as_ref().map_or(true, |s| &t.subject == s))
            .filter(|t| predicate.as_ref().map_or(true, |p| &t.predicate == p))
            .filter(|t| object.as_ref().map_or(true, |o| &t.object == o))
            .cloned()
            .collect();
        scanned.sort();

        prop_assert_eq!(indexed, scanned);
    }

    #[test]
    fn every_inserted_triple_is_contained(triples in prop::collection::vec(triple_strategy(), 0..40)) {
        let store = FactStore::from_triples(triples.clone());
        for triple in &triples {
            prop_assert!(store.contains(triple));
        }
        prop_assert!(store.len() <= triples.len());
    }
}
