use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use orbweaver_core::model::{Iri, Term, Triple};
use orbweaver_core::pattern::{PatternValue, TriplePattern};
use orbweaver_core::vocabulary;
use orbweaver_store::{FactStore, Filter, SelectQuery};

/// Typed individuals with a chain of `refersTo` edges
fn generate_test_triples(count: usize) -> Vec<Triple> {
    let mut triples = Vec::with_capacity(count * 3);

    for i in 0..count {
        let subject = Term::iri(format!("http://example.org/subject_{}", i));

        triples.push(Triple::new(
            subject.clone(),
            vocabulary::rdf_type(),
            Term::iri(format!("http://example.org/Class{}", i % 100)),
        ));
        triples.push(Triple::new(
            subject.clone(),
            Iri::new("http://example.org/property1"),
            Term::iri(format!("http://example.org/value{}", i % 1000)),
        ));

        if i > 0 {
            triples.push(Triple::new(
                subject,
                Iri::new("http://example.org/refersTo"),
                Term::iri(format!("http://example.org/subject_{}", i - 1)),
            ));
        }
    }

    triples
}

fn benchmark_store_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("fact_store_build");

    for size in [100, 1000, 10000].iter() {
        let triples = generate_test_triples(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &triples, |b, triples| {
            b.iter(|| black_box(FactStore::from_triples(triples.clone())))
        });
    }

    group.finish();
}

fn benchmark_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("fact_store_select");

    for size in [1000, 10000].iter() {
        let store = FactStore::from_triples(generate_test_triples(*size));
        let query = SelectQuery::new(
            "s",
            TriplePattern::new(
                PatternValue::var("s"),
                vocabulary::rdf_type(),
                PatternValue::iri("http://example.org/Class7"),
            ),
        )
        .filter(Filter::IsIri("s".to_string()));

        group.bench_with_input(BenchmarkId::from_parameter(size), &store, |b, store| {
            b.iter(|| black_box(store.select(&query)))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_store_build, benchmark_select);
criterion_main!(benches);
