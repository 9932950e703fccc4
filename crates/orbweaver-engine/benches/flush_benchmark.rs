use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use orbweaver_core::ontology::{Ontology, SharedOntology};
use orbweaver_core::owl::{Axiom, ClassExpression, Individual, ObjectPropertyExpression};
use orbweaver_engine::ReasonerFactory;

fn class(i: usize) -> ClassExpression {
    ClassExpression::class(format!("http://example.org/C{}", i))
}

fn individual(i: usize) -> Individual {
    Individual::named(format!("http://example.org/ind{}", i))
}

/// Ten-class chain, a transitive property and `individuals` typed members
fn generate_ontology(individuals: usize) -> Ontology {
    let mut axioms: Vec<Axiom> = (0..10).map(|i| Axiom::sub_class_of(class(i), class(i + 1))).collect();
    let part_of = ObjectPropertyExpression::named("http://example.org/partOf");
    axioms.push(Axiom::TransitiveObjectProperty(part_of.clone()));

    for i in 0..individuals {
        axioms.push(Axiom::class_assertion(class(i % 5), individual(i)));
        if i % 10 != 0 {
            axioms.push(Axiom::object_property_assertion(part_of.clone(), individual(i), individual(i - 1)));
        }
    }
    Ontology::from_axioms(axioms)
}

fn benchmark_initial_flush(c: &mut Criterion) {
    let mut group = c.benchmark_group("initial_flush");
    let factory = ReasonerFactory::new();

    for size in [100, 500].iter() {
        let ontology = generate_ontology(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &ontology, |b, ontology| {
            b.iter(|| {
                let reasoner = factory
                    .create_reasoner(SharedOntology::new(ontology.clone()))
                    .expect("reasoner builds");
                black_box(reasoner.fact_store().len())
            })
        });
    }

    group.finish();
}

fn benchmark_incremental_flush(c: &mut Criterion) {
    let mut group = c.benchmark_group("incremental_flush");
    let factory = ReasonerFactory::new();

    for size in [100, 500].iter() {
        let ontology = SharedOntology::new(generate_ontology(*size));
        let reasoner = factory.create_reasoner(ontology.clone()).expect("reasoner builds");

        let assertion = Axiom::class_assertion(class(0), individual(size + 1));
        group.bench_function(BenchmarkId::new("assertional", size), |b| {
            b.iter(|| {
                ontology.add_axiom(assertion.clone());
                black_box(reasoner.flush().expect("flush succeeds"));
                ontology.remove_axiom(assertion.clone());
                black_box(reasoner.flush().expect("flush succeeds"))
            })
        });

        let subsumption = Axiom::sub_class_of(class(20), class(0));
        group.bench_function(BenchmarkId::new("terminology", size), |b| {
            b.iter(|| {
                ontology.add_axiom(subsumption.clone());
                black_box(reasoner.flush().expect("flush succeeds"));
                ontology.remove_axiom(subsumption.clone());
                black_box(reasoner.flush().expect("flush succeeds"))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_initial_flush, benchmark_incremental_flush);
criterion_main!(benches);
