//! Fixed query templates behind the reasoner's read operations
//!
//! Every template projects one variable and keeps named resources only.
//! The direct variants drop answers that also carry the indirect-type
//! marker, which the rule set attaches to every type that holds only
//! through subsumption.

use orbweaver_core::model::{Iri, Term};
use orbweaver_core::owl::ObjectPropertyExpression;
use orbweaver_core::pattern::{PatternValue, TriplePattern};
use orbweaver_core::vocabulary;
use orbweaver_store::{AskQuery, Filter, SelectQuery};

const SUBJECT: &str = "s";
const OBJECT: &str = "o";

fn named(iri: &Iri) -> PatternValue {
    PatternValue::Constant(Term::Iri(iri.clone()))
}

/// `SELECT ?o { <individual> rdf:type ?o }`, excluding owl:NamedIndividual
pub fn types(individual: &Iri, direct: bool) -> SelectQuery {
    SelectQuery::new(
        OBJECT,
        TriplePattern::new(named(individual), vocabulary::rdf_type(), PatternValue::var(OBJECT)),
    )
    .filter(Filter::IsIri(OBJECT.to_string()))
    .filter(Filter::NotEqual(OBJECT.to_string(), Term::Iri(vocabulary::owl_named_individual())))
    .filter_if(
        direct,
        Filter::NotExists(TriplePattern::new(
            named(individual),
            vocabulary::indirect_type(),
            PatternValue::var(OBJECT),
        )),
    )
}

/// `SELECT ?s { ?s rdf:type <class> }`
pub fn instances(class: &Iri, direct: bool) -> SelectQuery {
    SelectQuery::new(
        SUBJECT,
        TriplePattern::new(PatternValue::var(SUBJECT), vocabulary::rdf_type(), named(class)),
    )
    .filter(Filter::IsIri(SUBJECT.to_string()))
    .filter_if(
        direct,
        Filter::NotExists(TriplePattern::new(
            PatternValue::var(SUBJECT),
            vocabulary::indirect_type(),
            named(class),
        )),
    )
}

/// Objects of `individual` along `property`; an inverse property is read
/// backwards along its base property
pub fn property_values(individual: &Iri, property: &ObjectPropertyExpression) -> SelectQuery {
    let pattern = match property {
        ObjectPropertyExpression::Property(iri) => {
            TriplePattern::new(named(individual), iri.clone(), PatternValue::var(OBJECT))
        }
        ObjectPropertyExpression::InverseOf(iri) => {
            TriplePattern::new(PatternValue::var(OBJECT), iri.clone(), named(individual))
        }
    };
    SelectQuery::new(OBJECT, pattern).filter(Filter::IsIri(OBJECT.to_string()))
}

pub fn same_individuals(individual: &Iri) -> SelectQuery {
    SelectQuery::new(
        OBJECT,
        TriplePattern::new(named(individual), vocabulary::owl_same_as(), PatternValue::var(OBJECT)),
    )
    .filter(Filter::IsIri(OBJECT.to_string()))
}

pub fn different_individuals(individual: &Iri) -> SelectQuery {
    SelectQuery::new(
        OBJECT,
        TriplePattern::new(named(individual), vocabulary::owl_different_from(), PatternValue::var(OBJECT)),
    )
    .filter(Filter::IsIri(OBJECT.to_string()))
}

/// `ASK { ?s rdf:type owl:Nothing }`
pub fn inconsistency() -> AskQuery {
    AskQuery::new(TriplePattern::new(
        PatternValue::var(SUBJECT),
        vocabulary::rdf_type(),
        Term::Iri(vocabulary::owl_nothing()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbweaver_core::model::Triple;
    use orbweaver_store::FactStore;
    use std::collections::BTreeSet;

    fn iri(local: &str) -> Iri {
        Iri::new(format!("http://example.org/{}", local))
    }

    fn store() -> FactStore {
        let rex = Term::Iri(iri("rex"));
        FactStore::from_triples(vec![
            Triple::new(rex.clone(), vocabulary::rdf_type(), iri("Dog")),
            Triple::new(rex.clone(), vocabulary::rdf_type(), iri("Animal")),
            Triple::new(rex.clone(), vocabulary::rdf_type(), vocabulary::owl_named_individual()),
            Triple::new(rex.clone(), vocabulary::indirect_type(), iri("Animal")),
            Triple::new(Term::blank("b0"), vocabulary::rdf_type(), iri("Dog")),
            Triple::new(rex, iri("owner"), iri("ann")),
        ])
    }

    fn set(locals: &[&str]) -> BTreeSet<Iri> {
        locals.iter().map(|local| iri(local)).collect()
    }

    #[test]
    fn test_types_direct_and_all() {
        let store = store();
        assert_eq!(store.select_iris(&types(&iri("rex"), false)).unwrap(), set(&["Animal", "Dog"]));
        assert_eq!(store.select_iris(&types(&iri("rex"), true)).unwrap(), set(&["Dog"]));
    }

    #[test]
    fn test_instances_drop_anonymous_nodes() {
        let store = store();
        assert_eq!(store.select(&instances(&iri("Dog"), false)).unwrap().len(), 1);
        assert!(store.select_iris(&instances(&iri("Animal"), true)).unwrap().is_empty());
    }

    #[test]
    fn test_property_values_both_directions() {
        let store = store();
        let owner = ObjectPropertyExpression::Property(iri("owner"));
        assert_eq!(store.select_iris(&property_values(&iri("rex"), &owner)).unwrap(), set(&["ann"]));
        assert_eq!(
            store.select_iris(&property_values(&iri("ann"), &owner.inverse())).unwrap(),
            set(&["rex"])
        );
    }

    #[test]
    fn test_inconsistency_ask() {
        assert!(!store().ask(&inconsistency()));
        let clash = FactStore::from_triples(vec![Triple::new(
            Term::Iri(iri("odd")),
            vocabulary::rdf_type(),
            vocabulary::owl_nothing(),
        )]);
        assert!(clash.ask(&inconsistency()));
    }
}
