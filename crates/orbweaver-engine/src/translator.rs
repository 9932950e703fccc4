//! Assertional axioms to triples, and back
//!
//! Only named class memberships become base facts. Memberships in
//! anonymous class expressions are left to the rule engine to derive.

use crate::error::TranslationError;
use orbweaver_core::model::{Iri, Term, Triple};
use orbweaver_core::ontology::Ontology;
use orbweaver_core::owl::{Axiom, AxiomKind, ClassExpression, Individual, ObjectPropertyExpression};
use orbweaver_core::vocabulary;
use std::collections::HashSet;

/// Axiom kinds that contribute base facts
pub const BASE_FACT_KINDS: [AxiomKind; 4] = [
    AxiomKind::ObjectPropertyAssertion,
    AxiomKind::ClassAssertion,
    AxiomKind::SameIndividual,
    AxiomKind::DifferentIndividuals,
];

/// `(individual, rdf:type, class)` for a named class, nothing otherwise
pub fn class_assertion_to_triples(individual: &Individual, class: &ClassExpression) -> Vec<Triple> {
    match class {
        ClassExpression::Class(iri) => vec![Triple::new(individual.to_term(), vocabulary::rdf_type(), iri.clone())],
        _ => Vec::new(),
    }
}

/// An inverse property swaps subject and object and uses the base property
pub fn property_assertion_to_triple(
    subject: &Individual,
    property: &ObjectPropertyExpression,
    object: &Individual,
) -> Triple {
    match property {
        ObjectPropertyExpression::Property(iri) => Triple::new(subject.to_term(), iri.clone(), object.to_term()),
        ObjectPropertyExpression::InverseOf(iri) => Triple::new(object.to_term(), iri.clone(), subject.to_term()),
    }
}

/// Every ordered pair of distinct individuals, related by `predicate`
fn pairwise(individuals: &[Individual], predicate: &Iri) -> Vec<Triple> {
    let mut triples = Vec::new();
    for left in individuals {
        for right in individuals {
            if left != right {
                triples.push(Triple::new(left.to_term(), predicate.clone(), right.to_term()));
            }
        }
    }
    triples
}

pub fn same_individual_to_triples(individuals: &[Individual]) -> Vec<Triple> {
    pairwise(individuals, &vocabulary::owl_same_as())
}

pub fn different_individuals_to_triples(individuals: &[Individual]) -> Vec<Triple> {
    pairwise(individuals, &vocabulary::owl_different_from())
}

/// Triple encoding of one assertional axiom.
///
/// Axioms outside [`BASE_FACT_KINDS`] have no encoding and are rejected
/// rather than dropped.
pub fn assertion_to_triples(axiom: &Axiom) -> Result<Vec<Triple>, TranslationError> {
    match axiom {
        Axiom::ClassAssertion { class, individual } => Ok(class_assertion_to_triples(individual, class)),
        Axiom::ObjectPropertyAssertion { property, subject, object } => {
            Ok(vec![property_assertion_to_triple(subject, property, object)])
        }
        Axiom::SameIndividual(individuals) => Ok(same_individual_to_triples(individuals)),
        Axiom::DifferentIndividuals(individuals) => Ok(different_individuals_to_triples(individuals)),
        other => Err(TranslationError::UnsupportedAxiom(other.kind())),
    }
}

/// The base fact set fed to the rule engine: the encoding of every current
/// property assertion, class assertion and individual (in)equality
pub fn base_facts(ontology: &Ontology) -> Result<HashSet<Triple>, TranslationError> {
    let mut facts = HashSet::new();
    for kind in BASE_FACT_KINDS {
        for axiom in ontology.axioms_of_kind(kind) {
            facts.extend(assertion_to_triples(axiom)?);
        }
    }
    Ok(facts)
}

fn term_to_individual(term: &Term) -> Individual {
    match term {
        Term::Iri(iri) => Individual::Named(iri.clone()),
        Term::Blank(id) => Individual::Anonymous(id.clone()),
    }
}

/// Read a triple back as the assertion it encodes. Class assertions and
/// equality come back in their canonical form, so
/// `triple_to_assertion(t)` re-encodes to a set containing `t`.
pub fn triple_to_assertion(triple: &Triple) -> Option<Axiom> {
    let subject = term_to_individual(&triple.subject);
    let predicate = triple.predicate.as_str();

    if predicate == vocabulary::INDIRECT_TYPE {
        return None;
    }
    if predicate == vocabulary::RDF_TYPE {
        let class = triple.object.as_iri()?;
        return Some(Axiom::ClassAssertion {
            class: ClassExpression::Class(class.clone()),
            individual: subject,
        });
    }

    let object = term_to_individual(&triple.object);
    Some(match predicate {
        vocabulary::OWL_SAME_AS => Axiom::SameIndividual(vec![subject, object]),
        vocabulary::OWL_DIFFERENT_FROM => Axiom::DifferentIndividuals(vec![subject, object]),
        _ => Axiom::ObjectPropertyAssertion {
            property: ObjectPropertyExpression::Property(triple.predicate.clone()),
            subject,
            object,
        },
    })
}
