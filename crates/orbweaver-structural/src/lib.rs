//! # Orbweaver Structural
//!
//! The terminology view: subsumption, equivalence, disjointness and
//! unsatisfiability answers over class and property expressions. The
//! materializing reasoner forwards hierarchy questions here and never
//! reimplements them.

pub mod hierarchy;
pub mod reasoner;

pub use hierarchy::Hierarchy;
pub use reasoner::{StructuralReasoner, StructuralReasonerFactory};

use orbweaver_core::model::Iri;
use orbweaver_core::node::{Node, NodeSet};
use orbweaver_core::ontology::Ontology;
use orbweaver_core::owl::{Axiom, AxiomKind, ClassExpression, Individual, Literal, ObjectPropertyExpression};
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TerminologyError {
    #[error("Unsupported by the terminology view: {0}")]
    Unsupported(String),

    #[error("Terminology view construction failed: {0}")]
    Construction(String),
}

/// Hierarchy answers over the terminology of one ontology.
///
/// A view is built once and then resynchronized with [`TerminologyView::flush`]
/// whenever the document changes; implementations decide whether that is a
/// rebuild or an incremental update.
pub trait TerminologyView: Send + Sync {
    /// Resynchronize with the current state of `ontology`
    fn flush(&mut self, ontology: &Ontology) -> Result<(), TerminologyError>;

    fn top_class_node(&self) -> Node<Iri>;
    fn bottom_class_node(&self) -> Node<Iri>;
    fn top_object_property_node(&self) -> Node<ObjectPropertyExpression>;
    fn bottom_object_property_node(&self) -> Node<ObjectPropertyExpression>;

    fn sub_classes(&self, ce: &ClassExpression, direct: bool) -> Result<NodeSet<Iri>, TerminologyError>;
    fn super_classes(&self, ce: &ClassExpression, direct: bool) -> Result<NodeSet<Iri>, TerminologyError>;
    fn equivalent_classes(&self, ce: &ClassExpression) -> Result<Node<Iri>, TerminologyError>;
    fn disjoint_classes(&self, ce: &ClassExpression) -> Result<NodeSet<Iri>, TerminologyError>;
    fn unsatisfiable_classes(&self) -> Node<Iri>;

    fn sub_object_properties(
        &self,
        property: &ObjectPropertyExpression,
        direct: bool,
    ) -> NodeSet<ObjectPropertyExpression>;
    fn super_object_properties(
        &self,
        property: &ObjectPropertyExpression,
        direct: bool,
    ) -> NodeSet<ObjectPropertyExpression>;
    fn equivalent_object_properties(&self, property: &ObjectPropertyExpression) -> Node<ObjectPropertyExpression>;
    fn disjoint_object_properties(&self, property: &ObjectPropertyExpression) -> NodeSet<ObjectPropertyExpression>;
    fn inverse_object_properties(&self, property: &ObjectPropertyExpression) -> Node<ObjectPropertyExpression>;
    fn object_property_domains(&self, property: &ObjectPropertyExpression, direct: bool) -> NodeSet<Iri>;
    fn object_property_ranges(&self, property: &ObjectPropertyExpression, direct: bool) -> NodeSet<Iri>;

    fn data_property_values(&self, individual: &Individual, property: &Iri) -> BTreeSet<Literal>;

    fn is_satisfiable(&self, ce: &ClassExpression) -> Result<bool, TerminologyError>;
    fn is_entailed(&self, axiom: &Axiom) -> Result<bool, TerminologyError>;
    fn is_entailment_checking_supported(&self, kind: AxiomKind) -> bool;
}

/// Constructs terminology views
pub trait TerminologyViewFactory: Send + Sync {
    fn name(&self) -> &str;

    fn create(&self, ontology: &Ontology) -> Result<Box<dyn TerminologyView>, TerminologyError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbweaver_core::vocabulary;

    #[test]
    fn test_factory_creates_view() {
        let ontology = Ontology::from_axioms(vec![Axiom::sub_class_of(
            ClassExpression::class("http://example.org/A"),
            ClassExpression::class("http://example.org/B"),
        )]);
        let view = StructuralReasonerFactory.create(&ontology).unwrap();

        assert!(view.top_class_node().contains(&vocabulary::owl_thing()));
        assert!(view.bottom_class_node().contains(&vocabulary::owl_nothing()));
        assert!(view
            .top_object_property_node()
            .contains(&ObjectPropertyExpression::Property(vocabulary::owl_top_object_property())));
        assert_eq!(StructuralReasonerFactory.name(), "structural");
    }

    #[test]
    fn test_anonymous_expressions_are_unsupported() {
        let view = StructuralReasoner::new(&Ontology::new());
        let anonymous = ClassExpression::some_values_from(
            ObjectPropertyExpression::named("http://example.org/p"),
            ClassExpression::thing(),
        );
        assert!(matches!(view.super_classes(&anonymous, false), Err(TerminologyError::Unsupported(_))));
        assert!(matches!(view.equivalent_classes(&anonymous), Err(TerminologyError::Unsupported(_))));
    }

    #[test]
    fn test_data_property_values_are_told() {
        let alice = Individual::named("http://example.org/alice");
        let age = Iri::new("http://example.org/age");
        let ontology = Ontology::from_axioms(vec![Axiom::DataPropertyAssertion {
            property: age.clone(),
            subject: alice.clone(),
            value: Literal::plain("42"),
        }]);
        let view = StructuralReasoner::new(&ontology);

        let values = view.data_property_values(&alice, &age);
        assert_eq!(values.len(), 1);
        assert!(view.data_property_values(&Individual::named("http://example.org/bob"), &age).is_empty());
    }
}
