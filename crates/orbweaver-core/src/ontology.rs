//! Editable ontology document and change notification

use crate::model::Iri;
use crate::owl::{Axiom, AxiomCategory, AxiomKind, ClassExpression, Individual, ObjectPropertyExpression};
use parking_lot::{Mutex, RwLock, RwLockReadGuard};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// OWL Ontology
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ontology {
    /// Ontology IRI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iri: Option<Iri>,

    /// Directly imported ontology IRIs
    #[serde(default)]
    pub imports: BTreeSet<Iri>,

    /// All axioms in the ontology
    #[serde(default)]
    axioms: HashSet<Axiom>,
}

impl Ontology {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_iri(iri: Iri) -> Self {
        Self { iri: Some(iri), ..Self::default() }
    }

    pub fn from_axioms<I: IntoIterator<Item = Axiom>>(axioms: I) -> Self {
        Self { axioms: axioms.into_iter().collect(), ..Self::default() }
    }

    /// Parse a JSON ontology document
    pub fn from_json_str(json: &str) -> Result<Self, OntologyError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> Result<String, OntologyError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Returns false if the axiom was already present
    pub fn add_axiom(&mut self, axiom: Axiom) -> bool {
        self.axioms.insert(axiom)
    }

    /// Returns false if the axiom was absent
    pub fn remove_axiom(&mut self, axiom: &Axiom) -> bool {
        self.axioms.remove(axiom)
    }

    pub fn contains_axiom(&self, axiom: &Axiom) -> bool {
        self.axioms.contains(axiom)
    }

    pub fn axioms(&self) -> impl Iterator<Item = &Axiom> {
        self.axioms.iter()
    }

    pub fn axiom_count(&self) -> usize {
        self.axioms.len()
    }

    pub fn axioms_of_kind(&self, kind: AxiomKind) -> impl Iterator<Item = &Axiom> {
        self.axioms.iter().filter(move |axiom| axiom.kind() == kind)
    }

    pub fn terminology_axioms(&self) -> impl Iterator<Item = &Axiom> {
        self.axioms.iter().filter(|axiom| axiom.category() == AxiomCategory::Terminology)
    }

    pub fn assertional_axioms(&self) -> impl Iterator<Item = &Axiom> {
        self.axioms.iter().filter(|axiom| axiom.category() == AxiomCategory::Assertional)
    }

    /// Apply one change; returns whether the document actually changed
    pub fn apply(&mut self, change: &OntologyChange) -> bool {
        match change {
            OntologyChange::AddAxiom(axiom) => self.add_axiom(axiom.clone()),
            OntologyChange::RemoveAxiom(axiom) => self.remove_axiom(axiom),
            OntologyChange::AddImport(iri) => self.imports.insert(iri.clone()),
            OntologyChange::RemoveImport(iri) => self.imports.remove(iri),
        }
    }

    /// Named classes mentioned anywhere in the ontology
    pub fn classes_in_signature(&self) -> BTreeSet<Iri> {
        let mut classes = BTreeSet::new();
        for axiom in &self.axioms {
            match axiom {
                Axiom::Declaration(crate::owl::Entity::Class(iri)) => {
                    classes.insert(iri.clone());
                }
                Axiom::SubClassOf { sub, sup } => {
                    collect_classes(sub, &mut classes);
                    collect_classes(sup, &mut classes);
                }
                Axiom::EquivalentClasses(operands) | Axiom::DisjointClasses(operands) => {
                    operands.iter().for_each(|ce| collect_classes(ce, &mut classes));
                }
                Axiom::ObjectPropertyDomain { domain: ce, .. }
                | Axiom::ObjectPropertyRange { range: ce, .. }
                | Axiom::ClassAssertion { class: ce, .. } => collect_classes(ce, &mut classes),
                _ => {}
            }
        }
        classes
    }

    /// Named object properties mentioned anywhere in the ontology
    pub fn object_properties_in_signature(&self) -> BTreeSet<Iri> {
        let mut properties = BTreeSet::new();
        let mut add = |pe: &ObjectPropertyExpression| {
            properties.insert(pe.base().clone());
        };
        for axiom in &self.axioms {
            match axiom {
                Axiom::Declaration(crate::owl::Entity::ObjectProperty(iri)) => {
                    add(&ObjectPropertyExpression::Property(iri.clone()));
                }
                Axiom::SubObjectPropertyOf { sub, sup } => {
                    add(sub);
                    add(sup);
                }
                Axiom::SubPropertyChainOf { chain, sup } => {
                    chain.iter().for_each(&mut add);
                    add(sup);
                }
                Axiom::EquivalentObjectProperties(pes) | Axiom::DisjointObjectProperties(pes) => {
                    pes.iter().for_each(&mut add);
                }
                Axiom::InverseObjectProperties(p, q) => {
                    add(p);
                    add(q);
                }
                Axiom::ObjectPropertyDomain { property, .. }
                | Axiom::ObjectPropertyRange { property, .. }
                | Axiom::ObjectPropertyAssertion { property, .. }
                | Axiom::NegativeObjectPropertyAssertion { property, .. } => add(property),
                Axiom::FunctionalObjectProperty(p)
                | Axiom::InverseFunctionalObjectProperty(p)
                | Axiom::TransitiveObjectProperty(p)
                | Axiom::SymmetricObjectProperty(p)
                | Axiom::AsymmetricObjectProperty(p)
                | Axiom::ReflexiveObjectProperty(p)
                | Axiom::IrreflexiveObjectProperty(p) => add(p),
                _ => {}
            }
        }
        properties
    }

    /// Named individuals mentioned in assertions or declarations
    pub fn individuals_in_signature(&self) -> BTreeSet<Iri> {
        let mut individuals = BTreeSet::new();
        let mut add = |ind: &Individual| {
            if let Individual::Named(iri) = ind {
                individuals.insert(iri.clone());
            }
        };
        for axiom in &self.axioms {
            match axiom {
                Axiom::Declaration(crate::owl::Entity::NamedIndividual(iri)) => {
                    add(&Individual::Named(iri.clone()));
                }
                Axiom::ClassAssertion { individual, .. } => add(individual),
                Axiom::ObjectPropertyAssertion { subject, object, .. }
                | Axiom::NegativeObjectPropertyAssertion { subject, object, .. } => {
                    add(subject);
                    add(object);
                }
                Axiom::DataPropertyAssertion { subject, .. } => add(subject),
                Axiom::SameIndividual(inds) | Axiom::DifferentIndividuals(inds) => inds.iter().for_each(&mut add),
                _ => {}
            }
        }
        individuals
    }
}

fn collect_classes(ce: &ClassExpression, out: &mut BTreeSet<Iri>) {
    match ce {
        ClassExpression::Class(iri) => {
            out.insert(iri.clone());
        }
        ClassExpression::IntersectionOf(operands) | ClassExpression::UnionOf(operands) => {
            operands.iter().for_each(|op| collect_classes(op, out));
        }
        ClassExpression::ComplementOf(operand) => collect_classes(operand, out),
        ClassExpression::SomeValuesFrom { filler, .. } | ClassExpression::AllValuesFrom { filler, .. } => {
            collect_classes(filler, out)
        }
        ClassExpression::MinCardinality { filler, .. }
        | ClassExpression::MaxCardinality { filler, .. }
        | ClassExpression::ExactCardinality { filler, .. } => {
            if let Some(filler) = filler {
                collect_classes(filler, out);
            }
        }
        ClassExpression::OneOf(_) | ClassExpression::HasValue { .. } => {}
    }
}

/// A single edit to an ontology document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OntologyChange {
    AddAxiom(Axiom),
    RemoveAxiom(Axiom),
    AddImport(Iri),
    RemoveImport(Iri),
}

impl OntologyChange {
    pub fn is_import_change(&self) -> bool {
        matches!(self, OntologyChange::AddImport(_) | OntologyChange::RemoveImport(_))
    }

    pub fn is_axiom_change(&self) -> bool {
        matches!(self, OntologyChange::AddAxiom(_) | OntologyChange::RemoveAxiom(_))
    }

    pub fn is_add_axiom(&self) -> bool {
        matches!(self, OntologyChange::AddAxiom(_))
    }

    pub fn is_remove_axiom(&self) -> bool {
        matches!(self, OntologyChange::RemoveAxiom(_))
    }

    pub fn axiom(&self) -> Option<&Axiom> {
        match self {
            OntologyChange::AddAxiom(axiom) | OntologyChange::RemoveAxiom(axiom) => Some(axiom),
            OntologyChange::AddImport(_) | OntologyChange::RemoveImport(_) => None,
        }
    }
}

/// Receives batches of applied changes. May be invoked from any thread.
pub trait OntologyChangeListener: Send + Sync {
    fn ontologies_changed(&self, changes: &[OntologyChange]);
}

/// Handle returned by [`SharedOntology::add_listener`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Debug, thiserror::Error)]
pub enum OntologyError {
    #[error("Listener {0:?} is not registered")]
    UnknownListener(ListenerId),

    #[error("Invalid ontology document: {0}")]
    Json(#[from] serde_json::Error),
}

struct SharedInner {
    document: RwLock<Ontology>,
    listeners: Mutex<Vec<(ListenerId, Arc<dyn OntologyChangeListener>)>>,
    next_listener: AtomicU64,
}

/// Thread-safe handle to an ontology document that notifies listeners of edits
#[derive(Clone)]
pub struct SharedOntology {
    inner: Arc<SharedInner>,
}

impl SharedOntology {
    pub fn new(ontology: Ontology) -> Self {
        Self {
            inner: Arc::new(SharedInner {
                document: RwLock::new(ontology),
                listeners: Mutex::new(Vec::new()),
                next_listener: AtomicU64::new(0),
            }),
        }
    }

    /// Read access to the current document
    pub fn read(&self) -> RwLockReadGuard<'_, Ontology> {
        self.inner.document.read()
    }

    /// Apply changes, then notify listeners of the ones that took effect.
    /// Listeners run after the document lock is released.
    pub fn apply_changes(&self, changes: Vec<OntologyChange>) -> Vec<OntologyChange> {
        let applied: Vec<OntologyChange> = {
            let mut document = self.inner.document.write();
            changes.into_iter().filter(|change| document.apply(change)).collect()
        };

        if !applied.is_empty() {
            let listeners: Vec<Arc<dyn OntologyChangeListener>> =
                self.inner.listeners.lock().iter().map(|(_, l)| Arc::clone(l)).collect();
            debug!(changes = applied.len(), listeners = listeners.len(), "notifying ontology listeners");
            for listener in listeners {
                listener.ontologies_changed(&applied);
            }
        }

        applied
    }

    pub fn add_axiom(&self, axiom: Axiom) -> bool {
        !self.apply_changes(vec![OntologyChange::AddAxiom(axiom)]).is_empty()
    }

    pub fn remove_axiom(&self, axiom: Axiom) -> bool {
        !self.apply_changes(vec![OntologyChange::RemoveAxiom(axiom)]).is_empty()
    }

    pub fn add_axioms<I: IntoIterator<Item = Axiom>>(&self, axioms: I) -> usize {
        self.apply_changes(axioms.into_iter().map(OntologyChange::AddAxiom).collect()).len()
    }

    pub fn add_listener(&self, listener: Arc<dyn OntologyChangeListener>) -> ListenerId {
        let id = ListenerId(self.inner.next_listener.fetch_add(1, Ordering::Relaxed));
        self.inner.listeners.lock().push((id, listener));
        id
    }

    pub fn remove_listener(&self, id: ListenerId) -> Result<(), OntologyError> {
        let mut listeners = self.inner.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(registered, _)| *registered != id);
        if listeners.len() == before {
            return Err(OntologyError::UnknownListener(id));
        }
        Ok(())
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.lock().len()
    }
}

impl std::fmt::Debug for SharedOntology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedOntology")
            .field("axioms", &self.read().axiom_count())
            .field("listeners", &self.listener_count())
            .finish()
    }
}
