//! Structural reasoner: hierarchy answers from told axioms only

use crate::hierarchy::Hierarchy;
use crate::{TerminologyError, TerminologyView, TerminologyViewFactory};
use orbweaver_core::model::Iri;
use orbweaver_core::node::{Node, NodeSet};
use orbweaver_core::ontology::Ontology;
use orbweaver_core::owl::{Axiom, AxiomKind, ClassExpression, Individual, Literal, ObjectPropertyExpression};
use orbweaver_core::vocabulary;
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::debug;

type PropertyExpr = ObjectPropertyExpression;

/// Told-axiom reasoner.
///
/// owl:Thing is an ancestor and owl:Nothing a descendant of every class,
/// and likewise for the top and bottom object properties, so that the
/// hierarchy closure yields the usual top and bottom nodes.
#[derive(Debug, Clone, Default)]
pub struct StructuralReasoner {
    classes: Hierarchy<Iri>,
    properties: Hierarchy<PropertyExpr>,
    disjoint_classes: HashMap<Iri, BTreeSet<Iri>>,
    disjoint_properties: HashMap<PropertyExpr, BTreeSet<PropertyExpr>>,
    /// Named domains keyed by base property IRI
    domains: HashMap<Iri, BTreeSet<Iri>>,
    /// Named ranges keyed by base property IRI
    ranges: HashMap<Iri, BTreeSet<Iri>>,
    data_values: HashMap<(Individual, Iri), BTreeSet<Literal>>,
    told: HashSet<Axiom>,
}

impl StructuralReasoner {
    pub fn new(ontology: &Ontology) -> Self {
        let mut reasoner = StructuralReasoner::default();
        reasoner.load(ontology);
        reasoner
    }

    fn load(&mut self, ontology: &Ontology) {
        *self = StructuralReasoner::default();

        let thing = vocabulary::owl_thing();
        let nothing = vocabulary::owl_nothing();
        let top = PropertyExpr::Property(vocabulary::owl_top_object_property());
        let bottom = PropertyExpr::Property(vocabulary::owl_bottom_object_property());

        self.classes.add_entity(thing.clone());
        self.classes.add_entity(nothing.clone());
        for class in ontology.classes_in_signature() {
            self.classes.add_entity(class);
        }

        self.properties.add_entity(top.clone());
        self.properties.add_entity(bottom.clone());
        for property in ontology.object_properties_in_signature() {
            let named = PropertyExpr::Property(property);
            self.properties.add_entity(named.inverse());
            self.properties.add_entity(named);
        }

        for axiom in ontology.axioms() {
            self.told.insert(axiom.clone());
            self.load_axiom(axiom);
        }

        let classes: Vec<Iri> = self.classes.entities().cloned().collect();
        for class in classes {
            if class != thing {
                self.classes.add_edge(class.clone(), thing.clone());
            }
            if class != nothing {
                self.classes.add_edge(nothing.clone(), class);
            }
        }

        let properties: Vec<PropertyExpr> = self.properties.entities().cloned().collect();
        for property in properties {
            if property != top {
                self.properties.add_edge(property.clone(), top.clone());
            }
            if property != bottom {
                self.properties.add_edge(bottom.clone(), property);
            }
        }

        self.classes.close();
        self.properties.close();

        debug!(
            classes = self.classes.entities().count(),
            properties = self.properties.entities().count(),
            axioms = self.told.len(),
            "structural hierarchy computed"
        );
    }

    fn load_axiom(&mut self, axiom: &Axiom) {
        match axiom {
            Axiom::SubClassOf { sub: ClassExpression::Class(sub), sup } => {
                for parent in named_conjuncts(sup) {
                    self.classes.add_edge(sub.clone(), parent);
                }
            }
            Axiom::EquivalentClasses(members) => {
                let named: Vec<&Iri> = members.iter().filter_map(ClassExpression::as_class).collect();
                for a in &named {
                    for b in &named {
                        if a != b {
                            self.classes.add_edge((*a).clone(), (*b).clone());
                        }
                    }
                    for member in members.iter().filter(|m| m.is_anonymous()) {
                        for parent in named_conjuncts(member) {
                            self.classes.add_edge((*a).clone(), parent);
                        }
                    }
                }
            }
            Axiom::DisjointClasses(members) => {
                let named: Vec<&Iri> = members.iter().filter_map(ClassExpression::as_class).collect();
                for a in &named {
                    for b in &named {
                        if a != b {
                            self.disjoint_classes.entry((*a).clone()).or_default().insert((*b).clone());
                        }
                    }
                }
            }
            Axiom::SubObjectPropertyOf { sub, sup } => self.add_property_edge(sub, sup),
            Axiom::EquivalentObjectProperties(members) => {
                for a in members {
                    for b in members {
                        if a != b {
                            self.add_property_edge(a, b);
                        }
                    }
                }
            }
            Axiom::InverseObjectProperties(first, second) => {
                self.add_property_edge(first, &second.inverse());
                self.add_property_edge(&second.inverse(), first);
            }
            Axiom::SymmetricObjectProperty(property) => {
                self.add_property_edge(property, &property.inverse());
                self.add_property_edge(&property.inverse(), property);
            }
            Axiom::DisjointObjectProperties(members) => {
                for a in members {
                    for b in members {
                        if a != b {
                            self.disjoint_properties.entry(a.clone()).or_default().insert(b.clone());
                        }
                    }
                }
            }
            Axiom::ObjectPropertyDomain { property, domain } => {
                if let Some(class) = domain.as_class() {
                    let target = if property.is_inverse() { &mut self.ranges } else { &mut self.domains };
                    target.entry(property.base().clone()).or_default().insert(class.clone());
                }
            }
            Axiom::ObjectPropertyRange { property, range } => {
                if let Some(class) = range.as_class() {
                    let target = if property.is_inverse() { &mut self.domains } else { &mut self.ranges };
                    target.entry(property.base().clone()).or_default().insert(class.clone());
                }
            }
            Axiom::DataPropertyAssertion { property, subject, value } => {
                self.data_values
                    .entry((subject.clone(), property.clone()))
                    .or_default()
                    .insert(value.clone());
            }
            _ => {}
        }
    }

    /// Add `sub ⊑ sup` together with the mirrored inverse edge
    fn add_property_edge(&mut self, sub: &PropertyExpr, sup: &PropertyExpr) {
        self.properties.add_edge(sub.clone(), sup.clone());
        self.properties.add_edge(sub.inverse(), sup.inverse());
    }

    fn named<'a>(&self, ce: &'a ClassExpression) -> Result<&'a Iri, TerminologyError> {
        ce.as_class()
            .ok_or_else(|| TerminologyError::Unsupported(format!("anonymous class expression {:?}", ce)))
    }

    /// Told named domains of `property` and its super-properties
    fn told_domains(&self, property: &PropertyExpr) -> BTreeSet<Iri> {
        let mut subsumers = self.properties.ancestors(property);
        subsumers.insert(property.clone());

        let mut classes = BTreeSet::new();
        for expr in subsumers {
            let table = if expr.is_inverse() { &self.ranges } else { &self.domains };
            if let Some(found) = table.get(expr.base()) {
                classes.extend(found.iter().cloned());
            }
        }
        classes
    }

    fn class_answer(&self, classes: BTreeSet<Iri>, direct: bool) -> NodeSet<Iri> {
        if direct {
            return self.classes.group(self.classes.most_specific(&classes).iter());
        }
        let mut closed = classes.clone();
        for class in &classes {
            closed.extend(self.classes.ancestors(class));
        }
        self.classes.group(closed.iter())
    }

    pub fn is_subclass_of(&self, sub: &Iri, sup: &Iri) -> bool {
        self.classes.subsumes(sup, sub)
    }

    fn disjoint_pair(&self, a: &Iri, b: &Iri) -> bool {
        let mut subsumers = self.classes.ancestors(a);
        subsumers.insert(a.clone());
        subsumers.iter().any(|sup| {
            self.disjoint_classes
                .get(sup)
                .map_or(false, |partners| partners.iter().any(|partner| self.classes.subsumes(partner, b)))
        })
    }
}

/// Named classes asserted by a class or an intersection of classes
fn named_conjuncts(ce: &ClassExpression) -> Vec<Iri> {
    match ce {
        ClassExpression::Class(iri) => vec![iri.clone()],
        ClassExpression::IntersectionOf(operands) => operands.iter().filter_map(|op| op.as_class().cloned()).collect(),
        _ => Vec::new(),
    }
}

impl TerminologyView for StructuralReasoner {
    fn flush(&mut self, ontology: &Ontology) -> Result<(), TerminologyError> {
        self.load(ontology);
        Ok(())
    }

    fn top_class_node(&self) -> Node<Iri> {
        self.classes.node(&vocabulary::owl_thing())
    }

    fn bottom_class_node(&self) -> Node<Iri> {
        self.classes.node(&vocabulary::owl_nothing())
    }

    fn top_object_property_node(&self) -> Node<PropertyExpr> {
        self.properties.node(&PropertyExpr::Property(vocabulary::owl_top_object_property()))
    }

    fn bottom_object_property_node(&self) -> Node<PropertyExpr> {
        self.properties.node(&PropertyExpr::Property(vocabulary::owl_bottom_object_property()))
    }

    fn sub_classes(&self, ce: &ClassExpression, direct: bool) -> Result<NodeSet<Iri>, TerminologyError> {
        let class = self.named(ce)?;
        let found = if direct {
            self.classes.direct_descendants(class)
        } else {
            self.classes.strict_descendants(class)
        };
        Ok(self.classes.group(found.iter()))
    }

    fn super_classes(&self, ce: &ClassExpression, direct: bool) -> Result<NodeSet<Iri>, TerminologyError> {
        let class = self.named(ce)?;
        let found = if direct {
            self.classes.direct_ancestors(class)
        } else {
            self.classes.strict_ancestors(class)
        };
        Ok(self.classes.group(found.iter()))
    }

    fn equivalent_classes(&self, ce: &ClassExpression) -> Result<Node<Iri>, TerminologyError> {
        Ok(self.classes.node(self.named(ce)?))
    }

    fn disjoint_classes(&self, ce: &ClassExpression) -> Result<NodeSet<Iri>, TerminologyError> {
        let class = self.named(ce)?;
        let disjoint: BTreeSet<Iri> = self
            .classes
            .entities()
            .filter(|candidate| self.disjoint_pair(class, candidate) || self.disjoint_pair(candidate, class))
            .cloned()
            .collect();
        Ok(self.classes.group(disjoint.iter()))
    }

    fn unsatisfiable_classes(&self) -> Node<Iri> {
        self.bottom_class_node()
    }

    fn sub_object_properties(&self, property: &PropertyExpr, direct: bool) -> NodeSet<PropertyExpr> {
        let found = if direct {
            self.properties.direct_descendants(property)
        } else {
            self.properties.strict_descendants(property)
        };
        self.properties.group(found.iter())
    }

    fn super_object_properties(&self, property: &PropertyExpr, direct: bool) -> NodeSet<PropertyExpr> {
        let found = if direct {
            self.properties.direct_ancestors(property)
        } else {
            self.properties.strict_ancestors(property)
        };
        self.properties.group(found.iter())
    }

    fn equivalent_object_properties(&self, property: &PropertyExpr) -> Node<PropertyExpr> {
        self.properties.node(property)
    }

    fn disjoint_object_properties(&self, property: &PropertyExpr) -> NodeSet<PropertyExpr> {
        let mut subsumers = self.properties.ancestors(property);
        subsumers.insert(property.clone());

        let mut disjoint = BTreeSet::new();
        for sup in &subsumers {
            for partner in self.disjoint_properties.get(sup).into_iter().flatten() {
                disjoint.insert(partner.clone());
                disjoint.extend(self.properties.descendants(partner));
            }
        }
        self.properties.group(disjoint.iter())
    }

    fn inverse_object_properties(&self, property: &PropertyExpr) -> Node<PropertyExpr> {
        self.properties.node(&property.inverse())
    }

    fn object_property_domains(&self, property: &PropertyExpr, direct: bool) -> NodeSet<Iri> {
        self.class_answer(self.told_domains(property), direct)
    }

    fn object_property_ranges(&self, property: &PropertyExpr, direct: bool) -> NodeSet<Iri> {
        self.class_answer(self.told_domains(&property.inverse()), direct)
    }

    fn data_property_values(&self, individual: &Individual, property: &Iri) -> BTreeSet<Literal> {
        self.data_values
            .get(&(individual.clone(), property.clone()))
            .cloned()
            .unwrap_or_default()
    }

    fn is_satisfiable(&self, ce: &ClassExpression) -> Result<bool, TerminologyError> {
        let class = self.named(ce)?;
        Ok(!self.bottom_class_node().contains(class))
    }

    fn is_entailed(&self, axiom: &Axiom) -> Result<bool, TerminologyError> {
        if !self.is_entailment_checking_supported(axiom.kind()) {
            return Err(TerminologyError::Unsupported(format!("entailment of {:?} axioms", axiom.kind())));
        }

        let entailed = match axiom {
            Axiom::SubClassOf { sub, sup } => match (sub.as_class(), sup.as_class()) {
                (Some(sub), Some(sup)) => self.is_subclass_of(sub, sup),
                _ => self.told.contains(axiom),
            },
            Axiom::EquivalentClasses(members) => {
                let named: Option<Vec<&Iri>> = members.iter().map(ClassExpression::as_class).collect();
                match named {
                    Some(named) => named
                        .windows(2)
                        .all(|pair| self.classes.equivalents(pair[0]).contains(pair[1])),
                    None => self.told.contains(axiom),
                }
            }
            Axiom::DisjointClasses(members) => {
                let named: Option<Vec<&Iri>> = members.iter().map(ClassExpression::as_class).collect();
                match named {
                    Some(named) => named.iter().enumerate().all(|(i, a)| {
                        named[i + 1..]
                            .iter()
                            .all(|b| self.disjoint_pair(a, b) || self.disjoint_pair(b, a))
                    }),
                    None => self.told.contains(axiom),
                }
            }
            Axiom::SubObjectPropertyOf { sub, sup } => self.properties.subsumes(sup, sub),
            Axiom::EquivalentObjectProperties(members) => members
                .windows(2)
                .all(|pair| self.properties.equivalents(&pair[0]).contains(&pair[1])),
            Axiom::InverseObjectProperties(first, second) => {
                self.properties.equivalents(first).contains(&second.inverse())
            }
            _ => self.told.contains(axiom),
        };
        Ok(entailed)
    }

    fn is_entailment_checking_supported(&self, kind: AxiomKind) -> bool {
        kind.is_assertional()
            || matches!(
                kind,
                AxiomKind::Declaration
                    | AxiomKind::SubClassOf
                    | AxiomKind::EquivalentClasses
                    | AxiomKind::DisjointClasses
                    | AxiomKind::SubObjectPropertyOf
                    | AxiomKind::EquivalentObjectProperties
                    | AxiomKind::InverseObjectProperties
            )
    }
}

/// Creates [`StructuralReasoner`] views
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralReasonerFactory;

impl TerminologyViewFactory for StructuralReasonerFactory {
    fn name(&self) -> &str {
        "structural"
    }

    fn create(&self, ontology: &Ontology) -> Result<Box<dyn TerminologyView>, TerminologyError> {
        Ok(Box::new(StructuralReasoner::new(ontology)))
    }
}
