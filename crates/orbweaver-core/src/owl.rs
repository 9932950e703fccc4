//! OWL axiom model

use crate::model::{Iri, Term};
use serde::{Deserialize, Serialize};

/// OWL Individual
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Individual {
    Named(Iri),
    /// Anonymous individual, identified by its node ID
    Anonymous(String),
}

impl Individual {
    pub fn named<S: Into<String>>(iri: S) -> Self {
        Individual::Named(Iri::new(iri))
    }

    pub fn anonymous<S: Into<String>>(id: S) -> Self {
        Individual::Anonymous(id.into())
    }

    pub fn is_named(&self) -> bool {
        matches!(self, Individual::Named(_))
    }

    pub fn as_named(&self) -> Option<&Iri> {
        match self {
            Individual::Named(iri) => Some(iri),
            Individual::Anonymous(_) => None,
        }
    }

    pub fn to_term(&self) -> Term {
        match self {
            Individual::Named(iri) => Term::Iri(iri.clone()),
            Individual::Anonymous(id) => Term::Blank(id.clone()),
        }
    }
}

/// Object property expression: a named property or the inverse of one
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum ObjectPropertyExpression {
    Property(Iri),
    InverseOf(Iri),
}

impl ObjectPropertyExpression {
    pub fn named<S: Into<String>>(iri: S) -> Self {
        ObjectPropertyExpression::Property(Iri::new(iri))
    }

    pub fn inverse_of<S: Into<String>>(iri: S) -> Self {
        ObjectPropertyExpression::InverseOf(Iri::new(iri))
    }

    /// The named property underneath, with the inverse stripped
    pub fn base(&self) -> &Iri {
        match self {
            ObjectPropertyExpression::Property(iri) | ObjectPropertyExpression::InverseOf(iri) => iri,
        }
    }

    pub fn is_inverse(&self) -> bool {
        matches!(self, ObjectPropertyExpression::InverseOf(_))
    }

    /// `inv(p)` for a named `p`, `p` for `inv(p)`
    pub fn inverse(&self) -> Self {
        match self {
            ObjectPropertyExpression::Property(iri) => ObjectPropertyExpression::InverseOf(iri.clone()),
            ObjectPropertyExpression::InverseOf(iri) => ObjectPropertyExpression::Property(iri.clone()),
        }
    }
}

/// OWL Class Expression
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum ClassExpression {
    /// Named class, including owl:Thing and owl:Nothing
    Class(Iri),

    /// C1 ⊓ C2 ⊓ ... ⊓ Cn
    IntersectionOf(Vec<ClassExpression>),

    /// C1 ⊔ C2 ⊔ ... ⊔ Cn
    UnionOf(Vec<ClassExpression>),

    /// ¬C
    ComplementOf(Box<ClassExpression>),

    /// {i1, i2, ..., in}
    OneOf(Vec<Individual>),

    /// ∃R.C
    SomeValuesFrom {
        property: ObjectPropertyExpression,
        filler: Box<ClassExpression>,
    },

    /// ∀R.C
    AllValuesFrom {
        property: ObjectPropertyExpression,
        filler: Box<ClassExpression>,
    },

    /// ∃R.{i}
    HasValue {
        property: ObjectPropertyExpression,
        value: Individual,
    },

    /// ≥n R.C
    MinCardinality {
        cardinality: u32,
        property: ObjectPropertyExpression,
        filler: Option<Box<ClassExpression>>, // None means owl:Thing
    },

    /// ≤n R.C
    MaxCardinality {
        cardinality: u32,
        property: ObjectPropertyExpression,
        filler: Option<Box<ClassExpression>>,
    },

    /// =n R.C
    ExactCardinality {
        cardinality: u32,
        property: ObjectPropertyExpression,
        filler: Option<Box<ClassExpression>>,
    },
}

impl ClassExpression {
    pub fn class<S: Into<String>>(iri: S) -> Self {
        ClassExpression::Class(Iri::new(iri))
    }

    pub fn thing() -> Self {
        ClassExpression::Class(crate::vocabulary::owl_thing())
    }

    pub fn nothing() -> Self {
        ClassExpression::Class(crate::vocabulary::owl_nothing())
    }

    pub fn complement_of(operand: ClassExpression) -> Self {
        ClassExpression::ComplementOf(Box::new(operand))
    }

    pub fn some_values_from(property: ObjectPropertyExpression, filler: ClassExpression) -> Self {
        ClassExpression::SomeValuesFrom { property, filler: Box::new(filler) }
    }

    pub fn all_values_from(property: ObjectPropertyExpression, filler: ClassExpression) -> Self {
        ClassExpression::AllValuesFrom { property, filler: Box::new(filler) }
    }

    pub fn has_value(property: ObjectPropertyExpression, value: Individual) -> Self {
        ClassExpression::HasValue { property, value }
    }

    /// Anything other than a named class
    pub fn is_anonymous(&self) -> bool {
        !matches!(self, ClassExpression::Class(_))
    }

    pub fn as_class(&self) -> Option<&Iri> {
        match self {
            ClassExpression::Class(iri) => Some(iri),
            _ => None,
        }
    }

    pub fn is_thing(&self) -> bool {
        self.as_class().map_or(false, |iri| iri.as_str() == crate::vocabulary::OWL_THING)
    }

    pub fn is_nothing(&self) -> bool {
        self.as_class().map_or(false, |iri| iri.as_str() == crate::vocabulary::OWL_NOTHING)
    }
}

/// Literal value of a data property or annotation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Literal {
    pub lexical: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<Iri>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Literal {
    pub fn plain<S: Into<String>>(lexical: S) -> Self {
        Literal { lexical: lexical.into(), datatype: None, language: None }
    }

    pub fn typed<S: Into<String>>(lexical: S, datatype: Iri) -> Self {
        Literal { lexical: lexical.into(), datatype: Some(datatype), language: None }
    }
}

/// Declared entity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Entity {
    Class(Iri),
    ObjectProperty(Iri),
    DataProperty(Iri),
    AnnotationProperty(Iri),
    NamedIndividual(Iri),
}

impl Entity {
    pub fn iri(&self) -> &Iri {
        match self {
            Entity::Class(iri)
            | Entity::ObjectProperty(iri)
            | Entity::DataProperty(iri)
            | Entity::AnnotationProperty(iri)
            | Entity::NamedIndividual(iri) => iri,
        }
    }
}

/// OWL Axiom
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Axiom {
    /// Declaration(E)
    Declaration(Entity),

    /// SubClassOf(C1 C2)
    SubClassOf { sub: ClassExpression, sup: ClassExpression },

    /// EquivalentClasses(C1 ... Cn)
    EquivalentClasses(Vec<ClassExpression>),

    /// DisjointClasses(C1 ... Cn)
    DisjointClasses(Vec<ClassExpression>),

    /// SubObjectPropertyOf(P1 P2)
    SubObjectPropertyOf { sub: ObjectPropertyExpression, sup: ObjectPropertyExpression },

    /// SubObjectPropertyOf(ObjectPropertyChain(P1 ... Pn) P)
    SubPropertyChainOf { chain: Vec<ObjectPropertyExpression>, sup: ObjectPropertyExpression },

    /// EquivalentObjectProperties(P1 ... Pn)
    EquivalentObjectProperties(Vec<ObjectPropertyExpression>),

    /// DisjointObjectProperties(P1 ... Pn)
    DisjointObjectProperties(Vec<ObjectPropertyExpression>),

    /// InverseObjectProperties(P1 P2)
    InverseObjectProperties(ObjectPropertyExpression, ObjectPropertyExpression),

    /// ObjectPropertyDomain(P C)
    ObjectPropertyDomain { property: ObjectPropertyExpression, domain: ClassExpression },

    /// ObjectPropertyRange(P C)
    ObjectPropertyRange { property: ObjectPropertyExpression, range: ClassExpression },

    FunctionalObjectProperty(ObjectPropertyExpression),
    InverseFunctionalObjectProperty(ObjectPropertyExpression),
    TransitiveObjectProperty(ObjectPropertyExpression),
    SymmetricObjectProperty(ObjectPropertyExpression),
    AsymmetricObjectProperty(ObjectPropertyExpression),
    ReflexiveObjectProperty(ObjectPropertyExpression),
    IrreflexiveObjectProperty(ObjectPropertyExpression),

    /// ClassAssertion(C i)
    ClassAssertion { class: ClassExpression, individual: Individual },

    /// ObjectPropertyAssertion(P i1 i2)
    ObjectPropertyAssertion { property: ObjectPropertyExpression, subject: Individual, object: Individual },

    /// NegativeObjectPropertyAssertion(P i1 i2)
    NegativeObjectPropertyAssertion { property: ObjectPropertyExpression, subject: Individual, object: Individual },

    /// DataPropertyAssertion(P i v)
    DataPropertyAssertion { property: Iri, subject: Individual, value: Literal },

    /// SameIndividual(i1 ... in)
    SameIndividual(Vec<Individual>),

    /// DifferentIndividuals(i1 ... in)
    DifferentIndividuals(Vec<Individual>),

    /// AnnotationAssertion(A s v)
    AnnotationAssertion { property: Iri, subject: Iri, value: Literal },
}

/// Axiom kind, one per `Axiom` variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum AxiomKind {
    Declaration,
    SubClassOf,
    EquivalentClasses,
    DisjointClasses,
    SubObjectPropertyOf,
    SubPropertyChainOf,
    EquivalentObjectProperties,
    DisjointObjectProperties,
    InverseObjectProperties,
    ObjectPropertyDomain,
    ObjectPropertyRange,
    FunctionalObjectProperty,
    InverseFunctionalObjectProperty,
    TransitiveObjectProperty,
    SymmetricObjectProperty,
    AsymmetricObjectProperty,
    ReflexiveObjectProperty,
    IrreflexiveObjectProperty,
    ClassAssertion,
    ObjectPropertyAssertion,
    NegativeObjectPropertyAssertion,
    DataPropertyAssertion,
    SameIndividual,
    DifferentIndividuals,
    AnnotationAssertion,
}

/// Terminology (TBox/RBox), assertional (ABox), or neither
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxiomCategory {
    Terminology,
    Assertional,
    NonLogical,
}

impl AxiomKind {
    pub fn category(self) -> AxiomCategory {
        use AxiomKind::*;
        match self {
            Declaration | AnnotationAssertion => AxiomCategory::NonLogical,
            ClassAssertion
            | ObjectPropertyAssertion
            | NegativeObjectPropertyAssertion
            | DataPropertyAssertion
            | SameIndividual
            | DifferentIndividuals => AxiomCategory::Assertional,
            SubClassOf
            | EquivalentClasses
            | DisjointClasses
            | SubObjectPropertyOf
            | SubPropertyChainOf
            | EquivalentObjectProperties
            | DisjointObjectProperties
            | InverseObjectProperties
            | ObjectPropertyDomain
            | ObjectPropertyRange
            | FunctionalObjectProperty
            | InverseFunctionalObjectProperty
            | TransitiveObjectProperty
            | SymmetricObjectProperty
            | AsymmetricObjectProperty
            | ReflexiveObjectProperty
            | IrreflexiveObjectProperty => AxiomCategory::Terminology,
        }
    }

    pub fn is_assertional(self) -> bool {
        self.category() == AxiomCategory::Assertional
    }

    pub fn is_terminology(self) -> bool {
        self.category() == AxiomCategory::Terminology
    }
}

impl Axiom {
    pub fn kind(&self) -> AxiomKind {
        match self {
            Axiom::Declaration(_) => AxiomKind::Declaration,
            Axiom::SubClassOf { .. } => AxiomKind::SubClassOf,
            Axiom::EquivalentClasses(_) => AxiomKind::EquivalentClasses,
            Axiom::DisjointClasses(_) => AxiomKind::DisjointClasses,
            Axiom::SubObjectPropertyOf { .. } => AxiomKind::SubObjectPropertyOf,
            Axiom::SubPropertyChainOf { .. } => AxiomKind::SubPropertyChainOf,
            Axiom::EquivalentObjectProperties(_) => AxiomKind::EquivalentObjectProperties,
            Axiom::DisjointObjectProperties(_) => AxiomKind::DisjointObjectProperties,
            Axiom::InverseObjectProperties(..) => AxiomKind::InverseObjectProperties,
            Axiom::ObjectPropertyDomain { .. } => AxiomKind::ObjectPropertyDomain,
            Axiom::ObjectPropertyRange { .. } => AxiomKind::ObjectPropertyRange,
            Axiom::FunctionalObjectProperty(_) => AxiomKind::FunctionalObjectProperty,
            Axiom::InverseFunctionalObjectProperty(_) => AxiomKind::InverseFunctionalObjectProperty,
            Axiom::TransitiveObjectProperty(_) => AxiomKind::TransitiveObjectProperty,
            Axiom::SymmetricObjectProperty(_) => AxiomKind::SymmetricObjectProperty,
            Axiom::AsymmetricObjectProperty(_) => AxiomKind::AsymmetricObjectProperty,
            Axiom::ReflexiveObjectProperty(_) => AxiomKind::ReflexiveObjectProperty,
            Axiom::IrreflexiveObjectProperty(_) => AxiomKind::IrreflexiveObjectProperty,
            Axiom::ClassAssertion { .. } => AxiomKind::ClassAssertion,
            Axiom::ObjectPropertyAssertion { .. } => AxiomKind::ObjectPropertyAssertion,
            Axiom::NegativeObjectPropertyAssertion { .. } => AxiomKind::NegativeObjectPropertyAssertion,
            Axiom::DataPropertyAssertion { .. } => AxiomKind::DataPropertyAssertion,
            Axiom::SameIndividual(_) => AxiomKind::SameIndividual,
            Axiom::DifferentIndividuals(_) => AxiomKind::DifferentIndividuals,
            Axiom::AnnotationAssertion { .. } => AxiomKind::AnnotationAssertion,
        }
    }

    pub fn category(&self) -> AxiomCategory {
        self.kind().category()
    }

    pub fn is_terminology(&self) -> bool {
        self.kind().is_terminology()
    }

    pub fn is_assertional(&self) -> bool {
        self.kind().is_assertional()
    }

    pub fn class_assertion(class: ClassExpression, individual: Individual) -> Self {
        Axiom::ClassAssertion { class, individual }
    }

    pub fn object_property_assertion(property: ObjectPropertyExpression, subject: Individual, object: Individual) -> Self {
        Axiom::ObjectPropertyAssertion { property, subject, object }
    }

    pub fn sub_class_of(sub: ClassExpression, sup: ClassExpression) -> Self {
        Axiom::SubClassOf { sub, sup }
    }
}
