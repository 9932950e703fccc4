//! Terminology-to-rules translation
//!
//! [`OwlRuleTranslator`] compiles the terminology of an ontology into
//! OWL 2 RL style rules. Each axiom becomes one or more rules specialised to
//! its classes and properties:
//!
//! | Rule | Axiom | Body | Head |
//! |------|-------|------|------|
//! | cax-sco | `C1 ⊑ C2` | `X type C1` | `X type C2` |
//! | cax-eqc | `C1 ≡ C2` | `X type C1` | `X type C2` (both ways) |
//! | cax-dw | `C1 ⊓ C2 ⊑ ⊥` | `X type C1`, `X type C2` | `X type Nothing` |
//! | cls-avf | `C ⊑ ∀P.D` | `X type C`, `X P Y` | `Y type D` |
//! | cls-maxc2 | `C ⊑ ≤1 P` | `X type C`, `X P Y1`, `X P Y2` | `Y1 sameAs Y2` |
//! | prp-spo1 | `P1 ⊑ P2` | `X P1 Y` | `X P2 Y` |
//! | prp-spo2 | `P1 ∘ … ∘ Pn ⊑ P` | `X0 P1 X1`, …, `Xn-1 Pn Xn` | `X0 P Xn` |
//! | prp-inv | `P1 ≡ P2⁻` | `X P1 Y` | `Y P2 X` (both ways) |
//! | prp-dom | `∃P.⊤ ⊑ C` | `X P Y` | `X type C` |
//! | prp-rng | `⊤ ⊑ ∀P.C` | `X P Y` | `Y type C` |
//! | prp-fp | `Functional(P)` | `X P Y1`, `X P Y2` | `Y1 sameAs Y2` |
//! | prp-ifp | `InverseFunctional(P)` | `X1 P Y`, `X2 P Y` | `X1 sameAs X2` |
//! | prp-trp | `Transitive(P)` | `X P Y`, `Y P Z` | `X P Z` |
//! | prp-symp | `Symmetric(P)` | `X P Y` | `Y P X` |
//! | prp-asyp | `Asymmetric(P)` | `X P Y`, `Y P X` | `X type Nothing` |
//! | prp-irp | `Irreflexive(P)` | `X P X` | `X type Nothing` |
//! | prp-pdw | `Disjoint(P1, P2)` | `X P1 Y`, `X P2 Y` | `X type Nothing` |
//! | eq-sym | | `X sameAs Y` | `Y sameAs X` |
//! | eq-trans | | `X sameAs Y`, `Y sameAs Z` | `X sameAs Z` |
//! | eq-rep-s | | `S sameAs S2`, `S P O` | `S2 P O` |
//! | eq-rep-o | | `O sameAs O2`, `S P O` | `S P O2` |
//! | eq-diff1 | | `X sameAs Y`, `X differentFrom Y` | `X type Nothing` |
//! | indirect-type | `C ⊏ D` (told, strict) | `X type C` | `X indirect-type D` |
//!
//! Class expressions on the left of a subsumption may be classes,
//! intersections, unions, existential restrictions and has-value
//! restrictions; on the right, classes, intersections, has-value,
//! universal restrictions, complements of classes and max-cardinality
//! 0/1. Axioms outside this fragment are skipped.

use crate::rule::{Rule, RuleSet};
use crate::RuleError;
use orbweaver_core::model::{Iri, Term};
use orbweaver_core::ontology::Ontology;
use orbweaver_core::owl::{Axiom, ClassExpression, Individual, ObjectPropertyExpression};
use orbweaver_core::pattern::{PatternValue, TriplePattern};
use orbweaver_core::vocabulary;
use orbweaver_structural::{StructuralReasoner, TerminologyView};
use tracing::debug;

/// Compiles the terminology of an ontology into rules
pub trait RuleTranslator: Send + Sync {
    fn translate(&self, ontology: &Ontology) -> Result<RuleSet, RuleError>;

    /// Predicate marking types that hold only through subsumption
    fn indirect_type_predicate(&self) -> Iri {
        vocabulary::indirect_type()
    }
}

/// OWL 2 RL style translator
#[derive(Debug, Clone)]
pub struct OwlRuleTranslator {
    /// Emit the owl:sameAs / owl:differentFrom rules
    pub equality_rules: bool,
    /// Emit indirect-type bookkeeping rules
    pub indirect_rules: bool,
}

impl Default for OwlRuleTranslator {
    fn default() -> Self {
        Self {
            equality_rules: true,
            indirect_rules: true,
        }
    }
}

impl RuleTranslator for OwlRuleTranslator {
    fn translate(&self, ontology: &Ontology) -> Result<RuleSet, RuleError> {
        let mut rules = RuleSet::new();
        let mut skipped = 0usize;

        for axiom in ontology.terminology_axioms() {
            let translated = translate_axiom(axiom);
            if translated.is_empty() {
                debug!(kind = ?axiom.kind(), "axiom outside the rule fragment, skipped");
                skipped += 1;
            }
            rules.extend(translated);
        }

        if self.equality_rules {
            rules.extend(equality_rules());
        }

        if self.indirect_rules {
            rules.extend(indirect_rules(ontology, &self.indirect_type_predicate()));
        }

        debug!(rules = rules.len(), skipped, "terminology translated to rules");
        Ok(rules)
    }
}

/// Fresh variable names for one axiom
#[derive(Debug, Default)]
struct Variables {
    next: usize,
}

impl Variables {
    fn fresh(&mut self) -> PatternValue {
        self.next += 1;
        PatternValue::var(format!("v{}", self.next))
    }
}

/// Conditions and conclusions a superclass expression contributes
#[derive(Debug, Clone, Default)]
struct Conclusion {
    extra_body: Vec<TriplePattern>,
    head: Vec<TriplePattern>,
}

fn type_pattern(subject: PatternValue, class: &Iri) -> TriplePattern {
    TriplePattern::new(subject, vocabulary::rdf_type(), Term::Iri(class.clone()))
}

fn nothing_pattern(subject: PatternValue) -> TriplePattern {
    type_pattern(subject, &vocabulary::owl_nothing())
}

fn same_as_pattern(a: PatternValue, b: PatternValue) -> TriplePattern {
    TriplePattern::new(a, vocabulary::owl_same_as(), b)
}

/// `subject P object`, flipped for an inverse property
fn edge(subject: PatternValue, property: &ObjectPropertyExpression, object: PatternValue) -> TriplePattern {
    match property {
        ObjectPropertyExpression::Property(iri) => TriplePattern::new(subject, iri.clone(), object),
        ObjectPropertyExpression::InverseOf(iri) => TriplePattern::new(object, iri.clone(), subject),
    }
}

fn individual_value(individual: &Individual) -> Option<PatternValue> {
    individual.as_named().map(|iri| PatternValue::Constant(Term::Iri(iri.clone())))
}

/// Alternative bodies (a disjunction) recognising members of `ce` bound to `x`
fn bodies(ce: &ClassExpression, x: &PatternValue, vars: &mut Variables) -> Option<Vec<Vec<TriplePattern>>> {
    match ce {
        ClassExpression::Class(iri) if iri.as_str() == vocabulary::OWL_THING => None,
        ClassExpression::Class(iri) => Some(vec![vec![type_pattern(x.clone(), iri)]]),
        ClassExpression::IntersectionOf(operands) => {
            let mut product: Vec<Vec<TriplePattern>> = vec![Vec::new()];
            for operand in operands {
                let alternatives = bodies(operand, x, vars)?;
                product = product
                    .iter()
                    .flat_map(|prefix| {
                        alternatives.iter().map(move |alternative| {
                            let mut joined = prefix.clone();
                            joined.extend(alternative.iter().cloned());
                            joined
                        })
                    })
                    .collect();
            }
            Some(product)
        }
        ClassExpression::UnionOf(operands) => {
            let mut union = Vec::new();
            for operand in operands {
                union.extend(bodies(operand, x, vars)?);
            }
            Some(union)
        }
        ClassExpression::SomeValuesFrom { property, filler } => {
            let y = vars.fresh();
            let link = edge(x.clone(), property, y.clone());
            if filler.is_thing() {
                return Some(vec![vec![link]]);
            }
            let filler_bodies = bodies(filler, &y, vars)?;
            Some(
                filler_bodies
                    .into_iter()
                    .map(|mut body| {
                        body.insert(0, link.clone());
                        body
                    })
                    .collect(),
            )
        }
        ClassExpression::HasValue { property, value } => {
            let value = individual_value(value)?;
            Some(vec![vec![edge(x.clone(), property, value)]])
        }
        _ => None,
    }
}

/// What membership of `x` in `ce` lets us conclude
fn conclusions(ce: &ClassExpression, x: &PatternValue, vars: &mut Variables) -> Option<Vec<Conclusion>> {
    match ce {
        ClassExpression::Class(iri) if iri.as_str() == vocabulary::OWL_THING => Some(Vec::new()),
        ClassExpression::Class(iri) => Some(vec![Conclusion {
            extra_body: Vec::new(),
            head: vec![type_pattern(x.clone(), iri)],
        }]),
        // Each supported conjunct concludes on its own; the rest are skipped
        ClassExpression::IntersectionOf(operands) => {
            let supported: Vec<Vec<Conclusion>> = operands
                .iter()
                .filter_map(|operand| conclusions(operand, x, vars))
                .collect();
            if supported.is_empty() {
                return None;
            }
            Some(supported.into_iter().flatten().collect())
        }
        ClassExpression::HasValue { property, value } => {
            let value = individual_value(value)?;
            Some(vec![Conclusion {
                extra_body: Vec::new(),
                head: vec![edge(x.clone(), property, value)],
            }])
        }
        ClassExpression::AllValuesFrom { property, filler } => {
            let y = vars.fresh();
            let link = edge(x.clone(), property, y.clone());
            let inner = conclusions(filler, &y, vars)?;
            Some(
                inner
                    .into_iter()
                    .map(|mut conclusion| {
                        conclusion.extra_body.insert(0, link.clone());
                        conclusion
                    })
                    .collect(),
            )
        }
        ClassExpression::ComplementOf(operand) => {
            let excluded = bodies(operand, x, vars)?;
            Some(
                excluded
                    .into_iter()
                    .map(|extra_body| Conclusion {
                        extra_body,
                        head: vec![nothing_pattern(x.clone())],
                    })
                    .collect(),
            )
        }
        ClassExpression::MaxCardinality {
            cardinality,
            property,
            filler,
        } if *cardinality <= 1 => {
            let filler_class = match filler.as_deref() {
                None => None,
                Some(expr) if expr.is_thing() => None,
                Some(expr) => Some(expr.as_class()?.clone()),
            };
            let y1 = vars.fresh();
            let mut extra_body = vec![edge(x.clone(), property, y1.clone())];
            if let Some(class) = &filler_class {
                extra_body.push(type_pattern(y1.clone(), class));
            }

            if *cardinality == 0 {
                return Some(vec![Conclusion {
                    extra_body,
                    head: vec![nothing_pattern(x.clone())],
                }]);
            }

            let y2 = vars.fresh();
            extra_body.push(edge(x.clone(), property, y2.clone()));
            if let Some(class) = &filler_class {
                extra_body.push(type_pattern(y2.clone(), class));
            }
            Some(vec![Conclusion {
                extra_body,
                head: vec![same_as_pattern(y1, y2)],
            }])
        }
        _ => None,
    }
}

/// Rules for `sub ⊑ sup`; empty when either side is outside the fragment
fn subsumption_rules(name: &str, sub: &ClassExpression, sup: &ClassExpression) -> Vec<Rule> {
    let mut vars = Variables::default();
    let x = PatternValue::var("x");

    let Some(sub_bodies) = bodies(sub, &x, &mut vars) else {
        return Vec::new();
    };
    let Some(sup_conclusions) = conclusions(sup, &x, &mut vars) else {
        return Vec::new();
    };

    let mut rules = Vec::new();
    for body in sub_bodies.iter().filter(|body| !body.is_empty()) {
        for conclusion in &sup_conclusions {
            if conclusion.head.is_empty() {
                continue;
            }
            let mut full_body = body.clone();
            full_body.extend(conclusion.extra_body.iter().cloned());
            rules.push(Rule::new(name, full_body, conclusion.head.clone()));
        }
    }
    rules
}

fn property_rules(name: &str, sub: &ObjectPropertyExpression, sup: &ObjectPropertyExpression) -> Rule {
    let x = PatternValue::var("x");
    let y = PatternValue::var("y");
    Rule::new(name, vec![edge(x.clone(), sub, y.clone())], vec![edge(x, sup, y)])
}

/// Translate one terminology axiom
pub fn translate_axiom(axiom: &Axiom) -> Vec<Rule> {
    let x = || PatternValue::var("x");
    let y = || PatternValue::var("y");
    let z = || PatternValue::var("z");

    match axiom {
        Axiom::SubClassOf { sub, sup } => subsumption_rules("cax-sco", sub, sup),
        Axiom::EquivalentClasses(members) => {
            let mut rules = Vec::new();
            for a in members {
                for b in members {
                    if a != b {
                        rules.extend(subsumption_rules("cax-eqc", a, b));
                    }
                }
            }
            rules
        }
        Axiom::DisjointClasses(members) => {
            let mut rules = Vec::new();
            for (i, a) in members.iter().enumerate() {
                for b in &members[i + 1..] {
                    let both = ClassExpression::IntersectionOf(vec![a.clone(), b.clone()]);
                    rules.extend(subsumption_rules("cax-dw", &both, &ClassExpression::nothing()));
                }
            }
            rules
        }
        Axiom::SubObjectPropertyOf { sub, sup } => vec![property_rules("prp-spo1", sub, sup)],
        Axiom::EquivalentObjectProperties(members) => {
            let mut rules = Vec::new();
            for a in members {
                for b in members {
                    if a != b {
                        rules.push(property_rules("prp-eqp", a, b));
                    }
                }
            }
            rules
        }
        Axiom::InverseObjectProperties(first, second) => vec![
            property_rules("prp-inv1", first, &second.inverse()),
            property_rules("prp-inv2", second, &first.inverse()),
        ],
        Axiom::SubPropertyChainOf { chain, sup } => {
            if chain.is_empty() {
                return Vec::new();
            }
            let nodes: Vec<PatternValue> = (0..=chain.len()).map(|i| PatternValue::var(format!("x{}", i))).collect();
            let body = chain
                .iter()
                .enumerate()
                .map(|(i, property)| edge(nodes[i].clone(), property, nodes[i + 1].clone()))
                .collect();
            vec![Rule::new(
                "prp-spo2",
                body,
                vec![edge(nodes[0].clone(), sup, nodes[chain.len()].clone())],
            )]
        }
        Axiom::ObjectPropertyDomain { property, domain } => {
            domain_rules("prp-dom", edge(x(), property, y()), x(), domain)
        }
        Axiom::ObjectPropertyRange { property, range } => {
            domain_rules("prp-rng", edge(x(), property, y()), y(), range)
        }
        Axiom::FunctionalObjectProperty(property) => vec![Rule::new(
            "prp-fp",
            vec![edge(x(), property, y()), edge(x(), property, z())],
            vec![same_as_pattern(y(), z())],
        )],
        Axiom::InverseFunctionalObjectProperty(property) => vec![Rule::new(
            "prp-ifp",
            vec![edge(x(), property, z()), edge(y(), property, z())],
            vec![same_as_pattern(x(), y())],
        )],
        Axiom::TransitiveObjectProperty(property) => vec![Rule::new(
            "prp-trp",
            vec![edge(x(), property, y()), edge(y(), property, z())],
            vec![edge(x(), property, z())],
        )],
        Axiom::SymmetricObjectProperty(property) => vec![Rule::new(
            "prp-symp",
            vec![edge(x(), property, y())],
            vec![edge(y(), property, x())],
        )],
        Axiom::AsymmetricObjectProperty(property) => vec![Rule::new(
            "prp-asyp",
            vec![edge(x(), property, y()), edge(y(), property, x())],
            vec![nothing_pattern(x())],
        )],
        Axiom::IrreflexiveObjectProperty(property) => vec![Rule::new(
            "prp-irp",
            vec![edge(x(), property, x())],
            vec![nothing_pattern(x())],
        )],
        Axiom::DisjointObjectProperties(members) => {
            let mut rules = Vec::new();
            for (i, a) in members.iter().enumerate() {
                for b in &members[i + 1..] {
                    rules.push(Rule::new(
                        "prp-pdw",
                        vec![edge(x(), a, y()), edge(x(), b, y())],
                        vec![nothing_pattern(x())],
                    ));
                }
            }
            rules
        }
        _ => Vec::new(),
    }
}

/// Rules concluding membership of `member` in `class` whenever `link` holds
fn domain_rules(name: &str, link: TriplePattern, member: PatternValue, class: &ClassExpression) -> Vec<Rule> {
    let mut vars = Variables::default();
    let Some(found) = conclusions(class, &member, &mut vars) else {
        return Vec::new();
    };
    found
        .into_iter()
        .filter(|conclusion| !conclusion.head.is_empty())
        .map(|conclusion| {
            let mut body = vec![link.clone()];
            body.extend(conclusion.extra_body);
            Rule::new(name, body, conclusion.head)
        })
        .collect()
}

/// owl:sameAs symmetry, transitivity and replacement, plus the
/// sameAs/differentFrom clash
pub fn equality_rules() -> Vec<Rule> {
    let v = PatternValue::var;
    let same = vocabulary::owl_same_as();
    let different = vocabulary::owl_different_from();

    vec![
        Rule::new(
            "eq-sym",
            vec![TriplePattern::new(v("x"), same.clone(), v("y"))],
            vec![TriplePattern::new(v("y"), same.clone(), v("x"))],
        ),
        Rule::new(
            "eq-trans",
            vec![
                TriplePattern::new(v("x"), same.clone(), v("y")),
                TriplePattern::new(v("y"), same.clone(), v("z")),
            ],
            vec![TriplePattern::new(v("x"), same.clone(), v("z"))],
        ),
        Rule::new(
            "eq-rep-s",
            vec![
                TriplePattern::new(v("s"), same.clone(), v("s2")),
                TriplePattern::new(v("s"), v("p"), v("o")),
            ],
            vec![TriplePattern::new(v("s2"), v("p"), v("o"))],
        ),
        Rule::new(
            "eq-rep-o",
            vec![
                TriplePattern::new(v("o"), same.clone(), v("o2")),
                TriplePattern::new(v("s"), v("p"), v("o")),
            ],
            vec![TriplePattern::new(v("s"), v("p"), v("o2"))],
        ),
        Rule::new(
            "eq-diff-sym",
            vec![TriplePattern::new(v("x"), different.clone(), v("y"))],
            vec![TriplePattern::new(v("y"), different.clone(), v("x"))],
        ),
        Rule::new(
            "eq-diff1",
            vec![
                TriplePattern::new(v("x"), same, v("y")),
                TriplePattern::new(v("x"), different, v("y")),
            ],
            vec![nothing_pattern(v("x"))],
        ),
    ]
}

/// `X type C → X indirect D` for every strict told superclass `D` of each
/// satisfiable named class `C`. `owl:Thing` is a strict superclass of
/// every such `C`.
pub fn indirect_rules(ontology: &Ontology, indirect: &Iri) -> Vec<Rule> {
    let hierarchy = StructuralReasoner::new(ontology);
    let bottom = hierarchy.bottom_class_node();
    let thing = vocabulary::owl_thing();
    let x = PatternValue::var("x");

    let mut rules = Vec::new();
    for class in ontology.classes_in_signature() {
        if bottom.contains(&class) || class == thing {
            continue;
        }
        let supers = match hierarchy.super_classes(&ClassExpression::Class(class.clone()), false) {
            Ok(supers) => supers.flattened(),
            Err(_) => continue,
        };
        for sup in supers.into_iter().filter(|sup| *sup != thing).chain([thing.clone()]) {
            rules.push(Rule::new(
                "indirect-type",
                vec![type_pattern(x.clone(), &class)],
                vec![TriplePattern::new(x.clone(), indirect.clone(), Term::Iri(sup))],
            ));
        }
    }
    rules
}
