//! Well-known IRIs

use crate::model::Iri;

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const OWL_THING: &str = "http://www.w3.org/2002/07/owl#Thing";
pub const OWL_NOTHING: &str = "http://www.w3.org/2002/07/owl#Nothing";
pub const OWL_NAMED_INDIVIDUAL: &str = "http://www.w3.org/2002/07/owl#NamedIndividual";
pub const OWL_SAME_AS: &str = "http://www.w3.org/2002/07/owl#sameAs";
pub const OWL_DIFFERENT_FROM: &str = "http://www.w3.org/2002/07/owl#differentFrom";
pub const OWL_TOP_OBJECT_PROPERTY: &str = "http://www.w3.org/2002/07/owl#topObjectProperty";
pub const OWL_BOTTOM_OBJECT_PROPERTY: &str = "http://www.w3.org/2002/07/owl#bottomObjectProperty";

/// Marks a type that holds only through subsumption, never asserted directly.
/// Internal bookkeeping: never returned to a caller as a type.
pub const INDIRECT_TYPE: &str = "urn:orbweaver:vocab:indirect-type";

pub fn rdf_type() -> Iri { Iri::new(RDF_TYPE) }
pub fn owl_thing() -> Iri { Iri::new(OWL_THING) }
pub fn owl_nothing() -> Iri { Iri::new(OWL_NOTHING) }
pub fn owl_named_individual() -> Iri { Iri::new(OWL_NAMED_INDIVIDUAL) }
pub fn owl_same_as() -> Iri { Iri::new(OWL_SAME_AS) }
pub fn owl_different_from() -> Iri { Iri::new(OWL_DIFFERENT_FROM) }
pub fn owl_top_object_property() -> Iri { Iri::new(OWL_TOP_OBJECT_PROPERTY) }
pub fn owl_bottom_object_property() -> Iri { Iri::new(OWL_BOTTOM_OBJECT_PROPERTY) }
pub fn indirect_type() -> Iri { Iri::new(INDIRECT_TYPE) }
