//! Mapping of an [`Ontology`] to RDF triples.
//!
//! Follows the OWL 2 mapping to RDF graphs: boolean class constructors
//! become blank `owl:Class` nodes with `rdf:List` operands, binary
//! disjointness uses `owl:disjointWith`, larger groups use
//! `owl:AllDisjointClasses`, and the same split applies to
//! `owl:differentFrom` and `owl:AllDifferent`.

use std::collections::BTreeSet;

use crate::ontology::{AnnotationValue, Axiom, ClassExpression, Iri, Ontology, vocab};

use super::{Term, TripleGraph};

/// Builds the RDF graph of `ontology`.
///
/// The local namespace of the ontology is bound to the empty prefix.
pub fn ontology_to_graph(ontology: &Ontology) -> TripleGraph {
    let mut graph = TripleGraph::new();
    graph.bind_prefix("", local_namespace(ontology.iri()));
    for (prefix, namespace) in ontology.prefixes() {
        graph.bind_prefix(prefix, namespace);
    }

    graph.add(
        Term::from(ontology.iri()),
        vocab::RDF_TYPE,
        Term::iri(vocab::OWL_ONTOLOGY),
    );
    for annotation in ontology.annotations() {
        let subject = Term::from(annotation.subject());
        let object = match annotation.value() {
            AnnotationValue::Iri(iri) => Term::from(iri),
            AnnotationValue::Literal(literal) => Term::Literal(literal.clone()),
        };
        graph.add(subject, annotation.property().as_str(), object);
    }

    for (iri, kind) in ontology.declarations() {
        graph.add(Term::from(iri), vocab::RDF_TYPE, Term::iri(kind.rdf_type()));
    }

    for axiom in ontology.axioms() {
        map_axiom(&mut graph, axiom);
    }

    graph
}

/// Namespace of locally named entities
pub(crate) fn local_namespace(ontology: &Iri) -> String {
    let iri = ontology.as_str();
    if iri.ends_with('#') || iri.ends_with('/') {
        iri.to_string()
    } else {
        format!("{iri}#")
    }
}

fn map_axiom(graph: &mut TripleGraph, axiom: &Axiom) {
    match axiom {
        Axiom::SubClassOf { sub, sup } => {
            let sub = class_term(graph, sub);
            let sup = class_term(graph, sup);
            graph.add(sub, vocab::RDFS_SUBCLASS_OF, sup);
        }
        Axiom::EquivalentClasses(classes) => {
            let terms: Vec<Term> = classes.iter().map(|c| class_term(graph, c)).collect();
            for pair in terms.windows(2) {
                graph.add(pair[0].clone(), vocab::OWL_EQUIVALENT_CLASS, pair[1].clone());
            }
        }
        Axiom::DisjointClasses(classes) => {
            let terms: Vec<Term> = classes.iter().map(|c| class_term(graph, c)).collect();
            pairwise_or_group(graph, terms, vocab::OWL_DISJOINT_WITH, vocab::OWL_ALL_DISJOINT_CLASSES);
        }
        Axiom::DisjointUnion { class, members } => {
            let terms = members.iter().map(|c| class_term(graph, c)).collect();
            let list = graph.list(terms);
            graph.add(Term::from(class), vocab::OWL_DISJOINT_UNION_OF, list);
        }
        Axiom::SubPropertyOf { sub, sup, .. } => {
            graph.add(Term::from(sub), vocab::RDFS_SUBPROPERTY_OF, Term::from(sup));
        }
        Axiom::ClassAssertion { class, individual } => {
            let class = class_term(graph, class);
            graph.add(Term::from(individual), vocab::RDF_TYPE, class);
        }
        Axiom::ObjectPropertyAssertion {
            property,
            subject,
            object,
        } => {
            graph.add(Term::from(subject), property.as_str(), Term::from(object));
        }
        Axiom::DataPropertyAssertion {
            property,
            subject,
            value,
        } => {
            graph.add(
                Term::from(subject),
                property.as_str(),
                Term::Literal(value.clone()),
            );
        }
        Axiom::SameIndividuals(individuals) => {
            let terms: Vec<Term> = individuals.iter().map(Term::from).collect();
            for pair in terms.windows(2) {
                graph.add(pair[0].clone(), vocab::OWL_SAME_AS, pair[1].clone());
            }
        }
        Axiom::DifferentIndividuals(individuals) => {
            let terms = individuals.iter().map(Term::from).collect();
            pairwise_or_group(graph, terms, vocab::OWL_DIFFERENT_FROM, vocab::OWL_ALL_DIFFERENT);
        }
    }
}

/// Two members use the binary predicate, more use a members list.
fn pairwise_or_group(graph: &mut TripleGraph, terms: Vec<Term>, binary: &str, group: &str) {
    if terms.len() == 2 {
        graph.add(terms[0].clone(), binary, terms[1].clone());
    } else {
        let node = graph.blank();
        graph.add(node.clone(), vocab::RDF_TYPE, Term::iri(group));
        let list = graph.list(terms);
        graph.add(node, vocab::OWL_MEMBERS, list);
    }
}

/// Returns the term naming `class`, emitting the triples of anonymous classes.
fn class_term(graph: &mut TripleGraph, class: &ClassExpression) -> Term {
    match class {
        ClassExpression::Class(iri) => Term::from(iri),
        ClassExpression::UnionOf(operands) => constructor(graph, vocab::OWL_UNION_OF, operands),
        ClassExpression::IntersectionOf(operands) => {
            constructor(graph, vocab::OWL_INTERSECTION_OF, operands)
        }
        ClassExpression::ComplementOf(operand) => {
            let node = anonymous_class(graph);
            let operand = class_term(graph, operand);
            graph.add(node.clone(), vocab::OWL_COMPLEMENT_OF, operand);
            node
        }
        ClassExpression::OneOf(individuals) => {
            let node = anonymous_class(graph);
            let list = graph.list(individuals.iter().map(Term::from).collect());
            graph.add(node.clone(), vocab::OWL_ONE_OF, list);
            node
        }
    }
}

fn constructor(
    graph: &mut TripleGraph,
    predicate: &str,
    operands: &BTreeSet<ClassExpression>,
) -> Term {
    let node = anonymous_class(graph);
    let terms = operands.iter().map(|c| class_term(graph, c)).collect();
    let list = graph.list(terms);
    graph.add(node.clone(), predicate, list);
    node
}

fn anonymous_class(graph: &mut TripleGraph) -> Term {
    let node = graph.blank();
    graph.add(node.clone(), vocab::RDF_TYPE, Term::iri(vocab::OWL_CLASS));
    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ontology::{EntityKind, OntologySink};

    fn iri(local: &str) -> Iri {
        Iri::new(format!("http://example.org/onto#{local}"))
    }

    fn class(local: &str) -> ClassExpression {
        ClassExpression::Class(iri(local))
    }

    fn ontology() -> Ontology {
        Ontology::new(Iri::new("http://example.org/onto"))
    }

    fn predicates(graph: &TripleGraph) -> Vec<&str> {
        graph.triples().iter().map(|t| t.predicate().as_str()).collect()
    }

    #[test]
    fn test_header_and_declarations() {
        let mut onto = ontology();
        onto.declare_entity(&iri("Dog"), EntityKind::Class);

        let graph = ontology_to_graph(&onto);
        assert_eq!(graph.prefixes()[0], (String::new(), "http://example.org/onto#".to_string()));
        assert_eq!(graph.triples()[0].object(), &Term::iri(vocab::OWL_ONTOLOGY));
        assert_eq!(graph.triples()[1].subject(), &Term::from(&iri("Dog")));
        assert_eq!(graph.triples()[1].object(), &Term::iri(vocab::OWL_CLASS));
    }

    #[test]
    fn test_two_disjoint_classes_use_disjoint_with() {
        let mut onto = ontology();
        onto.add_axiom(Axiom::DisjointClasses([class("A"), class("B")].into()));

        let graph = ontology_to_graph(&onto);
        assert_eq!(predicates(&graph)[1..], [vocab::OWL_DISJOINT_WITH]);
    }

    #[test]
    fn test_three_disjoint_classes_use_all_disjoint() {
        let mut onto = ontology();
        onto.add_axiom(Axiom::DisjointClasses(
            [class("A"), class("B"), class("C")].into(),
        ));

        let graph = ontology_to_graph(&onto);
        let groups: Vec<&Term> = graph
            .triples()
            .iter()
            .filter(|t| t.object() == &Term::iri(vocab::OWL_ALL_DISJOINT_CLASSES))
            .map(|t| t.subject())
            .collect();
        assert_eq!(groups.len(), 1);
        assert_eq!(graph.objects(groups[0], vocab::OWL_MEMBERS).count(), 1);
        assert_eq!(
            graph
                .triples()
                .iter()
                .filter(|t| t.predicate().as_str() == vocab::RDF_FIRST)
                .count(),
            3
        );
    }

    #[test]
    fn test_union_equivalence() {
        let mut onto = ontology();
        let union = ClassExpression::UnionOf([class("Cat"), class("Dog")].into());
        onto.add_axiom(Axiom::EquivalentClasses([class("Pet"), union].into()));

        let graph = ontology_to_graph(&onto);
        let equivalence = graph
            .triples()
            .iter()
            .find(|t| t.predicate().as_str() == vocab::OWL_EQUIVALENT_CLASS)
            .unwrap();
        assert_eq!(equivalence.subject(), &Term::from(&iri("Pet")));
        let node = equivalence.object();
        assert_eq!(graph.objects(node, vocab::RDF_TYPE).next(), Some(&Term::iri(vocab::OWL_CLASS)));
        assert_eq!(graph.objects(node, vocab::OWL_UNION_OF).count(), 1);
    }

    #[test]
    fn test_individual_relations() {
        let mut onto = ontology();
        onto.add_axiom(Axiom::SameIndividuals([iri("a"), iri("b"), iri("c")].into()));
        onto.add_axiom(Axiom::DifferentIndividuals([iri("x"), iri("y")].into()));

        let graph = ontology_to_graph(&onto);
        let same = predicates(&graph).iter().filter(|p| **p == vocab::OWL_SAME_AS).count();
        assert_eq!(same, 2);
        assert!(predicates(&graph).contains(&vocab::OWL_DIFFERENT_FROM));
    }

    #[test]
    fn test_local_namespace() {
        assert_eq!(local_namespace(&Iri::new("http://x.org/o")), "http://x.org/o#");
        assert_eq!(local_namespace(&Iri::new("http://x.org/o/")), "http://x.org/o/");
    }
}
