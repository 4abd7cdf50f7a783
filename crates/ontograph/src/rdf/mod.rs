//! A minimal RDF triple graph with Turtle and N-Triples writers.
//!
//! Both the ontology serializers and the diagram graph export produce a
//! [`TripleGraph`] first and then write it out.

pub mod mapping;

mod ntriples;
mod turtle;

use std::fmt;

use crate::ontology::{InvalidIri, Iri, Literal, vocab};

/// A subject or object position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    Iri(Iri),
    Blank(u32),
    Literal(Literal),
}

impl Term {
    pub fn iri(iri: impl Into<String>) -> Self {
        Self::Iri(Iri::new(iri))
    }

    pub fn literal(lexical: impl Into<String>) -> Self {
        Self::Literal(Literal::plain(lexical))
    }
}

impl From<&Iri> for Term {
    fn from(iri: &Iri) -> Self {
        Self::Iri(iri.clone())
    }
}

impl fmt::Display for Term {
    /// Writes the term in N-Triples form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iri(iri) => write!(f, "<{iri}>"),
            Self::Blank(id) => write!(f, "_:b{id}"),
            Self::Literal(literal) => {
                write!(f, "\"{}\"", escape(literal.lexical()))?;
                if let Some(datatype) = literal.datatype() {
                    write!(f, "^^<{datatype}>")?;
                }
                Ok(())
            }
        }
    }
}

/// One RDF statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    subject: Term,
    predicate: Iri,
    object: Term,
}

impl Triple {
    pub fn subject(&self) -> &Term {
        &self.subject
    }

    pub fn predicate(&self) -> &Iri {
        &self.predicate
    }

    pub fn object(&self) -> &Term {
        &self.object
    }
}

/// An ordered list of triples plus the prefixes used to abbreviate them.
#[derive(Debug, Clone, Default)]
pub struct TripleGraph {
    prefixes: Vec<(String, String)>,
    triples: Vec<Triple>,
    next_blank: u32,
}

impl TripleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind_prefix(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.prefixes.push((prefix.into(), namespace.into()));
    }

    pub fn prefixes(&self) -> &[(String, String)] {
        &self.prefixes
    }

    pub fn triples(&self) -> &[Triple] {
        &self.triples
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Allocates a fresh blank node
    pub fn blank(&mut self) -> Term {
        let id = self.next_blank;
        self.next_blank += 1;
        Term::Blank(id)
    }

    pub fn add(&mut self, subject: Term, predicate: &str, object: Term) {
        self.triples.push(Triple {
            subject,
            predicate: Iri::new(predicate),
            object,
        });
    }

    /// Encodes `items` as an `rdf:List` and returns its head.
    pub fn list(&mut self, items: Vec<Term>) -> Term {
        let mut head = Term::iri(vocab::RDF_NIL);
        for item in items.into_iter().rev() {
            let cell = self.blank();
            self.add(cell.clone(), vocab::RDF_FIRST, item);
            self.add(cell.clone(), vocab::RDF_REST, head);
            head = cell;
        }
        head
    }

    /// Returns every object of `subject` through `predicate`
    pub fn objects<'a>(
        &'a self,
        subject: &'a Term,
        predicate: &'a str,
    ) -> impl Iterator<Item = &'a Term> {
        self.triples
            .iter()
            .filter(move |t| &t.subject == subject && t.predicate.as_str() == predicate)
            .map(|t| &t.object)
    }

    /// Checks every IRI the graph would write, prefix namespaces included.
    pub fn validate(&self) -> Result<(), InvalidIri> {
        let namespaces = self.prefixes.iter().map(|(_, namespace)| Iri::new(namespace.as_str()));
        let terms = self.triples.iter().flat_map(|triple| {
            [&triple.subject, &triple.object]
                .into_iter()
                .filter_map(|term| match term {
                    Term::Iri(iri) => Some(iri.clone()),
                    Term::Literal(literal) => literal.datatype().cloned(),
                    Term::Blank(_) => None,
                })
                .chain([triple.predicate.clone()])
        });
        match namespaces.chain(terms).find(|iri| !iri.is_valid()) {
            Some(iri) => Err(InvalidIri(iri)),
            None => Ok(()),
        }
    }

    pub fn to_turtle(&self) -> Result<String, InvalidIri> {
        self.validate()?;
        Ok(turtle::write(self))
    }

    pub fn to_ntriples(&self) -> Result<String, InvalidIri> {
        self.validate()?;
        Ok(ntriples::write(self))
    }
}

/// Escapes a string for a quoted literal in Turtle or N-Triples.
pub(crate) fn escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_encoding() {
        let mut graph = TripleGraph::new();
        let head = graph.list(vec![Term::iri("http://a"), Term::iri("http://b")]);

        assert_eq!(head, Term::Blank(1));
        let first: Vec<&Term> = graph.objects(&head, vocab::RDF_FIRST).collect();
        assert_eq!(first, [&Term::iri("http://a")]);
        let rest: Vec<&Term> = graph.objects(&head, vocab::RDF_REST).collect();
        assert_eq!(rest, [&Term::Blank(0)]);
        let tail: Vec<&Term> = graph.objects(&Term::Blank(0), vocab::RDF_REST).collect();
        assert_eq!(tail, [&Term::iri(vocab::RDF_NIL)]);
    }

    #[test]
    fn test_empty_list_is_nil() {
        let mut graph = TripleGraph::new();
        assert_eq!(graph.list(Vec::new()), Term::iri(vocab::RDF_NIL));
        assert!(graph.is_empty());
    }

    #[test]
    fn test_writers_refuse_invalid_iris() {
        let mut graph = TripleGraph::new();
        graph.add(Term::iri("http://a"), vocab::RDF_TYPE, Term::iri("http://b/<c>"));

        let expected = InvalidIri(Iri::new("http://b/<c>"));
        assert_eq!(graph.to_turtle(), Err(expected.clone()));
        assert_eq!(graph.to_ntriples(), Err(expected));
    }

    #[test]
    fn test_iris_need_a_scheme() {
        let mut graph = TripleGraph::new();
        graph.add(Term::iri("Dog"), vocab::RDF_TYPE, Term::iri(vocab::OWL_CLASS));
        assert_eq!(
            graph.validate().unwrap_err().to_string(),
            "cannot write invalid IRI <Dog>"
        );

        let mut graph = TripleGraph::new();
        graph.bind_prefix("ex", "http://example.org/a b#");
        assert!(graph.validate().is_err());
    }

    #[test]
    fn test_term_display() {
        assert_eq!(Term::iri("http://a").to_string(), "<http://a>");
        assert_eq!(Term::Blank(3).to_string(), "_:b3");
        assert_eq!(
            Term::literal("say \"hi\"\n").to_string(),
            "\"say \\\"hi\\\"\\n\""
        );
        let typed = Term::Literal(Literal::typed("4", Iri::new(format!("{}int", vocab::XSD))));
        assert_eq!(
            typed.to_string(),
            "\"4\"^^<http://www.w3.org/2001/XMLSchema#int>"
        );
    }
}
