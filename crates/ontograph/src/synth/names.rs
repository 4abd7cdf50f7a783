//! Entity names and their resolution to IRIs.
//!
//! A name is derived from a shape's display text by joining its words.
//! Words starting with an uppercase letter are glued on directly, any other
//! word is joined with a hyphen, so `Motor Vehicle` becomes `MotorVehicle`
//! and `motor vehicle` becomes `motor-vehicle`.
//!
//! Names then resolve in three ways: absolute IRIs are kept, `prefix:local`
//! names are expanded through the bound prefixes, and anything else lands in
//! the local namespace of the ontology. Characters that may not appear in an
//! IRI are percent-encoded on the way.

use std::fmt::Write as _;

use indexmap::IndexMap;

use crate::{
    ontology::{Iri, is_iri_char, is_scheme, vocab},
    rdf::mapping::local_namespace,
};

/// Derives an entity name from display text; `None` for blank text.
pub fn derive_name(text: &str) -> Option<String> {
    let mut name = String::new();
    for word in text.split_whitespace() {
        let capitalized = word.chars().next().is_some_and(char::is_uppercase);
        if !capitalized && !name.is_empty() {
            name.push('-');
        }
        name.push_str(word);
    }
    (!name.is_empty()).then_some(name)
}

/// Returns true for text that is exactly one absolute IRI.
///
/// The text must start with a scheme and continue with `//`, except for
/// `urn:` names. Text with whitespace is never an IRI.
pub fn is_absolute(text: &str) -> bool {
    let text = text.trim();
    if text.contains(char::is_whitespace) {
        return false;
    }
    let Some((scheme, rest)) = text.split_once(':') else {
        return false;
    };
    is_scheme(scheme) && (rest.starts_with("//") || scheme.eq_ignore_ascii_case("urn"))
}

/// Percent-encodes every character that may not appear in an IRI.
///
/// `%` is kept, so text that is already encoded stays unchanged.
pub fn encode(text: &str) -> String {
    let mut encoded = String::with_capacity(text.len());
    for c in text.chars() {
        if is_iri_char(c) {
            encoded.push(c);
        } else {
            let mut bytes = [0; 4];
            for byte in c.encode_utf8(&mut bytes).bytes() {
                let _ = write!(encoded, "%{byte:02X}");
            }
        }
    }
    encoded
}

/// A `prefix:local` name whose prefix is not bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnboundPrefix(pub String);

/// Prefix table and local namespace used to resolve names.
#[derive(Debug, Clone)]
pub struct Namespaces {
    local: String,
    prefixes: IndexMap<String, String>,
}

impl Namespaces {
    /// Creates a table for `ontology` holding the default prefixes.
    pub fn new(ontology: &Iri) -> Self {
        let prefixes = vocab::DEFAULT_PREFIXES
            .iter()
            .map(|(prefix, namespace)| (prefix.to_string(), namespace.to_string()))
            .collect();
        Self {
            local: local_namespace(ontology),
            prefixes,
        }
    }

    pub fn bind(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.prefixes.insert(prefix.into(), namespace.into());
    }

    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(String::as_str)
    }

    /// Namespace of locally named entities
    pub fn local(&self) -> &str {
        &self.local
    }

    pub fn is_local(&self, iri: &Iri) -> bool {
        iri.as_str().starts_with(&self.local)
    }

    /// Resolves a name written as a single token.
    pub fn resolve(&self, name: &str) -> Result<Iri, UnboundPrefix> {
        let name = name.trim();
        if is_absolute(name) {
            return Ok(Iri::new(encode(name)));
        }
        self.resolve_relative(name)
    }

    /// Resolves the display text of a shape; `Ok(None)` for blank text.
    ///
    /// Only text that is one absolute IRI as a whole is kept as written.
    /// Anything else goes through [`derive_name`] first, so a URL inside
    /// longer text stays part of a local name.
    pub fn resolve_text(&self, text: &str) -> Result<Option<Iri>, UnboundPrefix> {
        let text = text.trim();
        if is_absolute(text) {
            return Ok(Some(Iri::new(encode(text))));
        }
        derive_name(text)
            .map(|name| self.resolve_relative(&name))
            .transpose()
    }

    fn resolve_relative(&self, name: &str) -> Result<Iri, UnboundPrefix> {
        // `word://...` left over from joined words is not a prefixed name
        match name.split_once(':').filter(|(_, local)| !local.starts_with("//")) {
            Some((prefix, local)) => self
                .get(prefix)
                .map(|namespace| Iri::new(format!("{namespace}{}", encode(local))))
                .ok_or_else(|| UnboundPrefix(prefix.to_string())),
            None => Ok(Iri::new(format!("{}{}", self.local, encode(name)))),
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn namespaces() -> Namespaces {
        Namespaces::new(&Iri::new("http://example.org/onto"))
    }

    #[test]
    fn test_derive_name() {
        assert_eq!(derive_name("Car").as_deref(), Some("Car"));
        assert_eq!(derive_name("Motor Vehicle").as_deref(), Some("MotorVehicle"));
        assert_eq!(derive_name("motor vehicle").as_deref(), Some("motor-vehicle"));
        assert_eq!(derive_name("has\nowner").as_deref(), Some("has-owner"));
        assert_eq!(derive_name("Route 66").as_deref(), Some("Route-66"));
        assert_eq!(derive_name("  "), None);
        assert_eq!(derive_name(""), None);
    }

    #[test]
    fn test_resolve_local_name() {
        let names = namespaces();
        assert_eq!(
            names.resolve("Dog"),
            Ok(Iri::new("http://example.org/onto#Dog"))
        );
        assert!(names.is_local(&Iri::new("http://example.org/onto#Dog")));
    }

    #[test]
    fn test_resolve_prefixed_name() {
        let mut names = namespaces();
        assert_eq!(
            names.resolve("owl:Thing"),
            Ok(Iri::new(vocab::OWL_THING))
        );
        assert_eq!(names.resolve("foo:Bar"), Err(UnboundPrefix("foo".to_string())));

        names.bind("foo", "http://foo.org/ns#");
        assert_eq!(names.resolve("foo:Bar"), Ok(Iri::new("http://foo.org/ns#Bar")));
        assert!(!names.is_local(&Iri::new("http://foo.org/ns#Bar")));
    }

    #[test]
    fn test_resolve_absolute() {
        let names = namespaces();
        assert_eq!(
            names.resolve("http://other.org/x#Y"),
            Ok(Iri::new("http://other.org/x#Y"))
        );
        assert_eq!(names.resolve("urn:isbn:1"), Ok(Iri::new("urn:isbn:1")));
    }

    #[test]
    fn test_is_absolute() {
        assert!(is_absolute("http://example.org/onto"));
        assert!(is_absolute("  https://example.org/a#b "));
        assert!(is_absolute("URN:isbn:1"));
        assert!(!is_absolute("See http://example.org/help for notes"));
        assert!(!is_absolute("Foo http://x.org/a"));
        assert!(!is_absolute("owl:Thing"));
        assert!(!is_absolute("1http://x.org"));
        assert!(!is_absolute("://x.org"));
        assert!(!is_absolute("Dog"));
    }

    #[test]
    fn test_encode() {
        assert_eq!(encode("Dog"), "Dog");
        assert_eq!(encode("A<B>-\"q\""), "A%3CB%3E-%22q%22");
        assert_eq!(encode("a{b}|c^d`e\\f"), "a%7Bb%7D%7Cc%5Ed%60e%5Cf");
        assert_eq!(encode("tab\there"), "tab%09here");
        assert_eq!(encode("Café"), "Café");
        assert_eq!(encode("50%25"), "50%25");
    }

    #[test]
    fn test_resolve_text_encodes_local_names() {
        let names = namespaces();
        assert_eq!(
            names.resolve_text(r#"A<B> "q""#),
            Ok(Some(Iri::new("http://example.org/onto#A%3CB%3E-%22q%22")))
        );
        assert_eq!(names.resolve_text("   "), Ok(None));
    }

    #[test]
    fn test_resolve_text_keeps_embedded_urls_local() {
        let names = namespaces();
        let iri = names.resolve_text("Foo http://x.org/a").unwrap().unwrap();
        assert_eq!(iri.as_str(), "http://example.org/onto#Foo-http://x.org/a");
        assert!(names.is_local(&iri));

        assert_eq!(
            names.resolve_text(" http://x.org/a "),
            Ok(Some(Iri::new("http://x.org/a")))
        );
    }

    #[test]
    fn test_slash_namespace() {
        let names = Namespaces::new(&Iri::new("http://example.org/onto/"));
        assert_eq!(names.local(), "http://example.org/onto/");
        assert_eq!(
            names.resolve("Dog"),
            Ok(Iri::new("http://example.org/onto/Dog"))
        );
    }

    proptest! {
        #[test]
        fn derive_name_is_idempotent(text in "[A-Za-z0-9 \n]{0,40}") {
            let once = derive_name(&text);
            prop_assert_eq!(&once, &derive_name(&text));
            if let Some(name) = once {
                prop_assert!(!name.contains(char::is_whitespace));
                prop_assert_eq!(derive_name(&name), Some(name.clone()));
            }
        }

        #[test]
        fn capitalized_words_never_get_hyphens(words in prop::collection::vec("[A-Z][a-z]{0,8}", 1..6)) {
            let name = derive_name(&words.join(" ")).unwrap();
            prop_assert!(!name.contains('-'));
            prop_assert_eq!(name, words.concat());
        }

        #[test]
        fn resolved_local_names_are_valid_iris(text in "[^:]{0,30}") {
            if let Some(iri) = namespaces().resolve_text(&text).unwrap() {
                prop_assert!(iri.is_valid(), "invalid IRI {}", iri);
            }
        }
    }
}
