//! Annotation roles.
//!
//! A graphic's note selects its semantic [`Role`]. Notes are normalized
//! (trimmed, lowercased, whitespace, `-` and `_` removed) and looked up in a
//! table built once from [`VOCABULARY`], so `Object Property`,
//! `object-property` and `ObjectProperty` all select the same role. A note
//! starting with `xsd:` marks a typed literal.
//!
//! A role only applies to one kind of graphic (see [`Target`]). A role
//! found on the wrong kind of graphic is ignored.

use std::{collections::HashMap, fmt, sync::OnceLock};

use log::debug;

use ontograph_core::model::{GraphicKind, Node};

use crate::ontology::EntityKind;

/// Note prefix of typed literal shapes
pub const XSD_PREFIX: &str = "xsd:";

/// The semantic role of an annotated graphic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Ontology,
    Imports,
    Class,
    Individual,
    ObjectProperty,
    DataProperty,
    Extends,
    Equivalent,
    Disjoint,
    DisjointUnion,
    Union,
    Intersection,
    Complement,
    Member,
    InstanceOf,
    SameAs,
    DifferentFrom,
    Property,
    PropertyGrid,
    Key,
    All,
    Cardinality,
    Literal,
}

/// The kind of graphic a role can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Group,
    Table,
    Shape,
    Connector,
}

/// Every role with its accepted spellings besides its own name.
pub const VOCABULARY: &[(Role, &[&str])] = &[
    (Role::Ontology, &[]),
    (Role::Imports, &["uriprefix"]),
    (Role::Class, &["owlclass"]),
    (Role::Individual, &[]),
    (Role::ObjectProperty, &[]),
    (Role::DataProperty, &["datatypeproperty"]),
    (Role::Extends, &["subclassof", "subpropertyof"]),
    (Role::Equivalent, &["equivalentclasses"]),
    (Role::Disjoint, &["disjointclasses"]),
    (Role::DisjointUnion, &[]),
    (Role::Union, &["objectunion"]),
    (Role::Intersection, &["objectintersection"]),
    (Role::Complement, &["objectcomplement"]),
    (Role::Member, &["objectoneof"]),
    (Role::InstanceOf, &["type"]),
    (Role::SameAs, &["sameindividual"]),
    (Role::DifferentFrom, &["differentindividuals"]),
    (Role::Property, &["relationship"]),
    (Role::PropertyGrid, &[]),
    (Role::Key, &[]),
    (Role::All, &[]),
    (Role::Cardinality, &[]),
];

static LOOKUP: OnceLock<HashMap<String, Role>> = OnceLock::new();

fn lookup_table() -> &'static HashMap<String, Role> {
    LOOKUP.get_or_init(|| {
        let mut table = HashMap::new();
        for (role, aliases) in VOCABULARY {
            table.insert(normalize(role.name()), *role);
            for alias in *aliases {
                table.insert(normalize(alias), *role);
            }
        }
        table
    })
}

impl Role {
    /// Canonical spelling
    pub fn name(self) -> &'static str {
        match self {
            Self::Ontology => "Ontology",
            Self::Imports => "Imports",
            Self::Class => "Class",
            Self::Individual => "Individual",
            Self::ObjectProperty => "ObjectProperty",
            Self::DataProperty => "DataProperty",
            Self::Extends => "Extends",
            Self::Equivalent => "Equivalent",
            Self::Disjoint => "Disjoint",
            Self::DisjointUnion => "DisjointUnion",
            Self::Union => "Union",
            Self::Intersection => "Intersection",
            Self::Complement => "Complement",
            Self::Member => "Member",
            Self::InstanceOf => "InstanceOf",
            Self::SameAs => "SameAs",
            Self::DifferentFrom => "DifferentFrom",
            Self::Property => "Property",
            Self::PropertyGrid => "PropertyGrid",
            Self::Key => "Key",
            Self::All => "All",
            Self::Cardinality => "Cardinality",
            Self::Literal => "Literal",
        }
    }

    pub fn target(self) -> Target {
        match self {
            Self::Ontology => Target::Group,
            Self::Imports | Self::PropertyGrid => Target::Table,
            Self::Class
            | Self::Individual
            | Self::ObjectProperty
            | Self::DataProperty
            | Self::Literal => Target::Shape,
            Self::Extends
            | Self::Equivalent
            | Self::Disjoint
            | Self::DisjointUnion
            | Self::Union
            | Self::Intersection
            | Self::Complement
            | Self::Member
            | Self::InstanceOf
            | Self::SameAs
            | Self::DifferentFrom
            | Self::Property
            | Self::Key
            | Self::All
            | Self::Cardinality => Target::Connector,
        }
    }

    /// Returns false for roles that are recognized but not translated
    pub fn is_supported(self) -> bool {
        !matches!(self, Self::Key | Self::All | Self::Cardinality)
    }

    /// The entity a shape with this role declares
    pub fn entity_kind(self) -> Option<EntityKind> {
        match self {
            Self::Class => Some(EntityKind::Class),
            Self::Individual => Some(EntityKind::Individual),
            Self::ObjectProperty => Some(EntityKind::ObjectProperty),
            Self::DataProperty => Some(EntityKind::DataProperty),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Normalizes annotation text for lookup.
pub fn normalize(text: &str) -> String {
    text.trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Looks up the role named by an annotation, regardless of graphic kind.
///
/// # Examples
///
/// ```
/// # use ontograph::role::{lookup, Role};
/// assert_eq!(lookup("Object Property"), Some(Role::ObjectProperty));
/// assert_eq!(lookup("subclass-of"), Some(Role::Extends));
/// assert_eq!(lookup("xsd:int"), Some(Role::Literal));
/// assert_eq!(lookup("just a remark"), None);
/// ```
pub fn lookup(annotation: &str) -> Option<Role> {
    if literal_datatype(annotation).is_some() {
        return Some(Role::Literal);
    }
    lookup_table().get(&normalize(annotation)).copied()
}

/// Returns the local datatype name of an `xsd:` note (`"xsd:int"` gives `"int"`).
pub fn literal_datatype(annotation: &str) -> Option<&str> {
    annotation
        .trim()
        .strip_prefix(XSD_PREFIX)
        .map(str::trim)
        .filter(|name| !name.is_empty())
}

/// Returns the role of `node`, or `None` when it has no applicable role.
pub fn classify(node: Node<'_>) -> Option<Role> {
    let note = node.note()?;
    let role = lookup(note)?;
    if accepts(node, role.target()) {
        Some(role)
    } else {
        debug!(
            role = role.name(),
            graphic = node.id().value(),
            kind = node.graphic().kind_name();
            "Ignoring role on wrong kind of graphic"
        );
        None
    }
}

/// Returns true if `node` carries `role`.
pub fn has_role(node: Node<'_>, role: Role) -> bool {
    classify(node) == Some(role)
}

fn accepts(node: Node<'_>, target: Target) -> bool {
    match (target, node.graphic().kind()) {
        (Target::Group, GraphicKind::Group(_))
        | (Target::Table, GraphicKind::Table(_))
        | (Target::Shape, GraphicKind::Shape(_))
        | (Target::Connector, GraphicKind::Line(_) | GraphicKind::ConnectorShape(_)) => true,
        _ => false,
    }
}
