//! Shared-node AST consumed by the generation engine.
//!
//! The graph is produced by an external schema parser. Nodes are reference
//! counted and may be shared between parents or form cycles; collections that
//! a parser fills after allocation (interface properties and supertypes,
//! union and intersection members) sit behind `RefCell` so knots can be tied
//! through an `AstRef`. The engine itself only takes shared borrows.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde_json::Value as JsonValue;

/// Shared handle to an AST node.
pub type AstRef = Rc<AstNode>;

/// Pointer identity of a node, used to deduplicate shared and cyclic nodes.
///
/// Two handles compare equal here only when they point at the same allocation;
/// structurally identical but distinct nodes keep distinct identities.
pub fn node_id(node: &AstRef) -> usize {
    Rc::as_ptr(node) as usize
}

/// Single node of the schema-derived type graph.
#[derive(Clone)]
pub struct AstNode {
    standalone_name: Option<String>,
    key_name: Option<String>,
    comment: Option<String>,
    kind: AstKind,
}

impl AstNode {
    /// Creates an anonymous node.
    pub fn new(kind: AstKind) -> Self {
        Self {
            standalone_name: None,
            key_name: None,
            comment: None,
            kind,
        }
    }

    /// Creates a node that warrants its own top-level declaration.
    ///
    /// An empty name is normalized to anonymous.
    pub fn named(name: impl Into<String>, kind: AstKind) -> Self {
        let name = name.into();
        Self {
            standalone_name: (!name.is_empty()).then_some(name),
            key_name: None,
            comment: None,
            kind,
        }
    }

    /// Sets the property key under which this node sits in its parent.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key_name = Some(key.into());
        self
    }

    /// Attaches a comment emitted as a doc block above declarations.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Wraps the node in a shared handle.
    pub fn into_ref(self) -> AstRef {
        Rc::new(self)
    }

    /// Name under which this node is declared, if any.
    pub fn standalone_name(&self) -> Option<&str> {
        self.standalone_name.as_deref()
    }

    /// Property key under which this node sits, if any.
    pub fn key_name(&self) -> Option<&str> {
        self.key_name.as_deref()
    }

    /// Attached comment, if any.
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Structural kind of this node.
    pub fn kind(&self) -> &AstKind {
        &self.kind
    }

    /// Appends a property to an interface node.
    ///
    /// Panics when called on any other kind; graph construction bugs should
    /// surface at the build site, not during traversal.
    pub fn push_property(&self, property: Property) {
        let AstKind::Interface { properties, .. } = &self.kind else {
            panic!("push_property on non-interface node");
        };
        properties.borrow_mut().push(property);
    }

    /// Appends a supertype to an interface node. Panics on any other kind.
    pub fn push_super_type(&self, super_type: AstRef) {
        let AstKind::Interface { super_types, .. } = &self.kind else {
            panic!("push_super_type on non-interface node");
        };
        super_types.borrow_mut().push(super_type);
    }

    /// Appends a member to a union or intersection node. Panics otherwise.
    pub fn push_member(&self, member: AstRef) {
        match &self.kind {
            AstKind::Union { members } | AstKind::Intersection { members } => {
                members.borrow_mut().push(member);
            }
            _ => panic!("push_member on non-union, non-intersection node"),
        }
    }
}

impl fmt::Debug for AstNode {
    // Shallow on purpose: the graph may be cyclic.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AstNode")
            .field("standalone_name", &self.standalone_name)
            .field("key_name", &self.key_name)
            .field("kind", &self.kind.name())
            .finish_non_exhaustive()
    }
}

/// Structural kind of an AST node.
#[derive(Debug, Clone)]
pub enum AstKind {
    Any,
    Boolean,
    Null,
    Number,
    Object,
    String,
    /// Exact JSON value type (string literal, number literal, ...).
    Literal(JsonValue),
    /// Verbatim reference to a type declared outside the generated module.
    Reference(String),
    Array {
        element: AstRef,
    },
    Tuple {
        elements: Vec<AstRef>,
    },
    Union {
        members: RefCell<Vec<AstRef>>,
    },
    Intersection {
        members: RefCell<Vec<AstRef>>,
    },
    /// Record type with named properties and optional supertypes.
    Interface {
        properties: RefCell<Vec<Property>>,
        super_types: RefCell<Vec<AstRef>>,
    },
    Enum {
        members: Vec<EnumMember>,
    },
}

impl AstKind {
    /// Builds an interface kind from plain collections.
    pub fn interface(properties: Vec<Property>, super_types: Vec<AstRef>) -> Self {
        AstKind::Interface {
            properties: RefCell::new(properties),
            super_types: RefCell::new(super_types),
        }
    }

    /// Builds a union kind from plain members.
    pub fn union(members: Vec<AstRef>) -> Self {
        AstKind::Union {
            members: RefCell::new(members),
        }
    }

    /// Builds an intersection kind from plain members.
    pub fn intersection(members: Vec<AstRef>) -> Self {
        AstKind::Intersection {
            members: RefCell::new(members),
        }
    }

    /// Variant name for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            AstKind::Any => "Any",
            AstKind::Boolean => "Boolean",
            AstKind::Null => "Null",
            AstKind::Number => "Number",
            AstKind::Object => "Object",
            AstKind::String => "String",
            AstKind::Literal(_) => "Literal",
            AstKind::Reference(_) => "Reference",
            AstKind::Array { .. } => "Array",
            AstKind::Tuple { .. } => "Tuple",
            AstKind::Union { .. } => "Union",
            AstKind::Intersection { .. } => "Intersection",
            AstKind::Interface { .. } => "Interface",
            AstKind::Enum { .. } => "Enum",
        }
    }
}

/// Named property of an interface node.
#[derive(Debug, Clone)]
pub struct Property {
    /// Key under which the property appears, verbatim from the schema.
    pub key_name: String,
    /// Whether the property is required on instances.
    pub required: bool,
    /// Whether the key is a pattern (regex) rather than a literal name.
    pub pattern_property: bool,
    /// Whether the property was synthesized from a definition unreachable
    /// from the schema root. Skipped by rendering and factory resolution.
    pub unreachable_definition: bool,
    /// Type of the property value.
    pub value_type: AstRef,
}

impl Property {
    /// Creates a required, plainly keyed property.
    pub fn new(key_name: impl Into<String>, value_type: AstRef) -> Self {
        Self {
            key_name: key_name.into(),
            required: true,
            pattern_property: false,
            unreachable_definition: false,
            value_type,
        }
    }

    /// Marks the property optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Marks the key as a pattern rather than a literal name.
    pub fn pattern(mut self) -> Self {
        self.pattern_property = true;
        self
    }

    /// Marks the property as an unreachable standalone definition.
    pub fn unreachable(mut self) -> Self {
        self.unreachable_definition = true;
        self
    }
}

/// Single member of an enum node. The value must be a `Literal` node.
#[derive(Debug, Clone)]
pub struct EnumMember {
    /// Display key emitted on the left-hand side of the member.
    pub key_name: String,
    /// Literal value node emitted on the right-hand side.
    pub value: AstRef,
}
