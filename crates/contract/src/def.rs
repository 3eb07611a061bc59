//! Type definitions: the static description a [`Describe`](crate::Describe)
//! implementation hands to the encoder.

use std::fmt;

use crate::handle::TypeHandle;
use crate::member::{BaseDef, MemberDef};

/// Module of the built-in scalar types.
pub const SYSTEM_MODULE: &str = "System";

/// Module of the built-in generic containers and [`KeyValuePair`](crate::KeyValuePair).
pub const COLLECTIONS_MODULE: &str = "System.Collections.Generic";

/// Scalar types with a fixed XML Schema name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Boolean,
    Int,
    Long,
    UnsignedByte,
    Float,
    Double,
    String,
    /// The universal type (`object`).
    AnyType,
}

impl Primitive {
    /// The XML Schema local name used for element names and `i:type` values.
    pub fn schema_name(self) -> &'static str {
        match self {
            Primitive::Boolean => "boolean",
            Primitive::Int => "int",
            Primitive::Long => "long",
            Primitive::UnsignedByte => "unsignedByte",
            Primitive::Float => "float",
            Primitive::Double => "double",
            Primitive::String => "string",
            Primitive::AnyType => "anyType",
        }
    }
}

/// Marks an object type as a contract: only data members are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContractDef {
    /// Instances are tracked by identity and written once, then referenced.
    pub is_reference: bool,
}

/// Object-specific part of a [`TypeDef`].
#[derive(Debug, Clone, Default)]
pub struct ObjectDef {
    contract: Option<ContractDef>,
    base: Option<BaseDef>,
    members: Vec<MemberDef>,
}

impl ObjectDef {
    pub fn contract(&self) -> Option<ContractDef> {
        self.contract
    }

    pub fn base(&self) -> Option<&BaseDef> {
        self.base.as_ref()
    }

    /// Members declared at this level only, in declaration order.
    pub fn members(&self) -> &[MemberDef] {
        &self.members
    }
}

/// The structural category a type declares.
#[derive(Debug, Clone)]
pub enum Shape {
    Primitive(Primitive),
    Enum,
    /// `element` is `None` for heterogeneous sequences.
    Sequence { element: Option<TypeHandle> },
    Dictionary { key: TypeHandle, value: TypeHandle },
    Object(ObjectDef),
}

/// Static description of one type.
///
/// Built with the constructors below and refined with the consuming builder
/// methods:
///
/// ```
/// use dcx_contract::{MemberDef, TypeDef};
///
/// struct Point { x: i32, y: i32 }
///
/// let def = TypeDef::contract("Point")
///     .in_module("Geometry")
///     .member(MemberDef::data("x", |p: &Point| &p.x))
///     .member(MemberDef::data("y", |p: &Point| &p.y));
/// assert!(def.is_contract());
/// ```
#[derive(Clone)]
pub struct TypeDef {
    name: &'static str,
    module: Option<&'static str>,
    outer: Option<&'static str>,
    generic_args: Vec<TypeHandle>,
    shape: Shape,
}

impl TypeDef {
    fn with_shape(name: &'static str, shape: Shape) -> Self {
        Self {
            name,
            module: None,
            outer: None,
            generic_args: Vec::new(),
            shape,
        }
    }

    pub fn primitive(primitive: Primitive) -> Self {
        Self::with_shape(primitive.schema_name(), Shape::Primitive(primitive)).in_module(SYSTEM_MODULE)
    }

    pub fn enumeration(name: &'static str) -> Self {
        Self::with_shape(name, Shape::Enum)
    }

    pub fn sequence(name: &'static str, element: Option<TypeHandle>) -> Self {
        Self::with_shape(name, Shape::Sequence { element })
    }

    pub fn dictionary(name: &'static str, key: TypeHandle, value: TypeHandle) -> Self {
        Self::with_shape(name, Shape::Dictionary { key, value })
    }

    /// A plain object: every public, writable member is written.
    pub fn object(name: &'static str) -> Self {
        Self::with_shape(name, Shape::Object(ObjectDef::default()))
    }

    /// A contract object: only data members are written.
    pub fn contract(name: &'static str) -> Self {
        Self::with_shape(
            name,
            Shape::Object(ObjectDef {
                contract: Some(ContractDef::default()),
                ..ObjectDef::default()
            }),
        )
    }

    /// Places the type in a logical module (dot separated path).
    pub fn in_module(mut self, module: &'static str) -> Self {
        self.module = Some(module);
        self
    }

    /// Marks the type as nested inside `outer`; its wire name becomes `Outer.Name`.
    pub fn nested_in(mut self, outer: &'static str) -> Self {
        self.outer = Some(outer);
        self
    }

    pub fn with_generic_args(mut self, args: impl IntoIterator<Item = TypeHandle>) -> Self {
        self.generic_args = args.into_iter().collect();
        self
    }

    /// Opts the object into reference identity. Implies a contract.
    pub fn reference(mut self) -> Self {
        self.object_mut("reference")
            .contract
            .get_or_insert_with(ContractDef::default)
            .is_reference = true;
        self
    }

    pub fn extends(mut self, base: BaseDef) -> Self {
        self.object_mut("extends").base = Some(base);
        self
    }

    pub fn member(mut self, member: MemberDef) -> Self {
        self.object_mut("member").members.push(member);
        self
    }

    fn object_mut(&mut self, builder: &str) -> &mut ObjectDef {
        match &mut self.shape {
            Shape::Object(object) => object,
            _ => panic!("TypeDef::{builder} called on non-object type `{}`", self.name),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn module(&self) -> Option<&'static str> {
        self.module
    }

    pub fn outer(&self) -> Option<&'static str> {
        self.outer
    }

    pub fn generic_args(&self) -> &[TypeHandle] {
        &self.generic_args
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn as_object(&self) -> Option<&ObjectDef> {
        match &self.shape {
            Shape::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn is_contract(&self) -> bool {
        self.as_object().is_some_and(|object| object.contract.is_some())
    }

    pub fn is_reference(&self) -> bool {
        self.as_object()
            .and_then(|object| object.contract)
            .is_some_and(|contract| contract.is_reference)
    }
}

impl fmt::Debug for TypeDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDef")
            .field("name", &self.name)
            .field("module", &self.module)
            .field("outer", &self.outer)
            .field("generic_args", &self.generic_args)
            .field("shape", &self.shape)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Node {
        weight: i32,
    }

    #[test]
    fn test_reference_implies_contract() {
        let def = TypeDef::object("Node").reference();
        assert!(def.is_contract());
        assert!(def.is_reference());

        let plain = TypeDef::object("Node");
        assert!(!plain.is_contract());
        assert!(!plain.is_reference());
    }

    #[test]
    fn test_primitive_lives_in_system() {
        let def = TypeDef::primitive(Primitive::UnsignedByte);
        assert_eq!(def.name(), "unsignedByte");
        assert_eq!(def.module(), Some(SYSTEM_MODULE));
        assert!(def.as_object().is_none());
    }

    #[test]
    fn test_members_keep_declaration_order() {
        let def = TypeDef::contract("Node")
            .member(MemberDef::data("weight", |n: &Node| &n.weight))
            .member(MemberDef::field("alias", |n: &Node| &n.weight));
        let names: Vec<_> = def
            .as_object()
            .map(|object| object.members().iter().map(MemberDef::name).collect())
            .unwrap_or_default();
        assert_eq!(names, ["weight", "alias"]);
    }

    #[test]
    #[should_panic(expected = "non-object type")]
    fn test_member_on_sequence_panics() {
        let _ = TypeDef::sequence("List", None).member(MemberDef::field("weight", |n: &Node| &n.weight));
    }
}
