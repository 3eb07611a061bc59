//! Type identity and the two capability traits every encodable type implements.

use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::def::{Primitive, TypeDef};

/// Static facts about a type.
///
/// The encoder calls [`Describe::describe`] at most once per type per encoder
/// instance and caches the result, so implementations may allocate freely.
pub trait Describe: Sized + 'static {
    /// Builds the type's definition: shape, wire name, module and members.
    fn describe() -> TypeDef;

    /// The handle used when this type appears as a *declared* type.
    ///
    /// Transparent wrappers (`Option<T>`, `Rc<T>`, `OnceCell<T>`, ...) override
    /// this to report the wrapped type, so a member declared as `Option<i32>`
    /// is declared as `int` on the wire.
    fn handle() -> TypeHandle {
        TypeHandle::new::<Self>()
    }
}

/// Runtime facts about one value.
///
/// This trait is dyn-compatible: object graphs are walked as `&dyn Encode`.
pub trait Encode: Any {
    /// The runtime type of this value.
    fn type_handle(&self) -> TypeHandle;

    /// A borrowed view of the value's contents.
    fn view(&self) -> View<'_>;
}

/// `Copy` identity of a type plus a lazily invoked describe function.
///
/// Equality and hashing use the [`TypeId`] only.
#[derive(Clone, Copy)]
pub struct TypeHandle {
    id: TypeId,
    path: &'static str,
    describe: fn() -> TypeDef,
}

impl TypeHandle {
    /// The handle of `T` itself, ignoring any [`Describe::handle`] override.
    pub fn new<T: Describe>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            path: type_name::<T>(),
            describe: T::describe,
        }
    }

    /// The declared-type handle of `T`.
    pub fn of<T: Describe>() -> Self {
        T::handle()
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The Rust type path, for diagnostics.
    pub fn type_path(&self) -> &'static str {
        self.path
    }

    pub fn describe(&self) -> TypeDef {
        (self.describe)()
    }

    /// Whether this is the universal declared type ([`AnyType`]).
    pub fn is_any(&self) -> bool {
        self.id == TypeId::of::<AnyType>()
    }
}

impl PartialEq for TypeHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeHandle {}

impl Hash for TypeHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeHandle").field(&self.path).finish()
    }
}

/// The universal declared type: any runtime type may appear where it is declared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnyType;

impl Describe for AnyType {
    fn describe() -> TypeDef {
        TypeDef::primitive(Primitive::AnyType)
    }
}

/// Borrowed contents of a value, as reported by [`Encode::view`].
pub enum View<'a> {
    Null,
    Bool(bool),
    Int(i32),
    Long(i64),
    Byte(u8),
    Float(f32),
    Double(f64),
    Str(&'a str),
    /// The string form of an enum member.
    Enum(&'static str),
    Sequence(Box<dyn Iterator<Item = &'a dyn Encode> + 'a>),
    Dictionary(Box<dyn Iterator<Item = (&'a dyn Encode, &'a dyn Encode)> + 'a>),
    /// An object instance; members are read through the type's accessors.
    Object(&'a dyn Any),
}

impl View<'_> {
    pub fn is_null(&self) -> bool {
        matches!(self, View::Null)
    }

    /// Short name of the variant, used in log messages.
    pub fn kind(&self) -> &'static str {
        match self {
            View::Null => "null",
            View::Bool(_) => "bool",
            View::Int(_) => "int",
            View::Long(_) => "long",
            View::Byte(_) => "byte",
            View::Float(_) => "float",
            View::Double(_) => "double",
            View::Str(_) => "string",
            View::Enum(_) => "enum",
            View::Sequence(_) => "sequence",
            View::Dictionary(_) => "dictionary",
            View::Object(_) => "object",
        }
    }
}

impl fmt::Debug for View<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Bool(value) => f.debug_tuple("Bool").field(value).finish(),
            View::Int(value) => f.debug_tuple("Int").field(value).finish(),
            View::Long(value) => f.debug_tuple("Long").field(value).finish(),
            View::Byte(value) => f.debug_tuple("Byte").field(value).finish(),
            View::Float(value) => f.debug_tuple("Float").field(value).finish(),
            View::Double(value) => f.debug_tuple("Double").field(value).finish(),
            View::Str(value) => f.debug_tuple("Str").field(value).finish(),
            View::Enum(value) => f.debug_tuple("Enum").field(value).finish(),
            other => f.write_str(other.kind()),
        }
    }
}
