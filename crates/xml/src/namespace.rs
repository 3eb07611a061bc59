//! Namespace constants, type namespace rules and the declared-namespace stack.

use dcx_contract::{Shape, TypeDef, TypeHandle};

use crate::classify::Classification;
use crate::schema::TypeDescriptor;

/// Root contract namespace; a type's module is appended to it.
pub const ROOT_NAMESPACE: &str = "http://schemas.datacontract.org/2004/07/";

/// Namespace of sequences and dictionaries over built-in element types.
pub const COLLECTIONS_NAMESPACE: &str = "http://schemas.microsoft.com/2003/10/Serialization/Arrays";

/// Namespace of the `Id`/`Ref` reference attributes.
pub const SERIALIZATION_NAMESPACE: &str = "http://schemas.microsoft.com/2003/10/Serialization/";

pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// XML Schema namespace, used for primitive type annotations.
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

pub const XMLNS_NAMESPACE: &str = "http://www.w3.org/2000/xmlns/";

pub const XSI_PREFIX: &str = "i";
pub const SERIALIZATION_PREFIX: &str = "z";
pub const XMLNS_PREFIX: &str = "xmlns";

pub const TYPE_LOCAL_NAME: &str = "type";
pub const NIL_LOCAL_NAME: &str = "nil";
pub const ID_LOCAL_NAME: &str = "Id";
pub const REF_LOCAL_NAME: &str = "Ref";

/// Whether `module` is the built-in scope (`System` or `System.*`).
pub fn is_builtin_module(module: &str) -> bool {
    module == "System" || module.starts_with("System.")
}

/// Computes the XML namespace of types and positions.
#[derive(Debug, Clone, Copy, Default)]
pub struct NamespaceResolver;

impl NamespaceResolver {
    /// The namespace a type lives in.
    ///
    /// Primitives live in the XML Schema namespace and dictionaries in the
    /// collections namespace. A sequence uses the collections namespace when
    /// its element type is unknown or built in, otherwise the element's module
    /// namespace. Enums and objects use their module namespace.
    pub fn type_namespace(def: &TypeDef) -> String {
        match def.shape() {
            Shape::Primitive(_) => XSD_NAMESPACE.to_string(),
            Shape::Dictionary { .. } => COLLECTIONS_NAMESPACE.to_string(),
            Shape::Sequence { element } => Self::sequence_namespace(*element),
            Shape::Enum | Shape::Object(_) => Self::module_namespace(def.module()),
        }
    }

    fn sequence_namespace(element: Option<TypeHandle>) -> String {
        match element.map(|element| element.describe().module()) {
            None => COLLECTIONS_NAMESPACE.to_string(),
            Some(Some(module)) if is_builtin_module(module) => COLLECTIONS_NAMESPACE.to_string(),
            Some(module) => Self::module_namespace(module),
        }
    }

    /// Root namespace plus module, or the root namespace alone.
    pub fn module_namespace(module: Option<&str>) -> String {
        match module {
            Some(module) => format!("{ROOT_NAMESPACE}{module}"),
            None => ROOT_NAMESPACE.to_string(),
        }
    }

    /// The namespace to use for an instance written at a position whose
    /// declared type is `declared` and whose enclosing namespace is `current`.
    ///
    /// A primitive only leaves `current` for the XML Schema namespace when the
    /// position needs a type annotation.
    pub fn resolve(declared: TypeHandle, instance: &TypeDescriptor, current: &str) -> String {
        match instance.classification {
            Classification::Primitive if !needs_annotation(declared, instance.handle) => current.to_string(),
            _ => instance.namespace.clone(),
        }
    }
}

/// Whether a value of runtime type `runtime` at a position declared as
/// `declared` must carry an `i:type` annotation.
pub fn needs_annotation(declared: TypeHandle, runtime: TypeHandle) -> bool {
    declared.is_any() || declared != runtime
}

/// Namespaces bound to a prefix by the encoder on the open-element chain.
///
/// Each open element records a mark; closing it drops everything bound
/// since. A namespace in the stack is never declared again below it.
#[derive(Debug, Default)]
pub struct NamespaceContext {
    bound: Vec<String>,
    marks: Vec<usize>,
}

impl NamespaceContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self) {
        self.marks.push(self.bound.len());
    }

    pub fn close(&mut self) {
        if let Some(mark) = self.marks.pop() {
            self.bound.truncate(mark);
        }
    }

    pub fn push(&mut self, ns: &str) {
        self.bound.push(ns.to_string());
    }

    pub fn contains(&self, ns: &str) -> bool {
        self.bound.iter().any(|bound| bound == ns)
    }

    /// Number of open elements.
    pub fn depth(&self) -> usize {
        self.marks.len()
    }

    pub fn clear(&mut self) {
        self.bound.clear();
        self.marks.clear();
    }
}
