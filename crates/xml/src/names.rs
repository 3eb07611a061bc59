//! Wire names of types.

use dcx_contract::{Shape, TypeDef, TypeHandle};

/// Derives the local name written for a type, both as an element name and
/// as the value of `i:type`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeNameFormatter;

impl TypeNameFormatter {
    /// - primitives: their schema name (`int`, `boolean`, `anyType`, ...)
    /// - sequences: `ArrayOf` + element name, `ArrayOfanyType` when untyped
    /// - dictionaries: `ArrayOf` + the entry name `KeyValueOf<K><V>`
    /// - generic enums and objects: name + `Of` + argument names
    /// - nested types: `Outer.Name`
    pub fn format(def: &TypeDef) -> String {
        match def.shape() {
            Shape::Primitive(primitive) => primitive.schema_name().to_string(),
            Shape::Sequence { element } => format!("ArrayOf{}", Self::item_name(*element)),
            Shape::Dictionary { key, value } => format!("ArrayOf{}", Self::entry_name(*key, *value)),
            Shape::Enum | Shape::Object(_) => {
                let mut name = String::new();
                if let Some(outer) = def.outer() {
                    name.push_str(outer);
                    name.push('.');
                }
                name.push_str(def.name());
                if !def.generic_args().is_empty() {
                    name.push_str("Of");
                    for arg in def.generic_args() {
                        name.push_str(&Self::format_handle(*arg));
                    }
                }
                name
            }
        }
    }

    pub fn format_handle(handle: TypeHandle) -> String {
        Self::format(&handle.describe())
    }

    /// Element name of the items of a sequence.
    pub fn item_name(element: Option<TypeHandle>) -> String {
        match element {
            Some(element) => Self::format_handle(element),
            None => "anyType".to_string(),
        }
    }

    /// Name of the implicit wrapper around one dictionary entry.
    pub fn entry_name(key: TypeHandle, value: TypeHandle) -> String {
        format!(
            "KeyValueOf{}{}",
            Self::format_handle(key),
            Self::format_handle(value)
        )
    }
}
