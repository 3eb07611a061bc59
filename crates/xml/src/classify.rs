//! Shape categories of runtime types.

use dcx_contract::{MemberDef, Shape, TypeDef, View};

/// How a type is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    Primitive,
    Enum,
    Dictionary,
    Sequence,
    /// Opted into schema-driven encoding; only data members are written.
    ContractObject,
    /// Every public, writable member is written.
    PlainObject,
}

impl Classification {
    /// Whether `view` carries the contents this classification expects.
    pub fn accepts(self, view: &View<'_>) -> bool {
        match self {
            Classification::Primitive => matches!(
                view,
                View::Bool(_)
                    | View::Int(_)
                    | View::Long(_)
                    | View::Byte(_)
                    | View::Float(_)
                    | View::Double(_)
                    | View::Str(_)
            ),
            Classification::Enum => matches!(view, View::Enum(_)),
            Classification::Dictionary => matches!(view, View::Dictionary(_)),
            Classification::Sequence => matches!(view, View::Sequence(_)),
            Classification::ContractObject | Classification::PlainObject => matches!(view, View::Object(_)),
        }
    }

    pub fn is_object(self) -> bool {
        matches!(self, Classification::ContractObject | Classification::PlainObject)
    }

    /// The member inclusion rule of this classification.
    pub fn includes(self, member: &MemberDef) -> bool {
        match self {
            Classification::ContractObject => member.is_data_member(),
            _ => member.is_public() && !member.is_read_only(),
        }
    }
}

/// Categorizes types by their declared shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeShapeClassifier;

impl TypeShapeClassifier {
    pub fn classify(def: &TypeDef) -> Classification {
        match def.shape() {
            Shape::Primitive(_) => Classification::Primitive,
            Shape::Enum => Classification::Enum,
            Shape::Dictionary { .. } => Classification::Dictionary,
            Shape::Sequence { .. } => Classification::Sequence,
            Shape::Object(object) if object.contract().is_some() => Classification::ContractObject,
            Shape::Object(_) => Classification::PlainObject,
        }
    }
}
