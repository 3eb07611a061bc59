use crate::def::{COLLECTIONS_MODULE, TypeDef};
use crate::handle::{Describe, Encode, TypeHandle, View};
use crate::member::MemberDef;

/// A named key/value pair, written as `KeyValuePairOf<K><V>`.
///
/// Dictionary entries do not use this type; they get the implicit
/// `KeyValueOf<K><V>` wrapper instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyValuePair<K, V> {
    pub key: K,
    pub value: V,
}

impl<K, V> KeyValuePair<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }
}

impl<K, V> Describe for KeyValuePair<K, V>
where
    K: Describe + Encode,
    V: Describe + Encode,
{
    fn describe() -> TypeDef {
        TypeDef::object("KeyValuePair")
            .in_module(COLLECTIONS_MODULE)
            .with_generic_args([K::handle(), V::handle()])
            .member(MemberDef::field("key", |pair: &Self| &pair.key))
            .member(MemberDef::field("value", |pair: &Self| &pair.value))
    }
}

impl<K, V> Encode for KeyValuePair<K, V>
where
    K: Describe + Encode,
    V: Describe + Encode,
{
    fn type_handle(&self) -> TypeHandle {
        Self::handle()
    }

    fn view(&self) -> View<'_> {
        View::Object(self)
    }
}
