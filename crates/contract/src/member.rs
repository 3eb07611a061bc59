//! Members, inheritance steps and the type-erased getters behind them.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::handle::{Describe, Encode, TypeHandle};

type ReadFn = dyn for<'a> Fn(&'a dyn Any) -> Option<&'a dyn Encode> + Send + Sync;
type UpcastFn = dyn for<'a> Fn(&'a dyn Any) -> Option<&'a dyn Any> + Send + Sync;

/// Read-only getter from an instance of the declaring type to a member value.
///
/// Returns `None` when handed an instance of the wrong type.
#[derive(Clone)]
pub struct Accessor(Arc<ReadFn>);

impl Accessor {
    pub fn new<F>(read: F) -> Self
    where
        F: for<'a> Fn(&'a dyn Any) -> Option<&'a dyn Encode> + Send + Sync + 'static,
    {
        Self(Arc::new(read))
    }

    /// Getter for a field of `T`.
    pub fn field<T, V, G>(get: G) -> Self
    where
        T: 'static,
        V: Encode,
        G: for<'a> Fn(&'a T) -> &'a V + Send + Sync + 'static,
    {
        Self::new(move |instance| instance.downcast_ref::<T>().map(|owner| get(owner) as &dyn Encode))
    }

    /// This getter applied after projecting a derived instance onto its base part.
    pub fn through(&self, upcast: &Upcast) -> Self {
        let read = self.clone();
        let upcast = upcast.clone();
        Self::new(move |instance| upcast.apply(instance).and_then(|base| read.read(base)))
    }

    pub fn read<'a>(&self, instance: &'a dyn Any) -> Option<&'a dyn Encode> {
        (self.0)(instance)
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Accessor(..)")
    }
}

/// Projection from a derived instance onto its embedded base part.
#[derive(Clone)]
pub struct Upcast(Arc<UpcastFn>);

impl Upcast {
    pub fn new<F>(project: F) -> Self
    where
        F: for<'a> Fn(&'a dyn Any) -> Option<&'a dyn Any> + Send + Sync + 'static,
    {
        Self(Arc::new(project))
    }

    pub fn field<T, B, G>(get: G) -> Self
    where
        T: 'static,
        B: 'static,
        G: for<'a> Fn(&'a T) -> &'a B + Send + Sync + 'static,
    {
        Self::new(move |instance| instance.downcast_ref::<T>().map(|derived| get(derived) as &dyn Any))
    }

    /// `self` followed by `next`, for walking more than one level up.
    pub fn then(&self, next: &Upcast) -> Self {
        let first = self.clone();
        let next = next.clone();
        Self::new(move |instance| first.apply(instance).and_then(|base| next.apply(base)))
    }

    pub fn apply<'a>(&self, instance: &'a dyn Any) -> Option<&'a dyn Any> {
        (self.0)(instance)
    }
}

impl fmt::Debug for Upcast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Upcast(..)")
    }
}

/// One inheritance step: the base type and how to reach it.
#[derive(Debug, Clone)]
pub struct BaseDef {
    ty: TypeHandle,
    upcast: Upcast,
}

impl BaseDef {
    /// `T` extends `B`; `get` returns the `B` embedded in a `T`.
    pub fn new<T, B, G>(get: G) -> Self
    where
        T: 'static,
        B: Describe,
        G: for<'a> Fn(&'a T) -> &'a B + Send + Sync + 'static,
    {
        Self {
            ty: B::handle(),
            upcast: Upcast::field(get),
        }
    }

    pub fn ty(&self) -> TypeHandle {
        self.ty
    }

    pub fn upcast(&self) -> &Upcast {
        &self.upcast
    }
}

/// A member of an object type.
///
/// Members start out public, writable and not opted in as data members.
#[derive(Debug, Clone)]
pub struct MemberDef {
    name: &'static str,
    declared: TypeHandle,
    accessor: Accessor,
    data_member: bool,
    public: bool,
    read_only: bool,
}

impl MemberDef {
    pub fn new(name: &'static str, declared: TypeHandle, accessor: Accessor) -> Self {
        Self {
            name,
            declared,
            accessor,
            data_member: false,
            public: true,
            read_only: false,
        }
    }

    /// A field of `T` declared as `V`.
    pub fn field<T, V, G>(name: &'static str, get: G) -> Self
    where
        T: 'static,
        V: Describe + Encode,
        G: for<'a> Fn(&'a T) -> &'a V + Send + Sync + 'static,
    {
        Self::new(name, V::handle(), Accessor::field(get))
    }

    /// A field of `T` opted in as a data member.
    pub fn data<T, V, G>(name: &'static str, get: G) -> Self
    where
        T: 'static,
        V: Describe + Encode,
        G: for<'a> Fn(&'a T) -> &'a V + Send + Sync + 'static,
    {
        Self::field(name, get).data_member()
    }

    pub fn data_member(mut self) -> Self {
        self.data_member = true;
        self
    }

    pub fn private(mut self) -> Self {
        self.public = false;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Overrides the declared type, e.g. to declare a concrete field as `object`.
    pub fn declared_as<D: Describe>(mut self) -> Self {
        self.declared = D::handle();
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn declared(&self) -> TypeHandle {
        self.declared
    }

    pub fn accessor(&self) -> &Accessor {
        &self.accessor
    }

    pub fn is_data_member(&self) -> bool {
        self.data_member
    }

    pub fn is_public(&self) -> bool {
        self.public
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::{AnyType, View};

    struct Base {
        id: i32,
    }

    struct Middle {
        base: Base,
    }

    struct Leaf {
        middle: Middle,
        label: String,
    }

    #[test]
    fn test_accessor_reads_field() {
        let leaf = Leaf {
            middle: Middle { base: Base { id: 4 } },
            label: "x".to_string(),
        };
        let label = Accessor::field(|leaf: &Leaf| &leaf.label);
        let value = label.read(&leaf).map(|value| value.view());
        assert!(matches!(value, Some(View::Str("x"))));

        // Wrong instance type yields nothing.
        assert!(label.read(&leaf.middle).is_none());
    }

    #[test]
    fn test_accessor_through_two_upcasts() {
        let leaf = Leaf {
            middle: Middle { base: Base { id: 9 } },
            label: String::new(),
        };
        let to_middle = Upcast::field(|leaf: &Leaf| &leaf.middle);
        let to_base = Upcast::field(|middle: &Middle| &middle.base);
        let id = Accessor::field(|base: &Base| &base.id).through(&to_middle.then(&to_base));

        assert!(matches!(id.read(&leaf).map(|value| value.view()), Some(View::Int(9))));
    }

    #[test]
    fn test_member_flags() {
        let member = MemberDef::data("label", |leaf: &Leaf| &leaf.label)
            .private()
            .read_only()
            .declared_as::<AnyType>();
        assert!(member.is_data_member());
        assert!(!member.is_public());
        assert!(member.is_read_only());
        assert!(member.declared().is_any());

        let plain = MemberDef::field("label", |leaf: &Leaf| &leaf.label);
        assert!(!plain.is_data_member());
        assert!(plain.is_public());
        assert_eq!(plain.declared(), TypeHandle::of::<String>());
    }
}
