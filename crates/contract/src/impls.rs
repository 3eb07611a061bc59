//! `Describe`/`Encode` for std types.

use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::Arc;

use crate::def::{COLLECTIONS_MODULE, Primitive, TypeDef};
use crate::handle::{AnyType, Describe, Encode, TypeHandle, View};

macro_rules! impl_primitive {
    ($($ty:ty => $primitive:ident, $view:ident;)*) => {
        $(
            impl Describe for $ty {
                fn describe() -> TypeDef {
                    TypeDef::primitive(Primitive::$primitive)
                }
            }

            impl Encode for $ty {
                fn type_handle(&self) -> TypeHandle {
                    Self::handle()
                }

                fn view(&self) -> View<'_> {
                    View::$view(*self)
                }
            }
        )*
    };
}

impl_primitive! {
    bool => Boolean, Bool;
    i32 => Int, Int;
    i64 => Long, Long;
    u8 => UnsignedByte, Byte;
    f32 => Float, Float;
    f64 => Double, Double;
}

impl Describe for String {
    fn describe() -> TypeDef {
        TypeDef::primitive(Primitive::String)
    }
}

impl Encode for String {
    fn type_handle(&self) -> TypeHandle {
        Self::handle()
    }

    fn view(&self) -> View<'_> {
        View::Str(self)
    }
}

// Same wire type as `String`.
impl Describe for &'static str {
    fn describe() -> TypeDef {
        String::describe()
    }

    fn handle() -> TypeHandle {
        String::handle()
    }
}

impl Encode for &'static str {
    fn type_handle(&self) -> TypeHandle {
        Self::handle()
    }

    fn view(&self) -> View<'_> {
        View::Str(self)
    }
}

impl<T: Describe> Describe for Vec<T> {
    fn describe() -> TypeDef {
        TypeDef::sequence("List", Some(T::handle()))
            .in_module(COLLECTIONS_MODULE)
            .with_generic_args([T::handle()])
    }
}

impl<T: Describe + Encode> Encode for Vec<T> {
    fn type_handle(&self) -> TypeHandle {
        Self::handle()
    }

    fn view(&self) -> View<'_> {
        View::Sequence(Box::new(self.iter().map(|item| item as &dyn Encode)))
    }
}

impl<K: Describe, V: Describe> Describe for BTreeMap<K, V> {
    fn describe() -> TypeDef {
        TypeDef::dictionary("Dictionary", K::handle(), V::handle())
            .in_module(COLLECTIONS_MODULE)
            .with_generic_args([K::handle(), V::handle()])
    }
}

impl<K, V> Encode for BTreeMap<K, V>
where
    K: Describe + Encode,
    V: Describe + Encode,
{
    fn type_handle(&self) -> TypeHandle {
        Self::handle()
    }

    fn view(&self) -> View<'_> {
        View::Dictionary(Box::new(
            self.iter().map(|(key, value)| (key as &dyn Encode, value as &dyn Encode)),
        ))
    }
}

impl<T: Describe> Describe for Option<T> {
    fn describe() -> TypeDef {
        T::describe()
    }

    fn handle() -> TypeHandle {
        T::handle()
    }
}

impl<T: Describe + Encode> Encode for Option<T> {
    fn type_handle(&self) -> TypeHandle {
        match self {
            Some(value) => value.type_handle(),
            None => T::handle(),
        }
    }

    fn view(&self) -> View<'_> {
        match self {
            Some(value) => value.view(),
            None => View::Null,
        }
    }
}

impl<T: Describe> Describe for OnceCell<T> {
    fn describe() -> TypeDef {
        T::describe()
    }

    fn handle() -> TypeHandle {
        T::handle()
    }
}

impl<T: Describe + Encode> Encode for OnceCell<T> {
    fn type_handle(&self) -> TypeHandle {
        match self.get() {
            Some(value) => value.type_handle(),
            None => T::handle(),
        }
    }

    fn view(&self) -> View<'_> {
        match self.get() {
            Some(value) => value.view(),
            None => View::Null,
        }
    }
}

macro_rules! impl_pointer {
    ($($pointer:ident),*) => {
        $(
            impl<T: Describe> Describe for $pointer<T> {
                fn describe() -> TypeDef {
                    T::describe()
                }

                fn handle() -> TypeHandle {
                    T::handle()
                }
            }

            impl<T: Encode + ?Sized> Encode for $pointer<T> {
                fn type_handle(&self) -> TypeHandle {
                    (**self).type_handle()
                }

                fn view(&self) -> View<'_> {
                    (**self).view()
                }
            }
        )*
    };
}

impl_pointer!(Box, Rc, Arc);

/// A boxed trait object is declared as the universal type.
impl Describe for Box<dyn Encode> {
    fn describe() -> TypeDef {
        AnyType::describe()
    }

    fn handle() -> TypeHandle {
        AnyType::handle()
    }
}
