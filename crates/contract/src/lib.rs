//! # dcx-contract
//!
//! The capability model behind the `dcx` data contract XML encoder.
//!
//! A type takes part in encoding by implementing two traits:
//!
//! - [`Describe`]: static facts, queried once per type. Shape (primitive,
//!   enum, sequence, dictionary, object), wire name, logical module, whether
//!   an object is a *contract* (only opted-in data members are written),
//!   whether it uses *reference identity*, its base type and its members.
//! - [`Encode`]: runtime facts about one value. Its runtime [`TypeHandle`]
//!   and a borrowed [`View`] of its contents.
//!
//! ```
//! use dcx_contract::{Describe, Encode, MemberDef, TypeDef, TypeHandle, View};
//!
//! struct Vector3 { x: f32, y: f32, z: f32 }
//!
//! impl Describe for Vector3 {
//!     fn describe() -> TypeDef {
//!         TypeDef::object("Vector3")
//!             .in_module("UnityEngine")
//!             .member(MemberDef::field("x", |v: &Vector3| &v.x))
//!             .member(MemberDef::field("y", |v: &Vector3| &v.y))
//!             .member(MemberDef::field("z", |v: &Vector3| &v.z))
//!     }
//! }
//!
//! impl Encode for Vector3 {
//!     fn type_handle(&self) -> TypeHandle { Self::handle() }
//!     fn view(&self) -> View<'_> { View::Object(self) }
//! }
//! ```
//!
//! Std containers, scalars and smart pointers are covered out of the box.
//! `Option<T>`, `Rc<T>`, `Arc<T>`, `Box<T>` and `OnceCell<T>` are transparent:
//! they declare the wrapped type, and `None` / an empty cell encodes as nil.
//! `Box<dyn Encode>` declares the universal type ([`AnyType`]).

mod def;
mod handle;
mod impls;
mod member;
mod pair;

pub use def::{COLLECTIONS_MODULE, ContractDef, ObjectDef, Primitive, SYSTEM_MODULE, Shape, TypeDef};
pub use handle::{AnyType, Describe, Encode, TypeHandle, View};
pub use member::{Accessor, BaseDef, MemberDef, Upcast};
pub use pair::KeyValuePair;
