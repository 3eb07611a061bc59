//! Sample graphs covering every encoding path: dictionaries, empty and
//! null-holding lists, boxed primitives, plain structs from another module,
//! arrays of nested contracts and a contract with every scalar kind.
//!
//! The root is a list of [`SaveValue`] entries, each pairing a fixture name
//! with a value of arbitrary type.

use std::collections::BTreeMap;
use std::ops::Mul;

use dcx_contract::{Describe, Encode, MemberDef, TypeDef, TypeHandle, View};

macro_rules! encode_object {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Encode for $ty {
                fn type_handle(&self) -> TypeHandle {
                    Self::handle()
                }

                fn view(&self) -> View<'_> {
                    View::Object(self)
                }
            }
        )*
    };
}

/// A named fixture that produces one value of any type.
pub trait KeyValue {
    const KEY: &'static str;

    fn into_value(self) -> Box<dyn Encode>;
}

/// One root list entry.
pub struct SaveValue {
    key: String,
    value: Box<dyn Encode>,
}

impl SaveValue {
    pub fn new<K: KeyValue>(entry: K) -> Self {
        Self {
            key: K::KEY.to_string(),
            value: entry.into_value(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Describe for SaveValue {
    fn describe() -> TypeDef {
        TypeDef::contract("SaveValue")
            .nested_in("AsyncSerializer")
            .member(MemberDef::data("Key", |s: &SaveValue| &s.key))
            .member(MemberDef::data("Value", |s: &SaveValue| &s.value))
    }
}

/// The full sample list, with `Container(0..=containers)` at the end.
pub fn save_values(containers: usize) -> Vec<SaveValue> {
    let mut list = vec![
        SaveValue::new(DictionaryData::new()),
        SaveValue::new(EmptyArrayOfNonContract::new()),
        SaveValue::new(ArrayOfInt::new()),
        SaveValue::new(ArrayOfNull::new()),
        SaveValue::new(BoolAsString),
        SaveValue::new(Vector),
        SaveValue::new(ContainerList::new()),
        SaveValue::new(ContainerList::with_len(1)),
    ];
    list.extend((0..=containers).map(|n| SaveValue::new(Container::new(n))));
    list
}

// =============================================================================
// Shared value types
// =============================================================================

/// Plain three-component vector from the `UnityEngine` module.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const ONE: Vector3 = Vector3::new(1.0, 1.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl Mul<f32> for Vector3 {
    type Output = Vector3;

    fn mul(self, rhs: f32) -> Vector3 {
        Vector3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Describe for Vector3 {
    fn describe() -> TypeDef {
        TypeDef::object("Vector3")
            .in_module("UnityEngine")
            .member(MemberDef::field("x", |v: &Vector3| &v.x))
            .member(MemberDef::field("y", |v: &Vector3| &v.y))
            .member(MemberDef::field("z", |v: &Vector3| &v.z))
    }
}

/// Plain object with a single public field.
pub struct NonContract {
    pub i: i32,
}

impl Describe for NonContract {
    fn describe() -> TypeDef {
        TypeDef::object("NonContract").member(MemberDef::field("i", |n: &NonContract| &n.i))
    }
}

pub struct ContractType {
    pub alpha: f64,
}

impl Describe for ContractType {
    fn describe() -> TypeDef {
        TypeDef::contract("ContractType").member(MemberDef::data("alpha", |c: &ContractType| &c.alpha))
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// `{0: true, 1: false}` inside a nested contract.
pub struct DictionaryData {
    entries: BTreeMap<i32, bool>,
}

impl DictionaryData {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::from([(0, true), (1, false)]),
        }
    }
}

impl Default for DictionaryData {
    fn default() -> Self {
        Self::new()
    }
}

impl Describe for DictionaryData {
    fn describe() -> TypeDef {
        TypeDef::contract("SaveValues")
            .nested_in("DictionaryData")
            .member(MemberDef::data("entries", |d: &DictionaryData| &d.entries))
    }
}

impl KeyValue for DictionaryData {
    const KEY: &'static str = "DictionaryData";

    fn into_value(self) -> Box<dyn Encode> {
        Box::new(self)
    }
}

/// An empty list of plain objects inside a nested contract.
pub struct EmptyArrayOfNonContract {
    contracts: Vec<NonContract>,
}

impl EmptyArrayOfNonContract {
    pub fn new() -> Self {
        Self { contracts: Vec::new() }
    }
}

impl Default for EmptyArrayOfNonContract {
    fn default() -> Self {
        Self::new()
    }
}

impl Describe for EmptyArrayOfNonContract {
    fn describe() -> TypeDef {
        TypeDef::contract("SaveValues")
            .nested_in("EmptyArrayOfNonContract")
            .member(MemberDef::data("contracts", |e: &EmptyArrayOfNonContract| &e.contracts))
    }
}

impl KeyValue for EmptyArrayOfNonContract {
    const KEY: &'static str = "EmptyArrayOfNonContract";

    fn into_value(self) -> Box<dyn Encode> {
        Box::new(self)
    }
}

/// `[1]`.
pub struct ArrayOfInt(Vec<i32>);

impl ArrayOfInt {
    pub fn new() -> Self {
        Self(vec![1])
    }
}

impl Default for ArrayOfInt {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValue for ArrayOfInt {
    const KEY: &'static str = "ArrayOfInt";

    fn into_value(self) -> Box<dyn Encode> {
        Box::new(self.0)
    }
}

/// A list holding a single null [`Vector`].
pub struct ArrayOfNull(Vec<Option<Vector>>);

impl ArrayOfNull {
    pub fn new() -> Self {
        Self(vec![None])
    }
}

impl Default for ArrayOfNull {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValue for ArrayOfNull {
    const KEY: &'static str = "ArrayOfNull";

    fn into_value(self) -> Box<dyn Encode> {
        Box::new(self.0)
    }
}

/// `false` rendered as text before encoding.
pub struct BoolAsString;

impl KeyValue for BoolAsString {
    const KEY: &'static str = "BoolAsString";

    fn into_value(self) -> Box<dyn Encode> {
        Box::new("False".to_string())
    }
}

/// A contract with no data members; its value is `Vector3(1, 2, 3)`.
pub struct Vector;

impl Describe for Vector {
    fn describe() -> TypeDef {
        TypeDef::contract("Vector")
    }
}

impl KeyValue for Vector {
    const KEY: &'static str = "Vector";

    fn into_value(self) -> Box<dyn Encode> {
        Box::new(Vector3::new(1.0, 2.0, 3.0))
    }
}

pub struct ContainerListEntry {
    alpha: f64,
    gamma: u8,
    beta: i32,
}

impl Describe for ContainerListEntry {
    fn describe() -> TypeDef {
        TypeDef::contract("SaveValues")
            .nested_in("ContainerList")
            .member(MemberDef::data("alpha", |e: &ContainerListEntry| &e.alpha))
            .member(MemberDef::data("gamma", |e: &ContainerListEntry| &e.gamma))
            .member(MemberDef::data("beta", |e: &ContainerListEntry| &e.beta))
    }
}

/// A list of `len` identical nested contracts.
pub struct ContainerList(Vec<ContainerListEntry>);

impl ContainerList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn with_len(len: u8) -> Self {
        Self(
            (0..len)
                .map(|_| ContainerListEntry {
                    alpha: f64::from(len),
                    gamma: len,
                    beta: i32::from(len),
                })
                .collect(),
        )
    }
}

impl Default for ContainerList {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValue for ContainerList {
    const KEY: &'static str = "ContainerList";

    fn into_value(self) -> Box<dyn Encode> {
        Box::new(self.0)
    }
}

/// A contract with every scalar kind, three lists of length `n`, and a null.
pub struct Container {
    secret: i32,
    vector: Vector3,
    alpha: f64,
    phi: f32,
    beta: i32,
    gamma: u8,
    condition: bool,
    list: Vec<String>,
    vectors: Vec<Vector3>,
    contracts: Vec<ContractType>,
    nil: Option<Box<dyn Encode>>,
}

impl Container {
    pub fn new(n: usize) -> Self {
        let value = n as i32;
        Self {
            secret: value,
            vector: Vector3::ONE * value as f32,
            alpha: 1.0 / f64::from(value + 1),
            phi: 1.0 / (value + 1) as f32,
            beta: value,
            gamma: value as u8,
            condition: value != 0,
            list: (0..n).map(|i| i.to_string()).collect(),
            vectors: (0..n).map(|i| Vector3::ONE * i as f32).collect(),
            contracts: (0..n).map(|i| ContractType { alpha: i as f64 }).collect(),
            nil: None,
        }
    }
}

impl Describe for Container {
    fn describe() -> TypeDef {
        TypeDef::contract("SaveValues")
            .nested_in("Container")
            .member(MemberDef::data("secret", |c: &Container| &c.secret).private())
            .member(MemberDef::data("vector", |c: &Container| &c.vector))
            .member(MemberDef::data("alpha", |c: &Container| &c.alpha))
            .member(MemberDef::data("phi", |c: &Container| &c.phi))
            .member(MemberDef::data("beta", |c: &Container| &c.beta))
            .member(MemberDef::data("gamma", |c: &Container| &c.gamma))
            .member(MemberDef::data("condition", |c: &Container| &c.condition))
            .member(MemberDef::data("list", |c: &Container| &c.list))
            .member(MemberDef::data("vectors", |c: &Container| &c.vectors))
            .member(MemberDef::data("contracts", |c: &Container| &c.contracts))
            .member(MemberDef::data("nil", |c: &Container| &c.nil))
    }
}

impl KeyValue for Container {
    const KEY: &'static str = "Container";

    fn into_value(self) -> Box<dyn Encode> {
        Box::new(self)
    }
}

encode_object!(
    SaveValue,
    Vector3,
    NonContract,
    ContractType,
    DictionaryData,
    EmptyArrayOfNonContract,
    Vector,
    ContainerListEntry,
    Container,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_list_order() {
        let keys: Vec<String> = save_values(2).iter().map(|s| s.key().to_string()).collect();
        assert_eq!(
            keys,
            [
                "DictionaryData",
                "EmptyArrayOfNonContract",
                "ArrayOfInt",
                "ArrayOfNull",
                "BoolAsString",
                "Vector",
                "ContainerList",
                "ContainerList",
                "Container",
                "Container",
                "Container",
            ]
        );
    }

    #[test]
    fn test_container_values() {
        let container = Container::new(2);
        assert_eq!(container.vector, Vector3::new(2.0, 2.0, 2.0));
        assert_eq!(container.list, ["0", "1"]);
        assert_eq!(container.vectors[1], Vector3::ONE);
        assert!((container.alpha - 1.0 / 3.0).abs() < f64::EPSILON);
        assert!(container.condition);
    }
}
