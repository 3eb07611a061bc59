//! Shared model types and helpers for the encoder integration tests.
#![allow(dead_code)]

use std::cell::OnceCell;
use std::rc::Rc;

use dcx_contract::{BaseDef, Describe, Encode, MemberDef, TypeDef, TypeHandle, View};
use dcx_xml::{GraphEncoder, Result, XmlTextSink};

pub const XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";
pub const ROOT: &str = "http://schemas.datacontract.org/2004/07/";
pub const ARRAYS: &str = "http://schemas.microsoft.com/2003/10/Serialization/Arrays";
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema";

/// Implements `Encode` for object types.
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

// =============================================================================
// Model types
// =============================================================================

/// Most-base level, in its own module.
pub struct Base {
    pub a: i32,
    pub shared: String,
}

pub struct Middle {
    pub base: Base,
    pub m: i32,
    pub shared: String,
}

pub struct Leaf {
    pub middle: Middle,
    pub z: i32,
    pub b: i32,
    pub shared: String,
    pub hidden: i32,
}

impl Describe for Base {
    fn describe() -> TypeDef {
        TypeDef::contract("Base")
            .in_module("Chain")
            .member(MemberDef::data("shared", |v: &Base| &v.shared))
            .member(MemberDef::data("a", |v: &Base| &v.a))
    }
}

impl Describe for Middle {
    fn describe() -> TypeDef {
        TypeDef::contract("Middle")
            .extends(BaseDef::new(|v: &Middle| &v.base))
            .member(MemberDef::data("shared", |v: &Middle| &v.shared))
            .member(MemberDef::data("m", |v: &Middle| &v.m))
    }
}

impl Describe for Leaf {
    fn describe() -> TypeDef {
        TypeDef::contract("Leaf")
            .extends(BaseDef::new(|v: &Leaf| &v.middle))
            .member(MemberDef::data("z", |v: &Leaf| &v.z))
            .member(MemberDef::data("shared", |v: &Leaf| &v.shared))
            .member(MemberDef::data("b", |v: &Leaf| &v.b))
            .member(MemberDef::field("hidden", |v: &Leaf| &v.hidden))
    }
}

pub fn leaf() -> Leaf {
    Leaf {
        middle: Middle {
            base: Base {
                a: 1,
                shared: "base".to_string(),
            },
            m: 2,
            shared: "middle".to_string(),
        },
        z: 26,
        b: 3,
        shared: "leaf".to_string(),
        hidden: 99,
    }
}

/// Reference-opted node; `next` closes cycles.
pub struct Node {
    pub label: String,
    pub next: OnceCell<Rc<Node>>,
}

impl Describe for Node {
    fn describe() -> TypeDef {
        TypeDef::contract("Node")
            .reference()
            .member(MemberDef::data("label", |n: &Node| &n.label))
            .member(MemberDef::data("next", |n: &Node| &n.next))
    }
}

impl Node {
    pub fn new(label: &str) -> Rc<Self> {
        Rc::new(Self {
            label: label.to_string(),
            next: OnceCell::new(),
        })
    }
}

/// Two nodes pointing at each other.
pub fn cycle() -> Rc<Node> {
    let a = Node::new("a");
    let b = Node::new("b");
    let _ = b.next.set(Rc::clone(&a));
    let _ = a.next.set(b);
    a
}

pub struct Sample {
    pub list: Vec<String>,
    pub gamma: u8,
    pub beta: i32,
}

impl Describe for Sample {
    fn describe() -> TypeDef {
        TypeDef::contract("Sample")
            .member(MemberDef::data("list", |s: &Sample| &s.list))
            .member(MemberDef::data("gamma", |s: &Sample| &s.gamma))
            .member(MemberDef::data("beta", |s: &Sample| &s.beta))
    }
}

pub fn sample() -> Sample {
    Sample {
        list: vec!["0".to_string(), "1".to_string()],
        gamma: 2,
        beta: 2,
    }
}

/// Plain object in a module.
pub struct Gadget {
    pub size: i32,
}

impl Describe for Gadget {
    fn describe() -> TypeDef {
        TypeDef::object("Gadget")
            .in_module("Shop")
            .member(MemberDef::field("size", |g: &Gadget| &g.size))
    }
}

/// Plain object without a module.
pub struct Plain {
    pub i: i32,
}

impl Describe for Plain {
    fn describe() -> TypeDef {
        TypeDef::object("Plain").member(MemberDef::field("i", |p: &Plain| &p.i))
    }
}

/// Holds one value of any type.
pub struct Holder {
    pub value: Box<dyn Encode>,
}

impl Describe for Holder {
    fn describe() -> TypeDef {
        TypeDef::contract("Holder").member(MemberDef::data("value", |h: &Holder| &h.value))
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Mode {
    Fast,
    Slow,
}

impl Describe for Mode {
    fn describe() -> TypeDef {
        TypeDef::enumeration("Mode").in_module("Tuning")
    }
}

impl Encode for Mode {
    fn type_handle(&self) -> TypeHandle {
        Self::handle()
    }

    fn view(&self) -> View<'_> {
        View::Enum(match self {
            Mode::Fast => "Fast",
            Mode::Slow => "Slow",
        })
    }
}

encode_object!(Base, Middle, Leaf, Node, Sample, Gadget, Plain, Holder);

// =============================================================================
// Helpers
// =============================================================================

/// Encodes `graph` as the root type `T` in one go.
pub fn encode<T: Describe + Encode>(graph: &T) -> Result<String> {
    dcx_xml::to_xml_string(graph)
}

/// Encodes `graph`, taking `per_slice` steps at a time. Returns the XML and
/// the number of steps taken.
pub fn encode_in_slices<T: Describe + Encode>(graph: &T, per_slice: usize) -> Result<(String, usize)> {
    let mut sink = XmlTextSink::new(Vec::new());
    let mut encoder = GraphEncoder::of::<T>();
    let steps = {
        let mut steps = encoder.write_object(&mut sink, graph);
        while !steps.advance(per_slice)? {}
        steps.steps_taken()
    };
    let xml = String::from_utf8(sink.into_inner()).expect("encoder writes UTF-8");
    Ok((xml, steps))
}

/// Asserts that every needle occurs in `haystack`, in the given order.
pub fn assert_in_order(haystack: &str, needles: &[&str]) {
    let mut from = 0;
    for needle in needles {
        match haystack[from..].find(needle) {
            Some(at) => from += at + needle.len(),
            None => panic!("`{needle}` not found in order in:\n{haystack}"),
        }
    }
}
