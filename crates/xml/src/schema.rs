//! Per-type descriptors and the cache that owns them.

use std::collections::HashMap;
use std::sync::Arc;

use dcx_contract::{Accessor, Shape, TypeDef, TypeHandle, Upcast};
use tracing::{debug, warn};

use crate::classify::{Classification, TypeShapeClassifier};
use crate::names::TypeNameFormatter;
use crate::namespace::NamespaceResolver;

/// One serializable member of an object type.
#[derive(Debug, Clone)]
pub struct MemberDescriptor {
    pub name: &'static str,
    pub declared: TypeHandle,
    /// Namespace of the inheritance level that contributes the member.
    pub namespace: String,
    /// Reads the member from an instance of the most-derived type.
    pub accessor: Accessor,
}

/// Key and value types of a dictionary plus its entry wrapper name.
#[derive(Debug, Clone)]
pub struct EntryDescriptor {
    pub key: TypeHandle,
    pub value: TypeHandle,
    pub name: String,
}

/// Facts about one runtime type, derived once from its [`TypeDef`].
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    pub handle: TypeHandle,
    /// Wire name, also the `i:type` value.
    pub name: String,
    pub classification: Classification,
    pub namespace: String,
    /// Sequence element type; `None` for untyped sequences and non-sequences.
    pub element: Option<TypeHandle>,
    /// Element name of sequence items.
    pub item_name: String,
    pub entry: Option<EntryDescriptor>,
    pub is_reference: bool,
    /// Ordered members of object types: levels base first, names ordinal within a level.
    pub members: Vec<MemberDescriptor>,
}

impl TypeDescriptor {
    pub fn build(handle: TypeHandle) -> Self {
        let def = handle.describe();
        let classification = TypeShapeClassifier::classify(&def);
        let (element, entry) = match def.shape() {
            Shape::Sequence { element } => (*element, None),
            Shape::Dictionary { key, value } => (
                None,
                Some(EntryDescriptor {
                    key: *key,
                    value: *value,
                    name: TypeNameFormatter::entry_name(*key, *value),
                }),
            ),
            _ => (None, None),
        };
        let members = if classification.is_object() {
            collect_members(handle, &def, classification)
        } else {
            Vec::new()
        };
        Self {
            handle,
            name: TypeNameFormatter::format(&def),
            classification,
            namespace: NamespaceResolver::type_namespace(&def),
            element,
            item_name: TypeNameFormatter::item_name(element),
            entry,
            is_reference: def.is_reference(),
            members,
        }
    }
}

/// Walks the inheritance chain of `def` and returns its ordered members.
///
/// A name contributed by a more-base level keeps that level's position and
/// takes the most-derived level's descriptor.
fn collect_members(handle: TypeHandle, def: &TypeDef, classification: Classification) -> Vec<MemberDescriptor> {
    let mut levels: Vec<(TypeDef, Option<Upcast>)> = vec![(def.clone(), None)];
    let mut visited = vec![handle];
    loop {
        let Some((level, upcast)) = levels.last() else {
            break;
        };
        let Some(base) = level.as_object().and_then(|object| object.base()).cloned() else {
            break;
        };
        if visited.contains(&base.ty()) {
            warn!(type_path = handle.type_path(), base = base.ty().type_path(), "inheritance cycle, ignoring base");
            break;
        }
        visited.push(base.ty());
        let upcast = match upcast {
            Some(upcast) => upcast.then(base.upcast()),
            None => base.upcast().clone(),
        };
        levels.push((base.ty().describe(), Some(upcast)));
    }

    let mut ordered: Vec<MemberDescriptor> = Vec::new();
    for (level, upcast) in levels.iter().rev() {
        let Some(object) = level.as_object() else {
            continue;
        };
        let namespace = NamespaceResolver::type_namespace(level);
        let mut own: Vec<_> = object
            .members()
            .iter()
            .filter(|member| classification.includes(member))
            .collect();
        own.sort_by(|a, b| a.name().cmp(b.name()));

        for member in own {
            let accessor = match upcast {
                Some(upcast) => member.accessor().through(upcast),
                None => member.accessor().clone(),
            };
            let descriptor = MemberDescriptor {
                name: member.name(),
                declared: member.declared(),
                namespace: namespace.clone(),
                accessor,
            };
            match ordered.iter_mut().find(|existing| existing.name == descriptor.name) {
                Some(existing) => *existing = descriptor,
                None => ordered.push(descriptor),
            }
        }
    }
    ordered
}

/// Lazily built [`TypeDescriptor`]s, one per runtime type, kept for the
/// lifetime of the cache.
#[derive(Debug, Default)]
pub struct MemberSchemaCache {
    descriptors: HashMap<TypeHandle, Arc<TypeDescriptor>>,
}

impl MemberSchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn descriptor(&mut self, handle: TypeHandle) -> Arc<TypeDescriptor> {
        if let Some(descriptor) = self.descriptors.get(&handle) {
            return Arc::clone(descriptor);
        }
        let descriptor = Arc::new(TypeDescriptor::build(handle));
        debug!(
            type_path = handle.type_path(),
            name = %descriptor.name,
            classification = ?descriptor.classification,
            members = descriptor.members.len(),
            "cached type descriptor"
        );
        self.descriptors.insert(handle, Arc::clone(&descriptor));
        descriptor
    }

    /// Ordered members of `handle`; empty for non-object types.
    pub fn members(&mut self, handle: TypeHandle) -> Vec<MemberDescriptor> {
        self.descriptor(handle).members.clone()
    }

    pub fn contains(&self, handle: TypeHandle) -> bool {
        self.descriptors.contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn clear(&mut self) {
        self.descriptors.clear();
    }
}
