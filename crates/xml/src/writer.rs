//! The recursive graph write algorithm.

use std::any::Any;
use std::sync::Arc;

use dcx_contract::{AnyType, Encode, TypeHandle, View};
use tracing::{trace, warn};

use crate::classify::Classification;
use crate::error::{EncodeError, Result};
use crate::namespace::{
    COLLECTIONS_NAMESPACE, ID_LOCAL_NAME, NIL_LOCAL_NAME, NamespaceContext, NamespaceResolver, REF_LOCAL_NAME,
    SERIALIZATION_NAMESPACE, SERIALIZATION_PREFIX, TYPE_LOCAL_NAME, XMLNS_NAMESPACE, XMLNS_PREFIX, XSI_NAMESPACE,
    XSI_PREFIX, needs_annotation,
};
use crate::reference::{Identity, ReferenceTracker};
use crate::schema::{MemberSchemaCache, TypeDescriptor};
use crate::sink::XmlSink;
use crate::steps::{Cursor, Visit};
use crate::utils::{bool_to_string, format_double, format_float};

/// State of one top-level write: the sink, the namespace stack, the element
/// depth and the reference table. Prefix counters live on the call stack.
pub(crate) struct GraphWriter<'a> {
    sink: &'a mut dyn XmlSink,
    schema: &'a mut MemberSchemaCache,
    references: ReferenceTracker,
    context: NamespaceContext,
    depth: usize,
    visits: usize,
    cursor: Cursor,
}

impl<'a> GraphWriter<'a> {
    pub(crate) fn new(sink: &'a mut dyn XmlSink, schema: &'a mut MemberSchemaCache, cursor: Cursor) -> Self {
        Self {
            sink,
            schema,
            references: ReferenceTracker::new(),
            context: NamespaceContext::new(),
            depth: 0,
            visits: 0,
            cursor,
        }
    }

    /// Writes `graph` as the document element named after `root`.
    pub(crate) async fn write_root(&mut self, root: TypeHandle, name: &str, ns: &str, graph: &dyn Encode) -> Result<()> {
        self.write_field(name, root, graph, ns).await?;
        self.sink.flush()?;
        Ok(())
    }

    /// Records the upcoming node for the driver and parks until the next step.
    fn enter(&mut self, classification: Option<Classification>) {
        self.visits += 1;
        let visit = Visit {
            ordinal: self.visits,
            depth: self.depth + 1,
            classification,
        };
        trace!(ordinal = visit.ordinal, depth = visit.depth, ?classification, "visit");
        self.cursor.set(Some(visit));
    }

    async fn write_field(&mut self, name: &str, declared: TypeHandle, value: &dyn Encode, ns: &str) -> Result<()> {
        let view = value.view();
        if view.is_null() {
            self.enter(None);
            futures::pending!();
            return self.write_nil(name, ns);
        }

        let runtime = value.type_handle();
        let descriptor = self.schema.descriptor(runtime);
        self.enter(Some(descriptor.classification));
        futures::pending!();

        self.depth += 1;
        let mut prefixes = 0;
        self.sink.write_start_element(None, name, ns)?;
        self.context.open();
        if self.depth == 1 {
            self.sink
                .write_attribute_string(Some(XMLNS_PREFIX), XSI_PREFIX, XMLNS_NAMESPACE, XSI_NAMESPACE)?;
            self.context.push(XSI_NAMESPACE);
        }

        let annotate = needs_annotation(declared, runtime);
        let target = NamespaceResolver::resolve(declared, &descriptor, ns);
        match (descriptor.classification, view) {
            (Classification::Primitive, view) if Classification::Primitive.accepts(&view) => {
                if annotate {
                    self.annotate(&descriptor.name, &target, &mut prefixes)?;
                }
                self.write_scalar(&view)?;
            }
            (Classification::Enum, View::Enum(text)) => {
                if annotate {
                    self.annotate(&descriptor.name, &target, &mut prefixes)?;
                }
                self.sink.write_string(text)?;
            }
            (Classification::Sequence, View::Sequence(items)) => {
                self.declare_namespace(&target, &mut prefixes)?;
                if annotate {
                    self.annotate(&descriptor.name, &target, &mut prefixes)?;
                }
                let item_declared = descriptor.element.unwrap_or_else(TypeHandle::of::<AnyType>);
                for item in items {
                    Box::pin(self.write_field(&descriptor.item_name, item_declared, item, &target)).await?;
                }
            }
            (Classification::Dictionary, View::Dictionary(entries)) => {
                self.declare_namespace(&target, &mut prefixes)?;
                if annotate {
                    self.annotate(&descriptor.name, &target, &mut prefixes)?;
                }
                if let Some(entry) = &descriptor.entry {
                    for (key, value) in entries {
                        self.sink.write_start_element(None, &entry.name, COLLECTIONS_NAMESPACE)?;
                        Box::pin(self.write_field("Key", entry.key, key, COLLECTIONS_NAMESPACE)).await?;
                        Box::pin(self.write_field("Value", entry.value, value, COLLECTIONS_NAMESPACE)).await?;
                        self.sink.write_end_element()?;
                    }
                }
            }
            (classification, view) if classification.is_object() => {
                let instance = match view {
                    View::Object(instance) => instance,
                    view => {
                        warn!(
                            type_path = runtime.type_path(),
                            ?classification,
                            view = view.kind(),
                            "shape does not match value, writing as plain object"
                        );
                        value as &dyn Any
                    }
                };
                self.write_object(&descriptor, instance, annotate, &target, &mut prefixes).await?;
            }
            (classification, view) => {
                return Err(EncodeError::ShapeMismatch {
                    type_name: descriptor.name.clone(),
                    shape: format!("{classification:?}"),
                    view: view.kind().to_string(),
                });
            }
        }

        self.context.close();
        self.sink.write_end_element()?;
        self.depth -= 1;
        Ok(())
    }

    async fn write_object(
        &mut self,
        descriptor: &Arc<TypeDescriptor>,
        instance: &dyn Any,
        annotate: bool,
        target: &str,
        prefixes: &mut usize,
    ) -> Result<()> {
        if let Some(identity) = Identity::of(instance).filter(|_| descriptor.is_reference) {
            if let Some(token) = self.references.token_of(&identity) {
                let token = token.to_string();
                self.sink.write_attribute_string(
                    Some(SERIALIZATION_PREFIX),
                    REF_LOCAL_NAME,
                    SERIALIZATION_NAMESPACE,
                    &token,
                )?;
                return Ok(());
            }
            let token = self.references.assign(identity);
            self.sink
                .write_attribute_string(Some(SERIALIZATION_PREFIX), ID_LOCAL_NAME, SERIALIZATION_NAMESPACE, &token)?;
        }
        self.declare_namespace(target, prefixes)?;
        if annotate {
            self.annotate(&descriptor.name, target, prefixes)?;
        }
        // Inherited members may live in their base type's namespace.
        for member in &descriptor.members {
            self.declare_namespace(&member.namespace, prefixes)?;
        }
        self.write_members(descriptor, instance).await
    }

    async fn write_members(&mut self, descriptor: &Arc<TypeDescriptor>, instance: &dyn Any) -> Result<()> {
        for member in &descriptor.members {
            let value = member
                .accessor
                .read(instance)
                .ok_or_else(|| EncodeError::MemberAccess {
                    type_name: descriptor.name.clone(),
                    member: member.name.to_string(),
                })?;
            Box::pin(self.write_field(member.name, member.declared, value, &member.namespace)).await?;
        }
        Ok(())
    }

    fn write_scalar(&mut self, view: &View<'_>) -> Result<()> {
        let text = match view {
            View::Bool(value) => bool_to_string(*value).to_string(),
            View::Int(value) => value.to_string(),
            View::Long(value) => value.to_string(),
            View::Byte(value) => value.to_string(),
            View::Float(value) => format_float(*value),
            View::Double(value) => format_double(*value),
            View::Str(value) => {
                self.sink.write_string(value)?;
                return Ok(());
            }
            _ => return Ok(()),
        };
        self.sink.write_string(&text)?;
        Ok(())
    }

    fn write_nil(&mut self, name: &str, ns: &str) -> Result<()> {
        self.sink.write_start_element(None, name, ns)?;
        self.sink
            .write_attribute_string(Some(XSI_PREFIX), NIL_LOCAL_NAME, XSI_NAMESPACE, "true")?;
        self.sink.write_end_element()?;
        Ok(())
    }

    /// Binds `ns` to `d{depth}p{n}` on the current element unless it is
    /// already bound on the open-element chain.
    fn declare_namespace(&mut self, ns: &str, prefixes: &mut usize) -> Result<()> {
        if ns.is_empty() || self.context.contains(ns) || self.sink.lookup_prefix(ns).is_some() {
            return Ok(());
        }
        *prefixes += 1;
        let prefix = format!("d{}p{}", self.depth, prefixes);
        self.sink
            .write_attribute_string(Some(XMLNS_PREFIX), &prefix, XMLNS_NAMESPACE, ns)?;
        self.context.push(ns);
        Ok(())
    }

    /// Writes `i:type="{ns}:{type_name}"`, declaring `ns` first.
    fn annotate(&mut self, type_name: &str, ns: &str, prefixes: &mut usize) -> Result<()> {
        self.declare_namespace(ns, prefixes)?;
        self.sink
            .write_start_attribute(Some(XSI_PREFIX), TYPE_LOCAL_NAME, XSI_NAMESPACE)?;
        self.sink.write_qualified_name(type_name, ns)?;
        self.sink.write_end_attribute()?;
        Ok(())
    }
}
