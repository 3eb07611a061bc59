//! XML text output through quick-xml.

use std::borrow::Cow;
use std::io::Write;

use quick_xml::Writer;
use quick_xml::escape::partial_escape;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;

use super::XmlSink;
use crate::error::SinkError;
use crate::namespace::{XML_NAMESPACE, XMLNS_NAMESPACE, XMLNS_PREFIX};
use crate::utils::{find_invalid_char, is_valid_name};

/// Output options for [`XmlTextSink`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct XmlSinkConfig {
    /// Indent character and width; `None` writes everything on one line.
    pub indent: Option<(u8, usize)>,
    /// Write `<?xml version="1.0" encoding="utf-8"?>` before the root element.
    pub declaration: bool,
}

impl XmlSinkConfig {
    /// Two-space indentation with an XML declaration.
    pub fn pretty() -> Self {
        Self {
            indent: Some((b' ', 2)),
            declaration: true,
        }
    }
}

#[derive(Debug, Clone)]
struct Binding {
    prefix: String,
    ns: String,
}

/// One open element. The start tag is held back until content, a child, or
/// the end of the element arrives, so attributes can still be added.
#[derive(Debug)]
struct Scope {
    name: String,
    bindings: Vec<Binding>,
    attributes: Vec<(String, String)>,
    auto_declarations: Vec<(String, String)>,
    written: bool,
}

#[derive(Debug)]
enum AttributeTarget {
    /// `xmlns` (empty prefix) or `xmlns:prefix`.
    Declaration(String),
    Regular(String),
}

#[derive(Debug)]
struct OpenAttribute {
    target: AttributeTarget,
    value: String,
}

/// An [`XmlSink`] that writes XML text to any [`Write`] implementation.
///
/// Element prefixes come from in-scope bindings; an element in an unbound
/// namespace binds it as the default namespace. Explicit `xmlns` attributes
/// are bindings, and a binding already in scope is not repeated. Prefixed
/// attributes and qualified names in unbound namespaces get an automatic
/// `p{n}` binding. Explicit attributes are written first, automatic
/// declarations last. Childless elements are self-closed.
pub struct XmlTextSink<W: Write> {
    writer: Writer<W>,
    config: XmlSinkConfig,
    scopes: Vec<Scope>,
    attribute: Option<OpenAttribute>,
    auto_prefixes: usize,
    started: bool,
}

impl<W: Write> XmlTextSink<W> {
    pub fn new(inner: W) -> Self {
        Self::with_config(inner, XmlSinkConfig::default())
    }

    pub fn with_config(inner: W, config: XmlSinkConfig) -> Self {
        let writer = match config.indent {
            Some((ch, width)) => Writer::new_with_indent(inner, ch, width),
            None => Writer::new(inner),
        };
        Self {
            writer,
            config,
            scopes: Vec::new(),
            attribute: None,
            auto_prefixes: 0,
            started: false,
        }
    }

    pub fn get_ref(&self) -> &W {
        self.writer.get_ref()
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    /// Number of elements currently open.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    fn resolve(&self, ns: &str, allow_default: bool) -> Option<String> {
        if ns == XML_NAMESPACE {
            return Some("xml".to_string());
        }
        if ns == XMLNS_NAMESPACE {
            return Some(XMLNS_PREFIX.to_string());
        }
        let mut shadowed: Vec<&str> = Vec::new();
        for binding in self.scopes.iter().rev().flat_map(|scope| scope.bindings.iter().rev()) {
            let prefix = binding.prefix.as_str();
            if shadowed.contains(&prefix) {
                continue;
            }
            if binding.ns == ns && (allow_default || !prefix.is_empty()) {
                return Some(binding.prefix.clone());
            }
            shadowed.push(prefix);
        }
        // No default binding anywhere means the empty namespace is the default.
        if ns.is_empty() && allow_default && !shadowed.contains(&"") {
            return Some(String::new());
        }
        None
    }

    fn bound_namespace(&self, prefix: &str) -> Option<&str> {
        self.scopes
            .iter()
            .rev()
            .flat_map(|scope| scope.bindings.iter().rev())
            .find(|binding| binding.prefix == prefix)
            .map(|binding| binding.ns.as_str())
    }

    fn pending_scope(&mut self) -> Result<&mut Scope, SinkError> {
        match self.scopes.last_mut() {
            Some(scope) if !scope.written => Ok(scope),
            _ => Err(SinkError::state("attribute written outside a start tag")),
        }
    }

    fn next_auto_prefix(&mut self) -> String {
        loop {
            self.auto_prefixes += 1;
            let candidate = format!("p{}", self.auto_prefixes);
            if self.bound_namespace(&candidate).is_none() {
                return candidate;
            }
        }
    }

    /// Binds `ns` to a fresh prefix on the pending start tag.
    fn declare_automatic(&mut self, ns: &str) -> Result<String, SinkError> {
        let prefix = self.next_auto_prefix();
        let scope = self.pending_scope()?;
        scope.bindings.push(Binding {
            prefix: prefix.clone(),
            ns: ns.to_string(),
        });
        scope.auto_declarations.push((prefix.clone(), ns.to_string()));
        Ok(prefix)
    }

    /// Returns the prefix to use for a prefixed name in `ns`, binding it if needed.
    fn attribute_prefix(&mut self, prefix: Option<&str>, ns: &str) -> Result<Option<String>, SinkError> {
        if ns.is_empty() {
            return Ok(None);
        }
        match prefix {
            Some(prefix) if !prefix.is_empty() => {
                check_name(prefix)?;
                if self.bound_namespace(prefix) != Some(ns) && ns != XML_NAMESPACE {
                    let scope = self.pending_scope()?;
                    scope.bindings.push(Binding {
                        prefix: prefix.to_string(),
                        ns: ns.to_string(),
                    });
                    scope.auto_declarations.push((prefix.to_string(), ns.to_string()));
                }
                Ok(Some(prefix.to_string()))
            }
            _ => match self.resolve(ns, false) {
                Some(found) => Ok(Some(found)),
                None => self.declare_automatic(ns).map(Some),
            },
        }
    }

    fn write_declaration_once(&mut self) -> Result<(), SinkError> {
        if !self.started {
            self.started = true;
            if self.config.declaration {
                self.writer
                    .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
            }
        }
        Ok(())
    }

    /// Writes the held-back start tag of the innermost element, if any.
    fn flush_start(&mut self) -> Result<(), SinkError> {
        if self.attribute.is_some() {
            return Err(SinkError::state("attribute still open"));
        }
        if let Some(scope) = self.scopes.last_mut()
            && !scope.written
        {
            scope.written = true;
            let element = start_tag(scope);
            self.writer.write_event(Event::Start(element))?;
        }
        Ok(())
    }
}

fn check_name(name: &str) -> Result<(), SinkError> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(SinkError::InvalidName(name.to_string()))
    }
}

fn qualify(prefix: &str, local: &str) -> String {
    if prefix.is_empty() {
        local.to_string()
    } else {
        format!("{prefix}:{local}")
    }
}

fn qualify_declaration(prefix: &str) -> String {
    if prefix.is_empty() {
        XMLNS_PREFIX.to_string()
    } else {
        format!("{XMLNS_PREFIX}:{prefix}")
    }
}

fn escape_attribute(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '<', '>', '"', '\t', '\n', '\r']) {
        return Cow::Borrowed(value);
    }
    let mut escaped = String::with_capacity(value.len() + 8);
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\t' => escaped.push_str("&#x9;"),
            '\n' => escaped.push_str("&#xA;"),
            '\r' => escaped.push_str("&#xD;"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}

fn start_tag(scope: &Scope) -> BytesStart<'_> {
    let mut element = BytesStart::new(scope.name.as_str());
    let automatic = scope
        .auto_declarations
        .iter()
        .map(|(prefix, ns)| (qualify_declaration(prefix), ns.as_str()));
    let explicit = scope
        .attributes
        .iter()
        .map(|(name, value)| (name.clone(), value.as_str()));
    for (name, value) in explicit.chain(automatic) {
        let value = escape_attribute(value);
        element.push_attribute(Attribute {
            key: QName(name.as_bytes()),
            value: Cow::Borrowed(value.as_bytes()),
        });
    }
    element
}

impl<W: Write> XmlSink for XmlTextSink<W> {
    fn write_start_element(&mut self, prefix: Option<&str>, local: &str, ns: &str) -> Result<(), SinkError> {
        check_name(local)?;
        self.flush_start()?;
        self.write_declaration_once()?;

        let mut scope = Scope {
            name: String::new(),
            bindings: Vec::new(),
            attributes: Vec::new(),
            auto_declarations: Vec::new(),
            written: false,
        };
        let prefix = match prefix {
            Some(prefix) => {
                if !prefix.is_empty() {
                    check_name(prefix)?;
                }
                if self.bound_namespace(prefix).unwrap_or_default() != ns {
                    scope.bindings.push(Binding {
                        prefix: prefix.to_string(),
                        ns: ns.to_string(),
                    });
                    scope.auto_declarations.push((prefix.to_string(), ns.to_string()));
                }
                prefix.to_string()
            }
            None => match self.resolve(ns, true) {
                Some(found) => found,
                None => {
                    scope.bindings.push(Binding {
                        prefix: String::new(),
                        ns: ns.to_string(),
                    });
                    scope.auto_declarations.push((String::new(), ns.to_string()));
                    String::new()
                }
            },
        };
        scope.name = qualify(&prefix, local);
        self.scopes.push(scope);
        Ok(())
    }

    fn write_end_element(&mut self) -> Result<(), SinkError> {
        if self.attribute.is_some() {
            return Err(SinkError::state("attribute still open"));
        }
        let scope = self
            .scopes
            .pop()
            .ok_or_else(|| SinkError::state("end element without an open element"))?;
        if scope.written {
            self.writer.write_event(Event::End(BytesEnd::new(scope.name.as_str())))?;
        } else {
            self.writer.write_event(Event::Empty(start_tag(&scope)))?;
        }
        Ok(())
    }

    fn write_start_attribute(&mut self, prefix: Option<&str>, local: &str, ns: &str) -> Result<(), SinkError> {
        if self.attribute.is_some() {
            return Err(SinkError::state("attribute already open"));
        }
        self.pending_scope()?;
        check_name(local)?;

        let is_declaration = prefix == Some(XMLNS_PREFIX)
            || (prefix.is_none_or(str::is_empty) && local == XMLNS_PREFIX)
            || ns == XMLNS_NAMESPACE;
        let target = if is_declaration {
            let declared = if local == XMLNS_PREFIX { String::new() } else { local.to_string() };
            AttributeTarget::Declaration(declared)
        } else {
            let name = match self.attribute_prefix(prefix, ns)? {
                Some(prefix) => qualify(&prefix, local),
                None => local.to_string(),
            };
            AttributeTarget::Regular(name)
        };
        self.attribute = Some(OpenAttribute {
            target,
            value: String::new(),
        });
        Ok(())
    }

    fn write_end_attribute(&mut self) -> Result<(), SinkError> {
        let attribute = self
            .attribute
            .take()
            .ok_or_else(|| SinkError::state("end attribute without an open attribute"))?;
        match attribute.target {
            AttributeTarget::Declaration(prefix) => {
                if self.bound_namespace(&prefix) == Some(attribute.value.as_str()) {
                    return Ok(());
                }
                let scope = self.pending_scope()?;
                scope.attributes.push((qualify_declaration(&prefix), attribute.value.clone()));
                scope.bindings.push(Binding {
                    prefix,
                    ns: attribute.value,
                });
            }
            AttributeTarget::Regular(name) => {
                self.pending_scope()?.attributes.push((name, attribute.value));
            }
        }
        Ok(())
    }

    fn write_qualified_name(&mut self, local: &str, ns: &str) -> Result<(), SinkError> {
        check_name(local)?;
        let in_attribute = self.attribute.is_some();
        let prefix = match self.resolve(ns, true) {
            Some(prefix) => prefix,
            None if in_attribute => self.declare_automatic(ns)?,
            None => return Err(SinkError::state(format!("namespace {ns:?} is not bound"))),
        };
        let name = qualify(&prefix, local);
        match self.attribute.as_mut() {
            Some(attribute) => {
                attribute.value.push_str(&name);
                Ok(())
            }
            None => self.write_string(&name),
        }
    }

    fn write_string(&mut self, text: &str) -> Result<(), SinkError> {
        if let Some(invalid) = find_invalid_char(text) {
            return Err(SinkError::InvalidChar(invalid));
        }
        if let Some(attribute) = self.attribute.as_mut() {
            attribute.value.push_str(text);
            return Ok(());
        }
        if self.scopes.is_empty() {
            return Err(SinkError::state("text outside the root element"));
        }
        self.flush_start()?;
        if !text.is_empty() {
            let escaped = partial_escape(text);
            self.writer.write_event(Event::Text(BytesText::from_escaped(escaped)))?;
        }
        Ok(())
    }

    fn lookup_prefix(&mut self, ns: &str) -> Option<String> {
        self.resolve(ns, true)
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        self.writer.get_mut().flush()?;
        Ok(())
    }
}
