/*!
 * A small owned XML element tree on top of quick-xml events.
 *
 * Only elements become tree nodes; everything else (declaration, text,
 * comments, CDATA, processing instructions, doctype) is kept as the
 * original owned event and written back verbatim. Untouched start tags are
 * also kept as read, so serializing an unmodified tree reproduces the input
 * apart from self-closing spacing.
 */

use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::borrow::Cow;

use crate::errors::XmlError;

/// A node in the tree
#[derive(Debug, Clone)]
pub enum XmlNode {
    /// An element with its children
    Element(XmlElement),
    /// Any other event, kept as read
    Event(Event<'static>),
}

/// One element, its resolved namespace and its children
#[derive(Debug, Clone)]
pub struct XmlElement {
    start: BytesStart<'static>,
    namespace: Option<String>,
    children: Vec<XmlNode>,
    self_closing: bool,
}

/// Namespace bindings declared on one element: (prefix, uri); `None` is the default namespace
type Bindings = Vec<(Option<String>, String)>;

impl XmlElement {
    /// Create an empty element named `name` in `namespace`
    pub fn new(name: impl Into<String>, namespace: Option<String>) -> Self {
        Self {
            start: BytesStart::new(name.into()),
            namespace,
            children: Vec::new(),
            self_closing: false,
        }
    }

    /// Qualified name as written (`x:target` or `target`)
    pub fn name(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.start.name().into_inner())
    }

    /// Prefix of the qualified name, if any
    pub fn prefix(&self) -> Option<String> {
        self.start
            .name()
            .prefix()
            .map(|p| String::from_utf8_lossy(p.into_inner()).into_owned())
    }

    /// Namespace URI the element's prefix resolved to
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Whether this is `local` in `namespace`
    pub fn is(&self, namespace: &str, local: &str) -> bool {
        self.namespace.as_deref() == Some(namespace)
            && self.start.local_name().into_inner() == local.as_bytes()
    }

    /// Unescaped value of attribute `key`
    pub fn attribute(&self, key: &str) -> Result<Option<String>, XmlError> {
        for attr in self.start.attributes().with_checks(false) {
            let attr = attr?;
            if attr.key.into_inner() == key.as_bytes() {
                return Ok(Some(attr.unescape_value()?.into_owned()));
            }
        }
        Ok(None)
    }

    /// Set attribute `key`, keeping every other attribute and the original order
    pub fn set_attribute(&mut self, key: &str, value: &str) -> Result<(), XmlError> {
        let mut rebuilt = BytesStart::new(self.name().into_owned());
        let mut replaced = false;

        for attr in self.start.attributes().with_checks(false) {
            let attr = attr?;
            if attr.key.into_inner() == key.as_bytes() {
                if !replaced {
                    rebuilt.push_attribute((key, value));
                    replaced = true;
                }
            } else if attr.value.contains(&b'"') {
                // Single-quoted value with a literal `"`: the rebuilt tag uses double quotes
                let requoted = String::from_utf8_lossy(&attr.value).replace('"', "&quot;");
                rebuilt.push_attribute((attr.key.into_inner(), requoted.as_bytes()));
            } else {
                rebuilt.push_attribute(attr);
            }
        }
        if !replaced {
            rebuilt.push_attribute((key, value));
        }

        self.start = rebuilt;
        Ok(())
    }

    /// Concatenated text and CDATA content of direct children, `None` if there is none
    pub fn text(&self) -> Result<Option<String>, XmlError> {
        let mut text: Option<String> = None;
        for child in &self.children {
            let piece = match child {
                XmlNode::Event(Event::Text(t)) => t.unescape()?.into_owned(),
                XmlNode::Event(Event::CData(c)) => String::from_utf8_lossy(c).into_owned(),
                _ => continue,
            };
            text.get_or_insert_with(String::new).push_str(&piece);
        }
        Ok(text)
    }

    /// Replace the direct text content, leaving child elements in place
    pub fn set_text(&mut self, text: &str) {
        self.children
            .retain(|child| !matches!(child, XmlNode::Event(Event::Text(_) | Event::CData(_))));
        if !text.is_empty() {
            self.children
                .insert(0, XmlNode::Event(Event::Text(BytesText::from_escaped(partial_escape(text)).into_owned())));
        }
        self.self_closing = false;
    }

    /// Direct child nodes
    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    /// First direct child element that is `local` in `namespace`
    pub fn find_child(&self, namespace: &str, local: &str) -> Option<&XmlElement> {
        self.children.iter().find_map(|child| match child {
            XmlNode::Element(e) if e.is(namespace, local) => Some(e),
            _ => None,
        })
    }

    /// Mutable access to the first direct child element that is `local` in `namespace`
    pub fn find_child_mut(&mut self, namespace: &str, local: &str) -> Option<&mut XmlElement> {
        self.children.iter_mut().find_map(|child| match child {
            XmlNode::Element(e) if e.is(namespace, local) => Some(e),
            _ => None,
        })
    }

    /// Return the `local` child, creating an empty one if missing.
    ///
    /// A new child is placed right after the `after` sibling when present
    /// (reusing the whitespace that precedes that sibling), otherwise it is
    /// appended. It takes the parent's prefix and namespace.
    pub fn ensure_child(&mut self, namespace: &str, local: &str, after: &str) -> &mut XmlElement {
        let index = match self.position_of(namespace, local) {
            Some(index) => index,
            None => self.insert_child(namespace, local, after),
        };

        match &mut self.children[index] {
            XmlNode::Element(e) => e,
            XmlNode::Event(_) => unreachable!("index points at an element"),
        }
    }

    fn position_of(&self, namespace: &str, local: &str) -> Option<usize> {
        self.children
            .iter()
            .position(|child| matches!(child, XmlNode::Element(e) if e.is(namespace, local)))
    }

    fn insert_child(&mut self, namespace: &str, local: &str, after: &str) -> usize {
        let name = match self.prefix() {
            Some(prefix) => format!("{}:{}", prefix, local),
            None => local.to_string(),
        };
        let element = XmlNode::Element(XmlElement::new(name, Some(namespace.to_string())));
        self.self_closing = false;

        let Some(anchor) = self.position_of(namespace, after) else {
            self.children.push(element);
            return self.children.len() - 1;
        };

        let indent = match anchor.checked_sub(1).map(|i| &self.children[i]) {
            Some(XmlNode::Event(Event::Text(t))) if t.iter().all(u8::is_ascii_whitespace) => {
                Some(XmlNode::Event(Event::Text(t.clone())))
            }
            _ => None,
        };

        let mut index = anchor + 1;
        if let Some(indent) = indent {
            self.children.insert(index, indent);
            index += 1;
        }
        self.children.insert(index, element);
        index
    }

    fn collect<'a>(nodes: &'a [XmlNode], namespace: &str, local: &str, out: &mut Vec<&'a XmlElement>) {
        for node in nodes {
            if let XmlNode::Element(e) = node {
                if e.is(namespace, local) {
                    out.push(e);
                } else {
                    Self::collect(&e.children, namespace, local, out);
                }
            }
        }
    }

    fn collect_mut<'a>(nodes: &'a mut [XmlNode], namespace: &str, local: &str, out: &mut Vec<&'a mut XmlElement>) {
        for node in nodes {
            if let XmlNode::Element(e) = node {
                if e.is(namespace, local) {
                    out.push(e);
                } else {
                    Self::collect_mut(&mut e.children, namespace, local, out);
                }
            }
        }
    }
}

/// A parsed XML document
#[derive(Debug, Clone)]
pub struct XmlDocument {
    nodes: Vec<XmlNode>,
}

impl XmlDocument {
    /// Parse a document from text. A leading byte-order mark is ignored.
    pub fn parse(input: &str) -> Result<Self, XmlError> {
        let input = input.strip_prefix('\u{feff}').unwrap_or(input);
        let mut reader = Reader::from_str(input);

        let mut nodes: Vec<XmlNode> = Vec::new();
        let mut open: Vec<XmlElement> = Vec::new();
        let mut scopes: Vec<Bindings> = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Start(start) => {
                    scopes.push(namespace_bindings(&start)?);
                    let namespace = resolve_namespace(&start, &scopes);
                    open.push(XmlElement {
                        start: start.into_owned(),
                        namespace,
                        children: Vec::new(),
                        self_closing: false,
                    });
                }
                Event::Empty(start) => {
                    scopes.push(namespace_bindings(&start)?);
                    let namespace = resolve_namespace(&start, &scopes);
                    scopes.pop();
                    let element = XmlElement {
                        start: start.into_owned(),
                        namespace,
                        children: Vec::new(),
                        self_closing: true,
                    };
                    attach(&mut open, &mut nodes, XmlNode::Element(element));
                }
                Event::End(end) => {
                    let element = open.pop().ok_or_else(|| {
                        XmlError::Structure(format!(
                            "unexpected closing tag </{}>",
                            String::from_utf8_lossy(end.name().into_inner())
                        ))
                    })?;
                    scopes.pop();
                    attach(&mut open, &mut nodes, XmlNode::Element(element));
                }
                Event::Eof => break,
                other => attach(&mut open, &mut nodes, XmlNode::Event(other.into_owned())),
            }
        }

        if let Some(unclosed) = open.last() {
            return Err(XmlError::Structure(format!("unclosed element <{}>", unclosed.name())));
        }
        if !nodes.iter().any(|node| matches!(node, XmlNode::Element(_))) {
            return Err(XmlError::Structure("document has no root element".to_string()));
        }

        Ok(Self { nodes })
    }

    /// The document element
    pub fn root(&self) -> Option<&XmlElement> {
        self.nodes.iter().find_map(|node| match node {
            XmlNode::Element(e) => Some(e),
            XmlNode::Event(_) => None,
        })
    }

    /// Every element that is `local` in `namespace`, in document order.
    /// Matches are not searched for further matches inside them.
    pub fn descendants(&self, namespace: &str, local: &str) -> Vec<&XmlElement> {
        let mut out = Vec::new();
        XmlElement::collect(&self.nodes, namespace, local, &mut out);
        out
    }

    /// Mutable variant of [`XmlDocument::descendants`]
    pub fn descendants_mut(&mut self, namespace: &str, local: &str) -> Vec<&mut XmlElement> {
        let mut out = Vec::new();
        XmlElement::collect_mut(&mut self.nodes, namespace, local, &mut out);
        out
    }

    /// Whether the input carried its own XML declaration
    pub fn has_declaration(&self) -> bool {
        self.nodes
            .iter()
            .any(|node| matches!(node, XmlNode::Event(Event::Decl(_))))
    }

    /// Serialize to UTF-8, always starting with an XML declaration
    pub fn to_bytes(&self) -> Result<Vec<u8>, XmlError> {
        let mut writer = Writer::new(Vec::new());

        if !self.has_declaration() {
            writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
            writer.write_event(Event::Text(BytesText::new("\n")))?;
        }
        for node in &self.nodes {
            write_node(&mut writer, node)?;
        }

        Ok(writer.into_inner())
    }
}

fn attach(open: &mut [XmlElement], nodes: &mut Vec<XmlNode>, node: XmlNode) {
    match open.last_mut() {
        Some(parent) => parent.children.push(node),
        None => nodes.push(node),
    }
}

fn namespace_bindings(start: &BytesStart<'_>) -> Result<Bindings, XmlError> {
    let mut bindings = Vec::new();
    for attr in start.attributes().with_checks(false) {
        let attr = attr?;
        let key = attr.key.into_inner();
        if key == b"xmlns" {
            bindings.push((None, attr.unescape_value()?.into_owned()));
        } else if let Some(prefix) = key.strip_prefix(b"xmlns:") {
            bindings.push((
                Some(String::from_utf8_lossy(prefix).into_owned()),
                attr.unescape_value()?.into_owned(),
            ));
        }
    }
    Ok(bindings)
}

fn resolve_namespace(start: &BytesStart<'_>, scopes: &[Bindings]) -> Option<String> {
    let prefix = start
        .name()
        .prefix()
        .map(|p| String::from_utf8_lossy(p.into_inner()).into_owned());

    scopes
        .iter()
        .rev()
        .flat_map(|scope| scope.iter())
        .find(|(bound, _)| *bound == prefix)
        .map(|(_, uri)| uri.clone())
        .filter(|uri| !uri.is_empty())
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &XmlNode) -> Result<(), XmlError> {
    match node {
        XmlNode::Element(element) => {
            if element.self_closing && element.children.is_empty() {
                writer.write_event(Event::Empty(element.start.borrow()))?;
            } else {
                writer.write_event(Event::Start(element.start.borrow()))?;
                for child in &element.children {
                    write_node(writer, child)?;
                }
                writer.write_event(Event::End(element.start.to_end()))?;
            }
        }
        XmlNode::Event(event) => writer.write_event(event.borrow())?,
    }
    Ok(())
}
