//! Locate the DDI 2.5 `codeBook` inside an OAI-PMH response and read fields
//! from it.
//!
//! The whole payload must be well-formed XML. The first `ddi:codeBook`
//! element found anywhere in it is copied into a small owned tree, and field
//! paths are then walked relative to that root. Only the `ddi` prefix is
//! understood in paths; it is bound to [`DDI_NAMESPACE`].

use crate::error::LocateError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;

/// Namespace URI of DDI Codebook 2.5.
pub const DDI_NAMESPACE: &str = "ddi:codebook:2_5";

/// The only prefix resolvable in a [`FieldPath`].
pub const DDI_PREFIX: &str = "ddi";

/// Local name of the metadata root.
pub const ROOT_ELEMENT: &str = "codeBook";

/// Access Rights declaration, relative to the codeBook root.
pub const TYPE_OF_ACCESS: FieldPath =
    FieldPath(&["ddi:stdyDscr", "ddi:dataAccs", "ddi:typeOfAccess"]);

/// Child-axis path of prefixed element names, e.g. `ddi:stdyDscr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath(pub &'static [&'static str]);

/// A DDI codeBook subtree detached from its envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataDocument {
    root: Element,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Element {
    namespace: Option<String>,
    local_name: String,
    children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Element(Element),
    Text(String),
}

impl Element {
    /// Fails when the element's prefix is not declared in scope.
    fn from_start(ns: &ResolveResult<'_>, start: &BytesStart<'_>) -> Result<Self, LocateError> {
        let namespace = match ns {
            ResolveResult::Bound(Namespace(uri)) => Some(String::from_utf8_lossy(uri).into_owned()),
            ResolveResult::Unbound => None,
            ResolveResult::Unknown(prefix) => {
                return Err(LocateError::MalformedInput(format!(
                    "unbound namespace prefix '{}' on element '{}'",
                    String::from_utf8_lossy(prefix),
                    String::from_utf8_lossy(start.name().as_ref())
                )));
            }
        };
        Ok(Self {
            namespace,
            local_name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
            children: Vec::new(),
        })
    }

    fn is(&self, namespace: &str, local_name: &str) -> bool {
        self.namespace.as_deref() == Some(namespace) && self.local_name == local_name
    }

    fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// Concatenated text of every descendant, in document order.
    fn text_content(&self, out: &mut String) {
        for node in &self.children {
            match node {
                Node::Text(t) => out.push_str(t),
                Node::Element(e) => e.text_content(out),
            }
        }
    }
}

/// Parse `bytes` and detach the first DDI codeBook element.
///
/// Fails with [`LocateError::MalformedInput`] when the payload is not
/// well-formed XML, and with [`LocateError::MissingRoot`] when it parses but
/// holds no codeBook.
pub fn isolate_root(bytes: &[u8]) -> Result<MetadataDocument, LocateError> {
    let mut reader = NsReader::from_reader(bytes);
    let mut buf = Vec::new();

    let mut depth = 0usize;
    let mut top_level_elements = 0usize;
    // Open elements of the codeBook subtree being copied; empty when outside it.
    let mut capture: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        buf.clear();
        let (ns, event) = reader
            .read_resolved_event_into(&mut buf)
            .map_err(malformed)?;

        match event {
            Event::Start(ref start) | Event::Empty(ref start) => {
                if depth == 0 {
                    top_level_elements += 1;
                    if top_level_elements > 1 {
                        return Err(LocateError::MalformedInput(
                            "more than one top-level element".to_string(),
                        ));
                    }
                }

                let element = Element::from_start(&ns, start)?;
                let is_empty = matches!(event, Event::Empty(_));
                let opens_root = capture.is_empty()
                    && root.is_none()
                    && element.is(DDI_NAMESPACE, ROOT_ELEMENT);

                if opens_root || !capture.is_empty() {
                    capture.push(element);
                    if is_empty {
                        close_captured(&mut capture, &mut root);
                    }
                }

                if !is_empty {
                    depth += 1;
                }
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                if !capture.is_empty() {
                    close_captured(&mut capture, &mut root);
                }
            }
            Event::Text(ref text) => {
                let text = text.unescape().map_err(malformed)?;
                if depth == 0 {
                    if !text.trim().is_empty() {
                        return Err(LocateError::MalformedInput(
                            "text outside the document element".to_string(),
                        ));
                    }
                } else if let Some(open) = capture.last_mut() {
                    open.children.push(Node::Text(text.into_owned()));
                }
            }
            Event::CData(cdata) => {
                if depth == 0 {
                    return Err(LocateError::MalformedInput(
                        "CDATA outside the document element".to_string(),
                    ));
                }
                if let Some(open) = capture.last_mut() {
                    let text = std::str::from_utf8(&cdata).map_err(malformed)?;
                    open.children.push(Node::Text(text.to_string()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if depth != 0 {
        return Err(LocateError::MalformedInput(format!(
            "unexpected end of input with {depth} unclosed element(s)"
        )));
    }
    if top_level_elements == 0 {
        return Err(LocateError::MalformedInput("no document element".to_string()));
    }

    root.map(|root| MetadataDocument { root })
        .ok_or(LocateError::MissingRoot)
}

fn close_captured(capture: &mut Vec<Element>, root: &mut Option<Element>) {
    if let Some(done) = capture.pop() {
        match capture.last_mut() {
            Some(parent) => parent.children.push(Node::Element(done)),
            None => *root = Some(done),
        }
    }
}

fn malformed(err: impl std::fmt::Display) -> LocateError {
    LocateError::MalformedInput(err.to_string())
}

/// Trimmed text of every element reached by `path`, in document order.
///
/// No match yields an empty vector. A step with a prefix other than `ddi`
/// never matches.
pub fn extract_field(doc: &MetadataDocument, path: FieldPath) -> Vec<String> {
    let mut current: Vec<&Element> = vec![&doc.root];

    for step in path.0 {
        let Some(local_name) = resolve_step(step) else {
            return Vec::new();
        };
        current = current
            .into_iter()
            .flat_map(|e| e.child_elements())
            .filter(|e| e.is(DDI_NAMESPACE, local_name))
            .collect();
    }

    current
        .into_iter()
        .map(|e| {
            let mut text = String::new();
            e.text_content(&mut text);
            text.trim().to_string()
        })
        .collect()
}

fn resolve_step(step: &str) -> Option<&str> {
    match step.split_once(':') {
        Some((DDI_PREFIX, local)) if !local.is_empty() => Some(local),
        _ => None,
    }
}
