//! Feed document parsing: XML in, `(title, link)` entries out.
//!
//! A fetched document is parsed into a lightweight namespace-aware element
//! tree, then a fixed ordered list of dialect extractors runs over it:
//! Atom first, RSS 2.0 second, outputs concatenated. The dialects are not
//! mutually exclusive; a document matching neither yields an empty list,
//! which is not an error. Only well-formedness failures are errors, and
//! those stay scoped to the one feed being parsed.

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;
use thiserror::Error;

/// Namespace URI identifying Atom feed elements.
const ATOM_NS: &str = "http://www.w3.org/2005/Atom";

/// Errors that can occur while parsing a feed document.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The document is not well-formed XML.
    #[error("Malformed XML: {0}")]
    MalformedXml(String),
}

/// A normalized feed entry. Both fields are guaranteed non-blank; raw
/// entries missing either never become a `FeedEntry`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
}

/// Parses `bytes` as XML and extracts entries from every supported dialect.
///
/// Entries preserve document order within each dialect, and Atom entries
/// precede RSS entries for the same document.
///
/// # Errors
///
/// [`ParseError::MalformedXml`] when the document is not well-formed.
/// Callers treat this as a per-feed failure, never a run-level abort.
pub fn parse(bytes: &[u8]) -> Result<Vec<FeedEntry>, ParseError> {
    let root = parse_document(bytes)?;

    let mut entries = Vec::new();
    for extractor in EXTRACTORS {
        entries.extend(extractor.extract(&root));
    }
    Ok(entries)
}

// ============================================================================
// Dialect extractors
// ============================================================================

/// A dialect-specific strategy: given a parsed document, produce zero or
/// more entries. Adding a feed format means adding an impl and a slot in
/// [`EXTRACTORS`]; the pipeline never changes.
trait DialectExtractor {
    fn extract(&self, root: &XmlElement) -> Vec<FeedEntry>;
}

/// Extraction order: Atom pass before RSS pass.
const EXTRACTORS: [&dyn DialectExtractor; 2] = [&AtomExtractor, &RssExtractor];

/// Atom (`http://www.w3.org/2005/Atom`): `<entry>` children of the root,
/// title from the namespaced `<title>` child text, link from the `href`
/// attribute of the namespaced `<link>` child.
struct AtomExtractor;

impl DialectExtractor for AtomExtractor {
    fn extract(&self, root: &XmlElement) -> Vec<FeedEntry> {
        root.children_named(Some(ATOM_NS), "entry")
            .filter_map(|entry| {
                let title = entry
                    .child(Some(ATOM_NS), "title")
                    .and_then(XmlElement::non_blank_text)?;
                let link = entry
                    .child(Some(ATOM_NS), "link")
                    .and_then(|link| link.attribute("href"))
                    .map(str::trim)
                    .filter(|href| !href.is_empty())?;
                Some(FeedEntry {
                    title: title.to_string(),
                    link: link.to_string(),
                })
            })
            .collect()
    }
}

/// RSS 2.0: `<item>` elements under `channel/item`, title and link from
/// un-namespaced child element text.
struct RssExtractor;

impl DialectExtractor for RssExtractor {
    fn extract(&self, root: &XmlElement) -> Vec<FeedEntry> {
        root.children_named(None, "channel")
            .flat_map(|channel| channel.children_named(None, "item"))
            .filter_map(|item| {
                let title = item.child(None, "title").and_then(XmlElement::non_blank_text)?;
                let link = item.child(None, "link").and_then(XmlElement::non_blank_text)?;
                Some(FeedEntry {
                    title: title.to_string(),
                    link: link.to_string(),
                })
            })
            .collect()
    }
}

// ============================================================================
// Element tree
// ============================================================================

/// A parsed XML element with namespace-resolved name, attributes by local
/// name, child elements in document order, and accumulated text content.
#[derive(Debug, Default)]
struct XmlElement {
    namespace: Option<String>,
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlElement>,
    text: String,
}

impl XmlElement {
    fn is_named(&self, namespace: Option<&str>, name: &str) -> bool {
        self.namespace.as_deref() == namespace && self.name == name
    }

    fn children_named<'a>(
        &'a self,
        namespace: Option<&'a str>,
        name: &'a str,
    ) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children
            .iter()
            .filter(move |child| child.is_named(namespace, name))
    }

    /// First matching child element, if any.
    fn child(&self, namespace: Option<&str>, name: &str) -> Option<&XmlElement> {
        self.children
            .iter()
            .find(|child| child.is_named(namespace, name))
    }

    /// First matching attribute value by local name.
    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Text content, trimmed; `None` when absent or whitespace-only.
    fn non_blank_text(&self) -> Option<&str> {
        let text = self.text.trim();
        (!text.is_empty()).then_some(text)
    }
}

fn parse_document(bytes: &[u8]) -> Result<XmlElement, ParseError> {
    let mut reader = NsReader::from_reader(bytes);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_resolved_event_into(&mut buf) {
            Ok((ns, Event::Start(start))) => {
                if root.is_some() && stack.is_empty() {
                    return Err(ParseError::MalformedXml(
                        "multiple root elements".to_string(),
                    ));
                }
                stack.push(element_from_start(ns, &start)?);
            }
            Ok((ns, Event::Empty(start))) => {
                let element = element_from_start(ns, &start)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None if root.is_none() => root = Some(element),
                    None => {
                        return Err(ParseError::MalformedXml(
                            "multiple root elements".to_string(),
                        ));
                    }
                }
            }
            Ok((_, Event::End(_))) => {
                let element = stack.pop().ok_or_else(|| {
                    ParseError::MalformedXml("unexpected closing tag".to_string())
                })?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => root = Some(element),
                }
            }
            Ok((_, Event::Text(text))) => {
                let text = text
                    .unescape()
                    .map_err(|e| ParseError::MalformedXml(e.to_string()))?;
                match stack.last_mut() {
                    Some(element) => element.text.push_str(&text),
                    None => {
                        return Err(ParseError::MalformedXml(
                            "text outside of root element".to_string(),
                        ));
                    }
                }
            }
            Ok((_, Event::CData(cdata))) => {
                let data = cdata.into_inner();
                let text = utf8(&data)?;
                match stack.last_mut() {
                    Some(element) => element.text.push_str(text),
                    None => {
                        return Err(ParseError::MalformedXml(
                            "CDATA outside of root element".to_string(),
                        ));
                    }
                }
            }
            Ok((_, Event::Eof)) => {
                if !stack.is_empty() {
                    return Err(ParseError::MalformedXml(
                        "unexpected end of document".to_string(),
                    ));
                }
                break;
            }
            // Declarations, comments, processing instructions, doctypes
            Ok(_) => {}
            Err(e) => return Err(ParseError::MalformedXml(e.to_string())),
        }
        buf.clear();
    }

    root.ok_or_else(|| ParseError::MalformedXml("no root element".to_string()))
}

fn element_from_start(
    ns: ResolveResult<'_>,
    start: &BytesStart<'_>,
) -> Result<XmlElement, ParseError> {
    let namespace = match ns {
        ResolveResult::Bound(Namespace(uri)) => Some(utf8(uri)?.to_string()),
        ResolveResult::Unbound => None,
        ResolveResult::Unknown(prefix) => {
            return Err(ParseError::MalformedXml(format!(
                "undeclared namespace prefix '{}'",
                String::from_utf8_lossy(&prefix)
            )));
        }
    };
    let name = utf8(start.local_name().as_ref())?.to_string();

    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| ParseError::MalformedXml(e.to_string()))?;
        let key = utf8(attr.key.local_name().as_ref())?.to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| ParseError::MalformedXml(e.to_string()))?
            .into_owned();
        attributes.push((key, value));
    }

    Ok(XmlElement {
        namespace,
        name,
        attributes,
        children: Vec::new(),
        text: String::new(),
    })
}

fn utf8(bytes: &[u8]) -> Result<&str, ParseError> {
    std::str::from_utf8(bytes).map_err(|e| ParseError::MalformedXml(e.to_string()))
}

// ============================================================================
// Tests
// ============================================================================
