//! DOM boundary: element snapshots, ancestry chains and step capture
//!
//! The editor never touches a live DOM. Hosts hand it [`ElementRef`]s that
//! implement [`ElementNode`], a read-only view of one node. Browser hosts wrap
//! real elements; headless hosts and tests use [`SnapshotElement`].

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::model::ActionStep;

/// Read-only view of a DOM element.
pub trait ElementNode: Debug + Send + Sync {
    /// Tag name as reported by the DOM (any case)
    fn tag_name(&self) -> String;

    fn attribute(&self, name: &str) -> Option<String>;

    /// All attributes in document order. Names may repeat.
    fn attributes(&self) -> Vec<(String, String)>;

    /// Rendered text content
    fn inner_text(&self) -> String;

    fn parent(&self) -> Option<ElementRef>;

    /// True for `document.documentElement`
    fn is_document_root(&self) -> bool;
}

/// Shared handle to a host element.
pub type ElementRef = Arc<dyn ElementNode>;

/// Snapshot of one element in an ancestry chain.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementDescriptor {
    pub tag_name: String,
    pub attr_id: Option<String>,
    pub attr_class: Option<Vec<String>>,
    pub attributes: BTreeMap<String, String>,
    pub href: Option<String>,
    /// Only set on the first element of a chain
    pub text: Option<String>,
}

impl ElementDescriptor {
    fn capture(element: &dyn ElementNode, with_text: bool) -> Self {
        let mut attributes: BTreeMap<String, String> = BTreeMap::new();
        for (name, value) in element.attributes() {
            attributes
                .entry(name)
                .and_modify(|existing| {
                    existing.push(' ');
                    existing.push_str(&value);
                })
                .or_insert(value);
        }

        Self {
            tag_name: element.tag_name().to_lowercase(),
            attr_id: element.attribute("id").filter(|id| !id.is_empty()),
            attr_class: element
                .attribute("class")
                .map(|class| class.split_whitespace().map(String::from).collect()),
            attributes,
            href: element.attribute("href").filter(|href| !href.is_empty()),
            text: with_text.then(|| element.inner_text()),
        }
    }
}

/// Walk from `element` up to, but excluding, the document root.
pub fn to_elements_chain(element: &ElementRef) -> Vec<ElementDescriptor> {
    let mut chain = Vec::new();
    let mut current = Some(Arc::clone(element));
    while let Some(node) = current {
        if node.is_document_root() {
            break;
        }
        chain.push(ElementDescriptor::capture(node.as_ref(), chain.is_empty()));
        current = node.parent();
    }
    chain
}

/// Turns an inspected element into a step.
pub trait StepCapture: Send + Sync {
    fn element_to_step(&self, element: &dyn ElementNode, data_attributes: &[String])
        -> ActionStep;
}

/// Event name autocapture records clicks under
pub const AUTOCAPTURE_EVENT: &str = "$autocapture";

/// Default capture: one selector per element, no DOM-wide uniqueness search.
///
/// The selector is the first allow-listed data attribute found on the
/// element, else its id, else tag name plus classes.
#[derive(Clone, Debug, Default)]
pub struct SelectorStepCapture {
    page_url: Option<String>,
}

impl SelectorStepCapture {
    pub fn new(page_url: impl Into<String>) -> Self {
        Self {
            page_url: Some(page_url.into()),
        }
    }

    fn selector_for(element: &dyn ElementNode, data_attributes: &[String]) -> Option<String> {
        let attributes = element.attributes();
        for pattern in data_attributes {
            let found = attributes
                .iter()
                .find(|(name, _)| attribute_matches(pattern, name));
            if let Some((name, value)) = found {
                return Some(format!("[{}=\"{}\"]", name, value.replace('"', "\\\"")));
            }
        }

        if let Some(id) = element.attribute("id").filter(|id| is_plain_ident(id)) {
            return Some(format!("#{id}"));
        }

        let tag = element.tag_name().to_lowercase();
        if tag.is_empty() {
            return None;
        }
        let classes: String = element
            .attribute("class")
            .unwrap_or_default()
            .split_whitespace()
            .filter(|c| is_plain_ident(c))
            .map(|c| format!(".{c}"))
            .collect();
        Some(format!("{tag}{classes}"))
    }
}

impl StepCapture for SelectorStepCapture {
    fn element_to_step(
        &self,
        element: &dyn ElementNode,
        data_attributes: &[String],
    ) -> ActionStep {
        let text = element
            .inner_text()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");

        ActionStep {
            event: Some(AUTOCAPTURE_EVENT.to_string()),
            selector: Some(Self::selector_for(element, data_attributes).unwrap_or_default()),
            text: Some(text),
            href: Some(element.attribute("href").unwrap_or_default()),
            url: self.page_url.clone(),
            ..ActionStep::default()
        }
    }
}

/// `data-attr` matches exactly, `data-*` matches by prefix.
fn attribute_matches(pattern: &str, name: &str) -> bool {
    match pattern.strip_suffix('*') {
        Some(prefix) => name.starts_with(prefix),
        None => name == pattern,
    }
}

fn is_plain_ident(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '-')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Detached element tree, for headless hosts and tests.
///
/// Deserializes from `{ "tag_name": "button", "attributes": [["class", "btn"]],
/// "text": "Go", "parent": { ... } }`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotElement {
    pub tag_name: String,
    #[serde(default)]
    pub attributes: Vec<(String, String)>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub parent: Option<Arc<SnapshotElement>>,
    #[serde(default)]
    pub document_root: bool,
}

impl SnapshotElement {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            ..Self::default()
        }
    }

    /// The `<html>` element terminating every chain
    pub fn document_root() -> Self {
        Self {
            tag_name: "HTML".to_string(),
            document_root: true,
            ..Self::default()
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_parent(mut self, parent: SnapshotElement) -> Self {
        self.parent = Some(Arc::new(parent));
        self
    }

    pub fn into_ref(self) -> ElementRef {
        Arc::new(self)
    }
}

impl ElementNode for SnapshotElement {
    fn tag_name(&self) -> String {
        self.tag_name.clone()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }

    fn attributes(&self) -> Vec<(String, String)> {
        self.attributes.clone()
    }

    fn inner_text(&self) -> String {
        self.text.clone()
    }

    fn parent(&self) -> Option<ElementRef> {
        self.parent
            .as_ref()
            .map(|parent| Arc::clone(parent) as ElementRef)
    }

    fn is_document_root(&self) -> bool {
        self.document_root
    }
}
