//! A small arena DOM holding just enough state for form work: element tree,
//! attributes, control values, checked state, and a log of dispatched events.

use std::collections::HashMap;

/// Tags that can carry a user-editable value.
pub const INPUT_CAPABLE_TAGS: &[&str] = &["input", "textarea", "select"];

/// Handle to a node inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
enum NodeKind {
    Document,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    value: String,
    checked: bool,
}

impl Element {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Input,
    Change,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Input => "input",
            EventKind::Change => "change",
        }
    }
}

/// A synthetic event recorded by [`Document::dispatch_event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchedEvent {
    pub target: NodeId,
    pub kind: EventKind,
    pub bubbles: bool,
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    id_index: HashMap<String, Vec<NodeId>>,
    events: Vec<DispatchedEvent>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document containing only the root node.
    pub fn new() -> Self {
        let root = Node {
            parent: None,
            children: Vec::new(),
            kind: NodeKind::Document,
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
            id_index: HashMap::new(),
            events: Vec::new(),
        }
    }

    /// Parse HTML text into a document. Malformed markup is recovered from,
    /// never rejected.
    pub fn parse(html: &str) -> Self {
        crate::html::parse(html)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Append a new element under `parent`. Tag and attribute names are
    /// lowercased; control state is initialised from the attributes the way
    /// a browser does on load.
    pub fn create_element<K, V>(
        &mut self,
        parent: NodeId,
        tag: &str,
        attrs: impl IntoIterator<Item = (K, V)>,
    ) -> NodeId
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut collected: Vec<(String, String)> = Vec::new();
        for (key, value) in attrs {
            let key = key.into().to_ascii_lowercase();
            // First occurrence wins, as in HTML tokenization.
            if !collected.iter().any(|(existing, _)| *existing == key) {
                collected.push((key, value.into()));
            }
        }

        let element = Element {
            tag: tag.to_ascii_lowercase(),
            value: collected
                .iter()
                .find(|(key, _)| key == "value")
                .map(|(_, value)| value.clone())
                .unwrap_or_default(),
            checked: collected.iter().any(|(key, _)| key == "checked"),
            attrs: collected,
        };

        let id = self.create_node(Some(parent), NodeKind::Element(element));
        if let Some(dom_id) = self.attr(id, "id").map(str::to_owned) {
            if !dom_id.is_empty() {
                self.id_index.entry(dom_id).or_default().push(id);
            }
        }
        id
    }

    /// Append a text node under `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.create_node(Some(parent), NodeKind::Text(text.to_string()))
    }

    fn create_node(&mut self, parent: Option<NodeId>, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            kind,
        });
        if let Some(parent_id) = parent {
            self.nodes[parent_id.0].children.push(id);
        }
        id
    }

    fn element(&self, node: NodeId) -> Option<&Element> {
        match &self.nodes.get(node.0)?.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    fn element_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        match &mut self.nodes.get_mut(node.0)?.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|element| element.tag.as_str())
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)?.attr(&name.to_ascii_lowercase())
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0)?.parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.0)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_ancestor_of(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = self.parent(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        let Some(n) = self.nodes.get(node.0) else {
            return;
        };
        match &n.kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Document | NodeKind::Element(_) => {
                for child in &n.children {
                    self.collect_text(*child, out);
                }
            }
        }
    }

    /// Every element in tree order (pre-order, depth first).
    pub fn elements(&self) -> Vec<NodeId> {
        self.descendant_elements(self.root)
    }

    /// Elements at or below `node`, in tree order.
    fn descendant_elements(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(node) = stack.pop() {
            if self.element(node).is_some() {
                out.push(node);
            }
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    /// Elements whose tag is one of `tags`, in tree order.
    pub fn elements_by_tags(&self, tags: &[&str]) -> Vec<NodeId> {
        self.elements()
            .into_iter()
            .filter(|node| {
                self.tag_name(*node)
                    .map(|tag| tags.contains(&tag))
                    .unwrap_or(false)
            })
            .collect()
    }

    /// First element in tree order whose `id` attribute equals `id`.
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        match self.id_index.get(id)?.as_slice() {
            [] => None,
            [only] => Some(*only),
            // Creation order can differ from tree order for built documents.
            candidates => self
                .elements()
                .into_iter()
                .find(|node| candidates.contains(node)),
        }
    }

    /// Nearest ancestor (excluding `node` itself) with the given tag.
    pub fn closest_ancestor(&self, node: NodeId, tag: &str) -> Option<NodeId> {
        let mut cursor = self.parent(node);
        while let Some(current) = cursor {
            if self.tag_name(current) == Some(tag) {
                return Some(current);
            }
            cursor = self.parent(current);
        }
        None
    }

    /// Current value of a form control. `None` for non-elements.
    pub fn value(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|element| element.value.as_str())
    }

    /// Assign a control's value. A `select` only takes values that one of its
    /// options carries; anything else leaves it with no selection.
    pub fn set_value(&mut self, node: NodeId, value: &str) {
        if self.tag_name(node) == Some("select") {
            self.set_select_value(node, value);
            return;
        }
        if let Some(element) = self.element_mut(node) {
            element.value = value.to_string();
        }
    }

    fn set_select_value(&mut self, select: NodeId, requested: &str) {
        let options = self.options(select);
        let matched = options
            .iter()
            .copied()
            .find(|option| self.option_value(*option) == requested);
        for option in &options {
            if let Some(element) = self.element_mut(*option) {
                element.checked = Some(*option) == matched;
            }
        }
        let value = if matched.is_some() {
            requested.to_string()
        } else {
            String::new()
        };
        if let Some(element) = self.element_mut(select) {
            element.value = value;
        }
    }

    fn options(&self, select: NodeId) -> Vec<NodeId> {
        self.descendant_elements(select)
            .into_iter()
            .filter(|node| *node != select && self.tag_name(*node) == Some("option"))
            .collect()
    }

    fn option_value(&self, option: NodeId) -> String {
        match self.attr(option, "value") {
            Some(value) => value.to_string(),
            None => self.text_content(option).trim().to_string(),
        }
    }

    pub fn checked(&self, node: NodeId) -> bool {
        self.element(node).map(|element| element.checked).unwrap_or(false)
    }

    pub fn set_checked(&mut self, node: NodeId, checked: bool) {
        if let Some(element) = self.element_mut(node) {
            element.checked = checked;
        }
    }

    /// Bring control values in line with the markup: textareas take their
    /// text, selects take their selected (or first) option.
    pub(crate) fn initialize_control_values(&mut self) {
        for node in self.elements() {
            let tag = self.tag_name(node).map(str::to_owned);
            match tag.as_deref() {
                Some("textarea") => {
                    let text = self.text_content(node);
                    if let Some(element) = self.element_mut(node) {
                        element.value = text;
                    }
                }
                Some("select") => {
                    let options = self.options(node);
                    let selected = options
                        .iter()
                        .copied()
                        .find(|option| self.attr(*option, "selected").is_some())
                        .or_else(|| options.first().copied());
                    let value = selected.map(|option| self.option_value(option));
                    if let Some(element) = self.element_mut(node) {
                        element.value = value.unwrap_or_default();
                    }
                }
                _ => {}
            }
        }
    }

    /// Record a synthetic event fired at `target`.
    pub fn dispatch_event(&mut self, target: NodeId, kind: EventKind, bubbles: bool) {
        self.events.push(DispatchedEvent {
            target,
            kind,
            bubbles,
        });
    }

    /// Every event dispatched so far, in dispatch order.
    pub fn events(&self) -> &[DispatchedEvent] {
        &self.events
    }

    /// Events a listener attached to `node` would have seen: those fired at
    /// it, plus bubbling events fired at its descendants.
    pub fn events_reaching(&self, node: NodeId) -> Vec<DispatchedEvent> {
        self.events
            .iter()
            .filter(|event| {
                event.target == node || (event.bubbles && self.is_ancestor_of(node, event.target))
            })
            .copied()
            .collect()
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }
}
