use std::collections::HashMap;

use tracing::debug;

use crate::dom::{Document, NodeId, INPUT_CAPABLE_TAGS};
use crate::schema::{FieldDescriptor, RawField};

/// Describe every input-capable element of `doc`, in document order.
///
/// Labels come from, in order: `<label for>` elements naming the control's
/// id, the nearest wrapping `<label>`, and the elements listed in
/// `aria-labelledby`. A document without form controls yields an empty list.
pub fn extract(doc: &Document) -> Vec<FieldDescriptor> {
    let elements = doc.elements();
    let labels_for = labels_by_target(doc, &elements);
    let fields: Vec<FieldDescriptor> = elements
        .iter()
        .copied()
        .filter(|node| {
            doc.tag_name(*node)
                .map(|tag| INPUT_CAPABLE_TAGS.contains(&tag))
                .unwrap_or(false)
        })
        .map(|node| FieldDescriptor::assemble(raw_field(doc, &labels_for, node)))
        .collect();
    debug!(count = fields.len(), "extracted form schema");
    fields
}

/// `<label for>` elements keyed by the id they name, in document order.
type LabelIndex<'a> = HashMap<&'a str, Vec<NodeId>>;

fn labels_by_target<'a>(doc: &'a Document, elements: &[NodeId]) -> LabelIndex<'a> {
    let mut index = LabelIndex::new();
    for &node in elements {
        if doc.tag_name(node) != Some("label") {
            continue;
        }
        if let Some(target) = doc.attr(node, "for") {
            index.entry(target).or_default().push(node);
        }
    }
    index
}

fn raw_field(doc: &Document, labels_for: &LabelIndex<'_>, node: NodeId) -> RawField {
    let tag = doc.tag_name(node).unwrap_or_default().to_string();
    RawField {
        r#type: Some(control_type(doc, node, &tag)),
        id: doc.attr(node, "id").map(str::to_owned),
        name: doc.attr(node, "name").map(str::to_owned),
        placeholder: doc.attr(node, "placeholder").map(str::to_owned),
        labels: label_nodes(doc, labels_for, node)
            .into_iter()
            .map(|label| doc.text_content(label))
            .collect(),
        tag,
    }
}

const INPUT_TYPES: &[&str] = &[
    "button",
    "checkbox",
    "color",
    "date",
    "datetime-local",
    "email",
    "file",
    "hidden",
    "image",
    "month",
    "number",
    "password",
    "radio",
    "range",
    "reset",
    "search",
    "submit",
    "tel",
    "text",
    "time",
    "url",
    "week",
];

/// The control's `type` property: unknown input types fall back to `text`.
fn control_type(doc: &Document, node: NodeId, tag: &str) -> String {
    match tag {
        "textarea" => "textarea".to_string(),
        "select" if doc.attr(node, "multiple").is_some() => "select-multiple".to_string(),
        "select" => "select-one".to_string(),
        _ => doc
            .attr(node, "type")
            .map(|t| t.trim().to_ascii_lowercase())
            .filter(|t| INPUT_TYPES.contains(&t.as_str()))
            .unwrap_or_else(|| "text".to_string()),
    }
}

fn label_nodes(doc: &Document, labels_for: &LabelIndex<'_>, node: NodeId) -> Vec<NodeId> {
    let mut labels = Vec::new();

    if let Some(targeting) = doc
        .attr(node, "id")
        .filter(|id| !id.is_empty())
        .and_then(|id| labels_for.get(id))
    {
        labels.extend_from_slice(targeting);
    }

    if let Some(wrapping) = doc.closest_ancestor(node, "label") {
        labels.push(wrapping);
    }

    if let Some(refs) = doc.attr(node, "aria-labelledby") {
        labels.extend(
            refs.split_ascii_whitespace()
                .filter_map(|reference| doc.element_by_id(reference)),
        );
    }

    labels
}
