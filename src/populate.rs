use serde::Serialize;
use tracing::debug;

use crate::dom::{Document, EventKind, NodeId, INPUT_CAPABLE_TAGS};
use crate::schema::{field_key, FilledFieldMap};

/// Values that switch a checkbox on under [`FillPolicy::Native`]
/// (compared case-insensitively).
pub const CHECKED_TOKENS: &[&str] = &["true", "on", "yes", "1", "checked"];

/// How a provided value is applied to a control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FillPolicy {
    /// Assign the value property of every control, checkboxes and radios
    /// included.
    #[default]
    AssignValue,
    /// Checkboxes and radios toggle their checked state instead; all other
    /// controls get the value assigned.
    Native,
}

impl FillPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            FillPolicy::AssignValue => "assign-value",
            FillPolicy::Native => "native",
        }
    }
}

/// Write `values` into every input-capable element whose key (name, else
/// id) has an entry, firing bubbling `input` then `change` on each.
/// Returns how many elements were written.
pub fn populate(doc: &mut Document, values: &FilledFieldMap) -> usize {
    populate_with(doc, values, FillPolicy::default())
}

pub fn populate_with(doc: &mut Document, values: &FilledFieldMap, policy: FillPolicy) -> usize {
    let mut filled = 0;
    for node in doc.elements_by_tags(INPUT_CAPABLE_TAGS) {
        let Some(value) = field_key(doc.attr(node, "name"), doc.attr(node, "id"))
            .and_then(|key| values.get(key))
            .map(str::to_owned)
        else {
            continue;
        };

        let input_type = control_type(doc, node);
        if input_type.as_deref() == Some("file") {
            debug!(?node, "skipping file input");
            continue;
        }

        match (policy, input_type.as_deref()) {
            (FillPolicy::Native, Some("checkbox")) => {
                let checked = is_checked_token(&value)
                    || doc.attr(node, "value") == Some(value.as_str());
                doc.set_checked(node, checked);
            }
            (FillPolicy::Native, Some("radio")) => {
                let own = doc.attr(node, "value").unwrap_or("on");
                let checked = own == value;
                doc.set_checked(node, checked);
            }
            _ => doc.set_value(node, &value),
        }

        doc.dispatch_event(node, EventKind::Input, true);
        doc.dispatch_event(node, EventKind::Change, true);
        filled += 1;
    }

    debug!(filled, keys = values.len(), policy = policy.as_str(), "populated form");
    filled
}

/// Lowercased `type` of an `<input>`, `None` for other controls.
fn control_type(doc: &Document, node: NodeId) -> Option<String> {
    if doc.tag_name(node) != Some("input") {
        return None;
    }
    Some(
        doc.attr(node, "type")
            .map(|t| t.trim().to_ascii_lowercase())
            .unwrap_or_else(|| "text".to_string()),
    )
}

fn is_checked_token(value: &str) -> bool {
    let value = value.trim();
    CHECKED_TOKENS
        .iter()
        .any(|token| token.eq_ignore_ascii_case(value))
}
