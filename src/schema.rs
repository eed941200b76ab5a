use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;

/// Describes one form control discovered on a page. Serializes sparsely:
/// absent or empty entries are left out of the JSON entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub tag: String,
    pub r#type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
}

/// Unnormalized field data as gathered from a document, before trimming,
/// deduplication and sparse stripping.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawField {
    pub tag: String,
    #[serde(default)]
    pub r#type: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub placeholder: Option<String>,
    /// Text content of every resolved label node, in resolution order.
    #[serde(default)]
    pub labels: Vec<String>,
}

impl FieldDescriptor {
    /// Normalize raw field data into a descriptor.
    pub fn assemble(raw: RawField) -> Self {
        Self {
            tag: raw.tag.trim().to_ascii_lowercase(),
            r#type: non_blank(raw.r#type)
                .map(|t| t.to_ascii_lowercase())
                .unwrap_or_else(|| "text".to_string()),
            id: non_blank(raw.id),
            name: non_blank(raw.name),
            placeholder: non_blank(raw.placeholder),
            labels: normalize_labels(raw.labels),
        }
    }

    /// The identifier used to match a filled value back to this control:
    /// `name` when present, otherwise `id`.
    pub fn key(&self) -> Option<&str> {
        field_key(self.name.as_deref(), self.id.as_deref())
    }
}

/// `name` if non-empty, else `id` if non-empty.
pub fn field_key<'a>(name: Option<&'a str>, id: Option<&'a str>) -> Option<&'a str> {
    name.filter(|n| !n.is_empty())
        .or_else(|| id.filter(|i| !i.is_empty()))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Trim, drop empties, and deduplicate while keeping first-seen order.
pub fn normalize_labels<I, S>(texts: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut labels: Vec<String> = Vec::new();
    for text in texts {
        let text = text.as_ref().trim();
        if !text.is_empty() && !labels.iter().any(|seen| seen == text) {
            labels.push(text.to_string());
        }
    }
    labels
}

/// Values to write into a page, keyed by field key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FilledFieldMap(HashMap<String, String>);

impl FilledFieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FilledFieldMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Accepts JSON scalars. Numbers and booleans keep their JSON spelling,
/// `null` means "no value" and the entry is dropped.
impl<'de> Deserialize<'de> for FilledFieldMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Scalar {
            Text(String),
            Number(serde_json::Number),
            Flag(bool),
        }

        let raw: HashMap<String, Option<Scalar>> = HashMap::deserialize(deserializer)?;
        Ok(Self(
            raw.into_iter()
                .filter_map(|(key, value)| {
                    let value = match value? {
                        Scalar::Text(text) => text,
                        Scalar::Number(number) => number.to_string(),
                        Scalar::Flag(flag) => flag.to_string(),
                    };
                    Some((key, value))
                })
                .collect(),
        ))
    }
}

/// Body returned by the remote fill service.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillResponse {
    #[serde(default)]
    pub filled_fields: FilledFieldMap,
}

impl FillResponse {
    pub fn from_json(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }
}
