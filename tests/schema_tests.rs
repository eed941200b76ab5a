use formfill::schema::{field_key, normalize_labels, RawField};
use formfill::{FieldDescriptor, FillResponse, FilledFieldMap};
use serde_json::json;

#[test]
fn test_response_scalars_are_converted() {
    let response = FillResponse::from_json(
        r#"{"filledFields": {"name": "Ada", "age": 36, "ratio": 0.5, "subscribe": true, "nickname": null}, "requestId": "r-1"}"#,
    )
    .expect("decode response");
    let fields = response.filled_fields;

    assert_eq!(fields.get("name"), Some("Ada"));
    assert_eq!(fields.get("age"), Some("36"));
    assert_eq!(fields.get("ratio"), Some("0.5"));
    assert_eq!(fields.get("subscribe"), Some("true"));
    assert!(!fields.contains_key("nickname"));
    assert_eq!(fields.len(), 4);
}

#[test]
fn test_missing_filled_fields_is_empty() {
    let response = FillResponse::from_json(r#"{"message": "nothing recognised"}"#).expect("decode");
    assert!(response.filled_fields.is_empty());
}

#[test]
fn test_nested_values_are_rejected() {
    let err = FillResponse::from_json(r#"{"filledFields": {"tags": ["a", "b"]}}"#);
    assert!(matches!(err, Err(formfill::Error::Decode(_))));

    let err = FillResponse::from_json("not json");
    assert!(err.is_err());
}

#[test]
fn test_assemble_strips_and_normalizes() {
    let descriptor = FieldDescriptor::assemble(RawField {
        tag: "INPUT".into(),
        r#type: Some("".into()),
        id: Some("  ".into()),
        name: Some("email".into()),
        placeholder: None,
        labels: vec!["  Email ".into(), "".into(), "Email".into(), "Work email".into()],
    });

    assert_eq!(
        serde_json::to_value(&descriptor).expect("serialize"),
        json!({
            "tag": "input",
            "type": "text",
            "name": "email",
            "labels": ["Email", "Work email"]
        })
    );
}

#[test]
fn test_descriptor_deserializes_sparse_json() {
    let descriptor: FieldDescriptor =
        serde_json::from_value(json!({ "tag": "select", "type": "select-one", "id": "country" }))
            .expect("deserialize");
    assert_eq!(descriptor.key(), Some("country"));
    assert!(descriptor.labels.is_empty());
}

#[test]
fn test_field_key_ignores_empty_name() {
    assert_eq!(field_key(Some(""), Some("id")), Some("id"));
    assert_eq!(field_key(Some("n"), Some("id")), Some("n"));
    assert_eq!(field_key(None, Some("")), None);
}

#[test]
fn test_normalize_labels_keeps_first_seen_order() {
    assert_eq!(
        normalize_labels(["b", " a", "b ", "  ", "c"]),
        vec!["b".to_string(), "a".to_string(), "c".to_string()]
    );
}

#[test]
fn test_filled_field_map_serializes_as_plain_object() {
    let mut values = FilledFieldMap::new();
    values.insert("email", "a@b.com");
    assert_eq!(
        serde_json::to_value(&values).expect("serialize"),
        json!({ "email": "a@b.com" })
    );
}
