use formfill::{extract, Document};
use serde_json::json;

#[test]
fn test_no_controls_yields_empty_schema() {
    let doc =
        Document::parse("<html><body><p>Nothing to fill</p><button>Go</button></body></html>");
    assert!(extract(&doc).is_empty());

    assert!(extract(&Document::new()).is_empty());
}

#[test]
fn test_label_for_resolves_by_id() {
    let doc = Document::parse(
        r#"<form><label for="x">Full Name</label><input id="x" type="text"></form>"#,
    );
    let fields = extract(&doc);
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].labels, vec!["Full Name".to_string()]);
    assert_eq!(fields[0].id.as_deref(), Some("x"));
}

#[test]
fn test_sparse_descriptor_for_bare_input() {
    let doc = Document::parse("<input>");
    let fields = extract(&doc);
    let encoded = serde_json::to_value(&fields[0]).expect("serialize");
    assert_eq!(encoded, json!({ "tag": "input", "type": "text" }));
}

#[test]
fn test_email_input_schema() {
    let doc = Document::parse(r#"<input name="email" type="email">"#);
    let encoded = serde_json::to_value(extract(&doc)).expect("serialize");
    assert_eq!(
        encoded,
        json!([{ "tag": "input", "type": "email", "name": "email" }])
    );
}

#[test]
fn test_empty_and_blank_attributes_are_stripped() {
    let doc = Document::parse(r#"<input id="" name="   " placeholder="" type="">"#);
    let fields = extract(&doc);
    assert_eq!(fields[0].id, None);
    assert_eq!(fields[0].name, None);
    assert_eq!(fields[0].placeholder, None);
    assert_eq!(fields[0].r#type, "text");
    assert!(fields[0].labels.is_empty());
}

#[test]
fn test_wrapping_label_is_used() {
    let doc = Document::parse(r#"<label>  Phone number <input name="phone" type="tel"></label>"#);
    let fields = extract(&doc);
    assert_eq!(fields[0].labels, vec!["Phone number".to_string()]);
    assert_eq!(fields[0].r#type, "tel");
}

#[test]
fn test_label_sources_are_combined_in_order() {
    let doc = Document::parse(
        r#"
        <span id="hint">Used for receipts</span>
        <label for="mail">Email</label>
        <label>Contact
            <input id="mail" name="mail" aria-labelledby="hint missing  heading">
        </label>
        <h2 id="heading">Your details</h2>
        "#,
    );
    let fields = extract(&doc);
    assert_eq!(
        fields[0].labels,
        vec![
            "Email".to_string(),
            "Contact".to_string(),
            "Used for receipts".to_string(),
            "Your details".to_string(),
        ]
    );
}

#[test]
fn test_duplicate_labels_are_deduplicated() {
    let doc = Document::parse(
        r#"
        <label for="city">City</label>
        <label for="city"> City </label>
        <span id="again">City</span>
        <input id="city" aria-labelledby="again">
        "#,
    );
    let fields = extract(&doc);
    assert_eq!(fields[0].labels, vec!["City".to_string()]);
}

#[test]
fn test_label_that_targets_and_wraps_counts_once() {
    let doc = Document::parse(r#"<label for="x">Name <input id="x"></label>"#);
    let fields = extract(&doc);
    assert_eq!(fields[0].labels, vec!["Name".to_string()]);
}

#[test]
fn test_for_labels_resolve_per_control() {
    let doc = Document::parse(
        r#"
        <label for="last">Last name</label>
        <input id="first"><input id="last"><input id="middle">
        <label for="first">First name</label>
        <label for="last">Surname</label>
        <label for="nobody">Orphan</label>
        "#,
    );
    let labels: Vec<Vec<String>> = extract(&doc).into_iter().map(|f| f.labels).collect();
    assert_eq!(
        labels,
        vec![
            vec!["First name".to_string()],
            vec!["Last name".to_string(), "Surname".to_string()],
            Vec::new(),
        ]
    );
}

#[test]
fn test_empty_label_text_is_dropped() {
    let doc = Document::parse(r#"<label for="q">   </label><input id="q" type="search">"#);
    let fields = extract(&doc);
    assert!(fields[0].labels.is_empty());
    let encoded = serde_json::to_value(&fields[0]).expect("serialize");
    assert!(encoded.get("labels").is_none());
}

#[test]
fn test_textarea_and_select_are_included_in_document_order() {
    let doc = Document::parse(
        r#"
        <form>
            <textarea name="comments"></textarea>
            <input name="first">
            <select name="size"><option>S</option><option>M</option></select>
            <select name="toppings" multiple><option>cheese</option></select>
        </form>
        "#,
    );
    let fields = extract(&doc);
    let summary: Vec<(&str, &str, Option<&str>)> = fields
        .iter()
        .map(|f| (f.tag.as_str(), f.r#type.as_str(), f.name.as_deref()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("textarea", "textarea", Some("comments")),
            ("input", "text", Some("first")),
            ("select", "select-one", Some("size")),
            ("select", "select-multiple", Some("toppings")),
        ]
    );
}

#[test]
fn test_unknown_input_type_defaults_to_text() {
    let doc = Document::parse(r#"<input type="Fancy"><input type="PASSWORD">"#);
    let fields = extract(&doc);
    assert_eq!(fields[0].r#type, "text");
    assert_eq!(fields[1].r#type, "password");
}

#[test]
fn test_placeholder_is_reported() {
    let doc = Document::parse(r#"<input name="zip" placeholder="e.g. 94110">"#);
    let fields = extract(&doc);
    assert_eq!(fields[0].placeholder.as_deref(), Some("e.g. 94110"));
}

#[test]
fn test_key_prefers_name_over_id() {
    let doc = Document::parse(r#"<input id="a" name="b"><input id="c"><input>"#);
    let fields = extract(&doc);
    assert_eq!(fields[0].key(), Some("b"));
    assert_eq!(fields[1].key(), Some("c"));
    assert_eq!(fields[2].key(), None);
}

#[test]
fn test_extraction_does_not_touch_the_document() {
    let doc = Document::parse(r#"<input name="n" value="kept">"#);
    let _ = extract(&doc);
    let input = doc.elements_by_tags(&["input"])[0];
    assert_eq!(doc.value(input), Some("kept"));
    assert!(doc.events().is_empty());
}

#[test]
fn test_programmatic_document() {
    let mut doc = Document::new();
    let root = doc.root();
    let form = doc.create_element(root, "FORM", Vec::<(String, String)>::new());
    let label = doc.create_element(form, "label", [("for", "user")]);
    doc.append_text(label, "Username");
    doc.create_element(form, "input", [("id", "user"), ("NAME", "username")]);

    let fields = extract(&doc);
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].name.as_deref(), Some("username"));
    assert_eq!(fields[0].labels, vec!["Username".to_string()]);
}
