//! Live-browser tests. They need a local Chrome, so they are ignored by
//! default: `cargo test -- --ignored`.

use formfill::{extract, FillPolicy, FilledFieldMap, FormFillBrowser};

const SIGNUP_FORM: &str = r#"
<html><body>
  <form id="signup">
    <label for="full-name">Full Name</label>
    <input id="full-name" name="fullName">
    <label>Email <input name="email" type="email" placeholder="you@example.com"></label>
    <span id="pw-hint">At least 8 characters</span>
    <input name="password" type="password" aria-labelledby="pw-hint">
    <textarea name="bio"></textarea>
    <select name="plan"><option value="free">Free</option><option value="pro">Pro</option></select>
    <input type="checkbox" name="terms">
  </form>
  <script>
    window.__events = [];
    document.addEventListener('input', e => window.__events.push('input:' + e.target.name + ':' + e.bubbles));
    document.addEventListener('change', e => window.__events.push('change:' + e.target.name + ':' + e.bubbles));
  </script>
</body></html>
"#;

#[tokio::test]
#[ignore = "requires a local Chrome install"]
async fn test_live_extract_matches_in_memory_extract() {
    let browser = FormFillBrowser::builder()
        .headless(true)
        .build()
        .await
        .expect("Failed to launch browser");

    let page = browser
        .new_page_with_content(SIGNUP_FORM)
        .await
        .expect("Failed to open page");

    let live = page.extract_form_schema().await.expect("Failed to extract");
    let snapshot = page.snapshot().await.expect("Failed to snapshot");
    assert_eq!(live, extract(&snapshot));

    assert_eq!(live.len(), 6);
    assert_eq!(live[0].labels, vec!["Full Name".to_string()]);
    assert_eq!(live[1].labels, vec!["Email".to_string()]);
    assert_eq!(live[1].placeholder.as_deref(), Some("you@example.com"));
    assert_eq!(live[2].labels, vec!["At least 8 characters".to_string()]);
    assert_eq!(live[4].r#type, "select-one");
}

#[tokio::test]
#[ignore = "requires a local Chrome install"]
async fn test_live_populate_sets_values_and_fires_events() {
    let browser = FormFillBrowser::builder()
        .headless(true)
        .build()
        .await
        .expect("Failed to launch browser");

    let page = browser
        .new_page_with_content(SIGNUP_FORM)
        .await
        .expect("Failed to open page");

    let values: FilledFieldMap = [("email", "a@b.com"), ("plan", "pro"), ("unknown", "x")]
        .into_iter()
        .collect();
    let filled = page.populate_form(&values).await.expect("Failed to populate");
    assert_eq!(filled, 2);

    let email = page.find_element("input[name='email']").await.expect("email input");
    assert_eq!(email.value().await.expect("value"), "a@b.com");
    let plan = page.find_element("select[name='plan']").await.expect("plan select");
    assert_eq!(plan.value().await.expect("value"), "pro");

    let events = page.evaluate("window.__events.join(',')").await.expect("events");
    assert_eq!(
        events,
        "\"input:email:true,change:email:true,input:plan:true,change:plan:true\""
    );
}

#[tokio::test]
#[ignore = "requires a local Chrome install"]
async fn test_live_native_policy_checks_checkbox() {
    let browser = FormFillBrowser::builder()
        .headless(true)
        .build()
        .await
        .expect("Failed to launch browser");

    let page = browser
        .new_page_with_content(SIGNUP_FORM)
        .await
        .expect("Failed to open page");

    let values: FilledFieldMap = [("terms", "yes")].into_iter().collect();
    page.populate_form_with(&values, FillPolicy::Native)
        .await
        .expect("Failed to populate");

    let terms = page
        .wait_for_selector("input[name='terms']")
        .await
        .expect("terms checkbox");
    assert!(terms.checked().await.expect("checked"));
    assert_eq!(terms.attribute("type").await.expect("attr").as_deref(), Some("checkbox"));
}
