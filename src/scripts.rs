//! Scripts injected into live pages. They mirror `extract` and `populate`
//! so a page behaves the same as an in-memory [`Document`](crate::Document).

use crate::error::{Error, Result};
use crate::populate::{FillPolicy, CHECKED_TOKENS};
use crate::schema::FilledFieldMap;

/// Collects raw field records (label texts untrimmed) as a JSON string.
/// Normalization happens on the Rust side.
pub const EXTRACT_JS: &str = r#"
    JSON.stringify(
        Array.from(document.querySelectorAll('input, textarea, select')).map(el => {
            const labels = [];
            if (el.id) {
                document.querySelectorAll('label[for]').forEach(label => {
                    if (label.getAttribute('for') === el.id) labels.push(label.textContent || '');
                });
            }
            const wrapping = el.parentElement ? el.parentElement.closest('label') : null;
            if (wrapping) labels.push(wrapping.textContent || '');
            (el.getAttribute('aria-labelledby') || '')
                .split(/\s+/)
                .filter(Boolean)
                .forEach(ref => {
                    const target = document.getElementById(ref);
                    if (target) labels.push(target.textContent || '');
                });
            return {
                tag: el.tagName.toLowerCase(),
                type: el.type || 'text',
                id: el.getAttribute('id'),
                name: el.getAttribute('name'),
                placeholder: el.getAttribute('placeholder'),
                labels: labels
            };
        })
    )
"#;

/// Build the population script for `values`. The script evaluates to the
/// number of elements written.
pub fn populate_js(values: &FilledFieldMap, policy: FillPolicy) -> Result<String> {
    let values_js = serde_json::to_string(values).map_err(|e| Error::JsError(e.to_string()))?;
    let policy_js = serde_json::to_string(&policy).map_err(|e| Error::JsError(e.to_string()))?;
    let tokens_js =
        serde_json::to_string(CHECKED_TOKENS).map_err(|e| Error::JsError(e.to_string()))?;

    // Assigning through the prototype setter keeps React's value tracker
    // from swallowing the following input event.
    Ok(format!(
        r#"
        (() => {{
            const values = {values_js};
            const policy = {policy_js};
            const checkedTokens = {tokens_js};
            const nativeSetter = (el) => {{
                const proto = Object.getPrototypeOf(el);
                const descriptor = Object.getOwnPropertyDescriptor(proto, 'value');
                return descriptor && descriptor.set ? descriptor.set : null;
            }};
            let filled = 0;
            document.querySelectorAll('input, textarea, select').forEach(el => {{
                const key = el.getAttribute('name') || el.getAttribute('id');
                if (!key || !Object.prototype.hasOwnProperty.call(values, key)) return;
                const value = values[key];
                const type = el.tagName === 'INPUT' ? (el.getAttribute('type') || 'text').trim().toLowerCase() : null;
                if (type === 'file') return;
                if (policy === 'native' && type === 'checkbox') {{
                    el.checked = checkedTokens.includes(value.trim().toLowerCase())
                        || el.getAttribute('value') === value;
                }} else if (policy === 'native' && type === 'radio') {{
                    el.checked = (el.getAttribute('value') ?? 'on') === value;
                }} else {{
                    const setter = nativeSetter(el);
                    if (setter) setter.call(el, value); else el.value = value;
                }}
                el.dispatchEvent(new Event('input', {{ bubbles: true }}));
                el.dispatchEvent(new Event('change', {{ bubbles: true }}));
                filled += 1;
            }});
            return filled;
        }})()
        "#,
    ))
}
