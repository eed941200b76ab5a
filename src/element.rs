use chromiumoxide::element::Element as CrElement;

use crate::error::{Error, Result};

/// Wrapper around a chromiumoxide Element for reading control state back.
pub struct Element {
    inner: CrElement,
}

impl Element {
    pub(crate) fn new(inner: CrElement) -> Self {
        Self { inner }
    }

    /// Returns a reference to the underlying chromiumoxide Element.
    pub fn inner(&self) -> &CrElement {
        &self.inner
    }

    /// Get the value of an attribute on this element.
    pub async fn attribute(&self, name: &str) -> Result<Option<String>> {
        self.inner.attribute(name).await.map_err(Error::CdpError)
    }

    /// Current `value` property (not the attribute), as a control reports it.
    pub async fn value(&self) -> Result<String> {
        self.string_property("function() { return String(this.value ?? ''); }")
            .await
    }

    /// Current `checked` property of a checkbox or radio.
    pub async fn checked(&self) -> Result<bool> {
        let returns = self
            .inner
            .call_js_fn("function() { return this.checked === true; }", false)
            .await
            .map_err(Error::CdpError)?;
        Ok(returns
            .result
            .value
            .and_then(|v| v.as_bool())
            .unwrap_or(false))
    }

    async fn string_property(&self, function: &str) -> Result<String> {
        let returns = self
            .inner
            .call_js_fn(function, false)
            .await
            .map_err(Error::CdpError)?;
        returns
            .result
            .value
            .and_then(|v| v.as_str().map(str::to_owned))
            .ok_or_else(|| Error::JsError("property did not evaluate to a string".into()))
    }
}
