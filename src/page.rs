use std::time::Duration;

use chromiumoxide::page::Page as CrPage;
use tracing::{debug, info};

use crate::dom::Document;
use crate::element::Element;
use crate::error::{Error, Result};
use crate::populate::FillPolicy;
use crate::schema::{FieldDescriptor, FilledFieldMap, RawField};
use crate::scripts;

/// Wrapper around a chromiumoxide Page exposing form extraction and
/// population on the live document.
pub struct Page {
    inner: CrPage,
    default_timeout: Duration,
}

impl Page {
    pub(crate) fn new(inner: CrPage, default_timeout: Duration) -> Self {
        Self { inner, default_timeout }
    }

    /// Returns a reference to the underlying chromiumoxide Page.
    pub fn inner(&self) -> &CrPage {
        &self.inner
    }

    // ── Document ────────────────────────────────────────────────────

    /// Replace the page's document with the given HTML.
    pub async fn set_content(&self, html: &str) -> Result<()> {
        self.inner
            .set_content(html)
            .await
            .map_err(|e| Error::NavigationError(e.to_string()))?;
        Ok(())
    }

    /// Get the current page URL.
    pub async fn url(&self) -> Result<String> {
        self.inner
            .url()
            .await
            .map_err(|e| Error::NavigationError(e.to_string()))?
            .ok_or_else(|| Error::NavigationError("No URL found".into()))
    }

    /// Get the current page title.
    pub async fn title(&self) -> Result<String> {
        let result = self
            .inner
            .evaluate("document.title")
            .await
            .map_err(|e| Error::JsError(e.to_string()))?;
        Ok(result.into_value::<String>().unwrap_or_default())
    }

    /// Get the full HTML content of the page.
    pub async fn html(&self) -> Result<String> {
        self.inner
            .content()
            .await
            .map_err(|e| Error::JsError(e.to_string()))
    }

    /// Parse the page's current markup into an in-memory [`Document`].
    /// Control values typed by the user after load are not carried over.
    pub async fn snapshot(&self) -> Result<Document> {
        let html = self.html().await?;
        Ok(Document::parse(&html))
    }

    // ── Forms ───────────────────────────────────────────────────────

    /// Describe every input, textarea and select on the page.
    pub async fn extract_form_schema(&self) -> Result<Vec<FieldDescriptor>> {
        let result = self
            .inner
            .evaluate(scripts::EXTRACT_JS)
            .await
            .map_err(|e| Error::JsError(e.to_string()))?;
        let json_str: String = result
            .into_value()
            .map_err(|e| Error::JsError(e.to_string()))?;
        let raw: Vec<RawField> = serde_json::from_str(&json_str)?;
        let fields: Vec<FieldDescriptor> = raw.into_iter().map(FieldDescriptor::assemble).collect();
        info!(count = fields.len(), "extracted form schema from page");
        Ok(fields)
    }

    /// Write `values` into the page's controls and fire bubbling `input`
    /// and `change` events on each. Returns how many elements were written.
    pub async fn populate_form(&self, values: &FilledFieldMap) -> Result<usize> {
        self.populate_form_with(values, FillPolicy::default()).await
    }

    pub async fn populate_form_with(
        &self,
        values: &FilledFieldMap,
        policy: FillPolicy,
    ) -> Result<usize> {
        let js = scripts::populate_js(values, policy)?;
        let result = self
            .inner
            .evaluate(js)
            .await
            .map_err(|e| Error::JsError(e.to_string()))?;
        let filled: usize = result
            .into_value()
            .map_err(|e| Error::JsError(e.to_string()))?;
        info!(filled, keys = values.len(), policy = policy.as_str(), "populated page form");
        Ok(filled)
    }

    // ── Scripting ───────────────────────────────────────────────────

    /// Evaluate a JavaScript expression and return the result as a string.
    pub async fn evaluate(&self, expression: &str) -> Result<String> {
        let result = self
            .inner
            .evaluate(expression)
            .await
            .map_err(|e| Error::JsError(e.to_string()))?;
        match result.value() {
            Some(val) => Ok(val.to_string()),
            None => Ok(String::new()),
        }
    }

    // ── Element Queries ─────────────────────────────────────────────

    /// Find an element matching the given CSS selector.
    pub async fn find_element(&self, selector: &str) -> Result<Element> {
        let el = self
            .inner
            .find_element(selector)
            .await
            .map_err(|e| Error::ElementNotFound(e.to_string()))?;
        Ok(Element::new(el))
    }

    /// Wait for an element matching the given CSS selector to appear in the DOM.
    /// Polls every 100ms up to the configured default timeout.
    pub async fn wait_for_selector(&self, selector: &str) -> Result<Element> {
        let timeout = self.default_timeout;
        let interval = Duration::from_millis(100);
        let start = std::time::Instant::now();

        loop {
            match self.find_element(selector).await {
                Ok(el) => return Ok(el),
                Err(_) if start.elapsed() < timeout => {
                    tokio::time::sleep(interval).await;
                }
                Err(_) => {
                    debug!(selector, ?timeout, "selector never appeared");
                    return Err(Error::Timeout(format!(
                        "Timed out waiting for selector: {}",
                        selector
                    )));
                }
            }
        }
    }
}
