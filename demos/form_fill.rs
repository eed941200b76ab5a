//! Extract a page's form schema, then fill it from a saved service response.
//!
//! cargo run --example form_fill -- <url> [response.json]
//!
//! Without a response file only the schema is printed.

use formfill::{FillResponse, FormFillBrowser};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> formfill::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = std::env::args().skip(1);
    let url = args
        .next()
        .unwrap_or_else(|| "https://httpbin.org/forms/post".to_string());
    let response_path = args.next();

    let browser = FormFillBrowser::builder().headless(true).build().await?;
    let page = browser.new_page(&url).await?;
    page.wait_for_selector("input, textarea, select").await?;

    let fields = page.extract_form_schema().await?;
    println!("{}: {} form fields", page.title().await?, fields.len());
    println!("{}", serde_json::to_string_pretty(&fields)?);

    if let Some(path) = response_path {
        let body = std::fs::read_to_string(&path)?;
        let response = FillResponse::from_json(&body)?;
        let filled = page.populate_form(&response.filled_fields).await?;
        println!("filled {filled} of {} fields on {}", fields.len(), page.url().await?);
    }

    Ok(())
}
