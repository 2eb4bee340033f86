//! Remote diagram rendering.
//!
//! The one HTTP call in the crate: diagram source goes to a Kroki-style
//! render service, SVG text comes back. Single request, single timeout, no
//! retries.

use crate::config;
use crate::processing::mermaid::check_source;
use std::error::Error;
use std::time::Duration;

/// Render endpoint for mermaid SVG output under a service base URL.
pub fn render_endpoint(base: &str) -> String {
    format!("{}/mermaid/svg", base.trim_end_matches('/'))
}

/// Render a mermaid diagram through the configured render service.
///
/// The source is inspected locally first so obviously broken diagrams never
/// hit the network.
///
/// # Arguments
/// * `source` - Raw mermaid source text
///
/// # Returns
/// * `Ok(String)` - The rendered SVG document
/// * `Err` - Local validation failure, connect/timeout, non-success status,
///   or a response that is not SVG
pub async fn render_mermaid(source: &str) -> Result<String, Box<dyn Error>> {
    let report = check_source(source)?;
    let url = render_endpoint(&config::render_url());
    log::info!(
        "#Start render_mermaid() {} diagram, {} chars via {url}",
        report.diagram_type,
        report.char_count
    );

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config::http_timeout_secs()))
        .build()?;

    let response = client
        .post(&url)
        .header(reqwest::header::CONTENT_TYPE, "text/plain")
        .body(source.to_string())
        .send()
        .await
        .map_err(|e| format!("Render request failed: {e}"))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| format!("Error reading render response: {e}"))?;

    if !status.is_success() {
        log::error!(
            "RESPONSE START:\n\n{}\n\nRESPONSE END\n",
            body.chars().take(500).collect::<String>()
        );
        return Err(format!("Render service returned {status}").into());
    }

    let trimmed = body.trim_start();
    if !(trimmed.starts_with("<svg") || trimmed.starts_with("<?xml")) {
        return Err("Render service returned a non-SVG response".into());
    }

    log::info!("render_mermaid() got {} bytes of SVG", body.len());
    Ok(body)
}
