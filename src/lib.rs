pub mod cli;
pub mod config;
pub mod models;
pub mod output;
pub mod processing;
pub mod remote;
pub mod storage;

use models::{EnvFile, Invoice};
use processing::EnvDiff;
use std::error::Error;
use std::path::Path;

/// Diff two dotenv-format texts key by key.
pub fn diff_env_texts(old_text: &str, new_text: &str) -> EnvDiff {
    let old = EnvFile::parse(old_text);
    let new = EnvFile::parse(new_text);
    processing::diff_env(&old, &new)
}

/// Read and diff two dotenv-format files.
pub fn diff_env_files(old_path: &Path, new_path: &Path) -> Result<EnvDiff, Box<dyn Error>> {
    let old_text = std::fs::read_to_string(old_path)
        .map_err(|e| format!("Error reading {}: {e}", old_path.display()))?;
    let new_text = std::fs::read_to_string(new_path)
        .map_err(|e| format!("Error reading {}: {e}", new_path.display()))?;
    Ok(diff_env_texts(&old_text, &new_text))
}

/// Load an invoice JSON document from disk.
pub fn load_invoice(path: &Path) -> Result<Invoice, Box<dyn Error>> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("Error reading {}: {e}", path.display()))?;
    let mut deserializer = serde_json::Deserializer::from_str(&json);
    let invoice: Invoice = serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        format!(
            "Error parsing invoice {}: path={} error={}",
            path.display(),
            e.path(),
            e
        )
    })?;
    invoice.validate()?;
    Ok(invoice)
}
