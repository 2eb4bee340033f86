//! Per-tool state files.
//!
//! Every tool can persist its last request/result as a JSON document in the
//! state directory. Files are independent per tool; nothing is shared
//! between tools.

use crate::config;
use chrono;
use lazy_static::lazy_static;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::{Path, PathBuf};

lazy_static! {
    static ref TOOL_NAME_RE: Regex = Regex::new(r"^[a-z0-9][a-z0-9_-]*$").expect("Invalid Regex?");
}

/// Wrapper stored on disk around the actual tool state.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StateEnvelope<T> {
    /// The tool that owns the state.
    pub tool: String,
    /// RFC 3339 timestamp of the save.
    pub saved_at: String,
    /// Tool-specific payload.
    pub data: T,
}

/// File path holding the given tool's state.
pub fn state_path(tool: &str) -> Result<PathBuf, Box<dyn Error>> {
    if !TOOL_NAME_RE.is_match(tool) {
        return Err(format!("Invalid tool name for state file: {tool}").into());
    }
    Ok(Path::new(&config::state_dir()).join(format!("{tool}.json")))
}

/// Save a tool's state, creating the state directory on first use.
///
/// # Arguments
/// * `tool` - Tool name, also the file stem
/// * `data` - Any serializable payload
///
/// # Returns
/// * `Ok(PathBuf)` - Where the state was written
pub fn save_state<T: Serialize>(tool: &str, data: &T) -> Result<PathBuf, Box<dyn Error>> {
    let path = state_path(tool)?;
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .map_err(|e| format!("Error creating state dir {}: {e}", dir.display()))?;
    }

    let envelope = StateEnvelope {
        tool: tool.to_string(),
        saved_at: chrono::Utc::now().to_rfc3339(),
        data,
    };
    let json = serde_json::to_string_pretty(&envelope)
        .map_err(|e| format!("Error serializing state JSON: {e}"))?;
    std::fs::write(&path, json)
        .map_err(|e| format!("Error writing state file {}: {e}", path.display()))?;

    log::info!("Saved {tool} state to {}", path.display());
    Ok(path)
}

/// Load a tool's state, if any was saved.
///
/// A corrupt state file is an error naming the failing JSON path, not a
/// silent miss.
pub fn load_state<T: DeserializeOwned>(
    tool: &str,
) -> Result<Option<StateEnvelope<T>>, Box<dyn Error>> {
    let path = state_path(tool)?;
    if !path.exists() {
        log::debug!("No state file for {tool} at {}", path.display());
        return Ok(None);
    }

    let json = std::fs::read_to_string(&path)
        .map_err(|e| format!("Error reading state file {}: {e}", path.display()))?;
    let mut deserializer = serde_json::Deserializer::from_str(&json);
    let envelope: StateEnvelope<T> = serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|e| {
            format!(
                "Error parsing state file {}: path={} error={}",
                path.display(),
                e.path(),
                e
            )
        })?;

    log::info!("Loaded {tool} state saved at {}", envelope.saved_at);
    Ok(Some(envelope))
}

/// Load a tool's state as untyped JSON for the recall command.
pub fn load_state_raw(tool: &str) -> Result<Option<serde_json::Value>, Box<dyn Error>> {
    Ok(load_state::<serde_json::Value>(tool)?.map(|e| {
        serde_json::json!({
            "tool": e.tool,
            "saved_at": e.saved_at,
            "data": e.data,
        })
    }))
}
