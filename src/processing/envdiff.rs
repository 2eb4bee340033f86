//! Environment-file diffing.
//!
//! Key-based comparison of two parsed dotenv files, plus a raw unified text
//! diff for the line-oriented view.

use crate::models::EnvFile;
use serde::{Deserialize, Serialize};
use similar::TextDiff;

/// Kind of change for a single key.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EnvChangeType {
    /// Key only present in the new file.
    Added,
    /// Key only present in the old file.
    Removed,
    /// Key present in both with different values.
    Changed,
    /// Key present in both with the same value.
    Unchanged,
}

/// Diff result for one key.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EnvDiffEntry {
    /// The variable name.
    pub key: String,
    /// Value in the old file, None when added.
    pub old_value: Option<String>,
    /// Value in the new file, None when removed.
    pub new_value: Option<String>,
    /// Kind of change.
    pub change: EnvChangeType,
}

/// Per-kind counts over a whole diff.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvDiffStats {
    pub added: usize,
    pub removed: usize,
    pub changed: usize,
    pub unchanged: usize,
}

/// Result of diffing two environment files.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EnvDiff {
    /// Entries: old-file key order first, then keys new to the new file.
    pub entries: Vec<EnvDiffEntry>,
    /// Summary counts.
    pub stats: EnvDiffStats,
}

/// Fixed-width replacement used when masking values.
const MASK: &str = "********";

impl EnvDiff {
    /// Copy of the diff with every value replaced by a fixed-width mask.
    ///
    /// Change detection already happened on the real values; only the
    /// rendered output hides them.
    pub fn masked(&self) -> EnvDiff {
        let entries = self
            .entries
            .iter()
            .map(|e| EnvDiffEntry {
                key: e.key.clone(),
                old_value: e.old_value.as_ref().map(|_| MASK.to_string()),
                new_value: e.new_value.as_ref().map(|_| MASK.to_string()),
                change: e.change,
            })
            .collect();
        EnvDiff {
            entries,
            stats: self.stats.clone(),
        }
    }
}

/// Diff two parsed environment files key by key.
///
/// # Arguments
/// * `old` - The baseline file
/// * `new` - The file compared against the baseline
///
/// # Returns
/// An [`EnvDiff`] covering the union of keys
pub fn diff_env(old: &EnvFile, new: &EnvFile) -> EnvDiff {
    let mut entries = Vec::new();
    let mut stats = EnvDiffStats::default();

    for entry in &old.entries {
        match new.get(&entry.key) {
            Some(new_value) if new_value == entry.value => {
                stats.unchanged += 1;
                entries.push(EnvDiffEntry {
                    key: entry.key.clone(),
                    old_value: Some(entry.value.clone()),
                    new_value: Some(new_value.to_string()),
                    change: EnvChangeType::Unchanged,
                });
            }
            Some(new_value) => {
                stats.changed += 1;
                entries.push(EnvDiffEntry {
                    key: entry.key.clone(),
                    old_value: Some(entry.value.clone()),
                    new_value: Some(new_value.to_string()),
                    change: EnvChangeType::Changed,
                });
            }
            None => {
                stats.removed += 1;
                entries.push(EnvDiffEntry {
                    key: entry.key.clone(),
                    old_value: Some(entry.value.clone()),
                    new_value: None,
                    change: EnvChangeType::Removed,
                });
            }
        }
    }

    for entry in &new.entries {
        if old.get(&entry.key).is_none() {
            stats.added += 1;
            entries.push(EnvDiffEntry {
                key: entry.key.clone(),
                old_value: None,
                new_value: Some(entry.value.clone()),
                change: EnvChangeType::Added,
            });
        }
    }

    log::info!(
        "envdiff: +{} -{} ~{} ={}",
        stats.added,
        stats.removed,
        stats.changed,
        stats.unchanged
    );
    EnvDiff { entries, stats }
}

/// Raw unified line diff of the two texts, git-style.
///
/// # Arguments
/// * `old_text` / `new_text` - File contents as read from disk
/// * `old_name` / `new_name` - Labels for the `---`/`+++` header
pub fn unified_text_diff(old_text: &str, new_text: &str, old_name: &str, new_name: &str) -> String {
    TextDiff::from_lines(old_text, new_text)
        .unified_diff()
        .context_radius(3)
        .header(old_name, new_name)
        .to_string()
}
