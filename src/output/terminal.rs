//! Terminal output utilities.
//!
//! Formatting helpers shared by the CSV and table printers, plus the colored
//! env-diff rendering.

use crate::processing::{EnvChangeType, EnvDiff};
use colored::Colorize;

/// Format a value as a quoted, right-aligned field.
///
/// # Arguments
/// * `value` - The value to format
/// * `width` - The minimum width of the field
pub fn format_field<T: ToString>(value: T, width: usize) -> String {
    let value_str = value.to_string();
    let quoted = format!("\"{value_str}\"");
    let quoted_len = quoted.len();

    if quoted_len >= width {
        quoted
    } else {
        format!("{quoted:>width$}")
    }
}

/// Left-align a label into a fixed width, unquoted.
pub fn pad_label<T: ToString>(value: T, width: usize) -> String {
    let value_str = value.to_string();
    if value_str.len() >= width {
        value_str
    } else {
        format!("{value_str:<width$}")
    }
}

/// Print an env diff with git-style markers, colored per change kind.
pub fn print_env_diff(diff: &EnvDiff) {
    for entry in &diff.entries {
        let old = entry.old_value.as_deref().unwrap_or_default();
        let new = entry.new_value.as_deref().unwrap_or_default();
        match entry.change {
            EnvChangeType::Added => {
                println!("{}", format!("+ {}={new}", entry.key).green());
            }
            EnvChangeType::Removed => {
                println!("{}", format!("- {}={old}", entry.key).red());
            }
            EnvChangeType::Changed => {
                println!("{}", format!("~ {}={old} -> {new}", entry.key).yellow());
            }
            EnvChangeType::Unchanged => {
                println!("  {}={old}", entry.key);
            }
        }
    }
    println!(
        "#{}# +{} -{} ~{} ={}",
        "SUMMARY".on_blue(),
        diff.stats.added,
        diff.stats.removed,
        diff.stats.changed,
        diff.stats.unchanged
    );
}
