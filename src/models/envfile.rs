//! Dotenv-format file parsing.
//!
//! Parses `KEY=VALUE` environment files: `export` prefixes, `#` comments,
//! blank lines, quoted values. Duplicate keys keep the last occurrence.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref ENV_LINE_RE: Regex =
        Regex::new(r"^(?:export\s+)?([A-Za-z_][A-Za-z0-9_.]*)\s*=\s*(.*)$")
            .expect("Invalid Regex?");
}

/// A single `KEY=VALUE` entry from an environment file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EnvEntry {
    /// Variable name.
    pub key: String,
    /// Variable value with surrounding quotes stripped.
    pub value: String,
    /// 1-indexed source line the entry was read from.
    pub line: usize,
}

/// A parsed environment file, entries in source order.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct EnvFile {
    /// Parsed entries, duplicates already collapsed (last wins).
    pub entries: Vec<EnvEntry>,
    /// Number of lines that were neither blank, comment, nor parseable.
    pub skipped: usize,
}

impl EnvFile {
    /// Parse dotenv-format text into an [`EnvFile`].
    pub fn parse(text: &str) -> EnvFile {
        let mut file = EnvFile::default();

        for (i, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some(caps) = ENV_LINE_RE.captures(line) else {
                log::warn!("Skipping unparseable line {}: {raw}", i + 1);
                file.skipped += 1;
                continue;
            };

            let key = caps[1].to_string();
            let value = clean_value(&caps[2]);

            if let Some(existing) = file.entries.iter_mut().find(|e| e.key == key) {
                log::warn!(
                    "Duplicate key '{key}' on line {} overrides line {}",
                    i + 1,
                    existing.line
                );
                existing.value = value;
                existing.line = i + 1;
            } else {
                file.entries.push(EnvEntry {
                    key,
                    value,
                    line: i + 1,
                });
            }
        }

        file
    }

    /// Look up the value for a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.value.as_str())
    }

    /// All keys in source order.
    pub fn keys(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.key.as_str()).collect()
    }
}

/// Strip matching surrounding quotes, or a trailing comment from an unquoted value.
fn clean_value(raw: &str) -> String {
    let v = raw.trim();
    if v.len() >= 2
        && ((v.starts_with('"') && v.ends_with('"'))
            || (v.starts_with('\'') && v.ends_with('\'')))
    {
        return v[1..v.len() - 1].to_string();
    }
    // Unquoted values end at an inline comment
    match v.split_once(" #") {
        Some((value, _comment)) => value.trim_end().to_string(),
        None => v.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let text = "FOO=bar\n# comment\n\nBAZ=qux\n";
        let file = EnvFile::parse(text);
        assert_eq!(file.entries.len(), 2, "Expected 2 entries");
        assert_eq!(file.get("FOO"), Some("bar"));
        assert_eq!(file.get("BAZ"), Some("qux"));
        assert_eq!(file.skipped, 0);
    }

    #[test]
    fn test_parse_export_and_quotes() {
        let text = r#"export DATABASE_URL="postgres://localhost/app"
SECRET='s3cr3t value'
PORT=8080 # dev default
EMPTY=
"#;
        let file = EnvFile::parse(text);
        assert_eq!(file.get("DATABASE_URL"), Some("postgres://localhost/app"));
        assert_eq!(file.get("SECRET"), Some("s3cr3t value"));
        assert_eq!(file.get("PORT"), Some("8080"), "inline comment stripped");
        assert_eq!(file.get("EMPTY"), Some(""));
    }

    #[test]
    fn test_parse_duplicate_last_wins() {
        let text = "KEY=first\nKEY=second\n";
        let file = EnvFile::parse(text);
        assert_eq!(file.entries.len(), 1);
        assert_eq!(file.get("KEY"), Some("second"));
        assert_eq!(file.entries[0].line, 2);
    }

    #[test]
    fn test_parse_skips_garbage() {
        let text = "GOOD=1\nthis is not an assignment\n=nokey\n";
        let file = EnvFile::parse(text);
        assert_eq!(file.entries.len(), 1);
        assert_eq!(file.skipped, 2, "Expected 2 skipped lines");
    }

    #[test]
    fn test_keys_in_source_order() {
        let text = "B=2\nA=1\nC=3\n";
        let file = EnvFile::parse(text);
        assert_eq!(file.keys(), vec!["B", "A", "C"]);
    }
}
