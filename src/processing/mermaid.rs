//! Mermaid source inspection.
//!
//! Pure-source support for the diagram preview tool: diagram type detection,
//! init directive extraction and structural checks. Actual rendering is done
//! by the remote render service, never locally.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;

lazy_static! {
    static ref INIT_DIRECTIVE_RE: Regex =
        Regex::new(r"(?s)%%\{\s*init\s*:\s*(\{.*?\})\s*\}%%").expect("Invalid Regex?");
}

/// Diagram families recognized from the source header.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DiagramType {
    Flowchart,
    Sequence,
    Class,
    State,
    Er,
    Gantt,
    Pie,
    Journey,
    Mindmap,
    Timeline,
}

impl std::fmt::Display for DiagramType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            DiagramType::Flowchart => "flowchart",
            DiagramType::Sequence => "sequenceDiagram",
            DiagramType::Class => "classDiagram",
            DiagramType::State => "stateDiagram",
            DiagramType::Er => "erDiagram",
            DiagramType::Gantt => "gantt",
            DiagramType::Pie => "pie",
            DiagramType::Journey => "journey",
            DiagramType::Mindmap => "mindmap",
            DiagramType::Timeline => "timeline",
        };
        write!(f, "{s}")
    }
}

/// Result of inspecting a diagram source.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SourceReport {
    /// Detected diagram family.
    pub diagram_type: DiagramType,
    /// Total source lines.
    pub line_count: usize,
    /// Lines that are neither blank nor comments.
    pub significant_lines: usize,
    /// Total characters.
    pub char_count: usize,
    /// Parsed `%%{init: ...}%%` payload, if present.
    pub init_directive: Option<serde_json::Value>,
}

/// Lines that carry diagram content, skipping blanks, comments, directives
/// and YAML front-matter.
fn significant_lines(source: &str) -> impl Iterator<Item = &str> {
    let mut in_front_matter = false;
    let mut first = true;
    source.lines().filter_map(move |raw| {
        let line = raw.trim();
        if first && line == "---" {
            first = false;
            in_front_matter = true;
            return None;
        }
        first = false;
        if in_front_matter {
            if line == "---" {
                in_front_matter = false;
            }
            return None;
        }
        if line.is_empty() || line.starts_with("%%") {
            return None;
        }
        Some(line)
    })
}

/// Detect the diagram family from the first significant line.
///
/// # Arguments
/// * `source` - Raw mermaid source text
///
/// # Returns
/// * `Ok(DiagramType)` - The detected family
/// * `Err` - Empty source or an unknown header keyword
pub fn detect_diagram_type(source: &str) -> Result<DiagramType, Box<dyn Error>> {
    let first = significant_lines(source)
        .next()
        .ok_or("Empty diagram source")?;
    let keyword = first.split_whitespace().next().unwrap_or("");

    match keyword {
        "flowchart" | "graph" => Ok(DiagramType::Flowchart),
        "sequenceDiagram" => Ok(DiagramType::Sequence),
        "classDiagram" | "classDiagram-v2" => Ok(DiagramType::Class),
        "stateDiagram" | "stateDiagram-v2" => Ok(DiagramType::State),
        "erDiagram" => Ok(DiagramType::Er),
        "gantt" => Ok(DiagramType::Gantt),
        "pie" => Ok(DiagramType::Pie),
        "journey" => Ok(DiagramType::Journey),
        "mindmap" => Ok(DiagramType::Mindmap),
        "timeline" => Ok(DiagramType::Timeline),
        other => Err(format!("Unknown diagram type: {other}").into()),
    }
}

/// Extract and parse the `%%{init: ...}%%` directive, if any.
///
/// The payload must be strict JSON; malformed JSON is an error, a missing
/// directive is not.
pub fn extract_init_directive(source: &str) -> Result<Option<serde_json::Value>, Box<dyn Error>> {
    let Some(caps) = INIT_DIRECTIVE_RE.captures(source) else {
        return Ok(None);
    };
    let payload = &caps[1];
    let value: serde_json::Value = serde_json::from_str(payload)
        .map_err(|e| format!("Malformed init directive JSON: {e}"))?;
    Ok(Some(value))
}

/// Inspect a diagram source: family, stats, init directive and block balance.
///
/// # Arguments
/// * `source` - Raw mermaid source text
///
/// # Returns
/// * `Ok(SourceReport)` - The inspection result
pub fn check_source(source: &str) -> Result<SourceReport, Box<dyn Error>> {
    let diagram_type = detect_diagram_type(source)?;
    let init_directive = extract_init_directive(source)?;

    if matches!(diagram_type, DiagramType::Flowchart | DiagramType::State) {
        check_block_balance(source)?;
    }

    Ok(SourceReport {
        diagram_type,
        line_count: source.lines().count(),
        significant_lines: significant_lines(source).count(),
        char_count: source.chars().count(),
        init_directive,
    })
}

/// Verify `subgraph`/`state`-style blocks are balanced by their `end` lines.
fn check_block_balance(source: &str) -> Result<(), Box<dyn Error>> {
    let mut depth: i64 = 0;
    for line in significant_lines(source) {
        let keyword = line.split_whitespace().next().unwrap_or("");
        if keyword == "subgraph" || (keyword == "state" && line.trim_end().ends_with('{')) {
            depth += 1;
        } else if keyword == "end" || line == "}" {
            depth -= 1;
            if depth < 0 {
                return Err("Unmatched block end".into());
            }
        }
    }
    if depth > 0 {
        return Err(format!("{depth} unclosed block(s)").into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_common_types() {
        assert_eq!(
            detect_diagram_type("flowchart TD\n  A-->B\n").unwrap(),
            DiagramType::Flowchart
        );
        assert_eq!(
            detect_diagram_type("graph LR\n  A---B\n").unwrap(),
            DiagramType::Flowchart
        );
        assert_eq!(
            detect_diagram_type("sequenceDiagram\n  Alice->>Bob: hi\n").unwrap(),
            DiagramType::Sequence
        );
        assert_eq!(detect_diagram_type("gantt\n").unwrap(), DiagramType::Gantt);
        assert_eq!(
            detect_diagram_type("pie title Pets\n").unwrap(),
            DiagramType::Pie
        );
    }

    #[test]
    fn test_detect_skips_comments_and_directive() {
        let source = "%% a comment\n%%{init: {\"theme\":\"dark\"}}%%\nflowchart TD\n  A-->B\n";
        assert_eq!(
            detect_diagram_type(source).unwrap(),
            DiagramType::Flowchart
        );
    }

    #[test]
    fn test_detect_skips_front_matter() {
        let source = "---\ntitle: My chart\n---\nsequenceDiagram\n  A->>B: x\n";
        assert_eq!(detect_diagram_type(source).unwrap(), DiagramType::Sequence);
    }

    #[test]
    fn test_detect_rejects_unknown_and_empty() {
        assert!(detect_diagram_type("bogusDiagram\n").is_err());
        assert!(detect_diagram_type("\n\n%% only comments\n").is_err());
    }

    #[test]
    fn test_init_directive() {
        let source = "%%{init: {\"theme\": \"forest\", \"look\": \"classic\"}}%%\nflowchart TD\n";
        let value = extract_init_directive(source).unwrap().unwrap();
        assert_eq!(value["theme"], "forest");

        assert!(extract_init_directive("flowchart TD\n").unwrap().is_none());

        let bad = "%%{init: {theme: forest}}%%\nflowchart TD\n";
        let err = extract_init_directive(bad).unwrap_err().to_string();
        assert!(err.contains("Malformed init directive"), "got: {err}");
    }

    #[test]
    fn test_check_source_balanced() {
        let source = "flowchart TD\n  subgraph one\n    A-->B\n  end\n  B-->C\n";
        let report = check_source(source).unwrap();
        assert_eq!(report.diagram_type, DiagramType::Flowchart);
        assert_eq!(report.line_count, 5);
        assert_eq!(report.significant_lines, 5);
        assert!(report.init_directive.is_none());
    }

    #[test]
    fn test_check_source_unbalanced() {
        let unclosed = "flowchart TD\n  subgraph one\n    A-->B\n";
        assert!(check_source(unclosed).is_err());

        let stray = "flowchart TD\n  A-->B\n  end\n";
        let err = check_source(stray).unwrap_err().to_string();
        assert!(err.contains("Unmatched"), "got: {err}");
    }

    #[test]
    fn test_check_source_sequence_ignores_end() {
        // sequence diagrams use end for loops; no subgraph balance enforced
        let source = "sequenceDiagram\n  loop retry\n    A->>B: ping\n  end\n";
        assert!(check_source(source).is_ok());
    }
}
