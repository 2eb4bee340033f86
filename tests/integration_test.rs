//! Integration tests for ops-toolbox
//!
//! These tests verify complete tool workflows over the checked-in fixtures.

use ops_toolbox::models::Ipv4;
use ops_toolbox::processing::{
    allocate, check_against_existing, check_source, compute_totals, find_collisions, summarize,
    DiagramType, NamedCidr, VlsmRequest,
};
use ops_toolbox::{diff_env_files, load_invoice};
use std::path::Path;

fn req(name: &str, hosts: u64) -> VlsmRequest {
    VlsmRequest {
        name: name.to_string(),
        hosts,
    }
}

#[test]
fn test_vlsm_workflow_accounts_for_whole_base() {
    let base = Ipv4::new("10.10.0.0/22").expect("Failed to parse base");
    let result = allocate(
        base,
        &[req("app", 500), req("db", 100), req("mgmt", 10)],
    )
    .expect("Failed to allocate");

    assert_eq!(result.allocations.len(), 3);
    assert_eq!(result.allocations[0].cidr.to_string(), "10.10.0.0/23");
    assert_eq!(result.allocations[1].cidr.to_string(), "10.10.2.0/25");
    assert_eq!(result.allocations[2].cidr.to_string(), "10.10.2.128/28");

    // allocations plus free blocks must merge back into exactly the base
    let mut all: Vec<Ipv4> = result.allocations.iter().map(|a| a.cidr).collect();
    all.extend(result.free.iter().copied());
    assert_eq!(summarize(&all), vec![base], "base block not fully covered");

    // allocations never overlap each other
    let named: Vec<NamedCidr> = result
        .allocations
        .iter()
        .map(|a| NamedCidr {
            name: a.name.clone(),
            cidr: a.cidr,
        })
        .collect();
    assert!(find_collisions(&named).is_empty(), "allocations overlap");

    // cross-check against an existing subnet that collides
    let existing = vec![NamedCidr {
        name: "legacy".to_string(),
        cidr: Ipv4::new("10.10.1.0/24").unwrap(),
    }];
    let collisions = check_against_existing(&result, &existing);
    assert_eq!(collisions.len(), 1, "Expected the legacy overlap");
    assert_eq!(collisions[0].inner.name, "legacy");
    assert_eq!(collisions[0].outer.name, "app");
}

#[test]
fn test_envdiff_workflow_with_fixtures() {
    let diff = diff_env_files(
        Path::new("src/tests/test_data/env_a.env"),
        Path::new("src/tests/test_data/env_b.env"),
    )
    .expect("Failed to diff env files");

    assert_eq!(diff.stats.added, 1, "CACHE_URL is new");
    assert_eq!(diff.stats.removed, 1, "DEBUG was dropped");
    assert_eq!(diff.stats.changed, 1, "DATABASE_URL moved hosts");
    assert_eq!(diff.stats.unchanged, 3);

    let db = diff
        .entries
        .iter()
        .find(|e| e.key == "DATABASE_URL")
        .expect("DATABASE_URL entry missing");
    assert_eq!(db.old_value.as_deref(), Some("postgres://localhost:5432/app"));
    assert_eq!(
        db.new_value.as_deref(),
        Some("postgres://db.internal:5432/app")
    );

    // masking keeps the verdicts but hides every value
    let masked = diff.masked();
    assert_eq!(masked.stats, diff.stats);
    assert!(masked
        .entries
        .iter()
        .all(|e| e.old_value.as_deref().unwrap_or("********") == "********"));
}

#[test]
fn test_invoice_workflow_with_fixture() {
    let invoice = load_invoice(Path::new("src/tests/test_data/invoice_01.json"))
        .expect("Failed to load invoice");
    let totals = compute_totals(&invoice).expect("Failed to compute totals");

    assert_eq!(totals.subtotal, "3740.00".parse().unwrap());
    assert_eq!(totals.discount_total, "45.00".parse().unwrap());
    assert_eq!(totals.tax_total, "672.05".parse().unwrap());
    assert_eq!(totals.grand_total, "4367.05".parse().unwrap());

    assert_eq!(totals.tax_breakdown.len(), 2, "Expected 7% and 19% groups");
    assert_eq!(totals.tax_breakdown[0].rate, "7".parse().unwrap());
    assert_eq!(totals.tax_breakdown[0].tax, "17.50".parse().unwrap());
    assert_eq!(totals.tax_breakdown[1].rate, "19".parse().unwrap());
    assert_eq!(totals.tax_breakdown[1].base, "3445.00".parse().unwrap());
    assert_eq!(totals.tax_breakdown[1].tax, "654.55".parse().unwrap());

    let statement = ops_toolbox::output::render_statement(&invoice, &totals);
    assert!(statement.contains("INVOICE INV-2026-017"));
    assert!(statement.contains("4367.05"));
}

#[test]
fn test_mermaid_workflow_with_fixture() {
    let source = std::fs::read_to_string("src/tests/test_data/diagram_flow.mmd")
        .expect("Failed to read diagram fixture");
    let report = check_source(&source).expect("Failed to inspect diagram");

    assert_eq!(report.diagram_type, DiagramType::Flowchart);
    assert_eq!(report.line_count, 6);
    assert_eq!(report.significant_lines, 5, "directive and blanks skipped");
    let init = report.init_directive.expect("init directive missing");
    assert_eq!(init["theme"], "dark");
}
