//! Plain-text invoice statement rendering.
//!
//! A fixed-width text layout of an invoice and its totals. Deliberately not
//! a PDF: the document is meant for terminals, mail bodies and logs.

use crate::models::{Invoice, LineItem};
use crate::processing::InvoiceTotals;
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt::Write as _;

use super::terminal::pad_label;

const LINE_WIDTH: usize = 72;

/// Render an invoice and its totals as a plain-text statement.
///
/// # Arguments
/// * `invoice` - The invoice document
/// * `totals` - Totals computed by the invoice tool
pub fn render_statement(invoice: &Invoice, totals: &InvoiceTotals) -> String {
    let mut out = String::new();
    let rule = "=".repeat(LINE_WIDTH);
    let thin_rule = "-".repeat(LINE_WIDTH);

    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "INVOICE {}", invoice.number);
    let _ = writeln!(
        out,
        "Issued {issued}    Due {due}    Currency {cur}",
        issued = invoice.issued,
        due = invoice.due,
        cur = invoice.currency
    );
    let _ = writeln!(out, "{rule}");

    let _ = writeln!(out, "From: {}", invoice.seller.name);
    for line in &invoice.seller.address {
        let _ = writeln!(out, "      {line}");
    }
    if let Some(vat) = &invoice.seller.vat_id {
        let _ = writeln!(out, "      VAT {vat}");
    }
    let _ = writeln!(out, "To:   {}", invoice.buyer.name);
    for line in &invoice.buyer.address {
        let _ = writeln!(out, "      {line}");
    }
    let _ = writeln!(out, "{thin_rule}");

    let _ = writeln!(
        out,
        "{desc} {qty:>8} {price:>10} {disc:>6} {tax:>5} {amount:>12}",
        desc = pad_label("Description", 26),
        qty = "Qty",
        price = "Unit",
        disc = "Disc%",
        tax = "Tax%",
        amount = "Amount"
    );
    for item in &invoice.items {
        let _ = writeln!(
            out,
            "{desc} {qty:>8} {price:>10} {disc:>6} {tax:>5} {amount:>12}",
            desc = pad_label(&item.description, 26),
            qty = item.quantity,
            price = money(item.unit_price),
            disc = item.discount_pct,
            tax = item.tax_rate,
            amount = money(line_net(item)),
        );
    }
    let _ = writeln!(out, "{thin_rule}");

    let _ = writeln!(out, "{:>60} {:>11}", "Subtotal:", money(totals.subtotal));
    if totals.discount_total > Decimal::ZERO {
        let _ = writeln!(
            out,
            "{:>60} {:>11}",
            "Discounts:",
            money(-totals.discount_total)
        );
    }
    for tax_line in &totals.tax_breakdown {
        let _ = writeln!(
            out,
            "{:>60} {:>11}",
            format!("Tax {}% on {}:", tax_line.rate, money(tax_line.base)),
            money(tax_line.tax)
        );
    }
    let _ = writeln!(
        out,
        "{:>60} {:>11}",
        format!("Total ({}):", invoice.currency),
        money(totals.grand_total)
    );

    if let Some(notes) = &invoice.notes {
        let _ = writeln!(out, "{thin_rule}");
        let _ = writeln!(out, "{notes}");
    }
    let _ = writeln!(out, "{rule}");

    out
}

/// Discounted net for a line, mirroring the totals computation.
fn line_net(item: &LineItem) -> Decimal {
    let hundred = Decimal::from(100);
    let gross = round2(item.quantity * item.unit_price);
    gross - round2(gross * item.discount_pct / hundred)
}

fn round2(d: Decimal) -> Decimal {
    d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format an amount with exactly two decimals.
fn money(d: Decimal) -> String {
    format!("{:.2}", d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Party;
    use crate::processing::compute_totals;
    use chrono::NaiveDate;

    fn sample() -> Invoice {
        Invoice {
            number: "INV-042".to_string(),
            issued: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
            due: NaiveDate::from_ymd_opt(2026, 5, 15).unwrap(),
            currency: "EUR".to_string(),
            seller: Party {
                name: "Acme Ltd".to_string(),
                address: vec!["1 Main St".to_string()],
                email: None,
                vat_id: Some("DE123456789".to_string()),
            },
            buyer: Party {
                name: "Customer GmbH".to_string(),
                ..Default::default()
            },
            items: vec![LineItem {
                description: "Consulting".to_string(),
                quantity: "2".parse().unwrap(),
                unit_price: "100.00".parse().unwrap(),
                discount_pct: "10".parse().unwrap(),
                tax_rate: "19".parse().unwrap(),
            }],
            notes: Some("Payable within 14 days.".to_string()),
        }
    }

    #[test]
    fn test_render_statement_contains_everything() {
        let invoice = sample();
        let totals = compute_totals(&invoice).unwrap();
        let text = render_statement(&invoice, &totals);

        assert!(text.contains("INVOICE INV-042"));
        assert!(text.contains("Acme Ltd"));
        assert!(text.contains("VAT DE123456789"));
        assert!(text.contains("Consulting"));
        assert!(text.contains("180.00"), "discounted net line: {text}");
        assert!(text.contains("Subtotal:"));
        assert!(text.contains("Tax 19%"));
        assert!(text.contains("Total (EUR):"));
        assert!(text.contains("214.20"), "grand total: {text}");
        assert!(text.contains("Payable within 14 days."));
    }

    #[test]
    fn test_render_statement_skips_zero_discount_row() {
        let mut invoice = sample();
        invoice.items[0].discount_pct = Decimal::ZERO;
        let totals = compute_totals(&invoice).unwrap();
        let text = render_statement(&invoice, &totals);
        assert!(!text.contains("Discounts:"));
    }
}
