//! Invoice totals computation.
//!
//! Pure arithmetic over an [`Invoice`]: line nets, discounts, per-rate tax
//! breakdown and the grand total. Layout concerns live in the output module.

use crate::models::Invoice;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;

/// Tax accumulated for one rate.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TaxLine {
    /// Tax rate in percent.
    pub rate: Decimal,
    /// Discounted net the rate applies to.
    pub base: Decimal,
    /// Tax amount.
    pub tax: Decimal,
}

/// Computed totals for an invoice.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct InvoiceTotals {
    /// Sum of line gross amounts (quantity x unit price).
    pub subtotal: Decimal,
    /// Sum of line discounts.
    pub discount_total: Decimal,
    /// Sum of line taxes.
    pub tax_total: Decimal,
    /// subtotal - discounts + taxes.
    pub grand_total: Decimal,
    /// Tax grouped by rate, ascending.
    pub tax_breakdown: Vec<TaxLine>,
}

/// Round money half-away-from-zero to 2 decimals.
fn round_money(d: Decimal) -> Decimal {
    d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Compute all totals for an invoice.
///
/// Per line: gross = quantity x unit price, discount on the gross, tax on
/// the discounted net. Rounding happens at the line level so printed lines
/// always sum to the printed totals.
///
/// # Arguments
/// * `invoice` - The invoice, validated before any arithmetic
///
/// # Returns
/// * `Ok(InvoiceTotals)` - The computed totals
pub fn compute_totals(invoice: &Invoice) -> Result<InvoiceTotals, Box<dyn Error>> {
    invoice.validate()?;

    let hundred = Decimal::from(100);
    let mut subtotal = Decimal::ZERO;
    let mut discount_total = Decimal::ZERO;
    let mut tax_total = Decimal::ZERO;
    let mut by_rate: BTreeMap<Decimal, (Decimal, Decimal)> = BTreeMap::new();

    for item in &invoice.items {
        let gross = round_money(item.quantity * item.unit_price);
        let discount = round_money(gross * item.discount_pct / hundred);
        let net = gross - discount;
        let tax = round_money(net * item.tax_rate / hundred);

        subtotal += gross;
        discount_total += discount;
        tax_total += tax;

        let slot = by_rate
            .entry(item.tax_rate.normalize())
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        slot.0 += net;
        slot.1 += tax;
    }

    let tax_breakdown = by_rate
        .into_iter()
        .map(|(rate, (base, tax))| TaxLine { rate, base, tax })
        .collect();

    let totals = InvoiceTotals {
        subtotal,
        discount_total,
        tax_total,
        grand_total: subtotal - discount_total + tax_total,
        tax_breakdown,
    };
    log::info!(
        "invoice {}: subtotal={} tax={} total={}",
        invoice.number,
        totals.subtotal,
        totals.tax_total,
        totals.grand_total
    );
    Ok(totals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LineItem, Party};
    use chrono::NaiveDate;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn invoice(items: Vec<LineItem>) -> Invoice {
        Invoice {
            number: "INV-100".to_string(),
            issued: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
            due: NaiveDate::from_ymd_opt(2026, 4, 30).unwrap(),
            currency: "EUR".to_string(),
            seller: Party {
                name: "Seller".to_string(),
                ..Default::default()
            },
            buyer: Party {
                name: "Buyer".to_string(),
                ..Default::default()
            },
            items,
            notes: None,
        }
    }

    fn item(qty: &str, price: &str, discount: &str, rate: &str) -> LineItem {
        LineItem {
            description: "work".to_string(),
            quantity: dec(qty),
            unit_price: dec(price),
            discount_pct: dec(discount),
            tax_rate: dec(rate),
        }
    }

    #[test]
    fn test_totals_single_line() {
        let totals = compute_totals(&invoice(vec![item("2", "100.00", "0", "19")])).unwrap();
        assert_eq!(totals.subtotal, dec("200.00"));
        assert_eq!(totals.discount_total, dec("0.00"));
        assert_eq!(totals.tax_total, dec("38.00"));
        assert_eq!(totals.grand_total, dec("238.00"));
        assert_eq!(totals.tax_breakdown.len(), 1);
        assert_eq!(totals.tax_breakdown[0].rate, dec("19"));
    }

    #[test]
    fn test_totals_discount_applies_before_tax() {
        // 100 gross, 10% discount -> 90 net, 19% tax on the net
        let totals = compute_totals(&invoice(vec![item("1", "100.00", "10", "19")])).unwrap();
        assert_eq!(totals.discount_total, dec("10.00"));
        assert_eq!(totals.tax_total, dec("17.10"));
        assert_eq!(totals.grand_total, dec("107.10"));
    }

    #[test]
    fn test_totals_mixed_rates_grouped() {
        let totals = compute_totals(&invoice(vec![
            item("1", "100.00", "0", "19"),
            item("1", "50.00", "0", "7"),
            item("2", "25.00", "0", "19"),
        ]))
        .unwrap();
        assert_eq!(totals.tax_breakdown.len(), 2, "two distinct rates");
        assert_eq!(totals.tax_breakdown[0].rate, dec("7"));
        assert_eq!(totals.tax_breakdown[0].tax, dec("3.50"));
        assert_eq!(totals.tax_breakdown[1].rate, dec("19"));
        assert_eq!(totals.tax_breakdown[1].base, dec("150.00"));
        assert_eq!(totals.tax_breakdown[1].tax, dec("28.50"));
        assert_eq!(totals.grand_total, dec("232.00"));
    }

    #[test]
    fn test_totals_line_level_rounding() {
        // 3 x 0.333 = 0.999 -> 1.00 at the line, not after summing
        let totals = compute_totals(&invoice(vec![
            item("3", "0.333", "0", "0"),
            item("3", "0.333", "0", "0"),
        ]))
        .unwrap();
        assert_eq!(totals.subtotal, dec("2.00"));
    }

    #[test]
    fn test_totals_fractional_quantity() {
        let totals = compute_totals(&invoice(vec![item("1.5", "80.00", "0", "20")])).unwrap();
        assert_eq!(totals.subtotal, dec("120.00"));
        assert_eq!(totals.tax_total, dec("24.00"));
        assert_eq!(totals.grand_total, dec("144.00"));
    }

    #[test]
    fn test_totals_rejects_invalid_invoice() {
        let mut inv = invoice(vec![item("1", "10.00", "0", "0")]);
        inv.items[0].unit_price = dec("-1");
        assert!(compute_totals(&inv).is_err());
    }
}
