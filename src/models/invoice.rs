//! Invoice document model.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::error::Error;

/// A party on an invoice (seller or buyer).
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Party {
    /// Display name.
    pub name: String,
    /// Postal address lines.
    #[serde(default)]
    pub address: Vec<String>,
    /// Contact email.
    pub email: Option<String>,
    /// VAT or tax registration number.
    pub vat_id: Option<String>,
}

/// A single invoice line.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LineItem {
    /// What is being billed.
    pub description: String,
    /// Billed quantity.
    pub quantity: Decimal,
    /// Price per unit, pre-tax.
    pub unit_price: Decimal,
    /// Line discount in percent (0-100).
    #[serde(default)]
    pub discount_pct: Decimal,
    /// Tax rate in percent applied to the discounted net.
    #[serde(default)]
    pub tax_rate: Decimal,
}

/// An invoice document as loaded from or saved to JSON.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Invoice {
    /// Invoice number, free-form.
    pub number: String,
    /// Issue date.
    pub issued: NaiveDate,
    /// Due date.
    pub due: NaiveDate,
    /// ISO 4217 currency code used for display only.
    pub currency: String,
    /// Issuing party.
    pub seller: Party,
    /// Billed party.
    pub buyer: Party,
    /// Billed lines.
    pub items: Vec<LineItem>,
    /// Free-form footer notes.
    pub notes: Option<String>,
}

impl Invoice {
    /// Validate field ranges before any totals are computed.
    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        if self.number.trim().is_empty() {
            return Err("Invoice number must not be empty".into());
        }
        if self.due < self.issued {
            return Err(format!(
                "Due date {} is before issue date {}",
                self.due, self.issued
            )
            .into());
        }
        if self.items.is_empty() {
            return Err("Invoice has no line items".into());
        }
        let hundred = Decimal::from(100);
        for (i, item) in self.items.iter().enumerate() {
            if item.quantity < Decimal::ZERO {
                return Err(format!("Line {} has a negative quantity", i + 1).into());
            }
            if item.unit_price < Decimal::ZERO {
                return Err(format!("Line {} has a negative unit price", i + 1).into());
            }
            if item.discount_pct < Decimal::ZERO || item.discount_pct > hundred {
                return Err(format!("Line {} discount must be within 0-100%", i + 1).into());
            }
            if item.tax_rate < Decimal::ZERO {
                return Err(format!("Line {} has a negative tax rate", i + 1).into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_invoice() -> Invoice {
        Invoice {
            number: "INV-001".to_string(),
            issued: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            due: NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
            currency: "EUR".to_string(),
            seller: Party {
                name: "Acme Ltd".to_string(),
                ..Default::default()
            },
            buyer: Party {
                name: "Customer GmbH".to_string(),
                ..Default::default()
            },
            items: vec![LineItem {
                description: "Consulting".to_string(),
                quantity: "2".parse().unwrap(),
                unit_price: "100.00".parse().unwrap(),
                discount_pct: Decimal::ZERO,
                tax_rate: "19".parse().unwrap(),
            }],
            notes: None,
        }
    }

    #[test]
    fn test_validate_ok() {
        assert!(sample_invoice().validate().is_ok());
    }

    #[test]
    fn test_validate_due_before_issued() {
        let mut inv = sample_invoice();
        inv.due = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let err = inv.validate().unwrap_err().to_string();
        assert!(err.contains("before issue date"), "got: {err}");
    }

    #[test]
    fn test_validate_bad_lines() {
        let mut inv = sample_invoice();
        inv.items[0].quantity = "-1".parse().unwrap();
        assert!(inv.validate().is_err());

        let mut inv = sample_invoice();
        inv.items[0].discount_pct = "120".parse().unwrap();
        assert!(inv.validate().is_err());

        let mut inv = sample_invoice();
        inv.items.clear();
        assert!(inv.validate().is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let inv = sample_invoice();
        let json = serde_json::to_string(&inv).unwrap();
        let back: Invoice = serde_json::from_str(&json).unwrap();
        assert_eq!(back.number, "INV-001");
        assert_eq!(back.items.len(), 1);
        assert_eq!(back.issued, inv.issued);
    }
}
