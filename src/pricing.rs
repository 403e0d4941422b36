// src/pricing.rs
use crate::catalog::{FeeType, PricingField};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Inr,
}

impl Currency {
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Inr => "\u{20b9}",
        }
    }

    /// INR totals carry the GST surcharge note; USD proposals are rendered
    /// without tax lines.
    pub fn gst_note(&self) -> Option<&'static str> {
        match self {
            Currency::Usd => None,
            Currency::Inr => Some(" + 18% GST"),
        }
    }

    pub fn is_tax_exempt(&self) -> bool {
        matches!(self, Currency::Usd)
    }

    /// Fixed annual maintenance fee per currency.
    pub fn annual_fee(&self) -> u64 {
        match self {
            Currency::Usd => 250,
            Currency::Inr => 25_000,
        }
    }
}

/// `1234567` -> `"1,234,567"`.
pub fn format_with_commas(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Render an amount with the currency symbol, e.g. `$12,500`.
pub fn money(currency: Currency, amount: u64) -> String {
    format!("{}{}", currency.symbol(), format_with_commas(amount))
}

/// A line-item amount as it appears in the pricing table: blank when zero so
/// the row pruner drops the row instead of showing a zero-priced line.
pub fn line_value(currency: Currency, amount: u64) -> String {
    if amount > 0 {
        money(currency, amount)
    } else {
        String::new()
    }
}

/// Computed totals for the non-DM proposal families: services sum, the 10%
/// account-management surcharge on top, and the grand total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub services_sum: u64,
    pub am_surcharge: u64,
    pub total: u64,
}

pub fn compute_totals(values: &HashMap<String, u64>) -> Totals {
    let services_sum: u64 = values.values().sum();
    let am_surcharge = services_sum / 10;
    Totals {
        services_sum,
        am_surcharge,
        total: services_sum + am_surcharge,
    }
}

/// Split a total into two instalments by fee type: one-time items are due
/// up front, recurring items fall into the second instalment. Used when the
/// caller did not supply explicit instalment amounts.
pub fn split_instalments(fields: &[PricingField], values: &HashMap<String, u64>) -> (u64, u64) {
    let mut first = 0u64;
    let mut second = 0u64;
    for field in fields {
        let amount = values.get(&field.key).copied().unwrap_or(0);
        match field.fee_type {
            FeeType::OneTime => first += amount,
            FeeType::Recurring => second += amount,
        }
    }
    (first, second)
}
