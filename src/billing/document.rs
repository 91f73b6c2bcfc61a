//! Plain-text estimate rendering.

use std::fmt::Write as _;

use crate::billing::calculator::FinalizedBill;
use crate::billing::item::Unit;
use crate::currency::{format_currency_value, format_date, format_number, CurrencyCode, LocaleConfig};

const RULE_WIDTH: usize = 72;

/// File name offered when exporting the estimate for `bill_number`.
pub fn export_file_name(bill_number: &str) -> String {
    let safe: String = bill_number
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
                ch
            } else {
                '_'
            }
        })
        .collect();
    format!("interior-bill-{safe}.txt")
}

/// Renders a printable estimate for `bill`.
pub fn render_estimate(bill: &FinalizedBill, locale: &LocaleConfig, currency: &CurrencyCode) -> String {
    let money = |value: f64| format_currency_value(value, currency, locale);
    let header = bill.header();
    let rule = "=".repeat(RULE_WIDTH);
    let thin = "-".repeat(RULE_WIDTH);
    let mut out = String::new();

    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "{}", header.company.name);
    let _ = writeln!(out, "{}", header.company.address);
    if !header.company.phones.is_empty() {
        let _ = writeln!(out, "Phone: {}", header.company.phones.join(", "));
    }
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "ESTIMATE");
    let _ = writeln!(out, "Bill No : {}", header.bill_number);
    let _ = writeln!(out, "Date    : {}", format_date(locale, header.bill_date));
    let _ = writeln!(out, "Customer: {}", header.customer_name);
    let _ = writeln!(out, "{thin}");

    for (idx, item) in bill.items().iter().enumerate() {
        let _ = writeln!(out, "{:>2}. {}", idx + 1, item.particular);
        if !item.description.is_empty() {
            let _ = writeln!(out, "    {}", item.description);
        }
        match (item.unit(), item.computed_area()) {
            (Unit::Sft, Some(area)) => {
                let _ = writeln!(
                    out,
                    "    {} x {} = {} Sft @ {} per Sft",
                    format_number(locale, item.width(), 2),
                    format_number(locale, item.height(), 2),
                    format_number(locale, area, 2),
                    money(item.price_per_unit())
                );
            }
            _ => {
                let _ = writeln!(out, "    Lump sum");
            }
        }
        let _ = writeln!(out, "    Amount: {}", money(item.total()));
    }

    let _ = writeln!(out, "{thin}");
    let _ = writeln!(out, "Grand Total: {}", money(bill.grand_total()));
    let _ = writeln!(out, "{thin}");

    if !bill.payment_terms().is_empty() {
        let _ = writeln!(out, "Payment Schedule");
        for term in bill.payment_terms() {
            let share = if term.is_token() {
                "Token".to_string()
            } else {
                format!("{}%", format_number(locale, term.percentage(), 0))
            };
            let _ = writeln!(out, "  {:<52} {:>6}  {}", term.stage, share, money(term.amount()));
        }
        let _ = writeln!(out, "{thin}");
    }

    if !header.terms_and_conditions.is_empty() {
        let _ = writeln!(out, "Terms & Conditions");
        for (idx, clause) in header.terms_and_conditions.iter().enumerate() {
            let _ = writeln!(out, "{:>3}. {}", idx + 1, clause);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::{BillCalculator, BillDraft, ItemField};
    use chrono::NaiveDate;

    #[test]
    fn estimate_lists_items_schedule_and_terms() {
        let mut draft = BillDraft::with_defaults(NaiveDate::from_ymd_opt(2024, 4, 9).unwrap());
        draft.set_bill_number("17").unwrap();
        draft.set_customer_name("Lakshmi").unwrap();
        draft.set_item_field(0, ItemField::Particular, "Wardrobe").unwrap();
        draft.set_item_field(0, ItemField::Width, "20").unwrap();
        draft.set_item_field(0, ItemField::Height, "10").unwrap();
        let bill = BillCalculator::finalize_bill(&draft).unwrap();

        let text = render_estimate(&bill, &LocaleConfig::default(), &CurrencyCode::default());
        assert!(text.contains("JK INTERIOR'S"));
        assert!(text.contains("Customer: Lakshmi"));
        assert!(text.contains("200.00 Sft"));
        assert!(text.contains("Grand Total: ₹2,50,000.00"));
        assert!(text.contains("₹1,25,000.00"));
        assert!(text.contains("  1. It will take 2 days"));
    }

    #[test]
    fn export_name_is_filesystem_safe() {
        assert_eq!(export_file_name("B/12"), "interior-bill-B_12.txt");
        assert_eq!(export_file_name("42"), "interior-bill-42.txt");
    }
}
