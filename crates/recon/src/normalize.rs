//! Record normalization and validation: resolved fields → `SalesRecord`.

use chrono::{NaiveDate, NaiveDateTime};
use skubridge_core::Marketplace;

use crate::error::RowValidationError;
use crate::headers::{Field, FieldMap};
use crate::model::{RawRow, SalesRecord};

/// Header fragments accepted by the last-resort SKU scan.
const SKU_HINTS: [&str; 4] = ["sku", "asin", "item", "product"];

/// Build a canonical sales record from one resolved row.
///
/// Requirement failures accumulate — the returned error lists every
/// violated rule, not just the first. Numeric and date fields never fail
/// the row; they fall back to field-specific defaults. `row_number` is
/// 1-based and feeds the synthesized order-id fallback; `processed_at` is
/// the timestamp unparseable order dates fall back to.
pub fn normalize(
    fields: &FieldMap,
    row: &RawRow,
    marketplace: Marketplace,
    row_number: usize,
    processed_at: NaiveDateTime,
) -> Result<SalesRecord, RowValidationError> {
    let mut problems = Vec::new();

    let sku = fields
        .get(Field::Sku)
        .map(str::to_string)
        .or_else(|| scan_for_sku(row));
    if sku.is_none() {
        problems
            .push("Missing required field: SKU (also looked for ASIN, Item ID, Product ID)".into());
    }

    let order_id = fields
        .get(Field::OrderId)
        .map(str::to_string)
        .or_else(|| synthesize_order_id(row, row_number));
    if order_id.is_none() {
        problems.push(
            "Missing required field: Order ID (no Date + FNSKU/ASIN fields to synthesize from)"
                .into(),
        );
    }

    let (Some(sku), Some(order_id)) = (sku, order_id) else {
        return Err(RowValidationError { problems });
    };

    let quantity = parse_number(fields.get(Field::Quantity))
        .map(|q| q as i64)
        .unwrap_or(1);
    let unit_price = parse_number(fields.get(Field::UnitPrice)).unwrap_or(0.0);
    let mut total_amount = parse_number(fields.get(Field::TotalAmount)).unwrap_or(0.0);
    let fees = parse_number(fields.get(Field::Fees)).unwrap_or(0.0);

    // Derive total and net when the export leaves them out.
    if total_amount == 0.0 && unit_price != 0.0 && quantity != 0 {
        total_amount = unit_price * quantity as f64;
    }
    let net_amount =
        parse_number(fields.get(Field::NetAmount)).unwrap_or(total_amount - fees);

    let order_date = fields
        .get(Field::OrderDate)
        .and_then(parse_date)
        .unwrap_or(processed_at);

    let product_name = fields
        .get(Field::ProductName)
        .filter(|name| !name.trim().is_empty())
        .unwrap_or(&sku)
        .to_string();

    let status = fields
        .get(Field::Status)
        .filter(|s| !s.trim().is_empty())
        .unwrap_or("pending")
        .to_string();

    Ok(SalesRecord {
        order_id,
        marketplace,
        sku,
        msku: None,
        product_name,
        quantity,
        unit_price,
        total_amount,
        fees,
        net_amount,
        order_date,
        status,
    })
}

/// Last-resort SKU hunt: first raw header containing a SKU-ish fragment,
/// case-insensitive, in column order.
fn scan_for_sku(row: &RawRow) -> Option<String> {
    for (header, value) in row.iter() {
        if value.trim().is_empty() {
            continue;
        }
        let header = header.to_lowercase();
        if SKU_HINTS.iter().any(|hint| header.contains(hint)) {
            return Some(value.to_string());
        }
    }
    None
}

/// Fallback order id: `{date}-{fnsku-or-asin}-{row_number}`. The row number
/// keeps duplicates apart when a file repeats a date/SKU pair.
fn synthesize_order_id(row: &RawRow, row_number: usize) -> Option<String> {
    let date = row.get_ci("Date").filter(|v| !v.trim().is_empty())?;
    let id = row
        .get_ci("FNSKU")
        .filter(|v| !v.trim().is_empty())
        .or_else(|| row.get_ci("ASIN").filter(|v| !v.trim().is_empty()))?;
    Some(format!("{}-{}-{row_number}", date.trim(), id.trim()))
}

/// Parse a numeric cell, tolerating currency symbols and thousands
/// separators. `None` for absent or unparseable values; callers supply the
/// field-specific default.
fn parse_number(value: Option<&str>) -> Option<f64> {
    let cleaned: String = value?
        .chars()
        .filter(|c| !matches!(c, '$' | '£' | '€' | '¥' | ',') && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%d-%m-%Y"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%m/%d/%Y %H:%M"];

fn parse_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }
    chrono::DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.naive_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IngestConfig;
    use crate::headers;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn run(row: RawRow, marketplace: Marketplace, n: usize) -> Result<SalesRecord, RowValidationError> {
        let fields = headers::resolve(&row, marketplace, &IngestConfig::default());
        normalize(&fields, &row, marketplace, n, at(2024, 6, 1))
    }

    #[test]
    fn derived_totals() {
        let row = RawRow::from_pairs(vec![
            ("Order ID", "o-1"),
            ("SKU", "AB-1234"),
            ("Quantity", "3"),
            ("Unit Price", "10"),
            ("Fees", "2"),
        ]);
        let record = run(row, Marketplace::Other, 1).unwrap();
        assert_eq!(record.total_amount, 30.0);
        assert_eq!(record.net_amount, 28.0);
    }

    #[test]
    fn explicit_totals_win_over_derivation() {
        let row = RawRow::from_pairs(vec![
            ("Order ID", "o-1"),
            ("SKU", "AB-1234"),
            ("Quantity", "3"),
            ("Unit Price", "10"),
            ("Total", "25"),
            ("Fees", "2"),
            ("Net Amount", "20"),
        ]);
        let record = run(row, Marketplace::Other, 1).unwrap();
        assert_eq!(record.total_amount, 25.0);
        assert_eq!(record.net_amount, 20.0);
    }

    #[test]
    fn currency_symbols_and_separators_stripped() {
        let row = RawRow::from_pairs(vec![
            ("Order ID", "o-1"),
            ("SKU", "AB-1234"),
            ("Quantity", "1"),
            ("Unit Price", "$1,234.56"),
            ("Fees", "£10.00"),
        ]);
        let record = run(row, Marketplace::Other, 1).unwrap();
        assert_eq!(record.unit_price, 1234.56);
        assert_eq!(record.fees, 10.0);
        assert_eq!(record.total_amount, 1234.56);
    }

    #[test]
    fn unparseable_numbers_use_defaults() {
        let row = RawRow::from_pairs(vec![
            ("Order ID", "o-1"),
            ("SKU", "AB-1234"),
            ("Quantity", "many"),
            ("Unit Price", "n/a"),
        ]);
        let record = run(row, Marketplace::Other, 1).unwrap();
        assert_eq!(record.quantity, 1);
        assert_eq!(record.unit_price, 0.0);
        assert_eq!(record.total_amount, 0.0);
    }

    #[test]
    fn fallback_order_id_from_date_and_asin() {
        let row = RawRow::from_pairs(vec![
            ("Date", "2024-01-01"),
            ("ASIN", "B0123456789"),
            ("SKU", "AB-1234"),
        ]);
        let record = run(row, Marketplace::Amazon, 7).unwrap();
        assert_eq!(record.order_id, "2024-01-01-B0123456789-7");
    }

    #[test]
    fn fnsku_preferred_over_asin_for_fallback() {
        let row = RawRow::from_pairs(vec![
            ("Date", "2024-01-01"),
            ("FNSKU", "X001ABC"),
            ("ASIN", "B0123456789"),
            ("SKU", "AB-1234"),
        ]);
        let record = run(row, Marketplace::Amazon, 2).unwrap();
        assert_eq!(record.order_id, "2024-01-01-X001ABC-2");
    }

    #[test]
    fn missing_sku_fails_with_named_fallbacks() {
        let row = RawRow::from_pairs(vec![("Order ID", "o-1"), ("Color", "red")]);
        let err = run(row, Marketplace::Other, 1).unwrap_err();
        assert_eq!(err.problems.len(), 1);
        assert_eq!(
            err.problems[0],
            "Missing required field: SKU (also looked for ASIN, Item ID, Product ID)"
        );
    }

    #[test]
    fn all_problems_reported_in_one_pass() {
        let row = RawRow::from_pairs(vec![("Color", "red")]);
        let err = run(row, Marketplace::Other, 1).unwrap_err();
        assert_eq!(err.problems.len(), 2);
        assert!(err.problems[0].contains("SKU"));
        assert!(err.problems[1].contains("Order ID"));
    }

    #[test]
    fn sku_scan_accepts_item_and_product_headers() {
        let row = RawRow::from_pairs(vec![("Order ID", "o-1"), ("Item Number", "IT-0099")]);
        let record = run(row, Marketplace::Other, 1).unwrap();
        assert_eq!(record.sku, "IT-0099");
    }

    #[test]
    fn unparseable_date_falls_back_to_processing_time() {
        let row = RawRow::from_pairs(vec![
            ("Order ID", "o-1"),
            ("SKU", "AB-1234"),
            ("Order Date", "sometime last week"),
        ]);
        let record = run(row, Marketplace::Other, 1).unwrap();
        assert_eq!(record.order_date, at(2024, 6, 1));
    }

    #[test]
    fn common_date_formats_accepted() {
        for (input, expected) in [
            ("2024-01-05", at(2024, 1, 5)),
            ("01/05/2024", at(2024, 1, 5)),
            ("2024/01/05", at(2024, 1, 5)),
        ] {
            assert_eq!(parse_date(input), Some(expected), "{input}");
        }
        assert_eq!(
            parse_date("2024-01-05T08:30:00"),
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap().and_hms_opt(8, 30, 0)
        );
    }

    #[test]
    fn product_name_defaults_to_sku() {
        let row = RawRow::from_pairs(vec![("Order ID", "o-1"), ("SKU", "AB-1234")]);
        let record = run(row, Marketplace::Other, 1).unwrap();
        assert_eq!(record.product_name, "AB-1234");
        assert_eq!(record.status, "pending");
    }
}
