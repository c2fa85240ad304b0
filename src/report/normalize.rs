//! Raw table → canonical records.
//!
//! Each pipeline variant declares the columns it requires; a missing column
//! aborts with [`SchemaError`] before any row is touched. Per-row transforms
//! are lossy only for dates: an unparseable DATA becomes `None` and is
//! counted into a non-fatal [`ParseWarning`].

use crate::error::{ParseWarning, SchemaError};
use crate::models::{OrderSale, ProductSale, RawTable};
use chrono::{Datelike, NaiveDate};
use serde_json::{Map, Value};

/// Columns the product pipeline (vwsomelier) requires.
pub const PRODUCT_COLUMNS: [&str; 6] = ["DESCRICAO", "CODPROD", "DATA", "QT", "PVENDA", "VLCUSTOFIN"];

/// Columns the overview pipeline (pcpedc) requires. CODFILIAL is included
/// because the branch filter reads it unconditionally.
pub const ORDER_COLUMNS: [&str; 6] = ["DATA", "VLTOTAL", "NUMPED", "CODCLI", "NOME", "CODFILIAL"];

/// Canonical rows plus any advisories collected along the way.
#[derive(Debug, Clone)]
pub struct Normalized<T> {
    pub records: Vec<T>,
    pub warnings: Vec<ParseWarning>,
}

// ── Cell coercion ─────────────────────────────────────────────────────────────

fn string_cell(row: &Map<String, Value>, column: &str) -> String {
    match row.get(column) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn number_cell(row: &Map<String, Value>, column: &str) -> f64 {
    match row.get(column) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Parse dates in the shapes the API has been seen to emit: ISO date,
/// ISO datetime, RFC 2822 (Flask's jsonify default) and dd/mm/yyyy.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.date());
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc2822(s) {
        return Some(dt.date_naive());
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%d/%m/%Y") {
        return Some(d);
    }

    None
}

fn date_cell(row: &Map<String, Value>, column: &str) -> Option<NaiveDate> {
    match row.get(column) {
        Some(Value::String(s)) => parse_date(s),
        _ => None,
    }
}

// ── Schema check ──────────────────────────────────────────────────────────────

/// A zero-row table has no observable columns and normalizes to an empty
/// output; the check only applies once there is at least one row.
fn check_columns(table: &RawTable, required: &[&str]) -> Result<(), SchemaError> {
    if table.is_empty() {
        return Ok(());
    }

    let missing: Vec<String> = required
        .iter()
        .filter(|col| !table.columns().contains(**col))
        .map(|col| col.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(SchemaError { missing })
    }
}

// ── Product pipeline ──────────────────────────────────────────────────────────

pub fn normalize_products(table: &RawTable) -> Result<Normalized<ProductSale>, SchemaError> {
    check_columns(table, &PRODUCT_COLUMNS)?;

    let mut invalid_dates = 0usize;
    let mut records = Vec::with_capacity(table.len());

    for row in table.rows() {
        let data_pedido = date_cell(row, "DATA");
        if data_pedido.is_none() {
            invalid_dates += 1;
        }

        let preco_venda = number_cell(row, "PVENDA");
        let custo = number_cell(row, "VLCUSTOFIN");

        records.push(ProductSale {
            codigo_produto: string_cell(row, "CODPROD"),
            descricao: string_cell(row, "DESCRICAO"),
            data_pedido,
            quantidade: number_cell(row, "QT"),
            preco_venda,
            custo,
            // Upstream report computes both as per-unit figures (quantity not
            // applied); preserved as-is rather than guessed at. See DESIGN.md.
            valor_total_vendido: preco_venda,
            margem_lucro: preco_venda - custo,
            ano: data_pedido.map(|d| d.year()),
            mes: data_pedido.map(|d| d.month()),
        });
    }

    let mut warnings = Vec::new();
    if invalid_dates > 0 {
        warnings.push(ParseWarning {
            column: "DATA".to_string(),
            invalid_rows: invalid_dates,
        });
    }

    Ok(Normalized { records, warnings })
}

// ── Overview pipeline ─────────────────────────────────────────────────────────

pub fn normalize_orders(table: &RawTable) -> Result<Normalized<OrderSale>, SchemaError> {
    check_columns(table, &ORDER_COLUMNS)?;

    let mut invalid_dates = 0usize;
    let mut records = Vec::with_capacity(table.len());

    for row in table.rows() {
        let data = date_cell(row, "DATA");
        if data.is_none() {
            invalid_dates += 1;
        }

        records.push(OrderSale {
            data,
            valor_total: number_cell(row, "VLTOTAL"),
            numero_pedido: string_cell(row, "NUMPED"),
            codigo_cliente: string_cell(row, "CODCLI"),
            vendedor: string_cell(row, "NOME"),
            filial: string_cell(row, "CODFILIAL"),
        });
    }

    let mut warnings = Vec::new();
    if invalid_dates > 0 {
        warnings.push(ParseWarning {
            column: "DATA".to_string(),
            invalid_rows: invalid_dates,
        });
    }

    Ok(Normalized { records, warnings })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn product_row(desc: &str, cod: &str, data: &str, qt: f64, pv: f64, custo: f64) -> Map<String, Value> {
        let mut row = Map::new();
        row.insert("DESCRICAO".into(), json!(desc));
        row.insert("CODPROD".into(), json!(cod));
        row.insert("DATA".into(), json!(data));
        row.insert("QT".into(), json!(qt));
        row.insert("PVENDA".into(), json!(pv));
        row.insert("VLCUSTOFIN".into(), json!(custo));
        row
    }

    #[test]
    fn test_missing_columns_listed_exactly() {
        let mut row = Map::new();
        row.insert("DESCRICAO".into(), json!("Vinho"));
        row.insert("CODPROD".into(), json!("10"));
        row.insert("PVENDA".into(), json!(12.0));
        let table = RawTable::from_rows(vec![row]);

        let err = normalize_products(&table).unwrap_err();
        assert_eq!(err.missing, vec!["DATA", "QT", "VLCUSTOFIN"]);
    }

    #[test]
    fn test_empty_table_is_not_a_schema_error() {
        let table = RawTable::empty();
        let out = normalize_products(&table).unwrap();
        assert!(out.records.is_empty());
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_derived_columns_are_per_unit() {
        let table = RawTable::from_rows(vec![product_row(
            "  Vinho Tinto  ",
            " 1234 ",
            "2024-03-05",
            6.0,
            50.0,
            30.0,
        )]);

        let out = normalize_products(&table).unwrap();
        let rec = &out.records[0];
        assert_eq!(rec.descricao, "Vinho Tinto");
        assert_eq!(rec.codigo_produto, "1234");
        // Quantity deliberately not applied.
        assert_eq!(rec.valor_total_vendido, 50.0);
        assert_eq!(rec.margem_lucro, 20.0);
        assert_eq!(rec.ano, Some(2024));
        assert_eq!(rec.mes, Some(3));
    }

    #[test]
    fn test_bad_dates_become_null_with_warning() {
        let table = RawTable::from_rows(vec![
            product_row("A", "1", "2024-01-10", 1.0, 10.0, 5.0),
            product_row("B", "2", "not-a-date", 1.0, 10.0, 5.0),
            product_row("C", "3", "", 1.0, 10.0, 5.0),
        ]);

        let out = normalize_products(&table).unwrap();
        assert_eq!(out.records.len(), 3);
        assert!(out.records[1].data_pedido.is_none());
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.warnings[0].column, "DATA");
        assert_eq!(out.warnings[0].invalid_rows, 2);
    }

    #[test]
    fn test_date_formats() {
        assert_eq!(parse_date("2024-02-20"), NaiveDate::from_ymd_opt(2024, 2, 20));
        assert_eq!(parse_date("2024-02-20T13:45:00"), NaiveDate::from_ymd_opt(2024, 2, 20));
        assert_eq!(
            parse_date("Tue, 20 Feb 2024 00:00:00 GMT"),
            NaiveDate::from_ymd_opt(2024, 2, 20)
        );
        assert_eq!(parse_date("20/02/2024"), NaiveDate::from_ymd_opt(2024, 2, 20));
        assert_eq!(parse_date("N/A"), None);
    }

    #[test]
    fn test_orders_numeric_codes_become_strings() {
        let mut row = Map::new();
        row.insert("DATA".into(), json!("2024-01-02"));
        row.insert("VLTOTAL".into(), json!(150.5));
        row.insert("NUMPED".into(), json!(98765));
        row.insert("CODCLI".into(), json!(42));
        row.insert("NOME".into(), json!("  MARIA  "));
        row.insert("CODFILIAL".into(), json!("2"));
        let table = RawTable::from_rows(vec![row]);

        let out = normalize_orders(&table).unwrap();
        let rec = &out.records[0];
        assert_eq!(rec.numero_pedido, "98765");
        assert_eq!(rec.codigo_cliente, "42");
        assert_eq!(rec.vendedor, "MARIA");
        assert_eq!(rec.valor_total, 150.5);
    }

    #[test]
    fn test_column_names_are_trimmed_before_check() {
        let mut row = Map::new();
        row.insert(" DATA ".into(), json!("2024-01-02"));
        row.insert("VLTOTAL".into(), json!(1.0));
        row.insert("NUMPED".into(), json!("1"));
        row.insert("CODCLI".into(), json!("1"));
        row.insert("NOME".into(), json!("A"));
        row.insert("CODFILIAL".into(), json!("1"));
        let table = RawTable::from_rows(vec![row]);

        assert!(normalize_orders(&table).is_ok());
    }
}
