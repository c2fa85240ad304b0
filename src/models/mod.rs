use chrono::NaiveDate;
use serde_json::{Map, Value};
use std::collections::BTreeSet;

// ── Raw API table ─────────────────────────────────────────────────────────────

/// Rows exactly as decoded from the API, one `Map` per JSON object.
///
/// Lives for a single fetch cycle. The column set is the union of keys across
/// all rows; keys are trimmed on construction so schema checks and lookups
/// never trip over stray whitespace in column names.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    columns: BTreeSet<String>,
    rows: Vec<Map<String, Value>>,
}

impl RawTable {
    pub fn from_rows(rows: Vec<Map<String, Value>>) -> Self {
        let rows: Vec<Map<String, Value>> = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|(k, v)| (k.trim().to_string(), v))
                    .collect()
            })
            .collect();

        let mut columns = BTreeSet::new();
        for row in &rows {
            for key in row.keys() {
                columns.insert(key.clone());
            }
        }

        Self { columns, rows }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> &BTreeSet<String> {
        &self.columns
    }

    pub fn rows(&self) -> &[Map<String, Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ── Canonical records ─────────────────────────────────────────────────────────

/// One product-sale line from the vwsomelier endpoint, after normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductSale {
    pub codigo_produto: String,
    pub descricao: String,
    /// `None` when the source DATA value failed to parse (non-fatal).
    pub data_pedido: Option<NaiveDate>,
    pub quantidade: f64,
    pub preco_venda: f64,
    pub custo: f64,
    /// Carried over verbatim from the upstream report: both derived columns
    /// are per-unit figures, quantity is NOT applied. See DESIGN.md.
    pub valor_total_vendido: f64,
    pub margem_lucro: f64,
    pub ano: Option<i32>,
    pub mes: Option<u32>,
}

/// One order header from the pcpedc endpoint, after normalization.
/// Feeds the overview page: KPI windows and the per-seller table.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSale {
    pub data: Option<NaiveDate>,
    pub valor_total: f64,
    pub numero_pedido: String,
    pub codigo_cliente: String,
    pub vendedor: String,
    pub filial: String,
}

// ── Summary rows ──────────────────────────────────────────────────────────────

/// Product table row: grouped by (code, description).
#[derive(Debug, Clone, PartialEq)]
pub struct ProductSummary {
    pub codigo_produto: String,
    pub descricao: String,
    pub quantidade: f64,
    pub valor_total: f64,
}

/// Top-N chart row: grouped by description alone.
#[derive(Debug, Clone, PartialEq)]
pub struct TopProduct {
    pub descricao: String,
    pub quantidade: f64,
    pub valor_total: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarginSummary {
    pub descricao: String,
    pub margem: f64,
}

/// Sales evolution row: grouped by (year, month).
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySales {
    pub ano: i32,
    pub mes: u32,
    pub quantidade: f64,
    pub valor_total: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SellerSummary {
    pub vendedor: String,
    pub total_vendas: f64,
    pub total_clientes: usize,
    pub total_pedidos: usize,
}
