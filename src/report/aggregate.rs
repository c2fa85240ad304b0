//! Group-and-summarize over canonical records.
//!
//! Grouping uses `BTreeMap` keyed by the dimension, so output order is the
//! key order and the result is independent of input row order. Sums and
//! distinct counts are order-independent too.

use crate::models::{MarginSummary, MonthlySales, OrderSale, ProductSale, ProductSummary, SellerSummary, TopProduct};
use std::collections::{BTreeMap, HashSet};

/// Top-N reports truncate to this many groups after the descending sort.
pub const TOP_N: usize = 20;

/// Stable descending sort by `key`, truncated to `n`. Ties keep the incoming
/// group order.
pub fn top_n_by<T>(mut rows: Vec<T>, n: usize, key: impl Fn(&T) -> f64) -> Vec<T> {
    rows.sort_by(|a, b| {
        key(b)
            .partial_cmp(&key(a))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    rows.truncate(n);
    rows
}

// ── Product dimension ─────────────────────────────────────────────────────────

/// Summary table: grouped by (code, description), sum of quantity and value.
pub fn product_summary(rows: &[ProductSale]) -> Vec<ProductSummary> {
    let mut groups: BTreeMap<(String, String), (f64, f64)> = BTreeMap::new();

    for row in rows {
        let entry = groups
            .entry((row.codigo_produto.clone(), row.descricao.clone()))
            .or_insert((0.0, 0.0));
        entry.0 += row.quantidade;
        entry.1 += row.valor_total_vendido;
    }

    groups
        .into_iter()
        .map(|((codigo_produto, descricao), (quantidade, valor_total))| ProductSummary {
            codigo_produto,
            descricao,
            quantidade,
            valor_total,
        })
        .collect()
}

/// Top sellers chart: grouped by description alone, top `n` by summed value.
pub fn top_products(rows: &[ProductSale], n: usize) -> Vec<TopProduct> {
    let mut groups: BTreeMap<String, (f64, f64)> = BTreeMap::new();

    for row in rows {
        let entry = groups.entry(row.descricao.clone()).or_insert((0.0, 0.0));
        entry.0 += row.quantidade;
        entry.1 += row.valor_total_vendido;
    }

    let summaries: Vec<TopProduct> = groups
        .into_iter()
        .map(|(descricao, (quantidade, valor_total))| TopProduct {
            descricao,
            quantidade,
            valor_total,
        })
        .collect();

    top_n_by(summaries, n, |p| p.valor_total)
}

/// Margin chart: grouped by description, top `n` by summed margin.
pub fn top_margin_products(rows: &[ProductSale], n: usize) -> Vec<MarginSummary> {
    let mut groups: BTreeMap<String, f64> = BTreeMap::new();

    for row in rows {
        *groups.entry(row.descricao.clone()).or_insert(0.0) += row.margem_lucro;
    }

    let summaries: Vec<MarginSummary> = groups
        .into_iter()
        .map(|(descricao, margem)| MarginSummary { descricao, margem })
        .collect();

    top_n_by(summaries, n, |m| m.margem)
}

// ── Period dimension ──────────────────────────────────────────────────────────

/// Sales evolution: grouped by (year, month). Rows whose date failed to parse
/// carry no period and are left out.
pub fn monthly_sales(rows: &[ProductSale]) -> Vec<MonthlySales> {
    let mut groups: BTreeMap<(i32, u32), (f64, f64)> = BTreeMap::new();

    for row in rows {
        let (Some(ano), Some(mes)) = (row.ano, row.mes) else {
            continue;
        };
        let entry = groups.entry((ano, mes)).or_insert((0.0, 0.0));
        entry.0 += row.quantidade;
        entry.1 += row.valor_total_vendido;
    }

    groups
        .into_iter()
        .map(|((ano, mes), (quantidade, valor_total))| MonthlySales {
            ano,
            mes,
            quantidade,
            valor_total,
        })
        .collect()
}

// ── Seller dimension ──────────────────────────────────────────────────────────

/// Per-seller table: summed revenue plus distinct client and order counts.
pub fn seller_summary(rows: &[OrderSale]) -> Vec<SellerSummary> {
    struct Acc<'a> {
        total: f64,
        clientes: HashSet<&'a str>,
        pedidos: HashSet<&'a str>,
    }

    let mut groups: BTreeMap<&str, Acc> = BTreeMap::new();

    for row in rows {
        let acc = groups.entry(row.vendedor.as_str()).or_insert_with(|| Acc {
            total: 0.0,
            clientes: HashSet::new(),
            pedidos: HashSet::new(),
        });
        acc.total += row.valor_total;
        acc.clientes.insert(row.codigo_cliente.as_str());
        acc.pedidos.insert(row.numero_pedido.as_str());
    }

    groups
        .into_iter()
        .map(|(vendedor, acc)| SellerSummary {
            vendedor: vendedor.to_string(),
            total_vendas: acc.total,
            total_clientes: acc.clientes.len(),
            total_pedidos: acc.pedidos.len(),
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
