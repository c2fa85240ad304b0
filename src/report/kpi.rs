//! Overview-page KPI windows: today / yesterday / weekly / monthly revenue
//! and distinct-order counts.

use crate::models::OrderSale;
use chrono::{Datelike, Duration, NaiveDate};
use std::collections::HashSet;

// ── Windows ───────────────────────────────────────────────────────────────────

/// Date anchors derived from "today". The current week runs Monday..today
/// inclusive; the previous week is [previous Monday, this Monday).
#[derive(Debug, Clone, Copy)]
pub struct KpiWindows {
    pub hoje: NaiveDate,
    pub ontem: NaiveDate,
    pub semana_inicial: NaiveDate,
    pub semana_passada_inicial: NaiveDate,
}

impl KpiWindows {
    pub fn anchored_at(hoje: NaiveDate) -> Self {
        let semana_inicial =
            hoje - Duration::days(hoje.weekday().num_days_from_monday() as i64);
        Self {
            hoje,
            ontem: hoje - Duration::days(1),
            semana_inicial,
            semana_passada_inicial: semana_inicial - Duration::days(7),
        }
    }
}

// ── Snapshots ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevenueSnapshot {
    pub hoje: f64,
    pub ontem: f64,
    pub semana_atual: f64,
    pub semana_passada: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderSnapshot {
    pub hoje: usize,
    pub ontem: usize,
    pub semana_atual: usize,
    pub semana_passada: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyComparison {
    pub faturamento_mes_atual: f64,
    pub faturamento_mes_anterior: f64,
    pub pedidos_mes_atual: usize,
    pub pedidos_mes_anterior: usize,
}

fn revenue_where(rows: &[OrderSale], pred: impl Fn(NaiveDate) -> bool) -> f64 {
    rows.iter()
        .filter(|r| r.data.is_some_and(&pred))
        .map(|r| r.valor_total)
        .sum()
}

fn distinct_orders_where(rows: &[OrderSale], pred: impl Fn(NaiveDate) -> bool) -> usize {
    rows.iter()
        .filter(|r| r.data.is_some_and(&pred))
        .map(|r| r.numero_pedido.as_str())
        .collect::<HashSet<_>>()
        .len()
}

pub fn revenue_snapshot(rows: &[OrderSale], w: &KpiWindows) -> RevenueSnapshot {
    RevenueSnapshot {
        hoje: revenue_where(rows, |d| d == w.hoje),
        ontem: revenue_where(rows, |d| d == w.ontem),
        semana_atual: revenue_where(rows, |d| w.semana_inicial <= d && d <= w.hoje),
        semana_passada: revenue_where(rows, |d| {
            w.semana_passada_inicial <= d && d < w.semana_inicial
        }),
    }
}

pub fn order_snapshot(rows: &[OrderSale], w: &KpiWindows) -> OrderSnapshot {
    OrderSnapshot {
        hoje: distinct_orders_where(rows, |d| d == w.hoje),
        ontem: distinct_orders_where(rows, |d| d == w.ontem),
        semana_atual: distinct_orders_where(rows, |d| w.semana_inicial <= d && d <= w.hoje),
        semana_passada: distinct_orders_where(rows, |d| {
            w.semana_passada_inicial <= d && d < w.semana_inicial
        }),
    }
}

pub fn monthly_comparison(rows: &[OrderSale], hoje: NaiveDate) -> MonthlyComparison {
    let (mes_atual, ano_atual) = (hoje.month(), hoje.year());
    let (mes_anterior, ano_anterior) = if mes_atual > 1 {
        (mes_atual - 1, ano_atual)
    } else {
        (12, ano_atual - 1)
    };

    let in_month = |mes: u32, ano: i32| move |d: NaiveDate| d.month() == mes && d.year() == ano;

    MonthlyComparison {
        faturamento_mes_atual: revenue_where(rows, in_month(mes_atual, ano_atual)),
        faturamento_mes_anterior: revenue_where(rows, in_month(mes_anterior, ano_anterior)),
        pedidos_mes_atual: distinct_orders_where(rows, in_month(mes_atual, ano_atual)),
        pedidos_mes_anterior: distinct_orders_where(rows, in_month(mes_anterior, ano_anterior)),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
