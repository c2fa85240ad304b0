//! Report orchestrator: ties source → normalize → filter → aggregate together.
//!
//! One engine call per user interaction (date change, search, branch toggle);
//! every call recomputes from a fresh (or memoized) fetch. Nothing here is
//! persisted. `FetchError` / `SchemaError` abort the report; `ParseWarning`s
//! ride along in the report value for the presenter to surface.

pub mod aggregate;
pub mod filter;
pub mod kpi;
pub mod normalize;

use crate::error::ParseWarning;
use crate::models::{MarginSummary, MonthlySales, ProductSummary, SellerSummary, TopProduct};
use crate::source::{FetchQuery, SalesDataSource};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use tracing::{info, warn};

use self::aggregate::TOP_N;
use self::filter::{DateRange, FilterCriteria};
use self::kpi::{KpiWindows, MonthlyComparison, OrderSnapshot, RevenueSnapshot};

// ── Report values ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ProductReport {
    /// Summary table: period + search filter applied.
    pub resumo: Vec<ProductSummary>,
    /// Charts: period filter only, matching the dashboard layout where the
    /// search box narrows the table but not the charts.
    pub top_produtos: Vec<TopProduct>,
    pub vendas_mensais: Vec<MonthlySales>,
    pub top_margem: Vec<MarginSummary>,
    pub warnings: Vec<ParseWarning>,
}

#[derive(Debug, Clone)]
pub struct OverviewReport {
    /// Every branch code seen in the data, sorted — drives the selector.
    pub filiais: Vec<String>,
    pub faturamento: RevenueSnapshot,
    pub pedidos: OrderSnapshot,
    pub comparativo: MonthlyComparison,
    /// Seller table: branch + period filter applied.
    pub vendedores: Vec<SellerSummary>,
    pub warnings: Vec<ParseWarning>,
}

// ── Engine ────────────────────────────────────────────────────────────────────

pub struct ReportEngine<S> {
    source: S,
}

impl<S: SalesDataSource> ReportEngine<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub async fn product_report(
        &self,
        query: &FetchQuery,
        period: DateRange,
        busca: Option<String>,
    ) -> Result<ProductReport> {
        let raw = self
            .source
            .fetch_product_sales(query)
            .await
            .context("Falha ao buscar dados de produtos da API")?;

        let normalized = normalize::normalize_products(&raw)
            .context("Resposta da API de produtos fora do esquema esperado")?;
        for w in &normalized.warnings {
            warn!("{}", w);
        }

        let tabela = filter::apply(
            &normalized.records,
            &FilterCriteria {
                period: Some(period),
                branches: None,
                search: busca,
            },
        );
        let graficos = filter::apply(
            &normalized.records,
            &FilterCriteria {
                period: Some(period),
                ..Default::default()
            },
        );

        info!(
            "Relatório de produtos: {} linhas no período, {} na tabela",
            graficos.len(),
            tabela.len()
        );

        Ok(ProductReport {
            resumo: aggregate::product_summary(&tabela),
            top_produtos: aggregate::top_products(&graficos, TOP_N),
            vendas_mensais: aggregate::monthly_sales(&graficos),
            top_margem: aggregate::top_margin_products(&graficos, TOP_N),
            warnings: normalized.warnings,
        })
    }

    /// `filiais` = `None` keeps every branch (the selector's default state);
    /// an explicit empty set keeps nothing.
    pub async fn overview_report(
        &self,
        query: &FetchQuery,
        period: DateRange,
        filiais: Option<BTreeSet<String>>,
        hoje: NaiveDate,
    ) -> Result<OverviewReport> {
        let raw = self
            .source
            .fetch_orders(query)
            .await
            .context("Falha ao buscar dados de pedidos da API")?;

        let normalized = normalize::normalize_orders(&raw)
            .context("Resposta da API de pedidos fora do esquema esperado")?;
        for w in &normalized.warnings {
            warn!("{}", w);
        }

        let todas_filiais: BTreeSet<String> = normalized
            .records
            .iter()
            .map(|r| r.filial.clone())
            .collect();
        let selecionadas = filiais.unwrap_or_else(|| todas_filiais.clone());

        let por_filial = filter::apply(
            &normalized.records,
            &FilterCriteria {
                branches: Some(selecionadas),
                ..Default::default()
            },
        );

        // KPI cards read the whole branch-filtered history; only the seller
        // table honors the selected period.
        let windows = KpiWindows::anchored_at(hoje);
        let periodo = filter::apply(
            &por_filial,
            &FilterCriteria {
                period: Some(period),
                ..Default::default()
            },
        );

        info!(
            "Relatório geral: {} pedidos após filtro de filial, {} no período",
            por_filial.len(),
            periodo.len()
        );

        Ok(OverviewReport {
            filiais: todas_filiais.into_iter().collect(),
            faturamento: kpi::revenue_snapshot(&por_filial, &windows),
            pedidos: kpi::order_snapshot(&por_filial, &windows),
            comparativo: kpi::monthly_comparison(&por_filial, hoje),
            vendedores: aggregate::seller_summary(&periodo),
            warnings: normalized.warnings,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::models::RawTable;
    use async_trait::async_trait;
    use serde_json::{Map, Value, json};

    struct MockSource {
        orders: Vec<Map<String, Value>>,
        products: Vec<Map<String, Value>>,
    }

    #[async_trait]
    impl SalesDataSource for MockSource {
        async fn fetch_orders(&self, _query: &FetchQuery) -> Result<RawTable, FetchError> {
            Ok(RawTable::from_rows(self.orders.clone()))
        }

        async fn fetch_product_sales(&self, _query: &FetchQuery) -> Result<RawTable, FetchError> {
            Ok(RawTable::from_rows(self.products.clone()))
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn query() -> FetchQuery {
        FetchQuery {
            data_inicial: ymd(2023, 1, 1),
            data_final: ymd(2025, 12, 31),
            pagina: 1,
            limite: 5_000_000,
        }
    }

    fn product_row(desc: &str, cod: &str, data: &str, qt: f64, pv: f64) -> Map<String, Value> {
        let mut row = Map::new();
        row.insert("DESCRICAO".into(), json!(desc));
        row.insert("CODPROD".into(), json!(cod));
        row.insert("DATA".into(), json!(data));
        row.insert("QT".into(), json!(qt));
        row.insert("PVENDA".into(), json!(pv));
        row.insert("VLCUSTOFIN".into(), json!(pv / 2.0));
        row
    }

    fn order_row(data: &str, valor: f64, ped: &str, cli: &str, nome: &str, filial: &str) -> Map<String, Value> {
        let mut row = Map::new();
        row.insert("DATA".into(), json!(data));
        row.insert("VLTOTAL".into(), json!(valor));
        row.insert("NUMPED".into(), json!(ped));
        row.insert("CODCLI".into(), json!(cli));
        row.insert("NOME".into(), json!(nome));
        row.insert("CODFILIAL".into(), json!(filial));
        row
    }

    #[test]
    fn test_product_report_search_narrows_table_not_charts() {
        let source = MockSource {
            orders: vec![],
            products: vec![
                product_row("Vinho Tinto", "1", "2024-01-10", 2.0, 30.0),
                product_row("Espumante", "2", "2024-01-12", 1.0, 80.0),
            ],
        };
        let engine = ReportEngine::new(source);

        let report = tokio_test::block_on(engine.product_report(
            &query(),
            DateRange::new(ymd(2024, 1, 1), ymd(2024, 1, 31)),
            Some("vinho".to_string()),
        ))
        .unwrap();

        assert_eq!(report.resumo.len(), 1);
        assert_eq!(report.resumo[0].descricao, "Vinho Tinto");
        assert_eq!(report.top_produtos.len(), 2);
        assert_eq!(report.top_produtos[0].descricao, "Espumante");
        assert_eq!(report.vendas_mensais.len(), 1);
        assert_eq!(report.vendas_mensais[0].valor_total, 110.0);
    }

    #[test]
    fn test_overview_report_defaults_to_every_branch() {
        let hoje = ymd(2024, 6, 13);
        let source = MockSource {
            orders: vec![
                order_row("2024-06-13", 100.0, "p1", "c1", "MARIA", "1"),
                order_row("2024-06-13", 40.0, "p2", "c2", "JOAO", "2"),
            ],
            products: vec![],
        };
        let engine = ReportEngine::new(source);

        let report = tokio_test::block_on(engine.overview_report(
            &query(),
            DateRange::new(ymd(2024, 6, 1), ymd(2024, 6, 30)),
            None,
            hoje,
        ))
        .unwrap();

        assert_eq!(report.filiais, vec!["1", "2"]);
        assert_eq!(report.faturamento.hoje, 140.0);
        assert_eq!(report.pedidos.hoje, 2);
        assert_eq!(report.vendedores.len(), 2);
    }

    #[test]
    fn test_overview_report_empty_branch_selection_is_empty() {
        let source = MockSource {
            orders: vec![order_row("2024-06-13", 100.0, "p1", "c1", "MARIA", "1")],
            products: vec![],
        };
        let engine = ReportEngine::new(source);

        let report = tokio_test::block_on(engine.overview_report(
            &query(),
            DateRange::new(ymd(2024, 6, 1), ymd(2024, 6, 30)),
            Some(BTreeSet::new()),
            ymd(2024, 6, 13),
        ))
        .unwrap();

        assert_eq!(report.faturamento.hoje, 0.0);
        assert!(report.vendedores.is_empty());
    }

    #[test]
    fn test_schema_error_aborts_report() {
        let mut bad_row = Map::new();
        bad_row.insert("DESCRICAO".into(), json!("Vinho"));
        let source = MockSource {
            orders: vec![],
            products: vec![bad_row],
        };
        let engine = ReportEngine::new(source);

        let err = tokio_test::block_on(engine.product_report(
            &query(),
            DateRange::new(ymd(2024, 1, 1), ymd(2024, 1, 31)),
            None,
        ))
        .unwrap_err();

        let schema = err.downcast_ref::<crate::error::SchemaError>().unwrap();
        assert!(schema.missing.contains(&"CODPROD".to_string()));
    }

    #[test]
    fn test_empty_fetch_yields_empty_report() {
        let source = MockSource {
            orders: vec![],
            products: vec![],
        };
        let engine = ReportEngine::new(source);

        let report = tokio_test::block_on(engine.product_report(
            &query(),
            DateRange::new(ymd(2024, 1, 1), ymd(2024, 1, 31)),
            None,
        ))
        .unwrap();

        assert!(report.resumo.is_empty());
        assert!(report.warnings.is_empty());
    }
}
