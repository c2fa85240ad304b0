//! Presenter boundary: one module per dashboard page, plain-text output.
//!
//! Pages are a closed enum dispatched statically — there is no string-keyed
//! lookup, so "page not found" cannot happen at runtime. Everything a render
//! needs arrives in an explicit [`RenderContext`]; pages hold no session
//! state of their own.

pub mod inicial;
pub mod produto;
pub mod validade;

use crate::report::ReportEngine;
use crate::report::filter::DateRange;
use crate::source::{FetchQuery, SalesDataSource};
use anyhow::Result;
use chrono::NaiveDate;
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
pub struct RenderContext {
    pub usuario: String,
    pub hoje: NaiveDate,
    pub query: FetchQuery,
    pub period: DateRange,
    /// `None` keeps every branch (the default selector state).
    pub filiais: Option<BTreeSet<String>>,
    pub busca: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Inicial,
    Produto,
    Validade,
}

impl Page {
    pub fn title(&self) -> &'static str {
        match self {
            Page::Inicial => "Dashboard de Faturamento",
            Page::Produto => "Desempenho de Vendas por Produto",
            Page::Validade => "Análise de Validade dos Produtos",
        }
    }

    pub async fn render<S: SalesDataSource>(
        &self,
        engine: &ReportEngine<S>,
        ctx: &RenderContext,
    ) -> Result<()> {
        match self {
            Page::Inicial => inicial::render(engine, ctx).await,
            Page::Produto => produto::render(engine, ctx).await,
            Page::Validade => validade::render(ctx),
        }
    }
}
