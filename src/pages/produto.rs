//! Product page: summary table, top-20 by value, monthly evolution and
//! top-20 by margin.

use crate::format::{format_currency, format_quantity};
use crate::pages::RenderContext;
use crate::report::{ProductReport, ReportEngine};
use crate::source::SalesDataSource;
use anyhow::Result;

pub async fn render<S: SalesDataSource>(
    engine: &ReportEngine<S>,
    ctx: &RenderContext,
) -> Result<()> {
    let report = engine
        .product_report(&ctx.query, ctx.period, ctx.busca.clone())
        .await?;
    print_report(&report, ctx);
    Ok(())
}

fn print_report(report: &ProductReport, ctx: &RenderContext) {
    println!("══════════════════════════════════════════════");
    println!("  Desempenho de Vendas por Produto");
    println!("══════════════════════════════════════════════");

    for w in &report.warnings {
        println!("  Aviso: {}", w);
    }

    if report.resumo.is_empty() && report.top_produtos.is_empty() {
        println!("  Não há dados para o período selecionado.");
        return;
    }

    println!("  Tabela de Resumo ({} a {})", ctx.period.start, ctx.period.end);
    if let Some(busca) = &ctx.busca {
        println!("  Pesquisa: '{}'", busca);
    }
    println!(
        "  {:<10} {:<40} {:>12} {:>20}",
        "CÓDIGO", "DESCRIÇÃO", "QUANTIDADE", "VALOR TOTAL VENDIDO"
    );
    for p in &report.resumo {
        println!(
            "  {:<10} {:<40} {:>12} {:>20}",
            p.codigo_produto,
            p.descricao,
            format_quantity(p.quantidade),
            format_currency(p.valor_total)
        );
    }
    println!();

    println!("  Top {} Produtos Mais Vendidos por Valor", report.top_produtos.len());
    for (i, p) in report.top_produtos.iter().enumerate() {
        println!(
            "  {:>2}. {:<40} {:>18} ({} un)",
            i + 1,
            p.descricao,
            format_currency(p.valor_total),
            format_quantity(p.quantidade)
        );
    }
    println!();

    println!("  Evolução das Vendas (ano/mês)");
    for m in &report.vendas_mensais {
        println!(
            "  {}/{:02}  {:>18}  ({} un)",
            m.ano,
            m.mes,
            format_currency(m.valor_total),
            format_quantity(m.quantidade)
        );
    }
    println!();

    println!("  Top {} Produtos por Margem de Lucro", report.top_margem.len());
    for (i, m) in report.top_margem.iter().enumerate() {
        println!(
            "  {:>2}. {:<40} {:>18}",
            i + 1,
            m.descricao,
            format_currency(m.margem)
        );
    }
}
