//! Overview page: revenue/order KPI cards plus the per-seller table.

use crate::format::format_currency;
use crate::pages::RenderContext;
use crate::report::{OverviewReport, ReportEngine};
use crate::source::SalesDataSource;
use anyhow::Result;

pub async fn render<S: SalesDataSource>(
    engine: &ReportEngine<S>,
    ctx: &RenderContext,
) -> Result<()> {
    let report = engine
        .overview_report(&ctx.query, ctx.period, ctx.filiais.clone(), ctx.hoje)
        .await?;
    print_report(&report, ctx);
    Ok(())
}

fn print_report(report: &OverviewReport, ctx: &RenderContext) {
    println!("══════════════════════════════════════════════");
    println!("  Dashboard de Faturamento — {}", ctx.usuario);
    println!("══════════════════════════════════════════════");

    for w in &report.warnings {
        println!("  Aviso: {}", w);
    }

    println!("  Filiais disponíveis : {}", report.filiais.join(", "));
    if let Some(selecionadas) = &ctx.filiais {
        let lista: Vec<&str> = selecionadas.iter().map(String::as_str).collect();
        println!("  Filiais selecionadas: {}", lista.join(", "));
    }
    println!();

    let f = &report.faturamento;
    println!("  Faturamento Hoje          : {}", format_currency(f.hoje));
    println!("  Faturamento Ontem         : {}", format_currency(f.ontem));
    println!("  Faturamento Semana Atual  : {}", format_currency(f.semana_atual));
    println!("  Faturamento Semana Passada: {}", format_currency(f.semana_passada));

    let c = &report.comparativo;
    println!("  Faturamento Mês Atual     : {}", format_currency(c.faturamento_mes_atual));
    println!("  Faturamento Mês Passado   : {}", format_currency(c.faturamento_mes_anterior));
    println!();

    let p = &report.pedidos;
    println!("  Pedidos Hoje   : {:<8} Pedidos Ontem      : {}", p.hoje, p.ontem);
    println!("  Pedidos Semana : {:<8} Pedidos Semana Ant.: {}", p.semana_atual, p.semana_passada);
    println!("  Pedidos Mês    : {:<8} Pedidos Mês Passado: {}", c.pedidos_mes_atual, c.pedidos_mes_anterior);
    println!();

    println!("  Detalhes dos Vendedores ({} a {})", ctx.period.start, ctx.period.end);
    if report.vendedores.is_empty() {
        println!("  Não há dados para o período selecionado.");
        return;
    }

    println!("  {:<30} {:>18} {:>10} {:>10}", "VENDEDOR", "TOTAL VENDAS", "CLIENTES", "PEDIDOS");
    for v in &report.vendedores {
        println!(
            "  {:<30} {:>18} {:>10} {:>10}",
            v.vendedor,
            format_currency(v.total_vendas),
            v.total_clientes,
            v.total_pedidos
        );
    }
}
