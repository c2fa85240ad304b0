//! Expiry-analysis page. Upstream never wired a data source into this page;
//! it renders the header only.

use crate::pages::RenderContext;
use anyhow::Result;

pub fn render(ctx: &RenderContext) -> Result<()> {
    println!("══════════════════════════════════════════════");
    println!("  Análise de Validade dos Produtos");
    println!("══════════════════════════════════════════════");
    println!("  Página em construção — nenhuma fonte de dados configurada.");
    println!("  Usuário: {}", ctx.usuario);
    Ok(())
}
