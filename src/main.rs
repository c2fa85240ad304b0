mod config;
mod error;
mod format;
mod models;
mod pages;
mod report;
mod source;
mod users;
mod utils;

use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::collections::BTreeSet;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::pages::{Page, RenderContext};
use crate::report::ReportEngine;
use crate::report::filter::DateRange;
use crate::source::{ApiClient, FetchQuery};
use crate::users::UserStore;

#[derive(Parser)]
#[command(name = "vendas-dash", about = "Painel de vendas sobre a API interna", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Usuário do painel (obrigatório para as páginas de relatório)
    #[arg(long, global = true)]
    usuario: Option<String>,

    /// Senha do painel
    #[arg(long, global = true)]
    senha: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Página inicial: KPIs de faturamento/pedidos e tabela de vendedores
    Inicial {
        /// Início do período da tabela de vendedores (padrão: config)
        #[arg(long)]
        inicio: Option<NaiveDate>,

        /// Fim do período (padrão: config)
        #[arg(long)]
        fim: Option<NaiveDate>,

        /// Filial a manter; repita a flag para várias (padrão: todas)
        #[arg(long)]
        filial: Vec<String>,
    },

    /// Desempenho de vendas por produto: resumo, top 20, evolução e margem
    Produto {
        #[arg(long)]
        inicio: Option<NaiveDate>,

        #[arg(long)]
        fim: Option<NaiveDate>,

        /// Pesquisa por descrição (parcial) ou código de produto (exato)
        #[arg(long)]
        busca: Option<String>,
    },

    /// Análise de validade dos produtos
    Validade,

    /// Cadastrar um usuário no arquivo de usuários
    Registrar { usuario: String, senha: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "vendas_dashboard=info,warn",
        1 => "vendas_dashboard=debug,info",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .compact()
        .with_target(false)
        .init();

    let config = AppConfig::load()?;
    let store = UserStore::new(&config.auth.users_file);

    if let Command::Registrar { usuario, senha } = &cli.command {
        if store.register(usuario, senha)? {
            println!("Usuário '{}' cadastrado.", usuario);
        } else {
            println!("Usuário '{}' já existe.", usuario);
        }
        return Ok(());
    }

    let usuario = autenticar(&store, cli.usuario.as_deref(), cli.senha.as_deref())?;

    let data_inicial: NaiveDate = config
        .report
        .data_inicial
        .parse()
        .context("report.data_inicial inválida na configuração")?;
    let data_final: NaiveDate = config
        .report
        .data_final
        .parse()
        .context("report.data_final inválida na configuração")?;

    let (page, inicio, fim, filial, busca) = match cli.command {
        Command::Inicial { inicio, fim, filial } => (Page::Inicial, inicio, fim, filial, None),
        Command::Produto { inicio, fim, busca } => (Page::Produto, inicio, fim, Vec::new(), busca),
        Command::Validade => (Page::Validade, None, None, Vec::new(), None),
        Command::Registrar { .. } => unreachable!("tratado acima"),
    };

    let ctx = RenderContext {
        usuario,
        hoje: Local::now().date_naive(),
        query: FetchQuery {
            data_inicial,
            data_final,
            pagina: config.report.pagina,
            limite: config.report.limite,
        },
        period: DateRange::new(inicio.unwrap_or(data_inicial), fim.unwrap_or(data_final)),
        filiais: if filial.is_empty() {
            None
        } else {
            Some(filial.into_iter().collect::<BTreeSet<String>>())
        },
        busca,
    };

    let engine = ReportEngine::new(ApiClient::new(&config.api)?);

    let _t = utils::Timer::start(page.title());
    page.render(&engine, &ctx).await
}

fn autenticar(store: &UserStore, usuario: Option<&str>, senha: Option<&str>) -> Result<String> {
    let (Some(usuario), Some(senha)) = (usuario, senha) else {
        bail!("Informe --usuario e --senha para acessar os relatórios.");
    };

    if store.verify(usuario, senha)? {
        Ok(usuario.to_string())
    } else {
        bail!("Usuário ou senha inválidos. Tente novamente.");
    }
}
