use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub auth: AuthConfig,
    pub report: ReportConfig,
}

/// Sales API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Endpoint serving order headers (overview page).
    #[serde(default = "default_orders_endpoint")]
    pub orders_endpoint: String,

    /// Endpoint serving product-sale lines (product page).
    #[serde(default = "default_products_endpoint")]
    pub products_endpoint: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Identical requests within this window are served from memory.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

/// User store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    #[serde(default = "default_users_file")]
    pub users_file: PathBuf,
}

/// Default report window and pagination
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportConfig {
    #[serde(default = "default_data_inicial")]
    pub data_inicial: String,

    #[serde(default = "default_data_final")]
    pub data_final: String,

    #[serde(default = "default_pagina")]
    pub pagina: u32,

    #[serde(default = "default_limite")]
    pub limite: u64,
}

// ── Defaults ─────────────────────────────────────────────────────────────────

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}
fn default_orders_endpoint() -> String {
    "dados_pcpedc".to_string()
}
fn default_products_endpoint() -> String {
    "dados_vwsomelier".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_cache_ttl_secs() -> u64 {
    300
}
fn default_users_file() -> PathBuf {
    PathBuf::from("users.json")
}
fn default_data_inicial() -> String {
    "2023-01-01".to_string()
}
fn default_data_final() -> String {
    "2025-12-31".to_string()
}
fn default_pagina() -> u32 {
    1
}
fn default_limite() -> u64 {
    5_000_000
}

// ── Loader ───────────────────────────────────────────────────────────────────

impl AppConfig {
    /// Load configuration from file + environment overrides
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let cfg = config::Config::builder()
            .add_source(
                config::File::with_name("config/default")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(
                config::File::with_name("config/local")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(config::Environment::with_prefix("VENDAS").separator("__"))
            .build()?;

        let app_cfg: AppConfig = cfg.try_deserialize().unwrap_or_else(|_| AppConfig::default());
        Ok(app_cfg)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: default_base_url(),
                orders_endpoint: default_orders_endpoint(),
                products_endpoint: default_products_endpoint(),
                timeout_secs: default_timeout_secs(),
                cache_ttl_secs: default_cache_ttl_secs(),
            },
            auth: AuthConfig {
                users_file: default_users_file(),
            },
            report: ReportConfig {
                data_inicial: default_data_inicial(),
                data_final: default_data_final(),
                pagina: default_pagina(),
                limite: default_limite(),
            },
        }
    }
}
