pub mod cache;

use crate::config::ApiConfig;
use crate::error::FetchError;
use crate::models::RawTable;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use self::cache::FetchCache;

// ── Source trait ──────────────────────────────────────────────────────────────

/// Query parameters every dashboard endpoint accepts.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchQuery {
    pub data_inicial: NaiveDate,
    pub data_final: NaiveDate,
    pub pagina: u32,
    pub limite: u64,
}

/// Swappable data source abstraction.
#[async_trait]
pub trait SalesDataSource: Send + Sync {
    /// Order headers (pcpedc) — feeds the overview page.
    async fn fetch_orders(&self, query: &FetchQuery) -> Result<RawTable, FetchError>;

    /// Product sale lines (vwsomelier) — feeds the product page.
    async fn fetch_product_sales(&self, query: &FetchQuery) -> Result<RawTable, FetchError>;
}

// ── HTTP client ───────────────────────────────────────────────────────────────

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    orders_endpoint: String,
    products_endpoint: String,
    cache: FetchCache,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            orders_endpoint: config.orders_endpoint.clone(),
            products_endpoint: config.products_endpoint.clone(),
            cache: FetchCache::new(Duration::from_secs(config.cache_ttl_secs)),
        })
    }

    fn endpoint_url(&self, endpoint: &str, query: &FetchQuery) -> Result<Url, FetchError> {
        let mut url = Url::parse(&format!("{}/{}", self.base_url, endpoint))
            .map_err(|e| FetchError::Transport(format!("URL inválida: {e}")))?;
        url.query_pairs_mut()
            .append_pair("data_inicial", &query.data_inicial.to_string())
            .append_pair("data_final", &query.data_final.to_string())
            .append_pair("pagina", &query.pagina.to_string())
            .append_pair("limite", &query.limite.to_string());
        Ok(url)
    }

    /// One GET per call — no retry, no backoff. Status 200 is the only
    /// success; anything else (or a transport/decode failure) aborts the
    /// report and reaches the user as a visible error.
    async fn get_table(&self, endpoint: &str, query: &FetchQuery) -> Result<RawTable, FetchError> {
        let url = self.endpoint_url(endpoint, query)?;
        let key = url.to_string();

        if let Some(table) = self.cache.get(&key) {
            debug!("Cache hit: {}", key);
            return Ok(table);
        }

        debug!("GET {}", key);
        let resp = self.http.get(url).send().await?;

        let status = resp.status().as_u16();
        if status != 200 {
            return Err(FetchError::Status(status));
        }

        let rows: Vec<Map<String, Value>> = resp.json().await?;
        let table = RawTable::from_rows(rows);
        info!("{}: {} linhas recebidas", endpoint, table.len());

        self.cache.put(key, table.clone());
        Ok(table)
    }
}

#[async_trait]
impl SalesDataSource for ApiClient {
    async fn fetch_orders(&self, query: &FetchQuery) -> Result<RawTable, FetchError> {
        self.get_table(&self.orders_endpoint, query).await
    }

    async fn fetch_product_sales(&self, query: &FetchQuery) -> Result<RawTable, FetchError> {
        self.get_table(&self.products_endpoint, query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn test_endpoint_url_query_string() {
        let cfg = AppConfig::default();
        let client = ApiClient::new(&cfg.api).unwrap();
        let query = FetchQuery {
            data_inicial: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            data_final: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
            pagina: 1,
            limite: 5_000_000,
        };

        let url = client.endpoint_url("dados_pcpedc", &query).unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:5000/dados_pcpedc?data_inicial=2023-01-01&data_final=2025-12-31&pagina=1&limite=5000000"
        );
    }
}
