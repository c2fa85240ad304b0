use thiserror::Error;

/// Failure to obtain a raw table from the sales API.
///
/// One attempt per call — callers never retry automatically; a failed fetch
/// aborts the current report render and is shown to the user.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("API respondeu HTTP {0}")]
    Status(u16),

    #[error("falha de transporte: {0}")]
    Transport(String),

    #[error("corpo da resposta inválido: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            FetchError::Decode(e.to_string())
        } else {
            FetchError::Transport(e.to_string())
        }
    }
}

/// The raw table is missing columns the pipeline variant requires.
/// Normalization never produces partial rows: any missing column aborts.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("colunas ausentes na resposta da API: {}", missing.join(", "))]
pub struct SchemaError {
    pub missing: Vec<String>,
}

/// Non-fatal: some rows had values that failed to parse (coerced to null).
/// Collected during normalization and surfaced as an advisory, never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    pub column: String,
    pub invalid_rows: usize,
}

impl std::fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} linha(s) com valor inválido na coluna '{}' (convertidas para nulo)",
            self.invalid_rows, self.column
        )
    }
}
