//! Flat-file user store: `users.json` maps username → record. The whole map
//! is read and written in one go; no incremental updates.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRecord {
    pub password: String,
}

pub struct UserStore {
    path: PathBuf,
}

impl UserStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> Result<BTreeMap<String, UserRecord>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Não foi possível ler {:?}", self.path))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Arquivo de usuários inválido: {:?}", self.path))
    }

    pub fn save(&self, users: &BTreeMap<String, UserRecord>) -> Result<()> {
        let contents = serde_json::to_string_pretty(users)?;
        std::fs::write(&self.path, contents)
            .with_context(|| format!("Não foi possível gravar {:?}", self.path))
    }

    /// Adds a user. Returns `false` (and leaves the file untouched) when the
    /// username is already taken.
    pub fn register(&self, username: &str, password: &str) -> Result<bool> {
        let mut users = self.load()?;
        if users.contains_key(username) {
            return Ok(false);
        }
        users.insert(
            username.to_string(),
            UserRecord {
                password: password.to_string(),
            },
        );
        self.save(&users)?;
        info!("Usuário '{}' cadastrado em {:?}", username, self.path);
        Ok(true)
    }

    pub fn verify(&self, username: &str, password: &str) -> Result<bool> {
        let users = self.load()?;
        Ok(users.get(username).is_some_and(|u| u.password == password))
    }
}
