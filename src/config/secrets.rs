use crate::utils::error::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const SECRET_KEY: &str = "SECRET_KEY";
pub const DATABASE_PASSWORD: &str = "DATABASE_PASSWORD";

const VISIBLE_PREFIX: usize = 4;

/// `.env` 檔案的內容；已存在的環境變數優先於檔案
#[derive(Debug, Clone, Default)]
pub struct EnvFile {
    path: PathBuf,
    values: HashMap<String, String>,
    found: bool,
}

impl EnvFile {
    /// 檔案不存在不算錯誤，格式錯誤才算
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let iter = match dotenvy::from_path_iter(&path) {
            Ok(iter) => iter,
            Err(e) if e.not_found() => {
                tracing::debug!("No env file at {}", path.display());
                return Ok(Self {
                    path,
                    ..Self::default()
                });
            }
            Err(e) => return Err(e.into()),
        };

        let mut values = HashMap::new();
        for item in iter {
            let (key, value) = item?;
            values.insert(key, value);
        }
        tracing::debug!("Loaded {} entries from {}", values.len(), path.display());

        Ok(Self {
            path,
            values,
            found: true,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn found(&self) -> bool {
        self.found
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn file_value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        std::env::var(key)
            .ok()
            .or_else(|| self.values.get(key).cloned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Secrets {
    pub secret_key: Option<String>,
    pub database_password: Option<String>,
}

impl Secrets {
    pub fn from_env_file(env: &EnvFile) -> Self {
        Self {
            secret_key: env.get(SECRET_KEY),
            database_password: env.get(DATABASE_PASSWORD),
        }
    }
}

pub fn mask(value: &str) -> String {
    let prefix: String = value.chars().take(VISIBLE_PREFIX).collect();
    if value.chars().count() <= VISIBLE_PREFIX {
        "*".repeat(value.chars().count().max(1))
    } else {
        format!("{}{}", prefix, "*".repeat(8))
    }
}
