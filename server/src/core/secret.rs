//! File-backed secret storage
//!
//! Secrets live in a single JSON vault (`secrets.json`) inside the data
//! directory. On Unix the file is written with mode 0600.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};

use super::constants::{SECRET_KEY_JWT_SIGNING, SECRETS_FILE_NAME};
use super::storage::AppStorage;
use crate::utils::crypto;

/// A stored secret with timestamps
#[derive(Clone, Serialize, Deserialize)]
pub struct Secret {
    pub value: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secret")
            .field("value", &"[REDACTED]")
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            value: value.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct SecretVault {
    secrets: HashMap<String, Secret>,
}

/// Secret manager; the vault is cached in memory after the initial load
#[derive(Debug, Clone)]
pub struct SecretManager {
    path: PathBuf,
    vault: Arc<RwLock<SecretVault>>,
    /// Serializes writes to the vault file
    save_mutex: Arc<Mutex<()>>,
}

impl SecretManager {
    pub async fn init(storage: &AppStorage) -> Result<Self> {
        Self::open(storage.data_path(SECRETS_FILE_NAME)).await
    }

    async fn open(path: PathBuf) -> Result<Self> {
        let vault = Self::load_vault(&path).await?;
        tracing::debug!(path = %path.display(), "Secret manager initialized");
        Ok(Self {
            path,
            vault: Arc::new(RwLock::new(vault)),
            save_mutex: Arc::new(Mutex::new(())),
        })
    }

    /// Store a secret, keeping `created_at` of an existing entry
    pub async fn set(&self, name: &str, value: &str) -> Result<()> {
        {
            let mut vault = self.vault.write().await;
            let mut secret = Secret::new(value);
            if let Some(existing) = vault.secrets.get(name) {
                secret.created_at = existing.created_at;
            }
            vault.secrets.insert(name.to_string(), secret);
        }
        self.save_vault().await?;
        tracing::debug!(name, "Stored secret");
        Ok(())
    }

    pub async fn get_value(&self, name: &str) -> Option<String> {
        let vault = self.vault.read().await;
        vault.secrets.get(name).map(|s| s.value.clone())
    }

    /// Get the session signing key, creating it if missing or malformed
    pub async fn get_jwt_signing_key(&self) -> Result<Vec<u8>> {
        match self.get_value(SECRET_KEY_JWT_SIGNING).await {
            Some(encoded) => match crypto::decode_signing_key(&encoded) {
                Ok(key) => Ok(key),
                Err(e) => {
                    tracing::warn!("Stored JWT signing key is invalid ({}), regenerating", e);
                    self.create_jwt_signing_key().await
                }
            },
            None => self.create_jwt_signing_key().await,
        }
    }

    async fn create_jwt_signing_key(&self) -> Result<Vec<u8>> {
        let key = crypto::generate_key(crypto::SIGNING_KEY_LEN);
        self.set(SECRET_KEY_JWT_SIGNING, &hex::encode(&key)).await?;
        tracing::debug!("Created new JWT signing key");
        Ok(key)
    }

    async fn load_vault(path: &Path) -> Result<SecretVault> {
        match tokio::fs::read_to_string(path).await {
            Ok(json) => {
                let vault: SecretVault =
                    serde_json::from_str(&json).context("Failed to parse secrets file")?;
                tracing::debug!(count = vault.secrets.len(), "Loaded secrets from file");
                Ok(vault)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No existing secrets file, creating new vault");
                Ok(SecretVault::default())
            }
            Err(e) => Err(e).context("Failed to load secrets file"),
        }
    }

    async fn save_vault(&self) -> Result<()> {
        let _guard = self.save_mutex.lock().await;
        let json = {
            let vault = self.vault.read().await;
            serde_json::to_string_pretty(&*vault).context("Failed to serialize vault")?
        };

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .context("Failed to create secrets directory")?;
        }
        tokio::fs::write(&self.path, json)
            .await
            .context("Failed to write secrets file")?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .await
                .context("Failed to restrict secrets file permissions")?;
        }

        Ok(())
    }
}
