use super::credential::UserCredential;
use crate::error::GatewayResult;
use std::path::{Path, PathBuf};
use tokio::fs;

/// JSON file holding the most recently used credential
#[derive(Debug, Clone)]
pub struct CredentialFile {
    path: PathBuf,
}

impl CredentialFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the credential, creating parent directories as needed
    pub async fn write(&self, credential: &UserCredential) -> GatewayResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let json = serde_json::to_string_pretty(credential)?;
        fs::write(&self.path, json).await?;
        Ok(())
    }

    /// Read the stored credential, if the file exists
    pub async fn read(&self) -> GatewayResult<Option<UserCredential>> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
