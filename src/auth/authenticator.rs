//! Credential providers and the request authenticator

use super::types::CredentialConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::RequestBuilder;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Source of the bearer token sent with every listing request
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Resolve the token for the next request.
    ///
    /// `Ok(None)` means the endpoint needs no authentication. A provider that
    /// should have a token but cannot find one returns
    /// [`Error::MissingCredential`].
    async fn bearer_token(&self) -> Result<Option<String>>;

    /// Short description for logs (never includes the secret)
    fn describe(&self) -> String;
}

/// Anonymous access
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCredentials;

#[async_trait]
impl CredentialProvider for NoCredentials {
    async fn bearer_token(&self) -> Result<Option<String>> {
        Ok(None)
    }

    fn describe(&self) -> String {
        "none".to_string()
    }
}

/// Fixed token
#[derive(Clone)]
pub struct StaticToken {
    token: String,
}

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticToken").finish_non_exhaustive()
    }
}

#[async_trait]
impl CredentialProvider for StaticToken {
    async fn bearer_token(&self) -> Result<Option<String>> {
        non_blank(&self.token)
            .map(Some)
            .ok_or_else(|| Error::missing_credential(self.describe()))
    }

    fn describe(&self) -> String {
        "token".to_string()
    }
}

/// Token read from an environment variable at request time
#[derive(Debug, Clone)]
pub struct EnvToken {
    var: String,
}

impl EnvToken {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

#[async_trait]
impl CredentialProvider for EnvToken {
    async fn bearer_token(&self) -> Result<Option<String>> {
        std::env::var(&self.var)
            .ok()
            .as_deref()
            .and_then(non_blank)
            .map(Some)
            .ok_or_else(|| Error::missing_credential(self.describe()))
    }

    fn describe(&self) -> String {
        format!("env:{}", self.var)
    }
}

/// Token read from a `key=value` file.
///
/// The file is read again on every call so that edits are picked up without
/// restarting. Blank lines and lines starting with `#` are ignored.
#[derive(Debug, Clone)]
pub struct FileToken {
    path: PathBuf,
    key: String,
}

impl FileToken {
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
        }
    }
}

#[async_trait]
impl CredentialProvider for FileToken {
    async fn bearer_token(&self) -> Result<Option<String>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) => {
                debug!("Credential file {} unreadable: {e}", self.path.display());
                return Err(Error::missing_credential(self.describe()));
            }
        };

        lookup_key(&contents, &self.key)
            .map(Some)
            .ok_or_else(|| Error::missing_credential(self.describe()))
    }

    fn describe(&self) -> String {
        format!("file:{}#{}", self.path.display(), self.key)
    }
}

/// Build the provider described by a credential config
pub fn credential_provider(config: &CredentialConfig) -> Arc<dyn CredentialProvider> {
    match config {
        CredentialConfig::None => Arc::new(NoCredentials),
        CredentialConfig::Token { token } => Arc::new(StaticToken::new(token.clone())),
        CredentialConfig::Env { var } => Arc::new(EnvToken::new(var.clone())),
        CredentialConfig::File { path, key } => {
            Arc::new(FileToken::new(path.clone(), key.clone()))
        }
    }
}

/// Authenticator applies the provider's bearer token to HTTP requests
#[derive(Clone)]
pub struct Authenticator {
    provider: Arc<dyn CredentialProvider>,
}

impl Authenticator {
    /// Create an authenticator around a credential provider
    pub fn new(provider: Arc<dyn CredentialProvider>) -> Self {
        Self { provider }
    }

    /// Create an authenticator from config
    pub fn from_config(config: &CredentialConfig) -> Self {
        Self::new(credential_provider(config))
    }

    /// Apply authentication to a request builder
    pub async fn apply(&self, req: RequestBuilder) -> Result<RequestBuilder> {
        match self.provider.bearer_token().await? {
            Some(token) => Ok(req.bearer_auth(token)),
            None => Ok(req),
        }
    }

    /// Description of the underlying provider
    pub fn describe(&self) -> String {
        self.provider.describe()
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("provider", &self.provider.describe())
            .finish()
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Find `key=value` in a simple config file
pub(crate) fn lookup_key(contents: &str, key: &str) -> Option<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .find(|(k, _)| k.trim() == key)
        .and_then(|(_, v)| non_blank(v))
}
