use std::{fmt, sync::Arc};

use anyhow::{Result, bail};
use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use crate::config::DatabaseConfig;

/// Where Fyyur can keep its venues, artists and shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DbProviderId {
    Postgres,
    Sqlite,
}

impl DbProviderId {
    pub fn as_str(self) -> &'static str {
        match self {
            DbProviderId::Postgres => "postgres",
            DbProviderId::Sqlite => "sqlite",
        }
    }

    /// URL prefixes `APP_DATABASE__URL` may start with for this backend.
    pub fn schemes(self) -> &'static [&'static str] {
        match self {
            DbProviderId::Postgres => &["postgres://", "postgresql://"],
            DbProviderId::Sqlite => &["sqlite:"],
        }
    }
}

#[async_trait]
pub trait DbProvider: Send + Sync {
    fn id(&self) -> DbProviderId;

    fn supports_url(&self, url: &str) -> bool {
        let url = url.trim().to_ascii_lowercase();
        self.id()
            .schemes()
            .iter()
            .any(|scheme| url.starts_with(scheme))
    }

    async fn connect(&self, cfg: &DatabaseConfig) -> Result<DatabaseConnection>;

    /// Session settings the listing schema depends on, applied to a fresh pool.
    async fn post_connect(&self, _db: &DatabaseConnection, _cfg: &DatabaseConfig) -> Result<()> {
        Ok(())
    }
}

/// Backends tried in registration order against the configured URL.
#[derive(Default)]
pub struct DbProviders {
    providers: Vec<Arc<dyn DbProvider>>,
}

impl DbProviders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_provider(mut self, provider: Arc<dyn DbProvider>) -> Result<Self> {
        self.add(provider)?;
        Ok(self)
    }

    pub fn add(&mut self, provider: Arc<dyn DbProvider>) -> Result<()> {
        let id = provider.id();
        if self.providers.iter().any(|known| known.id() == id) {
            bail!("database provider already registered: {}", id.as_str());
        }
        self.providers.push(provider);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn provider_for_url(&self, url: &str) -> Result<Arc<dyn DbProvider>> {
        if let Some(provider) = self.providers.iter().find(|p| p.supports_url(url)) {
            return Ok(provider.clone());
        }
        let accepted: Vec<&str> = self
            .providers
            .iter()
            .flat_map(|provider| provider.id().schemes().iter().copied())
            .collect();
        bail!(
            "unsupported database url '{}'; expected one of: {}",
            RedactedUrl(url),
            if accepted.is_empty() {
                "<no providers registered>".to_string()
            } else {
                accepted.join(", ")
            }
        )
    }
}

/// Shows only the scheme of a database URL; credentials and paths stay out
/// of logs and error pages.
pub struct RedactedUrl<'a>(pub &'a str);

impl fmt::Display for RedactedUrl<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let url = self.0.trim();
        if let Some((scheme, _)) = url.split_once("://") {
            write!(f, "{scheme}://<redacted>")
        } else if let Some((scheme, _)) = url.split_once(':') {
            write!(f, "{scheme}:<redacted>")
        } else {
            f.write_str("<invalid-url>")
        }
    }
}
