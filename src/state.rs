use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;

/// Source of "now" for partitioning shows into past and upcoming.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().fixed_offset()
    }
}

/// Always reports the same instant.
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: DatabaseConnection,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(config: AppConfig, db: DatabaseConnection) -> Arc<Self> {
        Self::with_clock(config, db, Arc::new(SystemClock))
    }

    pub fn with_clock(
        config: AppConfig,
        db: DatabaseConnection,
        clock: Arc<dyn Clock>,
    ) -> Arc<Self> {
        Arc::new(Self { config, db, clock })
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        self.clock.now()
    }
}
