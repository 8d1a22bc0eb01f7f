use database_layer::{DatabaseError, DatabasePool, InventoryStore, PgInventoryStore};
use logger_redacted::{PiiRedactor, RedactionConfig};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::config::AppConfig;
use crate::services::StoreService;

/// Shared server state handed to every handler
#[derive(Clone)]
pub struct SubscriberServer {
    /// Resolved configuration
    pub config: Arc<AppConfig>,
    /// Database connection pool
    pub db: DatabasePool,
    /// Store business logic
    pub store_service: StoreService,
    /// Redacts mobile numbers and e-mail addresses before they are logged
    pub redactor: Arc<PiiRedactor>,
    started_at: Instant,
}

impl SubscriberServer {
    /// Connect to the database and build the server state
    ///
    /// # Errors
    ///
    /// `ConnectionFailed` when the database is unreachable, `MigrationError`
    /// when migrations are enabled and fail.
    pub async fn new(config: AppConfig) -> Result<Self, DatabaseError> {
        let db = DatabasePool::connect(&config.database.url, &config.database.pool).await?;
        if config.database.run_migrations {
            db.run_migrations().await?;
        }
        info!(server = %config.server.name, "Server state initialised");
        Ok(Self::from_parts(config, db))
    }

    /// Build the state on an existing pool with default configuration.
    /// Useful for testing.
    pub fn new_with_pool(db: DatabasePool) -> Self {
        Self::from_parts(AppConfig::default(), db)
    }

    pub fn from_parts(config: AppConfig, db: DatabasePool) -> Self {
        let inventory: Arc<dyn InventoryStore> = Arc::new(PgInventoryStore::new(db.pool().clone()));
        Self::with_inventory(config, db, inventory)
    }

    /// Build the state with a custom inventory store
    pub fn with_inventory(
        config: AppConfig,
        db: DatabasePool,
        inventory: Arc<dyn InventoryStore>,
    ) -> Self {
        let redactor = Arc::new(PiiRedactor::new(RedactionConfig {
            redact_emails: config.logging.redaction_enabled,
            redact_mobiles: config.logging.redaction_enabled,
            ..RedactionConfig::default()
        }));
        let store_service = StoreService::new(
            db.pool().clone(),
            inventory,
            config.search.clone(),
            Arc::clone(&redactor),
        );

        Self {
            config: Arc::new(config),
            db,
            store_service,
            redactor,
            started_at: Instant::now(),
        }
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
