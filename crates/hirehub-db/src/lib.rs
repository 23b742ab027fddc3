//! # hirehub-db
//!
//! PostgreSQL database layer for HireHub.
//!
//! This crate provides:
//! - Connection pool management
//! - Repository implementations for positions and applicants
//! - pgvector-backed embedding column storage
//!
//! ## Example
//!
//! ```rust,ignore
//! use hirehub_db::Database;
//! use hirehub_core::{CreatePositionRequest, PositionRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/hirehub").await?;
//!
//!     let position_id = db.positions.insert(CreatePositionRequest {
//!         title: "Backend Engineer".to_string(),
//!         description: "Build and run our services.".to_string(),
//!         requirements: "Rust, PostgreSQL".to_string(),
//!         tags: "backend, rust".to_string(),
//!         is_active: true,
//!     }).await?;
//!
//!     println!("Created position: {}", position_id);
//!     Ok(())
//! }
//! ```

pub mod applicants;
pub mod pool;
pub mod positions;

// Re-export core types
pub use hirehub_core::*;

// Re-export repository implementations
pub use applicants::PgApplicantRepository;
pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};
pub use positions::PgPositionRepository;

use std::sync::Arc;

/// Escape LIKE/ILIKE wildcard characters (`%`, `_`, `\`) in user input.
pub fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Apply pagination defaults to optional limit/offset values.
pub(crate) fn defaults_limit(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
    (
        limit
            .filter(|l| *l > 0)
            .unwrap_or(hirehub_core::defaults::PAGE_LIMIT),
        offset
            .filter(|o| *o >= 0)
            .unwrap_or(hirehub_core::defaults::PAGE_OFFSET),
    )
}

/// Main database facade providing access to all repositories.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Job position repository.
    pub positions: Arc<PgPositionRepository>,
    /// Applicant repository.
    pub applicants: Arc<PgApplicantRepository>,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            positions: Arc::new(PgPositionRepository::new(pool.clone())),
            applicants: Arc::new(PgApplicantRepository::new(pool.clone())),
            pool,
        }
    }

    /// Connect to the database and construct the facade.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = create_pool(database_url).await?;
        Ok(Self::new(pool))
    }

    /// Connect with custom pool configuration.
    pub async fn connect_with_config(database_url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(database_url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending SQL migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Config(format!("Migration failed: {}", e)))?;
        Ok(())
    }
}
