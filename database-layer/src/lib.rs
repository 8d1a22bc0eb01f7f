//! Database layer for the iCare subscriber engine
//!
//! Everything that talks to storage lives here:
//!
//! - [`connection`]: pool creation, embedded migrations and health checks
//! - [`record_locator`]: generic exists / get-one / get-all lookups by field
//! - [`id_generator`]: sequential business codes (`ICORD0001`, ...) issued
//!   under a row lock
//! - [`geographic_repository`]: great-circle proximity search over stores
//! - [`inventory`]: per-store stock and per-batch pricing documents
//! - [`store_repository`]: catalogue, order and prescription queries
//!
//! Driver errors never leave the crate raw. Each failure is converted into a
//! [`DatabaseError`] carrying the operation that failed, and
//! [`DatabaseError::kind`] classifies it for the HTTP layer.
//!
//! # Example
//!
//! ```rust,no_run
//! use database_layer::{DatabasePool, GeoPoint, GeographicRepository, PoolSettings};
//!
//! # async fn run() -> Result<(), database_layer::DatabaseError> {
//! let db = DatabasePool::connect("postgres://localhost/icare", &PoolSettings::default()).await?;
//! db.run_migrations().await?;
//!
//! let stores = GeographicRepository::new(db.pool().clone())
//!     .search_nearby(GeoPoint::new(12.97, 77.59)?, 5.0)
//!     .await?;
//! for store in stores {
//!     println!("{} at {:.2} km", store.mobile, store.distance_km);
//! }
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod error;
pub mod geographic_repository;
pub mod id_generator;
pub mod inventory;
pub mod models;
pub mod record_locator;
pub mod store_repository;

pub use connection::*;
pub use error::*;
pub use geographic_repository::*;
pub use id_generator::*;
pub use inventory::*;
pub use models::*;
pub use record_locator::*;
pub use store_repository::{ProductFilter, StoreRepository};
