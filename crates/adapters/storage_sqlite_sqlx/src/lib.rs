//! # domus-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port traits defined in `domus-app::ports`
//! - Manage the `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//!
//! ## Dependency rule
//! Depends on `domus-app` (for port traits) and `domus-domain` (for domain
//! types). The `app` and `domain` crates must never reference this adapter.

pub mod error;
pub mod measurement_repo;
pub mod pool;
pub mod state_repo;
pub mod stats_repo;
pub mod structure_repo;

pub use error::StorageError;
pub use measurement_repo::SqliteMeasurementStore;
pub use pool::{Config, Database};
pub use state_repo::SqliteActuatorStateRepository;
pub use stats_repo::SqliteStatisticsRepository;
pub use structure_repo::SqliteStructureRepository;
