//! Database utilities.
//!
//! Async PostgreSQL connection pooling using diesel_async with bb8, plus
//! the lifecycle operations used by the bootstrap commands.

pub mod admin;
pub mod connection;
pub mod migrate;
mod pool;
mod types;
pub mod wait;

pub use admin::{create_database, drop_database, drop_tables, reset_db};
pub use connection::{ConnectionTarget, MAINTENANCE_DATABASE, quote_identifier};
pub use migrate::{MIGRATIONS, migrate_db};
pub use pool::{AsyncDbPool, QUERY_LOG_TARGET, establish_pool, ping};
pub use types::ResetMode;
pub use wait::{WaitOptions, wait_for_db};
