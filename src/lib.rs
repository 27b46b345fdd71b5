pub mod config;
pub mod error;
pub mod pg;
pub mod schema;

// Re-export commonly used types
pub use config::{Config, DatabaseConfig, GraphqlConfig, ServerConfig};
pub use error::{PostquillError, Result};
pub use pg::{MemoryStore, PgStore, Store};
pub use schema::SchemaBuilder;
