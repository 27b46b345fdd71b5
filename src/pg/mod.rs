/// Postgres access layer
///
/// Catalog introspection plus the `Store` seam the generated resolvers run
/// against, with a Postgres-backed and an in-memory implementation.
mod introspect;
mod store;
mod types;

pub use introspect::introspect;
pub use store::{ColumnOrder, MemoryStore, PgStore, Store, StoreError, StoreResult};
pub use types::{ColumnInfo, PgType, TableInfo};
