/// GraphQL schema generation from Postgres tables
///
/// This module provides functionality to generate a relay-style GraphQL schema
/// from introspected Postgres tables, including type mapping, CRUD resolvers,
/// connection pagination, computed field plans and SDL export.

mod builder;
mod connection;
mod export;
mod inflection;
mod mutation;
mod node_id;
mod order_by;
mod plans;
mod resolver;
mod scalars;
mod type_mapping;

pub use builder::{SchemaBuilder, SchemaOptions};
pub use export::export_schema;
pub use plans::{lambda, ComputedField, PlanContext, PlanRegistry, Step};
pub use scalars::register_custom_scalars;
pub use type_mapping::pg_to_graphql_type;
