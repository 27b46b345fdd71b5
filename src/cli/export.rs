use postquill::config::load_config;
use postquill::error::Result;
use postquill::pg::{introspect, PgStore, Store};
use postquill::schema::{export_schema, SchemaBuilder, SchemaOptions};

use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

/// Run the export-schema command: write the SDL without starting the server
pub async fn run(config_path: String, output: Option<String>) -> Result<()> {
    let config = load_config(&config_path)?;

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&config.database.url)
        .await?;
    let tables = introspect(&pool, &config.database.schema).await?;

    let store: Arc<dyn Store> = Arc::new(PgStore::new(pool));
    let mut builder = SchemaBuilder::new(store).with_options(SchemaOptions {
        extended_errors: config.graphql.extended_errors.clone(),
    });
    builder.add_tables(tables);
    let schema = builder.build()?;

    let path = output
        .or_else(|| config.graphql.export_schema_path.clone())
        .unwrap_or_else(|| "./generated/schema.graphql".to_string());
    export_schema(&schema, &path)
}
