use postquill::config::{load_config, Config};
use postquill::error::{PostquillError, Result};
use postquill::pg::{introspect, PgStore, Store, TableInfo};
use postquill::schema::{export_schema, SchemaBuilder, SchemaOptions};

use async_graphql::Executor;
use axum::{routing::get, routing::post, Router};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;

const WATCH_INTERVAL: Duration = Duration::from_secs(5);

/// Shared handler state; the schema is swapped out when watched tables change
#[derive(Clone)]
struct AppState {
    schema: Arc<RwLock<async_graphql::dynamic::Schema>>,
}

/// Run the serve command to start the GraphQL server
pub async fn run(config_path: String, port: Option<u16>) -> Result<()> {
    tracing::info!("📖 Loading configuration from {}", config_path);
    let config = load_config(&config_path)?;
    let server_port = port.unwrap_or(config.server.port);

    tracing::info!("🔌 Connecting to Postgres (schema '{}')", config.database.schema);
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;

    let tables = introspect(&pool, &config.database.schema).await?;
    tracing::info!("🔧 Building GraphQL schema for {} tables...", tables.len());

    let store: Arc<dyn Store> = Arc::new(PgStore::new(pool.clone()));
    let schema = build_schema(&store, tables.clone(), &config)?;

    if let Some(path) = &config.graphql.export_schema_path {
        export_schema(&schema, path)?;
    }

    let state = AppState {
        schema: Arc::new(RwLock::new(schema)),
    };

    if config.database.watch {
        tokio::spawn(watch_tables(
            pool,
            store,
            config.clone(),
            state.clone(),
            tables,
        ));
    }

    tracing::info!("✅ Schema built successfully");
    tracing::info!("🚀 GraphQL server running on http://localhost:{}", server_port);
    if config.graphql.graphiql {
        tracing::info!("📊 GraphiQL: http://localhost:{}/graphql", server_port);
    }
    tracing::info!("💡 Press Ctrl+C to stop the server");

    start_http_server(state, &config, server_port).await
}

fn build_schema(
    store: &Arc<dyn Store>,
    tables: Vec<TableInfo>,
    config: &Config,
) -> Result<async_graphql::dynamic::Schema> {
    let mut builder = SchemaBuilder::new(store.clone()).with_options(SchemaOptions {
        extended_errors: config.graphql.extended_errors.clone(),
    });
    builder.add_tables(tables);
    builder.build()
}

/// Poll the database and swap in a fresh schema when the table set changes
async fn watch_tables(
    pool: PgPool,
    store: Arc<dyn Store>,
    config: Config,
    state: AppState,
    mut current: Vec<TableInfo>,
) {
    let mut interval = tokio::time::interval(WATCH_INTERVAL);
    interval.tick().await;

    loop {
        interval.tick().await;
        let tables = match introspect(&pool, &config.database.schema).await {
            Ok(tables) => tables,
            Err(e) => {
                tracing::warn!("Introspection failed, keeping current schema: {}", e);
                continue;
            }
        };
        if tables == current {
            continue;
        }

        tracing::info!("🔄 Table changes detected, rebuilding schema");
        match build_schema(&store, tables.clone(), &config) {
            Ok(schema) => {
                if let Some(path) = &config.graphql.export_schema_path {
                    if let Err(e) = export_schema(&schema, path) {
                        tracing::warn!("Failed to export schema: {}", e);
                    }
                }
                *state.schema.write().await = schema;
                current = tables;
            }
            Err(e) => {
                tracing::warn!("Schema rebuild failed, keeping current schema: {}", e);
            }
        }
    }
}

async fn start_http_server(state: AppState, config: &Config, port: u16) -> Result<()> {
    let graphql_route = if config.graphql.graphiql {
        post(graphql_handler).get(graphiql)
    } else {
        post(graphql_handler)
    };

    let mut app = Router::new()
        .route("/graphql", graphql_route)
        .route("/health", get(health_check))
        .with_state(state);

    if config.graphql.cors {
        app = app.layer(CorsLayer::permissive());
    }

    let ip: IpAddr = config.server.bind.parse().map_err(|e| {
        PostquillError::Config(format!(
            "Invalid bind address '{}': {}",
            config.server.bind, e
        ))
    })?;
    let addr = SocketAddr::new(ip, port);
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        PostquillError::Config(format!(
            "Failed to bind to port {}: {}. Port may be in use.",
            port, e
        ))
    })?;

    axum::serve(listener, app)
        .await
        .map_err(|e| PostquillError::Config(format!("Server error: {}", e)))?;

    Ok(())
}

/// POST /graphql handles both single requests and batches
async fn graphql_handler(
    axum::extract::State(state): axum::extract::State<AppState>,
    axum::Json(request): axum::Json<async_graphql::BatchRequest>,
) -> axum::Json<async_graphql::BatchResponse> {
    let schema = state.schema.read().await.clone();
    axum::Json(schema.execute_batch(request).await)
}

async fn graphiql() -> axum::response::Html<String> {
    axum::response::Html(
        async_graphql::http::GraphiQLSource::build()
            .endpoint("/graphql")
            .finish(),
    )
}

async fn health_check() -> &'static str {
    "OK"
}
