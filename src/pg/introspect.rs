//! Catalog introspection
//!
//! Reads `information_schema` to discover tables, columns and primary keys in
//! the target schema. The result feeds the GraphQL schema builder, and is
//! compared against the previous run by the watcher to detect schema drift.

use crate::error::Result;
use crate::pg::types::{ColumnInfo, PgType, TableInfo};

use indexmap::IndexMap;
use sqlx::{PgPool, Row};

const COLUMNS_SQL: &str = r#"
SELECT c.table_name::text   AS table_name,
       c.column_name::text  AS column_name,
       c.data_type::text    AS data_type,
       (c.is_nullable = 'YES')        AS nullable,
       (c.column_default IS NOT NULL) AS has_default
FROM information_schema.columns c
JOIN information_schema.tables t
  ON t.table_schema = c.table_schema AND t.table_name = c.table_name
WHERE c.table_schema = $1
  AND t.table_type = 'BASE TABLE'
ORDER BY c.table_name, c.ordinal_position
"#;

const PRIMARY_KEYS_SQL: &str = r#"
SELECT tc.table_name::text  AS table_name,
       kcu.column_name::text AS column_name
FROM information_schema.table_constraints tc
JOIN information_schema.key_column_usage kcu
  ON kcu.constraint_name = tc.constraint_name
 AND kcu.table_schema = tc.table_schema
WHERE tc.constraint_type = 'PRIMARY KEY'
  AND tc.table_schema = $1
ORDER BY kcu.ordinal_position
"#;

/// Introspect all base tables in `schema`
pub async fn introspect(pool: &PgPool, schema: &str) -> Result<Vec<TableInfo>> {
    let column_rows = sqlx::query(COLUMNS_SQL).bind(schema).fetch_all(pool).await?;
    let pk_rows = sqlx::query(PRIMARY_KEYS_SQL).bind(schema).fetch_all(pool).await?;

    // Single-column primary keys only; composite keys leave the table readable
    // through the collection field but without get/mutate fields.
    let mut primary_keys: IndexMap<String, Vec<String>> = IndexMap::new();
    for row in &pk_rows {
        let table: String = row.try_get("table_name")?;
        let column: String = row.try_get("column_name")?;
        primary_keys.entry(table).or_default().push(column);
    }

    let mut tables: IndexMap<String, TableInfo> = IndexMap::new();
    for row in &column_rows {
        let table_name: String = row.try_get("table_name")?;
        let column_name: String = row.try_get("column_name")?;
        let data_type: String = row.try_get("data_type")?;
        let nullable: bool = row.try_get("nullable")?;
        let has_default: bool = row.try_get("has_default")?;

        let Some(pg_type) = PgType::from_data_type(&data_type) else {
            tracing::warn!(
                "Unsupported column type '{}' for {}.{}, skipping column",
                data_type,
                table_name,
                column_name
            );
            continue;
        };

        let table = tables.entry(table_name.clone()).or_insert_with(|| {
            let primary_key = match primary_keys.get(&table_name).map(Vec::as_slice) {
                Some([single]) => Some(single.clone()),
                Some(_) => {
                    tracing::warn!(
                        "Table '{}' has a composite primary key; get/mutate fields disabled",
                        table_name
                    );
                    None
                }
                None => None,
            };
            TableInfo {
                name: table_name.clone(),
                schema: schema.to_string(),
                columns: Vec::new(),
                primary_key,
            }
        });

        table.columns.push(ColumnInfo {
            name: column_name,
            pg_type,
            nullable,
            has_default,
        });
    }

    // Drop tables whose primary key column was skipped as unsupported
    let tables: Vec<TableInfo> = tables
        .into_values()
        .filter(|t| match &t.primary_key {
            Some(pk) => {
                let ok = t.column(pk).is_some();
                if !ok {
                    tracing::warn!(
                        "Table '{}' primary key '{}' has an unsupported type, skipping table",
                        t.name,
                        pk
                    );
                }
                ok
            }
            None => true,
        })
        .collect();

    tracing::info!("Introspected {} table(s) in schema '{}'", tables.len(), schema);

    Ok(tables)
}
