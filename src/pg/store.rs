//! Row storage behind the generated resolvers
//!
//! `PgStore` is the production implementation, building parameterized SQL
//! against the introspected tables. `MemoryStore` serves tests and demos the
//! way CSV registration did for the Delta-backed original of this design:
//! the same resolvers run unchanged against fixture rows.

use crate::pg::types::{PgType, TableInfo};

use async_graphql::{Name, Value};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use indexmap::IndexMap;
use sqlx::postgres::{PgArguments, PgDatabaseError, PgPool, PgRow};
use sqlx::query::Query;
use sqlx::{Postgres, Row as SqlxRow};
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;

/// One ORDER BY term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnOrder {
    pub column: String,
    pub descending: bool,
}

/// Storage error with the Postgres diagnostic fields the GraphQL layer may
/// surface as error extensions.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct StoreError {
    pub message: String,
    pub hint: Option<String>,
    pub detail: Option<String>,
    pub errcode: Option<String>,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        StoreError {
            message: message.into(),
            hint: None,
            detail: None,
            errcode: None,
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if let Some(pg_err) = db_err.try_downcast_ref::<PgDatabaseError>() {
                return StoreError {
                    message: pg_err.message().to_string(),
                    hint: pg_err.hint().map(str::to_string),
                    detail: pg_err.detail().map(str::to_string),
                    errcode: Some(pg_err.code().to_string()),
                };
            }
        }
        StoreError::new(err.to_string())
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Data access seam between the generated resolvers and the database.
///
/// Rows travel as `Value::Object` keyed by column name.
#[async_trait]
pub trait Store: Send + Sync {
    /// Fetch all rows matching the equality conditions, ordered
    async fn select(
        &self,
        table: &TableInfo,
        condition: &[(String, Value)],
        order: &[ColumnOrder],
    ) -> StoreResult<Vec<Value>>;

    /// Fetch a single row by primary key
    async fn select_by_pk(&self, table: &TableInfo, pk: &Value) -> StoreResult<Option<Value>>;

    /// Insert a row and return it as stored
    async fn insert(&self, table: &TableInfo, row: IndexMap<String, Value>) -> StoreResult<Value>;

    /// Apply a partial update to the row with the given primary key
    async fn update(
        &self,
        table: &TableInfo,
        pk: &Value,
        patch: IndexMap<String, Value>,
    ) -> StoreResult<Option<Value>>;

    /// Delete the row with the given primary key, returning it
    async fn delete(&self, table: &TableInfo, pk: &Value) -> StoreResult<Option<Value>>;
}

fn primary_key_column(table: &TableInfo) -> StoreResult<&str> {
    table
        .primary_key
        .as_deref()
        .ok_or_else(|| StoreError::new(format!("Table '{}' has no primary key", table.name)))
}

// ---------------------------------------------------------------------------
// Postgres implementation
// ---------------------------------------------------------------------------

/// sqlx-backed store
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }

    /// Select list with `numeric` columns cast to `float8`, which is how the
    /// generated schema surfaces them (avoids a decimal decode).
    fn select_list(table: &TableInfo) -> String {
        table
            .columns
            .iter()
            .map(|c| match c.pg_type {
                PgType::Numeric => format!("\"{}\"::float8 AS \"{}\"", c.name, c.name),
                _ => format!("\"{}\"", c.name),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn order_clause(table: &TableInfo, order: &[ColumnOrder]) -> String {
        if order.is_empty() {
            return String::new();
        }
        let mut terms: Vec<String> = order
            .iter()
            .map(|o| {
                format!(
                    "\"{}\" {}",
                    o.column,
                    if o.descending { "DESC" } else { "ASC" }
                )
            })
            .collect();
        // Stable ordering: break ties on the primary key
        if let Some(pk) = table.primary_key.as_deref() {
            if !order.iter().any(|o| o.column == pk) {
                terms.push(format!("\"{}\" ASC", pk));
            }
        }
        format!(" ORDER BY {}", terms.join(", "))
    }

    fn bind_value<'q>(
        query: Query<'q, Postgres, PgArguments>,
        value: &Value,
        pg_type: PgType,
    ) -> StoreResult<Query<'q, Postgres, PgArguments>> {
        if let Value::Null = value {
            // Typed null so Postgres can infer the parameter
            return Ok(match pg_type {
                PgType::Int2 => query.bind(None::<i16>),
                PgType::Int4 => query.bind(None::<i32>),
                PgType::Int8 => query.bind(None::<i64>),
                PgType::Float4 => query.bind(None::<f32>),
                PgType::Float8 | PgType::Numeric => query.bind(None::<f64>),
                PgType::Text => query.bind(None::<String>),
                PgType::Bool => query.bind(None::<bool>),
                PgType::Date => query.bind(None::<NaiveDate>),
                PgType::Timestamp => query.bind(None::<NaiveDateTime>),
                PgType::Timestamptz => query.bind(None::<DateTime<Utc>>),
            });
        }

        let mismatch = |expected: &str| {
            StoreError::new(format!("Expected {} value, got {}", expected, value))
        };

        Ok(match pg_type {
            PgType::Int2 | PgType::Int4 | PgType::Int8 => {
                let n = match value {
                    Value::Number(n) => n.as_i64().ok_or_else(|| mismatch("integer"))?,
                    _ => return Err(mismatch("integer")),
                };
                match pg_type {
                    PgType::Int2 => query.bind(n as i16),
                    PgType::Int4 => query.bind(n as i32),
                    _ => query.bind(n),
                }
            }
            PgType::Float4 | PgType::Float8 | PgType::Numeric => {
                let f = match value {
                    Value::Number(n) => n.as_f64().ok_or_else(|| mismatch("float"))?,
                    _ => return Err(mismatch("float")),
                };
                if pg_type == PgType::Float4 {
                    query.bind(f as f32)
                } else {
                    query.bind(f)
                }
            }
            PgType::Text => match value {
                Value::String(s) => query.bind(s.clone()),
                _ => return Err(mismatch("string")),
            },
            PgType::Bool => match value {
                Value::Boolean(b) => query.bind(*b),
                _ => return Err(mismatch("boolean")),
            },
            PgType::Date => match value {
                Value::String(s) => {
                    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
                        .map_err(|e| StoreError::new(format!("Invalid date '{}': {}", s, e)))?;
                    query.bind(date)
                }
                _ => return Err(mismatch("date string")),
            },
            PgType::Timestamp => match value {
                Value::String(s) => {
                    let ts = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                        .map_err(|e| StoreError::new(format!("Invalid timestamp '{}': {}", s, e)))?;
                    query.bind(ts)
                }
                _ => return Err(mismatch("timestamp string")),
            },
            PgType::Timestamptz => match value {
                Value::String(s) => {
                    let ts = DateTime::parse_from_rfc3339(s)
                        .map_err(|e| StoreError::new(format!("Invalid timestamp '{}': {}", s, e)))?
                        .with_timezone(&Utc);
                    query.bind(ts)
                }
                _ => return Err(mismatch("timestamp string")),
            },
        })
    }

    /// Convert a fetched row to a `Value::Object` keyed by column name
    fn row_to_value(table: &TableInfo, row: &PgRow) -> StoreResult<Value> {
        let mut object = IndexMap::new();
        for column in &table.columns {
            let name = column.name.as_str();
            let value = match column.pg_type {
                PgType::Int2 => row
                    .try_get::<Option<i16>, _>(name)?
                    .map(|v| Value::Number(v.into())),
                PgType::Int4 => row
                    .try_get::<Option<i32>, _>(name)?
                    .map(|v| Value::Number(v.into())),
                PgType::Int8 => row
                    .try_get::<Option<i64>, _>(name)?
                    .map(|v| Value::Number(v.into())),
                PgType::Float4 => row
                    .try_get::<Option<f32>, _>(name)?
                    .and_then(|v| serde_json::Number::from_f64(v as f64))
                    .map(Value::Number),
                PgType::Float8 | PgType::Numeric => row
                    .try_get::<Option<f64>, _>(name)?
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number),
                PgType::Text => row
                    .try_get::<Option<String>, _>(name)?
                    .map(Value::String),
                PgType::Bool => row
                    .try_get::<Option<bool>, _>(name)?
                    .map(Value::Boolean),
                PgType::Date => row
                    .try_get::<Option<NaiveDate>, _>(name)?
                    .map(|v| Value::String(v.format("%Y-%m-%d").to_string())),
                PgType::Timestamp => row
                    .try_get::<Option<NaiveDateTime>, _>(name)?
                    .map(|v| Value::String(v.format("%Y-%m-%dT%H:%M:%S%.6f").to_string())),
                PgType::Timestamptz => row
                    .try_get::<Option<DateTime<Utc>>, _>(name)?
                    .map(|v| Value::String(v.to_rfc3339())),
            };
            object.insert(Name::new(name), value.unwrap_or(Value::Null));
        }
        Ok(Value::Object(object))
    }

    fn column_type(table: &TableInfo, column: &str) -> StoreResult<PgType> {
        table
            .column(column)
            .map(|c| c.pg_type)
            .ok_or_else(|| StoreError::new(format!("Unknown column '{}'", column)))
    }
}

#[async_trait]
impl Store for PgStore {
    async fn select(
        &self,
        table: &TableInfo,
        condition: &[(String, Value)],
        order: &[ColumnOrder],
    ) -> StoreResult<Vec<Value>> {
        let mut sql = format!(
            "SELECT {} FROM {}",
            Self::select_list(table),
            table.qualified_name()
        );

        let mut binds: Vec<(&Value, PgType)> = Vec::new();
        let mut clauses: Vec<String> = Vec::new();
        for (column, value) in condition {
            let pg_type = Self::column_type(table, column)?;
            if let Value::Null = value {
                clauses.push(format!("\"{}\" IS NULL", column));
            } else {
                binds.push((value, pg_type));
                clauses.push(format!("\"{}\" = ${}", column, binds.len()));
            }
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(&Self::order_clause(table, order));

        tracing::debug!("Executing query: {}", sql);

        let mut query = sqlx::query(&sql);
        for (value, pg_type) in binds {
            query = Self::bind_value(query, value, pg_type)?;
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(|r| Self::row_to_value(table, r)).collect()
    }

    async fn select_by_pk(&self, table: &TableInfo, pk: &Value) -> StoreResult<Option<Value>> {
        let pk_column = primary_key_column(table)?;
        let sql = format!(
            "SELECT {} FROM {} WHERE \"{}\" = $1",
            Self::select_list(table),
            table.qualified_name(),
            pk_column
        );

        tracing::debug!("Executing query: {}", sql);

        let query = Self::bind_value(sqlx::query(&sql), pk, Self::column_type(table, pk_column)?)?;
        let row = query.fetch_optional(&self.pool).await?;
        row.map(|r| Self::row_to_value(table, &r)).transpose()
    }

    async fn insert(&self, table: &TableInfo, row: IndexMap<String, Value>) -> StoreResult<Value> {
        let mut columns: Vec<String> = Vec::new();
        let mut placeholders: Vec<String> = Vec::new();
        let mut binds: Vec<(&Value, PgType)> = Vec::new();
        for (column, value) in &row {
            let pg_type = Self::column_type(table, column)?;
            binds.push((value, pg_type));
            columns.push(format!("\"{}\"", column));
            placeholders.push(format!("${}", binds.len()));
        }

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
            table.qualified_name(),
            columns.join(", "),
            placeholders.join(", "),
            Self::select_list(table)
        );

        tracing::debug!("Executing query: {}", sql);

        let mut query = sqlx::query(&sql);
        for (value, pg_type) in binds {
            query = Self::bind_value(query, value, pg_type)?;
        }

        let row = query.fetch_one(&self.pool).await?;
        Self::row_to_value(table, &row)
    }

    async fn update(
        &self,
        table: &TableInfo,
        pk: &Value,
        patch: IndexMap<String, Value>,
    ) -> StoreResult<Option<Value>> {
        if patch.is_empty() {
            return self.select_by_pk(table, pk).await;
        }

        let pk_column = primary_key_column(table)?;
        let mut binds: Vec<(&Value, PgType)> = Vec::new();
        let mut assignments: Vec<String> = Vec::new();
        for (column, value) in &patch {
            let pg_type = Self::column_type(table, column)?;
            binds.push((value, pg_type));
            assignments.push(format!("\"{}\" = ${}", column, binds.len()));
        }
        binds.push((pk, Self::column_type(table, pk_column)?));

        let sql = format!(
            "UPDATE {} SET {} WHERE \"{}\" = ${} RETURNING {}",
            table.qualified_name(),
            assignments.join(", "),
            pk_column,
            binds.len(),
            Self::select_list(table)
        );

        tracing::debug!("Executing query: {}", sql);

        let mut query = sqlx::query(&sql);
        for (value, pg_type) in binds {
            query = Self::bind_value(query, value, pg_type)?;
        }

        let row = query.fetch_optional(&self.pool).await?;
        row.map(|r| Self::row_to_value(table, &r)).transpose()
    }

    async fn delete(&self, table: &TableInfo, pk: &Value) -> StoreResult<Option<Value>> {
        let pk_column = primary_key_column(table)?;
        let sql = format!(
            "DELETE FROM {} WHERE \"{}\" = $1 RETURNING {}",
            table.qualified_name(),
            pk_column,
            Self::select_list(table)
        );

        tracing::debug!("Executing query: {}", sql);

        let query = Self::bind_value(sqlx::query(&sql), pk, Self::column_type(table, pk_column)?)?;
        let row = query.fetch_optional(&self.pool).await?;
        row.map(|r| Self::row_to_value(table, &r)).transpose()
    }
}

// ---------------------------------------------------------------------------
// In-memory implementation
// ---------------------------------------------------------------------------

/// In-memory store for tests and demos
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Vec<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Seed a table with fixture rows (`Value::Object` keyed by column name)
    pub fn load_rows(&self, table: &str, rows: Vec<Value>) {
        self.tables
            .write()
            .expect("memory store lock poisoned")
            .insert(table.to_string(), rows);
    }

    fn field_of(row: &Value, column: &str) -> Value {
        match row {
            Value::Object(obj) => obj.get(column).cloned().unwrap_or(Value::Null),
            _ => Value::Null,
        }
    }
}

/// Value equality with numeric widening, so `2` and `2.0` compare equal
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        _ => a == b,
    }
}

/// Ordering with nulls last, matching Postgres ASC defaults
fn compare_values(a: &Value, b: &Value) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Greater,
        (_, Value::Null) => Ordering::Less,
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Boolean(x), Value::Boolean(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn select(
        &self,
        table: &TableInfo,
        condition: &[(String, Value)],
        order: &[ColumnOrder],
    ) -> StoreResult<Vec<Value>> {
        let tables = self.tables.read().expect("memory store lock poisoned");
        let rows = tables.get(&table.name).cloned().unwrap_or_default();
        drop(tables);

        let mut rows: Vec<Value> = rows
            .into_iter()
            .filter(|row| {
                condition.iter().all(|(column, expected)| {
                    values_equal(&MemoryStore::field_of(row, column), expected)
                })
            })
            .collect();

        if !order.is_empty() {
            rows.sort_by(|a, b| {
                for spec in order {
                    let left = MemoryStore::field_of(a, &spec.column);
                    let right = MemoryStore::field_of(b, &spec.column);
                    let ord = compare_values(&left, &right);
                    let ord = if spec.descending { ord.reverse() } else { ord };
                    if ord != std::cmp::Ordering::Equal {
                        return ord;
                    }
                }
                std::cmp::Ordering::Equal
            });
        }

        Ok(rows)
    }

    async fn select_by_pk(&self, table: &TableInfo, pk: &Value) -> StoreResult<Option<Value>> {
        let pk_column = primary_key_column(table)?;
        let tables = self.tables.read().expect("memory store lock poisoned");
        Ok(tables
            .get(&table.name)
            .and_then(|rows| {
                rows.iter()
                    .find(|row| values_equal(&MemoryStore::field_of(row, pk_column), pk))
            })
            .cloned())
    }

    async fn insert(&self, table: &TableInfo, row: IndexMap<String, Value>) -> StoreResult<Value> {
        let pk_column = primary_key_column(table)?;
        let mut object = IndexMap::new();
        for column in &table.columns {
            let value = row.get(&column.name).cloned().unwrap_or(Value::Null);
            object.insert(Name::new(&column.name), value);
        }
        let stored = Value::Object(object);

        let pk = MemoryStore::field_of(&stored, pk_column);
        let mut tables = self.tables.write().expect("memory store lock poisoned");
        let rows = tables.entry(table.name.clone()).or_default();

        if rows
            .iter()
            .any(|r| values_equal(&MemoryStore::field_of(r, pk_column), &pk))
        {
            // Shaped like the Postgres unique_violation report
            return Err(StoreError {
                message: format!(
                    "duplicate key value violates unique constraint \"{}_pkey\"",
                    table.name
                ),
                hint: None,
                detail: Some(format!("Key ({})=({}) already exists.", pk_column, pk)),
                errcode: Some("23505".to_string()),
            });
        }

        rows.push(stored.clone());
        Ok(stored)
    }

    async fn update(
        &self,
        table: &TableInfo,
        pk: &Value,
        patch: IndexMap<String, Value>,
    ) -> StoreResult<Option<Value>> {
        let pk_column = primary_key_column(table)?;
        let mut tables = self.tables.write().expect("memory store lock poisoned");
        let Some(rows) = tables.get_mut(&table.name) else {
            return Ok(None);
        };

        for row in rows.iter_mut() {
            if values_equal(&MemoryStore::field_of(row, pk_column), pk) {
                if let Value::Object(obj) = row {
                    for (column, value) in patch {
                        obj.insert(Name::new(&column), value);
                    }
                }
                return Ok(Some(row.clone()));
            }
        }
        Ok(None)
    }

    async fn delete(&self, table: &TableInfo, pk: &Value) -> StoreResult<Option<Value>> {
        let pk_column = primary_key_column(table)?;
        let mut tables = self.tables.write().expect("memory store lock poisoned");
        let Some(rows) = tables.get_mut(&table.name) else {
            return Ok(None);
        };

        let position = rows
            .iter()
            .position(|row| values_equal(&MemoryStore::field_of(row, pk_column), pk));
        Ok(position.map(|i| rows.remove(i)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pg::types::ColumnInfo;

    fn item_table() -> TableInfo {
        TableInfo {
            name: "item".to_string(),
            schema: "public".to_string(),
            columns: vec![
                ColumnInfo {
                    name: "id".to_string(),
                    pg_type: PgType::Int4,
                    nullable: false,
                    has_default: false,
                },
                ColumnInfo {
                    name: "name".to_string(),
                    pg_type: PgType::Text,
                    nullable: false,
                    has_default: false,
                },
                ColumnInfo {
                    name: "description".to_string(),
                    pg_type: PgType::Text,
                    nullable: true,
                    has_default: false,
                },
            ],
            primary_key: Some("id".to_string()),
        }
    }

    fn row(id: i64, name: &str) -> Value {
        let mut obj = IndexMap::new();
        obj.insert(Name::new("id"), Value::Number(id.into()));
        obj.insert(Name::new("name"), Value::String(name.to_string()));
        obj.insert(Name::new("description"), Value::Null);
        Value::Object(obj)
    }

    #[tokio::test]
    async fn test_memory_store_select_with_order() {
        let store = MemoryStore::new();
        store.load_rows("item", vec![row(2, "b"), row(1, "a"), row(3, "c")]);

        let order = vec![ColumnOrder {
            column: "id".to_string(),
            descending: true,
        }];
        let rows = store.select(&item_table(), &[], &order).await.unwrap();
        assert_eq!(rows.len(), 3);
        assert!(values_equal(
            &MemoryStore::field_of(&rows[0], "id"),
            &Value::Number(3.into())
        ));
    }

    #[tokio::test]
    async fn test_memory_store_select_with_condition() {
        let store = MemoryStore::new();
        store.load_rows("item", vec![row(1, "widget"), row(2, "gadget")]);

        let condition = vec![("name".to_string(), Value::String("gadget".to_string()))];
        let rows = store.select(&item_table(), &condition, &[]).await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_memory_store_insert_and_fetch() {
        let store = MemoryStore::new();
        let mut input = IndexMap::new();
        input.insert("id".to_string(), Value::Number(1.into()));
        input.insert("name".to_string(), Value::String("x".to_string()));

        let inserted = store.insert(&item_table(), input).await.unwrap();
        // Missing columns are stored as explicit nulls
        if let Value::Object(obj) = &inserted {
            assert_eq!(obj.get("description"), Some(&Value::Null));
        } else {
            panic!("Expected object row");
        }

        let fetched = store
            .select_by_pk(&item_table(), &Value::Number(1.into()))
            .await
            .unwrap();
        assert!(fetched.is_some());
    }

    #[tokio::test]
    async fn test_memory_store_duplicate_pk_reports_errcode() {
        let store = MemoryStore::new();
        store.load_rows("item", vec![row(1, "a")]);

        let mut input = IndexMap::new();
        input.insert("id".to_string(), Value::Number(1.into()));
        input.insert("name".to_string(), Value::String("dup".to_string()));

        let err = store.insert(&item_table(), input).await.unwrap_err();
        assert_eq!(err.errcode.as_deref(), Some("23505"));
        assert!(err.detail.unwrap().contains("already exists"));
    }

    #[tokio::test]
    async fn test_memory_store_update_merges_patch() {
        let store = MemoryStore::new();
        store.load_rows("item", vec![row(1, "old")]);

        let mut patch = IndexMap::new();
        patch.insert("name".to_string(), Value::String("new".to_string()));

        let updated = store
            .update(&item_table(), &Value::Number(1.into()), patch)
            .await
            .unwrap()
            .unwrap();
        if let Value::Object(obj) = updated {
            assert_eq!(obj.get("name"), Some(&Value::String("new".to_string())));
        } else {
            panic!("Expected object row");
        }
    }

    #[tokio::test]
    async fn test_memory_store_delete_returns_row() {
        let store = MemoryStore::new();
        store.load_rows("item", vec![row(1, "a")]);

        let deleted = store
            .delete(&item_table(), &Value::Number(1.into()))
            .await
            .unwrap();
        assert!(deleted.is_some());

        let gone = store
            .delete(&item_table(), &Value::Number(1.into()))
            .await
            .unwrap();
        assert!(gone.is_none());
    }

    #[test]
    fn test_pg_select_list_casts_numeric() {
        let mut table = item_table();
        table.columns.push(ColumnInfo {
            name: "price".to_string(),
            pg_type: PgType::Numeric,
            nullable: true,
            has_default: false,
        });
        let list = PgStore::select_list(&table);
        assert!(list.contains("\"price\"::float8 AS \"price\""));
        assert!(list.starts_with("\"id\""));
    }

    #[test]
    fn test_pg_order_clause_appends_pk_tiebreak() {
        let order = vec![ColumnOrder {
            column: "name".to_string(),
            descending: false,
        }];
        let clause = PgStore::order_clause(&item_table(), &order);
        assert_eq!(clause, " ORDER BY \"name\" ASC, \"id\" ASC");
    }

    #[test]
    fn test_compare_values_nulls_last() {
        assert_eq!(
            compare_values(&Value::Null, &Value::Number(1.into())),
            std::cmp::Ordering::Greater
        );
    }
}
