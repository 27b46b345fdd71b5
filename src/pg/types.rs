use serde::{Deserialize, Serialize};

/// Postgres column types the schema generator understands.
///
/// Anything else is skipped during introspection with a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PgType {
    Int2,
    Int4,
    Int8,
    Float4,
    Float8,
    Numeric,
    Text,
    Bool,
    Date,
    Timestamp,
    Timestamptz,
}

impl PgType {
    /// Map an `information_schema.columns.data_type` string to a known type
    pub fn from_data_type(data_type: &str) -> Option<PgType> {
        match data_type {
            "smallint" => Some(PgType::Int2),
            "integer" => Some(PgType::Int4),
            "bigint" => Some(PgType::Int8),
            "real" => Some(PgType::Float4),
            "double precision" => Some(PgType::Float8),
            "numeric" => Some(PgType::Numeric),
            "text" | "character varying" | "character" => Some(PgType::Text),
            "boolean" => Some(PgType::Bool),
            "date" => Some(PgType::Date),
            "timestamp without time zone" => Some(PgType::Timestamp),
            "timestamp with time zone" => Some(PgType::Timestamptz),
            _ => None,
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, PgType::Int2 | PgType::Int4 | PgType::Int8)
    }

    pub fn is_float(&self) -> bool {
        matches!(self, PgType::Float4 | PgType::Float8 | PgType::Numeric)
    }
}

/// A single column of an introspected table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Column name as it appears in Postgres
    pub name: String,
    pub pg_type: PgType,
    pub nullable: bool,
    /// Whether the column has a default (affects input requiredness)
    pub has_default: bool,
}

/// An introspected table, the unit the schema builder works from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableInfo {
    /// Table name as it appears in Postgres
    pub name: String,
    /// Schema the table lives in
    pub schema: String,
    pub columns: Vec<ColumnInfo>,
    /// Primary key column name; tables without one get no get/mutate fields
    pub primary_key: Option<String>,
}

impl TableInfo {
    pub fn column(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn primary_key_column(&self) -> Option<&ColumnInfo> {
        self.primary_key.as_deref().and_then(|pk| self.column(pk))
    }

    /// Fully qualified, quoted relation name for SQL generation
    pub fn qualified_name(&self) -> String {
        format!("\"{}\".\"{}\"", self.schema, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_mapping() {
        assert_eq!(PgType::from_data_type("integer"), Some(PgType::Int4));
        assert_eq!(PgType::from_data_type("character varying"), Some(PgType::Text));
        assert_eq!(
            PgType::from_data_type("timestamp with time zone"),
            Some(PgType::Timestamptz)
        );
        assert_eq!(PgType::from_data_type("bytea"), None);
    }

    #[test]
    fn test_qualified_name_quotes_identifiers() {
        let table = TableInfo {
            name: "item".to_string(),
            schema: "public".to_string(),
            columns: vec![],
            primary_key: None,
        };
        assert_eq!(table.qualified_name(), "\"public\".\"item\"");
    }

    #[test]
    fn test_primary_key_column_lookup() {
        let table = TableInfo {
            name: "item".to_string(),
            schema: "public".to_string(),
            columns: vec![ColumnInfo {
                name: "id".to_string(),
                pg_type: PgType::Int4,
                nullable: false,
                has_default: false,
            }],
            primary_key: Some("id".to_string()),
        };
        assert_eq!(table.primary_key_column().unwrap().name, "id");
    }
}
