/// Postgres to GraphQL type mapping
///
/// Integer columns map to `Int`, floating point and numeric to `Float`, text
/// to `String`, temporal columns to the `Date`/`Datetime` scalars. The `id`
/// column deliberately stays `Int` — the relay-global `nodeId` field is the
/// schema's `ID`, and clients depend on `id: Int!` staying an integer.

use crate::pg::PgType;
use async_graphql::dynamic::TypeRef;

/// Map a column type to a GraphQL output/input type
pub fn pg_to_graphql_type(pg_type: PgType, nullable: bool) -> TypeRef {
    let name = graphql_type_name(pg_type);
    if nullable {
        TypeRef::named(name)
    } else {
        TypeRef::named_nn(name)
    }
}

/// The GraphQL type name a column type maps to
pub fn graphql_type_name(pg_type: PgType) -> &'static str {
    match pg_type {
        PgType::Int2 | PgType::Int4 | PgType::Int8 => TypeRef::INT,
        PgType::Float4 | PgType::Float8 | PgType::Numeric => TypeRef::FLOAT,
        PgType::Text => TypeRef::STRING,
        PgType::Bool => TypeRef::BOOLEAN,
        PgType::Date => "Date",
        PgType::Timestamp | PgType::Timestamptz => "Datetime",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_mapping() {
        let type_ref = pg_to_graphql_type(PgType::Int4, false);
        assert_eq!(type_ref.to_string(), "Int!");
    }

    #[test]
    fn test_id_column_is_not_graphql_id() {
        // The contract pins item.id to Int!; nodeId carries the global ID
        let type_ref = pg_to_graphql_type(PgType::Int4, false);
        assert!(!type_ref.to_string().contains("ID"));
    }

    #[test]
    fn test_nullable_text_mapping() {
        let type_ref = pg_to_graphql_type(PgType::Text, true);
        assert_eq!(type_ref.to_string(), "String");
    }

    #[test]
    fn test_numeric_maps_to_float() {
        assert_eq!(graphql_type_name(PgType::Numeric), "Float");
    }

    #[test]
    fn test_temporal_mapping() {
        assert_eq!(graphql_type_name(PgType::Date), "Date");
        assert_eq!(graphql_type_name(PgType::Timestamptz), "Datetime");
    }
}
