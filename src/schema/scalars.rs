/// Custom GraphQL scalar types
///
/// `Cursor` is the opaque pagination handle; `Date` and `Datetime` carry
/// temporal columns as ISO 8601 strings.

use async_graphql::dynamic::Scalar;
use async_graphql::Value;
use chrono::{DateTime as ChronoDateTime, NaiveDate};

/// Register custom scalars in the schema builder
pub fn register_custom_scalars() -> Vec<Scalar> {
    vec![cursor_scalar(), date_scalar(), datetime_scalar()]
}

/// Opaque pagination cursor
fn cursor_scalar() -> Scalar {
    Scalar::new("Cursor")
        .description("A location in a connection that can be used for resuming pagination.")
}

/// ISO 8601 date scalar (YYYY-MM-DD)
fn date_scalar() -> Scalar {
    Scalar::new("Date")
        .description("ISO 8601 date format (YYYY-MM-DD)")
        .validator(|value| {
            if let Value::String(s) = value {
                NaiveDate::parse_from_str(s.as_str(), "%Y-%m-%d").is_ok()
            } else {
                false
            }
        })
}

/// ISO 8601 datetime scalar
fn datetime_scalar() -> Scalar {
    Scalar::new("Datetime")
        .description("ISO 8601 datetime format")
        .validator(|value| {
            if let Value::String(s) = value {
                ChronoDateTime::parse_from_rfc3339(s.as_str()).is_ok()
                    || chrono::NaiveDateTime::parse_from_str(s.as_str(), "%Y-%m-%dT%H:%M:%S%.f")
                        .is_ok()
            } else {
                false
            }
        })
}
