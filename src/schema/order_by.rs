//! Per-table `orderBy` enum generation
//!
//! Each table gets a `<Plural>OrderBy` enum: `NATURAL`, an `_ASC`/`_DESC`
//! pair per column in table order, and `PRIMARY_KEY_ASC`/`PRIMARY_KEY_DESC`.
//! The enum value strings are part of the client contract.

use crate::pg::{ColumnOrder, TableInfo};
use crate::schema::inflection::{pluralize, singularize, to_pascal_case, to_upper_snake_case};

use async_graphql::dynamic::Enum;
use std::collections::HashMap;

/// The orderBy enum for one table: value names plus their column orderings
#[derive(Debug, Clone)]
pub struct OrderByEnum {
    pub type_name: String,
    /// Value name -> ordering; `None` marks `NATURAL`
    values: Vec<(String, Option<ColumnOrder>)>,
    lookup: HashMap<String, Option<ColumnOrder>>,
}

impl OrderByEnum {
    pub fn for_table(table: &TableInfo) -> Self {
        let type_name = format!(
            "{}OrderBy",
            to_pascal_case(&pluralize(&singularize(&table.name)))
        );

        let mut values: Vec<(String, Option<ColumnOrder>)> = Vec::new();
        values.push(("NATURAL".to_string(), None));

        for column in &table.columns {
            let base = to_upper_snake_case(&column.name);
            values.push((
                format!("{}_ASC", base),
                Some(ColumnOrder {
                    column: column.name.clone(),
                    descending: false,
                }),
            ));
            values.push((
                format!("{}_DESC", base),
                Some(ColumnOrder {
                    column: column.name.clone(),
                    descending: true,
                }),
            ));
        }

        if let Some(pk) = table.primary_key.as_deref() {
            values.push((
                "PRIMARY_KEY_ASC".to_string(),
                Some(ColumnOrder {
                    column: pk.to_string(),
                    descending: false,
                }),
            ));
            values.push((
                "PRIMARY_KEY_DESC".to_string(),
                Some(ColumnOrder {
                    column: pk.to_string(),
                    descending: true,
                }),
            ));
        }

        let lookup = values.iter().cloned().collect();
        OrderByEnum {
            type_name,
            values,
            lookup,
        }
    }

    /// Build the dynamic enum type for registration
    pub fn to_enum(&self) -> Enum {
        let entity = to_pascal_case(&singularize(self.type_name.trim_end_matches("OrderBy")));
        let mut e = Enum::new(self.type_name.as_str())
            .description(format!("Methods to use when ordering `{}`.", entity));
        for (name, _) in &self.values {
            e = e.item(name.as_str());
        }
        e
    }

    pub fn value_names(&self) -> Vec<&str> {
        self.values.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Translate a list of enum value names into column orderings.
    /// `NATURAL` contributes nothing; unknown names never get here because
    /// enum validation rejects them.
    pub fn resolve(&self, names: &[String]) -> Vec<ColumnOrder> {
        names
            .iter()
            .filter_map(|name| self.lookup.get(name).cloned().flatten())
            .collect()
    }
}
