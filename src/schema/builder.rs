/// GraphQL schema builder
///
/// This module provides the `SchemaBuilder` which generates a complete
/// relay-style GraphQL schema from introspected Postgres tables, layering
/// registered computed-field plans on top of the generated CRUD surface.

use crate::error::{PostquillError, Result};
use crate::pg::{ColumnInfo, ColumnOrder, Store, TableInfo};
use crate::schema::inflection::{
    collection_field_name, singular_field_name, to_camel_case, type_name,
};
use crate::schema::mutation::{
    create_mutation_fields, create_mutation_input_types, create_payload_objects,
};
use crate::schema::order_by::OrderByEnum;
use crate::schema::plans::PlanRegistry;
use crate::schema::resolver::{
    create_by_node_id_resolver, create_collection_resolver, create_condition_input,
    create_connection_object, create_edge_object, create_entity_object, create_node_field,
    create_page_info_object, create_query_node_id_field, create_query_self_field,
    create_single_resolver,
};
use crate::schema::scalars::register_custom_scalars;

use async_graphql::dynamic::{Interface, InterfaceField, Object, Schema, TypeRef};
use std::sync::Arc;

/// Behaviour knobs the resolvers read at runtime
#[derive(Debug, Clone, Default)]
pub struct SchemaOptions {
    /// Which database diagnostic fields go into GraphQL error extensions
    pub extended_errors: Vec<String>,
}

/// Precomputed naming for one table, shared by every resolver that touches it
pub struct TableMeta {
    pub table: TableInfo,
    /// `Item`
    pub type_name: String,
    /// `item`
    pub singular_field: String,
    /// `items`
    pub collection_field: String,
    /// `ItemsConnection`
    pub connection_type: String,
    /// `ItemsEdge`
    pub edge_type: String,
    /// `ItemCondition`
    pub condition_type: String,
    /// `ItemInput`
    pub input_type: String,
    /// `ItemPatch`
    pub patch_type: String,
    pub order_by: OrderByEnum,
}

impl TableMeta {
    pub fn new(table: TableInfo) -> Arc<Self> {
        let entity = type_name(&table.name);
        let collection = collection_field_name(&table.name);
        let collection_pascal = {
            let mut chars = collection.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        };
        let order_by = OrderByEnum::for_table(&table);

        Arc::new(TableMeta {
            type_name: entity.clone(),
            singular_field: singular_field_name(&table.name),
            collection_field: collection,
            connection_type: format!("{}Connection", collection_pascal),
            edge_type: format!("{}Edge", collection_pascal),
            condition_type: format!("{}Condition", entity),
            input_type: format!("{}Input", entity),
            patch_type: format!("{}Patch", entity),
            order_by,
            table,
        })
    }

    /// camelCase GraphQL field name plus column, per supported column
    pub fn graphql_fields(&self) -> impl Iterator<Item = (String, &ColumnInfo)> {
        self.table
            .columns
            .iter()
            .map(|c| (to_camel_case(&c.name), c))
    }

    /// GraphQL name of the primary key field
    pub fn pk_field_name(&self) -> Option<String> {
        self.table.primary_key.as_deref().map(to_camel_case)
    }

    /// Ordering used when the client sends no `orderBy`: primary key ascending
    pub fn default_order(&self) -> Vec<ColumnOrder> {
        self.table
            .primary_key
            .as_deref()
            .map(|pk| {
                vec![ColumnOrder {
                    column: pk.to_string(),
                    descending: false,
                }]
            })
            .unwrap_or_default()
    }
}

/// Schema builder for generating relay-style GraphQL schemas from tables
pub struct SchemaBuilder {
    store: Arc<dyn Store>,
    tables: Vec<TableInfo>,
    plans: PlanRegistry,
    options: SchemaOptions,
}

impl SchemaBuilder {
    /// Create a builder with the stock plan registry (`Query.addTwoNumbers`)
    pub fn new(store: Arc<dyn Store>) -> Self {
        SchemaBuilder {
            store,
            tables: Vec::new(),
            plans: PlanRegistry::with_defaults(),
            options: SchemaOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SchemaOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_plans(mut self, plans: PlanRegistry) -> Self {
        self.plans = plans;
        self
    }

    pub fn add_table(&mut self, table: TableInfo) -> &mut Self {
        self.tables.push(table);
        self
    }

    pub fn add_tables(&mut self, tables: impl IntoIterator<Item = TableInfo>) -> &mut Self {
        self.tables.extend(tables);
        self
    }

    /// Build the executable schema
    pub fn build(self) -> Result<Schema> {
        if self.tables.is_empty() {
            return Err(PostquillError::SchemaGeneration(
                "No tables to build a schema from".to_string(),
            ));
        }

        let metas: Vec<Arc<TableMeta>> =
            self.tables.into_iter().map(TableMeta::new).collect();
        for meta in &metas {
            tracing::info!("Building schema for table: {}", meta.table.name);
        }

        // Root query type: per-table fields, relay plumbing, computed fields
        let mut query = Object::new("Query")
            .description(
                "The root query type which gives access points into the data universe.",
            )
            .implement("Node");

        for meta in &metas {
            if meta.table.primary_key.is_some() {
                query = query.field(create_single_resolver(meta));
                query = query.field(create_by_node_id_resolver(meta));
            }
            query = query.field(create_collection_resolver(meta));
        }

        query = query
            .field(create_node_field(metas.clone()))
            .field(create_query_node_id_field())
            .field(create_query_self_field());

        for computed in self.plans.fields_for("Query") {
            query = query.field(computed.to_field());
        }

        // Root mutation type: conventional CRUD per table with a primary key
        let mut mutation = Object::new("Mutation").description(
            "The root mutation type which contains root level fields which mutate data.",
        );
        let mut has_mutations = false;
        for meta in &metas {
            if meta.table.primary_key.is_none() {
                continue;
            }
            for field in create_mutation_fields(meta) {
                mutation = mutation.field(field);
                has_mutations = true;
            }
        }
        for computed in self.plans.fields_for("Mutation") {
            mutation = mutation.field(computed.to_field());
            has_mutations = true;
        }

        let mut schema_builder =
            Schema::build("Query", has_mutations.then_some("Mutation"), None);

        for scalar in register_custom_scalars() {
            schema_builder = schema_builder.register(scalar);
        }

        // Relay global-lookup interface
        let node_interface = Interface::new("Node")
            .description("An object with a globally unique `ID`.")
            .field(InterfaceField::new(
                "nodeId",
                TypeRef::named_nn(TypeRef::ID),
            ));
        schema_builder = schema_builder.register(node_interface);
        schema_builder = schema_builder.register(create_page_info_object());

        for meta in &metas {
            schema_builder = schema_builder
                .register(create_entity_object(meta))
                .register(create_connection_object(meta))
                .register(create_edge_object(meta))
                .register(create_condition_input(meta))
                .register(meta.order_by.to_enum());

            if meta.table.primary_key.is_some() {
                for input in create_mutation_input_types(meta) {
                    schema_builder = schema_builder.register(input);
                }
                for payload in create_payload_objects(meta) {
                    schema_builder = schema_builder.register(payload);
                }
            }
        }

        schema_builder = schema_builder.register(query);
        if has_mutations {
            schema_builder = schema_builder.register(mutation);
        }

        let schema = schema_builder
            .data(self.store)
            .data(Arc::new(self.options))
            .finish()
            .map_err(|e| {
                PostquillError::SchemaGeneration(format!("Failed to build schema: {}", e))
            })?;

        Ok(schema)
    }
}
