/// Query-side resolvers for the generated schema
///
/// This module provides resolver functions for the root query fields and the
/// per-table object, connection and edge types. Parent values travel as
/// `FieldValue::owned_any` payloads and are downcast back in field resolvers.

use crate::pg::{Store, StoreError};
use crate::schema::builder::{SchemaOptions, TableMeta};
use crate::schema::connection::{self, PageArgs};
use crate::schema::node_id::{self, NodeId};
use crate::schema::type_mapping::pg_to_graphql_type;

use async_graphql::dynamic::{
    Field, FieldFuture, FieldValue, InputObject, InputValue, Object, ResolverContext, TypeRef,
    ValueAccessor,
};
use async_graphql::{Error, ErrorExtensions, Value};
use std::sync::Arc;

/// Parent value for the root query type and for payload `query` fields
pub(crate) struct QueryRoot;

/// Parent value for a connection field
pub(crate) struct ConnectionValue {
    pub nodes: Vec<(usize, Value)>,
    pub total_count: usize,
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

/// Parent value for an edge
pub(crate) struct EdgeValue {
    pub cursor: Option<String>,
    pub node: Value,
}

/// Parent value for a `PageInfo` field
pub(crate) struct PageInfoValue {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

/// Materialize an already-validated argument or input field into a `Value`
pub(crate) fn accessor_to_value(accessor: &ValueAccessor) -> Value {
    if accessor.is_null() {
        return Value::Null;
    }
    if let Ok(b) = accessor.boolean() {
        return Value::Boolean(b);
    }
    if let Ok(i) = accessor.i64() {
        return Value::Number(i.into());
    }
    if let Ok(f) = accessor.f64() {
        if let Some(n) = serde_json::Number::from_f64(f) {
            return Value::Number(n);
        }
    }
    if let Ok(s) = accessor.string() {
        return Value::String(s.to_string());
    }
    Value::Null
}

/// Convert a store error into a GraphQL error, copying the configured
/// diagnostic fields into extensions.
pub(crate) fn store_error(err: StoreError, options: &SchemaOptions) -> Error {
    let extended = options.extended_errors.clone();
    Error::new(err.message.clone()).extend_with(|_, e| {
        for field in &extended {
            match field.as_str() {
                "hint" => {
                    if let Some(hint) = &err.hint {
                        e.set("hint", hint.clone());
                    }
                }
                "detail" => {
                    if let Some(detail) = &err.detail {
                        e.set("detail", detail.clone());
                    }
                }
                "errcode" => {
                    if let Some(errcode) = &err.errcode {
                        e.set("errcode", errcode.clone());
                    }
                }
                _ => {}
            }
        }
    })
}

pub(crate) fn get_store(ctx: &ResolverContext) -> Result<Arc<dyn Store>, Error> {
    ctx.data::<Arc<dyn Store>>()
        .map(Arc::clone)
        .map_err(|_| Error::new("Store not configured"))
}

pub(crate) fn get_options(ctx: &ResolverContext) -> Arc<SchemaOptions> {
    ctx.data::<Arc<SchemaOptions>>()
        .map(Arc::clone)
        .unwrap_or_default()
}

/// Read a row field out of a parent object by column name
fn row_field(row: &Value, column: &str) -> Value {
    if let Value::Object(obj) = row {
        if let Some(value) = obj.get(column) {
            return value.clone();
        }
    }
    Value::Null
}

pub(crate) fn row_node_id(meta: &TableMeta, row: &Value) -> Option<String> {
    let pk_column = meta.table.primary_key.as_deref()?;
    let pk = row_field(row, pk_column);
    if pk == Value::Null {
        return None;
    }
    Some(node_id::encode_row(&meta.collection_field, &pk))
}

/// Build the object type for one table (e.g. `Item`), implementing `Node`
pub(crate) fn create_entity_object(meta: &Arc<TableMeta>) -> Object {
    let mut object = Object::new(meta.type_name.as_str());

    for (field_name, column) in meta.graphql_fields() {
        let column_name = column.name.clone();
        let type_ref = pg_to_graphql_type(column.pg_type, column.nullable);
        let graphql_field = Field::new(field_name, type_ref, move |ctx| {
            let column_name = column_name.clone();
            FieldFuture::new(async move {
                let row = ctx.parent_value.try_downcast_ref::<Value>()?;
                Ok(Some(FieldValue::value(row_field(row, &column_name))))
            })
        });
        object = object.field(graphql_field);
    }

    if meta.table.primary_key.is_some() {
        let meta_for_node_id = meta.clone();
        object = object
            .field(Field::new(
                "nodeId",
                TypeRef::named_nn(TypeRef::ID),
                move |ctx| {
                    let meta = meta_for_node_id.clone();
                    FieldFuture::new(async move {
                        let row = ctx.parent_value.try_downcast_ref::<Value>()?;
                        let id = row_node_id(&meta, row)
                            .ok_or_else(|| Error::new("Row has no primary key value"))?;
                        Ok(Some(FieldValue::value(Value::String(id))))
                    })
                },
            ))
            .implement("Node");
    }

    object
}

/// Build the `<Type>Condition` input: equality per column, all optional
pub(crate) fn create_condition_input(meta: &Arc<TableMeta>) -> InputObject {
    let mut input = InputObject::new(meta.condition_type.as_str()).description(format!(
        "A condition to be used against `{}` object types. All fields are tested \
         for equality and combined with a logical 'and.'",
        meta.type_name
    ));
    for (field_name, column) in meta.graphql_fields() {
        input = input.field(InputValue::new(
            field_name,
            pg_to_graphql_type(column.pg_type, true),
        ));
    }
    input
}

/// `item(id: Int!): Item` — fetch a single row by primary key
pub(crate) fn create_single_resolver(meta: &Arc<TableMeta>) -> Field {
    let meta_outer = meta.clone();
    let pk_field = meta.pk_field_name().expect("table without primary key");
    let pk_field_arg = pk_field.clone();
    let pk_type = meta
        .table
        .primary_key_column()
        .map(|c| pg_to_graphql_type(c.pg_type, false))
        .expect("table without primary key");

    Field::new(
        meta.singular_field.as_str(),
        TypeRef::named(meta.type_name.as_str()),
        move |ctx| {
            let meta = meta_outer.clone();
            let pk_field = pk_field.clone();
            FieldFuture::new(async move {
                let pk = accessor_to_value(&ctx.args.try_get(&pk_field)?);
                let store = get_store(&ctx)?;
                let options = get_options(&ctx);
                let row = store
                    .select_by_pk(&meta.table, &pk)
                    .await
                    .map_err(|e| store_error(e, &options))?;
                Ok(row.map(FieldValue::owned_any))
            })
        },
    )
    .argument(InputValue::new(pk_field_arg, pk_type))
}

/// `itemByNodeId(nodeId: ID!): Item`
pub(crate) fn create_by_node_id_resolver(meta: &Arc<TableMeta>) -> Field {
    let meta_outer = meta.clone();
    let field_name = format!("{}ByNodeId", meta.singular_field);

    Field::new(
        field_name,
        TypeRef::named(meta.type_name.as_str()),
        move |ctx| {
            let meta = meta_outer.clone();
            FieldFuture::new(async move {
                let raw = ctx.args.try_get("nodeId")?;
                let raw = raw.string()?;
                let Some(NodeId::Row { collection, pk }) = node_id::decode(raw) else {
                    return Err(Error::new(format!("Invalid nodeId: {}", raw)));
                };
                if collection != meta.collection_field {
                    return Err(Error::new(format!("Invalid nodeId: {}", raw)));
                }
                let store = get_store(&ctx)?;
                let options = get_options(&ctx);
                let row = store
                    .select_by_pk(&meta.table, &pk)
                    .await
                    .map_err(|e| store_error(e, &options))?;
                Ok(row.map(FieldValue::owned_any))
            })
        },
    )
    .argument(InputValue::new("nodeId", TypeRef::named_nn(TypeRef::ID)))
}

fn non_negative(accessor: ValueAccessor, name: &str) -> Result<usize, Error> {
    let value = accessor.i64()?;
    if value < 0 {
        return Err(Error::new(format!("'{}' must not be negative", name)));
    }
    Ok(value as usize)
}

/// `items(first, last, offset, before, after, condition, orderBy): ItemsConnection!`
pub(crate) fn create_collection_resolver(meta: &Arc<TableMeta>) -> Field {
    let meta_outer = meta.clone();

    Field::new(
        meta.collection_field.as_str(),
        TypeRef::named(meta.connection_type.as_str()),
        move |ctx| {
            let meta = meta_outer.clone();
            FieldFuture::new(async move {
                let mut page_args = PageArgs::default();
                if let Ok(v) = ctx.args.try_get("first") {
                    page_args.first = Some(non_negative(v, "first")?);
                }
                if let Ok(v) = ctx.args.try_get("last") {
                    page_args.last = Some(non_negative(v, "last")?);
                }
                if let Ok(v) = ctx.args.try_get("offset") {
                    page_args.offset = Some(non_negative(v, "offset")?);
                }
                if let Ok(v) = ctx.args.try_get("after") {
                    let raw = v.string()?;
                    page_args.after = Some(
                        connection::decode_cursor(raw)
                            .ok_or_else(|| Error::new(format!("Invalid cursor: {}", raw)))?,
                    );
                }
                if let Ok(v) = ctx.args.try_get("before") {
                    let raw = v.string()?;
                    page_args.before = Some(
                        connection::decode_cursor(raw)
                            .ok_or_else(|| Error::new(format!("Invalid cursor: {}", raw)))?,
                    );
                }

                let mut condition: Vec<(String, Value)> = Vec::new();
                if let Ok(v) = ctx.args.try_get("condition") {
                    let obj = v.object()?;
                    for (field_name, column) in meta.graphql_fields() {
                        if let Some(value) = obj.get(field_name.as_str()) {
                            condition.push((column.name.clone(), accessor_to_value(&value)));
                        }
                    }
                }

                // Default ordering is the primary key, so pagination is stable
                let order = if let Ok(v) = ctx.args.try_get("orderBy") {
                    let list = v.list()?;
                    let mut names = Vec::new();
                    for item in list.iter() {
                        names.push(item.enum_name()?.to_string());
                    }
                    meta.order_by.resolve(&names)
                } else {
                    meta.default_order()
                };

                let store = get_store(&ctx)?;
                let options = get_options(&ctx);
                let rows = store
                    .select(&meta.table, &condition, &order)
                    .await
                    .map_err(|e| store_error(e, &options))?;

                let page = connection::paginate(rows, &page_args);
                let connection_value = ConnectionValue {
                    start_cursor: page.start_cursor(),
                    end_cursor: page.end_cursor(),
                    nodes: page.nodes,
                    total_count: page.total_count,
                    has_next_page: page.has_next_page,
                    has_previous_page: page.has_previous_page,
                };
                Ok(Some(FieldValue::owned_any(connection_value)))
            })
        },
    )
    .argument(InputValue::new("first", TypeRef::named(TypeRef::INT)))
    .argument(InputValue::new("last", TypeRef::named(TypeRef::INT)))
    .argument(InputValue::new("offset", TypeRef::named(TypeRef::INT)))
    .argument(InputValue::new("before", TypeRef::named("Cursor")))
    .argument(InputValue::new("after", TypeRef::named("Cursor")))
    .argument(InputValue::new(
        "condition",
        TypeRef::named(meta.condition_type.as_str()),
    ))
    .argument(InputValue::new(
        "orderBy",
        TypeRef::named_nn_list(meta.order_by.type_name.as_str()),
    ))
}

/// `ItemsConnection` object
pub(crate) fn create_connection_object(meta: &Arc<TableMeta>) -> Object {
    let edge_type = meta.edge_type.clone();

    Object::new(meta.connection_type.as_str())
        .description(format!("A connection to a list of `{}` values.", meta.type_name))
        .field(Field::new(
            "nodes",
            TypeRef::named_list_nn(meta.type_name.as_str()),
            move |ctx| {
                FieldFuture::new(async move {
                    let conn = ctx.parent_value.try_downcast_ref::<ConnectionValue>()?;
                    let nodes = conn
                        .nodes
                        .iter()
                        .map(|(_, row)| FieldValue::owned_any(row.clone()));
                    Ok(Some(FieldValue::list(nodes)))
                })
            },
        ))
        .field(Field::new(
            "edges",
            TypeRef::named_nn_list_nn(edge_type),
            move |ctx| {
                FieldFuture::new(async move {
                    let conn = ctx.parent_value.try_downcast_ref::<ConnectionValue>()?;
                    let edges = conn.nodes.iter().map(|(index, row)| {
                        FieldValue::owned_any(EdgeValue {
                            cursor: Some(connection::encode_cursor(*index)),
                            node: row.clone(),
                        })
                    });
                    Ok(Some(FieldValue::list(edges)))
                })
            },
        ))
        .field(Field::new(
            "pageInfo",
            TypeRef::named_nn("PageInfo"),
            move |ctx| {
                FieldFuture::new(async move {
                    let conn = ctx.parent_value.try_downcast_ref::<ConnectionValue>()?;
                    Ok(Some(FieldValue::owned_any(PageInfoValue {
                        has_next_page: conn.has_next_page,
                        has_previous_page: conn.has_previous_page,
                        start_cursor: conn.start_cursor.clone(),
                        end_cursor: conn.end_cursor.clone(),
                    })))
                })
            },
        ))
        .field(Field::new(
            "totalCount",
            TypeRef::named_nn(TypeRef::INT),
            move |ctx| {
                FieldFuture::new(async move {
                    let conn = ctx.parent_value.try_downcast_ref::<ConnectionValue>()?;
                    Ok(Some(FieldValue::value(Value::Number(
                        (conn.total_count as i64).into(),
                    ))))
                })
            },
        ))
}

/// `ItemsEdge` object
pub(crate) fn create_edge_object(meta: &Arc<TableMeta>) -> Object {
    Object::new(meta.edge_type.as_str())
        .description(format!("A `{}` edge in the connection.", meta.type_name))
        .field(Field::new(
            "cursor",
            TypeRef::named("Cursor"),
            move |ctx| {
                FieldFuture::new(async move {
                    let edge = ctx.parent_value.try_downcast_ref::<EdgeValue>()?;
                    Ok(edge
                        .cursor
                        .clone()
                        .map(|c| FieldValue::value(Value::String(c))))
                })
            },
        ))
        .field(Field::new(
            "node",
            TypeRef::named(meta.type_name.as_str()),
            move |ctx| {
                FieldFuture::new(async move {
                    let edge = ctx.parent_value.try_downcast_ref::<EdgeValue>()?;
                    Ok(Some(FieldValue::owned_any(edge.node.clone())))
                })
            },
        ))
}

/// Shared `PageInfo` object
pub(crate) fn create_page_info_object() -> Object {
    Object::new("PageInfo")
        .description("Information about pagination in a connection.")
        .field(Field::new(
            "hasNextPage",
            TypeRef::named_nn(TypeRef::BOOLEAN),
            move |ctx| {
                FieldFuture::new(async move {
                    let info = ctx.parent_value.try_downcast_ref::<PageInfoValue>()?;
                    Ok(Some(FieldValue::value(Value::Boolean(info.has_next_page))))
                })
            },
        ))
        .field(Field::new(
            "hasPreviousPage",
            TypeRef::named_nn(TypeRef::BOOLEAN),
            move |ctx| {
                FieldFuture::new(async move {
                    let info = ctx.parent_value.try_downcast_ref::<PageInfoValue>()?;
                    Ok(Some(FieldValue::value(Value::Boolean(
                        info.has_previous_page,
                    ))))
                })
            },
        ))
        .field(Field::new(
            "startCursor",
            TypeRef::named("Cursor"),
            move |ctx| {
                FieldFuture::new(async move {
                    let info = ctx.parent_value.try_downcast_ref::<PageInfoValue>()?;
                    Ok(info
                        .start_cursor
                        .clone()
                        .map(|c| FieldValue::value(Value::String(c))))
                })
            },
        ))
        .field(Field::new(
            "endCursor",
            TypeRef::named("Cursor"),
            move |ctx| {
                FieldFuture::new(async move {
                    let info = ctx.parent_value.try_downcast_ref::<PageInfoValue>()?;
                    Ok(info
                        .end_cursor
                        .clone()
                        .map(|c| FieldValue::value(Value::String(c))))
                })
            },
        ))
}

/// `node(nodeId: ID!): Node` — global object lookup across all tables
pub(crate) fn create_node_field(metas: Vec<Arc<TableMeta>>) -> Field {
    Field::new("node", TypeRef::named("Node"), move |ctx| {
        let metas = metas.clone();
        FieldFuture::new(async move {
            let raw = ctx.args.try_get("nodeId")?;
            let raw = raw.string()?;
            match node_id::decode(raw) {
                Some(NodeId::Query) => {
                    Ok(Some(FieldValue::owned_any(QueryRoot).with_type("Query")))
                }
                Some(NodeId::Row { collection, pk }) => {
                    let Some(meta) = metas.iter().find(|m| m.collection_field == collection)
                    else {
                        return Err(Error::new(format!("Invalid nodeId: {}", raw)));
                    };
                    let store = get_store(&ctx)?;
                    let options = get_options(&ctx);
                    let row = store
                        .select_by_pk(&meta.table, &pk)
                        .await
                        .map_err(|e| store_error(e, &options))?;
                    Ok(row.map(|r| {
                        FieldValue::owned_any(r).with_type(meta.type_name.clone())
                    }))
                }
                None => Err(Error::new(format!("Invalid nodeId: {}", raw))),
            }
        })
    })
    .argument(InputValue::new("nodeId", TypeRef::named_nn(TypeRef::ID)))
}

/// `nodeId: ID!` on the root query type
pub(crate) fn create_query_node_id_field() -> Field {
    Field::new("nodeId", TypeRef::named_nn(TypeRef::ID), move |_ctx| {
        FieldFuture::new(async move {
            Ok(Some(FieldValue::value(Value::String(
                node_id::encode_query(),
            ))))
        })
    })
}

/// `query: Query!` — the root type nested one level down
pub(crate) fn create_query_self_field() -> Field {
    Field::new("query", TypeRef::named_nn("Query"), move |_ctx| {
        FieldFuture::new(async move { Ok(Some(FieldValue::owned_any(QueryRoot))) })
    })
}
