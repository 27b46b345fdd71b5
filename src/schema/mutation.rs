//! CRUD mutation generation
//!
//! Each table with a single-column primary key gets five mutations:
//! `createItem`, `updateItem`, `updateItemByNodeId`, `deleteItem` and
//! `deleteItemByNodeId`. Every input carries an optional `clientMutationId`
//! which the payload echoes back verbatim.

use crate::schema::builder::TableMeta;
use crate::schema::node_id::{self, NodeId};
use crate::schema::resolver::{
    accessor_to_value, get_options, get_store, row_node_id, store_error, EdgeValue, QueryRoot,
};
use crate::schema::type_mapping::pg_to_graphql_type;

use async_graphql::dynamic::{
    Field, FieldFuture, FieldValue, InputObject, InputValue, Object, ObjectAccessor,
    ResolverContext, TypeRef,
};
use async_graphql::{Error, Value};
use indexmap::IndexMap;
use std::sync::Arc;

/// Parent value for mutation payload objects
pub(crate) struct PayloadValue {
    pub client_mutation_id: Option<String>,
    pub row: Option<Value>,
    pub deleted_node_id: Option<String>,
}

fn create_input_name(meta: &TableMeta) -> String {
    format!("Create{}Input", meta.type_name)
}

fn update_input_name(meta: &TableMeta) -> String {
    format!("Update{}Input", meta.type_name)
}

fn update_by_node_id_input_name(meta: &TableMeta) -> String {
    format!("Update{}ByNodeIdInput", meta.type_name)
}

fn delete_input_name(meta: &TableMeta) -> String {
    format!("Delete{}Input", meta.type_name)
}

fn delete_by_node_id_input_name(meta: &TableMeta) -> String {
    format!("Delete{}ByNodeIdInput", meta.type_name)
}

fn create_payload_name(meta: &TableMeta) -> String {
    format!("Create{}Payload", meta.type_name)
}

fn update_payload_name(meta: &TableMeta) -> String {
    format!("Update{}Payload", meta.type_name)
}

fn delete_payload_name(meta: &TableMeta) -> String {
    format!("Delete{}Payload", meta.type_name)
}

fn edge_field_name(meta: &TableMeta) -> String {
    format!("{}Edge", meta.singular_field)
}

fn deleted_node_id_field_name(meta: &TableMeta) -> String {
    format!("deleted{}NodeId", meta.type_name)
}

fn client_mutation_id_input() -> InputValue {
    InputValue::new("clientMutationId", TypeRef::named(TypeRef::STRING)).description(
        "An arbitrary string value with no semantic meaning. Will be included in the \
         payload verbatim. May be used to track mutations by the client.",
    )
}

/// All input object types for one table's mutations
pub(crate) fn create_mutation_input_types(meta: &Arc<TableMeta>) -> Vec<InputObject> {
    let pk_field = meta.pk_field_name().unwrap_or_default();
    let pk_type = meta
        .table
        .primary_key_column()
        .map(|c| pg_to_graphql_type(c.pg_type, false))
        .unwrap_or_else(|| TypeRef::named_nn(TypeRef::INT));

    // ItemInput: non-nullable columns without a default stay required
    let mut row_input = InputObject::new(meta.input_type.as_str())
        .description(format!("An input for mutations affecting `{}`", meta.type_name));
    for (field_name, column) in meta.graphql_fields() {
        let optional = column.nullable || column.has_default;
        row_input = row_input.field(InputValue::new(
            field_name,
            pg_to_graphql_type(column.pg_type, optional),
        ));
    }

    // ItemPatch: everything optional
    let mut patch_input = InputObject::new(meta.patch_type.as_str()).description(format!(
        "Represents an update to a `{}`. Fields that are set will be updated.",
        meta.type_name
    ));
    for (field_name, column) in meta.graphql_fields() {
        patch_input = patch_input.field(InputValue::new(
            field_name,
            pg_to_graphql_type(column.pg_type, true),
        ));
    }

    let create_input = InputObject::new(create_input_name(meta))
        .description(format!("All input for the create `{}` mutation.", meta.type_name))
        .field(client_mutation_id_input())
        .field(InputValue::new(
            meta.singular_field.as_str(),
            TypeRef::named_nn(meta.input_type.as_str()),
        ));

    let update_input = InputObject::new(update_input_name(meta))
        .description(format!("All input for the `update{}` mutation.", meta.type_name))
        .field(client_mutation_id_input())
        .field(InputValue::new(pk_field.as_str(), pk_type.clone()))
        .field(InputValue::new(
            "patch",
            TypeRef::named_nn(meta.patch_type.as_str()),
        ));

    let update_by_node_id_input = InputObject::new(update_by_node_id_input_name(meta))
        .description(format!(
            "All input for the `update{}ByNodeId` mutation.",
            meta.type_name
        ))
        .field(client_mutation_id_input())
        .field(InputValue::new("nodeId", TypeRef::named_nn(TypeRef::ID)))
        .field(InputValue::new(
            "patch",
            TypeRef::named_nn(meta.patch_type.as_str()),
        ));

    let delete_input = InputObject::new(delete_input_name(meta))
        .description(format!("All input for the `delete{}` mutation.", meta.type_name))
        .field(client_mutation_id_input())
        .field(InputValue::new(pk_field.as_str(), pk_type));

    let delete_by_node_id_input = InputObject::new(delete_by_node_id_input_name(meta))
        .description(format!(
            "All input for the `delete{}ByNodeId` mutation.",
            meta.type_name
        ))
        .field(client_mutation_id_input())
        .field(InputValue::new("nodeId", TypeRef::named_nn(TypeRef::ID)));

    vec![
        row_input,
        patch_input,
        create_input,
        update_input,
        update_by_node_id_input,
        delete_input,
        delete_by_node_id_input,
    ]
}

fn payload_object(meta: &Arc<TableMeta>, name: String, description: String) -> Object {
    let meta_edge = meta.clone();

    Object::new(name)
        .description(description)
        .field(Field::new(
            "clientMutationId",
            TypeRef::named(TypeRef::STRING),
            move |ctx| {
                FieldFuture::new(async move {
                    let payload = ctx.parent_value.try_downcast_ref::<PayloadValue>()?;
                    Ok(payload
                        .client_mutation_id
                        .clone()
                        .map(|id| FieldValue::value(Value::String(id))))
                })
            },
        ))
        .field(Field::new(
            meta.singular_field.as_str(),
            TypeRef::named(meta.type_name.as_str()),
            move |ctx| {
                FieldFuture::new(async move {
                    let payload = ctx.parent_value.try_downcast_ref::<PayloadValue>()?;
                    Ok(payload.row.clone().map(FieldValue::owned_any))
                })
            },
        ))
        .field(
            // The edge has no position in any ordered set, so its cursor is null
            Field::new(
                edge_field_name(meta),
                TypeRef::named(meta.edge_type.as_str()),
                move |ctx| {
                    FieldFuture::new(async move {
                        let payload = ctx.parent_value.try_downcast_ref::<PayloadValue>()?;
                        Ok(payload.row.clone().map(|row| {
                            FieldValue::owned_any(EdgeValue {
                                cursor: None,
                                node: row,
                            })
                        }))
                    })
                },
            )
            .argument(InputValue::new(
                "orderBy",
                TypeRef::named_nn_list(meta_edge.order_by.type_name.as_str()),
            )),
        )
        .field(Field::new(
            "query",
            TypeRef::named("Query"),
            move |_ctx| {
                FieldFuture::new(async move { Ok(Some(FieldValue::owned_any(QueryRoot))) })
            },
        ))
}

/// The three payload object types for one table
pub(crate) fn create_payload_objects(meta: &Arc<TableMeta>) -> Vec<Object> {
    let create_payload = payload_object(
        meta,
        create_payload_name(meta),
        format!("The output of our create `{}` mutation.", meta.type_name),
    );
    let update_payload = payload_object(
        meta,
        update_payload_name(meta),
        format!("The output of our update `{}` mutation.", meta.type_name),
    );
    let delete_payload = payload_object(
        meta,
        delete_payload_name(meta),
        format!("The output of our delete `{}` mutation.", meta.type_name),
    )
    .field(Field::new(
        deleted_node_id_field_name(meta),
        TypeRef::named(TypeRef::ID),
        move |ctx| {
            FieldFuture::new(async move {
                let payload = ctx.parent_value.try_downcast_ref::<PayloadValue>()?;
                Ok(payload
                    .deleted_node_id
                    .clone()
                    .map(|id| FieldValue::value(Value::String(id))))
            })
        },
    ));

    vec![create_payload, update_payload, delete_payload]
}

fn client_mutation_id_of(input: &ObjectAccessor) -> Option<String> {
    input
        .get("clientMutationId")
        .and_then(|v| v.string().ok().map(str::to_string))
}

/// Translate an input/patch object into column name -> value pairs
fn columns_of(meta: &TableMeta, obj: &ObjectAccessor) -> IndexMap<String, Value> {
    let mut row = IndexMap::new();
    for (field_name, column) in meta.graphql_fields() {
        if let Some(value) = obj.get(field_name.as_str()) {
            row.insert(column.name.clone(), accessor_to_value(&value));
        }
    }
    row
}

/// Decode a nodeId argument, checking it addresses this table
fn pk_from_node_id(meta: &TableMeta, raw: &str) -> Result<Value, Error> {
    match node_id::decode(raw) {
        Some(NodeId::Row { collection, pk }) if collection == meta.collection_field => Ok(pk),
        _ => Err(Error::new(format!("Invalid nodeId: {}", raw))),
    }
}

fn input_object<'a>(ctx: &'a ResolverContext) -> Result<ObjectAccessor<'a>, Error> {
    Ok(ctx.args.try_get("input")?.object()?)
}

fn create_field(meta: &Arc<TableMeta>) -> Field {
    let meta_outer = meta.clone();
    let field_name = format!("create{}", meta.type_name);

    Field::new(
        field_name,
        TypeRef::named(create_payload_name(meta)),
        move |ctx| {
            let meta = meta_outer.clone();
            FieldFuture::new(async move {
                let input = input_object(&ctx)?;
                let client_mutation_id = client_mutation_id_of(&input);
                let row_input = input
                    .get(meta.singular_field.as_str())
                    .ok_or_else(|| Error::new(format!("Missing '{}'", meta.singular_field)))?;
                let row = columns_of(&meta, &row_input.object()?);

                let store = get_store(&ctx)?;
                let options = get_options(&ctx);
                let inserted = store
                    .insert(&meta.table, row)
                    .await
                    .map_err(|e| store_error(e, &options))?;

                Ok(Some(FieldValue::owned_any(PayloadValue {
                    client_mutation_id,
                    row: Some(inserted),
                    deleted_node_id: None,
                })))
            })
        },
    )
    .description(format!("Creates a single `{}`.", meta.type_name))
    .argument(InputValue::new(
        "input",
        TypeRef::named_nn(create_input_name(meta)),
    ))
}

fn update_field(meta: &Arc<TableMeta>, by_node_id: bool) -> Field {
    let meta_outer = meta.clone();
    let field_name = if by_node_id {
        format!("update{}ByNodeId", meta.type_name)
    } else {
        format!("update{}", meta.type_name)
    };
    let input_name = if by_node_id {
        update_by_node_id_input_name(meta)
    } else {
        update_input_name(meta)
    };
    let description = if by_node_id {
        format!(
            "Updates a single `{}` using its globally unique id and a patch.",
            meta.type_name
        )
    } else {
        format!(
            "Updates a single `{}` using a unique key and a patch.",
            meta.type_name
        )
    };

    Field::new(
        field_name,
        TypeRef::named(update_payload_name(meta)),
        move |ctx| {
            let meta = meta_outer.clone();
            FieldFuture::new(async move {
                let input = input_object(&ctx)?;
                let client_mutation_id = client_mutation_id_of(&input);

                let pk = if by_node_id {
                    let raw = input
                        .get("nodeId")
                        .ok_or_else(|| Error::new("Missing 'nodeId'"))?;
                    pk_from_node_id(&meta, raw.string()?)?
                } else {
                    let pk_field = meta
                        .pk_field_name()
                        .ok_or_else(|| Error::new("Table has no primary key"))?;
                    let raw = input
                        .get(pk_field.as_str())
                        .ok_or_else(|| Error::new(format!("Missing '{}'", pk_field)))?;
                    accessor_to_value(&raw)
                };

                let patch = input
                    .get("patch")
                    .ok_or_else(|| Error::new("Missing 'patch'"))?;
                let changes = columns_of(&meta, &patch.object()?);

                let store = get_store(&ctx)?;
                let options = get_options(&ctx);
                let updated = store
                    .update(&meta.table, &pk, changes)
                    .await
                    .map_err(|e| store_error(e, &options))?
                    .ok_or_else(|| {
                        Error::new(format!(
                            "No values were updated in collection '{}' because no values \
                             you can update were found matching these criteria.",
                            meta.collection_field
                        ))
                    })?;

                Ok(Some(FieldValue::owned_any(PayloadValue {
                    client_mutation_id,
                    row: Some(updated),
                    deleted_node_id: None,
                })))
            })
        },
    )
    .description(description)
    .argument(InputValue::new("input", TypeRef::named_nn(input_name)))
}

fn delete_field(meta: &Arc<TableMeta>, by_node_id: bool) -> Field {
    let meta_outer = meta.clone();
    let field_name = if by_node_id {
        format!("delete{}ByNodeId", meta.type_name)
    } else {
        format!("delete{}", meta.type_name)
    };
    let input_name = if by_node_id {
        delete_by_node_id_input_name(meta)
    } else {
        delete_input_name(meta)
    };
    let description = if by_node_id {
        format!(
            "Deletes a single `{}` using its globally unique id.",
            meta.type_name
        )
    } else {
        format!("Deletes a single `{}` using a unique key.", meta.type_name)
    };

    Field::new(
        field_name,
        TypeRef::named(delete_payload_name(meta)),
        move |ctx| {
            let meta = meta_outer.clone();
            FieldFuture::new(async move {
                let input = input_object(&ctx)?;
                let client_mutation_id = client_mutation_id_of(&input);

                let pk = if by_node_id {
                    let raw = input
                        .get("nodeId")
                        .ok_or_else(|| Error::new("Missing 'nodeId'"))?;
                    pk_from_node_id(&meta, raw.string()?)?
                } else {
                    let pk_field = meta
                        .pk_field_name()
                        .ok_or_else(|| Error::new("Table has no primary key"))?;
                    let raw = input
                        .get(pk_field.as_str())
                        .ok_or_else(|| Error::new(format!("Missing '{}'", pk_field)))?;
                    accessor_to_value(&raw)
                };

                let store = get_store(&ctx)?;
                let options = get_options(&ctx);
                let deleted = store
                    .delete(&meta.table, &pk)
                    .await
                    .map_err(|e| store_error(e, &options))?
                    .ok_or_else(|| {
                        Error::new(format!(
                            "No values were deleted in collection '{}' because no values \
                             you can delete were found matching these criteria.",
                            meta.collection_field
                        ))
                    })?;

                let deleted_node_id = row_node_id(&meta, &deleted);
                Ok(Some(FieldValue::owned_any(PayloadValue {
                    client_mutation_id,
                    row: Some(deleted),
                    deleted_node_id,
                })))
            })
        },
    )
    .description(description)
    .argument(InputValue::new("input", TypeRef::named_nn(input_name)))
}

/// The five root mutation fields for one table
pub(crate) fn create_mutation_fields(meta: &Arc<TableMeta>) -> Vec<Field> {
    vec![
        create_field(meta),
        update_field(meta, false),
        update_field(meta, true),
        delete_field(meta, false),
        delete_field(meta, true),
    ]
}
