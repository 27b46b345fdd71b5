//! End-to-end tests executing GraphQL operations against an in-memory store
//!
//! These tests cover the full request path: query parsing, resolver dispatch,
//! relay pagination, nodeId round trips and the CRUD mutation contract.

use async_graphql::dynamic::Schema;
use async_graphql::{Executor, Name, Value};
use indexmap::IndexMap;
use postquill::pg::{ColumnInfo, MemoryStore, PgType, Store, TableInfo};
use postquill::schema::{SchemaBuilder, SchemaOptions};
use std::sync::Arc;

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
            ColumnInfo {
                name: "serial".to_string(),
                pg_type: PgType::Text,
                nullable: true,
                has_default: false,
            },
        ],
        primary_key: Some("id".to_string()),
    }
}

fn item_row(id: i64, name: &str, description: Option<&str>, serial: Option<&str>) -> Value {
    let mut obj = IndexMap::new();
    obj.insert(Name::new("id"), Value::Number(id.into()));
    obj.insert(Name::new("name"), Value::String(name.to_string()));
    obj.insert(
        Name::new("description"),
        description.map_or(Value::Null, |s| Value::String(s.to_string())),
    );
    obj.insert(
        Name::new("serial"),
        serial.map_or(Value::Null, |s| Value::String(s.to_string())),
    );
    Value::Object(obj)
}

fn schema_with(rows: Vec<Value>) -> Schema {
    let store = MemoryStore::new();
    store.load_rows("item", rows);
    let store: Arc<dyn Store> = Arc::new(store);

    let mut builder = SchemaBuilder::new(store).with_options(SchemaOptions {
        extended_errors: vec![
            "hint".to_string(),
            "detail".to_string(),
            "errcode".to_string(),
        ],
    });
    builder.add_table(item_table());
    builder.build().expect("schema should build")
}

async fn exec(schema: &Schema, query: &str) -> serde_json::Value {
    let response = schema.execute(query).await;
    assert!(
        response.errors.is_empty(),
        "unexpected errors: {:?}",
        response.errors
    );
    response.data.into_json().expect("data should be json")
}

// nodeId of item 1: base64 of ["items",1]
const ITEM_1_NODE_ID: &str = "WyJpdGVtcyIsMV0=";

#[tokio::test]
async fn add_two_numbers() {
    let schema = schema_with(vec![]);

    let data = exec(&schema, "{ addTwoNumbers(a: 2, b: 3) }").await;
    assert_eq!(data["addTwoNumbers"], 5);

    let data = exec(&schema, "{ addTwoNumbers(a: -1, b: 1) }").await;
    assert_eq!(data["addTwoNumbers"], 0);
}

#[tokio::test]
async fn single_item_by_primary_key() {
    let schema = schema_with(vec![item_row(1, "widget", None, Some("SN1"))]);

    let data = exec(
        &schema,
        "{ item(id: 1) { id name description serial nodeId } }",
    )
    .await;
    assert_eq!(data["item"]["id"], 1);
    assert_eq!(data["item"]["name"], "widget");
    assert_eq!(data["item"]["description"], serde_json::Value::Null);
    assert_eq!(data["item"]["serial"], "SN1");
    assert_eq!(data["item"]["nodeId"], ITEM_1_NODE_ID);
}

#[tokio::test]
async fn items_nodes_return_fixture_verbatim() {
    let schema = schema_with(vec![item_row(1, "widget", None, Some("SN1"))]);

    let data = exec(
        &schema,
        "{ items { nodes { description id name nodeId serial } } }",
    )
    .await;
    let nodes = data["items"]["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 1);
    assert_eq!(
        nodes[0],
        serde_json::json!({
            "description": null,
            "id": 1,
            "name": "widget",
            "nodeId": ITEM_1_NODE_ID,
            "serial": "SN1",
        })
    );
}

#[tokio::test]
async fn missing_item_is_null() {
    let schema = schema_with(vec![item_row(1, "widget", None, None)]);
    let data = exec(&schema, "{ item(id: 99) { id } }").await;
    assert_eq!(data["item"], serde_json::Value::Null);
}

#[tokio::test]
async fn items_connection_with_ordering() {
    let schema = schema_with(vec![
        item_row(1, "bolt", None, None),
        item_row(2, "anvil", None, None),
        item_row(3, "clamp", None, None),
    ]);

    let data = exec(
        &schema,
        "{ items(orderBy: [NAME_ASC]) { totalCount nodes { id name } \
           pageInfo { hasNextPage hasPreviousPage } } }",
    )
    .await;
    assert_eq!(data["items"]["totalCount"], 3);
    let names: Vec<&str> = data["items"]["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["anvil", "bolt", "clamp"]);
    assert_eq!(data["items"]["pageInfo"]["hasNextPage"], false);
    assert_eq!(data["items"]["pageInfo"]["hasPreviousPage"], false);
}

#[tokio::test]
async fn items_default_order_is_primary_key() {
    let schema = schema_with(vec![
        item_row(3, "clamp", None, None),
        item_row(1, "bolt", None, None),
        item_row(2, "anvil", None, None),
    ]);

    let data = exec(&schema, "{ items { nodes { id } } }").await;
    let ids: Vec<i64> = data["items"]["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn cursor_pagination_resumes_after_end_cursor() {
    let schema = schema_with(vec![
        item_row(1, "a", None, None),
        item_row(2, "b", None, None),
        item_row(3, "c", None, None),
        item_row(4, "d", None, None),
    ]);

    let data = exec(
        &schema,
        "{ items(first: 2) { edges { cursor node { id } } \
           pageInfo { endCursor hasNextPage } } }",
    )
    .await;
    assert_eq!(data["items"]["pageInfo"]["hasNextPage"], true);
    let end_cursor = data["items"]["pageInfo"]["endCursor"].as_str().unwrap();
    assert_eq!(
        data["items"]["edges"].as_array().unwrap()[1]["cursor"],
        end_cursor
    );

    let query = format!(
        "{{ items(first: 2, after: \"{}\") {{ nodes {{ id }} }} }}",
        end_cursor
    );
    let data = exec(&schema, &query).await;
    let ids: Vec<i64> = data["items"]["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![3, 4]);
}

#[tokio::test]
async fn condition_filters_rows() {
    let schema = schema_with(vec![
        item_row(1, "bolt", None, None),
        item_row(2, "bolt", None, None),
        item_row(3, "clamp", None, None),
    ]);

    let data = exec(
        &schema,
        "{ items(condition: { name: \"bolt\" }) { totalCount nodes { id } } }",
    )
    .await;
    assert_eq!(data["items"]["totalCount"], 2);
}

#[tokio::test]
async fn unknown_order_by_value_is_rejected() {
    let schema = schema_with(vec![item_row(1, "widget", None, None)]);
    let response = schema
        .execute("{ items(orderBy: [SOMETHING_ELSE]) { totalCount } }")
        .await;
    assert!(!response.errors.is_empty());
}

#[tokio::test]
async fn node_lookup_round_trips() {
    let schema = schema_with(vec![item_row(1, "widget", None, None)]);

    let query = format!(
        "{{ node(nodeId: \"{}\") {{ nodeId ... on Item {{ id name }} }} }}",
        ITEM_1_NODE_ID
    );
    let data = exec(&schema, &query).await;
    assert_eq!(data["node"]["id"], 1);
    assert_eq!(data["node"]["name"], "widget");
    assert_eq!(data["node"]["nodeId"], ITEM_1_NODE_ID);

    let query = format!(
        "{{ itemByNodeId(nodeId: \"{}\") {{ id }} }}",
        ITEM_1_NODE_ID
    );
    let data = exec(&schema, &query).await;
    assert_eq!(data["itemByNodeId"]["id"], 1);
}

#[tokio::test]
async fn create_item_echoes_client_mutation_id() {
    let schema = schema_with(vec![]);

    let data = exec(
        &schema,
        "mutation { createItem(input: { clientMutationId: \"req-42\", \
           item: { id: 1, name: \"widget\" } }) { \
           clientMutationId item { id name description } \
           itemEdge { cursor node { id } } } }",
    )
    .await;
    let payload = &data["createItem"];
    assert_eq!(payload["clientMutationId"], "req-42");
    assert_eq!(payload["item"]["id"], 1);
    assert_eq!(payload["item"]["name"], "widget");
    assert_eq!(payload["item"]["description"], serde_json::Value::Null);
    assert_eq!(payload["itemEdge"]["cursor"], serde_json::Value::Null);
    assert_eq!(payload["itemEdge"]["node"]["id"], 1);
}

#[tokio::test]
async fn omitted_client_mutation_id_is_null() {
    let schema = schema_with(vec![]);

    let data = exec(
        &schema,
        "mutation { createItem(input: { item: { id: 1, name: \"widget\" } }) \
           { clientMutationId item { id } } }",
    )
    .await;
    assert_eq!(
        data["createItem"]["clientMutationId"],
        serde_json::Value::Null
    );
    assert_eq!(data["createItem"]["item"]["id"], 1);
}

#[tokio::test]
async fn duplicate_insert_reports_errcode() {
    let schema = schema_with(vec![item_row(1, "widget", None, None)]);

    let response = schema
        .execute(
            "mutation { createItem(input: { item: { id: 1, name: \"dup\" } }) \
               { clientMutationId } }",
        )
        .await;
    assert!(!response.errors.is_empty());

    let error = serde_json::to_value(&response.errors[0]).unwrap();
    assert_eq!(error["extensions"]["errcode"], "23505");
    assert!(error["message"]
        .as_str()
        .unwrap()
        .contains("duplicate key value"));
}

#[tokio::test]
async fn update_item_applies_patch() {
    let schema = schema_with(vec![item_row(1, "widget", None, Some("SN1"))]);

    let data = exec(
        &schema,
        "mutation { updateItem(input: { id: 1, patch: { name: \"gadget\" } }) \
           { item { id name serial } } }",
    )
    .await;
    assert_eq!(data["updateItem"]["item"]["name"], "gadget");
    assert_eq!(data["updateItem"]["item"]["serial"], "SN1");
}

#[tokio::test]
async fn update_item_by_node_id() {
    let schema = schema_with(vec![item_row(1, "widget", None, None)]);

    let query = format!(
        "mutation {{ updateItemByNodeId(input: {{ nodeId: \"{}\", \
           patch: {{ description: \"updated\" }} }}) {{ item {{ description }} }} }}",
        ITEM_1_NODE_ID
    );
    let data = exec(&schema, &query).await;
    assert_eq!(data["updateItemByNodeId"]["item"]["description"], "updated");
}

#[tokio::test]
async fn update_missing_item_is_an_error() {
    let schema = schema_with(vec![]);
    let response = schema
        .execute(
            "mutation { updateItem(input: { id: 99, patch: { name: \"x\" } }) \
               { clientMutationId } }",
        )
        .await;
    assert!(!response.errors.is_empty());
}

#[tokio::test]
async fn delete_item_returns_deleted_node_id() {
    let schema = schema_with(vec![item_row(1, "widget", None, None)]);

    let data = exec(
        &schema,
        "mutation { deleteItem(input: { clientMutationId: \"d1\", id: 1 }) \
           { clientMutationId deletedItemNodeId item { id } } }",
    )
    .await;
    assert_eq!(data["deleteItem"]["clientMutationId"], "d1");
    assert_eq!(data["deleteItem"]["deletedItemNodeId"], ITEM_1_NODE_ID);
    assert_eq!(data["deleteItem"]["item"]["id"], 1);

    let data = exec(&schema, "{ items { totalCount } }").await;
    assert_eq!(data["items"]["totalCount"], 0);
}

#[tokio::test]
async fn query_field_on_payload_reflects_mutation() {
    let schema = schema_with(vec![]);

    let data = exec(
        &schema,
        "mutation { createItem(input: { item: { id: 1, name: \"widget\" } }) \
           { query { items { totalCount } } } }",
    )
    .await;
    assert_eq!(data["createItem"]["query"]["items"]["totalCount"], 1);
}

#[tokio::test]
async fn query_node_id_addresses_the_root() {
    let schema = schema_with(vec![item_row(1, "widget", None, None)]);

    let data = exec(&schema, "{ nodeId }").await;
    let root_id = data["nodeId"].as_str().unwrap().to_string();

    let query = format!(
        "{{ node(nodeId: \"{}\") {{ ... on Query {{ items {{ totalCount }} }} }} }}",
        root_id
    );
    let data = exec(&schema, &query).await;
    assert_eq!(data["node"]["items"]["totalCount"], 1);
}

#[tokio::test]
async fn batched_requests_execute_in_order() {
    let schema = schema_with(vec![]);

    let batch = async_graphql::BatchRequest::Batch(vec![
        async_graphql::Request::new("{ addTwoNumbers(a: 1, b: 2) }"),
        async_graphql::Request::new("{ addTwoNumbers(a: 3, b: 4) }"),
    ]);
    let response = schema.execute_batch(batch).await;

    let json = serde_json::to_value(&response).unwrap();
    let parts = json.as_array().expect("batch response should be an array");
    assert_eq!(parts[0]["data"]["addTwoNumbers"], 3);
    assert_eq!(parts[1]["data"]["addTwoNumbers"], 7);
}
