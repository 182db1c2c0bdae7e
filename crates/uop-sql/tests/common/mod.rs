#![allow(dead_code)]

use serde_json::{json, Value};
use uop_sql::prelude::*;

pub fn row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        other => panic!("Expected a mapping, got {other}"),
    }
}

/// Opens an in-memory database with an empty `users` table.
pub async fn users() -> Collection<SqliteExecutor> {
    let executor = SqliteExecutor::connect("sqlite::memory:", 1)
        .await
        .expect("in-memory database");
    let users = executor
        .collection(&json!({
            "name": "users",
            "attributes": {
                "id": "int",
                "name": "string",
                "email": "email",
                "age": "int",
                "settings": "json"
            }
        }))
        .expect("valid users schema");
    users.create_table().await.expect("create users");
    users
}

/// Same as [`users`], seeded with four rows.
pub async fn seeded_users() -> Collection<SqliteExecutor> {
    let users = users().await;
    for user in [
        json!({"id": 1, "name": "Ada", "email": "ada@example.com", "age": 36,
               "settings": {"theme": "dark"}}),
        json!({"id": 2, "name": "Alan", "email": "alan@example.org", "age": 41}),
        json!({"id": 3, "name": "Grace", "email": "grace@example.com", "age": 17}),
        json!({"id": 4, "name": "Linus", "email": "linus@example.net", "age": 25,
               "settings": {"theme": "light", "langs": ["c"]}}),
    ] {
        users.insert(row(user)).await.expect("insert user");
    }
    users
}
