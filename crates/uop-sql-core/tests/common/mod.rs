#![allow(dead_code)]

use serde_json::{json, Value};
use uop_sql_core::{AbstractType, Bindings, CriteriaCompiler, Row, TableSchema};

pub fn compile(criteria: &Value) -> (String, Bindings) {
    CriteriaCompiler::default()
        .compile(Some(criteria))
        .unwrap_or_else(|e| panic!("Failed to compile: {criteria}\nError: {e:?}"))
}

pub fn users(json_supported: bool) -> TableSchema {
    TableSchema::builder("users")
        .column("id", AbstractType::Uuid)
        .column("name", AbstractType::String)
        .column("email", AbstractType::Email)
        .column("age", AbstractType::Int)
        .column("settings", AbstractType::Json)
        .json_supported(json_supported)
        .build()
        .expect("valid users schema")
}

pub fn row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        other => panic!("Expected a mapping, got {other}"),
    }
}

pub fn sample_user() -> Row {
    row(json!({
        "id": "0b7e0c1a-5f1e-4d55-9a53-0d8f3f1f2f10",
        "name": "Ada",
        "email": "ada@example.com",
        "age": 36,
        "settings": {"theme": "dark", "langs": ["en", "fr"]}
    }))
}
