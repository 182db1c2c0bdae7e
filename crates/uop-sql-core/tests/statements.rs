//! End-to-end statement generation for a resolved schema.

mod common;
use common::{row, sample_user, users};

use serde_json::json;
use uop_sql_core::{
    JsonCodec, ParamStyle, SchemaDescriptor, SchemaSource, Select, SqlError, StatementBuilder,
};

#[test]
fn test_create_table_follows_schema_order() {
    let schema = users(false);
    assert_eq!(
        StatementBuilder::new(&schema).create_table(),
        "CREATE TABLE users (id VARCHAR(36) PRIMARY KEY, name VARCHAR(255), \
         email VARCHAR(255), age INTEGER, settings TEXT)"
    );

    let native = users(true);
    assert!(StatementBuilder::new(&native)
        .create_table()
        .ends_with("settings JSONB)"));
}

#[test]
fn test_descriptor_to_ddl() {
    let schema = SchemaDescriptor::from_json(
        r#"{"name": "events", "attributes": {"id": "int", "at": "datetime", "payload": "json"}}"#,
    )
    .unwrap()
    .resolve(false)
    .unwrap();
    assert_eq!(
        StatementBuilder::new(&schema).create_table(),
        "CREATE TABLE events (id INTEGER PRIMARY KEY, at FLOAT, payload TEXT)"
    );
}

#[test]
fn test_unknown_type_fails_before_any_ddl() {
    let err = SchemaDescriptor::from_json(r#"{"name": "t", "attributes": {"a": "money"}}"#)
        .unwrap()
        .resolve(false)
        .unwrap_err();
    assert!(matches!(err, SqlError::UnknownType(ref t) if t == "money"));
}

#[test]
fn test_select_count_delete_share_where_clause() {
    let schema = users(false);
    let builder = StatementBuilder::new(&schema);
    let criteria = json!({"$gte": {"age": 18}, "endswith": {"email": "@example.com"}});
    let clause = "(age >= %(age_1)s AND email LIKE %(email_1)s)";

    let (select, select_bindings) = builder.select(Some(&criteria), &Select::new()).unwrap();
    let (count, count_bindings) = builder.count(Some(&criteria)).unwrap();
    let (delete, delete_bindings) = builder.delete(Some(&criteria)).unwrap();

    assert_eq!(select, format!("SELECT * FROM users WHERE {clause}"));
    assert_eq!(count, format!("SELECT COUNT(*) FROM users WHERE {clause}"));
    assert_eq!(delete, format!("DELETE FROM users WHERE {clause}"));
    assert_eq!(select_bindings, count_bindings);
    assert_eq!(count_bindings, delete_bindings);
    assert_eq!(select_bindings.get("email_1"), Some(&json!("%@example.com")));
}

#[test]
fn test_single_column_projection() {
    let schema = users(false);
    let (sql, _) = StatementBuilder::new(&schema)
        .select(None, &Select::new().columns(&["name"]).order_by(&["name"]))
        .unwrap();
    assert_eq!(sql, "SELECT name FROM users ORDER BY name");
}

#[test]
fn test_insert_pairs_columns_with_placeholders() {
    let schema = users(false);
    let sql = StatementBuilder::new(&schema).insert();
    assert_eq!(
        sql,
        "INSERT INTO users (id, name, email, age, settings) \
         VALUES (%(id)s, %(name)s, %(email)s, %(age)s, %(settings)s)"
    );
}

#[test]
fn test_update_with_encoded_json_mod() {
    let schema = users(false);
    let mods = JsonCodec::new(&schema)
        .encode(row(json!({"settings": {"theme": "light"}})))
        .unwrap();
    let (sql, bindings) = StatementBuilder::new(&schema)
        .param_style(ParamStyle::Named)
        .update(Some(&json!({"$eq": {"id": "u1"}})), &mods)
        .unwrap();

    assert_eq!(sql, "UPDATE users SET settings = :mod__settings WHERE id = :id_1");
    assert_eq!(bindings.get("mod__settings"), Some(&json!(r#"{"theme":"light"}"#)));
    assert_eq!(bindings.get("id_1"), Some(&json!("u1")));
}

#[test]
fn test_json_round_trip_through_codec() {
    let schema = users(false);
    let codec = JsonCodec::new(&schema);
    let original = sample_user();
    let stored = codec.encode(original.clone()).unwrap();
    assert!(stored["settings"].is_string());
    assert_eq!(stored["age"], original["age"]);
    assert_eq!(codec.decode(Some(stored)).unwrap(), Some(original));
    assert_eq!(codec.decode(None).unwrap(), None);
}
