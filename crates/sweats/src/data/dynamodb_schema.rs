use crate::data::dynamodb::Db;
use aws_sdk_dynamodb::error::BuildError;
use aws_sdk_dynamodb::operation::create_table::builders::CreateTableFluentBuilder;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ScalarAttributeType,
};

fn key_attribute(name: &str) -> Result<AttributeDefinition, BuildError> {
    AttributeDefinition::builder()
        .attribute_name(name)
        .attribute_type(ScalarAttributeType::S)
        .build()
}

fn key_element(name: &str, key_type: KeyType) -> Result<KeySchemaElement, BuildError> {
    KeySchemaElement::builder()
        .attribute_name(name)
        .key_type(key_type)
        .build()
}

fn table_definition(db: &Db) -> Result<CreateTableFluentBuilder, BuildError> {
    Ok(db
        .client
        .create_table()
        .table_name(&db.table_name)
        .attribute_definitions(key_attribute("pk")?)
        .attribute_definitions(key_attribute("sk")?)
        .key_schema(key_element("pk", KeyType::Hash)?)
        .key_schema(key_element("sk", KeyType::Range)?)
        .billing_mode(BillingMode::PayPerRequest))
}

/// A helper function to create the local table if it does not exist.
pub async fn create_table_if_not_exists(db: &Db) {
    let table_name = &db.table_name;
    let request = match table_definition(db) {
        Ok(request) => request,
        Err(err) => {
            tracing::error!("Could not build table definition for {table_name}: {err}");
            return;
        }
    };

    match request.send().await {
        Ok(_) => tracing::info!("Created table: {}", table_name),
        Err(_) => tracing::info!("Table probably exists: {}", table_name),
    }
}
