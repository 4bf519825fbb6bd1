use crate::config::Config;
use crate::data::error::{DataError, Result};
use crate::data::store::{SweatStore, parse_id, sort_newest_first};
use crate::data::types::sweat_record::{
    NewSweat, PatchValue, SWEAT_PK, SweatPatch, SweatRecord, sort_key,
};
use async_trait::async_trait;
use aws_config::Region;
use aws_sdk_dynamodb::operation::query::builders::QueryFluentBuilder;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use chrono::Utc;
use serde::Serialize;
use serde_dynamo::aws_sdk_dynamodb_1::to_item;
use std::collections::HashMap;
use ulid::Ulid;

#[cfg(test)]
const LOCAL_ENDPOINT_URL: Option<&str> = Some("http://localhost:9001");
#[cfg(not(test))]
const LOCAL_ENDPOINT_URL: Option<&str> = None;

fn get_endpoint_url(config: &Config) -> Option<String> {
    LOCAL_ENDPOINT_URL
        .or(config.dynamodb_endpoint_url.as_deref())
        .map(|s| s.to_string())
}

pub struct Db {
    pub client: aws_sdk_dynamodb::Client,
    pub table_name: String,
}

impl Db {
    async fn get_config(config: &Config) -> aws_config::SdkConfig {
        // Run this in dev/test, but not in release builds.
        #[cfg(any(debug_assertions, test))]
        if let Some(endpoint_url) = get_endpoint_url(config) {
            return aws_config::from_env()
                .endpoint_url(endpoint_url)
                .region(Region::new("us-east-1"))
                .test_credentials()
                .load()
                .await;
        }

        let loader = aws_config::from_env();
        match &config.dynamodb_endpoint_url {
            Some(endpoint_url) => loader.endpoint_url(endpoint_url).load().await,
            None => loader.load().await,
        }
    }

    /// Creates a new `Db` from the AWS environment and the configured table name.
    pub async fn new(config: &Config) -> Self {
        let sdk_config = Self::get_config(config).await;
        let client = aws_sdk_dynamodb::Client::new(&sdk_config);
        let db = Self {
            client,
            table_name: config.table_name.clone(),
        };

        // Only create the table when talking to a local DynamoDB, never against AWS.
        #[cfg(any(debug_assertions, test))]
        if get_endpoint_url(config).is_some() {
            db.init_schema().await;
        }

        db
    }

    /// Initialize the database. Only avaliable in dev/test environments.
    #[cfg(any(debug_assertions, test))]
    pub async fn init_schema(&self) {
        use crate::data::dynamodb_schema::create_table_if_not_exists;
        create_table_if_not_exists(self).await;
    }

    /// Exclusively put an item into DynamoDB.
    /// This will fail if a record with the same key attributes already exist.
    pub async fn put_item_excl<T: Serialize>(&self, input: &T) -> Result<()> {
        let item = to_item(input)?;
        self.client
            .put_item()
            .table_name(&self.table_name)
            .condition_expression("attribute_not_exists(pk) AND attribute_not_exists(sk)")
            .set_item(Some(item))
            .send()
            .await?;
        Ok(())
    }

    /// Execute a DynamoDB query, following `LastEvaluatedKey` until every page is collected.
    pub async fn query_all(
        &self,
        query_builder: QueryFluentBuilder,
    ) -> Result<Vec<HashMap<String, AttributeValue>>> {
        let mut items = Vec::new();
        let mut exclusive_start_key: Option<HashMap<String, AttributeValue>> = None;

        loop {
            let query = query_builder
                .clone()
                .table_name(&self.table_name)
                .set_exclusive_start_key(exclusive_start_key.take());

            let result = query.send().await?;
            if let Some(result_items) = result.items {
                items.extend(result_items);
            }

            exclusive_start_key = result.last_evaluated_key.filter(|key| !key.is_empty());
            if exclusive_start_key.is_none() {
                break;
            }
        }

        Ok(items)
    }

    fn record_key(id: &Ulid) -> HashMap<String, AttributeValue> {
        HashMap::from([
            ("pk".to_string(), AttributeValue::S(SWEAT_PK.to_string())),
            ("sk".to_string(), AttributeValue::S(sort_key(id))),
        ])
    }

    async fn get_record(&self, id: &Ulid) -> Result<SweatRecord> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .set_key(Some(Self::record_key(id)))
            .send()
            .await?;
        let item = output.item.ok_or(DataError::DocumentNotFound)?;
        Ok(serde_dynamo::from_item(item)?)
    }
}

/// A `SET`/`REMOVE` update built from a patch. Flags and tags are set; a null tag is removed.
#[derive(Debug, PartialEq)]
struct UpdateExpression {
    expression: String,
    names: HashMap<String, String>,
    /// `None` when nothing is set, since DynamoDB rejects an empty value map.
    values: Option<HashMap<String, AttributeValue>>,
}

impl UpdateExpression {
    fn from_patch(patch: &SweatPatch) -> Self {
        let mut names = HashMap::new();
        let mut values = HashMap::new();
        let mut set_clauses = Vec::new();
        let mut remove_clauses = Vec::new();
        for (i, (field, value)) in patch.changes().enumerate() {
            let name = format!("#f{i}");
            let placeholder = format!(":v{i}");
            names.insert(name.clone(), field.attribute().to_string());
            let attribute = match value {
                PatchValue::Flag(flag) => AttributeValue::Bool(*flag),
                PatchValue::Tag(Some(tag)) => AttributeValue::S(tag.clone()),
                PatchValue::Tag(None) => {
                    remove_clauses.push(name);
                    continue;
                }
            };
            set_clauses.push(format!("{name} = {placeholder}"));
            values.insert(placeholder, attribute);
        }

        let mut expression = Vec::new();
        if !set_clauses.is_empty() {
            expression.push(format!("SET {}", set_clauses.join(", ")));
        }
        if !remove_clauses.is_empty() {
            expression.push(format!("REMOVE {}", remove_clauses.join(", ")));
        }

        Self {
            expression: expression.join(" "),
            names,
            values: (!values.is_empty()).then_some(values),
        }
    }
}

#[async_trait]
impl SweatStore for Db {
    async fn list_sweats(&self) -> Result<Vec<SweatRecord>> {
        let query_builder = self
            .client
            .query()
            .key_condition_expression("#pk = :pk")
            .expression_attribute_names("#pk", "pk")
            .expression_attribute_values(":pk", AttributeValue::S(SWEAT_PK.to_string()))
            .scan_index_forward(false);

        let items = self.query_all(query_builder).await?;
        let mut records = items
            .into_iter()
            .map(serde_dynamo::from_item)
            .collect::<std::result::Result<Vec<SweatRecord>, _>>()?;
        // ULIDs minted within the same millisecond don't sort by time.
        sort_newest_first(&mut records);
        Ok(records)
    }

    async fn create_sweat(&self, input: NewSweat) -> Result<SweatRecord> {
        let record = SweatRecord::create(input, Ulid::new(), Utc::now())?;
        self.put_item_excl(&record).await?;
        Ok(record)
    }

    async fn delete_sweat(&self, id: &str) -> Result<String> {
        let key = parse_id(id)?;
        let output = self
            .client
            .delete_item()
            .table_name(&self.table_name)
            .set_key(Some(Self::record_key(&key)))
            .return_values(ReturnValue::AllOld)
            .send()
            .await?;
        match output.attributes {
            Some(old) if !old.is_empty() => Ok(key.to_string()),
            _ => Err(DataError::DocumentNotFound),
        }
    }

    async fn update_sweat(&self, id: &str, patch: &SweatPatch) -> Result<SweatRecord> {
        let key = parse_id(id)?;
        if patch.is_empty() {
            return self.get_record(&key).await;
        }

        let update = UpdateExpression::from_patch(patch);
        let output = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .set_key(Some(Self::record_key(&key)))
            .condition_expression("attribute_exists(pk)")
            .return_values(ReturnValue::AllNew)
            .set_expression_attribute_names(Some(update.names))
            .set_expression_attribute_values(update.values)
            .update_expression(update.expression)
            .send()
            .await
            .map_err(|err| {
                if let Some(true) = err
                    .as_service_error()
                    .map(|se| se.is_conditional_check_failed_exception())
                {
                    return DataError::DocumentNotFound;
                }
                DataError::DynamoUpdateItemError(err)
            })?;

        let item = output.attributes.ok_or(DataError::DocumentNotFound)?;
        Ok(serde_dynamo::from_item(item)?)
    }
}
