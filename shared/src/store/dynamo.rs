use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use aws_sdk_dynamodb::Client;
use serde_dynamo::{from_item, to_attribute_value, to_item};
use std::collections::HashMap;
use std::env;

use crate::error::{
    map_get_dynamo_error, map_put_dynamo_error, map_scan_dynamo_error, map_update_dynamo_error,
    Result, StoreError,
};
use crate::models::{ScanCursor, ScanPage, UserChanges, UserRecord};

// User Store Constants
const USER_TABLE_NAME: &str = "users-table";
pub const USER_KEY: &str = "userId";

/// DynamoDB store for users
#[derive(Clone)]
pub struct DynamoUserStore {
    client: Client,
    table_name: String,
}

impl DynamoUserStore {
    /// Creates a new DynamoDB store
    pub async fn new() -> Self {
        // Use the recommended defaults() function with latest behavior version
        let config = aws_config::defaults(BehaviorVersion::latest()).load().await;

        let client = Client::new(&config);

        // Use environment variable for table name if available
        let table_name =
            env::var("DYNAMODB_TABLE").unwrap_or_else(|_| USER_TABLE_NAME.to_string());

        log::info!("Using DynamoDB table '{}'", table_name);

        Self { client, table_name }
    }

    /// Creates a new DynamoDB store with the specified client and table name.
    /// This is mainly useful for testing with a local DynamoDB instance.
    pub fn with_client_and_table(client: Client, table_name: String) -> Self {
        Self { client, table_name }
    }

    fn key(user_id: &str) -> HashMap<String, AttributeValue> {
        HashMap::from([(USER_KEY.to_string(), AttributeValue::S(user_id.to_string()))])
    }
}

#[async_trait]
impl super::UserStore for DynamoUserStore {
    async fn get_user(&self, user_id: &str) -> Result<UserRecord> {
        let response = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .set_key(Some(Self::key(user_id)))
            .send()
            .await
            .map_err(map_get_dynamo_error)?;

        let item = response
            .item()
            .ok_or_else(|| StoreError::NotFound(format!("User not found: {}", user_id)))?;

        let user = from_item(item.clone())?;
        Ok(user)
    }

    async fn put_user(&self, user: UserRecord) -> Result<UserRecord> {
        let item = to_item(&user)?;

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(map_put_dynamo_error)?;

        Ok(user)
    }

    /// Single UpdateItem with no condition expression. A record deleted between the
    /// caller's read and this write is recreated with only the assigned attributes.
    async fn update_user(&self, user_id: &str, changes: UserChanges) -> Result<UserRecord> {
        // `name` is a DynamoDB reserved word
        let expr_attr_names = HashMap::from([("#name".to_string(), "name".to_string())]);

        let expr_attr_values = HashMap::from([
            (":name".to_string(), AttributeValue::S(changes.name)),
            (":email".to_string(), AttributeValue::S(changes.email)),
            (":age".to_string(), to_attribute_value(changes.age)?),
            (":updatedAt".to_string(), AttributeValue::S(changes.updated_at)),
        ]);

        let response = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .set_key(Some(Self::key(user_id)))
            .update_expression("SET #name = :name, email = :email, age = :age, updatedAt = :updatedAt")
            .set_expression_attribute_names(Some(expr_attr_names))
            .set_expression_attribute_values(Some(expr_attr_values))
            .return_values(ReturnValue::AllNew)
            .send()
            .await
            .map_err(map_update_dynamo_error)?;

        let attributes = response.attributes().ok_or_else(|| {
            StoreError::InternalError(format!("update_item returned no attributes for {}", user_id))
        })?;

        let user = from_item(attributes.clone())?;
        Ok(user)
    }

    async fn scan_users(&self, limit: i32, cursor: Option<ScanCursor>) -> Result<ScanPage> {
        let exclusive_start_key: Option<HashMap<String, AttributeValue>> = match cursor {
            Some(cursor) => Some(to_item(cursor)?),
            None => None,
        };

        let response = self
            .client
            .scan()
            .table_name(&self.table_name)
            .limit(limit)
            .set_exclusive_start_key(exclusive_start_key)
            .send()
            .await
            .map_err(map_scan_dynamo_error)?;

        let mut items = Vec::new();
        for item in response.items() {
            let user: UserRecord = from_item(item.clone())?;
            items.push(user);
        }

        let next_cursor: Option<ScanCursor> = match response.last_evaluated_key() {
            Some(key) => Some(from_item(key.clone())?),
            None => None,
        };

        Ok(ScanPage {
            items,
            scanned_count: response.scanned_count().max(0) as usize,
            next_cursor,
        })
    }

    async fn ping(&self) -> Result<()> {
        self.client
            .scan()
            .table_name(&self.table_name)
            .limit(1)
            .send()
            .await
            .map_err(map_scan_dynamo_error)?;

        Ok(())
    }
}
