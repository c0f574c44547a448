use axum::Router;
use std::sync::Arc;
use users_shared::error::Result as StoreResult;
use users_shared::models::UserRecord;
use users_shared::store::dynamo::DynamoUserStore;
use users_shared::store::UserStore;
use users_shared::test_utils::dynamo_test_utils::{
    clear_dynamo_table, create_dynamo_client, create_users_table, use_dynamodb,
};
use users_shared::test_utils::mock_user_store::MockUserStore;
use users_shared::test_utils::test_logging::init_test_logging;

use crate::routes;

pub const TEST_TIMESTAMP: &str = "2024-01-01T00:00:00.000Z";

/// The store behind a test router: in-memory by default, DynamoDB Local when
/// `USE_DYNAMODB=true`.
#[derive(Clone)]
pub enum TestStore {
    Mock(Arc<MockUserStore>),
    DynamoDB(Arc<DynamoUserStore>),
}

impl TestStore {
    pub fn router(&self) -> Router {
        match self {
            TestStore::Mock(store) => routes::create_router_with_store(store.clone(), ""),
            TestStore::DynamoDB(store) => routes::create_router_with_store(store.clone(), ""),
        }
    }

    pub async fn get_user(&self, user_id: &str) -> StoreResult<UserRecord> {
        match self {
            TestStore::Mock(store) => store.get_user(user_id).await,
            TestStore::DynamoDB(store) => store.get_user(user_id).await,
        }
    }

    /// Writes seen by the store; only the mock can count them
    pub fn write_count(&self) -> Option<usize> {
        match self {
            TestStore::Mock(store) => Some(store.write_count()),
            TestStore::DynamoDB(_) => None,
        }
    }
}

/// Builds a store seeded with `users`. Each DynamoDB-backed test gets its own table.
pub async fn create_test_store(table_name: &str, users: Vec<UserRecord>) -> TestStore {
    init_test_logging();

    if use_dynamodb() {
        let client = create_dynamo_client().await;

        if let Err(e) = create_users_table(&client, table_name).await {
            log::error!("Error setting up test table: {}", e);
        }
        clear_dynamo_table(&client, table_name).await;

        let store = Arc::new(DynamoUserStore::with_client_and_table(
            client,
            table_name.to_string(),
        ));
        for user in users {
            store.put_user(user).await.expect("Failed to seed test user");
        }
        TestStore::DynamoDB(store)
    } else {
        TestStore::Mock(Arc::new(MockUserStore::with_data(users)))
    }
}

pub fn test_user(id: &str, name: &str, age: Option<i64>) -> UserRecord {
    UserRecord {
        user_id: id.to_string(),
        name: name.to_string(),
        email: format!("{}@example.com", id),
        age: age.map(serde_json::Number::from),
        created_at: TEST_TIMESTAMP.to_string(),
        updated_at: TEST_TIMESTAMP.to_string(),
    }
}

pub fn test_users(count: usize) -> Vec<UserRecord> {
    (1..=count)
        .map(|i| test_user(&format!("user_{}", i), &format!("User {}", i), None))
        .collect()
}

/// Percent-encodes a query parameter value
pub fn encode_query_value(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{:02X}", b),
        })
        .collect()
}
