use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{Result, StoreError};
use crate::models::{ScanCursor, ScanPage, UserChanges, UserRecord};
use crate::store::dynamo::USER_KEY;
use crate::store::UserStore;

/// MockUserStore is a simple in-memory implementation of UserStore for testing
///
/// Scans walk users in ascending `userId` order and hand out `{"userId": ...}`
/// cursors, mirroring the shape of a DynamoDB last evaluated key. Updates of a
/// missing user create it, as an unconditional UpdateItem does.
pub struct MockUserStore {
    users: Mutex<BTreeMap<String, UserRecord>>,
    writes: AtomicUsize,
    unavailable: Option<String>,
    unreadable: bool,
}

impl MockUserStore {
    /// Create a new empty MockUserStore
    pub fn new() -> Self {
        Self {
            users: Mutex::new(BTreeMap::new()),
            writes: AtomicUsize::new(0),
            unavailable: None,
            unreadable: false,
        }
    }

    /// Create a MockUserStore with initial test data
    pub fn with_data(users: Vec<UserRecord>) -> Self {
        let store = Self::new();
        {
            let mut map = store.users.lock().unwrap();
            for user in users {
                map.insert(user.user_id.clone(), user);
            }
        }
        store
    }

    /// Create a store whose every call fails with the given message
    pub fn unavailable(message: &str) -> Self {
        Self {
            unavailable: Some(message.to_string()),
            ..Self::new()
        }
    }

    /// Create a reachable store holding an item that cannot be decoded as a user,
    /// so scans fail while `ping` still succeeds
    pub fn with_unreadable_item() -> Self {
        Self {
            unreadable: true,
            ..Self::new()
        }
    }

    /// Number of put/update calls that reached the store
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Number of users currently held
    pub fn len(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_available(&self) -> Result<()> {
        match &self.unavailable {
            Some(message) => Err(StoreError::InternalError(message.clone())),
            None => Ok(()),
        }
    }
}

impl Default for MockUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for MockUserStore {
    async fn get_user(&self, user_id: &str) -> Result<UserRecord> {
        self.check_available()?;

        self.users
            .lock()
            .unwrap()
            .get(user_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("User not found: {}", user_id)))
    }

    async fn put_user(&self, user: UserRecord) -> Result<UserRecord> {
        self.check_available()?;
        self.writes.fetch_add(1, Ordering::SeqCst);

        self.users
            .lock()
            .unwrap()
            .insert(user.user_id.clone(), user.clone());

        Ok(user)
    }

    async fn update_user(&self, user_id: &str, changes: UserChanges) -> Result<UserRecord> {
        self.check_available()?;
        self.writes.fetch_add(1, Ordering::SeqCst);

        let mut users = self.users.lock().unwrap();
        let user = users
            .entry(user_id.to_string())
            .or_insert_with(|| UserRecord {
                user_id: user_id.to_string(),
                name: String::new(),
                email: String::new(),
                age: None,
                created_at: String::new(),
                updated_at: String::new(),
            });

        user.name = changes.name;
        user.email = changes.email;
        user.age = changes.age;
        user.updated_at = changes.updated_at;

        Ok(user.clone())
    }

    async fn scan_users(&self, limit: i32, cursor: Option<ScanCursor>) -> Result<ScanPage> {
        self.check_available()?;

        if limit < 1 {
            return Err(StoreError::InternalError(format!(
                "Limit must be at least 1, got {}",
                limit
            )));
        }

        if self.unreadable {
            return Err(StoreError::InternalError(
                "DynamoDB serialization error: missing field `email`".to_string(),
            ));
        }

        let start = match cursor {
            Some(cursor) => match cursor.get(USER_KEY) {
                Some(Value::String(id)) if cursor.len() == 1 => Bound::Excluded(id.clone()),
                _ => {
                    return Err(StoreError::InternalError(
                        "The provided starting key is invalid".to_string(),
                    ))
                }
            },
            None => Bound::Unbounded,
        };

        let users = self.users.lock().unwrap();
        let mut remaining = users.range((start, Bound::Unbounded)).map(|(_, u)| u);

        let items: Vec<UserRecord> = remaining.by_ref().take(limit as usize).cloned().collect();

        let next_cursor = match (remaining.next(), items.last()) {
            (Some(_), Some(last)) => Some(ScanCursor::from([(
                USER_KEY.to_string(),
                Value::String(last.user_id.clone()),
            )])),
            _ => None,
        };

        Ok(ScanPage {
            scanned_count: items.len(),
            items,
            next_cursor,
        })
    }

    async fn ping(&self) -> Result<()> {
        self.check_available()
    }
}
