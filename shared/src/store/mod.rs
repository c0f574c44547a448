use async_trait::async_trait;

use crate::error::Result;
use crate::models::{ScanCursor, ScanPage, UserChanges, UserRecord};

// Expose the DynamoDB store module
pub mod dynamo;

/// UserStore trait defining the interface for user storage implementations
///
/// Implementations must be safe to share across concurrent invocations; handlers
/// hold them behind an `Arc` for the lifetime of the process.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Gets a user by ID, failing with `StoreError::NotFound` when absent
    async fn get_user(&self, user_id: &str) -> Result<UserRecord>;

    /// Writes the full record unconditionally
    async fn put_user(&self, user: UserRecord) -> Result<UserRecord>;

    /// Assigns the mutable attributes of a user and returns the record as stored afterwards.
    /// A missing user is created holding only the assigned attributes.
    async fn update_user(&self, user_id: &str, changes: UserChanges) -> Result<UserRecord>;

    /// Reads at most `limit` items, resuming after `cursor` when given
    async fn scan_users(&self, limit: i32, cursor: Option<ScanCursor>) -> Result<ScanPage>;

    /// Checks that the backing table can be read, without decoding any item
    async fn ping(&self) -> Result<()>;
}
