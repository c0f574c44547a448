use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Path, Query, State},
};
use std::sync::Arc;
use users_shared::error::StoreError;
use users_shared::models::{now_str, ScanCursor, UserChanges, UserRecord};
use users_shared::store::UserStore;
use uuid::Uuid;

use super::parse_json_body;
use crate::error::{AppError, Result};
use crate::models::{CreateUserRequest, ListUsersQuery, UpdateUserRequest};
use crate::response::ApiResponse;

pub const DEFAULT_PAGE_SIZE: i32 = 10;

// GET /users?limit=&lastKey=
pub async fn list_users<S>(
    State(store): State<Arc<S>>,
    query: std::result::Result<Query<ListUsersQuery>, QueryRejection>,
) -> Result<ApiResponse>
where
    S: UserStore,
{
    let Query(query) = query.map_err(|e| AppError::Internal(e.body_text()))?;

    let limit = parse_limit(query.limit.as_deref());
    let cursor = parse_cursor(query.last_key.as_deref())?;
    tracing::info!("Listing users: limit={}, resuming={}", limit, cursor.is_some());

    let page = store.scan_users(limit, cursor).await?;
    tracing::debug!(
        "Scan returned {} items ({} scanned), more={}",
        page.items.len(),
        page.scanned_count,
        page.next_cursor.is_some()
    );

    Ok(ApiResponse::ok(serde_json::json!({
        "count": page.items.len(),
        "totalScanned": page.scanned_count,
        "hasMore": page.next_cursor.is_some(),
        "nextCursor": page.next_cursor,
        "users": page.items,
    })))
}

// POST /users
pub async fn create_user<S>(State(store): State<Arc<S>>, body: Bytes) -> Result<ApiResponse>
where
    S: UserStore,
{
    let payload: CreateUserRequest = parse_json_body(&body)?;

    let (name, email) = match (payload.name, payload.email) {
        (Some(name), Some(email)) if !name.is_empty() && !email.is_empty() => (name, email),
        _ => return Err(AppError::BadRequest("Name and email are required".into())),
    };

    let now = now_str();
    let new_user = UserRecord {
        user_id: Uuid::new_v4().to_string(),
        name,
        email,
        age: payload.age,
        created_at: now.clone(),
        updated_at: now,
    };
    tracing::info!("Creating user {}", new_user.user_id);

    let created = store.put_user(new_user).await?;

    Ok(ApiResponse::created(serde_json::json!({
        "message": "User created successfully",
        "user": created,
    })))
}

// PUT|PATCH /users/:userId
pub async fn update_user<S>(
    State(store): State<Arc<S>>,
    user_id: Option<Path<String>>,
    body: Bytes,
) -> Result<ApiResponse>
where
    S: UserStore,
{
    let payload: UpdateUserRequest = parse_json_body(&body)?;

    let user_id = match user_id {
        Some(Path(id)) if !id.trim().is_empty() => id,
        _ => return Err(AppError::BadRequest("User ID is required".into())),
    };

    // A supplied field replaces the stored one, so it must not blank it out
    if payload.name.as_deref() == Some("") {
        return Err(AppError::BadRequest("Name cannot be empty".into()));
    }
    if payload.email.as_deref() == Some("") {
        return Err(AppError::BadRequest("Email cannot be empty".into()));
    }

    let existing = match store.get_user(&user_id).await {
        Ok(user) => user,
        Err(StoreError::NotFound(_)) => {
            return Err(AppError::NotFound("User not found".into()));
        }
        Err(err) => return Err(err.into()),
    };

    if payload.age.was_present() {
        tracing::debug!("Replacing age of {} with {}", user_id, payload.age);
    }

    let changes = UserChanges {
        name: payload.name.unwrap_or(existing.name),
        email: payload.email.unwrap_or(existing.email),
        age: payload.age.merge(existing.age),
        updated_at: now_str().max(existing.updated_at),
    };
    tracing::info!("Updating user {}", user_id);

    // Read and write are separate calls; concurrent updates are last-write-wins
    let updated = store.update_user(&user_id, changes).await?;

    Ok(ApiResponse::ok(serde_json::json!({
        "message": "User updated successfully",
        "user": updated,
    })))
}

/// Page size from the `limit` query parameter, read from its leading integer
/// (`"5abc"` and `"5.9"` both give 5). Anything without a positive leading
/// integer falls back to the default; there is no upper bound.
pub fn parse_limit(raw: Option<&str>) -> i32 {
    raw.and_then(leading_integer)
        .filter(|limit| *limit > 0)
        .unwrap_or(DEFAULT_PAGE_SIZE)
}

fn leading_integer(value: &str) -> Option<i32> {
    let value = value.trim_start();
    let sign_len = if value.starts_with(&['+', '-'][..]) { 1 } else { 0 };
    let end = value[sign_len..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(value.len(), |pos| pos + sign_len);

    value[..end].parse::<i32>().ok()
}

/// Decodes the `lastKey` query parameter into the cursor handed back by a
/// previous page. The structure is not checked here; the store rejects keys it
/// cannot resume from.
pub fn parse_cursor(raw: Option<&str>) -> Result<Option<ScanCursor>> {
    match raw {
        None | Some("") => Ok(None),
        Some(value) => {
            let cursor = serde_json::from_str::<ScanCursor>(value).map_err(|err| {
                tracing::warn!("Failed to decode lastKey: {}", err);
                AppError::from(err)
            })?;
            Ok(Some(cursor))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_limit() {
        assert_eq!(parse_limit(None), 10);
        assert_eq!(parse_limit(Some("2")), 2);
        assert_eq!(parse_limit(Some("abc")), 10);
        assert_eq!(parse_limit(Some("0")), 10);
        assert_eq!(parse_limit(Some("-5")), 10);
        assert_eq!(parse_limit(Some("5000")), 5000);
        assert_eq!(parse_limit(Some("5abc")), 5);
        assert_eq!(parse_limit(Some("2.5")), 2);
        assert_eq!(parse_limit(Some(" +3")), 3);
        assert_eq!(parse_limit(Some("-")), 10);
        assert_eq!(parse_limit(Some("abc5")), 10);
        assert_eq!(parse_limit(Some("99999999999")), 10);
    }

    #[test]
    fn test_parse_cursor() {
        assert!(parse_cursor(None).unwrap().is_none());
        assert!(parse_cursor(Some("")).unwrap().is_none());

        let cursor = parse_cursor(Some(r#"{"userId":"abc"}"#)).unwrap().unwrap();
        assert_eq!(cursor.get("userId"), Some(&json!("abc")));

        assert!(matches!(
            parse_cursor(Some("not-json")),
            Err(AppError::Internal(_))
        ));
        assert!(parse_cursor(Some("[1,2]")).is_err());
    }
}
