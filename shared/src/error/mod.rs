use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::scan::ScanError;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

// Helper function to map general DynamoDB errors
pub fn map_dynamo_error<E>(operation: &str, err: SdkError<E>) -> StoreError
where
    E: std::error::Error + Send + Sync + 'static,
{
    StoreError::InternalError(format!(
        "DynamoDB {} error: {}",
        operation,
        aws_sdk_dynamodb::error::DisplayErrorContext(err)
    ))
}

pub fn map_get_dynamo_error(err: SdkError<GetItemError>) -> StoreError {
    map_dynamo_error("get_item", err)
}

pub fn map_put_dynamo_error(err: SdkError<PutItemError>) -> StoreError {
    map_dynamo_error("put_item", err)
}

pub fn map_update_dynamo_error(err: SdkError<UpdateItemError>) -> StoreError {
    map_dynamo_error("update_item", err)
}

pub fn map_scan_dynamo_error(err: SdkError<ScanError>) -> StoreError {
    map_dynamo_error("scan", err)
}

impl From<serde_dynamo::Error> for StoreError {
    fn from(err: serde_dynamo::Error) -> Self {
        StoreError::InternalError(format!("DynamoDB serialization error: {}", err))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::InternalError(format!("JSON serialization error: {}", err))
    }
}
