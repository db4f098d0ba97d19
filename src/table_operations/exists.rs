//! Table existence check.

use aws_sdk_dynamodb::Client;

use crate::errors::{ErrorFamily, ProvisionError, classify_sdk_error};

/// Check whether a table exists, via DescribeTable.
///
/// ResourceNotFoundException means "no"; every other failure propagates.
pub async fn table_exists(client: &Client, table_name: &str) -> Result<bool, ProvisionError> {
    match client.describe_table().table_name(table_name).send().await {
        Ok(_) => Ok(true),
        Err(err) => {
            if let Some(service_err) = err.as_service_error()
                && service_err.is_resource_not_found_exception()
            {
                return Ok(false);
            }
            Err(classify_sdk_error(err, ErrorFamily::Table))
        }
    }
}
