//! Create table operation.

use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::BillingMode;
use tracing::info;

use crate::errors::{ErrorFamily, ProvisionError, classify_sdk_error};
use crate::schema::TableSchema;

/// Issue CreateTable for the given schema.
///
/// Returns once the service accepts the request; the table is still CREATING
/// at that point. Use `wait_for_table_active` before configuring autoscaling.
pub async fn create_table(client: &Client, schema: &TableSchema) -> Result<(), ProvisionError> {
    info!(
        table = %schema.table_name,
        indexes = schema.index_count,
        "creating table"
    );

    client
        .create_table()
        .table_name(&schema.table_name)
        .billing_mode(BillingMode::Provisioned)
        .set_attribute_definitions(Some(schema.attribute_definitions()?))
        .set_key_schema(Some(schema.primary_key_schema()?))
        .set_global_secondary_indexes(Some(schema.global_secondary_indexes()?))
        .provisioned_throughput(TableSchema::throughput()?)
        .send()
        .await
        .map_err(|e| classify_sdk_error(e, ErrorFamily::Table))?;

    info!(table = %schema.table_name, "create request accepted");
    Ok(())
}
