//! Wait for a table to become active.

use std::time::Duration;

use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::{IndexStatus, TableStatus};
use tokio::time::{Instant, sleep};
use tracing::debug;

use crate::errors::{ErrorFamily, ProvisionError, classify_sdk_error};

const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Poll DescribeTable until the table and all of its indexes report ACTIVE.
///
/// Scalable targets can only be registered against a live table, so the
/// provisioning flow runs this between create and autoscaling.
pub async fn wait_for_table_active(
    client: &Client,
    table_name: &str,
    timeout: Duration,
) -> Result<(), ProvisionError> {
    let deadline = Instant::now() + timeout;

    loop {
        let output = client
            .describe_table()
            .table_name(table_name)
            .send()
            .await
            .map_err(|e| classify_sdk_error(e, ErrorFamily::Table))?;

        let table = output.table();
        let table_active = table
            .map(|t| t.table_status() == Some(&TableStatus::Active))
            .unwrap_or(false);
        let indexes_active = table
            .map(|t| {
                t.global_secondary_indexes()
                    .iter()
                    .all(|ix| ix.index_status() == Some(&IndexStatus::Active))
            })
            .unwrap_or(false);

        if table_active && indexes_active {
            debug!(table = %table_name, "table and indexes active");
            return Ok(());
        }

        if Instant::now() >= deadline {
            return Err(ProvisionError::WaitTimedOut {
                table: table_name.to_string(),
                waited_secs: timeout.as_secs(),
            });
        }

        debug!(table = %table_name, "table not active yet");
        sleep(POLL_INTERVAL).await;
    }
}
