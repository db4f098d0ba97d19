//! Error types and operator guidance for provisioning operations.
//!
//! Maps AWS SDK errors to a single typed error. Uses typed `SdkError` variant
//! matching and `ProvideErrorMetadata` — no string parsing of debug output.
//! Service error codes resolve against a per-operation-family guidance table;
//! codes missing from the table fall back to a generic guidance line instead of
//! failing the lookup.

use std::collections::HashMap;
use std::fmt;

use aws_sdk_dynamodb::error::{BuildError, ProvideErrorMetadata, SdkError};
use once_cell::sync::Lazy;
use thiserror::Error;

/// Guidance used when a service returns a code missing from the family table.
const UNRECOGNIZED_GUIDANCE: &str =
    "Unrecognized error code for this operation, consult the service documentation before retrying";

/// Remediation guidance for codes CreateTable/DescribeTable can return.
static TABLE_GUIDANCE: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (
            "LimitExceededException",
            "Number of simultaneous table operations may exceed the limit. Up to 50 simultaneous \
             table operations are allowed per account. You can have up to 25 such requests running \
             at a time; however, if the table or index specifications are complex, DynamoDB might \
             temporarily reduce the number of concurrent operations. Consider retrying later",
        ),
        (
            "ResourceInUseException",
            "Table already exists, verify table does not exist before retrying",
        ),
        (
            "InternalServerError",
            "Internal server error, generally safe to retry with exponential back-off",
        ),
        (
            "ProvisionedThroughputExceededException",
            "Request rate is too high. If you're using a custom retry strategy make sure to retry \
             with exponential back-off. Otherwise consider reducing frequency of requests or \
             increasing provisioned capacity for your table or secondary index",
        ),
        (
            "ResourceNotFoundException",
            "One of the tables was not found, verify table exists before retrying",
        ),
        (
            "ServiceUnavailable",
            "Had trouble reaching DynamoDB, generally safe to retry with exponential back-off",
        ),
        (
            "ThrottlingException",
            "Request denied due to throttling, generally safe to retry with exponential back-off",
        ),
        (
            "UnrecognizedClientException",
            "The request signature is incorrect most likely due to an invalid AWS access key ID \
             or secret key, fix before retrying",
        ),
        (
            "ValidationException",
            "The input fails to satisfy the constraints specified by DynamoDB, fix input before \
             retrying",
        ),
        (
            "RequestLimitExceeded",
            "Throughput exceeds the current throughput limit for your account, increase account \
             level throughput before retrying",
        ),
    ])
});

/// Remediation guidance for codes RegisterScalableTarget/PutScalingPolicy can
/// return. Overlaps with the table set but is a distinct code space.
static AUTOSCALING_GUIDANCE: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (
            "ConcurrentUpdateException",
            "There is already a pending update to an Auto Scaling resource for this table",
        ),
        (
            "FailedResourceAccessException",
            "The operation could not be completed due to not having access to the resource due \
             to permission restrictions",
        ),
        (
            "ObjectNotFoundException",
            "Object not found, the operation could not be completed because the resource was not \
             found",
        ),
        (
            "InternalServerError",
            "Internal server error, generally safe to retry with exponential back-off",
        ),
        (
            "ServiceUnavailable",
            "Had trouble reaching DynamoDB, generally safe to retry with exponential back-off",
        ),
        (
            "ThrottlingException",
            "Request denied due to throttling, generally safe to retry with exponential back-off",
        ),
        (
            "ValidationException",
            "The input fails to satisfy the constraints specified by DynamoDB, fix input before \
             retrying",
        ),
        (
            "RequestLimitExceeded",
            "Throughput exceeds the current throughput limit for your account, increase account \
             level throughput before retrying",
        ),
    ])
});

/// Which guidance table a service error resolves against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorFamily {
    /// Table lifecycle operations (CreateTable, DescribeTable).
    Table,
    /// Application Auto Scaling operations.
    Autoscaling,
}

impl ErrorFamily {
    fn table(&self) -> &'static HashMap<&'static str, &'static str> {
        match self {
            ErrorFamily::Table => &TABLE_GUIDANCE,
            ErrorFamily::Autoscaling => &AUTOSCALING_GUIDANCE,
        }
    }

    /// Look up the guidance for a provider error code, if the family maps it.
    pub fn guidance(&self, code: &str) -> Option<&'static str> {
        self.table().get(code).copied()
    }
}

/// A service-side rejection, formatted for the operator as
/// `[{code}] {guidance}. Error message: {message}`.
#[derive(Debug)]
pub struct ServiceFailure {
    pub family: ErrorFamily,
    pub code: String,
    pub message: String,
}

impl ServiceFailure {
    /// Guidance line for this failure's code, falling back for unmapped codes.
    pub fn guidance(&self) -> &'static str {
        self.family
            .guidance(&self.code)
            .unwrap_or(UNRECOGNIZED_GUIDANCE)
    }
}

impl fmt::Display for ServiceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}. Error message: {}",
            self.code,
            self.guidance(),
            self.message
        )
    }
}

impl std::error::Error for ServiceFailure {}

/// Errors produced by provisioning operations.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// The service rejected the call.
    #[error(transparent)]
    Service(#[from] ServiceFailure),

    /// The request never reached the service.
    #[error("connection to AWS failed: {0}")]
    Connection(String),

    /// No usable credentials could be resolved.
    #[error("AWS credentials unavailable: {0}")]
    Credentials(String),

    /// A request component failed to build (missing required field).
    #[error("invalid request definition: {0}")]
    Definition(#[from] BuildError),

    /// The table did not reach ACTIVE within the allotted time.
    #[error("timed out after {waited_secs}s waiting for table '{table}' to become active")]
    WaitTimedOut { table: String, waited_secs: u64 },

    /// Anything the SDK surfaced that fits none of the above.
    #[error("unexpected SDK failure: {0}")]
    Unexpected(String),
}

/// Map non-service `SdkError` variants (dispatch failures, timeouts, etc.).
///
/// Returns `Some` for non-service errors, `None` for `ServiceError`.
fn map_outer_sdk_error<E, R>(err: &SdkError<E, R>) -> Option<ProvisionError>
where
    E: fmt::Debug,
    R: fmt::Debug,
{
    match err {
        SdkError::DispatchFailure(dispatch) => {
            if dispatch.is_timeout() {
                Some(ProvisionError::Connection(
                    "request timed out, check your network or endpoint".to_string(),
                ))
            } else if dispatch.is_io() {
                Some(ProvisionError::Connection(
                    "I/O error, check if the endpoint is reachable".to_string(),
                ))
            } else {
                Some(ProvisionError::Connection(
                    "dispatch failed, check if the endpoint is reachable".to_string(),
                ))
            }
        }
        SdkError::TimeoutError(_) => Some(ProvisionError::Connection(
            "request timed out, check your network or endpoint".to_string(),
        )),
        SdkError::ConstructionFailure(err) => {
            let msg = format!("{:?}", err);
            if msg.contains("credentials") || msg.contains("Credentials") {
                Some(ProvisionError::Credentials(
                    "configure credentials via environment variables (AWS_ACCESS_KEY_ID, \
                     AWS_SECRET_ACCESS_KEY), an AWS profile, or an IAM role"
                        .to_string(),
                ))
            } else {
                Some(ProvisionError::Unexpected(format!(
                    "failed to build request: {}",
                    msg
                )))
            }
        }
        SdkError::ResponseError(err) => Some(ProvisionError::Unexpected(format!(
            "invalid response from the service: {:?}",
            err
        ))),
        SdkError::ServiceError(_) => None,
        _ => Some(ProvisionError::Unexpected(format!(
            "unknown SDK failure: {:?}",
            err
        ))),
    }
}

/// Classify a failed SDK call against the given operation family.
///
/// Non-service failures are recognized first via the outer `SdkError` variants;
/// service errors resolve their code and message through typed error metadata.
pub fn classify_sdk_error<E, R>(err: SdkError<E, R>, family: ErrorFamily) -> ProvisionError
where
    E: ProvideErrorMetadata + fmt::Debug + fmt::Display,
    R: fmt::Debug,
{
    if let Some(mapped) = map_outer_sdk_error(&err) {
        return mapped;
    }

    if let Some(service_err) = err.as_service_error() {
        let meta = service_err.meta();
        let code = meta.code().unwrap_or("UnknownError").to_string();
        let message = meta
            .message()
            .map(str::to_string)
            .unwrap_or_else(|| service_err.to_string());
        return ProvisionError::Service(ServiceFailure {
            family,
            code,
            message,
        });
    }

    // map_outer_sdk_error handles all non-service variants
    ProvisionError::Unexpected(format!("{:?}", err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_code_formats_code_guidance_and_message() {
        let failure = ServiceFailure {
            family: ErrorFamily::Table,
            code: "ResourceInUseException".to_string(),
            message: "Table already exists: krabber".to_string(),
        };
        let line = failure.to_string();
        assert!(line.starts_with("[ResourceInUseException]"));
        assert!(line.contains("Table already exists, verify table does not exist before retrying"));
        assert!(line.ends_with("Error message: Table already exists: krabber"));
    }

    #[test]
    fn autoscaling_code_formats_code_guidance_and_message() {
        let failure = ServiceFailure {
            family: ErrorFamily::Autoscaling,
            code: "ConcurrentUpdateException".to_string(),
            message: "update in progress".to_string(),
        };
        let line = failure.to_string();
        assert!(line.starts_with("[ConcurrentUpdateException]"));
        assert!(
            line.contains(
                "There is already a pending update to an Auto Scaling resource for this table"
            )
        );
        assert!(line.ends_with("Error message: update in progress"));
    }

    #[test]
    fn unmapped_code_falls_back_instead_of_failing() {
        let failure = ServiceFailure {
            family: ErrorFamily::Autoscaling,
            code: "BrandNewException".to_string(),
            message: "something else".to_string(),
        };
        let line = failure.to_string();
        assert!(line.starts_with("[BrandNewException]"));
        assert!(line.contains("Unrecognized error code"));
        assert!(line.ends_with("Error message: something else"));
    }

    #[test]
    fn every_expected_code_is_mapped() {
        let table_codes = [
            "LimitExceededException",
            "ResourceInUseException",
            "InternalServerError",
            "ProvisionedThroughputExceededException",
            "ResourceNotFoundException",
            "ServiceUnavailable",
            "ThrottlingException",
            "UnrecognizedClientException",
            "ValidationException",
            "RequestLimitExceeded",
        ];
        for code in table_codes {
            assert!(
                ErrorFamily::Table.guidance(code).is_some(),
                "missing table guidance for {code}"
            );
        }

        let autoscaling_codes = [
            "ConcurrentUpdateException",
            "FailedResourceAccessException",
            "ObjectNotFoundException",
            "InternalServerError",
            "ServiceUnavailable",
            "ThrottlingException",
            "ValidationException",
            "RequestLimitExceeded",
        ];
        for code in autoscaling_codes {
            assert!(
                ErrorFamily::Autoscaling.guidance(code).is_some(),
                "missing autoscaling guidance for {code}"
            );
        }
    }

    #[test]
    fn families_are_distinct_code_spaces() {
        assert!(
            ErrorFamily::Table
                .guidance("ConcurrentUpdateException")
                .is_none()
        );
        assert!(
            ErrorFamily::Autoscaling
                .guidance("ResourceInUseException")
                .is_none()
        );
    }
}
