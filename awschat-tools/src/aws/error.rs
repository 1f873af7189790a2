use std::error::Error as StdError;
use std::fmt;

use aws_smithy_runtime_api::client::result::SdkError;
use aws_smithy_types::error::metadata::ProvideErrorMetadata;

/// A failed AWS API call, reduced to the service error code and message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}{message}", code_prefix(.code))]
pub struct AwsApiError {
    pub code: Option<String>,
    pub message: String,
}

impl AwsApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    /// Convert an SDK error.
    ///
    /// Service errors keep their code and message. Transport and other
    /// failures fall back to the innermost message of the source chain.
    pub fn from_sdk<E, R>(err: SdkError<E, R>) -> Self
    where
        E: ProvideErrorMetadata + StdError + 'static,
        R: fmt::Debug,
    {
        if let Some(service_err) = err.as_service_error() {
            let code = service_err.code().map(str::to_string);
            if let Some(message) = service_err.message() {
                return Self {
                    code,
                    message: message.to_string(),
                };
            }
            if let Some(code) = code {
                return Self {
                    message: service_err.to_string(),
                    code: Some(code),
                };
            }
        }

        Self::message(
            awschat_core::error_chain_messages(&err)
                .pop()
                .unwrap_or_else(|| "unknown AWS error".to_string()),
        )
    }
}

fn code_prefix(code: &Option<String>) -> String {
    code.as_ref().map(|c| format!("{}: ", c)).unwrap_or_default()
}

/// Why an inspection produced no answer. `Display` is the text the model sees.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InspectionError {
    #[error("Failed to list buckets: {0}")]
    ListBuckets(AwsApiError),

    #[error("Failed to list contents of {bucket}: {source}")]
    ListObjects { bucket: String, source: AwsApiError },

    #[error("Failed to describe instances: {0}")]
    DescribeInstances(AwsApiError),

    #[error("Failed to describe user {user}: {source}")]
    DescribeUser { user: String, source: AwsApiError },
}
