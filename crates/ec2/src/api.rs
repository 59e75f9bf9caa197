//! Console output API trait and error taxonomy.

use async_trait::async_trait;

/// Errors from the EC2 console output API.
#[derive(Debug, thiserror::Error)]
pub enum Ec2Error {
    /// The instance type rejected the requested variant. Non-Nitro
    /// instance types do not support retrieving the latest console
    /// output.
    #[error("operation not supported by this instance type")]
    UnsupportedOperation,

    #[error("API error {code}: {message}")]
    Api { code: String, message: String },

    #[error("failed to run aws cli: {0}")]
    Transport(#[from] std::io::Error),

    #[error("malformed API response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not establish AWS session: {0}")]
    Session(String),
}

/// Remote source of an instance's full console output buffer.
///
/// Every call returns the entire currently-buffered output, never a
/// delta. `latest` asks for the most recent output rather than the
/// buffer captured around boot.
#[async_trait]
pub trait ConsoleOutputApi: Send + Sync {
    /// Returns the base64-encoded console output for one instance.
    async fn get_console_output(
        &self,
        instance_id: &str,
        latest: bool,
    ) -> Result<String, Ec2Error>;
}
