//! AWS CLI transport for the console output API.
//!
//! Shells out to `aws ec2 get-console-output` with `--output json` and
//! parses the response. API failures surface on stderr as
//! `An error occurred (<Code>) when calling the ... operation: ...`;
//! the code is extracted to classify the error.

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;

use crate::api::{ConsoleOutputApi, Ec2Error};

const UNSUPPORTED_OPERATION: &str = "UnsupportedOperation";
const ERROR_PREFIX: &str = "An error occurred (";

/// Console output client backed by the `aws` CLI.
pub struct AwsCliClient {
    region: String,
}

/// JSON body of a `get-console-output` call.
///
/// `Output` is absent when the instance has not produced any console
/// output yet.
#[derive(Debug, Deserialize)]
struct ConsoleOutputResponse {
    #[serde(rename = "Output", default)]
    output: String,
}

impl AwsCliClient {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
        }
    }

    /// Confirms credentials resolve before any polling starts.
    ///
    /// Runs `aws sts get-caller-identity` once; a failure here is a
    /// configuration error, not a transient one.
    pub async fn verify_session(&self) -> Result<(), Ec2Error> {
        let output = Command::new("aws")
            .args([
                "sts",
                "get-caller-identity",
                "--region",
                &self.region,
                "--output",
                "json",
            ])
            .output()
            .await?;

        if output.status.success() {
            tracing::debug!(region = %self.region, "AWS session verified");
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(Ec2Error::Session(stderr.trim().to_string()))
        }
    }
}

#[async_trait]
impl ConsoleOutputApi for AwsCliClient {
    async fn get_console_output(
        &self,
        instance_id: &str,
        latest: bool,
    ) -> Result<String, Ec2Error> {
        let mut cmd = Command::new("aws");
        cmd.args([
            "ec2",
            "get-console-output",
            "--instance-id",
            instance_id,
            "--region",
            &self.region,
            "--output",
            "json",
        ]);
        if latest {
            cmd.arg("--latest");
        }

        let output = cmd.output().await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(classify_api_error(&stderr));
        }

        let resp: ConsoleOutputResponse = serde_json::from_slice(&output.stdout)?;
        Ok(resp.output)
    }
}

/// Maps a CLI error message to the error taxonomy.
fn classify_api_error(stderr: &str) -> Ec2Error {
    let message = stderr.trim().to_string();
    match error_code(&message) {
        Some(code) if code == UNSUPPORTED_OPERATION => Ec2Error::UnsupportedOperation,
        Some(code) => Ec2Error::Api { code, message },
        None => Ec2Error::Api {
            code: "Unknown".into(),
            message,
        },
    }
}

/// Extracts the parenthesised error code from a CLI error line.
fn error_code(message: &str) -> Option<String> {
    let start = message.find(ERROR_PREFIX)? + ERROR_PREFIX.len();
    let rest = &message[start..];
    let end = rest.find(')')?;
    Some(rest[..end].to_string())
}
