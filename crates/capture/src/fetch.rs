//! Full-buffer snapshot retrieval with capability fallback.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use consoletail_ec2::{ConsoleOutputApi, Ec2Error};

/// Failure of a single fetch cycle. Never fatal; the worker skips the
/// cycle and retries on its normal cadence.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error(transparent)]
    Api(#[from] Ec2Error),

    #[error("console output is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),
}

/// Fetches one instance's full console output as text.
///
/// When `prefer_latest` is set and the instance type rejects the
/// most-recent variant, the request is reissued exactly once with
/// `latest` disabled and that result is returned instead. Every other
/// remote error propagates unchanged; this layer adds no retries of its
/// own.
pub async fn fetch_console_text(
    api: &dyn ConsoleOutputApi,
    instance_id: &str,
    prefer_latest: bool,
) -> Result<String, FetchError> {
    let blob = match api.get_console_output(instance_id, prefer_latest).await {
        Ok(blob) => blob,
        Err(Ec2Error::UnsupportedOperation) if prefer_latest => {
            tracing::info!(
                instance_id,
                "latest console output unsupported by instance type, refetching without it"
            );
            api.get_console_output(instance_id, false).await?
        }
        Err(e) => return Err(e.into()),
    };

    let bytes = STANDARD.decode(blob.trim())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
