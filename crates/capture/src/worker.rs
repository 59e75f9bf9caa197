//! Per-instance polling worker.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use consoletail_ec2::ConsoleOutputApi;

use crate::fetch::fetch_console_text;
use crate::overlap::overlap_index;
use crate::resource::Resource;
use crate::sink::LogSink;

/// Captures one instance's console output into one log file.
///
/// Owns its previous-snapshot state and file handle exclusively; nothing
/// is shared between workers. The previous snapshot starts empty on
/// every process start, so the first poll after a restart may re-append
/// overlap already present in the file — the accepted cost of not
/// persisting snapshot state.
pub struct Worker {
    resource: Resource,
    api: Arc<dyn ConsoleOutputApi>,
    sink: LogSink,
    prev: String,
}

impl Worker {
    /// Opens the instance's log file and prepares the worker.
    ///
    /// A file-open failure here is a configuration error; the supervisor
    /// turns it into a fatal startup error for the whole process.
    pub fn new(
        resource: Resource,
        folder: &Path,
        api: Arc<dyn ConsoleOutputApi>,
    ) -> std::io::Result<Self> {
        let sink = LogSink::open(folder, &resource.alias)?;
        Ok(Self {
            resource,
            api,
            sink,
            prev: String::new(),
        })
    }

    /// Runs one fetch → resolve → append cycle.
    ///
    /// A fetch failure leaves the previous snapshot untouched and skips
    /// the rest of the cycle. A write failure is contained and the
    /// snapshot still advances: retrying the same diff next cycle could
    /// grow duplicates without bound if the failure was transient write
    /// contention rather than data loss.
    pub async fn poll_once(&mut self) {
        let latest =
            match fetch_console_text(self.api.as_ref(), &self.resource.instance_id, true).await {
                Ok(latest) => latest,
                Err(e) => {
                    tracing::warn!(
                        instance_id = %self.resource.instance_id,
                        error = %e,
                        "failed fetching console output, retrying next cycle"
                    );
                    return;
                }
            };

        let idx = overlap_index(self.prev.as_bytes(), latest.as_bytes());
        let new_data = &latest.as_bytes()[idx..];

        if new_data.is_empty() {
            tracing::debug!(
                instance_id = %self.resource.instance_id,
                "no new console output"
            );
        } else {
            match self.sink.append(new_data) {
                Ok(total) => {
                    tracing::info!(
                        instance_id = %self.resource.instance_id,
                        bytes = new_data.len(),
                        total,
                        path = %self.sink.path().display(),
                        "appended new console output"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        instance_id = %self.resource.instance_id,
                        error = %e,
                        "failed writing console output to log file"
                    );
                }
            }
        }

        self.prev = latest;
    }

    /// Polls forever at a fixed cadence.
    ///
    /// The delay applies after every cycle whether or not it succeeded;
    /// there is no backoff and no jitter.
    pub async fn run(mut self, interval: Duration) {
        tracing::info!(
            instance_id = %self.resource.instance_id,
            path = %self.sink.path().display(),
            "start aggregating console log"
        );
        loop {
            self.poll_once().await;
            tokio::time::sleep(interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use consoletail_ec2::Ec2Error;

    struct ScriptedApi {
        responses: Mutex<VecDeque<Result<String, Ec2Error>>>,
    }

    impl ScriptedApi {
        fn new(responses: Vec<Result<String, Ec2Error>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
            })
        }

        fn snapshot(text: &str) -> Result<String, Ec2Error> {
            Ok(STANDARD.encode(text))
        }

        fn failure() -> Result<String, Ec2Error> {
            Err(Ec2Error::Api {
                code: "RequestLimitExceeded".into(),
                message: "slow down".into(),
            })
        }
    }

    #[async_trait]
    impl ConsoleOutputApi for ScriptedApi {
        async fn get_console_output(
            &self,
            _instance_id: &str,
            _latest: bool,
        ) -> Result<String, Ec2Error> {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(ScriptedApi::failure())
        }
    }

    fn read_log(folder: &Path, alias: &str) -> String {
        std::fs::read_to_string(folder.join(format!("{alias}.log"))).unwrap()
    }

    #[tokio::test]
    async fn first_poll_appends_entire_snapshot() {
        let tmp = tempfile::tempdir().unwrap();
        let api = ScriptedApi::new(vec![ScriptedApi::snapshot("Booting OS...")]);
        let mut worker = Worker::new(Resource::parse("i-1"), tmp.path(), api).unwrap();

        worker.poll_once().await;

        assert_eq!(read_log(tmp.path(), "i-1"), "Booting OS...\n");
        assert_eq!(worker.prev, "Booting OS...");
    }

    #[tokio::test]
    async fn grown_buffer_appends_only_the_suffix() {
        let tmp = tempfile::tempdir().unwrap();
        let api = ScriptedApi::new(vec![
            ScriptedApi::snapshot("Booting OS..."),
            ScriptedApi::snapshot("Booting OS...\nKernel loaded"),
        ]);
        let mut worker = Worker::new(Resource::parse("i-1"), tmp.path(), api).unwrap();

        worker.poll_once().await;
        worker.poll_once().await;

        assert_eq!(
            read_log(tmp.path(), "i-1"),
            "Booting OS...\n\nKernel loaded\n"
        );
    }

    #[tokio::test]
    async fn unchanged_buffer_appends_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let api = ScriptedApi::new(vec![
            ScriptedApi::snapshot("same output"),
            ScriptedApi::snapshot("same output"),
        ]);
        let mut worker = Worker::new(Resource::parse("i-1"), tmp.path(), api).unwrap();

        worker.poll_once().await;
        worker.poll_once().await;

        assert_eq!(read_log(tmp.path(), "i-1"), "same output\n");
    }

    #[tokio::test]
    async fn rotated_buffer_is_logged_in_full() {
        let tmp = tempfile::tempdir().unwrap();
        let api = ScriptedApi::new(vec![
            ScriptedApi::snapshot("first boot"),
            ScriptedApi::snapshot("fresh buffer after reset"),
        ]);
        let mut worker = Worker::new(Resource::parse("i-1"), tmp.path(), api).unwrap();

        worker.poll_once().await;
        worker.poll_once().await;

        assert_eq!(
            read_log(tmp.path(), "i-1"),
            "first boot\nfresh buffer after reset\n"
        );
    }

    #[tokio::test]
    async fn fetch_failure_preserves_snapshot_state() {
        let tmp = tempfile::tempdir().unwrap();
        let api = ScriptedApi::new(vec![
            ScriptedApi::snapshot("abc"),
            ScriptedApi::failure(),
            ScriptedApi::snapshot("abcdef"),
        ]);
        let mut worker = Worker::new(Resource::parse("i-1"), tmp.path(), api).unwrap();

        worker.poll_once().await;
        // Failed cycle: no write, previous snapshot untouched.
        worker.poll_once().await;
        assert_eq!(read_log(tmp.path(), "i-1"), "abc\n");
        assert_eq!(worker.prev, "abc");

        // Next successful poll still diffs against "abc".
        worker.poll_once().await;
        assert_eq!(read_log(tmp.path(), "i-1"), "abc\ndef\n");
    }

    #[tokio::test]
    async fn capability_fallback_feeds_the_same_cycle() {
        let tmp = tempfile::tempdir().unwrap();
        let api = ScriptedApi::new(vec![
            Err(Ec2Error::UnsupportedOperation),
            ScriptedApi::snapshot("non-nitro console"),
        ]);
        let mut worker = Worker::new(Resource::parse("i-1"), tmp.path(), api).unwrap();

        worker.poll_once().await;

        assert_eq!(read_log(tmp.path(), "i-1"), "non-nitro console\n");
    }

    #[tokio::test]
    async fn alias_names_the_log_file() {
        let tmp = tempfile::tempdir().unwrap();
        let api = ScriptedApi::new(vec![ScriptedApi::snapshot("hello")]);
        let mut worker = Worker::new(Resource::parse("i-1:web-1"), tmp.path(), api).unwrap();

        worker.poll_once().await;

        assert_eq!(read_log(tmp.path(), "web-1"), "hello\n");
        assert!(!tmp.path().join("i-1.log").exists());
    }

    #[test]
    fn missing_folder_is_a_setup_error() {
        let tmp = tempfile::tempdir().unwrap();
        let api = ScriptedApi::new(vec![]);
        let missing = tmp.path().join("nope");
        assert!(Worker::new(Resource::parse("i-1"), &missing, api).is_err());
    }
}
