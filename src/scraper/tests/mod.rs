use super::*;
use crate::config::{FetchConfig, OutputConfig, PoolConfig};
use std::pin::Pin;
use std::task::{Context, Poll};
use tempfile::tempdir;
use tokio::io::AsyncWrite;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};


/// In-memory report stream sharing its buffer with the test
#[derive(Clone, Default)]
pub(crate) struct SharedBuf(Arc<std::sync::Mutex<Vec<u8>>>);

impl SharedBuf {
    pub(crate) fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }

    pub(crate) fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

impl AsyncWrite for SharedBuf {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<std::io::Result<usize>> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

/// Helper to create a test pipeline writing artifacts into a tempdir and
/// reports into a shared buffer. Returns the tempdir, which must be kept
/// alive.
pub(crate) fn create_test_scraper(
    endpoint: String,
    workers: usize,
) -> (ScriptScraper, SharedBuf, tempfile::TempDir) {
    let temp_dir = tempdir().unwrap();
    let config = Config {
        fetch: FetchConfig {
            endpoint,
            ..Default::default()
        },
        pool: PoolConfig {
            workers,
            ..Default::default()
        },
        output: OutputConfig {
            output_dir: temp_dir.path().to_path_buf(),
        },
    };

    let buf = SharedBuf::default();
    let scraper = ScriptScraper::with_reporter(config, Reporter::new(buf.clone())).unwrap();
    (scraper, buf, temp_dir)
}

/// A mock server answering every GET with the given body
pub(crate) async fn mock_server_with_body(body: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
        .mount(&server)
        .await;
    server
}
