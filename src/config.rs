//! Configuration types for script-dl

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Fetch behavior configuration (endpoint, timeout, content selection)
///
/// Groups settings related to how script pages are requested and how the
/// content block is identified. Used as a nested sub-config within
/// [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Endpoint template; the normalized title is appended as
    /// `<endpoint>/<title>.html` (default: the IMSDb script archive)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Request timeout (default: 30 seconds)
    ///
    /// A hung request would otherwise stall its worker for the rest of the
    /// run; there are no retries, so a timeout simply fails the item.
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,

    /// Element tag that holds the script text (default: "pre")
    #[serde(default = "default_content_tag")]
    pub content_tag: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            request_timeout: default_request_timeout(),
            content_tag: default_content_tag(),
        }
    }
}

/// Worker pool configuration (concurrency and queue bounds)
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Number of concurrent workers (default: 100)
    ///
    /// This bounds concurrent outbound connections independent of input
    /// size.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Capacity of the bounded work queue (default: 1000)
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

/// Output configuration (artifact directory)
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory where `.txt` and `.meta` artifacts are written
    /// (default: current directory)
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

/// Main configuration for [`ScriptScraper`](crate::ScriptScraper)
///
/// Fields are organized into logical sub-configs:
/// - [`fetch`](FetchConfig) — endpoint, timeout, content selection
/// - [`pool`](PoolConfig) — worker count and queue capacity
/// - [`output`](OutputConfig) — artifact directory
///
/// All sub-config fields are flattened for serialization, so the JSON format
/// has no nesting.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Fetch behavior settings
    #[serde(flatten)]
    pub fetch: FetchConfig,

    /// Worker pool settings
    #[serde(flatten)]
    pub pool: PoolConfig,

    /// Output settings
    #[serde(flatten)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a JSON file
    ///
    /// Missing fields take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the endpoint is not a valid URL, the
    /// content tag is empty, or the pool bounds are zero.
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.fetch.endpoint).map_err(|e| Error::Config {
            message: format!("invalid endpoint '{}': {}", self.fetch.endpoint, e),
            key: Some("endpoint".to_string()),
        })?;

        if self.fetch.content_tag.is_empty() {
            return Err(Error::Config {
                message: "content tag must not be empty".to_string(),
                key: Some("content_tag".to_string()),
            });
        }

        if self.pool.workers == 0 {
            return Err(Error::Config {
                message: "worker count must be greater than zero".to_string(),
                key: Some("workers".to_string()),
            });
        }

        if self.pool.queue_capacity == 0 {
            return Err(Error::Config {
                message: "queue capacity must be greater than zero".to_string(),
                key: Some("queue_capacity".to_string()),
            });
        }

        Ok(())
    }
}

fn default_endpoint() -> String {
    "https://www.imsdb.com/scripts".to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_content_tag() -> String {
    "pre".to_string()
}

fn default_workers() -> usize {
    100
}

fn default_queue_capacity() -> usize {
    1000
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Serialize Duration as seconds for human-editable config files
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
