//! Core types for script-dl

use serde::{Deserialize, Serialize};

/// Title used in reports when a line is too malformed to carry one
pub const UNKNOWN_TITLE: &str = "[unknown]";

/// Number of comma-separated fields a valid input record must have
const RECORD_FIELDS: usize = 3;

/// A single validated input record
///
/// Input lines have the shape `title,content_rating,<ignored>`. The raw line
/// is kept verbatim because it is written unchanged into the metadata
/// artifact.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    /// Movie title, trimmed
    pub title: String,
    /// Content rating (second field), trimmed
    pub content_rating: String,
    /// The original unparsed input line
    pub raw_line: String,
}

impl WorkItem {
    /// Parse an input line into a work item
    ///
    /// Returns `None` unless the line splits into exactly three
    /// comma-separated fields.
    pub fn parse(line: &str) -> Option<Self> {
        let terms: Vec<&str> = line.split(',').collect();
        if terms.len() != RECORD_FIELDS {
            return None;
        }
        Some(Self {
            title: terms[0].trim().to_string(),
            content_rating: terms[1].trim().to_string(),
            raw_line: line.to_string(),
        })
    }

    /// The identity key for this item's artifacts: lowercased title with
    /// spaces replaced by underscores
    pub fn normalized_title(&self) -> String {
        normalize_title(&self.title)
    }
}

/// Normalize a title into an artifact filename stem
pub fn normalize_title(title: &str) -> String {
    title.to_lowercase().replace(' ', "_")
}

/// Category attached to a failure report
///
/// The malformed-input and already-found failures carry no category; every
/// other failure maps to one of these.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Fetch or extraction failed
    Scrape,
    /// Could not create the text artifact
    TxtOpen,
    /// Could not write the text artifact
    TxtWrite,
    /// Could not create the metadata artifact
    MetaOpen,
    /// Could not write the metadata artifact
    MetaWrite,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FailureKind::Scrape => "scrape error",
            FailureKind::TxtOpen => "file txt open",
            FailureKind::TxtWrite => "file txt write",
            FailureKind::MetaOpen => "file meta open",
            FailureKind::MetaWrite => "file meta write",
        };
        write!(f, "{}", s)
    }
}

/// A per-item success or failure notification
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum ReportEvent {
    /// The item was fetched, extracted, and persisted
    Success {
        /// Title of the processed item
        title: String,
    },
    /// The item failed at some stage
    Failure {
        /// Title of the failed item (or `[unknown]` for malformed lines)
        title: String,
        /// Failure category, when one applies
        kind: Option<FailureKind>,
        /// Human-readable failure message
        message: String,
    },
}

/// Aggregate counters for one pipeline run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Items fully fetched, extracted, and persisted
    pub succeeded: u64,
    /// Items that failed at any stage (including malformed lines)
    pub failed: u64,
    /// Items skipped because their metadata artifact already existed
    pub skipped: u64,
}

impl RunStats {
    /// Fold another worker's counters into this one
    pub fn merge(&mut self, other: RunStats) {
        self.succeeded += other.succeeded;
        self.failed += other.failed;
        self.skipped += other.skipped;
    }

    /// Total number of report events this run produced
    pub fn total(&self) -> u64 {
        self.succeeded + self.failed + self.skipped
    }
}
