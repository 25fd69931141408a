use crate::error::IngestError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Maximum number of labels requested from the detection service.
pub const DETECT_MAX_LABELS: u32 = 10;
/// Confidence floor (percent) below which the detection service drops labels.
pub const DETECT_MIN_CONFIDENCE: u32 = 70;
/// Default number of hits requested per keyword search.
pub const DEFAULT_SEARCH_LIMIT: usize = 10;
/// Default lifetime of an issued download locator, in seconds.
pub const DEFAULT_URL_TTL_SECONDS: u32 = 1_000;

/// The unit of record in the index. Identity is `(bucket, object_key)`;
/// writing the same identity twice replaces the previous document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchDocument {
    #[serde(rename = "objectKey")]
    pub object_key: String,
    pub bucket: String,
    #[serde(rename = "createdTimestamp")]
    pub created_timestamp: String,
    pub labels: Vec<String>,
}

impl SearchDocument {
    /// Stable index document id derived from identity, so re-ingestion
    /// upserts instead of inserting a second copy.
    pub fn document_id(&self) -> String {
        format!("{}/{}", self.bucket, self.object_key)
    }
}

/// A search result row for one keyword query. Same shape as the indexed
/// document; never persisted by the query path.
pub type SearchHit = SearchDocument;

/// One "object created" notification from the photo store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObjectEvent {
    pub bucket: String,
    pub object_key: String,
    pub event_time: String,
}

impl ObjectEvent {
    /// Parses an S3-style notification envelope
    /// (`Records[0].s3.bucket.name`, `Records[0].s3.object.key`,
    /// `Records[0].eventTime`). Any missing field fails fast so no partial
    /// document reaches the index.
    pub fn from_notification(notification: &Value) -> Result<Self, IngestError> {
        let record = notification
            .pointer("/Records/0")
            .ok_or_else(|| IngestError::MalformedEvent("no records in notification".to_string()))?;

        let bucket = record
            .pointer("/s3/bucket/name")
            .and_then(Value::as_str)
            .ok_or_else(|| IngestError::MalformedEvent("missing bucket name".to_string()))?;
        let object_key = record
            .pointer("/s3/object/key")
            .and_then(Value::as_str)
            .ok_or_else(|| IngestError::MalformedEvent("missing object key".to_string()))?;
        let event_time = record
            .pointer("/eventTime")
            .and_then(Value::as_str)
            .ok_or_else(|| IngestError::MalformedEvent("missing event time".to_string()))?;

        let event = Self {
            bucket: bucket.to_string(),
            object_key: object_key.to_string(),
            event_time: event_time.to_string(),
        };
        event.validate()?;
        Ok(event)
    }

    pub fn validate(&self) -> Result<(), IngestError> {
        if self.bucket.trim().is_empty() {
            return Err(IngestError::MalformedEvent("empty bucket".to_string()));
        }
        if self.object_key.trim().is_empty() {
            return Err(IngestError::MalformedEvent("empty object key".to_string()));
        }
        if self.event_time.trim().is_empty() {
            return Err(IngestError::MalformedEvent("empty event time".to_string()));
        }
        Ok(())
    }
}

/// Acknowledgement returned once an event has been assembled and indexed.
#[derive(Debug, Clone, Serialize)]
pub struct IngestReceipt {
    pub document_id: String,
    pub label_count: usize,
}

/// The deduplicated, locator-resolved output for one keyword. Only keywords
/// with at least one hit produce a group.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResultGroup {
    pub keyword: String,
    pub urls: Vec<String>,
}

/// Tie-breaking strategy for equally relevant matches. `Randomized` is the
/// default and intentionally shuffles ties to diversify repeated queries; a
/// seed pins the shuffle for reproducible runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreStrategy {
    Randomized { seed: Option<i64> },
    Relevance,
}

impl Default for ScoreStrategy {
    fn default() -> Self {
        Self::Randomized { seed: None }
    }
}

/// How much of the per-keyword output reaches the caller.
///
/// `FirstGroupOnly` reproduces the historical contract: only the first
/// keyword's group is returned, and the response is empty whenever the first
/// keyword had no hits, even if later keywords matched. `AllGroups` returns
/// every group in keyword order and is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultScope {
    FirstGroupOnly,
    #[default]
    AllGroups,
}

#[derive(Debug, Clone, Copy)]
pub struct QueryOptions {
    pub limit: usize,
    pub ttl_seconds: u32,
    pub scope: ResultScope,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_SEARCH_LIMIT,
            ttl_seconds: DEFAULT_URL_TTL_SECONDS,
            scope: ResultScope::default(),
        }
    }
}
