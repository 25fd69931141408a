use crate::{IngestError, SearchDocument, SearchError, SearchHit};
use async_trait::async_trait;

/// Image label detection: one bounded request per object reference. The
/// service enforces the label cap and confidence floor; nothing is filtered
/// locally.
#[async_trait]
pub trait LabelDetector {
    async fn detect_labels(&self, bucket: &str, object_key: &str)
        -> Result<Vec<String>, IngestError>;
}

/// Reads caller-supplied custom labels from the stored object's user
/// metadata. An object without the metadata header contributes zero labels,
/// which is not an error.
#[async_trait]
pub trait ObjectMetadata {
    async fn custom_labels(&self, bucket: &str, object_key: &str)
        -> Result<Vec<String>, IngestError>;
}

/// Authenticated gateway to the external search index.
#[async_trait]
pub trait PhotoIndex {
    /// Upserts the document keyed by its identity. A non-2xx response
    /// surfaces as a typed failure carrying the status.
    async fn write_document(&self, document: &SearchDocument) -> Result<(), SearchError>;

    /// Relevance query matching `keyword` against the `labels` field only.
    /// No matching document yields `Ok(vec![])`, never an error.
    async fn search(&self, keyword: &str, limit: usize) -> Result<Vec<SearchHit>, SearchError>;
}

/// One round-trip to the slot-filling bot. Returns the non-absent slot
/// values in the slot map's order; an empty list means no actionable
/// keywords were recognized.
#[async_trait]
pub trait SlotFiller {
    async fn fill_slots(&self, text: &str, session_id: &str)
        -> Result<Vec<String>, SearchError>;
}

/// Issues one time-bounded download locator per `(bucket, object_key)` pair.
/// A failure names the object reference that could not be located.
pub trait UrlSigner {
    fn issue(&self, bucket: &str, object_key: &str, ttl_seconds: u32)
        -> Result<String, SearchError>;
}
