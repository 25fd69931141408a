pub mod assembler;
pub mod clients;
pub mod error;
pub mod extractor;
pub mod ingest;
pub mod models;
pub mod query;
pub mod signer;
pub mod traits;

pub use assembler::assemble;
pub use clients::{HttpLabelDetector, HttpObjectStore, HttpSlotFiller, OpenSearchStore};
pub use error::{IngestError, SearchError};
pub use extractor::extract_keywords;
pub use ingest::handle_object_event;
pub use models::{
    IngestReceipt, ObjectEvent, QueryOptions, ResultGroup, ResultScope, ScoreStrategy,
    SearchDocument, SearchHit, DEFAULT_SEARCH_LIMIT, DEFAULT_URL_TTL_SECONDS, DETECT_MAX_LABELS,
    DETECT_MIN_CONFIDENCE,
};
pub use query::{cors_headers, dedup_by_object_key, handle_query, response_body, QueryOutcome};
pub use signer::QueryStringSigner;
pub use traits::{LabelDetector, ObjectMetadata, PhotoIndex, SlotFiller, UrlSigner};
