pub mod bot;
pub mod detector;
pub mod opensearch;
pub mod storage;

pub use bot::HttpSlotFiller;
pub use detector::HttpLabelDetector;
pub use opensearch::OpenSearchStore;
pub use storage::{HttpObjectStore, CUSTOM_LABELS_HEADER};
