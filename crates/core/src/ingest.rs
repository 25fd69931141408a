use crate::assembler::assemble;
use crate::traits::{LabelDetector, ObjectMetadata, PhotoIndex};
use crate::{IngestError, IngestReceipt, ObjectEvent};
use tracing::info;

/// Drives one "object created" event end to end: validate, assemble the
/// canonical document, upsert it into the index. Failures propagate
/// unmodified so the invoking trigger's retry policy governs; nothing is
/// retried or swallowed here.
pub async fn handle_object_event<D, M, I>(
    detector: &D,
    metadata: &M,
    index: &I,
    event: &ObjectEvent,
) -> Result<IngestReceipt, IngestError>
where
    D: LabelDetector + Send + Sync,
    M: ObjectMetadata + Send + Sync,
    I: PhotoIndex + Send + Sync,
{
    event.validate()?;

    let document = assemble(detector, metadata, event).await?;

    index
        .write_document(&document)
        .await
        .map_err(|error| IngestError::Backend {
            service: "search index".to_string(),
            details: error.to_string(),
        })?;

    let receipt = IngestReceipt {
        document_id: document.document_id(),
        label_count: document.labels.len(),
    };

    info!(
        document_id = %receipt.document_id,
        label_count = receipt.label_count,
        "indexed photo document"
    );

    Ok(receipt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SearchDocument, SearchError, SearchHit};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct FakeDetector {
        labels: Vec<String>,
    }

    struct FakeMetadata;

    #[derive(Default)]
    struct FakeIndex {
        documents: Mutex<HashMap<String, SearchDocument>>,
        fail: bool,
    }

    #[async_trait]
    impl LabelDetector for FakeDetector {
        async fn detect_labels(
            &self,
            _bucket: &str,
            _object_key: &str,
        ) -> Result<Vec<String>, IngestError> {
            Ok(self.labels.clone())
        }
    }

    #[async_trait]
    impl ObjectMetadata for FakeMetadata {
        async fn custom_labels(
            &self,
            _bucket: &str,
            _object_key: &str,
        ) -> Result<Vec<String>, IngestError> {
            Ok(Vec::new())
        }
    }

    #[async_trait]
    impl PhotoIndex for FakeIndex {
        async fn write_document(&self, document: &SearchDocument) -> Result<(), SearchError> {
            if self.fail {
                return Err(SearchError::BackendResponse {
                    backend: "opensearch".to_string(),
                    details: "502 Bad Gateway".to_string(),
                });
            }
            self.documents
                .lock()
                .expect("lock")
                .insert(document.document_id(), document.clone());
            Ok(())
        }

        async fn search(
            &self,
            _keyword: &str,
            _limit: usize,
        ) -> Result<Vec<SearchHit>, SearchError> {
            Ok(Vec::new())
        }
    }

    fn dog_event() -> ObjectEvent {
        ObjectEvent {
            bucket: "b2-photos".to_string(),
            object_key: "dog_image.jpg".to_string(),
            event_time: "2023-11-05T12:40:02".to_string(),
        }
    }

    #[tokio::test]
    async fn ingesting_the_same_event_twice_keeps_one_document() {
        let detector = FakeDetector {
            labels: vec!["Dog".to_string()],
        };
        let index = FakeIndex::default();
        let event = dog_event();

        let first = handle_object_event(&detector, &FakeMetadata, &index, &event)
            .await
            .expect("first ingest");
        let second = handle_object_event(&detector, &FakeMetadata, &index, &event)
            .await
            .expect("second ingest");

        assert_eq!(first.document_id, second.document_id);
        assert_eq!(index.documents.lock().expect("lock").len(), 1);
    }

    #[tokio::test]
    async fn malformed_event_never_reaches_the_index() {
        let detector = FakeDetector { labels: Vec::new() };
        let index = FakeIndex::default();
        let event = ObjectEvent {
            bucket: String::new(),
            object_key: "a.jpg".to_string(),
            event_time: "2023-11-05T12:40:02".to_string(),
        };

        let error = handle_object_event(&detector, &FakeMetadata, &index, &event)
            .await
            .unwrap_err();

        assert!(matches!(error, IngestError::MalformedEvent(_)));
        assert!(index.documents.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn index_failure_propagates_as_backend_error() {
        let detector = FakeDetector {
            labels: vec!["Dog".to_string()],
        };
        let index = FakeIndex {
            fail: true,
            ..FakeIndex::default()
        };

        let error = handle_object_event(&detector, &FakeMetadata, &index, &dog_event())
            .await
            .unwrap_err();
        assert!(matches!(error, IngestError::Backend { .. }));
    }
}
