use crate::traits::{LabelDetector, ObjectMetadata};
use crate::{IngestError, ObjectEvent, SearchDocument};
use tracing::debug;

/// Builds the canonical index document for one stored photo: detected labels
/// first, caller-supplied custom labels after, in source order. Duplicates
/// between the two sources are kept; the index scores relevance rather than
/// treating labels as a set.
pub async fn assemble<D, M>(
    detector: &D,
    metadata: &M,
    event: &ObjectEvent,
) -> Result<SearchDocument, IngestError>
where
    D: LabelDetector + Send + Sync,
    M: ObjectMetadata + Send + Sync,
{
    let detected = detector
        .detect_labels(&event.bucket, &event.object_key)
        .await?;
    let custom = metadata
        .custom_labels(&event.bucket, &event.object_key)
        .await?;

    debug!(
        bucket = %event.bucket,
        object_key = %event.object_key,
        detected = detected.len(),
        custom = custom.len(),
        "assembled labels"
    );

    let mut labels = detected;
    labels.extend(custom);

    Ok(SearchDocument {
        object_key: event.object_key.clone(),
        bucket: event.bucket.clone(),
        created_timestamp: event.event_time.clone(),
        labels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FakeDetector {
        labels: Vec<String>,
        fail: bool,
    }

    struct FakeMetadata {
        labels: Vec<String>,
    }

    #[async_trait]
    impl LabelDetector for FakeDetector {
        async fn detect_labels(
            &self,
            _bucket: &str,
            _object_key: &str,
        ) -> Result<Vec<String>, IngestError> {
            if self.fail {
                return Err(IngestError::Backend {
                    service: "detector".to_string(),
                    details: "503 Service Unavailable".to_string(),
                });
            }
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
            Ok(self.labels.clone())
        }
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    fn dog_event() -> ObjectEvent {
        ObjectEvent {
            bucket: "b2-photos".to_string(),
            object_key: "dog_image.jpg".to_string(),
            event_time: "2023-11-05T12:40:02".to_string(),
        }
    }

    #[tokio::test]
    async fn detected_labels_come_before_custom_labels() {
        let detector = FakeDetector {
            labels: strings(&["Dog", "Animal"]),
            fail: false,
        };
        let metadata = FakeMetadata {
            labels: strings(&["Pet", "Cute"]),
        };

        let document = assemble(&detector, &metadata, &dog_event())
            .await
            .expect("assembles");

        assert_eq!(document.object_key, "dog_image.jpg");
        assert_eq!(document.bucket, "b2-photos");
        assert_eq!(document.created_timestamp, "2023-11-05T12:40:02");
        assert_eq!(document.labels, strings(&["Dog", "Animal", "Pet", "Cute"]));
    }

    #[tokio::test]
    async fn duplicate_labels_across_sources_are_kept() {
        let detector = FakeDetector {
            labels: strings(&["Dog"]),
            fail: false,
        };
        let metadata = FakeMetadata {
            labels: strings(&["Dog", "Pet"]),
        };

        let document = assemble(&detector, &metadata, &dog_event())
            .await
            .expect("assembles");
        assert_eq!(document.labels, strings(&["Dog", "Dog", "Pet"]));
    }

    #[tokio::test]
    async fn missing_metadata_contributes_no_labels() {
        let detector = FakeDetector {
            labels: strings(&["Dog"]),
            fail: false,
        };
        let metadata = FakeMetadata { labels: Vec::new() };

        let document = assemble(&detector, &metadata, &dog_event())
            .await
            .expect("assembles");
        assert_eq!(document.labels, strings(&["Dog"]));
    }

    #[tokio::test]
    async fn detector_failure_propagates() {
        let detector = FakeDetector {
            labels: Vec::new(),
            fail: true,
        };
        let metadata = FakeMetadata { labels: Vec::new() };

        let error = assemble(&detector, &metadata, &dog_event())
            .await
            .unwrap_err();
        assert!(matches!(error, IngestError::Backend { .. }));
    }
}
