use crate::traits::ObjectMetadata;
use crate::IngestError;
use async_trait::async_trait;
use reqwest::Client;

/// Metadata header carrying the caller-supplied comma-separated label list.
pub const CUSTOM_LABELS_HEADER: &str = "x-amz-meta-customlabels";

/// Reads user metadata from the photo store over its HTTP head interface.
pub struct HttpObjectStore {
    client: Client,
    endpoint: String,
}

impl HttpObjectStore {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl ObjectMetadata for HttpObjectStore {
    async fn custom_labels(
        &self,
        bucket: &str,
        object_key: &str,
    ) -> Result<Vec<String>, IngestError> {
        let response = self
            .client
            .head(format!("{}/{}/{}", self.endpoint, bucket, object_key))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(IngestError::Backend {
                service: "object store".to_string(),
                details: response.status().to_string(),
            });
        }

        let header = response
            .headers()
            .get(CUSTOM_LABELS_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        Ok(split_custom_labels(header))
    }
}

/// Splits the metadata header value into labels. An absent or empty header
/// contributes zero labels; values are passed through untouched.
pub fn split_custom_labels(header: &str) -> Vec<String> {
    if header.is_empty() {
        return Vec::new();
    }
    header.split(',').map(|label| label.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::split_custom_labels;

    #[test]
    fn header_splits_on_commas_in_order() {
        assert_eq!(
            split_custom_labels("Pet,Cute"),
            vec!["Pet".to_string(), "Cute".to_string()]
        );
    }

    #[test]
    fn empty_header_contributes_no_labels() {
        assert!(split_custom_labels("").is_empty());
    }

    #[test]
    fn values_are_not_trimmed_or_deduplicated() {
        assert_eq!(
            split_custom_labels("Pet, Pet"),
            vec!["Pet".to_string(), " Pet".to_string()]
        );
    }
}
