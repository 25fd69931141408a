use crate::traits::LabelDetector;
use crate::{IngestError, DETECT_MAX_LABELS, DETECT_MIN_CONFIDENCE};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

/// Client for the image label detection service. The service applies the
/// label cap and confidence floor itself; this client only carries them on
/// the request.
pub struct HttpLabelDetector {
    client: Client,
    endpoint: String,
}

impl HttpLabelDetector {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl LabelDetector for HttpLabelDetector {
    async fn detect_labels(
        &self,
        bucket: &str,
        object_key: &str,
    ) -> Result<Vec<String>, IngestError> {
        let response = self
            .client
            .post(format!("{}/detect-labels", self.endpoint))
            .json(&json!({
                "image": {
                    "bucket": bucket,
                    "objectKey": object_key
                },
                "maxLabels": DETECT_MAX_LABELS,
                "minConfidence": DETECT_MIN_CONFIDENCE
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(IngestError::Backend {
                service: "label detector".to_string(),
                details: response.status().to_string(),
            });
        }

        let body: Value = response.json().await?;
        Ok(parse_labels(&body))
    }
}

/// Label names from the detector's `Labels` array; entries without a name
/// are dropped.
fn parse_labels(body: &Value) -> Vec<String> {
    body.pointer("/Labels")
        .and_then(Value::as_array)
        .map(|labels| {
            labels
                .iter()
                .filter_map(|label| label.pointer("/Name").and_then(Value::as_str))
                .map(|name| name.to_string())
                .collect()
        })
        .unwrap_or_default()
}
