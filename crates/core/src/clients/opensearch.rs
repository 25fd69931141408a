use crate::traits::PhotoIndex;
use crate::{ScoreStrategy, SearchDocument, SearchError, SearchHit};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::StatusCode;
use serde_json::{json, Value};
use url::Url;

pub struct OpenSearchStore {
    client: Client,
    endpoint: String,
    index_name: String,
    strategy: ScoreStrategy,
}

impl OpenSearchStore {
    pub fn new(
        endpoint: impl Into<String>,
        index_name: impl Into<String>,
        strategy: ScoreStrategy,
    ) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            index_name: index_name.into(),
            strategy,
        }
    }

    fn document_url(&self, document_id: &str) -> Result<Url, SearchError> {
        let mut url = Url::parse(&self.endpoint)?;
        url.path_segments_mut()
            .map_err(|_| SearchError::Request(format!("bad index endpoint: {}", self.endpoint)))?
            .pop_if_empty()
            .push(&self.index_name)
            .push("_doc")
            .push(document_id);
        Ok(url)
    }

    pub async fn ensure_index(&self) -> Result<(), SearchError> {
        let response = self
            .client
            .head(format!("{}/{}", self.endpoint, self.index_name))
            .send()
            .await?;

        if response.status() == StatusCode::OK {
            return Ok(());
        }

        if !response.status().is_client_error() {
            return Err(SearchError::BackendResponse {
                backend: "opensearch".to_string(),
                details: response.status().to_string(),
            });
        }

        let response = self
            .client
            .put(format!("{}/{}", self.endpoint, self.index_name))
            .json(&json!({
                "settings": {
                    "number_of_shards": 1,
                    "number_of_replicas": 0
                },
                "mappings": {
                    "properties": {
                        "objectKey": {"type": "keyword"},
                        "bucket": {"type": "keyword"},
                        "createdTimestamp": {"type": "keyword"},
                        "labels": {"type": "text"}
                    }
                }
            }))
            .send()
            .await?;

        if response.status().is_server_error() || response.status().is_client_error() {
            return Err(SearchError::Request(format!(
                "index setup failed with {}",
                response.status()
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl PhotoIndex for OpenSearchStore {
    async fn write_document(&self, document: &SearchDocument) -> Result<(), SearchError> {
        let url = self.document_url(&document.document_id())?;

        let response = self.client.put(url).json(document).send().await?;

        if !response.status().is_success() {
            return Err(SearchError::BackendResponse {
                backend: "opensearch".to_string(),
                details: response.status().to_string(),
            });
        }
        Ok(())
    }

    async fn search(&self, keyword: &str, limit: usize) -> Result<Vec<SearchHit>, SearchError> {
        let body = search_body(keyword, limit, self.strategy);

        let response = self
            .client
            .post(format!("{}/{}/_search", self.endpoint, self.index_name))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SearchError::BackendResponse {
                backend: "opensearch".to_string(),
                details: response.status().to_string(),
            });
        }

        let response_json: Value = response.json().await?;
        let raw_hits = response_json
            .pointer("/hits/hits")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let mut hits = Vec::with_capacity(raw_hits.len());
        for raw in raw_hits {
            let source = raw.pointer("/_source").cloned().unwrap_or(Value::Null);
            hits.push(serde_json::from_value::<SearchHit>(source)?);
        }

        Ok(hits)
    }
}

/// Relevance query over the `labels` field only. The randomized strategy
/// wraps the match in a `function_score` with `random_score` so ties among
/// equally relevant photos come back in varying order across repeated
/// queries; a seed pins the shuffle.
fn search_body(keyword: &str, limit: usize, strategy: ScoreStrategy) -> Value {
    let matcher = json!({
        "multi_match": {
            "query": keyword,
            "fields": ["labels"]
        }
    });

    match strategy {
        ScoreStrategy::Randomized { seed } => {
            let random_score = match seed {
                Some(seed) => json!({"seed": seed, "field": "_seq_no"}),
                None => json!({}),
            };
            json!({
                "size": limit,
                "query": {
                    "function_score": {
                        "query": matcher,
                        "random_score": random_score
                    }
                }
            })
        }
        ScoreStrategy::Relevance => json!({
            "size": limit,
            "query": matcher
        }),
    }
}
