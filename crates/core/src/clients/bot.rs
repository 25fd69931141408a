use crate::traits::SlotFiller;
use crate::SearchError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

/// Client for the slot-filling bot. One bot identity and alias serve every
/// request; the session id varies per call so conversational state is never
/// shared between callers.
pub struct HttpSlotFiller {
    client: Client,
    endpoint: String,
    bot_name: String,
    bot_alias: String,
}

impl HttpSlotFiller {
    pub fn new(
        endpoint: impl Into<String>,
        bot_name: impl Into<String>,
        bot_alias: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            bot_name: bot_name.into(),
            bot_alias: bot_alias.into(),
        }
    }
}

#[async_trait]
impl SlotFiller for HttpSlotFiller {
    async fn fill_slots(&self, text: &str, session_id: &str) -> Result<Vec<String>, SearchError> {
        let response = self
            .client
            .post(format!(
                "{}/bot/{}/alias/{}/text",
                self.endpoint, self.bot_name, self.bot_alias
            ))
            .json(&json!({
                "inputText": text,
                "sessionId": session_id
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SearchError::BackendResponse {
                backend: "slot bot".to_string(),
                details: response.status().to_string(),
            });
        }

        let body: Value = response.json().await?;
        Ok(collect_slot_values(&body))
    }
}

/// Non-absent slot values in the slot map's order. A missing or null `slots`
/// field means the bot recognized nothing, which is a valid empty outcome.
fn collect_slot_values(body: &Value) -> Vec<String> {
    body.pointer("/slots")
        .and_then(Value::as_object)
        .map(|slots| {
            slots
                .values()
                .filter_map(Value::as_str)
                .map(|value| value.to_string())
                .collect()
        })
        .unwrap_or_default()
}
