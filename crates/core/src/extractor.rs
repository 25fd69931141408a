use crate::traits::SlotFiller;
use crate::SearchError;
use tracing::debug;
use uuid::Uuid;

/// Turns one free-text query into an ordered sequence of search keywords via
/// the slot-filling bot. Each request gets a fresh session id so bot-side
/// conversational state is never shared across unrelated callers. An empty
/// sequence means the bot recognized no actionable keywords, which is a valid
/// outcome rather than an error.
pub async fn extract_keywords<B>(bot: &B, query: &str) -> Result<Vec<String>, SearchError>
where
    B: SlotFiller + Send + Sync,
{
    let session_id = Uuid::new_v4().to_string();
    let slots = bot.fill_slots(query, &session_id).await?;

    let keywords: Vec<String> = slots
        .into_iter()
        .filter(|keyword| !keyword.trim().is_empty())
        .collect();

    debug!(session_id = %session_id, keyword_count = keywords.len(), "extracted keywords");
    Ok(keywords)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakeBot {
        slots: Vec<String>,
        sessions: Mutex<Vec<String>>,
    }

    impl FakeBot {
        fn with_slots(slots: &[&str]) -> Self {
            Self {
                slots: slots.iter().map(|slot| slot.to_string()).collect(),
                sessions: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SlotFiller for FakeBot {
        async fn fill_slots(
            &self,
            _text: &str,
            session_id: &str,
        ) -> Result<Vec<String>, SearchError> {
            self.sessions
                .lock()
                .expect("lock")
                .push(session_id.to_string());
            Ok(self.slots.clone())
        }
    }

    #[tokio::test]
    async fn keywords_preserve_slot_order() {
        let bot = FakeBot::with_slots(&["cats", "dogs"]);
        let keywords = extract_keywords(&bot, "show me cats and dogs")
            .await
            .expect("extracts");
        assert_eq!(keywords, vec!["cats".to_string(), "dogs".to_string()]);
    }

    #[tokio::test]
    async fn no_filled_slots_is_an_empty_sequence_not_an_error() {
        let bot = FakeBot::with_slots(&[]);
        let keywords = extract_keywords(&bot, "hello there")
            .await
            .expect("extracts");
        assert!(keywords.is_empty());
    }

    #[tokio::test]
    async fn blank_slot_values_are_skipped() {
        let bot = FakeBot::with_slots(&["birds", "", "  "]);
        let keywords = extract_keywords(&bot, "show me birds")
            .await
            .expect("extracts");
        assert_eq!(keywords, vec!["birds".to_string()]);
    }

    #[tokio::test]
    async fn each_request_uses_a_fresh_session_id() {
        let bot = FakeBot::with_slots(&["birds"]);
        extract_keywords(&bot, "show me birds").await.expect("one");
        extract_keywords(&bot, "show me birds").await.expect("two");

        let sessions = bot.sessions.lock().expect("lock");
        assert_eq!(sessions.len(), 2);
        assert_ne!(sessions[0], sessions[1]);
    }
}
