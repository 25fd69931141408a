use crate::traits::UrlSigner;
use crate::SearchError;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{Duration, SecondsFormat, Utc};
use sha2::{Digest, Sha256};
use url::Url;

/// Issues time-bounded download locators by signing a query string over the
/// object reference and expiry. The signature binds key id, bucket, object
/// key, and expiry, so a locator grants exactly one object retrieval until
/// it lapses. Credentials never appear in the issued URL.
pub struct QueryStringSigner {
    base_url: String,
    key_id: String,
    secret: String,
}

impl QueryStringSigner {
    pub fn new(
        base_url: impl Into<String>,
        key_id: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            key_id: key_id.into(),
            secret: secret.into(),
        }
    }

    fn signature(&self, bucket: &str, object_key: &str, expires: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.secret.as_bytes());
        hasher.update(b"\n");
        hasher.update(self.key_id.as_bytes());
        hasher.update(b"\n");
        hasher.update(bucket.as_bytes());
        hasher.update(b"\n");
        hasher.update(object_key.as_bytes());
        hasher.update(b"\n");
        hasher.update(expires.as_bytes());
        URL_SAFE_NO_PAD.encode(hasher.finalize())
    }
}

impl UrlSigner for QueryStringSigner {
    fn issue(
        &self,
        bucket: &str,
        object_key: &str,
        ttl_seconds: u32,
    ) -> Result<String, SearchError> {
        let mut url = Url::parse(&self.base_url)?;

        url.path_segments_mut()
            .map_err(|_| SearchError::SignFailed {
                bucket: bucket.to_string(),
                object_key: object_key.to_string(),
                details: format!("base url cannot carry a path: {}", self.base_url),
            })?
            .pop_if_empty()
            .push(bucket)
            .extend(object_key.split('/'));

        let expires = (Utc::now() + Duration::seconds(i64::from(ttl_seconds)))
            .to_rfc3339_opts(SecondsFormat::Secs, true);
        let signature = self.signature(bucket, object_key, &expires);

        url.query_pairs_mut()
            .append_pair("X-Key-Id", &self.key_id)
            .append_pair("X-Expires", &expires)
            .append_pair("X-Signature", &signature);

        Ok(url.into())
    }
}
