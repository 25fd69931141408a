use crate::extractor::extract_keywords;
use crate::traits::{PhotoIndex, SlotFiller, UrlSigner};
use crate::{QueryOptions, ResultGroup, ResultScope, SearchError, SearchHit};
use serde_json::{json, Value};
use std::collections::HashSet;
use tracing::debug;

/// Everything one query resolved to: the extracted keywords (in bot order)
/// and one group per keyword that had at least one hit, in keyword order.
#[derive(Debug, Clone, Default)]
pub struct QueryOutcome {
    pub keywords: Vec<String>,
    pub groups: Vec<ResultGroup>,
}

/// Resolves one free-text query into per-keyword groups of signed download
/// URLs. For each keyword in extraction order: search the index, drop later
/// hits that repeat an `object_key`, sign one locator per surviving hit.
/// Keywords with no hits produce no group. Any collaborator failure
/// propagates; a signer failure aborts the remaining hits of that keyword.
pub async fn handle_query<B, I, S>(
    bot: &B,
    index: &I,
    signer: &S,
    query: &str,
    options: QueryOptions,
) -> Result<QueryOutcome, SearchError>
where
    B: SlotFiller + Send + Sync,
    I: PhotoIndex + Send + Sync,
    S: UrlSigner + Send + Sync,
{
    let keywords = extract_keywords(bot, query).await?;
    if keywords.is_empty() {
        return Ok(QueryOutcome::default());
    }

    let mut groups = Vec::new();

    for keyword in &keywords {
        let hits = index.search(keyword, options.limit).await?;
        let hits = dedup_by_object_key(hits);

        if hits.is_empty() {
            continue;
        }

        let mut urls = Vec::with_capacity(hits.len());
        for hit in &hits {
            urls.push(signer.issue(&hit.bucket, &hit.object_key, options.ttl_seconds)?);
        }

        debug!(keyword = %keyword, url_count = urls.len(), "resolved keyword group");
        groups.push(ResultGroup {
            keyword: keyword.clone(),
            urls,
        });
    }

    Ok(QueryOutcome { keywords, groups })
}

/// Keeps the first hit per `object_key`, preserving the order the index
/// returned. A bucket+key pair is object-identity-unique within one search's
/// result set, so the key alone suffices.
pub fn dedup_by_object_key(hits: Vec<SearchHit>) -> Vec<SearchHit> {
    let mut seen = HashSet::new();
    hits.into_iter()
        .filter(|hit| seen.insert(hit.object_key.clone()))
        .collect()
}

/// Renders the response contract `{"list": ...}`. Under `FirstGroupOnly`
/// the list holds the first keyword's URLs, and stays empty whenever the
/// first keyword yielded no group, even if later keywords matched. Under
/// `AllGroups` the list holds one URL array per group, in keyword order.
pub fn response_body(outcome: &QueryOutcome, scope: ResultScope) -> Value {
    match scope {
        ResultScope::FirstGroupOnly => {
            let first_keyword_urls = outcome
                .keywords
                .first()
                .and_then(|keyword| {
                    outcome
                        .groups
                        .iter()
                        .find(|group| &group.keyword == keyword)
                })
                .map(|group| group.urls.clone())
                .unwrap_or_default();
            json!({ "list": first_keyword_urls })
        }
        ResultScope::AllGroups => {
            let lists: Vec<&[String]> = outcome
                .groups
                .iter()
                .map(|group| group.urls.as_slice())
                .collect();
            json!({ "list": lists })
        }
    }
}

/// Permissive cross-origin headers, attached to every query response
/// including empty ones.
pub fn cors_headers() -> Vec<(&'static str, &'static str)> {
    vec![
        ("Access-Control-Allow-Origin", "*"),
        ("Access-Control-Allow-Credentials", "true"),
    ]
}
