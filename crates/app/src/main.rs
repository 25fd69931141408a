use chrono::Utc;
use clap::{Parser, Subcommand};
use photo_search_core::{
    cors_headers, handle_object_event, handle_query, response_body, HttpLabelDetector,
    HttpObjectStore, HttpSlotFiller, ObjectEvent, OpenSearchStore, QueryOptions,
    QueryStringSigner, ResultScope, ScoreStrategy, DEFAULT_SEARCH_LIMIT, DEFAULT_URL_TTL_SECONDS,
};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "photo-search", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// OpenSearch base URL
    #[arg(long, default_value = "http://localhost:9200")]
    opensearch_url: String,

    /// OpenSearch index name
    #[arg(long, default_value = "photos")]
    opensearch_index: String,

    /// Label detection service base URL
    #[arg(long, default_value = "http://localhost:8081")]
    detector_url: String,

    /// Photo store base URL (metadata reads)
    #[arg(long, default_value = "http://localhost:8082")]
    storage_url: String,

    /// Slot-filling bot base URL
    #[arg(long, default_value = "http://localhost:8083")]
    bot_url: String,

    /// Bot identity
    #[arg(long, default_value = "photo_album")]
    bot_name: String,

    /// Bot alias
    #[arg(long, default_value = "test")]
    bot_alias: String,

    /// Public base URL embedded in issued download locators
    #[arg(long, default_value = "http://localhost:8082")]
    media_url: String,

    /// Signing key id
    #[arg(long, env = "PHOTO_SEARCH_KEY_ID", default_value = "local-dev")]
    signing_key_id: String,

    /// Signing secret
    #[arg(long, env = "PHOTO_SEARCH_SECRET", default_value = "insecure-dev-secret")]
    signing_secret: String,

    /// Pin the randomized tie-break for reproducible runs
    #[arg(long)]
    score_seed: Option<i64>,

    /// Rank purely by relevance instead of randomizing ties
    #[arg(long, default_value_t = false)]
    relevance_only: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Ingest one "object created" event: detect labels, merge metadata
    /// labels, upsert the document into the index.
    Ingest {
        /// Bucket holding the new photo.
        #[arg(long, required_unless_present = "notification")]
        bucket: Option<String>,
        /// Object key of the new photo.
        #[arg(long, required_unless_present = "notification")]
        object_key: Option<String>,
        /// Event timestamp (ISO-8601).
        #[arg(long, required_unless_present = "notification")]
        event_time: Option<String>,
        /// Raw S3-style notification JSON; overrides the field flags.
        #[arg(long)]
        notification: Option<String>,
    },
    /// Resolve a free-text query to signed download URLs.
    Query {
        /// Free-text query, e.g. "show me birds".
        #[arg(long)]
        q: String,
        /// Hits requested per keyword.
        #[arg(long, default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: usize,
        /// Locator lifetime in seconds.
        #[arg(long, default_value_t = DEFAULT_URL_TTL_SECONDS)]
        ttl: u32,
        /// Return only the first keyword's group (the historical contract).
        #[arg(long, default_value_t = false)]
        first_group_only: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_version = env!("CARGO_PKG_VERSION");

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();

    let strategy = if cli.relevance_only {
        ScoreStrategy::Relevance
    } else {
        ScoreStrategy::Randomized {
            seed: cli.score_seed,
        }
    };

    // Long-lived clients, constructed once and reused by every invocation.
    let index = OpenSearchStore::new(&cli.opensearch_url, &cli.opensearch_index, strategy);
    let detector = HttpLabelDetector::new(&cli.detector_url);
    let storage = HttpObjectStore::new(&cli.storage_url);
    let bot = HttpSlotFiller::new(&cli.bot_url, &cli.bot_name, &cli.bot_alias);
    let signer = QueryStringSigner::new(&cli.media_url, &cli.signing_key_id, &cli.signing_secret);

    info!(
        version = app_version,
        started_at = %Utc::now().to_rfc3339(),
        "photo-search boot"
    );

    match cli.command {
        Command::Ingest {
            bucket,
            object_key,
            event_time,
            notification,
        } => {
            let event = match notification {
                Some(raw) => {
                    let parsed: serde_json::Value = serde_json::from_str(&raw)?;
                    ObjectEvent::from_notification(&parsed)
                        .map_err(|error| anyhow::anyhow!(error.to_string()))?
                }
                None => ObjectEvent {
                    bucket: bucket.unwrap_or_default(),
                    object_key: object_key.unwrap_or_default(),
                    event_time: event_time.unwrap_or_default(),
                },
            };

            index
                .ensure_index()
                .await
                .map_err(|error| anyhow::anyhow!(error.to_string()))?;

            let receipt = handle_object_event(&detector, &storage, &index, &event)
                .await
                .map_err(|error| anyhow::anyhow!(error.to_string()))?;

            println!(
                "indexed {} with {} label(s) at {}",
                receipt.document_id,
                receipt.label_count,
                Utc::now().to_rfc3339()
            );
        }
        Command::Query {
            q,
            limit,
            ttl,
            first_group_only,
        } => {
            let scope = if first_group_only {
                ResultScope::FirstGroupOnly
            } else {
                ResultScope::AllGroups
            };
            let options = QueryOptions {
                limit,
                ttl_seconds: ttl,
                scope,
            };

            let outcome = handle_query(&bot, &index, &signer, &q, options)
                .await
                .map_err(|error| anyhow::anyhow!(error.to_string()))?;

            info!(
                keyword_count = outcome.keywords.len(),
                group_count = outcome.groups.len(),
                "query resolved"
            );

            for (name, value) in cors_headers() {
                println!("{name}: {value}");
            }
            println!("{}", response_body(&outcome, scope));
        }
    }

    Ok(())
}
