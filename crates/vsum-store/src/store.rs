//! Summary record persistence.

use std::str::FromStr;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::types::Json;
use sqlx::FromRow;
use tracing::{debug, info};
use vsum_models::{Chapter, Highlight, HistoryEntry, NewSummaryRecord, SummaryRecord, VideoId};

use crate::config::StoreConfig;
use crate::error::{classify_insert, StoreError, StoreResult};

const INSERT_SUMMARY: &str = r#"
    INSERT INTO video_summaries (
        video_id, index_name, video_name, title, topics, hashtags,
        summary, chapters, highlights, keywords, created_at
    ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

const SELECT_BY_VIDEO_ID: &str = r#"
    SELECT id, video_id, index_name, video_name, title, topics, hashtags,
           summary, chapters, highlights, keywords, created_at
    FROM video_summaries
    WHERE video_id = ?
    ORDER BY id
"#;

const SELECT_ENTRIES: &str = "SELECT video_id, video_name FROM video_summaries ORDER BY id";

/// Row shape of `video_summaries`; JSON columns decode into their typed form.
#[derive(Debug, FromRow)]
struct SummaryRow {
    id: i64,
    video_id: String,
    index_name: String,
    video_name: String,
    title: String,
    topics: Json<Vec<String>>,
    hashtags: Json<Vec<String>>,
    summary: String,
    chapters: Json<Vec<Chapter>>,
    highlights: Json<Vec<Highlight>>,
    keywords: Json<String>,
    created_at: DateTime<Utc>,
}

impl From<SummaryRow> for SummaryRecord {
    fn from(row: SummaryRow) -> Self {
        Self {
            id: row.id,
            video_id: VideoId::from_string(row.video_id),
            index_name: row.index_name,
            video_name: row.video_name,
            title: row.title,
            topics: row.topics.0,
            hashtags: row.hashtags.0,
            summary: row.summary,
            chapters: row.chapters.0,
            highlights: row.highlights.0,
            keywords: row.keywords.0,
            created_at: row.created_at,
        }
    }
}

/// SQLite-backed store of summary records.
#[derive(Clone)]
pub struct SummaryStore {
    pool: SqlitePool,
}

impl SummaryStore {
    /// Wrap an existing pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a pool for the given configuration and apply migrations.
    pub async fn connect(config: &StoreConfig) -> StoreResult<Self> {
        let start = Instant::now();

        let options = SqliteConnectOptions::from_str(&config.database_url)
            .map_err(|e| StoreError::config(format!("{}: {}", config.database_url, e)))?
            .create_if_missing(config.create_if_missing);

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout);

        // Every connection to `:memory:` opens its own database, so the pool
        // must hold exactly one connection for its whole lifetime.
        if config.is_in_memory() {
            pool_options = pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>);
        }

        let pool = pool_options.connect_with(options).await?;
        let store = Self::new(pool);
        store.migrate().await?;

        info!(
            subsystem = "database",
            op = "established",
            max_connections = config.max_connections,
            duration_ms = start.elapsed().as_millis() as u64,
            "Summary store ready"
        );
        Ok(store)
    }

    /// Connect using environment configuration.
    pub async fn from_env() -> StoreResult<Self> {
        Self::connect(&StoreConfig::from_env()).await
    }

    /// Open a private in-memory store (used by tests).
    pub async fn in_memory() -> StoreResult<Self> {
        Self::connect(&StoreConfig::default().with_database_url("sqlite::memory:")).await
    }

    /// Run pending migrations.
    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Check that the database answers queries.
    pub async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Insert a record in a single transaction, returning its row id.
    ///
    /// A second record for the same `video_id` is rejected with
    /// [`StoreError::AlreadyExists`].
    pub async fn insert(&self, record: &NewSummaryRecord) -> StoreResult<i64> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(INSERT_SUMMARY)
            .bind(record.video_id.as_str())
            .bind(&record.index_name)
            .bind(&record.video_name)
            .bind(&record.title)
            .bind(Json(&record.topics))
            .bind(Json(&record.hashtags))
            .bind(&record.summary)
            .bind(Json(&record.chapters))
            .bind(Json(&record.highlights))
            .bind(Json(&record.keywords))
            .bind(Utc::now())
            .execute(&mut *tx)
            .await
            .map_err(|e| classify_insert(e, record.video_id.as_str()))?;

        tx.commit().await?;

        let id = result.last_insert_rowid();
        debug!(record_id = id, video_id = %record.video_id, "Inserted summary record");
        Ok(id)
    }

    /// All records for a video id, oldest first. Empty when none exist.
    pub async fn find_by_video_id(&self, video_id: &VideoId) -> StoreResult<Vec<SummaryRecord>> {
        let rows: Vec<SummaryRow> = sqlx::query_as(SELECT_BY_VIDEO_ID)
            .bind(video_id.as_str())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(SummaryRecord::from).collect())
    }

    /// Video id and name of every record, in insertion order.
    pub async fn list_entries(&self) -> StoreResult<Vec<HistoryEntry>> {
        let rows: Vec<(String, String)> = sqlx::query_as(SELECT_ENTRIES)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(video_id, video_name)| HistoryEntry {
                video_id: VideoId::from_string(video_id),
                video_name,
            })
            .collect())
    }

    /// Number of stored records.
    pub async fn count(&self) -> StoreResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM video_summaries")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
