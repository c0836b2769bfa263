use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};
use tracing::info;

use crate::models::{Side, TipRecord};

/// SQLite store for emitted tips.
///
/// Doubles as the idempotency store: the unique `(match_id, game_number)`
/// index guarantees a map is tipped at most once even if two workers race.
pub struct TipStore {
    pool: Pool<Sqlite>,
}

impl TipStore {
    /// Create a new tip store and initialize the database
    pub async fn new(database_url: &str) -> Result<Self> {
        // Create data directory if needed
        if let Some(path) = database_url.strip_prefix("sqlite:") {
            if let Some(parent) = std::path::Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)
                        .context("Failed to create database directory")?;
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)
            .context("Invalid database URL")?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .context("Failed to connect to database")?;

        let store = Self { pool };
        store.init_schema().await?;

        info!("Tip store initialized");
        Ok(store)
    }

    /// Initialize database schema
    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS tips (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                match_id TEXT NOT NULL,
                game_number INTEGER NOT NULL,
                league_name TEXT NOT NULL,
                team1_name TEXT NOT NULL,
                team2_name TEXT NOT NULL,
                recommended_side TEXT NOT NULL,
                expected_value_percent REAL NOT NULL,
                confidence_percent REAL NOT NULL,
                is_decider INTEGER NOT NULL,
                generated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create tips table")?;

        sqlx::query(
            r#"
            CREATE UNIQUE INDEX IF NOT EXISTS idx_tips_match_game
            ON tips (match_id, game_number)
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_tips_generated
            ON tips (generated_at)
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Has this (match, game) pair already been tipped?
    pub async fn was_tipped(&self, match_id: &str, game_number: u32) -> Result<bool> {
        let row: Option<(i64,)> = sqlx::query_as(
            r#"
            SELECT 1 FROM tips
            WHERE match_id = ? AND game_number = ?
            "#,
        )
        .bind(match_id)
        .bind(game_number as i64)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to check tip existence")?;

        Ok(row.is_some())
    }

    /// Record an emitted tip. Returns false when the (match, game) pair was
    /// already recorded; a concurrent worker won the race.
    pub async fn record_tip(&self, tip: &TipRecord) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO tips (
                match_id,
                game_number,
                league_name,
                team1_name,
                team2_name,
                recommended_side,
                expected_value_percent,
                confidence_percent,
                is_decider,
                generated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (match_id, game_number) DO NOTHING
            "#,
        )
        .bind(&tip.match_id)
        .bind(tip.game_number as i64)
        .bind(&tip.league_name)
        .bind(&tip.team1_name)
        .bind(&tip.team2_name)
        .bind(tip.recommended_side.as_str())
        .bind(tip.expected_value_percent)
        .bind(tip.confidence_percent)
        .bind(tip.is_decider as i64)
        .bind(tip.generated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to insert tip")?;

        Ok(result.rows_affected() > 0)
    }

    /// Most recent tips, newest first
    pub async fn recent_tips(&self, limit: i64) -> Result<Vec<TipRecord>> {
        let rows = sqlx::query_as::<_, TipRow>(
            r#"
            SELECT * FROM tips
            ORDER BY generated_at DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch tips")?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    /// Total number of emitted tips
    pub async fn tip_count(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tips")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count tips")?;

        Ok(row.0)
    }
}

/// Database row representation
#[derive(sqlx::FromRow)]
struct TipRow {
    id: i64,
    match_id: String,
    game_number: i64,
    league_name: String,
    team1_name: String,
    team2_name: String,
    recommended_side: String,
    expected_value_percent: f64,
    confidence_percent: f64,
    is_decider: i64,
    generated_at: String,
}

impl From<TipRow> for TipRecord {
    fn from(row: TipRow) -> Self {
        TipRecord {
            id: Some(row.id),
            match_id: row.match_id,
            game_number: row.game_number as u32,
            league_name: row.league_name,
            team1_name: row.team1_name,
            team2_name: row.team2_name,
            recommended_side: parse_side(&row.recommended_side),
            expected_value_percent: row.expected_value_percent,
            confidence_percent: row.confidence_percent,
            is_decider: row.is_decider != 0,
            generated_at: chrono::DateTime::parse_from_rfc3339(&row.generated_at)
                .map(|dt| dt.with_timezone(&chrono::Utc))
                .unwrap_or_else(|_| chrono::Utc::now()),
        }
    }
}

fn parse_side(s: &str) -> Side {
    match s {
        "team2" => Side::Team2,
        _ => Side::Team1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Side;
    use chrono::Utc;

    fn sample_tip() -> TipRecord {
        TipRecord {
            id: None,
            match_id: "48291734651".to_string(),
            game_number: 5,
            league_name: "LCK".to_string(),
            team1_name: "T1".to_string(),
            team2_name: "Gen.G".to_string(),
            recommended_side: Side::Team1,
            expected_value_percent: 7.5,
            confidence_percent: 70.0,
            is_decider: true,
            generated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn record_and_dedupe() {
        let store = TipStore::new("sqlite::memory:").await.unwrap();
        let tip = sample_tip();

        assert!(!store.was_tipped(&tip.match_id, tip.game_number).await.unwrap());
        assert!(store.record_tip(&tip).await.unwrap());
        assert!(store.was_tipped(&tip.match_id, tip.game_number).await.unwrap());

        // Second emission for the same map is a no-op
        assert!(!store.record_tip(&tip).await.unwrap());
        assert_eq!(store.tip_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn different_game_same_match_is_a_new_tip() {
        let store = TipStore::new("sqlite::memory:").await.unwrap();
        let mut tip = sample_tip();

        assert!(store.record_tip(&tip).await.unwrap());
        tip.game_number = 4;
        assert!(store.record_tip(&tip).await.unwrap());
        assert_eq!(store.tip_count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn round_trips_through_rows() {
        let store = TipStore::new("sqlite::memory:").await.unwrap();
        let tip = sample_tip();
        store.record_tip(&tip).await.unwrap();

        let tips = store.recent_tips(10).await.unwrap();
        assert_eq!(tips.len(), 1);
        assert_eq!(tips[0].match_id, tip.match_id);
        assert_eq!(tips[0].recommended_side, Side::Team1);
        assert!(tips[0].is_decider);
    }
}
