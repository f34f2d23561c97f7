//! Session store
//!
//! Persistent key-value store backing everything the browser-based original
//! kept in local storage: auth tokens, operator identity, and the last-used
//! listing filter. One SQLite table, get/set accessors, explicit clear on
//! authentication expiry. Injected into gateway and controllers by the
//! constructor; there is no ambient global state.

use sqlx::SqlitePool;
use std::path::Path;
use velo_common::{Error, Result};

const KEY_ACCESS_TOKEN: &str = "access_token";
const KEY_REFRESH_TOKEN: &str = "refresh_token";
const KEY_USERNAME: &str = "username";
const KEY_EMAIL: &str = "email";
const KEY_USER_ID: &str = "user_id";
const KEY_FILTER_CRUISE: &str = "filter_cruise";
const KEY_FILTER_DATE: &str = "filter_date";
const KEY_FILTER_PAGE: &str = "filter_page";
const KEY_RETURNING: &str = "returning_from_detail";

/// Last persisted listing filter, restored on the next visit
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SavedFilter {
    pub cruise_id: Option<i64>,
    pub date: Option<String>,
    pub page: Option<u32>,
}

/// SQLite-backed key-value session store
#[derive(Debug, Clone)]
pub struct SessionStore {
    db: SqlitePool,
}

impl SessionStore {
    /// Open (creating if needed) the store at the given path
    pub async fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Create store directory failed: {e}")))?;
        }
        let url = format!("sqlite://{}?mode=rwc", path.display());
        let db = SqlitePool::connect(&url).await?;
        Self::init(db).await
    }

    /// In-memory store for tests and one-shot runs
    pub async fn in_memory() -> Result<Self> {
        let db = SqlitePool::connect(":memory:").await?;
        Self::init(db).await
    }

    async fn init(db: SqlitePool) -> Result<Self> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS session (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
        )
        .execute(&db)
        .await?;
        Ok(Self { db })
    }

    /// Generic value getter
    async fn get<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM session WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.db)
            .await?;

        match row {
            Some((value,)) => {
                let parsed = value
                    .parse::<T>()
                    .map_err(|e| Error::Config(format!("Parse stored {key} failed: {e}")))?;
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }

    /// Generic value setter (UPSERT)
    async fn set<T>(&self, key: &str, value: T) -> Result<()>
    where
        T: std::fmt::Display,
    {
        sqlx::query(
            "INSERT INTO session (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(value.to_string())
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM session WHERE key = ?")
            .bind(key)
            .execute(&self.db)
            .await?;
        Ok(())
    }

    /// Drop every stored value. Called when a token refresh fails.
    pub async fn clear(&self) -> Result<()> {
        sqlx::query("DELETE FROM session").execute(&self.db).await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Auth tokens and identity
    // ------------------------------------------------------------------

    pub async fn access_token(&self) -> Result<Option<String>> {
        self.get(KEY_ACCESS_TOKEN).await
    }

    pub async fn refresh_token(&self) -> Result<Option<String>> {
        self.get(KEY_REFRESH_TOKEN).await
    }

    pub async fn set_access_token(&self, token: &str) -> Result<()> {
        self.set(KEY_ACCESS_TOKEN, token).await
    }

    pub async fn set_tokens(&self, access: &str, refresh: &str) -> Result<()> {
        self.set(KEY_ACCESS_TOKEN, access).await?;
        self.set(KEY_REFRESH_TOKEN, refresh).await
    }

    pub async fn set_identity(&self, username: &str, email: &str, user_id: i64) -> Result<()> {
        self.set(KEY_USERNAME, username).await?;
        self.set(KEY_EMAIL, email).await?;
        self.set(KEY_USER_ID, user_id).await
    }

    pub async fn username(&self) -> Result<Option<String>> {
        self.get(KEY_USERNAME).await
    }

    pub async fn user_id(&self) -> Result<Option<i64>> {
        self.get(KEY_USER_ID).await
    }

    // ------------------------------------------------------------------
    // Listing filter persistence
    // ------------------------------------------------------------------

    pub async fn saved_filter(&self) -> Result<SavedFilter> {
        Ok(SavedFilter {
            cruise_id: self.get(KEY_FILTER_CRUISE).await?,
            date: self.get(KEY_FILTER_DATE).await?,
            page: self.get(KEY_FILTER_PAGE).await?,
        })
    }

    pub async fn save_filter(&self, cruise_id: i64, date: &str) -> Result<()> {
        self.set(KEY_FILTER_CRUISE, cruise_id).await?;
        self.set(KEY_FILTER_DATE, date).await
    }

    pub async fn save_page(&self, page: u32) -> Result<()> {
        self.set(KEY_FILTER_PAGE, page).await
    }

    /// Back-navigation flag: set when opening a detail, consumed (cleared)
    /// by the listing to trigger one auto-refetch
    pub async fn set_returning_from_detail(&self) -> Result<()> {
        self.set(KEY_RETURNING, true).await
    }

    pub async fn take_returning_from_detail(&self) -> Result<bool> {
        let flag = self.get::<bool>(KEY_RETURNING).await?.unwrap_or(false);
        if flag {
            self.delete(KEY_RETURNING).await?;
        }
        Ok(flag)
    }
}
