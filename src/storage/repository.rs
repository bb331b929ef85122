use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use sqlx::{Row, SqlitePool};
use tokio::sync::broadcast;

use super::MIGRATION_001_INITIAL;

/// The two flat key-value namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Area {
    /// Insured list and statutory parameters.
    Local,
    /// The current report identifier.
    Session,
}

impl Area {
    pub fn as_str(&self) -> &'static str {
        match self {
            Area::Local => "local",
            Area::Session => "session",
        }
    }
}

/// One change notification: which key of which namespace was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageChange {
    pub area: Area,
    pub key: String,
}

/// Repository over the flat key-value layout. Values are stored as JSON;
/// every write is announced on a broadcast channel so controllers can
/// refresh reactively.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
    changes: broadcast::Sender<StorageChange>,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        let (changes, _) = broadcast::channel(64);
        Self { pool, changes }
    }

    /// Connect to a SQLite database at the given path.
    /// Creates the database file if it doesn't exist.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    /// Subscribe to write notifications. Dropping the receiver is the
    /// unsubscribe.
    pub fn subscribe(&self) -> broadcast::Receiver<StorageChange> {
        self.changes.subscribe()
    }

    /// Read one key of a namespace.
    pub async fn get_item<T: DeserializeOwned>(&self, area: Area, key: &str) -> Result<Option<T>> {
        let row = sqlx::query("SELECT value FROM kv_entries WHERE area = ? AND key = ?")
            .bind(area.as_str())
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch entry")?;

        match row {
            Some(row) => {
                let raw: String = row.get("value");
                let value = serde_json::from_str(&raw)
                    .with_context(|| format!("Malformed value under '{key}'"))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Write one key of a namespace and announce the change.
    pub async fn set_item<T: Serialize>(&self, area: Area, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value).context("Failed to serialize value")?;
        sqlx::query(
            "INSERT INTO kv_entries (area, key, value) VALUES (?, ?, ?)
             ON CONFLICT (area, key) DO UPDATE SET value = excluded.value",
        )
        .bind(area.as_str())
        .bind(key)
        .bind(raw)
        .execute(&self.pool)
        .await
        .context("Failed to save entry")?;

        let _ = self.changes.send(StorageChange {
            area,
            key: key.to_string(),
        });
        Ok(())
    }

    /// Read a whole namespace as one record: the stored keys overlaid on the
    /// given defaults, so partially-populated storage still deserializes.
    pub async fn load_area<T>(&self, area: Area, defaults: &T) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
    {
        let rows = sqlx::query("SELECT key, value FROM kv_entries WHERE area = ?")
            .bind(area.as_str())
            .fetch_all(&self.pool)
            .await
            .context("Failed to list entries")?;

        let mut record = match serde_json::to_value(defaults).context("Bad defaults")? {
            Value::Object(map) => map,
            _ => anyhow::bail!("Defaults must serialize to a flat record"),
        };
        for row in &rows {
            let key: String = row.get("key");
            let raw: String = row.get("value");
            let value = serde_json::from_str(&raw)
                .with_context(|| format!("Malformed value under '{key}'"))?;
            record.insert(key, value);
        }

        serde_json::from_value(Value::Object(record)).context("Failed to assemble record")
    }

    /// Store a whole record, one key per field, announcing each write.
    pub async fn store_area<T: Serialize>(&self, area: Area, record: &T) -> Result<()> {
        let Value::Object(map) = serde_json::to_value(record).context("Bad record")? else {
            anyhow::bail!("Record must serialize to a flat record");
        };
        for (key, value) in map {
            self.set_item(area, &key, &value).await?;
        }
        Ok(())
    }

    /// First-run bootstrap: write the defaults for every key the namespace
    /// does not hold yet. Existing values always win.
    pub async fn init_defaults<T: Serialize>(&self, area: Area, defaults: &T) -> Result<()> {
        let Value::Object(map) = serde_json::to_value(defaults).context("Bad defaults")? else {
            anyhow::bail!("Defaults must serialize to a flat record");
        };
        for (key, value) in map {
            let existing: Option<Value> = self.get_item(area, &key).await?;
            if existing.is_none() {
                self.set_item(area, &key, &value).await?;
            }
        }
        Ok(())
    }
}
