use crate::config::GenerationConfig;
use anyhow::Result;
use log::{debug, info};
use sqlite::{Connection, State};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct Database {
    connection: Arc<Mutex<Connection>>,
}

impl Database {
    pub async fn new(database_path: &str) -> Result<Self> {
        let connection = sqlite::open(database_path)?;
        let db = Database {
            connection: Arc::new(Mutex::new(connection)),
        };

        db.init_tables().await?;
        info!("Database initialized at: {}", database_path);
        Ok(db)
    }

    async fn init_tables(&self) -> Result<()> {
        let conn = self.connection.lock().await;

        // Message corpus
        conn.execute(
            "CREATE TABLE IF NOT EXISTS corpus_messages (
                sequence_id INTEGER PRIMARY KEY AUTOINCREMENT,
                message_id TEXT NOT NULL UNIQUE,
                channel_id TEXT NOT NULL,
                guild_id TEXT,
                content TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )",
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_corpus_channel
             ON corpus_messages(channel_id, sequence_id)",
        )?;

        // Generator settings, one row per guild (or DM channel)
        conn.execute(
            "CREATE TABLE IF NOT EXISTS generator_settings (
                scope_id TEXT PRIMARY KEY,
                enabled BOOLEAN NOT NULL DEFAULT 1,
                temperature REAL NOT NULL,
                max_words INTEGER NOT NULL,
                trigger_probability REAL NOT NULL,
                continuation_probability REAL NOT NULL,
                strict_tokens BOOLEAN NOT NULL DEFAULT 0,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )",
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS usage_stats (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                command TEXT NOT NULL,
                timestamp DATETIME DEFAULT CURRENT_TIMESTAMP
            )",
        )?;

        Ok(())
    }

    // Corpus Methods

    /// Store a message in a channel's corpus. Returns false when the message
    /// id was already recorded.
    pub async fn append_message(
        &self,
        channel_id: &str,
        message_id: &str,
        content: &str,
        guild_id: Option<&str>,
    ) -> Result<bool> {
        let conn = self.connection.lock().await;
        let mut statement = conn.prepare(
            "INSERT OR IGNORE INTO corpus_messages (message_id, channel_id, guild_id, content)
             VALUES (?, ?, ?, ?)",
        )?;
        statement.bind((1, message_id))?;
        statement.bind((2, channel_id))?;
        statement.bind((3, guild_id.unwrap_or("")))?;
        statement.bind((4, content))?;
        statement.next()?;

        let inserted = conn.change_count() > 0;
        if !inserted {
            debug!("Message {} already cached for channel {}", message_id, channel_id);
        }
        Ok(inserted)
    }

    /// All stored texts for a channel in insertion order.
    pub async fn list_messages(&self, channel_id: &str) -> Result<Vec<String>> {
        let conn = self.connection.lock().await;
        let mut statement = conn.prepare(
            "SELECT content FROM corpus_messages
             WHERE channel_id = ?
             ORDER BY sequence_id ASC",
        )?;
        statement.bind((1, channel_id))?;

        let mut messages = Vec::new();
        while let Ok(State::Row) = statement.next() {
            messages.push(statement.read::<String, _>("content")?);
        }
        Ok(messages)
    }

    /// Newest platform message id stored for a channel, by snowflake value.
    pub async fn latest_message_id(&self, channel_id: &str) -> Result<Option<String>> {
        let conn = self.connection.lock().await;
        let mut statement = conn.prepare(
            "SELECT message_id FROM corpus_messages
             WHERE channel_id = ?
             ORDER BY CAST(message_id AS INTEGER) DESC
             LIMIT 1",
        )?;
        statement.bind((1, channel_id))?;

        if let Ok(State::Row) = statement.next() {
            Ok(Some(statement.read::<String, _>("message_id")?))
        } else {
            Ok(None)
        }
    }

    pub async fn corpus_size(&self, channel_id: &str) -> Result<i64> {
        let conn = self.connection.lock().await;
        let mut statement = conn.prepare(
            "SELECT COUNT(*) AS total FROM corpus_messages WHERE channel_id = ?",
        )?;
        statement.bind((1, channel_id))?;

        if let Ok(State::Row) = statement.next() {
            Ok(statement.read::<i64, _>("total")?)
        } else {
            Ok(0)
        }
    }

    /// Delete a channel's whole corpus. Returns the number of removed messages.
    pub async fn purge_corpus(&self, channel_id: &str) -> Result<usize> {
        let conn = self.connection.lock().await;
        let mut statement = conn.prepare("DELETE FROM corpus_messages WHERE channel_id = ?")?;
        statement.bind((1, channel_id))?;
        statement.next()?;

        let removed = conn.change_count();
        info!("Purged {} cached message(s) for channel {}", removed, channel_id);
        Ok(removed)
    }

    // Generator Settings Methods

    pub async fn get_generation_config(&self, scope_id: &str) -> Result<Option<GenerationConfig>> {
        let conn = self.connection.lock().await;
        let mut statement = conn.prepare(
            "SELECT enabled, temperature, max_words, trigger_probability,
                    continuation_probability, strict_tokens
             FROM generator_settings WHERE scope_id = ?",
        )?;
        statement.bind((1, scope_id))?;

        if let Ok(State::Row) = statement.next() {
            Ok(Some(GenerationConfig {
                enabled: statement.read::<i64, _>("enabled")? == 1,
                temperature: statement.read::<f64, _>("temperature")?,
                max_words: statement.read::<i64, _>("max_words")?.max(0) as usize,
                trigger_probability: statement.read::<f64, _>("trigger_probability")?,
                continuation_probability: statement.read::<f64, _>("continuation_probability")?,
                strict_tokens: statement.read::<i64, _>("strict_tokens")? == 1,
            }))
        } else {
            Ok(None)
        }
    }

    pub async fn set_generation_config(&self, scope_id: &str, config: &GenerationConfig) -> Result<()> {
        let conn = self.connection.lock().await;
        let mut statement = conn.prepare(
            "INSERT OR REPLACE INTO generator_settings
                (scope_id, enabled, temperature, max_words, trigger_probability,
                 continuation_probability, strict_tokens, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, CURRENT_TIMESTAMP)",
        )?;
        statement.bind((1, scope_id))?;
        statement.bind((2, if config.enabled { 1i64 } else { 0i64 }))?;
        statement.bind((3, config.temperature))?;
        statement.bind((4, config.max_words as i64))?;
        statement.bind((5, config.trigger_probability))?;
        statement.bind((6, config.continuation_probability))?;
        statement.bind((7, if config.strict_tokens { 1i64 } else { 0i64 }))?;
        statement.next()?;

        info!("Updated generator settings for scope {}", scope_id);
        Ok(())
    }

    /// Settings for a scope, storing the defaults on first use.
    pub async fn get_or_create_generation_config(&self, scope_id: &str) -> Result<GenerationConfig> {
        if let Some(config) = self.get_generation_config(scope_id).await? {
            return Ok(config);
        }

        let config = GenerationConfig::default();
        self.set_generation_config(scope_id, &config).await?;
        Ok(config)
    }

    pub async fn log_usage(&self, user_id: &str, command: &str) -> Result<()> {
        let conn = self.connection.lock().await;
        let mut statement = conn.prepare("INSERT INTO usage_stats (user_id, command) VALUES (?, ?)")?;
        statement.bind((1, user_id))?;
        statement.bind((2, command))?;
        statement.next()?;
        Ok(())
    }

    pub async fn usage_count(&self, command: &str) -> Result<i64> {
        let conn = self.connection.lock().await;
        let mut statement = conn.prepare("SELECT COUNT(*) AS total FROM usage_stats WHERE command = ?")?;
        statement.bind((1, command))?;

        if let Ok(State::Row) = statement.next() {
            Ok(statement.read::<i64, _>("total")?)
        } else {
            Ok(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_db() -> Database {
        Database::new(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_append_is_idempotent_by_message_id() {
        let db = memory_db().await;

        assert!(db.append_message("chan", "100", "the cat sat", None).await.unwrap());
        assert!(!db.append_message("chan", "100", "the cat sat", None).await.unwrap());

        assert_eq!(db.corpus_size("chan").await.unwrap(), 1);
        assert_eq!(db.list_messages("chan").await.unwrap(), vec!["the cat sat"]);
    }

    #[tokio::test]
    async fn test_list_is_scoped_and_ordered() {
        let db = memory_db().await;
        db.append_message("a", "3", "first", Some("guild")).await.unwrap();
        db.append_message("b", "4", "other channel", Some("guild")).await.unwrap();
        db.append_message("a", "1", "second", Some("guild")).await.unwrap();

        assert_eq!(db.list_messages("a").await.unwrap(), vec!["first", "second"]);
        assert_eq!(db.list_messages("b").await.unwrap(), vec!["other channel"]);
        assert!(db.list_messages("missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_latest_message_id_uses_numeric_order() {
        let db = memory_db().await;
        assert_eq!(db.latest_message_id("chan").await.unwrap(), None);

        db.append_message("chan", "900", "a", None).await.unwrap();
        db.append_message("chan", "1000", "b", None).await.unwrap();
        db.append_message("chan", "950", "c", None).await.unwrap();

        assert_eq!(db.latest_message_id("chan").await.unwrap(), Some("1000".to_string()));
    }

    #[tokio::test]
    async fn test_purge_only_touches_one_channel() {
        let db = memory_db().await;
        db.append_message("a", "1", "x y z", None).await.unwrap();
        db.append_message("a", "2", "x y w", None).await.unwrap();
        db.append_message("b", "3", "x y q", None).await.unwrap();

        assert_eq!(db.purge_corpus("a").await.unwrap(), 2);
        assert_eq!(db.corpus_size("a").await.unwrap(), 0);
        assert_eq!(db.corpus_size("b").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_generation_config_defaults_then_overwrite() {
        let db = memory_db().await;
        assert!(db.get_generation_config("guild").await.unwrap().is_none());

        let created = db.get_or_create_generation_config("guild").await.unwrap();
        assert_eq!(created, GenerationConfig::default());
        assert!(db.get_generation_config("guild").await.unwrap().is_some());

        let changed = GenerationConfig {
            enabled: false,
            temperature: 0.25,
            max_words: 12,
            trigger_probability: 0.5,
            continuation_probability: 0.0,
            strict_tokens: true,
        };
        db.set_generation_config("guild", &changed).await.unwrap();
        assert_eq!(db.get_or_create_generation_config("guild").await.unwrap(), changed);
    }

    #[tokio::test]
    async fn test_log_usage() {
        let db = memory_db().await;
        db.log_usage("user", "generate").await.unwrap();
        db.log_usage("user", "generate").await.unwrap();
        db.log_usage("user", "corpus").await.unwrap();
        assert_eq!(db.usage_count("generate").await.unwrap(), 2);
    }
}
