use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Context;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::config::DatabaseConfig;
use crate::error::Result;
use crate::metrics;
use crate::models::{Message, MessageDateRange, MessageFilter, MessageRecord, Physician};
use crate::schema::{messages, physicians};
use crate::validation::InputValidator;

// Type alias for the database connection pool
pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Database manager for handling connections and operations
///
/// Constructed once at startup and handed to the API layer; connections are
/// checked out of the pool per operation and returned on drop.
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Create a new database connection pool with default pool settings
    pub fn new(database_url: &str) -> Result<Self> {
        let path = Self::database_path(database_url);

        // Create parent directory if it doesn't exist
        if let Some(parent) = Path::new(path).parent() {
            fs::create_dir_all(parent)?;
        }

        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::builder()
            .build(manager)
            .context("Failed to create database connection pool")?;

        let conn = pool.get()?;
        Self::run_migrations(&conn)?;

        Ok(Self { pool })
    }

    /// Create a pool sized and timed out per the application configuration
    pub fn from_config(config: &DatabaseConfig) -> Result<Self> {
        let path = Self::database_path(&config.url);

        if let Some(parent) = Path::new(path).parent() {
            fs::create_dir_all(parent)?;
        }

        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::builder()
            .max_size(config.max_connections)
            .connection_timeout(Duration::from_secs(config.connection_timeout_secs))
            .build(manager)
            .context("Failed to create database connection pool")?;

        let conn = pool.get()?;
        Self::run_migrations(&conn)?;

        Ok(Self { pool })
    }

    /// Accept both bare paths and `sqlite:`-prefixed URLs
    fn database_path(database_url: &str) -> &str {
        database_url
            .strip_prefix("sqlite://")
            .or_else(|| database_url.strip_prefix("sqlite:"))
            .unwrap_or(database_url)
    }

    /// Run database migrations
    fn run_migrations(conn: &Connection) -> Result<()> {
        conn.execute_batch(include_str!("../migrations/2025-07-28-000000_create_tables/up.sql"))
            .map_err(|e| anyhow::anyhow!("Failed to run initial migration: {e}"))?;
        Ok(())
    }

    /// Get a connection from the pool
    pub fn get_connection(&self) -> Result<DbConnection> {
        Ok(self.pool.get()?)
    }

    /// List physicians with optional equality filters
    ///
    /// The state filter is uppercased before comparison; stored state codes
    /// are uppercase.
    pub fn get_physicians(&self, state: Option<&str>, specialty: Option<&str>) -> Result<Vec<Physician>> {
        let started = Instant::now();
        let conn = self.get_connection()?;

        let mut query = format!("SELECT * FROM {} WHERE 1=1", physicians::TABLE);
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(state) = state {
            query.push_str(&format!(" AND {} = ?", physicians::STATE));
            params.push(Box::new(InputValidator::normalize_state(state)));
        }

        if let Some(specialty) = specialty {
            query.push_str(&format!(" AND {} = ?", physicians::SPECIALTY));
            params.push(Box::new(specialty.to_string()));
        }

        query.push_str(&format!(" ORDER BY {} ASC", physicians::PHYSICIAN_ID));

        let mut stmt = conn.prepare(&query)?;
        let physician_iter = stmt.query_map(rusqlite::params_from_iter(params.iter()), |row| {
            Self::map_physician(row)
        })?;

        let mut results = Vec::new();
        for physician in physician_iter {
            results.push(physician?);
        }

        metrics::record_db_query("get_physicians", started.elapsed());
        Ok(results)
    }

    /// List messages matching `filter`, denormalized with physician fields
    ///
    /// Inner join: messages whose physician_id has no physician row are
    /// excluded. Results are sorted newest first.
    pub fn get_messages(&self, filter: &MessageFilter) -> Result<Vec<MessageRecord>> {
        let started = Instant::now();
        let conn = self.get_connection()?;

        let mut query = format!(
            "SELECT m.*, p.{}, p.{}, p.{}, p.{} FROM {} m INNER JOIN {} p ON m.{} = p.{} WHERE 1=1",
            physicians::FIRST_NAME,
            physicians::LAST_NAME,
            physicians::SPECIALTY,
            physicians::STATE,
            messages::TABLE,
            physicians::TABLE,
            messages::PHYSICIAN_ID,
            physicians::PHYSICIAN_ID,
        );
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(physician_id) = filter.physician_id {
            query.push_str(&format!(" AND m.{} = ?", messages::PHYSICIAN_ID));
            params.push(Box::new(physician_id));
        }

        if let Some(start) = filter.start {
            query.push_str(&format!(" AND m.{} >= ?", messages::TIMESTAMP));
            params.push(Box::new(start));
        }

        if let Some(end) = filter.end {
            query.push_str(&format!(" AND m.{} <= ?", messages::TIMESTAMP));
            params.push(Box::new(end));
        }

        if let Some(topic) = &filter.topic {
            query.push_str(&format!(" AND m.{} = ?", messages::TOPIC));
            params.push(Box::new(topic.clone()));
        }

        if let Some(sentiment) = &filter.sentiment {
            query.push_str(&format!(" AND m.{} = ?", messages::SENTIMENT));
            params.push(Box::new(sentiment.clone()));
        }

        if let Some(text) = &filter.message_text {
            query.push_str(&format!(" AND m.{} LIKE ?", messages::MESSAGE_TEXT));
            params.push(Box::new(format!("%{text}%")));
        }

        if let Some(specialty) = &filter.specialty {
            query.push_str(&format!(" AND p.{} = ?", physicians::SPECIALTY));
            params.push(Box::new(specialty.clone()));
        }

        if let Some(state) = &filter.state {
            query.push_str(&format!(" AND p.{} = ?", physicians::STATE));
            params.push(Box::new(InputValidator::normalize_state(state)));
        }

        query.push_str(&format!(" ORDER BY m.{} DESC", messages::TIMESTAMP));

        let mut stmt = conn.prepare(&query)?;
        let record_iter = stmt.query_map(rusqlite::params_from_iter(params.iter()), |row| {
            Self::map_message_record(row)
        })?;

        let mut results = Vec::new();
        for record in record_iter {
            results.push(record?);
        }

        metrics::record_db_query("get_messages", started.elapsed());
        Ok(results)
    }

    /// Get a message by ID
    pub fn get_message_by_id(&self, message_id: i64) -> Result<Option<Message>> {
        let conn = self.get_connection()?;

        let message = conn
            .query_row(
                &format!(
                    "SELECT * FROM {} WHERE {} = ?",
                    messages::TABLE,
                    messages::MESSAGE_ID
                ),
                params![message_id],
                |row| Self::map_message(row),
            )
            .optional()?;

        Ok(message)
    }

    /// Minimum and maximum message dates across the whole table
    ///
    /// Both None when the table is empty.
    pub fn message_date_range(&self) -> Result<MessageDateRange> {
        let conn = self.get_connection()?;

        let (min, max) = conn.query_row(
            &format!(
                "SELECT MIN({col}), MAX({col}) FROM {}",
                messages::TABLE,
                col = messages::TIMESTAMP
            ),
            params![],
            |row| {
                Ok((
                    row.get::<_, Option<chrono::NaiveDateTime>>(0)?,
                    row.get::<_, Option<chrono::NaiveDateTime>>(1)?,
                ))
            },
        )?;

        Ok(MessageDateRange {
            min_date: min.map(|dt| dt.date()),
            max_date: max.map(|dt| dt.date()),
        })
    }

    /// Insert a single physician row
    pub fn insert_physician(&self, physician: &Physician) -> Result<()> {
        let conn = self.get_connection()?;
        Self::insert_physician_with(&conn, physician)
    }

    /// Insert a single message row
    pub fn insert_message(&self, message: &Message) -> Result<()> {
        let conn = self.get_connection()?;
        Self::insert_message_with(&conn, message)
    }

    /// Replace the physicians table contents wholesale, in one transaction
    pub fn replace_physicians(&self, rows: &[Physician]) -> Result<usize> {
        let mut conn = self.get_connection()?;
        let tx = conn.transaction()?;

        tx.execute(&format!("DELETE FROM {}", physicians::TABLE), params![])?;
        for physician in rows {
            Self::insert_physician_with(&tx, physician)?;
        }
        tx.commit()?;

        metrics::record_rows_loaded(physicians::TABLE, rows.len() as u64);
        Ok(rows.len())
    }

    /// Replace the messages table contents wholesale, in one transaction
    pub fn replace_messages(&self, rows: &[Message]) -> Result<usize> {
        let mut conn = self.get_connection()?;
        let tx = conn.transaction()?;

        tx.execute(&format!("DELETE FROM {}", messages::TABLE), params![])?;
        for message in rows {
            Self::insert_message_with(&tx, message)?;
        }
        tx.commit()?;

        metrics::record_rows_loaded(messages::TABLE, rows.len() as u64);
        Ok(rows.len())
    }

    fn insert_physician_with(conn: &Connection, physician: &Physician) -> Result<()> {
        conn.execute(
            &format!(
                "INSERT INTO {} ({}, {}, {}, {}, {}, {}, {}, {}) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                physicians::TABLE,
                physicians::PHYSICIAN_ID,
                physicians::NPI,
                physicians::FIRST_NAME,
                physicians::LAST_NAME,
                physicians::SPECIALTY,
                physicians::STATE,
                physicians::CONSENT_OPT_IN,
                physicians::PREFERRED_CHANNEL,
            ),
            params![
                physician.physician_id,
                physician.npi,
                physician.first_name,
                physician.last_name,
                physician.specialty,
                physician.state,
                physician.consent_opt_in,
                physician.preferred_channel,
            ],
        )?;
        Ok(())
    }

    fn insert_message_with(conn: &Connection, message: &Message) -> Result<()> {
        conn.execute(
            &format!(
                "INSERT INTO {} ({}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                messages::TABLE,
                messages::MESSAGE_ID,
                messages::PHYSICIAN_ID,
                messages::CHANNEL,
                messages::DIRECTION,
                messages::TIMESTAMP,
                messages::MESSAGE_TEXT,
                messages::CAMPAIGN_ID,
                messages::TOPIC,
                messages::COMPLIANCE_TAG,
                messages::SENTIMENT,
                messages::DELIVERY_STATUS,
                messages::RESPONSE_LATENCY_SEC,
            ),
            params![
                message.message_id,
                message.physician_id,
                message.channel,
                message.direction,
                message.timestamp,
                message.message_text,
                message.campaign_id,
                message.topic,
                message.compliance_tag,
                message.sentiment,
                message.delivery_status,
                message.response_latency_sec,
            ],
        )?;
        Ok(())
    }

    /// Map a database row to a Physician
    fn map_physician(row: &Row) -> rusqlite::Result<Physician> {
        Ok(Physician {
            physician_id: row.get(physicians::PHYSICIAN_ID)?,
            npi: row.get(physicians::NPI)?,
            first_name: row.get(physicians::FIRST_NAME)?,
            last_name: row.get(physicians::LAST_NAME)?,
            specialty: row.get(physicians::SPECIALTY)?,
            state: row.get(physicians::STATE)?,
            consent_opt_in: row.get(physicians::CONSENT_OPT_IN)?,
            preferred_channel: row.get(physicians::PREFERRED_CHANNEL)?,
        })
    }

    /// Map a database row to a Message
    fn map_message(row: &Row) -> rusqlite::Result<Message> {
        Ok(Message {
            message_id: row.get(messages::MESSAGE_ID)?,
            physician_id: row.get(messages::PHYSICIAN_ID)?,
            channel: row.get(messages::CHANNEL)?,
            direction: row.get(messages::DIRECTION)?,
            timestamp: row.get(messages::TIMESTAMP)?,
            message_text: row.get(messages::MESSAGE_TEXT)?,
            campaign_id: row.get(messages::CAMPAIGN_ID)?,
            topic: row.get(messages::TOPIC)?,
            compliance_tag: row.get(messages::COMPLIANCE_TAG)?,
            sentiment: row.get(messages::SENTIMENT)?,
            delivery_status: row.get(messages::DELIVERY_STATUS)?,
            response_latency_sec: row.get(messages::RESPONSE_LATENCY_SEC)?,
        })
    }

    /// Map a joined row to a denormalized MessageRecord
    fn map_message_record(row: &Row) -> rusqlite::Result<MessageRecord> {
        let first_name: String = row.get(physicians::FIRST_NAME)?;
        let last_name: String = row.get(physicians::LAST_NAME)?;
        Ok(MessageRecord {
            message_id: row.get(messages::MESSAGE_ID)?,
            physician_id: row.get(messages::PHYSICIAN_ID)?,
            physician_name: format!("{first_name} {last_name}"),
            specialty: row.get(physicians::SPECIALTY)?,
            state: row.get(physicians::STATE)?,
            channel: row.get(messages::CHANNEL)?,
            direction: row.get(messages::DIRECTION)?,
            timestamp: row.get(messages::TIMESTAMP)?,
            message_text: row.get(messages::MESSAGE_TEXT)?,
            campaign_id: row.get(messages::CAMPAIGN_ID)?,
            topic: row.get(messages::TOPIC)?,
            compliance_tag: row.get(messages::COMPLIANCE_TAG)?,
            sentiment: row.get(messages::SENTIMENT)?,
            delivery_status: row.get(messages::DELIVERY_STATUS)?,
            response_latency_sec: row.get(messages::RESPONSE_LATENCY_SEC)?,
        })
    }
}
