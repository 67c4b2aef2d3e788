//! Redis-backed history store shared across processes.
//!
//! Each session's history lives in a list-typed key (`kv_prefix + session_id`)
//! whose TTL is refreshed on every write. Elements are JSON-serialized
//! messages; an element that fails to decode is dropped and counted rather
//! than poisoning the whole history. The replace operation is not atomic
//! across the delete/append boundary; a crash in between leaves an empty or
//! truncated history that readers treat as a fresh session.

use crate::core_types::Message;
use crate::errors::ConvoyError;
use crate::memory::{HistoryStore, StoreKind};
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

pub struct RemoteHistory {
    conn: MultiplexedConnection,
    key: String,
    ttl_seconds: u64,
    decode_failures: AtomicU64,
}

impl RemoteHistory {
    pub fn new(conn: MultiplexedConnection, key: String, ttl_seconds: u64) -> Self {
        Self {
            conn,
            key,
            ttl_seconds,
            decode_failures: AtomicU64::new(0),
        }
    }

    /// Open a dedicated connection and bind it to `key`. Registry-managed
    /// stores share one multiplexed connection instead; this entry point is
    /// for standalone use.
    pub async fn connect(
        url: &str,
        key: String,
        ttl_seconds: u64,
        io_timeout: Duration,
    ) -> Result<Self, ConvoyError> {
        let conn = open_connection(url, io_timeout).await?;
        Ok(Self::new(conn, key, ttl_seconds))
    }

    /// Number of stored elements dropped because they failed to deserialize.
    pub fn decode_failures(&self) -> u64 {
        self.decode_failures.load(Ordering::Relaxed)
    }

    async fn refresh_ttl(&self, conn: &mut MultiplexedConnection) -> Result<(), ConvoyError> {
        conn.expire::<_, ()>(&self.key, self.ttl_seconds as i64)
            .await?;
        Ok(())
    }
}

/// Establish a multiplexed connection with socket timeouts so operations
/// never block indefinitely.
pub async fn open_connection(
    url: &str,
    io_timeout: Duration,
) -> Result<MultiplexedConnection, ConvoyError> {
    let client = redis::Client::open(url)
        .map_err(|e| ConvoyError::ConfigError(format!("invalid remote store URL: {}", e)))?;
    let conn = client
        .get_multiplexed_async_connection_with_timeouts(io_timeout, io_timeout)
        .await?;
    Ok(conn)
}

#[async_trait]
impl HistoryStore for RemoteHistory {
    async fn append(&self, message: Message) -> Result<(), ConvoyError> {
        let payload = serde_json::to_string(&message)?;
        let mut conn = self.conn.clone();
        conn.rpush::<_, _, ()>(&self.key, payload).await?;
        self.refresh_ttl(&mut conn).await?;
        Ok(())
    }

    async fn messages(&self) -> Result<Vec<Message>, ConvoyError> {
        let mut conn = self.conn.clone();
        let raw: Vec<String> = conn.lrange(&self.key, 0, -1).await?;

        let mut messages = Vec::with_capacity(raw.len());
        for element in raw {
            match serde_json::from_str::<Message>(&element) {
                Ok(message) => messages.push(message),
                Err(e) => {
                    self.decode_failures.fetch_add(1, Ordering::Relaxed);
                    log::warn!("dropping undecodable history element at {}: {}", self.key, e);
                }
            }
        }
        Ok(messages)
    }

    async fn set_messages(&self, messages: Vec<Message>) -> Result<(), ConvoyError> {
        // Serialize everything up front so a bad message cannot leave the key
        // half-written.
        let payloads = messages
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<String>, _>>()?;

        let mut conn = self.conn.clone();
        conn.del::<_, ()>(&self.key).await?;
        if !payloads.is_empty() {
            conn.rpush::<_, _, ()>(&self.key, payloads).await?;
            self.refresh_ttl(&mut conn).await?;
        }
        Ok(())
    }

    async fn clear(&self) -> Result<(), ConvoyError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(&self.key).await?;
        Ok(())
    }

    fn kind(&self) -> StoreKind {
        StoreKind::Remote
    }
}
