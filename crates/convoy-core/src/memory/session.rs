//! Session-keyed registry of conversation buffers.
//!
//! The registry is the single factory for buffers: it selects the concrete
//! store backing from configuration (Redis when `remote_url` is set,
//! in-process otherwise) and hands out the same buffer for the same session
//! id for the process lifetime. The shared Redis connection is established
//! once at construction, so per-session buffer creation does no I/O and the
//! map guard is held only briefly.

use crate::config::MemoryConfig;
use crate::errors::ConvoyError;
use crate::llm::LLM;
use crate::memory::in_process::InProcessHistory;
use crate::memory::remote::{open_connection, RemoteHistory};
use crate::memory::summary_buffer::SummaryBufferMemory;
use crate::memory::HistoryStore;
use redis::aio::MultiplexedConnection;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use uuid::Uuid;

pub struct SessionRegistry {
    config: MemoryConfig,
    llm: Arc<dyn LLM>,
    remote: Option<MultiplexedConnection>,
    sessions: Mutex<HashMap<String, Arc<SummaryBufferMemory>>>,
}

impl SessionRegistry {
    pub async fn new(config: MemoryConfig, llm: Arc<dyn LLM>) -> Result<Self, ConvoyError> {
        config.validate()?;
        let remote = match &config.remote_url {
            Some(url) => {
                let io_timeout = Duration::from_secs(config.io_timeout_secs);
                let conn = open_connection(url, io_timeout).await?;
                log::info!("session registry using remote history store at {}", url);
                Some(conn)
            }
            None => {
                log::info!("session registry using in-process history stores");
                None
            }
        };
        Ok(Self {
            config,
            llm,
            remote,
            sessions: Mutex::new(HashMap::new()),
        })
    }

    /// Returns the buffer for `session_id`, constructing it on first access.
    /// Concurrent first accesses for the same id yield the same buffer.
    pub fn get_history(&self, session_id: &str) -> Result<Arc<SummaryBufferMemory>, ConvoyError> {
        let mut sessions = self.lock_sessions()?;
        if let Some(buffer) = sessions.get(session_id) {
            return Ok(Arc::clone(buffer));
        }

        let store: Arc<dyn HistoryStore> = match &self.remote {
            Some(conn) => Arc::new(RemoteHistory::new(
                conn.clone(),
                format!("{}{}", self.config.kv_prefix, session_id),
                self.config.ttl_seconds,
            )),
            None => Arc::new(InProcessHistory::new()),
        };
        let buffer = Arc::new(SummaryBufferMemory::new(
            store,
            Arc::clone(&self.llm),
            &self.config,
        )?);
        sessions.insert(session_id.to_string(), Arc::clone(&buffer));
        log::debug!("created history buffer for session {}", session_id);
        Ok(buffer)
    }

    /// Clears the session's history and drops its buffer from the registry.
    pub async fn clear_session(&self, session_id: &str) -> Result<(), ConvoyError> {
        let buffer = {
            let mut sessions = self.lock_sessions()?;
            sessions.remove(session_id)
        };
        if let Some(buffer) = buffer {
            buffer.clear().await?;
        }
        Ok(())
    }

    /// Mints a fresh opaque session identifier.
    pub fn new_session_id(&self) -> String {
        Uuid::new_v4().to_string()
    }

    /// Session ids with a live buffer in this process.
    pub fn active_sessions(&self) -> Result<Vec<String>, ConvoyError> {
        Ok(self.lock_sessions()?.keys().cloned().collect())
    }

    fn lock_sessions(
        &self,
    ) -> Result<MutexGuard<'_, HashMap<String, Arc<SummaryBufferMemory>>>, ConvoyError> {
        self.sessions
            .lock()
            .map_err(|_| ConvoyError::StoreUnavailable("session registry mutex poisoned".to_string()))
    }
}
