//! # Connection Manager
//!
//! One store connection per client, established on first use and reused for
//! every action until closed. The cached handle sits behind an async mutex
//! held across the dial, so concurrent first actions collapse into a single
//! connection attempt instead of racing to open several.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, error};

use crate::store::{DocumentStore, StoreConnector, StoreResult};

/// Owns the lazily-opened connection to the document store.
pub struct ConnectionManager {
    url: String,
    connector: Arc<dyn StoreConnector>,
    handle: Mutex<Option<Arc<dyn DocumentStore>>>,
}

impl ConnectionManager {
    /// A manager that will dial `url` through `connector` when first asked.
    pub fn new(url: impl Into<String>, connector: Arc<dyn StoreConnector>) -> Self {
        ConnectionManager {
            url: url.into(),
            connector,
            handle: Mutex::new(None),
        }
    }

    /// The connection URL this manager dials.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the open store connection, dialling on first use.
    ///
    /// A failed dial leaves nothing cached, so the next call retries.
    pub async fn acquire(&self) -> StoreResult<Arc<dyn DocumentStore>> {
        let mut held = self.handle.lock().await;
        if let Some(store) = held.as_ref() {
            return Ok(Arc::clone(store));
        }
        debug!(url = %self.url, "connecting to store");
        let store = self.connector.connect(&self.url).await.map_err(|err| {
            error!(url = %self.url, error = %err, "store connection failed");
            err
        })?;
        *held = Some(Arc::clone(&store));
        Ok(store)
    }

    /// Closes the connection if one is open. A later acquire dials again.
    pub async fn close(&self) -> StoreResult<()> {
        let closed = self.handle.lock().await.take();
        if let Some(store) = closed {
            debug!("closing store connection");
            store.close().await?;
        }
        Ok(())
    }

    /// True while a connection is open.
    pub async fn is_connected(&self) -> bool {
        self.handle.lock().await.is_some()
    }
}
