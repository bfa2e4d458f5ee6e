//! Client subsystem
//!
//! The caller-facing half of the shim: [`DbClient`] accepts legacy action
//! descriptors, resolves them, and performs them against the configured
//! document store over a single managed connection.

mod connection;
mod handlers;

pub use connection::ConnectionManager;

use std::sync::Arc;

use tracing::{debug, error};

use crate::api::{Action, ActionDescriptor, Reply};
use crate::config::DbConfig;
use crate::error::Result;
use crate::store::memory::MemoryConnector;
use crate::store::StoreConnector;

/// A compatibility client speaking the legacy action API.
///
/// Descriptor validation and resolution happen before any store
/// interaction, so a malformed descriptor never costs a connection.
pub struct DbClient {
    connection: ConnectionManager,
}

impl DbClient {
    /// A client dialling `config.url` through `connector`.
    pub fn new(config: DbConfig, connector: Arc<dyn StoreConnector>) -> Self {
        DbClient {
            connection: ConnectionManager::new(config.url, connector),
        }
    }

    /// A self-contained client over a fresh in-memory store.
    pub fn with_memory_store() -> Self {
        DbClient::new(DbConfig::default(), Arc::new(MemoryConnector::new()))
    }

    /// Performs one legacy action and returns its reply.
    pub async fn perform(&self, descriptor: ActionDescriptor) -> Result<Reply> {
        let resolved = descriptor.resolve()?;
        let action_name = resolved.action.name();
        let store = self.connection.acquire().await?;
        let collection = store.collection(&resolved.collection)?;

        let result = match resolved.action {
            Action::Create(params) => {
                handlers::create(collection.as_ref(), &resolved.collection, params).await
            }
            Action::Read(params) => {
                handlers::read(collection.as_ref(), &resolved.collection, params).await
            }
            Action::List(params) => {
                handlers::list(collection.as_ref(), &resolved.collection, params).await
            }
            Action::Update(params) => {
                handlers::update(collection.as_ref(), &resolved.collection, params).await
            }
            Action::Delete(params) => {
                handlers::delete(collection.as_ref(), &resolved.collection, params).await
            }
            Action::DeleteAll => handlers::delete_all(collection.as_ref()).await,
            Action::Index(params) => handlers::index(collection.as_ref(), params).await,
        };

        match &result {
            Ok(_) => debug!(
                action = action_name,
                collection = %resolved.collection,
                "action completed"
            ),
            Err(err) => error!(
                action = action_name,
                collection = %resolved.collection,
                error = %err,
                "action failed"
            ),
        }
        result
    }

    /// Closes the store connection. A later action reconnects.
    pub async fn close(&self) -> Result<()> {
        self.connection.close().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::error::Error;

    fn descriptor(value: serde_json::Value) -> ActionDescriptor {
        serde_json::from_value(value).unwrap()
    }

    fn client_with_connector() -> (DbClient, Arc<MemoryConnector>) {
        let connector = Arc::new(MemoryConnector::new());
        let client = DbClient::new(
            DbConfig::default(),
            Arc::clone(&connector) as Arc<dyn StoreConnector>,
        );
        (client, connector)
    }

    #[tokio::test]
    async fn test_perform_reuses_one_connection() {
        let (client, connector) = client_with_connector();
        for n in 0..3 {
            client
                .perform(descriptor(json!({
                    "act": "create",
                    "type": "things",
                    "fields": { "n": n }
                })))
                .await
                .unwrap();
        }
        assert_eq!(connector.connect_attempts(), 1);
    }

    #[tokio::test]
    async fn test_validation_errors_cost_no_connection() {
        let (client, connector) = client_with_connector();

        let err = client.perform(ActionDescriptor::default()).await.unwrap_err();
        assert!(matches!(err, Error::MissingAct));

        let err = client
            .perform(descriptor(json!({ "act": "levitate", "type": "things" })))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnknownAction(_)));

        assert_eq!(connector.connect_attempts(), 0);
    }

    #[tokio::test]
    async fn test_close_reconnects_on_next_action() {
        let (client, connector) = client_with_connector();
        client
            .perform(descriptor(json!({
                "act": "create",
                "type": "things",
                "fields": { "n": 1 }
            })))
            .await
            .unwrap();
        client.close().await.unwrap();
        client
            .perform(descriptor(json!({ "act": "read", "type": "things", "guid": "x" })))
            .await
            .unwrap();
        assert_eq!(connector.connect_attempts(), 2);
    }

    #[tokio::test]
    async fn test_typeless_list_is_rejected_by_the_store() {
        let (client, _connector) = client_with_connector();
        let err = client
            .perform(descriptor(json!({ "act": "list" })))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Store(crate::store::StoreError::InvalidCollectionName(_))
        ));
    }

    #[tokio::test]
    async fn test_memory_client_round_trip() {
        let client = DbClient::with_memory_store();
        let created = client
            .perform(descriptor(json!({
                "act": "create",
                "type": "users",
                "fields": { "name": "ada" }
            })))
            .await
            .unwrap();
        let guid = created.as_envelope().unwrap().guid.clone().unwrap();

        let read_back = client
            .perform(descriptor(json!({
                "act": "read",
                "type": "users",
                "guid": guid
            })))
            .await
            .unwrap();
        assert_eq!(
            read_back.as_envelope().unwrap().fields.as_ref().unwrap().get("name"),
            Some(&json!("ada"))
        );
    }
}
