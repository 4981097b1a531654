pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod live;
pub mod models;
pub mod routes;

use std::sync::Arc;

use tokio::sync::watch;

use config::Config;
use db::kv::KeyValueStore;
use db::store::Store;
use live::groups::ListGroups;
use live::publish::ListPublisher;
use trolley_common::SnowflakeGenerator;

/// Shared application state available to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub kv: Arc<dyn KeyValueStore>,
    pub groups: Arc<ListGroups>,
    pub publisher: ListPublisher,
    pub config: Arc<Config>,
    pub snowflake: Arc<SnowflakeGenerator>,
    pub shutdown: Arc<watch::Sender<bool>>,
}

impl AppState {
    /// Wire up state backed by in-memory stores.
    pub fn new(config: Config) -> Self {
        let groups = Arc::new(ListGroups::new());
        let (shutdown, _) = watch::channel(false);

        Self {
            store: Arc::new(db::store::MemoryStore::new()),
            kv: Arc::new(db::kv::MemoryStore::new()),
            publisher: ListPublisher::new(groups.clone()),
            groups,
            snowflake: Arc::new(SnowflakeGenerator::new(config.worker_id)),
            config: Arc::new(config),
            shutdown: Arc::new(shutdown),
        }
    }
}
