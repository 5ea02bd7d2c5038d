//! Application state management

use mongodb::{Client, Database};

use crate::config::Config;

/// Connected store handle
#[derive(Clone)]
pub enum Backend {
    Mongo { client: Client, db: Database },
    Memory,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub backend: Backend,
}
