mod loader;

use serde::{Deserialize, Serialize};

use crate::http::DEFAULT_USER_AGENT;

pub use loader::{get_default_config, load_configuration, write_config_to};

/// Settings a [`Service`](crate::http::Service) is built from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Root URL including the protocol, e.g. `https://api.example.com`.
    pub root_url: String,
    pub user_agent: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            root_url: "http://localhost:8080".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}
