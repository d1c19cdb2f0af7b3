//! CLI command implementations.
//!
//! Each submodule owns one or more related `Commands` variants:
//!
//! | Module   | Commands handled                          |
//! |----------|-------------------------------------------|
//! | `review` | `Submit`, `Show`, `Watch`, `List`, `Delete` |
//! | `stats`  | `Stats`                                   |
//! | `export` | `Export`                                  |
//! | `auth`   | `Login`, `Register`, `Logout`, `Whoami`   |
//! | `health` | `Health`                                  |
//! | `config` | `Config`                                  |

use std::sync::Arc;

use anyhow::Result;

use revq::api::ApiClient;
use revq::auth::CredentialStore;
use revq::config::RevqConfig;
use revq::session::ReviewSession;

pub mod auth;
pub mod config;
pub mod export;
pub mod health;
pub mod review;
pub mod stats;

pub use auth::{cmd_login, cmd_logout, cmd_register, cmd_whoami};
pub use config::cmd_config;
pub use export::cmd_export;
pub use health::cmd_health;
pub use review::{cmd_delete, cmd_list, cmd_show, cmd_submit, cmd_watch};
pub use stats::cmd_stats;

/// Everything a command needs: resolved configuration, the API client, and
/// the polling session built over it. Owned for the life of the process.
pub struct Ctx {
    pub config: RevqConfig,
    pub client: Arc<ApiClient>,
    pub session: ReviewSession<ApiClient>,
}

impl Ctx {
    pub fn load(cli_api_url: Option<String>) -> Result<Self> {
        let config = RevqConfig::load(cli_api_url)?;
        let credentials = Arc::new(CredentialStore::open(&config.config_dir)?);
        let client = Arc::new(ApiClient::new(
            &config.api_url(),
            credentials,
            config.request_timeout(),
        )?);
        let session = ReviewSession::new(client.clone(), config.poll_config());
        Ok(Self {
            config,
            client,
            session,
        })
    }
}
