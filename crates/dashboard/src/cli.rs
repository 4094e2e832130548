//! Command-line arguments of the `prodboard` binary.
//!
//! Every setting can also come from its `PRODBOARD_*` variable; values are
//! validated by [`DashboardConfig::from_lookup`].

use clap::Parser;

use crate::config::{
    ConfigError, DashboardConfig, ENV_API_URL, ENV_AUTH_TOKEN, ENV_LOG_FORMAT, ENV_PAGE_SIZE,
    ENV_STORAGE,
};

/// Terminal products dashboard.
#[derive(Parser, Debug, Default)]
#[command(name = "prodboard", version)]
pub struct Cli {
    /// Serve a seeded in-memory catalog instead of the products API.
    #[arg(long)]
    pub demo: bool,

    /// Products API base URL.
    #[arg(long, env = "PRODBOARD_API_URL")]
    pub api_url: Option<String>,

    /// Bearer token sent with every API request.
    #[arg(long, env = "PRODBOARD_AUTH_TOKEN", hide_env_values = true)]
    pub auth_token: Option<String>,

    /// Products per page.
    #[arg(long, env = "PRODBOARD_PAGE_SIZE")]
    pub page_size: Option<String>,

    /// `memory`, or a sqlite path or URL for the auth marker.
    #[arg(long, env = "PRODBOARD_STORAGE")]
    pub storage: Option<String>,

    /// Log output: `pretty` or `json`.
    #[arg(long, env = "PRODBOARD_LOG_FORMAT")]
    pub log_format: Option<String>,
}

impl Cli {
    pub fn config(&self) -> Result<DashboardConfig, ConfigError> {
        DashboardConfig::from_lookup(|key| match key {
            ENV_API_URL => self.api_url.clone(),
            ENV_AUTH_TOKEN => self.auth_token.clone(),
            ENV_PAGE_SIZE => self.page_size.clone(),
            ENV_STORAGE => self.storage.clone(),
            ENV_LOG_FORMAT => self.log_format.clone(),
            _ => None,
        })
    }
}
