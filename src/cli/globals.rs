use crate::api::GatewayConfig;
use std::{
    env,
    path::{Path, PathBuf},
    time::Duration,
};

const CREDENTIALS_FILE: &str = "credentials.json";

/// Connection settings shared by every subcommand.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub api_url: String,
    pub credentials_path: PathBuf,
    pub timeout: Duration,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(api_url: String) -> Self {
        Self {
            api_url,
            credentials_path: default_credentials_path(),
            timeout: crate::api::DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig::new(self.api_url.clone()).with_timeout(self.timeout)
    }
}

/// `$XDG_CONFIG_HOME/quizdesk/credentials.json`, falling back to
/// `$HOME/.config/quizdesk/...` and finally `./.quizdesk/...`.
#[must_use]
pub fn default_credentials_path() -> PathBuf {
    let non_empty = |name: &str| env::var_os(name).filter(|value| !value.is_empty());

    if let Some(config_home) = non_empty("XDG_CONFIG_HOME") {
        return Path::new(&config_home)
            .join(env!("CARGO_PKG_NAME"))
            .join(CREDENTIALS_FILE);
    }

    if let Some(home) = non_empty("HOME") {
        return Path::new(&home)
            .join(".config")
            .join(env!("CARGO_PKG_NAME"))
            .join(CREDENTIALS_FILE);
    }

    Path::new(concat!(".", env!("CARGO_PKG_NAME"))).join(CREDENTIALS_FILE)
}
