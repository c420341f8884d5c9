use std::path::PathBuf;
use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

pub static CONFIG_FILE: &str = "clipfetch.toml";
pub static ENV_PREFIX: &str = "CLIPFETCH_";

static DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Substrings that mark a URL as a redirecting short link
    #[serde(default = "default_short_link_markers")]
    pub short_link_markers: Vec<String>,
    #[serde(default)]
    pub endpoints: Endpoints,
}

/// Upstream addresses. These are third-party and undocumented services, so they are kept
/// overridable.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Endpoints {
    #[serde(default = "default_tiktok_api")]
    pub tiktok_api: String,
    #[serde(default = "default_shopee_api")]
    pub shopee_api: String,
    #[serde(default = "default_shopee_item_api")]
    pub shopee_item_api: String,
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.into()
}

fn default_output_dir() -> PathBuf {
    ".".into()
}

fn default_short_link_markers() -> Vec<String> {
    vec!["://shp.ee/".into(), "://s.shopee.".into()]
}

fn default_tiktok_api() -> String {
    "https://www.tikwm.com/api/".into()
}

fn default_shopee_api() -> String {
    "https://www.tikwm.com/api/shopee/video".into()
}

fn default_shopee_item_api() -> String {
    "https://shopee.com.br/api/v4/item/get".into()
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            tiktok_api: default_tiktok_api(),
            shopee_api: default_shopee_api(),
            shopee_item_api: default_shopee_item_api(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: default_user_agent(),
            output_dir: default_output_dir(),
            short_link_markers: default_short_link_markers(),
            endpoints: Endpoints::default(),
        }
    }
}

impl Config {
    pub fn get_config() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    /// Defaults, then the config file, then `CLIPFETCH_*` variables (`__` separates nested keys)
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
