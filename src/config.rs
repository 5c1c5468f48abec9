use crate::cache::PageCache;
use dotenv::dotenv;
use rocket::fairing::AdHoc;
use rocket::figment::{util::map, Figment};
use serde::Deserialize;
use std::env;
use std::time::Duration;
use tracing::{error, warn};

/// Debug only secret for JWT encoding & decoding.
const DEV_SECRET: &str = "8Xui8SN4mI+7egV/9dlfYYLGQJeEx4+DwmSQLwDVXJg=";

/// Millisecond precision, same shape as js `toISOString()`.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

pub const TOKEN_PREFIX: &str = "Token ";

pub const DEFAULT_DATABASE_URL: &str = "yatube.sqlite";

/// Seconds a rendered index page stays in the page cache.
pub const DEFAULT_INDEX_CACHE_TTL: u64 = 20;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub jwt_secret: Option<String>,
    #[serde(default = "default_index_cache_ttl")]
    pub index_cache_ttl: u64,
}

fn default_index_cache_ttl() -> u64 {
    DEFAULT_INDEX_CACHE_TTL
}

/// Secret resolved on ignite.
#[derive(Debug)]
pub struct AppState {
    pub secret: Vec<u8>,
}

impl AppState {
    pub fn manage() -> AdHoc {
        AdHoc::try_on_ignite("Manage config", |rocket| async move {
            let config: AppConfig = match rocket.figment().extract() {
                Ok(config) => config,
                Err(err) => {
                    error!(%err, "invalid application configuration");
                    return Err(rocket);
                }
            };

            let secret = match config.jwt_secret {
                Some(secret) => secret,
                None if cfg!(debug_assertions) => {
                    warn!("no SECRET_KEY configured, using the development secret");
                    DEV_SECRET.to_string()
                }
                None => {
                    error!("no SECRET_KEY environment variable found");
                    return Err(rocket);
                }
            };

            let state = AppState {
                secret: secret.into_bytes(),
            };
            let cache = PageCache::new(Duration::from_secs(config.index_cache_ttl));

            Ok(rocket.manage(state).manage(cache))
        })
    }
}

/// Create rocket config from environment variables
pub fn from_env() -> Figment {
    dotenv().ok();

    let database_url =
        env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

    let mut figment = rocket::Config::figment()
        .merge(("databases", map!["yatube" => map!["url" => database_url]]));

    if let Ok(secret) = env::var("SECRET_KEY") {
        figment = figment.merge(("jwt_secret", secret));
    }

    figment
}
