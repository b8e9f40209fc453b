//! Document store connection settings
//!
//! Settings come from environment variables, with the username and password
//! also readable from a dotenv-style secrets file. [`Config`] is resolved once
//! at startup and handed to the store.

use crate::error::{ReportError, Result};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use tracing::debug;

pub const DEFAULT_HOST: &str = "productioncluster.dbcdg.gcp.mongodb.net";
pub const DEFAULT_DATABASE: &str = "production";
pub const DEFAULT_COLLECTION: &str = "tools";
pub const DEFAULT_SECRETS_FILE: &str = ".env";

pub const HOST_VAR: &str = "DATABASE_HOST";
pub const DATABASE_VAR: &str = "DATABASE";
pub const COLLECTION_VAR: &str = "DATABASE_COLLECTION";
pub const USER_VAR: &str = "DATABASE_USER";
pub const PASSWORD_VAR: &str = "DATABASE_PASSWORD";

/// Keys looked up in the environment, then the secrets file, when the
/// `DATABASE_USER`/`DATABASE_PASSWORD` overrides are unset
pub const SECRET_USER_KEY: &str = "mongodb_user";
pub const SECRET_PASSWORD_KEY: &str = "mongodb_password";

/// Key-value pairs read from a secrets file
#[derive(Debug, Clone, Default)]
pub struct Secrets {
    values: HashMap<String, String>,
}

impl Secrets {
    /// Read a dotenv-style file without touching the process environment
    ///
    /// A missing file yields empty secrets.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No secrets file");
            return Ok(Secrets::default());
        }

        let iter = dotenvy::from_path_iter(path)
            .map_err(|e| ReportError::Config(format!("{}: {}", path.display(), e)))?;

        let mut values = HashMap::new();
        for item in iter {
            let (key, value) =
                item.map_err(|e| ReportError::Config(format!("{}: {}", path.display(), e)))?;
            values.insert(key, value);
        }
        Ok(Secrets { values })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl FromIterator<(String, String)> for Secrets {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Secrets {
            values: iter.into_iter().collect(),
        }
    }
}

/// Connection settings for the gateway database
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub database: String,
    pub collection: String,
    pub username: String,
    pub password: String,
}

impl Config {
    /// Resolve settings from the process environment and a secrets file
    pub fn from_env(secrets_file: &Path) -> Result<Self> {
        let secrets = Secrets::load(secrets_file)?;
        Ok(Config::resolve(|key| std::env::var(key).ok(), &secrets))
    }

    /// Resolve settings from a variable lookup and loaded secrets
    ///
    /// Username and password fall back from `DATABASE_USER` to
    /// `mongodb_user` (variable, then secrets file) and finally to empty,
    /// and likewise for the password.
    pub fn resolve<F>(lookup: F, secrets: &Secrets) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let credential = |var: &str, key: &str| {
            lookup(var)
                .or_else(|| lookup(key))
                .or_else(|| secrets.get(key).map(str::to_string))
                .unwrap_or_default()
        };

        let config = Config {
            host: lookup(HOST_VAR).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            database: lookup(DATABASE_VAR).unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            collection: lookup(COLLECTION_VAR).unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
            username: credential(USER_VAR, SECRET_USER_KEY),
            password: credential(PASSWORD_VAR, SECRET_PASSWORD_KEY),
        };
        debug!(config = ?config, "Resolved configuration");
        config
    }

    /// `mongodb+srv` URI with form-encoded credentials
    pub fn connection_string(&self) -> String {
        format!(
            "mongodb+srv://{}:{}@{}/{}?retryWrites=true&w=majority",
            encode(&self.username),
            encode(&self.password),
            self.host,
            self.database,
        )
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("database", &self.database)
            .field("collection", &self.collection)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Form-encode a credential: spaces become `+`, reserved characters `%XX`
fn encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
