use crate::{Error, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// number of threads config
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Thread {
    /// number of http server threads, 0 uses one per cpu
    pub http: usize,
}

/// network config
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Network {
    /// server bind host
    pub host: String,
    /// server bind port
    pub port: u16,
}

impl Default for Network {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// auth config
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Auth {
    /// secret of the staff jwt tokens
    pub secret: String,
}

impl Default for Auth {
    fn default() -> Self {
        Self {
            secret: "test".to_owned(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Setting {
    /// database url
    /// https://www.sea-ql.org/SeaORM/docs/install-and-config/connection/
    pub db_url: String,

    pub thread: Thread,
    pub network: Network,
    pub auth: Auth,
}

impl Default for Setting {
    fn default() -> Self {
        Self {
            db_url: "sqlite://prizedraw.sqlite?mode=rwc".to_string(),
            thread: Default::default(),
            network: Default::default(),
            auth: Default::default(),
        }
    }
}

impl Setting {
    /// read config from file and env
    pub fn read<P: AsRef<Path>>(file: P, env_prefix: Option<String>) -> Result<Self> {
        let file = file
            .as_ref()
            .to_str()
            .ok_or_else(|| Error::Message("config path is not valid utf-8".to_owned()))?;
        let mut config = Config::builder().add_source(File::with_name(file));
        if let Some(prefix) = env_prefix {
            config = config.add_source(Self::env_source(&prefix));
        }

        let setting: Setting = config.build()?.try_deserialize()?;
        setting.validate()?;
        Ok(setting)
    }

    fn env_source(prefix: &str) -> Environment {
        Environment::with_prefix(prefix)
            .try_parsing(true)
            .prefix_separator("_")
            .separator("__")
    }

    /// read config from env
    pub fn from_env(env_prefix: String) -> Result<Self> {
        let config = Config::builder()
            .add_source(Self::env_source(&env_prefix))
            .build()?;
        let setting: Setting = config.try_deserialize()?;
        setting.validate()?;
        Ok(setting)
    }

    /// config from str
    pub fn from_str(s: &str, format: FileFormat) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from_str(s, format))
            .build()?;
        let setting: Setting = config.try_deserialize()?;
        setting.validate()?;
        Ok(setting)
    }

    fn validate(&self) -> Result<()> {
        if self.auth.secret.is_empty() {
            return Err(Error::Message("auth.secret must not be empty".to_owned()));
        }
        Ok(())
    }
}
