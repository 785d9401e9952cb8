//! Startup configuration. Read once in `main` and passed along;
//! nothing here is consulted again while serving.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono_tz::Tz;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::util::{getenv, my_read_to_string};
use crate::warn;

pub const DEFAULT_SERVICE_NAME: &str = "Service name goes here";
pub const DEFAULT_SESSION_DATA_PATH: &str = "data/session-data-defaults.json";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KitConfig {
    /// Shown by the templates as `serviceName`.
    pub service_name: String,
    /// "ip:port" for the server to listen on.
    pub listen_addr: String,
    /// Directory the templates are loaded from.
    pub templates_dir: String,
    /// JSON file with the session data defaults; a missing file is
    /// the same as an empty mapping.
    pub session_data_defaults: String,
    /// Idle time after which a session's data is dropped. Also used
    /// for the session cookie.
    pub session_ttl_seconds: u32,
    /// IANA timezone name the date filters present times in.
    pub timezone: String,
}

impl Default for KitConfig {
    fn default() -> Self {
        KitConfig {
            service_name: DEFAULT_SERVICE_NAME.into(),
            listen_addr: "127.0.0.1:3000".into(),
            templates_dir: "templates".into(),
            session_data_defaults: DEFAULT_SESSION_DATA_PATH.into(),
            session_ttl_seconds: 3600,
            timezone: "Europe/London".into(),
        }
    }
}

impl KitConfig {
    pub fn from_json_str(s: &str) -> Result<KitConfig> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_file(path: &str) -> Result<KitConfig> {
        Self::from_json_str(&my_read_to_string(path)?).with_context(
            || anyhow!("parsing configuration file {:?}", path))
    }

    /// The configuration to run with: the given file, or the
    /// defaults; env vars override either.
    pub fn load(path: Option<&str>) -> Result<KitConfig> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => KitConfig::default(),
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(v) = getenv("PROTOKIT_SERVICE_NAME")? {
            self.service_name = v;
        }
        if let Some(v) = getenv("PROTOKIT_LISTEN")? {
            self.listen_addr = v;
        }
        if let Some(v) = getenv("PROTOKIT_TEMPLATES")? {
            self.templates_dir = v;
        }
        Ok(())
    }

    pub fn timezone(&self) -> Result<Tz> {
        self.timezone.parse::<Tz>().map_err(
            |e| anyhow!("invalid timezone {:?}: {}", self.timezone, e))
    }

    /// The session data defaults mapping. Loaded once at startup; the
    /// merge layer only ever sees it by reference.
    pub fn load_session_data_defaults(&self) -> Result<Map<String, Value>> {
        let path = &self.session_data_defaults;
        if ! Path::new(path).exists() {
            warn!("no session data defaults file at {path:?}, starting empty");
            return Ok(Map::new())
        }
        let value: Value = serde_json::from_str(&my_read_to_string(path)?)
            .with_context(|| anyhow!("parsing session data defaults {:?}", path))?;
        match value {
            Value::Object(m) => Ok(m),
            _ => Err(anyhow!("session data defaults {:?} must hold a \
                              JSON object at the top level", path)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_defaults() {
        let config = KitConfig::default();
        assert_eq!(config.listen_addr, "127.0.0.1:3000");
        assert_eq!(config.session_ttl_seconds, 3600);
        assert!(config.timezone().is_ok());
    }

    #[test]
    fn t_partial_file_fills_in_defaults() {
        let config = KitConfig::from_json_str(
            r#"{"service_name": "Apply for a juggling licence",
                "timezone": "Europe/Zurich"}"#).unwrap();
        assert_eq!(config.service_name, "Apply for a juggling licence");
        assert_eq!(config.timezone().unwrap(), chrono_tz::Europe::Zurich);
        assert_eq!(config.templates_dir, "templates");
    }

    #[test]
    fn t_unknown_fields_are_rejected() {
        assert!(KitConfig::from_json_str(r#"{"servicename": "typo"}"#)
                .is_err());
    }

    #[test]
    fn t_bad_timezone() {
        let config = KitConfig::from_json_str(
            r#"{"timezone": "Mars/Olympus_Mons"}"#).unwrap();
        assert!(config.timezone().is_err());
    }
}
