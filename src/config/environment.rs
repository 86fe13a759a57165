//! Environment configuration - file locations and the caller session.
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file by the binary. Everything has a default except the session, which is
//! only built when both user id and token are set.

use std::path::PathBuf;

use crate::{
    errors::{Error, Result},
    models::Session,
};

/// Default path of the engine configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
/// Default path of the subscriptions export.
pub const DEFAULT_DATA_PATH: &str = "data/subscriptions.json";

/// Where the binary finds its inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    /// Engine configuration file (`SUBTRACK_CONFIG`)
    pub config_path: PathBuf,
    /// Subscriptions JSON export (`SUBTRACK_DATA`)
    pub data_path: PathBuf,
}

impl Environment {
    /// Reads paths from `SUBTRACK_CONFIG` and `SUBTRACK_DATA`, with defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            config_path: lookup("SUBTRACK_CONFIG")
                .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from),
            data_path: lookup("SUBTRACK_DATA")
                .map_or_else(|| PathBuf::from(DEFAULT_DATA_PATH), PathBuf::from),
        }
    }
}

/// Builds the caller session from `SUBTRACK_USER_ID` and `SUBTRACK_ACCESS_TOKEN`.
///
/// # Returns
/// * `Ok(Some(session))` - both variables are set
/// * `Ok(None)` - neither is set; the caller sees every subscription
///
/// # Errors
/// Returns an error if only one of the two is set or the user id is not a number.
pub fn session_from_env() -> Result<Option<Session>> {
    session_from_lookup(|key| std::env::var(key).ok())
}

fn session_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Option<Session>> {
    match (lookup("SUBTRACK_USER_ID"), lookup("SUBTRACK_ACCESS_TOKEN")) {
        (None, None) => Ok(None),
        (Some(user_id), Some(token)) => {
            let user_id = user_id.trim().parse::<i64>().map_err(|e| Error::Config {
                message: format!("SUBTRACK_USER_ID must be an integer: {e}"),
            })?;
            Ok(Some(Session::new(user_id, token)))
        }
        _ => Err(Error::Config {
            message: "SUBTRACK_USER_ID and SUBTRACK_ACCESS_TOKEN must be set together".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_environment_defaults() {
        let env = Environment::from_lookup(lookup_from(&[]));
        assert_eq!(env.config_path, PathBuf::from(DEFAULT_CONFIG_PATH));
        assert_eq!(env.data_path, PathBuf::from(DEFAULT_DATA_PATH));
    }

    #[test]
    fn test_environment_overrides() {
        let env = Environment::from_lookup(lookup_from(&[
            ("SUBTRACK_CONFIG", "/etc/subtrack.toml"),
            ("SUBTRACK_DATA", "/tmp/subs.json"),
        ]));
        assert_eq!(env.config_path, PathBuf::from("/etc/subtrack.toml"));
        assert_eq!(env.data_path, PathBuf::from("/tmp/subs.json"));
    }

    #[test]
    fn test_session_from_lookup() {
        assert!(session_from_lookup(lookup_from(&[])).unwrap().is_none());

        let session = session_from_lookup(lookup_from(&[
            ("SUBTRACK_USER_ID", " 42 "),
            ("SUBTRACK_ACCESS_TOKEN", "tok"),
        ]))
        .unwrap()
        .unwrap();
        assert_eq!(session.user_id, 42);
        assert_eq!(session.access_token, "tok");
    }

    #[test]
    fn test_session_from_lookup_errors() {
        assert!(matches!(
            session_from_lookup(lookup_from(&[("SUBTRACK_USER_ID", "42")])),
            Err(Error::Config { .. })
        ));
        assert!(matches!(
            session_from_lookup(lookup_from(&[
                ("SUBTRACK_USER_ID", "abc"),
                ("SUBTRACK_ACCESS_TOKEN", "tok"),
            ])),
            Err(Error::Config { .. })
        ));
    }
}
