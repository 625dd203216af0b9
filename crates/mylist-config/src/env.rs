//! Environment contract of the batch entry point.

use crate::error::ConfigError;

pub const ENV_EMAIL: &str = "MYLIST_EMAIL";
pub const ENV_PASSWORD: &str = "MYLIST_PASSWORD";
pub const ENV_ID_LIST: &str = "MYLIST_ID_LIST";
pub const ENV_SUBSCRIPTION: &str = "PUSH_SUBSCRIPTION";

/// Names used by existing schedulers, read when the primary name is unset.
pub const LEGACY_ENV_EMAIL: &str = "NICONICO_EMAIL";
pub const LEGACY_ENV_PASSWORD: &str = "NICONICO_PASSWORD";
pub const LEGACY_ENV_ID_LIST: &str = "NICONICO_ID_LIST";

/// Inputs of a scheduled batch run.
#[derive(Clone)]
pub struct BatchEnv {
    pub email: String,
    pub password: String,
    pub id_list: Vec<String>,
    pub subscription: Option<String>,
}

impl std::fmt::Debug for BatchEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchEnv")
            .field("email", &self.email)
            .field("id_list", &self.id_list)
            .field("subscription", &self.subscription.is_some())
            .finish_non_exhaustive()
    }
}

impl BatchEnv {
    /// Read the batch inputs from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the batch inputs through an arbitrary lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let either = |key: &str, legacy: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .or_else(|| lookup(legacy).filter(|v| !v.is_empty()))
        };
        let required = |key: &str, legacy: &str| {
            either(key, legacy).ok_or_else(|| ConfigError::EnvVarNotSet(key.to_string()))
        };

        let email = required(ENV_EMAIL, LEGACY_ENV_EMAIL)?;
        let password = required(ENV_PASSWORD, LEGACY_ENV_PASSWORD)?;
        let id_list = parse_id_list(&either(ENV_ID_LIST, LEGACY_ENV_ID_LIST).unwrap_or_default());
        let subscription = lookup(ENV_SUBSCRIPTION).filter(|v| !v.trim().is_empty());

        Ok(Self {
            email,
            password,
            id_list,
            subscription,
        })
    }
}

/// Split a comma-separated identifier list, dropping blanks.
pub fn parse_id_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
