//! # mylist Config
//!
//! Configuration management for mylist registration: a TOML file with
//! `${VAR}` substitution, serde defaults for every field, a validator, and
//! the environment contract of the batch entry point.

mod env;
mod error;
mod loader;
mod schema;
mod validator;

pub use env::{parse_id_list, BatchEnv, ENV_EMAIL, ENV_ID_LIST, ENV_PASSWORD, ENV_SUBSCRIPTION};
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
