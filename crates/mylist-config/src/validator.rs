//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Collapse into the first error, if any.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(ConfigError::InvalidValue {
                field: err.path,
                message: err.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_server(config, &mut result);
        Self::validate_browser(config, &mut result);
        Self::validate_site(config, &mut result);
        Self::validate_registration(config, &mut result);
        Self::validate_chain(config, &mut result);
        Self::validate_notification(config, &mut result);

        Ok(result)
    }

    fn validate_server(config: &Config, result: &mut ValidationResult) {
        if config.server.port == 0 {
            result.add_error(ValidationError::new("server.port", "Port cannot be 0"));
        }

        if config.server.host.is_empty() {
            result.add_error(ValidationError::new("server.host", "Host cannot be empty"));
        }
    }

    fn validate_browser(config: &Config, result: &mut ValidationResult) {
        let browser = &config.browser;
        if browser.window_width == 0 || browser.window_height == 0 {
            result.add_error(ValidationError::new(
                "browser.window_width",
                "Window size must be non-zero",
            ));
        }

        if browser.command_timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "browser.command_timeout_secs",
                "command_timeout_secs must be greater than 0",
            ));
        }

        if let Some(ref path) = browser.chrome_path {
            if !path.exists() {
                result.add_warning(ValidationWarning::new(
                    "browser.chrome_path",
                    format!("Chrome executable does not exist: {:?}", path),
                ));
            }
        }

        if !browser.headless {
            result.add_warning(ValidationWarning::new(
                "browser.headless",
                "Headed mode needs a display server",
            ));
        }
    }

    fn validate_site(config: &Config, result: &mut ValidationResult) {
        let site = &config.site;
        for (path, url) in [
            ("site.base_url", &site.base_url),
            ("site.playlist_url", &site.playlist_url),
        ] {
            if !is_http_url(url) {
                result.add_error(ValidationError::new(
                    path,
                    "URL must start with http:// or https://",
                ));
            }
        }

        if !site.watch_url_template.contains("{id}") {
            result.add_error(ValidationError::new(
                "site.watch_url_template",
                "watch_url_template must contain {id}",
            ));
        }
    }

    fn validate_registration(config: &Config, result: &mut ValidationResult) {
        let registration = &config.registration;
        if registration.max_workers == 0 {
            result.add_error(ValidationError::new(
                "registration.max_workers",
                "max_workers must be greater than 0",
            ));
        }

        if registration.max_workers > 10 {
            result.add_warning(ValidationWarning::new(
                "registration.max_workers",
                "max_workers is very high (>10), every worker runs its own Chrome",
            ));
        }

        if registration.max_retries == 0 {
            result.add_error(ValidationError::new(
                "registration.max_retries",
                "max_retries must be greater than 0",
            ));
        }

        if registration.element_timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "registration.element_timeout_secs",
                "element_timeout_secs must be greater than 0",
            ));
        }

        if registration.clear_timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "registration.clear_timeout_secs",
                "clear_timeout_secs must be greater than 0",
            ));
        }
    }

    fn validate_chain(config: &Config, result: &mut ValidationResult) {
        if config.chain.batch_size == 0 {
            result.add_error(ValidationError::new(
                "chain.batch_size",
                "batch_size must be greater than 0",
            ));
        }

        match config.chain.endpoint {
            Some(ref url) if !is_http_url(url) => {
                result.add_error(ValidationError::new(
                    "chain.endpoint",
                    "endpoint must start with http:// or https://",
                ));
            }
            None => {
                result.add_warning(ValidationWarning::new(
                    "chain.endpoint",
                    "Chain endpoint not set, chain_register requests cannot continue",
                ));
            }
            _ => {}
        }
    }

    fn validate_notification(config: &Config, result: &mut ValidationResult) {
        if let Some(ref url) = config.notification.endpoint {
            if !is_http_url(url) {
                result.add_error(ValidationError::new(
                    "notification.endpoint",
                    "endpoint must start with http:// or https://",
                ));
            }
        }
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
