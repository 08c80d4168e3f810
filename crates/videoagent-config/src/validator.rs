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

    /// Convert the first error into a `ConfigError`, if any.
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

/// Ten years.
const MAX_AGE_HOURS_LIMIT: u64 = 24 * 365 * 10;

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_server(config, &mut result);
        Self::validate_flow(config, &mut result);
        Self::validate_browser(config, &mut result);

        result
    }

    fn validate_server(config: &Config, result: &mut ValidationResult) {
        if config.server.port == 0 {
            result.add_error(ValidationError::new("server.port", "Port cannot be 0"));
        }

        if config.server.host.is_empty() {
            result.add_error(ValidationError::new("server.host", "Host cannot be empty"));
        }
    }

    fn validate_flow(config: &Config, result: &mut ValidationResult) {
        let flow = &config.flow;

        if flow.max_concurrent == 0 {
            result.add_error(ValidationError::new(
                "flow.max_concurrent",
                "max_concurrent must be greater than 0",
            ));
        }

        if flow.max_concurrent > 10 {
            result.add_warning(ValidationWarning::new(
                "flow.max_concurrent",
                "more than 10 concurrent browser sessions tend to interfere with each other",
            ));
        }

        if flow.poll_interval_secs == 0 {
            result.add_error(ValidationError::new(
                "flow.poll_interval_secs",
                "poll_interval_secs must be greater than 0",
            ));
        }

        if flow.cleanup_interval_secs == 0 || flow.cleanup_retry_secs == 0 {
            result.add_error(ValidationError::new(
                "flow.cleanup_interval_secs",
                "cleanup intervals must be greater than 0",
            ));
        }

        if flow.max_age_hours == 0 || flow.max_age_hours > MAX_AGE_HOURS_LIMIT {
            result.add_error(ValidationError::new(
                "flow.max_age_hours",
                format!("max_age_hours must be between 1 and {}", MAX_AGE_HOURS_LIMIT),
            ));
        }

        if flow.history_capacity == 0 {
            result.add_error(ValidationError::new(
                "flow.history_capacity",
                "history_capacity must be greater than 0",
            ));
        }

        if flow.summary_history > flow.history_capacity {
            result.add_warning(ValidationWarning::new(
                "flow.summary_history",
                "summary_history exceeds history_capacity and will be capped",
            ));
        }
    }

    fn validate_browser(config: &Config, result: &mut ValidationResult) {
        let browser = &config.browser;

        if browser.scan_port_start > browser.scan_port_end {
            result.add_error(ValidationError::new(
                "browser.scan_port_start",
                "scan_port_start must not exceed scan_port_end",
            ));
        }

        if let Some(ref url) = browser.flow_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                result.add_error(ValidationError::new(
                    "browser.flow_url",
                    "flow_url must start with http:// or https://",
                ));
            }
        }

        if browser.tab_keywords.is_empty() && browser.flow_url.is_none() {
            result.add_warning(ValidationWarning::new(
                "browser.tab_keywords",
                "no tab keywords and no flow_url: jobs without a target URL cannot find a page",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
