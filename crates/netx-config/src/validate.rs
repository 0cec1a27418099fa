//! Configuration validation logic.

use crate::Config;
use crate::defaults::{max_message_bytes, min_message_bytes};
use crate::loader::ConfigError;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: [&str; 3] = ["json", "pretty", "compact"];
const LOG_OUTPUTS: [&str; 2] = ["stdout", "stderr"];

pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let classifier = &config.classifier;
    if classifier.max_message_bytes < min_message_bytes()
        || classifier.max_message_bytes > max_message_bytes()
    {
        return Err(ConfigError::Validation(format!(
            "classifier.max_message_bytes must be {}..={}",
            min_message_bytes(),
            max_message_bytes()
        )));
    }
    if classifier.placeholder.is_empty() {
        return Err(ConfigError::Validation(
            "classifier.placeholder is empty".into(),
        ));
    }
    for (i, pattern) in classifier.extra_redactions.iter().enumerate() {
        if let Err(e) = regex::Regex::new(pattern) {
            return Err(ConfigError::Validation(format!(
                "classifier.extra_redactions[{i}] is not a valid regex: {e}"
            )));
        }
    }

    let logging = &config.logging;
    if let Some(level) = &logging.level
        && !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str())
    {
        return Err(ConfigError::Validation(format!(
            "logging.level must be one of: {:?}",
            LOG_LEVELS
        )));
    }
    if let Some(format) = &logging.format
        && !LOG_FORMATS.contains(&format.to_ascii_lowercase().as_str())
    {
        return Err(ConfigError::Validation(format!(
            "logging.format must be one of: {:?}",
            LOG_FORMATS
        )));
    }
    if let Some(output) = &logging.output
        && !LOG_OUTPUTS.contains(&output.to_ascii_lowercase().as_str())
    {
        return Err(ConfigError::Validation(format!(
            "logging.output must be one of: {:?}",
            LOG_OUTPUTS
        )));
    }
    Ok(())
}
