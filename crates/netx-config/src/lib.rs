//! Configuration loading and CLI definitions.
//!
//! A netx config file has three optional sections, each falling back to
//! the defaults in `netx_core::defaults`:
//!
//! ```toml
//! [dialer]
//! connect_timeout_secs = 10
//!
//! [classifier]
//! extra_redactions = ["(?i)token=[^&\\s]+"]
//!
//! [logging]
//! level = "debug"
//! ```

mod cli;
mod defaults;
mod loader;
mod types;
mod validate;

use serde::{Deserialize, Serialize};

pub use cli::{CliOverrides, apply_overrides};
pub use loader::{ConfigError, ConfigFormat, load_config};
pub use types::{ClassifierConfig, LoggingConfig, TcpDialerConfig};
pub use validate::validate_config;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub dialer: TcpDialerConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_temp(ext: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(&format!(".{ext}"))
            .tempfile()
            .unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn load_toml() {
        let file = write_temp(
            "toml",
            r#"
[dialer]
connect_timeout_secs = 5
keepalive_secs = 30

[classifier]
placeholder = "<x>"

[logging]
level = "debug"
"#,
        );
        let cfg = load_config(file.path()).unwrap();
        assert_eq!(cfg.dialer.connect_timeout_secs, 5);
        assert_eq!(cfg.dialer.keepalive_secs, 30);
        assert!(cfg.dialer.no_delay);
        assert_eq!(cfg.classifier.placeholder, "<x>");
        assert_eq!(cfg.logging.level.as_deref(), Some("debug"));
        validate_config(&cfg).unwrap();
    }

    #[test]
    fn load_jsonc_with_comments() {
        let file = write_temp(
            "jsonc",
            r#"{
  // dialer section
  "dialer": { "no_delay": false },
  /* classifier */
  "classifier": { "extra_redactions": ["secret-[0-9]+"] }
}"#,
        );
        let cfg = load_config(file.path()).unwrap();
        assert!(!cfg.dialer.no_delay);
        assert_eq!(cfg.classifier.extra_redactions, vec!["secret-[0-9]+"]);
    }

    #[test]
    fn load_yaml() {
        let file = write_temp(
            "yaml",
            "classifier:\n  max_message_bytes: 512\nlogging:\n  format: json\n",
        );
        let cfg = load_config(file.path()).unwrap();
        assert_eq!(cfg.classifier.max_message_bytes, 512);
        assert_eq!(cfg.logging.format.as_deref(), Some("json"));
        assert_eq!(cfg.dialer, TcpDialerConfig::default());
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let file = write_temp("toml", "");
        assert_eq!(load_config(file.path()).unwrap(), Config::default());
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let file = write_temp("ini", "");
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(&err, ConfigError::UnsupportedFormat(ext) if ext == "ini"));
        assert!(err.to_string().contains("\"ini\""));
    }

    #[test]
    fn extension_is_case_insensitive() {
        let file = write_temp("YML", "dialer:\n  no_delay: false\n");
        assert!(!load_config(file.path()).unwrap().dialer.no_delay);
    }

    #[test]
    fn empty_yaml_is_all_defaults() {
        let file = write_temp("yaml", "\n");
        assert_eq!(load_config(file.path()).unwrap(), Config::default());
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = load_config("/nonexistent/netx-config.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/netx-config.toml"));
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut cfg = Config::default();
        cfg.classifier.max_message_bytes = 1;
        assert!(matches!(
            validate_config(&cfg),
            Err(ConfigError::Validation(_))
        ));

        let mut cfg = Config::default();
        cfg.classifier.extra_redactions = vec!["(unclosed".into()];
        assert!(validate_config(&cfg).is_err());

        let mut cfg = Config::default();
        cfg.classifier.placeholder.clear();
        assert!(validate_config(&cfg).is_err());

        let mut cfg = Config::default();
        cfg.logging.format = Some("xml".into());
        assert!(validate_config(&cfg).is_err());

        let mut cfg = Config::default();
        cfg.logging.level = Some("WARN".into());
        validate_config(&cfg).unwrap();
    }

    #[test]
    fn overrides_apply() {
        let mut cfg = Config::default();
        cfg.classifier.extra_redactions = vec!["a".into()];
        let overrides = CliOverrides {
            connect_timeout_secs: Some(0),
            tcp_no_delay: Some(false),
            redact: Some(vec!["b".into()]),
            log_level: Some("trace".into()),
            ..CliOverrides::default()
        };
        apply_overrides(&mut cfg, &overrides);
        assert_eq!(cfg.dialer.connect_timeout(), None);
        assert!(!cfg.dialer.no_delay);
        assert_eq!(cfg.classifier.extra_redactions, vec!["a", "b"]);
        assert_eq!(cfg.logging.level.as_deref(), Some("trace"));
    }

    #[test]
    fn overrides_parse_from_args() {
        use clap::Parser;
        let overrides = CliOverrides::parse_from([
            "netx",
            "--max-message-bytes",
            "128",
            "--redact",
            "x=[0-9]+,y=[a-z]+",
        ]);
        assert_eq!(overrides.max_message_bytes, Some(128));
        assert_eq!(overrides.redact.unwrap().len(), 2);
    }
}
