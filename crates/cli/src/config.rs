//! CLI configuration utilities

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use steamlite_core::ClientConfig;

/// Command-line flags that take precedence over file and environment
#[derive(Debug, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub data_dir: Option<PathBuf>,
}

/// Load the client configuration and apply flag overrides
pub fn load(path: Option<&Path>, overrides: Overrides) -> Result<ClientConfig> {
    let config = match path {
        Some(path) => ClientConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => ClientConfig::from_env().context("Failed to load configuration")?,
    };

    let config = apply(config, overrides);
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn apply(mut config: ClientConfig, overrides: Overrides) -> ClientConfig {
    if let Some(base_url) = overrides.base_url {
        config.base_url = base_url;
    }
    if let Some(timeout) = overrides.timeout_secs {
        config.timeout_secs = timeout;
    }
    if let Some(dir) = overrides.data_dir {
        config.storage.dir = Some(dir.join("session"));
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_overrides_win() {
        let config = apply(
            ClientConfig::default(),
            Overrides {
                base_url: Some("http://shop.test".to_string()),
                timeout_secs: Some(3),
                data_dir: Some(PathBuf::from("/tmp/steamlite")),
            },
        );

        assert_eq!(config.base_url, "http://shop.test");
        assert_eq!(config.timeout_secs, 3);
        assert_eq!(
            config.storage.resolved_dir(),
            PathBuf::from("/tmp/steamlite/session")
        );
    }

    #[test]
    fn test_no_overrides_keeps_config() {
        let config = apply(ClientConfig::default(), Overrides::default());
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_load_file_then_override() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "base_url = \"http://from-file.test\"\ntimeout_secs = 20").unwrap();

        let config = load(
            Some(file.path()),
            Overrides {
                timeout_secs: Some(4),
                ..Overrides::default()
            },
        )
        .unwrap();

        assert_eq!(config.base_url, "http://from-file.test");
        assert_eq!(config.timeout_secs, 4);
    }

    #[test]
    fn test_override_repairs_invalid_file_value() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "timeout_secs = 0").unwrap();

        let config = load(
            Some(file.path()),
            Overrides {
                timeout_secs: Some(5),
                ..Overrides::default()
            },
        )
        .unwrap();
        assert_eq!(config.timeout_secs, 5);

        assert!(load(Some(file.path()), Overrides::default()).is_err());
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let result = load(
            None,
            Overrides {
                timeout_secs: Some(0),
                ..Overrides::default()
            },
        );
        assert!(result.is_err());
    }
}
