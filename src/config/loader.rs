use std::{fs, path::Path};

use anyhow::{Context, Result};
use config::{Config, Environment};
use log::info;

use super::ServiceConfig;

const ENV_PREFIX: &str = "HTTP_SERVICE";

pub fn get_default_config() -> &'static str {
    include_str!("../../resources/default_config.toml")
}

/// Loads the service configuration from `path`, layered under environment
/// variables prefixed `HTTP_SERVICE_` (e.g. `HTTP_SERVICE_ROOT_URL`).
///
/// A default configuration file is written to `path` first if none exists.
///
/// This is opt-in plumbing for host applications. [`Service::new`] never
/// reads the environment or touches the filesystem; only
/// [`Service::from_config`] consumes what this returns.
///
/// [`Service::new`]: crate::http::Service::new
/// [`Service::from_config`]: crate::http::Service::from_config
pub fn load_configuration(path: &Path) -> Result<ServiceConfig> {
    if !path.exists() {
        write_config_to(path, get_default_config()).context("Could not create default config")?;
        info!(path:% = path.display(); "Created new configuration file");
    }

    let filename = path.to_str().context("Invalid config file path")?;

    let cfg = Config::builder()
        .add_source(config::File::with_name(filename))
        .add_source(Environment::with_prefix(ENV_PREFIX).prefix_separator("_").separator("__"))
        .build()
        .context("Could not build service config")?;

    cfg.try_deserialize().context("Invalid service configuration")
}

/// Writes `source` to `path`, creating missing parent directories. The file
/// always ends with a newline.
pub fn write_config_to(path: &Path, source: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let mut contents = source.to_string();
    if !contents.ends_with('\n') {
        contents.push('\n');
    }
    fs::write(path, contents).with_context(|| format!("Failed to write config to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use serial_test::serial;
    use tempfile::tempdir;

    use super::*;

    #[test]
    #[serial]
    fn test_missing_file_is_created_with_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = load_configuration(&path).unwrap();

        assert!(path.exists());
        assert_eq!(config.root_url, "http://localhost:8080");
        assert_eq!(config.user_agent, "http-service/0.1.0");
    }

    #[test]
    #[serial]
    fn test_existing_file_is_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        write_config_to(&path, "root_url = \"https://api.example.com\"").unwrap();

        let config = load_configuration(&path).unwrap();

        assert_eq!(config.root_url, "https://api.example.com");
        assert_eq!(config.user_agent, ServiceConfig::default().user_agent);
    }

    #[test]
    #[serial]
    fn test_environment_overrides_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        write_config_to(&path, "root_url = \"http://from-file\"").unwrap();

        // SAFETY: serialised with every other test touching the environment.
        unsafe { std::env::set_var("HTTP_SERVICE_ROOT_URL", "https://from-env.example.com") };
        let result = load_configuration(&path);
        unsafe { std::env::remove_var("HTTP_SERVICE_ROOT_URL") };

        assert_eq!(result.unwrap().root_url, "https://from-env.example.com");
    }

    #[test]
    fn test_written_config_ends_with_single_newline() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        write_config_to(&path, "root_url = \"http://a\"").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "root_url = \"http://a\"\n");

        write_config_to(&path, get_default_config()).unwrap();
        assert!(!fs::read_to_string(&path).unwrap().ends_with("\n\n"));
    }

    #[test]
    #[serial]
    fn test_malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        write_config_to(&path, "root_url = ").unwrap();

        assert!(load_configuration(&path).is_err());
    }
}
