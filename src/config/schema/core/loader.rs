use super::Config;
use anyhow::{Context, Result};
use directories::UserDirs;
use std::fs;
use std::path::Path;

impl Config {
    pub fn load_or_init() -> Result<Self> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .context("Could not find home directory")?;
        let gate_dir = home.join(".oracle-gate");

        if !gate_dir.exists() {
            fs::create_dir_all(&gate_dir).context("Failed to create .oracle-gate directory")?;
        }

        Self::load_or_init_at(&gate_dir.join("config.toml"))
    }

    /// Load `config_path`, writing a default file there first when it is missing.
    pub fn load_or_init_at(config_path: &Path) -> Result<Self> {
        let mut config = if config_path.exists() {
            let contents =
                fs::read_to_string(config_path).context("Failed to read config file")?;
            let mut config: Config =
                toml::from_str(&contents).context("Failed to parse config file")?;
            config.config_path = config_path.to_path_buf();
            config
        } else {
            let config = Self {
                config_path: config_path.to_path_buf(),
                ..Self::default()
            };
            config.save()?;
            config
        };

        config.apply_env_overrides();
        config.validate().context("Invalid oracle-gate configuration")?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&self.config_path, toml_str).context("Failed to write config file")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_env::{ENV_LOCK, EnvVarGuard};
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_created_with_defaults() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _endpoint = EnvVarGuard::unset("ORACLE_GATE_ENDPOINT");
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let config = Config::load_or_init_at(&path).unwrap();

        assert!(path.exists());
        assert_eq!(config.config_path, path);
        assert_eq!(config.oracle.endpoint, "ws://localhost:5002");
    }

    #[test]
    fn existing_file_is_loaded() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _endpoint = EnvVarGuard::unset("ORACLE_GATE_ENDPOINT");
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[oracle]\nendpoint = \"ws://127.0.0.1:6000\"\n\n[gate]\nerror_action = \"utter_stop\"\n",
        )
        .unwrap();

        let config = Config::load_or_init_at(&path).unwrap();

        assert_eq!(config.oracle.endpoint, "ws://127.0.0.1:6000");
        assert_eq!(config.gate.error_action, "utter_stop");
        assert_eq!(config.gate.listen_action, "action_listen");
    }

    #[test]
    fn invalid_file_is_rejected_at_load() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _endpoint = EnvVarGuard::unset("ORACLE_GATE_ENDPOINT");
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[oracle]\nendpoint = \"tcp://127.0.0.1:6000\"\n").unwrap();

        let err = Config::load_or_init_at(&path).unwrap_err();
        assert!(format!("{err:#}").contains("ws or wss"));
    }

    #[test]
    fn malformed_toml_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[oracle\nendpoint = ").unwrap();

        let err = Config::load_or_init_at(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
