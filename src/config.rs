use crate::logging;
use crate::settings::{CfgDefaultKeymaps, Settings};
use eyre::Result;
use std::{fs, path::PathBuf};

#[derive(Debug, Clone)]
pub struct Config {
    pub settings: Settings,
    pub keymap: CfgDefaultKeymaps,
    filepath: PathBuf,
}

impl Config {
    /// Load `configuration.json` from the app data directory, writing the
    /// defaults there on first run.
    pub fn new() -> Result<Self> {
        let prefix = get_app_data_prefix()?;
        let filepath = prefix.join("configuration.json");
        if !filepath.exists() {
            let config = Self::with_settings(Settings::default(), CfgDefaultKeymaps::default(), filepath);
            config.save()?;
            return Ok(config);
        }
        Self::load_from(filepath)
    }

    /// Load configuration from a custom path. Missing files and unreadable
    /// JSON yield the defaults; missing fields take their default values.
    pub fn load_from(filepath: PathBuf) -> Result<Self> {
        let mut settings = Settings::default();
        let mut keymap = CfgDefaultKeymaps::default();

        if filepath.exists() {
            let config_str = fs::read_to_string(&filepath)?;
            match serde_json::from_str::<serde_json::Value>(&config_str) {
                Ok(user_config) => {
                    if let Some(value) = user_config.get("Setting") {
                        match serde_json::from_value(value.clone()) {
                            Ok(user_settings) => settings = user_settings,
                            Err(err) => logging::warn(format!(
                                "Ignoring invalid Setting section in {}: {}",
                                filepath.display(),
                                err
                            )),
                        }
                    }
                    if let Some(value) = user_config.get("Keymap") {
                        match serde_json::from_value(value.clone()) {
                            Ok(user_keymap) => keymap = user_keymap,
                            Err(err) => logging::warn(format!(
                                "Ignoring invalid Keymap section in {}: {}",
                                filepath.display(),
                                err
                            )),
                        }
                    }
                }
                Err(err) => logging::warn(format!(
                    "Could not parse {}: {}; using defaults",
                    filepath.display(),
                    err
                )),
            }
        }

        Ok(Self::with_settings(settings, keymap, filepath))
    }

    pub fn with_settings(settings: Settings, keymap: CfgDefaultKeymaps, filepath: PathBuf) -> Self {
        Self {
            settings,
            keymap,
            filepath,
        }
    }

    pub fn filepath(&self) -> &PathBuf {
        &self.filepath
    }

    pub fn save(&self) -> Result<()> {
        let config_json = serde_json::json!({
            "Setting": self.settings,
            "Keymap": self.keymap,
        });

        let config_str = serde_json::to_string_pretty(&config_json)?;

        if let Some(parent) = self.filepath.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&self.filepath, config_str)?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::with_settings(
            Settings::default(),
            CfgDefaultKeymaps::default(),
            PathBuf::from("configuration.json"),
        )
    }
}

pub fn get_app_data_prefix() -> Result<PathBuf> {
    if let Some(config_home) = std::env::var_os("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(config_home).join("scrollmark"));
    } else if let Some(home) = std::env::var_os("HOME") {
        let path = PathBuf::from(home.clone()).join(".config").join("scrollmark");
        if path.exists() {
            return Ok(path);
        } else {
            return Ok(PathBuf::from(home).join(".scrollmark"));
        }
    } else if let Some(user_profile) = std::env::var_os("USERPROFILE") {
        return Ok(PathBuf::from(user_profile).join(".scrollmark"));
    }

    Err(eyre::eyre!("Could not determine application data directory"))
}
