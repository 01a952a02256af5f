// Configuration file loading and creation

use super::types::Config;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Directory holding config.toml and profile.json
pub fn get_config_dir() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("arcade-pong");

    // Create config directory if it doesn't exist
    fs::create_dir_all(&path).ok();

    path
}

/// Get the path to the configuration file
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.toml")
}

/// Load configuration from file, or create default if it doesn't exist
pub fn load_config() -> Result<Config, io::Error> {
    load_config_from(&get_config_path())
}

/// Load configuration from an explicit path
pub fn load_config_from(config_path: &Path) -> Result<Config, io::Error> {
    if config_path.exists() {
        let contents = fs::read_to_string(config_path)?;
        Ok(parse_config(&contents))
    } else {
        create_default_config(config_path)?;
        Ok(Config::default())
    }
}

/// Parse TOML contents, falling back to defaults on error
pub fn parse_config(contents: &str) -> Config {
    match toml::from_str(contents) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Failed to parse config file, using defaults: {}", e);
            Config::default()
        }
    }
}

/// Create a default configuration file with helpful comments
pub fn create_default_config(path: &Path) -> Result<(), io::Error> {
    let config = Config::default();
    let toml_string = toml::to_string_pretty(&config).map_err(io::Error::other)?;

    let commented_toml = format!(
        "# Arcade Pong Configuration File\n\
         # Edit this file to customize game behavior\n\
         # Changes take effect at the start of the next match\n\
         #\n\
         # Key binding format: \"Up\", \"Down\", \"Left\", \"Right\", \"Enter\", \"Space\", \"Esc\"\n\
         #                     or single characters like \"W\", \"S\", \"Q\", etc.\n\
         #\n\
         # Speeds are in field units per tick (one tick per frame)\n\
         # AI difficulties: \"easy\", \"medium\", \"hard\", \"expert\"\n\
         #\n\
         # Custom maps:\n\
         #   [[maps]]\n\
         #   name = \"my-map\"\n\
         #   [[maps.obstacles]]\n\
         #   shape = \"circle\"\n\
         #   center = [400.0, 200.0]\n\
         #   radius = 30.0\n\n\
         {}",
        toml_string
    );

    fs::write(path, commented_toml)?;
    tracing::info!("Created default config file at: {}", path.display());
    Ok(())
}
