// Configuration module for Arcade Pong
// Handles loading and managing game configuration from TOML file

pub mod loader;
pub mod types;

pub use loader::{
    create_default_config, get_config_dir, get_config_path, load_config, load_config_from,
    parse_config,
};
pub use types::{
    AiConfig, Config, DifficultyLevel, DifficultyTable, DisplayConfig, FieldConfig, KeyBindings,
    PhysicsConfig, ProfileConfig, TournamentConfig,
};
