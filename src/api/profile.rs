// Local player profile, stored as JSON next to the config file

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::types::{PlayerId, UpdateMatchResponse};
use crate::config::get_config_dir;

/// The signed-in player's local session state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Required for every recorded match
    #[serde(default)]
    pub user_id: Option<PlayerId>,
    #[serde(default)]
    pub name: String,
    /// Last rating the match API reported for this player
    #[serde(default)]
    pub rating: Option<u32>,
}

impl Profile {
    pub fn new(user_id: PlayerId, name: &str) -> Self {
        Self {
            user_id: Some(user_id),
            name: name.to_string(),
            rating: None,
        }
    }

    pub fn default_path() -> PathBuf {
        get_config_dir().join("profile.json")
    }

    /// Read the profile; a missing file is an empty (signed-out) profile
    pub fn load_from(path: &Path) -> io::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
    }

    /// Store this player's new rating from a finished match, if the response carries one
    pub fn apply_ratings(&mut self, response: &UpdateMatchResponse) -> bool {
        let Some(user_id) = self.user_id else {
            return false;
        };
        match response.players().find(|p| p.id == user_id) {
            Some(player) => {
                tracing::info!(user = %user_id, old = ?self.rating, new = player.elo, "rating updated");
                self.rating = Some(player.elo);
                true
            }
            None => false,
        }
    }
}
