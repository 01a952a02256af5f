// Menu state: mode selection plus the settings fixed at match start

use crate::ai::Difficulty;
use crate::game::map::MapConfig;
use crate::game::session::MatchSettings;
use crate::game::state::{Customization, GameMode};

/// Menu rows
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MenuItem {
    Play(GameMode),
    /// Cycles the AI difficulty
    Difficulty,
    /// Cycles the obstacle map
    Map,
    Quit,
}

impl MenuItem {
    /// Get display text for menu item (settings rows show their current value)
    pub fn display_text(&self, state: &MenuState) -> String {
        match self {
            MenuItem::Play(mode) => mode.display_name().to_string(),
            MenuItem::Difficulty => format!("AI Difficulty: < {} >", state.difficulty.display_name()),
            MenuItem::Map => format!("Map: < {} >", state.map_name()),
            MenuItem::Quit => "Quit".to_string(),
        }
    }

    /// Get all menu items in order
    pub fn all() -> Vec<MenuItem> {
        vec![
            MenuItem::Play(GameMode::OnePlayer),
            MenuItem::Play(GameMode::TwoPlayers),
            MenuItem::Play(GameMode::FourPlayers),
            MenuItem::Play(GameMode::Tournament),
            MenuItem::Difficulty,
            MenuItem::Map,
            MenuItem::Quit,
        ]
    }
}

/// Menu state
pub struct MenuState {
    /// Currently selected menu item index
    pub selected_index: usize,
    /// All menu items
    pub items: Vec<MenuItem>,
    pub difficulty: Difficulty,
    /// Built-in map names followed by custom ones
    pub maps: Vec<String>,
    pub map_index: usize,
    /// Last error or notice, shown under the menu
    pub message: Option<String>,
    /// Ball and paddle overrides applied to every match started from here
    pub custom: Customization,
}

impl MenuState {
    pub fn new(difficulty: Difficulty, custom_maps: &[MapConfig]) -> Self {
        let mut maps: Vec<String> = MapConfig::builtin_names().iter().map(|s| s.to_string()).collect();
        for map in custom_maps {
            if !maps.contains(&map.name) {
                maps.push(map.name.clone());
            }
        }

        Self {
            selected_index: 0,
            items: MenuItem::all(),
            difficulty,
            maps,
            map_index: 0,
            message: None,
            custom: Customization::default(),
        }
    }

    /// Get currently selected menu item
    pub fn selected_item(&self) -> MenuItem {
        self.items[self.selected_index]
    }

    /// Move selection up
    pub fn select_previous(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        } else {
            self.selected_index = self.items.len() - 1;
        }
    }

    /// Move selection down
    pub fn select_next(&mut self) {
        if self.selected_index < self.items.len() - 1 {
            self.selected_index += 1;
        } else {
            self.selected_index = 0;
        }
    }

    /// Step the selected settings row forward or backward
    pub fn cycle(&mut self, forward: bool) {
        match self.selected_item() {
            MenuItem::Difficulty => {
                let all = Difficulty::all();
                let i = all.iter().position(|d| *d == self.difficulty).unwrap_or(0);
                self.difficulty = all[step(i, all.len(), forward)];
            }
            MenuItem::Map => {
                self.map_index = step(self.map_index, self.maps.len(), forward);
            }
            _ => {}
        }
    }

    pub fn map_name(&self) -> &str {
        self.maps.get(self.map_index).map_or("classic", |s| s.as_str())
    }

    /// Select a map by name if it is known
    pub fn select_map(&mut self, name: &str) -> bool {
        match self.maps.iter().position(|m| m == name) {
            Some(i) => {
                self.map_index = i;
                true
            }
            None => false,
        }
    }

    pub fn settings_for(&self, mode: GameMode) -> MatchSettings {
        MatchSettings {
            difficulty: self.difficulty,
            map: self.map_name().to_string(),
            custom: self.custom,
            ..MatchSettings::new(mode)
        }
    }
}

fn step(index: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if forward {
        (index + 1) % len
    } else {
        (index + len - 1) % len
    }
}

impl Default for MenuState {
    fn default() -> Self {
        Self::new(Difficulty::Medium, &[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_wraps() {
        let mut menu = MenuState::default();
        menu.select_previous();
        assert_eq!(menu.selected_item(), MenuItem::Quit);
        menu.select_next();
        assert_eq!(menu.selected_item(), MenuItem::Play(GameMode::OnePlayer));
    }

    #[test]
    fn test_cycle_difficulty_and_map() {
        let mut menu = MenuState::default();
        menu.selected_index = menu.items.iter().position(|i| *i == MenuItem::Difficulty).unwrap();
        menu.cycle(true);
        assert_eq!(menu.difficulty, Difficulty::Hard);
        menu.cycle(false);
        menu.cycle(false);
        assert_eq!(menu.difficulty, Difficulty::Easy);

        menu.select_next();
        menu.cycle(false);
        assert_eq!(menu.map_name(), "mixed");
    }

    #[test]
    fn test_custom_maps_listed_after_builtins() {
        let custom = vec![MapConfig {
            name: "arena".to_string(),
            obstacles: Vec::new(),
        }];
        let mut menu = MenuState::new(Difficulty::Easy, &custom);
        assert!(menu.select_map("arena"));
        assert_eq!(menu.map_index, MapConfig::builtin_names().len());

        let settings = menu.settings_for(GameMode::TwoPlayers);
        assert_eq!(settings.map, "arena");
        assert_eq!(settings.difficulty, Difficulty::Easy);
    }

    #[test]
    fn test_overrides_carried_into_settings() {
        let mut menu = MenuState::default();
        menu.custom.ball_radius = Some(12.0);
        menu.custom.paddle_speed = Some(9.5);

        let settings = menu.settings_for(GameMode::OnePlayer);
        assert_eq!(settings.custom.ball_radius, Some(12.0));
        assert_eq!(settings.custom.paddle_speed, Some(9.5));
        assert_eq!(settings.custom.ball_speed, None);
    }
}
