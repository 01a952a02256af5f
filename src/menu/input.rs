// Menu input handling

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use std::io;
use std::time::Duration;

use super::state::{MenuItem, MenuState};
use crate::game::session::MatchSettings;

/// Menu action result
#[derive(Debug, PartialEq)]
pub enum MenuAction {
    /// Continue in menu
    None,
    /// Start a match with these settings
    StartGame(MatchSettings),
    /// Exit application
    Quit,
}

/// Handle menu input and return the next action
pub fn handle_menu_input(menu_state: &mut MenuState) -> Result<MenuAction, io::Error> {
    if event::poll(Duration::from_millis(100))? {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(handle_key_press(menu_state, key.code));
            }
        }
    }

    Ok(MenuAction::None)
}

pub fn handle_key_press(menu_state: &mut MenuState, key_code: KeyCode) -> MenuAction {
    match key_code {
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') => {
            menu_state.select_previous();
            MenuAction::None
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') => {
            menu_state.select_next();
            MenuAction::None
        }
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') => {
            menu_state.cycle(false);
            MenuAction::None
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') => {
            menu_state.cycle(true);
            MenuAction::None
        }
        KeyCode::Enter | KeyCode::Char(' ') => handle_menu_selection(menu_state),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => MenuAction::Quit,
        _ => MenuAction::None,
    }
}

fn handle_menu_selection(menu_state: &mut MenuState) -> MenuAction {
    match menu_state.selected_item() {
        MenuItem::Play(mode) => {
            menu_state.message = None;
            MenuAction::StartGame(menu_state.settings_for(mode))
        }
        MenuItem::Difficulty | MenuItem::Map => {
            menu_state.cycle(true);
            MenuAction::None
        }
        MenuItem::Quit => MenuAction::Quit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::GameMode;

    #[test]
    fn test_enter_starts_selected_mode() {
        let mut menu = MenuState::default();
        menu.message = Some("old error".to_string());
        handle_key_press(&mut menu, KeyCode::Down);

        match handle_key_press(&mut menu, KeyCode::Enter) {
            MenuAction::StartGame(settings) => assert_eq!(settings.mode, GameMode::TwoPlayers),
            other => panic!("unexpected action {:?}", other),
        }
        assert!(menu.message.is_none());
    }

    #[test]
    fn test_quit_keys() {
        let mut menu = MenuState::default();
        assert_eq!(handle_key_press(&mut menu, KeyCode::Esc), MenuAction::Quit);
        assert_eq!(handle_key_press(&mut menu, KeyCode::Char('q')), MenuAction::Quit);
    }
}
