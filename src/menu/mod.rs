// Menu module for Arcade Pong
// Handles main menu UI, navigation, and match settings selection

pub mod input;
pub mod render;
pub mod state;

pub use input::{handle_key_press, handle_menu_input, MenuAction};
pub use render::render_menu;
pub use state::{MenuItem, MenuState};
