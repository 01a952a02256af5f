// Held-key state for the match, plus terminal key polling
//
// Terminals without the kitty keyboard protocol only report presses (and
// auto-repeats), so a control counts as held until a release arrives or no
// press/repeat has been seen for HOLD_TIMEOUT_MS.

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use std::collections::{HashMap, HashSet};
use std::io;
use std::time::Duration;

use super::state::Slot;
use crate::config::KeyBindings;

/// How long a key stays held after its last press or repeat
pub const HOLD_TIMEOUT_MS: u64 = 300;

/// Paddle controls, two per slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    P1Up,
    P1Down,
    P2Up,
    P2Down,
    P3Left,
    P3Right,
    P4Left,
    P4Right,
}

impl Control {
    pub fn slot(self) -> Slot {
        match self {
            Control::P1Up | Control::P1Down => Slot::Left,
            Control::P2Up | Control::P2Down => Slot::Right,
            Control::P3Left | Control::P3Right => Slot::Top,
            Control::P4Left | Control::P4Right => Slot::Bottom,
        }
    }

    /// Sign along the slot's lateral axis (screen Y grows downward)
    fn direction(self) -> f32 {
        match self {
            Control::P1Up | Control::P2Up | Control::P3Left | Control::P4Left => -1.0,
            Control::P1Down | Control::P2Down | Control::P3Right | Control::P4Right => 1.0,
        }
    }
}

/// Non-paddle keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Rematch,
    Quit,
}

/// Set of controls held this tick. Written by the poller, read by the session.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct InputState {
    held: HashSet<Control>,
}

impl InputState {
    pub fn press(&mut self, control: Control) {
        self.held.insert(control);
    }

    pub fn release(&mut self, control: Control) {
        self.held.remove(&control);
    }

    pub fn clear(&mut self) {
        self.held.clear();
    }

    pub fn is_held(&self, control: Control) -> bool {
        self.held.contains(&control)
    }

    /// -1, 0 or 1 along the slot's lateral axis; opposite keys cancel out
    pub fn axis(&self, slot: Slot) -> f32 {
        self.held
            .iter()
            .filter(|c| c.slot() == slot)
            .map(|c| c.direction())
            .sum()
    }
}

/// Parse a key name from the config file ("W", "Up", "Space", "Esc", ...)
pub fn parse_key(name: &str) -> Option<KeyCode> {
    let code = match name.to_lowercase().as_str() {
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "space" => KeyCode::Char(' '),
        "enter" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "tab" => KeyCode::Tab,
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return None,
            }
        }
    };
    Some(code)
}

fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

/// Key bindings resolved to crossterm key codes
#[derive(Debug, Clone)]
pub struct KeyMap {
    controls: HashMap<KeyCode, Control>,
    commands: HashMap<KeyCode, Command>,
}

impl KeyMap {
    pub fn from_bindings(bindings: &KeyBindings) -> Self {
        let mut controls = HashMap::new();
        for (name, control) in [
            (&bindings.p1_up, Control::P1Up),
            (&bindings.p1_down, Control::P1Down),
            (&bindings.p2_up, Control::P2Up),
            (&bindings.p2_down, Control::P2Down),
            (&bindings.p3_left, Control::P3Left),
            (&bindings.p3_right, Control::P3Right),
            (&bindings.p4_left, Control::P4Left),
            (&bindings.p4_right, Control::P4Right),
        ] {
            match parse_key(name) {
                Some(code) => {
                    controls.insert(normalize(code), control);
                }
                None => tracing::warn!(key = %name, ?control, "unrecognised key binding"),
            }
        }

        let mut commands = HashMap::new();
        commands.insert(KeyCode::Esc, Command::Quit);
        for (name, command) in [
            (&bindings.start, Command::Start),
            (&bindings.rematch, Command::Rematch),
            (&bindings.quit, Command::Quit),
        ] {
            match parse_key(name) {
                Some(code) => {
                    commands.insert(normalize(code), command);
                }
                None => tracing::warn!(key = %name, ?command, "unrecognised key binding"),
            }
        }

        Self { controls, commands }
    }

    pub fn control(&self, code: KeyCode) -> Option<Control> {
        self.controls.get(&normalize(code)).copied()
    }

    pub fn command(&self, code: KeyCode) -> Option<Command> {
        self.commands.get(&normalize(code)).copied()
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::from_bindings(&KeyBindings::default())
    }
}

/// Turns press/repeat/release events into a held-key set
#[derive(Debug, Default)]
pub struct KeyTracker {
    last_seen: HashMap<Control, u64>,
}

impl KeyTracker {
    pub fn note_press(&mut self, control: Control, now_ms: u64) {
        self.last_seen.insert(control, now_ms);
    }

    pub fn note_release(&mut self, control: Control) {
        self.last_seen.remove(&control);
    }

    /// Drop expired keys and write the rest into `input`
    pub fn apply(&mut self, input: &mut InputState, now_ms: u64) {
        self.last_seen
            .retain(|_, seen| now_ms.saturating_sub(*seen) < HOLD_TIMEOUT_MS);
        input.clear();
        for &control in self.last_seen.keys() {
            input.press(control);
        }
    }

    pub fn clear(&mut self) {
        self.last_seen.clear();
    }
}

/// Drain pending terminal events without blocking.
///
/// Paddle keys go to the tracker; everything else that maps to a command is returned.
pub fn poll_input(keymap: &KeyMap, tracker: &mut KeyTracker, now_ms: u64) -> io::Result<Vec<Command>> {
    let mut commands = Vec::new();

    while event::poll(Duration::from_millis(0))? {
        let Event::Key(key) = event::read()? else {
            continue;
        };

        if let Some(control) = keymap.control(key.code) {
            match key.kind {
                KeyEventKind::Release => tracker.note_release(control),
                KeyEventKind::Press | KeyEventKind::Repeat => tracker.note_press(control, now_ms),
            }
        } else if key.kind == KeyEventKind::Press {
            if let Some(command) = keymap.command(key.code) {
                commands.push(command);
            }
        }
    }

    Ok(commands)
}
