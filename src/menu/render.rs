// Menu rendering with Ratatui

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

use super::state::{MenuItem, MenuState};
use crate::api::Profile;

const TITLE: [&str; 5] = [
    "  ▄▀▄ █▀▄ ▄▀▀ ▄▀▄ █▀▄ ██▀   █▀▄ ▄▀▄ █▄ █ ▄▀  ",
    "  █▀█ █▀▄ ▀▄▄ █▀█ █▄▀ █▄▄   █▀  ▀▄▀ █ ▀█ ▀▄█ ",
    "",
    "        one · two · four players · tournament",
    "",
];

/// Render the main menu
pub fn render_menu(frame: &mut Frame, menu_state: &MenuState, profile: &Profile) {
    let area = frame.area();

    // Draw background
    let bg = Block::default().style(Style::default().bg(Color::Rgb(0, 0, 0)));
    frame.render_widget(bg, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Title area
            Constraint::Min(9),    // Menu items
            Constraint::Length(2), // Player / message
            Constraint::Length(2), // Controls hint
        ])
        .split(area);

    let mut title_text = vec![Line::from("")];
    title_text.extend(TITLE.iter().map(|line| {
        Line::from(Span::styled(
            *line,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))
    }));
    frame.render_widget(Paragraph::new(title_text).alignment(Alignment::Center), chunks[0]);

    let menu_items: Vec<Line> = menu_state
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let is_selected = i == menu_state.selected_index;
            let prefix = if is_selected { "  > " } else { "    " };
            let text = format!("{}{}", prefix, item.display_text(menu_state));

            let colour = match (is_selected, item) {
                (true, _) => Color::Yellow,
                (false, MenuItem::Difficulty | MenuItem::Map) => Color::Gray,
                (false, _) => Color::White,
            };
            let mut style = Style::default().fg(colour);
            if is_selected {
                style = style.add_modifier(Modifier::BOLD);
            }
            Line::from(Span::styled(text, style))
        })
        .collect();

    frame.render_widget(Paragraph::new(menu_items).alignment(Alignment::Center), chunks[1]);

    let status = match (&menu_state.message, profile.user_id) {
        (Some(message), _) => Line::from(Span::styled(message.clone(), Style::default().fg(Color::Red))),
        (None, Some(id)) => Line::from(Span::styled(
            format!(
                "Signed in as {} (#{}), rating {}",
                if profile.name.is_empty() { "player" } else { profile.name.as_str() },
                id,
                profile.rating.map_or("-".to_string(), |r| r.to_string())
            ),
            Style::default().fg(Color::DarkGray),
        )),
        (None, None) => Line::from(Span::styled(
            "Not signed in: only tournaments can be played",
            Style::default().fg(Color::DarkGray),
        )),
    };
    frame.render_widget(Paragraph::new(status).alignment(Alignment::Center), chunks[2]);

    let controls = vec![Line::from(vec![
        Span::styled("↑/↓", Style::default().fg(Color::Gray)),
        Span::styled(": Navigate  ", Style::default().fg(Color::DarkGray)),
        Span::styled("←/→", Style::default().fg(Color::Gray)),
        Span::styled(": Change  ", Style::default().fg(Color::DarkGray)),
        Span::styled("Enter", Style::default().fg(Color::Gray)),
        Span::styled(": Select  ", Style::default().fg(Color::DarkGray)),
        Span::styled("Q/Esc", Style::default().fg(Color::Gray)),
        Span::styled(": Quit", Style::default().fg(Color::DarkGray)),
    ])];

    frame.render_widget(Paragraph::new(controls).alignment(Alignment::Center), chunks[3]);
}
