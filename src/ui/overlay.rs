// Overlay message system for displaying centered text on screen

use ratatui::{
    layout::{Alignment, Margin, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// A message to display as an overlay in the center of the screen
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayMessage {
    /// Lines of text, centred inside the box
    pub lines: Vec<String>,
    /// Shown in the top border when set
    pub title: Option<String>,
    /// Border and text colours
    pub style: OverlayStyle,
}

/// Predefined styles for overlay messages
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverlayStyle {
    /// Waiting on the match service (cyan border)
    Info,
    /// Recoverable problem (yellow)
    Warning,
    /// Match could not start (red)
    Error,
    /// Match or tournament won (green)
    Success,
}

impl OverlayMessage {
    fn styled(style: OverlayStyle, lines: Vec<String>) -> Self {
        Self {
            lines,
            title: None,
            style,
        }
    }

    /// Create an info-style message
    pub fn info(lines: Vec<String>) -> Self {
        Self::styled(OverlayStyle::Info, lines)
    }

    /// Create a warning-style message
    pub fn warning(lines: Vec<String>) -> Self {
        Self::styled(OverlayStyle::Warning, lines)
    }

    /// Create an error-style message
    pub fn error(lines: Vec<String>) -> Self {
        Self::styled(OverlayStyle::Error, lines)
    }

    /// Create a success-style message
    pub fn success(lines: Vec<String>) -> Self {
        Self::styled(OverlayStyle::Success, lines)
    }

    /// Set the title shown in the top border
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Append a line below the existing ones
    pub fn push_line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    fn border_color(&self) -> Color {
        match self.style {
            OverlayStyle::Info => Color::Cyan,
            OverlayStyle::Warning => Color::Yellow,
            OverlayStyle::Error => Color::Red,
            OverlayStyle::Success => Color::Green,
        }
    }

    fn text_color(&self) -> Color {
        match self.style {
            OverlayStyle::Info => Color::White,
            OverlayStyle::Warning => Color::Yellow,
            OverlayStyle::Error => Color::LightRed,
            OverlayStyle::Success => Color::LightGreen,
        }
    }
}

/// Box size for a message inside `area`, borders and padding included
pub fn overlay_rect(message: &OverlayMessage, area: Rect) -> Rect {
    let title_len = message.title.as_ref().map_or(0, |t| t.chars().count() + 2);
    let max_line_length = message
        .lines
        .iter()
        .map(|line| line.chars().count())
        .chain(std::iter::once(title_len))
        .max()
        .unwrap_or(0);

    let overlay_width = (max_line_length as u16 + 6).min(area.width.saturating_sub(4));
    let overlay_height = (message.lines.len() as u16 + 4).min(area.height.saturating_sub(4));

    Rect {
        x: area.x + area.width.saturating_sub(overlay_width) / 2,
        y: area.y + area.height.saturating_sub(overlay_height) / 2,
        width: overlay_width,
        height: overlay_height,
    }
}

/// Render an overlay message in the center of the screen
pub fn render_overlay(frame: &mut Frame, message: &OverlayMessage, area: Rect) {
    let overlay_area = overlay_rect(message, area);
    if overlay_area.width == 0 || overlay_area.height == 0 {
        return;
    }

    // Clear the area behind the overlay
    frame.render_widget(Clear, overlay_area);

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(message.border_color()))
        .style(Style::default().bg(Color::Rgb(20, 20, 20)));

    if let Some(ref title) = message.title {
        block = block.title(format!(" {} ", title));
    }

    frame.render_widget(block, overlay_area);

    let inner_area = overlay_area.inner(Margin::new(2, 1));

    let text_lines: Vec<Line> = message
        .lines
        .iter()
        .map(|line| {
            Line::from(Span::styled(
                line.clone(),
                Style::default().fg(message.text_color()),
            ))
        })
        .collect();

    frame.render_widget(
        Paragraph::new(text_lines).alignment(Alignment::Center),
        inner_area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_rect_centred_and_clamped() {
        let message = OverlayMessage::info(vec!["hello".to_string(), "world!".to_string()]);
        let rect = overlay_rect(&message, Rect::new(0, 0, 80, 24));
        assert_eq!((rect.width, rect.height), (12, 6));
        assert_eq!((rect.x, rect.y), (34, 9));

        let tiny = overlay_rect(&message, Rect::new(0, 0, 3, 3));
        assert_eq!((tiny.width, tiny.height), (0, 0));
    }

    #[test]
    fn test_title_widens_box() {
        let message = OverlayMessage::success(vec!["ok".to_string()]).with_title("LEFT WINS");
        let rect = overlay_rect(&message, Rect::new(0, 0, 80, 24));
        assert_eq!(rect.width, 17);
    }
}
