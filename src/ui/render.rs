use glam::Vec2;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

use super::braille::BrailleCanvas;
use super::overlay::{render_overlay, OverlayMessage};
use crate::config::DisplayConfig;
use crate::game::map::Obstacle;
use crate::game::scoring::ScoringPolicy;
use crate::game::session::{GamePhase, MatchSession};
use crate::game::state::{Arena, Field, Slot};

// Layout: score line, controls hint, then the field scaled into the rest
const UI_HEADER_ROWS: u16 = 2;

/// Text drawn around the field
#[derive(Debug, Clone, Default)]
pub struct Hud {
    /// Player label per slot; slots without one use the slot name
    pub labels: Vec<(Slot, String)>,
    pub hint: String,
    pub overlay: Option<OverlayMessage>,
}

impl Hud {
    fn label(&self, slot: Slot) -> String {
        self.labels
            .iter()
            .find(|(s, _)| *s == slot)
            .map_or_else(|| slot.to_string(), |(_, name)| name.clone())
    }
}

/// Maps field coordinates onto Braille pixels with one uniform scale,
/// centred in the available area with a one-pixel frame for the border.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    scale: f32,
    offset: Vec2,
    size: Vec2,
}

impl Viewport {
    pub fn fit(field: &Field, pixel_width: usize, pixel_height: usize, offset_y: usize) -> Self {
        let avail = Vec2::new(
            pixel_width.saturating_sub(2) as f32,
            pixel_height.saturating_sub(2) as f32,
        );
        let scale = (avail.x / field.width()).min(avail.y / field.height()).max(0.0);
        let size = field.size * scale;
        let offset = Vec2::new(1.0, 1.0 + offset_y as f32) + (avail - size) * 0.5;
        Self {
            scale,
            offset,
            size,
        }
    }

    pub fn to_pixel(&self, point: Vec2) -> Vec2 {
        self.offset + point * self.scale
    }

    pub fn length(&self, value: f32) -> f32 {
        value * self.scale
    }

    /// Pixel bounds (x0, y0, x1, y1) of a field-space box, clipped at zero
    fn bounds(&self, min: Vec2, max: Vec2) -> (usize, usize, usize, usize) {
        let a = self.to_pixel(min).max(Vec2::ZERO);
        let b = self.to_pixel(max).max(Vec2::ZERO);
        (a.x as usize, a.y as usize, b.x.ceil() as usize, b.y.ceil() as usize)
    }

    /// Pixel rows and columns of the field's four edges
    fn edges(&self) -> (usize, usize, usize, usize) {
        let left = (self.offset.x - 1.0).max(0.0) as usize;
        let top = (self.offset.y - 1.0).max(0.0) as usize;
        let right = (self.offset.x + self.size.x).ceil() as usize;
        let bottom = (self.offset.y + self.size.y).ceil() as usize;
        (left, top, right, bottom)
    }
}

pub fn render(frame: &mut Frame, session: &MatchSession, display: &DisplayConfig, hud: &Hud) {
    let area = frame.area();

    // Draw background (true black RGB, not terminal default)
    let bg = Block::default().style(Style::default().bg(Color::Rgb(0, 0, 0)));
    frame.render_widget(bg, area);

    draw_scores(frame, session, display, hud, area);
    draw_controls(frame, &hud.hint, area);

    let field_rows = area.height.saturating_sub(UI_HEADER_ROWS);
    if field_rows > 0 && area.width > 0 {
        let mut canvas = BrailleCanvas::new(area.width as usize, field_rows as usize);
        let view = Viewport::fit(
            &session.arena().field,
            canvas.pixel_width(),
            canvas.pixel_height(),
            0,
        );
        draw_arena(&mut canvas, &view, session.arena(), display, session.profile().lives_mode);

        let field_area = Rect {
            x: area.x,
            y: area.y + UI_HEADER_ROWS,
            width: area.width,
            height: field_rows,
        };
        render_braille_canvas(frame, &canvas, field_area);
    }

    if let Some(overlay) = &hud.overlay {
        render_overlay(frame, overlay, area);
    } else if let GamePhase::Scored { .. } = session.phase() {
        draw_status(frame, "POINT", area);
    }
}

/// Rasterise the whole arena onto `canvas`
pub fn draw_arena(
    canvas: &mut BrailleCanvas,
    view: &Viewport,
    arena: &Arena,
    display: &DisplayConfig,
    lives_mode: bool,
) {
    let border = rgb(display.border_color);
    let (left, top, right, bottom) = view.edges();

    for side in Slot::ALL {
        if !arena.walls.is_solid(side) {
            continue;
        }
        match side {
            Slot::Left => canvas.draw_vertical_line(left, top, bottom, 1, border),
            Slot::Right => canvas.draw_vertical_line(right, top, bottom, 1, border),
            Slot::Top => canvas.draw_horizontal_line(top, left, right, 1, border),
            Slot::Bottom => canvas.draw_horizontal_line(bottom, left, right, 1, border),
        }
    }

    if !lives_mode {
        let center_x = view.to_pixel(arena.field.center()).x as usize;
        canvas.draw_vertical_line(center_x, top + 1, bottom.saturating_sub(1), 3, border);
    }

    let obstacle_color = rgb(display.obstacle_color);
    for obstacle in &arena.obstacles {
        draw_obstacle(canvas, view, obstacle, obstacle_color);
    }

    let paddle_color = rgb(display.paddle_color);
    for paddle in arena.paddles.iter().filter(|p| p.alive) {
        canvas.fill_where(view.bounds(paddle.pos, paddle.pos + paddle.size), paddle_color, |_, _| true);
    }

    let ball = &arena.ball;
    let center = view.to_pixel(ball.pos);
    // At least one pixel wide so a tiny ball stays visible
    let radius = view.length(ball.radius).max(0.75);
    canvas.fill_where(
        view.bounds(ball.pos - Vec2::splat(ball.radius), ball.pos + Vec2::splat(ball.radius)),
        rgb(display.ball_color),
        |x, y| Vec2::new(x, y).distance_squared(center) <= radius * radius,
    );
}

fn draw_obstacle(canvas: &mut BrailleCanvas, view: &Viewport, obstacle: &Obstacle, color: Color) {
    match obstacle {
        Obstacle::Circle { center, radius } => {
            let c = view.to_pixel(*center);
            let r = view.length(*radius);
            canvas.fill_where(
                view.bounds(*center - Vec2::splat(*radius), *center + Vec2::splat(*radius)),
                color,
                |x, y| Vec2::new(x, y).distance_squared(c) <= r * r,
            );
        }
        Obstacle::Rectangle {
            origin,
            width,
            height,
        } => {
            canvas.fill_where(
                view.bounds(*origin, *origin + Vec2::new(*width, *height)),
                color,
                |_, _| true,
            );
        }
        Obstacle::Rhombus { vertices } => {
            let min = vertices.iter().fold(Vec2::splat(f32::MAX), |acc, v| acc.min(*v));
            let max = vertices.iter().fold(Vec2::splat(f32::MIN), |acc, v| acc.max(*v));
            let pixels = vertices.map(|v| view.to_pixel(v));
            canvas.fill_where(view.bounds(min, max), color, |x, y| {
                inside_convex(&pixels, Vec2::new(x, y))
            });
        }
    }
}

/// Point-in-polygon for a convex outline in either winding
fn inside_convex(vertices: &[Vec2], point: Vec2) -> bool {
    let mut sign = 0.0_f32;
    for (i, start) in vertices.iter().enumerate() {
        let end = vertices[(i + 1) % vertices.len()];
        let cross = (end - *start).perp_dot(point - *start);
        if cross == 0.0 {
            continue;
        }
        if sign == 0.0 {
            sign = cross.signum();
        } else if cross.signum() != sign {
            return false;
        }
    }
    true
}

fn render_braille_canvas(frame: &mut Frame, canvas: &BrailleCanvas, area: Rect) {
    // Render each row of the Braille canvas, one span per run of equal colour
    for y in 0..canvas.height().min(area.height as usize) {
        let mut spans = Vec::new();
        let mut run = String::new();
        let mut run_color = None;

        for x in 0..canvas.width().min(area.width as usize) {
            let color = canvas.color_at(x, y);
            if color != run_color && !run.is_empty() {
                spans.push(styled_run(std::mem::take(&mut run), run_color));
            }
            run_color = color;
            run.push(canvas.to_char(x, y));
        }
        if !run.is_empty() {
            spans.push(styled_run(run, run_color));
        }

        let row_area = Rect {
            x: area.x,
            y: area.y + y as u16,
            width: area.width,
            height: 1,
        };
        frame.render_widget(Paragraph::new(Line::from(spans)), row_area);
    }
}

fn styled_run(text: String, color: Option<Color>) -> Span<'static> {
    Span::styled(text, Style::default().fg(color.unwrap_or(Color::White)))
}

/// Score line text: points in two-sided play, lives per slot otherwise
pub fn score_line(session: &MatchSession, hud: &Hud) -> String {
    let board = session.scoreboard();
    match board.policy() {
        ScoringPolicy::Points { .. } => format!(
            "{}  {}   :   {}  {}",
            hud.label(Slot::Left),
            board.get(Slot::Left),
            board.get(Slot::Right),
            hud.label(Slot::Right)
        ),
        ScoringPolicy::Lives { .. } => session
            .profile()
            .slots
            .iter()
            .map(|&slot| {
                let lives = board.get(slot);
                if lives == 0 {
                    format!("{} out", hud.label(slot))
                } else {
                    format!("{} ♥{}", hud.label(slot), lives)
                }
            })
            .collect::<Vec<_>>()
            .join("   "),
    }
}

fn draw_scores(frame: &mut Frame, session: &MatchSession, display: &DisplayConfig, hud: &Hud, area: Rect) {
    let scores = Paragraph::new(score_line(session, hud))
        .style(Style::default().fg(rgb(display.score_color)))
        .alignment(Alignment::Center);

    let score_area = Rect {
        x: area.x,
        y: area.y,
        width: area.width,
        height: 1.min(area.height),
    };
    frame.render_widget(scores, score_area);
}

fn draw_controls(frame: &mut Frame, hint: &str, area: Rect) {
    if area.height < 2 {
        return;
    }
    let controls = Paragraph::new(hint.to_string())
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);

    let controls_area = Rect {
        x: area.x,
        y: area.y + 1,
        width: area.width,
        height: 1,
    };
    frame.render_widget(controls, controls_area);
}

fn draw_status(frame: &mut Frame, text: &str, area: Rect) {
    let status = Paragraph::new(text.to_string())
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center);

    let status_area = Rect {
        x: area.x,
        y: area.y + area.height / 2,
        width: area.width,
        height: 1.min(area.height),
    };
    frame.render_widget(status, status_area);
}

fn rgb(color: [u8; 3]) -> Color {
    Color::Rgb(color[0], color[1], color[2])
}
