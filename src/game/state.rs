use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::map::Obstacle;
use crate::config::{Config, FieldConfig, PhysicsConfig};

/// Game variants sharing one simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Human (left) against the AI (right)
    OnePlayer,
    /// Two humans on one keyboard
    TwoPlayers,
    /// Four paddles on a square field, lives instead of points
    FourPlayers,
    /// Two-player sub-match driven by a tournament bracket
    Tournament,
}

impl GameMode {
    pub fn display_name(&self) -> &str {
        match self {
            GameMode::OnePlayer => "Single Player vs AI",
            GameMode::TwoPlayers => "Local 2-Player",
            GameMode::FourPlayers => "Four Players",
            GameMode::Tournament => "Tournament",
        }
    }
}

impl FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "one" | "1p" | "ai" | "one_player" => Ok(GameMode::OnePlayer),
            "two" | "2p" | "two_players" => Ok(GameMode::TwoPlayers),
            "four" | "4p" | "four_players" => Ok(GameMode::FourPlayers),
            "tournament" => Ok(GameMode::Tournament),
            other => Err(format!("unknown game mode: {}", other)),
        }
    }
}

/// One of the four paddle positions; each guards the boundary it sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    Left,
    Right,
    Top,
    Bottom,
}

impl Slot {
    pub const ALL: [Slot; 4] = [Slot::Left, Slot::Right, Slot::Top, Slot::Bottom];

    pub fn index(self) -> usize {
        match self {
            Slot::Left => 0,
            Slot::Right => 1,
            Slot::Top => 2,
            Slot::Bottom => 3,
        }
    }

    /// Vertical paddles slide along Y, horizontal ones along X
    pub fn is_vertical(self) -> bool {
        matches!(self, Slot::Left | Slot::Right)
    }

    /// Unit vector along the paddle's axis of movement
    pub fn lateral_axis(self) -> Vec2 {
        if self.is_vertical() {
            Vec2::Y
        } else {
            Vec2::X
        }
    }

    /// Direction a ball travels after leaving this paddle's face
    pub fn face_normal(self) -> Vec2 {
        match self {
            Slot::Left => Vec2::X,
            Slot::Right => Vec2::NEG_X,
            Slot::Top => Vec2::Y,
            Slot::Bottom => Vec2::NEG_Y,
        }
    }

    /// The other side of a two-sided match
    pub fn opponent(self) -> Slot {
        match self {
            Slot::Left => Slot::Right,
            Slot::Right => Slot::Left,
            Slot::Top => Slot::Bottom,
            Slot::Bottom => Slot::Top,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Slot::Left => "LEFT",
            Slot::Right => "RIGHT",
            Slot::Top => "TOP",
            Slot::Bottom => "BOTTOM",
        };
        f.write_str(name)
    }
}

/// Play-field extent; origin is the top-left corner, Y grows downward
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field {
    pub size: Vec2,
}

impl Field {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
        }
    }

    pub fn width(&self) -> f32 {
        self.size.x
    }

    pub fn height(&self) -> f32 {
        self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.size * 0.5
    }
}

/// Ball-and-paddle numbers fixed for the duration of a match
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    pub ball_radius: f32,
    pub ball_speed: f32,
    pub max_ball_speed: f32,
    pub acceleration: f32,
    pub paddle_length: f32,
    pub paddle_thickness: f32,
    pub paddle_speed: f32,
    pub paddle_margin: f32,
    /// Radians
    pub max_bounce_angle: f32,
    pub paddle_influence: f32,
    /// Radians
    pub serve_spread: f32,
}

impl Dimensions {
    /// Mode defaults from the physics config, then user overrides on top
    pub fn for_mode(mode: GameMode, physics: &PhysicsConfig, custom: &Customization) -> Self {
        let paddle_length = match mode {
            GameMode::FourPlayers => physics.four_player_paddle_length,
            _ => physics.paddle_length,
        };
        let ball_speed = custom.ball_speed.unwrap_or(physics.ball_initial_speed);

        Self {
            ball_radius: custom.ball_radius.unwrap_or(physics.ball_radius),
            ball_speed,
            // A custom serve speed above the cap raises the cap with it
            max_ball_speed: physics.max_ball_speed.max(ball_speed),
            acceleration: physics.ball_acceleration,
            paddle_length: custom.paddle_length.unwrap_or(paddle_length),
            paddle_thickness: physics.paddle_thickness,
            paddle_speed: custom.paddle_speed.unwrap_or(physics.paddle_speed),
            paddle_margin: physics.paddle_margin,
            max_bounce_angle: physics.max_bounce_angle_deg.to_radians(),
            paddle_influence: physics.paddle_influence,
            serve_spread: physics.serve_angle_deg.to_radians().clamp(0.0, PI / 3.0),
        }
    }
}

/// User overrides for ball and paddle tuning
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Customization {
    pub ball_speed: Option<f32>,
    pub ball_radius: Option<f32>,
    pub paddle_speed: Option<f32>,
    pub paddle_length: Option<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Ball {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius,
        }
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Centre the ball and stop it
    pub fn recenter(&mut self, field: &Field) {
        self.pos = field.center();
        self.vel = Vec2::ZERO;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paddle {
    pub slot: Slot,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Per-tick displacement along the lateral axis
    pub velocity: f32,
    pub alive: bool,
}

impl Paddle {
    /// Paddle centred on its boundary, `margin` in from the edge
    pub fn placed(slot: Slot, field: &Field, length: f32, thickness: f32, margin: f32) -> Self {
        let (pos, size) = match slot {
            Slot::Left => (
                Vec2::new(margin, (field.height() - length) / 2.0),
                Vec2::new(thickness, length),
            ),
            Slot::Right => (
                Vec2::new(
                    field.width() - margin - thickness,
                    (field.height() - length) / 2.0,
                ),
                Vec2::new(thickness, length),
            ),
            Slot::Top => (
                Vec2::new((field.width() - length) / 2.0, margin),
                Vec2::new(length, thickness),
            ),
            Slot::Bottom => (
                Vec2::new(
                    (field.width() - length) / 2.0,
                    field.height() - margin - thickness,
                ),
                Vec2::new(length, thickness),
            ),
        };

        Self {
            slot,
            pos,
            size,
            velocity: 0.0,
            alive: true,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Extent along the axis of movement
    pub fn length(&self) -> f32 {
        self.size.dot(self.slot.lateral_axis())
    }

    /// Centre coordinate along the axis of movement
    pub fn lateral_center(&self) -> f32 {
        self.center().dot(self.slot.lateral_axis())
    }

    /// Coordinate of the face the ball bounces off, on the depth axis
    pub fn face(&self) -> f32 {
        match self.slot {
            Slot::Left => self.pos.x + self.size.x,
            Slot::Right => self.pos.x,
            Slot::Top => self.pos.y + self.size.y,
            Slot::Bottom => self.pos.y,
        }
    }

    /// Apply this tick's velocity and keep the paddle inside the field.
    ///
    /// `velocity` is left holding the distance actually travelled, so a paddle
    /// pinned against the edge imparts no spin.
    pub fn advance(&mut self, field: &Field) {
        let axis = self.slot.lateral_axis();
        let before = self.pos;
        self.pos += axis * self.velocity;
        self.clamp_to(field);
        self.velocity = (self.pos - before).dot(axis);
    }

    pub fn clamp_to(&mut self, field: &Field) {
        if self.slot.is_vertical() {
            self.pos.y = self.pos.y.clamp(0.0, (field.height() - self.size.y).max(0.0));
        } else {
            self.pos.x = self.pos.x.clamp(0.0, (field.width() - self.size.x).max(0.0));
        }
    }
}

/// Which boundaries reflect the ball instead of scoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Walls([bool; 4]);

impl Walls {
    /// Top and bottom walls, open sides (two-sided matches)
    pub fn classic() -> Self {
        let mut walls = Self::default();
        walls.set_solid(Slot::Top);
        walls.set_solid(Slot::Bottom);
        walls
    }

    pub fn is_solid(&self, side: Slot) -> bool {
        self.0[side.index()]
    }

    pub fn set_solid(&mut self, side: Slot) {
        self.0[side.index()] = true;
    }

    /// First open boundary `ball` is past, checked left, right, top, bottom
    pub fn crossed_by(&self, ball: &Ball, field: &Field) -> Option<Slot> {
        let Ball { pos, radius, .. } = *ball;
        Slot::ALL.into_iter().find(|&side| {
            !self.is_solid(side)
                && match side {
                    Slot::Left => pos.x - radius < 0.0,
                    Slot::Right => pos.x + radius > field.width(),
                    Slot::Top => pos.y - radius < 0.0,
                    Slot::Bottom => pos.y + radius > field.height(),
                }
        })
    }
}

/// Everything the ball can touch. Owned by the match session; the AI reads it.
#[derive(Debug, Clone)]
pub struct Arena {
    pub field: Field,
    pub ball: Ball,
    pub paddles: Vec<Paddle>,
    pub obstacles: Vec<Obstacle>,
    pub walls: Walls,
}

impl Arena {
    pub fn paddle(&self, slot: Slot) -> Option<&Paddle> {
        self.paddles.iter().find(|p| p.slot == slot)
    }

    pub fn paddle_mut(&mut self, slot: Slot) -> Option<&mut Paddle> {
        self.paddles.iter_mut().find(|p| p.slot == slot)
    }

    pub fn crossed_boundary(&self) -> Option<Slot> {
        self.walls.crossed_by(&self.ball, &self.field)
    }
}

/// Mode-specific shape of a match: layout, scoring, AI and obstacle rules
#[derive(Debug, Clone, PartialEq)]
pub struct ModeProfile {
    pub field: Field,
    pub slots: Vec<Slot>,
    pub lives_mode: bool,
    pub ai_slot: Option<Slot>,
    pub allows_obstacles: bool,
    pub creates_match_record: bool,
}

impl ModeProfile {
    pub fn for_mode(mode: GameMode, field: &FieldConfig) -> Self {
        let classic = Field::new(field.classic_width, field.classic_height);
        match mode {
            GameMode::OnePlayer => Self {
                field: classic,
                slots: vec![Slot::Left, Slot::Right],
                lives_mode: false,
                ai_slot: Some(Slot::Right),
                allows_obstacles: true,
                creates_match_record: true,
            },
            GameMode::TwoPlayers => Self {
                field: classic,
                slots: vec![Slot::Left, Slot::Right],
                lives_mode: false,
                ai_slot: None,
                allows_obstacles: true,
                creates_match_record: true,
            },
            GameMode::FourPlayers => Self {
                field: Field::new(field.four_player_size, field.four_player_size),
                slots: Slot::ALL.to_vec(),
                lives_mode: true,
                ai_slot: None,
                allows_obstacles: false,
                creates_match_record: true,
            },
            GameMode::Tournament => Self {
                field: classic,
                slots: vec![Slot::Left, Slot::Right],
                lives_mode: false,
                ai_slot: None,
                allows_obstacles: false,
                creates_match_record: false,
            },
        }
    }

    /// Fresh arena for this profile
    pub fn build_arena(&self, dims: &Dimensions, obstacles: Vec<Obstacle>) -> Arena {
        let paddles = self
            .slots
            .iter()
            .map(|&slot| {
                Paddle::placed(
                    slot,
                    &self.field,
                    dims.paddle_length,
                    dims.paddle_thickness,
                    dims.paddle_margin,
                )
            })
            .collect();

        Arena {
            field: self.field,
            ball: Ball::new(self.field.center(), dims.ball_radius),
            paddles,
            obstacles: if self.allows_obstacles {
                obstacles
            } else {
                Vec::new()
            },
            walls: if self.lives_mode {
                Walls::default()
            } else {
                Walls::classic()
            },
        }
    }
}

/// Convenience for tests and tools: profile and dimensions straight from a config
pub fn profile_and_dimensions(mode: GameMode, config: &Config) -> (ModeProfile, Dimensions) {
    (
        ModeProfile::for_mode(mode, &config.field),
        Dimensions::for_mode(mode, &config.physics, &Customization::default()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paddle_placement_classic() {
        let field = Field::new(800.0, 400.0);
        let left = Paddle::placed(Slot::Left, &field, 80.0, 10.0, 12.0);
        let right = Paddle::placed(Slot::Right, &field, 80.0, 10.0, 12.0);

        assert_eq!(left.pos, Vec2::new(12.0, 160.0));
        assert_eq!(left.face(), 22.0);
        assert_eq!(right.pos, Vec2::new(778.0, 160.0));
        assert_eq!(right.face(), 778.0);
        assert_eq!(left.lateral_center(), 200.0);
        assert_eq!(right.length(), 80.0);
    }

    #[test]
    fn test_horizontal_paddles_move_in_x() {
        let field = Field::new(600.0, 600.0);
        let mut top = Paddle::placed(Slot::Top, &field, 70.0, 10.0, 12.0);
        let y = top.pos.y;
        top.velocity = 1000.0;
        top.advance(&field);
        assert_eq!(top.pos.y, y);
        assert_eq!(top.pos.x, 600.0 - 70.0);

        top.velocity = -5000.0;
        top.advance(&field);
        assert_eq!(top.pos.x, 0.0);
    }

    #[test]
    fn test_vertical_paddle_clamped() {
        let field = Field::new(800.0, 400.0);
        let mut left = Paddle::placed(Slot::Left, &field, 80.0, 10.0, 12.0);
        left.velocity = -1000.0;
        left.advance(&field);
        assert_eq!(left.pos.y, 0.0);
        left.velocity = 1000.0;
        left.advance(&field);
        assert_eq!(left.pos.y, 320.0);
    }

    #[test]
    fn test_pinned_paddle_reports_no_motion() {
        let field = Field::new(800.0, 400.0);
        let mut left = Paddle::placed(Slot::Left, &field, 80.0, 10.0, 12.0);
        left.pos.y = 2.0;
        left.velocity = -7.0;
        left.advance(&field);
        assert_eq!(left.pos.y, 0.0);
        assert_eq!(left.velocity, -2.0);

        left.velocity = -7.0;
        left.advance(&field);
        assert_eq!(left.velocity, 0.0);

        left.velocity = 7.0;
        left.advance(&field);
        assert_eq!(left.velocity, 7.0);
    }

    #[test]
    fn test_crossed_boundary_respects_walls() {
        let config = Config::default();
        let (profile, dims) = profile_and_dimensions(GameMode::TwoPlayers, &config);
        let mut arena = profile.build_arena(&dims, Vec::new());

        arena.ball.pos = Vec2::new(400.0, -20.0);
        assert_eq!(arena.crossed_boundary(), None);

        arena.ball.pos = Vec2::new(-1.0, 200.0);
        assert_eq!(arena.crossed_boundary(), Some(Slot::Left));

        arena.ball.pos = Vec2::new(805.0, 200.0);
        assert_eq!(arena.crossed_boundary(), Some(Slot::Right));
    }

    #[test]
    fn test_corner_crossing_concedes_left_first() {
        let config = Config::default();
        let (profile, dims) = profile_and_dimensions(GameMode::FourPlayers, &config);
        let mut arena = profile.build_arena(&dims, Vec::new());

        arena.ball.pos = Vec2::new(-2.0, -2.0);
        assert_eq!(arena.crossed_boundary(), Some(Slot::Left));

        // Right beats bottom in the opposite corner
        let size = arena.field.size;
        arena.ball.pos = size + Vec2::splat(2.0);
        assert_eq!(arena.crossed_boundary(), Some(Slot::Right));

        // Once left is a wall, top concedes instead
        arena.walls.set_solid(Slot::Left);
        arena.ball.pos = Vec2::new(-2.0, -2.0);
        assert_eq!(arena.crossed_boundary(), Some(Slot::Top));
    }

    #[test]
    fn test_mode_profiles() {
        let field = FieldConfig::default();
        let four = ModeProfile::for_mode(GameMode::FourPlayers, &field);
        assert_eq!(four.slots.len(), 4);
        assert!(four.lives_mode);
        assert!(!four.allows_obstacles);
        assert_eq!(four.field.width(), four.field.height());

        let tournament = ModeProfile::for_mode(GameMode::Tournament, &field);
        assert!(!tournament.creates_match_record);
        assert!(!tournament.allows_obstacles);

        let one = ModeProfile::for_mode(GameMode::OnePlayer, &field);
        assert_eq!(one.ai_slot, Some(Slot::Right));
    }

    #[test]
    fn test_customization_overrides_defaults() {
        let physics = PhysicsConfig::default();
        let custom = Customization {
            ball_speed: Some(20.0),
            paddle_length: Some(120.0),
            ..Default::default()
        };
        let dims = Dimensions::for_mode(GameMode::TwoPlayers, &physics, &custom);
        assert_eq!(dims.ball_speed, 20.0);
        assert_eq!(dims.max_ball_speed, 20.0);
        assert_eq!(dims.paddle_length, 120.0);
        assert_eq!(dims.ball_radius, physics.ball_radius);

        let four = Dimensions::for_mode(GameMode::FourPlayers, &physics, &Customization::default());
        assert_eq!(four.paddle_length, physics.four_player_paddle_length);
    }

    #[test]
    fn test_game_mode_from_str() {
        assert_eq!("four".parse::<GameMode>(), Ok(GameMode::FourPlayers));
        assert_eq!("AI".parse::<GameMode>(), Ok(GameMode::OnePlayer));
        assert!("five".parse::<GameMode>().is_err());
    }
}
