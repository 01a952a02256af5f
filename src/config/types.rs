// Arcade Pong configuration types
// Every section falls back to defaults so partial files stay valid

use serde::{Deserialize, Serialize};

use crate::ai::Difficulty;
use crate::game::map::MapConfig;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub keybindings: KeyBindings,
    #[serde(default)]
    pub physics: PhysicsConfig,
    #[serde(default)]
    pub field: FieldConfig,
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub profile: ProfileConfig,
    #[serde(default)]
    pub tournament: TournamentConfig,
    // Custom maps, looked up by name before the built-in ones
    #[serde(default)]
    pub maps: Vec<MapConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct KeyBindings {
    // Left paddle (also the human paddle against the AI)
    pub p1_up: String,
    pub p1_down: String,

    // Right paddle
    pub p2_up: String,
    pub p2_down: String,

    // Top paddle (four-player mode)
    pub p3_left: String,
    pub p3_right: String,

    // Bottom paddle (four-player mode)
    pub p4_left: String,
    pub p4_right: String,

    // Game controls
    pub start: String,
    pub rematch: String,
    pub quit: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            p1_up: "W".to_string(),
            p1_down: "S".to_string(),
            p2_up: "Up".to_string(),
            p2_down: "Down".to_string(),
            p3_left: "J".to_string(),
            p3_right: "L".to_string(),
            p4_left: "Left".to_string(),
            p4_right: "Right".to_string(),
            start: "Space".to_string(),
            rematch: "R".to_string(),
            quit: "Q".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PhysicsConfig {
    // Ball radius in field units
    pub ball_radius: f32,

    // Serve speed in field units per tick
    pub ball_initial_speed: f32,

    // Hard cap on ball speed
    pub max_ball_speed: f32,

    // Speed multiplier applied on every paddle hit (1.05 = 5% faster)
    pub ball_acceleration: f32,

    // Paddle length along its axis of movement
    pub paddle_length: f32,

    // Paddle length in four-player mode (square field, shorter sides)
    pub four_player_paddle_length: f32,

    // Paddle size across its axis of movement
    pub paddle_thickness: f32,

    // Paddle speed in field units per tick
    pub paddle_speed: f32,

    // Gap between a paddle and its boundary
    pub paddle_margin: f32,

    // Maximum deflection from the paddle normal, in degrees
    pub max_bounce_angle_deg: f32,

    // How much of the paddle's own velocity is transferred to the ball
    pub paddle_influence: f32,

    // Serve direction spread around the horizontal/vertical, in degrees
    pub serve_angle_deg: f32,

    // Points needed to win a two-sided match
    pub winning_score: u32,

    // Lives per player in four-player mode
    pub starting_lives: u32,

    // Pause after a point or a lost life
    pub scored_pause_ms: u64,

    // Fixed seed for serves and AI error; random when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rng_seed: Option<u64>,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            ball_radius: 8.0,
            ball_initial_speed: 6.0,
            max_ball_speed: 14.0,
            ball_acceleration: 1.05,
            paddle_length: 80.0,
            four_player_paddle_length: 70.0,
            paddle_thickness: 10.0,
            paddle_speed: 7.0,
            paddle_margin: 12.0,
            max_bounce_angle_deg: 45.0,
            paddle_influence: 0.3,
            serve_angle_deg: 30.0,
            winning_score: 5,
            starting_lives: 3,
            scored_pause_ms: 1000,
            rng_seed: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FieldConfig {
    // Classic field (1P, 2P, tournament)
    pub classic_width: f32,
    pub classic_height: f32,

    // Four-player field is square
    pub four_player_size: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            classic_width: 800.0,
            classic_height: 400.0,
            four_player_size: 600.0,
        }
    }
}

/// Reaction profile of one AI difficulty
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct DifficultyLevel {
    // Fraction of the paddle speed the AI may use (1.0 = full speed)
    pub speed_multiplier: f32,

    // How often the AI re-predicts the ball trajectory
    pub update_interval_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DifficultyTable {
    pub easy: DifficultyLevel,
    pub medium: DifficultyLevel,
    pub hard: DifficultyLevel,
    pub expert: DifficultyLevel,
}

impl DifficultyTable {
    pub fn level(&self, difficulty: Difficulty) -> DifficultyLevel {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
            Difficulty::Expert => self.expert,
        }
    }
}

impl Default for DifficultyTable {
    fn default() -> Self {
        Self {
            easy: DifficultyLevel {
                speed_multiplier: 0.45,
                update_interval_ms: 1200,
            },
            medium: DifficultyLevel {
                speed_multiplier: 0.65,
                update_interval_ms: 1000,
            },
            hard: DifficultyLevel {
                speed_multiplier: 0.85,
                update_interval_ms: 700,
            },
            expert: DifficultyLevel {
                speed_multiplier: 1.0,
                update_interval_ms: 400,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AiConfig {
    // Default AI difficulty: "easy", "medium", "hard", "expert"
    pub difficulty: Difficulty,

    // Per-tick speed ceiling for the AI paddle
    pub ai_max_speed: f32,

    // Forward-simulation budget for trajectory prediction
    pub prediction_max_steps: u32,

    pub levels: DifficultyTable,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            ai_max_speed: 9.0,
            prediction_max_steps: 500,
            levels: DifficultyTable::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    // Target frames per second (one simulation tick per frame)
    pub target_fps: u64,

    // Colors (RGB values 0-255)
    pub score_color: [u8; 3],
    pub paddle_color: [u8; 3],
    pub ball_color: [u8; 3],
    pub obstacle_color: [u8; 3],
    pub border_color: [u8; 3],
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            target_fps: 60,
            score_color: [255, 255, 255],
            paddle_color: [255, 255, 255],
            ball_color: [255, 255, 255],
            obstacle_color: [120, 160, 255],
            border_color: [100, 100, 100],
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProfileConfig {
    // Player id used for the second human in local two-player matches
    pub guest_player_id: u64,

    // Rating given to players the local ledger has never seen
    pub initial_rating: u32,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            guest_player_id: 2,
            initial_rating: 1000,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TournamentConfig {
    // Entrants for a local tournament, in seeding order
    pub players: Vec<String>,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            players: vec![
                "P1".to_string(),
                "P2".to_string(),
                "P3".to_string(),
                "P4".to_string(),
            ],
        }
    }
}
