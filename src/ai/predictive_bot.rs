// Predictive bot with difficulty-scaled reaction time and aim error

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::prediction::predict_intercept;
use super::{Bot, Difficulty};
use crate::config::{AiConfig, DifficultyLevel};
use crate::game::state::{Arena, Dimensions, Slot};

/// Share of the paddle length used as the error band at speed multiplier 0
const ERROR_SCALE: f32 = 0.7;

/// Configuration for a predictive bot's behavior
#[derive(Debug, Clone)]
pub struct PredictiveBotConfig {
    pub name: String,
    pub level: DifficultyLevel,
    pub inject_error: bool,
    pub ai_max_speed: f32,
    pub prediction_max_steps: u32,
}

impl PredictiveBotConfig {
    pub fn for_difficulty(difficulty: Difficulty, config: &AiConfig) -> Self {
        Self {
            name: difficulty.display_name().to_string(),
            level: config.levels.level(difficulty),
            inject_error: difficulty.injects_error(),
            ai_max_speed: config.ai_max_speed,
            prediction_max_steps: config.prediction_max_steps,
        }
    }
}

/// Bot that re-predicts the ball's arrival point on a fixed cadence and
/// slides toward it at a capped speed
pub struct PredictiveBot {
    config: PredictiveBotConfig,
    seed: u64,

    // Cached prediction state
    last_update_ms: Option<u64>,
    target: Option<f32>,

    rng: StdRng,
}

impl PredictiveBot {
    pub fn new(config: PredictiveBotConfig, seed: u64) -> Self {
        Self {
            config,
            seed,
            last_update_ms: None,
            target: None,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn for_difficulty(difficulty: Difficulty, config: &AiConfig, seed: u64) -> Self {
        Self::new(PredictiveBotConfig::for_difficulty(difficulty, config), seed)
    }

    /// Current target along the paddle's axis, if one has been chosen
    pub fn target(&self) -> Option<f32> {
        self.target
    }

    fn should_update(&self, now_ms: u64) -> bool {
        match self.last_update_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= self.config.level.update_interval_ms,
        }
    }

    fn update_target(&mut self, arena: &Arena, slot: Slot, dims: &Dimensions) {
        let centre = arena.field.center().dot(slot.lateral_axis());

        self.target = Some(match predict_intercept(arena, slot, self.config.prediction_max_steps) {
            Some(predicted) => predicted + self.sample_error(dims.paddle_length),
            // Ball moving away: wait in the middle
            None => centre,
        });

        tracing::debug!(
            bot = %self.config.name,
            ?slot,
            target = ?self.target,
            "ai re-predicted"
        );
    }

    /// Uniform offset within +/- paddle_length * (1 - speed_multiplier) * 0.7
    fn sample_error(&mut self, paddle_length: f32) -> f32 {
        if !self.config.inject_error {
            return 0.0;
        }
        let band = paddle_length * (1.0 - self.config.level.speed_multiplier) * ERROR_SCALE;
        if band <= 0.0 {
            return 0.0;
        }
        self.rng.gen_range(-band..=band)
    }
}

impl Bot for PredictiveBot {
    fn steer(&mut self, arena: &Arena, slot: Slot, dims: &Dimensions, now_ms: u64) -> f32 {
        let Some(paddle) = arena.paddle(slot) else {
            return 0.0;
        };

        if self.should_update(now_ms) {
            self.update_target(arena, slot, dims);
            self.last_update_ms = Some(now_ms);
        }

        let target = self
            .target
            .unwrap_or_else(|| arena.field.center().dot(slot.lateral_axis()));
        let max_step = (dims.paddle_speed * self.config.level.speed_multiplier)
            .min(self.config.ai_max_speed)
            .max(0.0);

        (target - paddle.lateral_center()).clamp(-max_step, max_step)
    }

    fn reset(&mut self) {
        self.last_update_ms = None;
        self.target = None;
        self.rng = StdRng::seed_from_u64(self.seed);
    }

    fn name(&self) -> &str {
        &self.config.name
    }
}
