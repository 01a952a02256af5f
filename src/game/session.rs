//! The match state machine.
//!
//! One `MatchSession` drives every variant. A `ModeProfile` decides the
//! layout, a `ScoringPolicy` decides how a crossing is counted, and an
//! optional bot steers the AI paddle. The caller supplies held keys and a
//! millisecond clock once per tick.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::input::InputState;
use super::map::MapConfig;
use super::physics::{self, PhysicsEvents};
use super::scoring::{Scoreboard, ScoringPolicy, Verdict};
use super::state::{Arena, Customization, Dimensions, GameMode, ModeProfile, Slot};
use crate::ai::{create_bot, Bot, Difficulty};
use crate::api::MatchId;
use crate::config::Config;
use crate::error::StartError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Menu,
    Playing,
    /// Ball centred and still until `resume_at_ms`, then served
    Scored { resume_at_ms: u64 },
    GameOver,
}

/// Choices fixed when the match is created
#[derive(Debug, Clone, PartialEq)]
pub struct MatchSettings {
    pub mode: GameMode,
    pub difficulty: Difficulty,
    pub map: String,
    pub custom: Customization,
}

impl MatchSettings {
    pub fn new(mode: GameMode) -> Self {
        Self {
            mode,
            difficulty: Difficulty::Medium,
            map: "classic".to_string(),
            custom: Customization::default(),
        }
    }
}

/// Final state of a finished match
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    pub mode: GameMode,
    pub winner: Slot,
    /// Points, or lives left in lives mode, per slot in play
    pub scores: Vec<(Slot, u32)>,
    pub match_id: Option<MatchId>,
}

impl MatchOutcome {
    pub fn score(&self, slot: Slot) -> u32 {
        self.scores
            .iter()
            .find(|(s, _)| *s == slot)
            .map_or(0, |(_, value)| *value)
    }
}

/// What happened during one `step`
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct StepReport {
    pub events: PhysicsEvents,
    pub verdict: Option<Verdict>,
}

impl StepReport {
    pub fn finished(&self) -> bool {
        matches!(self.verdict, Some(Verdict::Winner(_)))
    }
}

type FinishCallback = Box<dyn FnMut(&MatchOutcome)>;

pub struct MatchSession {
    settings: MatchSettings,
    profile: ModeProfile,
    dims: Dimensions,
    map: MapConfig,
    scoreboard: Scoreboard,
    arena: Arena,
    phase: GamePhase,
    bot: Option<Box<dyn Bot>>,
    match_id: Option<MatchId>,
    winner: Option<Slot>,
    outcome: Option<MatchOutcome>,
    next_serve: Slot,
    scored_pause_ms: u64,
    rng: StdRng,
    on_finish: Option<FinishCallback>,
}

impl MatchSession {
    /// Build a session in the `Menu` phase.
    ///
    /// Fails only if the map name is unknown in a mode that allows obstacles.
    pub fn new(settings: MatchSettings, config: &Config) -> Result<Self, StartError> {
        let profile = ModeProfile::for_mode(settings.mode, &config.field);
        let dims = Dimensions::for_mode(settings.mode, &config.physics, &settings.custom);

        let map = if profile.allows_obstacles {
            MapConfig::resolve(&settings.map, &config.maps, profile.field.size)
                .ok_or_else(|| StartError::UnknownMap(settings.map.clone()))?
        } else {
            MapConfig::empty()
        };

        let policy = if profile.lives_mode {
            ScoringPolicy::Lives {
                starting_lives: config.physics.starting_lives,
            }
        } else {
            ScoringPolicy::Points {
                winning_score: config.physics.winning_score,
            }
        };

        let seed = config.physics.rng_seed.unwrap_or_else(rand::random);
        let bot = profile
            .ai_slot
            .map(|_| create_bot(settings.difficulty, &config.ai, seed.wrapping_add(1)));

        tracing::info!(
            mode = ?settings.mode,
            map = %map.name,
            obstacles = map.obstacles.len(),
            bot = ?bot.as_ref().map(|b| b.name()),
            seed,
            "match session created"
        );

        Ok(Self {
            scoreboard: Scoreboard::new(policy, &profile.slots),
            arena: profile.build_arena(&dims, map.obstacles.clone()),
            settings,
            profile,
            dims,
            map,
            phase: GamePhase::Menu,
            bot,
            match_id: None,
            winner: None,
            outcome: None,
            next_serve: Slot::Right,
            scored_pause_ms: config.physics.scored_pause_ms,
            rng: StdRng::seed_from_u64(seed),
            on_finish: None,
        })
    }

    /// Register a callback fired once each time the match reaches `GameOver`
    pub fn on_finish(&mut self, callback: FinishCallback) {
        self.on_finish = Some(callback);
    }

    /// Leave the menu and serve.
    ///
    /// Modes that keep a match record need its id before play starts.
    pub fn begin(&mut self, match_id: Option<MatchId>, now_ms: u64) -> Result<(), StartError> {
        if self.phase != GamePhase::Menu {
            return Err(StartError::NotInMenu);
        }
        if self.profile.creates_match_record && match_id.is_none() {
            return Err(StartError::MissingMatchId);
        }

        self.match_id = match_id;
        if let Some(bot) = self.bot.as_mut() {
            bot.reset();
        }
        self.phase = GamePhase::Playing;
        self.serve(self.next_serve);

        tracing::info!(mode = ?self.settings.mode, match_id = ?self.match_id, now_ms, "match started");
        Ok(())
    }

    /// Advance one tick
    pub fn step(&mut self, input: &InputState, now_ms: u64) -> StepReport {
        match self.phase {
            GamePhase::Menu | GamePhase::GameOver => StepReport::default(),
            GamePhase::Scored { resume_at_ms } => {
                if now_ms >= resume_at_ms {
                    self.phase = GamePhase::Playing;
                    self.serve(self.next_serve);
                }
                StepReport::default()
            }
            GamePhase::Playing => self.play_tick(input, now_ms),
        }
    }

    fn play_tick(&mut self, input: &InputState, now_ms: u64) -> StepReport {
        let ai_slot = self.profile.ai_slot;
        let velocities: Vec<(Slot, f32)> = self
            .arena
            .paddles
            .iter()
            .filter(|p| p.alive)
            .map(|p| {
                let velocity = match self.bot.as_mut() {
                    Some(bot) if ai_slot == Some(p.slot) => {
                        bot.steer(&self.arena, p.slot, &self.dims, now_ms)
                    }
                    _ => input.axis(p.slot) * self.dims.paddle_speed,
                };
                (p.slot, velocity)
            })
            .collect();

        for (slot, velocity) in velocities {
            if let Some(paddle) = self.arena.paddle_mut(slot) {
                paddle.velocity = velocity;
            }
        }

        let events = physics::update(&mut self.arena, &self.dims);
        let mut report = StepReport {
            events,
            verdict: None,
        };

        let Some(conceded) = events.boundary_crossed else {
            return report;
        };

        let verdict = self.scoreboard.register_crossing(conceded, &mut self.arena);
        report.verdict = Some(verdict);

        match verdict {
            Verdict::Winner(winner) => self.finish(winner),
            Verdict::Continue { scorer, eliminated } => {
                tracing::info!(%conceded, ?scorer, ?eliminated, scores = ?self.scoreboard.entries(), "point");
                self.next_serve = self.serve_target(conceded);
                self.arena.ball.recenter(&self.arena.field);
                self.phase = GamePhase::Scored {
                    resume_at_ms: now_ms + self.scored_pause_ms,
                };
            }
        }

        report
    }

    /// Two-sided matches serve toward whoever conceded; lives mode picks a random live slot
    fn serve_target(&mut self, conceded: Slot) -> Slot {
        if !self.profile.lives_mode {
            return conceded;
        }
        let alive: Vec<Slot> = self
            .arena
            .paddles
            .iter()
            .filter(|p| p.alive)
            .map(|p| p.slot)
            .collect();
        if alive.is_empty() {
            return conceded;
        }
        alive[self.rng.gen_range(0..alive.len())]
    }

    fn serve(&mut self, toward: Slot) {
        let spread = self.dims.serve_spread;
        let angle = if spread > 0.0 {
            self.rng.gen_range(-spread..=spread)
        } else {
            0.0
        };
        let direction = -toward.face_normal() * angle.cos() + toward.lateral_axis() * angle.sin();

        let ball = &mut self.arena.ball;
        ball.recenter(&self.arena.field);
        ball.vel = direction * self.dims.ball_speed;

        tracing::debug!(%toward, angle_deg = angle.to_degrees(), "serve");
    }

    fn finish(&mut self, winner: Slot) {
        self.phase = GamePhase::GameOver;
        self.winner = Some(winner);
        self.arena.ball.recenter(&self.arena.field);
        for paddle in self.arena.paddles.iter_mut() {
            paddle.velocity = 0.0;
        }

        let outcome = MatchOutcome {
            mode: self.settings.mode,
            winner,
            scores: self.scoreboard.entries(),
            match_id: self.match_id,
        };
        tracing::info!(%winner, scores = ?outcome.scores, "match over");

        if let Some(callback) = self.on_finish.as_mut() {
            callback(&outcome);
        }
        self.outcome = Some(outcome);
    }

    /// Back to the menu with a fresh score, centred ball and paddles
    pub fn reset(&mut self) {
        self.phase = GamePhase::Menu;
        self.scoreboard.reset();
        self.arena = self.profile.build_arena(&self.dims, self.map.obstacles.clone());
        self.winner = None;
        self.outcome = None;
        self.match_id = None;
        self.next_serve = Slot::Right;
        if let Some(bot) = self.bot.as_mut() {
            bot.reset();
        }
        tracing::debug!(mode = ?self.settings.mode, "match reset");
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn mode(&self) -> GameMode {
        self.settings.mode
    }

    pub fn settings(&self) -> &MatchSettings {
        &self.settings
    }

    pub fn profile(&self) -> &ModeProfile {
        &self.profile
    }

    pub fn dimensions(&self) -> &Dimensions {
        &self.dims
    }

    pub fn map_name(&self) -> &str {
        &self.map.name
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Direct access to the simulated world, for tools and scenario tests
    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    pub fn winner(&self) -> Option<Slot> {
        self.winner
    }

    pub fn outcome(&self) -> Option<&MatchOutcome> {
        self.outcome.as_ref()
    }

    pub fn match_id(&self) -> Option<MatchId> {
        self.match_id
    }

    pub fn bot_name(&self) -> Option<&str> {
        self.bot.as_ref().map(|b| b.name())
    }
}
