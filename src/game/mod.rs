// Pong simulation core

pub mod collision;
pub mod geometry;
pub mod input;
pub mod map;
pub mod physics;
pub mod scoring;
pub mod session;
pub mod state;

pub use input::{poll_input, Command, Control, InputState, KeyMap, KeyTracker};
pub use map::{MapConfig, Obstacle};
pub use physics::{update, PhysicsEvents};
pub use scoring::{Scoreboard, ScoringPolicy, Verdict};
pub use session::{GamePhase, MatchOutcome, MatchSession, MatchSettings, StepReport};
pub use state::{Arena, Ball, Customization, Dimensions, Field, GameMode, Paddle, Slot};
