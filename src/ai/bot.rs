// Bot trait for AI opponents

use crate::game::state::{Arena, Dimensions, Slot};

/// Trait for AI paddle controllers
///
/// A bot is asked once per tick how fast its paddle should move. It may keep
/// its own state (cached targets, timers, RNG) between ticks.
pub trait Bot {
    /// Paddle velocity for this tick along the slot's lateral axis
    ///
    /// # Arguments
    /// * `arena` - Current ball, paddles and obstacles
    /// * `slot` - The paddle this bot drives
    /// * `dims` - Match dimensions (paddle speed, lengths)
    /// * `now_ms` - Match clock, used for the decision cadence
    fn steer(&mut self, arena: &Arena, slot: Slot, dims: &Dimensions, now_ms: u64) -> f32;

    /// Reset bot internal state (called when a new match starts)
    fn reset(&mut self);

    /// Bot name for logging and display
    fn name(&self) -> &str;
}
