//! Arcade Pong: a deterministic Pong simulation core with a terminal front end.
//!
//! The simulation (`game`, `ai`) knows nothing about terminals or the match
//! API; `controller` wires it to the reporter thread (`api`) and the renderer
//! (`ui`, `menu`).

pub mod ai;
pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod game;
pub mod logging;
pub mod menu;
pub mod tournament;
pub mod ui;

pub use error::StartError;
