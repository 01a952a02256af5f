// Match-lifecycle adapter
// Turns session events into API requests and API responses into local state

pub mod client;
pub mod ledger;
pub mod profile;
pub mod reporter;
pub mod types;

pub use client::MatchApi;
pub use ledger::LocalLedger;
pub use profile::Profile;
pub use reporter::{MatchReporter, ReportEvent};
pub use types::{
    CreateMatch, MatchId, MatchRecord, MatchStatus, MatchType, PlayerId, RatedPlayer, UpdateMatch,
    UpdateMatchResponse,
};

use crate::config::ProfileConfig;
use crate::error::StartError;
use crate::game::session::MatchOutcome;
use crate::game::state::{GameMode, Slot};

/// Build the create-match request for a mode.
///
/// Tournament sub-matches keep no record and get `None`. Every other mode
/// needs a signed-in user; the second human in local modes plays as the
/// configured guest.
pub fn create_request(
    mode: GameMode,
    profile: &Profile,
    config: &ProfileConfig,
) -> Result<Option<CreateMatch>, StartError> {
    if mode == GameMode::Tournament {
        return Ok(None);
    }
    let user = profile.user_id.ok_or(StartError::NotSignedIn)?;
    let guest = PlayerId(config.guest_player_id);

    let request = match mode {
        GameMode::OnePlayer => CreateMatch::pong(user, None, MatchType::Ai),
        GameMode::TwoPlayers => CreateMatch::pong(user, Some(guest), MatchType::Local),
        GameMode::FourPlayers => CreateMatch::pong(user, Some(guest), MatchType::FourPlayers),
        GameMode::Tournament => return Ok(None),
    };
    Ok(Some(request))
}

/// Final-score request: player one is the left slot, player two the right.
///
/// In four-player matches player one still gets Left's remaining lives, while
/// player two stands for the rest of the table and gets the most lives any
/// other slot kept. A Top or Bottom win therefore records as a loss for Left.
pub fn finish_request(outcome: &MatchOutcome) -> UpdateMatch {
    let player_two_points = if outcome.mode == GameMode::FourPlayers {
        outcome
            .scores
            .iter()
            .filter(|(slot, _)| *slot != Slot::Left)
            .map(|(_, lives)| *lives)
            .max()
            .unwrap_or(0)
    } else {
        outcome.score(Slot::Right)
    };

    UpdateMatch {
        status: MatchStatus::Finish,
        player_one_points: outcome.score(Slot::Left),
        player_two_points,
    }
}
