// Wire types for the match-lifecycle API

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// Human against the computer
    Ai,
    /// Two humans on one keyboard
    Local,
    FourPlayers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Started,
    Finish,
}

/// Body of a create-match request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMatch {
    pub player1_id: PlayerId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player2_id: Option<PlayerId>,
    pub game: String,
    pub match_type: MatchType,
    pub status: MatchStatus,
}

impl CreateMatch {
    pub fn pong(player1_id: PlayerId, player2_id: Option<PlayerId>, match_type: MatchType) -> Self {
        Self {
            player1_id,
            player2_id,
            game: "pong".to_string(),
            match_type,
            status: MatchStatus::Started,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: MatchId,
}

/// Body of an update-match request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateMatch {
    pub status: MatchStatus,
    pub player_one_points: u32,
    pub player_two_points: u32,
}

/// A participant with their rating after the match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatedPlayer {
    pub id: PlayerId,
    pub elo: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateMatchResponse {
    #[serde(rename = "match")]
    pub record: MatchRecord,
    #[serde(rename = "playerOne", default, skip_serializing_if = "Option::is_none")]
    pub player_one: Option<RatedPlayer>,
    #[serde(rename = "playerTwo", default, skip_serializing_if = "Option::is_none")]
    pub player_two: Option<RatedPlayer>,
}

impl UpdateMatchResponse {
    pub fn players(&self) -> impl Iterator<Item = &RatedPlayer> {
        self.player_one.iter().chain(self.player_two.iter())
    }
}
