// Reasons a match can refuse to start

use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartError {
    /// No local user id; every recorded match needs one
    NotSignedIn,
    /// The match record has not been created yet
    MissingMatchId,
    /// Map name matched neither a custom nor a built-in map
    UnknownMap(String),
    /// `begin` called outside the menu phase
    NotInMenu,
    /// The match-lifecycle API refused to create the match
    CreateFailed(String),
}

impl fmt::Display for StartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartError::NotSignedIn => write!(f, "no player profile: set a user id before playing"),
            StartError::MissingMatchId => write!(f, "match has no record id yet"),
            StartError::UnknownMap(name) => write!(f, "unknown map: {}", name),
            StartError::NotInMenu => write!(f, "a match is already running"),
            StartError::CreateFailed(reason) => write!(f, "could not create match: {}", reason),
        }
    }
}

impl Error for StartError {}
