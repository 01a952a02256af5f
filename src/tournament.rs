// Local single-elimination tournament bracket
//
// Rounds are played in order. With an odd number of entrants the last one
// gets a bye into the next round.

use anyhow::{bail, Result};

use crate::game::state::Slot;

/// One sub-match: `left` plays the left paddle, `right` the right one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pairing {
    pub round: usize,
    pub left: String,
    pub right: String,
}

#[derive(Debug, Clone)]
pub struct Bracket {
    round: usize,
    entrants: Vec<String>,
    cursor: usize,
    advancing: Vec<String>,
    champion: Option<String>,
    results: Vec<(Pairing, String)>,
}

impl Bracket {
    /// Create a tournament; needs at least two distinct entrants
    pub fn new(names: Vec<String>) -> Result<Self> {
        if names.len() < 2 {
            bail!("a tournament needs at least two players, got {}", names.len());
        }
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                bail!("duplicate tournament player: {}", name);
            }
        }

        let mut bracket = Self {
            round: 0,
            entrants: Vec::new(),
            cursor: 0,
            advancing: Vec::new(),
            champion: None,
            results: Vec::new(),
        };
        bracket.start_round(names);
        Ok(bracket)
    }

    fn start_round(&mut self, mut entrants: Vec<String>) {
        self.round += 1;
        self.cursor = 0;
        self.advancing.clear();
        if entrants.len() % 2 == 1 {
            if let Some(bye) = entrants.pop() {
                tracing::info!(round = self.round, player = %bye, "bye");
                self.advancing.push(bye);
            }
        }
        self.entrants = entrants;
    }

    /// The match to play next, or None once there is a champion
    pub fn next_pairing(&self) -> Option<Pairing> {
        if self.champion.is_some() {
            return None;
        }
        let left = self.entrants.get(self.cursor)?;
        let right = self.entrants.get(self.cursor + 1)?;
        Some(Pairing {
            round: self.round,
            left: left.clone(),
            right: right.clone(),
        })
    }

    /// Record the winner of the current pairing and move the bracket on
    pub fn advance(&mut self, winner: Slot) -> Result<()> {
        let Some(pairing) = self.next_pairing() else {
            bail!("no match in progress");
        };
        let name = match winner {
            Slot::Left => pairing.left.clone(),
            Slot::Right => pairing.right.clone(),
            other => bail!("tournament matches have no {} player", other),
        };

        tracing::info!(round = pairing.round, winner = %name, "tournament match decided");
        self.advancing.push(name.clone());
        self.results.push((pairing, name));
        self.cursor += 2;

        if self.cursor + 1 >= self.entrants.len() {
            let advancing = std::mem::take(&mut self.advancing);
            if advancing.len() == 1 {
                self.champion = advancing.into_iter().next();
                tracing::info!(champion = ?self.champion, "tournament over");
            } else {
                self.start_round(advancing);
            }
        }
        Ok(())
    }

    pub fn champion(&self) -> Option<&str> {
        self.champion.as_deref()
    }

    pub fn round(&self) -> usize {
        self.round
    }

    /// Finished pairings with their winners, in play order
    pub fn results(&self) -> &[(Pairing, String)] {
        &self.results
    }
}
