// In-process match ledger with Elo ratings
//
// Stands in for the match-lifecycle backend when playing offline. Players
// must be registered before a match can reference them.

use anyhow::{anyhow, bail, Result};
use futures::future::{self, BoxFuture, FutureExt};
use std::collections::HashMap;
use std::sync::Mutex;

use super::client::MatchApi;
use super::types::{
    CreateMatch, MatchId, MatchRecord, MatchStatus, PlayerId, RatedPlayer, UpdateMatch,
    UpdateMatchResponse,
};

/// Elo K-factor
pub const K_FACTOR: f64 = 32.0;

/// New rating after one game: `score` is 1 for a win, 0.5 for a draw, 0 for a loss
pub fn elo_update(rating: u32, opponent: u32, score: f64) -> u32 {
    let expected = 1.0 / (1.0 + 10f64.powf((opponent as f64 - rating as f64) / 400.0));
    let updated = rating as f64 + K_FACTOR * (score - expected);
    updated.round().max(0.0) as u32
}

#[derive(Debug, Clone)]
struct StoredMatch {
    request: CreateMatch,
    status: MatchStatus,
    points: Option<(u32, u32)>,
}

#[derive(Debug, Default)]
struct LedgerState {
    players: HashMap<PlayerId, (String, u32)>,
    matches: HashMap<MatchId, StoredMatch>,
    next_id: u64,
}

#[derive(Debug)]
pub struct LocalLedger {
    state: Mutex<LedgerState>,
    initial_rating: u32,
}

impl LocalLedger {
    pub fn new(initial_rating: u32) -> Self {
        Self {
            state: Mutex::new(LedgerState {
                next_id: 1,
                ..Default::default()
            }),
            initial_rating,
        }
    }

    /// Add a player (or rename one) keeping any rating they already have
    pub fn register_player(&self, id: PlayerId, name: &str, rating: Option<u32>) -> Result<()> {
        let mut state = self.lock()?;
        let entry = state
            .players
            .entry(id)
            .or_insert_with(|| (name.to_string(), rating.unwrap_or(self.initial_rating)));
        entry.0 = name.to_string();
        Ok(())
    }

    pub fn rating(&self, id: PlayerId) -> Option<u32> {
        self.lock().ok()?.players.get(&id).map(|(_, elo)| *elo)
    }

    pub fn match_points(&self, id: MatchId) -> Option<(u32, u32)> {
        self.lock().ok()?.matches.get(&id)?.points
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, LedgerState>> {
        self.state.lock().map_err(|_| anyhow!("ledger lock poisoned"))
    }

    fn create(&self, request: CreateMatch) -> Result<MatchRecord> {
        let mut state = self.lock()?;

        for id in std::iter::once(request.player1_id).chain(request.player2_id) {
            if !state.players.contains_key(&id) {
                bail!("unknown player id {}", id);
            }
        }

        let id = MatchId(state.next_id);
        state.next_id += 1;
        state.matches.insert(
            id,
            StoredMatch {
                request,
                status: MatchStatus::Started,
                points: None,
            },
        );

        tracing::debug!(match_id = %id, "ledger created match");
        Ok(MatchRecord { id })
    }

    fn update(&self, id: MatchId, request: UpdateMatch) -> Result<UpdateMatchResponse> {
        let mut state = self.lock()?;
        let initial = self.initial_rating;

        let stored = state
            .matches
            .get_mut(&id)
            .ok_or_else(|| anyhow!("unknown match {}", id))?;
        if stored.status == MatchStatus::Finish {
            bail!("match {} is already finished", id);
        }
        stored.status = request.status;
        stored.points = Some((request.player_one_points, request.player_two_points));
        let players = (stored.request.player1_id, stored.request.player2_id);

        let score_one = match request.player_one_points.cmp(&request.player_two_points) {
            std::cmp::Ordering::Greater => 1.0,
            std::cmp::Ordering::Less => 0.0,
            std::cmp::Ordering::Equal => 0.5,
        };

        let rating_of = |state: &LedgerState, id: PlayerId| {
            state.players.get(&id).map_or(initial, |(_, elo)| *elo)
        };
        let one_before = rating_of(&*state, players.0);
        // The computer opponent plays at the starting rating
        let two_before = players.1.map_or(initial, |p| rating_of(&*state, p));

        let one_after = elo_update(one_before, two_before, score_one);
        if let Some((_, elo)) = state.players.get_mut(&players.0) {
            *elo = one_after;
        }

        let player_two = match players.1 {
            Some(two) => {
                let two_after = elo_update(two_before, one_before, 1.0 - score_one);
                if let Some((_, elo)) = state.players.get_mut(&two) {
                    *elo = two_after;
                }
                Some(RatedPlayer {
                    id: two,
                    elo: two_after,
                })
            }
            None => None,
        };

        tracing::debug!(match_id = %id, one_before, one_after, "ledger finished match");

        Ok(UpdateMatchResponse {
            record: MatchRecord { id },
            player_one: Some(RatedPlayer {
                id: players.0,
                elo: one_after,
            }),
            player_two,
        })
    }
}

impl MatchApi for LocalLedger {
    fn create_match(&self, request: CreateMatch) -> BoxFuture<'_, Result<MatchRecord>> {
        future::ready(self.create(request)).boxed()
    }

    fn update_match(&self, id: MatchId, request: UpdateMatch) -> BoxFuture<'_, Result<UpdateMatchResponse>> {
        future::ready(self.update(id, request)).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::MatchType;
    use futures::executor::block_on;

    fn ledger() -> LocalLedger {
        let ledger = LocalLedger::new(1000);
        ledger.register_player(PlayerId(1), "alice", None).unwrap();
        ledger.register_player(PlayerId(2), "guest", None).unwrap();
        ledger
    }

    fn finish(one: u32, two: u32) -> UpdateMatch {
        UpdateMatch {
            status: MatchStatus::Finish,
            player_one_points: one,
            player_two_points: two,
        }
    }

    #[test]
    fn test_elo_update_even_match() {
        assert_eq!(elo_update(1000, 1000, 1.0), 1016);
        assert_eq!(elo_update(1000, 1000, 0.0), 984);
        assert_eq!(elo_update(1000, 1000, 0.5), 1000);
        // Beating a much stronger player is worth more
        assert!(elo_update(1000, 1400, 1.0) > 1016);
    }

    #[test]
    fn test_rejects_unknown_players() {
        let ledger = ledger();
        let bad = CreateMatch::pong(PlayerId(1), Some(PlayerId(99)), MatchType::Local);
        assert!(block_on(ledger.create_match(bad)).is_err());

        let unknown = CreateMatch::pong(PlayerId(42), None, MatchType::Ai);
        assert!(block_on(ledger.create_match(unknown)).is_err());
    }

    #[test]
    fn test_winner_rated_up_loser_down() {
        let ledger = ledger();
        let request = CreateMatch::pong(PlayerId(1), Some(PlayerId(2)), MatchType::Local);
        let record = block_on(ledger.create_match(request)).unwrap();

        let response = block_on(ledger.update_match(record.id, finish(5, 2))).unwrap();
        assert_eq!(response.record.id, record.id);
        assert_eq!(response.player_one.unwrap().elo, 1016);
        assert_eq!(response.player_two.unwrap().elo, 984);
        assert_eq!(ledger.rating(PlayerId(1)), Some(1016));
        assert_eq!(ledger.match_points(record.id), Some((5, 2)));
    }

    #[test]
    fn test_ai_match_rates_only_the_human() {
        let ledger = ledger();
        let request = CreateMatch::pong(PlayerId(1), None, MatchType::Ai);
        let record = block_on(ledger.create_match(request)).unwrap();

        let response = block_on(ledger.update_match(record.id, finish(1, 5))).unwrap();
        assert_eq!(response.player_one.unwrap().elo, 984);
        assert!(response.player_two.is_none());
    }

    #[test]
    fn test_cannot_finish_twice() {
        let ledger = ledger();
        let request = CreateMatch::pong(PlayerId(1), None, MatchType::Ai);
        let record = block_on(ledger.create_match(request)).unwrap();

        block_on(ledger.update_match(record.id, finish(5, 0))).unwrap();
        assert!(block_on(ledger.update_match(record.id, finish(5, 0))).is_err());
        assert!(block_on(ledger.update_match(MatchId(77), finish(1, 0))).is_err());
    }
}
