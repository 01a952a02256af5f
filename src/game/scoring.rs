// Points and lives scoring for every match variant

use super::state::{Arena, Slot};

/// How a boundary crossing is counted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringPolicy {
    /// The side that did not concede scores; first to `winning_score` wins
    Points { winning_score: u32 },
    /// The conceding slot loses a life; last paddle alive wins
    Lives { starting_lives: u32 },
}

/// Result of registering one crossing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Continue {
        scorer: Option<Slot>,
        eliminated: Option<Slot>,
    },
    Winner(Slot),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scoreboard {
    policy: ScoringPolicy,
    slots: Vec<Slot>,
    counters: [u32; 4],
}

impl Scoreboard {
    pub fn new(policy: ScoringPolicy, slots: &[Slot]) -> Self {
        let mut board = Self {
            policy,
            slots: slots.to_vec(),
            counters: [0; 4],
        };
        board.reset();
        board
    }

    pub fn reset(&mut self) {
        let start = match self.policy {
            ScoringPolicy::Points { .. } => 0,
            ScoringPolicy::Lives { starting_lives } => starting_lives,
        };
        self.counters = [0; 4];
        for slot in &self.slots {
            self.counters[slot.index()] = start;
        }
    }

    pub fn policy(&self) -> ScoringPolicy {
        self.policy
    }

    /// Points scored, or lives left in lives mode
    pub fn get(&self, slot: Slot) -> u32 {
        self.counters[slot.index()]
    }

    /// Counters for the slots in play, in slot order
    pub fn entries(&self) -> Vec<(Slot, u32)> {
        self.slots.iter().map(|&s| (s, self.get(s))).collect()
    }

    /// The slot with a strictly higher score than everyone else, if any
    pub fn leader(&self) -> Option<Slot> {
        let best = self.slots.iter().map(|&s| self.get(s)).max()?;
        let mut leaders = self.slots.iter().filter(|&&s| self.get(s) == best);
        match (leaders.next(), leaders.next()) {
            (Some(&slot), None) => Some(slot),
            _ => None,
        }
    }

    /// Count a crossing of `conceded`'s boundary.
    ///
    /// In lives mode an eliminated paddle is switched off and its boundary
    /// turned into a wall.
    pub fn register_crossing(&mut self, conceded: Slot, arena: &mut Arena) -> Verdict {
        match self.policy {
            ScoringPolicy::Points { winning_score } => {
                let scorer = conceded.opponent();
                self.counters[scorer.index()] += 1;

                if self.get(scorer) >= winning_score {
                    if let Some(winner) = self.leader() {
                        return Verdict::Winner(winner);
                    }
                }
                Verdict::Continue {
                    scorer: Some(scorer),
                    eliminated: None,
                }
            }
            ScoringPolicy::Lives { .. } => {
                let lives = &mut self.counters[conceded.index()];
                *lives = lives.saturating_sub(1);

                let eliminated = if *lives == 0 {
                    if let Some(paddle) = arena.paddle_mut(conceded) {
                        paddle.alive = false;
                        paddle.velocity = 0.0;
                    }
                    arena.walls.set_solid(conceded);
                    Some(conceded)
                } else {
                    None
                };

                let mut alive = self.slots.iter().filter(|&&s| self.get(s) > 0);
                match (alive.next(), alive.next()) {
                    (Some(&last), None) => Verdict::Winner(last),
                    _ => Verdict::Continue {
                        scorer: None,
                        eliminated,
                    },
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::game::state::{profile_and_dimensions, GameMode};

    fn arena(mode: GameMode) -> Arena {
        let (profile, dims) = profile_and_dimensions(mode, &Config::default());
        profile.build_arena(&dims, Vec::new())
    }

    #[test]
    fn test_points_first_to_threshold() {
        let mut arena = arena(GameMode::TwoPlayers);
        let mut board = Scoreboard::new(
            ScoringPolicy::Points { winning_score: 3 },
            &[Slot::Left, Slot::Right],
        );

        assert_eq!(
            board.register_crossing(Slot::Right, &mut arena),
            Verdict::Continue {
                scorer: Some(Slot::Left),
                eliminated: None
            }
        );
        board.register_crossing(Slot::Left, &mut arena);
        board.register_crossing(Slot::Right, &mut arena);
        assert_eq!(board.leader(), Some(Slot::Left));

        assert_eq!(
            board.register_crossing(Slot::Right, &mut arena),
            Verdict::Winner(Slot::Left)
        );
        assert_eq!(board.get(Slot::Left), 3);
        assert_eq!(board.get(Slot::Right), 1);
    }

    #[test]
    fn test_leader_requires_strictly_higher() {
        let mut arena = arena(GameMode::TwoPlayers);
        let mut board = Scoreboard::new(
            ScoringPolicy::Points { winning_score: 5 },
            &[Slot::Left, Slot::Right],
        );
        assert_eq!(board.leader(), None);
        board.register_crossing(Slot::Left, &mut arena);
        board.register_crossing(Slot::Right, &mut arena);
        assert_eq!(board.leader(), None);
    }

    #[test]
    fn test_lives_elimination_turns_boundary_solid() {
        let mut arena = arena(GameMode::FourPlayers);
        let mut board = Scoreboard::new(ScoringPolicy::Lives { starting_lives: 2 }, &Slot::ALL);

        assert_eq!(board.get(Slot::Top), 2);
        board.register_crossing(Slot::Top, &mut arena);
        assert!(!arena.walls.is_solid(Slot::Top));

        let verdict = board.register_crossing(Slot::Top, &mut arena);
        assert_eq!(
            verdict,
            Verdict::Continue {
                scorer: None,
                eliminated: Some(Slot::Top)
            }
        );
        assert!(arena.walls.is_solid(Slot::Top));
        assert!(!arena.paddle(Slot::Top).unwrap().alive);
    }

    #[test]
    fn test_last_alive_wins() {
        let mut arena = arena(GameMode::FourPlayers);
        let mut board = Scoreboard::new(ScoringPolicy::Lives { starting_lives: 1 }, &Slot::ALL);

        board.register_crossing(Slot::Left, &mut arena);
        board.register_crossing(Slot::Bottom, &mut arena);
        let verdict = board.register_crossing(Slot::Right, &mut arena);

        assert_eq!(verdict, Verdict::Winner(Slot::Top));
        assert!(arena.paddle(Slot::Top).unwrap().alive);
    }

    #[test]
    fn test_reset_restores_starting_counters() {
        let mut arena = arena(GameMode::FourPlayers);
        let mut board = Scoreboard::new(ScoringPolicy::Lives { starting_lives: 3 }, &Slot::ALL);
        board.register_crossing(Slot::Left, &mut arena);
        board.reset();
        assert!(board.entries().iter().all(|&(_, lives)| lives == 3));
    }
}
