use serde::{Deserialize, Serialize};

use crate::types::{GameTally, Side};

/// Fixed scoring constants for a match.
///
/// There is no tiebreak game: a set reaching `extended_games` is won as soon
/// as the other side sits one or two games behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRules {
    /// Games needed to take a set outright.
    pub games_to_win_set: u32,
    /// Minimum game lead from `games_to_win_set` up to `extended_games`.
    pub lead_to_win_set: u32,
    /// Game count that closes a set without a full lead.
    pub extended_games: u32,
    /// Sets needed to take the match.
    pub sets_to_win: u32,
    /// Upper bound on sets played.
    pub max_sets: u32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            games_to_win_set: 6,
            lead_to_win_set: 2,
            extended_games: 7,
            sets_to_win: 2,
            max_sets: 3,
        }
    }
}

impl ScoringRules {
    /// Returns true when `games` closes the set for `side`.
    pub fn wins_set(&self, games: GameTally, side: Side) -> bool {
        let own = games.of(side);
        let other = games.of(side.other());

        let lead = own.saturating_sub(other);

        let regular = own >= self.games_to_win_set
            && own < self.extended_games
            && lead >= self.lead_to_win_set;
        let extended = own == self.extended_games
            && other.saturating_add(2) >= self.extended_games
            && other < self.extended_games;
        regular || extended
    }

    /// Side that has closed the set on `games`, if any.
    pub fn set_winner(&self, games: GameTally) -> Option<Side> {
        [Side::Player, Side::Opponent]
            .into_iter()
            .find(|side| self.wins_set(games, *side))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_with_two_game_lead_wins() {
        let rules = ScoringRules::default();
        assert_eq!(rules.set_winner(GameTally::new(6, 3)), Some(Side::Player));
        assert_eq!(rules.set_winner(GameTally::new(4, 6)), Some(Side::Opponent));
        assert_eq!(rules.set_winner(GameTally::new(6, 5)), None);
    }

    #[test]
    fn seven_requires_five_or_six_behind() {
        let rules = ScoringRules::default();
        assert_eq!(rules.set_winner(GameTally::new(7, 5)), Some(Side::Player));
        assert_eq!(rules.set_winner(GameTally::new(6, 7)), Some(Side::Opponent));
        assert_eq!(rules.set_winner(GameTally::new(7, 4)), None);
    }

    #[test]
    fn longer_sets_close_on_lead_before_extended_count() {
        let rules = ScoringRules {
            extended_games: 9,
            ..ScoringRules::default()
        };
        assert_eq!(rules.set_winner(GameTally::new(6, 5)), None);
        assert_eq!(rules.set_winner(GameTally::new(7, 5)), Some(Side::Player));
        assert_eq!(rules.set_winner(GameTally::new(7, 8)), None);
        assert_eq!(rules.set_winner(GameTally::new(7, 9)), Some(Side::Opponent));
    }

    #[test]
    fn huge_lead_requirement_does_not_overflow() {
        let rules = ScoringRules {
            lead_to_win_set: u32::MAX,
            ..ScoringRules::default()
        };
        assert_eq!(rules.set_winner(GameTally::new(6, 1)), None);
        assert_eq!(rules.set_winner(GameTally::new(u32::MAX, 1)), None);
        assert_eq!(rules.set_winner(GameTally::new(7, 6)), Some(Side::Player));
    }
}
