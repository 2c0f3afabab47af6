//! Move parsing and round resolution.
//!
//! This module contains pure functions that implement the round-resolution
//! logic without side effects, making them easy to test.

/// A move held in a seat's pending slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Rock,
    Paper,
    Scissors,
    /// A submitted payload that selected none of the three moves. Occupies
    /// the slot and resolves the round to "invalid input".
    Invalid,
}

impl Move {
    /// Parse a submitted payload into a move, looking at the first byte only.
    ///
    /// `b'r'` / `b'p'` / `b's'` select the corresponding move. An empty
    /// payload means "no move submitted" and returns `None`; any other first
    /// byte is a submitted-but-invalid move. Trailing bytes are ignored.
    pub fn parse(payload: &[u8]) -> Option<Move> {
        match payload.first() {
            None => None,
            Some(b'r') => Some(Move::Rock),
            Some(b'p') => Some(Move::Paper),
            Some(b's') => Some(Move::Scissors),
            Some(_) => Some(Move::Invalid),
        }
    }

    /// Human-readable form used in reveal broadcasts.
    pub fn describe(self) -> &'static str {
        match self {
            Move::Rock => "rock",
            Move::Paper => "paper",
            Move::Scissors => "scissors",
            Move::Invalid => "an invalid move",
        }
    }

    fn ordinal(self) -> Option<usize> {
        match self {
            Move::Rock => Some(0),
            Move::Paper => Some(1),
            Move::Scissors => Some(2),
            Move::Invalid => None,
        }
    }
}

/// Outcome of one resolved round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    Tie,
    FirstWins,
    SecondWins,
    InvalidInput,
}

use RoundOutcome::{FirstWins, SecondWins, Tie};

/// Payoff table indexed by `[first move][second move]`:
/// rock beats scissors, paper beats rock, scissors beats paper.
const PAYOFF: [[RoundOutcome; 3]; 3] = [
    [Tie, SecondWins, FirstWins],  // rock vs rock, paper, scissors
    [FirstWins, Tie, SecondWins],  // paper
    [SecondWins, FirstWins, Tie],  // scissors
];

/// Resolve one round. Total over all 16 move combinations: an invalid move on
/// either side yields `InvalidInput` regardless of the other side.
pub fn resolve_round(first: Move, second: Move) -> RoundOutcome {
    match (first.ordinal(), second.ordinal()) {
        (Some(f), Some(s)) => PAYOFF[f][s],
        _ => RoundOutcome::InvalidInput,
    }
}

/// Format the reveal line broadcast for one seat's move.
pub fn reveal_line(name: &str, mv: Move) -> String {
    format!("message: {} played {}", name, mv.describe())
}

/// Format the result line broadcast after both reveals.
pub fn result_line(outcome: RoundOutcome, first_name: &str, second_name: &str) -> String {
    match outcome {
        RoundOutcome::Tie => "result: tie".to_string(),
        RoundOutcome::FirstWins => format!("result: {} wins", first_name),
        RoundOutcome::SecondWins => format!("result: {} wins", second_name),
        RoundOutcome::InvalidInput => "result: invalid input".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_MOVES: [Move; 4] = [Move::Rock, Move::Paper, Move::Scissors, Move::Invalid];

    #[test]
    fn test_parse_selects_move_from_first_byte() {
        assert_eq!(Move::parse(b"r"), Some(Move::Rock));
        assert_eq!(Move::parse(b"p"), Some(Move::Paper));
        assert_eq!(Move::parse(b"s"), Some(Move::Scissors));
        // Trailing bytes are ignored
        assert_eq!(Move::parse(b"rock"), Some(Move::Rock));
    }

    #[test]
    fn test_parse_empty_payload_is_no_move() {
        assert_eq!(Move::parse(b""), None);
    }

    #[test]
    fn test_parse_garbage_first_byte_is_invalid_move() {
        assert_eq!(Move::parse(b"x"), Some(Move::Invalid));
        assert_eq!(Move::parse(b"R"), Some(Move::Invalid));
        assert_eq!(Move::parse(b"1p"), Some(Move::Invalid));
    }

    #[test]
    fn test_resolution_is_total_over_all_combinations() {
        // テスト項目: 16 通り全ての組み合わせで結果が定義されている
        for first in ALL_MOVES {
            for second in ALL_MOVES {
                let outcome = resolve_round(first, second);
                let line = result_line(outcome, "Player 1", "Player 2");
                assert!(
                    line == "result: tie"
                        || line == "result: Player 1 wins"
                        || line == "result: Player 2 wins"
                        || line == "result: invalid input",
                    "unexpected result line: {}",
                    line
                );
            }
        }
    }

    #[test]
    fn test_each_move_beats_exactly_one_other() {
        assert_eq!(resolve_round(Move::Rock, Move::Scissors), FirstWins);
        assert_eq!(resolve_round(Move::Paper, Move::Rock), FirstWins);
        assert_eq!(resolve_round(Move::Scissors, Move::Paper), FirstWins);

        assert_eq!(resolve_round(Move::Scissors, Move::Rock), SecondWins);
        assert_eq!(resolve_round(Move::Rock, Move::Paper), SecondWins);
        assert_eq!(resolve_round(Move::Paper, Move::Scissors), SecondWins);
    }

    #[test]
    fn test_equal_moves_tie() {
        for mv in [Move::Rock, Move::Paper, Move::Scissors] {
            assert_eq!(resolve_round(mv, mv), Tie);
        }
    }

    #[test]
    fn test_invalid_move_dominates_either_side() {
        for mv in ALL_MOVES {
            assert_eq!(resolve_round(Move::Invalid, mv), RoundOutcome::InvalidInput);
            assert_eq!(resolve_round(mv, Move::Invalid), RoundOutcome::InvalidInput);
        }
    }

    #[test]
    fn test_swapping_moves_swaps_the_winner() {
        // テスト項目: 席を入れ替えると勝者も入れ替わる（tie / invalid は不変）
        for first in ALL_MOVES {
            for second in ALL_MOVES {
                let forward = resolve_round(first, second);
                let backward = resolve_round(second, first);
                match forward {
                    FirstWins => assert_eq!(backward, SecondWins),
                    SecondWins => assert_eq!(backward, FirstWins),
                    other => assert_eq!(backward, other),
                }
            }
        }
    }

    #[test]
    fn test_reveal_line_formatting() {
        assert_eq!(
            reveal_line("Player 1", Move::Rock),
            "message: Player 1 played rock"
        );
        assert_eq!(
            reveal_line("Player 2", Move::Invalid),
            "message: Player 2 played an invalid move"
        );
    }
}
