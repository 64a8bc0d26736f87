use std::ops::Not;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Not for Color {
    type Output = Color;

    fn not(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

/// Value of a PGN `Result` tag for a finished game.
/// `*` (unfinished/unknown) deliberately has no variant.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display, EnumString, IntoStaticStr)]
pub enum GameOutcome {
    #[strum(to_string = "1-0")]
    WhiteWins,
    #[strum(to_string = "0-1")]
    BlackWins,
    #[strum(to_string = "1/2-1/2")]
    Draw,
}

/// A game's result from one player's side of the board.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum PlayerResult {
    Win,
    Draw,
    Loss,
}

impl GameOutcome {
    pub fn winner(self) -> Option<Color> {
        match self {
            GameOutcome::WhiteWins => Some(Color::White),
            GameOutcome::BlackWins => Some(Color::Black),
            GameOutcome::Draw => None,
        }
    }

    pub fn result_for(self, color: Color) -> PlayerResult {
        match self.winner() {
            None => PlayerResult::Draw,
            Some(winner) if winner == color => PlayerResult::Win,
            Some(_) => PlayerResult::Loss,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_negation() {
        let color = Color::White;
        assert_eq!(!color, Color::Black);
        assert_eq!(!!color, Color::White);
    }

    #[test]
    fn test_parse_results() {
        assert_eq!("1-0".parse::<GameOutcome>(), Ok(GameOutcome::WhiteWins));
        assert_eq!("0-1".parse::<GameOutcome>(), Ok(GameOutcome::BlackWins));
        assert_eq!("1/2-1/2".parse::<GameOutcome>(), Ok(GameOutcome::Draw));
        assert!("*".parse::<GameOutcome>().is_err());
        assert!("½-½".parse::<GameOutcome>().is_err());
        assert!("".parse::<GameOutcome>().is_err());
    }

    #[test]
    fn test_display_matches_tag_value() {
        assert_eq!(GameOutcome::Draw.to_string(), "1/2-1/2");
        let s: &'static str = GameOutcome::BlackWins.into();
        assert_eq!(s, "0-1");
    }

    #[test]
    fn test_result_for_each_side() {
        assert_eq!(
            GameOutcome::WhiteWins.result_for(Color::White),
            PlayerResult::Win
        );
        assert_eq!(
            GameOutcome::WhiteWins.result_for(Color::Black),
            PlayerResult::Loss
        );
        assert_eq!(
            GameOutcome::BlackWins.result_for(Color::Black),
            PlayerResult::Win
        );
        assert_eq!(
            GameOutcome::BlackWins.result_for(Color::White),
            PlayerResult::Loss
        );
        assert_eq!(GameOutcome::Draw.result_for(Color::White), PlayerResult::Draw);
        assert_eq!(GameOutcome::Draw.result_for(Color::Black), PlayerResult::Draw);
    }
}
