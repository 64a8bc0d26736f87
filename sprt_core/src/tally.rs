use serde::{Deserialize, Serialize};

use crate::outcome::PlayerResult;

/// Win/draw/loss counts from the point of view of one fixed player.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResultTally {
    pub win: u32,
    pub draw: u32,
    pub loss: u32,
}

impl ResultTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_win(&mut self) {
        self.win += 1;
    }

    pub fn record_draw(&mut self) {
        self.draw += 1;
    }

    pub fn record_loss(&mut self) {
        self.loss += 1;
    }

    pub fn record(&mut self, result: PlayerResult) {
        match result {
            PlayerResult::Win => self.record_win(),
            PlayerResult::Draw => self.record_draw(),
            PlayerResult::Loss => self.record_loss(),
        }
    }

    pub fn total(&self) -> u32 {
        self.win + self.draw + self.loss
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// How many of win/draw/loss have been seen at least once
    pub fn distinct_non_zero_categories(&self) -> usize {
        [self.win, self.draw, self.loss]
            .iter()
            .filter(|&&count| count > 0)
            .count()
    }

    /// Average points per game, counting a draw as half a point.
    /// Returns `None` before any games are recorded.
    pub fn score(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        Some((self.win as f64 + 0.5 * self.draw as f64) / self.total() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_total() {
        let mut tally = ResultTally::new();
        assert!(tally.is_empty());
        assert_eq!(tally.score(), None);

        tally.record_win();
        tally.record_win();
        tally.record_draw();
        tally.record_loss();

        assert_eq!(
            tally,
            ResultTally {
                win: 2,
                draw: 1,
                loss: 1
            }
        );
        assert_eq!(tally.total(), 4);
        assert_eq!(tally.score(), Some(0.625));
    }

    #[test]
    fn test_distinct_categories() {
        let mut tally = ResultTally::new();
        assert_eq!(tally.distinct_non_zero_categories(), 0);

        tally.record_draw();
        tally.record_draw();
        assert_eq!(tally.distinct_non_zero_categories(), 1);

        tally.record_loss();
        assert_eq!(tally.distinct_non_zero_categories(), 2);

        tally.record_win();
        assert_eq!(tally.distinct_non_zero_categories(), 3);
    }

    #[test]
    fn test_record_player_result() {
        let mut tally = ResultTally::new();
        tally.record(PlayerResult::Loss);
        tally.record(PlayerResult::Loss);
        tally.record(PlayerResult::Draw);
        assert_eq!(tally.loss, 2);
        assert_eq!(tally.draw, 1);
        assert_eq!(tally.win, 0);
    }
}
