pub mod attribution;
pub mod elo;
pub mod outcome;
pub mod pgn;
pub mod sprt;
pub mod tally;
