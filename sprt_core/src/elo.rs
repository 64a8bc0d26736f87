/// Expected score for a player who is `elo_diff` points stronger than their opponent.
pub fn elo_to_score(elo_diff: f64) -> f64 {
    1.0 / (1.0 + 10.0_f64.powf(-elo_diff / 400.0))
}
