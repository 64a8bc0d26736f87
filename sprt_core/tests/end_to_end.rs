use std::io::Cursor;

use sprt_core::{
    attribution::{IdentityPair, OutcomeAttributor},
    outcome::{Color, GameOutcome, PlayerResult},
    pgn::PgnHeaderReader,
    sprt::{SprtParameters, SprtResult, SprtTester},
    tally::ResultTally,
};

/// 40 games with alternating colors. Player A wins 25, draws 10 and loses 5.
fn alternating_match_pgn() -> String {
    let mut pgn = String::new();
    for i in 0..40 {
        let a_color = if i % 2 == 0 { Color::White } else { Color::Black };
        let a_result = match i {
            0..25 => PlayerResult::Win,
            25..35 => PlayerResult::Draw,
            _ => PlayerResult::Loss,
        };
        let outcome = match (a_result, a_color) {
            (PlayerResult::Draw, _) => GameOutcome::Draw,
            (PlayerResult::Win, Color::White) | (PlayerResult::Loss, Color::Black) => {
                GameOutcome::WhiteWins
            }
            _ => GameOutcome::BlackWins,
        };
        let (white, black) = match a_color {
            Color::White => ("A", "B"),
            Color::Black => ("B", "A"),
        };

        pgn += &format!("[Event \"match\"]\n[Round \"{}\"]\n", i + 1);
        pgn += &format!("[White \"{white}\"]\n[Black \"{black}\"]\n[Result \"{outcome}\"]\n\n");
        pgn += &format!("1. e4 e5 {outcome}\n\n");
    }
    pgn
}

fn run(params: SprtParameters) -> (OutcomeAttributor, ResultTally, f64, SprtResult) {
    let mut attributor = OutcomeAttributor::new(IdentityPair::new());
    let mut tally = ResultTally::new();
    let tester = SprtTester::new(params);

    for record in PgnHeaderReader::new(Cursor::new(alternating_match_pgn())).records() {
        attributor.attribute(&record.unwrap(), &mut tally);
    }

    let evaluation = tester.evaluate(&tally);
    (attributor, tally, evaluation.llr, evaluation.result)
}

#[test]
fn test_first_black_player_is_us() {
    let (attributor, tally, llr, result) = run(SprtParameters::default());

    assert_eq!(attributor.players().us(), Some("B"));
    assert_eq!(attributor.players().them(), Some("A"));
    assert_eq!(
        tally,
        ResultTally {
            win: 5,
            draw: 10,
            loss: 25
        }
    );
    assert!((llr - -0.465_798_102_535_196).abs() < 1e-9);
    assert_eq!(result, SprtResult::Continue);
}

#[test]
fn test_wide_hypothesis_accepts_h0() {
    let (_, _, llr, result) = run(SprtParameters::new(0.0, 50.0, 0.05, 0.05));
    assert!((llr - -6.534_165_736_626_369_5).abs() < 1e-9);
    assert_eq!(result, SprtResult::AcceptH0);
}

#[test]
fn test_seeding_us_flips_the_columns() {
    let mut attributor =
        OutcomeAttributor::new(IdentityPair::seeded(Some("A".to_owned()), Some("B".to_owned())));
    let mut tally = ResultTally::new();
    for record in PgnHeaderReader::new(Cursor::new(alternating_match_pgn())).records() {
        attributor.attribute(&record.unwrap(), &mut tally);
    }

    assert_eq!(
        tally,
        ResultTally {
            win: 25,
            draw: 10,
            loss: 5
        }
    );
    let evaluation = SprtTester::new(SprtParameters::new(0.0, 50.0, 0.05, 0.05)).evaluate(&tally);
    assert_eq!(evaluation.result, SprtResult::AcceptH1);
}
