use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    outcome::{Color, GameOutcome, PlayerResult},
    pgn::GameRecord,
    tally::ResultTally,
};

/// The two tracked players. Results are counted from the point of view of `us`.
/// Each slot is bound at most once and never changes afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityPair {
    us: Option<String>,
    them: Option<String>,
}

impl IdentityPair {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(us: Option<String>, them: Option<String>) -> Self {
        Self { us, them }
    }

    pub fn us(&self) -> Option<&str> {
        self.us.as_deref()
    }

    pub fn them(&self) -> Option<&str> {
        self.them.as_deref()
    }

    pub fn is_resolved(&self) -> bool {
        self.us.is_some() && self.them.is_some()
    }

    /// Fills any unbound slot from the players of `record`.
    /// With nothing bound, `us` becomes Black and `them` becomes White.
    fn bind_from(&mut self, record: &GameRecord) {
        if self.us.is_none() {
            self.us = pick_other(record, self.them.as_deref());
            if let Some(us) = &self.us {
                debug!(player = %us, "bound us");
            }
        }
        if self.them.is_none() {
            self.them = pick_other(record, self.us.as_deref());
            if let Some(them) = &self.them {
                debug!(player = %them, "bound them");
            }
        }
    }

    /// Which color `us` played in `record`, if the record is a game between the two tracked players
    fn orientation(&self, record: &GameRecord) -> Option<Color> {
        let (us, them) = (self.us.as_deref()?, self.them.as_deref()?);
        if record.white == us && record.black == them {
            Some(Color::White)
        } else if record.black == us && record.white == them {
            Some(Color::Black)
        } else {
            None
        }
    }
}

fn pick_other(record: &GameRecord, taken: Option<&str>) -> Option<String> {
    [&record.black, &record.white]
        .into_iter()
        .find(|name| Some(name.as_str()) != taken)
        .cloned()
}

/// What happened to a single record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Attribution {
    Counted { color: Color, result: PlayerResult },
    /// The game was not played between the two tracked players
    Foreign,
    /// The game was between the tracked players, but its `Result` is not a finished result
    UnknownResult,
    /// The tracked players could not be determined from this record
    Unresolved,
}

impl Attribution {
    pub fn is_counted(&self) -> bool {
        matches!(self, Attribution::Counted { .. })
    }
}

/// Sorts color-tagged game records into a [`ResultTally`] for the tracked pair.
///
/// Records that do not belong to the pair, or whose result is not one of
/// `1-0`, `0-1`, `1/2-1/2`, are skipped without error: merged PGN files
/// routinely contain games from other pairings and unfinished games.
#[derive(Clone, Debug, Default)]
pub struct OutcomeAttributor {
    players: IdentityPair,
}

impl OutcomeAttributor {
    pub fn new(players: IdentityPair) -> Self {
        Self { players }
    }

    pub fn players(&self) -> &IdentityPair {
        &self.players
    }

    pub fn attribute(&mut self, record: &GameRecord, tally: &mut ResultTally) -> Attribution {
        if !self.players.is_resolved() {
            self.players.bind_from(record);
        }

        let attribution = self.classify(record);
        match attribution {
            Attribution::Counted { result, .. } => tally.record(result),
            skipped => debug!(
                white = %record.white,
                black = %record.black,
                result = %record.result,
                reason = ?skipped,
                "skipping record"
            ),
        }
        attribution
    }

    fn classify(&self, record: &GameRecord) -> Attribution {
        if !self.players.is_resolved() {
            return Attribution::Unresolved;
        }

        let Some(color) = self.players.orientation(record) else {
            return Attribution::Foreign;
        };

        match record.result.parse::<GameOutcome>() {
            Ok(outcome) => Attribution::Counted {
                color,
                result: outcome.result_for(color),
            },
            Err(_) => Attribution::UnknownResult,
        }
    }
}
