use std::io::BufRead;

use colored::Colorize;
use serde::Serialize;
use sprt_core::{
    attribution::OutcomeAttributor,
    pgn::{PgnError, PgnHeaderReader},
    sprt::{SprtEvaluation, SprtParameters, SprtResult, SprtTester},
    tally::ResultTally,
};
use tracing::debug;

use crate::config::RunConfig;

/// How a run ended.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    AcceptH0,
    AcceptH1,
    GamesCapReached,
    NoVerdict,
}

impl RunOutcome {
    pub fn is_success(self) -> bool {
        self != RunOutcome::NoVerdict
    }

    /// 0 when the run reached a verdict or its games cap, 1 otherwise
    pub fn exit_status(self) -> u8 {
        if self.is_success() { 0 } else { 1 }
    }
}

/// Counts from one call to [`SprtSession::ingest`].
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub records: usize,
    pub counted: usize,
}

/// Status printed after each batch of records.
#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub us: String,
    pub them: String,
    pub tally: ResultTally,
    pub evaluation: SprtEvaluation,
}

impl Status {
    pub fn score_line(&self) -> String {
        let score = self.tally.score().unwrap_or(0.5);
        format!(
            "Score of {} vs {}: {} - {} - {}  [{:.3}] {}",
            self.us,
            self.them,
            self.tally.win,
            self.tally.loss,
            self.tally.draw,
            score,
            self.tally.total()
        )
    }

    pub fn sprt_line(&self, colorize: bool) -> String {
        let evaluation = &self.evaluation;
        if !colorize {
            return evaluation.to_string();
        }

        let mut line = evaluation.llr_line();
        match evaluation.result {
            SprtResult::Continue => {}
            SprtResult::AcceptH0 => line += &format!(". {}.", "H0 accepted".red().bold()),
            SprtResult::AcceptH1 => line += &format!(". {}.", "H1 accepted".green().bold()),
        }
        line
    }
}

/// Machine readable summary of a whole run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub us: Option<String>,
    pub them: Option<String>,
    pub tally: ResultTally,
    pub score: Option<f64>,
    pub params: SprtParameters,
    pub evaluation: SprtEvaluation,
    pub games_cap: Option<u32>,
    pub outcome: RunOutcome,
}

/// State of one run: the tracked players, their tally and the test applied to it.
pub struct SprtSession {
    attributor: OutcomeAttributor,
    tally: ResultTally,
    tester: SprtTester,
    games_cap: Option<u32>,
    last_evaluation: Option<SprtEvaluation>,
}

impl SprtSession {
    pub fn new(config: &RunConfig) -> Self {
        Self {
            attributor: OutcomeAttributor::new(config.players.clone()),
            tally: ResultTally::new(),
            tester: SprtTester::new(config.params),
            games_cap: config.games_cap,
            last_evaluation: None,
        }
    }

    pub fn tally(&self) -> &ResultTally {
        &self.tally
    }

    /// Attributes every game in `reader` to the tally.
    pub fn ingest<R: BufRead>(&mut self, reader: R) -> Result<IngestStats, PgnError> {
        let mut stats = IngestStats::default();
        for record in PgnHeaderReader::new(reader).records() {
            let record = record?;
            stats.records += 1;
            if self.attributor.attribute(&record, &mut self.tally).is_counted() {
                stats.counted += 1;
            }
        }
        debug!(records = stats.records, counted = stats.counted, "ingested batch");
        Ok(stats)
    }

    /// Evaluates the current tally. Returns `None` while no games have been counted.
    pub fn status(&mut self) -> Option<Status> {
        if self.tally.is_empty() {
            return None;
        }

        let evaluation = self.tester.evaluate(&self.tally);
        self.last_evaluation = Some(evaluation);

        let players = self.attributor.players();
        Some(Status {
            us: players.us().unwrap_or("?").to_owned(),
            them: players.them().unwrap_or("?").to_owned(),
            tally: self.tally,
            evaluation,
        })
    }

    pub fn cap_reached(&self) -> bool {
        self.games_cap.is_some_and(|cap| self.tally.total() >= cap)
    }

    /// Terminal verdict of the most recent status, if any
    pub fn verdict(&self) -> Option<SprtResult> {
        self.last_evaluation
            .map(|evaluation| evaluation.result)
            .filter(|result| result.is_terminal())
    }

    pub fn should_stop(&self) -> bool {
        self.verdict().is_some() || self.cap_reached()
    }

    pub fn outcome(&self) -> RunOutcome {
        match self.verdict() {
            Some(SprtResult::AcceptH0) => RunOutcome::AcceptH0,
            Some(SprtResult::AcceptH1) => RunOutcome::AcceptH1,
            _ if self.cap_reached() => RunOutcome::GamesCapReached,
            _ => RunOutcome::NoVerdict,
        }
    }

    pub fn summary(&self) -> RunSummary {
        let players = self.attributor.players();
        RunSummary {
            us: players.us().map(str::to_owned),
            them: players.them().map(str::to_owned),
            tally: self.tally,
            score: self.tally.score(),
            params: *self.tester.params(),
            evaluation: self.tester.evaluate(&self.tally),
            games_cap: self.games_cap,
            outcome: self.outcome(),
        }
    }
}
