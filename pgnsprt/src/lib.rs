pub mod config;
pub mod session;

use std::fs::File;
use std::io::{self, BufRead, BufReader, IsTerminal, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{error, info, warn};

use crate::config::{Args, RunConfig};
use crate::session::{RunOutcome, SprtSession};

/// Exit status for runs that fail before reaching an outcome
pub const ERROR_EXIT_STATUS: u8 = 2;

/// Where a batch of games comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PgnSource {
    Stdin,
    File(PathBuf),
}

impl PgnSource {
    pub fn from_paths(paths: &[PathBuf]) -> Vec<PgnSource> {
        if paths.is_empty() {
            vec![PgnSource::Stdin]
        } else {
            paths.iter().cloned().map(PgnSource::File).collect()
        }
    }
}

/// Human readable progress output.
pub struct Report<W> {
    out: W,
    colorize: bool,
}

impl<W: Write> Report<W> {
    pub fn new(out: W, colorize: bool) -> Self {
        Self { out, colorize }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn source(&mut self, path: &Path) -> io::Result<()> {
        writeln!(self.out, "{}", path.display())
    }

    fn status(&mut self, session: &mut SprtSession) -> io::Result<()> {
        if let Some(status) = session.status() {
            writeln!(self.out, "{}", status.score_line())?;
            writeln!(self.out, "{}", status.sprt_line(self.colorize))?;
        }
        self.out.flush()
    }
}

/// Ingests one batch and prints the status that follows it.
pub fn process_batch<R: BufRead, W: Write>(
    session: &mut SprtSession,
    reader: R,
    report: &mut Report<W>,
) -> anyhow::Result<()> {
    session.ingest(reader)?;
    report.status(session)?;
    Ok(())
}

/// Processes each source in order, stopping early once the run has a verdict
/// or has reached its games cap. `stdin` is read for [`PgnSource::Stdin`].
pub fn run_sources<I: BufRead, W: Write>(
    session: &mut SprtSession,
    sources: &[PgnSource],
    stdin: &mut I,
    report: &mut Report<W>,
) -> anyhow::Result<RunOutcome> {
    for source in sources {
        if session.should_stop() {
            info!("stopping before {:?}", source);
            break;
        }

        match source {
            PgnSource::Stdin => {
                info!("reading games from stdin");
                process_batch(session, &mut *stdin, report)
                    .context("failed to read games from stdin")?;
            }
            PgnSource::File(path) => {
                info!(path = %path.display(), "reading games");
                report.source(path)?;
                let file = File::open(path)
                    .with_context(|| format!("failed to open {}", path.display()))?;
                process_batch(session, BufReader::new(file), report)
                    .with_context(|| format!("failed to read games from {}", path.display()))?;
            }
        }
    }

    if session.tally().is_empty() {
        warn!("no games between the tracked players were found");
    }

    let outcome = session.outcome();
    info!(?outcome, tally = ?session.tally(), "run finished");
    Ok(outcome)
}

pub fn run(args: &Args) -> anyhow::Result<RunOutcome> {
    let config = RunConfig::from_args(args)?;
    let mut session = SprtSession::new(&config);

    let stdout = io::stdout();
    let colorize = !args.no_color && stdout.is_terminal();
    let mut report = Report::new(stdout.lock(), colorize);

    let sources = PgnSource::from_paths(&args.pgn_files);
    let outcome = run_sources(&mut session, &sources, &mut io::stdin().lock(), &mut report)?;

    if args.json {
        let mut out = report.into_inner();
        serde_json::to_writer(&mut out, &session.summary())?;
        writeln!(out)?;
    }

    Ok(outcome)
}

/// Maps the result of [`run`] to the process exit status, logging any error chain.
pub fn exit_status(result: &anyhow::Result<RunOutcome>) -> u8 {
    match result {
        Ok(outcome) => outcome.exit_status(),
        Err(err) => {
            error!(error = %err, "run failed");
            for cause in err.chain().skip(1) {
                error!(cause = %cause, "caused by");
            }
            ERROR_EXIT_STATUS
        }
    }
}
