//! Reads the tag-pair headers of every game in a PGN stream.
//!
//! Only headers are parsed; movetext is skipped line by line until the
//! next tag pair outside a `{...}` comment starts a new game.

use std::collections::BTreeMap;
use std::io::{self, BufRead, Lines};
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

const UNKNOWN_PLAYER: &str = "?";
const UNKNOWN_RESULT: &str = "*";

// The value runs to the last quote before the closing bracket, so stray
// unescaped quotes inside it are kept.
static TAG_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*\[\s*([A-Za-z0-9][A-Za-z0-9_+#=:-]*)\s+"(.*)"\s*\]\s*$"#)
        .expect("tag pair pattern is valid")
});

#[derive(Debug, Error)]
pub enum PgnError {
    #[error("failed to read line {line}")]
    Io {
        line: usize,
        #[source]
        source: io::Error,
    },
}

/// The three header fields the rest of the crate cares about.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct GameRecord {
    pub white: String,
    pub black: String,
    pub result: String,
}

/// All tag pairs of one game.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PgnHeaders {
    tags: BTreeMap<String, String>,
}

impl PgnHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.tags.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.tags.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn white(&self) -> &str {
        self.get("White").unwrap_or(UNKNOWN_PLAYER)
    }

    pub fn black(&self) -> &str {
        self.get("Black").unwrap_or(UNKNOWN_PLAYER)
    }

    pub fn result(&self) -> &str {
        self.get("Result").unwrap_or(UNKNOWN_RESULT)
    }

    pub fn to_record(&self) -> GameRecord {
        GameRecord {
            white: self.white().to_owned(),
            black: self.black().to_owned(),
            result: self.result().to_owned(),
        }
    }
}

fn parse_tag_pair(line: &str) -> Option<(String, String)> {
    let captures = TAG_PAIR.captures(line)?;
    let name = captures.get(1)?.as_str().to_owned();
    let raw_value = captures.get(2)?.as_str();
    Some((name, unescape(raw_value)))
}

/// Only `\\` and `\"` are escapes; any other backslash is kept as is.
fn unescape(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        match (c, chars.peek()) {
            ('\\', Some(&escaped @ ('\\' | '"'))) => {
                result.push(escaped);
                chars.next();
            }
            _ => result.push(c),
        }
    }
    result
}

/// Iterator over the headers of each game in a PGN stream, in file order.
///
/// Lines that are not tag pairs are treated as movetext. Movetext that is
/// not preceded by any tag pair is dropped, since it carries no players.
pub struct PgnHeaderReader<R> {
    lines: Lines<R>,
    line_number: usize,
    next_game_tag: Option<(String, String)>,
    in_comment: bool,
    finished: bool,
}

impl<R: BufRead> PgnHeaderReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_number: 0,
            next_game_tag: None,
            in_comment: false,
            finished: false,
        }
    }

    /// Convenience adapter yielding just the fields needed for attribution
    pub fn records(self) -> impl Iterator<Item = Result<GameRecord, PgnError>> {
        self.map(|headers| headers.map(|h| h.to_record()))
    }

    /// Follows `{...}` comments across lines. A `;` comment ends the line.
    fn skip_movetext(&mut self, line: &str) {
        for c in line.chars() {
            if self.in_comment {
                if c == '}' {
                    self.in_comment = false;
                }
            } else if c == '{' {
                self.in_comment = true;
            } else if c == ';' {
                break;
            }
        }
    }

    fn next_line(&mut self) -> Option<Result<String, PgnError>> {
        let line = self.lines.next()?;
        self.line_number += 1;
        Some(match line {
            Ok(line) if self.line_number == 1 => {
                Ok(line.strip_prefix('\u{feff}').unwrap_or(&line).to_owned())
            }
            Ok(line) => Ok(line),
            Err(source) => Err(PgnError::Io {
                line: self.line_number,
                source,
            }),
        })
    }
}

impl<R: BufRead> Iterator for PgnHeaderReader<R> {
    type Item = Result<PgnHeaders, PgnError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let mut headers = PgnHeaders::new();
        if let Some((name, value)) = self.next_game_tag.take() {
            headers.insert(name, value);
        }
        let mut in_movetext = false;

        while let Some(line) = self.next_line() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            };

            if line.starts_with('%') {
                continue;
            }

            let tag = if self.in_comment {
                None
            } else {
                parse_tag_pair(&line)
            };

            match tag {
                Some(tag) if in_movetext => {
                    self.next_game_tag = Some(tag);
                    return Some(Ok(headers));
                }
                Some((name, value)) => headers.insert(name, value),
                None => {
                    self.skip_movetext(&line);
                    if !headers.is_empty() {
                        in_movetext = true;
                    }
                }
            }
        }

        self.finished = true;
        if headers.is_empty() {
            None
        } else {
            Some(Ok(headers))
        }
    }
}
