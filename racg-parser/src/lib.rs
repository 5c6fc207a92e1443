use lazy_static::lazy_static;
use racg_engine::{AutomatonError, Letter, LetterSet, Presentation, Ray};
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io;
use thiserror::Error;
use tracing::debug;

pub mod datasets;

pub use datasets::Dataset;

/// Errors raised while reading defining data.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The data parsed but does not describe a valid presentation or ray.
    #[error(transparent)]
    Automaton(#[from] AutomatonError),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("line {line}: unrecognised directive `{text}`")]
    UnknownDirective { line: usize, text: String },

    #[error("line {line}: `{token}` is not a single-character letter")]
    BadLetter { line: usize, token: String },

    #[error("line {line}: letter {letter} listed twice")]
    DuplicateLetter { line: usize, letter: Letter },

    #[error("line {line}: `{key}` given twice")]
    RepeatedDirective { line: usize, key: String },

    #[error("no `order:` line")]
    MissingOrder,
}

/// A presentation, optionally with the ray used for suffix machines.
#[derive(Debug, Clone)]
pub struct DefiningData {
    pub presentation: Presentation,
    pub ray: Option<Ray>,
}

impl DefiningData {
    /// Replaces the ray, validating it against the presentation.
    pub fn with_ray(mut self, first: char, second: char) -> Result<Self, ParseError> {
        self.ray = Some(Ray::new(&self.presentation, Letter(first), Letter(second))?);
        Ok(self)
    }
}

// Matches `key: values`, where the key is `order`, `ray` or a single letter.
// Comments are stripped before matching.
lazy_static! {
    static ref DIRECTIVE_REGEX: Regex =
        Regex::new(r"^(?P<key>[^:\s]+)\s*:\s*(?P<values>.*)$").expect("Invalid directive regex pattern");
}

/// Splits a whitespace or comma separated list of one-character letters.
fn parse_letters(line: usize, values: &str) -> Result<Vec<Letter>, ParseError> {
    values
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .map(|token| {
            let mut symbols = token.chars();
            match (symbols.next(), symbols.next()) {
                (Some(symbol), None) => Ok(Letter(symbol)),
                _ => Err(ParseError::BadLetter {
                    line,
                    token: token.to_string(),
                }),
            }
        })
        .collect()
}

/// Parses the line format:
///
/// ```text
/// # the pentagon
/// order: a b c d e
/// ray: a c
/// a: b e
/// b: a c
/// ```
///
/// `order` ranks the letters by position. Each `x: ...` line lists the
/// letters commuting with `x`; letters without a line commute with nothing.
///
/// # Example
/// ```
/// use racg_parser::parse_defining_data;
///
/// let data = parse_defining_data("order: a b c\nray: a c\na: b\nb: a\n").unwrap();
/// assert_eq!(data.presentation.alphabet().len(), 3);
/// assert!(data.ray.is_some());
/// ```
pub fn parse_defining_data(text: &str) -> Result<DefiningData, ParseError> {
    let mut order: Option<BTreeMap<Letter, usize>> = None;
    let mut ray_letters: Option<Vec<Letter>> = None;
    let mut commutation: BTreeMap<Letter, LetterSet> = BTreeMap::new();

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let content = raw.split('#').next().unwrap_or_default().trim();
        if content.is_empty() {
            continue;
        }

        let caps = DIRECTIVE_REGEX
            .captures(content)
            .ok_or_else(|| ParseError::UnknownDirective {
                line,
                text: content.to_string(),
            })?;
        let key = &caps["key"];
        let letters = parse_letters(line, &caps["values"])?;

        match key {
            "order" => {
                if order.is_some() {
                    return Err(ParseError::RepeatedDirective {
                        line,
                        key: key.to_string(),
                    });
                }
                let mut ranks = BTreeMap::new();
                for (rank, letter) in letters.into_iter().enumerate() {
                    if ranks.insert(letter, rank).is_some() {
                        return Err(ParseError::DuplicateLetter { line, letter });
                    }
                }
                order = Some(ranks);
            }
            "ray" => {
                if ray_letters.is_some() {
                    return Err(ParseError::RepeatedDirective {
                        line,
                        key: key.to_string(),
                    });
                }
                ray_letters = Some(letters);
            }
            _ => {
                let mut symbols = key.chars();
                let (Some(symbol), None) = (symbols.next(), symbols.next()) else {
                    return Err(ParseError::UnknownDirective {
                        line,
                        text: content.to_string(),
                    });
                };
                let letter = Letter(symbol);
                if commutation.insert(letter, letters.into_iter().collect()).is_some() {
                    return Err(ParseError::DuplicateLetter { line, letter });
                }
            }
        }
    }

    let order = order.ok_or(ParseError::MissingOrder)?;
    let presentation = Presentation::new(commutation, order)?;
    let ray = match ray_letters {
        Some(letters) => Some(Ray::from_letters(&presentation, &letters)?),
        None => None,
    };

    debug!(
        letters = presentation.alphabet().len(),
        ray = ?ray,
        "defining data parsed"
    );
    Ok(DefiningData { presentation, ray })
}

/// One CSV row: a letter, its rank and the letters it commutes with.
#[derive(Debug, Deserialize)]
pub struct LetterRow {
    pub letter: Letter,
    pub rank: usize,
    /// Space separated list of commuting letters.
    #[serde(default)]
    pub commutes: String,
}

/// Parses CSV rows with header `letter,rank,commutes`.
///
/// The resulting data carries no ray; attach one with
/// [`DefiningData::with_ray`].
pub fn parse_csv_rows<R: io::Read>(reader: R) -> Result<DefiningData, ParseError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut order = BTreeMap::new();
    let mut commutation = BTreeMap::new();
    for (index, row) in csv_reader.deserialize::<LetterRow>().enumerate() {
        let row = row?;
        // Line 1 is the header.
        let line = index + 2;
        if order.insert(row.letter, row.rank).is_some() {
            return Err(ParseError::DuplicateLetter {
                line,
                letter: row.letter,
            });
        }
        let neighbours: LetterSet = parse_letters(line, &row.commutes)?.into_iter().collect();
        commutation.insert(row.letter, neighbours);
    }

    if order.is_empty() {
        return Err(ParseError::MissingOrder);
    }
    let presentation = Presentation::new(commutation, order)?;
    debug!(letters = presentation.alphabet().len(), "csv defining data parsed");
    Ok(DefiningData {
        presentation,
        ray: None,
    })
}
