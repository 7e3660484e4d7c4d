//! Textual trajectory records.
//!
//! A record is a sample count followed by that many `x y t` triples, all
//! whitespace separated:
//!
//! ```text
//! 4 0 0 0 10 0 10 20 0 20 30 0 30
//! ```
//!
//! Line breaks carry no meaning, so a record may span several lines and a
//! line may hold several records. Text after `#` on a line is ignored.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use crate::{Error, Result, Sample, Trajectory};

impl FromStr for Trajectory {
    type Err = Error;

    /// Parse exactly one record.
    fn from_str(s: &str) -> Result<Self> {
        let mut tokens = tokenize(s);
        let traj = parse_record(&mut tokens, 0)?
            .ok_or_else(|| Error::Parse("empty input, expected a trajectory record".to_string()))?;

        if let Some(extra) = tokens.next() {
            return Err(Error::Parse(format!(
                "unexpected token '{}' after trajectory record",
                extra
            )));
        }
        Ok(traj)
    }
}

/// Parser for files holding consecutive trajectory records.
pub struct TrajectoryFileParser {
    trajectories: Vec<Trajectory>,
    current: usize,
}

impl TrajectoryFileParser {
    /// Read and parse every record in the file at `file_path`.
    pub fn new<P: AsRef<Path>>(file_path: P) -> Result<Self> {
        let file = File::open(&file_path).map_err(|e| {
            Error::IoError(std::io::Error::new(
                e.kind(),
                format!(
                    "failed to open trajectory file '{}': {}",
                    file_path.as_ref().display(),
                    e
                ),
            ))
        })?;

        Self::from_reader(BufReader::new(file))
    }

    /// Read and parse every record from `reader`.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;

        let mut tokens = tokenize(&text);
        let mut trajectories = Vec::new();
        while let Some(traj) = parse_record(&mut tokens, trajectories.len())? {
            trajectories.push(traj);
        }

        Ok(Self {
            trajectories,
            current: 0,
        })
    }

    /// Get the trajectory at `index` (0-indexed, file order).
    pub fn get(&self, index: usize) -> Option<&Trajectory> {
        self.trajectories.get(index)
    }

    /// Number of records parsed.
    pub fn len(&self) -> usize {
        self.trajectories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trajectories.is_empty()
    }

    /// Consume the parser, returning all trajectories.
    pub fn into_trajectories(self) -> Vec<Trajectory> {
        self.trajectories
    }
}

impl Iterator for TrajectoryFileParser {
    type Item = Trajectory;

    fn next(&mut self) -> Option<Self::Item> {
        let traj = self.trajectories.get(self.current)?.clone();
        self.current += 1;
        Some(traj)
    }
}

/// Whitespace tokens with `#` comments stripped.
fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(|line| line.split('#').next().unwrap_or(""))
        .flat_map(str::split_whitespace)
}

/// Parse the next record, or `None` if the input is exhausted.
fn parse_record<'a, I>(tokens: &mut I, record: usize) -> Result<Option<Trajectory>>
where
    I: Iterator<Item = &'a str>,
{
    let Some(count_token) = tokens.next() else {
        return Ok(None);
    };

    let count: usize = count_token.parse().map_err(|_| {
        Error::Parse(format!(
            "record {}: sample count '{}' is not a non-negative integer",
            record, count_token
        ))
    })?;

    let mut samples = Vec::with_capacity(count.min(4096));
    for index in 0..count {
        let x = next_number(tokens, record, index, "x")?;
        let y = next_number(tokens, record, index, "y")?;
        let t = next_number(tokens, record, index, "t")?;
        samples.push(Sample::new(x, y, t));
    }

    Trajectory::new(samples).map(Some)
}

fn next_number<'a, I>(tokens: &mut I, record: usize, index: usize, field: &str) -> Result<f64>
where
    I: Iterator<Item = &'a str>,
{
    let token = tokens.next().ok_or_else(|| {
        Error::Parse(format!(
            "record {}: missing {} of sample {}",
            record, field, index
        ))
    })?;

    token.parse().map_err(|_| {
        Error::Parse(format!(
            "record {}: {} of sample {} is not a number: '{}'",
            record, field, index, token
        ))
    })
}
