// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Reads counter data from CSV files.
//!
//! Files have no header and one day per line:
//!
//! ```text
//! 06/12/2019,5214
//! 07/12/2019,6896
//! ```

use crate::series::{DATE_FORMAT, Series, SeriesError};
use chrono::NaiveDate;
use log::{debug, info};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::num::ParseIntError;
use std::path::Path;
use thiserror::Error;

/// An error reading counter data.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The data could not be read.
    #[error("could not read counter data: {0}")]
    Io(#[from] io::Error),

    /// A line does not have exactly two columns.
    #[error("line {line}: expecting \"DD/MM/YYYY,count\", received \"{row}\"")]
    MalformedRow {
        /// 1-based line number.
        line: usize,

        /// The offending line.
        row: String,
    },

    /// The first column is not a `DD/MM/YYYY` date.
    #[error("line {line}: invalid date \"{value}\": {source}")]
    InvalidDate {
        /// 1-based line number.
        line: usize,

        /// The offending value.
        value: String,

        /// Why the date could not be parsed.
        source: chrono::ParseError,
    },

    /// The second column is not an integer.
    #[error("line {line}: invalid count \"{value}\": {source}")]
    InvalidCount {
        /// 1-based line number.
        line: usize,

        /// The offending value.
        value: String,

        /// Why the count could not be parsed.
        source: ParseIntError,
    },

    /// The rows are well-formed but do not make a valid series.
    #[error("invalid counter data: {0}")]
    Series(#[from] SeriesError),
}

/// Parses a single CSV line into a `(date, count)` pair.
///
/// `line` is the 1-based line number used in error messages.
pub fn parse_row(row: &str, line: usize) -> Result<(NaiveDate, i64), IngestError> {
    let malformed = || IngestError::MalformedRow {
        line,
        row: row.to_string(),
    };
    let (date, count) = row.split_once(',').ok_or_else(malformed)?;
    if count.contains(',') {
        return Err(malformed());
    }

    let (date, count) = (date.trim(), count.trim());
    let date = NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|source| {
        IngestError::InvalidDate {
            line,
            value: date.to_string(),
            source,
        }
    })?;
    let count = count
        .parse::<i64>()
        .map_err(|source| IngestError::InvalidCount {
            line,
            value: count.to_string(),
            source,
        })?;
    Ok((date, count))
}

/// Reads every `(date, count)` pair from CSV data.
///
/// Blank lines are skipped. Checking the pairs for duplicate dates or
/// negative counts is left to [`Series::load()`].
pub fn read_csv(reader: impl Read) -> Result<Vec<(NaiveDate, i64)>, IngestError> {
    let mut records = Vec::new();
    for (i, row) in BufReader::new(reader).lines().enumerate() {
        let row = row?;
        if row.trim().is_empty() {
            continue;
        }
        records.push(parse_row(&row, i + 1)?);
    }
    debug!("read {} rows", records.len());
    Ok(records)
}

/// Loads a [`Series`] from the CSV file at `path`.
pub fn load_series(path: impl AsRef<Path>) -> Result<Series, IngestError> {
    let path = path.as_ref();
    info!("loading counter data from {}", path.display());
    let records = read_csv(File::open(path)?)?;
    Ok(Series::load(records)?)
}
