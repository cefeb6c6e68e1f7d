// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! In-memory store of daily counter records.
//!
//! A [`Series`] is built once from raw `(date, count)` pairs and is
//! read-only afterwards. It answers the lookup, ranking, and aggregation
//! queries that the [fact engine](crate::fact) needs to describe a day.

use chrono::{Datelike, Days, NaiveDate};
use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Format used for dates in CSV files, on the command line, and in tweets.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Number of passages recorded by the counter on a single day.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Record {
    /// The day the passages were counted.
    pub date: NaiveDate,

    /// Number of passages counted that day.
    pub count: u64,
}

/// Position of an item among a group of items, ranked by descending count.
///
/// `rank` is 1-based: the item with the highest count has rank 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rank {
    /// Position of the item, starting at 1.
    pub rank: usize,

    /// Number of items in the group.
    pub total: usize,
}

impl Rank {
    /// True if the item is ranked first.
    pub fn is_first(&self) -> bool {
        self.rank == 1
    }

    /// The rank as a fraction of the number of ranked items, in `(0, 1]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use velotweet::series::Rank;
    /// let rank = Rank { rank: 30, total: 120 };
    /// assert_eq!(rank.share(), 0.25);
    /// ```
    pub fn share(&self) -> f64 {
        self.rank as f64 / self.total as f64
    }
}

/// Ranks the item identified by `key` among `items` by descending count.
///
/// Ties are broken by key: a smaller key (an earlier date, month, or year)
/// ranks better, so every item gets a distinct rank.
///
/// Returns `None` if `key` does not appear in `items`.
///
/// # Examples
///
/// ```
/// use velotweet::series::{Rank, rank_among};
/// let totals = vec![(2019, 300), (2020, 500), (2021, 300)];
/// assert_eq!(rank_among(totals.clone(), &2020), Some(Rank { rank: 1, total: 3 }));
/// assert_eq!(rank_among(totals.clone(), &2019), Some(Rank { rank: 2, total: 3 }));
/// assert_eq!(rank_among(totals.clone(), &2021), Some(Rank { rank: 3, total: 3 }));
/// assert_eq!(rank_among(totals, &2022), None);
/// ```
pub fn rank_among<K: Ord>(items: impl IntoIterator<Item = (K, u64)>, key: &K) -> Option<Rank> {
    let items = items.into_iter().collect::<Vec<_>>();
    let count = items.iter().find(|(k, _)| k == key)?.1;
    let better = items
        .iter()
        .filter(|(k, c)| *c > count || (*c == count && k < key))
        .count();
    Some(Rank {
        rank: better + 1,
        total: items.len(),
    })
}

/// Which records take part in a ranking, relative to the ranked date.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RankScope {
    /// Every record in the series.
    #[default]
    All,

    /// Records falling on the same day of the week.
    SameWeekday,

    /// Records falling in the same calendar month, in any year.
    SameMonth,

    /// Records falling in the same year.
    SameYear,

    /// Records falling in the same month of the same year.
    SameYearMonth,

    /// Records falling on the same day of the week in the same year.
    SameYearWeekday,
}

impl RankScope {
    /// True if `candidate` belongs to the same group as `date`.
    pub fn matches(&self, date: NaiveDate, candidate: NaiveDate) -> bool {
        match self {
            RankScope::All => true,
            RankScope::SameWeekday => date.weekday() == candidate.weekday(),
            RankScope::SameMonth => date.month() == candidate.month(),
            RankScope::SameYear => date.year() == candidate.year(),
            RankScope::SameYearMonth => {
                date.year() == candidate.year() && date.month() == candidate.month()
            }
            RankScope::SameYearWeekday => {
                date.year() == candidate.year() && date.weekday() == candidate.weekday()
            }
        }
    }
}

/// How the day described by a tweet is chosen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TargetMode {
    /// The most recent day in the series.
    #[default]
    Last,

    /// A day drawn uniformly among the days in the series.
    Random,

    /// A specific day, which must be present in the series.
    Explicit(NaiveDate),
}

impl FromStr for TargetMode {
    type Err = ParseTargetError;

    /// Parses `last`, `random`, or a date in `DD/MM/YYYY` format.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "last" => Ok(TargetMode::Last),
            "random" => Ok(TargetMode::Random),
            other => NaiveDate::parse_from_str(other, DATE_FORMAT)
                .map(TargetMode::Explicit)
                .map_err(|_| ParseTargetError(s.to_string())),
        }
    }
}

impl fmt::Display for TargetMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetMode::Last => write!(f, "last"),
            TargetMode::Random => write!(f, "random"),
            TargetMode::Explicit(date) => write!(f, "{}", date.format(DATE_FORMAT)),
        }
    }
}

/// A target day description that is neither `last`, `random`, nor a date.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("expecting \"last\", \"random\" or a date in DD/MM/YYYY format, received \"{0}\"")]
pub struct ParseTargetError(String);

/// An error raised while building or querying a [`Series`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeriesError {
    /// Two records share the same date.
    #[error("duplicate record for {}", .0.format(DATE_FORMAT))]
    DuplicateDate(NaiveDate),

    /// A record has a negative count.
    #[error("negative count {count} for {}", .date.format(DATE_FORMAT))]
    NegativeCount {
        /// The day with the invalid count.
        date: NaiveDate,

        /// The invalid count.
        count: i64,
    },

    /// The requested day is not in the series.
    #[error("no record for {}", .0.format(DATE_FORMAT))]
    DateNotFound(NaiveDate),

    /// The series has no records, so no day can be chosen.
    #[error("the series has no records")]
    EmptySeries,
}

/// Daily counts, sorted by date, with at most one record per day.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Series {
    records: Vec<Record>,
}

impl Series {
    /// Builds a series from raw `(date, count)` pairs in any order.
    ///
    /// Returns [`SeriesError::DuplicateDate`] if two pairs share a date and
    /// [`SeriesError::NegativeCount`] if a count is negative.
    pub fn load(records: impl IntoIterator<Item = (NaiveDate, i64)>) -> Result<Self, SeriesError> {
        let mut by_date = BTreeMap::new();
        for (date, count) in records {
            let count =
                u64::try_from(count).map_err(|_| SeriesError::NegativeCount { date, count })?;
            if by_date.insert(date, count).is_some() {
                return Err(SeriesError::DuplicateDate(date));
            }
        }
        let records = by_date
            .into_iter()
            .map(|(date, count)| Record { date, count })
            .collect::<Vec<_>>();
        debug!("loaded series of {} records", records.len());
        Ok(Self { records })
    }

    /// All records, sorted by date.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of days in the series.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if the series has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The earliest record.
    pub fn first(&self) -> Option<&Record> {
        self.records.first()
    }

    /// The latest record.
    pub fn last(&self) -> Option<&Record> {
        self.records.last()
    }

    /// The count recorded on `date`, if any.
    pub fn get(&self, date: NaiveDate) -> Option<u64> {
        self.records
            .binary_search_by_key(&date, |r| r.date)
            .ok()
            .map(|i| self.records[i].count)
    }

    /// The count recorded on `date`, or [`SeriesError::DateNotFound`].
    pub fn count_on(&self, date: NaiveDate) -> Result<u64, SeriesError> {
        self.get(date).ok_or(SeriesError::DateNotFound(date))
    }

    /// True if the series has a record for `date`.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.get(date).is_some()
    }

    /// The record with the highest count. The earliest one wins a tie.
    pub fn max(&self) -> Option<&Record> {
        // max_by_key keeps the last maximum, so walk backwards
        self.records.iter().rev().max_by_key(|r| r.count)
    }

    /// A copy of the series without the records after `date`.
    ///
    /// This is the history as it was known on `date`.
    pub fn until(&self, date: NaiveDate) -> Series {
        let end = self.records.partition_point(|r| r.date <= date);
        Series {
            records: self.records[..end].to_vec(),
        }
    }

    /// Chooses the day a tweet will describe.
    ///
    /// `rng` is only consulted by [`TargetMode::Random`]; pass a seeded
    /// generator for reproducible draws.
    pub fn resolve_target<R: Rng + ?Sized>(
        &self,
        mode: &TargetMode,
        rng: &mut R,
    ) -> Result<NaiveDate, SeriesError> {
        match mode {
            TargetMode::Last => self.last().map(|r| r.date).ok_or(SeriesError::EmptySeries),
            TargetMode::Random => self
                .records
                .choose(rng)
                .map(|r| r.date)
                .ok_or(SeriesError::EmptySeries),
            TargetMode::Explicit(date) => {
                if self.contains(*date) {
                    Ok(*date)
                } else {
                    Err(SeriesError::DateNotFound(*date))
                }
            }
        }
    }

    /// Ranks the count on `date` among the records in `scope`.
    ///
    /// Rank 1 is the highest count; an earlier date wins a tie.
    pub fn rank_of(&self, date: NaiveDate, scope: RankScope) -> Result<Rank, SeriesError> {
        let group = self
            .records
            .iter()
            .filter(|r| scope.matches(date, r.date))
            .map(|r| (r.date, r.count));
        rank_among(group, &date).ok_or(SeriesError::DateNotFound(date))
    }

    /// Counts recorded on the same month and day as `date` in earlier years,
    /// as `(year, count)` pairs sorted by year.
    pub fn same_date_prior_years(&self, date: NaiveDate) -> Vec<(i32, u64)> {
        self.records
            .iter()
            .filter(|r| {
                r.date.year() < date.year() && r.date.month() == date.month() && r.date.day() == date.day()
            })
            .map(|r| (r.date.year(), r.count))
            .collect()
    }

    /// Up to `limit` of the most recent records strictly before `date` that
    /// fall on the same weekday, most recent first.
    pub fn previous_same_weekdays(&self, date: NaiveDate, limit: usize) -> Vec<Record> {
        let Some(first) = self.first().map(|r| r.date) else {
            return Vec::new();
        };
        let mut found = Vec::new();
        let mut day = date;
        while found.len() < limit {
            match day.checked_sub_days(Days::new(7)) {
                Some(previous) if previous >= first => {
                    if let Some(count) = self.get(previous) {
                        found.push(Record {
                            date: previous,
                            count,
                        });
                    }
                    day = previous;
                }
                _ => break,
            }
        }
        found
    }

    /// Sum of every count in the series.
    pub fn total(&self) -> u64 {
        self.records.iter().map(|r| r.count).sum()
    }

    /// Sum of the counts in the year of `date`, up to and including `date`.
    pub fn year_total(&self, date: NaiveDate) -> u64 {
        self.records
            .iter()
            .filter(|r| r.date.year() == date.year() && r.date <= date)
            .map(|r| r.count)
            .sum()
    }

    /// Sum of the counts in the month of `date`, up to and including `date`.
    pub fn month_total(&self, date: NaiveDate) -> u64 {
        self.records
            .iter()
            .filter(|r| {
                r.date.year() == date.year() && r.date.month() == date.month() && r.date <= date
            })
            .map(|r| r.count)
            .sum()
    }

    /// Total count of every `(year, month)` in the series, sorted by month.
    pub fn monthly_totals(&self) -> Vec<((i32, u32), u64)> {
        let mut totals = BTreeMap::new();
        for r in &self.records {
            *totals.entry((r.date.year(), r.date.month())).or_insert(0) += r.count;
        }
        totals.into_iter().collect()
    }

    /// Total count of every year in the series, sorted by year.
    pub fn yearly_totals(&self) -> Vec<(i32, u64)> {
        let mut totals = BTreeMap::new();
        for r in &self.records {
            *totals.entry(r.date.year()).or_insert(0) += r.count;
        }
        totals.into_iter().collect()
    }
}
