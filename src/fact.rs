// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Statistical observations about a single day.
//!
//! [`candidate_facts()`] looks at a day's count against the history known
//! on that day and returns everything that could be said about it. Picking
//! which of those facts are actually worth saying is the job of the
//! [selector](crate::select).

use crate::series::{Rank, RankScope, Record, Series, SeriesError, rank_among};
use chrono::{Datelike, NaiveDate, Weekday};
use log::{debug, trace};

/// Whether a streak of days is above or below the usual count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreakKind {
    /// Counts higher than the reference.
    Above,

    /// Counts lower than the reference.
    Below,
}

/// The period a cumulative total covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TotalScope {
    /// Since the counter was installed.
    Historical,

    /// Since the beginning of the year.
    Year,

    /// Since the beginning of the month.
    Month,
}

/// A single observation about a day, with the numbers needed to state it.
#[derive(Clone, Debug, PartialEq)]
pub enum Fact {
    /// The day beat every earlier day.
    NewRecord {
        /// The record that was beaten.
        previous: Option<Record>,
    },

    /// The day came close to (or matched) the historical record.
    NearRecord {
        /// Relative distance to the record, between 0 and 1.
        margin: f64,

        /// The record count.
        record: u64,

        /// When the record was set.
        record_date: NaiveDate,
    },

    /// Rank of the day among all days.
    OverallRank {
        /// Rank of the day, starting at 1.
        rank: usize,

        /// Number of ranked days.
        total: usize,
    },

    /// Rank of the day among days on the same day of the week.
    WeekdayRank {
        /// Rank of the day, starting at 1.
        rank: usize,

        /// Number of ranked days.
        total: usize,

        /// Day of the week shared by the ranked days.
        weekday: Weekday,
    },

    /// Rank of the day among the days of its year.
    YearRank {
        /// Rank of the day, starting at 1.
        rank: usize,

        /// Number of ranked days.
        total: usize,
    },

    /// Rank of the day among the days of its month.
    MonthRank {
        /// Rank of the day, starting at 1.
        rank: usize,

        /// Number of ranked days.
        total: usize,
    },

    /// Rank of the day among days of its year on the same day of the week.
    YearWeekdayRank {
        /// Rank of the day, starting at 1.
        rank: usize,

        /// Number of ranked days.
        total: usize,

        /// Day of the week shared by the ranked days.
        weekday: Weekday,
    },

    /// Comparison with the same date in an earlier year.
    YearOverYearDelta {
        /// Count on the same date in `prior_year`.
        prior_count: u64,

        /// The year compared against.
        prior_year: i32,

        /// Change in percent, relative to `prior_count`.
        delta_pct: f64,
    },

    /// The day extends a run of days above or below the usual count.
    Streak {
        /// Direction of the run.
        kind: StreakKind,

        /// Number of days in the run, including the day itself.
        length: usize,

        /// True if the run may be longer than `length`.
        capped: bool,
    },

    /// Best day ever seen in this calendar month, across all years.
    MonthRecord {
        /// Month number, from 1 to 12.
        month: u32,
    },

    /// The day closes a month.
    MonthSummary {
        /// Year of the month.
        year: i32,

        /// Month number, from 1 to 12.
        month: u32,

        /// Passages during the month.
        total: u64,

        /// Rank of the month among all months.
        rank: usize,
    },

    /// The day closes a year.
    YearSummary {
        /// The year.
        year: i32,

        /// Passages during the year.
        total: u64,

        /// Rank of the year among all years.
        rank: usize,
    },

    /// Cumulative passages up to and including the day.
    Total {
        /// Period covered by the total.
        scope: TotalScope,

        /// Number of passages.
        total: u64,
    },
}

/// Thresholds used when looking for facts.
#[derive(Clone, Debug, PartialEq)]
pub struct FactConfig {
    /// Largest relative distance to the record still reported as "near".
    pub near_record_threshold: f64,

    /// Number of previous same-weekday counts averaged into a streak reference.
    pub streak_window: usize,

    /// Shortest streak worth reporting.
    pub min_streak: usize,

    /// Longest streak length reported; longer streaks are capped.
    pub max_streak: usize,

    /// Fewest days a calendar month needs before its record is reported.
    pub min_month_days: usize,
}

impl Default for FactConfig {
    fn default() -> Self {
        Self {
            near_record_threshold: 0.05,
            streak_window: 4,
            min_streak: 3,
            max_streak: 30,
            min_month_days: 7,
        }
    }
}

/// A day seen through the history known on that day.
#[derive(Debug)]
struct Day<'a> {
    history: &'a Series,
    date: NaiveDate,
    count: u64,
    config: &'a FactConfig,
}

/// Computes every fact about `date`.
///
/// Only records up to and including `date` are taken into account, so
/// the facts read as they would have on that day. Returns
/// [`SeriesError::DateNotFound`] if `date` is not in the series.
pub fn candidate_facts(
    series: &Series,
    date: NaiveDate,
    config: &FactConfig,
) -> Result<Vec<Fact>, SeriesError> {
    let history = series.until(date);
    let count = history.count_on(date)?;
    let day = Day {
        history: &history,
        date,
        count,
        config,
    };

    let overall = history.rank_of(date, RankScope::All)?;
    let weekday = history.rank_of(date, RankScope::SameWeekday)?;

    let mut facts = Vec::new();
    facts.extend(new_record(&day, &overall));
    facts.extend(near_record(&day));
    facts.push(Fact::OverallRank {
        rank: overall.rank,
        total: overall.total,
    });
    facts.push(Fact::WeekdayRank {
        rank: weekday.rank,
        total: weekday.total,
        weekday: date.weekday(),
    });
    facts.extend(narrower_ranks(&day, &overall, &weekday)?);
    facts.extend(year_over_year(&day));
    facts.extend(streak(&day));
    facts.extend(month_record(&day)?);
    facts.extend(month_summary(&day));
    facts.extend(year_summary(&day));
    facts.extend(totals(&day));

    debug!("found {} candidate facts for {date}", facts.len());
    trace!("candidate facts: {facts:?}");
    Ok(facts)
}

fn new_record(day: &Day, overall: &Rank) -> Option<Fact> {
    if !overall.is_first() || overall.total < 2 {
        return None;
    }
    let previous = day
        .history
        .records()
        .iter()
        .filter(|r| r.date < day.date)
        .rev()
        .max_by_key(|r| r.count)
        .copied();
    Some(Fact::NewRecord { previous })
}

fn near_record(day: &Day) -> Option<Fact> {
    let best = day.history.max()?;
    if best.date == day.date || best.count == 0 {
        return None;
    }
    let margin = (best.count - day.count) as f64 / best.count as f64;
    if margin > day.config.near_record_threshold {
        return None;
    }
    Some(Fact::NearRecord {
        margin,
        record: best.count,
        record_date: best.date,
    })
}

/// Ranks within the year, the month, and the year's same weekdays.
///
/// A rank is left out when its group holds as many days as the wider group,
/// since it would only repeat the wider rank.
fn narrower_ranks(day: &Day, overall: &Rank, weekday: &Rank) -> Result<Vec<Fact>, SeriesError> {
    let year = day.history.rank_of(day.date, RankScope::SameYear)?;
    let month = day.history.rank_of(day.date, RankScope::SameYearMonth)?;
    let year_weekday = day.history.rank_of(day.date, RankScope::SameYearWeekday)?;

    let mut facts = Vec::new();
    if year.total < overall.total {
        facts.push(Fact::YearRank {
            rank: year.rank,
            total: year.total,
        });
    }
    if month.total < year.total {
        facts.push(Fact::MonthRank {
            rank: month.rank,
            total: month.total,
        });
    }
    if year_weekday.total < weekday.total {
        facts.push(Fact::YearWeekdayRank {
            rank: year_weekday.rank,
            total: year_weekday.total,
            weekday: day.date.weekday(),
        });
    }
    Ok(facts)
}

fn year_over_year(day: &Day) -> Vec<Fact> {
    day.history
        .same_date_prior_years(day.date)
        .into_iter()
        .filter_map(|(prior_year, prior_count)| {
            if prior_count == 0 {
                debug!("no comparison with {prior_year}: nobody was counted that day");
                return None;
            }
            let delta_pct = (day.count as f64 - prior_count as f64) / prior_count as f64 * 100.0;
            Some(Fact::YearOverYearDelta {
                prior_count,
                prior_year,
                delta_pct,
            })
        })
        .collect()
}

/// Compares a count with the average of the previous same-weekday counts.
fn direction(history: &Series, date: NaiveDate, count: u64, window: usize) -> Option<StreakKind> {
    let previous = history.previous_same_weekdays(date, window);
    if previous.is_empty() {
        return None;
    }
    let reference = previous.iter().map(|r| r.count as f64).sum::<f64>() / previous.len() as f64;
    let count = count as f64;
    if count > reference {
        Some(StreakKind::Above)
    } else if count < reference {
        Some(StreakKind::Below)
    } else {
        None
    }
}

fn streak(day: &Day) -> Option<Fact> {
    let config = day.config;
    let kind = direction(day.history, day.date, day.count, config.streak_window)?;

    let mut length = 1;
    let mut current = day.date;
    while length < config.max_streak {
        let Some(previous) = current.pred_opt() else {
            break;
        };
        let Some(count) = day.history.get(previous) else {
            break;
        };
        if direction(day.history, previous, count, config.streak_window) != Some(kind) {
            break;
        }
        length += 1;
        current = previous;
    }

    if length < config.min_streak {
        return None;
    }
    Some(Fact::Streak {
        kind,
        length,
        capped: length >= config.max_streak,
    })
}

fn month_record(day: &Day) -> Result<Option<Fact>, SeriesError> {
    let rank = day.history.rank_of(day.date, RankScope::SameMonth)?;
    if rank.is_first() && rank.total >= day.config.min_month_days.max(2) {
        Ok(Some(Fact::MonthRecord {
            month: day.date.month(),
        }))
    } else {
        Ok(None)
    }
}

fn is_last_day_of_month(date: NaiveDate) -> bool {
    date.succ_opt().is_none_or(|next| next.day() == 1)
}

fn month_summary(day: &Day) -> Option<Fact> {
    if !is_last_day_of_month(day.date) {
        return None;
    }
    let key = (day.date.year(), day.date.month());
    let totals = day.history.monthly_totals();
    let total = totals.iter().find(|(k, _)| *k == key)?.1;
    let rank = rank_among(totals, &key)?;
    Some(Fact::MonthSummary {
        year: key.0,
        month: key.1,
        total,
        rank: rank.rank,
    })
}

fn year_summary(day: &Day) -> Option<Fact> {
    if day.date.month() != 12 || day.date.day() != 31 {
        return None;
    }
    let year = day.date.year();
    let totals = day.history.yearly_totals();
    let total = totals.iter().find(|(y, _)| *y == year)?.1;
    let rank = rank_among(totals, &year)?;
    Some(Fact::YearSummary {
        year,
        total,
        rank: rank.rank,
    })
}

fn totals(day: &Day) -> Vec<Fact> {
    let mut facts = vec![Fact::Total {
        scope: TotalScope::Historical,
        total: day.history.total(),
    }];
    if day.date.ordinal() != 1 {
        facts.push(Fact::Total {
            scope: TotalScope::Year,
            total: day.history.year_total(day.date),
        });
    }
    if day.date.day() != 1 {
        facts.push(Fact::Total {
            scope: TotalScope::Month,
            total: day.history.month_total(day.date),
        });
    }
    facts
}
