// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Chooses which facts make it into a tweet.

use crate::fact::Fact;
use crate::series::Rank;
use itertools::Itertools;
use log::debug;
use std::cmp::Ordering;

/// Ranks at or below this are called out by position ("4ème meilleur jour").
pub const TOP_RANK: usize = 10;

/// Ranks within this share of all days are reported as a percentile.
pub const TOP_SHARE: f64 = 0.3;

/// Ranks within a month are only called out up to this position.
pub const TOP_MONTH_RANK: usize = 3;

/// Position of a fact in the selection order, or `None` if it is not worth
/// mentioning at all.
///
/// Lower values are more interesting.
pub fn priority(fact: &Fact) -> Option<u8> {
    match fact {
        Fact::NewRecord { .. } => Some(0),
        Fact::NearRecord { .. } => Some(1),
        Fact::OverallRank { rank, total } if *total >= 2 && *rank <= TOP_RANK => Some(2),
        Fact::YearSummary { .. } => Some(3),
        Fact::MonthSummary { .. } => Some(4),
        Fact::WeekdayRank { rank, total, .. } if *total >= 2 && *rank <= TOP_RANK => Some(5),
        Fact::MonthRecord { .. } => Some(6),
        Fact::YearRank { rank, total } if *total >= 2 && *rank <= TOP_RANK => Some(7),
        Fact::YearWeekdayRank { rank, total, .. } if *total >= 2 && *rank <= TOP_RANK => Some(8),
        Fact::MonthRank { rank, total } if *total >= 2 && *rank <= TOP_MONTH_RANK => Some(9),
        Fact::YearOverYearDelta { .. } => Some(10),
        Fact::Streak { .. } => Some(11),
        Fact::OverallRank { rank, total } if is_top_share(*rank, *total) => Some(12),
        Fact::Total { total, .. } if is_funny(*total) => Some(13),
        Fact::OverallRank { .. }
        | Fact::WeekdayRank { .. }
        | Fact::YearRank { .. }
        | Fact::YearWeekdayRank { .. }
        | Fact::MonthRank { .. }
        | Fact::Total { .. } => None,
    }
}

fn is_top_share(rank: usize, total: usize) -> bool {
    total >= 2 && Rank { rank, total }.share() <= TOP_SHARE
}

/// True if a number is worth celebrating on its own, such as 7777 or 300000.
///
/// # Examples
///
/// ```
/// use velotweet::select::is_funny;
/// assert!(is_funny(1_000_000));
/// assert!(is_funny(444));
/// assert!(!is_funny(44));
/// assert!(!is_funny(123_456));
/// ```
pub fn is_funny(number: u64) -> bool {
    if number == 0 {
        return false;
    }
    let digits = number.to_string();
    let repeated = digits.len() >= 3 && digits.chars().all_equal();
    let round = digits.chars().skip(1).all(|c| c == '0');
    repeated || round
}

/// Facts made redundant by another fact of higher priority in `facts`.
fn is_redundant(fact: &Fact, facts: &[Fact]) -> bool {
    let has_new_record = facts.iter().any(|f| matches!(f, Fact::NewRecord { .. }));
    let ties_record = facts
        .iter()
        .any(|f| matches!(f, Fact::NearRecord { margin, .. } if *margin == 0.0));
    let has = |predicate: fn(&Fact) -> bool| facts.iter().any(predicate);
    let first_of_year = has(|f| matches!(f, Fact::YearRank { rank: 1, .. }));
    let first_weekday = has(|f| matches!(f, Fact::WeekdayRank { rank: 1, .. }));
    let month_record = has(|f| matches!(f, Fact::MonthRecord { .. }));
    match fact {
        Fact::OverallRank { .. } => has_new_record || ties_record,
        Fact::NearRecord { .. } | Fact::MonthRecord { .. } => has_new_record,
        Fact::WeekdayRank { rank, .. } | Fact::YearRank { rank, .. } => {
            has_new_record && *rank == 1
        }
        Fact::YearWeekdayRank { rank, .. } => *rank == 1 && (has_new_record || first_weekday),
        Fact::MonthRank { rank, .. } => {
            *rank == 1 && (has_new_record || first_of_year || month_record)
        }
        _ => false,
    }
}

/// Secondary ordering among facts of equal priority.
fn tiebreak(lhs: &Fact, rhs: &Fact) -> Ordering {
    match (lhs, rhs) {
        (
            Fact::YearOverYearDelta { delta_pct: l, .. },
            Fact::YearOverYearDelta { delta_pct: r, .. },
        ) => r.abs().total_cmp(&l.abs()),
        _ => Ordering::Equal,
    }
}

/// Picks at most `max_count` facts from `facts`, most interesting first.
///
/// Facts that are not worth mentioning or that repeat a more interesting
/// fact are dropped. Year-over-year comparisons are ordered by the size of
/// the change. Selection is stable: the same facts always give the same
/// selection.
pub fn select(facts: &[Fact], max_count: usize) -> Vec<Fact> {
    let selected = facts
        .iter()
        .filter(|f| !is_redundant(f, facts))
        .filter_map(|f| priority(f).map(|p| (p, f)))
        .sorted_by(|(lp, lf), (rp, rf)| lp.cmp(rp).then_with(|| tiebreak(lf, rf)))
        .map(|(_, f)| f.clone())
        .take(max_count)
        .collect::<Vec<_>>();
    debug!("selected {} of {} facts", selected.len(), facts.len());
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fact::{StreakKind, TotalScope};
    use crate::series::Record;
    use crate::test_utils::date;
    use chrono::Weekday;
    use pretty_assertions::assert_eq;

    fn yoy(prior_year: i32, delta_pct: f64) -> Fact {
        Fact::YearOverYearDelta {
            prior_count: 1000,
            prior_year,
            delta_pct,
        }
    }

    fn streak() -> Fact {
        Fact::Streak {
            kind: StreakKind::Above,
            length: 4,
            capped: false,
        }
    }

    fn near_record(margin: f64) -> Fact {
        Fact::NearRecord {
            margin,
            record: 7000,
            record_date: date("01/06/2019"),
        }
    }

    mod priorities {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn it_orders_facts_by_interest() {
            let facts = vec![
                streak(),
                yoy(2018, 10.0),
                Fact::WeekdayRank {
                    rank: 2,
                    total: 50,
                    weekday: Weekday::Sat,
                },
                Fact::OverallRank { rank: 3, total: 300 },
                near_record(0.02),
            ];
            let expected = vec![
                near_record(0.02),
                Fact::OverallRank { rank: 3, total: 300 },
                Fact::WeekdayRank {
                    rank: 2,
                    total: 50,
                    weekday: Weekday::Sat,
                },
                yoy(2018, 10.0),
                streak(),
            ];
            assert_eq!(select(&facts, 10), expected);
        }

        #[test]
        fn it_orders_year_over_year_by_largest_change() {
            let facts = vec![yoy(2017, 5.0), yoy(2018, -30.0), yoy(2019, 12.5)];
            let expected = vec![yoy(2018, -30.0), yoy(2019, 12.5), yoy(2017, 5.0)];
            assert_eq!(select(&facts, 10), expected);
        }

        #[test]
        fn it_places_year_and_month_ranks_after_the_month_record() {
            let facts = vec![
                yoy(2018, 10.0),
                Fact::MonthRank { rank: 2, total: 20 },
                Fact::YearWeekdayRank {
                    rank: 4,
                    total: 30,
                    weekday: Weekday::Fri,
                },
                Fact::YearRank { rank: 5, total: 200 },
                Fact::MonthRecord { month: 5 },
            ];
            let expected = vec![
                Fact::MonthRecord { month: 5 },
                Fact::YearRank { rank: 5, total: 200 },
                Fact::YearWeekdayRank {
                    rank: 4,
                    total: 30,
                    weekday: Weekday::Fri,
                },
                Fact::MonthRank { rank: 2, total: 20 },
                yoy(2018, 10.0),
            ];
            assert_eq!(select(&facts, 10), expected);
        }

        #[test]
        fn it_drops_month_ranks_outside_the_podium() {
            let facts = vec![Fact::MonthRank { rank: 4, total: 20 }];
            assert!(select(&facts, 10).is_empty());
        }

        #[test]
        fn it_reports_lower_ranks_as_a_last_resort() {
            let facts = vec![
                Fact::OverallRank { rank: 25, total: 100 },
                streak(),
            ];
            let selected = select(&facts, 10);
            assert_eq!(selected.last(), Some(&Fact::OverallRank { rank: 25, total: 100 }));
        }
    }

    mod filtering {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn it_never_returns_more_than_the_maximum() {
            let facts = vec![yoy(2016, 1.0), yoy(2017, 2.0), yoy(2018, 3.0), streak()];
            for max_count in 0..6 {
                assert!(select(&facts, max_count).len() <= max_count);
            }
        }

        #[test]
        fn it_only_returns_input_facts() {
            let facts = vec![
                Fact::OverallRank { rank: 4, total: 37 },
                yoy(2018, 3.0),
                Fact::Total {
                    scope: TotalScope::Historical,
                    total: 500_000,
                },
            ];
            for fact in select(&facts, 10) {
                assert!(facts.contains(&fact), "{fact:?} is not an input fact");
            }
        }

        #[test]
        fn it_drops_low_ranks() {
            let facts = vec![
                Fact::OverallRank { rank: 80, total: 100 },
                Fact::WeekdayRank {
                    rank: 11,
                    total: 15,
                    weekday: Weekday::Mon,
                },
            ];
            assert!(select(&facts, 10).is_empty());
        }

        #[test]
        fn it_keeps_lower_ranks_within_the_top_share() {
            let kept = Fact::OverallRank { rank: 30, total: 100 };
            let dropped = Fact::OverallRank { rank: 31, total: 100 };
            assert_eq!(select(&[kept.clone()], 10), vec![kept]);
            assert!(select(&[dropped], 10).is_empty());
        }

        #[test]
        fn it_drops_ranks_among_a_single_day() {
            let facts = vec![
                Fact::OverallRank { rank: 1, total: 1 },
                Fact::WeekdayRank {
                    rank: 1,
                    total: 1,
                    weekday: Weekday::Mon,
                },
            ];
            assert!(select(&facts, 10).is_empty());
        }

        #[test]
        fn it_keeps_only_funny_totals() {
            let funny = Fact::Total {
                scope: TotalScope::Year,
                total: 300_000,
            };
            let boring = Fact::Total {
                scope: TotalScope::Month,
                total: 123_456,
            };
            assert_eq!(select(&[boring, funny.clone()], 10), vec![funny]);
        }
    }

    mod redundancy {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn it_collapses_narrower_first_ranks() {
            let facts = vec![
                Fact::YearRank { rank: 1, total: 200 },
                Fact::MonthRank { rank: 1, total: 20 },
                Fact::WeekdayRank {
                    rank: 1,
                    total: 50,
                    weekday: Weekday::Sun,
                },
                Fact::YearWeekdayRank {
                    rank: 1,
                    total: 30,
                    weekday: Weekday::Sun,
                },
            ];
            let expected = vec![
                Fact::WeekdayRank {
                    rank: 1,
                    total: 50,
                    weekday: Weekday::Sun,
                },
                Fact::YearRank { rank: 1, total: 200 },
            ];
            assert_eq!(select(&facts, 10), expected);
        }

        #[test]
        fn it_keeps_narrower_ranks_below_first() {
            let facts = vec![
                Fact::MonthRank { rank: 2, total: 20 },
                Fact::MonthRecord { month: 5 },
            ];
            assert_eq!(select(&facts, 10).len(), 2);
        }

        #[test]
        fn it_collapses_facts_about_a_new_record() {
            let record = Fact::NewRecord {
                previous: Some(Record {
                    date: date("01/06/2019"),
                    count: 6000,
                }),
            };
            let facts = vec![
                Fact::OverallRank { rank: 1, total: 300 },
                Fact::WeekdayRank {
                    rank: 1,
                    total: 40,
                    weekday: Weekday::Sat,
                },
                Fact::MonthRecord { month: 12 },
                record.clone(),
            ];
            assert_eq!(select(&facts, 10), vec![record]);
        }

        #[test]
        fn it_collapses_rank_into_a_tied_record() {
            let facts = vec![Fact::OverallRank { rank: 2, total: 300 }, near_record(0.0)];
            assert_eq!(select(&facts, 10), vec![near_record(0.0)]);
        }

        #[test]
        fn it_keeps_rank_next_to_a_close_record() {
            let facts = vec![Fact::OverallRank { rank: 2, total: 300 }, near_record(0.01)];
            assert_eq!(select(&facts, 10).len(), 2);
        }
    }

    mod funny_numbers {
        use super::*;

        #[test]
        fn it_finds_round_numbers() {
            for n in [1, 10, 500, 3000, 20_000, 1_000_000] {
                assert!(is_funny(n), "{n} should be funny");
            }
        }

        #[test]
        fn it_finds_repeated_digits() {
            for n in [111, 7777, 999_999] {
                assert!(is_funny(n), "{n} should be funny");
            }
        }

        #[test]
        fn it_ignores_other_numbers() {
            for n in [0, 11, 1001, 123_456, 20_001] {
                assert!(!is_funny(n), "{n} should not be funny");
            }
        }
    }

    #[test]
    fn it_is_deterministic() {
        let facts = vec![yoy(2017, 5.0), yoy(2018, -5.0), streak(), near_record(0.03)];
        let first = select(&facts, 3);
        for _ in 0..10 {
            assert_eq!(select(&facts, 3), first);
        }
    }
}
