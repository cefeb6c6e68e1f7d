// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Turns facts into French sentences.
//!
//! Numbers are grouped by thousands with a space ("6 896"), dates are
//! written as `DD/MM/YYYY`, ordinals follow French usage ("1er", "4ème"),
//! and nouns agree with the numbers they follow.

use crate::fact::{Fact, StreakKind, TotalScope};
use crate::select::TOP_RANK;
use crate::series::DATE_FORMAT;
use chrono::{Datelike, NaiveDate, Weekday};
use itertools::Itertools;

/// Grammatical gender of the noun an ordinal or adjective agrees with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gender {
    /// "le meilleur jour"
    Masculine,

    /// "la meilleure année"
    Feminine,
}

/// Renders the text describing a day: an opening sentence with the day's
/// count, followed by one sentence per fact in the given order.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use velotweet::fact::Fact;
/// use velotweet::render::render;
/// let date = NaiveDate::from_ymd_opt(2019, 12, 7).unwrap();
/// let facts = [Fact::OverallRank { rank: 4, total: 37 }];
/// assert_eq!(
///     render(6896, date, &facts),
///     "Le 07/12/2019, il y a eu 6 896 passages de cyclistes. 4ème meilleur jour historique."
/// );
/// ```
pub fn render(count: u64, date: NaiveDate, facts: &[Fact]) -> String {
    render_published(count, date, None, facts)
}

/// Like [`render()`], but names the day relative to the day the text is
/// published on: "Aujourd'hui" or "Hier" instead of the date when they apply.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use velotweet::render::render_published;
/// let date = NaiveDate::from_ymd_opt(2019, 12, 7).unwrap();
/// let published = date.succ_opt();
/// assert_eq!(
///     render_published(6896, date, published, &[]),
///     "Hier, il y a eu 6 896 passages de cyclistes."
/// );
/// ```
pub fn render_published(
    count: u64,
    date: NaiveDate,
    published: Option<NaiveDate>,
    facts: &[Fact],
) -> String {
    std::iter::once(opening(count, date, published))
        .chain(facts.iter().map(|fact| sentence(fact, date)))
        .join(" ")
}

/// How the opening sentence refers to `date`.
pub fn day_expression(date: NaiveDate, published: Option<NaiveDate>) -> String {
    match published {
        Some(published) if published == date => String::from("Aujourd'hui"),
        Some(published) if published.pred_opt() == Some(date) => String::from("Hier"),
        _ => format!("Le {}", format_date(date)),
    }
}

fn opening(count: u64, date: NaiveDate, published: Option<NaiveDate>) -> String {
    let cyclists = if count > 1 { "cyclistes" } else { "cycliste" };
    format!(
        "{}, il y a eu {} de {cyclists}.",
        day_expression(date, published),
        passages(count)
    )
}

/// The sentence stating a single fact about `date`.
pub fn sentence(fact: &Fact, date: NaiveDate) -> String {
    match fact {
        Fact::NewRecord { previous: None } => String::from("Record historique !"),
        Fact::NewRecord {
            previous: Some(previous),
        } => format!(
            "Record historique ! L'ancien record était de {} le {}.",
            passages(previous.count),
            format_date(previous.date)
        ),
        Fact::NearRecord {
            margin,
            record,
            record_date,
        } => {
            if *margin == 0.0 {
                format!("Record historique du {} égalé !", format_date(*record_date))
            } else {
                let distance = match percent(margin * 100.0).as_str() {
                    "0 %" => String::from("moins de 0,1 %"),
                    distance => distance.to_string(),
                };
                format!(
                    "À {distance} du record historique ({} le {}).",
                    passages(*record),
                    format_date(*record_date)
                )
            }
        }
        Fact::OverallRank { rank, total } => {
            if *rank <= TOP_RANK {
                capitalize(&format!("{} jour historique.", best(*rank, Gender::Masculine)))
            } else {
                format!("Top {} % des jours.", round_to_twentieth(*rank, *total))
            }
        }
        Fact::WeekdayRank {
            rank,
            total,
            weekday,
        } => {
            if *rank <= TOP_RANK {
                capitalize(&format!(
                    "{} {} historique.",
                    best(*rank, Gender::Masculine),
                    weekday_name(*weekday)
                ))
            } else {
                format!(
                    "Top {} % des {}s.",
                    round_to_twentieth(*rank, *total),
                    weekday_name(*weekday)
                )
            }
        }
        Fact::YearRank { rank, total } => {
            if *rank <= TOP_RANK {
                capitalize(&format!("{} jour de l'année.", best(*rank, Gender::Masculine)))
            } else {
                format!(
                    "Top {} % des jours de l'année.",
                    round_to_twentieth(*rank, *total)
                )
            }
        }
        Fact::MonthRank { rank, total } => {
            if *rank <= TOP_RANK {
                capitalize(&format!("{} jour du mois.", best(*rank, Gender::Masculine)))
            } else {
                format!("Top {} % des jours du mois.", round_to_twentieth(*rank, *total))
            }
        }
        Fact::YearWeekdayRank {
            rank,
            total,
            weekday,
        } => {
            if *rank <= TOP_RANK {
                capitalize(&format!(
                    "{} {} de l'année.",
                    best(*rank, Gender::Masculine),
                    weekday_name(*weekday)
                ))
            } else {
                format!(
                    "Top {} % des {}s de l'année.",
                    round_to_twentieth(*rank, *total),
                    weekday_name(*weekday)
                )
            }
        }
        Fact::YearOverYearDelta {
            prior_count,
            prior_year,
            delta_pct,
        } => {
            let prior_date = format!("{:02}/{:02}/{prior_year}", date.day(), date.month());
            let change = percent(delta_pct.abs());
            if change == "0 %" {
                format!("Autant que le {prior_date} ({}).", passages(*prior_count))
            } else {
                let direction = if *delta_pct > 0.0 { "hausse" } else { "baisse" };
                format!(
                    "En {direction} de {change} par rapport au {prior_date} ({}).",
                    passages(*prior_count)
                )
            }
        }
        Fact::Streak {
            kind,
            length,
            capped,
        } => {
            let side = match kind {
                StreakKind::Above => "au-dessus",
                StreakKind::Below => "en dessous",
            };
            if *capped {
                format!("Au moins {length} jours consécutifs {side} de la moyenne.")
            } else {
                format!(
                    "{} jour consécutif {side} de la moyenne.",
                    ordinal(*length, Gender::Masculine)
                )
            }
        }
        Fact::MonthRecord { month } => {
            format!("Meilleur jour pour un mois {} !", elide_de(month_name(*month)))
        }
        Fact::MonthSummary {
            year,
            month,
            total,
            rank,
        } => format!(
            "{} {year} : {} mois de l'histoire avec {}.",
            capitalize(month_name(*month)),
            best(*rank, Gender::Masculine),
            passages(*total)
        ),
        Fact::YearSummary { year, total, rank } => format!(
            "{year} : {} année de l'histoire avec {}.",
            best(*rank, Gender::Feminine),
            passages(*total)
        ),
        Fact::Total { scope, total } => {
            let since = match scope {
                TotalScope::Historical => "depuis l'installation du compteur",
                TotalScope::Year => "depuis le début de l'année",
                TotalScope::Month => "depuis le début du mois",
            };
            format!("{} {since}.", passages(*total))
        }
    }
}

/// Formats a date as `DD/MM/YYYY`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Groups the digits of a number by thousands, separated by spaces.
///
/// # Examples
///
/// ```
/// use velotweet::render::group_thousands;
/// assert_eq!(group_thousands(6896), "6 896");
/// assert_eq!(group_thousands(1234567), "1 234 567");
/// assert_eq!(group_thousands(999), "999");
/// ```
pub fn group_thousands(number: u64) -> String {
    let digits = number.to_string();
    let head = digits.len() % 3;
    let mut groups = Vec::new();
    if head > 0 {
        groups.push(&digits[..head]);
    }
    groups.extend(
        (head..digits.len())
            .step_by(3)
            .map(|start| &digits[start..start + 3]),
    );
    groups.join(" ")
}

/// A number of passages, with the noun agreeing with the number.
///
/// French treats 0 and 1 as singular.
pub fn passages(count: u64) -> String {
    let noun = if count > 1 { "passages" } else { "passage" };
    format!("{} {noun}", group_thousands(count))
}

/// The French ordinal for a rank: "1er", "1ère", "2ème", ...
pub fn ordinal(rank: usize, gender: Gender) -> String {
    match (rank, gender) {
        (1, Gender::Masculine) => String::from("1er"),
        (1, Gender::Feminine) => String::from("1ère"),
        (n, _) => format!("{n}ème"),
    }
}

/// "meilleur" preceded by its ordinal, which is left out for the first rank.
fn best(rank: usize, gender: Gender) -> String {
    let best = match gender {
        Gender::Masculine => "meilleur",
        Gender::Feminine => "meilleure",
    };
    if rank == 1 {
        best.to_string()
    } else {
        format!("{} {best}", ordinal(rank, gender))
    }
}

/// A percentage with at most one decimal, a decimal comma, and a space
/// before the sign: "2,5 %", "12 %".
pub fn percent(value: f64) -> String {
    let formatted = format!("{value:.1}");
    let formatted = formatted.strip_suffix(".0").unwrap_or(&formatted);
    format!("{} %", formatted.replace('.', ","))
}

/// Rounds `rank / total` up to the next multiple of 5 percent.
fn round_to_twentieth(rank: usize, total: usize) -> u32 {
    let share = rank as f64 / total.max(1) as f64;
    ((share * 20.0).ceil() * 5.0) as u32
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// "de" followed by `word`, elided before a vowel: "de mai", "d'août".
fn elide_de(word: &str) -> String {
    let starts_with_vowel = word
        .chars()
        .next()
        .is_some_and(|c| "aâàeéèêiîoôuû".contains(c));
    if starts_with_vowel {
        format!("d'{word}")
    } else {
        format!("de {word}")
    }
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "lundi",
        Weekday::Tue => "mardi",
        Weekday::Wed => "mercredi",
        Weekday::Thu => "jeudi",
        Weekday::Fri => "vendredi",
        Weekday::Sat => "samedi",
        Weekday::Sun => "dimanche",
    }
}

fn month_name(month: u32) -> &'static str {
    match month {
        1 => "janvier",
        2 => "février",
        3 => "mars",
        4 => "avril",
        5 => "mai",
        6 => "juin",
        7 => "juillet",
        8 => "août",
        9 => "septembre",
        10 => "octobre",
        11 => "novembre",
        _ => "décembre",
    }
}
