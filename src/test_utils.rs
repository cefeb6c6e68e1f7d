use crate::input;
use crate::series::{DATE_FORMAT, Series};
use chrono::{Days, NaiveDate};
use std::fs;

pub fn do_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, DATE_FORMAT).expect(&format!("invalid test date {s}"))
}

pub fn load_data(file: &str) -> String {
    fs::read_to_string(format!("tests/data/{file}.csv")).expect("could not find test data")
}

pub fn load_series(file: &str) -> Series {
    let records = input::read_csv(load_data(file).as_bytes()).expect("could not parse test data");
    Series::load(records).expect("invalid test series")
}

/// Six days of data around the end of August 2020.
pub fn small_series() -> Series {
    Series::load(vec![
        (date("31/08/2020"), 100),
        (date("01/09/2020"), 200),
        (date("02/09/2020"), 350),
        (date("03/09/2020"), 250),
        (date("04/09/2020"), 50),
        (date("05/09/2020"), 120),
    ])
    .expect("invalid test series")
}

/// Consecutive days starting at `start`, one per count.
pub fn series_from(start: &str, counts: &[i64]) -> Series {
    let start = date(start);
    Series::load(
        counts
            .iter()
            .enumerate()
            .map(|(i, count)| (start + Days::new(i as u64), *count)),
    )
    .expect("invalid test series")
}
