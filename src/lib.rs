// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! velotweet turns the daily readings of a bicycle counter into a short
//! French "tweet" about a notable day, and publishes it to the console,
//! Twitter, or Slack.
//!
//! A tweet opens with the number of cyclists counted that day and follows
//! with the most interesting facts about it, such as a new record, its rank
//! among all days or among days of the same weekday, a comparison with the
//! same date in earlier years, or a streak above the recent average:
//!
//! ```text
//! Le 07/12/2019, il y a eu 6 896 passages de cyclistes. 4ème meilleur jour historique.
//! ```
//!
//! # Examples
//!
//! Print a tweet about the last day in a CSV file of daily counts:
//!
//! ```bash
//! velotweet publish -i counts.csv
//! ```
//!
//! Describe a given day, mentioning up to three facts, and send it to Slack:
//!
//! ```bash
//! velotweet publish -i counts.csv -d 07/12/2019 -n 3 -o slack --slack-url https://hooks.slack.com/...
//! ```
//!
//! Describe a random day, reproducibly:
//!
//! ```bash
//! velotweet publish -i counts.csv -d random --seed 42
//! ```
//!
//! List everything notable about a day, and which facts a tweet would use:
//!
//! ```bash
//! velotweet facts -i counts.csv -d 07/12/2019
//! ```
//!
//! The same thing can be done from code with [`tweet::compose()`]:
//!
//! ```
//! use velotweet::series::{Series, TargetMode};
//! use velotweet::tweet::{TweetOptions, compose};
//! # use chrono::NaiveDate;
//! # let date = |s| NaiveDate::parse_from_str(s, "%d/%m/%Y").unwrap();
//! let series = Series::load(vec![
//!     (date("05/12/2019"), 4100),
//!     (date("06/12/2019"), 5214),
//!     (date("07/12/2019"), 6896),
//! ])?;
//! let tweet = compose(&series, &TargetMode::Last, &TweetOptions::default())?;
//! assert!(tweet.content().starts_with("Le 07/12/2019, il y a eu 6 896 passages"));
//! # Ok::<(), velotweet::tweet::Error>(())
//! ```
//!
//! # Twitter and Slack Setup
//!
//! Posting to Twitter requires an OAuth 2.0 user access token with the
//! `tweet.write` scope, passed with `--twitter-access-token` or stored in
//! `$TWITTER_ACCESS_TOKEN`. Sending to Slack requires an [incoming webhook]
//! URL, passed with `--slack-url` or stored in `$SLACK_WEBHOOK_URL`.
//!
//! # License
//!
//! velotweet is licensed under the terms of the [Apache License 2.0]. Please
//! see the LICENSE file accompanying this source code or visit the previous
//! link for more information on licensing.
//!
//! [Apache License 2.0]: https://www.apache.org/licenses/LICENSE-2.0
//! [incoming webhook]: https://api.slack.com/messaging/webhooks

pub mod cli;
pub mod conf;
pub mod fact;
pub mod http;
pub mod input;
pub mod publish;
pub mod render;
pub mod select;
pub mod series;
pub mod tweet;

#[cfg(test)]
mod test_utils;
