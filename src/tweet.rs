// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Composes tweets from counter data.
//!
//! [`compose()`] is the entry point: it picks the day to describe, finds
//! what is notable about it, keeps the most interesting facts, and renders
//! them as text. It performs no I/O; the resulting [`Tweet`] is handed to
//! a [publisher](crate::publish) afterwards.

use crate::fact::{FactConfig, candidate_facts};
use crate::render::render_published;
use crate::select::select;
use crate::series::{Series, SeriesError, TargetMode};
use chrono::NaiveDate;
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

/// Text ready to be published.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tweet {
    content: String,
}

impl Tweet {
    /// Wraps `content` in a tweet.
    pub fn new(content: impl Into<String>) -> Self {
        let content = content.into();
        Self { content }
    }

    /// The text of the tweet.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Length of the tweet in characters (not bytes).
    pub fn len(&self) -> usize {
        self.content.chars().count()
    }

    /// True if the tweet has no text.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

impl fmt::Display for Tweet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.content)
    }
}

static HASHTAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#\w+$").expect("hashtag pattern is invalid"));

/// A hashtag appended to the end of a tweet, such as `#velo`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hashtag(String);

impl Hashtag {
    /// The hashtag, including the leading `#`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Hashtag {
    type Err = HashtagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if HASHTAG.is_match(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(HashtagError(s.to_string()))
        }
    }
}

/// A string that is not a valid hashtag.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("expecting a hashtag starting with '#', received \"{0}\"")]
pub struct HashtagError(String);

/// Tweet composition options.
#[derive(Clone, Debug, PartialEq)]
pub struct TweetOptions {
    max_facts: usize,
    fact_config: FactConfig,
    seed: Option<u64>,
    hashtag: Option<Hashtag>,
    published_on: Option<NaiveDate>,
}

impl Default for TweetOptions {
    fn default() -> Self {
        Self {
            max_facts: Self::DEFAULT_MAX_FACTS,
            fact_config: FactConfig::default(),
            seed: None,
            hashtag: None,
            published_on: None,
        }
    }
}

impl TweetOptions {
    /// Number of facts mentioned when no maximum is given.
    pub const DEFAULT_MAX_FACTS: usize = 2;

    /// Incrementally builds a new set of tweet options.
    ///
    /// # Examples
    ///
    /// ```
    /// use velotweet::tweet::TweetOptions;
    /// let opts = TweetOptions::build().max_facts(3).seed(Some(1)).build();
    /// assert_eq!(opts.max_facts(), 3);
    /// ```
    pub fn build() -> TweetOptionsBuilder {
        TweetOptionsBuilder::default()
    }

    /// Largest number of facts mentioned in the tweet.
    pub fn max_facts(&self) -> usize {
        self.max_facts
    }

    /// Thresholds used to find facts.
    pub fn fact_config(&self) -> &FactConfig {
        &self.fact_config
    }

    /// Seed for random day selection, if any.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Hashtag appended to the tweet, if any.
    pub fn hashtag(&self) -> Option<&Hashtag> {
        self.hashtag.as_ref()
    }

    /// Day the tweet is published on, if known.
    ///
    /// When set, the described day is called "Aujourd'hui" or "Hier" when
    /// that fits.
    pub fn published_on(&self) -> Option<NaiveDate> {
        self.published_on
    }

    /// A random number generator seeded with [`TweetOptions::seed()`], or
    /// from system entropy when no seed was given.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// A builder for tweet options.
///
/// You probably don't want to use this directly; call [`TweetOptions::build()`]
/// and construct it incrementally instead.
#[derive(Debug, Default)]
#[must_use]
pub struct TweetOptionsBuilder {
    options: TweetOptions,
}

impl TweetOptionsBuilder {
    /// Sets the largest number of facts mentioned in the tweet.
    pub fn max_facts(mut self, max_facts: usize) -> Self {
        self.options.max_facts = max_facts;
        self
    }

    /// Sets the thresholds used to find facts.
    pub fn fact_config(mut self, fact_config: FactConfig) -> Self {
        self.options.fact_config = fact_config;
        self
    }

    /// Sets the seed used to draw a random day.
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.options.seed = seed;
        self
    }

    /// Sets the hashtag appended to the tweet.
    pub fn hashtag(mut self, hashtag: Option<Hashtag>) -> Self {
        self.options.hashtag = hashtag;
        self
    }

    /// Sets the day the tweet is published on.
    pub fn published_on(mut self, published_on: Option<NaiveDate>) -> Self {
        self.options.published_on = published_on;
        self
    }

    /// Finalizes the [`TweetOptions`].
    pub fn build(self) -> TweetOptions {
        self.options
    }
}

/// An error composing a tweet.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The day to describe could not be found in the series.
    #[error("{0}")]
    Series(#[from] SeriesError),
}

/// Composes a tweet about the day chosen by `mode`.
pub fn compose(series: &Series, mode: &TargetMode, options: &TweetOptions) -> Result<Tweet, Error> {
    let date = series.resolve_target(mode, &mut options.rng())?;
    info!("composing tweet for {date} (target day: {mode})");
    compose_for(series, date, options)
}

/// Composes a tweet about `date`.
pub fn compose_for(series: &Series, date: NaiveDate, options: &TweetOptions) -> Result<Tweet, Error> {
    let count = series.count_on(date)?;
    let facts = candidate_facts(series, date, options.fact_config())?;
    let facts = select(&facts, options.max_facts());
    let mut content = render_published(count, date, options.published_on(), &facts);
    if let Some(hashtag) = options.hashtag() {
        content.push('\n');
        content.push_str(hashtag.as_str());
    }
    Ok(Tweet::new(content))
}
