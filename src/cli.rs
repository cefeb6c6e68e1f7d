// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Drives the command-line program.

use crate::fact::{FactConfig, candidate_facts};
use crate::input::{self, IngestError};
use crate::publish::{Channel, Output, PublishError, Publisher};
use crate::render::{format_date, sentence};
use crate::select::select;
use crate::series::{DATE_FORMAT, Series, TargetMode};
use crate::tweet::{self, Hashtag, TweetOptions, compose};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::Verbosity;
use log::debug;
use std::path::PathBuf;
use std::process;
use thiserror::Error;

/// Prints `message` to stderr and exits with `error_code`.
pub fn die(error_code: i32, message: &str) -> ! {
    eprintln!("{message}");
    process::exit(error_code);
}

/// An error running the command-line program.
#[derive(Debug, Error)]
pub enum Error {
    /// The counter data could not be loaded.
    #[error("{0}")]
    Ingest(#[from] IngestError),

    /// The tweet could not be composed.
    #[error("{0}")]
    Tweet(#[from] tweet::Error),

    /// The tweet could not be published.
    #[error("{0}")]
    Publish(#[from] PublishError),
}

/// Program configuration.
#[derive(Debug, Parser)]
#[command(version)]
#[command(about = "Turns daily bicycle counter data into tweets about notable days", long_about = None)]
pub struct Config {
    #[command(flatten)]
    verbosity: Verbosity,

    #[command(subcommand)]
    command: Command,
}

impl Config {
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compose a tweet about a day and publish it
    Publish(PublishConfig),

    /// List everything notable about a day
    Facts(SourceConfig),
}

impl Command {
    fn source(&self) -> &SourceConfig {
        match self {
            Command::Publish(config) => &config.source,
            Command::Facts(config) => config,
        }
    }
}

#[derive(Args, Debug)]
struct SourceConfig {
    /// CSV file of daily counts ("DD/MM/YYYY,count" per line)
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    /// Day to describe: "last", "random", or a DD/MM/YYYY date
    #[arg(short, long, default_value_t = TargetMode::Last)]
    date: TargetMode,

    /// Seed used to draw a random day
    #[arg(long)]
    seed: Option<u64>,

    /// Distance to the record, as a fraction, under which a day is "near" it
    #[arg(long, value_name = "F", default_value_t = FactConfig::default().near_record_threshold)]
    near_record_threshold: f64,
}

impl SourceConfig {
    fn fact_config(&self) -> FactConfig {
        FactConfig {
            near_record_threshold: self.near_record_threshold,
            ..FactConfig::default()
        }
    }
}

#[derive(Args, Debug)]
struct PublishConfig {
    #[command(flatten)]
    source: SourceConfig,

    /// Where to publish the tweet
    #[arg(short, long, value_enum, default_value_t = Output::Std)]
    output: Output,

    /// Mention at most this many facts
    #[arg(short = 'n', long, value_name = "MAX_FACTS", default_value_t = TweetOptions::DEFAULT_MAX_FACTS)]
    max_facts: usize,

    /// Hashtag added at the end of the tweet, such as "#velo"
    #[arg(long)]
    hashtag: Option<Hashtag>,

    /// Day the tweet is published on ("today" or DD/MM/YYYY); names the
    /// described day "Aujourd'hui" or "Hier" when that fits
    #[arg(long, value_name = "DATE", value_parser = parse_publication_date)]
    published_on: Option<NaiveDate>,

    /// Twitter OAuth 2.0 user access token [default: $TWITTER_ACCESS_TOKEN]
    #[arg(long, value_name = "TOKEN")]
    twitter_access_token: Option<String>,

    /// Slack incoming webhook URL [default: $SLACK_WEBHOOK_URL]
    #[arg(long, value_name = "URL")]
    slack_url: Option<String>,
}

impl PublishConfig {
    fn tweet_options(&self) -> TweetOptions {
        TweetOptions::build()
            .max_facts(self.max_facts)
            .fact_config(self.source.fact_config())
            .seed(self.source.seed)
            .hashtag(self.hashtag.clone())
            .published_on(self.published_on)
            .build()
    }
}

fn parse_publication_date(s: &str) -> Result<NaiveDate, chrono::ParseError> {
    if s.trim().eq_ignore_ascii_case("today") {
        Ok(Local::now().date_naive())
    } else {
        NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
    }
}

/// Runs the command-line program.
#[derive(Debug)]
pub struct Runner {
    config: Config,
    series: Series,
}

impl Runner {
    /// Create a new program runner using the given `config`.
    ///
    /// Returns an error with a helpful message if the counter data cannot
    /// be loaded.
    pub fn new(config: Config) -> Result<Runner, Error> {
        let series = input::load_series(&config.command.source().input)?;
        debug!("loaded {} days of counter data", series.len());
        Ok(Self { config, series })
    }

    /// Run the command-line program using its stored configuration options.
    pub async fn run(&self) -> Result<(), Error> {
        match &self.config.command {
            Command::Publish(config) => self.run_publish(config).await,
            Command::Facts(config) => self.run_facts(config),
        }
    }

    async fn run_publish(&self, config: &PublishConfig) -> Result<(), Error> {
        let channel = Channel::for_output(
            config.output,
            config.slack_url.as_deref(),
            config.twitter_access_token.as_deref(),
        )?;
        let tweet = compose(&self.series, &config.source.date, &config.tweet_options())?;
        channel.publish(&tweet).await?;
        Ok(())
    }

    fn run_facts(&self, config: &SourceConfig) -> Result<(), Error> {
        let opts = TweetOptions::build()
            .fact_config(config.fact_config())
            .seed(config.seed)
            .build();
        let date = self
            .series
            .resolve_target(&config.date, &mut opts.rng())
            .map_err(tweet::Error::from)?;
        let facts = candidate_facts(&self.series, date, opts.fact_config())
            .map_err(tweet::Error::from)?;
        let selected = select(&facts, facts.len());

        println!("{}", format_date(date));
        for fact in &facts {
            let marker = match selected.iter().position(|f| f == fact) {
                Some(i) => format!("{:>2}", i + 1),
                None => String::from(" -"),
            };
            println!("{marker} {}", sentence(fact, date));
        }
        Ok(())
    }
}
