// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Sends tweets to their audience.
//!
//! A tweet can be printed to standard output, posted to Twitter, or sent
//! to a Slack channel through an incoming webhook. [`Channel`] picks one of
//! these publishers based on the requested [`Output`].

use crate::conf::{ConfError, SlackSettings, TwitterSettings};
use crate::http::{HTTPError, HTTPService};
use crate::tweet::Tweet;
use clap::ValueEnum;
use log::{debug, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Endpoint used to create tweets.
pub const TWITTER_API_URL: &str = "https://api.twitter.com/2/tweets";

/// Longest tweet Twitter accepts, in characters.
pub const MAX_TWEET_LENGTH: usize = 280;

/// Where a tweet is published.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Output {
    /// Print the tweet to standard output.
    #[default]
    Std,

    /// Post the tweet to Twitter.
    Twitter,

    /// Send the tweet to a Slack webhook.
    Slack,
}

/// An error publishing a tweet.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The tweet is longer than Twitter allows.
    #[error("tweet is {length} characters long, but at most {max} are allowed")]
    TooLong {
        /// Length of the tweet in characters.
        length: usize,

        /// Largest allowed length.
        max: usize,
    },

    /// The channel is not configured.
    #[error("{0}")]
    Conf(#[from] ConfError),

    /// The remote service could not be reached or refused the tweet.
    #[error("{0}")]
    Http(#[from] HTTPError),
}

/// Standard result type for publishing.
pub type PublishResult<T> = Result<T, PublishError>;

/// Something that can publish a tweet.
pub trait Publisher {
    /// Publishes `tweet`.
    fn publish(&self, tweet: &Tweet) -> impl Future<Output = PublishResult<()>> + Send;
}

/// Body shared by Slack webhooks and the Twitter API.
#[derive(Debug, PartialEq, Serialize)]
struct Message<'a> {
    text: &'a str,
}

impl<'a> From<&'a Tweet> for Message<'a> {
    fn from(tweet: &'a Tweet) -> Self {
        Self {
            text: tweet.content(),
        }
    }
}

/// Prints tweets to standard output.
#[derive(Debug, Default)]
pub struct StdOutPublisher;

impl Publisher for StdOutPublisher {
    async fn publish(&self, tweet: &Tweet) -> PublishResult<()> {
        println!("{tweet}");
        Ok(())
    }
}

/// Sends tweets to a Slack incoming webhook.
#[derive(Debug)]
pub struct SlackPublisher {
    settings: SlackSettings,
    client: Client,
}

impl HTTPService for SlackPublisher {}

impl SlackPublisher {
    /// Creates a publisher for the webhook in `settings`.
    pub fn new(settings: SlackSettings) -> PublishResult<Self> {
        let client = Self::client()?;
        Ok(Self { settings, client })
    }
}

impl Publisher for SlackPublisher {
    async fn publish(&self, tweet: &Tweet) -> PublishResult<()> {
        debug!("sending {} characters to Slack", tweet.len());
        let resp = self
            .client
            .post(self.settings.url())
            .json(&Message::from(tweet))
            .send()
            .await
            .map_err(HTTPError::Request)?;
        Self::check_status(resp)?;
        info!("sent tweet to Slack");
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct CreatedTweet {
    data: CreatedTweetData,
}

#[derive(Debug, Deserialize)]
struct CreatedTweetData {
    id: String,
}

/// Posts tweets to Twitter.
#[derive(Debug)]
pub struct TwitterPublisher {
    settings: TwitterSettings,
    client: Client,
}

impl HTTPService for TwitterPublisher {}

impl TwitterPublisher {
    /// Creates a publisher that posts with the credentials in `settings`.
    pub fn new(settings: TwitterSettings) -> PublishResult<Self> {
        let client = Self::client()?;
        Ok(Self { settings, client })
    }

    fn check_length(tweet: &Tweet) -> PublishResult<()> {
        let length = tweet.len();
        if length > MAX_TWEET_LENGTH {
            Err(PublishError::TooLong {
                length,
                max: MAX_TWEET_LENGTH,
            })
        } else {
            Ok(())
        }
    }
}

impl Publisher for TwitterPublisher {
    async fn publish(&self, tweet: &Tweet) -> PublishResult<()> {
        Self::check_length(tweet)?;
        debug!("posting {} characters to {TWITTER_API_URL}", tweet.len());
        let resp = self
            .client
            .post(TWITTER_API_URL)
            .bearer_auth(self.settings.access_token())
            .json(&Message::from(tweet))
            .send()
            .await
            .map_err(HTTPError::Request)?;
        let created = Self::check_status(resp)?
            .json::<CreatedTweet>()
            .await
            .map_err(HTTPError::Body)?;
        info!("posted tweet {}", created.data.id);
        Ok(())
    }
}

/// One of the available publishers.
#[derive(Debug)]
pub enum Channel {
    /// Standard output.
    StdOut(StdOutPublisher),

    /// A Slack webhook.
    Slack(SlackPublisher),

    /// Twitter.
    Twitter(TwitterPublisher),
}

impl Channel {
    /// Builds the publisher for `output`.
    ///
    /// `slack_url` and `twitter_access_token` override the environment; they
    /// are only consulted for their own channel.
    pub fn for_output(
        output: Output,
        slack_url: Option<&str>,
        twitter_access_token: Option<&str>,
    ) -> PublishResult<Self> {
        let channel = match output {
            Output::Std => Channel::StdOut(StdOutPublisher),
            Output::Slack => {
                let settings = SlackSettings::resolve(slack_url)?;
                Channel::Slack(SlackPublisher::new(settings)?)
            }
            Output::Twitter => {
                let settings = TwitterSettings::resolve(twitter_access_token)?;
                Channel::Twitter(TwitterPublisher::new(settings)?)
            }
        };
        Ok(channel)
    }
}

impl Publisher for Channel {
    async fn publish(&self, tweet: &Tweet) -> PublishResult<()> {
        match self {
            Channel::StdOut(publisher) => publisher.publish(tweet).await,
            Channel::Slack(publisher) => publisher.publish(tweet).await,
            Channel::Twitter(publisher) => publisher.publish(tweet).await,
        }
    }
}
