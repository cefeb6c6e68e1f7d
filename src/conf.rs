// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Settings for the output channels.
//!
//! Each setting can be given on the command line or read from the
//! environment. A value passed explicitly always wins over the environment.

use std::env;
use thiserror::Error;

/// Environment variable holding the Slack incoming webhook URL.
pub const SLACK_WEBHOOK_URL: &str = "SLACK_WEBHOOK_URL";

/// Environment variable holding the Twitter user access token.
pub const TWITTER_ACCESS_TOKEN: &str = "TWITTER_ACCESS_TOKEN";

/// An error resolving channel settings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfError {
    /// A setting was neither given explicitly nor found in the environment.
    #[error("missing {setting}: pass it on the command line or set ${envvar}")]
    Missing {
        /// Human-readable name of the setting.
        setting: &'static str,

        /// Environment variable consulted for the setting.
        envvar: &'static str,
    },
}

/// Standard result type for resolving settings.
pub type ConfResult<T> = Result<T, ConfError>;

fn resolve(
    explicit: Option<&str>,
    setting: &'static str,
    envvar: &'static str,
) -> ConfResult<String> {
    explicit
        .map(String::from)
        .or_else(|| env::var(envvar).ok())
        .filter(|value| !value.trim().is_empty())
        .ok_or(ConfError::Missing { setting, envvar })
}

/// Where Slack messages are sent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlackSettings {
    url: String,
}

impl SlackSettings {
    /// Creates Slack settings for the given webhook URL.
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        Self { url }
    }

    /// Uses `url` if given, falling back to `$SLACK_WEBHOOK_URL`.
    pub fn resolve(url: Option<&str>) -> ConfResult<Self> {
        resolve(url, "Slack webhook URL", SLACK_WEBHOOK_URL).map(Self::new)
    }

    /// The incoming webhook URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Credentials used to post tweets.
#[derive(Clone, PartialEq, Eq)]
pub struct TwitterSettings {
    access_token: String,
}

impl TwitterSettings {
    /// Creates Twitter settings with an OAuth 2.0 user access token.
    pub fn new(access_token: impl Into<String>) -> Self {
        let access_token = access_token.into();
        Self { access_token }
    }

    /// Uses `access_token` if given, falling back to `$TWITTER_ACCESS_TOKEN`.
    pub fn resolve(access_token: Option<&str>) -> ConfResult<Self> {
        resolve(access_token, "Twitter access token", TWITTER_ACCESS_TOKEN).map(Self::new)
    }

    /// The OAuth 2.0 user access token.
    ///
    /// # Examples
    ///
    /// ```
    /// use velotweet::conf::TwitterSettings;
    /// let settings = TwitterSettings::new("ThisIsMyToken");
    /// assert_eq!(settings.access_token(), "ThisIsMyToken");
    /// ```
    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

// Keep the token out of logs.
impl std::fmt::Debug for TwitterSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwitterSettings")
            .field("access_token", &"********")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use temp_env::{with_var, with_var_unset};

    mod slack {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn it_prefers_an_explicit_url() {
            with_var(SLACK_WEBHOOK_URL, Some("https://hooks.example/env"), || {
                let settings = SlackSettings::resolve(Some("https://hooks.example/flag")).unwrap();
                assert_eq!(settings.url(), "https://hooks.example/flag");
            })
        }

        #[test]
        fn it_reads_the_url_from_the_environment() {
            with_var(SLACK_WEBHOOK_URL, Some("https://hooks.example/env"), || {
                let settings = SlackSettings::resolve(None).unwrap();
                assert_eq!(settings.url(), "https://hooks.example/env");
            })
        }

        #[test]
        fn it_returns_an_error_if_the_url_is_missing() {
            with_var_unset(SLACK_WEBHOOK_URL, || {
                let settings = SlackSettings::resolve(None);
                assert_eq!(
                    settings,
                    Err(ConfError::Missing {
                        setting: "Slack webhook URL",
                        envvar: SLACK_WEBHOOK_URL,
                    })
                );
            })
        }
    }

    mod twitter {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn it_reads_the_token_from_the_environment() {
            with_var(TWITTER_ACCESS_TOKEN, Some("ThisIsMyToken"), || {
                let settings = TwitterSettings::resolve(None).unwrap();
                assert_eq!(settings.access_token(), "ThisIsMyToken");
            })
        }

        #[test]
        fn it_returns_an_error_if_the_token_is_blank() {
            with_var(TWITTER_ACCESS_TOKEN, Some("  "), || {
                let settings = TwitterSettings::resolve(None);
                assert!(matches!(settings, Err(ConfError::Missing { .. })));
            })
        }

        #[test]
        fn it_hides_the_token_when_debugging() {
            let settings = TwitterSettings::new("ThisIsMyToken");
            let debug = format!("{settings:?}");
            assert!(!debug.contains("ThisIsMyToken"), "{debug} leaks the token");
        }
    }

    #[test]
    fn it_describes_missing_settings() {
        let err = ConfError::Missing {
            setting: "Twitter access token",
            envvar: TWITTER_ACCESS_TOKEN,
        };
        assert_eq!(
            err.to_string(),
            "missing Twitter access token: pass it on the command line or set $TWITTER_ACCESS_TOKEN"
        );
    }
}
