// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Services for communicating with APIs using HTTP.

use reqwest::{Client, ClientBuilder, Response, StatusCode};
use std::{error, fmt};

/// A general service for making HTTP calls.
///
/// Think of an implementor as a proxy for a remote service: it knows how
/// to build a client for it, and how to tell a failed call from a
/// successful one.
pub trait HTTPService {
    /// Default HTTP client that can be used to make HTTP requests.
    fn client() -> HTTPResult<Client> {
        ClientBuilder::new()
            .user_agent(Self::user_agent())
            .build()
            .map_err(HTTPError::Client)
    }

    /// An appropriate user agent to use when making HTTP requests.
    fn user_agent() -> String {
        format!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }

    /// Turns an unsuccessful HTTP status into an error.
    fn check_status(resp: Response) -> HTTPResult<Response> {
        let status = resp.status();
        if status.is_success() {
            Ok(resp)
        } else {
            Err(HTTPError::Http(status))
        }
    }
}

/// The result of an HTTP request.
pub type HTTPResult<T> = Result<T, HTTPError>;

/// Indicates an error has occurred when making an HTTP call.
#[derive(Debug)]
pub enum HTTPError {
    /// The HTTP client could not be created.
    Client(reqwest::Error),

    /// An error that occurred while making an HTTP request.
    Request(reqwest::Error),

    /// An error retrieving or decoding the body of a response.
    Body(reqwest::Error),

    /// An unsuccessful HTTP status code in an HTTP response.
    Http(StatusCode),
}

impl fmt::Display for HTTPError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HTTPError::Client(err) => write!(f, "Could not create HTTP client: {err}"),
            HTTPError::Request(err) => write!(f, "Error while making HTTP request: {err}"),
            HTTPError::Body(err) => write!(f, "Error retrieving body of HTTP response: {err}"),
            HTTPError::Http(status) => write!(f, "Request returned HTTP {status}"),
        }
    }
}

impl error::Error for HTTPError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            HTTPError::Client(err) => Some(err),
            HTTPError::Request(err) => Some(err),
            HTTPError::Body(err) => Some(err),
            HTTPError::Http(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    struct UserAgentTestService;
    impl HTTPService for UserAgentTestService {}

    #[test]
    fn it_returns_user_agent_with_version_number() {
        let user_agent = UserAgentTestService::user_agent();
        let version_re = Regex::new(r"^[a-z]+ v\d+\.\d+\.\d+(-(alpha|beta)\.\d+)?$").unwrap();
        assert!(
            version_re.is_match(&user_agent),
            "{} does not match {}",
            user_agent,
            version_re,
        );
    }

    #[test]
    fn it_builds_a_client() {
        assert!(UserAgentTestService::client().is_ok());
    }

    #[test]
    fn it_describes_http_status_errors() {
        let err = HTTPError::Http(StatusCode::FORBIDDEN);
        assert_eq!(err.to_string(), "Request returned HTTP 403 Forbidden");
        assert!(error::Error::source(&err).is_none());
    }
}
