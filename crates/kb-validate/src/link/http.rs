//! Blocking HTTP implementation of [`LinkChecker`].

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use thiserror::Error;

use super::{LinkChecker, LinkStatus};

/// Some sites refuse requests without a browser user agent.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/92.0.4515.107 Safari/537.36";

/// Errors raised while setting up link checking.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

/// Issues a GET per URL with a browser user agent.
#[derive(Debug, Clone)]
pub struct HttpLinkChecker {
    client: Client,
    timeout: Duration,
}

impl HttpLinkChecker {
    /// Create a checker. With `allow_redirects == false`, a redirect response
    /// is reported as the redirect status itself.
    pub fn new(timeout: Duration, allow_redirects: bool) -> Result<Self, LinkError> {
        let policy = if allow_redirects {
            Policy::default()
        } else {
            Policy::none()
        };
        let client = Client::builder()
            .timeout(timeout)
            .redirect(policy)
            .user_agent(BROWSER_USER_AGENT)
            .build()
            .map_err(LinkError::ClientBuild)?;
        Ok(Self { client, timeout })
    }
}

impl LinkChecker for HttpLinkChecker {
    fn check(&self, url: &str) -> LinkStatus {
        match self.client.get(url).send() {
            Ok(response) => classify_status(response.status()),
            Err(err) if err.is_timeout() => LinkStatus::Unreachable {
                reason: format!("timed out after {}s", self.timeout.as_secs_f32()),
            },
            Err(err) => LinkStatus::Unreachable {
                reason: err.to_string(),
            },
        }
    }
}

fn classify_status(status: StatusCode) -> LinkStatus {
    match status {
        StatusCode::FORBIDDEN => {
            tracing::debug!("403 forbidden treated as reachable");
            LinkStatus::Reachable
        }
        status if status.is_success() => LinkStatus::Reachable,
        status => LinkStatus::NotFound {
            code: status.as_u16(),
        },
    }
}
