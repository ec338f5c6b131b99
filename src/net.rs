// src/net.rs
use std::time::Duration;

use crate::error::ScrapeError;

/// Transport capability: fetch a URL, hand back the response body.
/// The harvesting code only ever talks to this trait, so tests can swap in
/// a canned-page fake and the real client stays a thin adapter.
pub trait Fetch: Send + Sync {
    fn get(&self, url: &str) -> Result<String, ScrapeError>;
}

/// Production transport backed by a blocking `ureq` agent.
/// One request in flight per worker thread; connection reuse is the agent's
/// problem, not ours.
pub struct HttpClient {
    agent: ureq::Agent,
}

impl HttpClient {
    pub fn new() -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(10))
            .timeout_read(Duration::from_secs(30))
            .user_agent(concat!("lyric_scrape/", env!("CARGO_PKG_VERSION")))
            .build();
        Self { agent }
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetch for HttpClient {
    fn get(&self, url: &str) -> Result<String, ScrapeError> {
        log::debug!("GET {url}");
        let response = self.agent.get(url).call().map_err(|e| match e {
            ureq::Error::Status(status, _) => ScrapeError::Status {
                status,
                url: url.to_string(),
            },
            other => ScrapeError::Transport {
                url: url.to_string(),
                source: Box::new(other),
            },
        })?;

        response.into_string().map_err(|e| ScrapeError::Body {
            url: url.to_string(),
            source: e,
        })
    }
}
