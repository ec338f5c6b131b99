// src/error.rs
use thiserror::Error;

/// Faults that can abort one singer's task. Absence of content (a dead id,
/// a song link with no lyric element) is NOT an error; it is signalled with
/// `Option` at the call sites and handled by skipping.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Connect/DNS/timeout/TLS failure, or a broken response stream.
    #[error("transport error for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },

    /// The server answered, but not with a 2xx.
    #[error("http status {status} for {url}")]
    Status { status: u16, url: String },

    /// Response arrived but the body could not be read as text.
    #[error("failed to read body of {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: std::io::Error,
    },

    /// Document structure the parser cannot work with.
    #[error("parse error: {0}")]
    Parse(String),

    /// Output directory/file trouble; fatal for the singer task only.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
