use std::error::Error;
use std::fmt::Display;

/// Classification of a failed resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NoMatch,
    UpstreamUnavailable,
    UpstreamRejected,
    MediaUrlNotFound,
    DownloadFailed,
    Timeout,
}

impl Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoMatch => write!(f, "no match"),
            Self::UpstreamUnavailable => write!(f, "upstream unavailable"),
            Self::UpstreamRejected => write!(f, "upstream rejected"),
            Self::MediaUrlNotFound => write!(f, "media url not found"),
            Self::DownloadFailed => write!(f, "download failed"),
            Self::Timeout => write!(f, "timeout"),
        }
    }
}

/// Terminal failure of a single resolution call, with a message meant for the end user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionFailure {
    pub kind: FailureKind,
    pub detail: String,
}

impl ResolutionFailure {
    pub fn new(kind: FailureKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub fn no_match() -> Self {
        Self::new(
            FailureKind::NoMatch,
            "No valid link found. Send a TikTok or Shopee link.",
        )
    }

    /// Classify a transport error. Timeouts always map to `Timeout`, everything else to
    /// `fallback`.
    pub fn from_request(err: &reqwest::Error, fallback: FailureKind, context: &str) -> Self {
        if err.is_timeout() {
            Self::new(
                FailureKind::Timeout,
                format!("{context}: timed out, try again"),
            )
        } else {
            Self::new(fallback, format!("{context}: {err}"))
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.kind == FailureKind::Timeout
    }
}

impl Display for ResolutionFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.detail)
    }
}

impl Error for ResolutionFailure {}
