use std::fmt::{self, Display, Formatter};

/// The kind of error that occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The capability is not available in this environment, or no
    /// session can be obtained right now.
    Unavailable,
    /// The provider refused to answer the prompt.
    Rejected,
    /// The provider is rate limited.
    RateLimitExceeded,
    /// Any other errors.
    Other,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let desc = match self {
            ErrorKind::Unavailable => "unavailable",
            ErrorKind::Rejected => "rejected",
            ErrorKind::RateLimitExceeded => "rate limit exceeded",
            ErrorKind::Other => "other",
        };
        f.write_str(desc)
    }
}
